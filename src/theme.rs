use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::warn;
use ratatui::style::Color;
use serde::Deserialize;
use thiserror::Error;

const USER_THEME_APP_DIR: &str = "ocean-snake";

/// Id of the theme selected at startup when none is requested.
pub const DEFAULT_THEME_ID: &str = "ocean-light";

/// A color theme applied to all visual elements.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Theme {
    pub name: String,
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    /// Background of empty play-field cells.
    pub field_bg: Color,
    pub border: Color,
    /// Header and footer background.
    pub ui_bg: Color,
    pub ui_text: Color,
    pub ui_accent: Color,
    pub ui_muted: Color,
}

/// Light ocean palette.
#[must_use]
pub fn ocean_light() -> Theme {
    Theme {
        name: "Ocean Light".to_owned(),
        snake_head: Color::Rgb(30, 64, 175),
        snake_body: Color::Rgb(37, 99, 235),
        food: Color::Rgb(253, 78, 61),
        field_bg: Color::Rgb(239, 246, 255),
        border: Color::Rgb(147, 197, 253),
        ui_bg: Color::Rgb(248, 250, 252),
        ui_text: Color::Rgb(17, 24, 39),
        ui_accent: Color::Rgb(37, 99, 235),
        ui_muted: Color::Rgb(100, 116, 139),
    }
}

/// Dark ocean palette.
#[must_use]
pub fn ocean_dark() -> Theme {
    Theme {
        name: "Ocean Dark".to_owned(),
        snake_head: Color::Rgb(224, 242, 254),
        snake_body: Color::Rgb(56, 189, 248),
        food: Color::Rgb(251, 191, 36),
        field_bg: Color::Rgb(15, 23, 42),
        border: Color::Rgb(14, 116, 144),
        ui_bg: Color::Rgb(2, 6, 23),
        ui_text: Color::Rgb(226, 232, 240),
        ui_accent: Color::Rgb(56, 189, 248),
        ui_muted: Color::Rgb(100, 116, 139),
    }
}

#[derive(Debug, Clone)]
pub struct ThemeItem {
    pub id: String,
    pub theme: Theme,
}

/// Built-in themes followed by user themes, with one selected.
#[derive(Debug, Clone)]
pub struct ThemeCatalog {
    themes: Vec<ThemeItem>,
    selected_idx: usize,
}

impl Default for ThemeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ThemeCatalog {
    /// Only the bundled light and dark themes.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            themes: vec![
                ThemeItem {
                    id: "ocean-light".to_owned(),
                    theme: ocean_light(),
                },
                ThemeItem {
                    id: "ocean-dark".to_owned(),
                    theme: ocean_dark(),
                },
            ],
            selected_idx: 0,
        }
    }

    /// Bundled themes overlaid with `*.json` files from the user theme dir.
    #[must_use]
    pub fn load() -> Self {
        let mut catalog = Self::builtin();
        if let Some(dir) = user_theme_dir() {
            catalog.merge_dir(&dir);
        }
        catalog
    }

    /// Adds every valid theme file in `path`, in file-name order. A file whose
    /// stem matches an existing id replaces that theme.
    pub fn merge_dir(&mut self, path: &Path) {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(_) => return,
        };

        let mut theme_paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| is_json_file(path))
            .collect();
        theme_paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        for file_path in theme_paths {
            let Some(id) = file_path
                .file_stem()
                .and_then(|name| name.to_str())
                .map(str::to_owned)
            else {
                continue;
            };

            match load_theme_file(&id, &file_path) {
                Ok(theme) => self.insert(id, theme),
                Err(error) => {
                    warn!(
                        "invalid theme file {}; skipping: {error}",
                        file_path.display()
                    );
                }
            }
        }
    }

    fn insert(&mut self, id: String, theme: Theme) {
        match self.themes.iter_mut().find(|item| item.id == id) {
            Some(item) => item.theme = theme,
            None => self.themes.push(ThemeItem { id, theme }),
        }
    }

    #[must_use]
    pub fn current_theme(&self) -> &Theme {
        &self.themes[self.selected_idx].theme
    }

    #[must_use]
    pub fn current_id(&self) -> &str {
        &self.themes[self.selected_idx].id
    }

    #[must_use]
    pub fn items(&self) -> &[ThemeItem] {
        &self.themes
    }

    pub fn select_next(&mut self) {
        self.selected_idx = (self.selected_idx + 1) % self.themes.len();
    }

    /// Selects the theme with `id`; returns false (keeping the current
    /// selection) when there is none.
    pub fn select_by_id(&mut self, id: &str) -> bool {
        if let Some(idx) = self.themes.iter().position(|item| item.id == id) {
            self.selected_idx = idx;
            return true;
        }

        false
    }
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown base theme {0:?} (expected \"light\" or \"dark\")")]
    Base(String),
    #[error("invalid color {value:?} for {token}")]
    Color { token: String, value: String },
}

/// On-disk theme: a base palette plus per-token color overrides.
#[derive(Debug, Deserialize)]
struct ThemeFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    base: Option<String>,
    #[serde(default)]
    colors: HashMap<String, String>,
}

fn load_theme_file(id: &str, path: &Path) -> Result<Theme, ThemeError> {
    let raw = fs::read_to_string(path)?;
    parse_theme(id, &raw)
}

fn parse_theme(id: &str, raw: &str) -> Result<Theme, ThemeError> {
    let parsed: ThemeFile = serde_json::from_str(raw)?;

    let mut theme = match parsed.base.as_deref() {
        None | Some("light") => ocean_light(),
        Some("dark") => ocean_dark(),
        Some(other) => return Err(ThemeError::Base(other.to_owned())),
    };
    theme.name = parsed.name.unwrap_or_else(|| display_name(id));

    for (token, value) in &parsed.colors {
        let color = parse_color(value).ok_or_else(|| ThemeError::Color {
            token: token.clone(),
            value: value.clone(),
        })?;

        let slot = match token.as_str() {
            "snake_head" => &mut theme.snake_head,
            "snake_body" => &mut theme.snake_body,
            "food" => &mut theme.food,
            "field_bg" => &mut theme.field_bg,
            "border" => &mut theme.border,
            "ui_bg" => &mut theme.ui_bg,
            "ui_text" => &mut theme.ui_text,
            "ui_accent" => &mut theme.ui_accent,
            "ui_muted" => &mut theme.ui_muted,
            other => {
                warn!("theme {id}: ignoring unknown token {other:?}");
                continue;
            }
        };
        *slot = color;
    }

    Ok(theme)
}

/// Accepts `#rrggbb`, ANSI names and indices, and `none`/`reset` for the
/// terminal default.
fn parse_color(value: &str) -> Option<Color> {
    if value.eq_ignore_ascii_case("none") || value.eq_ignore_ascii_case("reset") {
        return Some(Color::Reset);
    }

    Color::from_str(value).ok()
}

fn is_json_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn display_name(id: &str) -> String {
    let mut output = String::new();
    for (idx, part) in id.split(['-', '_']).enumerate() {
        if idx > 0 {
            output.push(' ');
        }

        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            output.push(first.to_ascii_uppercase());
            output.push_str(chars.as_str());
        }
    }
    output
}

fn user_theme_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|config_dir| config_dir.join(USER_THEME_APP_DIR).join("themes"))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use ratatui::style::Color;

    use super::{ocean_dark, ocean_light, parse_color, parse_theme, ThemeCatalog, ThemeError};

    #[test]
    fn parses_hex_and_named_colors() {
        assert_eq!(parse_color("#AABBCC"), Some(Color::Rgb(170, 187, 204)));
        assert_eq!(parse_color("red"), Some(Color::Red));
        assert_eq!(parse_color("none"), Some(Color::Reset));
        assert_eq!(parse_color("not-a-color"), None);
    }

    #[test]
    fn overrides_apply_on_top_of_base() {
        let json = r##"
        {
          "name": "Deep Sea",
          "base": "dark",
          "colors": { "food": "#FF0000", "snake_body": "cyan" }
        }
        "##;

        let theme = parse_theme("deep-sea", json).expect("theme should parse");
        assert_eq!(theme.name, "Deep Sea");
        assert_eq!(theme.food, Color::Rgb(255, 0, 0));
        assert_eq!(theme.snake_body, Color::Cyan);
        assert_eq!(theme.field_bg, ocean_dark().field_bg);
    }

    #[test]
    fn missing_name_is_derived_from_id() {
        let theme = parse_theme("coral_reef", "{}").expect("empty theme should parse");

        assert_eq!(theme.name, "Coral Reef");
        assert_eq!(theme.snake_head, ocean_light().snake_head);
    }

    #[test]
    fn invalid_color_is_an_error() {
        let json = r#"{ "colors": { "food": "sparkly" } }"#;

        assert!(matches!(
            parse_theme("bad", json),
            Err(ThemeError::Color { .. })
        ));
    }

    #[test]
    fn unknown_base_is_an_error() {
        assert!(matches!(
            parse_theme("bad", r#"{ "base": "sepia" }"#),
            Err(ThemeError::Base(_))
        ));
    }

    #[test]
    fn toggle_cycles_through_catalog() {
        let mut catalog = ThemeCatalog::builtin();
        assert_eq!(catalog.current_id(), "ocean-light");

        catalog.select_next();
        assert_eq!(catalog.current_id(), "ocean-dark");

        catalog.select_next();
        assert_eq!(catalog.current_id(), "ocean-light");
    }

    #[test]
    fn select_by_unknown_id_keeps_selection() {
        let mut catalog = ThemeCatalog::builtin();
        catalog.select_next();

        assert!(!catalog.select_by_id("missing"));
        assert_eq!(catalog.current_id(), "ocean-dark");
    }

    #[test]
    fn merge_dir_adds_and_overrides_sorted_by_filename() {
        let dir = unique_test_dir("themes");
        fs::create_dir_all(&dir).expect("test directory should be creatable");

        fs::write(dir.join("z-last.json"), r##"{"colors":{"food":"#00AA00"}}"##)
            .expect("theme file should be writable");
        fs::write(dir.join("a-first.json"), r##"{"colors":{"food":"#AA0000"}}"##)
            .expect("theme file should be writable");
        fs::write(
            dir.join("ocean-dark.json"),
            r##"{"base":"dark","colors":{"food":"#123456"}}"##,
        )
        .expect("theme file should be writable");
        fs::write(dir.join("broken.json"), "not json").expect("theme file should be writable");
        fs::write(dir.join("notes.txt"), "ignored").expect("file should be writable");

        let mut catalog = ThemeCatalog::builtin();
        catalog.merge_dir(&dir);

        let ids: Vec<&str> = catalog.items().iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["ocean-light", "ocean-dark", "a-first", "z-last"]);
        assert!(catalog.select_by_id("ocean-dark"));
        assert_eq!(catalog.current_theme().food, Color::Rgb(18, 52, 86));

        let _ = fs::remove_dir_all(&dir);
    }

    fn unique_test_dir(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("ocean-snake-theme-tests")
            .join(format!("{label}-{nanos}"))
    }
}
