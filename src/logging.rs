use std::fs::{self, File};
use std::io;
use std::path::Path;

use env_logger::{Builder, Env, Target};

/// Installs the global logger.
///
/// The game owns the terminal, so without `log_file` nothing is logged unless
/// `RUST_LOG` asks for it. With a file, `info` and above are appended there.
pub fn init(log_file: Option<&Path>) -> io::Result<()> {
    let default_filter = if log_file.is_some() { "info" } else { "off" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));

    if let Some(path) = log_file {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = File::options().create(true).append(true).open(path)?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder
        .try_init()
        .map_err(|error| io::Error::new(io::ErrorKind::AlreadyExists, error))
}
