use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::engine::Snapshot;
use crate::listener::{Listener, ListenerError};

/// Appends every emitted snapshot to a JSON-lines file.
pub struct SnapshotRecorder<W: Write = BufWriter<File>> {
    writer: W,
    lines: u64,
}

impl SnapshotRecorder {
    /// Creates (or truncates) the log at `path`, creating parent directories.
    pub fn create(path: &Path) -> Result<Self, ListenerError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> SnapshotRecorder<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    /// Number of snapshots written so far.
    #[must_use]
    pub fn lines(&self) -> u64 {
        self.lines
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Listener for SnapshotRecorder<W> {
    fn on_change(&mut self, snapshot: &Snapshot) -> Result<(), ListenerError> {
        serde_json::to_writer(&mut self.writer, snapshot)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.lines += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::{self, Write};
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::engine::Snapshot;
    use crate::listener::{Listener, ListenerError};

    use super::SnapshotRecorder;

    #[test]
    fn writes_one_json_object_per_line() {
        let mut recorder = SnapshotRecorder::new(Vec::new());
        let mut snapshot = Snapshot::placeholder();

        recorder.on_change(&snapshot).expect("write to memory");
        snapshot.score = 3;
        recorder.on_change(&snapshot).expect("write to memory");

        assert_eq!(recorder.lines(), 2);
        let raw = String::from_utf8(recorder.into_inner()).expect("utf-8 output");
        let scores: Vec<u64> = raw
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).expect("valid json");
                value["score"].as_u64().expect("numeric score")
            })
            .collect();
        assert_eq!(scores, vec![0, 3]);
    }

    #[test]
    fn write_failures_surface_as_io_errors() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("disk full"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut recorder = SnapshotRecorder::new(Broken);
        let result = recorder.on_change(&Snapshot::placeholder());

        assert!(matches!(
            result,
            Err(ListenerError::Json(_) | ListenerError::Io(_))
        ));
        assert_eq!(recorder.lines(), 0);
    }

    #[test]
    fn create_makes_parent_directories() {
        let dir = unique_test_dir("recorder");
        let path = dir.join("nested").join("snapshots.jsonl");

        let mut recorder = SnapshotRecorder::create(&path).expect("log file should be creatable");
        recorder
            .on_change(&Snapshot::placeholder())
            .expect("write should succeed");
        drop(recorder);

        let raw = fs::read_to_string(&path).expect("log should be readable");
        assert_eq!(raw.lines().count(), 1);

        let _ = fs::remove_dir_all(&dir);
    }

    fn unique_test_dir(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("ocean-snake-tests")
            .join(format!("{label}-{nanos}"))
    }
}
