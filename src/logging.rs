use std::fs::OpenOptions;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_CAP: u64 = 4 * 1024 * 1024;

pub fn init_logging(log_level: Level, log_file: Option<&str>) {
    let level_filter = LevelFilter::from_level(log_level);
    let console_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);

    if let Some(path) = log_file {
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(capped_log_file(PathBuf::from(path), LOG_FILE_CAP));
        tracing_subscriber::registry()
            .with(console_layer.with_filter(level_filter))
            .with(file_layer.with_filter(level_filter))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(console_layer.with_filter(level_filter))
            .init();
    }
}

fn capped_log_file(path: PathBuf, max_len: u64) -> impl Fn() -> CappedLogFile {
    let lock = Arc::new(Mutex::new(()));
    move || CappedLogFile {
        path: path.clone(),
        max_len,
        lock: lock.clone(),
    }
}

/// Appends to a log file; once it reaches `max_len` only the newest half is kept.
struct CappedLogFile {
    path: PathBuf,
    max_len: u64,
    lock: Arc<Mutex<()>>,
}

impl CappedLogFile {
    fn shrink_to_tail(&self) -> io::Result<()> {
        let keep = self.max_len / 2;
        let mut tail = Vec::new();
        {
            let mut rf = OpenOptions::new().read(true).open(&self.path)?;
            let size = rf.metadata()?.len();
            rf.seek(SeekFrom::Start(size.saturating_sub(keep)))?;
            rf.read_to_end(&mut tail)?;
        }
        std::fs::write(&self.path, &tail)
    }
}

impl Write for CappedLogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let _guard = self
            .lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let full = std::fs::metadata(&self.path)
            .map(|m| m.len() >= self.max_len)
            .unwrap_or(false);
        if full {
            self.shrink_to_tail()?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capped_file_keeps_tail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contribute.log");
        let make = capped_log_file(path.clone(), 100);

        let mut writer = make();
        writer.write_all(&[b'a'; 120]).unwrap();
        writer.write_all(b"tail").unwrap();

        let content = std::fs::read(&path).unwrap();
        assert_eq!(content.len(), 54);
        assert!(content.ends_with(b"aaaatail"));
    }

    #[test]
    fn test_writes_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contribute.log");
        let make = capped_log_file(path.clone(), 1024);

        make().write_all(b"one\n").unwrap();
        make().write_all(b"two\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }
}
