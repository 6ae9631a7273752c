/// File persistence for log records with size-based rotation
///
/// The active file is `logs/fastmover.log`. When a write would push it past
/// the size limit, `fastmover.log.N` is dropped, every older backup shifts
/// up by one and the active file becomes `fastmover.log.1`.
use once_cell::sync::Lazy;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::paths;

/// Rotate once the active file would exceed this many bytes
pub const DEFAULT_MAX_FILE_BYTES: u64 = 1_000_000;
/// Number of rotated backups kept next to the active file
pub const DEFAULT_MAX_BACKUPS: usize = 3;

static FILE_SINK: Lazy<Mutex<Option<RotatingFile>>> = Lazy::new(|| Mutex::new(None));

/// Append-only log file that rotates when it grows past `max_bytes`
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    file: File,
    written: u64,
    max_bytes: u64,
    max_backups: usize,
}

impl RotatingFile {
    pub fn open(path: &Path, max_bytes: u64, max_backups: usize) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let written = file.metadata().map(|m| m.len()).unwrap_or(0);

        Ok(Self {
            path: path.to_path_buf(),
            file,
            written,
            max_bytes,
            max_backups,
        })
    }

    pub fn set_limits(&mut self, max_bytes: u64, max_backups: usize) {
        self.max_bytes = max_bytes;
        self.max_backups = max_backups;
    }

    /// Write one line, rotating first if it would not fit
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        let needed = line.len() as u64 + 1;
        if self.max_bytes > 0 && self.written > 0 && self.written + needed > self.max_bytes {
            self.rotate()?;
        }

        writeln!(self.file, "{}", line)?;
        self.written += needed;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        if self.max_backups == 0 {
            // No backups: truncate in place
            self.file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&self.path)?;
            self.written = 0;
            return Ok(());
        }

        let oldest = self.backup_path(self.max_backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        for index in (1..self.max_backups).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }

        fs::rename(&self.path, self.backup_path(1))?;

        self.file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

/// Open the process-wide log file under the logs directory
pub fn init_file_logging() {
    if !super::config::get_logger_config().file_logging {
        return;
    }

    let path = paths::get_log_file_path();
    match RotatingFile::open(&path, DEFAULT_MAX_FILE_BYTES, DEFAULT_MAX_BACKUPS) {
        Ok(sink) => {
            if let Ok(mut guard) = FILE_SINK.lock() {
                *guard = Some(sink);
            }
        }
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", path.display(), e);
        }
    }
}

/// Apply rotation limits from the loaded configuration
pub fn set_rotation_limits(max_bytes: u64, max_backups: usize) {
    if let Ok(mut guard) = FILE_SINK.lock() {
        if let Some(sink) = guard.as_mut() {
            sink.set_limits(max_bytes, max_backups);
        }
    }
}

pub fn write_to_file(line: &str) {
    if let Ok(mut guard) = FILE_SINK.lock() {
        if let Some(sink) = guard.as_mut() {
            if let Err(e) = sink.write_line(line) {
                let _ = writeln!(io::stderr(), "Log file write error: {}", e);
            }
        }
    }
}

pub fn flush_file_logging() {
    if let Ok(mut guard) = FILE_SINK.lock() {
        if let Some(sink) = guard.as_mut() {
            let _ = sink.flush();
        }
    }
}
