//! Per-run transcript
//!
//! Every run appends to `<log dir>/nova-<YYYYmmdd-HHMMSS>.log`. UI lines,
//! `log` records and the final summary are all written here, each line
//! prefixed with a local timestamp.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

static SINK: OnceLock<Mutex<Transcript>> = OnceLock::new();

/// An open transcript file
pub struct Transcript {
    path: PathBuf,
    file: File,
}

impl Transcript {
    /// Create (or append to) the transcript for a run started at `started`
    pub fn create(dir: &Path, started: DateTime<Local>) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Could not create log directory: {}", dir.display()))?;
        let path = dir.join(file_name(started));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Could not open transcript: {}", path.display()))?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append text, one timestamped entry per line
    pub fn write_lines(&mut self, text: &str, at: DateTime<Local>) -> io::Result<()> {
        let stamp = at.format("%Y-%m-%d %H:%M:%S");
        for line in text.lines() {
            writeln!(self.file, "[{stamp}] {line}")?;
        }
        self.file.flush()
    }
}

/// Transcript file name for a run started at `started`
pub fn file_name(started: DateTime<Local>) -> String {
    format!("nova-{}.log", started.format("%Y%m%d-%H%M%S"))
}

/// Open the process-wide transcript
///
/// Only the first call has any effect; later calls return the path of the
/// transcript that is already open.
pub fn init(dir: &Path) -> Result<PathBuf> {
    if let Some(path) = path() {
        return Ok(path);
    }
    let transcript = Transcript::create(dir, Local::now())?;
    let path = transcript.path().to_path_buf();
    let _ = SINK.set(Mutex::new(transcript));
    Ok(path)
}

/// Path of the open transcript, if any
pub fn path() -> Option<PathBuf> {
    let sink = SINK.get()?;
    let transcript = sink.lock().ok()?;
    Some(transcript.path().to_path_buf())
}

/// Append text to the transcript; a no-op before [`init`]
pub fn record(text: &str) {
    let Some(sink) = SINK.get() else {
        return;
    };
    if let Ok(mut transcript) = sink.lock() {
        // A transcript write failure must never take the run down with it
        let _ = transcript.write_lines(text, Local::now());
    }
}

/// `env_logger` pipe target: writes to stderr and the transcript
pub struct LogPipe;

impl Write for LogPipe {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        record(String::from_utf8_lossy(buf).trim_end());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

// ============================================================================
// Tests
// ============================================================================
