//! Reader for recorded per-interval traffic traces.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// One recorded sampling interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Interval timestamp, seconds since the Unix epoch.
    pub unix: i64,
    pub syn: u64,
    pub synack: u64,
    pub udp: u64,
}

/// Failure while reading a trace file.
#[derive(Debug)]
pub enum TraceError {
    Io(io::Error),
    Parse { line: usize, message: String },
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::Io(err) => write!(f, "trace io error: {err}"),
            TraceError::Parse { line, message } => write!(f, "trace line {line}: {message}"),
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TraceError::Io(err) => Some(err),
            TraceError::Parse { .. } => None,
        }
    }
}

impl From<io::Error> for TraceError {
    fn from(err: io::Error) -> Self {
        TraceError::Io(err)
    }
}

/// Streaming reader over a JSON-lines trace file.
///
/// One JSON object per line with `unix`, `syn`, `synack` and `udp`
/// fields. Blank lines are skipped; parse failures carry the one-based
/// line number.
#[derive(Debug)]
pub struct TraceReader {
    lines: Lines<BufReader<File>>,
    line: usize,
}

impl TraceReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let file = File::open(path)?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            line: 0,
        })
    }
}

impl Iterator for TraceReader {
    type Item = Result<TraceRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(TraceError::Io(err))),
            };
            self.line += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(serde_json::from_str(&line).map_err(|err| TraceError::Parse {
                line: self.line,
                message: err.to_string(),
            }));
        }
    }
}
