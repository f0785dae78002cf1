//! Output destinations

use crate::error::{Error, Result};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Buffer size for the output stream
const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Where serialized rows are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    /// Process standard output
    Stdout,
    /// A file, truncated if it exists
    File(PathBuf),
}

impl Sink {
    /// `None` and `-` mean standard output
    pub fn from_destination(destination: Option<&str>) -> Self {
        match destination {
            None | Some("-") => Self::Stdout,
            Some(path) => Self::File(PathBuf::from(path)),
        }
    }

    /// Open the sink for writing.
    ///
    /// Files are created or truncated. Output is buffered; callers must flush
    /// before dropping to observe write errors.
    pub fn open(&self) -> Result<Box<dyn Write + Send>> {
        match self {
            Self::Stdout => Ok(Box::new(BufWriter::with_capacity(
                WRITE_BUFFER_SIZE,
                io::stdout(),
            ))),
            Self::File(path) => {
                let file = File::create(path).map_err(|e| Error::sink(self.to_string(), e))?;
                Ok(Box::new(BufWriter::with_capacity(WRITE_BUFFER_SIZE, file)))
            }
        }
    }
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => write!(f, "stdout"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
