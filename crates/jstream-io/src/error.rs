use thiserror::Error;

/// Result type local to jstream-io.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad {what} marker: found {found:02x?}")]
    BadMagic { what: &'static str, found: [u8; 4] },

    #[error("truncated stream while reading {0}")]
    Truncated(&'static str),

    #[error("invalid column type tag {0}")]
    InvalidColumnType(u8),

    #[error("column name is not valid UTF-8: {0:02x?}")]
    InvalidName(Vec<u8>),

    #[error("{what} is {len} bytes, over the wire limit of {max}")]
    TooLong {
        what: String,
        len: usize,
        max: usize,
    },

    #[error(transparent)]
    Core(#[from] jstream_core::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stream already finished")]
    Finished,
}

impl Error {
    /// Protocol corruption: the byte stream cannot be trusted past this point.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::BadMagic { .. }
                | Error::Truncated(_)
                | Error::InvalidColumnType(_)
                | Error::InvalidName(_)
        )
    }

    /// The downstream reader went away.
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::BrokenPipe)
    }
}
