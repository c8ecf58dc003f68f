use std::io;

/// Errors that can occur while building models or correcting a query.
///
/// `Io` and `ModelCorrupt` are fatal at startup (propagated out of `main`).
/// `MalformedInput` only ever causes a single corpus line to be skipped.
#[derive(thiserror::Error, Debug)]
pub enum SpellError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed input line: {0}")]
    MalformedInput(String),

    #[error("model corrupt or unreadable: {0}")]
    ModelCorrupt(String),
}

impl SpellError {
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        SpellError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type SpellResult<T> = Result<T, SpellError>;
