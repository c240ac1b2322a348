use thiserror::Error;

/// Failures of the guard itself, as opposed to layout violations it finds.
#[derive(Error, Debug)]
pub enum GuardError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed audit record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode audit record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("page driver error: {0}")]
    Driver(String),
}
