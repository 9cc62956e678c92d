use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {format}: {details} (line {line_number})")]
    Parse {
        format: &'static str,
        line_number: usize,
        details: String,
    },

    #[error(
        "operator at line {line_number} is not an identity where only an identity is representable"
    )]
    UnmatchedSymmetryOperator { line_number: usize },
}

impl Error {
    pub fn from_io(source: std::io::Error) -> Self {
        Self::Io { source }
    }

    pub fn parse(
        format: &'static str,
        line_number: usize,
        details: impl Into<String>,
    ) -> Self {
        Self::Parse {
            format,
            line_number,
            details: details.into(),
        }
    }
}
