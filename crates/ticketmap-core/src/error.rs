use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("CSV file must have a \"{column}\" column. Found columns: {found:?}")]
    MissingColumn { column: String, found: Vec<String> },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for the input-side failures (missing file, missing column, unreadable CSV).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::InputNotFound { .. } | Error::MissingColumn { .. } | Error::Csv(_)
        )
    }
}
