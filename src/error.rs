use nesting::NestingError;
use sheet::SheetError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NestcssError {
    #[error("CSS parse error: {0}")]
    Parse(#[from] SheetError),

    #[error("{0}")]
    Nesting(#[from] NestingError),
}

// Create a type alias for convenience
pub type Result<T> = std::result::Result<T, NestcssError>;
