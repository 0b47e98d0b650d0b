use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("class format error: {0}")]
    ClassFormat(String),
    #[error("unrecognized artifact format: {0}")]
    UnknownFormat(String),
}

impl From<ristretto_classfile::Error> for ReadError {
    fn from(err: ristretto_classfile::Error) -> Self {
        ReadError::ClassFormat(format!("{err:?}"))
    }
}

pub type Result<T> = std::result::Result<T, ReadError>;
