use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Unsupported record schema {found}, expected {expected}")]
    UnsupportedSchema { found: u32, expected: u32 },
    #[error("Initials can be at most {max} characters, got {len}")]
    InitialsTooLong { len: usize, max: usize },
    #[error("Initials may not contain control characters or spaces")]
    InvalidInitials,
    #[error("Face list is empty")]
    EmptyFaces,
    #[error("Face tokens may not be blank")]
    BlankFace,
    #[error("Face token {0:?} appears more than once")]
    DuplicateFace(String),
    #[error("Malformed record: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, RecordError>;
