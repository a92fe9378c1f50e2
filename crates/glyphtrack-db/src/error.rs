/// Refused database operations.
///
/// All of these are recoverable: the database is left unchanged.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DatabaseError {
    #[error("glyph size {got} does not match database size {expected}")]
    SizeMismatch { expected: usize, got: usize },
    #[error("a glyph named {0:?} already exists")]
    DuplicateName(String),
    #[error("no glyph named {0:?}")]
    NotFound(String),
}
