use super::Error;

/// Error when source metadata is structurally invalid.
///
/// This occurs when:
/// - The metadata document does not deserialize
/// - Two objects or two fields share the same key
/// - A connection field carries no relationship description
/// - A generated identifier is too long for PostgreSQL
#[derive(Debug)]
pub(super) struct InvalidMetadata {
    message: Box<str>,
}

impl std::error::Error for InvalidMetadata {}

impl core::fmt::Display for InvalidMetadata {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid metadata: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid metadata error.
    pub fn invalid_metadata(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidMetadata(InvalidMetadata {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid metadata error.
    pub fn is_invalid_metadata(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidMetadata(_))
    }
}
