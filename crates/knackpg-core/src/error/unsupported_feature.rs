use super::Error;

/// Error when metadata uses a feature the compiler recognises but does not
/// implement.
///
/// This occurs when:
/// - A field is a numeric `equation` formula
/// - A text formula references a computed field of its own table
/// - A text formula references a connection that has no column on its table
#[derive(Debug)]
pub(super) struct UnsupportedFeature {
    message: Box<str>,
}

impl std::error::Error for UnsupportedFeature {}

impl core::fmt::Display for UnsupportedFeature {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unsupported feature: {}", self.message)
    }
}

impl Error {
    /// Creates an unsupported feature error.
    pub fn unsupported_feature(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedFeature(UnsupportedFeature {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an unsupported feature error.
    pub fn is_unsupported_feature(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnsupportedFeature(_))
    }
}
