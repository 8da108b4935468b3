use super::Error;

/// Error when a formula calls a function that has no SQL equivalent.
///
/// Functions such as `random` or `numberToWords` are part of the formula
/// language but cannot be expressed as a single SQL function call.
#[derive(Debug)]
pub(super) struct UnsupportedFunction {
    name: Box<str>,
}

impl std::error::Error for UnsupportedFunction {}

impl core::fmt::Display for UnsupportedFunction {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unsupported function: `{}` has no SQL equivalent",
            self.name
        )
    }
}

impl Error {
    /// Creates an unsupported function error.
    pub fn unsupported_function(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedFunction(UnsupportedFunction {
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is an unsupported function error.
    pub fn is_unsupported_function(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnsupportedFunction(_))
    }
}
