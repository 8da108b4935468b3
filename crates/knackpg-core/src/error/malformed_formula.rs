use super::Error;

/// Error when a formula does not match the formula grammar, or is well
/// formed but cannot be compiled against the schema.
#[derive(Debug)]
pub(super) struct MalformedFormula {
    field: Box<str>,
    offset: Option<usize>,
    message: Box<str>,
}

impl std::error::Error for MalformedFormula {}

impl core::fmt::Display for MalformedFormula {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.offset {
            Some(offset) => write!(
                f,
                "malformed formula in field `{}` at offset {}: {}",
                self.field, offset, self.message
            ),
            None => write!(
                f,
                "malformed formula in field `{}`: {}",
                self.field, self.message
            ),
        }
    }
}

impl Error {
    /// Creates a malformed formula error pointing at a byte offset of the
    /// formula text.
    pub fn malformed_formula(
        field: impl Into<String>,
        offset: usize,
        message: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::MalformedFormula(MalformedFormula {
            field: field.into().into(),
            offset: Some(offset),
            message: message.into().into(),
        }))
    }

    /// Creates a malformed formula error that is not tied to a position,
    /// e.g. an aggregate whose target field is on the wrong table.
    pub fn invalid_formula(field: impl Into<String>, message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MalformedFormula(MalformedFormula {
            field: field.into().into(),
            offset: None,
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a malformed formula error.
    pub fn is_malformed_formula(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MalformedFormula(_))
    }
}
