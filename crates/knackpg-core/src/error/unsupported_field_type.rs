use super::Error;

/// Error when a source field declares a type with no SQL column type.
///
/// A table cannot be built without a type for each of its columns, so this
/// aborts compilation of the table that owns the field.
#[derive(Debug)]
pub(super) struct UnsupportedFieldType {
    field: Box<str>,
    source_type: Box<str>,
}

impl std::error::Error for UnsupportedFieldType {}

impl core::fmt::Display for UnsupportedFieldType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unsupported field type `{}` (field `{}`)",
            self.source_type, self.field
        )
    }
}

impl Error {
    /// Creates an unsupported field type error for the field with key `field`.
    pub fn unsupported_field_type(
        field: impl Into<String>,
        source_type: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::UnsupportedFieldType(UnsupportedFieldType {
            field: field.into().into(),
            source_type: source_type.into().into(),
        }))
    }

    /// Returns `true` if this error is an unsupported field type error.
    pub fn is_unsupported_field_type(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnsupportedFieldType(_))
    }
}
