use super::Error;

/// Error when a field references a field or object key that is not part of
/// the compiled application.
///
/// This occurs when:
/// - A connection targets an object that was filtered out or does not exist
/// - An aggregate names a connection or target field that is unknown
/// - A formula token such as `{field_12}` names an unknown field
#[derive(Debug)]
pub(super) struct MissingFieldReference {
    referencing: Box<str>,
    missing: Box<str>,
}

impl std::error::Error for MissingFieldReference {}

impl core::fmt::Display for MissingFieldReference {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "missing field reference: `{}` references unknown key `{}`",
            self.referencing, self.missing
        )
    }
}

impl Error {
    /// Creates a missing field reference error.
    ///
    /// `referencing` is the key of the field holding the reference and
    /// `missing` is the key that could not be found.
    pub fn missing_field_reference(
        referencing: impl Into<String>,
        missing: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::MissingFieldReference(
            MissingFieldReference {
                referencing: referencing.into().into(),
                missing: missing.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is a missing field reference error.
    pub fn is_missing_field_reference(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MissingFieldReference(_))
    }
}
