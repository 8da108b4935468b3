use super::Error;

/// Error when two distinct labels sanitize to the same SQL identifier.
#[derive(Debug)]
pub(super) struct IdentifierCollision {
    scope: Box<str>,
    first: Box<str>,
    second: Box<str>,
    ident: Box<str>,
}

impl std::error::Error for IdentifierCollision {}

impl core::fmt::Display for IdentifierCollision {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "identifier collision in `{}`: `{}` and `{}` both sanitize to `{}`",
            self.scope, self.first, self.second, self.ident
        )
    }
}

impl Error {
    /// Creates an identifier collision error.
    ///
    /// `scope` is the table (or schema) in which the names must be unique.
    pub fn identifier_collision(
        scope: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
        ident: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::IdentifierCollision(IdentifierCollision {
            scope: scope.into().into(),
            first: first.into().into(),
            second: second.into().into(),
            ident: ident.into().into(),
        }))
    }

    /// Returns `true` if this error is an identifier collision error.
    pub fn is_identifier_collision(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::IdentifierCollision(_))
    }
}
