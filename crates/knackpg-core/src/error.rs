mod adhoc;
mod cyclic_view_dependency;
mod identifier_collision;
mod invalid_metadata;
mod malformed_formula;
mod missing_field_reference;
mod unsupported_feature;
mod unsupported_field_type;
mod unsupported_function;

use adhoc::AdhocError;
use cyclic_view_dependency::CyclicViewDependency;
use identifier_collision::IdentifierCollision;
use invalid_metadata::InvalidMetadata;
use malformed_formula::MalformedFormula;
use missing_field_reference::MissingFieldReference;
use std::sync::Arc;
use unsupported_feature::UnsupportedFeature;
use unsupported_field_type::UnsupportedFieldType;
use unsupported_function::UnsupportedFunction;

/// Builds an ad-hoc error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur while compiling an application schema.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context is shown first,
    /// followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let mut err = consequent;
        if err.inner.is_none() {
            err = Error::from(ErrorKind::Unknown);
        }

        // A freshly built context error is uniquely owned. Anything else is
        // wrapped so the existing chain is left untouched.
        let fresh = err
            .inner
            .as_ref()
            .map(|inner| inner.cause.is_none() && Arc::strong_count(inner) == 1)
            .unwrap_or(false);

        if !fresh {
            let message = err.to_string();
            err = Error::from(ErrorKind::Adhoc(AdhocError::new(message)));
        }

        if let Some(inner) = err.inner.as_mut().and_then(Arc::get_mut) {
            inner.cause = Some(self);
        }
        err
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    /// The innermost error of the context chain.
    pub fn root(&self) -> &Error {
        // `chain` always yields at least `self`
        self.chain().last().unwrap_or(self)
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }

    /// Builds an ad-hoc error from preformatted arguments.
    pub fn from_args(args: core::fmt::Arguments<'_>) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::new(args.to_string())))
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    CyclicViewDependency(CyclicViewDependency),
    IdentifierCollision(IdentifierCollision),
    InvalidMetadata(InvalidMetadata),
    MalformedFormula(MalformedFormula),
    MissingFieldReference(MissingFieldReference),
    UnsupportedFeature(UnsupportedFeature),
    UnsupportedFieldType(UnsupportedFieldType),
    UnsupportedFunction(UnsupportedFunction),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            CyclicViewDependency(err) => core::fmt::Display::fmt(err, f),
            IdentifierCollision(err) => core::fmt::Display::fmt(err, f),
            InvalidMetadata(err) => core::fmt::Display::fmt(err, f),
            MalformedFormula(err) => core::fmt::Display::fmt(err, f),
            MissingFieldReference(err) => core::fmt::Display::fmt(err, f),
            UnsupportedFeature(err) => core::fmt::Display::fmt(err, f),
            UnsupportedFieldType(err) => core::fmt::Display::fmt(err, f),
            UnsupportedFunction(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown knackpg error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::invalid_metadata(err.to_string())
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

impl IntoError for &str {
    fn into_error(self) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::new(self.to_string())))
    }
}

impl IntoError for String {
    fn into_error(self) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::new(self)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_size() {
        // Ensure Error stays at one word (size of pointer/Arc)
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn error_from_args() {
        let err = Error::from_args(format_args!("test error: {}", 42));
        assert_eq!(err.to_string(), "test error: 42");
    }

    #[test]
    fn error_chain_display() {
        let root = Error::unsupported_field_type("field_3", "hologram");
        let chained = root
            .context(err!("field `Projector`"))
            .context(err!("object `Rooms`"));

        assert_eq!(
            chained.to_string(),
            "object `Rooms`: field `Projector`: unsupported field type `hologram` (field `field_3`)"
        );
        assert!(chained.root().is_unsupported_field_type());
        assert!(!chained.is_unsupported_field_type());
    }

    #[test]
    fn context_on_shared_error_keeps_original() {
        let ctx = err!("while resolving");
        let shared = ctx.clone();

        let err = Error::malformed_formula("field_9", 4, "missing `)`").context(ctx);
        assert_eq!(
            err.to_string(),
            "while resolving: malformed formula in field `field_9` at offset 4: missing `)`"
        );
        assert_eq!(shared.to_string(), "while resolving");
    }

    #[test]
    fn anyhow_bridge() {
        let anyhow_err = anyhow::anyhow!("something failed");
        let our_err: Error = anyhow_err.into();
        assert_eq!(our_err.to_string(), "something failed");
    }

    #[test]
    fn serde_bridge_is_invalid_metadata() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(err.is_invalid_metadata());
    }

    #[test]
    fn missing_field_reference_names_both_sides() {
        let err = Error::missing_field_reference("field_12", "field_99");
        assert_eq!(
            err.to_string(),
            "missing field reference: `field_12` references unknown key `field_99`"
        );
        assert!(err.is_missing_field_reference());
    }

    #[test]
    fn cyclic_view_dependency_lists_members() {
        let err = Error::cyclic_view_dependency(vec!["a_view".into(), "b_view".into()]);
        assert_eq!(
            err.to_string(),
            "cyclic view dependency: a_view -> b_view -> a_view"
        );
    }

    #[test]
    fn identifier_collision() {
        let err = Error::identifier_collision("signals", "2-A", "2$A", "_2_a");
        assert_eq!(
            err.to_string(),
            "identifier collision in `signals`: `2-A` and `2$A` both sanitize to `_2_a`"
        );
    }
}
