mod error;
pub use error::{Error, IntoError};

pub mod catalog;
pub use catalog::CatalogEntry;

mod compiled;
pub use compiled::{CompiledSchema, Diagnostic, Severity, Unit};

pub mod formula;

pub mod schema;
pub use schema::{Builder, Name};

pub mod view;
pub use view::View;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Compiles application metadata with the default configuration.
pub fn compile(raw: &schema::raw::RawSchema) -> Result<CompiledSchema> {
    Builder::new().build(raw)
}
