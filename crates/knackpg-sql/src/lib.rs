pub mod script;
pub use script::{Execute, Failure, Script};

pub mod serializer;
pub use serializer::Serializer;

pub mod stmt;
pub use stmt::Statement;
