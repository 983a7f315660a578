mod error;
pub use error::Error;

pub mod schema;

pub mod value;
pub use value::Value;

/// A Result type alias that uses Recast's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
