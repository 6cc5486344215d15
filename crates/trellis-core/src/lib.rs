mod error;
pub use error::Error;

pub mod driver;
pub use driver::Store;

pub mod schema;
pub use schema::{EntityMeta, PropertyMeta};

pub mod value;
pub use value::Value;

/// A Result type alias that uses Trellis' [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
