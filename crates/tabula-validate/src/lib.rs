//! Schema validation and coercion for polars DataFrames.
//!
//! Declare what a table should look like (column names, element types,
//! nullability, predicate checks), then validate tables against it. A
//! pass returns the (possibly coerced) table; a failure returns one
//! aggregate error carrying every violation found, so a caller never has
//! to iterate fix-revalidate one violation at a time.
//!
//! ```
//! use polars::prelude::{df, ChunkCompareIneq, Series};
//! use tabula_model::{Check, DType};
//! use tabula_validate::{ColumnSchema, DataFrameSchema};
//!
//! let schema = DataFrameSchema::new([(
//!     "age",
//!     ColumnSchema::new(DType::Int64)
//!         .with_check(Check::new("non-negative", |s: &Series| Ok(s.gt(-1)?.into()))),
//! )])?;
//!
//! let frame = df! { "age" => [31i64, 52, 4] }?;
//! let validated = schema.validate(&frame)?;
//! assert_eq!(validated.height(), 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod coerce;
mod column;
mod engine;
mod schema;
mod util;

pub use column::ColumnSchema;
pub use schema::DataFrameSchema;

// The model crate's surface, re-exported so downstream code can depend on
// this crate alone.
pub use tabula_model::{Check, CheckOutcome, DType, Error, Result, SchemaError, TableCheck, Violation};
