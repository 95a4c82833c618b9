//! Core types for tabular schema validation.
//!
//! This crate holds the pieces a schema is made of, independent of the
//! validation engine: the canonical [`DType`] registry with normalization
//! of loose spellings, named predicate [`Check`]s with an explicit
//! scalar-vs-elementwise outcome, and the error model ([`Violation`],
//! [`SchemaError`], [`Error`]). The engine lives in `tabula-validate`.

pub mod check;
pub mod dtype;
pub mod error;

pub use check::{Check, CheckOutcome, TableCheck};
pub use dtype::DType;
pub use error::{Error, Result, SchemaError, Violation};
