//! Violations and errors.
//!
//! Two failure families exist and never mix. Data violations
//! ([`Violation`]) are collected across the whole validation pass and
//! surface together in one [`SchemaError`], so a caller sees the complete
//! set in a single round trip. Schema-definition problems and
//! malfunctioning checks are fatal [`Error`] variants that abort
//! immediately: they mean the schema or a check is broken, not that the
//! data is wrong.

use std::fmt;

use polars::error::PolarsError;
use polars::prelude::DataFrame;
use serde::Serialize;
use thiserror::Error;

use crate::dtype::DType;

/// One recorded violation of the schema by the data.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Violation {
    /// A declared column is absent from the table.
    ColumnNotInData { column: String },
    /// Strict mode only: a table column is not declared in the schema.
    ColumnNotInSchema { column: String },
    /// The column's dtype differs from the declared dtype. The actual
    /// dtype is reported in the collaborator's own spelling, since it may
    /// have no canonical equivalent.
    #[serde(rename = "wrong-dtype")]
    WrongDType {
        column: String,
        expected: DType,
        actual: String,
    },
    /// Coercion produced nulls from non-null values, or the cast itself
    /// was impossible (empty `rows`). `samples` holds up to five of the
    /// offending source values.
    CoercionFailed {
        column: String,
        dtype: DType,
        rows: Vec<usize>,
        samples: Vec<String>,
    },
    /// A non-nullable column contains nulls.
    UnexpectedNull { column: String, rows: Vec<usize> },
    /// A check failed. `rows` carries every failing row index for an
    /// elementwise outcome and is `None` for a scalar one; `column` is
    /// `None` for table-level checks.
    CheckFailed {
        column: Option<String>,
        check: String,
        rows: Option<Vec<usize>>,
    },
}

impl Violation {
    /// Column the violation concerns, if any. Table-level check failures
    /// have none.
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::ColumnNotInData { column }
            | Self::ColumnNotInSchema { column }
            | Self::WrongDType { column, .. }
            | Self::CoercionFailed { column, .. }
            | Self::UnexpectedNull { column, .. } => Some(column),
            Self::CheckFailed { column, .. } => column.as_deref(),
        }
    }

    /// Stable machine-readable code for the violation kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ColumnNotInData { .. } => "column-not-in-data",
            Self::ColumnNotInSchema { .. } => "column-not-in-schema",
            Self::WrongDType { .. } => "wrong-dtype",
            Self::CoercionFailed { .. } => "coercion-failed",
            Self::UnexpectedNull { .. } => "unexpected-null",
            Self::CheckFailed { .. } => "check-failed",
        }
    }

    /// Offending row indices, where the violation has row granularity.
    #[must_use]
    pub fn rows(&self) -> Option<&[usize]> {
        match self {
            Self::CoercionFailed { rows, .. } | Self::UnexpectedNull { rows, .. } => {
                Some(rows.as_slice())
            }
            Self::CheckFailed { rows, .. } => rows.as_deref(),
            _ => None,
        }
    }
}

/// Render up to ten row indices, eliding the rest by count.
fn format_rows(rows: &[usize]) -> String {
    const SHOWN: usize = 10;
    let shown: Vec<String> = rows.iter().take(SHOWN).map(|r| r.to_string()).collect();
    if rows.len() > SHOWN {
        format!("[{}, ... {} more]", shown.join(", "), rows.len() - SHOWN)
    } else {
        format!("[{}]", shown.join(", "))
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnNotInData { column } => {
                write!(f, "column `{column}` not found in table")
            }
            Self::ColumnNotInSchema { column } => {
                write!(f, "column `{column}` not declared in schema (strict mode)")
            }
            Self::WrongDType {
                column,
                expected,
                actual,
            } => {
                write!(f, "column `{column}` has dtype {actual}, expected {expected}")
            }
            Self::CoercionFailed {
                column,
                dtype,
                rows,
                samples,
            } => {
                if rows.is_empty() {
                    write!(f, "column `{column}` cannot be coerced to {dtype}")
                } else {
                    write!(
                        f,
                        "column `{column}` has {} value(s) not coercible to {dtype} at rows {}",
                        rows.len(),
                        format_rows(rows),
                    )?;
                    if !samples.is_empty() {
                        write!(f, " (e.g., {})", samples.join(", "))?;
                    }
                    Ok(())
                }
            }
            Self::UnexpectedNull { column, rows } => {
                write!(
                    f,
                    "non-nullable column `{column}` has {} null value(s) at rows {}",
                    rows.len(),
                    format_rows(rows),
                )
            }
            Self::CheckFailed {
                column,
                check,
                rows,
            } => {
                match column {
                    Some(column) => write!(f, "check `{check}` failed for column `{column}`")?,
                    None => write!(f, "table check `{check}` failed")?,
                }
                if let Some(rows) = rows {
                    write!(f, " at rows {}", format_rows(rows))?;
                }
                Ok(())
            }
        }
    }
}

/// Aggregate of every violation found in one validation pass.
///
/// Never empty. Carries a clone of the original input table for
/// diagnostics; polars columns are reference-counted, so the clone does
/// not copy data.
#[derive(Debug, Clone)]
pub struct SchemaError {
    violations: Vec<Violation>,
    data: DataFrame,
}

impl SchemaError {
    /// Build the aggregate. `violations` must not be empty.
    #[must_use]
    pub fn new(violations: Vec<Violation>, data: DataFrame) -> Self {
        debug_assert!(!violations.is_empty());
        Self { violations, data }
    }

    /// Every violation, in discovery order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Number of violations. At least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// The table that failed validation, as it was passed in.
    #[must_use]
    pub fn data(&self) -> &DataFrame {
        &self.data
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "schema validation failed with {} violation(s):", self.len())?;
        for violation in &self.violations {
            writeln!(f, "  - {violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A dtype spelling matched no canonical type or alias. Raised at
    /// schema construction or normalization time; never aggregated.
    #[error("unknown dtype `{0}`")]
    UnknownDType(String),
    /// The same column name was declared twice in one schema.
    #[error("duplicate column `{0}` in schema")]
    DuplicateColumn(String),
    /// A check predicate failed to evaluate. The check is broken; the data
    /// may well be fine. Aborts validation immediately.
    #[error("check `{check}` on `{}` raised: {source}", .column.as_deref().unwrap_or("<table>"))]
    CheckRaised {
        column: Option<String>,
        check: String,
        #[source]
        source: PolarsError,
    },
    /// The data violated the schema; every violation is inside.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// The columnar collaborator failed outside a check predicate.
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
