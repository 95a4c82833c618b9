//! Per-column specification.

use tabula_model::{Check, DType, Result};

/// Expected shape of one column: dtype, nullability, coercion, and an
/// ordered list of checks.
///
/// Built once, immutable during validation:
///
/// ```
/// use tabula_model::{Check, DType};
/// use tabula_validate::ColumnSchema;
/// use polars::prelude::Series;
///
/// let column = ColumnSchema::new(DType::Int64)
///     .nullable(true)
///     .with_check(Check::scalar("non-empty", |s: &Series| !s.is_empty()));
/// assert_eq!(column.dtype(), DType::Int64);
/// ```
#[derive(Debug, Clone)]
pub struct ColumnSchema {
    dtype: DType,
    nullable: bool,
    coerce: bool,
    checks: Vec<Check>,
}

impl ColumnSchema {
    /// A column of the given dtype: non-nullable, not coerced, no checks.
    #[must_use]
    pub fn new(dtype: DType) -> Self {
        Self {
            dtype,
            nullable: false,
            coerce: false,
            checks: Vec::new(),
        }
    }

    /// Like [`ColumnSchema::new`], with the dtype given as a loose
    /// spelling (`"int64"`, `"float"`, `"category"`, ...).
    pub fn parse(spec: &str) -> Result<Self> {
        Ok(Self::new(DType::normalize(spec)?))
    }

    /// Whether null values are acceptable. Default `false`.
    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Whether to cast the column to the declared dtype before
    /// validating. Default `false`; the schema-wide flag ORs in.
    #[must_use]
    pub fn coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }

    /// Append a check. Checks run in the order they were added.
    #[must_use]
    pub fn with_check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    /// Append several checks, preserving order.
    #[must_use]
    pub fn with_checks(mut self, checks: impl IntoIterator<Item = Check>) -> Self {
        self.checks.extend(checks);
        self
    }

    /// Declared element type.
    #[must_use]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub fn coerces(&self) -> bool {
        self.coerce
    }

    /// Checks in declared order.
    #[must_use]
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }
}
