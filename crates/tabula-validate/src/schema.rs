//! Table-level schema: ordered columns plus table-wide flags and checks.

use std::collections::HashSet;

use polars::prelude::DataFrame;
use tabula_model::{Error, Result, TableCheck};

use crate::column::ColumnSchema;
use crate::engine;

/// Declarative specification of a table: which columns it has, their
/// [`ColumnSchema`]s, and table-wide behavior.
///
/// Column order is declaration order and is reproduced in the validated
/// output. A schema is immutable once built and can be shared freely
/// across threads and reused across any number of [`validate`] calls.
///
/// [`validate`]: DataFrameSchema::validate
#[derive(Debug, Clone)]
pub struct DataFrameSchema {
    columns: Vec<(String, ColumnSchema)>,
    coerce: bool,
    strict: bool,
    checks: Vec<TableCheck>,
}

impl DataFrameSchema {
    /// Build a schema from `(name, column)` pairs, preserving order.
    ///
    /// Fails with [`Error::DuplicateColumn`] if a name repeats.
    pub fn new<N>(columns: impl IntoIterator<Item = (N, ColumnSchema)>) -> Result<Self>
    where
        N: Into<String>,
    {
        let columns: Vec<(String, ColumnSchema)> = columns
            .into_iter()
            .map(|(name, column)| (name.into(), column))
            .collect();

        let mut seen = HashSet::new();
        for (name, _) in &columns {
            if !seen.insert(name.as_str()) {
                return Err(Error::DuplicateColumn(name.clone()));
            }
        }

        Ok(Self {
            columns,
            coerce: false,
            strict: false,
            checks: Vec::new(),
        })
    }

    /// Table-wide coercion default. Columns that set their own flag OR
    /// with this. Default `false`.
    #[must_use]
    pub fn coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }

    /// Reject table columns not declared in the schema. Default `false`.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Append a table-level check. Table checks run after every column
    /// has been through the per-column pipeline.
    #[must_use]
    pub fn with_check(mut self, check: TableCheck) -> Self {
        self.checks.push(check);
        self
    }

    /// Declared columns, in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &ColumnSchema)> {
        self.columns
            .iter()
            .map(|(name, column)| (name.as_str(), column))
    }

    /// Look up one declared column.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns
            .iter()
            .find(|(declared, _)| declared == name)
            .map(|(_, column)| column)
    }

    /// Whether `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of declared columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub fn coerces(&self) -> bool {
        self.coerce
    }

    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Table-level checks in declared order.
    #[must_use]
    pub fn checks(&self) -> &[TableCheck] {
        &self.checks
    }

    /// Validate a table against this schema.
    ///
    /// Returns the validated table: coerced columns where coercion ran,
    /// declared columns first in schema order, undeclared columns passed
    /// through unchanged after them. On failure returns
    /// [`Error::Schema`] carrying every violation found in the pass; the
    /// input table is never modified.
    pub fn validate(&self, df: &DataFrame) -> Result<DataFrame> {
        engine::run(self, df)
    }
}
