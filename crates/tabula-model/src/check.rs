//! Named predicate checks over columns and tables.
//!
//! A check pairs a name (for error messages) with a predicate. The
//! predicate either judges its input as a whole or produces one verdict
//! per row; the two shapes are distinguished explicitly by
//! [`CheckOutcome`] rather than inspected at the call site.

use std::fmt;
use std::sync::Arc;

use polars::prelude::{BooleanChunked, DataFrame, PolarsResult, Series};

/// Result shape of one check evaluation.
#[derive(Debug, Clone)]
pub enum CheckOutcome {
    /// Single pass/fail verdict for the whole column or table.
    Scalar(bool),
    /// One verdict per row.
    Elementwise(BooleanChunked),
}

impl From<bool> for CheckOutcome {
    fn from(passed: bool) -> Self {
        Self::Scalar(passed)
    }
}

impl From<BooleanChunked> for CheckOutcome {
    fn from(mask: BooleanChunked) -> Self {
        Self::Elementwise(mask)
    }
}

impl From<Vec<bool>> for CheckOutcome {
    fn from(mask: Vec<bool>) -> Self {
        Self::Elementwise(mask.into_iter().map(Some).collect())
    }
}

type Predicate<T> = dyn Fn(&T) -> PolarsResult<CheckOutcome> + Send + Sync;

/// A named, stateless predicate over a column (`Check<Series>`, the
/// default) or a whole table ([`TableCheck`]).
///
/// Checks never mutate what they inspect. An `Err` from the predicate
/// means the check itself is broken and aborts validation; it is never
/// recorded as a data violation.
pub struct Check<T = Series> {
    name: String,
    predicate: Arc<Predicate<T>>,
}

/// A check evaluated against the whole table.
pub type TableCheck = Check<DataFrame>;

impl<T> Check<T> {
    /// Create a check from a fallible predicate.
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> PolarsResult<CheckOutcome> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Create a check from an infallible whole-input predicate.
    pub fn scalar<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::new(name, move |value: &T| Ok(predicate(value).into()))
    }

    /// Create a check from an infallible per-row predicate.
    pub fn elementwise<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> BooleanChunked + Send + Sync + 'static,
    {
        Self::new(name, move |value: &T| Ok(predicate(value).into()))
    }

    /// Name used when reporting a failure of this check.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the predicate.
    pub fn evaluate(&self, value: &T) -> PolarsResult<CheckOutcome> {
        (self.predicate)(value)
    }
}

impl<T> Clone for Check<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T> fmt::Debug for Check<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
