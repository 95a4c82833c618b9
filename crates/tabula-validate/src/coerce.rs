//! Type coercion with validation of the cast result.
//!
//! Coercion uses the collaborator's non-strict cast, which maps values it
//! cannot convert to null. Any null that was not already present in the
//! source is therefore a coercion failure and must be reported, never
//! accepted: a silently nulled value would sail through every downstream
//! check.

use polars::prelude::{AnyValue, Series};
use tabula_model::{DType, Violation};
use tracing::debug;

use crate::util::any_to_string;

const MAX_SAMPLES: usize = 5;

/// Cast `series` to `dtype`, auditing the result.
///
/// Returns the coerced series, or a [`Violation::CoercionFailed`] naming
/// every row the cast nulled out (empty `rows` when the cast itself was
/// impossible). The input series is untouched either way.
pub(crate) fn coerce_series(series: &Series, dtype: DType) -> Result<Series, Violation> {
    let target = dtype.to_polars();
    let column = series.name().to_string();

    let coerced = match series.cast(&target) {
        Ok(coerced) => coerced,
        Err(err) => {
            debug!(column = %column, %err, "cast rejected");
            return Err(Violation::CoercionFailed {
                column,
                dtype,
                rows: Vec::new(),
                samples: Vec::new(),
            });
        }
    };

    let was_null = series.is_null();
    let now_null = coerced.is_null();
    let mut rows = Vec::new();
    let mut samples = Vec::new();
    for idx in 0..series.len() {
        if now_null.get(idx) == Some(true) && was_null.get(idx) != Some(true) {
            rows.push(idx);
            if samples.len() < MAX_SAMPLES {
                samples.push(any_to_string(series.get(idx).unwrap_or(AnyValue::Null)));
            }
        }
    }

    if rows.is_empty() {
        Ok(coerced)
    } else {
        Err(Violation::CoercionFailed {
            column,
            dtype,
            rows,
            samples,
        })
    }
}
