//! The validation pipeline.
//!
//! One `validate` call runs, in order: the structural check (declared
//! columns present, strict-mode extras), the per-column pipeline
//! (coercion, dtype, nullability, checks) for each declared column in
//! declaration order, then table-level checks over the assembled output.
//! Violations accumulate across the whole pass and surface as one
//! aggregate error; only a broken check aborts early.

use polars::prelude::{BooleanChunked, Column, DataFrame, PolarsError, Series};
use tabula_model::{CheckOutcome, DType, Error, Result, SchemaError, Violation};
use tracing::debug;

use crate::coerce;
use crate::column::ColumnSchema;
use crate::schema::DataFrameSchema;

pub(crate) fn run(schema: &DataFrameSchema, df: &DataFrame) -> Result<DataFrame> {
    debug!(columns = schema.len(), height = df.height(), "validating table");

    let mut violations: Vec<Violation> = Vec::new();
    let table_names = df.get_column_names_owned();

    // Structural: every declared column must exist; in strict mode every
    // table column must be declared.
    for (name, _) in schema.columns() {
        if df.column(name).is_err() {
            violations.push(Violation::ColumnNotInData {
                column: name.to_string(),
            });
        }
    }
    if schema.is_strict() {
        for name in &table_names {
            if !schema.contains(name.as_str()) {
                violations.push(Violation::ColumnNotInSchema {
                    column: name.as_str().to_string(),
                });
            }
        }
    }

    // Per-column pipeline, in declaration order. Columns already reported
    // missing are skipped.
    let mut validated: Vec<Column> = Vec::with_capacity(df.width());
    for (name, spec) in schema.columns() {
        let Ok(column) = df.column(name) else {
            continue;
        };
        let series = column.as_materialized_series().clone();
        let series = validate_column(name, spec, series, schema.coerces(), &mut violations)?;
        validated.push(Column::from(series));
    }

    // Undeclared columns pass through unchanged, after the declared ones.
    for name in &table_names {
        if !schema.contains(name.as_str()) {
            validated.push(df.column(name.as_str())?.clone());
        }
    }
    let out = DataFrame::new(validated)?;

    // Table-level checks run once over the assembled table.
    for check in schema.checks() {
        let outcome = check.evaluate(&out).map_err(|source| Error::CheckRaised {
            column: None,
            check: check.name().to_string(),
            source,
        })?;
        record_outcome(outcome, None, check.name(), out.height(), None, &mut violations)?;
    }

    if violations.is_empty() {
        Ok(out)
    } else {
        debug!(violations = violations.len(), "validation failed");
        Err(SchemaError::new(violations, df.clone()).into())
    }
}

/// Coerce, then verify dtype, nullability, and checks for one column.
///
/// Returns the series that belongs in the output table: the coerced one
/// on success, the original when coercion or the dtype check ruled the
/// remaining steps meaningless for this column.
fn validate_column(
    name: &str,
    spec: &ColumnSchema,
    mut series: Series,
    table_coerce: bool,
    violations: &mut Vec<Violation>,
) -> Result<Series> {
    if spec.coerces() || table_coerce {
        match coerce::coerce_series(&series, spec.dtype()) {
            Ok(coerced) => series = coerced,
            Err(violation) => {
                violations.push(violation);
                return Ok(series);
            }
        }
    }

    match DType::try_from(series.dtype()) {
        Ok(actual) if actual == spec.dtype() => {}
        _ => {
            violations.push(Violation::WrongDType {
                column: name.to_string(),
                expected: spec.dtype(),
                actual: series.dtype().to_string(),
            });
            return Ok(series);
        }
    }

    let null_mask = series.is_null();
    if !spec.is_nullable() && series.null_count() > 0 {
        let rows: Vec<usize> = (0..series.len())
            .filter(|&idx| null_mask.get(idx) == Some(true))
            .collect();
        violations.push(Violation::UnexpectedNull {
            column: name.to_string(),
            rows,
        });
    }

    for check in spec.checks() {
        let outcome = check.evaluate(&series).map_err(|source| Error::CheckRaised {
            column: Some(name.to_string()),
            check: check.name().to_string(),
            source,
        })?;
        record_outcome(
            outcome,
            Some(name),
            check.name(),
            series.len(),
            Some(&null_mask),
            violations,
        )?;
    }

    Ok(series)
}

/// Resolve one check outcome into zero or one violation.
///
/// Elementwise verdicts are judged per row; rows that are null in the
/// source column are excluded (a check sees only the values that exist).
/// A length-1 mask counts as a broadcast scalar; any other length
/// mismatch means the check itself is malformed.
fn record_outcome(
    outcome: CheckOutcome,
    column: Option<&str>,
    check: &str,
    height: usize,
    exclude_nulls: Option<&BooleanChunked>,
    violations: &mut Vec<Violation>,
) -> Result<()> {
    match outcome {
        CheckOutcome::Scalar(true) => {}
        CheckOutcome::Scalar(false) => violations.push(Violation::CheckFailed {
            column: column.map(str::to_string),
            check: check.to_string(),
            rows: None,
        }),
        CheckOutcome::Elementwise(mask) => {
            if mask.len() == height {
                let failing: Vec<usize> = (0..height)
                    .filter(|&idx| {
                        let is_null =
                            exclude_nulls.is_some_and(|nulls| nulls.get(idx) == Some(true));
                        !is_null && mask.get(idx) != Some(true)
                    })
                    .collect();
                if !failing.is_empty() {
                    violations.push(Violation::CheckFailed {
                        column: column.map(str::to_string),
                        check: check.to_string(),
                        rows: Some(failing),
                    });
                }
            } else if mask.len() == 1 {
                if mask.get(0) != Some(true) {
                    violations.push(Violation::CheckFailed {
                        column: column.map(str::to_string),
                        check: check.to_string(),
                        rows: None,
                    });
                }
            } else {
                return Err(Error::CheckRaised {
                    column: column.map(str::to_string),
                    check: check.to_string(),
                    source: PolarsError::ComputeError(
                        format!(
                            "check returned {} verdicts for {} rows",
                            mask.len(),
                            height
                        )
                        .into(),
                    ),
                });
            }
        }
    }
    Ok(())
}
