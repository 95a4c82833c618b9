//! Dtype scenarios: every numeric family, categorical coercion, and
//! datetime checks.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use polars::prelude::*;
use tabula_validate::{
    Check, CheckOutcome, ColumnSchema, DataFrameSchema, DType, Error, SchemaError,
};

fn frame(series: Series) -> DataFrame {
    DataFrame::new(vec![series.into()]).unwrap()
}

fn schema_for(column: ColumnSchema) -> DataFrameSchema {
    DataFrameSchema::new([("col", column)]).unwrap()
}

fn expect_schema_err(err: Error) -> SchemaError {
    match err {
        Error::Schema(err) => err,
        other => panic!("expected aggregated schema error, got {other}"),
    }
}

#[test]
fn every_integer_width_validates() {
    // Values chosen to fit the narrowest width under test.
    let signed = Series::new("col".into(), [-100i64, -4, -32, 0, 1, 77, 5, 123]);
    for dtype in [DType::Int8, DType::Int16, DType::Int32, DType::Int64] {
        let df = frame(signed.cast(&dtype.to_polars()).unwrap());
        // Schema declared from the enum and from its string spelling must
        // behave identically.
        for schema in [
            schema_for(ColumnSchema::new(dtype)),
            schema_for(ColumnSchema::parse(dtype.name()).unwrap()),
        ] {
            let validated = schema.validate(&df).unwrap();
            assert!(validated.equals(&df));
        }
    }

    let unsigned = Series::new("col".into(), [1i64, 777, 5, 123, 9000]);
    for dtype in [DType::UInt8, DType::UInt16, DType::UInt32, DType::UInt64] {
        let values = if dtype == DType::UInt8 {
            Series::new("col".into(), [1i64, 77, 5, 123, 250])
        } else {
            unsigned.clone()
        };
        let df = frame(values.cast(&dtype.to_polars()).unwrap());
        for schema in [
            schema_for(ColumnSchema::new(dtype)),
            schema_for(ColumnSchema::parse(dtype.name()).unwrap()),
        ] {
            let validated = schema.validate(&df).unwrap();
            assert!(validated.equals(&df));
        }
    }
}

#[test]
fn every_float_width_validates() {
    let floats = Series::new("col".into(), [-123.1f64, -7654.321, 1.0, 1.1, 1199.51, 5.1]);
    for dtype in [DType::Float32, DType::Float64] {
        let df = frame(floats.cast(&dtype.to_polars()).unwrap());
        for schema in [
            schema_for(ColumnSchema::new(dtype)),
            schema_for(ColumnSchema::parse(dtype.name()).unwrap()),
        ] {
            let validated = schema.validate(&df).unwrap();
            assert!(validated.equals(&df));
        }
    }
}

#[test]
fn widthless_aliases_accept_the_default_width() {
    let df = frame(Series::new("col".into(), [1i64, 2, 3]));
    let schema = schema_for(ColumnSchema::parse("int").unwrap());
    assert!(schema.validate(&df).is_ok());

    let df = frame(Series::new("col".into(), [1.5f64, 2.5]));
    let schema = schema_for(ColumnSchema::parse("float").unwrap());
    assert!(schema.validate(&df).is_ok());
}

#[test]
fn bool_and_string_validate() {
    let df = frame(Series::new("col".into(), [true, false, true]));
    assert!(schema_for(ColumnSchema::new(DType::Bool)).validate(&df).is_ok());

    let df = frame(Series::new("col".into(), ["a", "b"]));
    assert!(
        schema_for(ColumnSchema::parse("object").unwrap())
            .validate(&df)
            .is_ok()
    );
}

/// Scalar check: the set of observed values is exactly {A, B, C}.
fn set_is_abc() -> Check {
    Check::new("set-is-abc", |s: &Series| {
        let strings = s.cast(&DataType::String)?;
        let observed: BTreeSet<String> = strings
            .str()?
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();
        let expected: BTreeSet<String> =
            ["A", "B", "C"].iter().map(|v| (*v).to_string()).collect();
        Ok(CheckOutcome::Scalar(observed == expected))
    })
}

/// Elementwise check: every value is one of A, B, C.
fn each_in_abc() -> Check {
    Check::new("each-in-abc", |s: &Series| {
        let strings = s.cast(&DataType::String)?;
        let mask: BooleanChunked = strings
            .str()?
            .into_iter()
            .map(|value| value.map(|value| matches!(value, "A" | "B" | "C")))
            .collect();
        Ok(mask.into())
    })
}

#[test]
fn categorical_column_validates_with_checks() {
    let series = Series::new("col".into(), ["A", "B", "A", "B", "C"])
        .cast(&DType::Categorical.to_polars())
        .unwrap();
    let schema = schema_for(
        ColumnSchema::new(DType::Categorical)
            .with_check(set_is_abc())
            .with_check(each_in_abc()),
    );
    assert!(schema.validate(&frame(series)).is_ok());
}

#[test]
fn categorical_without_coercion_rejects_string_input() {
    // Same data, but left as a plain string column: dtype mismatch.
    let df = frame(Series::new("col".into(), ["A", "B", "A", "B", "C"]));
    let schema = schema_for(ColumnSchema::new(DType::Categorical).with_check(set_is_abc()));

    let err = expect_schema_err(schema.validate(&df).unwrap_err());
    assert_eq!(err.len(), 1);
    assert_eq!(err.violations()[0].code(), "wrong-dtype");
}

#[test]
fn categorical_coercion_infers_observed_categories() {
    let df = frame(Series::new("col".into(), ["A", "B", "A", "B", "C"]));
    let schema = schema_for(
        ColumnSchema::new(DType::Categorical)
            .coerce(true)
            .with_check(set_is_abc()),
    );

    let validated = schema.validate(&df).unwrap();
    let col = validated.column("col").unwrap();
    assert!(col.dtype().is_categorical());

    // Membership after coercion: values are exactly the observed set.
    let strings = col
        .as_materialized_series()
        .cast(&DataType::String)
        .unwrap();
    let observed: BTreeSet<String> = strings
        .str()
        .unwrap()
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();
    let expected: BTreeSet<String> = ["A", "B", "C"].iter().map(|v| (*v).to_string()).collect();
    assert_eq!(observed, expected);
}

fn datetime_series(days: &[(i32, u32, u32)]) -> Series {
    let values: Vec<_> = days
        .iter()
        .map(|&(y, m, d)| {
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        })
        .collect();
    Series::new("col".into(), values)
}

/// Scalar check: the column minimum is after 2015-01-01.
fn min_after_2015() -> Check {
    Check::new("min-after-2015", |s: &Series| {
        let datetimes = s.datetime()?;
        let cutoff = NaiveDate::from_ymd_opt(2015, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc();
        let cutoff = match datetimes.time_unit() {
            TimeUnit::Nanoseconds => cutoff.timestamp_nanos_opt().unwrap(),
            TimeUnit::Microseconds => cutoff.timestamp_micros(),
            TimeUnit::Milliseconds => cutoff.timestamp_millis(),
        };
        Ok(CheckOutcome::Scalar(
            datetimes.phys.min().is_some_and(|min| min > cutoff),
        ))
    })
}

#[test]
fn datetime_min_check_passes_on_recent_dates() {
    let df = frame(datetime_series(&[(2019, 1, 1), (2018, 5, 21), (2016, 3, 10)]));
    let schema = schema_for(ColumnSchema::new(DType::Datetime).with_check(min_after_2015()));
    assert!(schema.validate(&df).is_ok());
}

#[test]
fn datetime_min_check_failure_names_the_check() {
    let df = frame(datetime_series(&[(2010, 1, 1)]));
    let schema = schema_for(ColumnSchema::new(DType::Datetime).with_check(min_after_2015()));

    let err = expect_schema_err(schema.validate(&df).unwrap_err());
    assert_eq!(err.len(), 1);
    match &err.violations()[0] {
        tabula_validate::Violation::CheckFailed { check, column, .. } => {
            assert_eq!(check, "min-after-2015");
            assert_eq!(column.as_deref(), Some("col"));
        }
        other => panic!("expected CheckFailed, got {other:?}"),
    }
}

#[test]
fn duration_column_validates() {
    let series = Series::new("col".into(), [1_000_000i64, 2_000_000])
        .cast(&DType::Duration.to_polars())
        .unwrap();
    let schema = schema_for(ColumnSchema::parse("timedelta64[ns]").unwrap());
    assert!(schema.validate(&frame(series)).is_ok());
}

#[test]
fn datetime_strings_coerce_to_datetime() {
    let df = frame(Series::new(
        "col".into(),
        ["2019-01-01T12:30:00", "2018-05-21T08:00:00"],
    ));
    let schema = schema_for(ColumnSchema::new(DType::Datetime).coerce(true));
    let validated = schema.validate(&df).unwrap();
    assert_eq!(
        DType::try_from(validated.column("col").unwrap().dtype()).unwrap(),
        DType::Datetime
    );
}

#[test]
fn unparseable_datetime_strings_fail_coercion() {
    let df = frame(Series::new(
        "col".into(),
        ["2019-01-01T12:30:00", "not-a-date"],
    ));
    let schema = schema_for(ColumnSchema::new(DType::Datetime).coerce(true));

    let err = expect_schema_err(schema.validate(&df).unwrap_err());
    assert_eq!(err.violations()[0].code(), "coercion-failed");
}
