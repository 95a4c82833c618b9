//! Canonical element types and normalization of loose dtype spellings.
//!
//! A schema can name a dtype three ways: as a [`DType`] value, as a string
//! alias (`"int64"`, `"float"`, `"category"`, ...), or as a native polars
//! [`DataType`] tag. Every spelling funnels through one normalization path
//! and comparisons only ever happen between canonical values.
//!
//! Width-less aliases resolve to fixed widths of this registry, never to a
//! platform default: `"int"` is [`DType::Int64`], `"uint"` is
//! [`DType::UInt64`], `"float"` is [`DType::Float64`].

use std::fmt;
use std::str::FromStr;

use polars::prelude::{Categories, DataType, TimeUnit};
use serde::Serialize;

use crate::error::Error;

/// Canonical element type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    /// UTF-8 string. Also covers the `"object"` spelling: the collaborator
    /// type system has no generic object column.
    String,
    /// Dictionary-encoded strings with categories inferred from the data.
    Categorical,
    Date,
    /// Timestamp. Any polars time unit or timezone normalizes here.
    Datetime,
    /// Elapsed time. Any polars time unit normalizes here.
    Duration,
}

impl DType {
    /// Normalize a string spelling to its canonical type.
    ///
    /// Accepts the canonical lowercase names plus the alias spellings of
    /// the pandas lineage (`"object"`, `"category"`, `"datetime64[ns]"`,
    /// `"timedelta64[ns]"`). Matching is case-insensitive.
    pub fn normalize(spec: &str) -> Result<Self, Error> {
        let key = spec.trim().to_ascii_lowercase();
        let dtype = match key.as_str() {
            "bool" | "boolean" => Self::Bool,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" => Self::Int32,
            "int64" | "int" => Self::Int64,
            "uint8" => Self::UInt8,
            "uint16" => Self::UInt16,
            "uint32" => Self::UInt32,
            "uint64" | "uint" => Self::UInt64,
            "float32" => Self::Float32,
            "float64" | "float" | "double" => Self::Float64,
            "str" | "string" | "utf8" | "object" => Self::String,
            "category" | "categorical" => Self::Categorical,
            "date" => Self::Date,
            "datetime" | "datetime64" | "datetime64[ms]" | "datetime64[us]"
            | "datetime64[ns]" => Self::Datetime,
            "duration" | "timedelta" | "timedelta64" | "timedelta64[ms]"
            | "timedelta64[us]" | "timedelta64[ns]" => Self::Duration,
            _ => return Err(Error::UnknownDType(spec.to_string())),
        };
        Ok(dtype)
    }

    /// The canonical polars representation of this type.
    ///
    /// Datetime and duration map to microsecond precision, naive.
    #[must_use]
    pub fn to_polars(&self) -> DataType {
        match self {
            Self::Bool => DataType::Boolean,
            Self::Int8 => DataType::Int8,
            Self::Int16 => DataType::Int16,
            Self::Int32 => DataType::Int32,
            Self::Int64 => DataType::Int64,
            Self::UInt8 => DataType::UInt8,
            Self::UInt16 => DataType::UInt16,
            Self::UInt32 => DataType::UInt32,
            Self::UInt64 => DataType::UInt64,
            Self::Float32 => DataType::Float32,
            Self::Float64 => DataType::Float64,
            Self::String => DataType::String,
            Self::Categorical => DataType::from_categories(Categories::global()),
            Self::Date => DataType::Date,
            Self::Datetime => DataType::Datetime(TimeUnit::Microseconds, None),
            Self::Duration => DataType::Duration(TimeUnit::Microseconds),
        }
    }

    /// Canonical lowercase name, as used in messages and serialized output.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::String => "string",
            Self::Categorical => "category",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Duration => "duration",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}

impl TryFrom<&DataType> for DType {
    type Error = Error;

    /// Normalize a native polars tag. Time units and timezones do not
    /// participate in equality; `Enum` columns count as categorical.
    fn try_from(dtype: &DataType) -> Result<Self, Error> {
        match dtype {
            DataType::Boolean => Ok(Self::Bool),
            DataType::Int8 => Ok(Self::Int8),
            DataType::Int16 => Ok(Self::Int16),
            DataType::Int32 => Ok(Self::Int32),
            DataType::Int64 => Ok(Self::Int64),
            DataType::UInt8 => Ok(Self::UInt8),
            DataType::UInt16 => Ok(Self::UInt16),
            DataType::UInt32 => Ok(Self::UInt32),
            DataType::UInt64 => Ok(Self::UInt64),
            DataType::Float32 => Ok(Self::Float32),
            DataType::Float64 => Ok(Self::Float64),
            DataType::String => Ok(Self::String),
            DataType::Categorical(..) | DataType::Enum(..) => Ok(Self::Categorical),
            DataType::Date => Ok(Self::Date),
            DataType::Datetime(..) => Ok(Self::Datetime),
            DataType::Duration(..) => Ok(Self::Duration),
            other => Err(Error::UnknownDType(other.to_string())),
        }
    }
}
