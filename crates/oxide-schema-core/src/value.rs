//! Typed default values and column parameters.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// A column default as supplied by the caller.
///
/// The value is stored as given and checked against the column's storage
/// category only when the column is rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// Signed integer.
    Signed(i64),
    /// Unsigned integer.
    Unsigned(u64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time of day.
    DateTime(NaiveDateTime),
    /// Time of day.
    Time(NaiveTime),
    /// Text.
    Text(String),
    /// List of strings, used by SET columns.
    List(Vec<String>),
}

impl DefaultValue {
    /// Short description of the representation, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Signed(_) => "signed integer",
            Self::Unsigned(_) => "unsigned integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "boolean",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Time(_) => "time",
            Self::Text(_) => "string",
            Self::List(_) => "string list",
        }
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for DefaultValue {
            fn from(value: $t) -> Self {
                Self::Signed(i64::from(value))
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for DefaultValue {
            fn from(value: $t) -> Self {
                Self::Unsigned(u64::from(value))
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<f32> for DefaultValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for DefaultValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for DefaultValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<DateTime<Utc>> for DefaultValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value.naive_utc())
    }
}

impl From<NaiveTime> for DefaultValue {
    fn from(value: NaiveTime) -> Self {
        Self::Time(value)
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for DefaultValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for DefaultValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(String::from).collect())
    }
}

/// A type parameter: a length/precision or an ENUM/SET value list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    /// Length, display width or precision rendered as `TYPE(n)`.
    Length(u64),
    /// Allowed values rendered as `TYPE('a','b')`.
    Values(Vec<String>),
}

impl From<u64> for Parameter {
    fn from(value: u64) -> Self {
        Self::Length(value)
    }
}

impl From<u32> for Parameter {
    fn from(value: u32) -> Self {
        Self::Length(u64::from(value))
    }
}

impl From<Vec<String>> for Parameter {
    fn from(value: Vec<String>) -> Self {
        Self::Values(value)
    }
}

impl From<Vec<&str>> for Parameter {
    fn from(value: Vec<&str>) -> Self {
        Self::Values(value.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Parameter {
    fn from(value: [&str; N]) -> Self {
        Self::Values(value.iter().map(|v| (*v).to_string()).collect())
    }
}
