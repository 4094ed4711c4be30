//! Catalog of SQL data types and their capabilities.
//!
//! Every type a column can use is one of the constants below. The capability
//! flags on a [`DataType`] decide which modifiers (`UNSIGNED`, `ZEROFILL`,
//! `AUTO_INCREMENT`) a column of that type may carry, and its
//! [`StorageCategory`] decides how parameters and default values are rendered.

use std::fmt;

/// The semantic family of a data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageCategory {
    /// Whole numbers stored in `bits` bits.
    Integer {
        /// Storage width in bits.
        bits: u8,
    },
    /// Single or double precision floating point.
    FloatingPoint,
    /// True or false.
    Boolean,
    /// Calendar date.
    TemporalDate,
    /// Date and time of day.
    TemporalDateTime,
    /// Time of day.
    TemporalTime,
    /// Character data.
    VariableString,
    /// One value out of a fixed list.
    Enum,
    /// Any subset of a fixed list.
    Set,
    /// Bit field.
    Bit,
}

impl StorageCategory {
    /// Returns `true` for integer and floating point categories.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer { .. } | Self::FloatingPoint)
    }

    /// Returns `true` for ENUM and SET, which take a value list.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::Enum | Self::Set)
    }

    /// Returns `true` if a `(n)` length, width or precision may follow the type name.
    #[must_use]
    pub const fn accepts_length(self) -> bool {
        matches!(
            self,
            Self::Integer { .. }
                | Self::FloatingPoint
                | Self::TemporalDateTime
                | Self::TemporalTime
                | Self::VariableString
                | Self::Bit
        )
    }

    /// Describes the default value representation this category accepts.
    #[must_use]
    pub const fn expected_default(self) -> &'static str {
        match self {
            Self::Integer { .. } => "an integer",
            Self::FloatingPoint => "a number",
            Self::Boolean => "a boolean",
            Self::TemporalDate => "a date",
            Self::TemporalDateTime => "a date and time",
            Self::TemporalTime => "a time of day",
            Self::VariableString | Self::Enum => "a string",
            Self::Set => "a list of strings",
            Self::Bit => "a non-negative integer or boolean",
        }
    }
}

/// Immutable descriptor of a SQL data type.
///
/// Two descriptors are equal only when every field matches, so `INT` and
/// `INTEGER` are distinct types even though both are 32-bit integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataType {
    name: &'static str,
    category: StorageCategory,
    max_length: Option<u64>,
    supports_unsigned: bool,
    supports_zero_fill: bool,
    supports_auto_increment: bool,
    accepts_length: bool,
    default_parameter: Option<u64>,
}

impl DataType {
    const fn integer(name: &'static str, bits: u8) -> Self {
        Self {
            name,
            category: StorageCategory::Integer { bits },
            max_length: Some(255),
            supports_unsigned: true,
            supports_zero_fill: true,
            supports_auto_increment: true,
            accepts_length: true,
            default_parameter: None,
        }
    }

    const fn floating(name: &'static str) -> Self {
        Self {
            name,
            category: StorageCategory::FloatingPoint,
            max_length: Some(53),
            supports_unsigned: true,
            supports_zero_fill: true,
            supports_auto_increment: true,
            accepts_length: true,
            default_parameter: None,
        }
    }

    const fn plain(name: &'static str, category: StorageCategory, max_length: Option<u64>) -> Self {
        Self {
            name,
            category,
            max_length,
            supports_unsigned: false,
            supports_zero_fill: false,
            supports_auto_increment: false,
            accepts_length: category.accepts_length(),
            default_parameter: None,
        }
    }

    const fn without_length(mut self) -> Self {
        self.accepts_length = false;
        self.max_length = None;
        self
    }

    const fn with_default_parameter(mut self, parameter: u64) -> Self {
        self.default_parameter = Some(parameter);
        self
    }

    /// Returns the canonical SQL type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the storage category.
    #[must_use]
    pub const fn category(&self) -> StorageCategory {
        self.category
    }

    /// Returns whether a single length parameter may follow the type name.
    #[must_use]
    pub const fn accepts_length(&self) -> bool {
        self.accepts_length
    }

    /// Returns the largest length parameter the type accepts, if bounded.
    #[must_use]
    pub const fn max_length(&self) -> Option<u64> {
        self.max_length
    }

    /// Returns whether columns of this type may be `UNSIGNED`.
    #[must_use]
    pub const fn supports_unsigned(&self) -> bool {
        self.supports_unsigned
    }

    /// Returns whether columns of this type may be `ZEROFILL`.
    #[must_use]
    pub const fn supports_zero_fill(&self) -> bool {
        self.supports_zero_fill
    }

    /// Returns whether columns of this type may be `AUTO_INCREMENT`.
    #[must_use]
    pub const fn supports_auto_increment(&self) -> bool {
        self.supports_auto_increment
    }

    /// Returns the length rendered when a column sets none.
    #[must_use]
    pub const fn default_parameter(&self) -> Option<u64> {
        self.default_parameter
    }

    /// Looks up a catalog type by name, ignoring ASCII case.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        let name = name.trim();
        ALL.iter().find(|t| t.name.eq_ignore_ascii_case(name)).copied()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Smallest and largest signed value of an integer of `bits` bits.
#[must_use]
pub const fn signed_range(bits: u8) -> (i64, i64) {
    if bits >= 64 {
        (i64::MIN, i64::MAX)
    } else {
        let half = 1_i64 << (bits - 1);
        (-half, half - 1)
    }
}

/// Largest unsigned value of an integer of `bits` bits.
#[must_use]
pub const fn unsigned_max(bits: u8) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1_u64 << bits) - 1
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// 8-bit integer: -128 to 127, or 0 to 255 when `UNSIGNED`.
pub const TINYINT: DataType = DataType::integer("TINYINT", 8);

/// 16-bit integer: -32768 to 32767, or 0 to 65535 when `UNSIGNED`.
pub const SMALLINT: DataType = DataType::integer("SMALLINT", 16);

/// 24-bit integer: -8388608 to 8388607, or 0 to 16777215 when `UNSIGNED`.
pub const MEDIUMINT: DataType = DataType::integer("MEDIUMINT", 24);

/// 32-bit integer.
pub const INT: DataType = DataType::integer("INT", 32);

/// 32-bit integer, spelled `INTEGER`.
pub const INTEGER: DataType = DataType::integer("INTEGER", 32);

/// 64-bit integer.
pub const BIGINT: DataType = DataType::integer("BIGINT", 64);

/// Single precision floating point.
pub const FLOAT: DataType = DataType::floating("FLOAT");

/// Double precision floating point. MySQL only takes `DOUBLE(M,D)`, so no
/// single length is accepted.
pub const DOUBLE: DataType = DataType::floating("DOUBLE").without_length();

/// Boolean.
pub const BOOLEAN: DataType = DataType::plain("BOOLEAN", StorageCategory::Boolean, None);

/// Boolean, spelled `BOOL`.
pub const BOOL: DataType = DataType::plain("BOOL", StorageCategory::Boolean, None);

/// Bit field of up to 64 bits.
pub const BIT: DataType = DataType::plain("BIT", StorageCategory::Bit, Some(64));

/// Year, month and day.
pub const DATE: DataType = DataType::plain("DATE", StorageCategory::TemporalDate, None);

/// Date and time of day; the length parameter is the fractional seconds precision.
pub const DATETIME: DataType =
    DataType::plain("DATETIME", StorageCategory::TemporalDateTime, Some(6));

/// Date and time of day stored as UTC.
pub const TIMESTAMP: DataType =
    DataType::plain("TIMESTAMP", StorageCategory::TemporalDateTime, Some(6));

/// Time of day.
pub const TIME: DataType = DataType::plain("TIME", StorageCategory::TemporalTime, Some(6));

/// Variable-length string, 255 characters unless a length is given.
pub const VARCHAR: DataType =
    DataType::plain("VARCHAR", StorageCategory::VariableString, Some(65_535))
        .with_default_parameter(255);

/// Text of up to 64 KiB.
pub const TEXT: DataType = DataType::plain("TEXT", StorageCategory::VariableString, Some(65_535));

/// Text of up to 16 MiB.
pub const MEDIUMTEXT: DataType =
    DataType::plain("MEDIUMTEXT", StorageCategory::VariableString, Some(16_777_215));

/// Text of up to 4 GiB.
pub const LONGTEXT: DataType =
    DataType::plain("LONGTEXT", StorageCategory::VariableString, Some(4_294_967_295));

/// One value out of a declared list.
pub const ENUM: DataType = DataType::plain("ENUM", StorageCategory::Enum, None);

/// Any combination of values from a declared list.
pub const SET: DataType = DataType::plain("SET", StorageCategory::Set, None);

/// Every type in the catalog.
pub const ALL: &[DataType] = &[
    TINYINT, SMALLINT, MEDIUMINT, INT, INTEGER, BIGINT, FLOAT, DOUBLE, BOOLEAN, BOOL, BIT, DATE,
    DATETIME, TIMESTAMP, TIME, VARCHAR, TEXT, MEDIUMTEXT, LONGTEXT, ENUM, SET,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_capabilities() {
        for ty in [TINYINT, SMALLINT, MEDIUMINT, INT, INTEGER, BIGINT] {
            assert!(ty.supports_unsigned(), "{ty}");
            assert!(ty.supports_zero_fill(), "{ty}");
            assert!(ty.supports_auto_increment(), "{ty}");
            assert!(ty.category().is_numeric());
        }
    }

    #[test]
    fn test_non_numeric_types_reject_modifiers() {
        for ty in [BOOLEAN, BOOL, BIT, DATE, DATETIME, TIMESTAMP, TIME, VARCHAR, TEXT, ENUM, SET] {
            assert!(!ty.supports_unsigned(), "{ty}");
            assert!(!ty.supports_zero_fill(), "{ty}");
            assert!(!ty.supports_auto_increment(), "{ty}");
        }
    }

    #[test]
    fn test_equality_uses_all_fields() {
        assert_eq!(INT, INT);
        assert_ne!(INT, INTEGER);
        assert_ne!(BOOLEAN, BOOL);
        assert_eq!(INT.category(), INTEGER.category());
    }

    #[test]
    fn test_lookup() {
        assert_eq!(DataType::lookup("varchar"), Some(VARCHAR));
        assert_eq!(DataType::lookup(" MediumText "), Some(MEDIUMTEXT));
        assert_eq!(DataType::lookup("JSONB"), None);
        assert_eq!(ALL.len(), 21);
    }

    #[test]
    fn test_integer_ranges() {
        assert_eq!(signed_range(8), (-128, 127));
        assert_eq!(signed_range(24), (-8_388_608, 8_388_607));
        assert_eq!(signed_range(64), (i64::MIN, i64::MAX));
        assert_eq!(unsigned_max(16), 65_535);
        assert_eq!(unsigned_max(64), u64::MAX);
    }

    #[test]
    fn test_varchar_default_parameter() {
        assert_eq!(VARCHAR.default_parameter(), Some(255));
        assert_eq!(TEXT.default_parameter(), None);
    }

    #[test]
    fn test_length_support() {
        assert!(FLOAT.accepts_length());
        assert!(!DOUBLE.accepts_length());
        assert_eq!(DOUBLE.max_length(), None);
        assert!(VARCHAR.accepts_length());
        assert!(!DATE.accepts_length());
    }
}
