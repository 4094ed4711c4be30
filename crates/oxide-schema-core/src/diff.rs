//! Structural diff between a desired table and its live columns.
//!
//! [`diff_table`] compares a [`TableSpec`] with the columns reported by
//! introspection and produces the column changes that bring the live table
//! in line. A primary key is only added when the live table has none and
//! every key column is new. Other changes that cannot be expressed safely as
//! an ALTER (primary key membership, dropping a unique index of unknown name)
//! are reported as [`DiffWarning`]s instead.

use std::collections::BTreeSet;

use crate::column::ColumnSpec;
use crate::context::SchemaContext;
use crate::dialect::Dialect;
use crate::error::{Result, SchemaError};
use crate::introspect::{normalize_type, LiveColumn};
use crate::table::TableSpec;
use crate::types::StorageCategory;
use crate::value::Parameter;

/// Minimum normalized similarity for a dropped and an added column of the
/// same type to be flagged as a possible rename.
const RENAME_SIMILARITY_THRESHOLD: f64 = 0.4;

// =============================================================================
// Public types
// =============================================================================

/// Where an added column is placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnPosition {
    /// Before every other column.
    First,
    /// Right after the named column.
    After(String),
}

/// A single column-level change, rendered as one ALTER TABLE specification.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnChange {
    /// `ADD COLUMN <definition> FIRST | AFTER <column>`.
    Add {
        /// The column to add.
        column: ColumnSpec,
        /// Placement within the table.
        position: ColumnPosition,
    },
    /// `DROP COLUMN <name>`.
    Drop {
        /// Name of the live column.
        name: String,
    },
    /// `MODIFY COLUMN <definition>`.
    Modify {
        /// The desired definition.
        column: ColumnSpec,
        /// The live column type being replaced.
        from_type: String,
    },
    /// `ADD PRIMARY KEY (<columns>)` on a table that has none.
    AddPrimaryKey {
        /// Key columns in declaration order.
        columns: Vec<String>,
    },
    /// `ADD UNIQUE INDEX <column>_UNIQUE (<column> ASC)`.
    AddUniqueIndex {
        /// Column name.
        column: String,
    },
}

/// A difference that is detected but not applied.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffWarning {
    /// A column's primary key membership changed.
    PrimaryKeyChange {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
        /// Desired primary key flag.
        new_value: bool,
    },
    /// A column lost its unique index.
    UniqueIndexChange {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
        /// Desired unique index flag.
        new_value: bool,
    },
    /// A dropped and an added column share a type and have similar names.
    PossibleRename {
        /// Table name.
        table: String,
        /// The column being dropped.
        old_column: String,
        /// The column being added.
        new_column: String,
        /// Name similarity score (0.0 to 1.0).
        similarity: f64,
    },
}

/// The changes needed to bring one live table in line with its specification.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDiff {
    /// Desired table name.
    pub table: String,
    /// Live name to rename from, when it differs from `table`.
    pub rename_from: Option<String>,
    /// Column changes in application order.
    pub changes: Vec<ColumnChange>,
    /// Differences that are reported but not applied.
    pub warnings: Vec<DiffWarning>,
}

impl TableDiff {
    /// Returns `true` if no statement needs to run. Warnings are ignored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rename_from.is_none() && self.changes.is_empty()
    }

    /// Renders the ALTER statements for this diff.
    ///
    /// Produces at most two statements: the rename, then a single
    /// ALTER TABLE carrying every column change. Fails with
    /// [`SchemaError::UnkeyedAutoIncrement`] when an added AUTO_INCREMENT
    /// column would end up outside every key.
    pub fn statements<D: Dialect + ?Sized>(
        &self,
        context: &SchemaContext,
        dialect: &D,
    ) -> Result<Vec<String>> {
        self.check_auto_increment_keys()?;

        let mut statements = Vec::with_capacity(2);
        if let Some(from) = &self.rename_from {
            statements.push(dialect.rename_table(context, from, &self.table));
        }
        if !self.changes.is_empty() {
            let specifications = self
                .changes
                .iter()
                .map(|change| dialect.alter_specification(change))
                .collect::<Result<Vec<_>>>()?;
            statements.push(dialect.alter_table(context, &self.table, &specifications));
        }
        Ok(statements)
    }

    fn check_auto_increment_keys(&self) -> Result<()> {
        let keyed: BTreeSet<String> = self
            .changes
            .iter()
            .flat_map(|change| match change {
                ColumnChange::AddPrimaryKey { columns } => columns.clone(),
                ColumnChange::AddUniqueIndex { column } => vec![column.clone()],
                _ => Vec::new(),
            })
            .map(|name| name.to_ascii_lowercase())
            .collect();

        let unkeyed = self.changes.iter().find_map(|change| match change {
            ColumnChange::Add { column, .. }
                if column.is_auto_increment()
                    && !keyed.contains(&column.name().to_ascii_lowercase()) =>
            {
                Some(column.name())
            }
            _ => None,
        });
        match unkeyed {
            Some(column) => Err(SchemaError::UnkeyedAutoIncrement {
                table: self.table.clone(),
                column: column.to_string(),
            }),
            None => Ok(()),
        }
    }
}

// =============================================================================
// Diff
// =============================================================================

/// Compares `desired` with the `live` columns of the table currently named
/// `previous` (or `desired.name()` when `None`).
#[must_use]
pub fn diff_table(desired: &TableSpec, live: &[LiveColumn], previous: Option<&str>) -> TableDiff {
    let table = desired.name().to_string();
    let rename_from = previous
        .filter(|p| *p != desired.name())
        .map(String::from);

    let find_live =
        |name: &str| live.iter().find(|c| c.name.eq_ignore_ascii_case(name));

    let live_has_key = live.iter().any(LiveColumn::is_primary_key);
    let key_columns: Vec<&ColumnSpec> = desired.primary_key();
    let add_key = !live_has_key
        && !key_columns.is_empty()
        && key_columns.iter().all(|c| find_live(c.name()).is_none());

    let mut added = Vec::new();
    let mut modified = Vec::new();
    let mut unique = Vec::new();
    let mut warnings = Vec::new();

    for (index, column) in desired.columns().iter().enumerate() {
        let Some(current) = find_live(column.name()) else {
            let position = if index == 0 {
                ColumnPosition::First
            } else {
                ColumnPosition::After(desired.columns()[index - 1].name().to_string())
            };
            added.push(ColumnChange::Add {
                column: column.clone(),
                position,
            });
            if column.is_primary_key() && !add_key {
                warnings.push(DiffWarning::PrimaryKeyChange {
                    table: table.clone(),
                    column: column.name().to_string(),
                    new_value: true,
                });
            }
            if column.has_unique_index() {
                unique.push(ColumnChange::AddUniqueIndex {
                    column: column.name().to_string(),
                });
            }
            continue;
        };

        if column_differs(column, current) {
            modified.push(ColumnChange::Modify {
                column: column.clone(),
                from_type: current.column_type.clone(),
            });
        }

        if column.is_primary_key() != current.is_primary_key() {
            warnings.push(DiffWarning::PrimaryKeyChange {
                table: table.clone(),
                column: column.name().to_string(),
                new_value: column.is_primary_key(),
            });
        }

        if column.has_unique_index() && !current.has_unique_index() && !current.is_primary_key() {
            unique.push(ColumnChange::AddUniqueIndex {
                column: column.name().to_string(),
            });
        } else if !column.has_unique_index() && current.has_unique_index() {
            warnings.push(DiffWarning::UniqueIndexChange {
                table: table.clone(),
                column: column.name().to_string(),
                new_value: false,
            });
        }
    }

    let desired_names: BTreeSet<String> = desired
        .columns()
        .iter()
        .map(|c| c.name().to_ascii_lowercase())
        .collect();
    let dropped: Vec<&LiveColumn> = live
        .iter()
        .filter(|c| !desired_names.contains(&c.name.to_ascii_lowercase()))
        .collect();

    warnings.extend(possible_renames(&table, &dropped, &added));

    let mut changes = added;
    if add_key {
        changes.push(ColumnChange::AddPrimaryKey {
            columns: key_columns.iter().map(|c| c.name().to_string()).collect(),
        });
    }
    changes.append(&mut modified);
    changes.append(&mut unique);
    changes.extend(dropped.into_iter().map(|c| ColumnChange::Drop {
        name: c.name.clone(),
    }));

    TableDiff {
        table,
        rename_from,
        changes,
        warnings,
    }
}

fn column_differs(desired: &ColumnSpec, live: &LiveColumn) -> bool {
    let desired_nullable = desired.is_nullable() && !desired.is_primary_key();
    normalize_type(&expected_live_type(desired)) != live.normalized_type()
        || desired_nullable != live.nullable
        || desired.is_auto_increment() != live.is_auto_increment()
}

fn possible_renames(
    table: &str,
    dropped: &[&LiveColumn],
    added: &[ColumnChange],
) -> Vec<DiffWarning> {
    let mut warnings = Vec::new();
    for change in added {
        let ColumnChange::Add { column, .. } = change else {
            continue;
        };
        let expected = normalize_type(&expected_live_type(column));
        let best = dropped
            .iter()
            .filter(|d| d.normalized_type() == expected)
            .map(|d| (d, similarity(&d.name, column.name())))
            .filter(|(_, score)| *score >= RENAME_SIMILARITY_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((old, score)) = best {
            warnings.push(DiffWarning::PossibleRename {
                table: table.to_string(),
                old_column: old.name.clone(),
                new_column: column.name().to_string(),
                similarity: score,
            });
        }
    }
    warnings
}

/// Returns the column type MySQL reports for a column rendered from `column`.
#[must_use]
pub fn expected_live_type(column: &ColumnSpec) -> String {
    let data_type = column.data_type();
    let length = match column.parameter_value() {
        Some(Parameter::Length(length)) => Some(*length),
        _ => data_type.default_parameter(),
    };

    let base = match data_type.category() {
        StorageCategory::Integer { bits } => match bits {
            8 => "tinyint".to_string(),
            16 => "smallint".to_string(),
            24 => "mediumint".to_string(),
            32 => "int".to_string(),
            _ => "bigint".to_string(),
        },
        StorageCategory::FloatingPoint => match (data_type.name(), length) {
            ("FLOAT", Some(precision)) if precision > 24 => "double".to_string(),
            ("FLOAT", _) => "float".to_string(),
            _ => "double".to_string(),
        },
        StorageCategory::Boolean => "tinyint(1)".to_string(),
        StorageCategory::Bit => format!("bit({})", length.unwrap_or(1)),
        StorageCategory::TemporalDate => "date".to_string(),
        StorageCategory::TemporalDateTime | StorageCategory::TemporalTime => match length {
            Some(fsp) if fsp > 0 => format!("{}({fsp})", data_type.name().to_ascii_lowercase()),
            _ => data_type.name().to_ascii_lowercase(),
        },
        StorageCategory::VariableString if data_type.default_parameter().is_some() => {
            format!(
                "{}({})",
                data_type.name().to_ascii_lowercase(),
                length.unwrap_or_default()
            )
        }
        StorageCategory::VariableString => data_type.name().to_ascii_lowercase(),
        StorageCategory::Enum | StorageCategory::Set => {
            let values = match column.parameter_value() {
                Some(Parameter::Values(values)) => values
                    .iter()
                    .map(|v| format!("'{}'", v.replace('\'', "''")))
                    .collect::<Vec<_>>()
                    .join(","),
                _ => String::new(),
            };
            format!("{}({values})", data_type.name().to_ascii_lowercase())
        }
    };

    if column.has_zero_fill() {
        format!("{base} unsigned zerofill")
    } else if column.is_unsigned() {
        format!("{base} unsigned")
    } else {
        base
    }
}

// =============================================================================
// String similarity helpers
// =============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Similarity in `[0.0, 1.0]`, 1.0 meaning identical names.
#[allow(clippy::cast_precision_loss)]
fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_ascii_lowercase();
    let b = b.to_ascii_lowercase();
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - (levenshtein(&a, &b) as f64 / max_len as f64)
}
