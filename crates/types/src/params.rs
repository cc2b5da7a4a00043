//! Change notification bundle handed to config-table callbacks

use rucfg_errors::DispatchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of statement that produced a config-table change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    Select,
    Insert,
    /// Upsert of a single row
    Replace,
    Update,
    Delete,
}

impl StatementKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Replace => "replace",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementKind {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "select" => Ok(Self::Select),
            "insert" => Ok(Self::Insert),
            "replace" => Ok(Self::Replace),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(DispatchError::not_supported(format!(
                "unknown statement kind: {s}"
            ))),
        }
    }
}

/// One `(column, value)` pair extracted from a config-table statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlField {
    pub column_name: String,
    pub column_value: String,
}

impl SqlField {
    #[must_use]
    pub fn new(column_name: impl Into<String>, column_value: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            column_value: column_value.into(),
        }
    }
}

/// Ordered list of fields, in the order the statement listed them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqlFieldResult {
    fields: Vec<SqlField>,
}

impl SqlFieldResult {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: SqlField) {
        self.fields.push(field);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SqlField> {
        self.fields.iter()
    }
}

impl FromIterator<SqlField> for SqlFieldResult {
    fn from_iter<I: IntoIterator<Item = SqlField>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SqlFieldResult {
    type Item = &'a SqlField;
    type IntoIter = std::slice::Iter<'a, SqlField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Parameters of a single config-table change notification
///
/// The framework builds one of these per row change and hands the same
/// (or an equivalent) bundle to both the execute and the commit phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigChangeParams {
    pub cluster_name: String,
    pub tenant_name: String,
    pub stmt_kind: StatementKind,
    /// `None` when the statement carried no field list at all
    pub fields: Option<SqlFieldResult>,
}

impl ConfigChangeParams {
    /// Create a bundle with an empty field list
    #[must_use]
    pub fn new(
        cluster_name: impl Into<String>,
        tenant_name: impl Into<String>,
        stmt_kind: StatementKind,
    ) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            tenant_name: tenant_name.into(),
            stmt_kind,
            fields: Some(SqlFieldResult::new()),
        }
    }

    /// Append a field, creating the field list if it was absent
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields
            .get_or_insert_with(SqlFieldResult::new)
            .push(SqlField::new(name, value));
        self
    }

    /// Drop the field list entirely
    #[must_use]
    pub fn without_fields(mut self) -> Self {
        self.fields = None;
        self
    }
}
