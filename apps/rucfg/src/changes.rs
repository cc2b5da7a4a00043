//! Change-file records replayed by `rucfg apply`

use crate::error::CliError;
use rucfg_types::{ConfigChangeParams, SqlField, SqlFieldResult, StatementKind};
use serde::Deserialize;
use std::path::Path;

/// One resource_unit row change as written in a change file
///
/// ```json
/// {"cluster": "c1", "tenant": "t1", "kind": "replace",
///  "fields": [["name", "resource_cpu"], ["value", "2"]], "commit": true}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeRecord {
    pub cluster: String,
    pub tenant: String,
    pub kind: StatementKind,
    /// Ordered `(column, value)` pairs; omitted means no field list at all
    #[serde(default)]
    pub fields: Option<Vec<(String, String)>>,
    /// Outcome of the surrounding transaction; `false` rolls the change back
    #[serde(default = "default_commit")]
    pub commit: bool,
}

fn default_commit() -> bool {
    true
}

impl ChangeRecord {
    /// Build the bundle the config-table framework hands to callbacks
    pub fn to_params(&self) -> ConfigChangeParams {
        ConfigChangeParams {
            cluster_name: self.cluster.clone(),
            tenant_name: self.tenant.clone(),
            stmt_kind: self.kind,
            fields: self.fields.as_ref().map(|fields| {
                fields
                    .iter()
                    .map(|(column, value)| SqlField::new(column, value))
                    .collect::<SqlFieldResult>()
            }),
        }
    }
}

/// Parse a JSON array of change records
pub fn parse_changes(contents: &str) -> Result<Vec<ChangeRecord>, CliError> {
    Ok(serde_json::from_str(contents)?)
}

/// Read and parse a change file
pub async fn load_changes(path: &Path) -> Result<Vec<ChangeRecord>, CliError> {
    let contents = tokio::fs::read_to_string(path).await?;
    parse_changes(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_record_defaults() {
        let records = parse_changes(
            r#"[{"cluster": "c1", "tenant": "t1", "kind": "delete"}]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].commit);
        assert!(records[0].to_params().fields.is_none());
    }

    #[test]
    fn test_fields_keep_order() {
        let records = parse_changes(
            r#"[{"cluster": "c1", "tenant": "t1", "kind": "replace",
                 "fields": [["value", "2"], ["name", "resource_cpu"]], "commit": false}]"#,
        )
        .unwrap();
        let params = records[0].to_params();
        let columns: Vec<_> = params
            .fields
            .unwrap()
            .iter()
            .map(|f| f.column_name.clone())
            .collect();
        assert_eq!(columns, ["value", "name"]);
        assert!(!records[0].commit);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result = parse_changes(r#"[{"cluster": "c1", "tenant": "t1", "kind": "merge"}]"#);
        assert!(matches!(result, Err(CliError::InvalidChanges(_))));
    }

    #[tokio::test]
    async fn test_load_changes_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"cluster": "c1", "tenant": "t1", "kind": "replace",
                 "fields": [["name", "resource_max_connections"], ["value", "10"]]}}]"#
        )
        .unwrap();
        let records = load_changes(file.path()).await.unwrap();
        assert_eq!(records[0].kind, StatementKind::Replace);
    }
}
