//! Pull the resource-unit columns out of a change notification

use rucfg_errors::{DispatchError, Error};
use rucfg_types::{ConfigChangeParams, StatementKind};
use tracing::warn;

/// Columns of one resource-unit row
///
/// `name` and `value` are empty when the row did not carry them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFields<'a> {
    pub cluster: &'a str,
    pub tenant: &'a str,
    pub name: &'a str,
    pub value: &'a str,
    pub stmt_kind: StatementKind,
}

/// Read cluster, tenant, statement kind and the `name`/`value` fields
///
/// Field keys match case-insensitively; a repeated key keeps its last
/// value and unknown keys are skipped.
///
/// # Errors
///
/// Returns `DispatchError::InvalidArgument` if `params` is absent, if the
/// cluster or tenant is empty, or if the field list is absent.
pub fn extract(params: Option<&ConfigChangeParams>) -> Result<ExtractedFields<'_>, Error> {
    let Some(params) = params else {
        warn!("params is absent");
        return Err(DispatchError::invalid_argument("params is absent").into());
    };

    let cluster = params.cluster_name.as_str();
    let tenant = params.tenant_name.as_str();
    if cluster.is_empty() || tenant.is_empty() {
        warn!(cluster, tenant, "tenant or cluster is empty");
        return Err(DispatchError::invalid_argument("tenant or cluster is empty").into());
    }

    let Some(fields) = params.fields.as_ref() else {
        warn!(cluster, tenant, "fields are absent");
        return Err(DispatchError::invalid_argument("fields are absent").into());
    };

    // Storage format is [cluster|tenant|name|value]
    let mut name = "";
    let mut value = "";
    for field in fields {
        if field.column_name.eq_ignore_ascii_case("name") {
            name = field.column_value.as_str();
        } else if field.column_name.eq_ignore_ascii_case("value") {
            value = field.column_value.as_str();
        }
    }

    Ok(ExtractedFields {
        cluster,
        tenant,
        name,
        value,
        stmt_kind: params.stmt_kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(result: Result<ExtractedFields<'_>, Error>) {
        assert!(matches!(
            result,
            Err(Error::Dispatch(DispatchError::InvalidArgument { .. }))
        ));
    }

    #[test]
    fn test_extracts_name_and_value() {
        let params = ConfigChangeParams::new("c1", "t1", StatementKind::Replace)
            .with_field("cluster", "ignored")
            .with_field("Name", "resource_cpu")
            .with_field("VALUE", "2");
        let fields = extract(Some(&params)).unwrap();
        assert_eq!(fields.cluster, "c1");
        assert_eq!(fields.tenant, "t1");
        assert_eq!(fields.name, "resource_cpu");
        assert_eq!(fields.value, "2");
        assert_eq!(fields.stmt_kind, StatementKind::Replace);
    }

    #[test]
    fn test_last_duplicate_wins() {
        let params = ConfigChangeParams::new("c1", "t1", StatementKind::Replace)
            .with_field("name", "resource_cpu")
            .with_field("name", "resource_max_connections");
        let fields = extract(Some(&params)).unwrap();
        assert_eq!(fields.name, "resource_max_connections");
        assert_eq!(fields.value, "");
    }

    #[test]
    fn test_missing_inputs() {
        assert_invalid(extract(None));

        for kind in [StatementKind::Replace, StatementKind::Delete, StatementKind::Select] {
            assert_invalid(extract(Some(&ConfigChangeParams::new("", "t1", kind))));
            assert_invalid(extract(Some(&ConfigChangeParams::new("c1", "", kind))));
        }

        let params = ConfigChangeParams::new("c1", "t1", StatementKind::Delete).without_fields();
        assert_invalid(extract(Some(&params)));
    }

    #[test]
    fn test_empty_field_list_is_valid() {
        let params = ConfigChangeParams::new("c1", "t1", StatementKind::Delete);
        let fields = extract(Some(&params)).unwrap();
        assert!(fields.name.is_empty());
        assert!(fields.value.is_empty());
    }
}
