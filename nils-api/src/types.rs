//! Data types for NILS API responses.
//!
//! NILS records are passthrough: the client enforces no invariants of its
//! own and ignores fields it does not know about. Every record carries the
//! same audit block ([`RecordMeta`]), flattened into each entity. Wire
//! naming is camelCase except where noted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The authenticated user, returned by the login endpoint.
///
/// The login payload mixes snake_case and camelCase field names; renames
/// below follow the wire format exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Internal user record ID.
    pub id: String,
    /// Login user ID (distinct from `id` on most installations).
    #[serde(default)]
    pub user_id: Option<String>,
    /// Roles as a single comma-joined string (legacy field).
    #[serde(default)]
    pub user_roles: Option<String>,
    /// Login email address.
    pub email: String,
    /// First name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Whether the account is active.
    #[serde(default)]
    pub active: bool,
    /// UI language code.
    #[serde(default)]
    pub language: Option<String>,
    /// Whether the account has admin rights.
    #[serde(default)]
    pub admin: bool,
    /// Home company code.
    #[serde(default)]
    pub company: Option<String>,
    /// Roles as a list (modern field).
    #[serde(default, rename = "userRoles")]
    pub roles: Vec<String>,
    /// Companies the user may act for.
    #[serde(default, rename = "userCompany")]
    pub companies: Vec<String>,
}

/// Audit block shared by every NILS record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    #[serde(default)]
    pub prefix_object_key: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub object_type: Option<String>,
    #[serde(default)]
    pub object_key: Option<String>,
    #[serde(default)]
    pub change_log_comment: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub created_date: Option<i64>,
    #[serde(default)]
    pub modified_by: Option<String>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub modified_date: Option<i64>,
    #[serde(default)]
    pub created_by_name: Option<String>,
    #[serde(default)]
    pub modified_by_name: Option<String>,
    /// Number on most records, string on type values.
    #[serde(default)]
    pub created_date_field: Option<Value>,
    #[serde(default)]
    pub modified_date_field: Option<Value>,
    #[serde(default)]
    pub created_mode: Option<String>,
    #[serde(default)]
    pub modified_mode: Option<String>,
    #[serde(default)]
    pub record_index: Option<i64>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub background_update: bool,
    #[serde(default, rename = "RowId")]
    pub row_id: Option<String>,
}

/// A physical or administrative location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(flatten)]
    pub meta: RecordMeta,
    #[serde(default)]
    pub location_code: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// UN/LOCODE, when mapped.
    #[serde(default)]
    pub unlocation: Option<String>,
    #[serde(default)]
    pub activation_status: Option<String>,
}

/// Top level of the G1–G4 geographic code hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct G1Code {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub g1_code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub company_code: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub activation_status: Option<String>,
}

/// Second level of the geographic code hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct G2Code {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub g2_code: String,
    #[serde(default)]
    pub g1_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub company_code: Option<String>,
    #[serde(default)]
    pub activation_status: Option<String>,
}

/// Third level of the geographic code hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct G3Code {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub g3_code: String,
    #[serde(default)]
    pub g2_code: Option<String>,
    #[serde(default)]
    pub g1_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub company_code: Option<String>,
    #[serde(default)]
    pub activation_status: Option<String>,
}

/// Leaf level of the geographic code hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct G4Code {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub g4_code: String,
    #[serde(default)]
    pub g3_code: Option<String>,
    #[serde(default)]
    pub g2_code: Option<String>,
    #[serde(default)]
    pub g1_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub company_code: Option<String>,
    #[serde(default)]
    pub unlocation: Option<String>,
    #[serde(default)]
    pub associated_g4: Option<String>,
    #[serde(default)]
    pub cfsync_status: Option<String>,
    #[serde(default)]
    pub activation_status: Option<String>,
}

/// A commodity code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commodity {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub commodity_code: String,
    #[serde(default)]
    pub commodity_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub activation_status: Option<String>,
}

/// An activity code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub activity_code: String,
    #[serde(default)]
    pub activity_name: Option<String>,
    #[serde(default)]
    pub activation_status: Option<String>,
}

/// A reference-data type (code table).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Type {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub type_id: String,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub type_values: Option<String>,
    #[serde(default)]
    pub type_values_count: i64,
    #[serde(default)]
    pub adjustable: Option<String>,
}

/// One value inside a reference-data type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeValue {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub type_value_id: String,
    #[serde(default)]
    pub type_id: Option<String>,
    #[serde(default)]
    pub type_value: Option<String>,
    #[serde(default)]
    pub activation_status: Option<String>,
    #[serde(default)]
    pub sort_key: i64,
    #[serde(default)]
    pub adjustable: Option<String>,
    #[serde(default)]
    pub type_name: Option<String>,
}

/// A type together with its values, as returned by the type endpoints.
///
/// `type` is absent when a lookup by name matches nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeGroup {
    #[serde(default, rename = "type")]
    pub type_def: Option<Type>,
    #[serde(default)]
    pub type_values: Option<Vec<TypeValue>>,
    #[serde(default)]
    pub total_count: i64,
}

/// A job cost line.
///
/// The cost-line row schema varies per NILS installation and screen
/// configuration, so rows are exposed as raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CostLine(pub Value);

/// Paginated list envelope (DataTables server-side protocol).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub draw: i64,
    #[serde(default)]
    pub records_total: i64,
    #[serde(default)]
    pub records_filtered: i64,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub search_query: Option<String>,
    #[serde(default)]
    pub filter_queries: Option<Vec<String>>,
    #[serde(default)]
    pub extra_query: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<T>>,
}

/// Optional epoch-millisecond bounds for the sync triggers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl DateRange {
    /// Range bounded on both sides.
    pub fn between(from: i64, to: i64) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub(crate) fn query(self) -> Vec<(&'static str, String)> {
        let mut q = Vec::new();
        if let Some(from) = self.from {
            q.push(("fromDate", from.to_string()));
        }
        if let Some(to) = self.to {
            q.push(("toDate", to.to_string()));
        }
        q
    }
}

/// Mode parameter of the tank-allocation endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AllocationMode {
    /// Dry-run an allocation.
    #[default]
    ValidateAllocation,
    /// Dry-run a reservation.
    ValidateReservation,
    Allocate,
    Reserve,
    UnReserve,
    Deallocate,
}

impl AllocationMode {
    /// The literal `mode` query value NILS expects.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ValidateAllocation => "ValidateAllocation",
            Self::ValidateReservation => "ValidateReservation",
            Self::Allocate => "Allocate",
            Self::Reserve => "Reserve",
            Self::UnReserve => "UnReserve",
            Self::Deallocate => "Deallocate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_tolerates_sparse_envelopes() {
        let page: Page<Location> = serde_json::from_str(
            r#"{
                "draw": 1,
                "recordsTotal": 2,
                "recordsFiltered": 2,
                "data": [
                    {"id": "L1", "locationCode": "NLRTM", "unlocation": "NLRTM"},
                    {"id": "L2", "locationName": "Moerdijk"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(page.records_total, 2);
        let data = page.data.unwrap();
        assert_eq!(data[0].location_code.as_deref(), Some("NLRTM"));
        assert_eq!(data[0].meta.id.as_deref(), Some("L1"));
        assert_eq!(data[1].location_name.as_deref(), Some("Moerdijk"));
    }

    #[test]
    fn user_deserializes_mixed_case_fields() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "user_id": "SA_TPT",
            "email": "sa@example.com",
            "full_name": "Service Account",
            "active": true,
            "admin": false,
            "userRoles": ["PLANNER"],
            "userCompany": ["GTC"]
        }))
        .unwrap();
        assert_eq!(user.roles, vec!["PLANNER"]);
        assert_eq!(user.companies, vec!["GTC"]);
        assert_eq!(user.full_name.as_deref(), Some("Service Account"));
    }

    #[test]
    fn type_group_tolerates_missing_type() {
        let group: TypeGroup =
            serde_json::from_value(json!({"typeValues": null, "totalCount": 0})).unwrap();
        assert!(group.type_def.is_none());
        assert_eq!(group.total_count, 0);
    }

    #[test]
    fn date_range_query_pairs() {
        assert!(DateRange::default().query().is_empty());
        let q = DateRange::between(1_656_453_600_000, 1_659_045_600_000).query();
        assert_eq!(
            q,
            vec![
                ("fromDate", "1656453600000".to_string()),
                ("toDate", "1659045600000".to_string()),
            ]
        );
    }

    #[test]
    fn allocation_mode_wire_values() {
        assert_eq!(AllocationMode::default().as_str(), "ValidateAllocation");
        assert_eq!(AllocationMode::UnReserve.as_str(), "UnReserve");
    }
}
