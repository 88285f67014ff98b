//! Parameter and result records for the NarrativeService operations.
//!
//! Records are plain serde types passed through the RPC layer untouched.
//! Optional fields are skipped entirely when absent, so a round trip through
//! the wire is lossless. Flag-like fields follow the platform convention of
//! `0`/`1` integers rather than JSON booleans. Workspace and object info
//! blobs produced upstream are heterogeneous tuples and stay
//! [`serde_json::Value`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filters for [`list_objects_with_sets`](crate::NarrativeServiceClient::list_objects_with_sets).
///
/// Exactly one of `ws_name`, `ws_id` or `workspaces` selects the scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListObjectsWithSetsParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ws_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ws_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspaces: Option<Vec<String>>,
    /// Restrict the listing to these object types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    /// `1` to include object metadata in each entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_metadata: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListObjectsWithSetsOutput {
    #[serde(default)]
    pub data: Vec<ObjectListItem>,
    /// Workspace name to data-palette reference, for entries that live in a
    /// palette rather than the workspace itself.
    #[serde(default)]
    pub data_palette_refs: HashMap<String, String>,
}

/// One listed object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectListItem {
    /// Raw object info tuple as produced by the workspace layer.
    #[serde(default)]
    pub object_info: Value,
    /// Data-palette placement detail, when the object came from a palette.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dp_info: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CopyNarrativeParams {
    /// Name of the workspace holding the narrative to copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_id: Option<i64>,
    /// Name for the copy; defaults to a server-chosen name when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CopyNarrativeOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_workspace_id: Option<i64>,
    pub new_narrative_id: i64,
}

/// Seed content for a fresh narrative. All fields are optional; an empty
/// record creates a blank narrative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateNewNarrativeParams {
    /// App to pre-populate the first cell with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    /// Method to pre-populate the first cell with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_param: Option<String>,
    /// Markdown for an initial text cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    /// Reference of an object to copy into the new workspace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_data: Option<Vec<String>>,
    /// `1` to prepend the standard introduction cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_intro_cell: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateNewNarrativeOutput {
    /// Raw workspace info tuple for the created workspace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_info: Option<Value>,
    /// Raw object info tuple for the created narrative object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_info: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CopyObjectParams {
    /// Reference of the object to copy, `ws/obj/ver` style.
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub object_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_ws_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_ws_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CopyObjectOutput {
    /// Raw object info tuple for the copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListAvailableTypesParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspaces: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListAvailableTypesOutput {
    /// Object type name to the number of instances visible in scope.
    #[serde(default)]
    pub type_stats: HashMap<String, i64>,
}

/// No filters exist for the narratorial listing yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListNarratorialParams {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NarratorialList {
    #[serde(default)]
    pub narratorials: Vec<Narratorial>,
}

/// A narrative that has been promoted to a publicly browsable tutorial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Narratorial {
    /// Raw workspace info tuple.
    #[serde(default)]
    pub ws: Value,
    /// Raw object info tuple of the narrative object.
    #[serde(default)]
    pub nar: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListNarrativeParams {
    /// `mine`, `public` or `shared`; absent means everything visible.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub narrative_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NarrativeList {
    #[serde(default)]
    pub narratives: Vec<NarrativeEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NarrativeEntry {
    /// Raw workspace info tuple.
    #[serde(default)]
    pub ws: Value,
    /// Raw object info tuple of the narrative object.
    #[serde(default)]
    pub nar: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetNarratorialParams {
    /// Workspace name or numeric id, as a string either way.
    pub ws: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Acknowledgement record; carries no fields in the current service
/// revision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetNarratorialResult {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoveNarratorialParams {
    /// Workspace name or numeric id, as a string either way.
    pub ws: String,
}

/// Acknowledgement record; carries no fields in the current service
/// revision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoveNarratorialResult {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindObjectReportParams {
    /// Permanent address (`ws/obj/ver`) of the object whose report to find.
    pub upa: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindObjectReportOutput {
    /// Addresses of reports referencing the object, empty when none exist.
    #[serde(default)]
    pub report_upas: Vec<String>,
    /// Set when the search continued from the copy source; address of the
    /// object the reports actually reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_upa: Option<String>,
    /// `1` when the object was a copy whose source is not accessible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_inaccessible: Option<i64>,
    /// Set when the search failed in a way the service chose to report
    /// inline rather than as a call failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
