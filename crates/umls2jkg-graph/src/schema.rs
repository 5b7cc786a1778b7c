//! Serde types of the JKG (JSON Knowledge Graph) interchange schema.
//!
//! The output document is one JSON object with two arrays:
//!
//! ```json
//! {
//!   "nodes": [ { "labels": [...], "properties": { "id": ... } }, ... ],
//!   "rels":  [ { "label": ..., "start": ..., "end": ..., "properties": ... }, ... ]
//! }
//! ```
//!
//! Nodes and relationships are the two concrete element shapes; modeling
//! them as typed structs (rather than free-form maps) pins the field set
//! and the serialized field order at compile time. Properties that do not
//! apply to a node kind are skipped, not serialized as null.

use serde::{Deserialize, Serialize};

/// One element of the `nodes` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JkgNodeV1 {
    pub labels: Vec<String>,
    pub properties: NodePropertiesV1,
}

/// Union of the property sets carried by Source, Node_Label, Rel_Label,
/// and Concept nodes. `id` is always present; the rest varies by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePropertiesV1 {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub def: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pref_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sab: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub srl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttyl: Option<Vec<String>>,
}

/// One element of the `rels` array. `start` references the object (CUI2)
/// and `end` the subject (CUI1) of the underlying relational record; the
/// reversal is the output schema's convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JkgRelV1 {
    pub label: String,
    pub start: JkgEndpointV1,
    pub end: JkgEndpointV1,
    pub properties: RelPropertiesV1,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JkgEndpointV1 {
    pub properties: EndpointPropertiesV1,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointPropertiesV1 {
    pub id: String,
}

impl JkgEndpointV1 {
    pub fn new(id: String) -> Self {
        Self {
            properties: EndpointPropertiesV1 { id },
        }
    }
}

impl JkgRelV1 {
    /// Build an edge; `start_id` is the object-side id, `end_id` the
    /// subject-side id.
    pub fn new(label: String, start_id: String, end_id: String, sab: String) -> Self {
        Self {
            label,
            start: JkgEndpointV1::new(start_id),
            end: JkgEndpointV1::new(end_id),
            properties: RelPropertiesV1 { sab },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelPropertiesV1 {
    pub sab: String,
}
