//! JKG graph assembly from ingested UMLS tables.
//!
//! This crate turns the filtered relational tables produced by
//! `umls2jkg-tables` into the node and relationship collections of a JSON
//! Knowledge Graph (JKG) document:
//!
//! - [`standardize`] — pure functions that shape vocabulary codes into
//!   CURIE-style compact identifiers and disambiguate CURIE-looking terms.
//! - [`relations`] — resolution of forward/inverse relationship pairs, so a
//!   semantically symmetric relationship is emitted in one direction only.
//! - [`schema`] — the serde types of the JKG interchange schema (`nodes`
//!   and `rels` array elements).
//! - [`builder`] — the assembly pipeline joining the tables into Source,
//!   Node_Label, Rel_Label, and Concept nodes plus concept-concept edges.

pub mod builder;
pub mod relations;
pub mod schema;
pub mod standardize;

pub use builder::GraphBuilder;
pub use relations::ForwardRelationships;
pub use schema::{
    EndpointPropertiesV1, JkgEndpointV1, JkgNodeV1, JkgRelV1, NodePropertiesV1, RelPropertiesV1,
};
