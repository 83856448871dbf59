//! The `knowledge_graph` section of the wire document.
//!
//! Every cross-reference is a plain integer id scoped to its entity kind.
//! Optional references carry the producer's `-1` sentinel instead of null.

use serde::{Deserialize, Serialize};

use crate::enums::ConceptType;

/// Sentinel the producer writes for an absent optional id.
pub const NO_ID: i64 = -1;

/// Reads a `-1`-sentinel id as an `Option`.
pub fn optional_id(raw: i64) -> Option<i64> {
    (raw != NO_ID).then_some(raw)
}

/// Writes an optional id back in sentinel form.
pub fn sentinel_id(id: Option<i64>) -> i64 {
    id.unwrap_or(NO_ID)
}

// ============================================================================
// Leaf data shared with the resolved model
// ============================================================================

/// A WordNet synset in `{word}.{pos}.{sense}` form, pre-split by the
/// producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synset {
    pub name: String,
    pub word: String,
    pub pos: String,
    pub sense: String,
}

/// Pixel-space bounding box of a scene-graph observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub h: i64,
    pub w: i64,
    pub x: i64,
    pub y: i64,
}

/// VADER-style sentiment breakdown attached to concepts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarityScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

/// One observation of an object in one image's scene graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneGraphObject {
    pub names: Vec<String>,
    pub synsets: Vec<Synset>,
    pub object_id: i64,
    pub bounding_box: BoundingBox,
    pub image_id: i64,
    pub attributes: Vec<String>,
}

/// The scene-graph predicate grounding an action, when one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneGraphRelationship {
    pub predicate: String,
    pub synsets: Vec<Synset>,
    pub relationship_id: i64,
    pub object_id: i64,
    pub subject_id: i64,
    pub image_id: i64,
}

// ============================================================================
// Graph records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: i64,
    pub index: i64,
    pub file_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonSenseNodeRecord {
    pub id: i64,
    pub uri: String,
    pub labels: Vec<String>,
    pub edge_ids: Vec<i64>,
}

/// Commonsense-database edge. The producer writes `""` for `dimension`,
/// `source`, and `sentence` when it has no value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonSenseEdgeRecord {
    pub id: i64,
    pub uri: String,
    pub labels: Vec<String>,
    pub relation: String,
    pub start_node_id: i64,
    pub end_node_id: i64,
    pub start_node_uri: String,
    pub end_node_uri: String,
    pub weight: f64,
    pub dimension: String,
    pub source: String,
    pub sentence: String,
}

/// Concept node: base node fields plus concept payload. The `type`
/// discriminator is redundant with the list the record arrives in and is
/// validated during import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptRecord {
    pub id: i64,
    pub label: String,
    pub name: String,
    pub edge_ids: Vec<i64>,
    pub hypothesized: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub concept_type: ConceptType,
    pub synset: Synset,
    pub commonsense_node_ids: Vec<i64>,
    pub polarity_scores: PolarityScores,
    pub sentiment: f64,
}

/// Object node: base node fields plus instance and object payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub id: i64,
    pub label: String,
    pub name: String,
    pub edge_ids: Vec<i64>,
    pub hypothesized: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub concept_ids: Vec<i64>,
    pub image_ids: Vec<i64>,
    pub focal_score: f64,
    pub scene_graph_objects: Vec<SceneGraphObject>,
    pub attributes: Vec<String>,
}

/// Action node: base node fields plus instance and action payloads.
/// `obj_id` is `-1` for intransitive actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: i64,
    pub label: String,
    pub name: String,
    pub edge_ids: Vec<i64>,
    pub hypothesized: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub concept_ids: Vec<i64>,
    pub image_ids: Vec<i64>,
    pub focal_score: f64,
    pub subject_id: i64,
    pub obj_id: i64,
    pub scene_graph_rel: Option<SceneGraphRelationship>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: i64,
    pub source_id: i64,
    pub target_id: i64,
    pub relationship: String,
    pub weight: f64,
    pub commonsense_edge_id: i64,
}

/// The whole `knowledge_graph` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraphRecord {
    pub commonsense_nodes: Vec<CommonSenseNodeRecord>,
    pub commonsense_edges: Vec<CommonSenseEdgeRecord>,
    pub images: Vec<ImageRecord>,
    pub concepts: Vec<ConceptRecord>,
    pub objects: Vec<ObjectRecord>,
    pub actions: Vec<ActionRecord>,
    pub edges: Vec<EdgeRecord>,
}
