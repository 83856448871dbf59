//! The resolved knowledge graph.
//!
//! Entities live in id-keyed BTreeMaps so enumeration is deterministic for
//! identical input. References between entities are typed ids that the
//! import pipeline has already validated; lookups against the owning graph
//! are therefore infallible for well-formed data and return `Option` only
//! at the API boundary.
//!
//! Commonsense-edge ids are the one exception to strict resolution: the
//! producer deliberately leaves its `commonsense_edges` table empty (the
//! full table is too large to embed), so ids pointing into the external
//! commonsense database are stored as-is and looked up best-effort.

use std::collections::{BTreeMap, BTreeSet};

use sensegraph_format::enums::{ConceptType, EdgeRelationship};
use sensegraph_format::graph::{
    PolarityScores, SceneGraphObject, SceneGraphRelationship, Synset,
};

use crate::ids::{
    CommonSenseEdgeId, CommonSenseNodeId, EdgeId, HypothesisId, ImageId, NodeId,
};

// ============================================================================
// Commonsense data and images
// ============================================================================

/// A node of the external commonsense database.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonSenseNode {
    pub id: CommonSenseNodeId,
    pub uri: String,
    pub labels: Vec<String>,
    /// Incident edges in the external database. Most are not present in the
    /// document's commonsense-edge table.
    pub edges: Vec<CommonSenseEdgeId>,
}

/// An edge of the external commonsense database.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonSenseEdge {
    pub id: CommonSenseEdgeId,
    pub uri: String,
    pub labels: Vec<String>,
    pub relation: String,
    pub start_node: CommonSenseNodeId,
    pub end_node: CommonSenseNodeId,
    pub start_node_uri: String,
    pub end_node_uri: String,
    pub weight: f64,
    pub dimension: String,
    pub source: String,
    pub sentence: String,
}

/// One image of the input sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub id: ImageId,
    /// Ordinal position in the sequence. Raw indices need not be
    /// contiguous or start at zero.
    pub index: i64,
    pub file_path: String,
}

// ============================================================================
// Nodes
// ============================================================================

/// Concept payload: an abstract word-sense the scene grounds into.
#[derive(Debug, Clone, PartialEq)]
pub struct ConceptData {
    pub concept_type: ConceptType,
    pub synset: Synset,
    pub commonsense_nodes: BTreeSet<CommonSenseNodeId>,
    pub polarity_scores: PolarityScores,
    pub sentiment: f64,
}

/// Shared payload of object and action nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceData {
    pub concepts: Vec<NodeId>,
    /// Images this instance appears in, in wire order. The first entry is
    /// the instance's canonical image.
    pub images: Vec<ImageId>,
    pub focal_score: f64,
}

/// Object payload: a physical thing observed in one or more images.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectData {
    pub instance: InstanceData,
    /// One scene-graph observation per image the object appears in.
    pub scene_graph_objects: Vec<SceneGraphObject>,
    pub attributes: Vec<String>,
}

impl ObjectData {
    /// The first observation's bounding box, treated as canonical.
    pub fn canonical_bounding_box(&self) -> Option<&sensegraph_format::BoundingBox> {
        self.scene_graph_objects.first().map(|s| &s.bounding_box)
    }
}

/// Action payload: something an object does, possibly to another object.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionData {
    pub instance: InstanceData,
    pub subject: NodeId,
    /// Absent for intransitive actions.
    pub object: Option<NodeId>,
    pub scene_graph_rel: Option<SceneGraphRelationship>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodePayload {
    Concept(ConceptData),
    Object(ObjectData),
    Action(ActionData),
}

/// A knowledge-graph node. Shared fields live here; kind-specific fields
/// live in the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub name: String,
    /// True if a hypothesis created this node rather than direct
    /// scene-graph observation.
    pub hypothesized: bool,
    /// Incident edges, both directions.
    pub edges: BTreeSet<EdgeId>,
    pub payload: NodePayload,
}

impl Node {
    /// Producer-side class name, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self.payload {
            NodePayload::Concept(_) => "Concept",
            NodePayload::Object(_) => "Object",
            NodePayload::Action(_) => "Action",
        }
    }

    pub fn is_instance(&self) -> bool {
        matches!(
            self.payload,
            NodePayload::Object(_) | NodePayload::Action(_)
        )
    }

    pub fn concept(&self) -> Option<&ConceptData> {
        match &self.payload {
            NodePayload::Concept(data) => Some(data),
            _ => None,
        }
    }

    pub fn instance(&self) -> Option<&InstanceData> {
        match &self.payload {
            NodePayload::Object(data) => Some(&data.instance),
            NodePayload::Action(data) => Some(&data.instance),
            NodePayload::Concept(_) => None,
        }
    }

    pub fn object(&self) -> Option<&ObjectData> {
        match &self.payload {
            NodePayload::Object(data) => Some(data),
            _ => None,
        }
    }

    pub fn action(&self) -> Option<&ActionData> {
        match &self.payload {
            NodePayload::Action(data) => Some(data),
            _ => None,
        }
    }

    /// The canonical (first-listed) image of an instance node.
    pub fn first_image(&self) -> Option<ImageId> {
        self.instance().and_then(|i| i.images.first().copied())
    }

    /// Whether this instance appears in the given image.
    pub fn appears_in(&self, image: ImageId) -> bool {
        self.instance()
            .map(|i| i.images.contains(&image))
            .unwrap_or(false)
    }
}

// ============================================================================
// Edges
// ============================================================================

/// A directed, labeled, weighted edge between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    /// Free-form label: a scene-graph predicate, a commonsense relation, or
    /// the producer's structural vocabulary (see
    /// [`EdgeRelationship::parse`]).
    pub relationship: String,
    pub weight: f64,
    /// Reference into the external commonsense database, if this edge came
    /// from one of its edges. Usually not resolvable in-document.
    pub commonsense_edge: Option<CommonSenseEdgeId>,
    /// The hypothesis that synthesized this edge. `None` for observed
    /// edges; synthesized edges live on their hypothesis, not in the
    /// graph's edge table.
    pub hypothesis: Option<HypothesisId>,
}

impl Edge {
    pub fn is_hypothesized(&self) -> bool {
        self.hypothesis.is_some()
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }

    /// The node on the opposite end, or `None` if the edge does not touch
    /// the given node.
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if self.source == node {
            Some(self.target)
        } else if self.target == node {
            Some(self.source)
        } else {
            None
        }
    }

    /// Classifies the relationship label against the producer's structural
    /// vocabulary.
    pub fn relationship_kind(&self) -> Option<EdgeRelationship> {
        EdgeRelationship::parse(&self.relationship)
    }
}

// ============================================================================
// The graph
// ============================================================================

/// The fully resolved knowledge graph. Construction happens in the import
/// pipeline; afterwards the graph is read-only.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KnowledgeGraph {
    pub commonsense_nodes: BTreeMap<CommonSenseNodeId, CommonSenseNode>,
    pub commonsense_edges: BTreeMap<CommonSenseEdgeId, CommonSenseEdge>,
    pub images: BTreeMap<ImageId, ImageData>,
    pub nodes: BTreeMap<NodeId, Node>,
    pub edges: BTreeMap<EdgeId, Edge>,
    /// Count of object and action nodes (concepts excluded), the `n` of
    /// the density normalization.
    pub instance_count: usize,
    /// Lowest raw image index, the origin for normalized indices. `None`
    /// for a graph without images.
    pub min_image_index: Option<i64>,
}

impl KnowledgeGraph {
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    pub fn image(&self, id: ImageId) -> Option<&ImageData> {
        self.images.get(&id)
    }

    pub fn commonsense_node(&self, id: CommonSenseNodeId) -> Option<&CommonSenseNode> {
        self.commonsense_nodes.get(&id)
    }

    pub fn commonsense_edge(&self, id: CommonSenseEdgeId) -> Option<&CommonSenseEdge> {
        self.commonsense_edges.get(&id)
    }

    pub fn concepts(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|n| n.concept().is_some())
    }

    pub fn objects(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|n| n.object().is_some())
    }

    pub fn actions(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|n| n.action().is_some())
    }

    /// Images sorted by sequence position, then id.
    pub fn images_in_sequence(&self) -> Vec<&ImageData> {
        let mut images: Vec<&ImageData> = self.images.values().collect();
        images.sort_by_key(|image| (image.index, image.id));
        images
    }

    /// The image's index normalized so the sequence starts at zero.
    pub fn normalized_index(&self, image: ImageId) -> Option<i64> {
        let raw = self.images.get(&image)?.index;
        Some(raw - self.min_image_index?)
    }

    /// Normalized index of an instance node's canonical image.
    pub fn normalized_first_index(&self, node: NodeId) -> Option<i64> {
        let first = self.node(node)?.first_image()?;
        self.normalized_index(first)
    }

    /// Observed instances appearing in the given image. Hypothesized nodes
    /// never participate in the observed scene.
    pub fn scene_instances(&self, image: ImageId) -> Vec<&Node> {
        self.nodes
            .values()
            .filter(|n| !n.hypothesized && n.is_instance() && n.appears_in(image))
            .collect()
    }
}
