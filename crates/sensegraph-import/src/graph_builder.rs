//! Knowledge-graph resolution.
//!
//! Two strict passes. Construction builds every entity from its own record
//! and never looks anything up; validation then checks every reference
//! against the finished tables and never creates anything. Splitting the
//! passes is what makes forward references inside the graph section safe.
//!
//! Commonsense-edge ids are exempt from validation: the producer leaves the
//! `commonsense_edges` table empty because the external database is too
//! large to embed, so edges and commonsense nodes legitimately reference
//! ids with no in-document entity.

use sensegraph_format::graph::{
    ActionRecord, CommonSenseEdgeRecord, CommonSenseNodeRecord, ConceptRecord, EdgeRecord,
    KnowledgeGraphRecord, ObjectRecord,
};
use sensegraph_format::optional_id;
use sensegraph_model::graph::{
    ActionData, CommonSenseEdge, CommonSenseNode, ConceptData, Edge, ImageData, InstanceData,
    KnowledgeGraph, Node, NodePayload, ObjectData,
};
use sensegraph_model::ids::{
    CommonSenseEdgeId, CommonSenseNodeId, EdgeId, HypothesisId, ImageId, NodeId,
};

use crate::{expect_kind, insert_unique, LoadError};

/// Builds and validates the knowledge graph.
pub fn build(record: &KnowledgeGraphRecord) -> Result<KnowledgeGraph, LoadError> {
    let graph = construct(record)?;
    validate(&graph)?;
    Ok(graph)
}

// ============================================================================
// Pass 1: construction
// ============================================================================

fn construct(record: &KnowledgeGraphRecord) -> Result<KnowledgeGraph, LoadError> {
    let mut graph = KnowledgeGraph::default();

    for cs_node in &record.commonsense_nodes {
        let node = commonsense_node(cs_node);
        insert_unique(
            &mut graph.commonsense_nodes,
            node.id,
            node,
            "CommonSenseNode",
            cs_node.id,
        )?;
    }
    for cs_edge in &record.commonsense_edges {
        let edge = commonsense_edge(cs_edge);
        insert_unique(
            &mut graph.commonsense_edges,
            edge.id,
            edge,
            "CommonSenseEdge",
            cs_edge.id,
        )?;
    }

    for image in &record.images {
        let data = ImageData {
            id: ImageId(image.id),
            index: image.index,
            file_path: image.file_path.clone(),
        };
        insert_unique(&mut graph.images, data.id, data, "Image", image.id)?;
    }
    graph.min_image_index = record.images.iter().map(|image| image.index).min();

    // One node table across all three kinds; duplicate ids between lists
    // are as malformed as duplicates within one.
    for concept in &record.concepts {
        let node = concept_node(concept)?;
        insert_unique(&mut graph.nodes, node.id, node, "Concept", concept.id)?;
    }
    for object in &record.objects {
        let node = object_node(object)?;
        insert_unique(&mut graph.nodes, node.id, node, "Object", object.id)?;
    }
    for action in &record.actions {
        let node = action_node(action)?;
        insert_unique(&mut graph.nodes, node.id, node, "Action", action.id)?;
    }
    graph.instance_count = record.objects.len() + record.actions.len();

    for edge in &record.edges {
        let raw_id = edge.id;
        let edge = edge_from_record(edge, None);
        insert_unique(&mut graph.edges, edge.id, edge, "Edge", raw_id)?;
    }

    Ok(graph)
}

fn commonsense_node(record: &CommonSenseNodeRecord) -> CommonSenseNode {
    CommonSenseNode {
        id: CommonSenseNodeId(record.id),
        uri: record.uri.clone(),
        labels: record.labels.clone(),
        edges: record.edge_ids.iter().map(|id| CommonSenseEdgeId(*id)).collect(),
    }
}

fn commonsense_edge(record: &CommonSenseEdgeRecord) -> CommonSenseEdge {
    CommonSenseEdge {
        id: CommonSenseEdgeId(record.id),
        uri: record.uri.clone(),
        labels: record.labels.clone(),
        relation: record.relation.clone(),
        start_node: CommonSenseNodeId(record.start_node_id),
        end_node: CommonSenseNodeId(record.end_node_id),
        start_node_uri: record.start_node_uri.clone(),
        end_node_uri: record.end_node_uri.clone(),
        weight: record.weight,
        dimension: record.dimension.clone(),
        source: record.source.clone(),
        sentence: record.sentence.clone(),
    }
}

fn concept_node(record: &ConceptRecord) -> Result<Node, LoadError> {
    expect_kind("Concept", &record.kind, record.id)?;
    Ok(Node {
        id: NodeId(record.id),
        label: record.label.clone(),
        name: record.name.clone(),
        hypothesized: record.hypothesized,
        edges: record.edge_ids.iter().map(|id| EdgeId(*id)).collect(),
        payload: NodePayload::Concept(ConceptData {
            concept_type: record.concept_type,
            synset: record.synset.clone(),
            commonsense_nodes: record
                .commonsense_node_ids
                .iter()
                .map(|id| CommonSenseNodeId(*id))
                .collect(),
            polarity_scores: record.polarity_scores,
            sentiment: record.sentiment,
        }),
    })
}

fn object_node(record: &ObjectRecord) -> Result<Node, LoadError> {
    expect_kind("Object", &record.kind, record.id)?;
    Ok(Node {
        id: NodeId(record.id),
        label: record.label.clone(),
        name: record.name.clone(),
        hypothesized: record.hypothesized,
        edges: record.edge_ids.iter().map(|id| EdgeId(*id)).collect(),
        payload: NodePayload::Object(ObjectData {
            instance: instance_data(&record.concept_ids, &record.image_ids, record.focal_score),
            scene_graph_objects: record.scene_graph_objects.clone(),
            attributes: record.attributes.clone(),
        }),
    })
}

fn action_node(record: &ActionRecord) -> Result<Node, LoadError> {
    expect_kind("Action", &record.kind, record.id)?;
    Ok(Node {
        id: NodeId(record.id),
        label: record.label.clone(),
        name: record.name.clone(),
        hypothesized: record.hypothesized,
        edges: record.edge_ids.iter().map(|id| EdgeId(*id)).collect(),
        payload: NodePayload::Action(ActionData {
            instance: instance_data(&record.concept_ids, &record.image_ids, record.focal_score),
            subject: NodeId(record.subject_id),
            object: optional_id(record.obj_id).map(NodeId),
            scene_graph_rel: record.scene_graph_rel.clone(),
        }),
    })
}

/// Image order is the wire order; the first image is the instance's
/// canonical one, so no sorting happens here.
fn instance_data(concept_ids: &[i64], image_ids: &[i64], focal_score: f64) -> InstanceData {
    InstanceData {
        concepts: concept_ids.iter().map(|id| NodeId(*id)).collect(),
        images: image_ids.iter().map(|id| ImageId(*id)).collect(),
        focal_score,
    }
}

/// Shared with the hypothesis builder, which tags its synthesized edges
/// with the owning hypothesis.
pub(crate) fn edge_from_record(record: &EdgeRecord, hypothesis: Option<HypothesisId>) -> Edge {
    Edge {
        id: EdgeId(record.id),
        source: NodeId(record.source_id),
        target: NodeId(record.target_id),
        relationship: record.relationship.clone(),
        weight: record.weight,
        commonsense_edge: optional_id(record.commonsense_edge_id).map(CommonSenseEdgeId),
        hypothesis,
    }
}

// ============================================================================
// Pass 2: validation
// ============================================================================

fn validate(graph: &KnowledgeGraph) -> Result<(), LoadError> {
    for node in graph.nodes.values() {
        let id = node.id.raw();
        for edge_id in &node.edges {
            if graph.edge(*edge_id).is_none() {
                return Err(LoadError::dangling(node.kind_name(), id, "Edge", edge_id.raw()));
            }
        }
        match &node.payload {
            NodePayload::Concept(concept) => {
                // Matched commonsense nodes are always embedded; only their
                // edge lists point outside the document.
                for cs_node in &concept.commonsense_nodes {
                    if graph.commonsense_node(*cs_node).is_none() {
                        return Err(LoadError::dangling(
                            "Concept",
                            id,
                            "CommonSenseNode",
                            cs_node.raw(),
                        ));
                    }
                }
            }
            NodePayload::Object(object) => {
                validate_instance(graph, node, &object.instance)?;
                for observation in &object.scene_graph_objects {
                    if graph.image(ImageId(observation.image_id)).is_none() {
                        return Err(LoadError::dangling(
                            "Object",
                            id,
                            "Image",
                            observation.image_id,
                        ));
                    }
                }
            }
            NodePayload::Action(action) => {
                validate_instance(graph, node, &action.instance)?;
                expect_object(graph, "Action", id, action.subject)?;
                if let Some(object) = action.object {
                    expect_object(graph, "Action", id, object)?;
                }
                if let Some(rel) = &action.scene_graph_rel {
                    if graph.image(ImageId(rel.image_id)).is_none() {
                        return Err(LoadError::dangling("Action", id, "Image", rel.image_id));
                    }
                }
            }
        }
    }

    for edge in graph.edges.values() {
        for endpoint in [edge.source, edge.target] {
            if graph.node(endpoint).is_none() {
                return Err(LoadError::dangling("Edge", edge.id.raw(), "Node", endpoint.raw()));
            }
        }
        // commonsense_edge deliberately unchecked; see the module docs.
    }

    Ok(())
}

fn validate_instance(
    graph: &KnowledgeGraph,
    node: &Node,
    instance: &InstanceData,
) -> Result<(), LoadError> {
    for concept in &instance.concepts {
        match graph.node(*concept) {
            Some(target) if target.concept().is_some() => {}
            Some(target) => {
                return Err(LoadError::malformed(
                    node.kind_name(),
                    node.id.raw(),
                    format!("concept reference {} is a {}", concept, target.kind_name()),
                ));
            }
            None => {
                return Err(LoadError::dangling(
                    node.kind_name(),
                    node.id.raw(),
                    "Concept",
                    concept.raw(),
                ));
            }
        }
    }
    for image in &instance.images {
        if graph.image(*image).is_none() {
            return Err(LoadError::dangling(
                node.kind_name(),
                node.id.raw(),
                "Image",
                image.raw(),
            ));
        }
    }
    Ok(())
}

/// Validates that a node reference resolves to an Object node.
pub(crate) fn expect_object(
    graph: &KnowledgeGraph,
    referrer_kind: &'static str,
    referrer_id: i64,
    target: NodeId,
) -> Result<(), LoadError> {
    match graph.node(target) {
        Some(node) if node.object().is_some() => Ok(()),
        Some(node) => Err(LoadError::malformed(
            referrer_kind,
            referrer_id,
            format!("node {} is a {} where an Object is required", target, node.kind_name()),
        )),
        None => Err(LoadError::dangling(referrer_kind, referrer_id, "Object", target.raw())),
    }
}

/// Validates that a node reference resolves to an Action node.
pub(crate) fn expect_action(
    graph: &KnowledgeGraph,
    referrer_kind: &'static str,
    referrer_id: i64,
    target: NodeId,
) -> Result<(), LoadError> {
    match graph.node(target) {
        Some(node) if node.action().is_some() => Ok(()),
        Some(node) => Err(LoadError::malformed(
            referrer_kind,
            referrer_id,
            format!("node {} is a {} where an Action is required", target, node.kind_name()),
        )),
        None => Err(LoadError::dangling(referrer_kind, referrer_id, "Action", target.raw())),
    }
}

/// Validates that a node reference resolves to a Concept node.
pub(crate) fn expect_concept(
    graph: &KnowledgeGraph,
    referrer_kind: &'static str,
    referrer_id: i64,
    target: NodeId,
) -> Result<(), LoadError> {
    match graph.node(target) {
        Some(node) if node.concept().is_some() => Ok(()),
        Some(node) => Err(LoadError::malformed(
            referrer_kind,
            referrer_id,
            format!("node {} is a {} where a Concept is required", target, node.kind_name()),
        )),
        None => Err(LoadError::dangling(referrer_kind, referrer_id, "Concept", target.raw())),
    }
}

/// Validates that an image id resolves.
pub(crate) fn expect_image(
    graph: &KnowledgeGraph,
    referrer_kind: &'static str,
    referrer_id: i64,
    image: ImageId,
) -> Result<(), LoadError> {
    if graph.image(image).is_none() {
        return Err(LoadError::dangling(referrer_kind, referrer_id, "Image", image.raw()));
    }
    Ok(())
}
