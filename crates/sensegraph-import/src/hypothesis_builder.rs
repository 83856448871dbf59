//! Hypothesis resolution.
//!
//! Hypotheses reference each other freely: premises may point forward in
//! either list, and continuity evidence names same-object hypotheses that
//! appear later. So this builder constructs every hypothesis first and
//! only then links the cross-references.
//!
//! Causal-sequence hypotheses also get a derived scene edge here. The
//! producer keeps that edge implicit (only the concept-level edge is on
//! the wire), so it is synthesized during the build: same relationship and
//! weight as the concept edge, action endpoints, endpoints swapped for
//! backward flow, and a fresh id above every edge id the document uses.

use std::collections::BTreeMap;

use sensegraph_format::enums::CausalFlowDirection;
use sensegraph_format::hypothesis::{
    AffectCurveScoreRecord, AttributeSimEvRecord, CausalPathEvRecord, CausalSequenceHypRecord,
    ContinuityEvRecord, HypothesesRecord, MultiCausalPathEvRecord, MultiPathRecord, PathRecord,
    SameObjectHypRecord, VisualSimEvRecord,
};
use sensegraph_format::{optional_id, NO_ID};
use sensegraph_model::evidence::{
    AttributeSimEv, CausalPathEv, ContinuityEv, MultiCausalPathEv, VisualSimEv,
};
use sensegraph_model::graph::{Edge, KnowledgeGraph};
use sensegraph_model::hypothesis::{
    CausalSequenceHyp, Hypothesis, HypothesisKind, SameObjectHyp,
};
use sensegraph_model::ids::{
    EdgeId, EvidenceId, HypothesisId, NodeId, ParameterSetId, PathId, StepId,
};
use sensegraph_model::path::{GraphPath, MultiGraphPath, MultiPathStep, PathStep};

use crate::graph_builder::{edge_from_record, expect_action, expect_concept, expect_object};
use crate::{expect_kind, insert_unique, LoadError};

/// Builds every hypothesis against the resolved graph, then links the
/// hypothesis-to-hypothesis references.
pub fn build(
    record: &HypothesesRecord,
    graph: &KnowledgeGraph,
) -> Result<BTreeMap<HypothesisId, Hypothesis>, LoadError> {
    let mut hypotheses = BTreeMap::new();

    for hyp in &record.same_object_hyps {
        let built = same_object(hyp, graph)?;
        insert_unique(&mut hypotheses, built.id, built, "SameObjectHyp", hyp.id)?;
    }

    // Scene edges need ids no wire edge uses. The ceiling spans the graph's
    // edge table and both lists' embedded edge records; assignment order
    // follows ascending hypothesis record id so identical documents get
    // identical ids.
    let mut next_edge_id = max_wire_edge_id(record, graph) + 1;
    let mut causal: Vec<&CausalSequenceHypRecord> = record.causal_sequence_hyps.iter().collect();
    causal.sort_by_key(|hyp| hyp.id);
    for hyp in causal {
        let built = causal_sequence(hyp, graph, EdgeId(next_edge_id))?;
        next_edge_id += 1;
        insert_unique(&mut hypotheses, built.id, built, "CausalSequenceHyp", hyp.id)?;
    }

    link(&hypotheses)?;
    Ok(hypotheses)
}

fn max_wire_edge_id(record: &HypothesesRecord, graph: &KnowledgeGraph) -> i64 {
    let mut max = graph
        .edges
        .keys()
        .next_back()
        .map(|id| id.raw())
        .unwrap_or(NO_ID);
    for hyp in &record.same_object_hyps {
        max = max.max(hyp.edge.id);
    }
    for hyp in &record.causal_sequence_hyps {
        max = max.max(hyp.edge.id);
    }
    max
}

// ============================================================================
// Per-kind construction
// ============================================================================

fn same_object(
    record: &SameObjectHypRecord,
    graph: &KnowledgeGraph,
) -> Result<Hypothesis, LoadError> {
    expect_kind("SameObjectHyp", &record.kind, record.id)?;
    let id = HypothesisId(record.id);
    expect_object(graph, "SameObjectHyp", record.id, NodeId(record.object_1_id))?;
    expect_object(graph, "SameObjectHyp", record.id, NodeId(record.object_2_id))?;

    let edge = edge_from_record(&record.edge, Some(id));
    owned_edge_endpoints(graph, "SameObjectHyp", record.id, &edge)?;

    Ok(Hypothesis::new(
        id,
        record.name.clone(),
        record.premise_ids.iter().map(|p| HypothesisId(*p)).collect(),
        HypothesisKind::SameObject(SameObjectHyp {
            object_1: NodeId(record.object_1_id),
            object_2: NodeId(record.object_2_id),
            edge,
            visual_sim_ev: visual_sim(&record.visual_sim_ev, graph)?,
            attribute_sim_ev: attribute_sim(&record.attribute_sim_ev, graph)?,
        }),
    ))
}

fn causal_sequence(
    record: &CausalSequenceHypRecord,
    graph: &KnowledgeGraph,
    scene_edge_id: EdgeId,
) -> Result<Hypothesis, LoadError> {
    expect_kind("CausalSequenceHyp", &record.kind, record.id)?;
    let id = HypothesisId(record.id);
    let source_action = NodeId(record.source_action_id);
    let target_action = NodeId(record.target_action_id);
    expect_action(graph, "CausalSequenceHyp", record.id, source_action)?;
    expect_action(graph, "CausalSequenceHyp", record.id, target_action)?;

    let concept_edge = edge_from_record(&record.edge, Some(id));
    owned_edge_endpoints(graph, "CausalSequenceHyp", record.id, &concept_edge)?;

    // Backward flow means the wire order is effect-then-cause; the scene
    // edge always points cause to effect.
    let (scene_source, scene_target) = match record.direction {
        CausalFlowDirection::Backward => (target_action, source_action),
        _ => (source_action, target_action),
    };
    let scene_edge = Edge {
        id: scene_edge_id,
        source: scene_source,
        target: scene_target,
        relationship: concept_edge.relationship.clone(),
        weight: concept_edge.weight,
        commonsense_edge: None,
        hypothesis: Some(id),
    };

    let mut causal_path_evs = Vec::with_capacity(record.causal_path_evs.len());
    for ev in &record.causal_path_evs {
        causal_path_evs.push(causal_path(ev, graph)?);
    }
    let mut multi_causal_path_evs = Vec::with_capacity(record.multi_causal_path_evs.len());
    for ev in &record.multi_causal_path_evs {
        multi_causal_path_evs.push(multi_causal_path(ev, graph)?);
    }
    let mut continuity_evs = Vec::with_capacity(record.continuity_evs.len());
    for ev in &record.continuity_evs {
        continuity_evs.push(continuity(ev, graph)?);
    }

    Ok(Hypothesis::new(
        id,
        record.name.clone(),
        record.premise_ids.iter().map(|p| HypothesisId(*p)).collect(),
        HypothesisKind::CausalSequence(CausalSequenceHyp {
            source_action,
            target_action,
            concept_edge,
            scene_edge,
            causal_path_evs,
            multi_causal_path_evs,
            continuity_evs,
            direction: record.direction,
            affect_curve_scores: curve_scores(record.id, &record.affect_curve_scores)?,
        }),
    ))
}

/// Hypothesis-owned edges still have to land on real nodes even though
/// they are absent from the graph's edge table.
fn owned_edge_endpoints(
    graph: &KnowledgeGraph,
    kind: &'static str,
    id: i64,
    edge: &Edge,
) -> Result<(), LoadError> {
    for endpoint in [edge.source, edge.target] {
        if graph.node(endpoint).is_none() {
            return Err(LoadError::dangling(kind, id, "Node", endpoint.raw()));
        }
    }
    Ok(())
}

fn curve_scores(
    record_id: i64,
    entries: &[AffectCurveScoreRecord],
) -> Result<BTreeMap<ParameterSetId, f64>, LoadError> {
    let mut scores = BTreeMap::new();
    for entry in entries {
        if scores.insert(ParameterSetId(entry.pset_id), entry.score).is_some() {
            return Err(LoadError::malformed(
                "CausalSequenceHyp",
                record_id,
                format!("duplicate affect-curve entry for parameter set {}", entry.pset_id),
            ));
        }
    }
    Ok(scores)
}

// ============================================================================
// Evidence
// ============================================================================

fn visual_sim(
    record: &VisualSimEvRecord,
    graph: &KnowledgeGraph,
) -> Result<VisualSimEv, LoadError> {
    expect_kind("VisualSimEv", &record.kind, record.id)?;
    expect_object(graph, "VisualSimEv", record.id, NodeId(record.object_1_id))?;
    expect_object(graph, "VisualSimEv", record.id, NodeId(record.object_2_id))?;
    Ok(VisualSimEv {
        id: EvidenceId(record.id),
        score: record.score,
        object_1: NodeId(record.object_1_id),
        object_2: NodeId(record.object_2_id),
    })
}

fn attribute_sim(
    record: &AttributeSimEvRecord,
    graph: &KnowledgeGraph,
) -> Result<AttributeSimEv, LoadError> {
    expect_kind("AttributeSimEv", &record.kind, record.id)?;
    expect_object(graph, "AttributeSimEv", record.id, NodeId(record.object_1_id))?;
    expect_object(graph, "AttributeSimEv", record.id, NodeId(record.object_2_id))?;
    Ok(AttributeSimEv {
        id: EvidenceId(record.id),
        score: record.score,
        object_1: NodeId(record.object_1_id),
        object_2: NodeId(record.object_2_id),
    })
}

fn causal_path(
    record: &CausalPathEvRecord,
    graph: &KnowledgeGraph,
) -> Result<CausalPathEv, LoadError> {
    expect_kind("CausalPathEv", &record.kind, record.id)?;
    expect_action(graph, "CausalPathEv", record.id, NodeId(record.source_action_id))?;
    expect_action(graph, "CausalPathEv", record.id, NodeId(record.target_action_id))?;
    expect_concept(graph, "CausalPathEv", record.id, NodeId(record.source_concept_id))?;
    expect_concept(graph, "CausalPathEv", record.id, NodeId(record.target_concept_id))?;
    Ok(CausalPathEv {
        id: EvidenceId(record.id),
        score: record.score,
        source_action: NodeId(record.source_action_id),
        target_action: NodeId(record.target_action_id),
        source_concept: NodeId(record.source_concept_id),
        target_concept: NodeId(record.target_concept_id),
        concept_path: build_path(&record.concept_path, graph)?,
        direction: record.direction,
    })
}

fn multi_causal_path(
    record: &MultiCausalPathEvRecord,
    graph: &KnowledgeGraph,
) -> Result<MultiCausalPathEv, LoadError> {
    expect_kind("MultiCausalPathEv", &record.kind, record.id)?;
    expect_action(graph, "MultiCausalPathEv", record.id, NodeId(record.source_action_id))?;
    expect_action(graph, "MultiCausalPathEv", record.id, NodeId(record.target_action_id))?;
    for concept in record.source_concept_ids.iter().chain(&record.target_concept_ids) {
        expect_concept(graph, "MultiCausalPathEv", record.id, NodeId(*concept))?;
    }
    Ok(MultiCausalPathEv {
        id: EvidenceId(record.id),
        score: record.score,
        source_action: NodeId(record.source_action_id),
        target_action: NodeId(record.target_action_id),
        source_concepts: record.source_concept_ids.iter().map(|c| NodeId(*c)).collect(),
        target_concepts: record.target_concept_ids.iter().map(|c| NodeId(*c)).collect(),
        concept_path: build_multi_path(&record.concept_path, graph)?,
        direction: record.direction,
    })
}

/// The joining hypothesis is not resolved here; continuity evidence may
/// name a hypothesis that has not been built yet. [`link`] checks it once
/// the table is complete.
fn continuity(
    record: &ContinuityEvRecord,
    graph: &KnowledgeGraph,
) -> Result<ContinuityEv, LoadError> {
    expect_kind("ContinuityEv", &record.kind, record.id)?;
    expect_action(graph, "ContinuityEv", record.id, NodeId(record.source_action_id))?;
    expect_action(graph, "ContinuityEv", record.id, NodeId(record.target_action_id))?;
    expect_object(graph, "ContinuityEv", record.id, NodeId(record.source_object_id))?;
    expect_object(graph, "ContinuityEv", record.id, NodeId(record.target_object_id))?;
    Ok(ContinuityEv {
        id: EvidenceId(record.id),
        score: record.score,
        source_action: NodeId(record.source_action_id),
        target_action: NodeId(record.target_action_id),
        source_object: NodeId(record.source_object_id),
        target_object: NodeId(record.target_object_id),
        joining_hyp: HypothesisId(record.joining_hyp_id),
    })
}

// ============================================================================
// Paths
// ============================================================================

fn build_path(record: &PathRecord, graph: &KnowledgeGraph) -> Result<GraphPath, LoadError> {
    let mut steps = Vec::with_capacity(record.steps.len());
    for step in &record.steps {
        if graph.node(NodeId(step.node_id)).is_none() {
            return Err(LoadError::dangling("Step", step.id, "Node", step.node_id));
        }
        for edge_id in [step.next_edge_id, step.previous_edge_id] {
            if let Some(edge_id) = optional_id(edge_id) {
                if graph.edge(EdgeId(edge_id)).is_none() {
                    return Err(LoadError::dangling("Step", step.id, "Edge", edge_id));
                }
            }
        }
        steps.push(PathStep {
            id: StepId(step.id),
            node: NodeId(step.node_id),
            next_step: optional_id(step.next_step_id).map(StepId),
            next_edge: optional_id(step.next_edge_id).map(EdgeId),
            previous_step: optional_id(step.previous_step_id).map(StepId),
            previous_edge: optional_id(step.previous_edge_id).map(EdgeId),
        });
    }
    let path = GraphPath {
        id: PathId(record.id),
        steps,
    };
    validate_step_links(
        record.id,
        path.steps.iter().flat_map(|s| [s.next_step, s.previous_step]),
        &path.steps.iter().map(|s| s.id).collect::<Vec<_>>(),
    )?;
    Ok(path)
}

fn build_multi_path(
    record: &MultiPathRecord,
    graph: &KnowledgeGraph,
) -> Result<MultiGraphPath, LoadError> {
    let mut steps = Vec::with_capacity(record.steps.len());
    for step in &record.steps {
        for node_id in &step.node_ids {
            if graph.node(NodeId(*node_id)).is_none() {
                return Err(LoadError::dangling("Step", step.id, "Node", *node_id));
            }
        }
        for edge_id in step.next_edge_ids.iter().chain(&step.previous_edge_ids) {
            if graph.edge(EdgeId(*edge_id)).is_none() {
                return Err(LoadError::dangling("Step", step.id, "Edge", *edge_id));
            }
        }
        steps.push(MultiPathStep {
            id: StepId(step.id),
            nodes: step.node_ids.iter().map(|n| NodeId(*n)).collect(),
            next_step: optional_id(step.next_step_id).map(StepId),
            next_edges: step.next_edge_ids.iter().map(|e| EdgeId(*e)).collect(),
            previous_step: optional_id(step.previous_step_id).map(StepId),
            previous_edges: step.previous_edge_ids.iter().map(|e| EdgeId(*e)).collect(),
        });
    }
    let path = MultiGraphPath {
        id: PathId(record.id),
        steps,
    };
    validate_step_links(
        record.id,
        path.steps.iter().flat_map(|s| [s.next_step, s.previous_step]),
        &path.steps.iter().map(|s| s.id).collect::<Vec<_>>(),
    )?;
    Ok(path)
}

/// Step links are path-internal: every next/previous step id has to name a
/// step of the same path.
fn validate_step_links(
    path_id: i64,
    links: impl Iterator<Item = Option<StepId>>,
    step_ids: &[StepId],
) -> Result<(), LoadError> {
    for link in links.flatten() {
        if !step_ids.contains(&link) {
            return Err(LoadError::dangling("Path", path_id, "Step", link.raw()));
        }
    }
    Ok(())
}

// ============================================================================
// Cross-reference linking
// ============================================================================

fn link(hypotheses: &BTreeMap<HypothesisId, Hypothesis>) -> Result<(), LoadError> {
    for hyp in hypotheses.values() {
        for premise in &hyp.premises {
            if !hypotheses.contains_key(premise) {
                return Err(LoadError::dangling(
                    hyp.kind_name(),
                    hyp.id.raw(),
                    "Hypothesis",
                    premise.raw(),
                ));
            }
        }
        let causal = match hyp.as_causal_sequence() {
            Some(causal) => causal,
            None => continue,
        };
        for ev in &causal.continuity_evs {
            match hypotheses.get(&ev.joining_hyp) {
                Some(joining) if joining.as_same_object().is_some() => {}
                Some(joining) => {
                    return Err(LoadError::malformed(
                        "ContinuityEv",
                        ev.id.raw(),
                        format!(
                            "joining hypothesis {} is a {}",
                            ev.joining_hyp,
                            joining.kind_name()
                        ),
                    ));
                }
                None => {
                    return Err(LoadError::dangling(
                        "ContinuityEv",
                        ev.id.raw(),
                        "SameObjectHyp",
                        ev.joining_hyp.raw(),
                    ));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensegraph_format::enums::ConceptType;
    use sensegraph_format::graph::{
        ActionRecord, ConceptRecord, EdgeRecord, ImageRecord, KnowledgeGraphRecord, ObjectRecord,
        PolarityScores, Synset,
    };
    use sensegraph_format::hypothesis::StepRecord;

    fn synset(word: &str) -> Synset {
        Synset {
            name: format!("{word}.n.01"),
            word: word.to_string(),
            pos: "n".to_string(),
            sense: "01".to_string(),
        }
    }

    fn concept(id: i64, label: &str, concept_type: ConceptType) -> ConceptRecord {
        ConceptRecord {
            id,
            label: label.to_string(),
            name: format!("{label}_o"),
            edge_ids: Vec::new(),
            hypothesized: false,
            kind: "Concept".to_string(),
            concept_type,
            synset: synset(label),
            commonsense_node_ids: Vec::new(),
            polarity_scores: PolarityScores {
                neg: 0.0,
                neu: 1.0,
                pos: 0.0,
                compound: 0.0,
            },
            sentiment: 0.0,
        }
    }

    fn object(id: i64, concept: i64, image: i64) -> ObjectRecord {
        ObjectRecord {
            id,
            label: "dog".to_string(),
            name: format!("dog_{id}"),
            edge_ids: Vec::new(),
            hypothesized: false,
            kind: "Object".to_string(),
            concept_ids: vec![concept],
            image_ids: vec![image],
            focal_score: 0.5,
            scene_graph_objects: Vec::new(),
            attributes: Vec::new(),
        }
    }

    fn action(id: i64, concept: i64, subject: i64, image: i64) -> ActionRecord {
        ActionRecord {
            id,
            label: "run".to_string(),
            name: format!("run_{id}"),
            edge_ids: Vec::new(),
            hypothesized: false,
            kind: "Action".to_string(),
            concept_ids: vec![concept],
            image_ids: vec![image],
            focal_score: 0.5,
            subject_id: subject,
            obj_id: -1,
            scene_graph_rel: None,
        }
    }

    fn edge_record(id: i64, source: i64, target: i64, relationship: &str) -> EdgeRecord {
        EdgeRecord {
            id,
            source_id: source,
            target_id: target,
            relationship: relationship.to_string(),
            weight: 0.4,
            commonsense_edge_id: -1,
        }
    }

    // Two images, a dog object in each, an action on each dog, plus the
    // concepts behind them and one graph edge (id 30) usable by paths.
    fn graph() -> KnowledgeGraph {
        let record = KnowledgeGraphRecord {
            commonsense_nodes: Vec::new(),
            commonsense_edges: Vec::new(),
            images: vec![
                ImageRecord {
                    id: 100,
                    index: 0,
                    file_path: "100.jpg".to_string(),
                },
                ImageRecord {
                    id: 101,
                    index: 1,
                    file_path: "101.jpg".to_string(),
                },
            ],
            concepts: vec![
                concept(1, "dog", ConceptType::Object),
                concept(2, "run", ConceptType::Action),
                concept(3, "sleep", ConceptType::Action),
            ],
            objects: vec![object(10, 1, 100), object(11, 1, 101)],
            actions: vec![action(20, 2, 10, 100), action(21, 3, 11, 101)],
            edges: vec![edge_record(30, 2, 3, "causes")],
        };
        crate::graph_builder::build(&record).unwrap()
    }

    fn visual_ev(id: i64, a: i64, b: i64) -> VisualSimEvRecord {
        VisualSimEvRecord {
            id,
            score: 0.8,
            kind: "VisualSimEv".to_string(),
            object_1_id: a,
            object_2_id: b,
        }
    }

    fn attribute_ev(id: i64, a: i64, b: i64) -> AttributeSimEvRecord {
        AttributeSimEvRecord {
            id,
            score: 0.6,
            kind: "AttributeSimEv".to_string(),
            object_1_id: a,
            object_2_id: b,
        }
    }

    fn same_object_record(id: i64, edge_id: i64) -> SameObjectHypRecord {
        SameObjectHypRecord {
            id,
            name: format!("same-object-{id}"),
            premise_ids: Vec::new(),
            kind: "SameObjectHyp".to_string(),
            object_1_id: 10,
            object_2_id: 11,
            edge: edge_record(edge_id, 10, 11, "EdgeRelationship.DUPLICATE_OF"),
            visual_sim_ev: visual_ev(1, 10, 11),
            attribute_sim_ev: attribute_ev(2, 10, 11),
        }
    }

    fn causal_record(
        id: i64,
        edge_id: i64,
        direction: CausalFlowDirection,
    ) -> CausalSequenceHypRecord {
        CausalSequenceHypRecord {
            id,
            name: format!("causal-{id}"),
            premise_ids: Vec::new(),
            kind: "CausalSequenceHyp".to_string(),
            source_action_id: 20,
            target_action_id: 21,
            edge: edge_record(edge_id, 2, 3, "EdgeRelationship.LEADS_TO"),
            causal_path_evs: Vec::new(),
            multi_causal_path_evs: Vec::new(),
            continuity_evs: Vec::new(),
            direction,
            affect_curve_scores: Vec::new(),
        }
    }

    fn path_ev(id: i64, steps: Vec<StepRecord>) -> CausalPathEvRecord {
        CausalPathEvRecord {
            id,
            score: 0.4,
            kind: "CausalPathEv".to_string(),
            source_action_id: 20,
            target_action_id: 21,
            source_concept_id: 2,
            target_concept_id: 3,
            concept_path: PathRecord { id: 0, steps },
            direction: CausalFlowDirection::Forward,
        }
    }

    #[test]
    fn scene_edges_get_fresh_ids_above_every_wire_edge() {
        let graph = graph();
        let record = HypothesesRecord {
            same_object_hyps: vec![same_object_record(200, 50)],
            causal_sequence_hyps: vec![
                causal_record(302, 52, CausalFlowDirection::Forward),
                causal_record(301, 51, CausalFlowDirection::Forward),
            ],
        };
        let hypotheses = build(&record, &graph).unwrap();

        // Max wire edge id is 52; fresh ids start at 53, ascending by
        // hypothesis id regardless of list order.
        let first = hypotheses[&HypothesisId(301)].as_causal_sequence().unwrap();
        let second = hypotheses[&HypothesisId(302)].as_causal_sequence().unwrap();
        assert_eq!(first.scene_edge.id, EdgeId(53));
        assert_eq!(second.scene_edge.id, EdgeId(54));
        assert_eq!(first.scene_edge.source, NodeId(20));
        assert_eq!(first.scene_edge.target, NodeId(21));
        assert_eq!(first.scene_edge.relationship, "EdgeRelationship.LEADS_TO");
        assert_eq!(first.scene_edge.commonsense_edge, None);
        assert_eq!(first.scene_edge.hypothesis, Some(HypothesisId(301)));
    }

    #[test]
    fn backward_direction_swaps_scene_edge_endpoints() {
        let graph = graph();
        let record = HypothesesRecord {
            same_object_hyps: Vec::new(),
            causal_sequence_hyps: vec![causal_record(300, 40, CausalFlowDirection::Backward)],
        };
        let hypotheses = build(&record, &graph).unwrap();
        let causal = hypotheses[&HypothesisId(300)].as_causal_sequence().unwrap();
        assert_eq!(causal.scene_edge.source, NodeId(21));
        assert_eq!(causal.scene_edge.target, NodeId(20));
        // The concept edge is untouched.
        assert_eq!(causal.concept_edge.source, NodeId(2));
        assert_eq!(causal.concept_edge.target, NodeId(3));
    }

    #[test]
    fn continuity_joining_hypothesis_may_point_forward() {
        let graph = graph();
        let mut causal = causal_record(300, 40, CausalFlowDirection::Forward);
        causal.continuity_evs.push(ContinuityEvRecord {
            id: 5,
            score: 1.0,
            kind: "ContinuityEv".to_string(),
            source_action_id: 20,
            target_action_id: 21,
            source_object_id: 10,
            target_object_id: 11,
            joining_hyp_id: 400,
        });
        let record = HypothesesRecord {
            // Listed after the causal hypothesis consumes it.
            same_object_hyps: vec![same_object_record(400, 41)],
            causal_sequence_hyps: vec![causal],
        };
        let hypotheses = build(&record, &graph).unwrap();
        let built = hypotheses[&HypothesisId(300)].as_causal_sequence().unwrap();
        assert_eq!(built.continuity_evs[0].joining_hyp, HypothesisId(400));
    }

    #[test]
    fn continuity_joining_must_be_a_same_object_hypothesis() {
        let graph = graph();
        let mut causal = causal_record(300, 40, CausalFlowDirection::Forward);
        causal.continuity_evs.push(ContinuityEvRecord {
            id: 5,
            score: 1.0,
            kind: "ContinuityEv".to_string(),
            source_action_id: 20,
            target_action_id: 21,
            source_object_id: 10,
            target_object_id: 11,
            joining_hyp_id: 301,
        });
        let record = HypothesesRecord {
            same_object_hyps: Vec::new(),
            causal_sequence_hyps: vec![
                causal,
                causal_record(301, 41, CausalFlowDirection::Forward),
            ],
        };
        match build(&record, &graph) {
            Err(LoadError::MalformedInput { kind: "ContinuityEv", id: 5, message }) => {
                assert!(message.contains("CausalSequenceHyp"));
            }
            other => panic!("expected joining kind error, got {other:?}"),
        }
    }

    #[test]
    fn missing_joining_hypothesis_is_dangling() {
        let graph = graph();
        let mut causal = causal_record(300, 40, CausalFlowDirection::Forward);
        causal.continuity_evs.push(ContinuityEvRecord {
            id: 5,
            score: 1.0,
            kind: "ContinuityEv".to_string(),
            source_action_id: 20,
            target_action_id: 21,
            source_object_id: 10,
            target_object_id: 11,
            joining_hyp_id: 999,
        });
        let record = HypothesesRecord {
            same_object_hyps: Vec::new(),
            causal_sequence_hyps: vec![causal],
        };
        match build(&record, &graph) {
            Err(LoadError::DanglingReference {
                referrer_kind: "ContinuityEv",
                target_kind: "SameObjectHyp",
                target_id: 999,
                ..
            }) => {}
            other => panic!("expected dangling joining hypothesis, got {other:?}"),
        }
    }

    #[test]
    fn premises_may_reference_either_list() {
        let graph = graph();
        let mut same = same_object_record(200, 50);
        same.premise_ids = vec![300];
        let record = HypothesesRecord {
            same_object_hyps: vec![same],
            causal_sequence_hyps: vec![causal_record(300, 51, CausalFlowDirection::Forward)],
        };
        let hypotheses = build(&record, &graph).unwrap();
        assert_eq!(hypotheses[&HypothesisId(200)].premises, vec![HypothesisId(300)]);
    }

    #[test]
    fn unknown_premise_is_dangling() {
        let graph = graph();
        let mut same = same_object_record(200, 50);
        same.premise_ids = vec![999];
        let record = HypothesesRecord {
            same_object_hyps: vec![same],
            causal_sequence_hyps: Vec::new(),
        };
        match build(&record, &graph) {
            Err(LoadError::DanglingReference {
                referrer_kind: "SameObjectHyp",
                referrer_id: 200,
                target_kind: "Hypothesis",
                target_id: 999,
            }) => {}
            other => panic!("expected dangling premise, got {other:?}"),
        }
    }

    #[test]
    fn path_steps_resolve_nodes_edges_and_links() {
        let graph = graph();
        let mut causal = causal_record(300, 40, CausalFlowDirection::Forward);
        causal.causal_path_evs.push(path_ev(
            7,
            vec![
                StepRecord {
                    id: 0,
                    node_id: 2,
                    next_step_id: 1,
                    next_edge_id: 30,
                    previous_step_id: -1,
                    previous_edge_id: -1,
                },
                StepRecord {
                    id: 1,
                    node_id: 3,
                    next_step_id: -1,
                    next_edge_id: -1,
                    previous_step_id: 0,
                    previous_edge_id: 30,
                },
            ],
        ));
        let record = HypothesesRecord {
            same_object_hyps: Vec::new(),
            causal_sequence_hyps: vec![causal],
        };
        let hypotheses = build(&record, &graph).unwrap();
        let built = hypotheses[&HypothesisId(300)].as_causal_sequence().unwrap();
        let path = &built.causal_path_evs[0].concept_path;
        assert_eq!(path.node_sequence(), vec![NodeId(2), NodeId(3)]);
        assert_eq!(path.first().unwrap().next_edge, Some(EdgeId(30)));
        assert_eq!(path.last().unwrap().previous_step, Some(StepId(0)));
    }

    #[test]
    fn path_step_link_to_unknown_step_is_dangling() {
        let graph = graph();
        let mut causal = causal_record(300, 40, CausalFlowDirection::Forward);
        causal.causal_path_evs.push(path_ev(
            7,
            vec![StepRecord {
                id: 0,
                node_id: 2,
                next_step_id: 9,
                next_edge_id: -1,
                previous_step_id: -1,
                previous_edge_id: -1,
            }],
        ));
        let record = HypothesesRecord {
            same_object_hyps: Vec::new(),
            causal_sequence_hyps: vec![causal],
        };
        match build(&record, &graph) {
            Err(LoadError::DanglingReference {
                referrer_kind: "Path",
                target_kind: "Step",
                target_id: 9,
                ..
            }) => {}
            other => panic!("expected dangling step link, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_affect_curve_entries_are_malformed() {
        let graph = graph();
        let mut causal = causal_record(300, 40, CausalFlowDirection::Forward);
        causal.affect_curve_scores = vec![
            AffectCurveScoreRecord { pset_id: 0, score: 1.0 },
            AffectCurveScoreRecord { pset_id: 0, score: 2.0 },
        ];
        let record = HypothesesRecord {
            same_object_hyps: Vec::new(),
            causal_sequence_hyps: vec![causal],
        };
        match build(&record, &graph) {
            Err(LoadError::MalformedInput { kind: "CausalSequenceHyp", id: 300, .. }) => {}
            other => panic!("expected duplicate curve entry error, got {other:?}"),
        }
    }

    #[test]
    fn same_object_evidence_objects_must_exist() {
        let graph = graph();
        let mut same = same_object_record(200, 50);
        same.visual_sim_ev.object_2_id = 999;
        let record = HypothesesRecord {
            same_object_hyps: vec![same],
            causal_sequence_hyps: Vec::new(),
        };
        match build(&record, &graph) {
            Err(LoadError::DanglingReference {
                referrer_kind: "VisualSimEv",
                referrer_id: 1,
                target_kind: "Object",
                target_id: 999,
            }) => {}
            other => panic!("expected dangling evidence object, got {other:?}"),
        }
    }
}
