//! Integration tests for the complete Sensegraph pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - Wire document → Format parse → Import resolution
//! - Resolved data → Scoring → Canon queries
//! - Provider → Load → Query
//!
//! Run with: cargo test --test integration_tests

use serde_json::{json, Value};

use sensegraph_format::{parse_document, to_document_string};
use sensegraph_import::{load_from_provider, load_str, DirectoryProvider, LoadError};
use sensegraph_model::ids::{
    EdgeId, HypothesisId, ImageId, NodeId, ParameterSetId, SolutionId, SolutionSetId,
};
use sensegraph_model::query::{CanonLink, EvalContext};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

// ============================================================================
// Wire fixtures
// ============================================================================

fn image_json(id: i64, index: i64) -> Value {
    json!({ "id": id, "index": index, "file_path": format!("{id}.jpg") })
}

fn concept_json(id: i64, label: &str, concept_type: &str) -> Value {
    json!({
        "id": id,
        "label": label,
        "name": format!("{label}_o"),
        "edge_ids": [],
        "hypothesized": false,
        "type": "Concept",
        "concept_type": concept_type,
        "synset": { "name": format!("{label}.n.01"), "word": label, "pos": "n", "sense": "01" },
        "commonsense_node_ids": [],
        "polarity_scores": { "neg": 0.0, "neu": 1.0, "pos": 0.0, "compound": 0.0 },
        "sentiment": 0.0
    })
}

fn object_json(id: i64, image: i64) -> Value {
    json!({
        "id": id,
        "label": "dog",
        "name": format!("dog_{id}"),
        "edge_ids": [],
        "hypothesized": false,
        "type": "Object",
        "concept_ids": [1],
        "image_ids": [image],
        "focal_score": 0.5,
        "scene_graph_objects": [],
        "attributes": []
    })
}

fn action_json(id: i64, concept: i64, subject: i64, image: i64) -> Value {
    json!({
        "id": id,
        "label": "run",
        "name": format!("run_{id}"),
        "edge_ids": [],
        "hypothesized": false,
        "type": "Action",
        "concept_ids": [concept],
        "image_ids": [image],
        "focal_score": 0.5,
        "subject_id": subject,
        "obj_id": -1,
        "scene_graph_rel": null
    })
}

fn edge_json(id: i64, source: i64, target: i64, relationship: &str) -> Value {
    json!({
        "id": id,
        "source_id": source,
        "target_id": target,
        "relationship": relationship,
        "weight": 0.4,
        "commonsense_edge_id": -1
    })
}

/// Three images in sequence, a dog in each, one action per dog.
fn knowledge_graph_json() -> Value {
    json!({
        "commonsense_nodes": [],
        "commonsense_edges": [],
        "images": [image_json(100, 0), image_json(101, 1), image_json(102, 2)],
        "concepts": [
            concept_json(1, "dog", "ConceptType.OBJECT"),
            concept_json(2, "run", "ConceptType.ACTION"),
            concept_json(3, "sleep", "ConceptType.ACTION"),
            concept_json(4, "eat", "ConceptType.ACTION"),
        ],
        "objects": [object_json(10, 100), object_json(11, 101), object_json(12, 102)],
        "actions": [
            action_json(20, 2, 10, 100),
            action_json(21, 3, 11, 101),
            action_json(22, 4, 12, 102),
        ],
        "edges": []
    })
}

fn same_object_hyp_json(id: i64, edge_id: i64, object_1: i64, object_2: i64) -> Value {
    json!({
        "id": id,
        "name": format!("same-object-{id}"),
        "premise_ids": [],
        "type": "SameObjectHyp",
        "object_1_id": object_1,
        "object_2_id": object_2,
        "edge": edge_json(edge_id, object_1, object_2, "EdgeRelationship.DUPLICATE_OF"),
        "visual_sim_ev": {
            "id": id * 10, "score": 0.8, "type": "VisualSimEv",
            "object_1_id": object_1, "object_2_id": object_2
        },
        "attribute_sim_ev": {
            "id": id * 10 + 1, "score": 0.6, "type": "AttributeSimEv",
            "object_1_id": object_1, "object_2_id": object_2
        }
    })
}

/// A causal hypothesis backed by one path evidence with the given raw
/// score and a zero affect-curve entry, so its total score equals the raw
/// evidence score under a causal weight of 1.0.
fn causal_hyp_json(
    id: i64,
    edge_id: i64,
    source_action: i64,
    target_action: i64,
    concepts: (i64, i64),
    ev_score: f64,
) -> Value {
    json!({
        "id": id,
        "name": format!("causal-{id}"),
        "premise_ids": [],
        "type": "CausalSequenceHyp",
        "source_action_id": source_action,
        "target_action_id": target_action,
        "edge": edge_json(edge_id, concepts.0, concepts.1, "EdgeRelationship.LEADS_TO"),
        "causal_path_evs": [{
            "id": id * 10, "score": ev_score, "type": "CausalPathEv",
            "source_action_id": source_action, "target_action_id": target_action,
            "source_concept_id": concepts.0, "target_concept_id": concepts.1,
            "concept_path": { "id": 0, "steps": [
                { "id": 0, "node_id": concepts.0, "next_step_id": -1, "next_edge_id": -1,
                  "previous_step_id": -1, "previous_edge_id": -1 }
            ]},
            "direction": "CausalFlowDirection.FORWARD"
        }],
        "multi_causal_path_evs": [],
        "continuity_evs": [],
        "direction": "CausalFlowDirection.FORWARD",
        "affect_curve_scores": [{ "pset_id": 1, "score": 0.0 }]
    })
}

fn solution_json(id: i64, accepted: Vec<i64>, rejections: Value) -> Value {
    json!({
        "id": id,
        "parameter_set_id": 1,
        "accepted_hypothesis_ids": accepted,
        "accepted_hyp_set_ids": [],
        "energy": if id == 0 { json!(-2.0) } else { Value::Null },
        "rejections": rejections
    })
}

fn no_rejections() -> Value {
    json!({
        "hyp_con_rejections": [],
        "hyp_set_con_rejections": [],
        "causal_cycle_rejections": []
    })
}

/// The full fixture document.
///
/// Hypotheses: same-object 200 (dogs 10/11) and 201 (dogs 11/12); causal
/// 300, 301, 302 all between actions 20 and 21 with scores 5.0, 9.0, 5.0;
/// causal 303 between actions 21 and 22 with score 2.0, carrying a
/// continuity evidence joined by 200.
///
/// Solution 0 accepts everything except 301 and rejects it; solution 1
/// accepts only the causal hypotheses, so the continuity bonus vanishes.
fn standard_document() -> String {
    let mut causal_303 = causal_hyp_json(303, 63, 21, 22, (3, 4), 2.0);
    causal_303["continuity_evs"] = json!([{
        "id": 3030, "score": 0.7, "type": "ContinuityEv",
        "source_action_id": 21, "target_action_id": 22,
        "source_object_id": 11, "target_object_id": 12,
        "joining_hyp_id": 200
    }]);

    json!({
        "sensemaker_data": {
            "knowledge_graph": knowledge_graph_json(),
            "hypotheses": {
                "same_object_hyps": [
                    same_object_hyp_json(200, 50, 10, 11),
                    same_object_hyp_json(201, 51, 11, 12),
                ],
                "causal_sequence_hyps": [
                    causal_hyp_json(300, 60, 20, 21, (2, 3), 5.0),
                    causal_hyp_json(301, 61, 20, 21, (2, 3), 9.0),
                    causal_hyp_json(302, 62, 20, 21, (2, 3), 5.0),
                    causal_303,
                ]
            },
            "parameter_sets": [{
                "id": 1,
                "name": "default",
                "visual_sim_ev_weight": 0.5,
                "visual_sim_ev_thresh": 0.2,
                "attribute_sim_ev_weight": 0.3,
                "attribute_sim_ev_thresh": 0.2,
                "causal_path_ev_weight": 1.0,
                "causal_path_ev_thresh": 0.1,
                "continuity_ev_weight": 1.5,
                "continuity_ev_thresh": 0.0,
                "density_weight": 0.9,
                "affect_curve": [0, 1, -1],
                "affect_curve_weight": 1.0,
                "affect_curve_thresh": 0.0
            }],
            "solution_sets": [{
                "id": 0,
                "parameter_set_id": 1,
                "individual_scores": [{ "id": 200, "score": 0.58 }],
                "paired_scores": [{ "id_pair": [301, 300], "score": 0.25 }],
                "hyp_sets": { "causal_hyp_chains": [], "hypothesis_sets": [] },
                "contradictions": {
                    "in_image_trans_cons": [{
                        "id": 1, "explanation": "dogs 10 and 12 both claim dog 11",
                        "type": "InImageTransCon",
                        "hypothesis_1_id": 200, "hypothesis_2_id": 201,
                        "obj_1_id": 10, "obj_2_id": 12, "shared_obj_id": 11
                    }],
                    "tween_image_trans_cons": [],
                    "causal_hyp_flow_cons": [{
                        "id": 2, "explanation": "flow disagreement between 300 and 301",
                        "type": "CausalHypFlowCon",
                        "hypothesis_1_id": 300, "hypothesis_2_id": 301,
                        "image_1_id": 100, "image_2_id": 101
                    }],
                    "causal_chain_flow_cons": [],
                    "causal_cycle_con": []
                },
                "solutions": [
                    solution_json(0, vec![200, 201, 300, 302, 303], json!({
                        "hyp_con_rejections": [{
                            "rejected_hyp_id": 301,
                            "explanation": "lost to 300",
                            "type": "HypConRejection",
                            "contradicting_hyp_id": 300,
                            "contradiction_id": 2
                        }],
                        "hyp_set_con_rejections": [],
                        "causal_cycle_rejections": []
                    })),
                    solution_json(1, vec![300, 302, 303], no_rejections()),
                ]
            }]
        }
    })
    .to_string()
}

fn contexts() -> (EvalContext, EvalContext) {
    (
        EvalContext::new(SolutionSetId(0), SolutionId(0)),
        EvalContext::new(SolutionSetId(0), SolutionId(1)),
    )
}

// ============================================================================
// Wire format round trip
// ============================================================================

#[test]
fn test_document_survives_a_serialization_round_trip() {
    let text = standard_document();
    let first = parse_document(&text).unwrap();
    let re_encoded = to_document_string(&first).unwrap();
    let second = parse_document(&re_encoded).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_round_trip_keeps_wire_quirks() {
    let text = standard_document();
    let document = parse_document(&text).unwrap();
    let re_encoded = to_document_string(&document).unwrap();

    // Enum renderings, the singular cycle key, and the -1 sentinels all
    // survive re-encoding.
    assert!(re_encoded.contains("\"ConceptType.OBJECT\""));
    assert!(re_encoded.contains("\"CausalFlowDirection.FORWARD\""));
    assert!(re_encoded.contains("\"causal_cycle_con\""));
    assert!(re_encoded.contains("\"obj_id\":-1"));
    assert!(!re_encoded.contains("\"causal_cycle_cons\""));
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_full_document_loads() {
    init_tracing();
    let data = load_str(&standard_document()).unwrap();

    assert_eq!(data.graph.images.len(), 3);
    assert_eq!(data.graph.instance_count, 6);
    assert_eq!(data.hypotheses.len(), 6);
    assert_eq!(data.solution_sets.len(), 1);

    let sequence: Vec<ImageId> = data
        .graph
        .images_in_sequence()
        .iter()
        .map(|image| image.id)
        .collect();
    assert_eq!(sequence, vec![ImageId(100), ImageId(101), ImageId(102)]);
}

#[test]
fn test_scene_edges_are_derived_with_fresh_ids() {
    let data = load_str(&standard_document()).unwrap();

    // Highest wire edge id is 63; scene edges follow in hypothesis order.
    let scene_ids: Vec<EdgeId> = [300, 301, 302, 303]
        .iter()
        .map(|id| {
            data.hypotheses[&HypothesisId(*id)]
                .as_causal_sequence()
                .unwrap()
                .scene_edge
                .id
        })
        .collect();
    assert_eq!(scene_ids, vec![EdgeId(64), EdgeId(65), EdgeId(66), EdgeId(67)]);

    let causal = data.hypotheses[&HypothesisId(300)].as_causal_sequence().unwrap();
    assert_eq!(causal.scene_edge.source, NodeId(20));
    assert_eq!(causal.scene_edge.target, NodeId(21));
}

#[test]
fn test_dangling_reference_aborts_the_load() {
    let mut document: Value = serde_json::from_str(&standard_document()).unwrap();
    document["sensemaker_data"]["knowledge_graph"]["edges"] =
        json!([edge_json(30, 2, 999, "causes")]);
    match load_str(&document.to_string()) {
        Err(LoadError::DanglingReference {
            referrer_kind: "Edge",
            referrer_id: 30,
            target_kind: "Node",
            target_id: 999,
        }) => {}
        other => panic!("expected dangling edge target, got {other:?}"),
    }
}

#[test]
fn test_solution_set_without_solutions_fails_to_load() {
    let mut document: Value = serde_json::from_str(&standard_document()).unwrap();
    document["sensemaker_data"]["solution_sets"][0]["solutions"] = json!([]);
    match load_str(&document.to_string()) {
        Err(LoadError::EmptySolutionSet(0)) => {}
        other => panic!("expected empty solution set error, got {other:?}"),
    }
}

// ============================================================================
// Scoring and queries
// ============================================================================

#[test]
fn test_same_object_score_sums_weighted_evidence() {
    let data = load_str(&standard_document()).unwrap();
    let (ctx, _) = contexts();

    // 0.8 * 0.5 + 0.6 * 0.3
    let score = data.score(HypothesisId(200), ctx).unwrap();
    approx::assert_relative_eq!(score, 0.58, epsilon = 1e-12);
}

#[test]
fn test_continuity_bonus_is_gated_on_the_joining_hypothesis() {
    let data = load_str(&standard_document()).unwrap();
    let (accepting, rejecting) = contexts();

    // 2.0 of path evidence plus the 1.5 bonus while 200 is accepted; the
    // raw continuity score of 0.7 never enters either value.
    let with_bonus = data.score(HypothesisId(303), accepting).unwrap();
    let without = data.score(HypothesisId(303), rejecting).unwrap();
    approx::assert_relative_eq!(with_bonus, 3.5);
    approx::assert_relative_eq!(without, 2.0);
}

#[test]
fn test_canon_takes_accepted_hypotheses_and_breaks_ties_low() {
    let data = load_str(&standard_document()).unwrap();
    let (ctx, _) = contexts();

    let canon = data.canon_causal_sequence(ctx).unwrap();
    assert_eq!(canon.len(), 2);
    // 301 scores highest between images 0 and 1 but is not accepted; 300
    // and 302 tie at 5.0 and the lower id wins.
    assert_eq!(
        canon[&(0, 1)],
        CanonLink {
            hypothesis: HypothesisId(300),
            score: 5.0
        }
    );
    assert_eq!(canon[&(1, 2)].hypothesis, HypothesisId(303));
    assert!(!canon.contains_key(&(0, 2)));
}

#[test]
fn test_acceptance_is_total_after_loading() {
    let data = load_str(&standard_document()).unwrap();
    let (accepting, rejecting) = contexts();

    for id in data.hypotheses.keys() {
        data.accepted(*id, accepting).unwrap();
        data.accepted(*id, rejecting).unwrap();
    }
    assert!(data.accepted(HypothesisId(200), accepting).unwrap());
    assert!(!data.accepted(HypothesisId(200), rejecting).unwrap());
    assert!(!data.accepted(HypothesisId(301), accepting).unwrap());
}

#[test]
fn test_paired_scores_ignore_argument_order() {
    let data = load_str(&standard_document()).unwrap();
    let forward = data
        .paired_score(SolutionSetId(0), HypothesisId(300), HypothesisId(301))
        .unwrap();
    let backward = data
        .paired_score(SolutionSetId(0), HypothesisId(301), HypothesisId(300))
        .unwrap();
    assert_eq!(forward, Some(0.25));
    assert_eq!(backward, Some(0.25));
    assert_eq!(
        data.paired_score(SolutionSetId(0), HypothesisId(300), HypothesisId(302))
            .unwrap(),
        None
    );
}

#[test]
fn test_shared_contradictions_commute() {
    let data = load_str(&standard_document()).unwrap();
    let forward = data
        .shared_contradictions(HypothesisId(200), HypothesisId(201))
        .unwrap();
    let backward = data
        .shared_contradictions(HypothesisId(201), HypothesisId(200))
        .unwrap();
    assert_eq!(forward.len(), 1);
    assert_eq!(forward.len(), backward.len());
    assert_eq!(forward[0].kind_name(), "InImageTransCon");

    // The two same-object hypotheses do not share the flow contradiction.
    assert!(data
        .shared_contradictions(HypothesisId(200), HypothesisId(300))
        .unwrap()
        .is_empty());
}

#[test]
fn test_rejections_resolve_against_the_contradiction_table() {
    let data = load_str(&standard_document()).unwrap();
    let (ctx, _) = contexts();

    let rejections = data.rejections(HypothesisId(301), ctx).unwrap();
    assert_eq!(rejections.len(), 1);
    assert_eq!(rejections[0].kind_name(), "HypConRejection");

    let set = &data.solution_sets[&SolutionSetId(0)];
    let contradiction = set.contradiction(rejections[0].contradiction).unwrap();
    assert_eq!(contradiction.kind_name(), "CausalHypFlowCon");
    assert_eq!(
        contradiction.other_hypothesis(HypothesisId(301)),
        Some(HypothesisId(300))
    );
}

#[test]
fn test_density_score_normalizes_over_instances() {
    let data = load_str(&standard_document()).unwrap();
    // 6 instances: 2 / (6 * 5) * 0.9
    let density = data.density_score(SolutionSetId(0)).unwrap();
    approx::assert_relative_eq!(density, 0.06, epsilon = 1e-12);
}

#[test]
fn test_affect_curve_scores_resolve_per_parameter_set() {
    let data = load_str(&standard_document()).unwrap();
    let causal = data.hypotheses[&HypothesisId(300)].as_causal_sequence().unwrap();
    assert_eq!(causal.affect_curve_scores[&ParameterSetId(1)], 0.0);
}

// ============================================================================
// Provider
// ============================================================================

#[test]
fn test_load_through_a_directory_provider() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let name = DirectoryProvider::file_name(&[100, 101, 102]);
    std::fs::write(dir.path().join(name), standard_document()).unwrap();

    let provider = DirectoryProvider::new(dir.path());
    let data = load_from_provider(&provider, &[102, 100, 101]).unwrap();
    assert_eq!(data.graph.images.len(), 3);
    assert_eq!(data.graph.min_image_index, Some(0));
}

#[test]
fn test_missing_provider_document_surfaces_as_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let provider = DirectoryProvider::new(dir.path());
    match load_from_provider(&provider, &[1]) {
        Err(LoadError::Provider(_)) => {}
        other => panic!("expected provider error, got {other:?}"),
    }
}
