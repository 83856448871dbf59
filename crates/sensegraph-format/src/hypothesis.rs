//! The `hypotheses` section of the wire document.
//!
//! Hypothesis-owned edges (the identity edge of a same-object hypothesis,
//! the concept edge of a causal-sequence hypothesis) are not part of the
//! knowledge graph's edge table, so the producer embeds the whole edge
//! record in the hypothesis. Evidence records nest the same way. Paths are
//! self-contained: step ids link steps within their own path only.

use serde::{Deserialize, Serialize};

use crate::enums::CausalFlowDirection;
use crate::graph::EdgeRecord;

// ============================================================================
// Paths
// ============================================================================

/// One step of a concept path. Next/previous ids are `-1` at the path ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub id: i64,
    pub node_id: i64,
    pub next_step_id: i64,
    pub next_edge_id: i64,
    pub previous_step_id: i64,
    pub previous_edge_id: i64,
}

/// A step holding several parallel nodes and crossing edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiStepRecord {
    pub id: i64,
    pub node_ids: Vec<i64>,
    pub next_step_id: i64,
    pub next_edge_ids: Vec<i64>,
    pub previous_step_id: i64,
    pub previous_edge_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRecord {
    pub id: i64,
    pub steps: Vec<StepRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiPathRecord {
    pub id: i64,
    pub steps: Vec<MultiStepRecord>,
}

// ============================================================================
// Evidence
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualSimEvRecord {
    pub id: i64,
    pub score: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub object_1_id: i64,
    pub object_2_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSimEvRecord {
    pub id: i64,
    pub score: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub object_1_id: i64,
    pub object_2_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CausalPathEvRecord {
    pub id: i64,
    pub score: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub source_action_id: i64,
    pub target_action_id: i64,
    pub source_concept_id: i64,
    pub target_concept_id: i64,
    pub concept_path: PathRecord,
    pub direction: CausalFlowDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiCausalPathEvRecord {
    pub id: i64,
    pub score: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub source_action_id: i64,
    pub target_action_id: i64,
    pub source_concept_ids: Vec<i64>,
    pub target_concept_ids: Vec<i64>,
    pub concept_path: MultiPathRecord,
    pub direction: CausalFlowDirection,
}

/// Continuity evidence. `joining_hyp_id` may be a forward reference into
/// either hypothesis list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuityEvRecord {
    pub id: i64,
    pub score: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub source_action_id: i64,
    pub target_action_id: i64,
    pub source_object_id: i64,
    pub target_object_id: i64,
    pub joining_hyp_id: i64,
}

// ============================================================================
// Hypotheses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SameObjectHypRecord {
    pub id: i64,
    pub name: String,
    pub premise_ids: Vec<i64>,
    #[serde(rename = "type")]
    pub kind: String,
    pub object_1_id: i64,
    pub object_2_id: i64,
    pub edge: EdgeRecord,
    pub visual_sim_ev: VisualSimEvRecord,
    pub attribute_sim_ev: AttributeSimEvRecord,
}

/// Per-parameter-set affect-curve score entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectCurveScoreRecord {
    pub pset_id: i64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CausalSequenceHypRecord {
    pub id: i64,
    pub name: String,
    pub premise_ids: Vec<i64>,
    #[serde(rename = "type")]
    pub kind: String,
    pub source_action_id: i64,
    pub target_action_id: i64,
    pub edge: EdgeRecord,
    pub causal_path_evs: Vec<CausalPathEvRecord>,
    pub multi_causal_path_evs: Vec<MultiCausalPathEvRecord>,
    pub continuity_evs: Vec<ContinuityEvRecord>,
    pub direction: CausalFlowDirection,
    pub affect_curve_scores: Vec<AffectCurveScoreRecord>,
}

/// The kind-partitioned `hypotheses` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesesRecord {
    pub same_object_hyps: Vec<SameObjectHypRecord>,
    pub causal_sequence_hyps: Vec<CausalSequenceHypRecord>,
}
