//! The `parameter_sets` and `solution_sets` sections of the wire document.
//!
//! Two producer quirks are part of the format:
//!
//! - The contradiction list for causal cycles is keyed `causal_cycle_con`,
//!   singular, unlike its four sibling lists.
//! - The producer's encoder misclassifies causal hypothesis chains as plain
//!   hypothesis sets, so `causal_hyp_chains` is empty in real documents and
//!   chain records may appear under `hypothesis_sets` without their
//!   `hyp_id_sequence`. `hyp_id_sequence` is therefore optional on the
//!   shared record and the import layer decides what each entry is.

use serde::{Deserialize, Serialize};

// ============================================================================
// Parameter sets
// ============================================================================

/// The weight/threshold knobs one sensemaking run was scored with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSetRecord {
    pub id: i64,
    pub name: String,
    pub visual_sim_ev_weight: f64,
    pub visual_sim_ev_thresh: f64,
    pub attribute_sim_ev_weight: f64,
    pub attribute_sim_ev_thresh: f64,
    pub causal_path_ev_weight: f64,
    pub causal_path_ev_thresh: f64,
    pub continuity_ev_weight: f64,
    pub continuity_ev_thresh: f64,
    pub density_weight: f64,
    pub affect_curve: Vec<i64>,
    pub affect_curve_weight: f64,
    pub affect_curve_thresh: f64,
}

// ============================================================================
// Scores and hypothesis sets
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualScoreRecord {
    pub id: i64,
    pub score: f64,
}

/// Paired score entry. `id_pair` comes from an unordered set on the
/// producer side; its two elements arrive in no particular order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedScoreRecord {
    pub id_pair: Vec<i64>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisSetRecord {
    pub id: i64,
    pub hypothesis_ids: Vec<i64>,
    pub is_all_or_ex: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyp_id_sequence: Option<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisSetsRecord {
    pub causal_hyp_chains: Vec<HypothesisSetRecord>,
    pub hypothesis_sets: Vec<HypothesisSetRecord>,
}

// ============================================================================
// Contradictions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InImageTransConRecord {
    pub id: i64,
    pub explanation: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub hypothesis_1_id: i64,
    pub hypothesis_2_id: i64,
    pub obj_1_id: i64,
    pub obj_2_id: i64,
    pub shared_obj_id: i64,
}

/// `hyp_set_id` is `-1` when the contradiction is not tied to a set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweenImageTransConRecord {
    pub id: i64,
    pub explanation: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub hypothesis_1_id: i64,
    pub hypothesis_2_id: i64,
    pub obj_1_id: i64,
    pub obj_2_id: i64,
    pub shared_obj_id: i64,
    pub joining_hyp_id: i64,
    pub hyp_set_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CausalHypFlowConRecord {
    pub id: i64,
    pub explanation: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub hypothesis_1_id: i64,
    pub hypothesis_2_id: i64,
    pub image_1_id: i64,
    pub image_2_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CausalChainFlowConRecord {
    pub id: i64,
    pub explanation: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub hyp_set_1_id: i64,
    pub hyp_set_2_id: i64,
    pub image_1_id: i64,
    pub image_2_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CausalCycleConRecord {
    pub id: i64,
    pub explanation: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub image_id: i64,
    pub causal_chain_id: i64,
    pub subset_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContradictionsRecord {
    pub in_image_trans_cons: Vec<InImageTransConRecord>,
    pub tween_image_trans_cons: Vec<TweenImageTransConRecord>,
    pub causal_hyp_flow_cons: Vec<CausalHypFlowConRecord>,
    pub causal_chain_flow_cons: Vec<CausalChainFlowConRecord>,
    #[serde(rename = "causal_cycle_con")]
    pub causal_cycle_cons: Vec<CausalCycleConRecord>,
}

// ============================================================================
// Rejections and solutions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypConRejectionRecord {
    pub rejected_hyp_id: i64,
    pub explanation: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub contradicting_hyp_id: i64,
    pub contradiction_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypSetConRejectionRecord {
    pub rejected_hyp_id: i64,
    pub explanation: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub contradicting_hyp_set_id: i64,
    pub contradiction_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CausalCycleRejectionRecord {
    pub rejected_hyp_id: i64,
    pub explanation: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub contradicting_hyp_ids: Vec<i64>,
    pub contradiction_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectionsRecord {
    pub hyp_con_rejections: Vec<HypConRejectionRecord>,
    pub hyp_set_con_rejections: Vec<HypSetConRejectionRecord>,
    pub causal_cycle_rejections: Vec<CausalCycleRejectionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionRecord {
    pub id: i64,
    pub parameter_set_id: i64,
    pub accepted_hypothesis_ids: Vec<i64>,
    pub accepted_hyp_set_ids: Vec<i64>,
    pub energy: Option<f64>,
    pub rejections: RejectionsRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionSetRecord {
    pub id: i64,
    pub parameter_set_id: i64,
    pub individual_scores: Vec<IndividualScoreRecord>,
    pub paired_scores: Vec<PairedScoreRecord>,
    pub hyp_sets: HypothesisSetsRecord,
    pub contradictions: ContradictionsRecord,
    pub solutions: Vec<SolutionRecord>,
}
