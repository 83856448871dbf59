//! Parameter sets, hypothesis sets, solutions, and solution sets.
//!
//! One solution set exists per parameter set and owns that run's scores,
//! hypothesis sets, contradictions, and candidate solutions. Solutions keep
//! their wire order; the first one is the default the producer intends to
//! be shown.

use std::collections::{BTreeMap, BTreeSet};

use crate::contradiction::Contradiction;
use crate::ids::{
    ContradictionId, HypothesisId, HypothesisSetId, ParameterSetId, SolutionId, SolutionSetId,
};

// ============================================================================
// Parameter sets
// ============================================================================

/// The weight/threshold knobs one sensemaking run was scored with.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    pub id: ParameterSetId,
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
// Unordered hypothesis pairs
// ============================================================================

/// Unordered pair of hypothesis ids, normalized so the lower id comes
/// first. Both argument orders produce the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairKey(HypothesisId, HypothesisId);

impl PairKey {
    pub fn new(a: HypothesisId, b: HypothesisId) -> Self {
        if a <= b {
            PairKey(a, b)
        } else {
            PairKey(b, a)
        }
    }

    pub fn low(&self) -> HypothesisId {
        self.0
    }

    pub fn high(&self) -> HypothesisId {
        self.1
    }
}

// ============================================================================
// Hypothesis sets
// ============================================================================

/// A group of hypotheses the producer constrained together. A set with a
/// `chain_sequence` is a causal hypothesis chain; the sequence orders the
/// same members the unordered list carries.
#[derive(Debug, Clone, PartialEq)]
pub struct HypothesisSet {
    pub id: HypothesisSetId,
    pub hypotheses: Vec<HypothesisId>,
    pub is_all_or_ex: bool,
    pub chain_sequence: Option<Vec<HypothesisId>>,
}

impl HypothesisSet {
    pub fn is_chain(&self) -> bool {
        self.chain_sequence.is_some()
    }

    pub fn contains(&self, hypothesis: HypothesisId) -> bool {
        self.hypotheses.contains(&hypothesis)
    }
}

// ============================================================================
// Rejections and solutions
// ============================================================================

/// What a rejected hypothesis lost to.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionCause {
    /// A single contradicting hypothesis won.
    Hypothesis(HypothesisId),
    /// A contradicting hypothesis set won.
    HypothesisSet(HypothesisSetId),
    /// The hypothesis closed a causal cycle with these others.
    Cycle(Vec<HypothesisId>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub rejected: HypothesisId,
    pub explanation: String,
    pub cause: RejectionCause,
    /// The contradiction this rejection resolved, within the owning
    /// solution set's contradiction table.
    pub contradiction: ContradictionId,
}

impl Rejection {
    /// Producer-side class name, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self.cause {
            RejectionCause::Hypothesis(_) => "HypConRejection",
            RejectionCause::HypothesisSet(_) => "HypSetConRejection",
            RejectionCause::Cycle(_) => "CausalCycleRejection",
        }
    }
}

/// One consistent assignment the solver produced for a parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub id: SolutionId,
    pub parameter_set: ParameterSetId,
    pub accepted_hypotheses: BTreeSet<HypothesisId>,
    pub accepted_hyp_sets: BTreeSet<HypothesisSetId>,
    pub energy: Option<f64>,
    pub rejections: Vec<Rejection>,
}

impl Solution {
    pub fn accepts(&self, hypothesis: HypothesisId) -> bool {
        self.accepted_hypotheses.contains(&hypothesis)
    }

    pub fn rejections_of(&self, hypothesis: HypothesisId) -> impl Iterator<Item = &Rejection> {
        self.rejections
            .iter()
            .filter(move |r| r.rejected == hypothesis)
    }
}

// ============================================================================
// Solution sets
// ============================================================================

/// Everything the solver produced for one parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionSet {
    pub id: SolutionSetId,
    pub parameter_set: ParameterSetId,
    pub individual_scores: BTreeMap<HypothesisId, f64>,
    pub paired_scores: BTreeMap<PairKey, f64>,
    pub hyp_sets: BTreeMap<HypothesisSetId, HypothesisSet>,
    pub contradictions: BTreeMap<ContradictionId, Contradiction>,
    /// Wire order. Never empty after a successful load.
    pub solutions: Vec<Solution>,
}

impl SolutionSet {
    /// The producer's preferred solution, first in wire order.
    pub fn default_solution(&self) -> Option<&Solution> {
        self.solutions.first()
    }

    pub fn solution(&self, id: SolutionId) -> Option<&Solution> {
        self.solutions.iter().find(|s| s.id == id)
    }

    pub fn individual_score(&self, hypothesis: HypothesisId) -> Option<f64> {
        self.individual_scores.get(&hypothesis).copied()
    }

    /// Paired score for an unordered hypothesis pair. Absence means no
    /// score was recorded, which is distinct from a recorded zero.
    pub fn paired_score(&self, a: HypothesisId, b: HypothesisId) -> Option<f64> {
        self.paired_scores.get(&PairKey::new(a, b)).copied()
    }

    pub fn hyp_set(&self, id: HypothesisSetId) -> Option<&HypothesisSet> {
        self.hyp_sets.get(&id)
    }

    pub fn contradiction(&self, id: ContradictionId) -> Option<&Contradiction> {
        self.contradictions.get(&id)
    }
}
