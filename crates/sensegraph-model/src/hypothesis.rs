//! Hypotheses and their annotation maps.
//!
//! A hypothesis is one struct: shared fields plus a kind payload. The three
//! annotation maps (individual scores, acceptance, contradiction ids) are
//! empty at construction and filled exactly once by the assembler's final
//! pass, after every solution set exists. They are read-only afterwards.

use std::collections::BTreeMap;

use sensegraph_format::enums::CausalFlowDirection;

use crate::evidence::{
    AttributeSimEv, CausalPathEv, ContinuityEv, EvidenceRef, MultiCausalPathEv, VisualSimEv,
};
use crate::graph::Edge;
use crate::ids::{ContradictionId, HypothesisId, NodeId, ParameterSetId, SolutionId, SolutionSetId};

/// Claim that two object nodes are the same physical object.
#[derive(Debug, Clone, PartialEq)]
pub struct SameObjectHyp {
    pub object_1: NodeId,
    pub object_2: NodeId,
    /// Synthesized `duplicate-of` edge between the two objects. Owned by
    /// the hypothesis; never part of the graph's edge table.
    pub edge: Edge,
    pub visual_sim_ev: VisualSimEv,
    pub attribute_sim_ev: AttributeSimEv,
}

/// Claim that one action leads to another.
#[derive(Debug, Clone, PartialEq)]
pub struct CausalSequenceHyp {
    pub source_action: NodeId,
    pub target_action: NodeId,
    /// Synthesized concept-level edge, as the producer wrote it.
    pub concept_edge: Edge,
    /// Derived action-level edge. Same relationship and weight as the
    /// concept edge, but instance endpoints, swapped when `direction` is
    /// backward so the edge always reads left to right in time.
    pub scene_edge: Edge,
    pub causal_path_evs: Vec<CausalPathEv>,
    pub multi_causal_path_evs: Vec<MultiCausalPathEv>,
    pub continuity_evs: Vec<ContinuityEv>,
    pub direction: CausalFlowDirection,
    /// Affect-curve score per parameter set. A missing entry for an active
    /// parameter set is a fatal query error, not a zero.
    pub affect_curve_scores: BTreeMap<ParameterSetId, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HypothesisKind {
    SameObject(SameObjectHyp),
    CausalSequence(CausalSequenceHyp),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hypothesis {
    pub id: HypothesisId,
    pub name: String,
    /// Hypotheses whose acceptance is a logical prerequisite of this one.
    pub premises: Vec<HypothesisId>,
    pub kind: HypothesisKind,
    /// Individual score per solution set, from the set's score table.
    pub individual_scores: BTreeMap<SolutionSetId, f64>,
    /// Acceptance per (solution set, solution). Total after assembly: one
    /// entry for every pair the load produced.
    pub acceptance: BTreeMap<(SolutionSetId, SolutionId), bool>,
    /// Contradictions naming this hypothesis, per solution set. Sets with
    /// no matches carry no entry.
    pub contradictions: BTreeMap<SolutionSetId, Vec<ContradictionId>>,
}

impl Hypothesis {
    pub fn new(
        id: HypothesisId,
        name: String,
        premises: Vec<HypothesisId>,
        kind: HypothesisKind,
    ) -> Self {
        Hypothesis {
            id,
            name,
            premises,
            kind,
            individual_scores: BTreeMap::new(),
            acceptance: BTreeMap::new(),
            contradictions: BTreeMap::new(),
        }
    }

    /// Producer-side class name, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            HypothesisKind::SameObject(_) => "SameObjectHyp",
            HypothesisKind::CausalSequence(_) => "CausalSequenceHyp",
        }
    }

    pub fn as_same_object(&self) -> Option<&SameObjectHyp> {
        match &self.kind {
            HypothesisKind::SameObject(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_causal_sequence(&self) -> Option<&CausalSequenceHyp> {
        match &self.kind {
            HypothesisKind::CausalSequence(h) => Some(h),
            _ => None,
        }
    }

    /// All evidence this hypothesis carries, in the producer's order.
    pub fn evidence(&self) -> Vec<EvidenceRef<'_>> {
        match &self.kind {
            HypothesisKind::SameObject(h) => vec![
                EvidenceRef::VisualSim(&h.visual_sim_ev),
                EvidenceRef::AttributeSim(&h.attribute_sim_ev),
            ],
            HypothesisKind::CausalSequence(h) => {
                let mut evidence = Vec::with_capacity(
                    h.causal_path_evs.len()
                        + h.multi_causal_path_evs.len()
                        + h.continuity_evs.len(),
                );
                evidence.extend(h.causal_path_evs.iter().map(EvidenceRef::CausalPath));
                evidence.extend(
                    h.multi_causal_path_evs
                        .iter()
                        .map(EvidenceRef::MultiCausalPath),
                );
                evidence.extend(h.continuity_evs.iter().map(EvidenceRef::Continuity));
                evidence
            }
        }
    }

    /// Edges this hypothesis synthesized (they exist nowhere else).
    pub fn owned_edges(&self) -> Vec<&Edge> {
        match &self.kind {
            HypothesisKind::SameObject(h) => vec![&h.edge],
            HypothesisKind::CausalSequence(h) => vec![&h.concept_edge, &h.scene_edge],
        }
    }
}
