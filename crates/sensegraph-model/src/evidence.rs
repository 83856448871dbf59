//! Evidence backing hypotheses.
//!
//! Each variant is a plain struct owned by its hypothesis; [`EvidenceRef`]
//! is the borrowed sum the scoring engine dispatches over. Raw scores are
//! computed by the producing engine and arrive on the wire; weighting
//! against a parameter set happens in the query layer.

use sensegraph_format::enums::CausalFlowDirection;

use crate::ids::{EvidenceId, HypothesisId, NodeId};
use crate::path::{GraphPath, MultiGraphPath};

/// Visual appearance similarity between two objects.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualSimEv {
    pub id: EvidenceId,
    pub score: f64,
    pub object_1: NodeId,
    pub object_2: NodeId,
}

/// Attribute overlap between two objects.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSimEv {
    pub id: EvidenceId,
    pub score: f64,
    pub object_1: NodeId,
    pub object_2: NodeId,
}

/// A commonsense concept path from one action's concept to another's.
#[derive(Debug, Clone, PartialEq)]
pub struct CausalPathEv {
    pub id: EvidenceId,
    pub score: f64,
    pub source_action: NodeId,
    pub target_action: NodeId,
    pub source_concept: NodeId,
    pub target_concept: NodeId,
    pub concept_path: GraphPath,
    pub direction: CausalFlowDirection,
}

/// Several converging concept paths between two actions.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiCausalPathEv {
    pub id: EvidenceId,
    pub score: f64,
    pub source_action: NodeId,
    pub target_action: NodeId,
    pub source_concepts: Vec<NodeId>,
    pub target_concepts: Vec<NodeId>,
    pub concept_path: MultiGraphPath,
    pub direction: CausalFlowDirection,
}

/// Object continuity between two actions: both actions involve objects an
/// accepted same-object hypothesis joins. The weighted score is a binary
/// bonus gated on the joining hypothesis's acceptance.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuityEv {
    pub id: EvidenceId,
    pub score: f64,
    pub source_action: NodeId,
    pub target_action: NodeId,
    pub source_object: NodeId,
    pub target_object: NodeId,
    pub joining_hyp: HypothesisId,
}

/// Borrowed view over any evidence variant.
#[derive(Debug, Clone, Copy)]
pub enum EvidenceRef<'a> {
    VisualSim(&'a VisualSimEv),
    AttributeSim(&'a AttributeSimEv),
    CausalPath(&'a CausalPathEv),
    MultiCausalPath(&'a MultiCausalPathEv),
    Continuity(&'a ContinuityEv),
}

impl EvidenceRef<'_> {
    pub fn id(&self) -> EvidenceId {
        match self {
            EvidenceRef::VisualSim(ev) => ev.id,
            EvidenceRef::AttributeSim(ev) => ev.id,
            EvidenceRef::CausalPath(ev) => ev.id,
            EvidenceRef::MultiCausalPath(ev) => ev.id,
            EvidenceRef::Continuity(ev) => ev.id,
        }
    }

    /// The producer-computed score, before parameter weighting.
    pub fn raw_score(&self) -> f64 {
        match self {
            EvidenceRef::VisualSim(ev) => ev.score,
            EvidenceRef::AttributeSim(ev) => ev.score,
            EvidenceRef::CausalPath(ev) => ev.score,
            EvidenceRef::MultiCausalPath(ev) => ev.score,
            EvidenceRef::Continuity(ev) => ev.score,
        }
    }

    /// Producer-side class name, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            EvidenceRef::VisualSim(_) => "VisualSimEv",
            EvidenceRef::AttributeSim(_) => "AttributeSimEv",
            EvidenceRef::CausalPath(_) => "CausalPathEv",
            EvidenceRef::MultiCausalPath(_) => "MultiCausalPathEv",
            EvidenceRef::Continuity(_) => "ContinuityEv",
        }
    }
}
