//! The resolved sensemaker data model and its query engine.
//!
//! `sensegraph-format` mirrors the wire document with records carrying raw
//! integer ids; `sensegraph-import` resolves those records into this
//! crate's types. What comes out of a load is a [`SensemakerData`]
//! snapshot: id-keyed tables plus typed-id references between them. The
//! snapshot is immutable and owns all of its data, so readers on multiple
//! threads may query it concurrently with no locking.
//!
//! - `ids`: typed id newtypes, one per entity kind
//! - `graph`: the knowledge graph (commonsense data, images, nodes, edges)
//! - `path`: paths through the concept layer, carried by causal evidence
//! - `evidence`: the five evidence kinds and their borrowed dispatch enum
//! - `hypothesis`: the two hypothesis kinds and their annotation maps
//! - `contradiction`: the five contradiction variants
//! - `solution`: parameter sets, hypothesis sets, solutions, solution sets
//! - `query`: scoring, acceptance, canon-sequence and contradiction queries

use std::collections::BTreeMap;

pub mod contradiction;
pub mod evidence;
pub mod graph;
pub mod hypothesis;
pub mod ids;
pub mod path;
pub mod query;
pub mod solution;

// Re-export key types
pub use contradiction::Contradiction;
pub use evidence::EvidenceRef;
pub use graph::{Edge, KnowledgeGraph, Node, NodePayload};
pub use hypothesis::{Hypothesis, HypothesisKind};
pub use ids::{
    CommonSenseEdgeId, CommonSenseNodeId, ContradictionId, EdgeId, EvidenceId, HypothesisId,
    HypothesisSetId, ImageId, NodeId, ParameterSetId, PathId, SolutionId, SolutionSetId, StepId,
};
pub use query::{CanonLink, EvalContext, QueryError};
pub use solution::{PairKey, ParameterSet, Rejection, Solution, SolutionSet};

/// Everything one sensemaker output document resolves into.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SensemakerData {
    pub graph: KnowledgeGraph,
    pub hypotheses: BTreeMap<HypothesisId, Hypothesis>,
    pub parameter_sets: BTreeMap<ParameterSetId, ParameterSet>,
    pub solution_sets: BTreeMap<SolutionSetId, SolutionSet>,
}

impl SensemakerData {
    pub fn hypothesis(&self, id: HypothesisId) -> Option<&Hypothesis> {
        self.hypotheses.get(&id)
    }

    pub fn parameter_set(&self, id: ParameterSetId) -> Option<&ParameterSet> {
        self.parameter_sets.get(&id)
    }

    pub fn solution_set(&self, id: SolutionSetId) -> Option<&SolutionSet> {
        self.solution_sets.get(&id)
    }

    pub fn same_object_hyps(&self) -> impl Iterator<Item = &Hypothesis> {
        self.hypotheses
            .values()
            .filter(|h| h.as_same_object().is_some())
    }

    pub fn causal_sequence_hyps(&self) -> impl Iterator<Item = &Hypothesis> {
        self.hypotheses
            .values()
            .filter(|h| h.as_causal_sequence().is_some())
    }
}
