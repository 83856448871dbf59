//! Concept paths through the knowledge graph.
//!
//! Paths back causal evidence: a walk from a source concept to a target
//! concept over commonsense-bridged edges. Steps are doubly linked by step
//! id within their own path. Paths are built once at load and never change
//! afterwards.

use crate::ids::{EdgeId, NodeId, PathId, StepId};

/// One position of a path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathStep {
    pub id: StepId,
    pub node: NodeId,
    pub next_step: Option<StepId>,
    pub next_edge: Option<EdgeId>,
    pub previous_step: Option<StepId>,
    pub previous_edge: Option<EdgeId>,
}

/// A finite walk over single nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPath {
    pub id: PathId,
    pub steps: Vec<PathStep>,
}

impl GraphPath {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, id: StepId) -> Option<&PathStep> {
        self.steps.iter().find(|step| step.id == id)
    }

    pub fn first(&self) -> Option<&PathStep> {
        self.steps.first()
    }

    pub fn last(&self) -> Option<&PathStep> {
        self.steps.last()
    }

    /// The nodes visited, in step order.
    pub fn node_sequence(&self) -> Vec<NodeId> {
        self.steps.iter().map(|step| step.node).collect()
    }
}

/// One position of a multi-path, holding several parallel nodes and the
/// edges crossing to the neighboring position.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPathStep {
    pub id: StepId,
    pub nodes: Vec<NodeId>,
    pub next_step: Option<StepId>,
    pub next_edges: Vec<EdgeId>,
    pub previous_step: Option<StepId>,
    pub previous_edges: Vec<EdgeId>,
}

/// A finite walk where several concept paths run in parallel.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiGraphPath {
    pub id: PathId,
    pub steps: Vec<MultiPathStep>,
}

impl MultiGraphPath {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, id: StepId) -> Option<&MultiPathStep> {
        self.steps.iter().find(|step| step.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_sequence_follows_step_order() {
        let path = GraphPath {
            id: PathId(0),
            steps: vec![
                PathStep {
                    id: StepId(0),
                    node: NodeId(5),
                    next_step: Some(StepId(1)),
                    next_edge: Some(EdgeId(9)),
                    previous_step: None,
                    previous_edge: None,
                },
                PathStep {
                    id: StepId(1),
                    node: NodeId(6),
                    next_step: None,
                    next_edge: None,
                    previous_step: Some(StepId(0)),
                    previous_edge: Some(EdgeId(9)),
                },
            ],
        };
        assert_eq!(path.node_sequence(), vec![NodeId(5), NodeId(6)]);
        assert_eq!(path.step(StepId(1)).unwrap().previous_edge, Some(EdgeId(9)));
        assert_eq!(path.first().unwrap().id, StepId(0));
        assert_eq!(path.last().unwrap().id, StepId(1));
    }
}
