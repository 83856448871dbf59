//! Contradiction variants reported by the reasoning engine.
//!
//! Three variants are pairwise (two named hypotheses), two are set-scoped.
//! The set-scoped ones carry a `participants` set materialized at load time
//! from their hypothesis sets' members, so membership checks never need the
//! sets again. Contradiction ids are unique within one solution set, not
//! across the document.

use std::collections::BTreeSet;

use crate::ids::{ContradictionId, HypothesisId, HypothesisSetId, ImageId, NodeId};

/// Two same-object claims inside one image that would merge three objects.
#[derive(Debug, Clone, PartialEq)]
pub struct InImageTransCon {
    pub id: ContradictionId,
    pub explanation: String,
    pub hypothesis_1: HypothesisId,
    pub hypothesis_2: HypothesisId,
    pub object_1: NodeId,
    pub object_2: NodeId,
    pub shared_object: NodeId,
}

/// Same shape as [`InImageTransCon`] but spanning two images, bridged by a
/// joining same-object hypothesis. `hyp_set` is absent when the producer
/// found no owning set.
#[derive(Debug, Clone, PartialEq)]
pub struct TweenImageTransCon {
    pub id: ContradictionId,
    pub explanation: String,
    pub hypothesis_1: HypothesisId,
    pub hypothesis_2: HypothesisId,
    pub object_1: NodeId,
    pub object_2: NodeId,
    pub shared_object: NodeId,
    pub joining_hyp: HypothesisId,
    pub hyp_set: Option<HypothesisSetId>,
}

/// Two causal hypotheses whose flow directions disagree between two images.
#[derive(Debug, Clone, PartialEq)]
pub struct CausalHypFlowCon {
    pub id: ContradictionId,
    pub explanation: String,
    pub hypothesis_1: HypothesisId,
    pub hypothesis_2: HypothesisId,
    pub image_1: ImageId,
    pub image_2: ImageId,
}

/// Two causal chains whose flow directions disagree between two images.
#[derive(Debug, Clone, PartialEq)]
pub struct CausalChainFlowCon {
    pub id: ContradictionId,
    pub explanation: String,
    pub hyp_set_1: HypothesisSetId,
    pub hyp_set_2: HypothesisSetId,
    pub image_1: ImageId,
    pub image_2: ImageId,
    /// Members of both hypothesis sets.
    pub participants: BTreeSet<HypothesisId>,
}

/// A causal chain that loops back into one image.
#[derive(Debug, Clone, PartialEq)]
pub struct CausalCycleCon {
    pub id: ContradictionId,
    pub explanation: String,
    pub image: ImageId,
    pub causal_chain: HypothesisSetId,
    /// Subsets of the chain that each close the cycle on their own.
    pub subsets: Vec<HypothesisSetId>,
    /// Members of the chain and every violating subset.
    pub participants: BTreeSet<HypothesisId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Contradiction {
    InImageTrans(InImageTransCon),
    TweenImageTrans(TweenImageTransCon),
    CausalHypFlow(CausalHypFlowCon),
    CausalChainFlow(CausalChainFlowCon),
    CausalCycle(CausalCycleCon),
}

impl Contradiction {
    pub fn id(&self) -> ContradictionId {
        match self {
            Contradiction::InImageTrans(c) => c.id,
            Contradiction::TweenImageTrans(c) => c.id,
            Contradiction::CausalHypFlow(c) => c.id,
            Contradiction::CausalChainFlow(c) => c.id,
            Contradiction::CausalCycle(c) => c.id,
        }
    }

    pub fn explanation(&self) -> &str {
        match self {
            Contradiction::InImageTrans(c) => &c.explanation,
            Contradiction::TweenImageTrans(c) => &c.explanation,
            Contradiction::CausalHypFlow(c) => &c.explanation,
            Contradiction::CausalChainFlow(c) => &c.explanation,
            Contradiction::CausalCycle(c) => &c.explanation,
        }
    }

    /// Producer-side class name, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Contradiction::InImageTrans(_) => "InImageTransCon",
            Contradiction::TweenImageTrans(_) => "TweenImageTransCon",
            Contradiction::CausalHypFlow(_) => "CausalHypFlowCon",
            Contradiction::CausalChainFlow(_) => "CausalChainFlowCon",
            Contradiction::CausalCycle(_) => "CausalCycleCon",
        }
    }

    /// The two named parties of a pairwise variant. Set-scoped variants
    /// have participant sets instead and return `None`.
    pub fn hypothesis_pair(&self) -> Option<(HypothesisId, HypothesisId)> {
        match self {
            Contradiction::InImageTrans(c) => Some((c.hypothesis_1, c.hypothesis_2)),
            Contradiction::TweenImageTrans(c) => Some((c.hypothesis_1, c.hypothesis_2)),
            Contradiction::CausalHypFlow(c) => Some((c.hypothesis_1, c.hypothesis_2)),
            Contradiction::CausalChainFlow(_) | Contradiction::CausalCycle(_) => None,
        }
    }

    /// Whether `hypothesis` is a party to this contradiction. For pairwise
    /// variants that means one of the two named hypotheses (the tween
    /// variant's joining hypothesis is context, not a party).
    pub fn has_hypothesis(&self, hypothesis: HypothesisId) -> bool {
        match self {
            Contradiction::CausalChainFlow(c) => c.participants.contains(&hypothesis),
            Contradiction::CausalCycle(c) => c.participants.contains(&hypothesis),
            _ => match self.hypothesis_pair() {
                Some((a, b)) => a == hypothesis || b == hypothesis,
                None => false,
            },
        }
    }

    /// The opposing party of a pairwise variant, given one side.
    pub fn other_hypothesis(&self, hypothesis: HypothesisId) -> Option<HypothesisId> {
        let (a, b) = self.hypothesis_pair()?;
        if hypothesis == a {
            Some(b)
        } else if hypothesis == b {
            Some(a)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairwise_fixture() -> Contradiction {
        Contradiction::InImageTrans(InImageTransCon {
            id: ContradictionId(1),
            explanation: "objects 10 and 11 both claim object 12".to_string(),
            hypothesis_1: HypothesisId(200),
            hypothesis_2: HypothesisId(201),
            object_1: NodeId(10),
            object_2: NodeId(11),
            shared_object: NodeId(12),
        })
    }

    #[test]
    fn other_hypothesis_flips_both_ways() {
        let con = pairwise_fixture();
        assert_eq!(con.other_hypothesis(HypothesisId(200)), Some(HypothesisId(201)));
        assert_eq!(con.other_hypothesis(HypothesisId(201)), Some(HypothesisId(200)));
        assert_eq!(con.other_hypothesis(HypothesisId(999)), None);
    }

    #[test]
    fn joining_hypothesis_is_not_a_party() {
        let con = Contradiction::TweenImageTrans(TweenImageTransCon {
            id: ContradictionId(2),
            explanation: String::new(),
            hypothesis_1: HypothesisId(200),
            hypothesis_2: HypothesisId(201),
            object_1: NodeId(10),
            object_2: NodeId(11),
            shared_object: NodeId(12),
            joining_hyp: HypothesisId(202),
            hyp_set: None,
        });
        assert!(con.has_hypothesis(HypothesisId(200)));
        assert!(con.has_hypothesis(HypothesisId(201)));
        assert!(!con.has_hypothesis(HypothesisId(202)));
    }

    #[test]
    fn set_scoped_membership_uses_participants() {
        let con = Contradiction::CausalCycle(CausalCycleCon {
            id: ContradictionId(3),
            explanation: String::new(),
            image: ImageId(100),
            causal_chain: HypothesisSetId(5),
            subsets: vec![HypothesisSetId(6)],
            participants: [HypothesisId(300), HypothesisId(301)].into_iter().collect(),
        });
        assert!(con.has_hypothesis(HypothesisId(300)));
        assert!(!con.has_hypothesis(HypothesisId(302)));
        assert_eq!(con.hypothesis_pair(), None);
        assert_eq!(con.other_hypothesis(HypothesisId(300)), None);
    }
}
