//! The read-only scoring and query surface.
//!
//! Every operation is a pure function of the resolved data plus an explicit
//! [`EvalContext`]. There is no ambient "current solution" anywhere in this
//! crate; whichever selection a caller considers active is the caller's
//! state, passed in per call.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::contradiction::Contradiction;
use crate::evidence::EvidenceRef;
use crate::graph::Edge;
use crate::hypothesis::HypothesisKind;
use crate::ids::{HypothesisId, ParameterSetId, SolutionId, SolutionSetId};
use crate::solution::{ParameterSet, Rejection, Solution, SolutionSet};
use crate::SensemakerData;

/// The (solution set, solution) pair a score or acceptance is evaluated
/// against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalContext {
    pub solution_set: SolutionSetId,
    pub solution: SolutionId,
}

impl EvalContext {
    pub fn new(solution_set: SolutionSetId, solution: SolutionId) -> Self {
        EvalContext {
            solution_set,
            solution,
        }
    }
}

/// The canon causal link chosen for one normalized image-index pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonLink {
    pub hypothesis: HypothesisId,
    pub score: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown solution set {0}")]
    UnknownSolutionSet(SolutionSetId),

    #[error("solution set {solution_set} has no solution {solution}")]
    UnknownSolution {
        solution_set: SolutionSetId,
        solution: SolutionId,
    },

    #[error("unknown parameter set {0}")]
    UnknownParameterSet(ParameterSetId),

    #[error("unknown hypothesis {0}")]
    UnknownHypothesis(HypothesisId),

    #[error(
        "hypothesis {hypothesis} has no acceptance entry for solution set \
         {solution_set}, solution {solution}"
    )]
    UnresolvedContext {
        hypothesis: HypothesisId,
        solution_set: SolutionSetId,
        solution: SolutionId,
    },

    #[error("hypothesis {hypothesis} has no affect curve score for parameter set {parameter_set}")]
    MissingAffectCurveScore {
        hypothesis: HypothesisId,
        parameter_set: ParameterSetId,
    },
}

impl SensemakerData {
    fn context_parts(
        &self,
        ctx: EvalContext,
    ) -> Result<(&SolutionSet, &ParameterSet, &Solution), QueryError> {
        let set = self
            .solution_sets
            .get(&ctx.solution_set)
            .ok_or(QueryError::UnknownSolutionSet(ctx.solution_set))?;
        let params = self
            .parameter_sets
            .get(&set.parameter_set)
            .ok_or(QueryError::UnknownParameterSet(set.parameter_set))?;
        let solution = set.solution(ctx.solution).ok_or(QueryError::UnknownSolution {
            solution_set: ctx.solution_set,
            solution: ctx.solution,
        })?;
        Ok((set, params, solution))
    }

    /// Weighted score of one piece of evidence under the context's
    /// parameter set. Continuity evidence is a binary bonus: the continuity
    /// weight when its joining hypothesis is accepted, zero otherwise; its
    /// raw score never enters the product.
    pub fn weighted_score(
        &self,
        evidence: EvidenceRef<'_>,
        ctx: EvalContext,
    ) -> Result<f64, QueryError> {
        let (_, params, solution) = self.context_parts(ctx)?;
        let weighted = match evidence {
            EvidenceRef::VisualSim(ev) => ev.score * params.visual_sim_ev_weight,
            EvidenceRef::AttributeSim(ev) => ev.score * params.attribute_sim_ev_weight,
            EvidenceRef::CausalPath(ev) => ev.score * params.causal_path_ev_weight,
            EvidenceRef::MultiCausalPath(ev) => ev.score * params.causal_path_ev_weight,
            EvidenceRef::Continuity(ev) => {
                if solution.accepts(ev.joining_hyp) {
                    params.continuity_ev_weight
                } else {
                    0.0
                }
            }
        };
        Ok(weighted)
    }

    /// Total score of a hypothesis under the context: the sum of its
    /// evidence's weighted scores, plus (for causal hypotheses) its affect
    /// curve score for the context's parameter set. Thresholds and the
    /// density normalization are not part of this value.
    pub fn score(&self, hypothesis: HypothesisId, ctx: EvalContext) -> Result<f64, QueryError> {
        let hyp = self
            .hypothesis(hypothesis)
            .ok_or(QueryError::UnknownHypothesis(hypothesis))?;
        let (set, _, _) = self.context_parts(ctx)?;

        let mut total = 0.0;
        for evidence in hyp.evidence() {
            total += self.weighted_score(evidence, ctx)?;
        }
        if let HypothesisKind::CausalSequence(causal) = &hyp.kind {
            let affect = causal
                .affect_curve_scores
                .get(&set.parameter_set)
                .copied()
                .ok_or(QueryError::MissingAffectCurveScore {
                    hypothesis,
                    parameter_set: set.parameter_set,
                })?;
            total += affect;
        }
        Ok(total)
    }

    /// Display-only density normalization, `2 / (n(n-1))` over the graph's
    /// instance count times the set's density weight. Undefined for fewer
    /// than two instances; returns 0.0 there.
    pub fn density_score(&self, solution_set: SolutionSetId) -> Result<f64, QueryError> {
        let set = self
            .solution_sets
            .get(&solution_set)
            .ok_or(QueryError::UnknownSolutionSet(solution_set))?;
        let params = self
            .parameter_sets
            .get(&set.parameter_set)
            .ok_or(QueryError::UnknownParameterSet(set.parameter_set))?;
        if self.graph.instance_count <= 1 {
            return Ok(0.0);
        }
        let n = self.graph.instance_count as f64;
        Ok(2.0 / (n * (n - 1.0)) * params.density_weight)
    }

    /// Whether the context's solution accepted the hypothesis. Every
    /// hypothesis has an entry for every context after a successful load; a
    /// missing entry means the caller is querying unassembled state.
    pub fn accepted(&self, hypothesis: HypothesisId, ctx: EvalContext) -> Result<bool, QueryError> {
        self.context_parts(ctx)?;
        let hyp = self
            .hypothesis(hypothesis)
            .ok_or(QueryError::UnknownHypothesis(hypothesis))?;
        hyp.acceptance
            .get(&(ctx.solution_set, ctx.solution))
            .copied()
            .ok_or(QueryError::UnresolvedContext {
                hypothesis,
                solution_set: ctx.solution_set,
                solution: ctx.solution,
            })
    }

    /// Every contradiction naming the hypothesis as a party, across all
    /// solution sets, in ascending (solution set, contradiction) order.
    pub fn contradictions(
        &self,
        hypothesis: HypothesisId,
    ) -> Result<Vec<&Contradiction>, QueryError> {
        let hyp = self
            .hypothesis(hypothesis)
            .ok_or(QueryError::UnknownHypothesis(hypothesis))?;
        let mut found = Vec::new();
        for (set_id, contradiction_ids) in &hyp.contradictions {
            if let Some(set) = self.solution_sets.get(set_id) {
                // Ids recorded during assembly always resolve within their set.
                found.extend(
                    contradiction_ids
                        .iter()
                        .filter_map(|id| set.contradiction(*id)),
                );
            }
        }
        Ok(found)
    }

    /// Contradictions naming BOTH hypotheses as parties. Commutative: any
    /// contradiction in the result answers `has_hypothesis` for each
    /// argument, so swapping the arguments returns the same list.
    pub fn shared_contradictions(
        &self,
        a: HypothesisId,
        b: HypothesisId,
    ) -> Result<Vec<&Contradiction>, QueryError> {
        if self.hypothesis(b).is_none() {
            return Err(QueryError::UnknownHypothesis(b));
        }
        let shared = self
            .contradictions(a)?
            .into_iter()
            .filter(|c| c.has_hypothesis(b))
            .collect();
        Ok(shared)
    }

    /// Recorded paired score for an unordered hypothesis pair. `None` means
    /// no score was recorded, which callers must not conflate with 0.0.
    pub fn paired_score(
        &self,
        solution_set: SolutionSetId,
        a: HypothesisId,
        b: HypothesisId,
    ) -> Result<Option<f64>, QueryError> {
        let set = self
            .solution_sets
            .get(&solution_set)
            .ok_or(QueryError::UnknownSolutionSet(solution_set))?;
        Ok(set.paired_score(a, b))
    }

    /// The canon causal sequence of the context's solution: for each
    /// normalized image-index pair, the accepted causal hypothesis between
    /// those images with the highest score. Equal scores break toward the
    /// lowest hypothesis id. Pairs with no accepted candidate are absent.
    pub fn canon_causal_sequence(
        &self,
        ctx: EvalContext,
    ) -> Result<BTreeMap<(i64, i64), CanonLink>, QueryError> {
        let (_, _, solution) = self.context_parts(ctx)?;
        let mut canon: BTreeMap<(i64, i64), CanonLink> = BTreeMap::new();
        for (id, hypothesis) in &self.hypotheses {
            let causal = match &hypothesis.kind {
                HypothesisKind::CausalSequence(causal) => causal,
                HypothesisKind::SameObject(_) => continue,
            };
            if !solution.accepts(*id) {
                continue;
            }
            let pair = match self.normalized_edge_pair(&causal.scene_edge) {
                Some(pair) => pair,
                None => continue,
            };
            let score = self.score(*id, ctx)?;
            let replace = match canon.get(&pair) {
                Some(best) => score > best.score,
                None => true,
            };
            if replace {
                canon.insert(
                    pair,
                    CanonLink {
                        hypothesis: *id,
                        score,
                    },
                );
            }
        }
        Ok(canon)
    }

    /// The context solution's rejections of the given hypothesis.
    pub fn rejections(
        &self,
        hypothesis: HypothesisId,
        ctx: EvalContext,
    ) -> Result<Vec<&Rejection>, QueryError> {
        if self.hypothesis(hypothesis).is_none() {
            return Err(QueryError::UnknownHypothesis(hypothesis));
        }
        let (_, _, solution) = self.context_parts(ctx)?;
        Ok(solution.rejections_of(hypothesis).collect())
    }

    /// Unordered pair of the normalized canonical-image indices of an
    /// edge's endpoints. `None` when either endpoint has no image.
    fn normalized_edge_pair(&self, edge: &Edge) -> Option<(i64, i64)> {
        let a = self.graph.normalized_first_index(edge.source)?;
        let b = self.graph.normalized_first_index(edge.target)?;
        Some(if a <= b { (a, b) } else { (b, a) })
    }
}
