//! Parameter-set and solution-set assembly, plus the final annotation pass.
//!
//! Everything here runs after the graph and hypothesis tables are complete,
//! so references into them resolve immediately. Within one solution set the
//! build order matters: scores, then hypothesis sets, then contradictions
//! (chain-flow and cycle contradictions name the sets), then solutions
//! (rejections name the contradictions).
//!
//! One producer quirk is repaired here. The encoder writes causal
//! hypothesis chains into the `hypothesis_sets` list, so `causal_hyp_chains`
//! is empty in real documents. Any set record carrying a `hyp_id_sequence`
//! is really a chain and gets promoted, with a warning; a record under
//! `causal_hyp_chains` without a sequence is malformed outright.

use std::collections::{BTreeMap, BTreeSet};

use sensegraph_format::optional_id;
use sensegraph_format::solution::{
    CausalCycleRejectionRecord, HypConRejectionRecord, HypSetConRejectionRecord,
    HypothesisSetRecord, ParameterSetRecord, SolutionRecord, SolutionSetRecord,
};
use sensegraph_model::contradiction::{
    CausalChainFlowCon, CausalCycleCon, CausalHypFlowCon, Contradiction, InImageTransCon,
    TweenImageTransCon,
};
use sensegraph_model::graph::KnowledgeGraph;
use sensegraph_model::hypothesis::Hypothesis;
use sensegraph_model::ids::{
    ContradictionId, HypothesisId, HypothesisSetId, ImageId, NodeId, ParameterSetId, SolutionId,
    SolutionSetId,
};
use sensegraph_model::solution::{
    HypothesisSet, PairKey, ParameterSet, Rejection, RejectionCause, Solution, SolutionSet,
};
use sensegraph_model::SensemakerData;

use crate::graph_builder::{expect_image, expect_object};
use crate::{expect_kind, insert_unique, LoadError};

// ============================================================================
// Parameter sets
// ============================================================================

pub fn build_parameter_sets(
    records: &[ParameterSetRecord],
) -> Result<BTreeMap<ParameterSetId, ParameterSet>, LoadError> {
    let mut sets = BTreeMap::new();
    for record in records {
        let set = ParameterSet {
            id: ParameterSetId(record.id),
            name: record.name.clone(),
            visual_sim_ev_weight: record.visual_sim_ev_weight,
            visual_sim_ev_thresh: record.visual_sim_ev_thresh,
            attribute_sim_ev_weight: record.attribute_sim_ev_weight,
            attribute_sim_ev_thresh: record.attribute_sim_ev_thresh,
            causal_path_ev_weight: record.causal_path_ev_weight,
            causal_path_ev_thresh: record.causal_path_ev_thresh,
            continuity_ev_weight: record.continuity_ev_weight,
            continuity_ev_thresh: record.continuity_ev_thresh,
            density_weight: record.density_weight,
            affect_curve: record.affect_curve.clone(),
            affect_curve_weight: record.affect_curve_weight,
            affect_curve_thresh: record.affect_curve_thresh,
        };
        insert_unique(&mut sets, set.id, set, "ParameterSet", record.id)?;
    }
    Ok(sets)
}

// ============================================================================
// Solution sets
// ============================================================================

/// Builds every solution set, annotates the hypotheses, and assembles the
/// final snapshot. Takes ownership of the already-built tables.
pub fn assemble(
    graph: KnowledgeGraph,
    mut hypotheses: BTreeMap<HypothesisId, Hypothesis>,
    parameter_sets: BTreeMap<ParameterSetId, ParameterSet>,
    records: &[SolutionSetRecord],
) -> Result<SensemakerData, LoadError> {
    let mut solution_sets = BTreeMap::new();
    for record in records {
        let set = build_solution_set(record, &graph, &hypotheses, &parameter_sets)?;
        insert_unique(&mut solution_sets, set.id, set, "SolutionSet", record.id)?;
    }

    annotate(&mut hypotheses, &solution_sets);

    Ok(SensemakerData {
        graph,
        hypotheses,
        parameter_sets,
        solution_sets,
    })
}

fn build_solution_set(
    record: &SolutionSetRecord,
    graph: &KnowledgeGraph,
    hypotheses: &BTreeMap<HypothesisId, Hypothesis>,
    parameter_sets: &BTreeMap<ParameterSetId, ParameterSet>,
) -> Result<SolutionSet, LoadError> {
    // Consumers lean on "every set has a default solution"; reject the
    // degenerate set before anything references it.
    if record.solutions.is_empty() {
        return Err(LoadError::EmptySolutionSet(record.id));
    }
    let parameter_set = ParameterSetId(record.parameter_set_id);
    if !parameter_sets.contains_key(&parameter_set) {
        return Err(LoadError::dangling(
            "SolutionSet",
            record.id,
            "ParameterSet",
            record.parameter_set_id,
        ));
    }

    let mut individual_scores = BTreeMap::new();
    for entry in &record.individual_scores {
        let hyp = expect_hypothesis(hypotheses, "SolutionSet", record.id, entry.id)?;
        if individual_scores.insert(hyp, entry.score).is_some() {
            return Err(LoadError::malformed(
                "SolutionSet",
                record.id,
                format!("duplicate individual score for hypothesis {}", entry.id),
            ));
        }
    }

    let mut paired_scores = BTreeMap::new();
    for entry in &record.paired_scores {
        let [a, b] = match entry.id_pair[..] {
            [a, b] => [a, b],
            _ => {
                return Err(LoadError::malformed(
                    "SolutionSet",
                    record.id,
                    format!("paired score key has {} ids", entry.id_pair.len()),
                ));
            }
        };
        let a = expect_hypothesis(hypotheses, "SolutionSet", record.id, a)?;
        let b = expect_hypothesis(hypotheses, "SolutionSet", record.id, b)?;
        let key = PairKey::new(a, b);
        if paired_scores.insert(key, entry.score).is_some() {
            return Err(LoadError::malformed(
                "SolutionSet",
                record.id,
                format!(
                    "duplicate paired score for hypotheses {} and {}",
                    key.low(),
                    key.high()
                ),
            ));
        }
    }

    let hyp_sets = build_hyp_sets(record, hypotheses)?;
    let contradictions = build_contradictions(record, graph, hypotheses, &hyp_sets)?;

    let mut solutions = Vec::with_capacity(record.solutions.len());
    for solution in &record.solutions {
        solutions.push(build_solution(
            solution,
            hypotheses,
            parameter_sets,
            &hyp_sets,
            &contradictions,
        )?);
    }

    Ok(SolutionSet {
        id: SolutionSetId(record.id),
        parameter_set,
        individual_scores,
        paired_scores,
        hyp_sets,
        contradictions,
        solutions,
    })
}

// ============================================================================
// Hypothesis sets
// ============================================================================

fn build_hyp_sets(
    record: &SolutionSetRecord,
    hypotheses: &BTreeMap<HypothesisId, Hypothesis>,
) -> Result<BTreeMap<HypothesisSetId, HypothesisSet>, LoadError> {
    let mut sets = BTreeMap::new();

    for entry in &record.hyp_sets.causal_hyp_chains {
        if entry.hyp_id_sequence.is_none() {
            return Err(LoadError::malformed(
                "CausalHypChain",
                entry.id,
                "chain record lacks hyp_id_sequence",
            ));
        }
        let set = build_hyp_set(entry, hypotheses)?;
        insert_unique(&mut sets, set.id, set, "HypothesisSet", entry.id)?;
    }

    for entry in &record.hyp_sets.hypothesis_sets {
        if entry.hyp_id_sequence.is_some() {
            tracing::warn!(
                hyp_set = entry.id,
                "hypothesis set carries a chain sequence, treating it as a causal chain"
            );
        }
        let set = build_hyp_set(entry, hypotheses)?;
        insert_unique(&mut sets, set.id, set, "HypothesisSet", entry.id)?;
    }

    Ok(sets)
}

fn build_hyp_set(
    record: &HypothesisSetRecord,
    hypotheses: &BTreeMap<HypothesisId, Hypothesis>,
) -> Result<HypothesisSet, LoadError> {
    let mut members = Vec::with_capacity(record.hypothesis_ids.len());
    for id in &record.hypothesis_ids {
        members.push(expect_hypothesis(hypotheses, "HypothesisSet", record.id, *id)?);
    }

    let chain_sequence = match &record.hyp_id_sequence {
        Some(sequence) => {
            let mut ordered = Vec::with_capacity(sequence.len());
            for id in sequence {
                let hyp = HypothesisId(*id);
                if !members.contains(&hyp) {
                    return Err(LoadError::malformed(
                        "HypothesisSet",
                        record.id,
                        format!("sequence id {id} is not a member"),
                    ));
                }
                ordered.push(hyp);
            }
            Some(ordered)
        }
        None => None,
    };

    Ok(HypothesisSet {
        id: HypothesisSetId(record.id),
        hypotheses: members,
        is_all_or_ex: record.is_all_or_ex,
        chain_sequence,
    })
}

// ============================================================================
// Contradictions
// ============================================================================

fn build_contradictions(
    record: &SolutionSetRecord,
    graph: &KnowledgeGraph,
    hypotheses: &BTreeMap<HypothesisId, Hypothesis>,
    hyp_sets: &BTreeMap<HypothesisSetId, HypothesisSet>,
) -> Result<BTreeMap<ContradictionId, Contradiction>, LoadError> {
    let mut table = BTreeMap::new();
    let cons = &record.contradictions;

    for con in &cons.in_image_trans_cons {
        expect_kind("InImageTransCon", &con.kind, con.id)?;
        let built = Contradiction::InImageTrans(InImageTransCon {
            id: ContradictionId(con.id),
            explanation: con.explanation.clone(),
            hypothesis_1: expect_hypothesis(
                hypotheses,
                "InImageTransCon",
                con.id,
                con.hypothesis_1_id,
            )?,
            hypothesis_2: expect_hypothesis(
                hypotheses,
                "InImageTransCon",
                con.id,
                con.hypothesis_2_id,
            )?,
            object_1: con_object(graph, "InImageTransCon", con.id, con.obj_1_id)?,
            object_2: con_object(graph, "InImageTransCon", con.id, con.obj_2_id)?,
            shared_object: con_object(graph, "InImageTransCon", con.id, con.shared_obj_id)?,
        });
        insert_con(&mut table, built, con.id)?;
    }

    for con in &cons.tween_image_trans_cons {
        expect_kind("TweenImageTransCon", &con.kind, con.id)?;
        let hyp_set = match optional_id(con.hyp_set_id) {
            Some(id) => Some(resolve_hyp_set(hyp_sets, "TweenImageTransCon", con.id, id)?.id),
            None => None,
        };
        let built = Contradiction::TweenImageTrans(TweenImageTransCon {
            id: ContradictionId(con.id),
            explanation: con.explanation.clone(),
            hypothesis_1: expect_hypothesis(
                hypotheses,
                "TweenImageTransCon",
                con.id,
                con.hypothesis_1_id,
            )?,
            hypothesis_2: expect_hypothesis(
                hypotheses,
                "TweenImageTransCon",
                con.id,
                con.hypothesis_2_id,
            )?,
            object_1: con_object(graph, "TweenImageTransCon", con.id, con.obj_1_id)?,
            object_2: con_object(graph, "TweenImageTransCon", con.id, con.obj_2_id)?,
            shared_object: con_object(graph, "TweenImageTransCon", con.id, con.shared_obj_id)?,
            joining_hyp: expect_hypothesis(
                hypotheses,
                "TweenImageTransCon",
                con.id,
                con.joining_hyp_id,
            )?,
            hyp_set,
        });
        insert_con(&mut table, built, con.id)?;
    }

    for con in &cons.causal_hyp_flow_cons {
        expect_kind("CausalHypFlowCon", &con.kind, con.id)?;
        expect_image(graph, "CausalHypFlowCon", con.id, ImageId(con.image_1_id))?;
        expect_image(graph, "CausalHypFlowCon", con.id, ImageId(con.image_2_id))?;
        let built = Contradiction::CausalHypFlow(CausalHypFlowCon {
            id: ContradictionId(con.id),
            explanation: con.explanation.clone(),
            hypothesis_1: expect_hypothesis(
                hypotheses,
                "CausalHypFlowCon",
                con.id,
                con.hypothesis_1_id,
            )?,
            hypothesis_2: expect_hypothesis(
                hypotheses,
                "CausalHypFlowCon",
                con.id,
                con.hypothesis_2_id,
            )?,
            image_1: ImageId(con.image_1_id),
            image_2: ImageId(con.image_2_id),
        });
        insert_con(&mut table, built, con.id)?;
    }

    for con in &cons.causal_chain_flow_cons {
        expect_kind("CausalChainFlowCon", &con.kind, con.id)?;
        expect_image(graph, "CausalChainFlowCon", con.id, ImageId(con.image_1_id))?;
        expect_image(graph, "CausalChainFlowCon", con.id, ImageId(con.image_2_id))?;
        let set_1 = resolve_hyp_set(hyp_sets, "CausalChainFlowCon", con.id, con.hyp_set_1_id)?;
        let set_2 = resolve_hyp_set(hyp_sets, "CausalChainFlowCon", con.id, con.hyp_set_2_id)?;
        let mut participants = BTreeSet::new();
        participants.extend(set_1.hypotheses.iter().copied());
        participants.extend(set_2.hypotheses.iter().copied());
        let built = Contradiction::CausalChainFlow(CausalChainFlowCon {
            id: ContradictionId(con.id),
            explanation: con.explanation.clone(),
            hyp_set_1: set_1.id,
            hyp_set_2: set_2.id,
            image_1: ImageId(con.image_1_id),
            image_2: ImageId(con.image_2_id),
            participants,
        });
        insert_con(&mut table, built, con.id)?;
    }

    for con in &cons.causal_cycle_cons {
        expect_kind("CausalCycleCon", &con.kind, con.id)?;
        expect_image(graph, "CausalCycleCon", con.id, ImageId(con.image_id))?;
        let chain = resolve_hyp_set(hyp_sets, "CausalCycleCon", con.id, con.causal_chain_id)?;
        let mut participants: BTreeSet<HypothesisId> = chain.hypotheses.iter().copied().collect();
        let mut subsets = Vec::with_capacity(con.subset_ids.len());
        for subset_id in &con.subset_ids {
            let subset = resolve_hyp_set(hyp_sets, "CausalCycleCon", con.id, *subset_id)?;
            participants.extend(subset.hypotheses.iter().copied());
            subsets.push(subset.id);
        }
        let built = Contradiction::CausalCycle(CausalCycleCon {
            id: ContradictionId(con.id),
            explanation: con.explanation.clone(),
            image: ImageId(con.image_id),
            causal_chain: chain.id,
            subsets,
            participants,
        });
        insert_con(&mut table, built, con.id)?;
    }

    Ok(table)
}

/// Contradiction ids are unique across all five wire lists of one set.
fn insert_con(
    table: &mut BTreeMap<ContradictionId, Contradiction>,
    con: Contradiction,
    raw_id: i64,
) -> Result<(), LoadError> {
    let kind = con.kind_name();
    insert_unique(table, con.id(), con, kind, raw_id)
}

fn con_object(
    graph: &KnowledgeGraph,
    referrer_kind: &'static str,
    referrer_id: i64,
    raw_id: i64,
) -> Result<NodeId, LoadError> {
    let id = NodeId(raw_id);
    expect_object(graph, referrer_kind, referrer_id, id)?;
    Ok(id)
}

// ============================================================================
// Solutions and rejections
// ============================================================================

fn build_solution(
    record: &SolutionRecord,
    hypotheses: &BTreeMap<HypothesisId, Hypothesis>,
    parameter_sets: &BTreeMap<ParameterSetId, ParameterSet>,
    hyp_sets: &BTreeMap<HypothesisSetId, HypothesisSet>,
    contradictions: &BTreeMap<ContradictionId, Contradiction>,
) -> Result<Solution, LoadError> {
    let parameter_set = ParameterSetId(record.parameter_set_id);
    if !parameter_sets.contains_key(&parameter_set) {
        return Err(LoadError::dangling(
            "Solution",
            record.id,
            "ParameterSet",
            record.parameter_set_id,
        ));
    }

    let mut accepted_hypotheses = BTreeSet::new();
    for id in &record.accepted_hypothesis_ids {
        accepted_hypotheses.insert(expect_hypothesis(hypotheses, "Solution", record.id, *id)?);
    }
    let mut accepted_hyp_sets = BTreeSet::new();
    for id in &record.accepted_hyp_set_ids {
        accepted_hyp_sets.insert(resolve_hyp_set(hyp_sets, "Solution", record.id, *id)?.id);
    }

    let mut rejections = Vec::new();
    for rejection in &record.rejections.hyp_con_rejections {
        rejections.push(hyp_con_rejection(rejection, hypotheses, contradictions)?);
    }
    for rejection in &record.rejections.hyp_set_con_rejections {
        rejections.push(hyp_set_con_rejection(rejection, hypotheses, hyp_sets, contradictions)?);
    }
    for rejection in &record.rejections.causal_cycle_rejections {
        rejections.push(causal_cycle_rejection(rejection, hypotheses, contradictions)?);
    }

    Ok(Solution {
        id: SolutionId(record.id),
        parameter_set,
        accepted_hypotheses,
        accepted_hyp_sets,
        energy: record.energy,
        rejections,
    })
}

fn hyp_con_rejection(
    record: &HypConRejectionRecord,
    hypotheses: &BTreeMap<HypothesisId, Hypothesis>,
    contradictions: &BTreeMap<ContradictionId, Contradiction>,
) -> Result<Rejection, LoadError> {
    expect_kind("HypConRejection", &record.kind, record.rejected_hyp_id)?;
    let cause = RejectionCause::Hypothesis(expect_hypothesis(
        hypotheses,
        "HypConRejection",
        record.rejected_hyp_id,
        record.contradicting_hyp_id,
    )?);
    Ok(Rejection {
        rejected: expect_hypothesis(
            hypotheses,
            "HypConRejection",
            record.rejected_hyp_id,
            record.rejected_hyp_id,
        )?,
        explanation: record.explanation.clone(),
        cause,
        contradiction: resolve_contradiction(
            contradictions,
            "HypConRejection",
            record.rejected_hyp_id,
            record.contradiction_id,
        )?,
    })
}

fn hyp_set_con_rejection(
    record: &HypSetConRejectionRecord,
    hypotheses: &BTreeMap<HypothesisId, Hypothesis>,
    hyp_sets: &BTreeMap<HypothesisSetId, HypothesisSet>,
    contradictions: &BTreeMap<ContradictionId, Contradiction>,
) -> Result<Rejection, LoadError> {
    expect_kind("HypSetConRejection", &record.kind, record.rejected_hyp_id)?;
    let cause = RejectionCause::HypothesisSet(
        resolve_hyp_set(
            hyp_sets,
            "HypSetConRejection",
            record.rejected_hyp_id,
            record.contradicting_hyp_set_id,
        )?
        .id,
    );
    Ok(Rejection {
        rejected: expect_hypothesis(
            hypotheses,
            "HypSetConRejection",
            record.rejected_hyp_id,
            record.rejected_hyp_id,
        )?,
        explanation: record.explanation.clone(),
        cause,
        contradiction: resolve_contradiction(
            contradictions,
            "HypSetConRejection",
            record.rejected_hyp_id,
            record.contradiction_id,
        )?,
    })
}

fn causal_cycle_rejection(
    record: &CausalCycleRejectionRecord,
    hypotheses: &BTreeMap<HypothesisId, Hypothesis>,
    contradictions: &BTreeMap<ContradictionId, Contradiction>,
) -> Result<Rejection, LoadError> {
    expect_kind("CausalCycleRejection", &record.kind, record.rejected_hyp_id)?;
    let mut cycle = Vec::with_capacity(record.contradicting_hyp_ids.len());
    for id in &record.contradicting_hyp_ids {
        cycle.push(expect_hypothesis(
            hypotheses,
            "CausalCycleRejection",
            record.rejected_hyp_id,
            *id,
        )?);
    }
    Ok(Rejection {
        rejected: expect_hypothesis(
            hypotheses,
            "CausalCycleRejection",
            record.rejected_hyp_id,
            record.rejected_hyp_id,
        )?,
        explanation: record.explanation.clone(),
        cause: RejectionCause::Cycle(cycle),
        contradiction: resolve_contradiction(
            contradictions,
            "CausalCycleRejection",
            record.rejected_hyp_id,
            record.contradiction_id,
        )?,
    })
}

// ============================================================================
// Lookup helpers
// ============================================================================

fn expect_hypothesis(
    hypotheses: &BTreeMap<HypothesisId, Hypothesis>,
    referrer_kind: &'static str,
    referrer_id: i64,
    raw_id: i64,
) -> Result<HypothesisId, LoadError> {
    let id = HypothesisId(raw_id);
    if !hypotheses.contains_key(&id) {
        return Err(LoadError::dangling(referrer_kind, referrer_id, "Hypothesis", raw_id));
    }
    Ok(id)
}

fn resolve_hyp_set<'a>(
    hyp_sets: &'a BTreeMap<HypothesisSetId, HypothesisSet>,
    referrer_kind: &'static str,
    referrer_id: i64,
    raw_id: i64,
) -> Result<&'a HypothesisSet, LoadError> {
    hyp_sets
        .get(&HypothesisSetId(raw_id))
        .ok_or_else(|| LoadError::dangling(referrer_kind, referrer_id, "HypothesisSet", raw_id))
}

fn resolve_contradiction(
    contradictions: &BTreeMap<ContradictionId, Contradiction>,
    referrer_kind: &'static str,
    referrer_id: i64,
    raw_id: i64,
) -> Result<ContradictionId, LoadError> {
    let id = ContradictionId(raw_id);
    if !contradictions.contains_key(&id) {
        return Err(LoadError::dangling(referrer_kind, referrer_id, "Contradiction", raw_id));
    }
    Ok(id)
}

// ============================================================================
// Annotation
// ============================================================================

/// Copies per-set facts back onto the hypotheses once every set exists.
/// Acceptance is total afterwards: one entry per (set, solution) pair for
/// every hypothesis, so queries distinguish "rejected" from "unknown
/// context".
fn annotate(
    hypotheses: &mut BTreeMap<HypothesisId, Hypothesis>,
    solution_sets: &BTreeMap<SolutionSetId, SolutionSet>,
) {
    for hyp in hypotheses.values_mut() {
        for (set_id, set) in solution_sets {
            if let Some(score) = set.individual_scores.get(&hyp.id) {
                hyp.individual_scores.insert(*set_id, *score);
            }
            for solution in &set.solutions {
                hyp.acceptance
                    .insert((*set_id, solution.id), solution.accepts(hyp.id));
            }
            let involved: Vec<ContradictionId> = set
                .contradictions
                .values()
                .filter(|con| con.has_hypothesis(hyp.id))
                .map(|con| con.id())
                .collect();
            if !involved.is_empty() {
                hyp.contradictions.insert(*set_id, involved);
            }
        }
    }
}
