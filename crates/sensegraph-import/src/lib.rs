//! Loading and resolution of sensemaker output documents.
//!
//! The wire document references everything by integer id and contains
//! genuine forward references: continuity evidence names hypotheses that
//! appear later in their list, premises may point forward, chain members
//! span the whole hypothesis table. Loading therefore runs in strict
//! phases: parse, build the knowledge graph, build hypotheses, link
//! hypothesis-to-hypothesis references, assemble solution sets, then one
//! final annotation pass once every solution set exists. Entities are
//! always constructed before anything links to them.
//!
//! Resolution is strict: a reference that cannot be resolved aborts the
//! whole load, and no partially-populated data ever escapes. The one
//! deliberate exception is commonsense-edge ids, which point into an
//! external database the producer does not embed.
//!
//! ```no_run
//! use sensegraph_import::{DirectoryProvider, OutputProvider};
//!
//! let provider = DirectoryProvider::new("outputs");
//! let text = provider.fetch(&[100, 101, 102])?;
//! let data = sensegraph_import::load_str(&text)?;
//! # Ok::<(), sensegraph_import::LoadError>(())
//! ```

pub mod graph_builder;
pub mod hypothesis_builder;
pub mod provider;
pub mod solution_builder;


use std::collections::BTreeMap;

use sensegraph_format::{FormatError, SensemakerDocument};
use sensegraph_model::SensemakerData;
use thiserror::Error;

pub use provider::{DirectoryProvider, OutputProvider, ProviderError};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum LoadError {
    /// A record is structurally invalid in a way serde cannot reject:
    /// duplicate id, wrong `type` discriminator, reference kind mismatch.
    #[error("malformed {kind} {id}: {message}")]
    MalformedInput {
        kind: &'static str,
        id: i64,
        message: String,
    },

    /// An id referenced during resolution has no entity behind it. The
    /// producer's output is internally inconsistent; nothing is substituted.
    #[error("{referrer_kind} {referrer_id} references unknown {target_kind} {target_id}")]
    DanglingReference {
        referrer_kind: &'static str,
        referrer_id: i64,
        target_kind: &'static str,
        target_id: i64,
    },

    /// A solution set resolved with zero solutions. Consumers assume at
    /// least one solution always exists, so the whole load is unusable.
    #[error("solution set {0} resolved with zero solutions")]
    EmptySolutionSet(i64),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl LoadError {
    pub(crate) fn malformed(kind: &'static str, id: i64, message: impl Into<String>) -> Self {
        LoadError::MalformedInput {
            kind,
            id,
            message: message.into(),
        }
    }

    pub(crate) fn dangling(
        referrer_kind: &'static str,
        referrer_id: i64,
        target_kind: &'static str,
        target_id: i64,
    ) -> Self {
        LoadError::DanglingReference {
            referrer_kind,
            referrer_id,
            target_kind,
            target_id,
        }
    }
}

/// Inserts into an id-keyed table, rejecting duplicate ids.
pub(crate) fn insert_unique<K: Ord, V>(
    map: &mut BTreeMap<K, V>,
    key: K,
    value: V,
    kind: &'static str,
    raw_id: i64,
) -> Result<(), LoadError> {
    if map.insert(key, value).is_some() {
        return Err(LoadError::malformed(kind, raw_id, "duplicate id"));
    }
    Ok(())
}

/// Checks a record's `type` discriminator against the expected producer
/// class name.
pub(crate) fn expect_kind(expected: &'static str, actual: &str, id: i64) -> Result<(), LoadError> {
    if actual != expected {
        return Err(LoadError::malformed(
            expected,
            id,
            format!("type discriminator is {actual:?}"),
        ));
    }
    Ok(())
}

// ============================================================================
// Entry points
// ============================================================================

/// Parses and resolves a complete sensemaker document.
pub fn load_str(text: &str) -> Result<SensemakerData, LoadError> {
    let document = sensegraph_format::parse_document(text)?;
    load_document(&document)
}

/// Fetches a document from a provider and loads it.
pub fn load_from_provider(
    provider: &impl OutputProvider,
    image_ids: &[i64],
) -> Result<SensemakerData, LoadError> {
    let text = provider.fetch(image_ids)?;
    load_str(&text)
}

/// Resolves an already-parsed document.
pub fn load_document(document: &SensemakerDocument) -> Result<SensemakerData, LoadError> {
    let record = &document.sensemaker_data;

    let graph = graph_builder::build(&record.knowledge_graph)?;
    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        images = graph.images.len(),
        "knowledge graph resolved"
    );

    let hypotheses = hypothesis_builder::build(&record.hypotheses, &graph)?;
    tracing::debug!(hypotheses = hypotheses.len(), "hypotheses resolved");

    let parameter_sets = solution_builder::build_parameter_sets(&record.parameter_sets)?;
    let data =
        solution_builder::assemble(graph, hypotheses, parameter_sets, &record.solution_sets)?;
    tracing::debug!(
        parameter_sets = data.parameter_sets.len(),
        solution_sets = data.solution_sets.len(),
        "solution sets assembled"
    );
    Ok(data)
}
