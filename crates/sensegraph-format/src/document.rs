//! Top-level document envelope and parse entry points.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::KnowledgeGraphRecord;
use crate::hypothesis::HypothesesRecord;
use crate::solution::{ParameterSetRecord, SolutionSetRecord};

/// Everything one sensemaking run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensemakerDataRecord {
    pub knowledge_graph: KnowledgeGraphRecord,
    pub hypotheses: HypothesesRecord,
    pub parameter_sets: Vec<ParameterSetRecord>,
    pub solution_sets: Vec<SolutionSetRecord>,
}

/// The document envelope: one top-level `sensemaker_data` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensemakerDocument {
    pub sensemaker_data: SensemakerDataRecord,
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("malformed sensemaker document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses the producer's JSON text into wire records.
///
/// This is a structural parse only: required fields, value types, and enum
/// renderings are checked, cross-references are not. Reference resolution
/// is the import pipeline's job.
pub fn parse_document(text: &str) -> Result<SensemakerDocument, FormatError> {
    Ok(serde_json::from_str(text)?)
}

/// Serializes wire records back into document text.
pub fn to_document_string(document: &SensemakerDocument) -> Result<String, FormatError> {
    Ok(serde_json::to_string(document)?)
}
