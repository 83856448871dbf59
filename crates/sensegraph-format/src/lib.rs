//! Wire records for the sensemaker output document.
//!
//! The external reasoning engine emits a single JSON document under the
//! top-level key `sensemaker_data`. This crate mirrors that document with
//! serde structs whose field names, nesting, `-1` sentinels, and enum
//! renderings match the producer byte for byte. Records carry plain `i64`
//! ids and no behavior; reference resolution happens in `sensegraph-import`.
//!
//! Layout follows the document:
//!
//! - `graph`: the `knowledge_graph` section (commonsense data, images,
//!   nodes, edges)
//! - `hypothesis`: the `hypotheses` section (evidence, paths, the two
//!   hypothesis kinds)
//! - `solution`: `parameter_sets` and `solution_sets` (scores, hypothesis
//!   sets, contradictions, solutions, rejections)
//! - `document`: the top-level envelope and parse/serialize entry points
//! - `enums`: the producer's `EnumClass.MEMBER` string enums

pub mod document;
pub mod enums;
pub mod graph;
pub mod hypothesis;
pub mod solution;

// Re-export key types
pub use document::{parse_document, to_document_string, FormatError, SensemakerDocument};
pub use enums::{CausalFlowDirection, ConceptType, EdgeRelationship};
pub use graph::{optional_id, BoundingBox, Synset, NO_ID};
