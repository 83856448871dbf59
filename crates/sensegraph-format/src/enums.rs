//! Enumerations rendered as strings on the wire.
//!
//! The producer serializes its enums with `str()`, which yields the
//! `EnumClass.MEMBER` form (e.g. `"ConceptType.OBJECT"`). The document is
//! bit-exact-significant, so these types parse and emit exactly that form.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

// ============================================================================
// ConceptType
// ============================================================================

/// Which kind of instance a concept describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConceptType {
    Object,
    Action,
}

impl ConceptType {
    pub fn wire_name(&self) -> &'static str {
        match self {
            ConceptType::Object => "ConceptType.OBJECT",
            ConceptType::Action => "ConceptType.ACTION",
        }
    }

    pub fn from_wire(text: &str) -> Option<Self> {
        match text {
            "ConceptType.OBJECT" => Some(ConceptType::Object),
            "ConceptType.ACTION" => Some(ConceptType::Action),
            _ => None,
        }
    }
}

impl fmt::Display for ConceptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl Serialize for ConceptType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.wire_name())
    }
}

impl<'de> Deserialize<'de> for ConceptType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        ConceptType::from_wire(&text)
            .ok_or_else(|| de::Error::custom(format!("unknown concept type `{text}`")))
    }
}

// ============================================================================
// CausalFlowDirection
// ============================================================================

/// Temporal direction of a causal link relative to the image sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CausalFlowDirection {
    Forward,
    Backward,
    Neutral,
    None,
}

impl CausalFlowDirection {
    pub fn wire_name(&self) -> &'static str {
        match self {
            CausalFlowDirection::Forward => "CausalFlowDirection.FORWARD",
            CausalFlowDirection::Backward => "CausalFlowDirection.BACKWARD",
            CausalFlowDirection::Neutral => "CausalFlowDirection.NEUTRAL",
            CausalFlowDirection::None => "CausalFlowDirection.NONE",
        }
    }

    pub fn from_wire(text: &str) -> Option<Self> {
        match text {
            "CausalFlowDirection.FORWARD" => Some(CausalFlowDirection::Forward),
            "CausalFlowDirection.BACKWARD" => Some(CausalFlowDirection::Backward),
            "CausalFlowDirection.NEUTRAL" => Some(CausalFlowDirection::Neutral),
            "CausalFlowDirection.NONE" => Some(CausalFlowDirection::None),
            _ => None,
        }
    }

    /// The direction read against the flow of time.
    pub fn reversed(&self) -> Self {
        match self {
            CausalFlowDirection::Forward => CausalFlowDirection::Backward,
            CausalFlowDirection::Backward => CausalFlowDirection::Forward,
            CausalFlowDirection::Neutral => CausalFlowDirection::Neutral,
            CausalFlowDirection::None => CausalFlowDirection::None,
        }
    }
}

impl fmt::Display for CausalFlowDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl Serialize for CausalFlowDirection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.wire_name())
    }
}

impl<'de> Deserialize<'de> for CausalFlowDirection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        CausalFlowDirection::from_wire(&text)
            .ok_or_else(|| de::Error::custom(format!("unknown causal flow direction `{text}`")))
    }
}

// ============================================================================
// EdgeRelationship
// ============================================================================

/// The producer's structural edge vocabulary.
///
/// Edge `relationship` fields are free strings on the wire: scene-graph
/// predicates pass through verbatim, while edges the producer synthesizes
/// carry the `EnumClass.MEMBER` rendering of one of these. There is no
/// dedicated serde impl; callers classify strings with [`EdgeRelationship::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeRelationship {
    SubjectOf,
    ObjectOf,
    CoActor,
    DuplicateOf,
}

impl EdgeRelationship {
    pub fn wire_name(&self) -> &'static str {
        match self {
            EdgeRelationship::SubjectOf => "EdgeRelationship.SUBJECT_OF",
            EdgeRelationship::ObjectOf => "EdgeRelationship.OBJECT_OF",
            EdgeRelationship::CoActor => "EdgeRelationship.CO_ACTOR",
            EdgeRelationship::DuplicateOf => "EdgeRelationship.DUPLICATE_OF",
        }
    }

    /// The human-readable label (the producer enum's value).
    pub fn label(&self) -> &'static str {
        match self {
            EdgeRelationship::SubjectOf => "subject-of",
            EdgeRelationship::ObjectOf => "object-of",
            EdgeRelationship::CoActor => "co-actor",
            EdgeRelationship::DuplicateOf => "duplicate-of",
        }
    }

    /// Classifies a wire relationship string, accepting both the enum
    /// rendering and the bare label.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "EdgeRelationship.SUBJECT_OF" | "subject-of" => Some(EdgeRelationship::SubjectOf),
            "EdgeRelationship.OBJECT_OF" | "object-of" => Some(EdgeRelationship::ObjectOf),
            "EdgeRelationship.CO_ACTOR" | "co-actor" => Some(EdgeRelationship::CoActor),
            "EdgeRelationship.DUPLICATE_OF" | "duplicate-of" => Some(EdgeRelationship::DuplicateOf),
            _ => None,
        }
    }
}

impl fmt::Display for EdgeRelationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}
