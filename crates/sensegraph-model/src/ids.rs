//! Typed entity ids.
//!
//! Ids are process-unique integers scoped to their entity kind; a node and
//! an edge may share the same number. The newtypes keep the kinds apart at
//! compile time. Rejections carry no id of their own on the wire, so there
//! is no rejection id here.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub i64);

        impl $name {
            pub fn raw(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

define_id!(
    /// A knowledge-graph node of any kind (concept, object, action).
    NodeId
);
define_id!(EdgeId);
define_id!(ImageId);
define_id!(CommonSenseNodeId);
define_id!(CommonSenseEdgeId);
define_id!(PathId);
define_id!(
    /// A step id, scoped to the path that owns the step.
    StepId
);
define_id!(EvidenceId);
define_id!(HypothesisId);
define_id!(HypothesisSetId);
define_id!(ContradictionId);
define_id!(ParameterSetId);
define_id!(SolutionSetId);
define_id!(
    /// A solution id, scoped to its owning solution set.
    SolutionId
);
