use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Encode, Decode)]
pub enum ActionResult {
    Success,
    /// The action went through but had nothing to do, or did less than asked.
    SuccessWithWarning(String),
    Error(ActionError),
}

impl ActionResult {
    /// Returns `true` for both `Success` and `SuccessWithWarning`.
    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success | ActionResult::SuccessWithWarning(_))
    }

    /// Extract the warning string if present.
    pub fn warning(&self) -> Option<&str> {
        match self {
            ActionResult::SuccessWithWarning(w) => Some(w.as_str()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ActionError> {
        match self {
            ActionResult::Error(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Encode, Decode)]
pub enum ActionError {
    NotFound,
    NotOwned,
    ObjectDead,
    /// The object exists but cannot carry out this kind of order.
    InvalidTarget,
    FeatureLocked,
    LimitReached,
    AlreadyExists,
    NotResearchable,
    /// A tile coordinate lies outside the map.
    OutOfBounds,
}
