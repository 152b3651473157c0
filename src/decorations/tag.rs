//! The tag carried by configuration-driven decorations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A render descriptor such as `bold`, `link` or `reference`.
///
/// The engine never looks inside a tag. `kind` names the decoration for the
/// UI layer's style table; `payload` carries match data the UI may need,
/// such as a link target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecorationTag {
    /// Decoration kind (e.g. "bold", "link")
    pub kind: String,
    /// Optional data captured from the match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl DecorationTag {
    /// A tag with no payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
        }
    }

    /// Attach a payload.
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }
}

impl fmt::Display for DecorationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Some(payload) => write!(f, "{}({})", self.kind, payload),
            None => write!(f, "{}", self.kind),
        }
    }
}
