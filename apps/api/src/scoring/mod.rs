pub mod heuristic;

use serde::{Deserialize, Serialize};

pub use heuristic::score_resume;

/// Resume quality assessment returned to the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeScore {
    /// Always within 0–100.
    pub score: u8,
    pub improvements: Vec<String>,
    pub grammar_issues: Vec<String>,
    /// Set by the caller when the rule-based scorer stood in for an AI provider.
    pub fallback: bool,
}
