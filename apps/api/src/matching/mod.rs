// Job matching: skill extraction, stemmed skill comparison, years-of-experience checks.
// Everything below handlers.rs is synchronous and side-effect free.

pub mod experience;
pub mod handlers;
pub mod job_match;
pub mod skills;
pub mod text;

pub use job_match::{analyze, AnalysisFailed, JobAnalysisResult};
