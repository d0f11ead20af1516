//! AI writing assistance with graceful degradation.
//!
//! Each configured provider is an [`Assistant`]. [`AssistantChain`] asks them
//! in order and falls back to the rule-based [`LocalAssistant`], so every
//! request gets an answer. `Arc<dyn Assistant>` lets tests swap in doubles.

pub mod handlers;
pub mod llm;
pub mod local;
pub mod prompts;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::llm_client::{ChatClient, LlmError};
use crate::models::ResumeDocument;
use crate::scoring::ResumeScore;
use crate::store::MemStore;

pub use llm::{LlmAssistant, ProviderKind};
pub use local::LocalAssistant;

#[derive(Debug, Error)]
pub enum AssistError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("failed to encode prompt: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("unusable answer: {0}")]
    Unusable(String),
}

/// Which resume section a description belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    #[default]
    Experience,
    Project,
    Summary,
}

impl SectionKind {
    /// Lenient parse of the editor's `type` field; anything unknown is treated
    /// as experience.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "project" | "projects" => SectionKind::Project,
            "summary" => SectionKind::Summary,
            _ => SectionKind::Experience,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SectionKind::Experience => "experience",
            SectionKind::Project => "project",
            SectionKind::Summary => "summary",
        }
    }
}

/// One source of writing assistance.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Short provider name reported back to the client as `source`.
    fn name(&self) -> &str;

    async fn generate_summary(
        &self,
        resume: &ResumeDocument,
        job_description: Option<&str>,
    ) -> Result<String, AssistError>;

    async fn suggest_skills(
        &self,
        job_title: &str,
        industry: Option<&str>,
        current_skills: &[String],
    ) -> Result<Vec<String>, AssistError>;

    async fn improve_description(
        &self,
        text: &str,
        kind: SectionKind,
    ) -> Result<String, AssistError>;

    async fn score_resume(&self, resume: &ResumeDocument) -> Result<ResumeScore, AssistError>;
}

/// A result plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Assisted<T> {
    pub value: T,
    pub source: String,
    /// True exactly when the local assistant produced `value`.
    pub fallback: bool,
}

impl<T> Assisted<T> {
    fn provided(source: &str, value: T) -> Self {
        Self {
            value,
            source: source.to_string(),
            fallback: false,
        }
    }

    fn local(value: T) -> Self {
        Self {
            value,
            source: local::SOURCE.to_string(),
            fallback: true,
        }
    }
}

/// Providers in priority order, then the local assistant.
pub struct AssistantChain {
    providers: Vec<Arc<dyn Assistant>>,
    local: LocalAssistant,
}

impl AssistantChain {
    pub fn new(providers: Vec<Arc<dyn Assistant>>, local: LocalAssistant) -> Self {
        Self { providers, local }
    }

    /// Perplexity first, then OpenAI, each only when its key is configured.
    pub fn from_config(config: &Config, store: Arc<MemStore>) -> Result<Self, LlmError> {
        let timeout = std::time::Duration::from_secs(config.llm_timeout_secs);
        let mut providers: Vec<Arc<dyn Assistant>> = Vec::new();

        for (kind, provider) in [
            (ProviderKind::Perplexity, &config.perplexity),
            (ProviderKind::OpenAi, &config.openai),
        ] {
            if let Some(provider) = provider {
                let client = ChatClient::new(provider, timeout, config.llm_max_retries)?;
                info!(
                    "Assistant provider enabled: {} (model: {})",
                    client.provider(),
                    client.model()
                );
                providers.push(Arc::new(LlmAssistant::new(kind, client)));
            }
        }

        if providers.is_empty() {
            info!("No AI provider configured; using local assistant only");
        }

        Ok(Self::new(providers, LocalAssistant::new(store)))
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn generate_summary(
        &self,
        resume: &ResumeDocument,
        job_description: Option<&str>,
    ) -> Assisted<String> {
        for provider in &self.providers {
            match provider.generate_summary(resume, job_description).await {
                Ok(summary) => return Assisted::provided(provider.name(), summary),
                Err(e) => warn!("{} could not generate summary: {e}", provider.name()),
            }
        }
        Assisted::local(self.local.generate_summary(resume))
    }

    pub async fn suggest_skills(
        &self,
        job_title: &str,
        industry: Option<&str>,
        current_skills: &[String],
    ) -> Assisted<Vec<String>> {
        for provider in &self.providers {
            match provider
                .suggest_skills(job_title, industry, current_skills)
                .await
            {
                Ok(skills) => return Assisted::provided(provider.name(), skills),
                Err(e) => warn!("{} could not suggest skills: {e}", provider.name()),
            }
        }
        Assisted::local(
            self.local
                .suggest_skills(job_title, industry, current_skills)
                .await,
        )
    }

    pub async fn improve_description(&self, text: &str, kind: SectionKind) -> Assisted<String> {
        for provider in &self.providers {
            match provider.improve_description(text, kind).await {
                Ok(improved) => return Assisted::provided(provider.name(), improved),
                Err(e) => warn!(
                    "{} could not improve {} description: {e}",
                    provider.name(),
                    kind.label()
                ),
            }
        }
        Assisted::local(self.local.improve_description(text, kind))
    }

    /// The returned score's own `fallback` flag mirrors the wrapper's.
    pub async fn score_resume(&self, resume: &ResumeDocument) -> Assisted<ResumeScore> {
        for provider in &self.providers {
            match provider.score_resume(resume).await {
                Ok(mut score) => {
                    score.fallback = false;
                    return Assisted::provided(provider.name(), score);
                }
                Err(e) => warn!("{} could not score resume: {e}", provider.name()),
            }
        }
        let mut score = self.local.score_resume(resume);
        score.fallback = true;
        Assisted::local(score)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Always errors, counting calls.
    pub(crate) struct DownAssistant {
        pub calls: AtomicUsize,
    }

    impl DownAssistant {
        pub(crate) fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn fail<T>(&self) -> Result<T, AssistError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AssistError::Llm(LlmError::RateLimited { retries: 3 }))
        }
    }

    #[async_trait]
    impl Assistant for DownAssistant {
        fn name(&self) -> &str {
            "down"
        }

        async fn generate_summary(
            &self,
            _: &ResumeDocument,
            _: Option<&str>,
        ) -> Result<String, AssistError> {
            self.fail()
        }

        async fn suggest_skills(
            &self,
            _: &str,
            _: Option<&str>,
            _: &[String],
        ) -> Result<Vec<String>, AssistError> {
            self.fail()
        }

        async fn improve_description(
            &self,
            _: &str,
            _: SectionKind,
        ) -> Result<String, AssistError> {
            self.fail()
        }

        async fn score_resume(&self, _: &ResumeDocument) -> Result<ResumeScore, AssistError> {
            self.fail()
        }
    }

    /// Answers everything with canned values.
    pub(crate) struct CannedAssistant;

    #[async_trait]
    impl Assistant for CannedAssistant {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate_summary(
            &self,
            _: &ResumeDocument,
            _: Option<&str>,
        ) -> Result<String, AssistError> {
            Ok("Seasoned engineer.".to_string())
        }

        async fn suggest_skills(
            &self,
            _: &str,
            _: Option<&str>,
            _: &[String],
        ) -> Result<Vec<String>, AssistError> {
            Ok(vec!["Rust".to_string()])
        }

        async fn improve_description(
            &self,
            text: &str,
            _: SectionKind,
        ) -> Result<String, AssistError> {
            Ok(format!("• {text}"))
        }

        async fn score_resume(&self, _: &ResumeDocument) -> Result<ResumeScore, AssistError> {
            Ok(ResumeScore {
                score: 88,
                improvements: vec!["Tighten wording".to_string()],
                grammar_issues: vec![],
                fallback: true,
            })
        }
    }

    fn chain(providers: Vec<Arc<dyn Assistant>>) -> AssistantChain {
        AssistantChain::new(providers, LocalAssistant::new(Arc::new(MemStore::new())))
    }

    #[test]
    fn test_section_kind_from_label() {
        assert_eq!(SectionKind::from_label("Project"), SectionKind::Project);
        assert_eq!(SectionKind::from_label("summary"), SectionKind::Summary);
        assert_eq!(SectionKind::from_label("volunteering"), SectionKind::Experience);
    }

    #[tokio::test]
    async fn test_first_successful_provider_wins() {
        let down = Arc::new(DownAssistant::new());
        let chain = chain(vec![
            down.clone() as Arc<dyn Assistant>,
            Arc::new(CannedAssistant),
        ]);

        let summary = chain.generate_summary(&ResumeDocument::default(), None).await;
        assert_eq!(summary.value, "Seasoned engineer.");
        assert_eq!(summary.source, "canned");
        assert!(!summary.fallback);
        assert_eq!(down.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_providers_down_falls_back_to_local() {
        let down = Arc::new(DownAssistant::new());
        let chain = chain(vec![
            down.clone() as Arc<dyn Assistant>,
            Arc::new(DownAssistant::new()),
        ]);

        let improved = chain
            .improve_description("wrote code", SectionKind::Experience)
            .await;
        assert!(improved.fallback);
        assert_eq!(improved.source, local::SOURCE);
        assert!(improved.value.starts_with("• "));
        assert_eq!(down.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_provider_score_is_never_marked_fallback() {
        let chain = chain(vec![Arc::new(CannedAssistant)]);
        let scored = chain.score_resume(&ResumeDocument::default()).await;
        assert_eq!(scored.value.score, 88);
        assert!(!scored.value.fallback);
        assert!(!scored.fallback);
    }

    #[tokio::test]
    async fn test_local_score_is_marked_fallback() {
        let chain = chain(vec![]);
        let scored = chain.score_resume(&ResumeDocument::default()).await;
        assert!(scored.fallback);
        assert!(scored.value.fallback);
        assert!(scored.value.score <= 100);
    }

    #[tokio::test]
    async fn test_offline_config_builds_local_only_chain() {
        let chain =
            AssistantChain::from_config(&Config::offline(), Arc::new(MemStore::new())).unwrap();
        assert!(chain.provider_names().is_empty());
        let skills = chain.suggest_skills("Data Scientist", None, &[]).await;
        assert!(skills.fallback);
        assert_eq!(skills.value.len(), 10);
    }
}
