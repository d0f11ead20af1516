//! [`Assistant`] backed by an OpenAI-compatible chat provider.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::assist::{prompts, AssistError, Assistant, SectionKind};
use crate::llm_client::{parse_json_lenient, prompts::JSON_ONLY_SYSTEM, ChatClient, ChatOptions};
use crate::models::ResumeDocument;
use crate::scoring::ResumeScore;

const DEFAULT_SCORE: u8 = 60;

const DEFAULT_IMPROVEMENTS: [&str; 3] = [
    "Add more quantifiable achievements to your work experiences",
    "Include a stronger professional summary highlighting your key skills",
    "Tailor your skills section to match industry requirements",
];

static BLANK_LINE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*(?:\n[ \t]*)+").expect("valid blank line regex"));
static DASH_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^- ").expect("valid bullet regex"));

/// Providers differ in sampling temperature and JSON-mode support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Perplexity,
    OpenAi,
}

struct Tuning {
    summary: ChatOptions,
    skills: ChatOptions,
    improve: ChatOptions,
    score: ChatOptions,
}

impl ProviderKind {
    fn tuning(self) -> Tuning {
        match self {
            ProviderKind::Perplexity => Tuning {
                summary: ChatOptions::text(0.3),
                skills: ChatOptions::text(0.2),
                improve: ChatOptions::text(0.4),
                score: ChatOptions::text(0.2),
            },
            ProviderKind::OpenAi => Tuning {
                summary: ChatOptions::text(0.7),
                skills: ChatOptions::json(0.5),
                improve: ChatOptions::text(0.7),
                score: ChatOptions::json(0.3),
            },
        }
    }
}

pub struct LlmAssistant {
    kind: ProviderKind,
    client: ChatClient,
}

impl LlmAssistant {
    pub fn new(kind: ProviderKind, client: ChatClient) -> Self {
        Self { kind, client }
    }
}

#[async_trait]
impl Assistant for LlmAssistant {
    fn name(&self) -> &str {
        self.client.provider()
    }

    async fn generate_summary(
        &self,
        resume: &ResumeDocument,
        job_description: Option<&str>,
    ) -> Result<String, AssistError> {
        let resume_json = serde_json::to_string_pretty(resume)?;
        let job_description = job_description.map(str::trim).filter(|jd| !jd.is_empty());
        let summary = self
            .client
            .complete(
                prompts::SUMMARY_SYSTEM,
                &prompts::summary_prompt(&resume_json, job_description),
                self.kind.tuning().summary,
            )
            .await?;
        Ok(summary)
    }

    async fn suggest_skills(
        &self,
        job_title: &str,
        industry: Option<&str>,
        current_skills: &[String],
    ) -> Result<Vec<String>, AssistError> {
        let system = format!("{} {}", prompts::SKILLS_SYSTEM, JSON_ONLY_SYSTEM);
        let raw = self
            .client
            .complete(
                &system,
                &prompts::skills_prompt(job_title, industry, current_skills),
                self.kind.tuning().skills,
            )
            .await?;

        let skills: Vec<String> = parse_skill_list(&raw)
            .into_iter()
            .filter(|skill| !has_skill(current_skills, skill))
            .collect();
        if skills.is_empty() {
            return Err(AssistError::Unusable("no skills in response".to_string()));
        }
        Ok(skills)
    }

    async fn improve_description(
        &self,
        text: &str,
        kind: SectionKind,
    ) -> Result<String, AssistError> {
        let raw = self
            .client
            .complete(
                prompts::IMPROVE_SYSTEM,
                &prompts::improve_prompt(text, kind),
                self.kind.tuning().improve,
            )
            .await?;

        let improved = clean_improved_text(&raw);
        if improved.is_empty() {
            return Err(AssistError::Unusable("empty rewrite".to_string()));
        }
        Ok(improved)
    }

    async fn score_resume(&self, resume: &ResumeDocument) -> Result<ResumeScore, AssistError> {
        let system = format!("{} {}", prompts::SCORE_SYSTEM, JSON_ONLY_SYSTEM);
        let resume_json = serde_json::to_string_pretty(resume)?;
        let raw: Value = self
            .client
            .complete_json(
                &system,
                &prompts::score_prompt(&resume_json),
                self.kind.tuning().score,
            )
            .await?;
        normalize_score(&raw)
    }
}

fn has_skill(current_skills: &[String], skill: &str) -> bool {
    current_skills
        .iter()
        .any(|current| current.trim().eq_ignore_ascii_case(skill.trim()))
}

/// Accepts a JSON array, an object with a `skills` array, or comma/newline
/// separated text. Duplicates are dropped, order kept.
pub fn parse_skill_list(raw: &str) -> Vec<String> {
    let from_json = match parse_json_lenient::<Value>(raw) {
        Ok(Value::Array(items)) => Some(items),
        Ok(Value::Object(mut map)) => match map.remove("skills") {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    };

    let candidates: Vec<String> = match from_json {
        Some(items) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        None => raw
            .split([',', '\n'])
            .map(|s| s.trim().trim_start_matches(['-', '•', '*']).trim().to_string())
            .filter(|s| !s.contains(['[', ']', '{', '}']))
            .collect(),
    };

    let mut skills: Vec<String> = Vec::new();
    for skill in candidates {
        let skill = skill.trim();
        if !skill.is_empty() && !has_skill(&skills, skill) {
            skills.push(skill.to_string());
        }
    }
    skills
}

/// Strips markdown bold, collapses blank-line runs and turns `- ` bullets
/// into `• `.
pub fn clean_improved_text(raw: &str) -> String {
    let text = raw.replace("**", "");
    let text = BLANK_LINE_RUN.replace_all(&text, "\n");
    let text = DASH_BULLET.replace_all(&text, "• ");
    text.trim().to_string()
}

/// Brings provider score JSON into shape. Anything but an object is unusable.
pub fn normalize_score(raw: &Value) -> Result<ResumeScore, AssistError> {
    let Value::Object(map) = raw else {
        return Err(AssistError::Unusable("score is not a JSON object".to_string()));
    };

    let score = map
        .get("score")
        .and_then(Value::as_f64)
        .map(|s| s.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(DEFAULT_SCORE);

    let strings = |key: &str| -> Option<Vec<String>> {
        map.get(key)?.as_array().map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
    };

    Ok(ResumeScore {
        score,
        improvements: strings("improvements")
            .unwrap_or_else(|| DEFAULT_IMPROVEMENTS.iter().map(|s| s.to_string()).collect()),
        grammar_issues: strings("grammarIssues").unwrap_or_default(),
        fallback: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_skill_list_json_array() {
        assert_eq!(
            parse_skill_list("```json\n[\"Python\", \"SQL\", \"python\"]\n```"),
            vec!["Python", "SQL"]
        );
    }

    #[test]
    fn test_parse_skill_list_skills_object() {
        assert_eq!(
            parse_skill_list(r#"{"skills": ["Docker", "Kubernetes"]}"#),
            vec!["Docker", "Kubernetes"]
        );
    }

    #[test]
    fn test_parse_skill_list_plain_text() {
        assert_eq!(
            parse_skill_list("Docker, Kubernetes\n- Terraform\n\n• Helm"),
            vec!["Docker", "Kubernetes", "Terraform", "Helm"]
        );
    }

    #[test]
    fn test_parse_skill_list_object_without_skills_is_empty() {
        assert!(parse_skill_list(r#"{"tools": ["Docker"]}"#).is_empty());
    }

    #[test]
    fn test_clean_improved_text() {
        let raw = "**Led** migration\n\n\n- Cut costs by 20%\n- Mentored 3 engineers\n";
        assert_eq!(
            clean_improved_text(raw),
            "Led migration\n• Cut costs by 20%\n• Mentored 3 engineers"
        );
    }

    #[test]
    fn test_normalize_score_clamps_and_defaults() {
        let score = normalize_score(&json!({ "score": 140.4 })).unwrap();
        assert_eq!(score.score, 100);
        assert_eq!(score.improvements.len(), DEFAULT_IMPROVEMENTS.len());
        assert!(score.grammar_issues.is_empty());
        assert!(!score.fallback);
    }

    #[test]
    fn test_normalize_score_missing_score_defaults_to_60() {
        let score = normalize_score(&json!({
            "improvements": ["Add metrics"],
            "grammarIssues": ["Tense shifts in second role"]
        }))
        .unwrap();
        assert_eq!(score.score, 60);
        assert_eq!(score.improvements, vec!["Add metrics"]);
        assert_eq!(score.grammar_issues, vec!["Tense shifts in second role"]);
    }

    #[test]
    fn test_normalize_score_rejects_non_object() {
        assert!(matches!(
            normalize_score(&json!([1, 2, 3])),
            Err(AssistError::Unusable(_))
        ));
    }

    #[test]
    fn test_negative_score_clamps_to_zero() {
        assert_eq!(normalize_score(&json!({ "score": -5 })).unwrap().score, 0);
    }
}
