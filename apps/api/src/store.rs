//! In-memory storage for resumes, saved job analyses and skill suggestions.
//!
//! Ids auto-increment per collection starting at 1. Nothing survives a restart.

use std::collections::BTreeMap;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::records::{
    JobAnalysisRecord, NewJobAnalysis, NewResume, NewSkillSuggestion, ResumePatch, ResumeRecord,
    SkillSuggestionRecord,
};

/// One id-keyed collection with its own counter.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Debug, Default)]
struct Tables {
    resumes: Table<ResumeRecord>,
    job_analyses: Table<JobAnalysisRecord>,
    skill_suggestions: Table<SkillSuggestionRecord>,
}

#[derive(Debug)]
pub struct MemStore {
    inner: RwLock<Tables>,
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemStore {
    /// Empty store seeded with the built-in skill suggestion sets.
    pub fn new() -> Self {
        let mut tables = Tables::default();
        for seed in seed_skill_suggestions() {
            let id = tables.skill_suggestions.allocate_id();
            tables.skill_suggestions.rows.insert(
                id,
                SkillSuggestionRecord {
                    id,
                    industry: seed.industry,
                    job_title: seed.job_title,
                    skills: seed.skills,
                },
            );
        }
        Self {
            inner: RwLock::new(tables),
        }
    }

    // ── Resumes ───────────────────────────────────────────────────────────────

    /// Resumes owned by `user_id`, or every resume when `None`.
    pub async fn list_resumes(&self, user_id: Option<u64>) -> Vec<ResumeRecord> {
        let tables = self.inner.read().await;
        tables
            .resumes
            .rows
            .values()
            .filter(|r| user_id.is_none() || r.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn get_resume(&self, id: u64) -> Option<ResumeRecord> {
        self.inner.read().await.resumes.rows.get(&id).cloned()
    }

    pub async fn create_resume(&self, new: NewResume) -> ResumeRecord {
        let mut tables = self.inner.write().await;
        let id = tables.resumes.allocate_id();
        let now = Utc::now();
        let record = ResumeRecord {
            id,
            user_id: new.user_id,
            title: new.title,
            content: new.content,
            template: new.template,
            created_at: now,
            updated_at: now,
        };
        tables.resumes.rows.insert(id, record.clone());
        debug!("Stored resume {id}");
        record
    }

    /// Applies the fields present in `patch` and bumps `updated_at`.
    pub async fn update_resume(&self, id: u64, patch: ResumePatch) -> Option<ResumeRecord> {
        let mut tables = self.inner.write().await;
        let record = tables.resumes.rows.get_mut(&id)?;
        if let Some(user_id) = patch.user_id {
            record.user_id = Some(user_id);
        }
        if let Some(title) = patch.title {
            record.title = title;
        }
        if let Some(content) = patch.content {
            record.content = content;
        }
        if let Some(template) = patch.template {
            record.template = template;
        }
        record.updated_at = Utc::now();
        Some(record.clone())
    }

    /// Returns whether a resume was removed.
    pub async fn delete_resume(&self, id: u64) -> bool {
        self.inner.write().await.resumes.rows.remove(&id).is_some()
    }

    // ── Job analyses ──────────────────────────────────────────────────────────

    pub async fn list_job_analyses(&self, user_id: Option<u64>) -> Vec<JobAnalysisRecord> {
        let tables = self.inner.read().await;
        tables
            .job_analyses
            .rows
            .values()
            .filter(|a| user_id.is_none() || a.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn get_job_analysis(&self, id: u64) -> Option<JobAnalysisRecord> {
        self.inner.read().await.job_analyses.rows.get(&id).cloned()
    }

    pub async fn create_job_analysis(&self, new: NewJobAnalysis) -> JobAnalysisRecord {
        let mut tables = self.inner.write().await;
        let id = tables.job_analyses.allocate_id();
        let record = JobAnalysisRecord {
            id,
            user_id: new.user_id,
            resume_id: new.resume_id,
            job_description: new.job_description,
            analysis: new.analysis,
            created_at: Utc::now(),
        };
        tables.job_analyses.rows.insert(id, record.clone());
        record
    }

    pub async fn delete_job_analysis(&self, id: u64) -> bool {
        self.inner.write().await.job_analyses.rows.remove(&id).is_some()
    }

    // ── Skill suggestions ─────────────────────────────────────────────────────

    /// Suggestion sets whose job title contains `job_title` (case-insensitive),
    /// further narrowed by an industry substring when one is given.
    pub async fn find_skill_suggestions(
        &self,
        job_title: &str,
        industry: Option<&str>,
    ) -> Vec<SkillSuggestionRecord> {
        let title = job_title.to_lowercase();
        let industry = industry
            .map(str::trim)
            .filter(|i| !i.is_empty())
            .map(str::to_lowercase);

        let tables = self.inner.read().await;
        tables
            .skill_suggestions
            .rows
            .values()
            .filter(|s| s.job_title.to_lowercase().contains(&title))
            .filter(|s| match &industry {
                Some(industry) => s.industry.to_lowercase().contains(industry),
                None => true,
            })
            .cloned()
            .collect()
    }

    pub async fn create_skill_suggestion(&self, new: NewSkillSuggestion) -> SkillSuggestionRecord {
        let mut tables = self.inner.write().await;
        let id = tables.skill_suggestions.allocate_id();
        let record = SkillSuggestionRecord {
            id,
            industry: new.industry,
            job_title: new.job_title,
            skills: new.skills,
        };
        tables.skill_suggestions.rows.insert(id, record.clone());
        record
    }
}

fn seed_skill_suggestions() -> Vec<NewSkillSuggestion> {
    let set = |job_title: &str, skills: &[&str]| NewSkillSuggestion {
        industry: "Technology".to_string(),
        job_title: job_title.to_string(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
    };
    vec![
        set(
            "Data Scientist",
            &[
                "Python", "R", "SQL", "Machine Learning", "TensorFlow", "PyTorch",
                "Data Visualization", "Statistical Analysis", "NLP", "Deep Learning",
                "Pandas", "NumPy", "scikit-learn", "Tableau", "Power BI", "Big Data",
                "Data Mining", "A/B Testing", "Data Modeling", "ETL",
            ],
        ),
        set(
            "Software Engineer",
            &[
                "JavaScript", "Python", "Java", "C++", "TypeScript", "React",
                "Node.js", "Docker", "Kubernetes", "AWS", "CI/CD", "Git",
                "Databases", "SQL", "NoSQL", "RESTful APIs", "Microservices",
                "Testing", "Agile", "System Design",
            ],
        ),
    ]
}
