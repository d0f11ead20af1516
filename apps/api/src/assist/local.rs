//! Rule-based assistant used when no AI provider is configured or all of
//! them fail. Deterministic and infallible.

use std::sync::Arc;

use crate::assist::SectionKind;
use crate::matching::experience::aggregate_experience;
use crate::models::{ExperienceEntry, ResumeDocument};
use crate::scoring::{heuristic::is_quantified, score_resume, ResumeScore};
use crate::store::MemStore;

/// `source` reported for locally produced results.
pub const SOURCE: &str = "local";

const MAX_SUGGESTIONS: usize = 10;
const SUMMARY_SKILLS: usize = 5;

const ACTION_VERBS: &[&str] = &[
    "achieved", "created", "developed", "implemented", "increased", "reduced", "managed", "led",
    "designed", "built", "improved", "optimized", "analyzed", "collaborated", "delivered",
    "established", "generated", "produced", "trained",
];

const EXPERIENCE_VERBS: &[&str] = &[
    "Developed", "Implemented", "Created", "Led", "Managed", "Delivered", "Improved", "Increased",
    "Reduced", "Achieved",
];

const PROJECT_VERBS: &[&str] = &[
    "Built", "Designed", "Created", "Developed", "Implemented", "Engineered", "Architected",
    "Collaborated on", "Launched", "Optimized",
];

const SUMMARY_LEADS: &[&str] = &[
    "Skilled in", "Specialized in", "Experienced in", "Focused on", "Adept at", "Proficient in",
    "Knowledgeable about", "Passionate about",
];

const EXPERIENCE_METRICS: &[&str] = &[
    "resulting in a 15% increase in efficiency",
    "leading to 20% cost reduction",
    "improving performance by 25%",
    "growing user engagement by 30%",
    "saving the team 10+ hours per week",
];

const PROJECT_DETAILS: &[&str] = &[
    "with over 500 users",
    "handling 1000+ daily transactions",
    "reducing load time by 40%",
    "increasing conversion rate by 25%",
    "processing 10GB of data daily",
];

const FALLBACK_SKILLS: &[(&str, &[&str])] = &[
    (
        "data scientist",
        &[
            "Python", "R", "SQL", "Machine Learning", "TensorFlow", "PyTorch",
            "Data Visualization", "Statistical Analysis", "NLP", "Deep Learning",
        ],
    ),
    (
        "software engineer",
        &[
            "JavaScript", "TypeScript", "React", "Node.js", "Python", "Java", "Docker",
            "Kubernetes", "AWS", "CI/CD",
        ],
    ),
    (
        "product manager",
        &[
            "Agile", "Scrum", "User Research", "Roadmapping", "Product Strategy", "A/B Testing",
            "Analytics", "Competitive Analysis", "Wireframing", "Prioritization",
        ],
    ),
];

const GENERIC_SKILLS: &[&str] = &[
    "Communication", "Problem Solving", "Teamwork", "Critical Thinking", "Time Management",
    "Adaptability", "Leadership", "Project Management",
];

pub struct LocalAssistant {
    store: Arc<MemStore>,
}

impl LocalAssistant {
    pub fn new(store: Arc<MemStore>) -> Self {
        Self { store }
    }

    /// One-paragraph summary assembled from the title, tenure, top skills and
    /// the latest role. Clauses without data are left out.
    pub fn generate_summary(&self, resume: &ResumeDocument) -> String {
        let latest = latest_role(&resume.experience);

        let job_title = [
            resume.personal_details.job_title.trim(),
            latest.map(|e| e.title.trim()).unwrap_or_default(),
        ]
        .into_iter()
        .find(|t| !t.is_empty())
        .unwrap_or("professional");

        let mut summary = job_title.to_string();

        if !resume.experience.is_empty() {
            if let Ok(total) = aggregate_experience(&resume.experience) {
                summary.push_str(&format!(" with {} of experience", total.display));
            }
        }

        let top_skills: Vec<&str> = resume
            .skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .take(SUMMARY_SKILLS)
            .collect();
        if !top_skills.is_empty() {
            summary.push_str(&format!(" specializing in {}", top_skills.join(", ")));
        }
        summary.push('.');

        if let Some(latest) = latest.filter(|e| !e.company.trim().is_empty()) {
            let achievement = latest
                .bullets()
                .next()
                .map(|b| b.trim_end_matches('.').to_lowercase())
                .unwrap_or_else(|| "gained valuable industry experience".to_string());
            summary.push_str(&format!(
                " Most recently worked at {} where I {achievement}.",
                latest.company.trim()
            ));
        }

        summary
    }

    /// Stored suggestion sets first, then the built-in lists. Skills the user
    /// already has are removed and at most ten are returned.
    pub async fn suggest_skills(
        &self,
        job_title: &str,
        industry: Option<&str>,
        current_skills: &[String],
    ) -> Vec<String> {
        let stored = self.store.find_skill_suggestions(job_title, industry).await;

        let pool: Vec<String> = if stored.is_empty() {
            fallback_skills(job_title)
                .iter()
                .map(|s| s.to_string())
                .collect()
        } else {
            stored.into_iter().flat_map(|s| s.skills).collect()
        };

        let mut suggestions: Vec<String> = Vec::new();
        for skill in pool {
            let known = suggestions.contains(&skill)
                || current_skills
                    .iter()
                    .any(|current| current.eq_ignore_ascii_case(&skill));
            if !known {
                suggestions.push(skill);
            }
        }
        suggestions.truncate(MAX_SUGGESTIONS);
        suggestions
    }

    /// Rewrites each line as a bullet led by an action verb and, for
    /// experience and projects, carrying a measurable outcome.
    pub fn improve_description(&self, text: &str, kind: SectionKind) -> String {
        if text.trim().is_empty() {
            return description_template(kind).to_string();
        }

        text.split('\n')
            .map(strip_bullet)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(index, line)| {
                let mut line = if starts_with_action_verb(line) {
                    line.to_string()
                } else {
                    prefix_action_verb(line, kind, index)
                };
                if !is_quantified(&line) {
                    append_quantification(&mut line, kind, index);
                }
                format!("• {line}")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn score_resume(&self, resume: &ResumeDocument) -> ResumeScore {
        score_resume(resume)
    }
}

/// Entry with the greatest parseable start date; the first entry when none parse.
fn latest_role(experience: &[ExperienceEntry]) -> Option<&ExperienceEntry> {
    experience
        .iter()
        .rev()
        .max_by_key(|e| e.start().ok().flatten())
}

fn fallback_skills(job_title: &str) -> &'static [&'static str] {
    let title = job_title.to_lowercase();
    FALLBACK_SKILLS
        .iter()
        .find(|(key, _)| title.contains(key))
        .map(|(_, skills)| *skills)
        .unwrap_or(GENERIC_SKILLS)
}

fn strip_bullet(line: &str) -> &str {
    let line = line.trim();
    line.strip_prefix(['•', '-', '*'])
        .map(str::trim_start)
        .unwrap_or(line)
}

fn starts_with_action_verb(line: &str) -> bool {
    line.split(' ')
        .next()
        .map(|word| ACTION_VERBS.contains(&word.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn prefix_action_verb(line: &str, kind: SectionKind, index: usize) -> String {
    let verbs = match kind {
        SectionKind::Experience => EXPERIENCE_VERBS,
        SectionKind::Project => PROJECT_VERBS,
        SectionKind::Summary => SUMMARY_LEADS,
    };
    let verb = verbs[index % verbs.len()];

    let mut chars = line.chars();
    let rest = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("{verb} {rest}")
}

fn append_quantification(line: &mut String, kind: SectionKind, index: usize) {
    match kind {
        SectionKind::Experience => {
            line.push_str(", ");
            line.push_str(EXPERIENCE_METRICS[index % EXPERIENCE_METRICS.len()]);
        }
        SectionKind::Project => {
            line.push(' ');
            line.push_str(PROJECT_DETAILS[index % PROJECT_DETAILS.len()]);
        }
        SectionKind::Summary => {}
    }
}

fn description_template(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Experience => {
            "• Led a team of X members to implement Y solution\n\
             • Developed and maintained Z, resulting in A% improvement\n\
             • Collaborated with cross-functional teams to deliver B on time and under budget"
        }
        SectionKind::Project => {
            "• Built a web application using X technology that solved Y problem\n\
             • Implemented Z features, resulting in positive user feedback\n\
             • Collaborated with A team members to deliver the project within B timeline"
        }
        SectionKind::Summary => {
            "Professional with X years of experience in Y industry. Skilled in Z tools and \
             methodologies with a proven track record of delivering high-quality results. \
             Passionate about solving complex problems and driving innovation."
        }
    }
}
