// Prompts for the assistant providers. System prompts that expect JSON back
// are combined with `llm_client::prompts::JSON_ONLY_SYSTEM` by the caller.

use crate::assist::SectionKind;

pub const SUMMARY_SYSTEM: &str = "You are an expert resume writer. Create a concise, professional \
    summary paragraph for a resume based on the person's experience, education and skills. \
    If a job description is provided, tailor the summary to the qualifications that role asks for. \
    The summary should be 2-4 sentences, professional in tone, and lead with the candidate's \
    strongest achievements. Reply with the paragraph only.";

pub const SKILLS_SYSTEM: &str = "You are a career advisor who recommends skills for specific \
    professions. Given a job title, an optional industry and the skills a person already has, \
    recommend additional relevant skills.";

pub const IMPROVE_SYSTEM: &str = "You are an expert resume writer who rewrites resume content \
    to be more professional, impactful and achievement-oriented. Use strong action verbs, quantify \
    results where the original supports it, and stay truthful to the original information. \
    Reply with the rewritten text only.";

pub const SCORE_SYSTEM: &str = "You are an expert resume reviewer with years of HR and recruiting \
    experience. Evaluate the resume and return a JSON object of the form \
    {\"score\": number, \"improvements\": string[], \"grammarIssues\": string[]}. \
    The score is 0-100 with 100 a perfect resume. List at most 5 specific, actionable improvements \
    and any grammar or clarity problems.";

pub fn summary_prompt(resume_json: &str, job_description: Option<&str>) -> String {
    let mut prompt = format!("Resume:\n{resume_json}\n");
    if let Some(jd) = job_description {
        prompt.push_str(&format!("\nJob Description:\n{jd}\n"));
    }
    prompt.push_str("\nWrite a concise, professional summary paragraph for this resume.");
    prompt
}

pub fn skills_prompt(job_title: &str, industry: Option<&str>, current_skills: &[String]) -> String {
    let mut prompt = format!("Job Title: {job_title}\n");
    if let Some(industry) = industry {
        prompt.push_str(&format!("Industry: {industry}\n"));
    }
    if !current_skills.is_empty() {
        prompt.push_str(&format!(
            "Current Skills (do not repeat these): {}\n",
            current_skills.join(", ")
        ));
    }
    prompt.push_str(
        "\nSuggest 10-15 relevant technical and soft skills for this job. \
         Return a JSON object of the form {\"skills\": [\"Skill 1\", \"Skill 2\"]}.",
    );
    prompt
}

pub fn improve_prompt(text: &str, kind: SectionKind) -> String {
    let focus = match kind {
        SectionKind::Experience => {
            "Improve this work experience description. Use action verbs, include achievements \
             with metrics where possible, and keep it concise. Keep one bullet per line."
        }
        SectionKind::Project => {
            "Improve this project description to highlight the technical skills, achievements \
             and impact of the work. Be specific about technologies used. Keep one bullet per line."
        }
        SectionKind::Summary => {
            "Improve this professional summary to be more compelling. Highlight key \
             qualifications and achievements in 3-4 sentences."
        }
    };
    format!(
        "{focus}\nThe result should be roughly the same length as the original.\n\n\
         Original {} description:\n{text}",
        kind.label()
    )
}

pub fn score_prompt(resume_json: &str) -> String {
    format!(
        "Resume:\n{resume_json}\n\nEvaluate this resume: give an overall score (0-100), specific \
         improvements, and any grammar or language issues."
    )
}
