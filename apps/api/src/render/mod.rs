//! PDF export of a resume document.
//!
//! Layout is a single text column on US letter paper. Each template picks a
//! font family, a name size and a section order. Text is wrapped with the
//! static width tables in [`font_metrics`] and flows onto new pages when the
//! cursor reaches the bottom margin.

pub mod font_metrics;
pub mod handlers;

use lopdf::{
    content::{Content, Operation},
    Dictionary, Document, Object, Stream, StringFormat,
};
use thiserror::Error;
use tracing::debug;

use crate::models::{
    EducationEntry, ExperienceEntry, ProjectEntry, ResumeDocument, Template, YearMonth,
};
use font_metrics::{FontFamily, FontWeight};

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 54.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const LINE_SPACING: f32 = 1.3;
const BULLET_INDENT: f32 = 12.0;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to encode page content: {0}")]
    Encode(String),

    #[error("failed to write PDF: {0}")]
    Write(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
}

struct TemplateStyle {
    family: FontFamily,
    name_size: f32,
    heading_size: f32,
    body_size: f32,
    sections: [(Section, &'static str); 5],
}

impl TemplateStyle {
    fn for_template(template: Template) -> Self {
        match template {
            Template::Professional => Self {
                family: FontFamily::Helvetica,
                name_size: 22.0,
                heading_size: 12.5,
                body_size: 10.0,
                sections: [
                    (Section::Summary, "Professional Summary"),
                    (Section::Experience, "Work Experience"),
                    (Section::Education, "Education"),
                    (Section::Skills, "Skills"),
                    (Section::Projects, "Projects"),
                ],
            },
            Template::Creative => Self {
                family: FontFamily::Helvetica,
                name_size: 30.0,
                heading_size: 13.0,
                body_size: 10.0,
                sections: [
                    (Section::Summary, "About Me"),
                    (Section::Experience, "Experience"),
                    (Section::Projects, "Projects"),
                    (Section::Skills, "Skills"),
                    (Section::Education, "Education"),
                ],
            },
            Template::Academic => Self {
                family: FontFamily::Times,
                name_size: 20.0,
                heading_size: 12.5,
                body_size: 11.0,
                sections: [
                    (Section::Summary, "Research Interests & Summary"),
                    (Section::Education, "Education"),
                    (Section::Projects, "Research & Projects"),
                    (Section::Experience, "Professional Experience"),
                    (Section::Skills, "Technical Skills"),
                ],
            },
        }
    }
}

/// Section headings in the order a template prints them.
#[cfg(test)]
pub fn section_titles(template: Template) -> [&'static str; 5] {
    TemplateStyle::for_template(template).sections.map(|(_, title)| title)
}

/// Renders the resume to PDF bytes.
pub fn render_resume_pdf(resume: &ResumeDocument) -> Result<Vec<u8>, RenderError> {
    let style = TemplateStyle::for_template(resume.template);
    let pages = layout(resume, &style);
    debug!(
        "Laid out {} page(s) with the {} template",
        pages.len(),
        resume.template.id()
    );
    assemble(pages, style.family, &resume.title)
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

/// Accumulates text operations page by page with a top-down cursor.
struct PageWriter {
    family: FontFamily,
    pages: Vec<Vec<Operation>>,
    y: f32,
}

impl PageWriter {
    fn new(family: FontFamily) -> Self {
        Self {
            family,
            pages: vec![Vec::new()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn ops(&mut self) -> &mut Vec<Operation> {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Starts a new page unless `height` more points fit above the bottom margin.
    fn reserve(&mut self, height: f32) {
        let page_has_content = self.pages.last().is_some_and(|ops| !ops.is_empty());
        if self.y - height < MARGIN && page_has_content {
            self.pages.push(Vec::new());
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn gap(&mut self, points: f32) {
        self.y -= points;
    }

    fn show_text(&mut self, text: &str, weight: FontWeight, size: f32, x: f32, y: f32) {
        let font = match weight {
            FontWeight::Regular => "F1",
            FontWeight::Bold => "F2",
        };
        let ops = self.ops();
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![Object::Name(font.as_bytes().to_vec()), Object::Real(size)],
        ));
        ops.push(Operation::new("Td", vec![Object::Real(x), Object::Real(y)]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Hexadecimal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    /// One line of text at the cursor; `right` is drawn flush with the right margin.
    fn line(
        &mut self,
        left: &str,
        right: Option<&str>,
        weight: FontWeight,
        size: f32,
        indent: f32,
    ) {
        let leading = size * LINE_SPACING;
        self.reserve(leading);
        let baseline = self.y - size;
        self.show_text(left, weight, size, MARGIN + indent, baseline);
        if let Some(right) = right.filter(|r| !r.is_empty()) {
            let width = self
                .family
                .metrics(FontWeight::Regular)
                .measure_str(right, size);
            self.show_text(
                right,
                FontWeight::Regular,
                size,
                PAGE_WIDTH - MARGIN - width,
                baseline,
            );
        }
        self.y -= leading;
    }

    fn paragraph(&mut self, text: &str, weight: FontWeight, size: f32, indent: f32) {
        let metrics = self.family.metrics(weight);
        for line in metrics.wrap(text, size, CONTENT_WIDTH - indent) {
            self.line(&line, None, weight, size, indent);
        }
    }

    /// Bulleted paragraph with a hanging indent.
    fn bullet(&mut self, text: &str, size: f32) {
        let metrics = self.family.metrics(FontWeight::Regular);
        let lines = metrics.wrap(text, size, CONTENT_WIDTH - 2.0 * BULLET_INDENT);
        for (i, line) in lines.iter().enumerate() {
            if i == 0 {
                let leading = size * LINE_SPACING;
                self.reserve(leading);
                let baseline = self.y - size;
                let bullet_x = MARGIN + BULLET_INDENT / 2.0;
                let text_x = MARGIN + 2.0 * BULLET_INDENT;
                self.show_text("•", FontWeight::Regular, size, bullet_x, baseline);
                self.show_text(line, FontWeight::Regular, size, text_x, baseline);
                self.y -= leading;
            } else {
                self.line(line, None, FontWeight::Regular, size, 2.0 * BULLET_INDENT);
            }
        }
    }

    /// Section title followed by a thin rule.
    fn heading(&mut self, title: &str, size: f32) {
        // Keep the heading with at least two body lines.
        self.reserve(size * LINE_SPACING * 3.0);
        self.gap(size * 0.6);
        self.line(title, None, FontWeight::Bold, size, 0.0);
        let y = self.y + size * 0.15;
        let ops = self.ops();
        ops.push(Operation::new("w", vec![Object::Real(0.6)]));
        ops.push(Operation::new("m", vec![Object::Real(MARGIN), Object::Real(y)]));
        ops.push(Operation::new(
            "l",
            vec![Object::Real(PAGE_WIDTH - MARGIN), Object::Real(y)],
        ));
        ops.push(Operation::new("S", vec![]));
        self.gap(size * 0.3);
    }

    fn into_pages(self) -> Vec<Vec<Operation>> {
        self.pages
    }
}

fn layout(resume: &ResumeDocument, style: &TemplateStyle) -> Vec<Vec<Operation>> {
    let mut writer = PageWriter::new(style.family);
    write_header(&mut writer, resume, style);

    for (section, title) in style.sections {
        match section {
            Section::Summary => {
                let summary = resume.personal_details.summary.trim();
                if !summary.is_empty() {
                    writer.heading(title, style.heading_size);
                    writer.paragraph(summary, FontWeight::Regular, style.body_size, 0.0);
                }
            }
            Section::Experience => {
                if !resume.experience.is_empty() {
                    writer.heading(title, style.heading_size);
                    for entry in &resume.experience {
                        write_experience(&mut writer, entry, style.body_size);
                    }
                }
            }
            Section::Education => {
                if !resume.education.is_empty() {
                    writer.heading(title, style.heading_size);
                    for entry in &resume.education {
                        write_education(&mut writer, entry, style.body_size);
                    }
                }
            }
            Section::Skills => {
                let skills: Vec<&str> = resume
                    .skills
                    .iter()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .collect();
                if !skills.is_empty() {
                    writer.heading(title, style.heading_size);
                    writer.paragraph(&skills.join(", "), FontWeight::Regular, style.body_size, 0.0);
                }
            }
            Section::Projects => {
                if !resume.projects.is_empty() {
                    writer.heading(title, style.heading_size);
                    for project in &resume.projects {
                        write_project(&mut writer, project, style.body_size);
                    }
                }
            }
        }
    }

    writer.into_pages()
}

fn write_header(writer: &mut PageWriter, resume: &ResumeDocument, style: &TemplateStyle) {
    let details = &resume.personal_details;
    if !details.name.trim().is_empty() {
        writer.line(details.name.trim(), None, FontWeight::Bold, style.name_size, 0.0);
    }
    if !details.job_title.trim().is_empty() {
        writer.line(
            details.job_title.trim(),
            None,
            FontWeight::Regular,
            style.body_size + 2.0,
            0.0,
        );
    }

    let contact: Vec<&str> = [
        Some(details.email.as_str()),
        Some(details.phone.as_str()),
        Some(details.location.as_str()),
        details.linkedin.as_deref(),
        details.github.as_deref(),
        details.website.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .collect();
    if !contact.is_empty() {
        writer.paragraph(&contact.join("  |  "), FontWeight::Regular, style.body_size - 1.0, 0.0);
    }
    writer.gap(style.body_size * 0.5);
}

fn write_experience(writer: &mut PageWriter, entry: &ExperienceEntry, size: f32) {
    let dates = date_range(&entry.start_date, entry.end_date.as_deref(), entry.current);
    writer.line(entry.title.trim(), Some(dates.as_str()), FontWeight::Bold, size, 0.0);

    let employer = join_present(&[entry.company.as_str(), entry.location.as_deref().unwrap_or("")]);
    if !employer.is_empty() {
        writer.line(&employer, None, FontWeight::Regular, size, 0.0);
    }
    for bullet in entry.bullets() {
        writer.bullet(bullet, size);
    }
    writer.gap(size * 0.4);
}

fn write_education(writer: &mut PageWriter, entry: &EducationEntry, size: f32) {
    let dates = date_range(&entry.start_date, entry.end_date.as_deref(), entry.current);
    writer.line(entry.degree.trim(), Some(dates.as_str()), FontWeight::Bold, size, 0.0);

    let school = join_present(&[
        entry.institution.as_str(),
        entry.location.as_deref().unwrap_or(""),
    ]);
    if !school.is_empty() {
        writer.line(&school, None, FontWeight::Regular, size, 0.0);
    }
    if let Some(description) = entry
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        writer.paragraph(description, FontWeight::Regular, size, 0.0);
    }
    writer.gap(size * 0.4);
}

fn write_project(writer: &mut PageWriter, project: &ProjectEntry, size: f32) {
    let link = project.link.as_deref().map(str::trim).filter(|l| !l.is_empty());
    writer.line(project.name.trim(), link, FontWeight::Bold, size, 0.0);
    for line in project.description.lines() {
        let line = line.trim().trim_start_matches(['•', '-', '*']).trim();
        if !line.is_empty() {
            writer.bullet(line, size);
        }
    }
    writer.gap(size * 0.4);
}

fn join_present(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// "Jan 2020 - Present". Unparseable dates are printed as entered.
fn date_range(start: &str, end: Option<&str>, current: bool) -> String {
    let start = display_month(start);
    let end = if current {
        "Present".to_string()
    } else {
        end.map(display_month).unwrap_or_default()
    };
    match (start.is_empty(), end.is_empty()) {
        (true, true) => String::new(),
        (false, true) => start,
        (true, false) => end,
        (false, false) => format!("{start} - {end}"),
    }
}

fn display_month(raw: &str) -> String {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    match YearMonth::parse_optional(raw) {
        Ok(Some(date)) => format!("{} {}", MONTHS[(date.month - 1) as usize], date.year),
        Ok(None) => String::new(),
        Err(_) => raw.trim().to_string(),
    }
}

/// Encodes text for a WinAnsiEncoding font. Characters outside the code page become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '\t' => b' ',
            '\u{20ac}' => 0x80,
            '\u{201a}' => 0x82,
            '\u{0192}' => 0x83,
            '\u{201e}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2020}' => 0x86,
            '\u{2021}' => 0x87,
            '\u{02c6}' => 0x88,
            '\u{2030}' => 0x89,
            '\u{0160}' => 0x8a,
            '\u{2039}' => 0x8b,
            '\u{0152}' => 0x8c,
            '\u{017d}' => 0x8e,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{02dc}' => 0x98,
            '\u{2122}' => 0x99,
            '\u{0161}' => 0x9a,
            '\u{203a}' => 0x9b,
            '\u{0153}' => 0x9c,
            '\u{017e}' => 0x9e,
            '\u{0178}' => 0x9f,
            _ => b'?',
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Document assembly
// ────────────────────────────────────────────────────────────────────────────

fn font_dictionary(family: FontFamily, weight: FontWeight) -> Dictionary {
    Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        (
            "BaseFont",
            Object::Name(family.base_font(weight).as_bytes().to_vec()),
        ),
        ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
    ])
}

fn assemble(
    pages: Vec<Vec<Operation>>,
    family: FontFamily,
    title: &str,
) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary(family, FontWeight::Regular));
    let bold_id = doc.add_object(font_dictionary(family, FontWeight::Bold));
    let resources_id = doc.add_object(Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![
            ("F1", Object::Reference(regular_id)),
            ("F2", Object::Reference(bold_id)),
        ])),
    )]));

    let mut page_ids = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(PAGE_WIDTH as i64),
                    Object::Integer(PAGE_HEIGHT as i64),
                ]),
            ),
            ("Resources", Object::Reference(resources_id)),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(page_ids.len() as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    if !title.trim().is_empty() {
        let info_id = doc.add_object(Dictionary::from_iter(vec![(
            "Title",
            Object::String(encode_win_ansi(title.trim()), StringFormat::Literal),
        )]));
        doc.trailer.set("Info", Object::Reference(info_id));
    }

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| RenderError::Write(e.to_string()))?;
    Ok(output)
}
