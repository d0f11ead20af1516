pub mod dates;
pub mod document;
pub mod records;

pub use dates::{DateParseError, YearMonth};
pub use document::{
    EducationEntry, ExperienceEntry, PersonalDetails, ProjectEntry, ResumeDocument, Template,
};
