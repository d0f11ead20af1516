//! Years-of-experience requirements in job text, and total tenure on a resume.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{DateParseError, ExperienceEntry, YearMonth};

/// Characters of surrounding text kept on each side of a requirement match.
const CONTEXT_RADIUS: usize = 50;

static YEARS_REQUIREMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)(?:\+)?\s+years?\s+(?:of\s+)?experience")
        .expect("valid experience requirement regex")
});

/// A "N years experience" mention found in a job description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceRequirement {
    pub years: u32,
    pub context: String,
}

/// Finds every years-of-experience mention. Repeated mentions are all kept.
pub fn extract_requirements(job_description: &str) -> Vec<ExperienceRequirement> {
    YEARS_REQUIREMENT
        .captures_iter(job_description)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            // Absurdly long digit runs overflow; they are not real requirements.
            let years = caps.get(1)?.as_str().parse::<u32>().ok()?;
            Some(ExperienceRequirement {
                years,
                context: surrounding_text(job_description, whole.start(), whole.end()),
            })
        })
        .collect()
}

/// `text[start..end]` widened by `CONTEXT_RADIUS` characters on both sides.
fn surrounding_text(text: &str, start: usize, end: usize) -> String {
    let from = text[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_RADIUS - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let to = text[end..]
        .char_indices()
        .nth(CONTEXT_RADIUS)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    text[from..to].to_string()
}

/// Summed tenure across all experience entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceTotal {
    pub months: u32,
    /// "N+ years" from twelve months on, "N months" below that.
    pub display: String,
}

impl ExperienceTotal {
    pub fn from_months(months: u32) -> Self {
        let display = if months >= 12 {
            format!("{}+ years", months / 12)
        } else {
            format!("{months} months")
        };
        Self { months, display }
    }

    pub fn covers_years(&self, years: u32) -> bool {
        u64::from(self.months) >= u64::from(years) * 12
    }
}

/// Sums tenure up to the current month. See [`aggregate_experience_at`].
pub fn aggregate_experience(
    entries: &[ExperienceEntry],
) -> Result<ExperienceTotal, DateParseError> {
    aggregate_experience_at(entries, YearMonth::today())
}

/// Sums month spans of every entry with a start date.
///
/// Current entries and entries without an end date run to `today`. Reversed
/// ranges count as zero. Overlapping jobs are counted twice.
pub fn aggregate_experience_at(
    entries: &[ExperienceEntry],
    today: YearMonth,
) -> Result<ExperienceTotal, DateParseError> {
    let mut total: u64 = 0;

    for entry in entries {
        let Some(start) = entry.start()? else {
            continue;
        };
        let end = entry.end()?.unwrap_or(today);
        total += start.months_until(end).max(0) as u64;
    }

    Ok(ExperienceTotal::from_months(
        u32::try_from(total).unwrap_or(u32::MAX),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn today() -> YearMonth {
        YearMonth::new(2024, 6).unwrap()
    }

    fn job(start: &str, end: Option<&str>, current: bool) -> ExperienceEntry {
        ExperienceEntry {
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            start_date: start.to_string(),
            end_date: end.map(str::to_string),
            current,
            ..Default::default()
        }
    }

    #[test]
    fn test_extract_plus_and_of_forms() {
        let reqs = extract_requirements(
            "Need 5+ years of experience in Rust. Also 3 year experience with Go.",
        );
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].years, 5);
        assert_eq!(reqs[1].years, 3);
    }

    #[test]
    fn test_extract_is_case_insensitive() {
        let reqs = extract_requirements("7 YEARS EXPERIENCE");
        assert_eq!(reqs[0].years, 7);
        assert_eq!(reqs[0].context, "7 YEARS EXPERIENCE");
    }

    #[test]
    fn test_extract_keeps_duplicates() {
        let reqs =
            extract_requirements("5 years experience required. We repeat: 5 years experience.");
        assert_eq!(reqs.len(), 2);
    }

    #[test]
    fn test_extract_none() {
        assert!(extract_requirements("Entry level role, no experience needed").is_empty());
    }

    #[test]
    fn test_context_window_is_clamped_to_fifty_chars() {
        let prefix = "x".repeat(80);
        let suffix = "y".repeat(80);
        let text = format!("{prefix}10 years experience{suffix}");
        let reqs = extract_requirements(&text);
        let expected = format!("{}10 years experience{}", "x".repeat(50), "y".repeat(50));
        assert_eq!(reqs[0].context, expected);
    }

    #[test]
    fn test_context_respects_multibyte_chars() {
        let text = format!("{}2 years experience{}", "é".repeat(60), "ü".repeat(60));
        let reqs = extract_requirements(&text);
        assert_eq!(reqs[0].context.chars().count(), 50 + "2 years experience".len() + 50);
    }

    #[test]
    fn test_aggregate_empty_is_zero_months() {
        let total = aggregate_experience_at(&[], today()).unwrap();
        assert_eq!(total, ExperienceTotal::from_months(0));
        assert_eq!(total.display, "0 months");
    }

    #[test]
    fn test_aggregate_sums_closed_ranges() {
        let entries = vec![
            job("2019-06", Some("2023-01"), false),
            job("2017-08", Some("2019-05"), false),
        ];
        let total = aggregate_experience_at(&entries, today()).unwrap();
        assert_eq!(total.months, 43 + 21);
        assert_eq!(total.display, "5+ years");
    }

    #[test]
    fn test_aggregate_current_runs_to_today() {
        let entries = vec![job("2022-06", Some("2022-07"), true)];
        let total = aggregate_experience_at(&entries, today()).unwrap();
        assert_eq!(total.months, 24);
        assert_eq!(total.display, "2+ years");
    }

    #[test]
    fn test_aggregate_missing_end_is_ongoing() {
        let entries = vec![job("2024-01", None, false)];
        let total = aggregate_experience_at(&entries, today()).unwrap();
        assert_eq!(total.months, 5);
        assert_eq!(total.display, "5 months");
    }

    #[test]
    fn test_aggregate_skips_blank_start() {
        let entries = vec![job("", Some("2020-01"), false), job("2024-03", None, true)];
        let total = aggregate_experience_at(&entries, today()).unwrap();
        assert_eq!(total.months, 3);
    }

    #[test]
    fn test_aggregate_floors_reversed_ranges() {
        let entries = vec![job("2023-01", Some("2021-01"), false)];
        assert_eq!(aggregate_experience_at(&entries, today()).unwrap().months, 0);
    }

    #[test]
    fn test_aggregate_future_current_start_is_zero() {
        let entries = vec![job("2030-01", None, true)];
        assert_eq!(aggregate_experience_at(&entries, today()).unwrap().months, 0);
    }

    #[test]
    fn test_aggregate_double_counts_overlap() {
        let entries = vec![
            job("2020-01", Some("2021-01"), false),
            job("2020-01", Some("2021-01"), false),
        ];
        assert_eq!(aggregate_experience_at(&entries, today()).unwrap().months, 24);
    }

    #[test]
    fn test_aggregate_rejects_invalid_dates() {
        let entries = vec![job("last spring", None, false)];
        assert!(aggregate_experience_at(&entries, today()).is_err());
    }

    #[test]
    fn test_covers_years() {
        let total = ExperienceTotal::from_months(59);
        assert!(!total.covers_years(5));
        assert!(total.covers_years(4));
        assert!(ExperienceTotal::from_months(60).covers_years(5));
    }

    proptest! {
        #[test]
        fn prop_current_entry_never_negative(year in 1990i32..2100, month in 1u32..=12) {
            let start = YearMonth::new(year, month).unwrap().to_string();
            let entries = vec![job(&start, None, true)];
            let total = aggregate_experience_at(&entries, today()).unwrap();
            let expected = YearMonth::new(year, month).unwrap().months_until(today()).max(0);
            prop_assert_eq!(i64::from(total.months), expected);
        }
    }
}
