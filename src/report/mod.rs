// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ene-copilot contributors

//! Plan rendering and downloadable artifacts
//!
//! The final answer is free text. For display it is cut into sections on blank
//! lines; the two artifact files are filled from templates around the inputs
//! and never parse the answer.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::CopilotResult;
use crate::pipeline::PipelineInput;

pub const PLAN_FILE_NAME: &str = "entrepreneurship_business_plan.txt";
pub const SUMMARY_FILE_NAME: &str = "executive_summary.txt";

/// Fragments shorter than this are shown as headings
const HEADING_MAX_CHARS: usize = 100;

/// One display block of the plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Heading(String),
    Body(String),
}

/// Split text on blank lines and classify each fragment
pub fn split_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    let mut flush = |lines: &mut Vec<&str>| {
        if lines.is_empty() {
            return;
        }
        let fragment = lines.join("\n");
        lines.clear();
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return;
        }
        sections.push(if is_heading(fragment) {
            Section::Heading(fragment.to_string())
        } else {
            Section::Body(fragment.to_string())
        });
    };

    for line in text.lines() {
        if line.trim().is_empty() {
            flush(&mut current);
        } else {
            current.push(line);
        }
    }
    flush(&mut current);

    sections
}

fn is_heading(fragment: &str) -> bool {
    fragment.starts_with('#')
        || fragment.starts_with("**")
        || fragment.chars().count() < HEADING_MAX_CHARS
}

/// The complete plan file
pub fn full_plan(input: &PipelineInput, result: &str, date: NaiveDate) -> String {
    let wide = "=".repeat(80);
    let narrow = "=".repeat(40);

    format!(
        "# ENTREPRENEURSHIP COPILOT - BUSINESS PLAN\n\
         {wide}\n\
         \n\
         ## STARTUP OVERVIEW\n\
         {narrow}\n\
         \n\
         **Startup Idea:**\n\
         {idea}\n\
         \n\
         **Target Market:**\n\
         {market}\n\
         \n\
         **Team Composition:**\n\
         {team}\n\
         \n\
         ## GENERATED STRATEGIC PLAN\n\
         {narrow}\n\
         \n\
         {result}\n\
         \n\
         {wide}\n\
         Generated by Entrepreneurship Copilot - AI-Powered Business Planning\n\
         Date: {date}\n\
         {wide}\n",
        idea = input.startup_idea,
        market = input.target_market,
        team = input.team_composition,
        result = result.trim(),
        date = date.format("%B %d, %Y"),
    )
}

/// The one-page summary file
pub fn executive_summary(input: &PipelineInput) -> String {
    format!(
        "# EXECUTIVE SUMMARY - {idea}...\n\
         {rule}\n\
         \n\
         ## Key Information\n\
         - **Business Type:** AI-Powered Solution\n\
         - **Target Market:** {market}...\n\
         - **Team Size:** Multiple skilled professionals\n\
         - **Plans Generated:** Business Strategy, MVP Plan, GTM Strategy\n\
         \n\
         ## Strategic Focus Areas\n\
         - Market Analysis & Competitive Positioning\n\
         - Product Development & MVP Strategy\n\
         - Revenue Model & Financial Projections\n\
         - Go-to-Market & Customer Acquisition\n\
         - Risk Assessment & Mitigation\n\
         \n\
         ## Next Steps\n\
         1. Market validation and customer research\n\
         2. MVP development and testing\n\
         3. Funding strategy execution\n\
         4. Team building and scaling\n\
         5. Go-to-market implementation\n\
         \n\
         Generated by Entrepreneurship Copilot\n",
        idea = truncate_chars(&input.startup_idea, 50),
        market = truncate_chars(&input.target_market, 100),
        rule = "=".repeat(60),
    )
}

/// First `max` characters, never splitting a character
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Write both artifacts into `dir`, creating it if needed
pub fn write_artifacts(
    dir: &Path,
    input: &PipelineInput,
    result: &str,
    date: NaiveDate,
) -> CopilotResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let plan = dir.join(PLAN_FILE_NAME);
    std::fs::write(&plan, full_plan(input, result, date))?;

    let summary = dir.join(SUMMARY_FILE_NAME);
    std::fs::write(&summary, executive_summary(input))?;

    info!(dir = %dir.display(), "Wrote plan artifacts");
    Ok(vec![plan, summary])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn input() -> PipelineInput {
        PipelineInput {
            startup_idea: "AI meal-planning app".into(),
            target_market: "health-conscious 25-40yo".into(),
            team_composition: "CEO, CTO, ML engineer".into(),
        }
    }

    #[test]
    fn test_split_sections() {
        let long = "x".repeat(120);
        let text = format!(
            "## Market\n\n{long}\n\n**Pricing** is freemium with a premium tier that costs more than the free one and so on and so forth.\n\n\n\nShort line\n"
        );

        let sections = split_sections(&text);

        assert_eq!(
            sections,
            vec![
                Section::Heading("## Market".into()),
                Section::Body(long),
                Section::Heading(
                    "**Pricing** is freemium with a premium tier that costs more than the free one and so on and so forth."
                        .into()
                ),
                Section::Heading("Short line".into()),
            ]
        );
    }

    #[test]
    fn test_multiline_fragment_stays_together() {
        let body = format!("{}\nsecond line", "y".repeat(100));
        let sections = split_sections(&body);
        assert_eq!(sections, vec![Section::Body(body)]);
    }

    #[test]
    fn test_empty_text_has_no_sections() {
        assert!(split_sections("\n\n  \n").is_empty());
    }

    #[test]
    fn test_full_plan_template() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let plan = full_plan(&input(), "  THE PLAN \n", date);

        assert!(plan.starts_with("# ENTREPRENEURSHIP COPILOT - BUSINESS PLAN\n"));
        assert!(plan.contains("**Startup Idea:**\nAI meal-planning app\n"));
        assert!(plan.contains("**Team Composition:**\nCEO, CTO, ML engineer\n"));
        assert!(plan.contains("\n\nTHE PLAN\n\n"));
        assert!(plan.contains("Date: March 07, 2025\n"));
    }

    #[test]
    fn test_summary_truncates_on_char_boundaries() {
        let input = PipelineInput {
            startup_idea: "é".repeat(60),
            target_market: "short market".into(),
            team_composition: String::new(),
        };

        let summary = executive_summary(&input);

        let first = summary.lines().next().unwrap();
        assert_eq!(first, format!("# EXECUTIVE SUMMARY - {}...", "é".repeat(50)));
        assert!(summary.contains("- **Target Market:** short market...\n"));
    }

    #[test]
    fn test_summary_ignores_result() {
        assert_eq!(executive_summary(&input()), executive_summary(&input()));
        assert!(!executive_summary(&input()).contains("CEO"));
    }

    #[test]
    fn test_write_artifacts() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("out");
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let paths = write_artifacts(&dir, &input(), "PLAN", date).unwrap();

        assert_eq!(paths, vec![dir.join(PLAN_FILE_NAME), dir.join(SUMMARY_FILE_NAME)]);
        let plan = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(plan.contains("PLAN"));
        let summary = std::fs::read_to_string(&paths[1]).unwrap();
        assert!(summary.starts_with("# EXECUTIVE SUMMARY - AI meal-planning app...\n"));
    }
}
