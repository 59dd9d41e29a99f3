//! Assembles a structured [`Document`] into a single markdown string.
//!
//! # Assembly rules
//! - Section order is fixed: contact, summary, skills, experience,
//!   education, projects.
//! - A section whose content is empty after trimming is omitted entirely —
//!   no empty headings.
//! - Entry blocks appear in list order; no sorting is applied.
//! - Blocks are joined by one blank line; the result has no leading or
//!   trailing blank lines.
//!
//! `assemble` is pure and idempotent: the same document always yields a
//! byte-identical string, and nothing in here can fail.

use crate::document::{ContactInfo, Document, Entry};

const SUMMARY_HEADING: &str = "Professional Summary";
const SKILLS_HEADING: &str = "Skills";
const EXPERIENCE_HEADING: &str = "Work Experience";
const EDUCATION_HEADING: &str = "Education";
const PROJECTS_HEADING: &str = "Projects";

/// Renders the full document as markdown.
pub fn assemble(doc: &Document) -> String {
    let blocks = [
        contact_block(&doc.contact_info),
        heading_block(SUMMARY_HEADING, &doc.summary),
        heading_block(SKILLS_HEADING, &doc.skills),
        entries_block(EXPERIENCE_HEADING, &doc.experience),
        entries_block(EDUCATION_HEADING, &doc.education),
        entries_block(PROJECTS_HEADING, &doc.projects),
    ];

    blocks
        .into_iter()
        .filter(|b| !b.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Contact block: name heading plus one labeled line per present optional
/// field, in fixed order. Omitted entirely when no optional field is set;
/// a blank name drops the heading line but keeps the labeled lines.
fn contact_block(contact: &ContactInfo) -> String {
    let mut lines = Vec::new();
    if let Some(email) = non_empty(&contact.email) {
        lines.push(format!("- Email: {email}"));
    }
    if let Some(mobile) = non_empty(&contact.mobile) {
        lines.push(format!("- Mobile: {mobile}"));
    }
    if let Some(linkedin) = non_empty(&contact.linkedin) {
        lines.push(format!("- LinkedIn: {linkedin}"));
    }
    if let Some(twitter) = non_empty(&contact.twitter) {
        lines.push(format!("- Twitter: {twitter}"));
    }

    if lines.is_empty() {
        return String::new();
    }
    let body = lines.join("\n");
    let name = contact.full_name.trim();
    if name.is_empty() {
        return body;
    }
    format!("## {name}\n\n{body}")
}

fn heading_block(heading: &str, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return String::new();
    }
    format!("## {heading}\n\n{body}")
}

fn entries_block(heading: &str, entries: &[Entry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let blocks: Vec<String> = entries.iter().map(entry_block).collect();
    format!("## {heading}\n\n{}", blocks.join("\n\n"))
}

fn entry_block(entry: &Entry) -> String {
    let mut block = format!(
        "### {} @ {}",
        entry.title.trim(),
        entry.organization.trim()
    );
    if let Some(range) = date_range(entry) {
        block.push('\n');
        block.push_str(&range);
    }
    let description = entry.description.trim();
    if !description.is_empty() {
        block.push_str("\n\n");
        block.push_str(description);
    }
    block
}

/// `start - end` with either side omitted when unset; the `Present`
/// sentinel is rendered verbatim. `None` when no date is set at all.
fn date_range(entry: &Entry) -> Option<String> {
    let start = entry.start_date.trim();
    let end = entry.end_date.trim();
    match (start.is_empty(), end.is_empty()) {
        (true, true) => None,
        (false, true) => Some(start.to_string()),
        (true, false) => Some(end.to_string()),
        (false, false) => Some(format!("{start} - {end}")),
    }
}
