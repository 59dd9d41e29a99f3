//! Structured resume document — the single source of truth for the form
//! representation. The markdown preview is derived from this model by
//! [`markdown::assemble`]; entry lists keep insertion order (display order
//! is entry order, never sorted).

pub mod handlers;
pub mod markdown;
pub mod validate;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel accepted in `Entry::end_date` for ongoing engagements.
/// Rendered verbatim in the assembled markdown.
pub const PRESENT: &str = "Present";

/// One record in an experience/education/projects list.
///
/// Dates use the month-input format `YYYY-MM`; an empty string means the
/// date is not set. `end_date` may also be the [`PRESENT`] sentinel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    pub organization: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub description: String,
}

/// Contact details. `full_name` comes from the authenticated profile, not
/// from user input; every other field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
}

/// The complete structured representation of a resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub experience: Vec<Entry>,
    #[serde(default)]
    pub education: Vec<Entry>,
    #[serde(default)]
    pub projects: Vec<Entry>,
}

/// The three repeatable entry sections, in their fixed display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Experience,
    Education,
    Projects,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Projects => "projects",
        }
    }
}

impl Document {
    pub fn entries(&self, section: Section) -> &Vec<Entry> {
        match section {
            Section::Experience => &self.experience,
            Section::Education => &self.education,
            Section::Projects => &self.projects,
        }
    }

    pub fn entries_mut(&mut self, section: Section) -> &mut Vec<Entry> {
        match section {
            Section::Experience => &mut self.experience,
            Section::Education => &mut self.education,
            Section::Projects => &mut self.projects,
        }
    }
}

/// Partial update for a single entry. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub organization: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

impl EntryPatch {
    pub fn apply(self, entry: &mut Entry) {
        if let Some(v) = self.title {
            entry.title = v;
        }
        if let Some(v) = self.organization {
            entry.organization = v;
        }
        if let Some(v) = self.start_date {
            entry.start_date = v;
        }
        if let Some(v) = self.end_date {
            entry.end_date = v;
        }
        if let Some(v) = self.description {
            entry.description = v;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("entry index {index} out of range (section has {len} entries)")]
pub struct IndexOutOfRange {
    pub index: usize,
    pub len: usize,
}

/// Appends to the end of the list; most-recently-entered entries display
/// last.
pub fn append_entry(list: &mut Vec<Entry>, entry: Entry) {
    list.push(entry);
}

/// Replaces the patched fields of the entry at `index`.
pub fn update_entry(
    list: &mut [Entry],
    index: usize,
    patch: EntryPatch,
) -> Result<(), IndexOutOfRange> {
    let len = list.len();
    let entry = list.get_mut(index).ok_or(IndexOutOfRange { index, len })?;
    patch.apply(entry);
    Ok(())
}

/// Removes the entry at `index`; subsequent entries shift down.
pub fn remove_entry(list: &mut Vec<Entry>, index: usize) -> Result<Entry, IndexOutOfRange> {
    if index >= list.len() {
        return Err(IndexOutOfRange {
            index,
            len: list.len(),
        });
    }
    Ok(list.remove(index))
}
