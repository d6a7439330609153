use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    #[serde(rename = "In progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::InProgress => "In progress",
            ProjectStatus::Completed => "Completed",
        }
    }

    /// Label used by the status select
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            ProjectStatus::InProgress => Tone::Warning,
            ProjectStatus::Completed => Tone::Success,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ProjectStatus::InProgress => ProjectStatus::Completed,
            ProjectStatus::Completed => ProjectStatus::InProgress,
        }
    }
}

/// Visual emphasis of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Warning,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "projectName", default)]
    pub project_name: String,
    pub status: ProjectStatus,
    #[serde(rename = "dueDate", default)]
    pub due_date: String,
    #[serde(rename = "userEmail", default)]
    pub user_email: String,
}

impl Project {
    /// The record with the draft's fields laid over it; id and owner stay.
    pub fn merged_with(&self, draft: &ProjectDraft) -> Project {
        Project {
            project_name: draft.project_name.clone(),
            status: draft.status,
            due_date: draft.due_date.clone(),
            ..self.clone()
        }
    }

    pub fn tone(&self) -> Tone {
        self.status.tone()
    }

    pub fn due_date_display(&self) -> String {
        display_date(&self.due_date)
    }
}

/// Form fields not yet submitted
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectDraft {
    #[serde(rename = "projectName")]
    pub project_name: String,
    pub status: ProjectStatus,
    #[serde(rename = "dueDate")]
    pub due_date: String,
}

impl ProjectDraft {
    pub fn from_project(project: &Project) -> Self {
        Self {
            project_name: project.project_name.clone(),
            status: project.status,
            due_date: project.due_date.clone(),
        }
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        parse_date(&self.due_date)
    }
}

/// Reads the leading `YYYY-MM-DD` of a stored date, which also covers
/// full timestamps such as `2025-01-01T00:00:00.000Z`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

pub fn display_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format("%-m/%-d/%Y").to_string(),
        None => "Invalid Date".to_string(),
    }
}
