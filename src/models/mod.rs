mod project;

pub use project::{Project, ProjectDraft, Tone};

#[cfg(test)]
pub use project::ProjectStatus;
