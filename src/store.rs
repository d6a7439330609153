use crate::models::Project;

/// Client side list of the user's projects, in backend order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProjectStore {
    projects: Vec<Project>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&mut self, projects: Vec<Project>) {
        self.projects = projects;
    }

    pub fn append(&mut self, project: Project) {
        self.projects.push(project);
    }

    /// Swaps in `project` for the record sharing its id. Returns false when no
    /// record matched, in which case the store is left as is.
    pub fn replace(&mut self, project: Project) -> bool {
        match self.projects.iter_mut().find(|p| p.id == project.id) {
            Some(slot) => {
                *slot = project;
                true
            }
            None => false,
        }
    }

    /// Drops every record with `id`, keeping the rest in order.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.projects.len();
        self.projects.retain(|p| p.id != id);
        self.projects.len() != before
    }

    pub fn get(&self, index: usize) -> Option<&Project> {
        self.projects.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
