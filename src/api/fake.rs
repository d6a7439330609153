use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::watch;

use super::{ApiError, ProjectApi};
use crate::identity::Identity;
use crate::models::{Project, ProjectDraft};

/// In-memory backend that assigns ids, can be told to fail, and can hold
/// every call until released.
pub struct FakeApi {
    server: Mutex<Vec<Project>>,
    next_id: AtomicU64,
    calls: AtomicUsize,
    fail: AtomicBool,
    gate: watch::Sender<bool>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self::with(Vec::new())
    }
}

impl FakeApi {
    pub fn with(projects: Vec<Project>) -> Self {
        let next = projects.len() as u64 + 1;
        let (gate, _) = watch::channel(false);
        Self {
            server: Mutex::new(projects),
            next_id: AtomicU64::new(next),
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            gate,
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_next_id(&self, id: u64) {
        self.next_id.store(id, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn hold(&self) {
        self.gate.send_replace(true);
    }

    pub fn release(&self) {
        self.gate.send_replace(false);
    }

    async fn check(&self, operation: &'static str) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut gate = self.gate.subscribe();
        let _ = gate.wait_for(|held| !*held).await;
        if self.fail.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                operation,
                status: StatusCode::INTERNAL_SERVER_ERROR,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectApi for FakeApi {
    async fn list(&self, identity: &Identity) -> Result<Vec<Project>, ApiError> {
        self.check("getProject").await?;
        let server = self.server.lock().unwrap();
        Ok(server
            .iter()
            .filter(|p| p.user_email == identity.as_str())
            .cloned()
            .collect())
    }

    async fn create(&self, identity: &Identity, draft: &ProjectDraft) -> Result<Project, ApiError> {
        self.check("createProject").await?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let project = Project {
            id: id.to_string(),
            project_name: draft.project_name.clone(),
            status: draft.status,
            due_date: draft.due_date.clone(),
            user_email: identity.to_string(),
        };
        self.server.lock().unwrap().push(project.clone());
        Ok(project)
    }

    async fn update(&self, project: &Project) -> Result<Project, ApiError> {
        self.check("updateProject").await?;
        let mut server = self.server.lock().unwrap();
        if let Some(slot) = server.iter_mut().find(|p| p.id == project.id) {
            *slot = project.clone();
        }
        Ok(project.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.check("deleteProject").await?;
        self.server.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }
}
