use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TryRecvError};

use crate::api::{ApiError, ProjectApi};
use crate::identity::Identity;
use crate::models::{Project, ProjectDraft};

/// One backend call, fully described so it can run away from the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Load { identity: Identity },
    Create { identity: Identity, draft: ProjectDraft },
    Update { project: Project },
    Delete { id: String },
}

/// Result of a [`Request`], handed back to the page for reconciliation.
#[derive(Debug)]
pub enum Completion {
    Loaded(Result<Vec<Project>, ApiError>),
    Created(Result<Project, ApiError>),
    Updated { id: String, result: Result<Project, ApiError> },
    Deleted { id: String, result: Result<(), ApiError> },
}

impl Request {
    pub async fn execute<A: ProjectApi + ?Sized>(self, api: &A) -> Completion {
        match self {
            Request::Load { identity } => Completion::Loaded(api.list(&identity).await),
            Request::Create { identity, draft } => Completion::Created(api.create(&identity, &draft).await),
            Request::Update { project } => {
                let result = api.update(&project).await;
                Completion::Updated { id: project.id, result }
            }
            Request::Delete { id } => {
                let result = api.delete(&id).await;
                Completion::Deleted { id, result }
            }
        }
    }
}

/// Runs requests one after another on a background task.
///
/// A single task drains the queue, so completions come back in the order the
/// requests were sent while the event loop keeps drawing and reading keys.
pub struct Worker {
    requests: mpsc::UnboundedSender<Request>,
    completions: mpsc::UnboundedReceiver<Completion>,
}

impl Worker {
    pub fn spawn<A: ProjectApi + 'static>(api: Arc<A>) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<Request>();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel::<Completion>();

        tokio::spawn(async move {
            while let Some(request) = request_rx.recv().await {
                let completion = request.execute(api.as_ref()).await;
                if completion_tx.send(completion).is_err() {
                    break;
                }
            }
            tracing::debug!("Request worker stopped");
        });

        Self {
            requests: request_tx,
            completions: completion_rx,
        }
    }

    pub fn send(&self, request: Request) {
        if self.requests.send(request).is_err() {
            tracing::warn!("Request worker is gone, dropping request");
        }
    }

    /// Everything that finished since the last call, without waiting.
    pub fn drain(&mut self) -> Vec<Completion> {
        let mut done = Vec::new();
        loop {
            match self.completions.try_recv() {
                Ok(completion) => done.push(completion),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        done
    }

    #[cfg(test)]
    pub async fn next(&mut self) -> Option<Completion> {
        self.completions.recv().await
    }
}
