use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::identity::Identity;
use crate::models::{Project, ProjectDraft};

#[cfg(test)]
pub mod fake;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{operation} failed with status {status}")]
    Status {
        operation: &'static str,
        status: StatusCode,
    },

    #[error("{operation} request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation} returned an unreadable body: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Backend operations on a user's projects.
#[async_trait]
pub trait ProjectApi: Send + Sync {
    async fn list(&self, identity: &Identity) -> Result<Vec<Project>, ApiError>;

    async fn create(&self, identity: &Identity, draft: &ProjectDraft) -> Result<Project, ApiError>;

    async fn update(&self, project: &Project) -> Result<Project, ApiError>;

    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

/// JSON over HTTP client for the `/api/*Project` endpoints.
pub struct HttpProjectApi {
    client: Client,
    base_url: String,
}

impl HttpProjectApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }
}

fn check_status(operation: &'static str, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status { operation, status })
    }
}

async fn decode<T: DeserializeOwned>(operation: &'static str, response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|source| ApiError::Decode { operation, source })
}

#[async_trait]
impl ProjectApi for HttpProjectApi {
    async fn list(&self, identity: &Identity) -> Result<Vec<Project>, ApiError> {
        const OP: &str = "getProject";
        tracing::debug!(user = %identity, "Fetching projects");
        let response = self
            .client
            .get(self.url(OP))
            .header("user-email", identity.as_str())
            .send()
            .await
            .map_err(|source| ApiError::Transport { operation: OP, source })?;
        decode(OP, check_status(OP, response)?).await
    }

    async fn create(&self, identity: &Identity, draft: &ProjectDraft) -> Result<Project, ApiError> {
        const OP: &str = "createProject";
        let response = self
            .client
            .post(self.url(OP))
            .header("user-email", identity.as_str())
            .json(draft)
            .send()
            .await
            .map_err(|source| ApiError::Transport { operation: OP, source })?;
        decode(OP, check_status(OP, response)?).await
    }

    async fn update(&self, project: &Project) -> Result<Project, ApiError> {
        const OP: &str = "updateProject";
        let response = self
            .client
            .put(self.url(OP))
            .header("id", project.id.as_str())
            .json(project)
            .send()
            .await
            .map_err(|source| ApiError::Transport { operation: OP, source })?;
        decode(OP, check_status(OP, response)?).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        const OP: &str = "deleteProject";
        let response = self
            .client
            .delete(self.url(OP))
            .query(&[("id", id)])
            .send()
            .await
            .map_err(|source| ApiError::Transport { operation: OP, source })?;
        check_status(OP, response)?;
        Ok(())
    }
}
