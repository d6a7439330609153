use thiserror::Error;

use crate::api::ApiError;
use crate::identity::Identity;
use crate::models::Project;
use crate::store::ProjectStore;
use crate::ui::project_form::{ModalMode, ProjectFormState};
use crate::worker::{Completion, Request};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoIdentity,
}

/// What an operation did when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Skipped(SkipReason),
}

/// Whether an operation needs the backend at all.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    Send(Request),
    Skip(SkipReason),
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("no project form is open")]
    ModalClosed,
}

/// Owns the store and the modal. It decides which requests an action needs
/// and reconciles their completions; it never waits on the backend itself.
///
/// Completions are applied one at a time by the event loop, in the order the
/// request worker finished them, so the store has a single writer.
#[derive(Default)]
pub struct PageController {
    store: ProjectStore,
    form: ProjectFormState,
}

impl PageController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn form(&self) -> &ProjectFormState {
        &self.form
    }

    #[cfg(test)]
    pub fn form_mut(&mut self) -> &mut ProjectFormState {
        &mut self.form
    }

    /// Read access to the store alongside the form, for input handling.
    pub fn parts_mut(&mut self) -> (&ProjectStore, &mut ProjectFormState) {
        (&self.store, &mut self.form)
    }

    pub fn plan_load(&self, identity: Option<&Identity>) -> Plan {
        match identity {
            Some(identity) => Plan::Send(Request::Load {
                identity: identity.clone(),
            }),
            None => Plan::Skip(SkipReason::NoIdentity),
        }
    }

    /// Create or update, depending on how the modal was opened.
    pub fn plan_submit(&self, identity: Option<&Identity>) -> Result<Plan, ControllerError> {
        if self.form.mode() == &ModalMode::Closed {
            return Err(ControllerError::ModalClosed);
        }
        let Some(identity) = identity else {
            return Ok(Plan::Skip(SkipReason::NoIdentity));
        };

        let request = match self.form.selected() {
            Some(selected) => Request::Update {
                project: selected.merged_with(self.form.draft()),
            },
            None => Request::Create {
                identity: identity.clone(),
                draft: self.form.draft().clone(),
            },
        };
        Ok(Plan::Send(request))
    }

    pub fn plan_delete(&self, id: &str) -> Plan {
        Plan::Send(Request::Delete { id: id.to_string() })
    }

    /// Folds a finished request into the store and the modal.
    ///
    /// Load errors are returned untouched for the caller to report; failed
    /// mutations are logged here and leave every piece of state as it was.
    pub fn apply(&mut self, completion: Completion) -> Result<Outcome, ControllerError> {
        match completion {
            Completion::Loaded(result) => {
                let projects = result?;
                tracing::info!(count = projects.len(), "Loaded projects");
                self.store.replace_all(projects);
            }
            Completion::Created(Ok(project)) => {
                tracing::info!(id = %project.id, "Created project");
                self.store.append(project);
                // The form may have been cancelled or reopened meanwhile.
                if self.form.mode() == &ModalMode::Create {
                    self.form.finish_create();
                }
            }
            Completion::Created(Err(err)) => {
                tracing::error!(error = %err, "Failed to create project");
                return Err(err.into());
            }
            Completion::Updated { id, result: Ok(project) } => {
                tracing::info!(id = %project.id, "Updated project");
                if !self.store.replace(project) {
                    tracing::debug!(id = %id, "Updated project is no longer listed");
                }
                if self.form.selected().is_some_and(|selected| selected.id == id) {
                    self.form.finish_edit();
                }
            }
            Completion::Updated { id, result: Err(err) } => {
                tracing::error!(id = %id, error = %err, "Failed to update project");
                return Err(err.into());
            }
            Completion::Deleted { id, result: Ok(()) } => {
                tracing::info!(id = %id, "Deleted project");
                self.store.remove(&id);
            }
            Completion::Deleted { id, result: Err(err) } => {
                tracing::error!(id = %id, error = %err, "Failed to delete project");
                return Err(err.into());
            }
        }
        Ok(Outcome::Applied)
    }

    pub fn open_add(&mut self) {
        self.form.open_create();
    }

    pub fn open_edit(&mut self, project: &Project) {
        self.form.open_edit(project);
    }

    pub fn cancel(&mut self) {
        self.form.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::models::{ProjectDraft, ProjectStatus, Tone};

    fn project(id: &str, name: &str, status: ProjectStatus) -> Project {
        Project {
            id: id.to_string(),
            project_name: name.to_string(),
            status,
            due_date: "2025-01-01".to_string(),
            user_email: "a@x.com".to_string(),
        }
    }

    fn me() -> Identity {
        Identity::new("a@x.com").unwrap()
    }

    /// Runs a plan against the fake backend and applies the result.
    async fn run(page: &mut PageController, api: &FakeApi, plan: Plan) -> Result<Outcome, ControllerError> {
        match plan {
            Plan::Skip(reason) => Ok(Outcome::Skipped(reason)),
            Plan::Send(request) => {
                let completion = request.execute(api).await;
                page.apply(completion)
            }
        }
    }

    async fn submit(page: &mut PageController, api: &FakeApi) -> Result<Outcome, ControllerError> {
        let plan = page.plan_submit(Some(&me()))?;
        run(page, api, plan).await
    }

    async fn delete(page: &mut PageController, api: &FakeApi, id: &str) -> Result<Outcome, ControllerError> {
        let plan = page.plan_delete(id);
        run(page, api, plan).await
    }

    async fn loaded(projects: Vec<Project>) -> (PageController, FakeApi) {
        let api = FakeApi::with(projects);
        let mut page = PageController::new();
        let plan = page.plan_load(Some(&me()));
        run(&mut page, &api, plan).await.unwrap();
        (page, api)
    }

    #[test]
    fn load_without_identity_makes_no_request() {
        let page = PageController::new();
        assert_eq!(page.plan_load(None), Plan::Skip(SkipReason::NoIdentity));
        assert!(page.store().is_empty());
    }

    #[tokio::test]
    async fn load_replaces_the_store_with_the_users_projects() {
        let mut other = project("9", "Theirs", ProjectStatus::Completed);
        other.user_email = "b@x.com".to_string();
        let (page, _) = loaded(vec![project("1", "A", ProjectStatus::InProgress), other]).await;
        assert_eq!(page.store().projects(), &[project("1", "A", ProjectStatus::InProgress)]);
    }

    #[tokio::test]
    async fn failed_load_leaves_the_store_alone() {
        let (mut page, api) = loaded(vec![project("1", "A", ProjectStatus::InProgress)]).await;
        api.set_failing(true);
        let plan = page.plan_load(Some(&me()));
        let err = run(&mut page, &api, plan).await.unwrap_err();
        assert!(matches!(err, ControllerError::Api(ApiError::Status { .. })));
        assert_eq!(page.store().len(), 1);

        let (mut fresh, api) = (PageController::new(), FakeApi::default());
        api.set_failing(true);
        let plan = fresh.plan_load(Some(&me()));
        assert!(run(&mut fresh, &api, plan).await.is_err());
        assert!(fresh.store().is_empty());
    }

    #[tokio::test]
    async fn create_appends_the_server_record_and_resets_the_form() {
        let (mut page, api) = loaded(vec![project("1", "A", ProjectStatus::InProgress)]).await;
        api.set_next_id(5);

        page.open_add();
        *page.form_mut().draft_mut() = ProjectDraft {
            project_name: "Launch".to_string(),
            status: ProjectStatus::InProgress,
            due_date: "2025-01-01".to_string(),
        };
        let outcome = submit(&mut page, &api).await.unwrap();

        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(page.store().len(), 2);
        assert_eq!(
            page.store().get(1),
            Some(&Project {
                id: "5".to_string(),
                project_name: "Launch".to_string(),
                status: ProjectStatus::InProgress,
                due_date: "2025-01-01".to_string(),
                user_email: "a@x.com".to_string(),
            })
        );
        assert!(!page.form().is_open());
        assert_eq!(page.form().draft(), &ProjectDraft::default());
    }

    #[tokio::test]
    async fn create_without_identity_is_skipped() {
        let (mut page, _) = loaded(Vec::new()).await;
        page.open_add();
        assert_eq!(page.plan_submit(None).unwrap(), Plan::Skip(SkipReason::NoIdentity));
        assert!(page.form().is_open());
    }

    #[tokio::test]
    async fn repeated_creates_make_distinct_records() {
        let (mut page, api) = loaded(Vec::new()).await;
        for _ in 0..2 {
            page.open_add();
            page.form_mut().draft_mut().project_name = "Same".to_string();
            submit(&mut page, &api).await.unwrap();
        }
        let ids: Vec<&str> = page.store().projects().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn failed_create_keeps_the_modal_open() {
        let (mut page, api) = loaded(vec![project("1", "A", ProjectStatus::InProgress)]).await;
        page.open_add();
        page.form_mut().draft_mut().project_name = "Doomed".to_string();
        api.set_failing(true);

        assert!(submit(&mut page, &api).await.is_err());
        assert_eq!(page.store().len(), 1);
        assert_eq!(page.form().mode(), &ModalMode::Create);
        assert_eq!(page.form().draft().project_name, "Doomed");
    }

    #[tokio::test]
    async fn create_finishing_after_the_modal_moved_on_leaves_it_alone() {
        let (mut page, api) = loaded(Vec::new()).await;
        let target = project("1", "A", ProjectStatus::InProgress);
        page.open_add();
        let plan = page.plan_submit(Some(&me())).unwrap();

        // The user moves on to editing another record before the reply lands.
        page.open_edit(&target);
        run(&mut page, &api, plan).await.unwrap();

        assert_eq!(page.store().len(), 1);
        assert_eq!(page.form().selected(), Some(&target));
    }

    #[tokio::test]
    async fn update_replaces_only_the_matching_record() {
        let (mut page, api) = loaded(vec![
            project("1", "A", ProjectStatus::InProgress),
            project("2", "B", ProjectStatus::InProgress),
            project("3", "C", ProjectStatus::Completed),
        ])
        .await;

        let target = page.store().get(1).cloned().unwrap();
        page.open_edit(&target);
        page.form_mut().draft_mut().status = ProjectStatus::Completed;
        submit(&mut page, &api).await.unwrap();

        let tones: Vec<Tone> = page.store().projects().iter().map(Project::tone).collect();
        assert_eq!(tones, vec![Tone::Warning, Tone::Success, Tone::Success]);
        assert_eq!(page.store().len(), 3);
        assert_eq!(page.store().get(0), Some(&project("1", "A", ProjectStatus::InProgress)));
        assert_eq!(page.store().get(1).map(|p| p.status), Some(ProjectStatus::Completed));
        assert_eq!(page.store().get(1).map(|p| p.id.as_str()), Some("2"));
        assert!(!page.form().is_open());
        assert_eq!(page.form().selected(), None);
    }

    #[tokio::test]
    async fn update_request_merges_the_draft_over_the_selection() {
        let (mut page, _) = loaded(Vec::new()).await;
        let original = project("2", "B", ProjectStatus::InProgress);
        page.open_edit(&original);
        page.form_mut().draft_mut().project_name = "B2".to_string();

        let expected = Project {
            project_name: "B2".to_string(),
            ..original
        };
        assert_eq!(
            page.plan_submit(Some(&me())).unwrap(),
            Plan::Send(Request::Update { project: expected })
        );
    }

    #[tokio::test]
    async fn failed_update_leaves_state_unchanged() {
        let original = project("2", "B", ProjectStatus::InProgress);
        let (mut page, api) = loaded(vec![original.clone()]).await;
        page.open_edit(&original);
        page.form_mut().draft_mut().project_name = "B2".to_string();
        api.set_failing(true);

        assert!(submit(&mut page, &api).await.is_err());
        assert_eq!(page.store().projects(), &[original.clone()]);
        assert_eq!(page.form().selected(), Some(&original));
        assert_eq!(page.form().draft().project_name, "B2");
    }

    #[tokio::test]
    async fn edit_then_cancel_changes_nothing() {
        let original = project("1", "A", ProjectStatus::InProgress);
        let (mut page, api) = loaded(vec![original.clone()]).await;
        let calls = api.calls();
        page.open_edit(&original);
        page.form_mut().draft_mut().project_name = "Changed".to_string();
        page.cancel();

        assert!(!page.form().is_open());
        assert_eq!(page.store().projects(), &[original]);
        assert_eq!(api.calls(), calls);
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let (mut page, api) = loaded(vec![project("1", "A", ProjectStatus::InProgress)]).await;
        delete(&mut page, &api, "1").await.unwrap();
        assert!(page.store().is_empty());
    }

    #[tokio::test]
    async fn delete_keeps_the_others_in_order() {
        let (mut page, api) = loaded(vec![
            project("1", "A", ProjectStatus::InProgress),
            project("2", "B", ProjectStatus::InProgress),
            project("3", "C", ProjectStatus::InProgress),
        ])
        .await;
        delete(&mut page, &api, "2").await.unwrap();
        let ids: Vec<&str> = page.store().projects().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn failed_delete_keeps_the_record() {
        let (mut page, api) = loaded(vec![project("1", "A", ProjectStatus::InProgress)]).await;
        api.set_failing(true);
        assert!(delete(&mut page, &api, "1").await.is_err());
        assert_eq!(page.store().len(), 1);
    }

    #[tokio::test]
    async fn submit_with_closed_modal_is_an_error() {
        let (page, _) = loaded(Vec::new()).await;
        let err = page.plan_submit(Some(&me())).unwrap_err();
        assert!(matches!(err, ControllerError::ModalClosed));
    }
}
