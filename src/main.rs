mod api;
mod config;
mod controller;
mod identity;
mod models;
mod store;
mod ui;
mod worker;

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing_subscriber::EnvFilter;

use crate::api::HttpProjectApi;
use crate::config::Config;
use crate::controller::{ControllerError, Outcome, PageController, Plan};
use crate::identity::{Identity, IdentityFile, SessionWatcher};
use crate::ui::projects::{render_projects, handle_input, ProjectsAction, ProjectsState};
use crate::worker::{Completion, Worker};

const TICK: Duration = Duration::from_millis(250);

/// Terminal board for your projects
#[derive(Debug, Parser)]
#[command(name = "project_board", version)]
struct Args {
    /// Backend base URL, overrides PROJECT_BOARD_API_URL
    #[arg(long)]
    api_url: Option<String>,

    /// File holding the signed-in email, overrides PROJECT_BOARD_IDENTITY_FILE
    #[arg(long)]
    identity_file: Option<PathBuf>,

    /// Log file, overrides PROJECT_BOARD_LOG_FILE
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Sign in as this email before starting
    #[arg(long)]
    email: Option<String>,
}

// Main application state
struct AppState {
    page: PageController,
    view: ProjectsState,
    worker: Worker,
    identity_file: IdentityFile,
    session: SessionWatcher,
}

impl AppState {
    fn new(config: &Config) -> Self {
        Self {
            page: PageController::new(),
            view: ProjectsState::new(),
            worker: Worker::spawn(Arc::new(HttpProjectApi::new(config.api_url()))),
            identity_file: IdentityFile::new(config.identity_file.clone()),
            session: SessionWatcher::default(),
        }
    }

    /// Identity as of right now; the file is re-read for every operation.
    fn identity(&self) -> Option<Identity> {
        self.identity_file.read()
    }
}

fn init_logging(config: &Config) -> Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("failed to open log file {}", config.log_file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = config::init()?.with_overrides(args.api_url, args.identity_file, args.log_file);
    init_logging(&config)?;
    tracing::info!(api_url = %config.api_url(), "Starting project board");

    let mut app_state = AppState::new(&config);

    if let Some(email) = args.email {
        let identity = Identity::new(email).context("--email must not be blank")?;
        app_state.identity_file.write(&identity)?;
        tracing::info!(user = %identity, "Signed in");
    }

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main app loop
    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "Project board exited with an error");
        println!("Error: {}", err);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    // Mount: the first load happens whatever the identity is.
    let identity = app_state.identity();
    app_state.session.observe(identity.clone());
    load_projects(app_state, identity.as_ref());

    loop {
        // Fold in whatever the backend finished since the last tick.
        for completion in app_state.worker.drain() {
            apply_completion(app_state, completion);
        }

        terminal.draw(|f| {
            render_projects(f, &mut app_state.view, app_state.page.store(), app_state.page.form());
        })?;

        let identity = app_state.identity();
        if app_state.session.observe(identity.clone()) {
            tracing::info!(signed_in = identity.is_some(), "Session changed, reloading");
            load_projects(app_state, identity.as_ref());
        }

        let action = {
            let (store, form) = app_state.page.parts_mut();
            handle_input(&mut app_state.view, store, form, TICK)?
        };

        let Some(action) = action else {
            continue;
        };
        if handle_action(app_state, action) {
            break;
        }
    }

    Ok(())
}

fn load_projects(app_state: &mut AppState, identity: Option<&Identity>) {
    let plan = app_state.page.plan_load(identity);
    dispatch(app_state, plan);
}

fn apply_completion(app_state: &mut AppState, completion: Completion) {
    let is_load = matches!(completion, Completion::Loaded(_));
    match app_state.page.apply(completion) {
        // Load failures are not caught by the page, only reported.
        Err(err) if is_load => tracing::error!(error = %err, "Failed to fetch projects"),
        result => report(result),
    }
    app_state.view.sync(app_state.page.store());
}

/// Queues the request, if any; the result comes back through `apply_completion`.
fn dispatch(app_state: &mut AppState, plan: Plan) {
    match plan {
        Plan::Send(request) => {
            tracing::debug!(?request, "Queued request");
            app_state.worker.send(request);
        }
        Plan::Skip(reason) => report(Ok(Outcome::Skipped(reason))),
    }
}

/// Returns true when the app should quit.
fn handle_action(app_state: &mut AppState, action: ProjectsAction) -> bool {
    match action {
        ProjectsAction::Quit => return true,
        ProjectsAction::OpenAdd => app_state.page.open_add(),
        ProjectsAction::Edit(project) => app_state.page.open_edit(&project),
        ProjectsAction::CancelForm => app_state.page.cancel(),
        ProjectsAction::Delete(id) => {
            let plan = app_state.page.plan_delete(&id);
            dispatch(app_state, plan);
        }
        ProjectsAction::Submit => {
            let identity = app_state.identity();
            match app_state.page.plan_submit(identity.as_ref()) {
                Ok(plan) => dispatch(app_state, plan),
                Err(err) => report(Err(err)),
            }
        }
    }

    app_state.view.sync(app_state.page.store());
    false
}

fn report(result: Result<Outcome, ControllerError>) {
    match result {
        Ok(Outcome::Skipped(reason)) => tracing::debug!(?reason, "Operation skipped"),
        Ok(Outcome::Applied) => {}
        // Already logged where it happened; nothing is shown to the user.
        Err(err) => tracing::debug!(error = %err, "Operation failed"),
    }
}
