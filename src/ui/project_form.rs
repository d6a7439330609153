use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{Project, ProjectDraft};
use crate::ui::centered_rect;
use crate::ui::components::date_input::DateInputState;

/// Which way the modal is shown, if at all.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalMode {
    Closed,
    Create,
    Edit { selected: Project },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    Name,
    DueDate,
    Status,
}

pub enum FormAction {
    Submit,
    Cancel,
}

pub struct ProjectFormState {
    mode: ModalMode,
    draft: ProjectDraft,
    current_field: FormField,
    editing: bool,
    due_date_state: DateInputState,
}

impl Default for ProjectFormState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectFormState {
    pub fn new() -> Self {
        Self {
            mode: ModalMode::Closed,
            draft: ProjectDraft::default(),
            current_field: FormField::Name,
            editing: false,
            due_date_state: DateInputState::new(None),
        }
    }

    /// "Add" affordance: fresh draft, create mode.
    pub fn open_create(&mut self) {
        self.mode = ModalMode::Create;
        self.load_draft(ProjectDraft::default());
    }

    /// Card "Edit": draft seeded from the record, which becomes the selection.
    pub fn open_edit(&mut self, project: &Project) {
        self.mode = ModalMode::Edit {
            selected: project.clone(),
        };
        self.load_draft(ProjectDraft::from_project(project));
    }

    /// Closes without touching the draft or the selection's record.
    pub fn cancel(&mut self) {
        self.mode = ModalMode::Closed;
        self.editing = false;
    }

    /// Successful create: close and reset the draft.
    pub fn finish_create(&mut self) {
        self.mode = ModalMode::Closed;
        self.load_draft(ProjectDraft::default());
    }

    /// Successful update: close and drop the selection.
    pub fn finish_edit(&mut self) {
        self.mode = ModalMode::Closed;
        self.editing = false;
    }

    fn load_draft(&mut self, draft: ProjectDraft) {
        self.due_date_state = DateInputState::new(draft.due_date());
        self.draft = draft;
        self.current_field = FormField::Name;
        self.editing = false;
    }

    pub fn mode(&self) -> &ModalMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != ModalMode::Closed
    }

    pub fn is_edit_mode(&self) -> bool {
        matches!(self.mode, ModalMode::Edit { .. })
    }

    pub fn selected(&self) -> Option<&Project> {
        match &self.mode {
            ModalMode::Edit { selected } => Some(selected),
            _ => None,
        }
    }

    pub fn draft(&self) -> &ProjectDraft {
        &self.draft
    }

    #[cfg(test)]
    pub fn draft_mut(&mut self) -> &mut ProjectDraft {
        &mut self.draft
    }

    #[cfg(test)]
    pub fn current_field(&self) -> FormField {
        self.current_field
    }

    pub fn title(&self) -> &'static str {
        if self.is_edit_mode() {
            "Edit Project"
        } else {
            "Create New Project"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_edit_mode() {
            "Save Changes"
        } else {
            "Create Project"
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            FormField::Name => FormField::DueDate,
            FormField::DueDate => FormField::Status,
            FormField::Status => FormField::Name,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            FormField::Name => FormField::Status,
            FormField::DueDate => FormField::Name,
            FormField::Status => FormField::DueDate,
        };
    }

    pub fn toggle_editing(&mut self) {
        match self.current_field {
            // The select has two values; Enter just flips it.
            FormField::Status => {
                self.draft.status = self.draft.status.next();
            }
            FormField::DueDate => {
                self.editing = !self.editing;
                self.due_date_state.toggle_editing();
                self.draft.due_date = self.due_date_state.value();
            }
            FormField::Name => {
                self.editing = !self.editing;
            }
        }
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match self.current_field {
            FormField::Name => match key {
                KeyCode::Char(c) => self.draft.project_name.push(c),
                KeyCode::Backspace => {
                    self.draft.project_name.pop();
                }
                _ => {}
            },
            FormField::DueDate => {
                self.due_date_state.handle_input(key);
                self.draft.due_date = self.due_date_state.value();
            }
            FormField::Status => {}
        }
    }
}

pub fn handle_key(state: &mut ProjectFormState, key: KeyEvent) -> Option<FormAction> {
    if state.editing {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => state.toggle_editing(),
            code => state.edit_current_field(code),
        }
        return None;
    }

    match key.code {
        KeyCode::Esc => return Some(FormAction::Cancel),
        KeyCode::Char('s') => return Some(FormAction::Submit),
        KeyCode::Up | KeyCode::BackTab => state.previous_field(),
        KeyCode::Down | KeyCode::Tab => state.next_field(),
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if state.current_field == FormField::Status => {
            state.draft.status = state.draft.status.next();
        }
        KeyCode::Enter => state.toggle_editing(),
        _ => {}
    }
    None
}

pub fn render_project_form<B: Backend>(f: &mut Frame<B>, state: &ProjectFormState) {
    let area = centered_rect(60, 50, f.size());
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)].as_ref())
        .split(area);

    render_fields(f, state, chunks[0]);

    let help_text = if state.editing {
        match state.current_field {
            FormField::DueDate => "Enter - Done | Left/Right - Date part | Del - Clear date",
            _ => "Enter - Done",
        }
    } else {
        "Enter - Edit field | Up/Down - Navigate | Left/Right - Change status | Esc - Cancel"
    };

    let footer = Paragraph::new(vec![
        Spans::from(Span::styled(
            format!("<S> {}", state.submit_label()),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        )),
        Spans::from(Span::styled(help_text, Style::default().fg(Color::Gray))),
    ])
    .block(Block::default().borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM));
    f.render_widget(footer, chunks[1]);
}

fn render_fields<B: Backend>(f: &mut Frame<B>, state: &ProjectFormState, area: Rect) {
    let fields = [
        (FormField::Name, "Project Name", state.draft.project_name.clone()),
        (FormField::DueDate, "Due Date", state.due_date_state.get_display_string()),
        (FormField::Status, "Status", format!("< {} >", state.draft.status.label())),
    ];

    let items: Vec<ListItem> = fields
        .into_iter()
        .map(|(field, name, value)| {
            let focused = field == state.current_field;
            let label_style = if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let value = if focused && state.editing && field == FormField::Name {
                Span::styled(format!("{}|", value), Style::default().add_modifier(Modifier::BOLD))
            } else if focused && state.editing {
                Span::styled(value, Style::default().add_modifier(Modifier::BOLD))
            } else {
                Span::raw(value)
            };
            ListItem::new(vec![
                Spans::from(Span::styled(format!("{}:", name), label_style)),
                Spans::from(value),
                Spans::from(""),
            ])
        })
        .collect();

    let form = List::new(items).block(
        Block::default()
            .borders(Borders::LEFT | Borders::RIGHT | Borders::TOP)
            .title(state.title()),
    );
    f.render_widget(form, area);
}
