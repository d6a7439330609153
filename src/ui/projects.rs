use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::Project;
use crate::store::ProjectStore;
use crate::ui::card::{render_card, CardIntent, CardState};
use crate::ui::project_form::{self, render_project_form, FormAction, ProjectFormState};

const CARD_HEIGHT: u16 = 7;

pub enum ProjectsAction {
    Quit,
    OpenAdd,
    Edit(Project),
    Delete(String),
    Submit,
    CancelForm,
}

// Represents the state of the project grid
pub struct ProjectsState {
    selected: Option<usize>,
    columns: usize,
    first_row: usize,
    cards: HashMap<String, CardState>,
}

impl Default for ProjectsState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectsState {
    pub fn new() -> Self {
        Self {
            selected: None,
            columns: 3,
            first_row: 0,
            cards: HashMap::new(),
        }
    }

    /// Keeps the selection inside the store and forgets cards that are gone.
    pub fn sync(&mut self, store: &ProjectStore) {
        self.selected = if store.is_empty() {
            None
        } else {
            Some(self.selected.map_or(0, |i| i.min(store.len() - 1)))
        };
        self.cards.retain(|id, _| store.find(id).is_some());
    }

    #[cfg(test)]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_project<'a>(&self, store: &'a ProjectStore) -> Option<&'a Project> {
        self.selected.and_then(|i| store.get(i))
    }

    pub fn card(&self, id: &str) -> CardState {
        self.cards.get(id).copied().unwrap_or_default()
    }

    fn card_mut(&mut self, id: &str) -> &mut CardState {
        self.cards.entry(id.to_string()).or_default()
    }

    fn move_by(&mut self, delta: isize, len: usize) {
        if len == 0 {
            return;
        }
        let current = self.selected.unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.selected = Some(next as usize);
    }

    pub fn next(&mut self, len: usize) {
        self.move_by(1, len);
    }

    pub fn previous(&mut self, len: usize) {
        self.move_by(-1, len);
    }

    pub fn down(&mut self, len: usize) {
        self.move_by(self.columns as isize, len);
    }

    pub fn up(&mut self, len: usize) {
        self.move_by(-(self.columns as isize), len);
    }

    fn close_other_menus(&mut self, keep: &str) {
        for (id, card) in self.cards.iter_mut() {
            if id != keep {
                card.close_menu();
            }
        }
    }
}

fn columns_for(width: u16) -> usize {
    match width {
        0..=59 => 1,
        60..=99 => 2,
        _ => 3,
    }
}

pub fn render_projects<B: Backend>(
    frame: &mut Frame<B>,
    state: &mut ProjectsState,
    store: &ProjectStore,
    form: &ProjectFormState,
) {
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ].as_ref())
        .split(size);

    let header = Paragraph::new(Spans::from(vec![
        Span::styled(
            "Projects",
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Span::raw("    "),
        Span::styled("<A> Add New Project", Style::default().fg(Color::White).bg(Color::Blue)),
    ]))
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_grid(frame, state, store, chunks[1]);

    let help = match state.selected_project(store) {
        Some(project) if state.card(&project.id).is_menu_open() => {
            "Up/Down - Choose | Enter - Confirm | E - Edit | D - Delete | Esc - Close menu"
        }
        Some(_) => "Arrows - Move | Enter - Card menu | A - Add | Q - Quit",
        None => "A - Add | Q - Quit",
    };
    let footer = Paragraph::new(help)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(footer, chunks[2]);

    if form.is_open() {
        render_project_form(frame, form);
    }
}

fn render_grid<B: Backend>(
    frame: &mut Frame<B>,
    state: &mut ProjectsState,
    store: &ProjectStore,
    area: Rect,
) {
    state.columns = columns_for(area.width);
    let visible_rows = ((area.height / CARD_HEIGHT) as usize).max(1);

    if let Some(selected) = state.selected {
        let row = selected / state.columns;
        if row < state.first_row {
            state.first_row = row;
        } else if row >= state.first_row + visible_rows {
            state.first_row = row + 1 - visible_rows;
        }
    }

    let rows = store.projects().chunks(state.columns).enumerate().skip(state.first_row).take(visible_rows);
    for (visible, (row, projects)) in rows.enumerate() {
        let row_area = Rect {
            x: area.x,
            y: area.y + visible as u16 * CARD_HEIGHT,
            width: area.width,
            height: CARD_HEIGHT.min(area.height.saturating_sub(visible as u16 * CARD_HEIGHT)),
        };
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, state.columns as u32); state.columns])
            .split(row_area);

        for (column, project) in projects.iter().enumerate() {
            let index = row * state.columns + column;
            let focused = state.selected == Some(index);
            render_card(frame, cells[column], project, &state.card(&project.id), focused);
        }
    }
}

/// Maps a key press onto the page. The form gets the key while it is open,
/// then an open card menu, then the grid.
pub fn handle_key(
    state: &mut ProjectsState,
    store: &ProjectStore,
    form: &mut ProjectFormState,
    key: KeyEvent,
) -> Option<ProjectsAction> {
    if form.is_open() {
        return match project_form::handle_key(form, key)? {
            FormAction::Submit => Some(ProjectsAction::Submit),
            FormAction::Cancel => Some(ProjectsAction::CancelForm),
        };
    }

    let len = store.len();
    let selected = state.selected_project(store).cloned();

    if let Some(project) = &selected {
        let card = state.card_mut(&project.id);
        if card.is_menu_open() {
            let intent = match key.code {
                KeyCode::Up | KeyCode::Down | KeyCode::Tab => {
                    card.move_highlight();
                    None
                }
                KeyCode::Enter => card.select_highlighted(project),
                KeyCode::Char('e') => Some(card.select_edit(project)),
                KeyCode::Char('d') => Some(card.select_delete(project)),
                KeyCode::Esc | KeyCode::Char('.') => {
                    card.toggle_menu();
                    None
                }
                _ => None,
            };
            return intent.map(|intent| match intent {
                CardIntent::Edit(project) => ProjectsAction::Edit(project),
                CardIntent::Delete(id) => ProjectsAction::Delete(id),
            });
        }
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(ProjectsAction::Quit),
        KeyCode::Char('a') | KeyCode::Char('n') => return Some(ProjectsAction::OpenAdd),
        KeyCode::Right => state.next(len),
        KeyCode::Left => state.previous(len),
        KeyCode::Down => state.down(len),
        KeyCode::Up => state.up(len),
        KeyCode::Enter | KeyCode::Char('.') => {
            if let Some(project) = &selected {
                state.close_other_menus(&project.id);
                state.card_mut(&project.id).toggle_menu();
            }
        }
        _ => {}
    }
    None
}

/// Waits up to `timeout` for a key press.
pub fn handle_input(
    state: &mut ProjectsState,
    store: &ProjectStore,
    form: &mut ProjectFormState,
    timeout: Duration,
) -> Result<Option<ProjectsAction>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            return Ok(handle_key(state, store, form, key));
        }
    }
    Ok(None)
}
