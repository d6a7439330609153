use tui::{
    backend::Backend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::models::{Project, Tone};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Edit,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardIntent {
    Edit(Project),
    Delete(String),
}

/// Local state of one card: only whether its action menu is showing.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardState {
    menu_open: bool,
    highlighted: Option<MenuEntry>,
}

impl CardState {
    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
        self.highlighted = self.menu_open.then_some(MenuEntry::Edit);
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
        self.highlighted = None;
    }

    pub fn highlighted(&self) -> Option<MenuEntry> {
        self.highlighted
    }

    pub fn move_highlight(&mut self) {
        if self.menu_open {
            self.highlighted = match self.highlighted {
                Some(MenuEntry::Edit) => Some(MenuEntry::Delete),
                _ => Some(MenuEntry::Edit),
            };
        }
    }

    pub fn select_edit(&mut self, project: &Project) -> CardIntent {
        self.close_menu();
        CardIntent::Edit(project.clone())
    }

    pub fn select_delete(&mut self, project: &Project) -> CardIntent {
        self.close_menu();
        CardIntent::Delete(project.id.clone())
    }

    /// Picks whichever entry is highlighted, if the menu is open.
    pub fn select_highlighted(&mut self, project: &Project) -> Option<CardIntent> {
        match self.highlighted? {
            MenuEntry::Edit => Some(self.select_edit(project)),
            MenuEntry::Delete => Some(self.select_delete(project)),
        }
    }
}

pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Warning => Color::Yellow,
        Tone::Success => Color::Green,
    }
}

pub fn render_card<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    project: &Project,
    card: &CardState,
    focused: bool,
) {
    let border_style = if focused {
        Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let lines = vec![
        Spans::from(Span::styled(
            project.status.as_str().to_uppercase(),
            Style::default()
                .fg(tone_color(project.tone()))
                .add_modifier(Modifier::BOLD),
        )),
        Spans::from(Span::styled(
            project.project_name.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Spans::from(vec![
            Span::styled("Due: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(project.due_date_display(), Style::default().fg(Color::Gray)),
        ]),
        Spans::from(vec![
            Span::styled("Created By: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(project.user_email.as_str(), Style::default().fg(Color::Gray)),
        ]),
    ];

    let body = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border_style)
                .title(Span::styled(" ... ", border_style)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(body, area);

    if card.is_menu_open() {
        render_menu(frame, area, card);
    }
}

fn render_menu<B: Backend>(frame: &mut Frame<B>, card_area: Rect, card: &CardState) {
    let width = 12u16.min(card_area.width);
    let height = 4u16.min(card_area.height.saturating_sub(1));
    let area = Rect {
        x: card_area.x + card_area.width.saturating_sub(width + 1),
        y: card_area.y + 1,
        width,
        height,
    };

    let entry = |label: &'static str, which: MenuEntry| {
        let style = if card.highlighted() == Some(which) {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else {
            Style::default()
        };
        Spans::from(Span::styled(label, style))
    };

    let menu = Paragraph::new(vec![entry("Edit", MenuEntry::Edit), entry("Delete", MenuEntry::Delete)])
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(Clear, area);
    frame.render_widget(menu, area);
}
