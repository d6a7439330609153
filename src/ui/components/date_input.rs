use chrono::{Datelike, NaiveDate};
use crossterm::event::KeyCode;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

/// Segment-by-segment editor for an optional calendar date.
pub struct DateInputState {
    pub date: Option<NaiveDate>,
    pub editing: bool,
    pub date_part: DatePart,
    pub current_date_input: String,
}

impl DateInputState {
    pub fn new(date: Option<NaiveDate>) -> Self {
        Self {
            date,
            editing: false,
            date_part: DatePart::Year,
            current_date_input: String::new(),
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        if self.editing {
            if self.date.is_none() {
                self.date = Some(chrono::Local::now().date_naive());
            }
            self.date_part = DatePart::Year;
            self.current_date_input.clear();
        }
    }

    pub fn next_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Month,
            DatePart::Month => DatePart::Day,
            DatePart::Day => DatePart::Year,
        };
        self.current_date_input.clear();
    }

    pub fn previous_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Day,
            DatePart::Month => DatePart::Year,
            DatePart::Day => DatePart::Month,
        };
        self.current_date_input.clear();
    }

    /// The date as stored in a draft, empty when unset.
    pub fn value(&self) -> String {
        self.date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    pub fn handle_input(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.current_date_input.push(c);
                self.apply_digits();
            }
            KeyCode::Backspace => {
                self.current_date_input.pop();
            }
            KeyCode::Delete => {
                self.date = None;
                self.current_date_input.clear();
            }
            KeyCode::Right => self.next_date_part(),
            KeyCode::Left => self.previous_date_part(),
            _ => {}
        }
    }

    fn apply_digits(&mut self) {
        // Typing after a Delete starts again from today.
        let date = *self.date.get_or_insert_with(|| chrono::Local::now().date_naive());
        let width = match self.date_part {
            DatePart::Year => 4,
            DatePart::Month | DatePart::Day => 2,
        };
        if self.current_date_input.len() < width {
            return;
        }

        // Out of range segments (Feb 30, month 13) leave the date untouched.
        let candidate = self.current_date_input.parse::<u32>().ok().and_then(|n| match self.date_part {
            DatePart::Year if (1900..=2100).contains(&n) => {
                NaiveDate::from_ymd_opt(n as i32, date.month(), date.day())
            }
            DatePart::Month => NaiveDate::from_ymd_opt(date.year(), n, date.day()),
            DatePart::Day => NaiveDate::from_ymd_opt(date.year(), date.month(), n),
            _ => None,
        });
        if let Some(new_date) = candidate {
            self.date = Some(new_date);
        }
        self.current_date_input.clear();
    }

    pub fn get_display_string(&self) -> String {
        let Some(date) = self.date else {
            return "Not set".to_string();
        };
        let (year, month, day) = (
            format!("{:04}", date.year()),
            format!("{:02}", date.month()),
            format!("{:02}", date.day()),
        );
        if !self.editing {
            return format!("{}-{}-{}", year, month, day);
        }

        let current_input = if !self.current_date_input.is_empty() {
            format!("[{}]", self.current_date_input)
        } else {
            match self.date_part {
                DatePart::Year => "[YYYY]".to_string(),
                DatePart::Month => "[MM]".to_string(),
                DatePart::Day => "[DD]".to_string(),
            }
        };

        match self.date_part {
            DatePart::Year => format!("{}{}-{}-{}", year, current_input, month, day),
            DatePart::Month => format!("{}-{}{}-{}", year, month, current_input, day),
            DatePart::Day => format!("{}-{}-{}{}", year, month, day, current_input),
        }
    }
}
