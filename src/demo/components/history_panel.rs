use crate::demo::component::Component;
use crate::demo::Message;
use crossterm::event::{Event, KeyCode};
use history_router::HistoryEntry;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::Line;
use ratatui::widgets::{Block, Row, Table, TableState};
use ratatui::Frame;
use unicode_width::UnicodeWidthChar;

use crate::demo::event_ext::EventExt;

const URL_WIDTH: usize = 28;
const TITLE_WIDTH: usize = 20;

struct HistoryRow {
    id: u64,
    url: String,
    title: String,
}

/// The coordinator's log as a table. The current entry is marked, the selected
/// row can be traversed to like the browser's history drop-down would.
#[derive(Default)]
pub struct HistoryPanel {
    rows: Vec<HistoryRow>,
    current: usize,
    selected: usize,
}

impl HistoryPanel {
    pub fn set_entries(&mut self, entries: &[HistoryEntry], current: usize) {
        self.rows = entries
            .iter()
            .map(|entry| HistoryRow {
                id: entry.id,
                url: entry.url.clone(),
                title: entry.title.clone(),
            })
            .collect();
        self.current = current;
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }
}

impl Component<Message> for HistoryPanel {
    fn view(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let marker = if i == self.current { ">" } else { " " };
                let cells = vec![
                    marker.to_string(),
                    row.id.to_string(),
                    truncate(&row.url, URL_WIDTH),
                    truncate(&row.title, TITLE_WIDTH),
                ];
                if i == self.current {
                    Row::new(cells).bold()
                } else {
                    Row::new(cells)
                }
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(1),
                Constraint::Length(4),
                Constraint::Length(URL_WIDTH as u16),
                Constraint::Fill(1),
            ],
        )
            .header(Row::new(vec!["", "id", "url", "title"]).fg(Color::LightBlue))
            .highlight_style(Style::default().reversed())
            .block(Block::bordered().title(Line::from(" History <↑/↓> <Enter> ").bold()));

        let mut state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn handle_event(&mut self, event: &Event) -> Option<Message> {
        match event.key_code()? {
            KeyCode::Up => self.select_previous(),
            KeyCode::Down => self.select_next(),
            KeyCode::Enter => {
                let row = self.rows.get(self.selected)?;
                return Some(Message::Restore {
                    id: row.id,
                    url: row.url.clone(),
                });
            }
            _ => {}
        }
        None
    }
}

/// Cuts `text` to at most `max_width` terminal columns, marking the cut with `…`.
pub fn truncate(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }
    let mut width = 0;
    let mut result = String::new();
    for c in text.chars() {
        let char_width = c.width().unwrap_or(0);
        if width + char_width + 1 > max_width {
            break;
        }
        width += char_width;
        result.push(c);
    }
    result.push('…');
    result
}
