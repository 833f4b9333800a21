use crate::demo::component::Component;
use crate::demo::event_ext::EventExt;
use crate::demo::heroes;
use crate::demo::Message;
use crossterm::event::{Event, KeyCode};
use ratatui::layout::Rect;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

/// Body of the active page, scrolled to the viewport's offset.
#[derive(Default)]
pub struct PageView {
    title: String,
    lines: Vec<String>,
    scroll: (u16, u16),
}

impl PageView {
    pub fn set_page(&mut self, url: &str, title: &str, scroll_x: f64, scroll_y: f64) {
        self.title = format!(" {} - {} ", title, url);
        self.lines = heroes::page_lines(url);
        self.scroll = (to_offset(scroll_y), to_offset(scroll_x));
    }
}

fn to_offset(position: f64) -> u16 {
    position.clamp(0.0, u16::MAX as f64) as u16
}

impl Component<Message> for PageView {
    fn view(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self.lines.iter().map(|line| Line::raw(line.as_str())).collect();
        let paragraph = Paragraph::new(lines)
            .scroll(self.scroll)
            .block(Block::bordered().title(Line::from(self.title.as_str()).bold()));
        frame.render_widget(paragraph, area);
    }

    fn handle_event(&mut self, event: &Event) -> Option<Message> {
        match event.key_code()? {
            KeyCode::Char('j') => Some(Message::Scroll(1.0)),
            KeyCode::Char('k') => Some(Message::Scroll(-1.0)),
            _ => None,
        }
    }
}
