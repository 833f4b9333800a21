use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::prelude::{Line, Span, Stylize, Widget};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};

pub struct Alert<'a> {
    title: &'a str,
    message: &'a str,
}

impl<'a> Alert<'a> {
    pub fn new(title: &'a str, message: &'a str) -> Self {
        Self { title, message }
    }
}

impl Widget for Alert<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized
    {
        let vertical = Layout::vertical([Constraint::Percentage(30)]).flex(Flex::Center);
        let horizontal = Layout::horizontal([Constraint::Percentage(40)]).flex(Flex::Center);
        let [area] = vertical.areas(area);
        let [area] = horizontal.areas(area);

        let block = Block::bordered()
            .light_red()
            .on_black()
            .title_alignment(Alignment::Center)
            .title(Span::from(format!(" {} ", self.title)).bold());

        let [_, text_area, _, button_area, _] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
            .areas(block.inner(area));

        let lines: Vec<Line> = self.message.lines().map(Line::raw).collect();
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap::default());

        let ok_button = Span::from("    Ok <Enter>    ").bold().reversed();
        let button_paragraph = Paragraph::new(Line::from(ok_button)).alignment(Alignment::Center);

        Clear.render(area, buf);
        block.render(area, buf);
        paragraph.render(text_area, buf);
        button_paragraph.render(button_area, buf);
    }
}
