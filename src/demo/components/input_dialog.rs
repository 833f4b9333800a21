use crate::demo::event_ext::EventExt;
use crossterm::event::{Event, KeyCode};
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::Stylize;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};
use ratatui::Frame;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

#[derive(Debug)]
pub struct InputField<FieldId> {
    pub id: FieldId,
    pub title: String,
    pub value: Input,
}

impl<FieldId> InputField<FieldId> {
    pub fn new<T, V>(id: FieldId, title: T, value: V) -> Self
    where
        T: Into<String>,
        V: Into<String>,
    {
        Self {
            id,
            title: title.into(),
            value: Input::new(value.into()),
        }
    }

    fn update(&mut self, event: &Event) {
        self.value.handle_event(event);
    }
}

pub struct Button<ButtonId> {
    id: ButtonId,
    title: String,
}

impl<ButtonId> Button<ButtonId> {
    pub fn new<T: Into<String>>(id: ButtonId, title: T) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectedItem {
    Field(usize),
    Button(usize),
}

/// Modal form. `Tab` moves between fields and buttons, `Enter` on a button
/// returns its id and `Esc` dismisses the dialog.
pub struct InputDialog<FieldId, ButtonId> {
    title: String,
    fields: Vec<InputField<FieldId>>,
    buttons: Vec<Button<ButtonId>>,
    selected_item: SelectedItem,
    dismissed: bool,
}

impl<FieldId, ButtonId> InputDialog<FieldId, ButtonId>
where
    FieldId: Copy + Eq,
    ButtonId: Copy,
{
    pub fn new<T: Into<String>>(
        title: T,
        fields: Vec<InputField<FieldId>>,
        buttons: Vec<Button<ButtonId>>,
    ) -> Self {
        let selected_item = if fields.is_empty() {
            SelectedItem::Button(0)
        } else {
            SelectedItem::Field(0)
        };
        Self {
            title: title.into(),
            fields,
            buttons,
            selected_item,
            dismissed: false,
        }
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    pub fn value(&self, field: FieldId) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.id == field)
            .map(|f| f.value.value())
    }

    /// Returns the id of the button that was activated, if any.
    pub fn handle_event(&mut self, event: &Event) -> Option<ButtonId> {
        if event.is_escape() {
            self.dismissed = true;
            return None;
        }
        match self.selected_item {
            SelectedItem::Field(i) => {
                self.handle_event_while_field_selected(event, i);
                None
            }
            SelectedItem::Button(i) => self.handle_event_while_button_selected(event, i),
        }
    }

    fn handle_event_while_field_selected(&mut self, event: &Event, selected: usize) {
        match event.key_code() {
            Some(KeyCode::Up) => {
                if selected > 0 {
                    self.selected_item = SelectedItem::Field(selected - 1);
                }
            }
            Some(KeyCode::Down) | Some(KeyCode::Tab) | Some(KeyCode::Enter) => {
                self.selected_item = if selected + 1 < self.fields.len() {
                    SelectedItem::Field(selected + 1)
                } else {
                    SelectedItem::Button(0)
                };
            }
            _ => {
                if let Some(field) = self.fields.get_mut(selected) {
                    field.update(event);
                }
            }
        }
    }

    fn handle_event_while_button_selected(
        &mut self,
        event: &Event,
        selected: usize,
    ) -> Option<ButtonId> {
        match event.key_code()? {
            KeyCode::Up => {
                if !self.fields.is_empty() {
                    self.selected_item = SelectedItem::Field(self.fields.len() - 1);
                }
                None
            }
            KeyCode::Left => {
                if selected > 0 {
                    self.selected_item = SelectedItem::Button(selected - 1);
                }
                None
            }
            KeyCode::Right => {
                if selected + 1 < self.buttons.len() {
                    self.selected_item = SelectedItem::Button(selected + 1);
                }
                None
            }
            KeyCode::Tab => {
                self.selected_item = if selected + 1 < self.buttons.len() {
                    SelectedItem::Button(selected + 1)
                } else if self.fields.is_empty() {
                    SelectedItem::Button(0)
                } else {
                    SelectedItem::Field(0)
                };
                None
            }
            KeyCode::Enter => self.buttons.get(selected).map(|button| button.id),
            _ => None,
        }
    }

    fn inputs(&self, max_title_len: usize) -> Paragraph {
        let lines: Vec<Line> = self
            .fields
            .iter()
            .flat_map(|field| {
                let white_space = " ".repeat(max_title_len - field.title.len());
                vec![
                    Line::from(format!("{}:{} {}", field.title, white_space, field.value)).bold(),
                    Line::raw(""),
                ]
            })
            .collect();
        Paragraph::new(lines).alignment(Alignment::Left)
    }

    fn buttons(&self) -> Paragraph {
        let buttons: Vec<Span> = self
            .buttons
            .iter()
            .enumerate()
            .map(|(i, button)| {
                let span = Span::from(format!("    {}    ", button.title)).bold();
                if self.selected_item == SelectedItem::Button(i) {
                    span.reversed()
                } else {
                    span
                }
            })
            .collect();
        Paragraph::new(Line::from(buttons)).alignment(Alignment::Center)
    }

    pub fn view(&self, frame: &mut Frame, area: Rect) {
        let vertical = Layout::vertical([Constraint::Percentage(40)]).flex(Flex::Center);
        let horizontal = Layout::horizontal([Constraint::Percentage(60)]).flex(Flex::Center);
        let [area] = vertical.areas(area);
        let [area] = horizontal.areas(area);

        let block = Block::bordered()
            .light_blue()
            .on_black()
            .title_alignment(Alignment::Center)
            .title(format!(" {} ", self.title));
        let inner_area = block.inner(area);

        let [input_area, _, button_area, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
            .areas(inner_area);

        let max_title_len = self
            .fields
            .iter()
            .map(|field| field.title.len())
            .max()
            .unwrap_or_default();

        if let SelectedItem::Field(i) = self.selected_item {
            if let Some(field) = self.fields.get(i) {
                frame.set_cursor_position((
                    input_area.x + max_title_len as u16 + 2 + field.value.visual_cursor() as u16,
                    input_area.y + i as u16 * 2,
                ));
            }
        }

        frame.render_widget(Clear, area);
        frame.render_widget(block, area);
        frame.render_widget(self.inputs(max_title_len), input_area);
        frame.render_widget(self.buttons(), button_area);
    }
}
