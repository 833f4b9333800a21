use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

pub trait EventExt {

    fn is_enter(&self) -> bool;
    fn is_escape(&self) -> bool;
    fn is_stop(&self) -> bool;
    fn key_code(&self) -> Option<KeyCode>;

}

impl EventExt for Event {

    fn is_enter(&self) -> bool {
        self.key_code() == Some(KeyCode::Enter)
    }

    fn is_escape(&self) -> bool {
        self.key_code() == Some(KeyCode::Esc)
    }

    fn is_stop(&self) -> bool {
        match self {
            Event::Key(key_event) => key_event.code == KeyCode::Char('c') && key_event.modifiers == KeyModifiers::CONTROL,
            _ => false
        }
    }

    /// Code of a key press; releases and repeats are ignored.
    fn key_code(&self) -> Option<KeyCode> {
        match self {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => Some(key_event.code),
            _ => None
        }
    }
}
