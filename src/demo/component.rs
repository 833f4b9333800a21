use crossterm::event::Event;
use ratatui::layout::Rect;
use ratatui::Frame;

pub trait Component<M> {

    fn view(&self, frame: &mut Frame, area: Rect);
    fn handle_event(&mut self, event: &Event) -> Option<M>;

}
