mod history_panel;
mod input_dialog;
mod page_view;

pub use history_panel::HistoryPanel;
pub use input_dialog::{Button, InputDialog, InputField};
pub use page_view::PageView;
