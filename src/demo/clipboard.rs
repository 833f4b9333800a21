#[cfg_attr(test, mockall::automock)]
pub trait ClipboardAccess {
    fn set_text(&mut self, text: String) -> Result<(), String>;
}

pub struct ArboardClipboard {
    inner: arboard::Clipboard,
}

impl ArboardClipboard {
    pub fn new() -> Result<Self, arboard::Error> {
        Ok(Self { inner: arboard::Clipboard::new()? })
    }
}

impl ClipboardAccess for ArboardClipboard {
    fn set_text(&mut self, text: String) -> Result<(), String> {
        self.inner
            .set_text(text)
            .map_err(|e| format!("{e}"))
    }
}

/// Used when no system clipboard is reachable, e.g. over ssh.
#[derive(Default)]
pub struct NoopClipboard;

impl ClipboardAccess for NoopClipboard {
    fn set_text(&mut self, _text: String) -> Result<(), String> {
        Err("no clipboard is available in this session".to_string())
    }
}

pub fn system_clipboard() -> Box<dyn ClipboardAccess> {
    match ArboardClipboard::new() {
        Ok(clipboard) => Box::new(clipboard),
        Err(e) => {
            log::warn!("System clipboard unavailable, copying is disabled: {}", e);
            Box::new(NoopClipboard)
        }
    }
}
