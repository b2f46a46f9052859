use crate::host::Clipboard;
use std::cell::RefCell;

/// The operating system clipboard, for hosts that run outside a browser.
pub struct SystemClipboard {
    inner: RefCell<Option<arboard::Clipboard>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        let inner = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                tracing::warn!("System clipboard unavailable: {}", err);
                None
            }
        };
        Self {
            inner: RefCell::new(inner),
        }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) {
        let mut inner = self.inner.borrow_mut();
        let Some(clipboard) = inner.as_mut() else {
            return;
        };
        if let Err(err) = clipboard.set_text(text.to_string()) {
            tracing::warn!("Failed to write clipboard: {}", err);
        }
    }
}
