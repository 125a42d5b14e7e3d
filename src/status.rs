use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

pub const SAVING: &str = "Saving...";
pub const SAVED_AND_DOWNLOADED: &str =
    "Thank you for your contribution. Your text has been saved for model improvement and downloaded.";
pub const SAVED_DOWNLOAD_FAILED: &str =
    "Save successful, but download failed. Please copy text manually.";
pub const SAVE_OPERATION_FAILED: &str = "Save operation failed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Neutral,
    Success,
    Error,
}

impl StatusClass {
    pub fn as_class(&self) -> &'static str {
        match self {
            StatusClass::Neutral => "message-box",
            StatusClass::Success => "message-box success-message",
            StatusClass::Error => "message-box error-message",
        }
    }
}

#[derive(Debug)]
struct StatusState {
    text: String,
    class: StatusClass,
}

/// Handle to the status element. Clones share the same element, so
/// overlapping submissions overwrite each other's text.
#[derive(Debug, Clone)]
pub struct StatusDisplay {
    inner: Arc<Mutex<StatusState>>,
}

impl Default for StatusDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusDisplay {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StatusState {
                text: String::new(),
                class: StatusClass::Neutral,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StatusState> {
        // A panicked writer leaves plain data behind; keep using it.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set(&self, text: impl Into<String>, class: StatusClass) {
        let text = text.into();
        match class {
            StatusClass::Error => warn!("status [{}]: {}", class.as_class(), text),
            _ => info!("status [{}]: {}", class.as_class(), text),
        }
        let mut state = self.lock();
        state.text = text;
        state.class = class;
    }

    pub fn text(&self) -> String {
        self.lock().text.clone()
    }

    pub fn class(&self) -> StatusClass {
        self.lock().class
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_element() {
        let display = StatusDisplay::new();
        let other = display.clone();
        display.set("Error: first", StatusClass::Error);
        other.set(SAVING, StatusClass::Neutral);

        assert_eq!(display.text(), SAVING);
        assert_eq!(display.class(), StatusClass::Neutral);
        assert_eq!(display.class().as_class(), "message-box");
    }

    #[test]
    fn test_class_strings() {
        assert_eq!(StatusClass::Success.as_class(), "message-box success-message");
        assert_eq!(StatusClass::Error.as_class(), "message-box error-message");
    }
}
