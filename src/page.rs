use crate::download::Downloader;
use crate::models::ContributionForm;
use crate::status::StatusDisplay;
use crate::submitter::ContributionSubmitter;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// The button that starts a submission; carries the save endpoint address.
#[derive(Debug, Clone)]
pub struct TriggerControl {
    pub save_url: String,
}

/// A text-bearing element whose current value is read when the trigger fires.
#[derive(Debug, Clone, Default)]
pub struct InputElement {
    value: Arc<RwLock<String>>,
}

impl InputElement {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Arc::new(RwLock::new(value.into())),
        }
    }

    pub fn value(&self) -> String {
        self.value
            .read()
            .map(|v| v.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    #[cfg(test)]
    pub fn set_value(&self, value: impl Into<String>) {
        let mut guard = self
            .value
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = value.into();
    }
}

/// Element handles gathered once at startup.
#[derive(Debug, Clone)]
pub struct Page {
    pub trigger: Option<TriggerControl>,
    pub status: StatusDisplay,
    pub corrected_text: InputElement,
    pub image_name: InputElement,
    pub input_text: InputElement,
}

impl Page {
    pub fn from_sources(
        trigger: Option<TriggerControl>,
        corrected_text: impl Into<String>,
        image_name: impl Into<String>,
        input_text: impl Into<String>,
    ) -> Self {
        Self {
            trigger,
            status: StatusDisplay::new(),
            corrected_text: InputElement::new(corrected_text),
            image_name: InputElement::new(image_name),
            input_text: InputElement::new(input_text),
        }
    }

    pub fn read_form(&self) -> ContributionForm {
        ContributionForm {
            image_name: self.image_name.value(),
            input_text: self.input_text.value(),
            corrected_text: self.corrected_text.value(),
        }
    }

    /// Attaches the submitter to the trigger. Without a trigger control
    /// nothing is attached and `None` comes back.
    pub fn bind(
        &self,
        http_client: Arc<reqwest::Client>,
        downloader: Arc<dyn Downloader>,
    ) -> Option<ContributionSubmitter> {
        let Some(trigger) = &self.trigger else {
            debug!("no trigger control on page, nothing to bind");
            return None;
        };
        Some(ContributionSubmitter::new(
            http_client,
            trigger.save_url.clone(),
            self.clone(),
            downloader,
        ))
    }
}
