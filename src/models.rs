use serde::{Deserialize, Serialize};

/// Body of a 2xx reply from the save endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body a failing save endpoint may send along with a non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionForm {
    pub image_name: String,
    pub input_text: String,
    pub corrected_text: String,
}

impl ContributionForm {
    pub fn to_multipart(&self) -> reqwest::multipart::Form {
        reqwest::multipart::Form::new()
            .text("image_name", self.image_name.clone())
            .text("input_text", self.input_text.clone())
            .text("corrected_text", self.corrected_text.clone())
    }
}

// Empty strings count as missing, like a falsy message.
pub fn non_empty(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_response_message_optional() {
        let resp: SaveResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(resp.success);
        assert!(resp.message.is_none());

        let resp: SaveResponse =
            serde_json::from_str(r#"{"success": false, "message": "duplicate"}"#).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.message.as_deref(), Some("duplicate"));
    }

    #[test]
    fn test_save_response_requires_success_flag() {
        assert!(serde_json::from_str::<SaveResponse>(r#"{"message": "ok"}"#).is_err());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("x".into())), Some("x".to_string()));
        assert_eq!(non_empty(None), None);
    }
}
