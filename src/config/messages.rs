use serde::{Deserialize, Serialize};

/// Localized strings rendered by the analysis dialog.
///
/// Templates may contain `{{KEY}}` placeholders; they are substituted at
/// render time and never looked up again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Pending title, `{{URL}}` is the page being analysed.
    pub analysis_in_progress_for: String,
    pub cancel_analysis: String,
    pub analysis_error_title: String,
    pub analysis_error_intro: String,
    pub analysis_error_default_message: String,
    pub close: String,
    pub errors: ErrorMessages,
}

/// Per-status-code error templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorMessages {
    #[serde(rename = "422")]
    pub unprocessable_entity: String,
    #[serde(rename = "429")]
    pub too_many_requests: String,
    #[serde(rename = "500")]
    pub internal_server_error: String,
    #[serde(rename = "502")]
    pub bad_gateway: String,
    #[serde(rename = "504")]
    pub gateway_timeout: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            analysis_in_progress_for: "Analysis in progress for {{URL}}".to_string(),
            cancel_analysis: "Cancel analysis".to_string(),
            analysis_error_title: "The analysis failed".to_string(),
            analysis_error_intro: "Sorry, we could not complete the analysis of this page."
                .to_string(),
            analysis_error_default_message:
                "An unexpected error occurred. Please try again in a few minutes.".to_string(),
            close: "Close".to_string(),
            errors: ErrorMessages::default(),
        }
    }
}

impl Default for ErrorMessages {
    fn default() -> Self {
        Self {
            unprocessable_entity:
                "The page could not be reached or did not return a valid response.".to_string(),
            too_many_requests: "You have reached the limit of {{daily_limit_per_host}} analyses \
                                per day for {{host}}. Please try again tomorrow."
                .to_string(),
            internal_server_error: "The analysis server encountered an internal error."
                .to_string(),
            bad_gateway: "The analysis server is temporarily unavailable.".to_string(),
            gateway_timeout: "The page took too long to load and the analysis timed out."
                .to_string(),
        }
    }
}
