//! Error code to message resolution.

use std::collections::HashMap;

use tracing::warn;

use crate::config::Messages;
use crate::template::Details;

/// Known failure categories of an analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    UnprocessableEntity,
    TooManyRequests,
    InternalServerError,
    BadGateway,
    GatewayTimeout,
}

impl ErrorCode {
    pub const ALL: [Self; 5] = [
        Self::UnprocessableEntity,
        Self::TooManyRequests,
        Self::InternalServerError,
        Self::BadGateway,
        Self::GatewayTimeout,
    ];

    pub const fn status(self) -> u16 {
        match self {
            Self::UnprocessableEntity => 422,
            Self::TooManyRequests => 429,
            Self::InternalServerError => 500,
            Self::BadGateway => 502,
            Self::GatewayTimeout => 504,
        }
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = u16;

    fn try_from(status: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|code| code.status() == status)
            .ok_or(status)
    }
}

/// Message templates for every known [`ErrorCode`] plus a default.
///
/// Built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct ErrorCatalog {
    templates: HashMap<ErrorCode, String>,
    default_template: String,
}

impl ErrorCatalog {
    pub fn new(
        templates: impl IntoIterator<Item = (ErrorCode, String)>,
        default_template: impl Into<String>,
    ) -> Self {
        Self {
            templates: templates.into_iter().collect(),
            default_template: default_template.into(),
        }
    }

    pub fn from_messages(messages: &Messages) -> Self {
        let errors = &messages.errors;
        Self::new(
            [
                (ErrorCode::UnprocessableEntity, errors.unprocessable_entity.clone()),
                (ErrorCode::TooManyRequests, errors.too_many_requests.clone()),
                (ErrorCode::InternalServerError, errors.internal_server_error.clone()),
                (ErrorCode::BadGateway, errors.bad_gateway.clone()),
                (ErrorCode::GatewayTimeout, errors.gateway_timeout.clone()),
            ],
            messages.analysis_error_default_message.clone(),
        )
    }

    pub fn template(&self, code: ErrorCode) -> Option<&str> {
        self.templates.get(&code).map(String::as_str)
    }

    pub fn default_template(&self) -> &str {
        &self.default_template
    }

    /// Resolve the message for a failed analysis.
    ///
    /// Codes outside the catalog fall back to the default template.
    /// Placeholders without a matching detail are left as they are.
    pub fn resolve(&self, code: Option<u16>, details: Option<&Details>) -> String {
        let template = match code {
            None => self.default_template(),
            Some(status) => {
                let known = ErrorCode::try_from(status)
                    .ok()
                    .and_then(|code| self.template(code));
                known.unwrap_or_else(|| {
                    warn!(status, "No message template for error code, using default");
                    self.default_template()
                })
            }
        };

        match details {
            Some(details) => details.apply(template),
            None => template.to_string(),
        }
    }
}

impl Default for ErrorCatalog {
    fn default() -> Self {
        Self::from_messages(&Messages::default())
    }
}
