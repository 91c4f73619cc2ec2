//! Error report entity returned by OpenTox services alongside failing responses

use std::fmt;

/// An `ot:ErrorReport` resource as published by a remote OpenTox service.
///
/// Every field is optional because services fill in as little or as much as
/// they like. The cause chain mirrors `ot:errorCause`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorReport {
    pub actor: Option<String>,
    pub message: Option<String>,
    pub details: Option<String>,
    pub error_code: Option<String>,
    pub http_status: Option<u16>,
    pub error_cause: Option<Box<ErrorReport>>,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn with_cause(mut self, cause: ErrorReport) -> Self {
        self.error_cause = Some(Box::new(cause));
        self
    }

    /// Number of reports in the cause chain, this one included
    pub fn depth(&self) -> usize {
        1 + self.error_cause.as_ref().map_or(0, |cause| cause.depth())
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = &self.error_code {
            write!(f, "[{}] ", code)?;
        }
        write!(f, "{}", self.message.as_deref().unwrap_or("no message"))?;
        if let Some(actor) = &self.actor {
            write!(f, " (actor: {})", actor)?;
        }
        if let Some(cause) = &self.error_cause {
            write!(f, "; caused by: {}", cause)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code_actor_and_cause() {
        let report = ErrorReport::new()
            .with_error_code("DatasetNotFound")
            .with_message("no such dataset")
            .with_actor("http://host/dataset")
            .with_cause(ErrorReport::new().with_message("db lookup failed"));

        let text = report.to_string();
        assert_eq!(
            text,
            "[DatasetNotFound] no such dataset (actor: http://host/dataset); caused by: db lookup failed"
        );
    }

    #[test]
    fn test_depth_counts_cause_chain() {
        let report = ErrorReport::new()
            .with_cause(ErrorReport::new().with_cause(ErrorReport::new()));
        assert_eq!(report.depth(), 3);
        assert_eq!(ErrorReport::new().depth(), 1);
    }
}
