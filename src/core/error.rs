use thiserror::Error;


#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Malformed {entity} record: {reason}")]
    MalformedRecord { entity: &'static str, reason: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl CalendarError {
    pub fn malformed(entity: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            entity,
            reason: reason.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Http(_))
    }
}

impl From<::config::ConfigError> for CalendarError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}


pub type Result<T> = std::result::Result<T, CalendarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message() {
        let err = CalendarError::malformed("sprint", "missing field `name`");
        assert_eq!(err.to_string(), "Malformed sprint record: missing field `name`");
    }

    #[test]
    fn test_transport_classification() {
        assert!(CalendarError::Transport("connection refused".into()).is_transport());
        assert!(!CalendarError::malformed("issue", "no sprint reference").is_transport());
        assert!(!CalendarError::Config("missing field".into()).is_transport());
    }
}
