use thiserror::Error;

/// A question record that cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("question \"{0}\" has no answers")]
    NoAnswers(String),

    #[error("question \"{statement}\" marks answer {correct} as correct but has {answers} answers")]
    CorrectOutOfRange {
        statement: String,
        correct: i64,
        answers: usize,
    },

    #[error("unknown question category \"{0}\"")]
    UnknownCategory(String),

    #[error("unknown locale prefix \"{0}\"")]
    UnknownLocale(String),
}

/// A question source that could not be read at all.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read question file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed question file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value \"{value}\": {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(var: &'static str, value: &str, reason: impl ToString) -> Self {
        ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
