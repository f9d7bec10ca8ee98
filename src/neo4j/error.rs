//! Graph store error type

use regex::Regex;
use std::sync::LazyLock;

/// `Neo.ClientError.<Classification>.<Title>`
static CLIENT_ERROR_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Neo\.ClientError\.[A-Za-z]+\.[A-Za-z]+").expect("valid code pattern")
});

/// The string value following the `"message"` key of a debug-printed failure
static FAILURE_MESSAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""message"[^"]*"((?:[^"\\]|\\.)*)""#).expect("valid message pattern")
});

/// Any debug-printed string literal
static QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""((?:[^"\\]|\\.)*)""#).expect("valid quote pattern")
});

/// Errors surfaced by [`GraphStore`](super::GraphStore) operations
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The store refused the statement (bad regex, type mismatch, ...)
    #[error("{message}")]
    Rejected { code: String, message: String },

    /// Connectivity, protocol or decoding failure
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl GraphError {
    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        GraphError::Rejected {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Recover a client error from a failure the driver only reports as text.
    ///
    /// Failures raised while pulling results (bad regex, type mismatch) reach
    /// us as `UnexpectedMessage("unexpected response for PULL: Ok(Failure(..))")`.
    fn from_failure_text(text: &str) -> Option<Self> {
        let code = CLIENT_ERROR_CODE.find(text)?.as_str();
        let message = FAILURE_MESSAGE
            .captures(text)
            .and_then(|c| c.get(1))
            .or_else(|| {
                QUOTED
                    .captures_iter(text)
                    .filter_map(|c| c.get(1))
                    .find(|m| !matches!(m.as_str(), "code" | "message") && m.as_str() != code)
            })
            .map(|m| unescape_debug(m.as_str()))
            .unwrap_or_else(|| code.to_string());
        Some(GraphError::rejected(code, message))
    }
}

/// Undo `{:?}` string escaping
fn unescape_debug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

impl From<neo4rs::Error> for GraphError {
    fn from(err: neo4rs::Error) -> Self {
        match &err {
            neo4rs::Error::Neo4j(e) if e.code().starts_with("Neo.ClientError.") => {
                GraphError::rejected(e.code(), e.message())
            }
            neo4rs::Error::UnexpectedMessage(text) => GraphError::from_failure_text(text)
                .unwrap_or_else(|| GraphError::Backend(anyhow::Error::new(err))),
            _ => GraphError::Backend(anyhow::Error::new(err)),
        }
    }
}

impl From<neo4rs::DeError> for GraphError {
    fn from(err: neo4rs::DeError) -> Self {
        GraphError::Backend(anyhow::Error::new(err).context("Failed to decode Neo4j row"))
    }
}
