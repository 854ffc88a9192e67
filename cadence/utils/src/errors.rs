//! Errors generated by the scheduler.
use crate::Id;
use thiserror::Error;

/// Convenience wrapper to represent success or a meaningful scheduler error.
pub type CadenceResult<T> = std::result::Result<T, Error>;

/// Errors generated by the scheduler.
///
/// The kind is boxed so that a `CadenceResult` stays small on the happy path.
#[derive(Clone)]
pub struct Error {
    kind: Box<ErrorKind>,
    post_msg: Option<String>,
}

/// The different kinds of errors that can occur while lowering and
/// scheduling a program.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input graph violates an invariant that an earlier stage
    /// should have established.
    #[error("Malformed Structure: {0}")]
    MalformedStructure(String),

    /// A block carries a scheduling mode that is not understood.
    #[error("Unknown scheduling mode `{0}`")]
    UnknownSchedulingMode(String),

    /// A name was referenced but never defined.
    #[error("Undefined {kind} `{name}`")]
    Undefined { name: Id, kind: String },

    /// The assumption of a pass was violated.
    #[error("Pass `{pass}` assumption violated: {msg}")]
    PassAssumption { pass: String, msg: String },

    /// Failure while reading or writing files.
    #[error("{0}")]
    Io(String),

    /// The program description could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    Misc(String),
}

impl Error {
    pub fn malformed_structure<S: ToString>(msg: S) -> Self {
        ErrorKind::MalformedStructure(msg.to_string()).into()
    }

    pub fn unknown_scheduling_mode<S: ToString>(mode: S) -> Self {
        ErrorKind::UnknownSchedulingMode(mode.to_string()).into()
    }

    pub fn undefined<S: ToString>(name: Id, kind: S) -> Self {
        ErrorKind::Undefined {
            name,
            kind: kind.to_string(),
        }
        .into()
    }

    pub fn pass_assumption<S: ToString, M: ToString>(pass: S, msg: M) -> Self {
        ErrorKind::PassAssumption {
            pass: pass.to_string(),
            msg: msg.to_string(),
        }
        .into()
    }

    pub fn parse<S: ToString>(msg: S) -> Self {
        ErrorKind::Parse(msg.to_string()).into()
    }

    pub fn misc<S: ToString>(msg: S) -> Self {
        ErrorKind::Misc(msg.to_string()).into()
    }

    /// Attach a trailing note, usually the name of the offending region.
    pub fn with_post_msg(mut self, msg: Option<String>) -> Self {
        self.post_msg = msg;
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error {
            kind: Box::new(kind),
            post_msg: None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(post) = &self.post_msg {
            write!(f, "\n{post}")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        ErrorKind::Io(format!("IO Error: {e}")).into()
    }
}

impl From<std::fmt::Error> for Error {
    fn from(e: std::fmt::Error) -> Self {
        ErrorKind::Io(format!("Format Error: {e}")).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_msg_is_appended() {
        let err = Error::malformed_structure("two resources")
            .with_post_msg(Some("in region `loop0`".to_string()));
        assert_eq!(
            err.to_string(),
            "Malformed Structure: two resources\nin region `loop0`"
        );
        assert!(matches!(err.kind(), ErrorKind::MalformedStructure(_)));
    }

    #[test]
    fn undefined_names_kind() {
        let err = Error::undefined(Id::new("x"), "symbol");
        assert_eq!(err.message(), "Undefined symbol `x`");
    }
}
