use serde::{Serialize, Deserialize};
use std::fmt;

/// Broad classification of engine failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Configuration or caller data the engine cannot work with
    InvalidInput,
    /// The persistence collaborator failed; propagated unmodified
    Storage,
}

/// Unified error type for the engine.
/// Every fallible public operation returns Result<T, EngineError>.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineError {
    pub message: String,
    pub stage: String,
    pub kind: ErrorKind,
    pub learner_id: Option<String>,
    pub context: Option<String>,
    pub source: Option<String>,
}

impl EngineError {
    /// Create a new error with stage and message
    pub fn new<S: Into<String>>(message: S, stage: &'static str, kind: ErrorKind) -> Self {
        EngineError {
            message: message.into(),
            stage: stage.to_string(),
            kind,
            learner_id: None,
            context: None,
            source: None,
        }
    }

    pub fn storage<S: Into<String>>(message: S, stage: &'static str) -> Self {
        Self::new(message, stage, ErrorKind::Storage)
    }

    pub fn invalid_input<S: Into<String>>(message: S, stage: &'static str) -> Self {
        Self::new(message, stage, ErrorKind::InvalidInput)
    }

    /// Attach the learner the failing operation was acting on
    pub fn with_learner<S: Into<String>>(mut self, learner_id: S) -> Self {
        self.learner_id = Some(learner_id.into());
        self
    }

    /// Add additional context information
    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add source error information
    pub fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn is_storage(&self) -> bool {
        self.kind == ErrorKind::Storage
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.message)?;
        if let Some(ref learner) = self.learner_id {
            write!(f, " (learner: {})", learner)?;
        }
        if let Some(ref context) = self.context {
            write!(f, " (context: {})", context)?;
        }
        if let Some(ref source) = self.source {
            write!(f, " (source: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl From<anyhow::Error> for EngineError {
    fn from(err: anyhow::Error) -> Self {
        // Alternate formatting keeps the whole context chain
        EngineError::invalid_input(format!("{:#}", err), "config").with_source("anyhow")
    }
}

impl From<crate::store::StoreError> for EngineError {
    fn from(err: crate::store::StoreError) -> Self {
        let source = match &err {
            crate::store::StoreError::Io { .. } => "std::io",
            crate::store::StoreError::Json { .. } => "serde_json",
            crate::store::StoreError::Backend(_) => "store",
        };
        EngineError::storage(err.to_string(), "store").with_source(source)
    }
}
