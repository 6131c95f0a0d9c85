use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using PermCheckError
pub type Result<T> = std::result::Result<T, PermCheckError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing and process exit reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// Manifest or baseline file missing where it is required to exist
    NotFound,
    /// Malformed manifest content
    Parse,
    /// Baseline exists but does not have the expected structure
    CorruptBaseline,
    /// Wrong file type for a baseline or report target, or an invalid config file
    Configuration,
    /// Caller supplied an invalid request (e.g. duplicate variant names)
    InvalidInput,
    Io,
    Serialization,
    /// Internal consistency failure (should be unreachable)
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Parse => "ERR_PARSE",
            ExErrorKind::CorruptBaseline => "ERR_CORRUPT_BASELINE",
            ExErrorKind::Configuration => "ERR_CONFIGURATION",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Used at the orchestration and CLI boundary. Carries the classification
/// plus the operation, the file involved and the rendered cause chain.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<PathBuf>,
    message: String,
    cause: Option<String>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            message: String::new(),
            cause: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add file path context
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach the rendered underlying cause
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the file path context, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the underlying cause, if any
    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(cause) = &self.cause {
            write!(f, " (caused by: {})", cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Underlying failure behind a parse or corrupt-baseline error
#[derive(Error, Debug)]
pub enum ParseCause {
    #[error(transparent)]
    Xml(#[from] xml::reader::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Well-formed XML with content that does not fit the expected structure
    #[error("{0}")]
    Structure(String),
}

/// Error taxonomy for permission check operations
#[derive(Error, Debug)]
pub enum PermCheckError {
    /// A file that has to exist is missing
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Manifest content could not be parsed
    #[error("Could not parse manifest {location}")]
    Parse {
        location: String,
        #[source]
        cause: ParseCause,
    },

    /// Baseline exists but cannot be parsed as a baseline document
    #[error(
        "Could not parse baseline {}, please make sure the format is valid",
        path.display()
    )]
    CorruptBaseline {
        path: PathBuf,
        #[source]
        cause: ParseCause,
    },

    /// Misconfigured target (wrong file type) or configuration file
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    /// Filesystem failure while reading or writing
    #[error("I/O error during {op} on {}", path.display())]
    Io {
        op: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// XML emitter failure while rendering a document
    #[error("Failed to serialize {target}")]
    Serialization {
        target: String,
        #[source]
        source: xml::writer::Error,
    },

    /// Internal consistency failure
    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl PermCheckError {
    /// Classification of this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            PermCheckError::NotFound { .. } => ExErrorKind::NotFound,
            PermCheckError::Parse { .. } => ExErrorKind::Parse,
            PermCheckError::CorruptBaseline { .. } => ExErrorKind::CorruptBaseline,
            PermCheckError::Configuration { .. } => ExErrorKind::Configuration,
            PermCheckError::Io { .. } => ExErrorKind::Io,
            PermCheckError::Serialization { .. } => ExErrorKind::Serialization,
            PermCheckError::Internal { .. } => ExErrorKind::Internal,
        }
    }

    /// Stable error code of this error
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    pub(crate) fn io(op: &str, path: &Path, source: std::io::Error) -> Self {
        PermCheckError::Io {
            op: op.to_string(),
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Render the `source()` chain of an error as `a: b: c`
fn render_source_chain(err: &dyn std::error::Error) -> Option<String> {
    let mut parts = Vec::new();
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(": "))
    }
}

impl From<PermCheckError> for ExError {
    fn from(err: PermCheckError) -> Self {
        let cause = render_source_chain(&err);
        let mut ex = ExError::new(err.kind()).with_message(err.to_string());
        ex = match &err {
            PermCheckError::NotFound { path } => ex.with_path(path),
            PermCheckError::CorruptBaseline { path, .. } => {
                ex.with_op("load_baseline").with_path(path)
            }
            PermCheckError::Parse { .. } => ex.with_op("parse_manifest"),
            PermCheckError::Io { op, path, .. } => ex.with_op(op.clone()).with_path(path),
            PermCheckError::Serialization { .. } => ex.with_op("serialize"),
            PermCheckError::Configuration { .. } | PermCheckError::Internal { .. } => ex,
        };
        match cause {
            Some(cause) => ex.with_cause(cause),
            None => ex,
        }
    }
}
