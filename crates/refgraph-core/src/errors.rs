use refgraph_core_types::{Oid, TransactionId};
use thiserror::Error;

use crate::events::ReferencedItemHasNewVersion;
use crate::model::{RefType, ResourceType, Sheet};

/// Result type alias using RefGraphError
pub type Result<T> = std::result::Result<T, RefGraphError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling,
/// tests and external API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RgErrorKind {
    // Structural/Validation
    InvalidInput,
    NotFound,
    AlreadyExists,
    InvalidChildType,
    ImmutableVersion,

    // Versioning
    NoForkAllowed,
    AutoUpdateNoForkAllowed,

    // Consistency
    InvariantViolation,

    // Programmer errors
    Configuration,

    // Integration
    Serialization,

    // Internal
    Internal,
}

impl RgErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            RgErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            RgErrorKind::NotFound => "ERR_NOT_FOUND",
            RgErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            RgErrorKind::InvalidChildType => "ERR_INVALID_CHILD_TYPE",
            RgErrorKind::ImmutableVersion => "ERR_IMMUTABLE_VERSION",
            RgErrorKind::NoForkAllowed => "ERR_NO_FORK_ALLOWED",
            RgErrorKind::AutoUpdateNoForkAllowed => "ERR_AUTO_UPDATE_NO_FORK_ALLOWED",
            RgErrorKind::InvariantViolation => "ERR_INVARIANT_VIOLATION",
            RgErrorKind::Configuration => "ERR_CONFIGURATION",
            RgErrorKind::Serialization => "ERR_SERIALIZATION",
            RgErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Classification fields for programmatic handling plus context for
/// debugging. Built from a `RefGraphError` at reporting boundaries.
#[derive(Debug, Clone)]
pub struct RgError {
    kind: RgErrorKind,
    op: Option<String>,
    oid: Option<Oid>,
    transaction_id: Option<TransactionId>,
    message: String,
}

impl RgError {
    /// Create a new error with the specified kind
    pub fn new(kind: RgErrorKind) -> Self {
        Self {
            kind,
            op: None,
            oid: None,
            transaction_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the oid of the resource the error is about
    pub fn with_oid(mut self, oid: Oid) -> Self {
        self.oid = Some(oid);
        self
    }

    /// Add transaction context
    pub fn with_transaction_id(mut self, transaction_id: TransactionId) -> Self {
        self.transaction_id = Some(transaction_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> RgErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn oid(&self) -> Option<Oid> {
        self.oid
    }

    pub fn transaction_id(&self) -> Option<&TransactionId> {
        self.transaction_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// True for both the direct and the cascaded fork-guard failure
    pub fn is_no_fork(&self) -> bool {
        matches!(
            self.kind,
            RgErrorKind::NoForkAllowed | RgErrorKind::AutoUpdateNoForkAllowed
        )
    }
}

impl std::fmt::Display for RgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(oid) = self.oid {
            write!(f, " (oid: {})", oid)?;
        }
        Ok(())
    }
}

impl std::error::Error for RgError {}

// ========== End Error Facility ==========

/// Error taxonomy for reference graph and versioning operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RefGraphError {
    // ===== Programmer errors =====
    /// Structural misuse, e.g. a non-concrete reftype passed to `set_references`
    #[error("Configuration error: {details}")]
    Configuration { details: String },

    // ===== Versioning =====
    /// Version creation would fork a linear-history item
    #[error("No fork allowed on {resource}: predecessors {predecessors:?} are not the current LAST")]
    NoForkAllowed {
        resource: Oid,
        predecessors: Vec<Oid>,
    },

    /// An auto-update cascade tried to fork the referencing resource's item
    #[error("No fork allowed while auto-updating {resource} (old version {}, new version {})", .event.old_version, .event.new_version)]
    AutoUpdateNoForkAllowed {
        resource: Oid,
        event: Box<ReferencedItemHasNewVersion>,
    },

    #[error("Follows must name at least one predecessor of item {item}")]
    EmptyFollows { item: Oid },

    #[error("Resource {version} is not a version of item {item}")]
    NotAVersionOf { version: Oid, item: Oid },

    #[error("Resource {oid} is not an item")]
    NotAnItem { oid: Oid },

    /// Version payloads are fixed once their creating transaction is over
    #[error("Version {oid} is immutable")]
    ImmutableVersion { oid: Oid },

    // ===== Structural =====
    #[error("Resource not found: {oid}")]
    ResourceNotFound { oid: Oid },

    #[error("Parent not found: {oid}")]
    ParentNotFound { oid: Oid },

    #[error("Name '{name}' already used below {parent}")]
    NameConflict { parent: Oid, name: String },

    #[error("Resource type {child_type} cannot be created below {parent}")]
    InvalidChildType {
        parent: Oid,
        child_type: ResourceType,
    },

    // ===== Sheets =====
    #[error("Resource {oid} does not provide sheet {sheet}")]
    SheetNotProvided { oid: Oid, sheet: Sheet },

    #[error("Sheet {sheet} has no field '{field}'")]
    UnknownField { sheet: Sheet, field: String },

    #[error("Invalid value for {sheet}.{field}: {reason}")]
    InvalidFieldValue {
        sheet: Sheet,
        field: String,
        reason: String,
    },

    // ===== Consistency =====
    #[error("Reference index asymmetry: {source_oid} -[{reftype}]-> {target}")]
    IndexAsymmetry {
        source_oid: Oid,
        reftype: RefType,
        target: Oid,
    },

    #[error("Tag invariant violated on item {item}: {reason}")]
    TagInvariantViolation { item: Oid, reason: String },

    // ===== Integration =====
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl RefGraphError {
    /// True for both `NoForkAllowed` and `AutoUpdateNoForkAllowed`
    pub fn is_no_fork(&self) -> bool {
        matches!(
            self,
            RefGraphError::NoForkAllowed { .. } | RefGraphError::AutoUpdateNoForkAllowed { .. }
        )
    }
}

impl From<RefGraphError> for RgError {
    fn from(err: RefGraphError) -> Self {
        let message = err.to_string();
        match err {
            RefGraphError::Configuration { .. } => {
                RgError::new(RgErrorKind::Configuration).with_message(message)
            }
            RefGraphError::NoForkAllowed { resource, .. } => {
                RgError::new(RgErrorKind::NoForkAllowed)
                    .with_oid(resource)
                    .with_op("create_version")
                    .with_message(message)
            }
            RefGraphError::AutoUpdateNoForkAllowed { resource, .. } => {
                RgError::new(RgErrorKind::AutoUpdateNoForkAllowed)
                    .with_oid(resource)
                    .with_op("auto_update")
                    .with_message(message)
            }
            RefGraphError::EmptyFollows { item } => RgError::new(RgErrorKind::InvalidInput)
                .with_oid(item)
                .with_message(message),
            RefGraphError::NotAVersionOf { version, .. } => {
                RgError::new(RgErrorKind::InvalidInput)
                    .with_oid(version)
                    .with_message(message)
            }
            RefGraphError::NotAnItem { oid } => RgError::new(RgErrorKind::InvalidInput)
                .with_oid(oid)
                .with_message(message),
            RefGraphError::ImmutableVersion { oid } => {
                RgError::new(RgErrorKind::ImmutableVersion)
                    .with_oid(oid)
                    .with_message(message)
            }
            RefGraphError::ResourceNotFound { oid } | RefGraphError::ParentNotFound { oid } => {
                RgError::new(RgErrorKind::NotFound)
                    .with_oid(oid)
                    .with_message(message)
            }
            RefGraphError::NameConflict { parent, .. } => {
                RgError::new(RgErrorKind::AlreadyExists)
                    .with_oid(parent)
                    .with_message(message)
            }
            RefGraphError::InvalidChildType { parent, .. } => {
                RgError::new(RgErrorKind::InvalidChildType)
                    .with_oid(parent)
                    .with_message(message)
            }
            RefGraphError::SheetNotProvided { oid, .. } => {
                RgError::new(RgErrorKind::InvalidInput)
                    .with_oid(oid)
                    .with_message(message)
            }
            RefGraphError::UnknownField { .. } | RefGraphError::InvalidFieldValue { .. } => {
                RgError::new(RgErrorKind::InvalidInput).with_message(message)
            }
            RefGraphError::IndexAsymmetry { source_oid, .. } => {
                RgError::new(RgErrorKind::InvariantViolation)
                    .with_oid(source_oid)
                    .with_message(message)
            }
            RefGraphError::TagInvariantViolation { item, .. } => {
                RgError::new(RgErrorKind::InvariantViolation)
                    .with_oid(item)
                    .with_message(message)
            }
            RefGraphError::Serialization { .. } => {
                RgError::new(RgErrorKind::Serialization).with_message(message)
            }
            RefGraphError::Internal { .. } => {
                RgError::new(RgErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for RefGraphError {
    fn from(err: serde_json::Error) -> Self {
        RefGraphError::Serialization {
            reason: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for RefGraphError {
    fn from(err: toml::de::Error) -> Self {
        RefGraphError::Configuration {
            details: err.to_string(),
        }
    }
}
