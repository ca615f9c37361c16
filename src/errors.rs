//! Error types with diagnostics using miette
//!
//! Shape errors are raised before any point is allocated. Codec errors are
//! always recoverable and carry the index and type tag of the failing record.

use miette::Diagnostic;
use thiserror::Error;

use crate::types::NumericError;

// ============================================================================
// Shape Errors
// ============================================================================

/// Errors raised while validating shape parameters or edits
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("invalid {owner} parameter `{name}` = {value}: {reason}")]
    #[diagnostic(code(pointcraft::shape::invalid_parameter))]
    InvalidParameter {
        owner: String,
        name: String,
        value: f64,
        #[source]
        reason: NumericError,
    },

    #[error("{shape} is missing parameter `{name}`")]
    #[diagnostic(code(pointcraft::shape::missing_parameter))]
    MissingParameter { shape: String, name: String },

    #[error("{shape} has no parameter named `{name}`")]
    #[diagnostic(
        code(pointcraft::shape::unknown_parameter),
        help("see the shape's metadata for the parameters it accepts")
    )]
    UnknownParameter { shape: String, name: String },
}

impl ShapeError {
    pub(crate) fn invalid(
        owner: impl Into<String>,
        name: impl Into<String>,
        value: f64,
        reason: NumericError,
    ) -> Self {
        ShapeError::InvalidParameter {
            owner: owner.into(),
            name: name.into(),
            value,
            reason,
        }
    }
}

// ============================================================================
// Composition Errors
// ============================================================================

/// Errors from applying an edit to a composition
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum CompositionError {
    #[error("no shape with id `{id}`")]
    #[diagnostic(code(pointcraft::composition::unknown_shape))]
    UnknownShape { id: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Shape(#[from] ShapeError),
}

// ============================================================================
// Codec Errors
// ============================================================================

/// Errors from decoding an import key
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("import key is not a valid compressed payload: {reason}")]
    #[diagnostic(
        code(pointcraft::codec::corrupt_token),
        help("the key may be truncated; copy the whole `# [ImportKey]:` line")
    )]
    CorruptToken { reason: String },

    #[error("import key payload is malformed: {reason}")]
    #[diagnostic(code(pointcraft::codec::malformed_payload))]
    MalformedPayload { reason: String },

    #[error("import key format version {version} is not supported")]
    #[diagnostic(
        code(pointcraft::codec::unsupported_version),
        help("this build reads format version {supported}")
    )]
    UnsupportedVersion { version: u32, supported: u32 },

    #[error("shape #{index}: unknown shape type `{tag}`")]
    #[diagnostic(code(pointcraft::codec::unknown_shape_type))]
    UnknownShapeType { index: usize, tag: String },

    #[error("shape #{index} ({tag}) has invalid parameters")]
    #[diagnostic(code(pointcraft::codec::invalid_shape))]
    InvalidShape {
        index: usize,
        tag: String,
        #[source]
        source: ShapeError,
    },
}

impl CodecError {
    /// Index of the offending shape record, for record-level failures
    pub fn shape_index(&self) -> Option<usize> {
        match self {
            CodecError::UnknownShapeType { index, .. } | CodecError::InvalidShape { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }
}

// ============================================================================
// Import Errors
// ============================================================================

/// Errors from importing a previously exported artifact
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ImportError {
    #[error("no import key found in the artifact")]
    #[diagnostic(
        code(pointcraft::import::missing_key),
        help("exported files start with a `# [ImportKey]: ...` line")
    )]
    MissingKey,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Codec(#[from] CodecError),
}
