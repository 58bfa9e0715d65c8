//! Error types for sliver.
//!
//! This module defines all error types used throughout the library, along
//! with the coarse [`ErrorKind`] classification the batch driver uses to
//! decide between aborting a run and skipping a single object.

use thiserror::Error;

use crate::host::ObjectId;

/// Result type alias using [`DivideError`].
pub type Result<T> = std::result::Result<T, DivideError>;

/// Coarse error classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input: an empty source group, an unsupported object, or an invalid parameter.
    Input,
    /// Geometry could not be read from a host object.
    Coercion,
    /// Sampling or construction of new geometry failed.
    Geometry,
    /// A host create/delete/assign/enumerate call failed.
    HostOperation,
}

/// Errors that can occur while subdividing facade geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DivideError {
    /// The source group holds no objects.
    #[error("no objects found on group '{group}'")]
    EmptyGroup {
        /// The group name.
        group: String,
    },

    /// The object is neither a curve nor a mesh.
    #[error("object {object} is neither a curve nor a mesh")]
    UnsupportedObject {
        /// The offending object.
        object: ObjectId,
    },

    /// The object could not be read as a mesh.
    #[error("object {object} could not be read as a mesh: {message}")]
    Coercion {
        /// The offending object.
        object: ObjectId,
        /// Error message.
        message: String,
    },

    /// Sampling or building geometry failed.
    #[error("geometry error on object {object}: {message}")]
    Geometry {
        /// The object being processed.
        object: ObjectId,
        /// Error message.
        message: String,
    },

    /// A call into the geometry host failed.
    #[error("host operation '{operation}' failed: {message}")]
    HostOperation {
        /// Name of the host operation.
        operation: &'static str,
        /// Error message.
        message: String,
    },

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face repeats a vertex index.
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A curve cannot be built from the given vertices.
    #[error("invalid curve: {0}")]
    InvalidCurve(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl DivideError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        DivideError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a host operation error.
    pub fn host<M: Into<String>>(operation: &'static str, message: M) -> Self {
        DivideError::HostOperation {
            operation,
            message: message.into(),
        }
    }

    /// Create a geometry error for `object`.
    pub fn geometry<M: Into<String>>(object: ObjectId, message: M) -> Self {
        DivideError::Geometry {
            object,
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DivideError::EmptyGroup { .. }
            | DivideError::UnsupportedObject { .. }
            | DivideError::InvalidParameter { .. } => ErrorKind::Input,
            DivideError::Coercion { .. }
            | DivideError::InvalidVertexIndex { .. }
            | DivideError::DegenerateFace { .. } => ErrorKind::Coercion,
            DivideError::Geometry { .. } | DivideError::InvalidCurve(_) => ErrorKind::Geometry,
            DivideError::HostOperation { .. } => ErrorKind::HostOperation,
        }
    }
}
