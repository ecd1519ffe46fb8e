//! Error Taxonomy
//!
//! Every failure the shaping pipeline can produce falls into one of three
//! classes:
//!
//! - [`ValidationError`]: an input record is malformed (missing or empty
//!   name, a leaf without a path identifier, undecodable report JSON).
//!
//! - [`StructuralError`]: the records describe an impossible tree (two
//!   records colliding on one full name, more than one root, a dependency
//!   carrier that is also a parent).
//!
//! - [`ReferenceError`]: a declared dependency identifier resolves to no
//!   known leaf.
//!
//! # Propagation Policy
//!
//! Validation and structural errors abort the operation that hit them and
//! surface to the caller. Reference errors are fatal only under the strict
//! link policy; the lenient policy drops the unresolved edge and records it
//! as a diagnostic instead (see `graph::linker`).
//!
//! Every variant carries the offending id or path so the rendering layer can
//! report something actionable. Callers are never handed a partially shaped
//! structure alongside an error.

use thiserror::Error;

/// A malformed input record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A record's `name` field is missing or empty.
    #[error("record {index} has an empty name")]
    EmptyName {
        /// Position of the record in the input sequence.
        index: usize,
    },

    /// A leaf carries neither a `full_path` nor a previously assigned id.
    #[error("node `{name}` has no path identifier")]
    MissingPath {
        /// Display name of the offending node.
        name: String,
    },

    /// The report JSON could not be decoded into the expected shape.
    #[error("malformed report: {message}")]
    MalformedReport {
        /// Decoder message describing what failed.
        message: String,
    },
}

/// An ambiguous or contradictory tree structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// Two distinct records collide on the same full name with
    /// incompatible payloads.
    #[error("conflicting records for `{path}`")]
    AmbiguousPath {
        /// The full name both records claim.
        path: String,
    },

    /// More than one record has no parent segment.
    #[error("multiple roots: `{first}` and `{second}`")]
    MultipleRoots {
        /// Full name of the root seen first.
        first: String,
        /// Full name of the conflicting root.
        second: String,
    },

    /// A record carrying dependencies is also the parent of other records.
    #[error("`{path}` declares dependencies but is a parent of other records")]
    DependenciesOnParent {
        /// Full name of the offending record.
        path: String,
    },

    /// A non-directory node in the nested report form has children.
    #[error("`{path}` is not a directory but has children")]
    ChildrenOnLeaf {
        /// Full path of the offending node.
        path: String,
    },
}

/// A dependency identifier that resolves to no known leaf.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{leaf}` depends on `{target}`, which is not a known leaf")]
pub struct ReferenceError {
    /// Full path of the leaf declaring the dependency.
    pub leaf: String,
    /// The identifier that failed to resolve.
    pub target: String,
}

/// Any error produced by the shaping pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A malformed input record.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An ambiguous or contradictory tree structure.
    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// An unresolvable dependency identifier.
    #[error(transparent)]
    Reference(#[from] ReferenceError),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::MalformedReport {
            message: err.to_string(),
        })
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
