//! Error types for the core crate.

use thiserror::Error;

/// Errors that can occur while building, mutating or (de)serializing an AIG.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AigError {
    /// The AIGER input could not be parsed.
    #[error("malformed AIGER input: {context}")]
    Malformed {
        /// Human-readable description of what failed to parse.
        context: String,
    },

    /// The input declares latches, which this crate does not support.
    #[error("sequential AIGER input ({latches} latches) is not supported")]
    Sequential {
        /// Number of latches declared by the header.
        latches: usize,
    },

    /// A literal or variable index referenced a node outside the graph.
    #[error("invalid node reference: variable {0} is out of range")]
    InvalidNode(u32),

    /// A literal or variable index referenced a node that has been removed.
    #[error("operation on dead node: variable {0} was previously removed")]
    DeadNode(u32),

    /// An internal structural invariant was violated.
    ///
    /// These indicate a bug in this crate rather than bad input and should
    /// not normally be reachable from public APIs.
    #[error("structural invariant violated: {0}")]
    StructuralInvariant(String),

    /// Underlying I/O failure while reading or writing an AIGER file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type AigResult<T> = Result<T, AigError>;
