//! # Pool Error Types
//!
//! All errors that can occur while driving a pool.

use thiserror::Error;

use crate::entity::PoolId;

/// Errors that can occur in the pool system.
///
/// Both ownership and type errors signal a caller bug. The pool never
/// retries or recovers from them internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Released an entity to a pool that does not own it.
    #[error("cannot release {what} to pool {pool}: it is not in this pool")]
    Ownership {
        /// The pool that rejected the release. When a group finds no
        /// registered pool for the handle, the pool the handle names.
        pool: PoolId,
        /// Description of the rejected handle.
        what: String,
    },

    /// Payload type did not match the entity's declared payload type.
    #[error("cannot initialize {entity} with {payload}")]
    TypeMismatch {
        /// Type name of the entity being initialized.
        entity: &'static str,
        /// Type name of the payload that was supplied.
        payload: &'static str,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;
