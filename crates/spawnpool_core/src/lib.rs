//! # SPAWNPOOL Core
//!
//! Slot-recycling pool for entities that are expensive to construct and
//! cheap to re-initialize:
//! - Index-based slots that are recycled, never removed
//! - Deferred release, so a frame's despawns are recycled at a safe point
//! - A typed payload contract between the pool and its entities
//!
//! ## Lifecycle
//!
//! 1. **Grow** - the pool builds entities from a template, hidden
//! 2. **Create** - a free slot is re-initialized from a payload and shown
//! 3. **Release** - the entity is hidden and its slot freed (or buffered)
//! 4. **Reset** - [`Pool::release_all`] discards every slot
//!
//! ## Example
//!
//! ```rust,ignore
//! use spawnpool_core::{Activation, Pool, TypedPoolable};
//!
//! let mut pool = Pool::new(Bullet::default);
//!
//! pool.start_release_buffer();
//! for hit in collisions {
//!     pool.release(hit)?; // hidden now, slot stays reserved
//! }
//! pool.release_from_buffer(); // end of frame: slots reusable
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod entity;
pub mod error;
pub mod pool;

pub use config::PoolConfig;
pub use entity::{
    Activation, Membership, Payload, PoolHandle, PoolId, Poolable, Prototype, Template,
    TypedPoolable,
};
pub use error::{PoolError, PoolResult};
pub use pool::{ActiveIter, ActiveIterMut, Pool, PoolGroup, PoolManager, PoolStats};
