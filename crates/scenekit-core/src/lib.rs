//! SceneKit Core - Foundational types for the SceneKit schema tools
//!
//! This crate provides the types every other SceneKit crate depends on:
//! - `Vec3`, `Scale` - Spatial value types used by entity records
//! - `ContentHash` - SHA-256 based schema fingerprints
//! - Error types and Result alias

mod error;
mod hash;
mod types;

pub use error::{Result, SceneKitError};
pub use hash::{ContentHash, ContentHasher};
pub use types::{Scale, Vec3};
