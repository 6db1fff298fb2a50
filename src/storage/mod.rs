//! Storage abstraction layer for recorded cells
//!
//! This module provides a trait-based storage system so the cell services can
//! run against different backends. SQLite is available behind the `storage`
//! feature; the in-memory backend is always available.

pub mod cell_status;
pub mod memory;
#[cfg(feature = "storage")]
pub mod performance_optimizations;
#[cfg(feature = "storage")]
pub mod sqlite;
pub mod storage_trait;
pub mod stored_cell;

pub use cell_status::*;
pub use memory::*;
#[cfg(feature = "storage")]
pub use performance_optimizations::*;
#[cfg(feature = "storage")]
pub use sqlite::*;
pub use storage_trait::*;
pub use stored_cell::*;
