//! Core data types shared by storage backends and the cell services

pub mod capacity;
pub mod cell;
pub mod script;

pub use capacity::Capacity;
pub use cell::{Cell, Input, OutPoint, DEFAULT_SINCE};
pub use script::{Script, ScriptHashType};
