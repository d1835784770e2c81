// src/store/mod.rs

//! Table ownership and persistence.

pub mod lookup;
pub mod persist;
pub mod tables;

pub use lookup::{LookupEntry, LookupKind, LookupTable};
pub use persist::CheckpointManager;
pub use tables::{NewItem, NewJunction, TableStore};
