//! Core storage traits and abstractions.
//!
//! [`ResourceStorage`] is the only seam between the engine and a database
//! driver. The engine in [`crate::engine`] is generic over it, so the same
//! LDP semantics run on every backend in [`crate::backends`].

mod storage;

pub use storage::ResourceStorage;
