//! Route configuration for the LDP HTTP API.
//!
//! This module contains the routing configuration that maps HTTP paths
//! to handlers.

pub mod ldp_routes;

pub use ldp_routes::create_routes;
