//! Bookshelf application library
//!
//! The catalog modules (authors, books), the generic CRUD controller they
//! share, and the bootstrap that wires settings, database, and HTTP together.
#![recursion_limit = "256"]

pub mod bootstrap;
pub mod crud;
pub mod modules;
pub mod utils;

pub use bootstrap::{build_app, migrate, serve};
