//! Mock collaborators for fast-path tests.

pub mod backend;

pub use backend::MockBackend;
