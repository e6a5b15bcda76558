//! Unit tests for the memory primitives.
