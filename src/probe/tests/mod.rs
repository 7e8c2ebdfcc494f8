//! Unit tests for the probe module.
