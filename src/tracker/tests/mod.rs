//! Unit tests for the tracker module.

mod support;
mod sweep_tests;
