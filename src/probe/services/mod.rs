//! Application services for probing.

mod retry;

pub use retry::{RetryError, RetryPolicy, RetryPolicyError, RetryReport};
