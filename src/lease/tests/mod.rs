//! Unit tests for the lease context.
