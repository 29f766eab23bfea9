//! In-memory adapters for lease persistence.

mod lease;
mod round_robin;

pub use lease::InMemoryLeaseRepository;
pub use round_robin::RoundRobinReassignment;
