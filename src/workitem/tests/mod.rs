//! Unit tests for the work item context.

mod queue_service_tests;
mod sla_tests;
mod stage_transition_tests;
mod transition_service_tests;
