//! Application services for lease orchestration.

mod manager;
mod reaper;

pub use manager::{HandoffRequest, LeaseManager, LeaseManagerError, LeaseManagerResult};
pub use reaper::{Reaper, ReaperError, ReaperResult};
