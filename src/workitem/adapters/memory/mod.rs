//! In-memory adapters for work item persistence.

mod work_item;

pub use work_item::InMemoryWorkItemRepository;
