/// Background jobs
pub mod release_scheduler;

pub use release_scheduler::{ReleaseScheduler, ReleaseSchedulerHandle};
