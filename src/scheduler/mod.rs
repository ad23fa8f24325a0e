//! Task scheduling: the priority queue and the worker pool that drains it.

pub mod pool;
pub mod queue;
pub mod task;

pub use pool::{DownloadOutcome, ListOutcome, WorkerPool};
pub use queue::TaskQueue;
pub use task::{DownloadTask, ListTask, Task, PRIORITY_ABORT, PRIORITY_DRAIN, PRIORITY_NORMAL};
