//! Priority task queue shared between the engine and its workers.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use parking_lot::Mutex;
use tokio::sync::Semaphore;

use super::task::Task;

/// A heap entry. Lower priority value means served first; among equal
/// priorities, insertion order (FIFO) is preserved via the sequence
/// number.
struct Entry {
    priority: u8,
    seq: u64,
    task: Task,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse so the smallest
        // (priority, seq) pair surfaces first.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

struct QueueState {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

/// Unbounded priority queue with an async blocking pop.
///
/// The semaphore carries one permit per queued task, so `pop` suspends
/// until work arrives without ever spinning. `push` never blocks.
pub struct TaskQueue {
    state: Mutex<QueueState>,
    ready: Semaphore,
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                heap: BinaryHeap::new(),
                next_seq: 0,
            }),
            ready: Semaphore::new(0),
        }
    }

    /// Enqueue a task at the given priority (lower is served first).
    pub fn push(&self, priority: u8, task: Task) {
        {
            let mut state = self.state.lock();
            let seq = state.next_seq;
            state.next_seq += 1;
            state.heap.push(Entry {
                priority,
                seq,
                task,
            });
        }
        self.ready.add_permits(1);
    }

    /// Take the highest-priority task, waiting until one is available.
    pub async fn pop(&self) -> Task {
        // The semaphore is never closed while the queue is alive.
        let permit = self
            .ready
            .acquire()
            .await
            .expect("task queue semaphore closed");
        permit.forget();

        let mut state = self.state.lock();
        match state.heap.pop() {
            Some(entry) => entry.task,
            // A permit is only ever added together with an entry.
            None => unreachable!("semaphore permit without a queued task"),
        }
    }

    /// Number of tasks currently queued.
    pub fn len(&self) -> usize {
        self.state.lock().heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::super::task::{DownloadTask, PRIORITY_ABORT, PRIORITY_DRAIN, PRIORITY_NORMAL};
    use super::*;
    use crate::subtitle::Subtitle;

    /// A download task tagged through its candidate's provider name, so
    /// pop order is observable.
    fn download_task(tag: &str) -> Task {
        Task::Download(DownloadTask {
            candidates: vec![Subtitle {
                video_path: "/media/movie.mkv".into(),
                provider: tag.to_string(),
                language: "en".parse().unwrap(),
                confidence: 0.5,
                release: None,
                keywords: Default::default(),
                link: None,
                path: None,
            }],
        })
    }

    #[tokio::test]
    async fn test_priority_ordering() {
        let queue = TaskQueue::new();
        queue.push(PRIORITY_DRAIN, Task::Stop);
        queue.push(
            PRIORITY_NORMAL,
            Task::Download(crate::scheduler::task::DownloadTask {
                candidates: Vec::new(),
            }),
        );
        queue.push(PRIORITY_ABORT, Task::Stop);

        assert!(matches!(queue.pop().await, Task::Stop)); // abort first
        assert!(matches!(queue.pop().await, Task::Download(_)));
        assert!(matches!(queue.pop().await, Task::Stop)); // drain last
    }

    #[tokio::test]
    async fn test_fifo_within_priority() {
        let tags = ["first", "second", "third", "fourth", "fifth"];
        let queue = TaskQueue::new();
        for (i, tag) in tags.iter().enumerate() {
            queue.push(PRIORITY_NORMAL, download_task(tag));
            assert_eq!(queue.len(), i + 1);
        }

        for expected in tags {
            match queue.pop().await {
                Task::Download(task) => assert_eq!(task.candidates[0].provider, expected),
                other => panic!("expected a download task, got {other:?}"),
            }
        }
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_pop_waits_for_push() {
        let queue = Arc::new(TaskQueue::new());
        let popper = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.pop().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!popper.is_finished());

        queue.push(PRIORITY_NORMAL, Task::Stop);
        let task = popper.await.unwrap();
        assert!(matches!(task, Task::Stop));
    }

    #[tokio::test]
    async fn test_concurrent_pops_each_get_one_task() {
        let queue = Arc::new(TaskQueue::new());
        let mut poppers = Vec::new();
        for _ in 0..4 {
            let queue = queue.clone();
            poppers.push(tokio::spawn(async move { queue.pop().await }));
        }

        for _ in 0..4 {
            queue.push(PRIORITY_NORMAL, Task::Stop);
        }
        for popper in poppers {
            assert!(matches!(popper.await.unwrap(), Task::Stop));
        }
        assert!(queue.is_empty());
    }
}
