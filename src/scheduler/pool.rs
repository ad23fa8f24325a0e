//! Fixed pool of workers draining the task queue.
//!
//! Each worker is a spawned tokio task that loops on [`TaskQueue::pop`]
//! and publishes exactly one outcome per list/download task, success or
//! not, so the engine can collect results by counting. Workers terminate
//! when they pop a [`Task::Stop`]; the priority it was queued with
//! decides whether that happens before or after pending work.

use std::sync::Arc;

use subscout_common::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::queue::TaskQueue;
use super::task::{DownloadTask, ListTask, Task};
use crate::provider::{ProviderRegistry, ProviderScratch};
use crate::subtitle::Subtitle;
use crate::video::Video;

/// Outcome of a list task: the video and everything found for it, or
/// `None` when the provider faulted.
pub type ListOutcome = Option<(Video, Vec<Subtitle>)>;

/// Outcome of a download task: the downloaded subtitle, or `None` when
/// every candidate failed.
pub type DownloadOutcome = Option<Subtitle>;

/// Handle to a running set of workers.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `workers` workers draining `queue`.
    pub fn spawn(
        workers: usize,
        queue: Arc<TaskQueue>,
        registry: Arc<ProviderRegistry>,
        list_tx: mpsc::UnboundedSender<ListOutcome>,
        download_tx: mpsc::UnboundedSender<DownloadOutcome>,
    ) -> Self {
        let handles = (0..workers)
            .map(|id| {
                tokio::spawn(worker_loop(
                    id,
                    queue.clone(),
                    registry.clone(),
                    list_tx.clone(),
                    download_tx.clone(),
                ))
            })
            .collect();
        info!(workers, "worker pool started");
        Self { handles }
    }

    /// Number of workers in the pool.
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Wait until every worker has terminated.
    ///
    /// Callers must first queue one stop task per worker, or this waits
    /// forever.
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "worker terminated abnormally");
            }
        }
        debug!("worker pool joined");
    }
}

async fn worker_loop(
    id: usize,
    queue: Arc<TaskQueue>,
    registry: Arc<ProviderRegistry>,
    list_tx: mpsc::UnboundedSender<ListOutcome>,
    download_tx: mpsc::UnboundedSender<DownloadOutcome>,
) {
    debug!(worker = id, "worker started");
    let mut scratch = ProviderScratch::new();

    loop {
        match queue.pop().await {
            Task::Stop => {
                debug!(worker = id, "worker stopping");
                break;
            }
            Task::List(task) => {
                let outcome = run_list(&registry, task, &mut scratch).await;
                // Receiver gone means the engine is shutting down hard;
                // nothing useful to do with the result.
                let _ = list_tx.send(outcome);
            }
            Task::Download(task) => {
                let outcome = run_download(&registry, task).await;
                let _ = download_tx.send(outcome);
            }
        }
    }
}

async fn run_list(
    registry: &ProviderRegistry,
    task: ListTask,
    scratch: &mut ProviderScratch,
) -> ListOutcome {
    let Some(provider) = registry.get(&task.provider) else {
        error!(provider = %task.provider, "list task names an unregistered provider");
        return None;
    };

    match provider
        .list(&task.video, &task.languages, &task.config, scratch)
        .await
    {
        Ok(subtitles) => {
            debug!(
                provider = %task.provider,
                video = %task.video.path().display(),
                found = subtitles.len(),
                "listing finished"
            );
            Some((task.video, subtitles))
        }
        Err(e) => {
            error!(
                provider = %task.provider,
                video = %task.video.path().display(),
                error = %e,
                "listing failed"
            );
            None
        }
    }
}

async fn run_download(registry: &ProviderRegistry, task: DownloadTask) -> DownloadOutcome {
    for candidate in &task.candidates {
        let Some(provider) = registry.get(&candidate.provider) else {
            error!(
                provider = %candidate.provider,
                "download candidate names an unregistered provider"
            );
            return None;
        };

        match provider.download(candidate).await {
            Ok(downloaded) => return Some(downloaded),
            Err(Error::DownloadFailed(reason)) => {
                warn!(
                    provider = %candidate.provider,
                    language = %candidate.language,
                    reason,
                    "candidate download failed, trying next"
                );
            }
            Err(e) => {
                error!(
                    video = %candidate.video_path.display(),
                    error = %e,
                    "download aborted"
                );
                return None;
            }
        }
    }

    if let Some(candidate) = task.candidates.last() {
        error!(
            video = %candidate.video_path.display(),
            candidates = task.candidates.len(),
            "no candidate could be downloaded"
        );
    }
    None
}
