//! Work items processed by the worker pool.

use subscout_common::LanguageCode;

use crate::provider::ProviderConfig;
use crate::subtitle::Subtitle;
use crate::video::Video;

/// Priority used by `pause_now`: jumps ahead of all pending work.
pub const PRIORITY_ABORT: u8 = 0;
/// Priority for normal list/download tasks.
pub const PRIORITY_NORMAL: u8 = 5;
/// Priority used by `stop_and_drain`: sorts after all pending work.
pub const PRIORITY_DRAIN: u8 = 10;

/// Search one provider for subtitles for one video.
#[derive(Debug, Clone)]
pub struct ListTask {
    pub video: Video,
    pub languages: Vec<LanguageCode>,
    pub provider: String,
    pub config: ProviderConfig,
}

/// Download the best available candidate, falling back down the list.
#[derive(Debug, Clone)]
pub struct DownloadTask {
    /// Candidates in rank order, best first.
    pub candidates: Vec<Subtitle>,
}

/// A unit of work for a worker.
///
/// `Stop` terminates exactly one worker; its effect depends entirely on
/// the priority it is queued with (drain after pending work, abort
/// before it).
#[derive(Debug, Clone)]
pub enum Task {
    List(ListTask),
    Download(DownloadTask),
    Stop,
}

impl Task {
    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Task::List(_) => "list",
            Task::Download(_) => "download",
            Task::Stop => "stop",
        }
    }
}
