//! The subtitle engine: lifecycle, task fan-out, and result collection.
//!
//! [`SubtitleEngine`] owns the task queue, the result channels, and the
//! lifecycle state. Workers only exist while the engine is running;
//! `stop_and_drain` finishes pending work first, `pause_now` abandons it
//! in the queue so a later `start` picks it back up.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use subscout_common::{language, Error, LanguageCode, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::provider::{ProviderConfig, ProviderRegistry};
use crate::ranking::{self, RankCriterion, RankingEngine};
use crate::scanner;
use crate::scheduler::{
    DownloadOutcome, DownloadTask, ListOutcome, ListTask, Task, TaskQueue, WorkerPool,
    PRIORITY_ABORT, PRIORITY_DRAIN, PRIORITY_NORMAL,
};
use crate::subtitle::Subtitle;
use crate::video::Video;

/// Tunables for an engine instance.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Number of workers while running.
    pub workers: usize,
    /// Keep one subtitle per wanted language instead of a single best.
    pub multi: bool,
    /// Search even when subtitles already exist on disk.
    pub force: bool,
    /// Directory scan depth; zero means unlimited.
    pub max_depth: usize,
    /// Ranking criteria, most significant first.
    pub sort_order: Vec<RankCriterion>,
    /// Directory for provider caches.
    pub cache_dir: Option<PathBuf>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            workers: 4,
            multi: false,
            force: false,
            max_depth: 3,
            sort_order: ranking::DEFAULT_SORT_ORDER.to_vec(),
            cache_dir: None,
        }
    }
}

enum EngineState {
    /// No workers; the queue may still hold tasks from a pause.
    Idle,
    /// Workers are draining the queue.
    Running(WorkerPool),
    /// No workers, tasks left in the queue.
    Paused,
}

impl EngineState {
    fn name(&self) -> &'static str {
        match self {
            EngineState::Idle => "idle",
            EngineState::Running(_) => "running",
            EngineState::Paused => "paused",
        }
    }
}

/// Concurrent subtitle search and download engine.
///
/// High level use is two calls: [`list_subtitles`](Self::list_subtitles)
/// to see what is available and [`download_subtitles`](Self::download_subtitles)
/// to fetch the best candidates. Both manage the worker lifecycle
/// themselves. The lower-level `start`/`submit`/`stop_and_drain`/`pause_now`
/// surface is for callers that want to schedule work incrementally.
pub struct SubtitleEngine {
    options: EngineOptions,
    languages: Vec<LanguageCode>,
    providers: Vec<String>,
    registry: Arc<ProviderRegistry>,
    queue: Arc<TaskQueue>,
    list_rx: mpsc::UnboundedReceiver<ListOutcome>,
    download_rx: mpsc::UnboundedReceiver<DownloadOutcome>,
    state: EngineState,
}

impl SubtitleEngine {
    /// Create an idle engine.
    ///
    /// Provider preferences default to the registry's registration
    /// order; language preferences start empty, which means "any
    /// language" until [`set_languages`](Self::set_languages) narrows it.
    pub fn new(registry: Arc<ProviderRegistry>, options: EngineOptions) -> Self {
        // Placeholder closed channels; start() installs live ones.
        let (_, list_rx) = mpsc::unbounded_channel();
        let (_, download_rx) = mpsc::unbounded_channel();
        let providers = registry.names();
        Self {
            options,
            languages: Vec::new(),
            providers,
            registry,
            queue: Arc::new(TaskQueue::new()),
            list_rx,
            download_rx,
            state: EngineState::Idle,
        }
    }

    /// Language preferences, most preferred first.
    pub fn languages(&self) -> &[LanguageCode] {
        &self.languages
    }

    /// Provider preferences, most preferred first.
    pub fn providers(&self) -> &[String] {
        &self.providers
    }

    /// Current lifecycle state as a lowercase name.
    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    /// Number of tasks waiting in the queue.
    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    /// Replace the language preferences.
    ///
    /// Every code is validated before anything is applied; one bad code
    /// leaves the previous preferences untouched. Duplicates collapse to
    /// their first occurrence.
    pub fn set_languages<S: AsRef<str>>(&mut self, codes: &[S]) -> Result<()> {
        let mut parsed = Vec::with_capacity(codes.len());
        for code in codes {
            let lang: LanguageCode = code.as_ref().parse()?;
            if !parsed.contains(&lang) {
                parsed.push(lang);
            }
        }
        self.languages = parsed;
        Ok(())
    }

    /// Replace the provider preferences.
    ///
    /// Every name is checked against the registry before anything is
    /// applied. Duplicates collapse to their first occurrence.
    pub fn set_providers<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        let mut checked = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if !self.registry.contains(name) {
                return Err(Error::unknown_provider(name));
            }
            if !checked.iter().any(|n| n == name) {
                checked.push(name.to_string());
            }
        }
        self.providers = checked;
        Ok(())
    }

    /// Spawn the worker pool.
    ///
    /// Legal from idle and from paused (resuming whatever the pause left
    /// queued); starting a running engine is an error.
    pub fn start(&mut self) -> Result<()> {
        if let EngineState::Running(_) = self.state {
            return Err(Error::invalid_state("idle or paused", "running"));
        }
        // Fresh channels per run: outcomes a previous run never collected
        // must not be read as this run's results. The workers hold the
        // only senders, so once they exit the receivers drain to `None`.
        let (list_tx, list_rx) = mpsc::unbounded_channel();
        let (download_tx, download_rx) = mpsc::unbounded_channel();
        self.list_rx = list_rx;
        self.download_rx = download_rx;
        let pool = WorkerPool::spawn(
            self.options.workers,
            self.queue.clone(),
            self.registry.clone(),
            list_tx,
            download_tx,
        );
        info!(workers = pool.size(), "engine started");
        self.state = EngineState::Running(pool);
        Ok(())
    }

    /// Finish all pending work, then shut the workers down.
    ///
    /// One stop task per worker is queued at the lowest priority so they
    /// sort after everything already waiting; returns once every worker
    /// has terminated.
    pub async fn stop_and_drain(&mut self) -> Result<()> {
        let pool = self.take_pool("stop")?;
        for _ in 0..pool.size() {
            self.queue.push(PRIORITY_DRAIN, Task::Stop);
        }
        pool.join().await;
        info!("engine stopped");
        self.state = EngineState::Idle;
        Ok(())
    }

    /// Shut the workers down as soon as their current task ends.
    ///
    /// Stop tasks jump the queue; pending work stays queued and resumes
    /// on the next `start`. Ends idle when the pause happened to leave
    /// the queue empty, paused otherwise.
    pub async fn pause_now(&mut self) -> Result<()> {
        let pool = self.take_pool("pause")?;
        for _ in 0..pool.size() {
            self.queue.push(PRIORITY_ABORT, Task::Stop);
        }
        pool.join().await;
        self.state = if self.queue.is_empty() {
            info!("engine paused with an empty queue, now idle");
            EngineState::Idle
        } else {
            info!(pending = self.queue.len(), "engine paused");
            EngineState::Paused
        };
        Ok(())
    }

    fn take_pool(&mut self, verb: &str) -> Result<WorkerPool> {
        match std::mem::replace(&mut self.state, EngineState::Idle) {
            EngineState::Running(pool) => Ok(pool),
            other => {
                let actual = other.name();
                self.state = other;
                debug!(actual, "cannot {verb} a non-running engine");
                Err(Error::invalid_state("running", actual))
            }
        }
    }

    /// Queue a list or download task at normal priority.
    ///
    /// Stop tasks are rejected; their meaning depends on a priority the
    /// caller cannot choose here, so they are only ever queued by the
    /// lifecycle methods.
    pub fn submit(&self, task: Task) -> Result<()> {
        if matches!(task, Task::Stop) {
            return Err(Error::WrongTask);
        }
        self.queue.push(PRIORITY_NORMAL, task);
        Ok(())
    }

    /// Receive the next listing outcome.
    ///
    /// One outcome arrives per completed list task; this is how callers
    /// driving the lifecycle manually via [`submit`](Self::submit)
    /// collect results. Returns `None` once the workers have shut down
    /// and every outcome of the current run has been read. Outcomes not
    /// collected before the next `start` are discarded.
    pub async fn next_list_outcome(&mut self) -> Option<ListOutcome> {
        self.list_rx.recv().await
    }

    /// Receive the next download outcome.
    ///
    /// Same contract as [`next_list_outcome`](Self::next_list_outcome),
    /// for download tasks.
    pub async fn next_download_outcome(&mut self) -> Option<DownloadOutcome> {
        self.download_rx.recv().await
    }

    /// Search for subtitles for every video under the given paths.
    ///
    /// Runs a complete lifecycle: start workers, fan out one list task
    /// per (video, provider) pair, collect exactly one outcome per task,
    /// drain and stop. Results group all providers' findings per video,
    /// in first-seen order. Requires an idle engine.
    pub async fn list_subtitles(&mut self, entries: &[PathBuf]) -> Result<Vec<(Video, Vec<Subtitle>)>> {
        self.ensure_idle()?;
        self.start()?;
        let listed = self.run_listing(entries).await;
        self.stop_and_drain().await?;
        Ok(group_by_video(listed))
    }

    /// Download the best-ranked subtitles for every video under the
    /// given paths.
    ///
    /// Lists first, ranks each video's candidates, queues one download
    /// task per video (per language in multi mode) with the full ranked
    /// fallback chain, and returns everything that was written to disk.
    /// Requires an idle engine.
    pub async fn download_subtitles(&mut self, entries: &[PathBuf]) -> Result<Vec<Subtitle>> {
        self.ensure_idle()?;
        self.start()?;
        let listed = self.run_listing(entries).await;
        let grouped = group_by_video(listed);

        let order = ranking::effective_order(&self.options.sort_order, self.options.multi);
        let engine = RankingEngine::new(&self.languages, &self.providers);

        let mut task_count = 0usize;
        for (video, subtitles) in grouped {
            let ranked = engine.rank(subtitles, &video, &order);
            if ranked.is_empty() {
                continue;
            }
            if self.options.multi {
                for chain in split_language_runs(ranked) {
                    self.queue
                        .push(PRIORITY_NORMAL, Task::Download(DownloadTask { candidates: chain }));
                    task_count += 1;
                }
            } else {
                self.queue
                    .push(PRIORITY_NORMAL, Task::Download(DownloadTask { candidates: ranked }));
                task_count += 1;
            }
        }
        debug!(tasks = task_count, "download tasks queued");

        let mut downloaded = Vec::new();
        for _ in 0..task_count {
            match self.download_rx.recv().await {
                Some(Some(subtitle)) => downloaded.push(subtitle),
                Some(None) => {}
                None => break,
            }
        }

        self.stop_and_drain().await?;
        Ok(downloaded)
    }

    fn ensure_idle(&self) -> Result<()> {
        match self.state {
            EngineState::Idle => Ok(()),
            ref other => Err(Error::invalid_state("idle", other.name())),
        }
    }

    /// Fan out list tasks for every scanned video and collect one
    /// outcome per task. Failed tasks are logged by the workers and
    /// simply contribute nothing here.
    async fn run_listing(&mut self, entries: &[PathBuf]) -> Vec<(Video, Vec<Subtitle>)> {
        let config = ProviderConfig {
            multi: self.options.multi,
            cache_dir: self.options.cache_dir.clone(),
        };
        let wanted_base: Vec<LanguageCode> = if self.languages.is_empty() {
            language::all_codes()
        } else {
            self.languages.clone()
        };

        let mut task_count = 0usize;
        for entry in entries {
            for scan_entry in scanner::scan(entry, self.options.max_depth) {
                let wanted = scanner::needs_search(
                    &scan_entry.existing_languages,
                    scan_entry.has_unlabeled,
                    &wanted_base,
                    self.options.multi,
                    self.options.force,
                );
                if wanted.is_empty() {
                    debug!(
                        video = %scan_entry.video.path().display(),
                        "existing subtitles satisfy the request"
                    );
                    continue;
                }
                task_count += self.queue_list_tasks(&scan_entry.video, &wanted, &config);
            }
        }
        debug!(tasks = task_count, "list tasks queued");

        let mut listed = Vec::new();
        for _ in 0..task_count {
            match self.list_rx.recv().await {
                Some(Some(result)) => listed.push(result),
                Some(None) => {}
                None => break,
            }
        }
        listed
    }

    /// Queue one list task per preferred provider that serves any of the
    /// wanted languages and accepts the video. Returns how many were
    /// queued.
    fn queue_list_tasks(
        &self,
        video: &Video,
        wanted: &[LanguageCode],
        config: &ProviderConfig,
    ) -> usize {
        let mut queued = 0;
        for name in &self.providers {
            let Some(provider) = self.registry.get(name) else {
                continue;
            };
            let served = provider.available_languages();
            let languages: Vec<LanguageCode> = wanted
                .iter()
                .filter(|lang| served.contains(lang))
                .cloned()
                .collect();
            if languages.is_empty() {
                debug!(provider = %name, "provider serves none of the wanted languages");
                continue;
            }
            if !provider.is_valid_video(video) {
                debug!(
                    provider = %name,
                    video = %video.path().display(),
                    "provider declined the video"
                );
                continue;
            }
            self.queue.push(
                PRIORITY_NORMAL,
                Task::List(ListTask {
                    video: video.clone(),
                    languages,
                    provider: name.clone(),
                    config: config.clone(),
                }),
            );
            queued += 1;
        }
        queued
    }
}

/// Merge per-provider listings into one candidate list per video,
/// keeping first-seen video order and provider arrival order within it.
fn group_by_video(listed: Vec<(Video, Vec<Subtitle>)>) -> Vec<(Video, Vec<Subtitle>)> {
    let mut index: HashMap<PathBuf, usize> = HashMap::new();
    let mut grouped: Vec<(Video, Vec<Subtitle>)> = Vec::new();
    for (video, subtitles) in listed {
        match index.get(video.path()) {
            Some(&i) => grouped[i].1.extend(subtitles),
            None => {
                index.insert(video.path().to_path_buf(), grouped.len());
                grouped.push((video, subtitles));
            }
        }
    }
    grouped
}

/// Split a ranked candidate list into consecutive same-language runs,
/// each a self-contained fallback chain for one language.
fn split_language_runs(ranked: Vec<Subtitle>) -> Vec<Vec<Subtitle>> {
    let mut runs: Vec<Vec<Subtitle>> = Vec::new();
    for subtitle in ranked {
        match runs.last_mut() {
            Some(run) if run[0].language == subtitle.language => run.push(subtitle),
            _ => runs.push(vec![subtitle]),
        }
    }
    runs
}
