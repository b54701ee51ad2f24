//! Sync run orchestration
//!
//! Drives a whole migration run: searching each track, filtering candidates
//! by duration, favoriting the first acceptable hit, and checkpointing
//! whatever is still owed whenever the platform throttles us. A run survives
//! rate limiting by cooling down and resuming from its own checkpoint, so
//! interrupting the process loses at most the track in flight.

use std::mem;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Local;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::checkpoint::CheckpointStore;
use crate::error::Result;
use crate::matcher::DurationMatcher;
use crate::ratelimit::{
    DEFAULT_NOT_FOUND_THRESHOLD, Observation, RateLimitDetector, Signal,
};
use crate::service::{CollectionId, VideoService};
use crate::track::{TrackReference, VideoId};

/// Default pause between consecutive track searches.
pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_secs(3);

/// Default pause taken after the platform rate-limits us.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(300);

/// Settings controlling a sync run
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Name for the created collection. Generated from the current time
    /// when unset, so repeated runs do not collide.
    pub collection_name: Option<String>,
    /// Visibility of the created collection.
    pub visibility: crate::service::Visibility,
    /// Pause between consecutive track searches.
    pub search_delay: Duration,
    /// Pause after the platform rate-limits us, before resuming from the
    /// checkpoint.
    pub cooldown: Duration,
    /// Consecutive search misses treated as disguised rate limiting.
    pub not_found_threshold: u32,
    /// What to do with tracks that fail with a transport error.
    pub transport_error_policy: TransportErrorPolicy,
    /// Duration window separating full songs from clips and compilations.
    pub matcher: DurationMatcher,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            collection_name: None,
            visibility: crate::service::Visibility::default(),
            search_delay: DEFAULT_SEARCH_DELAY,
            cooldown: DEFAULT_COOLDOWN,
            not_found_threshold: DEFAULT_NOT_FOUND_THRESHOLD,
            transport_error_policy: TransportErrorPolicy::default(),
            matcher: DurationMatcher::default(),
        }
    }
}

/// How a run treats tracks that fail with a transport error other than
/// rate limiting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorPolicy {
    /// Keep the track for a later retry and move on to the next one.
    #[default]
    RecordAndContinue,
    /// Checkpoint everything still owed and abort the run with the error.
    FailRun,
}

/// Where a run takes its track list from.
#[derive(Debug, Clone)]
pub enum SyncSource {
    /// Start from a caller-supplied track list.
    Fresh(Vec<TrackReference>),
    /// Resume the track list a previous run left checkpointed.
    Checkpoint,
}

/// Final disposition of a run that ran to the end of its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every track was matched and added to the collection.
    Complete,
    /// Some tracks remain checkpointed for a later retry.
    PartialFailure,
}

/// Summary of a finished run
#[derive(Debug)]
pub struct RunReport {
    /// Final disposition of the run.
    pub outcome: RunOutcome,
    /// Tracks matched and added to the collection.
    pub matched: usize,
    /// Tracks still owed whose last search found no acceptable candidate.
    pub unmatched: usize,
    /// Tracks still owed whose last attempt failed with a transport error.
    pub errored: usize,
    /// Cooldown pauses taken while the platform throttled us.
    pub cooldowns: u32,
    /// Collection that received the matches, when one was created.
    pub collection: Option<CollectionId>,
    /// Checkpoint file holding the unfinished tracks, when any remain.
    pub checkpoint: Option<PathBuf>,
    /// Wall-clock duration of the run, cooldowns included.
    pub total_time: Duration,
}

/// Drives track lists through search, matching, and favoriting.
pub struct SyncOrchestrator<S> {
    service: S,
    checkpoint: CheckpointStore,
    config: SyncConfig,
}

/// How a buffered track's last attempt failed.
#[derive(Clone, Copy, PartialEq, Eq)]
enum FailureKind {
    NoMatch,
    Transport,
}

/// Counters and carry-over state for one run.
struct RunState {
    /// Tracks that failed so far, tagged with how the last attempt failed,
    /// owed a retry in a later run.
    buffer: Vec<(TrackReference, FailureKind)>,
    detector: RateLimitDetector,
    matched: usize,
    cooldowns: u32,
    started: Instant,
}

impl RunState {
    fn new(threshold: u32) -> Self {
        Self {
            buffer: Vec::new(),
            detector: RateLimitDetector::new(threshold),
            matched: 0,
            cooldowns: 0,
            started: Instant::now(),
        }
    }

    /// Tracks still owed, in buffered order.
    fn owed(&self) -> Vec<TrackReference> {
        self.buffer.iter().map(|(track, _)| track.clone()).collect()
    }

    /// Empty the buffer, keeping only the tracks.
    fn drain_owed(&mut self) -> Vec<TrackReference> {
        mem::take(&mut self.buffer)
            .into_iter()
            .map(|(track, _)| track)
            .collect()
    }

    fn count(&self, kind: FailureKind) -> usize {
        self.buffer.iter().filter(|(_, k)| *k == kind).count()
    }

    /// Summarize the run. The unmatched and errored counts come from the
    /// final buffer, so a track retried into a match along the way does
    /// not show up as a failure.
    fn report(
        self,
        outcome: RunOutcome,
        collection: Option<CollectionId>,
        checkpoint: Option<PathBuf>,
    ) -> RunReport {
        RunReport {
            outcome,
            matched: self.matched,
            unmatched: self.count(FailureKind::NoMatch),
            errored: self.count(FailureKind::Transport),
            cooldowns: self.cooldowns,
            collection,
            checkpoint,
            total_time: self.started.elapsed(),
        }
    }
}

/// How one pass over the working list ended.
enum PassOutcome {
    /// Reached the end of the working list.
    Finished,
    /// The rate limiter fired; a checkpoint covering everything still owed
    /// was written before returning.
    RateLimited,
}

/// What processing a single track produced.
enum TrackOutcome {
    Matched(VideoId),
    NoMatch,
}

impl<S: VideoService> SyncOrchestrator<S> {
    /// Create an orchestrator over a service client and a checkpoint store.
    pub fn new(service: S, checkpoint: CheckpointStore, config: SyncConfig) -> Self {
        Self {
            service,
            checkpoint,
            config,
        }
    }

    /// The checkpoint store this orchestrator persists through.
    pub fn checkpoint(&self) -> &CheckpointStore {
        &self.checkpoint
    }

    /// Run a full sync from the given source.
    ///
    /// Returns a report once the working list has been driven to the end,
    /// however many cooldown cycles that takes. Only errors with no retry
    /// story abort the run: a rejected credential, a failed checkpoint
    /// write, or a transport error under [`TransportErrorPolicy::FailRun`].
    pub async fn run(&self, source: SyncSource) -> Result<RunReport> {
        let mut working = match source {
            SyncSource::Fresh(tracks) => tracks,
            SyncSource::Checkpoint => self.checkpoint.load().await?,
        };

        let mut state = RunState::new(self.config.not_found_threshold);

        if working.is_empty() {
            info!("Nothing to sync, the track list is empty");
            return Ok(state.report(RunOutcome::Complete, None, None));
        }
        info!("Starting sync of {} track(s)", working.len());

        let collection = loop {
            let name = self.collection_name();
            match self
                .service
                .create_collection(&name, self.config.visibility)
                .await
            {
                Ok(id) => {
                    info!("Created favorites collection \"{name}\"");
                    break id;
                }
                Err(error) if error.is_rate_limit() => {
                    warn!(
                        "Rate limited while creating collection \"{name}\", cooling down for {}s",
                        self.config.cooldown.as_secs()
                    );
                    self.checkpoint.save(&working).await?;
                    state.cooldowns += 1;
                    sleep(self.config.cooldown).await;
                    working = self.checkpoint.load().await?;
                }
                Err(error) => return Err(error.into()),
            }
        };

        loop {
            match self.run_pass(collection, &working, &mut state).await? {
                PassOutcome::RateLimited => {
                    state.cooldowns += 1;
                    info!(
                        "Cooling down for {}s before resuming from the checkpoint",
                        self.config.cooldown.as_secs()
                    );
                    sleep(self.config.cooldown).await;
                    working = self.checkpoint.load().await?;
                }
                PassOutcome::Finished => {
                    return if state.buffer.is_empty() {
                        self.checkpoint.clear().await?;
                        info!("Sync complete, {} track(s) added", state.matched);
                        Ok(state.report(RunOutcome::Complete, Some(collection), None))
                    } else {
                        let owed = state.owed();
                        self.checkpoint.save(&owed).await?;
                        let path = self.checkpoint.path().to_path_buf();
                        info!(
                            "Sync finished with {} unresolved track(s) checkpointed to {}",
                            owed.len(),
                            path.display()
                        );
                        Ok(state.report(
                            RunOutcome::PartialFailure,
                            Some(collection),
                            Some(path),
                        ))
                    };
                }
            }
        }
    }

    /// Walk the working list once, from the front.
    ///
    /// When the rate limiter fires, the checkpoint saved before returning
    /// depends on what tripped it. A run of consecutive misses points at
    /// throttled search results: only the triggering track and the untouched
    /// tail go to disk, while earlier buffered failures stay in memory. An
    /// outright blocked response means nothing since the last checkpoint can
    /// be trusted: the buffer is drained into the checkpoint along with the
    /// tail so every owed track gets retried. A rejected credential drains
    /// the same full set to disk before the error aborts the run.
    async fn run_pass(
        &self,
        collection: CollectionId,
        working: &[TrackReference],
        state: &mut RunState,
    ) -> Result<PassOutcome> {
        state.detector.reset();
        let total = working.len();

        for (index, track) in working.iter().enumerate() {
            match self.process_track(collection, track).await {
                Ok(TrackOutcome::Matched(video)) => {
                    debug!("Matched \"{track}\" to video {video}");
                    state.matched += 1;
                    state.detector.observe(Observation::Found);
                }
                Ok(TrackOutcome::NoMatch) => {
                    match state.detector.observe(Observation::NotFound) {
                        Signal::Continue => {
                            debug!("No acceptable candidate for \"{track}\"");
                            state.buffer.push((track.clone(), FailureKind::NoMatch));
                        }
                        Signal::RateLimited => {
                            warn!(
                                "{} consecutive misses ending at \"{track}\", treating as rate limiting",
                                state.detector.consecutive_not_found()
                            );
                            self.checkpoint.save(&working[index..]).await?;
                            return Ok(PassOutcome::RateLimited);
                        }
                    }
                }
                Err(error) if error.is_credential_rejection() => {
                    warn!("Credentials rejected at \"{track}\": {error}");
                    let mut pending = state.drain_owed();
                    pending.extend_from_slice(&working[index..]);
                    self.checkpoint.save(&pending).await?;
                    return Err(error.into());
                }
                Err(error) => {
                    let status = error.status().unwrap_or(0);
                    match state.detector.observe(Observation::TransportError(status)) {
                        Signal::RateLimited => {
                            warn!("Blocked by the platform at \"{track}\": {error}");
                            let mut pending = state.drain_owed();
                            pending.extend_from_slice(&working[index..]);
                            self.checkpoint.save(&pending).await?;
                            return Ok(PassOutcome::RateLimited);
                        }
                        Signal::Continue => match self.config.transport_error_policy {
                            TransportErrorPolicy::RecordAndContinue => {
                                warn!("Failed to process \"{track}\": {error}");
                                state.buffer.push((track.clone(), FailureKind::Transport));
                            }
                            TransportErrorPolicy::FailRun => {
                                let mut pending = state.drain_owed();
                                pending.extend_from_slice(&working[index..]);
                                self.checkpoint.save(&pending).await?;
                                return Err(error.into());
                            }
                        },
                    }
                }
            }

            if index + 1 < total {
                sleep(self.config.search_delay).await;
            }
        }

        Ok(PassOutcome::Finished)
    }

    /// Search one track and favorite the first candidate inside the
    /// duration window.
    async fn process_track(
        &self,
        collection: CollectionId,
        track: &TrackReference,
    ) -> std::result::Result<TrackOutcome, crate::service::ServiceError> {
        let candidates = self.service.search(&track.query()).await?;

        match self.config.matcher.select(&candidates) {
            Some(candidate) => {
                self.service.add_to_collection(collection, candidate.id).await?;
                Ok(TrackOutcome::Matched(candidate.id))
            }
            None => Ok(TrackOutcome::NoMatch),
        }
    }

    fn collection_name(&self) -> String {
        match &self.config.collection_name {
            Some(name) => name.clone(),
            None => Local::now().format("%m%d%H%M").to_string(),
        }
    }
}
