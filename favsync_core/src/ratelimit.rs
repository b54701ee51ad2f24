//! Classification of per-item outcomes into rate-limit signals

/// HTTP status the platform answers with when its anti-automation layer
/// blocks a client outright.
pub const RATE_LIMIT_STATUS: u16 = 412;

/// Default number of consecutive zero-result searches treated as throttling.
pub const DEFAULT_NOT_FOUND_THRESHOLD: u32 = 2;

/// Outcome of processing one track, as seen by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// A candidate was matched and favorited.
    Found,
    /// The search produced no usable candidate.
    NotFound,
    /// A service call failed; carries the HTTP status when one exists,
    /// 0 otherwise.
    TransportError(u16),
}

/// What the orchestrator should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Keep iterating.
    Continue,
    /// Stop, checkpoint, and cool down before resuming.
    RateLimited,
}

/// Decides when a failure pattern means the platform is throttling the
/// client rather than the content being genuinely absent.
///
/// Two back-to-back zero-result searches for what should be mainstream
/// tracks are far more likely a soft block than real absence. A
/// precondition-failed transport error is the platform saying so outright
/// and fires regardless of the counter. The detector only classifies;
/// pausing and resuming is the orchestrator's job.
#[derive(Debug)]
pub struct RateLimitDetector {
    consecutive_not_found: u32,
    threshold: u32,
}

impl RateLimitDetector {
    /// Create a detector firing after `threshold` consecutive `NotFound`
    /// observations. A threshold of 0 is clamped to 1.
    pub fn new(threshold: u32) -> Self {
        Self {
            consecutive_not_found: 0,
            threshold: threshold.max(1),
        }
    }

    /// Feed one outcome and get the classification back.
    pub fn observe(&mut self, observation: Observation) -> Signal {
        match observation {
            Observation::Found => {
                self.consecutive_not_found = 0;
                Signal::Continue
            }
            Observation::NotFound => {
                self.consecutive_not_found += 1;
                if self.consecutive_not_found >= self.threshold {
                    Signal::RateLimited
                } else {
                    Signal::Continue
                }
            }
            // Hard signal, independent of the counter.
            Observation::TransportError(RATE_LIMIT_STATUS) => Signal::RateLimited,
            // Other transport failures say nothing about throttling and
            // leave the counter untouched.
            Observation::TransportError(_) => Signal::Continue,
        }
    }

    /// Zero the counter. Called when a run re-enters its processing loop.
    pub fn reset(&mut self) {
        self.consecutive_not_found = 0;
    }

    /// Current streak of zero-result searches, for logging.
    pub fn consecutive_not_found(&self) -> u32 {
        self.consecutive_not_found
    }
}

impl Default for RateLimitDetector {
    fn default() -> Self {
        Self::new(DEFAULT_NOT_FOUND_THRESHOLD)
    }
}
