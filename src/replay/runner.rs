//! Trace replay runner
//!
//! The session is armed at the first sample's timestamp and that sample is
//! delivered immediately, so it becomes the triangle's apex. Later samples
//! are delivered after advancing the virtual clock to their timestamps,
//! which lets the timeout fire between samples exactly as it would live.

use super::types::PointerSample;
use crate::error::{IntentError, IntentResult};
use crate::geometry::{Bounds, Triangle};
use crate::host::ManualHost;
use crate::tracker::{CancelReason, IntentConfig, IntentOptions, IntentTracker, TrackerPhase};
use parking_lot::Mutex as ParkingMutex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of replaying one trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    /// Milliseconds after the first sample at which the session resolved
    pub resolved_at_ms: Option<f64>,
    pub reason: Option<CancelReason>,
    /// Samples delivered before the session resolved
    pub samples_consumed: usize,
    pub triangle: Option<Triangle>,
    pub config: IntentConfig,
}

impl ReplayReport {
    /// True when the cursor stayed on course until the timeout
    pub fn held_intent(&self) -> bool {
        self.reason == Some(CancelReason::Timeout)
    }

    pub fn write_json(&self, path: &Path) -> IntentResult<()> {
        let data = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }
}

/// Load a trace written as a JSON array of samples
pub fn load_trace(path: &Path) -> IntentResult<Vec<PointerSample>> {
    let content = std::fs::read_to_string(path)?;
    let samples: Vec<PointerSample> = serde_json::from_str(&content)?;
    tracing::debug!("Loaded {} pointer samples from {:?}", samples.len(), path);
    Ok(samples)
}

fn validate(samples: &[PointerSample]) -> IntentResult<()> {
    let mut last = f64::NEG_INFINITY;
    for (index, sample) in samples.iter().enumerate() {
        if !sample.process_time_ms.is_finite() {
            return Err(IntentError::InvalidTrace(format!(
                "sample {} has non-finite timestamp",
                index
            )));
        }
        if sample.process_time_ms < last {
            return Err(IntentError::InvalidTrace(format!(
                "sample {} at {}ms precedes previous sample at {}ms",
                index, sample.process_time_ms, last
            )));
        }
        last = sample.process_time_ms;
    }
    Ok(())
}

/// Replay `samples` against a tracking element with the given bounds
pub fn replay_trace(
    samples: &[PointerSample],
    tracking: Bounds,
    options: IntentOptions,
) -> IntentResult<ReplayReport> {
    validate(samples)?;

    let host = ManualHost::new();
    let active_el = host.add_element(Bounds::default());
    let tracking_el = host.add_element(tracking);
    let tracker = IntentTracker::new(host.environment(), active_el, tracking_el, options);
    let config = tracker.config();

    let resolved_at: Arc<ParkingMutex<Option<Duration>>> = Arc::new(ParkingMutex::new(None));
    let clock = Arc::downgrade(&host);
    let slot = resolved_at.clone();
    tracker.watch().then(move || {
        if let Some(host) = clock.upgrade() {
            *slot.lock() = Some(host.now());
        }
    });

    let origin = samples.first().map(|s| s.process_time_ms).unwrap_or(0.0);
    let mut consumed = 0;

    for sample in samples {
        let at = Duration::try_from_secs_f64((sample.process_time_ms - origin) / 1000.0)
            .map_err(|e| IntentError::InvalidTrace(e.to_string()))?;
        host.advance_to(at);
        if tracker.phase() == TrackerPhase::Resolved {
            break;
        }
        host.move_pointer(sample.point());
        consumed += 1;
        if tracker.phase() == TrackerPhase::Resolved {
            break;
        }
    }

    if tracker.phase().is_live() {
        host.advance(config.timeout());
    }

    let resolved_at_ms = resolved_at.lock().map(|d| d.as_secs_f64() * 1000.0);
    let report = ReplayReport {
        resolved_at_ms,
        reason: tracker.last_cancel_reason(),
        samples_consumed: consumed,
        triangle: tracker.triangle(),
        config,
    };

    tracing::info!(
        "Replayed {} of {} samples: resolved at {:?}ms ({:?})",
        report.samples_consumed,
        samples.len(),
        report.resolved_at_ms,
        report.reason
    );

    Ok(report)
}
