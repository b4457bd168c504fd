//! Per-call session state shared by the two relays.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwapOption;

/// State of one telephony call.
///
/// Only the client relay writes; the service relay reads `stream_id` to
/// address outgoing audio. Reads may observe a slightly stale value, which is
/// harmless because a stream id only changes on a new `start` event.
#[derive(Debug)]
pub struct CallSession {
    id: String,
    stream_id: ArcSwapOption<String>,
    latest_media_timestamp: AtomicU64,
}

impl CallSession {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            stream_id: ArcSwapOption::empty(),
            latest_media_timestamp: AtomicU64::new(0),
        }
    }

    /// Locally generated id used for log correlation.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn stream_id(&self) -> Option<Arc<String>> {
        self.stream_id.load_full()
    }

    pub fn latest_media_timestamp(&self) -> u64 {
        self.latest_media_timestamp.load(Ordering::Acquire)
    }

    /// Record a new stream. A later `start` overwrites the previous one.
    pub fn start_stream(&self, stream_sid: String) {
        self.stream_id.store(Some(Arc::new(stream_sid)));
        self.latest_media_timestamp.store(0, Ordering::Release);
    }

    /// Advisory only; ordering is not checked.
    pub fn record_media_timestamp(&self, timestamp: u64) {
        self.latest_media_timestamp.store(timestamp, Ordering::Release);
    }
}

impl Default for CallSession {
    fn default() -> Self {
        Self::new()
    }
}
