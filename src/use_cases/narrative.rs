// Flavor-text dispatch with local fallbacks and the bounded display log.

use crate::domain::ports::{
    Clock, NarrativeError, NarrativeEvent, NarrativeMessage, NarrativeRequest, NarrativeService,
};
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

pub const FALLBACK_SENDER: &str = "Mission Control";

pub fn fallback_text(event: NarrativeEvent) -> &'static str {
    match event {
        NarrativeEvent::Start => {
            "Systems online. The singularity drive is primed. Feed the hole, harvest the matter."
        }
        NarrativeEvent::Success => {
            "Sector clear. Exotic matter readings are off the charts. Good hunting, pilot."
        }
        NarrativeEvent::Fail => "Signal lost. The hull could not hold. We will find another pilot.",
    }
}

/// Asks the service for a line and falls back to a fixed message on any failure.
pub async fn narrate(
    service: &dyn NarrativeService,
    request: NarrativeRequest,
    clock: &dyn Clock,
) -> NarrativeMessage {
    match service.generate(request).await {
        Ok(message) => message,
        Err(err) => {
            match err {
                NarrativeError::NotConfigured => {
                    debug!(event = request.event.as_str(), "narrative service not configured")
                }
                other => warn!(
                    event = request.event.as_str(),
                    error = ?other,
                    "narrative generation failed; using fallback"
                ),
            }
            NarrativeMessage {
                text: fallback_text(request.event).to_string(),
                sender: FALLBACK_SENDER.to_string(),
                timestamp: clock.now_epoch_seconds(),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Bounded, most-recent-last narrative history.
#[derive(Debug, Clone, Default)]
pub struct NarrativeLog {
    entries: VecDeque<NarrativeMessage>,
}

impl NarrativeLog {
    pub const CAPACITY: usize = 20;

    pub fn push(&mut self, message: NarrativeMessage) {
        if self.entries.len() == Self::CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(message);
    }

    pub fn entries(&self) -> impl Iterator<Item = &NarrativeMessage> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&NarrativeMessage> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
