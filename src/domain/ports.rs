use async_trait::async_trait;

// Game moments that trigger flavor text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeEvent {
    Start,
    Success,
    Fail,
}

impl NarrativeEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            NarrativeEvent::Start => "start",
            NarrativeEvent::Success => "success",
            NarrativeEvent::Fail => "fail",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarrativeRequest {
    pub level: u32,
    pub score: u64,
    pub event: NarrativeEvent,
}

// One line of the narrative log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeMessage {
    pub text: String,
    pub sender: String,
    pub timestamp: u64,
}

#[derive(Debug)]
pub enum NarrativeError {
    NotConfigured,
    Unavailable,
    InvalidResponse,
}

// Port for the external flavor-text generator.
#[async_trait]
pub trait NarrativeService: Send + Sync {
    async fn generate(
        &self,
        request: NarrativeRequest,
    ) -> Result<NarrativeMessage, NarrativeError>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
}
