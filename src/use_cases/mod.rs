// Use cases layer: application workflows for the game server.

pub mod game;
pub mod narrative;
pub mod registry;
pub mod session;
pub mod types;
pub mod world;

pub use game::{Narrator, SessionPublishers, session_task};
pub use narrative::{NarrativeLog, SystemClock, narrate};
pub use registry::{RegistryError, SessionHandle, SessionRegistry, SessionSettings};
pub use session::GameSession;
pub use types::{SessionCommand, SessionOutput, WorldUpdate};
pub use world::{TickOutcome, TickReport, World};
