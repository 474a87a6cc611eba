pub mod pattern;
pub mod persist;
pub mod state;

pub use pattern::{RotationPattern, SessionType};
pub use persist::{load_or_init, save};
pub use state::{Advance, Outcome, RotationState, MAX_RETRIES};
