pub mod ideas;
pub mod intel;
pub mod item;
pub mod normalize;
pub mod pipeline;
pub mod seed;
pub mod unblock;

pub use ideas::Idea;
pub use intel::IntelEntry;
pub use item::{Complexity, QueueFile, QueueItem, Source, Status};
pub use pipeline::{Pipeline, Selection};

/// Ready-pending floor below which idea promotion kicks in.
pub const HEALTHY_FLOOR: usize = 3;
/// Ideas retained in the list when the queue is healthy.
pub const IDEA_BUFFER: usize = 3;
/// Ideas retained when the queue is starved (zero ready items).
pub const STARVED_BUFFER: usize = 1;
/// Queue stops accepting auto-promotions past this size.
pub const MAX_QUEUE_SIZE: usize = 50;
/// Intelligence promotions allowed per tick.
pub const MAX_INTEL_PER_TICK: usize = 2;
/// Remaining budget (USD) below which large items are deferred.
pub const LOW_BUDGET_THRESHOLD: f64 = 3.0;
/// Wall clock bound on a single blocker-check command.
pub const BLOCKER_TIMEOUT_SECS: u64 = 10;
