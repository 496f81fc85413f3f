mod consistency;
mod interaction;

pub use consistency::ConsistencySystem;
pub use interaction::{InteractionSystem, ScheduleOrder};
