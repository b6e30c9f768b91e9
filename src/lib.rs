pub mod config;

pub mod draw;

pub mod easing;

pub mod entry;

pub mod error;

pub mod planner;

pub mod search;

pub mod seed;

pub mod stops;

pub mod test_helpers;

pub mod timeline;

pub use config::{
    ReelContentMode,
    SlotConfig,
};
pub use draw::{
    DrawEvent,
    DrawState,
    ReelStatus,
};
pub use entry::LotteryEntry;
pub use error::{
    LotteryError,
    Result,
};
pub use planner::{
    DrawAnimation,
    plan_draw,
};
pub use timeline::{
    Breakpoint,
    ReelTimeline,
};
