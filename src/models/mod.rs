pub mod batch;
pub mod rater;
pub mod score;

pub use batch::{BatchOption, BatchWindow, BATCH_SIZE_OPTIONS, FOLLOW_UP_BATCH_SIZE};
pub use rater::{RaterId, RaterSelection};
pub use score::{Score, ScoreRecord};
