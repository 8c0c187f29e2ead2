pub mod batch_controller;
pub mod session;

pub use batch_controller::{BatchController, Boundary, Phase};
pub use session::Session;
