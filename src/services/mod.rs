pub mod exporter;
pub mod notifier;
pub mod session_store;
pub mod shuffle_planner;

pub use exporter::ResultExporter;
pub use notifier::{Notification, NotificationKind, Notifier, UnconfiguredNotifier};
pub use session_store::{CachedSession, SessionStore};
pub use shuffle_planner::ShufflePlanner;
