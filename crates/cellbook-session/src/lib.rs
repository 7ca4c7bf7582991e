pub mod change;
pub mod config;
pub mod session;

pub use change::{Change, SubscriptionId};
pub use config::SessionConfig;
pub use session::Session;
