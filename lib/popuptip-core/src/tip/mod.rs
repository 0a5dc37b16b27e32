mod controller;
mod listener;
mod scheduler;
mod session;

pub use controller::{PopupTip, DEFAULT_DURATION_MS};
pub use listener::CloseListener;
pub use scheduler::{Scheduler, TimeoutHandle};
pub use session::TipGeneration;
