pub mod constants;
pub mod layout;
pub mod progress;

pub use constants::*;
pub use progress::ProgressReporter;
