pub mod args;
pub mod commands;
pub mod prompt;

pub use args::{Cli, Commands};
pub use commands::{exit_code, run};
pub use prompt::InteractiveSelector;
