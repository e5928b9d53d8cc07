pub mod commands;
pub mod context;
pub mod display;
pub mod logging;
pub mod repl;
pub mod scorer;
pub mod speech;

pub use context::CliContext;
pub use repl::readline;
