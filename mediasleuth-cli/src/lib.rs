// mediasleuth-cli/src/lib.rs
//
// Library portion of the MediaSleuth CLI application.
// Contains argument definitions, command logic and terminal output.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, InspectArgs, PurgeArgs};
pub use commands::inspect::run_inspect;
pub use commands::purge::run_purge;
