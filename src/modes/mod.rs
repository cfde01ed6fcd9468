pub mod run;
pub mod watch;

pub use run::{RunConfig, RunMode};
pub use watch::{PlaybackSpeed, WatchMode};
