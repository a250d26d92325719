pub mod display;
pub mod output;
pub mod progress;

pub use display::{format_count, format_duration, ScanSummary};
pub use output::{ChannelSink, MatchPrinter};
pub use progress::ScanProgress;
