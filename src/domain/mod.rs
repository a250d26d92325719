pub mod content;
pub mod counters;
pub mod lister;
pub mod pattern;
pub mod scan_config;
pub mod scheduler;
pub mod sink;

pub use content::{scan_content, ContentError};
pub use counters::{CounterSnapshot, ScanCounters};
pub use lister::{list_dir, DirListing, EntryKind, FileSystemEntry};
pub use pattern::{matches, CompiledPattern, PatternError, PatternRole};
pub use scan_config::{ScanConfiguration, ScanConfigurationBuilder};
pub use scheduler::{prepare_root, scan, ScanError, Scanner, ScannerBuilder};
pub use sink::{MatchSink, StdoutSink};
