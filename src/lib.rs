// 分层架构模块
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

// 重新导出主要类型
pub use domain::{
    scan, CompiledPattern, CounterSnapshot, EntryKind, MatchSink, PatternError, ScanConfiguration,
    ScanCounters, ScanError, Scanner,
};
pub use application::{Config, ScanOptions};
pub use infrastructure::{ErrorLogger, ErrorType, Logger, LoggerTrait};
pub use presentation::{MatchPrinter, ScanProgress, ScanSummary};
