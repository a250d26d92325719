use std::sync::atomic::{AtomicU64, Ordering};

/// 扫描计数器
///
/// 只能通过原子自增修改，扫描期间从不递减或重置。
/// 总数总是先于对应的匹配数递增 (Release)，读取时先读匹配数再读总数 (Acquire)，
/// 因此任何时刻读到的快照都满足 matched <= total。
#[derive(Debug, Default)]
pub struct ScanCounters {
    total_dirs: AtomicU64,
    total_files: AtomicU64,
    matched_dirs: AtomicU64,
    matched_files: AtomicU64,
}

impl ScanCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_total_dirs(&self) {
        self.total_dirs.fetch_add(1, Ordering::Release);
    }

    pub fn inc_total_files(&self) {
        self.total_files.fetch_add(1, Ordering::Release);
    }

    pub fn inc_matched_dirs(&self) {
        self.matched_dirs.fetch_add(1, Ordering::Release);
    }

    pub fn inc_matched_files(&self) {
        self.matched_files.fetch_add(1, Ordering::Release);
    }

    /// 读取全部计数
    pub fn snapshot(&self) -> CounterSnapshot {
        let matched_dirs = self.matched_dirs.load(Ordering::Acquire);
        let matched_files = self.matched_files.load(Ordering::Acquire);
        CounterSnapshot {
            total_dirs: self.total_dirs.load(Ordering::Acquire),
            total_files: self.total_files.load(Ordering::Acquire),
            matched_dirs,
            matched_files,
        }
    }
}

/// 计数器快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub total_dirs: u64,
    pub total_files: u64,
    pub matched_dirs: u64,
    pub matched_files: u64,
}

impl CounterSnapshot {
    /// 已统计的目录与文件总数
    pub fn total_entries(&self) -> u64 {
        self.total_dirs + self.total_files
    }

    pub fn total_matches(&self) -> u64 {
        self.matched_dirs + self.matched_files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_counters_start_at_zero() {
        let counters = ScanCounters::new();
        assert_eq!(counters.snapshot(), CounterSnapshot::default());
    }

    #[test]
    fn test_each_counter_is_independent() {
        let counters = ScanCounters::new();
        counters.inc_total_dirs();
        counters.inc_total_dirs();
        counters.inc_total_files();
        counters.inc_matched_dirs();

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.total_dirs, 2);
        assert_eq!(snapshot.total_files, 1);
        assert_eq!(snapshot.matched_dirs, 1);
        assert_eq!(snapshot.matched_files, 0);
        assert_eq!(snapshot.total_entries(), 3);
        assert_eq!(snapshot.total_matches(), 1);
    }

    #[test]
    fn test_concurrent_increments() {
        let counters = Arc::new(ScanCounters::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counters = Arc::clone(&counters);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        counters.inc_total_files();
                        counters.inc_matched_files();
                        let snapshot = counters.snapshot();
                        assert!(snapshot.matched_files <= snapshot.total_files);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.total_files, 8000);
        assert_eq!(snapshot.matched_files, 8000);
    }
}
