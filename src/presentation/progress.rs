use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::{CounterSnapshot, ScanCounters};
use crate::presentation::display::format_count;

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// 扫描进度显示
pub struct ScanProgress {
    bar: Option<ProgressBar>,
}

impl ScanProgress {
    /// 创建进度显示，未启用时所有操作都是空操作
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.set_message(progress_message(&CounterSnapshot::default()));

        Self { bar: Some(bar) }
    }

    pub fn bar(&self) -> Option<ProgressBar> {
        self.bar.clone()
    }

    /// 定时刷新计数，直到 `done` 被置位
    pub fn track(&self, counters: &ScanCounters, done: &AtomicBool) {
        let Some(bar) = &self.bar else {
            return;
        };

        while !done.load(Ordering::Acquire) {
            bar.set_message(progress_message(&counters.snapshot()));
            bar.tick();
            thread::sleep(TICK_INTERVAL);
        }
    }

    pub fn finish(&self, counters: &CounterSnapshot) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(format!("完成! {}", progress_message(counters)));
        }
    }
}

fn progress_message(counters: &CounterSnapshot) -> String {
    format!(
        "已扫描 {} 目录, {} 文件, 匹配 {}",
        format_count(counters.total_dirs),
        format_count(counters.total_files),
        format_count(counters.total_matches())
    )
}
