use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;

use crate::domain::CounterSnapshot;

/// 格式化持续时间
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}.{:03}s", secs, duration.subsec_millis())
    }
}

/// 格式化计数，每三位加千位分隔符
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(ch);
    }

    formatted
}

/// 扫描摘要
#[derive(Debug, Clone, Copy)]
pub struct ScanSummary {
    pub elapsed: Duration,
    pub counters: CounterSnapshot,
}

impl ScanSummary {
    pub fn new(elapsed: Duration, counters: CounterSnapshot) -> Self {
        Self { elapsed, counters }
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\n扫描摘要:")?;
        writeln!(out, "----------------------------")?;
        writeln!(out, "总用时: {}", format_duration(self.elapsed))?;
        writeln!(
            out,
            "目录总数: {}, 匹配: {}",
            format_count(self.counters.total_dirs),
            format_count(self.counters.matched_dirs)
        )?;
        writeln!(
            out,
            "文件总数: {}, 匹配: {}",
            format_count(self.counters.total_files),
            format_count(self.counters.matched_files)
        )?;
        Ok(())
    }

    pub fn print(&self) -> Result<()> {
        let mut stdout = io::stdout().lock();
        self.write_to(&mut stdout)?;
        Ok(())
    }
}
