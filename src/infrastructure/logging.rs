use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;

use crate::domain::{CounterSnapshot, EntryKind};

/// 日志记录器trait
pub trait LoggerTrait: Send + Sync {
    fn is_enabled(&self) -> bool;
    fn log_message(&self, message: &str) -> Result<()>;
    fn log_entry(&self, path: &Path, kind: EntryKind, status: &str) -> Result<()>;
    fn finalize(&self, counters: &CounterSnapshot, duration: Duration) -> Result<()>;
}

/// 调试日志记录器（记录扫描参数、匹配项和扫描结果）
pub struct Logger {
    log_file: Mutex<Option<File>>,
    log_path: PathBuf,
    enabled: bool,
}

impl Logger {
    /// 创建新的日志记录器，启用时在当前目录创建带时间戳的日志文件
    pub fn new(enabled: bool) -> Result<Self> {
        if !enabled {
            return Ok(Self::disabled());
        }

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        Self::with_path(PathBuf::from(format!("treescan_debug_{}.log", timestamp)))
    }

    /// 不输出任何内容的日志记录器
    pub fn disabled() -> Self {
        Self {
            log_file: Mutex::new(None),
            log_path: PathBuf::new(),
            enabled: false,
        }
    }

    /// 写入指定路径的日志记录器
    pub fn with_path(log_path: PathBuf) -> Result<Self> {
        let now = Local::now();

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("无法创建日志文件: {}", log_path.display()))?;

        // 写入UTF-8 BOM以确保文件被正确识别为UTF-8
        file.write_all(&[0xEF, 0xBB, 0xBF])?;

        writeln!(file, "# treescan 调试日志")?;
        writeln!(file, "# 开始时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file, "# --------------------------------------------")?;

        Ok(Self {
            log_file: Mutex::new(Some(file)),
            log_path,
            enabled: true,
        })
    }

    /// 获取日志文件路径
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    fn write_line(&self, line: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

        if let Ok(mut file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "[{}] {}", timestamp, line)?;
                file.flush()?;
            }
        }

        Ok(())
    }
}

impl LoggerTrait for Logger {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn log_message(&self, message: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        self.write_line(message)
    }

    fn log_entry(&self, path: &Path, kind: EntryKind, status: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        self.write_line(&format!("{}: {} | 状态: {}", kind.as_str(), path.display(), status))
    }

    fn finalize(&self, counters: &CounterSnapshot, duration: Duration) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let now = Local::now();

        if let Ok(mut file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "# --------------------------------------------")?;
                writeln!(file, "# 扫描完成时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
                writeln!(file, "# 总用时: {:.3}秒", duration.as_secs_f64())?;
                writeln!(file, "# 目录总数: {}", counters.total_dirs)?;
                writeln!(file, "# 匹配目录: {}", counters.matched_dirs)?;
                writeln!(file, "# 文件总数: {}", counters.total_files)?;
                writeln!(file, "# 匹配文件: {}", counters.matched_files)?;
                writeln!(file, "# ============================================")?;
                file.flush()?;
            }
        }

        Ok(())
    }
}
