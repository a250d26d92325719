use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;

/// 错误类型分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorType {
    /// 目录无法打开或读取
    DirectoryList,
    /// 文件读取错误
    FileRead,
    /// 二进制文件，跳过内容扫描
    BinaryContent,
    /// 工作单元异常
    TaskPanic,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::DirectoryList => "目录读取",
            ErrorType::FileRead => "文件读取",
            ErrorType::BinaryContent => "二进制文件",
            ErrorType::TaskPanic => "任务异常",
        }
    }
}

/// 错误输出位置
enum ErrorOutput {
    /// 写入错误日志文件
    File(Mutex<File>),
    /// 每个错误一行写入标准错误
    Stderr,
    /// 只计数
    Silent,
}

/// 错误日志记录器
///
/// 无论输出到哪里，都会按类型统计错误次数。
pub struct ErrorLogger {
    output: ErrorOutput,
    error_path: Option<PathBuf>,
    error_counts: Mutex<BTreeMap<ErrorType, usize>>,
}

impl ErrorLogger {
    /// 创建新的错误日志记录器，启用时写入带时间戳的错误日志文件，否则写入标准错误
    pub fn new(enabled: bool) -> Result<Self> {
        if !enabled {
            return Ok(Self::stderr());
        }

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        Self::with_path(PathBuf::from(format!("treescan_error_{}.log", timestamp)))
    }

    pub fn stderr() -> Self {
        Self::from_output(ErrorOutput::Stderr, None)
    }

    pub fn silent() -> Self {
        Self::from_output(ErrorOutput::Silent, None)
    }

    /// 写入指定路径的错误日志记录器
    pub fn with_path(error_path: PathBuf) -> Result<Self> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&error_path)
            .with_context(|| format!("无法创建错误日志文件: {}", error_path.display()))?;

        // 写入UTF-8 BOM以确保文件被正确识别为UTF-8
        file.write_all(&[0xEF, 0xBB, 0xBF])?;

        writeln!(file, "# treescan 错误日志")?;
        writeln!(file, "# 开始时间: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file, "# ============================================")?;
        writeln!(file)?;

        Ok(Self::from_output(ErrorOutput::File(Mutex::new(file)), Some(error_path)))
    }

    fn from_output(output: ErrorOutput, error_path: Option<PathBuf>) -> Self {
        Self {
            output,
            error_path,
            error_counts: Mutex::new(BTreeMap::new()),
        }
    }

    /// 记录错误
    pub fn log_error(
        &self,
        error_type: ErrorType,
        path: Option<&Path>,
        message: &str,
        details: Option<&str>,
    ) -> Result<()> {
        if let Ok(mut counts) = self.error_counts.lock() {
            *counts.entry(error_type).or_insert(0) += 1;
        }

        match &self.output {
            ErrorOutput::Silent => {}
            ErrorOutput::Stderr => {
                let mut line = format!("{}: {}", error_type.as_str(), message);
                if let Some(path) = path {
                    line.push_str(&format!(" ({})", path.display()));
                }
                if let Some(detail) = details {
                    line.push_str(&format!(": {}", detail));
                }
                eprintln!("{}", line);
            }
            ErrorOutput::File(file) => {
                let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
                if let Ok(mut file) = file.lock() {
                    writeln!(file, "[{}] {} - {}", timestamp, error_type.as_str(), message)?;
                    if let Some(path) = path {
                        writeln!(file, "  路径: {}", path.display())?;
                    }
                    if let Some(detail) = details {
                        writeln!(file, "  详细信息: {}", detail)?;
                    }
                    writeln!(file)?;
                    file.flush()?;
                }
            }
        }

        Ok(())
    }

    /// 获取错误统计信息
    pub fn get_error_summary(&self) -> BTreeMap<ErrorType, usize> {
        if let Ok(counts) = self.error_counts.lock() {
            counts.clone()
        } else {
            BTreeMap::new()
        }
    }

    /// 获取总错误数
    pub fn get_total_errors(&self) -> usize {
        if let Ok(counts) = self.error_counts.lock() {
            counts.values().sum()
        } else {
            0
        }
    }

    /// 检查是否有错误
    pub fn has_errors(&self) -> bool {
        self.get_total_errors() > 0
    }

    pub fn error_path(&self) -> Option<&Path> {
        self.error_path.as_deref()
    }

    /// 完成错误日志记录
    pub fn finalize(&self) -> Result<()> {
        let ErrorOutput::File(file) = &self.output else {
            return Ok(());
        };

        let summary = self.get_error_summary();
        if let Ok(mut file) = file.lock() {
            writeln!(file, "# ============================================")?;
            writeln!(file, "# 结束时间: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;

            if !summary.is_empty() {
                writeln!(file, "# 错误统计:")?;
                for (error_type, count) in &summary {
                    writeln!(file, "#   {}: {} 次", error_type.as_str(), count)?;
                }
                writeln!(file, "#   总计: {} 个错误", summary.values().sum::<usize>())?;
            } else {
                writeln!(file, "# 无错误记录")?;
            }

            file.flush()?;
        }

        Ok(())
    }

    /// 打印错误摘要到标准错误
    pub fn print_error_summary(&self) {
        if !self.has_errors() {
            return;
        }

        eprintln!("\n扫描过程中发生错误:");
        eprintln!("----------------------------");

        for (error_type, count) in &self.get_error_summary() {
            eprintln!("  {}: {} 次", error_type.as_str(), count);
        }

        eprintln!("  总计: {} 个错误", self.get_total_errors());
        if let Some(path) = self.error_path() {
            eprintln!("  详细错误信息请查看: {}", path.display());
        }
    }
}
