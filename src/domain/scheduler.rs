use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::{Scope, ThreadPool, ThreadPoolBuilder};
use thiserror::Error;

use super::content::{scan_content, ContentError};
use super::counters::{CounterSnapshot, ScanCounters};
use super::lister::{list_dir, EntryKind};
use super::scan_config::ScanConfiguration;
use super::sink::{MatchSink, StdoutSink};
use crate::infrastructure::{ErrorLogger, ErrorType, Logger, LoggerTrait};

/// 扫描启动错误
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("无法访问根路径 {path}: {source}")]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("根路径不是目录: {0}")]
    NotADirectory(PathBuf),
    #[error("无法创建线程池: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// 将根路径规范化为绝对路径并确认是目录
pub fn prepare_root(root: &Path) -> Result<PathBuf, ScanError> {
    let canonical = root.canonicalize().map_err(|source| ScanError::RootUnavailable {
        path: root.to_path_buf(),
        source,
    })?;

    if !canonical.is_dir() {
        return Err(ScanError::NotADirectory(canonical));
    }

    Ok(canonical)
}

/// 目录树扫描器
///
/// 持有一个固定大小的线程池，每个目录和文件都作为独立的工作单元提交到池中。
/// `scan` 在所有工作单元 (包括工作单元递归提交的) 完成后才返回。
pub struct Scanner {
    config: Arc<ScanConfiguration>,
    pool: ThreadPool,
    sink: Arc<dyn MatchSink>,
    logger: Arc<dyn LoggerTrait>,
    errors: Arc<ErrorLogger>,
}

impl Scanner {
    pub fn builder(config: ScanConfiguration) -> ScannerBuilder {
        ScannerBuilder {
            config,
            threads: 0,
            sink: None,
            logger: None,
            errors: None,
        }
    }

    /// 线程池中的工作线程数
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// 扫描目录树并返回最终计数
    pub fn scan(&self, root: &Path) -> Result<CounterSnapshot, ScanError> {
        let counters = ScanCounters::new();
        self.scan_into(root, &counters)?;
        Ok(counters.snapshot())
    }

    /// 扫描目录树，计数写入调用方提供的计数器
    ///
    /// 根目录本身只被列出，不参与计数和匹配。
    pub fn scan_into(&self, root: &Path, counters: &ScanCounters) -> Result<(), ScanError> {
        let root = prepare_root(root)?;

        if self.logger.is_enabled() {
            let _ = self.logger.log_message(&format!(
                "开始扫描: {} (线程数: {})",
                root.display(),
                self.threads()
            ));
        }

        let context = ScanContext {
            config: &self.config,
            counters,
            sink: self.sink.as_ref(),
            logger: self.logger.as_ref(),
            errors: self.errors.as_ref(),
        };

        // scope 返回即表示所有工作单元均已完成
        self.pool.scope(|scope| {
            context.guarded(&root, || context.list_children(scope, &root));
        });

        if self.logger.is_enabled() {
            let snapshot = counters.snapshot();
            let _ = self.logger.log_message(&format!(
                "扫描结束: 目录 {}/{}，文件 {}/{}",
                snapshot.matched_dirs, snapshot.total_dirs, snapshot.matched_files, snapshot.total_files
            ));
        }

        Ok(())
    }
}

/// 扫描器构造器
pub struct ScannerBuilder {
    config: ScanConfiguration,
    threads: usize,
    sink: Option<Arc<dyn MatchSink>>,
    logger: Option<Arc<dyn LoggerTrait>>,
    errors: Option<Arc<ErrorLogger>>,
}

impl ScannerBuilder {
    /// 工作线程数，0 表示使用所有 CPU
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn sink(mut self, sink: Arc<dyn MatchSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn logger(mut self, logger: Arc<dyn LoggerTrait>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn errors(mut self, errors: Arc<ErrorLogger>) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn build(self) -> Result<Scanner, ScanError> {
        let threads = if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        };

        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("treescan-worker-{}", index))
            .build()?;

        Ok(Scanner {
            config: Arc::new(self.config),
            pool,
            sink: self.sink.unwrap_or_else(|| Arc::new(StdoutSink)),
            logger: self.logger.unwrap_or_else(|| Arc::new(Logger::disabled())),
            errors: self.errors.unwrap_or_else(|| Arc::new(ErrorLogger::stderr())),
        })
    }
}

/// 使用默认设置扫描: 所有 CPU、匹配写入标准输出、错误写入标准错误
pub fn scan(root: &Path, config: ScanConfiguration) -> Result<CounterSnapshot, ScanError> {
    Scanner::builder(config).build()?.scan(root)
}

/// 单次扫描的共享上下文，以引用方式传入每个工作单元
struct ScanContext<'a> {
    config: &'a ScanConfiguration,
    counters: &'a ScanCounters,
    sink: &'a dyn MatchSink,
    logger: &'a dyn LoggerTrait,
    errors: &'a ErrorLogger,
}

impl<'a> ScanContext<'a> {
    /// 列出目录并为每个子目录和文件提交工作单元
    fn list_children<'s>(&'s self, scope: &Scope<'s>, dir: &Path) {
        let mut listing = match list_dir(dir) {
            Ok(listing) => listing,
            Err(err) => {
                self.record_error(ErrorType::DirectoryList, dir, "无法打开目录", &err.to_string());
                return;
            }
        };

        while let Some(entry) = listing.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    self.record_error(ErrorType::DirectoryList, listing.dir(), "读取目录项失败", &err.to_string());
                    continue;
                }
            };

            if self.config.is_excluded(&entry.name) {
                continue;
            }

            match entry.kind {
                EntryKind::Directory => scope.spawn(move |scope| {
                    self.guarded(&entry.path, || self.visit_dir(scope, &entry.path));
                }),
                EntryKind::File => scope.spawn(move |_| {
                    self.guarded(&entry.path, || self.visit_file(&entry.path));
                }),
                EntryKind::Other => {}
            }
        }
    }

    fn visit_dir<'s>(&'s self, scope: &Scope<'s>, dir: &Path) {
        self.counters.inc_total_dirs();

        if self.config.dir_pattern().matches_path(dir) {
            self.counters.inc_matched_dirs();
            self.report(EntryKind::Directory, dir);
        }

        self.list_children(scope, dir);
    }

    /// 内容模式只在文件名模式通过后才检查，每个文件最多计数一次
    fn visit_file(&self, file: &Path) {
        self.counters.inc_total_files();

        if !self.config.file_pattern().matches_path(file) {
            return;
        }

        if let Some(content) = self.config.content_pattern() {
            match scan_content(file, content) {
                Ok(true) => {}
                Ok(false) => return,
                Err(err) => {
                    let (error_type, message) = match &err {
                        ContentError::Read { .. } => (ErrorType::FileRead, "无法读取文件"),
                        ContentError::Binary { .. } => (ErrorType::BinaryContent, "跳过二进制文件"),
                    };
                    self.record_error(error_type, file, message, &err.to_string());
                    return;
                }
            }
        }

        self.counters.inc_matched_files();
        self.report(EntryKind::File, file);
    }

    fn report(&self, kind: EntryKind, path: &Path) {
        if !self.config.is_quiet() {
            self.sink.emit(kind, path);
        }

        if self.logger.is_enabled() {
            let _ = self.logger.log_entry(path, kind, "匹配");
        }
    }

    fn record_error(&self, error_type: ErrorType, path: &Path, message: &str, details: &str) {
        let _ = self.errors.log_error(error_type, Some(path), message, Some(details));
    }

    /// 在工作单元边界捕获 panic，只影响该分支
    fn guarded<F: FnOnce()>(&self, path: &Path, unit: F) {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(unit)) {
            self.record_error(ErrorType::TaskPanic, path, "工作单元异常", &panic_message(payload.as_ref()));
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "未知错误".to_string()
    }
}
