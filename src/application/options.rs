use std::path::PathBuf;

use crate::application::Config;
use crate::domain::{PatternError, ScanConfiguration};

/// 一次扫描的完整参数
///
/// 由命令行解析得到，再与配置文件的默认值合并。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOptions {
    pub root: PathBuf,
    pub name: Option<String>,
    pub extensions: Vec<String>,
    pub content: Option<String>,
    pub word: bool,
    pub ignore_case: bool,
    pub quiet: bool,
    pub fixed_strings: bool,
    pub exclude: Vec<String>,
    /// `None` 时使用配置文件中的值
    pub threads: Option<usize>,
    pub progress: bool,
    pub summary: bool,
    pub log: bool,
}

impl ScanOptions {
    /// 合并配置文件: 开关取并集，排除列表追加，线程数仅在未指定时采用
    pub fn apply_config(&mut self, config: &Config) {
        self.word |= config.search.word;
        self.ignore_case |= config.search.ignore_case;
        self.quiet |= config.search.quiet;
        self.fixed_strings |= config.search.fixed_strings;
        self.progress |= config.display.progress;
        self.summary &= config.display.summary;

        for name in &config.exclude.names {
            if !self.exclude.contains(name) {
                self.exclude.push(name.clone());
            }
        }

        if self.threads.is_none() {
            self.threads = Some(config.performance.threads);
        }
    }

    /// 实际使用的线程数
    pub fn thread_count(&self) -> usize {
        match self.threads {
            Some(0) | None => num_cpus::get(),
            Some(threads) => threads,
        }
    }

    /// 编译为不可变的扫描配置
    pub fn build_configuration(&self) -> Result<ScanConfiguration, PatternError> {
        ScanConfiguration::builder()
            .name(self.name.clone().unwrap_or_default())
            .extensions(self.extensions.iter().cloned())
            .content(self.content.clone())
            .word(self.word)
            .ignore_case(self.ignore_case)
            .quiet(self.quiet)
            .fixed_strings(self.fixed_strings)
            .excluded_names(self.exclude.iter().cloned())
            .build()
    }
}
