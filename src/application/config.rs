use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 配置文件名，默认放在程序同级目录下
pub const CONFIG_FILE_NAME: &str = "treescan.toml";

/// 应用程序配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 匹配相关的默认开关
    pub search: SearchConfig,
    /// 性能相关配置
    pub performance: PerformanceConfig,
    /// 排除规则配置
    pub exclude: ExcludeConfig,
    /// 显示相关配置
    pub display: DisplayConfig,
}

/// 匹配配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// 忽略大小写
    pub ignore_case: bool,
    /// 按整词匹配
    pub word: bool,
    /// 不输出匹配路径
    pub quiet: bool,
    /// 名称和内容按字面文本处理
    pub fixed_strings: bool,
}

/// 性能配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// 工作线程数，0 表示使用所有 CPU
    pub threads: usize,
    /// 匹配结果通道容量
    pub channel_capacity: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            channel_capacity: 100,
        }
    }
}

/// 排除规则配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcludeConfig {
    /// 按名称排除的目录或文件
    pub names: Vec<String>,
}

/// 显示配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// 显示进度
    pub progress: bool,
    /// 扫描结束后打印摘要
    pub summary: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            progress: false,
            summary: true,
        }
    }
}

impl Config {
    /// 加载配置
    ///
    /// 指定路径时文件必须存在；否则读取默认路径，文件不存在时使用默认配置。
    /// 不会自动创建配置文件。
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::default_config_path() {
                Ok(path) if path.exists() => Self::load_from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// 从文件加载配置
    pub fn load_from_file(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("无法读取配置文件: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", config_path.display()))?;

        Ok(config)
    }

    /// 获取配置文件的默认路径
    pub fn default_config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe()
            .context("无法获取程序路径")?;

        let exe_dir = exe_path.parent()
            .context("无法获取程序目录")?;

        Ok(exe_dir.join(CONFIG_FILE_NAME))
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.performance.threads > 512 {
            anyhow::bail!("threads 不能超过 512");
        }

        if self.performance.channel_capacity == 0 {
            anyhow::bail!("channel_capacity 必须大于 0");
        }

        if self.exclude.names.iter().any(|name| name.is_empty() || name.contains('/')) {
            anyhow::bail!("exclude.names 只能包含非空的单个名称");
        }

        Ok(())
    }
}
