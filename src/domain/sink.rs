use std::io::{self, Write};
use std::path::Path;
#[cfg(test)]
use std::{path::PathBuf, sync::Mutex};

use super::lister::EntryKind;

/// 匹配结果输出目标
///
/// 每次调用输出一条完整的匹配记录，实现必须保证同一行内不会交错。
pub trait MatchSink: Send + Sync {
    fn emit(&self, kind: EntryKind, path: &Path);
}

/// 直接写入标准输出
#[derive(Debug, Default)]
pub struct StdoutSink;

impl MatchSink for StdoutSink {
    fn emit(&self, _kind: EntryKind, path: &Path) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", path.display());
    }
}

/// 在内存中收集匹配结果
#[cfg(test)]
#[derive(Debug, Default)]
pub struct CollectSink {
    matches: Mutex<Vec<(EntryKind, PathBuf)>>,
}

#[cfg(test)]
impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已收集的匹配，按路径排序
    pub fn matches(&self) -> Vec<(EntryKind, PathBuf)> {
        let mut matches = match self.matches.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => Vec::new(),
        };
        matches.sort_by(|a, b| a.1.cmp(&b.1));
        matches
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.matches().into_iter().map(|(_, path)| path).collect()
    }
}

#[cfg(test)]
impl MatchSink for CollectSink {
    fn emit(&self, kind: EntryKind, path: &Path) {
        if let Ok(mut matches) = self.matches.lock() {
            matches.push((kind, path.to_path_buf()));
        }
    }
}
