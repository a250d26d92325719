use std::io;
use std::path::{Path, PathBuf};

use grep_searcher::{BinaryDetection, Searcher, SearcherBuilder, Sink, SinkFinish, SinkMatch};
use thiserror::Error;

use super::pattern::CompiledPattern;

/// 内容扫描错误，均视为跳过该文件
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("无法读取文件 {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("二进制文件 {path} (偏移 {offset})")]
    Binary { path: PathBuf, offset: u64 },
}

/// 遇到第一个匹配即停止的接收器
#[derive(Debug, Default)]
struct FirstMatch {
    matched: bool,
    binary_offset: Option<u64>,
}

impl Sink for FirstMatch {
    type Error = io::Error;

    fn matched(&mut self, _searcher: &Searcher, _mat: &SinkMatch<'_>) -> Result<bool, Self::Error> {
        self.matched = true;
        // 返回 false 终止搜索
        Ok(false)
    }

    fn finish(&mut self, _searcher: &Searcher, finish: &SinkFinish) -> Result<(), Self::Error> {
        self.binary_offset = finish.binary_byte_offset();
        Ok(())
    }
}

/// 检查文件内容是否包含模式
///
/// 在发现匹配之前检测到 NUL 字节的文件作为二进制文件返回错误。
pub fn scan_content(path: &Path, pattern: &CompiledPattern) -> Result<bool, ContentError> {
    let mut searcher = SearcherBuilder::new()
        .binary_detection(BinaryDetection::quit(b'\x00'))
        .line_number(false)
        .build();

    let mut sink = FirstMatch::default();
    searcher
        .search_path(pattern.matcher(), path, &mut sink)
        .map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    if sink.matched {
        return Ok(true);
    }

    if let Some(offset) = sink.binary_offset {
        return Err(ContentError::Binary {
            path: path.to_path_buf(),
            offset,
        });
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pattern::{content_pattern, PatternRole};
    use std::fs;
    use tempfile::tempdir;

    fn pattern(text: &str, ignore_case: bool) -> CompiledPattern {
        let source = content_pattern(text, false).unwrap();
        CompiledPattern::compile(PatternRole::Content, &source, ignore_case).unwrap()
    }

    #[test]
    fn test_content_match() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("main.c");
        fs::write(&file, "#include <stdio.h>\n\nint main(void) {\n    return 0;\n}\n").unwrap();

        assert!(scan_content(&file, &pattern("main", false)).unwrap());
        assert!(!scan_content(&file, &pattern("printf", false)).unwrap());
    }

    #[test]
    fn test_content_word_boundary() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("notes.txt");
        fs::write(&file, "the domain expert\n").unwrap();

        assert!(!scan_content(&file, &pattern("main", false)).unwrap());
        assert!(scan_content(&file, &pattern("domain", false)).unwrap());
    }

    #[test]
    fn test_content_ignore_case() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("notes.txt");
        fs::write(&file, "Homebrew formula\nBrew install\n").unwrap();

        assert!(!scan_content(&file, &pattern("brew", false)).unwrap());
        assert!(scan_content(&file, &pattern("brew", true)).unwrap());
    }

    #[test]
    fn test_symbol_edges_match_at_line_edges() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("call.txt");
        fs::write(&file, "x(foo)y\n(foo)\n").unwrap();

        let source = content_pattern("(foo)", true).unwrap();
        let literal = CompiledPattern::compile(PatternRole::Content, &source, false).unwrap();
        assert!(scan_content(&file, &literal).unwrap());

        fs::write(&file, "x(foo)y\nlast (foo) word\n").unwrap();
        assert!(scan_content(&file, &literal).unwrap());

        fs::write(&file, "x(foo)y\n").unwrap();
        assert!(!scan_content(&file, &literal).unwrap());
    }

    #[test]
    fn test_match_on_last_line_without_newline() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("tail.txt");
        fs::write(&file, "first\nsecond\nneedle").unwrap();

        assert!(scan_content(&file, &pattern("needle", false)).unwrap());
    }

    #[test]
    fn test_empty_file() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("empty");
        fs::write(&file, "").unwrap();

        assert!(!scan_content(&file, &pattern("anything", false)).unwrap());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("vanished.txt");

        let err = scan_content(&file, &pattern("x", false)).unwrap_err();
        assert!(matches!(err, ContentError::Read { .. }));
    }

    #[test]
    fn test_binary_file_is_skipped() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("blob.bin");
        fs::write(&file, b"\x00\x01\x02 main \x00").unwrap();

        let err = scan_content(&file, &pattern("main", false)).unwrap_err();
        assert!(matches!(err, ContentError::Binary { .. }));
    }
}
