use std::fmt;
use std::path::Path;

use grep_matcher::Matcher;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};
use thiserror::Error;

/// 模式用途
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternRole {
    /// 目录路径模式
    Directory,
    /// 文件路径模式
    File,
    /// 文件内容模式
    Content,
}

impl fmt::Display for PatternRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PatternRole::Directory => "目录",
            PatternRole::File => "文件",
            PatternRole::Content => "内容",
        };
        f.write_str(name)
    }
}

/// 模式编译错误
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("无效的{role}模式 `{pattern}`: {source}")]
    Invalid {
        role: PatternRole,
        pattern: String,
        #[source]
        source: grep_regex::Error,
    },
    #[error("无效的扩展名: `{0}`")]
    InvalidExtension(String),
    #[error("内容模式不能为空")]
    EmptyContent,
}

/// 已编译的模式
///
/// 编译后不可变，可在任意数量的线程间共享。
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    role: PatternRole,
    source: String,
    ignore_case: bool,
    matcher: RegexMatcher,
}

impl CompiledPattern {
    /// 编译模式，大小写敏感性在编译时确定
    pub fn compile(role: PatternRole, source: &str, ignore_case: bool) -> Result<Self, PatternError> {
        let mut builder = RegexMatcherBuilder::new();
        builder.case_insensitive(ignore_case);

        // 内容按行搜索，匹配不能跨越换行，`^`/`$` 对应行首行尾
        if role == PatternRole::Content {
            builder.multi_line(true).line_terminator(Some(b'\n'));
        }

        let matcher = builder.build(source).map_err(|source_err| PatternError::Invalid {
            role,
            pattern: source.to_string(),
            source: source_err,
        })?;

        Ok(Self {
            role,
            source: source.to_string(),
            ignore_case,
            matcher,
        })
    }

    pub fn role(&self) -> PatternRole {
        self.role
    }

    /// 编译前的正则表达式文本
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// 供内容搜索器使用的底层匹配器
    pub fn matcher(&self) -> &RegexMatcher {
        &self.matcher
    }

    /// 在任意位置出现即视为匹配 (非整串匹配)
    pub fn is_match(&self, haystack: &[u8]) -> bool {
        self.matcher.is_match(haystack).unwrap_or(false)
    }

    /// 对路径的原始字节进行匹配
    pub fn matches_path(&self, path: &Path) -> bool {
        self.is_match(path.as_os_str().as_encoded_bytes())
    }
}

/// 检查文本是否包含模式
pub fn matches(text: &str, pattern: &CompiledPattern) -> bool {
    pattern.is_match(text.as_bytes())
}

fn fragment_body(fragment: &str, fixed_strings: bool) -> String {
    if fixed_strings {
        regex::escape(fragment)
    } else {
        fragment.to_string()
    }
}

/// 两侧必须是文本边界或非单词字符
///
/// `\b` 要求片段边缘是单词字符，`c++`、`(foo)` 这类片段用它永远匹配不到。
fn wrap_word(body: &str) -> String {
    format!(r"(?:^|\W)(?:{})(?:$|\W)", body)
}

/// 由名称片段构造目录/文件名模式
///
/// 空片段匹配所有路径，此时不添加单词边界。
pub fn name_pattern(fragment: &str, word: bool, fixed_strings: bool) -> String {
    let body = fragment_body(fragment, fixed_strings);
    if word && !body.is_empty() {
        wrap_word(&body)
    } else {
        body
    }
}

/// 规范化扩展名: 去掉前导点并转义
fn normalize_extension(ext: &str) -> Result<String, PatternError> {
    let trimmed = ext.trim().trim_start_matches('.');
    if trimmed.is_empty() || trimmed.contains('/') || trimmed.contains(std::path::MAIN_SEPARATOR) {
        return Err(PatternError::InvalidExtension(ext.to_string()));
    }
    Ok(regex::escape(trimmed))
}

/// 在名称模式后追加扩展名后缀约束
///
/// 路径必须以 `.` 加上任一扩展名结尾。
pub fn file_pattern(name_pattern: &str, extensions: &[String]) -> Result<String, PatternError> {
    if extensions.is_empty() {
        return Ok(name_pattern.to_string());
    }

    let alternatives = extensions
        .iter()
        .map(|ext| normalize_extension(ext))
        .collect::<Result<Vec<_>, _>>()?
        .join("|");
    let suffix = format!(r"\.(?:{})$", alternatives);

    if name_pattern.is_empty() {
        Ok(suffix)
    } else {
        Ok(format!("(?:{}).*{}", name_pattern, suffix))
    }
}

/// 构造内容模式，始终带单词边界
pub fn content_pattern(text: &str, fixed_strings: bool) -> Result<String, PatternError> {
    if text.is_empty() {
        return Err(PatternError::EmptyContent);
    }
    Ok(wrap_word(&fragment_body(text, fixed_strings)))
}
