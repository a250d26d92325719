use std::collections::HashSet;
use std::ffi::OsStr;

use super::pattern::{self, CompiledPattern, PatternError, PatternRole};

/// 扫描配置
///
/// 在扫描开始前构造一次，之后只读共享，所有模式已编译完成。
#[derive(Debug, Clone)]
pub struct ScanConfiguration {
    dir_pattern: CompiledPattern,
    file_pattern: CompiledPattern,
    content_pattern: Option<CompiledPattern>,
    ignore_case: bool,
    word: bool,
    quiet: bool,
    excluded_names: HashSet<String>,
}

impl ScanConfiguration {
    pub fn builder() -> ScanConfigurationBuilder {
        ScanConfigurationBuilder::default()
    }

    pub fn dir_pattern(&self) -> &CompiledPattern {
        &self.dir_pattern
    }

    pub fn file_pattern(&self) -> &CompiledPattern {
        &self.file_pattern
    }

    pub fn content_pattern(&self) -> Option<&CompiledPattern> {
        self.content_pattern.as_ref()
    }

    pub fn is_ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn is_word(&self) -> bool {
        self.word
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// 检查名称是否在排除列表中
    pub fn is_excluded(&self, name: &OsStr) -> bool {
        if self.excluded_names.is_empty() {
            return false;
        }
        name.to_str()
            .map_or(false, |name| self.excluded_names.contains(name))
    }
}

/// 扫描配置构造器
#[derive(Debug, Clone, Default)]
pub struct ScanConfigurationBuilder {
    name: String,
    extensions: Vec<String>,
    content: Option<String>,
    word: bool,
    ignore_case: bool,
    quiet: bool,
    fixed_strings: bool,
    excluded_names: Vec<String>,
}

impl ScanConfigurationBuilder {
    /// 名称片段，同时用于目录和文件
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn content(mut self, content: Option<String>) -> Self {
        self.content = content;
        self
    }

    pub fn word(mut self, word: bool) -> Self {
        self.word = word;
        self
    }

    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn fixed_strings(mut self, fixed_strings: bool) -> Self {
        self.fixed_strings = fixed_strings;
        self
    }

    pub fn excluded_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// 编译全部模式，任一模式无效即失败
    pub fn build(self) -> Result<ScanConfiguration, PatternError> {
        let name = pattern::name_pattern(&self.name, self.word, self.fixed_strings);
        let dir_pattern = CompiledPattern::compile(PatternRole::Directory, &name, self.ignore_case)?;

        let file_source = pattern::file_pattern(&name, &self.extensions)?;
        let file_pattern = CompiledPattern::compile(PatternRole::File, &file_source, self.ignore_case)?;

        let content_pattern = match &self.content {
            Some(text) => {
                let source = pattern::content_pattern(text, self.fixed_strings)?;
                Some(CompiledPattern::compile(PatternRole::Content, &source, self.ignore_case)?)
            }
            None => None,
        };

        Ok(ScanConfiguration {
            dir_pattern,
            file_pattern,
            content_pattern,
            ignore_case: self.ignore_case,
            word: self.word,
            quiet: self.quiet,
            excluded_names: self.excluded_names.into_iter().collect(),
        })
    }
}
