use std::ffi::{OsStr, OsString};
use std::fs::{self, FileType, ReadDir};
use std::io;
use std::path::{Path, PathBuf};

/// 目录项类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntryKind {
    /// 普通文件
    File,
    /// 目录
    Directory,
    /// 其他 (符号链接、套接字、设备等)
    Other,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "文件",
            EntryKind::Directory => "目录",
            EntryKind::Other => "其他",
        }
    }
}

impl From<FileType> for EntryKind {
    /// 按原始类型位分类，不跟随符号链接
    fn from(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            EntryKind::Other
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// 单个目录项
#[derive(Debug, Clone)]
pub struct FileSystemEntry {
    pub path: PathBuf,
    pub name: OsString,
    pub kind: EntryKind,
}

/// 检查名称是否为隐藏项 (包括 `.` 和 `..`)
pub fn is_hidden(name: &OsStr) -> bool {
    name.as_encoded_bytes().first() == Some(&b'.')
}

/// 单个目录的惰性列表
///
/// 每次调用 [`list_dir`] 都拥有自己的 `ReadDir`，并发调用之间不共享任何缓冲区。
#[derive(Debug)]
pub struct DirListing {
    dir: PathBuf,
    inner: ReadDir,
}

impl DirListing {
    /// 正在列出的目录
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Iterator for DirListing {
    type Item = io::Result<FileSystemEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(err)),
            };

            let name = entry.file_name();
            if is_hidden(&name) {
                continue;
            }

            // DirEntry::file_type 不跟随符号链接
            let kind = match entry.file_type() {
                Ok(file_type) => EntryKind::from(file_type),
                Err(err) => return Some(Err(err)),
            };

            return Some(Ok(FileSystemEntry {
                path: self.dir.join(&name),
                name,
                kind,
            }));
        }
    }
}

/// 列出目录内容
///
/// 目录无法打开时返回错误，而不是在遍历过程中 panic。
pub fn list_dir(path: &Path) -> io::Result<DirListing> {
    let inner = fs::read_dir(path)?;
    Ok(DirListing {
        dir: path.to_path_buf(),
        inner,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn collect(path: &Path) -> Vec<(String, EntryKind)> {
        let mut entries: Vec<_> = list_dir(path)
            .unwrap()
            .map(|entry| {
                let entry = entry.unwrap();
                (entry.name.to_string_lossy().to_string(), entry.kind)
            })
            .collect();
        entries.sort();
        entries
    }

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(OsStr::new(".")));
        assert!(is_hidden(OsStr::new("..")));
        assert!(is_hidden(OsStr::new(".git")));
        assert!(!is_hidden(OsStr::new("src")));
        assert!(!is_hidden(OsStr::new("a.txt")));
    }

    #[test]
    fn test_list_classifies_entries() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        fs::write(temp_dir.path().join("file.txt"), "hello").unwrap();

        let entries = collect(temp_dir.path());
        assert_eq!(
            entries,
            vec![
                ("file.txt".to_string(), EntryKind::File),
                ("sub".to_string(), EntryKind::Directory),
            ]
        );
    }

    #[test]
    fn test_list_skips_hidden_entries() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir(temp_dir.path().join(".git")).unwrap();
        fs::write(temp_dir.path().join(".env"), "SECRET=1").unwrap();
        fs::write(temp_dir.path().join("visible"), "").unwrap();

        let entries = collect(temp_dir.path());
        assert_eq!(entries, vec![("visible".to_string(), EntryKind::File)]);
    }

    #[test]
    fn test_entry_path_joins_directory() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("a.rs"), "").unwrap();

        let listing = list_dir(temp_dir.path()).unwrap();
        assert_eq!(listing.dir(), temp_dir.path());
        let entry = listing.into_iter().next().unwrap().unwrap();
        assert_eq!(entry.path, temp_dir.path().join("a.rs"));
    }

    #[test]
    fn test_missing_directory_is_error() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("gone");
        assert!(list_dir(&missing).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_directory_is_other() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("real")).unwrap();
        std::os::unix::fs::symlink(temp_dir.path(), temp_dir.path().join("loop")).unwrap();

        let entries = collect(temp_dir.path());
        assert_eq!(
            entries,
            vec![
                ("loop".to_string(), EntryKind::Other),
                ("real".to_string(), EntryKind::Directory),
            ]
        );
    }
}
