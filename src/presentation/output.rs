use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use indicatif::ProgressBar;

use crate::domain::{EntryKind, MatchSink};

/// 将匹配结果发送到打印线程
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<PathBuf>,
}

impl MatchSink for ChannelSink {
    fn emit(&self, _kind: EntryKind, path: &Path) {
        // 打印线程退出后 (例如管道关闭) 发送失败，直接丢弃
        let _ = self.sender.send(path.to_path_buf());
    }
}

/// 输出一条匹配记录
pub fn write_match<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    writeln!(out, "{}", path.display())
}

/// 匹配结果打印线程
///
/// 所有工作单元通过有界通道把匹配路径交给同一个线程输出，每条记录占完整的一行。
pub struct MatchPrinter {
    handle: JoinHandle<io::Result<u64>>,
}

impl MatchPrinter {
    /// 启动打印线程，返回供扫描器使用的发送端
    pub fn spawn(capacity: usize, progress: Option<ProgressBar>) -> (ChannelSink, MatchPrinter) {
        let (tx, rx) = bounded::<PathBuf>(capacity);
        let handle = thread::spawn(move || print_loop(rx, progress));
        (ChannelSink { sender: tx }, MatchPrinter { handle })
    }

    /// 等待打印线程结束，返回已输出的行数
    ///
    /// 必须先释放所有 `ChannelSink`，否则会一直等待。
    pub fn finish(self) -> Result<u64> {
        let printed = self
            .handle
            .join()
            .map_err(|_| anyhow!("打印线程异常退出"))??;
        Ok(printed)
    }
}

fn print_loop(rx: Receiver<PathBuf>, progress: Option<ProgressBar>) -> io::Result<u64> {
    let mut printed = 0;

    while let Ok(path) = rx.recv() {
        let result = match &progress {
            Some(bar) => bar.suspend(|| write_match(&mut io::stdout().lock(), &path)),
            None => write_match(&mut io::stdout().lock(), &path),
        };

        match result {
            Ok(()) => printed += 1,
            // 下游关闭 (如 `| head`) 时停止输出，扫描继续
            Err(err) if err.kind() == io::ErrorKind::BrokenPipe => return Ok(printed),
            Err(err) => return Err(err),
        }
    }

    Ok(printed)
}
