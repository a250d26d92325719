use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use treescan::application::{Config, ScanOptions};
use treescan::domain::{prepare_root, ScanConfiguration, ScanCounters, Scanner};
use treescan::infrastructure::{ErrorLogger, Logger, LoggerTrait};
use treescan::presentation::{MatchPrinter, ScanProgress, ScanSummary};

/// 按名称和内容并行查找目录与文件
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// 扫描的根目录
    #[clap(default_value = ".")]
    root: PathBuf,

    /// 目录和文件路径要包含的名称 (正则表达式)
    #[clap(short, long)]
    name: Option<String>,

    /// 只匹配指定扩展名的文件，可用逗号分隔多个
    #[clap(short = 'e', long = "ext", value_delimiter = ',')]
    extensions: Vec<String>,

    /// 在文件内容中查找的文本 (按整词匹配)
    #[clap(short, long)]
    content: Option<String>,

    /// 名称按整词匹配
    #[clap(short, long)]
    word: bool,

    /// 忽略大小写
    #[clap(short, long)]
    ignore_case: bool,

    /// 不输出匹配路径，只打印统计
    #[clap(short, long)]
    quiet: bool,

    /// 名称和内容按字面文本处理，不作为正则表达式
    #[clap(short = 'F', long)]
    fixed_strings: bool,

    /// 按名称排除目录或文件，可重复指定
    #[clap(long)]
    exclude: Vec<String>,

    /// 工作线程数 (默认使用所有可用CPU)
    #[clap(short = 'j', long)]
    threads: Option<usize>,

    /// 不使用并行处理
    #[clap(long)]
    no_parallel: bool,

    /// 显示扫描进度
    #[clap(long)]
    progress: bool,

    /// 不打印扫描摘要
    #[clap(long)]
    no_summary: bool,

    /// 启用详细日志记录，日志文件保存在当前目录
    #[clap(long)]
    log: bool,

    /// 配置文件路径 (默认读取程序同级目录下的 treescan.toml)
    #[clap(long)]
    config: Option<PathBuf>,
}

impl Args {
    fn into_options(self) -> ScanOptions {
        ScanOptions {
            root: self.root,
            name: self.name,
            extensions: self.extensions,
            content: self.content,
            word: self.word,
            ignore_case: self.ignore_case,
            quiet: self.quiet,
            fixed_strings: self.fixed_strings,
            exclude: self.exclude,
            threads: if self.no_parallel { Some(1) } else { self.threads },
            progress: self.progress,
            summary: !self.no_summary,
            log: self.log,
        }
    }
}

/// 启动前已验证的参数
struct Setup {
    options: ScanOptions,
    config: ScanConfiguration,
    root: PathBuf,
    channel_capacity: usize,
}

/// 读取配置并编译模式，任何错误都在扫描开始前返回
fn prepare(args: Args) -> Result<Setup> {
    let file_config = Config::load(args.config.as_deref())?;

    let mut options = args.into_options();
    options.apply_config(&file_config);

    let config = options
        .build_configuration()
        .context("无效的匹配模式")?;
    let root = prepare_root(&options.root)?;

    Ok(Setup {
        options,
        config,
        root,
        channel_capacity: file_config.performance.channel_capacity,
    })
}

fn run(setup: Setup) -> Result<()> {
    let Setup {
        options,
        config,
        root,
        channel_capacity,
    } = setup;

    let logger = Arc::new(Logger::new(options.log)?);
    let errors = Arc::new(ErrorLogger::new(options.log)?);

    if logger.is_enabled() {
        logger.log_message(&format!("根目录: {}", root.display()))?;
        let patterns = [Some(config.dir_pattern()), Some(config.file_pattern()), config.content_pattern()];
        for pattern in patterns.into_iter().flatten() {
            logger.log_message(&format!("{}模式: {}", pattern.role(), pattern.as_str()))?;
        }
        logger.log_message(&format!("忽略大小写: {}", config.is_ignore_case()))?;
        logger.log_message(&format!("整词匹配: {}", config.is_word()))?;
        logger.log_message(&format!("静默模式: {}", config.is_quiet()))?;
        if !options.exclude.is_empty() {
            logger.log_message(&format!("排除名称: {}", options.exclude.join(", ")))?;
        }
    }

    let progress = ScanProgress::new(options.progress);
    let (sink, printer) = MatchPrinter::spawn(channel_capacity, progress.bar());

    let scanner = Scanner::builder(config)
        .threads(options.thread_count())
        .sink(Arc::new(sink))
        .logger(logger.clone())
        .errors(errors.clone())
        .build()?;

    let counters = ScanCounters::new();
    let done = AtomicBool::new(false);

    let start_time = Instant::now();
    let scan_result = thread::scope(|s| {
        if progress.bar().is_some() {
            s.spawn(|| progress.track(&counters, &done));
        }
        let result = scanner.scan_into(&root, &counters);
        done.store(true, Ordering::Release);
        result
    });
    let elapsed = start_time.elapsed();

    // 释放扫描器持有的发送端，打印线程才能结束
    drop(scanner);
    let printed = printer.finish()?;
    scan_result?;

    let snapshot = counters.snapshot();
    progress.finish(&snapshot);

    if logger.is_enabled() {
        logger.log_message(&format!("输出匹配行数: {}", printed))?;
        logger.finalize(&snapshot, elapsed)?;
    }

    if options.summary {
        ScanSummary::new(elapsed, snapshot).print()?;
    }

    errors.finalize()?;
    errors.print_error_summary();

    if logger.is_enabled() {
        eprintln!("完整日志已保存到: {}", logger.log_path().display());
    }

    Ok(())
}

/// 退出码: 0 扫描完成，1 运行时错误，2 配置或模式错误
fn main() -> ExitCode {
    let args = Args::parse();

    let setup = match prepare(args) {
        Ok(setup) => setup,
        Err(err) => {
            eprintln!("配置错误: {:#}", err);
            return ExitCode::from(2);
        }
    };

    match run(setup) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("错误: {:#}", err);
            ExitCode::from(1)
        }
    }
}
