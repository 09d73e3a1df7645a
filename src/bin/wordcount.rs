use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use wordfreq::logging::init_logging;
use wordfreq::{
    DEFAULT_SINGLE_TASK_MAX_SIZE, ForkJoinWordCounting, PartitionedWordCounting,
    SerialWordCounting, WordCountingService, available_parallelism, files_in_dir_with_extension,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// One thread, one pass
    Serial,
    /// Recursive halving on a work-stealing pool
    ForkJoin,
    /// One contiguous slice of files per worker thread
    Partitioned,
}

/// Count lower-cased words in text files and print the most frequent ones
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Files to count (alternatively use --dir)
    #[arg(value_name = "FILE", conflicts_with = "dir")]
    files: Vec<PathBuf>,

    /// Count all files below this directory whose names end with --ext
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// File name suffix used with --dir
    #[arg(short, long, default_value = ".txt")]
    ext: String,

    /// Counting strategy
    #[arg(short, long, value_enum, default_value_t = Strategy::ForkJoin)]
    strategy: Strategy,

    /// Largest batch of files the fork-join strategy counts without splitting
    #[arg(long, default_value_t = DEFAULT_SINGLE_TASK_MAX_SIZE)]
    threshold: usize,

    /// Worker threads (default: number of cores)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Number of most frequent words to print
    #[arg(short, long, default_value_t = 20)]
    top: usize,

    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, action = ArgAction::Count)]
    quiet: u8,
}

fn build_service(args: &Args) -> Result<Box<dyn WordCountingService>> {
    let service: Box<dyn WordCountingService> = match args.strategy {
        Strategy::Serial => Box::new(SerialWordCounting),
        Strategy::ForkJoin => Box::new(match args.workers {
            Some(threads) => ForkJoinWordCounting::with_threads(args.threshold, threads)?,
            None => ForkJoinWordCounting::new(args.threshold)?,
        }),
        Strategy::Partitioned => Box::new(PartitionedWordCounting::new(
            args.workers.unwrap_or_else(available_parallelism),
        )?),
    };
    Ok(service)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    // Validate arguments before touching the file system.
    let service = build_service(&args)?;

    let files = match &args.dir {
        Some(dir) => files_in_dir_with_extension(dir, &args.ext)
            .with_context(|| format!("cannot list files in {}", dir.display()))?,
        None => args.files.clone(),
    };
    if files.is_empty() {
        bail!("no input files; pass file names or --dir");
    }

    let before = Instant::now();
    let counter = service
        .count_words(&files)
        .with_context(|| format!("{:?} counting failed", args.strategy))?;
    let elapsed = before.elapsed();

    eprintln!(
        "{} files, {} distinct words, {} words in total ({} ms)",
        files.len(),
        counter.size(),
        counter.total_count(),
        elapsed.as_millis()
    );
    eprintln!("{}", counter.performance_summary());

    for wc in counter.top_words(args.top) {
        println!("{}\t{}", wc.word, wc.count);
    }

    Ok(())
}
