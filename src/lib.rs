//! Word frequency counting over many text files, serially or in parallel.
//!
//! All strategies implement [`WordCountingService`] and produce the same counts
//! for the same files; they differ only in how the work is split and merged.

pub mod batch;
pub mod error;
pub mod fork_join;
pub mod logging;
pub mod partitioned;
pub mod punctuation;
pub mod service;
pub mod word_counter;

pub use batch::{count_words_from_reader, count_words_in_files, files_in_dir_with_extension};
pub use error::{CountError, FileReadError};
pub use fork_join::ForkJoinWordCounting;
pub use partitioned::PartitionedWordCounting;
pub use service::{SerialWordCounting, WordCountingService};
pub use word_counter::{CounterStats, WordCount, WordCounter};

/// Default largest batch the fork/join strategy counts without splitting.
pub const DEFAULT_SINGLE_TASK_MAX_SIZE: usize = 200;

/// Number of hardware threads, falling back to 1 when it cannot be queried.
pub fn available_parallelism() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}
