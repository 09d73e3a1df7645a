//! Divide-and-conquer counting on a work-stealing pool.
//!
//! The file list is halved until each piece holds at most `single_task_max_size`
//! files. Pieces are counted independently and the partial counters are merged
//! pairwise on the way back up, so the merge tree mirrors the split tree.

use crate::batch::count_batch;
use crate::error::CountError;
use crate::service::WordCountingService;
use crate::word_counter::WordCounter;
use rayon::ThreadPoolBuilder;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ForkJoinWordCounting {
    // Lists of this many files or fewer are counted directly, without splitting.
    single_task_max_size: usize,
    // Pool size; None means one thread per available core.
    threads: Option<usize>,
}

impl ForkJoinWordCounting {
    pub fn new(single_task_max_size: usize) -> Result<Self, CountError> {
        if single_task_max_size == 0 {
            return Err(CountError::InvalidArgument(
                "single task size must be positive".into(),
            ));
        }
        Ok(ForkJoinWordCounting {
            single_task_max_size,
            threads: None,
        })
    }

    /// Same as `new`, but with a fixed number of pool threads.
    pub fn with_threads(single_task_max_size: usize, threads: usize) -> Result<Self, CountError> {
        if threads == 0 {
            return Err(CountError::InvalidArgument(
                "thread count must be positive".into(),
            ));
        }
        let mut counting = Self::new(single_task_max_size)?;
        counting.threads = Some(threads);
        Ok(counting)
    }

    pub fn single_task_max_size(&self) -> usize {
        self.single_task_max_size
    }
}

/// A unit of counting work: either a batch small enough to count directly, or
/// two halves to count concurrently and merge.
#[derive(Debug)]
enum CountingTask<'a> {
    Leaf(&'a [PathBuf]),
    Split(Box<CountingTask<'a>>, Box<CountingTask<'a>>),
}

impl<'a> CountingTask<'a> {
    /// Splits at the midpoint; the first half gets the extra file of an odd list.
    fn plan(files: &'a [PathBuf], single_task_max_size: usize) -> Self {
        if files.len() <= single_task_max_size {
            return CountingTask::Leaf(files);
        }
        let (first, second) = files.split_at(files.len().div_ceil(2));
        CountingTask::Split(
            Box::new(Self::plan(first, single_task_max_size)),
            Box::new(Self::plan(second, single_task_max_size)),
        )
    }

    fn leaves(&self) -> usize {
        match self {
            CountingTask::Leaf(_) => 1,
            CountingTask::Split(first, second) => first.leaves() + second.leaves(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            CountingTask::Leaf(_) => 0,
            CountingTask::Split(first, second) => 1 + first.depth().max(second.depth()),
        }
    }

    fn compute<F>(self, count_leaf: &F) -> WordCounter
    where
        F: Fn(&[PathBuf]) -> WordCounter + Sync,
    {
        match self {
            CountingTask::Leaf(files) => count_leaf(files),
            CountingTask::Split(first, second) => {
                // `first` is offered to idle workers while this worker counts
                // `second`. A worker waiting on the join keeps running queued tasks.
                let (mut counter, first_counter) = rayon::join(
                    move || second.compute(count_leaf),
                    move || first.compute(count_leaf),
                );
                counter.merge_in(first_counter);
                counter
            }
        }
    }
}

impl ForkJoinWordCounting {
    /// Runs the split/merge tree with `count_leaf` counting each leaf batch.
    fn count_words_with<F>(
        &self,
        files: &[PathBuf],
        count_leaf: F,
    ) -> Result<WordCounter, CountError>
    where
        F: Fn(&[PathBuf]) -> WordCounter + Sync,
    {
        let mut builder =
            ThreadPoolBuilder::new().thread_name(|i| format!("wordfreq-fork-join-{i}"));
        if let Some(threads) = self.threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build()?;

        let task = CountingTask::plan(files, self.single_task_max_size);
        log::debug!(
            "fork/join: {} files, {} leaves, depth {}, {} threads",
            files.len(),
            task.leaves(),
            task.depth(),
            pool.current_num_threads()
        );

        // The pool is dropped, and its threads released, on both paths.
        let count_leaf = &count_leaf;
        panic::catch_unwind(AssertUnwindSafe(|| {
            pool.install(move || task.compute(count_leaf))
        }))
        .map_err(|_| CountError::TaskPanicked)
    }
}

impl WordCountingService for ForkJoinWordCounting {
    fn count_words(&self, files: &[PathBuf]) -> Result<WordCounter, CountError> {
        self.count_words_with(files, count_batch)
    }
}
