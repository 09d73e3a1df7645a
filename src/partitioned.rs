use crate::batch::count_batch;
use crate::error::CountError;
use crate::service::WordCountingService;
use crate::word_counter::WordCounter;
use std::path::PathBuf;
use std::thread;

/// Splits the file list up front into one contiguous slice per worker, counts
/// the slices on their own threads and folds the results in slice order.
#[derive(Debug, Clone)]
pub struct PartitionedWordCounting {
    num_workers: usize,
}

impl PartitionedWordCounting {
    pub fn new(num_workers: usize) -> Result<Self, CountError> {
        if num_workers == 0 {
            return Err(CountError::InvalidArgument(
                "worker count must be at least 1".into(),
            ));
        }
        Ok(PartitionedWordCounting { num_workers })
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }
}

/// Exactly `num_workers` contiguous slices of `ceil(len / num_workers)` files.
/// Trailing slices may be shorter, or empty when there are fewer files than workers.
fn partition<T>(files: &[T], num_workers: usize) -> Vec<&[T]> {
    let per_task = files.len().div_ceil(num_workers);
    (0..num_workers)
        .map(|i| {
            let start = (i * per_task).min(files.len());
            let end = (start + per_task).min(files.len());
            &files[start..end]
        })
        .collect()
}

impl PartitionedWordCounting {
    fn count_words_with<F>(
        &self,
        files: &[PathBuf],
        count_slice: F,
    ) -> Result<WordCounter, CountError>
    where
        F: Fn(&[PathBuf]) -> WordCounter + Sync,
    {
        let slices = partition(files, self.num_workers);
        log::debug!(
            "partitioned: {} files over {} workers, {} per worker",
            files.len(),
            self.num_workers,
            slices.first().map_or(0, |s| s.len())
        );

        // Every worker is joined before the scope ends, whatever the outcome.
        let count_slice = &count_slice;
        let results = thread::scope(|s| {
            let handles = slices
                .into_iter()
                .map(|slice| s.spawn(move || count_slice(slice)))
                .collect::<Vec<_>>();

            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Vec<_>>()
        });

        let mut aggregate: Option<WordCounter> = None;
        for (worker, joined) in results.into_iter().enumerate() {
            let counter = joined.map_err(|_| CountError::WorkerPanicked { worker })?;
            match aggregate.as_mut() {
                Some(total) => {
                    total.merge_in(counter);
                }
                None => aggregate = Some(counter),
            }
        }
        Ok(aggregate.unwrap_or_default())
    }
}

impl WordCountingService for PartitionedWordCounting {
    fn count_words(&self, files: &[PathBuf]) -> Result<WordCounter, CountError> {
        self.count_words_with(files, count_batch)
    }
}
