use crate::batch::count_words_in_files;
use crate::error::CountError;
use crate::word_counter::WordCounter;
use std::path::PathBuf;

/// Common interface of the single threaded and parallel counting strategies.
///
/// Every implementation tokenizes the given files the same way and returns the
/// counts of unique words. Unreadable files are logged and skipped; an `Err` means
/// the run itself failed and no partial result is available.
pub trait WordCountingService {
    fn count_words(&self, files: &[PathBuf]) -> Result<WordCounter, CountError>;
}

/// Counts all files on the calling thread into one counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialWordCounting;

impl WordCountingService for SerialWordCounting {
    fn count_words(&self, files: &[PathBuf]) -> Result<WordCounter, CountError> {
        let mut counter = WordCounter::new();
        count_words_in_files(files, &mut counter);
        Ok(counter)
    }
}
