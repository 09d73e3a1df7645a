//! Counting words in a batch of files, and finding the files to count.

use crate::error::{CountError, FileReadError};
use crate::punctuation;
use crate::word_counter::WordCounter;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Counts every word readable from `reader` into `counter`.
///
/// Lines are split on whitespace, stripped of edge punctuation and lower-cased.
/// Bytes that are not valid UTF-8 are replaced with U+FFFD rather than failing
/// the line; only real I/O errors are returned.
pub fn count_words_from_reader<R: BufRead>(
    mut reader: R,
    counter: &mut WordCounter,
) -> io::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        for word in punctuation::tokenize(line) {
            counter.count_word(&word);
        }
    }
    Ok(())
}

fn count_words_in_file(path: &Path, counter: &mut WordCounter) -> io::Result<()> {
    let file = File::open(path)?;
    count_words_from_reader(BufReader::new(file), counter)
}

/// Counts the words of all `files` into `counter`.
///
/// A file that cannot be opened or read is logged and skipped; the rest of the
/// batch is still counted. Words read from a file before it failed stay counted.
/// Bad encoding is not a read failure.
/// The skipped files are returned.
pub fn count_words_in_files<P: AsRef<Path>>(
    files: &[P],
    counter: &mut WordCounter,
) -> Vec<FileReadError> {
    let before = Instant::now();
    let mut failures = Vec::new();
    for path in files {
        let path: &Path = path.as_ref();
        // The file handle is dropped when this call returns, on error as well.
        if let Err(source) = count_words_in_file(path, counter) {
            log::error!("cannot read {}: {source}", path.display());
            failures.push(FileReadError {
                path: path.to_path_buf(),
                source,
            });
        }
    }
    counter.record_failed_files(failures.len());
    counter.update_batch_stats(files.len(), before.elapsed());
    failures
}

/// Counts `files` into a fresh counter. Per-file failures are logged and recorded
/// in the counter's stats.
pub(crate) fn count_batch(files: &[PathBuf]) -> WordCounter {
    let mut counter = WordCounter::new();
    count_words_in_files(files, &mut counter);
    counter
}

/// All files below `dir` (recursively) whose name ends with `extension`, e.g. ".txt".
/// Sorted, so that repeated runs split the list at the same places.
pub fn files_in_dir_with_extension(
    dir: impl AsRef<Path>,
    extension: &str,
) -> Result<Vec<PathBuf>, CountError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.file_name().to_string_lossy().ends_with(extension)
        {
            files.push(entry.into_path());
        }
    }
    files.sort();
    log::debug!("found {} files ending in {extension:?}", files.len());
    Ok(files)
}
