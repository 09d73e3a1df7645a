use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::time::{Duration, Instant};

/// Initial vocabulary size a fresh counter is sized for.
const DEFAULT_CAPACITY: usize = 4096;

/// Exported, immutable (word, count) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

impl WordCount {
    pub fn new(word: impl Into<String>, count: u64) -> Self {
        WordCount {
            word: word.into(),
            count,
        }
    }
}

// Order by count, then by the reversed word comparison, so that among equal
// counts the alphabetically smaller word is the greater one.
impl Ord for WordCount {
    fn cmp(&self, other: &Self) -> Ordering {
        self.count
            .cmp(&other.count)
            .then_with(|| other.word.cmp(&self.word))
    }
}

impl PartialOrd for WordCount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for WordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\":{}", self.word, self.count)
    }
}

/// Diagnostic counters carried next to the word counts.
/// Reporting only; nothing in the counting path reads them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterStats {
    pub merge_count: u64,
    pub merge_time: Duration,
    pub batch_count: u64,
    pub batch_time: Duration,
    pub files_processed: u64,
    pub files_failed: u64,
}

impl CounterStats {
    /// Adds another accumulator's history into this one.
    fn absorb(&mut self, other: &CounterStats) {
        self.merge_count += other.merge_count;
        self.merge_time += other.merge_time;
        self.batch_count += other.batch_count;
        self.batch_time += other.batch_time;
        self.files_processed += other.files_processed;
        self.files_failed += other.files_failed;
    }
}

/// HashMap backed collection of word occurrence counts.
///
/// Not synchronised: a counter is owned by exactly one task at a time and is
/// moved, never shared, when partial results are combined.
#[derive(Debug, Clone)]
pub struct WordCounter {
    counts: HashMap<String, u64>,
    stats: CounterStats,
}

impl Default for WordCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl WordCounter {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        WordCounter {
            counts: HashMap::with_capacity(capacity),
            stats: CounterStats::default(),
        }
    }

    /// Records one occurrence of an already normalized word.
    pub fn count_word(&mut self, word: &str) {
        debug_assert!(!word.is_empty(), "empty words are never counted");
        // Avoid allocating a key for words that are already present.
        if let Some(count) = self.counts.get_mut(word) {
            *count += 1;
        } else {
            self.counts.insert(word.to_owned(), 1);
        }
    }

    /// Adds all counts of `other` into `self` and returns `self` for chaining.
    ///
    /// `other` is consumed. The smaller of the two maps is the one re-hashed:
    /// when `other` is larger, the maps are swapped first.
    pub fn merge_in(&mut self, other: WordCounter) -> &mut Self {
        let before = Instant::now();
        let WordCounter {
            counts: mut other_counts,
            stats: other_stats,
        } = other;

        if other_counts.len() > self.counts.len() {
            std::mem::swap(&mut self.counts, &mut other_counts);
        }
        for (word, count) in other_counts {
            *self.counts.entry(word).or_insert(0) += count;
        }

        self.stats.absorb(&other_stats);
        self.stats.merge_count += 1;
        self.stats.merge_time += before.elapsed();
        self
    }

    /// Number of distinct words.
    pub fn size(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of word occurrences.
    pub fn total_count(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Occurrences of `word`, 0 if it was never seen.
    pub fn count(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn word_count(&self, word: &str) -> Option<WordCount> {
        self.counts
            .get_key_value(word)
            .map(|(w, &c)| WordCount::new(w.clone(), c))
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn word_counts(&self) -> impl Iterator<Item = WordCount> + '_ {
        self.counts
            .iter()
            .map(|(w, &c)| WordCount::new(w.clone(), c))
    }

    /// Owned snapshot of word -> count.
    pub fn to_map(&self) -> HashMap<String, u64> {
        self.counts.clone()
    }

    /// The `k` greatest entries, greatest first.
    ///
    /// This is a full scan with a min-heap bounded to `k` entries, so it costs
    /// O(n log k). It is meant to be run once on the final aggregate.
    pub fn top_words(&self, k: usize) -> Vec<WordCount> {
        if k == 0 {
            return Vec::new();
        }
        let mut heap: BinaryHeap<Reverse<WordCount>> = BinaryHeap::with_capacity(k + 1);
        for (word, &count) in &self.counts {
            if heap.len() == k {
                // Skip entries that cannot displace the current minimum without
                // cloning their key.
                let Some(Reverse(min)) = heap.peek() else {
                    break;
                };
                let beats_min = count
                    .cmp(&min.count)
                    .then_with(|| min.word.as_str().cmp(word.as_str()))
                    == Ordering::Greater;
                if !beats_min {
                    continue;
                }
                heap.pop();
            }
            heap.push(Reverse(WordCount::new(word.clone(), count)));
        }
        // Ascending order of Reverse<_> is descending order of WordCount.
        heap.into_sorted_vec()
            .into_iter()
            .map(|Reverse(wc)| wc)
            .collect()
    }

    /// Books one batch worth of work.
    pub fn update_batch_stats(&mut self, batch_size: usize, elapsed: Duration) {
        self.stats.batch_count += 1;
        self.stats.batch_time += elapsed;
        self.stats.files_processed += batch_size as u64;
    }

    pub(crate) fn record_failed_files(&mut self, failed: usize) {
        self.stats.files_failed += failed as u64;
    }

    pub fn stats(&self) -> &CounterStats {
        &self.stats
    }

    pub fn performance_summary(&self) -> String {
        let s = &self.stats;
        let per = |total: Duration, n: u64| {
            if n == 0 {
                0.0
            } else {
                total.as_secs_f64() * 1000.0 / n as f64
            }
        };
        format!(
            "{files} files ({failed} unreadable) in {batches} batches, {batch_ms} ms ({batch_avg:.2} ms/batch); \
             {merges} merges in {merge_ms} ms ({merge_avg:.2} ms/merge)",
            files = s.files_processed,
            failed = s.files_failed,
            batches = s.batch_count,
            batch_ms = s.batch_time.as_millis(),
            batch_avg = per(s.batch_time, s.batch_count),
            merges = s.merge_count,
            merge_ms = s.merge_time.as_millis(),
            merge_avg = per(s.merge_time, s.merge_count),
        )
    }
}

/// Counts compare equal when they hold the same words with the same counts.
/// Statistics are ignored.
impl PartialEq for WordCounter {
    fn eq(&self, other: &Self) -> bool {
        self.counts == other.counts
    }
}

impl Eq for WordCounter {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::seq::{IndexedRandom, SliceRandom};

    fn counter_of(words: &[&str]) -> WordCounter {
        let mut wc = WordCounter::new();
        for w in words {
            wc.count_word(w);
        }
        wc
    }

    #[test]
    fn basic_functionality() {
        let mut wc = WordCounter::new();
        assert_eq!(wc.size(), 0);
        assert_eq!(wc.count("a"), 0);

        wc.count_word("a");
        assert_eq!(wc.size(), 1);
        assert_eq!(wc.count("a"), 1);
        assert_eq!(wc.count("b"), 0);

        wc.count_word("b");
        wc.count_word("a");
        assert_eq!(wc.size(), 2);
        assert_eq!(wc.count("a"), 2);
        assert_eq!(wc.count("b"), 1);
        assert_eq!(wc.total_count(), 3);
        assert_eq!(wc.word_count("a"), Some(WordCount::new("a", 2)));
        assert_eq!(wc.word_count("z"), None);
    }

    #[test]
    fn merge_into_empty() {
        let mut wc0 = WordCounter::new();
        wc0.merge_in(counter_of(&["a", "b", "a", "b", "a", "c"]));
        assert_eq!(wc0.count("a"), 3);
        assert_eq!(wc0.count("b"), 2);
        assert_eq!(wc0.count("c"), 1);
        assert_eq!(wc0.size(), 3);
    }

    #[test]
    fn merge_sums_overlapping_words() {
        let mut wc0 = counter_of(&["a", "d", "d"]);
        wc0.merge_in(counter_of(&["a", "b", "a", "b", "a", "c"]));
        let mut words: Vec<&str> = wc0.words().collect();
        words.sort_unstable();
        assert_eq!(words, ["a", "b", "c", "d"]);
        assert_eq!(wc0.count("a"), 4);
        assert_eq!(wc0.count("b"), 2);
        assert_eq!(wc0.count("c"), 1);
        assert_eq!(wc0.count("d"), 2);
    }

    #[test]
    fn merge_is_symmetric_in_size() {
        let small = counter_of(&["x", "y"]);
        let large = counter_of(&["x", "a", "b", "c", "d"]);

        let mut left = small.clone();
        left.merge_in(large.clone());
        let mut right = large;
        right.merge_in(small);

        assert_eq!(left, right);
        assert_eq!(left.count("x"), 2);
        assert_eq!(left.size(), 6);
    }

    #[test]
    fn merge_order_does_not_matter() {
        let parts = [
            counter_of(&["the", "cat", "sat"]),
            counter_of(&["on", "the", "mat"]),
            counter_of(&["the", "end", "the"]),
            counter_of(&["cat", "cat"]),
        ];

        let mut reference = WordCounter::new();
        for p in parts.iter().cloned() {
            reference.merge_in(p);
        }

        // (a + b) + (c + d)
        let mut ab = parts[0].clone();
        ab.merge_in(parts[1].clone());
        let mut cd = parts[2].clone();
        cd.merge_in(parts[3].clone());
        cd.merge_in(ab);
        assert_eq!(cd, reference);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let mut shuffled = parts.to_vec();
            shuffled.shuffle(&mut rng);
            let mut iter = shuffled.into_iter();
            let mut acc = iter.next().unwrap();
            for p in iter {
                acc.merge_in(p);
            }
            assert_eq!(acc, reference);
        }
    }

    #[test]
    fn merge_chains_and_accumulates_stats() {
        let mut a = counter_of(&["a"]);
        let mut b = counter_of(&["b"]);
        b.merge_in(counter_of(&["c"]));
        a.update_batch_stats(3, Duration::from_millis(5));
        b.update_batch_stats(2, Duration::from_millis(7));

        a.merge_in(b).merge_in(counter_of(&["d"]));

        assert_eq!(a.size(), 4);
        let stats = a.stats();
        assert_eq!(stats.merge_count, 3);
        assert_eq!(stats.batch_count, 2);
        assert_eq!(stats.files_processed, 5);
        assert!(stats.batch_time >= Duration::from_millis(12));
    }

    #[test]
    fn top_k_orders_by_count_then_word() {
        let mut wc0 = counter_of(&["a", "d", "d"]);
        wc0.merge_in(counter_of(&["a", "b", "a", "b", "a", "c"]));

        assert_eq!(
            wc0.top_words(4),
            vec![
                WordCount::new("a", 4),
                WordCount::new("b", 2),
                WordCount::new("d", 2),
                WordCount::new("c", 1),
            ]
        );
        assert_eq!(
            wc0.top_words(2),
            vec![WordCount::new("a", 4), WordCount::new("b", 2)]
        );
    }

    #[test]
    fn top_k_bounds() {
        let wc = counter_of(&["x", "y", "y", "z"]);
        assert!(wc.top_words(0).is_empty());
        assert_eq!(wc.top_words(1), vec![WordCount::new("y", 2)]);
        assert_eq!(wc.top_words(100).len(), 3);
        assert!(WordCounter::new().top_words(5).is_empty());
    }

    #[test]
    fn top_k_matches_full_sort() {
        let mut rng = StdRng::seed_from_u64(42);
        let vocab: Vec<String> = (0..200).map(|i| format!("w{i:03}")).collect();
        let mut wc = WordCounter::new();
        for _ in 0..5_000 {
            let w = vocab.choose(&mut rng).unwrap();
            wc.count_word(w);
        }

        let mut sorted: Vec<WordCount> = wc.word_counts().collect();
        sorted.sort_by(|a, b| b.cmp(a));
        for k in [1, 7, 50, 200, 300] {
            let top = wc.top_words(k);
            assert_eq!(top.len(), k.min(wc.size()));
            assert_eq!(top[..], sorted[..top.len()]);
        }
    }

    #[test]
    fn word_count_display_and_order() {
        assert_eq!(WordCount::new("abc", 3).to_string(), "\"abc\":3");
        assert!(WordCount::new("a", 2) > WordCount::new("z", 1));
        assert!(WordCount::new("a", 2) > WordCount::new("b", 2));
        assert_ne!(WordCount::new("a", 2), WordCount::new("a", 3));
    }

    #[test]
    fn snapshot_matches_lookups() {
        let wc = counter_of(&["one", "two", "two"]);
        let map = wc.to_map();
        assert_eq!(map.len(), wc.size());
        assert!(map.iter().all(|(w, &c)| wc.count(w) == c));
    }

    #[test]
    fn summary_mentions_merges() {
        let mut wc = counter_of(&["a"]);
        wc.merge_in(counter_of(&["b"]));
        let summary = wc.performance_summary();
        assert!(summary.contains("1 merges"), "{summary}");
    }
}
