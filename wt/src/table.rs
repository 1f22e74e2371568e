//! Shared word frequency table
//!
//! One mutex guards the whole map. Every read and write takes it, and no I/O
//! happens while it is held.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;
use tracing::debug;

use crate::tokenizer::Word;

/// Errors from the frequency table
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Table full ({capacity} distinct words), dropped occurrence of '{word}'")]
    CapacityExceeded { capacity: usize, word: String },

    #[error("Frequency table lock poisoned")]
    Poisoned,
}

/// Point-in-time copy of the table, sorted by descending count then ascending word
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: Vec<(Word, u64)>,
}

impl Snapshot {
    pub fn entries(&self) -> &[(Word, u64)] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(word, count)| (word.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

/// Word to occurrence count map shared by all reader tasks and the reporter
#[derive(Debug, Default)]
pub struct FrequencyTable {
    counts: Mutex<HashMap<Word, u64>>,
    capacity: Option<usize>,
}

impl FrequencyTable {
    /// Create an unbounded table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table holding at most `capacity` distinct words
    ///
    /// The limit only caps insertions; the map still grows on demand.
    pub fn with_capacity_limit(capacity: usize) -> Self {
        debug!(capacity, "FrequencyTable::with_capacity_limit: called");
        Self {
            counts: Mutex::new(HashMap::new()),
            capacity: Some(capacity),
        }
    }

    /// Distinct-word limit, None if unbounded
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Word, u64>>, TableError> {
        self.counts.lock().map_err(|_| TableError::Poisoned)
    }

    /// Count one occurrence of `word`, returning its new count
    ///
    /// A new word on a full table is not inserted and yields
    /// `TableError::CapacityExceeded`; existing words keep counting.
    pub fn record_occurrence(&self, word: Word) -> Result<u64, TableError> {
        let mut counts = self.lock()?;

        if let Some(count) = counts.get_mut(&word) {
            *count += 1;
            return Ok(*count);
        }

        if let Some(capacity) = self.capacity
            && counts.len() >= capacity
        {
            return Err(TableError::CapacityExceeded {
                capacity,
                word: word.into_string(),
            });
        }

        counts.insert(word, 1);
        Ok(1)
    }

    /// Sorted, consistent copy of the whole table
    pub fn snapshot_sorted(&self) -> Result<Snapshot, TableError> {
        let counts = self.lock()?;
        let mut entries: Vec<(Word, u64)> = counts.iter().map(|(word, count)| (word.clone(), *count)).collect();
        entries.sort_unstable_by(|(word_a, count_a), (word_b, count_b)| {
            count_b.cmp(count_a).then_with(|| word_a.cmp(word_b))
        });
        Ok(Snapshot { entries })
    }

    /// Current count for `word`, 0 if never seen
    pub fn count(&self, word: &str) -> Result<u64, TableError> {
        Ok(self.lock()?.get(word).copied().unwrap_or(0))
    }

    /// Number of distinct words
    pub fn len(&self) -> Result<usize, TableError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, TableError> {
        Ok(self.lock()?.is_empty())
    }

    /// Sum of all counts
    pub fn total(&self) -> Result<u64, TableError> {
        Ok(self.lock()?.values().sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    fn word(text: &str) -> Word {
        Word::new(text).unwrap()
    }

    fn record_n(table: &FrequencyTable, text: &str, n: usize) {
        for _ in 0..n {
            table.record_occurrence(word(text)).unwrap();
        }
    }

    #[test]
    fn test_record_inserts_then_increments() {
        let table = FrequencyTable::new();
        assert_eq!(table.record_occurrence(word("cat")).unwrap(), 1);
        assert_eq!(table.record_occurrence(word("cat")).unwrap(), 2);
        assert_eq!(table.record_occurrence(word("dog")).unwrap(), 1);

        assert_eq!(table.count("cat").unwrap(), 2);
        assert_eq!(table.count("bird").unwrap(), 0);
        assert_eq!(table.len().unwrap(), 2);
        assert_eq!(table.total().unwrap(), 3);
    }

    #[test]
    fn test_snapshot_tie_break() {
        let table = FrequencyTable::new();
        record_n(&table, "b", 3);
        record_n(&table, "c", 5);
        record_n(&table, "a", 3);

        let snapshot = table.snapshot_sorted().unwrap();
        let got: Vec<_> = snapshot.iter().collect();
        assert_eq!(got, vec![("c", 5), ("a", 3), ("b", 3)]);
    }

    #[test]
    fn test_empty_snapshot() {
        let table = FrequencyTable::new();
        let snapshot = table.snapshot_sorted().unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.total(), 0);
        assert!(table.is_empty().unwrap());
    }

    #[test]
    fn test_capacity_exceeded_drops_new_words_only() {
        let table = FrequencyTable::with_capacity_limit(2);
        record_n(&table, "one", 1);
        record_n(&table, "two", 1);

        let err = table.record_occurrence(word("three")).unwrap_err();
        assert!(matches!(err, TableError::CapacityExceeded { capacity: 2, ref word } if word == "three"));

        // Known words still count on a full table
        assert_eq!(table.record_occurrence(word("one")).unwrap(), 2);
        assert_eq!(table.len().unwrap(), 2);
        assert_eq!(table.count("three").unwrap(), 0);
    }

    #[test]
    fn test_huge_capacity_limit_does_not_preallocate() {
        let table = FrequencyTable::with_capacity_limit(usize::MAX);
        assert_eq!(table.capacity(), Some(usize::MAX));
        assert_eq!(table.record_occurrence(word("solo")).unwrap(), 1);
        assert_eq!(table.len().unwrap(), 1);
    }

    #[test]
    fn test_concurrent_records_lose_no_updates() {
        let table = Arc::new(FrequencyTable::new());
        let vocabulary = ["alpha", "beta", "gamma", "delta", "epsilon"];
        let threads = 16;
        let rounds = 500;

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let table = Arc::clone(&table);
                thread::spawn(move || {
                    for round in 0..rounds {
                        // Each thread records word i exactly (i + 1) times per round
                        for (i, text) in vocabulary.iter().enumerate() {
                            for _ in 0..=i {
                                table.record_occurrence(word(text)).unwrap();
                            }
                        }
                        if (round + t) % 50 == 0 {
                            thread::yield_now();
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        for (i, text) in vocabulary.iter().enumerate() {
            let expected = (threads * rounds * (i + 1)) as u64;
            assert_eq!(table.count(text).unwrap(), expected, "count for {text}");
        }
    }

    #[test]
    fn test_snapshot_consistent_while_writers_active() {
        let table = Arc::new(FrequencyTable::new());
        let stop = Arc::new(AtomicBool::new(false));
        let vocabulary = ["a", "b", "c", "d", "e", "f"];

        let writers: Vec<_> = (0..4)
            .map(|t| {
                let table = Arc::clone(&table);
                let stop = Arc::clone(&stop);
                thread::spawn(move || {
                    let mut i = t;
                    while !stop.load(Ordering::Relaxed) {
                        table.record_occurrence(word(vocabulary[i % vocabulary.len()])).unwrap();
                        i += 1;
                    }
                })
            })
            .collect();

        let mut previous: HashMap<String, u64> = HashMap::new();
        for _ in 0..200 {
            let snapshot = table.snapshot_sorted().unwrap();
            let entries = snapshot.entries();

            for pair in entries.windows(2) {
                let (word_a, count_a) = &pair[0];
                let (word_b, count_b) = &pair[1];
                assert!(count_a > count_b || (count_a == count_b && word_a < word_b));
            }

            let unique: HashSet<_> = entries.iter().map(|(w, _)| w.as_str()).collect();
            assert_eq!(unique.len(), entries.len());

            // Counts never go backwards between snapshots
            for (w, count) in snapshot.iter() {
                let before = previous.insert(w.to_string(), count).unwrap_or(0);
                assert!(count >= before);
            }
        }

        stop.store(true, Ordering::Relaxed);
        for writer in writers {
            writer.join().unwrap();
        }
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let table = Arc::new(FrequencyTable::new());
        let poisoner = Arc::clone(&table);
        let result = thread::spawn(move || {
            let _guard = poisoner.counts.lock().unwrap();
            panic!("poison the table");
        })
        .join();
        assert!(result.is_err());

        assert!(matches!(table.record_occurrence(word("x")), Err(TableError::Poisoned)));
        assert!(matches!(table.snapshot_sorted(), Err(TableError::Poisoned)));
    }
}
