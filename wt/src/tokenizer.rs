//! Tokenizer - splits a byte stream into case-normalized alphabetic words
//!
//! A word is a maximal run of ASCII alphabetic bytes. Every other byte,
//! including non-ASCII bytes, is a delimiter. A word still in progress when
//! the stream ends (or fails) is emitted rather than dropped.

use std::borrow::Borrow;
use std::fmt;
use std::io::{self, BufReader, Bytes, Read};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default maximum word length in characters
pub const DEFAULT_MAX_WORD_LEN: usize = 127;

/// A lower-cased, non-empty run of ASCII letters
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word(String);

impl Word {
    /// Normalize `text` into a Word
    ///
    /// Returns None if `text` is empty or contains anything but ASCII letters.
    /// No length bound is applied here; the tokenizer enforces it.
    pub fn new(text: &str) -> Option<Self> {
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_alphabetic()) {
            return None;
        }
        Some(Self(text.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Word {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// What to do with a run longer than the maximum word length
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Keep the first `max_word_len` characters, discard the rest of the run
    #[default]
    Truncate,
    /// Drop the whole run
    Reject,
}

/// Tokenizer options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerOptions {
    pub max_word_len: usize,
    pub overflow: OverflowPolicy,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            max_word_len: DEFAULT_MAX_WORD_LEN,
            overflow: OverflowPolicy::Truncate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    OutOfWord,
    InWord,
}

/// Lazy, non-restartable sequence of words read from a byte source
pub struct Tokenizer<R: Read> {
    bytes: Bytes<BufReader<R>>,
    options: TokenizerOptions,
    state: State,
    buf: String,
    overflowed: bool,
    done: bool,
    error: Option<io::Error>,
    rejected: u64,
}

/// Tokenize `source` with default options
pub fn tokenize<R: Read>(source: R) -> Tokenizer<R> {
    Tokenizer::with_options(source, TokenizerOptions::default())
}

impl<R: Read> Tokenizer<R> {
    pub fn with_options(source: R, options: TokenizerOptions) -> Self {
        Self {
            bytes: BufReader::new(source).bytes(),
            options,
            state: State::OutOfWord,
            buf: String::new(),
            overflowed: false,
            done: false,
            error: None,
            rejected: 0,
        }
    }

    /// The read error that ended the stream, if it did not end cleanly
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Number of over-long runs dropped under `OverflowPolicy::Reject`
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    fn push(&mut self, byte: u8) {
        self.state = State::InWord;
        if self.buf.len() < self.options.max_word_len {
            self.buf.push(byte.to_ascii_lowercase() as char);
        } else {
            self.overflowed = true;
        }
    }

    fn finish_word(&mut self) -> Option<Word> {
        if self.state == State::OutOfWord {
            return None;
        }
        self.state = State::OutOfWord;

        let overflowed = std::mem::take(&mut self.overflowed);
        let text = std::mem::take(&mut self.buf);

        if overflowed && self.options.overflow == OverflowPolicy::Reject {
            debug!(prefix = %text, "Rejected over-long word");
            self.rejected += 1;
            return None;
        }
        if text.is_empty() {
            // max_word_len of zero
            return None;
        }
        Some(Word(text))
    }
}

impl<R: Read> Iterator for Tokenizer<R> {
    type Item = Word;

    fn next(&mut self) -> Option<Word> {
        while !self.done {
            match self.bytes.next() {
                Some(Ok(byte)) if byte.is_ascii_alphabetic() => self.push(byte),
                Some(Ok(_)) => {
                    if let Some(word) = self.finish_word() {
                        return Some(word);
                    }
                }
                Some(Err(e)) => {
                    self.error = Some(e);
                    self.done = true;
                }
                None => self.done = true,
            }
        }
        self.finish_word()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn words(input: &str) -> Vec<String> {
        tokenize(input.as_bytes()).map(Word::into_string).collect()
    }

    fn words_with(input: &str, options: TokenizerOptions) -> Vec<String> {
        Tokenizer::with_options(input.as_bytes(), options)
            .map(Word::into_string)
            .collect()
    }

    /// Yields `data`, then fails
    struct FailingReader {
        data: Vec<u8>,
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
            }
            self.served = true;
            let n = self.data.len().min(buf.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            Ok(n)
        }
    }

    #[test]
    fn test_splits_on_punctuation_and_lowercases() {
        assert_eq!(words("Hello, World! foo-bar"), vec!["hello", "world", "foo", "bar"]);
    }

    #[test]
    fn test_trailing_word_is_flushed() {
        assert_eq!(words("abc"), vec!["abc"]);
        assert_eq!(words("one two"), vec!["one", "two"]);
    }

    #[test]
    fn test_empty_and_delimiter_only_input() {
        assert!(words("").is_empty());
        assert!(words(" \n\t123 ,.;").is_empty());
    }

    #[test]
    fn test_digits_and_non_ascii_are_delimiters() {
        assert_eq!(words("abc123def"), vec!["abc", "def"]);
        assert_eq!(words("café au lait"), vec!["caf", "au", "lait"]);
    }

    #[test]
    fn test_truncates_long_words() {
        let options = TokenizerOptions {
            max_word_len: 4,
            overflow: OverflowPolicy::Truncate,
        };
        assert_eq!(words_with("abcdefgh ij ABCD", options), vec!["abcd", "ij", "abcd"]);
    }

    #[test]
    fn test_rejects_long_words() {
        let options = TokenizerOptions {
            max_word_len: 4,
            overflow: OverflowPolicy::Reject,
        };
        let mut tokenizer = Tokenizer::with_options("abcdefgh ij abcd abcde".as_bytes(), options);
        let got: Vec<_> = tokenizer.by_ref().map(Word::into_string).collect();
        assert_eq!(got, vec!["ij", "abcd"]);
        assert_eq!(tokenizer.rejected(), 2);
    }

    #[test]
    fn test_default_bound_is_127() {
        let long = "a".repeat(300);
        let got = words(&long);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].len(), DEFAULT_MAX_WORD_LEN);
    }

    #[test]
    fn test_read_error_flushes_pending_word() {
        let reader = FailingReader {
            data: b"alpha bet".to_vec(),
            served: false,
        };
        let mut tokenizer = tokenize(reader);
        let got: Vec<_> = tokenizer.by_ref().map(Word::into_string).collect();
        assert_eq!(got, vec!["alpha", "bet"]);

        let err = tokenizer.take_error().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(tokenizer.next().is_none());
    }

    #[test]
    fn test_word_new_normalizes() {
        assert_eq!(Word::new("HeLLo").unwrap().as_str(), "hello");
        assert!(Word::new("").is_none());
        assert!(Word::new("it's").is_none());
    }

    proptest! {
        #[test]
        fn prop_words_are_lowercase_letters_within_bound(input in "\\PC{0,200}", max in 1usize..16) {
            let options = TokenizerOptions { max_word_len: max, overflow: OverflowPolicy::Truncate };
            for word in Tokenizer::with_options(input.as_bytes(), options) {
                prop_assert!(!word.is_empty());
                prop_assert!(word.len() <= max);
                prop_assert!(word.as_str().bytes().all(|b| b.is_ascii_lowercase()));
            }
        }

        #[test]
        fn prop_word_count_matches_alphabetic_runs(input in "[a-zA-Z0-9 ,.!\\n-]{0,200}") {
            let expected = input
                .split(|c: char| !c.is_ascii_alphabetic())
                .filter(|run| !run.is_empty())
                .count();
            prop_assert_eq!(tokenize(input.as_bytes()).count(), expected);
        }
    }
}
