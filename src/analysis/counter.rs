//! Mergeable frequency counters

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Word → count multiset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordCounter(BTreeMap<String, u64>);

impl WordCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, word: &str, count: u64) {
        if count == 0 {
            return;
        }
        *self.0.entry(word.to_string()).or_insert(0) += count;
    }

    /// Add every count of `other` into this counter
    pub fn merge(&mut self, other: &WordCounter) {
        for (word, count) in &other.0 {
            self.add(word, *count);
        }
    }

    pub fn get(&self, word: &str) -> u64 {
        self.0.get(word).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `k` most frequent words, count descending, ties by word ascending
    pub fn most_common(&self, k: usize) -> Vec<(String, u64)> {
        let mut entries: Vec<(&String, &u64)> = self.0.iter().collect();
        // BTreeMap iteration is already word-ascending, so a stable sort keeps ties ordered
        entries.sort_by(|a, b| b.1.cmp(a.1));
        entries
            .into_iter()
            .take(k)
            .map(|(word, count)| (word.clone(), *count))
            .collect()
    }
}

impl<S: AsRef<str>> FromIterator<(S, u64)> for WordCounter {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counter = WordCounter::new();
        for (word, count) in iter {
            counter.add(word.as_ref(), count);
        }
        counter
    }
}

/// Word length → number of words with that length
///
/// Text formats write the lengths as string keys; both string and integer
/// keys are accepted when reading back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LengthHistogram(BTreeMap<usize, u64>);

impl LengthHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, length: usize) {
        *self.0.entry(length).or_insert(0) += 1;
    }

    pub fn merge(&mut self, other: &LengthHistogram) {
        for (length, count) in &other.0 {
            *self.0.entry(*length).or_insert(0) += count;
        }
    }

    pub fn get(&self, length: usize) -> u64 {
        self.0.get(&length).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.0.iter().map(|(length, count)| (*length, *count))
    }
}

impl<'de> Deserialize<'de> for LengthHistogram {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<LengthKey, u64>::deserialize(deserializer)?;
        Ok(Self(entries.into_iter().map(|(key, count)| (key.0, count)).collect()))
    }
}

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct LengthKey(usize);

impl<'de> Deserialize<'de> for LengthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LengthKeyVisitor)
    }
}

struct LengthKeyVisitor;

impl Visitor<'_> for LengthKeyVisitor {
    type Value = LengthKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a word length as an integer or decimal string")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<LengthKey, E> {
        usize::try_from(value)
            .map(LengthKey)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<LengthKey, E> {
        value
            .parse()
            .map(LengthKey)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
    }
}
