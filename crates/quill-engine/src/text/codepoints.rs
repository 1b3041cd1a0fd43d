use std::ops::RangeInclusive;

/// Sorted, non-overlapping inclusive ranges of Unicode scalar values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodepointRanges {
    pub ranges: Vec<RangeInclusive<u32>>,
}

impl CodepointRanges {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merges runs of consecutive code points. `chars` must be sorted;
    /// duplicates are fine.
    pub fn from_sorted_chars(chars: &[char]) -> Self {
        let mut ranges: Vec<RangeInclusive<u32>> = Vec::new();
        for &ch in chars {
            let cp = u32::from(ch);
            match ranges.last_mut() {
                Some(last) if cp <= last.end().saturating_add(1) => {
                    debug_assert!(cp >= *last.start(), "chars must be sorted");
                    if cp > *last.end() {
                        *last = *last.start()..=cp;
                    }
                }
                _ => ranges.push(cp..=cp),
            }
        }
        Self { ranges }
    }

    /// Sorts and dedups the characters of `text`, then merges them.
    pub fn from_text(text: &str) -> Self {
        let mut chars: Vec<char> = text.chars().collect();
        chars.sort_unstable();
        chars.dedup();
        Self::from_sorted_chars(&chars)
    }

    /// Iterates valid `char`s in every range. Surrogates are skipped.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.ranges
            .iter()
            .flat_map(|r| r.clone())
            .filter_map(char::from_u32)
    }

    pub fn contains(&self, ch: char) -> bool {
        let cp = u32::from(ch);
        self.ranges.iter().any(|r| r.contains(&cp))
    }
}
