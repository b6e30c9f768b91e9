use crate::error::{
    LotteryError,
    Result,
};
use serde::{
    Deserialize,
    Serialize,
};

/// A lottery number and the name shown when it wins.
///
/// Two entries are the same candidate when their numbers are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawEntry")]
pub struct LotteryEntry {
    number: String,
    display_name: String,
}

#[derive(Deserialize)]
struct RawEntry {
    number: String,
    #[serde(default)]
    display_name: String,
}

impl TryFrom<RawEntry> for LotteryEntry {
    type Error = LotteryError;

    fn try_from(raw: RawEntry) -> Result<Self> {
        LotteryEntry::new(raw.number, raw.display_name)
    }
}

impl LotteryEntry {
    pub fn new(number: impl Into<String>, display_name: impl Into<String>) -> Result<Self> {
        let number = number.into();
        if number.is_empty() {
            return Err(LotteryError::validation(
                "lottery number must have at least one digit",
            ));
        }
        Ok(Self {
            number,
            display_name: display_name.into(),
        })
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn width(&self) -> usize {
        self.number.chars().count()
    }

    pub fn same_number(&self, other: &LotteryEntry) -> bool {
        self.number == other.number
    }

    /// Digits from least to most significant.
    pub fn reversed_digits(&self) -> impl Iterator<Item = char> + '_ {
        self.number.chars().rev()
    }

    /// Whether the number, read from its last digit, starts with `decided`.
    /// A number shorter than `decided` never matches.
    pub fn matches_decided(&self, decided: &[char]) -> bool {
        let mut digits = self.reversed_digits();
        decided.iter().all(|d| digits.next() == Some(*d))
    }

    /// Digit `position` counted from the least significant one.
    pub fn digit_from_right(&self, position: usize) -> Option<char> {
        self.reversed_digits().nth(position)
    }

    /// The number as one symbol per character, left padded to `width`.
    pub fn padded_symbols(&self, width: usize, padding: &str) -> Vec<String> {
        let missing = width.saturating_sub(self.width());
        std::iter::repeat_n(padding.to_string(), missing)
            .chain(self.number.chars().map(String::from))
            .collect()
    }
}

/// Entries of `pool` whose number has not been drawn yet.
pub fn active_entries<'a>(
    pool: &'a [LotteryEntry],
    winners: &'a [LotteryEntry],
) -> impl Iterator<Item = &'a LotteryEntry> + 'a {
    pool.iter()
        .filter(move |entry| !winners.iter().any(|w| w.same_number(entry)))
}

/// Widest number among `entries`, zero when there are none.
pub fn max_width<'a>(entries: impl IntoIterator<Item = &'a LotteryEntry>) -> usize {
    entries.into_iter().map(LotteryEntry::width).max().unwrap_or(0)
}

/// Candidate digits per position, least significant first.
///
/// Positions already decided hold only the decided digit. The remaining
/// positions, up to the widest matching entry, hold that digit of every entry
/// matching the decided prefix (`'0'` where an entry is shorter).
pub fn digit_columns<'a>(
    entries: impl IntoIterator<Item = &'a LotteryEntry>,
    decided: &[char],
) -> Vec<Vec<char>> {
    let matching: Vec<&LotteryEntry> = entries
        .into_iter()
        .filter(|entry| entry.matches_decided(decided))
        .collect();
    let width = max_width(matching.iter().copied());

    decided
        .iter()
        .map(|d| vec![*d])
        .chain((decided.len()..width).map(|position| {
            matching
                .iter()
                .map(|entry| entry.digit_from_right(position).unwrap_or('0'))
                .collect()
        }))
        .collect()
}
