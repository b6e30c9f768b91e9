use crate::{
    draw::DrawState,
    entry::LotteryEntry,
};

/// Panics on an empty number; only for fixtures.
pub fn entry(number: &str, display_name: &str) -> LotteryEntry {
    LotteryEntry::new(number, display_name).unwrap()
}

pub fn pool(rows: &[(&str, &str)]) -> Vec<LotteryEntry> {
    rows.iter().map(|(number, name)| entry(number, name)).collect()
}

/// Owned `(number, name)` rows as accepted by `DrawEvent::LoadPool`.
pub fn rows(rows: &[(&str, &str)]) -> Vec<(String, String)> {
    rows.iter()
        .map(|(number, name)| (number.to_string(), name.to_string()))
        .collect()
}

/// A draw state holding `rows` with nobody drawn yet.
pub fn draw_state_with(rows: &[(&str, &str)]) -> DrawState {
    DrawState::with_pool(pool(rows))
}
