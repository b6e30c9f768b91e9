//! Turns a chosen winner into one animated reel per digit.
//!
//! Every reel spins a random number of whole rotations and then lands on the
//! symbol of the winner's digit for that reel. Reels are returned left to
//! right (most significant digit first); the rightmost reel gets the fewest
//! rotations, so reels settle from right to left, in the same order the draw
//! state decides digits.

use crate::{
    config::{
        ReelContentMode,
        SlotConfig,
    },
    entry::{
        LotteryEntry,
        max_width,
    },
    error::{
        LotteryError,
        Result,
    },
    stops::{
        generate_stops,
        generate_stops_from,
    },
    timeline::ReelTimeline,
};
use itertools::Itertools;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Reels shown when nobody is left to draw.
pub const DRAW_COMPLETE_REELS: usize = 4;

/// All reels of one draw, most significant digit first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawAnimation {
    reels: Vec<ReelTimeline>,
}

impl DrawAnimation {
    pub fn new(reels: Vec<ReelTimeline>) -> Self {
        Self { reels }
    }

    /// Placeholder reels that never move.
    pub fn idle(element_height: u32, symbol: &str, reel_count: usize) -> Result<Self> {
        let reels = (0..reel_count)
            .map(|_| ReelTimeline::idle(element_height, symbol))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { reels })
    }

    pub fn reels(&self) -> &[ReelTimeline] {
        &self.reels
    }

    pub fn positions_at(&self, elapsed: Duration) -> Vec<i64> {
        self.reels.iter().map(|reel| reel.position_at(elapsed)).collect()
    }

    /// When the last reel stops.
    pub fn final_rest_time(&self) -> Duration {
        self.reels
            .iter()
            .map(ReelTimeline::final_rest_time)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    pub fn is_settled_at(&self, elapsed: Duration) -> bool {
        self.reels.iter().all(|reel| reel.is_settled_at(elapsed))
    }

    /// The symbols in the middle row once every reel has stopped.
    pub fn resting_symbols(&self) -> Vec<&str> {
        self.reels.iter().map(ReelTimeline::resting_symbol).collect()
    }
}

/// Symbols a reel can show: every character of the active numbers, the
/// configured alphabet and the padding symbol, sorted ignoring case.
pub fn display_alphabet(active: &[LotteryEntry], alphabet: &str, padding: &str) -> Vec<String> {
    active
        .iter()
        .flat_map(|entry| entry.number().chars())
        .chain(alphabet.chars())
        .map(String::from)
        .chain(std::iter::once(padding.to_string()))
        .unique()
        .sorted_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        })
        .collect()
}

/// Plans the reels for a draw that must end on `winner`.
///
/// `history` is the whole pool including earlier winners, so the number of
/// reels does not shrink as winners drop out. `winner` must be one of the
/// `active` entries.
pub fn plan_draw<R: Rng + ?Sized>(
    rng: &mut R,
    config: &SlotConfig,
    history: &[LotteryEntry],
    active: &[LotteryEntry],
    winner: &LotteryEntry,
) -> Result<DrawAnimation> {
    if active.is_empty() {
        debug!("no active candidates, showing idle reels");
        return DrawAnimation::idle(config.element_height, &config.padding, DRAW_COMPLETE_REELS);
    }
    if !active.iter().any(|entry| entry.same_number(winner)) {
        return Err(LotteryError::range(format!(
            "winner {} is not among the active candidates",
            winner.number()
        )));
    }

    let width = max_width(history.iter().chain(active));
    let rotations = rotation_counts(rng, config, width);
    let animation = match config.content_mode {
        ReelContentMode::Flat => plan_flat(rng, config, active, winner, width, &rotations)?,
        ReelContentMode::DigitFiltered => {
            plan_digit_filtered(rng, config, active, winner, width, &rotations)?
        }
    };
    debug!(
        winner = %winner.number(),
        reels = width,
        mode = ?config.content_mode,
        settles_after_ms = animation.final_rest_time().as_millis() as u64,
        "planned draw animation"
    );
    Ok(animation)
}

/// One rotation count per reel, strictly decreasing from the leftmost reel,
/// so every reel spins longer than the one to its right.
fn rotation_counts<R: Rng + ?Sized>(rng: &mut R, config: &SlotConfig, width: usize) -> Vec<u64> {
    let mut counts: Vec<u64> = (0..width)
        .map(|_| {
            if config.min_rotations < config.max_rotations {
                rng.random_range(config.min_rotations..config.max_rotations)
            } else {
                config.min_rotations
            }
        })
        .sorted_by(|a, b| b.cmp(a))
        .collect();
    // ties and zero counts would let a reel stop together with its right neighbour
    let mut floor = 0;
    for count in counts.iter_mut().rev() {
        *count = (*count).max(floor + 1);
        floor = *count;
    }
    counts
}

fn plan_flat<R: Rng + ?Sized>(
    rng: &mut R,
    config: &SlotConfig,
    active: &[LotteryEntry],
    winner: &LotteryEntry,
    width: usize,
    rotations: &[u64],
) -> Result<DrawAnimation> {
    let alphabet = display_alphabet(active, &config.alphabet, &config.padding);
    let cycle_len = alphabet.len() as u64;

    let reels = winner
        .padded_symbols(width, &config.padding)
        .iter()
        .zip(rotations)
        .map(|(symbol, rotation)| {
            let home = alphabet
                .iter()
                .position(|s| s == symbol)
                .ok_or_else(|| LotteryError::range(format!("symbol {symbol} missing from reel")))?
                as u64;
            let stops = generate_stops(
                rng,
                config.element_height,
                config.ms_per_step,
                config.start_index,
                config.min_stops,
                config.max_stops,
                rotation * cycle_len + home,
            )?;
            ReelTimeline::new(config.element_height, stops, alphabet.clone())
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(DrawAnimation::new(reels))
}

fn plan_digit_filtered<R: Rng + ?Sized>(
    rng: &mut R,
    config: &SlotConfig,
    active: &[LotteryEntry],
    winner: &LotteryEntry,
    width: usize,
    rotations: &[u64],
) -> Result<DrawAnimation> {
    let lookahead = (config.display_height() / config.element_height + 1) as usize;
    let reversed = |entry: &LotteryEntry| -> Vec<String> {
        let mut symbols = entry.padded_symbols(width, &config.padding);
        symbols.reverse();
        symbols
    };
    let candidates: Vec<Vec<String>> = active.iter().map(reversed).collect();
    let target = reversed(winner);
    // rotations are indexed left to right, digits right to left
    let rotation_of = |digit: usize| rotations[width - 1 - digit].max(1) as usize;

    // column of `digit` over candidates sharing the winner's lowest `stage` digits
    let column = |stage: usize, digit: usize| {
        candidates
            .iter()
            .filter(|symbols| symbols[..stage] == target[..stage])
            .map(|symbols| symbols[digit].as_str())
            .collect::<Vec<_>>()
    };
    let stage_len: Vec<usize> = (0..width)
        .map(|stage| column(stage, stage).len() * rotation_of(stage) + lookahead)
        .collect();

    let mut reels = Vec::with_capacity(width);
    for digit in 0..width {
        let content: Vec<String> = (0..=digit)
            .flat_map(|stage| {
                column(stage, digit)
                    .into_iter()
                    .cycle()
                    .take(stage_len[stage])
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .collect();
        let landing = content[..content.len().saturating_sub(lookahead)]
            .iter()
            .rposition(|symbol| *symbol == target[digit])
            .ok_or_else(|| {
                LotteryError::range(format!(
                    "winner digit {} never shows on reel {digit}",
                    target[digit]
                ))
            })? as u64;
        let last_stage_start: usize = stage_len[..digit].iter().sum();
        let stops = generate_stops_from(
            rng,
            config.element_height,
            config.ms_per_step,
            config.start_index,
            last_stage_start as u64,
            config.min_stops,
            config.max_stops,
            landing,
        )?;
        reels.push(ReelTimeline::new(config.element_height, stops, content)?);
    }
    reels.reverse();
    Ok(DrawAnimation::new(reels))
}
