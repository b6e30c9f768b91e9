//! The draw state: who can still win, which number is being drawn and which
//! of its digits are already locked in.
//!
//! Every transition takes the current state by reference and returns a new
//! one; a rejected transition returns an unchanged copy.

use crate::{
    entry::{
        self,
        LotteryEntry,
    },
    error::{
        LotteryError,
        Result,
    },
};
use tracing::{
    debug,
    info,
};

/// Something that happened to the draw.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawEvent {
    /// Replace the candidate pool with `(number, display name)` rows and
    /// forget every previous result.
    LoadPool(Vec<(String, String)>),
    /// The start button was pressed. The driver answers with `StartDraw`.
    ClickStart,
    /// Pick the target among the active candidates; the value is in `[0, 1)`.
    StartDraw(f64),
    /// A reel stopped showing this digit.
    DecideDigit(char),
    /// Stop the next reel on the target's digit.
    AdvanceNextDigit,
    /// Record a winner decided elsewhere and stop the draw.
    RecordWinnerDirectly(LotteryEntry),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReelStatus {
    Stopped,
    Running,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawState {
    pool: Vec<LotteryEntry>,
    /// Least significant digit first.
    decided: Vec<char>,
    target: Option<LotteryEntry>,
    is_running: bool,
    winners: Vec<LotteryEntry>,
}

impl DrawState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool(pool: Vec<LotteryEntry>) -> Self {
        Self {
            pool,
            ..Self::default()
        }
    }

    pub fn apply(&self, event: DrawEvent) -> Result<Self> {
        match event {
            DrawEvent::LoadPool(rows) => self.load_pool(rows),
            DrawEvent::ClickStart => Ok(self.clone()),
            DrawEvent::StartDraw(fraction) => self.start_draw(fraction),
            DrawEvent::DecideDigit(digit) => Ok(self.decide_digit(digit)),
            DrawEvent::AdvanceNextDigit => Ok(self.advance_next_digit()),
            DrawEvent::RecordWinnerDirectly(winner) => Ok(self.record_winner(winner)),
        }
    }

    pub fn load_pool(&self, rows: Vec<(String, String)>) -> Result<Self> {
        let pool = rows
            .into_iter()
            .map(|(number, name)| LotteryEntry::new(number, name))
            .collect::<Result<Vec<_>>>()?;
        info!(candidates = pool.len(), "loaded candidate pool");
        Ok(Self::with_pool(pool))
    }

    pub fn start_draw(&self, fraction: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&fraction) {
            return Err(LotteryError::range(format!(
                "draw fraction {fraction} is outside [0, 1)"
            )));
        }
        let active = self.active_pool();
        if active.is_empty() {
            info!("every candidate has already won");
            return Ok(Self {
                is_running: false,
                target: None,
                decided: Vec::new(),
                ..self.clone()
            });
        }
        let index = ((active.len() as f64 * fraction) as usize).min(active.len() - 1);
        let target = active[index].clone();
        info!(target = %target.number(), index, active = active.len(), "draw started");
        Ok(Self {
            is_running: true,
            target: Some(target),
            decided: Vec::new(),
            ..self.clone()
        })
    }

    /// Locks in `digit` for the next running reel.
    ///
    /// Ignored when every reel has stopped, when the target has no digits
    /// left, or when no active candidate ends in the resulting digits.
    pub fn decide_digit(&self, digit: char) -> Self {
        if self.all_reels_stopped() {
            return self.clone();
        }
        let target_width = self.target.as_ref().map(LotteryEntry::width);
        if target_width.is_some_and(|width| self.decided.len() >= width) {
            return self.clone();
        }
        let mut decided = self.decided.clone();
        decided.push(digit);
        if !self.active_entries().any(|e| e.matches_decided(&decided)) {
            debug!(%digit, "digit matches no candidate, ignoring");
            return self.clone();
        }

        let mut next = Self {
            decided,
            ..self.clone()
        };
        debug!(%digit, decided = next.decided.len(), "digit decided");
        if next.all_reels_stopped() {
            next.is_running = false;
            if let Some(target) = next.target.clone() {
                info!(winner = %target.number(), name = %target.display_name(), "winner drawn");
                next.winners.push(target);
            }
        }
        next
    }

    /// Decides the target's next digit, least significant first.
    pub fn advance_next_digit(&self) -> Self {
        let Some(target) = &self.target else {
            return self.clone();
        };
        let width = target.width();
        if self.decided.len() >= width {
            return self.clone();
        }
        match target.digit_from_right(self.decided.len()) {
            Some(digit) => self.decide_digit(digit),
            None => self.clone(),
        }
    }

    pub fn record_winner(&self, winner: LotteryEntry) -> Self {
        info!(winner = %winner.number(), "winner recorded");
        let mut winners = self.winners.clone();
        winners.push(winner);
        Self {
            winners,
            is_running: false,
            ..self.clone()
        }
    }

    pub fn pool(&self) -> &[LotteryEntry] {
        &self.pool
    }

    pub fn active_entries(&self) -> impl Iterator<Item = &LotteryEntry> {
        entry::active_entries(&self.pool, &self.winners)
    }

    /// Candidates that have not won yet.
    pub fn active_pool(&self) -> Vec<LotteryEntry> {
        self.active_entries().cloned().collect()
    }

    /// Active candidates consistent with the digits decided so far.
    pub fn matching_candidates(&self) -> Vec<&LotteryEntry> {
        self.active_entries()
            .filter(|e| e.matches_decided(&self.decided))
            .collect()
    }

    /// Digits still possible per position, least significant first.
    pub fn digit_columns(&self) -> Vec<Vec<char>> {
        entry::digit_columns(self.active_entries(), &self.decided)
    }

    pub fn decided_digits(&self) -> &[char] {
        &self.decided
    }

    pub fn target(&self) -> Option<&LotteryEntry> {
        self.target.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn winners(&self) -> &[LotteryEntry] {
        &self.winners
    }

    /// Reel states, least significant reel first.
    pub fn reel_status(&self) -> Vec<ReelStatus> {
        let reel_count = if self.is_running {
            entry::max_width(self.active_entries())
        } else {
            self.decided.len()
        };
        let stopped = reel_count.min(self.decided.len());
        std::iter::repeat_n(ReelStatus::Stopped, stopped)
            .chain(std::iter::repeat_n(ReelStatus::Running, reel_count - stopped))
            .collect()
    }

    pub fn all_reels_stopped(&self) -> bool {
        self.reel_status()
            .iter()
            .all(|status| *status == ReelStatus::Stopped)
    }

    /// Whether the last draw has stopped with its target among the winners.
    pub fn is_complete(&self) -> bool {
        !self.is_running
            && self
                .target
                .as_ref()
                .is_some_and(|target| self.winners.iter().any(|w| w.same_number(target)))
    }

    /// Whether everyone in the pool has won.
    pub fn is_exhausted(&self) -> bool {
        self.active_entries().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::test_helpers::{
        entry,
        rows,
    };

    fn loaded(pool: &[(&str, &str)]) -> DrawState {
        DrawState::new().load_pool(rows(pool)).unwrap()
    }

    #[test]
    fn load_pool__rejects_empty_number() {
        let res = DrawState::new().load_pool(rows(&[("01", "A"), ("", "B")]));
        assert!(matches!(res, Err(LotteryError::Validation { .. })));
    }

    #[test]
    fn start_draw__rejects_fraction_out_of_range() {
        let state = loaded(&[("01", "A")]);
        for fraction in [1.0, -0.1, f64::NAN, 7.5] {
            let res = state.start_draw(fraction);
            assert!(matches!(res, Err(LotteryError::Range { .. })), "{fraction}");
        }
    }

    #[test]
    fn decide_digit__ignored_while_idle() {
        let state = loaded(&[("01", "A")]);
        assert_eq!(state, state.decide_digit('1'));
    }

    #[test]
    fn decide_digit__rejects_digit_matching_nobody() {
        let state = loaded(&[("01", "A"), ("02", "B")]).start_draw(0.0).unwrap();
        let next = state.decide_digit('7');
        assert_eq!(state, next);
    }

    #[test]
    fn decide_digit__never_exceeds_target_width() {
        let state = loaded(&[("5", "A"), ("15", "B")]).start_draw(0.0).unwrap();
        let state = state.decide_digit('5');
        assert!(state.is_running());

        let next = state.decide_digit('1');

        assert_eq!(vec!['5'], next.decided_digits());
    }

    #[test]
    fn reel_status__stops_reels_from_the_right() {
        let state = loaded(&[("123", "A"), ("456", "B")]).start_draw(0.0).unwrap();
        let state = state.advance_next_digit();
        let expected = vec![ReelStatus::Stopped, ReelStatus::Running, ReelStatus::Running];
        assert_eq!(expected, state.reel_status());
    }

    #[test]
    fn matching_candidates__narrow_as_digits_are_decided() {
        let state = loaded(&[("11", "A"), ("21", "B"), ("12", "C")]).start_draw(0.5).unwrap();
        let state = state.advance_next_digit();
        let actual: Vec<&str> = state.matching_candidates().iter().map(|e| e.number()).collect();
        assert_eq!(vec!["11", "21"], actual);
        assert_eq!(vec![vec!['1'], vec!['1', '2']], state.digit_columns());
    }

    #[test]
    fn apply__click_start_changes_nothing() {
        let state = loaded(&[("01", "A")]);
        assert_eq!(state, state.apply(DrawEvent::ClickStart).unwrap());
    }

    #[test]
    fn record_winner__stops_the_draw() {
        let state = loaded(&[("01", "A"), ("02", "B")]).start_draw(0.0).unwrap();
        let next = state.record_winner(entry("01", "A"));
        assert!(!next.is_running());
        assert_eq!(vec![entry("01", "A")], next.winners());
        assert_eq!(vec![entry("02", "B")], next.active_pool());
    }
}
