use crate::{
    easing::ease_in_out,
    error::{
        LotteryError,
        Result,
    },
    search::lower_bound,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::time::Duration;

/// Rows of symbols a reel window shows at once.
pub const VISIBLE_ROWS: u32 = 3;

/// A point in time (ms since the animation started) the reel passes through
/// at an exact pixel offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub t: u64,
    pub pos: i64,
}

impl Breakpoint {
    pub fn new(t: u64, pos: i64) -> Self {
        Self { t, pos }
    }
}

/// One symbol slot of a reel window for a given pixel offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleSymbol<'a> {
    /// Top edge of the slot inside the window, in pixels. Values in
    /// `[-element_height, 0)` are partially scrolled out at the top.
    pub offset: i64,
    pub symbol: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReelTimeline {
    element_height: u32,
    display_height: u32,
    breakpoints: Vec<Breakpoint>,
    symbol_cycle: Vec<String>,
}

impl ReelTimeline {
    pub fn new(
        element_height: u32,
        breakpoints: Vec<Breakpoint>,
        symbol_cycle: Vec<String>,
    ) -> Result<Self> {
        if element_height == 0 {
            return Err(LotteryError::validation("element height must be positive"));
        }
        if symbol_cycle.is_empty() {
            return Err(LotteryError::validation("a reel needs at least one symbol"));
        }
        if breakpoints.windows(2).any(|w| w[1].t < w[0].t) {
            return Err(LotteryError::validation(
                "breakpoints must be sorted by time",
            ));
        }
        let display_height = element_height.checked_mul(VISIBLE_ROWS).ok_or_else(|| {
            LotteryError::validation(format!("element height {element_height} is too large"))
        })?;
        Ok(Self {
            element_height,
            display_height,
            breakpoints,
            symbol_cycle,
        })
    }

    /// A reel that never moves and shows `symbol` everywhere.
    pub fn idle(element_height: u32, symbol: impl Into<String>) -> Result<Self> {
        Self::new(element_height, Vec::new(), vec![symbol.into()])
    }

    pub fn element_height(&self) -> u32 {
        self.element_height
    }

    pub fn display_height(&self) -> u32 {
        self.display_height
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn symbol_cycle(&self) -> &[String] {
        &self.symbol_cycle
    }

    /// Pixel offset of the reel `elapsed` after the animation started.
    pub fn position_at(&self, elapsed: Duration) -> i64 {
        let bps = &self.breakpoints;
        let (Some(first), Some(last)) = (bps.first(), bps.last()) else {
            return 0;
        };
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        if elapsed_ms < first.t as f64 {
            return first.pos;
        }

        let found = lower_bound(bps, &elapsed_ms, |bp, t| (bp.t as f64).total_cmp(t));
        // not there yet: the interval starts one breakpoint earlier
        let i = if found < bps.len() && elapsed_ms < bps[found].t as f64 {
            found.saturating_sub(1)
        } else {
            found
        };
        if i + 1 >= bps.len() {
            return last.pos;
        }

        let (x1, x2) = (bps[i], bps[i + 1]);
        if x2.t <= x1.t || elapsed_ms >= x2.t as f64 {
            return x2.pos;
        }
        ease_in_out(
            elapsed_ms - x1.t as f64,
            (x2.t - x1.t) as f64,
            x1.pos,
            x2.pos,
        )
    }

    /// Symbols covering the window when the reel sits at `pixel_offset`.
    ///
    /// The symbol whose index times `element_height` equals the offset sits in
    /// the middle row.
    pub fn visible_symbols_at(&self, pixel_offset: i64) -> Vec<VisibleSymbol<'_>> {
        let eh = i64::from(self.element_height);
        let dh = i64::from(self.display_height);
        let centred = pixel_offset - (dh - eh) / 2;
        let count = dh / eh + 1;
        let begin = centred.div_euclid(eh);
        let len = self.symbol_cycle.len() as i64;

        (begin..begin + count)
            .map(|i| {
                let raw = dh - eh - i * eh + centred;
                VisibleSymbol {
                    offset: (raw + eh).rem_euclid(dh + eh) - eh,
                    symbol: &self.symbol_cycle[i.rem_euclid(len) as usize],
                }
            })
            .collect()
    }

    /// Symbol shown in the middle row once the reel has stopped.
    pub fn resting_symbol(&self) -> &str {
        let pos = self.breakpoints.last().map_or(0, |bp| bp.pos);
        let index = pos.div_euclid(i64::from(self.element_height));
        &self.symbol_cycle[index.rem_euclid(self.symbol_cycle.len() as i64) as usize]
    }

    /// When the reel visually stops; zero for a reel without breakpoints.
    pub fn final_rest_time(&self) -> Duration {
        self.breakpoints
            .last()
            .map_or(Duration::ZERO, |bp| Duration::from_millis(bp.t))
    }

    pub fn is_settled_at(&self, elapsed: Duration) -> bool {
        elapsed >= self.final_rest_time()
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    fn digits() -> Vec<String> {
        (0..10).map(|d| d.to_string()).collect()
    }

    fn timeline(breakpoints: Vec<Breakpoint>) -> ReelTimeline {
        ReelTimeline::new(30, breakpoints, digits()).unwrap()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn new__rejects_zero_element_height() {
        let res = ReelTimeline::new(0, vec![], digits());
        assert!(matches!(res, Err(LotteryError::Validation { .. })));
    }

    #[test]
    fn new__rejects_element_height_that_overflows_the_window() {
        let res = ReelTimeline::new(2_000_000_000, vec![], digits());
        assert!(matches!(res, Err(LotteryError::Validation { .. })));
    }

    #[test]
    fn new__rejects_empty_symbol_cycle() {
        let res = ReelTimeline::new(30, vec![], vec![]);
        assert!(matches!(res, Err(LotteryError::Validation { .. })));
    }

    #[test]
    fn new__rejects_unsorted_breakpoints() {
        let bps = vec![Breakpoint::new(500, 60), Breakpoint::new(250, 30)];
        let res = ReelTimeline::new(30, bps, digits());
        assert!(matches!(res, Err(LotteryError::Validation { .. })));
    }

    #[test]
    fn position_at__no_breakpoints_is_zero() {
        let reel = timeline(vec![]);
        assert_eq!(0, reel.position_at(ms(1234)));
        assert_eq!(Duration::ZERO, reel.final_rest_time());
        assert!(reel.is_settled_at(Duration::ZERO));
    }

    #[test]
    fn position_at__snaps_to_breakpoints() {
        let reel = timeline(vec![
            Breakpoint::new(0, 0),
            Breakpoint::new(750, 90),
            Breakpoint::new(2500, 300),
        ]);
        assert_eq!(0, reel.position_at(ms(0)));
        assert_eq!(90, reel.position_at(ms(750)));
        assert_eq!(300, reel.position_at(ms(2500)));
    }

    #[test]
    fn position_at__clamps_outside_the_timeline() {
        let reel = timeline(vec![Breakpoint::new(100, 30), Breakpoint::new(300, 90)]);
        assert_eq!(30, reel.position_at(ms(0)));
        assert_eq!(90, reel.position_at(ms(10_000)));
    }

    #[test]
    fn position_at__eases_between_breakpoints() {
        let reel = timeline(vec![Breakpoint::new(0, 0), Breakpoint::new(1000, 300)]);
        assert_eq!(150, reel.position_at(ms(500)));
        let mut previous = 0;
        for t in (0..=1000).step_by(50) {
            let pos = reel.position_at(ms(t));
            assert!(pos >= previous);
            previous = pos;
        }
    }

    #[test]
    fn final_rest_time__is_last_breakpoint() {
        let reel = timeline(vec![Breakpoint::new(0, 0), Breakpoint::new(4250, 510)]);
        assert_eq!(ms(4250), reel.final_rest_time());
        assert!(!reel.is_settled_at(ms(4249)));
        assert!(reel.is_settled_at(ms(4250)));
    }

    #[test]
    fn visible_symbols_at__centres_the_indexed_symbol() {
        let reel = timeline(vec![]);
        let actual: Vec<(i64, &str)> = reel
            .visible_symbols_at(0)
            .into_iter()
            .map(|v| (v.offset, v.symbol))
            .collect();
        let expected = vec![(60, "9"), (30, "0"), (0, "1"), (-30, "2")];
        assert_eq!(expected, actual);
    }

    #[test]
    fn visible_symbols_at__wraps_negative_offsets() {
        let reel = timeline(vec![]);
        let middle = reel
            .visible_symbols_at(-60)
            .into_iter()
            .find(|v| v.offset == 30)
            .unwrap();
        assert_eq!("8", middle.symbol);
    }

    #[test]
    fn visible_symbols_at__stays_inside_window() {
        let reel = timeline(vec![]);
        for p in -200..200 {
            let window = reel.visible_symbols_at(p);
            assert_eq!(4, window.len());
            assert!(window.iter().all(|v| v.offset >= -30 && v.offset < 90));
        }
    }

    #[test]
    fn resting_symbol__reads_final_breakpoint() {
        let reel = timeline(vec![Breakpoint::new(0, 0), Breakpoint::new(250 * 23, 23 * 30)]);
        assert_eq!("3", reel.resting_symbol());
        let centre = reel
            .visible_symbols_at(23 * 30)
            .into_iter()
            .find(|v| v.offset == 30)
            .unwrap();
        assert_eq!("3", centre.symbol);
    }
}
