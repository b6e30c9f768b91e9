use crate::{
    error::{
        LotteryError,
        Result,
    },
    timeline::Breakpoint,
};
use itertools::Itertools;
use rand::Rng;

/// Random intermediate stops between `start_index` and `final_index`, as
/// breakpoints a reel passes through one element at a time.
///
/// Between `min_stops` and `max_stops` (exclusive) extra indices are drawn
/// from `[start_index, final_index)`. The result always starts at
/// `start_index` and ends exactly at `final_index`.
pub fn generate_stops<R: Rng + ?Sized>(
    rng: &mut R,
    element_height: u32,
    ms_per_step: u64,
    start_index: u64,
    min_stops: usize,
    max_stops: usize,
    final_index: u64,
) -> Result<Vec<Breakpoint>> {
    generate_stops_from(
        rng,
        element_height,
        ms_per_step,
        start_index,
        start_index,
        min_stops,
        max_stops,
        final_index,
    )
}

/// Like [`generate_stops`], but intermediate stops are drawn from
/// `[random_min, final_index)` instead of starting at `start_index`.
#[allow(clippy::too_many_arguments)]
pub fn generate_stops_from<R: Rng + ?Sized>(
    rng: &mut R,
    element_height: u32,
    ms_per_step: u64,
    start_index: u64,
    random_min: u64,
    min_stops: usize,
    max_stops: usize,
    final_index: u64,
) -> Result<Vec<Breakpoint>> {
    if final_index < start_index {
        return Err(LotteryError::range(format!(
            "final stop {final_index} lies before start {start_index}"
        )));
    }
    let count = if min_stops < max_stops {
        rng.random_range(min_stops..max_stops)
    } else {
        min_stops
    };
    let random_min = random_min.clamp(start_index, final_index);
    let intermediate: Vec<u64> = if random_min < final_index {
        (0..count)
            .map(|_| rng.random_range(random_min..final_index))
            .collect()
    } else {
        Vec::new()
    };

    let element_height = i64::from(element_height);
    Ok(intermediate
        .into_iter()
        .chain([start_index, final_index])
        .sorted()
        .dedup()
        .map(|i| Breakpoint::new(ms_per_step * i, i as i64 * element_height))
        .collect())
}
