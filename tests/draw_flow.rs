#![allow(non_snake_case)]
use slot_lottery::{
    DrawEvent,
    DrawState,
    LotteryError,
    ReelStatus,
    test_helpers::*,
};

#[test]
fn start_draw__zero_fraction_selects_first_active_entry() {
    // given
    let state = DrawState::new()
        .apply(DrawEvent::LoadPool(rows(&[("12", "A"), ("34", "B"), ("56", "C")])))
        .unwrap();

    // when
    let state = state.apply(DrawEvent::StartDraw(0.0)).unwrap();

    // then
    let expected = Some(&entry("12", "A"));
    let actual = state.target();
    assert_eq!(expected, actual);
    assert!(state.is_running());
    assert!(state.decided_digits().is_empty());
}

#[test]
fn start_draw__skips_entries_that_already_won() {
    // given
    let state = draw_state_with(&[("12", "A"), ("34", "B"), ("56", "C")])
        .apply(DrawEvent::RecordWinnerDirectly(entry("12", "A")))
        .unwrap();

    // when
    let state = state.apply(DrawEvent::StartDraw(0.0)).unwrap();

    // then
    assert_eq!(Some(&entry("34", "B")), state.target());
}

#[test]
fn start_draw__empty_active_pool_stays_idle() {
    // given
    let state = draw_state_with(&[("7", "A")])
        .apply(DrawEvent::RecordWinnerDirectly(entry("7", "A")))
        .unwrap();

    // when
    let state = state.apply(DrawEvent::StartDraw(0.5)).unwrap();

    // then
    assert!(!state.is_running());
    assert!(state.target().is_none());
    assert!(state.decided_digits().is_empty());
    assert!(state.is_exhausted());
}

#[test]
fn start_draw__fraction_of_one_is_range_error() {
    let state = draw_state_with(&[("7", "A")]);
    let res = state.apply(DrawEvent::StartDraw(1.0));
    assert!(matches!(res, Err(LotteryError::Range { .. })));
}

#[test]
fn decide_digit__no_op_once_every_reel_stopped() {
    // given
    let state = draw_state_with(&[("3", "A"), ("4", "B")])
        .apply(DrawEvent::StartDraw(0.0))
        .unwrap()
        .apply(DrawEvent::AdvanceNextDigit)
        .unwrap();
    assert!(state.all_reels_stopped());

    // when
    let next = state.apply(DrawEvent::DecideDigit('4')).unwrap();

    // then
    assert_eq!(state, next);
}

#[test]
fn advance_next_digit__draws_the_winner_digit_by_digit() {
    // given
    let state = DrawState::new()
        .apply(DrawEvent::LoadPool(rows(&[("01", "A"), ("02", "B"), ("10", "C")])))
        .unwrap()
        .apply(DrawEvent::StartDraw(0.99))
        .unwrap();
    assert_eq!(Some(&entry("10", "C")), state.target());

    // when
    let first = state.apply(DrawEvent::AdvanceNextDigit).unwrap();
    let second = first.apply(DrawEvent::AdvanceNextDigit).unwrap();

    // then
    assert_eq!(
        vec![ReelStatus::Stopped, ReelStatus::Running],
        first.reel_status()
    );
    assert!(first.is_running());
    assert_eq!(vec!['0', '1'], second.decided_digits());
    assert!(!second.is_running());
    assert!(second.is_complete());
    assert_eq!(vec![entry("10", "C")], second.winners());
}

#[test]
fn load_pool__empty_pool_resets_previous_results() {
    // given
    let state = draw_state_with(&[("01", "A"), ("02", "B"), ("10", "C")])
        .apply(DrawEvent::StartDraw(0.99))
        .unwrap()
        .apply(DrawEvent::AdvanceNextDigit)
        .unwrap()
        .apply(DrawEvent::AdvanceNextDigit)
        .unwrap();
    assert_eq!(1, state.winners().len());

    // when
    let state = state.apply(DrawEvent::LoadPool(Vec::new())).unwrap();

    // then
    assert!(state.winners().is_empty());
    assert!(!state.is_running());
    assert!(state.target().is_none());
    assert!(state.reel_status().is_empty());
}

#[test]
fn load_pool__rejects_blank_number_and_keeps_state() {
    let state = draw_state_with(&[("01", "A")]);
    let res = state.apply(DrawEvent::LoadPool(rows(&[("", "nobody")])));
    assert!(matches!(res, Err(LotteryError::Validation { .. })));
    assert_eq!(1, state.pool().len());
}

#[test]
fn record_winner_directly__finishes_a_short_target() {
    // given
    let state = draw_state_with(&[("5", "A"), ("15", "B")])
        .apply(DrawEvent::StartDraw(0.0))
        .unwrap()
        .apply(DrawEvent::AdvanceNextDigit)
        .unwrap();
    assert!(state.is_running());

    // when
    let state = state
        .apply(DrawEvent::RecordWinnerDirectly(entry("5", "A")))
        .unwrap();

    // then
    assert!(!state.is_running());
    assert!(state.is_complete());
    assert_eq!(vec![entry("15", "B")], state.active_pool());
}
