// End-to-end scenarios driven through the public engine API, using the
// default tuning: judgment line 550, miss margin 50, windows 50/100/200,
// note speed 5.

use lanefall::config::Config;
use lanefall::game::gameplay::GameState;
use lanefall::game::judgment::JudgeGrade;

fn engine() -> GameState {
    GameState::new(&Config::default()).expect("default config is valid")
}

#[test]
fn note_reaches_the_line_in_110_ticks_and_judges_perfect() {
    let mut state = engine();
    state.spawn_note(0);
    for _ in 0..110 {
        state.tick();
    }
    let note = state.notes().next().expect("note is still in flight");
    assert_eq!(note.position, 550.0);

    let judgment = state.key_down(0).expect("note sits on the line");
    assert_eq!(judgment.grade, JudgeGrade::Perfect);
    assert_eq!(judgment.points, 1000);
    assert_eq!(judgment.combo_after, 1);
    assert_eq!(state.note_count(), 0);
}

#[test]
fn eleventh_consecutive_perfect_awards_eleven_hundred() {
    let mut state = engine();
    let mut last_points = 0;
    for _ in 0..11 {
        state.spawn_note(2);
        for _ in 0..110 {
            state.tick();
        }
        last_points = state.key_down(2).expect("note on the line").points;
    }
    assert_eq!(last_points, 1100);
    let snapshot = state.score_snapshot();
    assert_eq!(snapshot.combo, 11);
    assert_eq!(snapshot.max_combo, 11);
    assert_eq!(snapshot.score, 10 * 1000 + 1100);
}

#[test]
fn unhit_note_becomes_a_miss_once_past_the_margin() {
    let mut state = engine();
    state.spawn_note(3);
    // Miss line is 600; speed 5 crosses it on tick 121.
    for _ in 0..120 {
        assert!(state.tick().is_empty());
    }
    let missed = state.tick();
    assert_eq!(missed.len(), 1);
    assert_eq!(missed[0].grade, JudgeGrade::Miss);
    assert_eq!(missed[0].points, 0);
    assert_eq!(missed[0].combo_after, 0);

    let snapshot = state.score_snapshot();
    assert_eq!(snapshot.counts.miss, 1);
    assert_eq!(snapshot.combo, 0);
    assert_eq!(snapshot.score, 0);
    assert_eq!(state.note_count(), 0, "the swept note leaves the track");
}

#[test]
fn key_down_with_nothing_in_range_emits_no_judgment() {
    let mut state = engine();
    state.spawn_note(1);
    // After 50 ticks the note sits at 250, offset 300: outside the outer window.
    for _ in 0..50 {
        state.tick();
    }
    let before = state.score_snapshot();
    assert!(state.key_down(1).is_none());
    let after = state.score_snapshot();
    assert_eq!(before.score, after.score);
    assert_eq!(before.counts, after.counts);
    assert_eq!(state.note_count(), 1, "the out-of-range note stays live");
}

#[test]
fn the_nearest_of_two_in_range_notes_resolves_first() {
    let mut state = engine();
    // Two notes in lane 0, 28 spawn ticks apart: after 102 more ticks they
    // sit at 510 (offset -40) and 370 (offset -180), both inside the outer
    // window.
    state.spawn_note(0);
    for _ in 0..28 {
        state.tick();
    }
    state.spawn_note(0);
    for _ in 0..74 {
        state.tick();
    }
    let mut positions: Vec<f32> = state.notes().map(|n| n.position).collect();
    positions.sort_by(f32::total_cmp);
    assert_eq!(positions, vec![370.0, 510.0]);

    let judgment = state.key_down(0).expect("both notes are in range");
    assert_eq!(judgment.grade, JudgeGrade::Perfect, "offset -40 is a Perfect");
    assert_eq!(state.note_count(), 1);
    assert_eq!(
        state.notes().next().unwrap().position,
        370.0,
        "the farther note stays live"
    );
}

#[test]
fn good_and_bad_windows_pay_their_scaled_points() {
    let mut state = engine();
    // 96 ticks puts the note at 480, offset -70: inside the good window.
    state.spawn_note(0);
    for _ in 0..96 {
        state.tick();
    }
    let good = state.key_down(0).expect("inside the good window");
    assert_eq!(good.grade, JudgeGrade::Good);
    assert_eq!(good.points, 500);

    // 82 ticks -> 410, offset -140: Bad. The combo from the Good breaks.
    state.spawn_note(0);
    for _ in 0..82 {
        state.tick();
    }
    let bad = state.key_down(0).expect("inside the bad window");
    assert_eq!(bad.grade, JudgeGrade::Bad);
    assert_eq!(bad.points, 100);
    assert_eq!(bad.combo_after, 0);

    let snapshot = state.score_snapshot();
    assert_eq!(snapshot.counts.good, 1);
    assert_eq!(snapshot.counts.bad, 1);
    assert_eq!(snapshot.max_combo, 1);
}

#[test]
fn a_note_remains_hittable_just_past_the_line() {
    let mut state = engine();
    state.spawn_note(0);
    // 116 ticks -> 580: 30 past the line, inside the perfect window, not yet
    // past the miss line.
    for _ in 0..116 {
        state.tick();
    }
    let judgment = state.key_down(0).expect("late hit is still in range");
    assert_eq!(judgment.grade, JudgeGrade::Perfect);
    assert!(judgment.offset > 0.0, "late hits carry a positive offset");
}

#[test]
fn accuracy_reflects_the_session_mix() {
    let mut state = engine();
    assert_eq!(state.score_snapshot().accuracy, 0.0);

    // One Perfect, one Miss.
    state.spawn_note(0);
    for _ in 0..110 {
        state.tick();
    }
    state.key_down(0);
    state.spawn_note(0);
    for _ in 0..121 {
        state.tick();
    }

    let snapshot = state.score_snapshot();
    assert_eq!(snapshot.counts.perfect, 1);
    assert_eq!(snapshot.counts.miss, 1);
    assert!((snapshot.accuracy - 50.0).abs() < 1e-9);
}

#[test]
fn custom_windows_and_points_flow_through_the_engine() {
    let mut config = Config::default();
    config.windows.perfect = 10.0;
    config.windows.good = 20.0;
    config.windows.bad = 30.0;
    config.base_points.perfect = 300;
    config.note_speed = 11.0;
    let mut state = GameState::new(&config).expect("custom config is valid");

    state.spawn_note(0);
    for _ in 0..50 {
        state.tick();
    }
    // Position 550: exactly on the line under the custom speed.
    let judgment = state.key_down(0).expect("note on the line");
    assert_eq!(judgment.grade, JudgeGrade::Perfect);
    assert_eq!(judgment.points, 300);
}

#[test]
fn malformed_configs_are_refused_at_construction() {
    let mut config = Config::default();
    config.windows = lanefall::game::timing_windows::TimingWindows {
        perfect: 200.0,
        good: 100.0,
        bad: 50.0,
    };
    assert!(GameState::new(&config).is_err());

    let mut config = Config::default();
    config.lane_count = 0;
    assert!(GameState::new(&config).is_err());
}
