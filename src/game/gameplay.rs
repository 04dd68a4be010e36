use log::{debug, info};

use crate::config::{Config, ConfigError};
use crate::game::judgment::{JudgeGrade, Judgment};
use crate::game::note::Note;
use crate::game::scoring::{ScoreBoard, ScoreSnapshot};
use crate::game::timing_stats::{self, OffsetStats};
use crate::game::timing_windows::{TimingWindows, classify_offset};
use crate::game::track::NoteTrack;

/// One full game session: the note track, the score ledger, per-lane held
/// state, and the last-judgment display slot. All mutation flows through
/// `key_down`/`key_up`/`spawn_note`/`tick`, called from one logical thread;
/// hosts hold one instance per active session.
pub struct GameState {
    track: NoteTrack,
    score: ScoreBoard,
    windows: TimingWindows,
    judgment_line: f32,
    miss_line: f32,
    note_speed: f32,
    held_lanes: Vec<bool>,
    last_judgment: Option<Judgment>,
    judgment_ttl: u32,
    judgment_display_ticks: u32,
    hit_offsets: Vec<f32>,
    tick_count: u64,
}

impl GameState {
    /// Builds an engine from a config, refusing malformed tuning values
    /// outright rather than judging with them.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            track: NoteTrack::new(config.lane_count),
            score: ScoreBoard::new(config.base_points, config.combo_bonus_step),
            windows: config.windows,
            judgment_line: config.judgment_line,
            miss_line: config.judgment_line + config.miss_margin,
            note_speed: config.note_speed,
            held_lanes: vec![false; config.lane_count],
            last_judgment: None,
            judgment_ttl: 0,
            judgment_display_ticks: config.judgment_display_ticks,
            hit_offsets: Vec::new(),
            tick_count: 0,
        })
    }

    /// Resolves a key-down on `lane`. At most one note resolves per call:
    /// the nearest one inside the outer window. A press on an empty or
    /// out-of-range lane is a silent no-op, not a Miss. Key-repeat
    /// suppression is the host's job.
    pub fn key_down(&mut self, lane: usize) -> Option<Judgment> {
        if lane >= self.track.lane_count() {
            return None;
        }
        self.held_lanes[lane] = true;

        let index = self
            .track
            .find_hittable(lane, self.judgment_line, self.windows.bad)?;
        let note = self.track.take(lane, index);
        let offset = note.position - self.judgment_line;
        let grade = classify_offset(offset, &self.windows)?;

        self.hit_offsets.push(offset);
        let points = self.score.apply(grade);
        let judgment = Judgment {
            grade,
            points,
            combo_after: self.score.combo(),
            offset,
        };
        info!(
            "HIT: lane={lane}, grade={:?}, offset={offset:+.1}, points={points}, combo={}",
            grade,
            judgment.combo_after,
        );
        self.set_last_judgment(judgment.clone());
        Some(judgment)
    }

    /// Clears the held flag. Purely presentational; judgment never reads it.
    pub fn key_up(&mut self, lane: usize) {
        if let Some(held) = self.held_lanes.get_mut(lane) {
            *held = false;
        }
    }

    /// Inserts a note at the top of `lane`. Spawning is externally driven:
    /// the engine brings no randomness or scheduling of its own. Returns
    /// whether a note was actually spawned.
    pub fn spawn_note(&mut self, lane: usize) -> bool {
        if lane >= self.track.lane_count() {
            return false;
        }
        self.track.spawn(lane, self.note_speed);
        true
    }

    /// One simulation step: advance all notes, sweep everything past the
    /// miss line into Miss judgments, then decay the last-judgment display
    /// timer. Returns the misses emitted this tick.
    pub fn tick(&mut self) -> Vec<Judgment> {
        self.tick_count += 1;

        let swept = self.track.advance(self.miss_line);
        let mut judgments = Vec::with_capacity(swept.len());
        for note in swept {
            let points = self.score.apply(JudgeGrade::Miss);
            let judgment = Judgment {
                grade: JudgeGrade::Miss,
                points,
                combo_after: self.score.combo(),
                offset: note.position - self.judgment_line,
            };
            debug!(
                "MISS: lane={}, position={:.1}, tick={}",
                note.lane, note.position, self.tick_count
            );
            self.set_last_judgment(judgment.clone());
            judgments.push(judgment);
        }

        if self.judgment_ttl > 0 {
            self.judgment_ttl -= 1;
            if self.judgment_ttl == 0 {
                self.last_judgment = None;
            }
        }

        judgments
    }

    fn set_last_judgment(&mut self, judgment: Judgment) {
        self.last_judgment = Some(judgment);
        self.judgment_ttl = self.judgment_display_ticks;
    }

    pub fn lane_count(&self) -> usize {
        self.track.lane_count()
    }

    pub fn judgment_line(&self) -> f32 {
        self.judgment_line
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.track.notes()
    }

    pub fn note_count(&self) -> usize {
        self.track.len()
    }

    pub fn lane_held(&self, lane: usize) -> bool {
        self.held_lanes.get(lane).copied().unwrap_or(false)
    }

    pub fn score_snapshot(&self) -> ScoreSnapshot {
        self.score.snapshot()
    }

    /// Most recent judgment, if its display window has not lapsed.
    pub fn last_judgment(&self) -> Option<&Judgment> {
        self.last_judgment.as_ref()
    }

    /// Consuming read of the last judgment; the slot clears immediately.
    pub fn take_last_judgment(&mut self) -> Option<Judgment> {
        self.judgment_ttl = 0;
        self.last_judgment.take()
    }

    pub fn offset_stats(&self) -> OffsetStats {
        timing_stats::compute_offset_stats(&self.hit_offsets)
    }
}

#[cfg(test)]
mod tests {
    use super::GameState;
    use crate::config::Config;
    use crate::game::judgment::JudgeGrade;

    fn state() -> GameState {
        GameState::new(&Config::default()).expect("default config is valid")
    }

    #[test]
    fn construction_rejects_an_invalid_config() {
        let mut config = Config::default();
        config.note_speed = -1.0;
        assert!(GameState::new(&config).is_err());
    }

    #[test]
    fn key_down_on_an_empty_lane_changes_nothing() {
        let mut state = state();
        let before = state.score_snapshot();
        assert!(state.key_down(0).is_none());
        let after = state.score_snapshot();
        assert_eq!(before.score, after.score);
        assert_eq!(before.counts, after.counts);
        assert!(state.last_judgment().is_none());
    }

    #[test]
    fn key_down_on_an_out_of_range_lane_is_rejected() {
        let mut state = state();
        assert!(state.key_down(4).is_none());
        assert!(!state.lane_held(4));
        assert!(!state.spawn_note(99));
    }

    #[test]
    fn held_flags_follow_key_events_without_touching_judgment() {
        let mut state = state();
        state.key_down(1);
        assert!(state.lane_held(1));
        assert!(!state.lane_held(0));
        state.key_up(1);
        assert!(!state.lane_held(1));
        assert_eq!(state.score_snapshot().counts.total(), 0);
    }

    #[test]
    fn a_swept_note_scores_a_miss_and_resets_the_combo() {
        let mut state = state();
        // Build up a combo first.
        state.spawn_note(0);
        for _ in 0..110 {
            state.tick();
        }
        state.key_down(0);
        assert_eq!(state.score_snapshot().combo, 1);

        // Let the next note fall straight through: line 550 + margin 50,
        // crossed on the 121st tick at speed 5.
        state.spawn_note(1);
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
        assert_eq!(snapshot.max_combo, 1);
        assert_eq!(state.note_count(), 0);
    }

    #[test]
    fn last_judgment_expires_after_the_display_window() {
        let mut config = Config::default();
        config.judgment_display_ticks = 3;
        let mut state = GameState::new(&config).unwrap();
        state.spawn_note(0);
        for _ in 0..110 {
            state.tick();
        }
        state.key_down(0);
        assert!(state.last_judgment().is_some());
        state.tick();
        state.tick();
        assert!(state.last_judgment().is_some());
        state.tick();
        assert!(state.last_judgment().is_none());
    }

    #[test]
    fn last_judgment_with_zero_display_ticks_persists_until_taken() {
        let mut config = Config::default();
        config.judgment_display_ticks = 0;
        let mut state = GameState::new(&config).unwrap();
        state.spawn_note(0);
        for _ in 0..110 {
            state.tick();
        }
        state.key_down(0);
        for _ in 0..50 {
            state.tick();
        }
        assert!(state.last_judgment().is_some());
        assert!(state.take_last_judgment().is_some());
        assert!(state.last_judgment().is_none());
    }

    #[test]
    fn hit_offsets_feed_the_session_stats() {
        let mut state = state();
        state.spawn_note(0);
        for _ in 0..108 {
            state.tick();
        }
        // Position 540, offset -10.
        state.key_down(0);
        let stats = state.offset_stats();
        assert_eq!(stats.count, 1);
        assert!((stats.mean + 10.0).abs() < 1e-3);

        // Misses contribute no offset sample.
        state.spawn_note(0);
        for _ in 0..121 {
            state.tick();
        }
        assert_eq!(state.offset_stats().count, 1);
    }
}
