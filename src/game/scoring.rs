use serde::Serialize;

use crate::game::judgment::JudgeGrade;

/// Per-tier judgment tallies. Every field only ever grows.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WindowCounts {
    pub perfect: u32,
    pub good: u32,
    pub bad: u32,
    pub miss: u32,
}

impl WindowCounts {
    #[inline(always)]
    pub fn total(&self) -> u32 {
        self.perfect + self.good + self.bad + self.miss
    }
}

/// Base points per grade before the combo bonus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BasePoints {
    pub perfect: u32,
    pub good: u32,
    pub bad: u32,
}

impl Default for BasePoints {
    fn default() -> Self {
        Self {
            perfect: 1000,
            good: 500,
            bad: 100,
        }
    }
}

impl BasePoints {
    #[inline(always)]
    pub const fn for_grade(&self, grade: JudgeGrade) -> u32 {
        match grade {
            JudgeGrade::Perfect => self.perfect,
            JudgeGrade::Good => self.good,
            JudgeGrade::Bad => self.bad,
            JudgeGrade::Miss => 0,
        }
    }
}

/// Read-only view of the ledger for presentation layers.
#[derive(Clone, Debug, Serialize)]
pub struct ScoreSnapshot {
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub counts: WindowCounts,
    pub accuracy: f64,
}

/// Running score state: combo, max combo, total score, and per-tier counts.
/// Mutated only by resolved judgments.
#[derive(Clone, Debug)]
pub struct ScoreBoard {
    score: u64,
    combo: u32,
    max_combo: u32,
    counts: WindowCounts,
    base_points: BasePoints,
    combo_bonus_step: f32,
}

impl ScoreBoard {
    pub fn new(base_points: BasePoints, combo_bonus_step: f32) -> Self {
        Self {
            score: 0,
            combo: 0,
            max_combo: 0,
            counts: WindowCounts::default(),
            base_points,
            combo_bonus_step,
        }
    }

    /// Applies one judgment and returns the points it awarded. Perfect and
    /// Good extend the combo; Bad and Miss reset it. The combo bonus uses
    /// the post-increment combo, stepping up every 10.
    pub fn apply(&mut self, grade: JudgeGrade) -> u32 {
        if grade.sustains_combo() {
            self.combo += 1;
        } else {
            self.combo = 0;
        }
        if self.combo > self.max_combo {
            self.max_combo = self.combo;
        }
        match grade {
            JudgeGrade::Perfect => self.counts.perfect = self.counts.perfect.saturating_add(1),
            JudgeGrade::Good => self.counts.good = self.counts.good.saturating_add(1),
            JudgeGrade::Bad => self.counts.bad = self.counts.bad.saturating_add(1),
            JudgeGrade::Miss => self.counts.miss = self.counts.miss.saturating_add(1),
        }

        let bonus = 1.0 + f64::from(self.combo / 10) * f64::from(self.combo_bonus_step);
        let points = (f64::from(self.base_points.for_grade(grade)) * bonus).floor() as u32;
        self.score += u64::from(points);
        points
    }

    #[inline(always)]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[inline(always)]
    pub fn combo(&self) -> u32 {
        self.combo
    }

    #[inline(always)]
    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    #[inline(always)]
    pub fn counts(&self) -> WindowCounts {
        self.counts
    }

    /// Weighted hit rate over everything resolved so far: Perfect counts
    /// full, Good 0.7, Bad and Miss nothing. 0 until the first judgment.
    pub fn accuracy(&self) -> f64 {
        let total = self.counts.total();
        if total == 0 {
            return 0.0;
        }
        (f64::from(self.counts.perfect) + 0.7 * f64::from(self.counts.good)) / f64::from(total)
            * 100.0
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            score: self.score,
            combo: self.combo,
            max_combo: self.max_combo,
            counts: self.counts,
            accuracy: self.accuracy(),
        }
    }
}
