// Hit window definitions shared by judgment and any visuals that preview them.

use crate::game::judgment::JudgeGrade;

// Default windows, in the same distance units as note positions. The
// simulation deliberately expresses timing tolerance as distance from the
// judgment line rather than wall-clock time.
pub const DEFAULT_PERFECT_WINDOW: f32 = 50.0;
pub const DEFAULT_GOOD_WINDOW: f32 = 100.0;
pub const DEFAULT_BAD_WINDOW: f32 = 200.0;

/// Hit windows as absolute distance from the judgment line. Each bound is
/// exclusive: an offset equal to `bad` is already out of range. Only valid
/// when strictly ascending and positive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimingWindows {
    pub perfect: f32,
    pub good: f32,
    pub bad: f32,
}

impl Default for TimingWindows {
    fn default() -> Self {
        Self {
            perfect: DEFAULT_PERFECT_WINDOW,
            good: DEFAULT_GOOD_WINDOW,
            bad: DEFAULT_BAD_WINDOW,
        }
    }
}

impl TimingWindows {
    #[inline(always)]
    pub fn is_strictly_ascending(&self) -> bool {
        self.perfect > 0.0 && self.perfect < self.good && self.good < self.bad
    }
}

/// Classify a signed offset from the judgment line into a grade, or `None`
/// when the note sits outside the outer bad window and cannot be hit at all.
#[inline(always)]
pub fn classify_offset(offset: f32, windows: &TimingWindows) -> Option<JudgeGrade> {
    let abs = offset.abs();
    if abs < windows.perfect {
        Some(JudgeGrade::Perfect)
    } else if abs < windows.good {
        Some(JudgeGrade::Good)
    } else if abs < windows.bad {
        Some(JudgeGrade::Bad)
    } else {
        None
    }
}
