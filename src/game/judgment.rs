use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum JudgeGrade {
    Perfect,
    Good,
    Bad,
    Miss,
}

impl JudgeGrade {
    /// RGBA feedback color for this grade, shared by all presentation layers.
    pub const fn color(self) -> [f32; 4] {
        match self {
            Self::Perfect => [0.0, 1.0, 1.0, 1.0],
            Self::Good => [0.0, 1.0, 0.0, 1.0],
            Self::Bad => [1.0, 0.41, 0.71, 1.0],
            Self::Miss => [1.0, 0.0, 0.0, 1.0],
        }
    }

    /// Whether this grade extends the combo. Bad and Miss break it.
    pub const fn sustains_combo(self) -> bool {
        matches!(self, Self::Perfect | Self::Good)
    }
}

/// The outcome of one resolved note, hit or miss.
#[derive(Clone, Debug, PartialEq)]
pub struct Judgment {
    pub grade: JudgeGrade,
    /// Points awarded for this note, combo bonus included.
    pub points: u32,
    /// Combo immediately after this judgment was applied.
    pub combo_after: u32,
    /// Signed distance from the judgment line when the note resolved.
    /// Positive means the note was already past the line.
    pub offset: f32,
}
