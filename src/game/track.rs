use smallvec::SmallVec;

use crate::game::note::Note;

// In-flight notes per lane stay small at sane spawn rates; keep them inline.
type LaneNotes = SmallVec<[Note; 8]>;

/// Ordered per-lane collection of every live note. The track is the sole
/// owner of note instances: spawns insert, hits and the miss sweep remove.
#[derive(Clone, Debug)]
pub struct NoteTrack {
    lanes: Vec<LaneNotes>,
}

impl NoteTrack {
    pub fn new(lane_count: usize) -> Self {
        Self {
            lanes: (0..lane_count).map(|_| SmallVec::new()).collect(),
        }
    }

    #[inline(always)]
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Inserts a new note at the top of `lane`. Lane validity is the
    /// caller's contract.
    pub fn spawn(&mut self, lane: usize, speed: f32) {
        self.lanes[lane].push(Note::spawn(lane, speed));
    }

    /// Advances every note by its speed, then sweeps notes that fell past
    /// `miss_line`. The sweep sees the positions computed in this same call,
    /// and removal is index-stable so no note is skipped. Swept notes are
    /// returned for the caller to judge as misses.
    pub fn advance(&mut self, miss_line: f32) -> Vec<Note> {
        let mut swept = Vec::new();
        for lane in &mut self.lanes {
            for note in lane.iter_mut() {
                note.position += note.speed;
            }
            lane.retain(|note| {
                if note.position > miss_line {
                    swept.push(*note);
                    false
                } else {
                    true
                }
            });
        }
        swept
    }

    /// Index of the hittable candidate in `lane`: the note with the smallest
    /// absolute distance to the judgment line, strictly inside
    /// `outer_window`. Minimum absolute offset wins, never insertion order.
    pub fn find_hittable(
        &self,
        lane: usize,
        judgment_line: f32,
        outer_window: f32,
    ) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (idx, note) in self.lanes.get(lane)?.iter().enumerate() {
            let abs = (note.position - judgment_line).abs();
            if abs >= outer_window {
                continue;
            }
            match best {
                Some((_, best_abs)) if abs >= best_abs => {}
                _ => best = Some((idx, abs)),
            }
        }
        best.map(|(idx, _)| idx)
    }

    /// Removes and returns the note at `index` in `lane`. Callers pass
    /// indices obtained from `find_hittable` in the same mutation window.
    pub fn take(&mut self, lane: usize, index: usize) -> Note {
        self.lanes[lane].remove(index)
    }

    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.lanes.iter().flat_map(|lane| lane.iter())
    }

    pub fn len(&self) -> usize {
        self.lanes.iter().map(|lane| lane.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.iter().all(|lane| lane.is_empty())
    }
}
