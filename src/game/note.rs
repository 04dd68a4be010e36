/// A single falling note. Notes are owned exclusively by the track: spawned at
/// the top of their lane, advanced once per tick, and removed either by a hit
/// or by the miss sweep once they fall past the miss line.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Note {
    pub lane: usize,
    pub position: f32,
    pub speed: f32,
}

impl Note {
    #[inline(always)]
    pub fn spawn(lane: usize, speed: f32) -> Self {
        Self {
            lane,
            position: 0.0,
            speed,
        }
    }
}
