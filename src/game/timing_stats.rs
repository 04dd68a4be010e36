use serde::Serialize;

/// Aggregate statistics over the signed hit offsets of a session. Misses
/// carry no offset and are excluded by construction.
#[derive(Copy, Clone, Debug, Default, Serialize)]
pub struct OffsetStats {
    pub mean: f32,
    pub mean_abs: f32,
    pub stddev: f32,
    pub max_abs: f32,
    pub count: usize,
}

#[inline(always)]
pub fn compute_offset_stats(offsets: &[f32]) -> OffsetStats {
    // First pass: accumulate sums and the maximum
    let mut sum_abs = 0.0_f32;
    let mut sum_signed = 0.0_f32;
    let mut max_abs = 0.0_f32;
    let count = offsets.len();

    if count == 0 {
        return OffsetStats::default();
    }

    for &e in offsets {
        let a = e.abs();
        sum_abs += a;
        sum_signed += e;
        if a > max_abs {
            max_abs = a;
        }
    }

    let mean = sum_signed / (count as f32);
    let mean_abs = sum_abs / (count as f32);

    // Second pass: sample standard deviation of signed offsets
    let stddev = if count > 1 {
        let mut sum_diff_sq = 0.0_f32;
        for &e in offsets {
            let d = e - mean;
            sum_diff_sq += d * d;
        }
        (sum_diff_sq / ((count as f32) - 1.0)).sqrt()
    } else {
        0.0
    };

    OffsetStats {
        mean,
        mean_abs,
        stddev,
        max_abs,
        count,
    }
}
