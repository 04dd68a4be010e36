use log::info;
use rand::Rng;
use rand::RngExt;
use serde::Serialize;
use std::error::Error;

use crate::config::Config;
use crate::game::gameplay::GameState;
use crate::game::scoring::ScoreSnapshot;
use crate::game::timing_stats::OffsetStats;

// One minute of play at a 60 Hz tick rate.
const SESSION_TICKS: u64 = 3600;

#[derive(Serialize)]
struct SessionSummary {
    score: ScoreSnapshot,
    offsets: OffsetStats,
    ticks: u64,
}

/// Per-lane autoplay state. Each approaching note gets one planned press
/// error; an infinite aim lets the note drop for a deliberate miss.
#[derive(Copy, Clone, Default)]
struct LanePlan {
    armed: bool,
    aim: f32,
}

fn plan_aim(rng: &mut impl Rng) -> f32 {
    // Mostly near the line with a sloppy tail, plus the occasional whiff so
    // every tier shows up in the summary.
    if rng.random::<f32>() < 0.08 {
        f32::INFINITY
    } else {
        rng.random_range(-45.0..75.0)
    }
}

fn step_autoplay(
    state: &mut GameState,
    config: &Config,
    rng: &mut impl Rng,
    plans: &mut [LanePlan],
) {
    let line = config.judgment_line;
    let approach = config.windows.bad;
    for (lane, plan) in plans.iter_mut().enumerate() {
        let nearest = state
            .notes()
            .filter(|note| note.lane == lane)
            .map(|note| note.position - line)
            .min_by(|a, b| a.abs().total_cmp(&b.abs()));
        let Some(offset) = nearest else {
            plan.armed = false;
            state.key_up(lane);
            continue;
        };
        if offset < -approach {
            // Nearest note is still above the approach zone; any previous
            // plan belonged to a note that is gone now.
            plan.armed = false;
            state.key_up(lane);
            continue;
        }
        if !plan.armed {
            plan.armed = true;
            plan.aim = plan_aim(rng);
        }
        if offset >= plan.aim {
            state.key_down(lane);
            plan.armed = false;
        } else {
            state.key_up(lane);
        }
    }
}

/// Runs a headless demo session: a spawner drops notes into random lanes on
/// the configured interval while an imperfect autoplayer works the keys,
/// then the final snapshot is printed as JSON.
pub fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    let mut state = GameState::new(config)?;
    let mut rng = rand::rng();
    let mut plans = vec![LanePlan::default(); config.lane_count];

    for lane in 0..config.lane_count {
        if let Some(key) = config.key_for_lane(lane) {
            info!("lane {lane} bound to '{key}'");
        }
    }

    let interval = u64::from(config.spawn_interval_ticks.max(1));
    for tick in 0..SESSION_TICKS {
        if tick % interval == 0 {
            let lane = rng.random_range(0..config.lane_count);
            state.spawn_note(lane);
        }
        step_autoplay(&mut state, config, &mut rng, &mut plans);
        state.tick();
    }

    // Let the tail of in-flight notes resolve before summarizing.
    while state.note_count() > 0 {
        step_autoplay(&mut state, config, &mut rng, &mut plans);
        state.tick();
    }

    let summary = SessionSummary {
        score: state.score_snapshot(),
        offsets: state.offset_stats(),
        ticks: state.tick_count(),
    };
    info!(
        "session done: score={}, max combo={}, accuracy={:.2}%",
        summary.score.score, summary.score.max_combo, summary.score.accuracy
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
