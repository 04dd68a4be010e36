use ini::Ini;
use log::warn;
use rustc_hash::FxHashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::game::scoring::BasePoints;
use crate::game::timing_windows::TimingWindows;

pub const CONFIG_PATH: &str = "lanefall.ini";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const fn as_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Off => log::LevelFilter::Off,
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(()),
        }
    }
}

/// Rejected tuning values. Raised at engine construction so a malformed
/// config can never produce silently wrong judgments.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error(
        "timing windows must be positive and strictly ascending \
         (perfect {perfect}, good {good}, bad {bad})"
    )]
    WindowsNotAscending { perfect: f32, good: f32, bad: f32 },
    #[error("note speed must be positive (got {speed})")]
    NonPositiveSpeed { speed: f32 },
    #[error("lane count must be at least 1")]
    NoLanes,
    #[error("key '{key}' is mapped to lane {lane}, but only {lane_count} lanes exist")]
    KeymapLaneOutOfRange {
        key: char,
        lane: usize,
        lane_count: usize,
    },
    #[error("judgment line must be positive (got {judgment_line})")]
    NonPositiveJudgmentLine { judgment_line: f32 },
    #[error("miss margin must not be negative (got {miss_margin})")]
    NegativeMissMargin { miss_margin: f32 },
    #[error("combo bonus step must not be negative (got {step})")]
    NegativeComboBonusStep { step: f32 },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub lane_count: usize,
    /// Input key to lane index. Presentation layers translate raw key events
    /// through this; the engine itself only ever sees lane indices.
    pub keymap: FxHashMap<char, usize>,
    /// Vertical position of the judgment line, in note-position units.
    pub judgment_line: f32,
    /// How far past the judgment line a note may fall before the sweep
    /// counts it as a Miss.
    pub miss_margin: f32,
    pub windows: TimingWindows,
    pub base_points: BasePoints,
    /// Bonus added to the score multiplier per 10 combo.
    pub combo_bonus_step: f32,
    /// Distance each note falls per tick.
    pub note_speed: f32,
    /// Demo driver: ticks between spawns.
    pub spawn_interval_ticks: u32,
    /// Ticks the last judgment stays readable; 0 keeps it until overwritten.
    pub judgment_display_ticks: u32,
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lane_count: 4,
            keymap: default_keymap(),
            judgment_line: 550.0,
            miss_margin: 50.0,
            windows: TimingWindows::default(),
            base_points: BasePoints::default(),
            combo_bonus_step: 0.1,
            note_speed: 5.0,
            spawn_interval_ticks: 60,
            judgment_display_ticks: 45,
            log_level: LogLevel::Info,
        }
    }
}

fn default_keymap() -> FxHashMap<char, usize> {
    [('s', 0), ('d', 1), ('j', 2), ('k', 3)].into_iter().collect()
}

impl Config {
    /// Checks every tuning value an engine instance depends on. The engine
    /// constructor refuses configs that fail here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lane_count == 0 {
            return Err(ConfigError::NoLanes);
        }
        if !self.windows.is_strictly_ascending() {
            return Err(ConfigError::WindowsNotAscending {
                perfect: self.windows.perfect,
                good: self.windows.good,
                bad: self.windows.bad,
            });
        }
        if !(self.note_speed > 0.0) {
            return Err(ConfigError::NonPositiveSpeed {
                speed: self.note_speed,
            });
        }
        if !(self.judgment_line > 0.0) {
            return Err(ConfigError::NonPositiveJudgmentLine {
                judgment_line: self.judgment_line,
            });
        }
        if !(self.miss_margin >= 0.0) {
            return Err(ConfigError::NegativeMissMargin {
                miss_margin: self.miss_margin,
            });
        }
        if !(self.combo_bonus_step >= 0.0) {
            return Err(ConfigError::NegativeComboBonusStep {
                step: self.combo_bonus_step,
            });
        }
        for (&key, &lane) in &self.keymap {
            if lane >= self.lane_count {
                return Err(ConfigError::KeymapLaneOutOfRange {
                    key,
                    lane,
                    lane_count: self.lane_count,
                });
            }
        }
        Ok(())
    }

    pub fn lane_for_key(&self, key: char) -> Option<usize> {
        self.keymap.get(&key.to_ascii_lowercase()).copied()
    }

    pub fn key_for_lane(&self, lane: usize) -> Option<char> {
        self.keymap
            .iter()
            .find(|&(_, &mapped)| mapped == lane)
            .map(|(&key, _)| key)
    }
}

/// Loads the config file, falling back to full defaults when it is missing
/// or unreadable. Individual malformed values fall back per key with a
/// warning, mirroring how missing keys behave.
pub fn load<P: AsRef<Path>>(path: P) -> Config {
    match Ini::load_from_file(path.as_ref()) {
        Ok(conf) => from_ini(&conf),
        Err(e) => {
            warn!(
                "Could not read {}: {e}. Using default configuration.",
                path.as_ref().display()
            );
            Config::default()
        }
    }
}

fn from_ini(conf: &Ini) -> Config {
    let default = Config::default();

    let windows = TimingWindows {
        perfect: get_or(conf, "Timing", "PerfectWindow", default.windows.perfect),
        good: get_or(conf, "Timing", "GoodWindow", default.windows.good),
        bad: get_or(conf, "Timing", "BadWindow", default.windows.bad),
    };
    let base_points = BasePoints {
        perfect: get_or(conf, "Scoring", "PerfectPoints", default.base_points.perfect),
        good: get_or(conf, "Scoring", "GoodPoints", default.base_points.good),
        bad: get_or(conf, "Scoring", "BadPoints", default.base_points.bad),
    };

    Config {
        lane_count: get_or(conf, "Game", "LaneCount", default.lane_count),
        keymap: keymap_from_ini(conf).unwrap_or(default.keymap),
        judgment_line: get_or(conf, "Game", "JudgmentLine", default.judgment_line),
        miss_margin: get_or(conf, "Game", "MissMargin", default.miss_margin),
        windows,
        base_points,
        combo_bonus_step: get_or(conf, "Scoring", "ComboBonusStep", default.combo_bonus_step),
        note_speed: get_or(conf, "Game", "NoteSpeed", default.note_speed),
        spawn_interval_ticks: get_or(
            conf,
            "Game",
            "SpawnIntervalTicks",
            default.spawn_interval_ticks,
        ),
        judgment_display_ticks: get_or(
            conf,
            "Game",
            "JudgmentDisplayTicks",
            default.judgment_display_ticks,
        ),
        log_level: get_or(conf, "Log", "Level", default.log_level),
    }
}

fn get_or<T: FromStr + Copy>(conf: &Ini, section: &str, key: &str, default: T) -> T {
    match conf.get_from(Some(section), key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Unsupported value '{raw}' for [{section}] {key}; keeping the default.");
            default
        }),
    }
}

/// Reads the [Keys] section as `<key char> = <lane index>` lines. Absent
/// section keeps the default map; a section whose every entry is malformed
/// does too.
fn keymap_from_ini(conf: &Ini) -> Option<FxHashMap<char, usize>> {
    let section = conf.section(Some("Keys"))?;
    let mut keymap = FxHashMap::default();
    for (key, value) in section.iter() {
        let trimmed = key.trim();
        let mut chars = trimmed.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            warn!("Ignoring [Keys] entry '{key}': bindings are single characters.");
            continue;
        };
        match value.trim().parse::<usize>() {
            Ok(lane) => {
                keymap.insert(c.to_ascii_lowercase(), lane);
            }
            Err(_) => {
                warn!("Ignoring [Keys] entry '{key}': lane '{value}' is not an index.");
            }
        }
    }
    if keymap.is_empty() {
        warn!("[Keys] section contained no usable bindings; keeping the defaults.");
        return None;
    }
    Some(keymap)
}
