use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use engine::Vec2;
use serde::Deserialize;
use thiserror::Error;

use super::puzzle::Bank;

pub(crate) const CONFIG_ENV_VAR: &str = "RIVER_CONFIG";
pub(crate) const CONFIG_FILE_NAME: &str = "river.json";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read board config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse board config {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid board config at {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConfigSource {
    Env(PathBuf),
    ProjectFile(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env(path) => write!(f, "{CONFIG_ENV_VAR}={}", path.display()),
            Self::ProjectFile(path) => write!(f, "{}", path.display()),
            Self::Defaults => f.write_str("defaults"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigPoint {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl ConfigPoint {
    const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub(crate) fn to_vec2(self) -> Vec2 {
        Vec2 {
            x: self.x,
            y: self.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigSize {
    pub(crate) width: f32,
    pub(crate) height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct HomeRow {
    pub(crate) origin: ConfigPoint,
    pub(crate) step: ConfigPoint,
}

impl HomeRow {
    const fn new(origin: ConfigPoint, step: ConfigPoint) -> Self {
        Self { origin, step }
    }

    pub(crate) fn slot(&self, slot: u8) -> Vec2 {
        let index = slot as f32;
        Vec2 {
            x: self.origin.x + self.step.x * index,
            y: self.origin.y + self.step.y * index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RaftLayout {
    pub(crate) near_anchor: ConfigPoint,
    pub(crate) far_anchor: ConfigPoint,
    pub(crate) size: ConfigSize,
    pub(crate) seat_inset: ConfigPoint,
}

impl Default for RaftLayout {
    fn default() -> Self {
        Self {
            near_anchor: ConfigPoint::new(830.0, 650.0),
            far_anchor: ConfigPoint::new(430.0, 650.0),
            size: ConfigSize {
                width: 300.0,
                height: 180.0,
            },
            seat_inset: ConfigPoint::new(50.0, 150.0),
        }
    }
}

impl RaftLayout {
    pub(crate) fn anchor(&self, bank: Bank) -> Vec2 {
        match bank {
            Bank::Near => self.near_anchor.to_vec2(),
            Bank::Far => self.far_anchor.to_vec2(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ActorLayout {
    pub(crate) size: ConfigSize,
    pub(crate) cannibal_near: HomeRow,
    pub(crate) cannibal_far: HomeRow,
    pub(crate) missionary_near: HomeRow,
    pub(crate) missionary_far: HomeRow,
}

impl Default for ActorLayout {
    fn default() -> Self {
        Self {
            size: ConfigSize {
                width: 64.0,
                height: 110.0,
            },
            cannibal_near: HomeRow::new(
                ConfigPoint::new(1050.0, 350.0),
                ConfigPoint::new(70.0, 115.0),
            ),
            cannibal_far: HomeRow::new(
                ConfigPoint::new(180.0, 400.0),
                ConfigPoint::new(-50.0, 100.0),
            ),
            missionary_near: HomeRow::new(
                ConfigPoint::new(900.0, 375.0),
                ConfigPoint::new(50.0, 115.0),
            ),
            missionary_far: HomeRow::new(
                ConfigPoint::new(330.0, 425.0),
                ConfigPoint::new(-50.0, 100.0),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LossLayout {
    pub(crate) near_gather: ConfigPoint,
    pub(crate) far_gather: ConfigPoint,
    pub(crate) missionary_spread: f32,
}

impl Default for LossLayout {
    fn default() -> Self {
        Self {
            near_gather: ConfigPoint::new(950.0, 490.0),
            far_gather: ConfigPoint::new(280.0, 490.0),
            missionary_spread: 15.0,
        }
    }
}

impl LossLayout {
    pub(crate) fn gather(&self, bank: Bank) -> Vec2 {
        match bank {
            Bank::Near => self.near_gather.to_vec2(),
            Bank::Far => self.far_gather.to_vec2(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Timing {
    pub(crate) board_move_ms: u64,
    pub(crate) crossing_ms: u64,
    pub(crate) dim_ms: u64,
    pub(crate) reveal_delay_ms: u64,
    pub(crate) loss_cannibal_walk_ms: u64,
    pub(crate) loss_missionary_walk_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            board_move_ms: 1000,
            crossing_ms: 3000,
            dim_ms: 3000,
            reveal_delay_ms: 2000,
            loss_cannibal_walk_ms: 10_000,
            loss_missionary_walk_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PoseTiming {
    pub(crate) idle_period_frames: u32,
    pub(crate) move_period_frames: u32,
}

impl Default for PoseTiming {
    fn default() -> Self {
        Self {
            idle_period_frames: 120,
            move_period_frames: 15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct BoardConfig {
    pub(crate) raft: RaftLayout,
    pub(crate) actors: ActorLayout,
    pub(crate) loss: LossLayout,
    pub(crate) timing: Timing,
    pub(crate) poses: PoseTiming,
}

impl BoardConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let timings = [
            ("timing.board_move_ms", self.timing.board_move_ms),
            ("timing.crossing_ms", self.timing.crossing_ms),
            ("timing.dim_ms", self.timing.dim_ms),
            ("timing.reveal_delay_ms", self.timing.reveal_delay_ms),
            ("timing.loss_cannibal_walk_ms", self.timing.loss_cannibal_walk_ms),
            ("timing.loss_missionary_walk_ms", self.timing.loss_missionary_walk_ms),
        ];
        for (field, value) in timings {
            if value == 0 {
                return Err(invalid(field, "duration must be non-zero"));
            }
        }

        for (field, period) in [
            ("poses.idle_period_frames", self.poses.idle_period_frames),
            ("poses.move_period_frames", self.poses.move_period_frames),
        ] {
            if period == 0 {
                return Err(invalid(field, "pose period must be non-zero"));
            }
        }

        for (field, size) in [("raft.size", self.raft.size), ("actors.size", self.actors.size)] {
            if !(size.width.is_finite() && size.height.is_finite())
                || size.width <= 0.0
                || size.height <= 0.0
            {
                return Err(invalid(
                    field,
                    format!("size must be positive, got {}x{}", size.width, size.height),
                ));
            }
        }

        if !self.loss.missionary_spread.is_finite() {
            return Err(invalid("loss.missionary_spread", "must be finite"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

pub(crate) fn load_board_config(root: &Path) -> Result<(BoardConfig, ConfigSource), ConfigError> {
    let env_path = match env::var(CONFIG_ENV_VAR) {
        Ok(value) => Some(PathBuf::from(value)),
        Err(env::VarError::NotPresent) => None,
        Err(source) => {
            return Err(ConfigError::EnvVar {
                var: CONFIG_ENV_VAR,
                source,
            })
        }
    };
    resolve_board_config(env_path, root)
}

fn resolve_board_config(
    env_path: Option<PathBuf>,
    root: &Path,
) -> Result<(BoardConfig, ConfigSource), ConfigError> {
    if let Some(path) = env_path {
        let config = load_from_path(&path)?;
        return Ok((config, ConfigSource::Env(path)));
    }
    let project_file = root.join(CONFIG_FILE_NAME);
    if project_file.is_file() {
        let config = load_from_path(&project_file)?;
        return Ok((config, ConfigSource::ProjectFile(project_file)));
    }
    Ok((BoardConfig::default(), ConfigSource::Defaults))
}

pub(crate) fn load_from_path(path: &Path) -> Result<BoardConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_board_config(&raw).map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })?;
    config.validate()?;
    Ok(config)
}

fn parse_board_config(raw: &str) -> Result<BoardConfig, String> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, BoardConfig>(&mut deserializer).map_err(|error| {
        let path = error.path().to_string();
        let source = error.into_inner();
        if path.is_empty() || path == "." {
            source.to_string()
        } else {
            format!("at {path}: {source}")
        }
    })
}
