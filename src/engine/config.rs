// Runtime configuration: maze shape, wall geometry, input feel, tick rate.
// Command-line flags first, STEREO_MAZE_* environment variables as fallback.

use std::fmt;
use std::time::Duration;

use clap::Parser;

use super::collision::Margin;
use super::error::{ConfigError, ConfigResult};
use super::navigation::NavigationParams;

/// Maze dimensions in cells, written `WxH` on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MazeSize {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for MazeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

fn parse_maze_size(s: &str) -> Result<MazeSize, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let dim = |v: &str| match v.trim().parse::<u32>() {
        Ok(0) => Err(format!("maze dimensions must be at least 1, got {s:?}")),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("{v:?}: {e}")),
    };
    Ok(MazeSize {
        width: dim(w)?,
        height: dim(h)?,
    })
}

/// Explore a generated maze
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "stereo_maze", version)]
pub struct Config {
    /// Maze size in cells, WIDTHxHEIGHT
    #[arg(long, env = "STEREO_MAZE_SIZE", default_value = "10x10", value_parser = parse_maze_size)]
    pub maze_size: MazeSize,

    /// Shortcut attempts per cell side, on top of the perfect maze
    #[arg(long, env = "STEREO_MAZE_SHORTCUT_RATIO", default_value_t = 0.05)]
    pub shortcut_ratio: f64,

    /// Wall thickness, fractional cell
    #[arg(long, env = "STEREO_MAZE_WALL_WIDTH", default_value_t = 0.1)]
    pub wall_width: f64,

    /// Slope thickness, fractional cell. Added to the wall for the margin
    #[arg(long, env = "STEREO_MAZE_SLOPE_WIDTH", default_value_t = 0.2)]
    pub slope_width: f64,

    /// Fixed seed for reproducible mazes
    #[arg(long, env = "STEREO_MAZE_SEED")]
    pub seed: Option<u64>,

    /// Target acceleration at full input
    #[arg(long, env = "STEREO_MAZE_ACCELERATION", default_value_t = 0.2)]
    pub acceleration: f64,

    /// Navigation ticks per second
    #[arg(
        long = "tick-rate",
        env = "STEREO_MAZE_TICK_RATE",
        default_value_t = 60,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub ticks_per_second: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            maze_size: MazeSize {
                width: 10,
                height: 10,
            },
            shortcut_ratio: 0.05,
            wall_width: 0.1,
            slope_width: 0.2,
            seed: None,
            acceleration: 0.2,
            ticks_per_second: 60,
        }
    }
}

impl Config {
    pub fn margin_value(&self) -> f64 {
        self.wall_width + self.slope_width
    }

    /// Range checks clap can't express, the margin sum in particular.
    pub fn validate(&self) -> ConfigResult<()> {
        let MazeSize { width, height } = self.maze_size;
        check("maze-size width", width as f64, "[1, inf)", |v| v >= 1.0)?;
        check("maze-size height", height as f64, "[1, inf)", |v| v >= 1.0)?;
        check("shortcut-ratio", self.shortcut_ratio, "[0, inf)", |v| v >= 0.0)?;
        let half_cell = |v: f64| (0.0..0.5).contains(&v);
        check("wall-width", self.wall_width, "[0, 0.5)", half_cell)?;
        check("slope-width", self.slope_width, "[0, 0.5)", half_cell)?;
        check("wall-width + slope-width", self.margin_value(), "[0, 0.5)", half_cell)?;
        check("acceleration", self.acceleration, "(0, inf)", |v| v > 0.0)?;
        check("tick-rate", self.ticks_per_second as f64, "[1, inf)", |v| v >= 1.0)?;
        Ok(())
    }

    /// Call after `validate`; the margin constructor panics on bad values.
    pub fn navigation_params(&self) -> NavigationParams {
        NavigationParams {
            margin: Margin::new(self.margin_value()),
            ..NavigationParams::default()
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.ticks_per_second.max(1) as f64)
    }
}

fn check(
    key: &'static str,
    value: f64,
    range: &'static str,
    ok: impl Fn(f64) -> bool,
) -> ConfigResult<()> {
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { key, value, range })
    }
}
