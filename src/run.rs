//! Headless match driver.
//!
//! Runs a match without any renderer: commands come from a script or from a
//! seeded random source, one command every [`COMMAND_EVERY`] ticks.
//!
//! ```text
//! voxtris [--config FILE] [--seed N] [--ticks N] [--dt SECONDS]
//!         [--script cmd,cmd,...] [--json]
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::Serialize;

use crate::core::{HeadlessMatch, MatchConfig, SimpleRng};
use crate::types::{Axis, BoardTurn, Command, Direction, MatchEvent};

pub const DEFAULT_TICKS: u32 = 3600;
pub const DEFAULT_DT: f64 = 1.0 / 60.0;

/// Ticks between two driver commands
pub const COMMAND_EVERY: u32 = 12;

pub const USAGE: &str = "usage: voxtris [--config FILE] [--seed N] [--ticks N] [--dt SECONDS] [--script cmd,cmd,...] [--json]";

/// Commands the random driver picks from
const RANDOM_POOL: [Command; 10] = [
    Command::Move(Direction::Left),
    Command::Move(Direction::Right),
    Command::Move(Direction::Forward),
    Command::Move(Direction::Back),
    Command::Move(Direction::Down),
    Command::Rotate(Axis::X),
    Command::Rotate(Axis::Y),
    Command::Rotate(Axis::Z),
    Command::RotateBoard(BoardTurn::Clockwise),
    Command::RotateBoard(BoardTurn::CounterClockwise),
];

#[derive(Debug, Clone, PartialEq)]
pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub seed: Option<u32>,
    pub ticks: u32,
    pub dt: f64,
    pub script: Vec<Command>,
    pub json: bool,
    pub help: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            config: None,
            seed: None,
            ticks: DEFAULT_TICKS,
            dt: DEFAULT_DT,
            script: Vec::new(),
            json: false,
            help: false,
        }
    }
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a String> {
    args.get(i)
        .ok_or_else(|| anyhow!("missing value for {}", flag))
}

/// Parse a comma separated command list (`moveLeft,rotateY,...`)
pub fn parse_script(s: &str) -> Result<Vec<Command>> {
    s.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| Command::from_str(c).ok_or_else(|| anyhow!("unknown command in script: {}", c)))
        .collect()
}

pub fn parse_run_args(args: &[String]) -> Result<RunArgs> {
    let mut out = RunArgs::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                out.config = Some(PathBuf::from(flag_value(args, i, "--config")?));
            }
            "--seed" => {
                i += 1;
                let v = flag_value(args, i, "--seed")?;
                let seed = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("invalid --seed value: {}", v))?;
                out.seed = Some(seed);
            }
            "--ticks" => {
                i += 1;
                let v = flag_value(args, i, "--ticks")?;
                out.ticks = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("invalid --ticks value: {}", v))?;
            }
            "--dt" => {
                i += 1;
                let v = flag_value(args, i, "--dt")?;
                let dt = v
                    .parse::<f64>()
                    .map_err(|_| anyhow!("invalid --dt value: {}", v))?;
                if !(dt.is_finite() && dt > 0.0) {
                    return Err(anyhow!("--dt must be positive, got {}", v));
                }
                out.dt = dt;
            }
            "--script" => {
                i += 1;
                out.script = parse_script(flag_value(args, i, "--script")?)?;
            }
            "--json" => out.json = true,
            "-h" | "--help" => out.help = true,
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(out)
}

/// Read the TOML config (if any) and apply command line overrides
pub fn load_config(args: &RunArgs) -> Result<MatchConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            MatchConfig::from_toml_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => MatchConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

/// Script playback, or seeded random commands when the script is empty
#[derive(Debug, Clone)]
pub struct CommandSource {
    script: Vec<Command>,
    next: usize,
    rng: SimpleRng,
}

impl CommandSource {
    pub fn new(script: Vec<Command>, seed: u32) -> Self {
        Self {
            script,
            next: 0,
            // Decorrelate from the spawn sequence
            rng: SimpleRng::new(seed.wrapping_mul(2654435761)),
        }
    }

    pub fn next_command(&mut self) -> Command {
        if self.script.is_empty() {
            return RANDOM_POOL[self.rng.next_range(RANDOM_POOL.len() as u32) as usize];
        }
        let cmd = self.script[self.next % self.script.len()];
        self.next += 1;
        cmd
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u32,
    pub commands: u32,
    pub accepted: u32,
    pub locks: u32,
    pub planes_cleared: u32,
    pub score: u64,
    pub level: u32,
    pub game_over: bool,
}

/// Start the match and run it for `args.ticks` ticks or until game over
pub fn drive(game: &mut HeadlessMatch, args: &RunArgs) -> RunSummary {
    game.start();
    let mut source = CommandSource::new(args.script.clone(), game.config().seed);
    let mut summary = RunSummary::default();

    for tick in 0..args.ticks {
        if game.game_over() {
            break;
        }
        if tick % COMMAND_EVERY == 0 {
            let cmd = source.next_command();
            summary.commands += 1;
            if game.apply_command(cmd) {
                summary.accepted += 1;
                debug!("tick {}: {}", tick, cmd.as_str());
            }
        }
        game.tick(args.dt);
        summary.ticks += 1;

        for event in game.audio_mut().drain() {
            match event {
                MatchEvent::Locked => summary.locks += 1,
                MatchEvent::Cleared { planes } => info!("tick {}: cleared {} planes", tick, planes),
                MatchEvent::GameOver => info!("tick {}: game over", tick),
            }
        }
    }

    summary.planes_cleared = game.scores().planes_cleared();
    summary.score = game.scores().score();
    summary.level = game.scores().level();
    summary.game_over = game.game_over();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_run_args_uses_defaults() {
        let args = parse_run_args(&[]).unwrap();
        assert_eq!(args, RunArgs::default());
    }

    #[test]
    fn test_parse_run_args_reads_every_flag() {
        let args = parse_run_args(&strings(&[
            "--seed", "9", "--ticks", "100", "--dt", "0.5", "--script", "moveLeft, turnBoardCw", "--json",
        ]))
        .unwrap();
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.ticks, 100);
        assert_eq!(args.dt, 0.5);
        assert_eq!(
            args.script,
            vec![
                Command::Move(Direction::Left),
                Command::RotateBoard(BoardTurn::Clockwise)
            ]
        );
        assert!(args.json);
    }

    #[test]
    fn test_parse_run_args_rejects_bad_input() {
        assert!(parse_run_args(&strings(&["--ticks"])).is_err());
        assert!(parse_run_args(&strings(&["--dt", "0"])).is_err());
        assert!(parse_run_args(&strings(&["--script", "jump"])).is_err());
        assert!(parse_run_args(&strings(&["--verbose"])).is_err());
    }

    #[test]
    fn test_seed_override_applies_without_file() {
        let args = RunArgs {
            seed: Some(77),
            ..RunArgs::default()
        };
        assert_eq!(load_config(&args).unwrap().seed, 77);
    }

    #[test]
    fn test_script_source_cycles() {
        let mut src = CommandSource::new(vec![Command::Pause, Command::Restart], 1);
        assert_eq!(src.next_command(), Command::Pause);
        assert_eq!(src.next_command(), Command::Restart);
        assert_eq!(src.next_command(), Command::Pause);
    }

    #[test]
    fn test_drive_is_deterministic() {
        let args = RunArgs {
            ticks: 2000,
            dt: 0.1,
            ..RunArgs::default()
        };
        let run = || {
            let mut game = HeadlessMatch::headless(MatchConfig::default()).unwrap();
            let summary = drive(&mut game, &args);
            (summary, game.snapshot())
        };
        let (a, snap_a) = run();
        let (b, snap_b) = run();
        assert_eq!(a, b);
        assert_eq!(snap_a, snap_b);
        assert!(a.locks > 0);
    }
}
