//! Headless voxtris runner (default binary).
//!
//! Plays one match without a renderer and prints a summary, or the final
//! snapshot as JSON with `--json`. Logging goes through `env_logger`
//! (`RUST_LOG=debug` for per-command output).

use anyhow::Result;
use serde_json::json;

use voxtris::core::HeadlessMatch;
use voxtris::run::{drive, load_config, parse_run_args, USAGE};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let run_args = parse_run_args(&args)?;
    if run_args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = load_config(&run_args)?;
    log::info!(
        "grid {}x{}x{}, seed {}",
        config.width,
        config.height,
        config.depth,
        config.seed
    );

    let mut game = HeadlessMatch::headless(config)?;
    let summary = drive(&mut game, &run_args);

    if run_args.json {
        let out = json!({
            "summary": summary,
            "snapshot": game.snapshot(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "ticks {}  commands {}/{}  locks {}  planes {}  score {}  level {}{}",
            summary.ticks,
            summary.accepted,
            summary.commands,
            summary.locks,
            summary.planes_cleared,
            summary.score,
            summary.level,
            if summary.game_over { "  (game over)" } else { "" }
        );
    }
    Ok(())
}
