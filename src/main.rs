use anyhow::Context;
use bias::Config;
use bias::config::FocusPolicy;
use bias::replay::{Replay, Script};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BIAS_GIT_HASH"), ")");

#[derive(Parser, Debug)]
#[command(name = "bias")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Replay scripted pointer input against a scene of ellipse grabbers")]
struct Cli {
    /// Replay script (TOML file of [[sample]] tables)
    #[arg(long, short = 's', value_name = "FILE")]
    script: Option<PathBuf>,

    /// Config file to use instead of ~/.config/bias/config.toml
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Start in click-to-pick focus mode
    #[arg(long, action = ArgAction::SetTrue)]
    click_to_pick: bool,

    /// Number of ellipses in the scene
    #[arg(long, short = 'n', value_name = "N")]
    ellipses: Option<usize>,

    /// Seed for ellipse placement and colors
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let Some(script_path) = cli.script else {
        // No script: show usage
        println!("bias: input dispatch replay");
        println!();
        println!("Usage:");
        println!("  bias --script <FILE>            Replay a script against a random scene");
        println!("  bias --script <FILE> --json     Print the report as JSON");
        println!("  bias --help                     Show all options");
        println!();
        println!("Script format:");
        println!("  [[sample]]");
        println!("  kind = \"move\"        # move, press, drag, release, wheel, click, key, toggle_policy");
        println!("  x = 105.0");
        println!("  y = 105.0");
        println!("  modifiers = [\"ctrl\"]");
        println!("  tick = true          # finalize the frame after this sample");
        return Ok(());
    };

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if cli.click_to_pick {
        config.agent.focus_policy = FocusPolicy::ClickToPick;
    }
    if let Some(count) = cli.ellipses {
        config.scene.ellipses = count;
    }
    if cli.seed.is_some() {
        config.scene.seed = cli.seed;
    }
    config.validate_and_clamp();

    let script = Script::load(&script_path)?;
    let mut replay = Replay::new(&config).context("Failed to build scene")?;
    let report = replay.run(&script)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }

    Ok(())
}
