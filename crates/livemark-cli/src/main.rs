mod replay;

use anyhow::{Context, Result};
use livemark_config::Config;
use livemark_engine::Preferences;
use std::{env, io::stdout, path::PathBuf, process};

use replay::{Replay, parse_script};

fn preferences(config: &Config) -> Preferences {
    Preferences {
        prefer_loose_list_item: config.prefer_loose_list_item,
        auto_pair_bracket: config.auto_pair_bracket,
        auto_pair_quote: config.auto_pair_quote,
        auto_pair_markdown_syntax: config.auto_pair_markdown_syntax,
    }
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} <script> [--config <path>]");
    process::exit(1);
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let (script_path, config_path) = match args.as_slice() {
        [_, script] => (PathBuf::from(script), Config::config_path()),
        [_, script, flag, path] if flag == "--config" => (PathBuf::from(script), PathBuf::from(path)),
        _ => usage(args.first().map_or("livemark-replay", String::as_str)),
    };

    let config = match Config::load_from_path(&config_path) {
        Ok(Some(config)) => {
            log::info!("Loaded config from {}", config_path.display());
            config
        }
        Ok(None) => {
            log::info!("No config at {}, using defaults", config_path.display());
            Config::default()
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let script = std::fs::read_to_string(&script_path)
        .with_context(|| format!("reading script {}", script_path.display()))?;
    let commands = parse_script(&script)?;

    let mut replay = Replay::new(preferences(&config))?;
    let mut out = stdout().lock();
    for command in &commands {
        replay.run(command, &mut out)?;
    }
    log::info!(
        "Replayed {} commands with {} renders",
        commands.len(),
        replay.render_count()
    );
    Ok(())
}
