use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use learn_game::config::AppConfig;
use learn_game::input::ConsoleInput;
use learn_game::value_table::ModelFormat;

/// Tic-tac-toe against a value-table agent trained by self-play.
#[derive(Parser)]
#[command(name = "tictactoe", about = "Train and play a tic-tac-toe value-table agent")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Model file format: json or pickle
    #[arg(long, global = true)]
    format: Option<ModelFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Let two agents play each other and save the first one's table
    Train {
        /// Name the model is saved under
        #[arg(long)]
        name: String,

        /// Override number of training episodes
        #[arg(long)]
        episodes: Option<usize>,

        #[arg(long)]
        learning_rate: Option<f64>,

        /// Probability of a random move
        #[arg(long)]
        exploration: Option<f64>,

        #[arg(long)]
        discount: Option<f64>,

        /// Seed the agents for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play against a trained model
    Play {
        /// Name of the saved model
        #[arg(long)]
        name: String,

        /// Stop after this many games (default: until input ends)
        #[arg(long)]
        rounds: Option<usize>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(format) = cli.format {
        config.storage.format = format;
    }

    match cli.command {
        Command::Train {
            name,
            episodes,
            learning_rate,
            exploration,
            discount,
            seed,
        } => {
            if let Some(episodes) = episodes {
                config.training.episodes = episodes;
            }
            if let Some(lr) = learning_rate {
                config.agent.learning_rate = lr;
            }
            if let Some(ep) = exploration {
                config.agent.exploration_prob = ep;
            }
            if let Some(df) = discount {
                config.agent.discount_factor = df;
            }
            let (summary, path) = learn_game::train_rl_agent(&config, &name, seed)
                .with_context(|| format!("training model '{name}'"))?;
            println!(
                "Trained {} episodes: {} x wins, {} o wins, {} draws. Saved to {}",
                summary.episodes,
                summary.cross_wins,
                summary.nought_wins,
                summary.draws,
                path.display()
            );
        }
        Command::Play { name, rounds } => {
            let input = Box::new(ConsoleInput::new(io::stdin().lock(), io::stdout()));
            let played = learn_game::play_game_human_computer_player(
                &config,
                &name,
                input,
                &mut io::stdout(),
                rounds,
            )
            .with_context(|| format!("playing against model '{name}'"))?;
            info!("played {} games", played);
        }
    }
    Ok(())
}
