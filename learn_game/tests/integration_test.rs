use learn_game::board::Outcome;
use learn_game::config::AppConfig;
use learn_game::error::GameError;
use learn_game::input::ConsoleInput;
use learn_game::value_table::{value_table_from_disk, value_table_to_disk, ModelFormat, ValueTable};
use learn_game::{play_game_human_computer_player, train_rl_agent};
use std::io::{self, Cursor};
use std::path::Path;
use tempfile::TempDir;

fn config_in(dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.model_dir = dir.to_path_buf();
    config.training.episodes = 300;
    config.training.log_interval = 100;
    config
}

fn console(script: &str) -> Box<ConsoleInput<Cursor<Vec<u8>>, io::Sink>> {
    Box::new(ConsoleInput::new(
        Cursor::new(script.as_bytes().to_vec()),
        io::sink(),
    ))
}

#[test]
fn trained_model_survives_the_disk() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let mut config = config_in(dir.path());
    config.agent.exploration_prob = 0.3;
    let (summary, path) = train_rl_agent(&config, "selfplay", Some(42))?;
    assert_eq!(summary.episodes, 300);
    assert_eq!(summary.cross_wins + summary.nought_wins + summary.draws, 300);
    assert!(path.ends_with("model[selfplay].json"));

    let loaded = value_table_from_disk(dir.path(), "selfplay", ModelFormat::Json)?;
    assert!(!loaded.is_empty());
    assert!(loaded.keys().all(|key| key.len() == 9));
    Ok(())
}

#[test]
fn pickle_models_can_be_played() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let mut config = config_in(dir.path());
    config.storage.format = ModelFormat::Pickle;
    train_rl_agent(&config, "pickled", Some(1))?;

    // The human takes the first free square in row-major order.
    let script = "1\n1\n1\n2\n1\n3\n2\n1\n2\n2\n2\n3\n3\n1\n3\n2\n3\n3\n";
    let mut out = Vec::new();
    let played = play_game_human_computer_player(&config, "pickled", console(script), &mut out, Some(1))?;
    assert_eq!(played, 1);
    let text = String::from_utf8(out)?;
    assert!(text.ends_with("Computer wins\n") || text.ends_with("Human wins\n") || text.ends_with("draw\n"));
    Ok(())
}

#[test]
fn outside_test() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let config = config_in(dir.path());
    value_table_to_disk(dir.path(), "blank", ModelFormat::Json, &ValueTable::new())?;

    // Garbage and a taken square are asked again; then the input runs dry
    // at the start of the second game.
    let script = "abc\n1\n1\n1\n2\n2\n1\n2\n3\n";
    let mut out = Vec::new();
    let played = play_game_human_computer_player(&config, "blank", console(script), &mut out, None)?;
    assert_eq!(played, 1);
    let text = String::from_utf8(out)?;
    assert!(text.contains("| x | o | x | \n"));
    assert_eq!(text.matches("Computer wins\n").count(), 1);
    Ok(())
}

#[test]
fn missing_model_stops_before_any_game() {
    let dir = TempDir::new().unwrap();
    let config = config_in(dir.path());
    let mut out = Vec::new();
    let result = play_game_human_computer_player(&config, "absent", console("1\n1\n"), &mut out, Some(1));
    assert!(matches!(result, Err(GameError::MissingModel { .. })));
    assert!(out.is_empty());
}

#[test]
fn invalid_config_is_refused() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(dir.path());
    config.agent.learning_rate = 2.0;
    assert!(matches!(
        train_rl_agent(&config, "never", None),
        Err(GameError::Config(_))
    ));
    assert!(!dir.path().join("model[never].json").exists());
}

#[test]
fn outcome_is_terminal_only_when_over() {
    assert!(Outcome::CrossWins.is_over());
    assert!(Outcome::Drawn.is_over());
    assert!(!Outcome::InPlay.is_over());
}
