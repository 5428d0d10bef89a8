use crate::board::{GameState, Mark, Outcome};
use crate::config::{AppConfig, GameConfig, TrainingConfig};
use crate::error::GameError;
use crate::input::MoveSource;
use crate::players::{ComputerPlayer, HumanPlayer, Player};
use crate::value_table::{value_table_from_disk, value_table_to_disk};
use chrono::{DateTime, Local};
use log::{debug, info};
use std::io::Write;
use std::path::PathBuf;

pub mod board;
pub mod config;
pub mod error;
pub mod input;
pub mod players;
pub mod value_table;

/// Two players and a board. Player one holds `Mark::Cross` and always opens.
#[derive(Debug)]
pub struct Game {
    pub board: GameState,
    pub player_one: Player,
    pub player_two: Player,

    turn: Mark,
    episode: usize,
}

/// Results of a training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingSummary {
    pub episodes: usize,
    pub cross_wins: usize,
    pub nought_wins: usize,
    pub draws: usize,
    pub started: DateTime<Local>,
    pub elapsed: chrono::Duration,
}

/// Terminal rewards for (player one, player two).
pub fn reward_for(outcome: Outcome) -> Option<(f64, f64)> {
    match outcome {
        Outcome::CrossWins => Some((1.0, 0.0)),
        Outcome::NoughtWins => Some((0.0, 1.0)),
        Outcome::Drawn => Some((0.1, 0.5)),
        Outcome::InPlay => None,
    }
}

impl TrainingSummary {
    fn starting_now() -> Self {
        TrainingSummary {
            episodes: 0,
            cross_wins: 0,
            nought_wins: 0,
            draws: 0,
            started: Local::now(),
            elapsed: chrono::Duration::zero(),
        }
    }
    fn record(&mut self, outcome: Outcome) {
        self.episodes += 1;
        match outcome {
            Outcome::CrossWins => self.cross_wins += 1,
            Outcome::NoughtWins => self.nought_wins += 1,
            Outcome::Drawn => self.draws += 1,
            Outcome::InPlay => {}
        }
    }
}

impl Game {
    pub fn new(config: &GameConfig, player_one: Player, player_two: Player) -> Self {
        Game {
            board: GameState::new(config.board_size),
            player_one,
            player_two,
            turn: Mark::Cross,
            episode: 0,
        }
    }
    pub fn turn(&self) -> Mark {
        self.turn
    }
    /// Episodes finished so far.
    pub fn episode(&self) -> usize {
        self.episode
    }

    /// One placement by the player whose turn it is. Must only be called
    /// while the board is in play.
    pub fn step(&mut self) -> Result<Outcome, GameError> {
        let mark = self.turn;
        let available = self.board.available_positions();
        let player = match mark {
            Mark::Nought => &mut self.player_two,
            _ => &mut self.player_one,
        };
        let mv = match player {
            Player::Computer(agent) => agent
                .choose_move(&available, &self.board, mark)
                .ok_or(GameError::NoAvailableMoves)?,
            Player::Human(human) => human.choose_move(&available)?,
        };
        self.board.place(mv, mark)?;
        if let Player::Computer(agent) = player {
            agent.record_visited(self.board.canonical_hash());
        }
        self.turn = mark.other();
        Ok(self.board.winner())
    }

    /// Hands out the terminal rewards and starts a fresh board.
    pub fn finish_episode(&mut self, outcome: Outcome) {
        if let Some((one, two)) = reward_for(outcome) {
            self.player_one.reward(one);
            self.player_two.reward(two);
        }
        self.reset_board();
        self.episode += 1;
    }

    fn reset_board(&mut self) {
        self.player_one.reset();
        self.player_two.reset();
        self.board.clear();
        self.turn = Mark::Cross;
    }

    pub fn run_episode(&mut self) -> Result<Outcome, GameError> {
        loop {
            match self.step() {
                Ok(outcome) if outcome.is_over() => {
                    self.finish_episode(outcome);
                    return Ok(outcome);
                }
                Ok(_) => {}
                Err(e) => {
                    self.reset_board();
                    return Err(e);
                }
            }
        }
    }

    pub fn train(&mut self, config: &TrainingConfig) -> Result<TrainingSummary, GameError> {
        let mut summary = TrainingSummary::starting_now();
        let log_interval = config.log_interval.max(1);
        info!(
            "training for {} episodes, started {}",
            config.episodes,
            summary.started.format("%Y-%m-%d %H:%M:%S")
        );
        for i in 0..config.episodes {
            if i % log_interval == 0 {
                info!("Rounds {}", i);
            }
            let outcome = self.run_episode()?;
            debug!("episode {} ended {:?}", self.episode, outcome);
            summary.record(outcome);
        }
        summary.elapsed = Local::now() - summary.started;
        info!(
            "trained {} episodes in {}s: {} cross wins, {} nought wins, {} draws",
            summary.episodes,
            summary.elapsed.num_seconds(),
            summary.cross_wins,
            summary.nought_wins,
            summary.draws
        );
        Ok(summary)
    }

    /// Plays one episode, drawing the board after every placement and
    /// announcing the result.
    pub fn play<W: Write>(&mut self, out: &mut W) -> Result<Outcome, GameError> {
        loop {
            match self.play_turn(out) {
                Ok(outcome) if outcome.is_over() => {
                    self.finish_episode(outcome);
                    return Ok(outcome);
                }
                Ok(_) => {}
                Err(e) => {
                    self.reset_board();
                    return Err(e);
                }
            }
        }
    }

    fn play_turn<W: Write>(&mut self, out: &mut W) -> Result<Outcome, GameError> {
        let outcome = self.step()?;
        write!(out, "{}", self.board)?;
        match outcome {
            Outcome::CrossWins => writeln!(out, "{} wins", self.player_one.get_name())?,
            Outcome::NoughtWins => writeln!(out, "{} wins", self.player_two.get_name())?,
            Outcome::Drawn => writeln!(out, "draw")?,
            Outcome::InPlay => {}
        }
        Ok(outcome)
    }
}

/// Self-play between two fresh agents; player one's table is saved as `name`.
pub fn train_rl_agent(
    config: &AppConfig,
    name: &str,
    seed: Option<u64>,
) -> Result<(TrainingSummary, PathBuf), GameError> {
    config.validate()?;
    let mut player_one = ComputerPlayer::new("Player 1", &config.agent);
    let mut player_two = ComputerPlayer::new("Player 2", &config.agent);
    if let Some(seed) = seed {
        player_one = player_one.with_seed(seed);
        player_two = player_two.with_seed(seed.wrapping_add(1));
    }
    let mut game = Game::new(
        &config.game,
        Player::Computer(player_one),
        Player::Computer(player_two),
    );
    let summary = game.train(&config.training)?;
    let values = match &game.player_one {
        Player::Computer(agent) => agent.values(),
        Player::Human(_) => unreachable!("training seats two computer players"),
    };
    let path = value_table_to_disk(
        &config.storage.model_dir,
        name,
        config.storage.format,
        values,
    )?;
    info!("saved {} states to {}", values.len(), path.display());
    Ok((summary, path))
}

/// Loads the model `name` and plays it against a human until `rounds` games
/// are done or the input runs out. Returns the number of finished games.
pub fn play_game_human_computer_player<W: Write>(
    config: &AppConfig,
    name: &str,
    input: Box<dyn MoveSource>,
    out: &mut W,
    rounds: Option<usize>,
) -> Result<usize, GameError> {
    config.validate()?;
    let values = value_table_from_disk(&config.storage.model_dir, name, config.storage.format)?;
    info!("loaded model {} with {} states", name, values.len());
    let computer = ComputerPlayer::new("Computer", &config.agent).with_values(values);
    let human = HumanPlayer::new("Human", input);
    let mut game = Game::new(
        &config.game,
        Player::Computer(computer),
        Player::Human(human),
    );
    while rounds.map_or(true, |r| game.episode() < r) {
        match game.play(out) {
            Ok(outcome) => debug!("game {} ended {:?}", game.episode(), outcome),
            Err(GameError::InputClosed) => {
                info!("input closed after {} games", game.episode());
                break;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(game.episode())
}
