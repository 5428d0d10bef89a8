use crate::board::{GameState, Mark, Position};
use crate::config::AgentConfig;
use crate::error::GameError;
use crate::input::MoveSource;
use crate::value_table::ValueTable;
use log::debug;
use rand::prelude::SliceRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// A seat at the table. The engine only looks at the variant to decide which
/// context the move request needs.
#[derive(Debug)]
pub enum Player {
    Computer(ComputerPlayer),
    Human(HumanPlayer),
}

/// Learns state values from its own games and plays greedily on them.
#[derive(Debug)]
pub struct ComputerPlayer {
    name: String,
    learning_rate: f64,
    exploration_prob: f64,
    discount_factor: f64,
    states: Vec<String>,
    values: ValueTable,
    rng: StdRng,
}

pub struct HumanPlayer {
    name: String,
    input: Box<dyn MoveSource>,
}

impl fmt::Debug for HumanPlayer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("HumanPlayer").field("name", &self.name).finish()
    }
}

impl Player {
    pub fn get_name(&self) -> &str {
        match self {
            Player::Computer(player) => &player.name,
            Player::Human(player) => &player.name,
        }
    }
    pub fn as_computer(&self) -> Option<&ComputerPlayer> {
        match self {
            Player::Computer(player) => Some(player),
            Player::Human(_) => None,
        }
    }
    /// Humans don't learn.
    pub fn reward(&mut self, reward: f64) {
        if let Player::Computer(player) = self {
            player.apply_reward(reward);
        }
    }
    pub fn reset(&mut self) {
        if let Player::Computer(player) = self {
            player.clear_trace();
        }
    }
}

impl ComputerPlayer {
    pub fn new(name: impl Into<String>, config: &AgentConfig) -> Self {
        ComputerPlayer {
            name: name.into(),
            learning_rate: config.learning_rate,
            exploration_prob: config.exploration_prob,
            discount_factor: config.discount_factor,
            states: Vec::new(),
            values: ValueTable::new(),
            rng: StdRng::from_entropy(),
        }
    }
    /// Starts from an already trained table.
    pub fn with_values(mut self, values: ValueTable) -> Self {
        self.values = values;
        self
    }
    /// Makes exploration reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
    pub fn get_name(&self) -> &str {
        &self.name
    }
    pub fn values(&self) -> &ValueTable {
        &self.values
    }
    /// States visited in the current episode, oldest first.
    pub fn trace(&self) -> &[String] {
        &self.states
    }

    /// Explores with probability `exploration_prob`, otherwise picks the
    /// square whose resulting state has the highest value. Ties go to the
    /// earliest square in `available`.
    pub fn choose_move(
        &mut self,
        available: &[Position],
        grid: &GameState,
        mark: Mark,
    ) -> Option<Position> {
        if self.rng.gen::<f64>() < self.exploration_prob {
            return available.choose(&mut self.rng).copied();
        }
        let mut best: Option<(Position, f64)> = None;
        for &position in available {
            let mut next_state = grid.clone();
            if next_state.place(position, mark).is_err() {
                continue;
            }
            let value = self.values.value(&next_state.canonical_hash());
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((position, value)),
            }
        }
        best.map(|(position, _)| position)
    }

    pub fn record_visited(&mut self, state_key: String) {
        self.states.push(state_key);
    }

    /// Backs `reward` up the trace, newest state first. Each earlier state is
    /// moved toward the freshly updated value of the state that followed it.
    pub fn apply_reward(&mut self, reward: f64) {
        let mut target = reward;
        for state in self.states.iter().rev() {
            target = self
                .values
                .update(state, self.learning_rate, self.discount_factor * target);
        }
        debug!(
            "{} applied reward {} over {} states",
            self.name,
            reward,
            self.states.len()
        );
    }

    pub fn clear_trace(&mut self) {
        self.states.clear();
    }
}

impl HumanPlayer {
    pub fn new(name: impl Into<String>, input: Box<dyn MoveSource>) -> Self {
        HumanPlayer {
            name: name.into(),
            input,
        }
    }
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Keeps asking until the answer is one of `available`. Answers are
    /// 1-indexed.
    pub fn choose_move(&mut self, available: &[Position]) -> Result<Position, GameError> {
        if available.is_empty() {
            return Err(GameError::NoAvailableMoves);
        }
        loop {
            match self.input.request_move() {
                Ok((row, col)) => {
                    let position = row.checked_sub(1).zip(col.checked_sub(1));
                    match position {
                        Some(position) if available.contains(&position) => return Ok(position),
                        _ => debug!("{} picked unavailable square ({}, {})", self.name, row, col),
                    }
                }
                Err(GameError::MalformedInput(text)) => {
                    debug!("{} typed unreadable move {:?}", self.name, text)
                }
                Err(e) => return Err(e),
            }
        }
    }
}
