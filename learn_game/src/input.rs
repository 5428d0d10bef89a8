use crate::error::GameError;
use std::io::{BufRead, Write};

/// Source of moves for a human player.
pub trait MoveSource {
    /// Next requested square as 1-indexed (row, column).
    fn request_move(&mut self) -> Result<(usize, usize), GameError>;
}

/// Prompts on `output` and reads one number per line from `input`.
pub struct ConsoleInput<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleInput<R, W> {
    pub fn new(input: R, output: W) -> Self {
        ConsoleInput { input, output }
    }

    fn ask(&mut self, prompt: &str) -> Result<usize, GameError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(GameError::InputClosed);
        }
        line.trim()
            .parse()
            .map_err(|_| GameError::MalformedInput(line.trim().to_owned()))
    }
}

impl<R: BufRead, W: Write> MoveSource for ConsoleInput<R, W> {
    fn request_move(&mut self) -> Result<(usize, usize), GameError> {
        let row = self.ask("Input your action row:")?;
        let col = self.ask("Input your action col:")?;
        Ok((row, col))
    }
}
