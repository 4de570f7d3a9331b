//! Parsing of scripted key presses.

use anyhow::{bail, Result};
use forbidden_island_core::{Direction, TerrainStrategy};

/// Input consumed by the session once per step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Token {
    /// Step the player once in a direction.
    Move(Direction),
    /// Let the step pass without input.
    Wait,
    /// Toggle the pause state.
    Pause,
    /// Rebuild the island with the given generator.
    Reset(TerrainStrategy),
}

impl Token {
    fn parse(word: &str) -> Result<Self> {
        let token = match word.to_ascii_lowercase().as_str() {
            "up" => Self::Move(Direction::Up),
            "down" => Self::Move(Direction::Down),
            "left" => Self::Move(Direction::Left),
            "right" => Self::Move(Direction::Right),
            "wait" => Self::Wait,
            "p" | "pause" => Self::Pause,
            "m" | "pyramid" => Self::Reset(TerrainStrategy::Pyramid),
            "r" | "random" => Self::Reset(TerrainStrategy::Random),
            "t" | "fractal" => Self::Reset(TerrainStrategy::Fractal),
            other => bail!("unknown script token `{other}`"),
        };
        Ok(token)
    }
}

/// Splits a script on whitespace and commas into tokens.
pub(crate) fn parse(script: &str) -> Result<Vec<Token>> {
    script
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|word| !word.is_empty())
        .map(Token::parse)
        .collect()
}
