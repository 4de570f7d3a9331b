//! Headless game session that replays scripted input against the world.

use forbidden_island_core::{Command, Event};
use forbidden_island_system_analytics::{Analytics, FloodReport};
use forbidden_island_world::{self as world, query, World};

use crate::script::Token;

/// Drives the world one step at a time and feeds the analytics system.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    analytics: Analytics,
    reports: Vec<FloodReport>,
    events: Vec<Event>,
    paused: bool,
    steps: u32,
}

impl Session {
    pub(crate) fn new(world: World) -> Self {
        Self {
            world,
            analytics: Analytics::new(),
            reports: Vec::new(),
            events: Vec::new(),
            paused: false,
            steps: 0,
        }
    }

    /// Consumes one token per step until the game is decided or `budget`
    /// steps have elapsed. Missing tokens are treated as waits.
    pub(crate) fn run(&mut self, tokens: &[Token], budget: u32) {
        let mut tokens = tokens.iter().copied();
        while self.steps < budget && !query::outcome(&self.world).is_decided() {
            let token = tokens.next().unwrap_or(Token::Wait);
            self.step(token);
        }
    }

    fn step(&mut self, token: Token) {
        self.steps += 1;
        match token {
            Token::Pause => {
                self.paused = !self.paused;
                log::debug!("session {}", if self.paused { "paused" } else { "resumed" });
            }
            Token::Reset(strategy) => {
                let seed = query::seed(&self.world);
                self.paused = false;
                self.submit(Command::Reset { strategy, seed });
            }
            Token::Move(direction) if !self.paused => {
                self.submit(Command::MovePlayer { direction });
            }
            Token::Move(_) | Token::Wait => {}
        }

        if !self.paused {
            self.submit(Command::Tick);
        }
    }

    fn submit(&mut self, command: Command) {
        self.events.clear();
        world::apply(&mut self.world, command, &mut self.events);
        self.analytics.handle(&self.events, &mut self.reports);
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn summary(&self) -> FloodReport {
        self.analytics.summary()
    }

    /// Reports published since the session started.
    pub(crate) fn reports(&self) -> &[FloodReport] {
        &self.reports
    }

    pub(crate) fn steps(&self) -> u32 {
        self.steps
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused
    }
}
