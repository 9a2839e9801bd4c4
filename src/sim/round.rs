//! Round state machine
//!
//! A `RoundController` owns one game, the round's score/lives/level, the
//! seeded RNG, the clock and the persisted best score. Each host frame it
//! runs the fixed phase order
//!
//! clock -> spawn -> advance -> resolve -> apply events -> prune -> draw
//!
//! and then clears the one-shot inputs. Once the round is Won or Lost the
//! simulation phases are skipped but the frozen frame is still drawn, until
//! `restart`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::events::{EventKind, GameEvent, Subject};
use crate::highscores::HighScore;
use crate::platform::input::InputState;
use crate::platform::storage::KeyValueStore;
use crate::renderer::{Frame, RenderSurface};

/// Per-tick view handed to the game hooks
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    pub now_ms: f64,
    /// Milliseconds since the previous tick (0 on the first tick of a round)
    pub elapsed_ms: f64,
    pub input: &'a InputState,
}

/// Pluggable per-game behavior, one hook per loop phase
pub trait Game {
    fn name(&self) -> &'static str;

    /// Storage key of this game's best score
    fn storage_key(&self) -> &'static str;

    /// `None` for games without lives
    fn starting_lives(&self) -> Option<u32> {
        None
    }

    /// Score at which the round is won
    fn win_score(&self) -> Option<u32> {
        None
    }

    /// Points per level; `None` for games without levels
    fn level_step(&self) -> Option<u32> {
        None
    }

    fn pausable(&self) -> bool {
        false
    }

    /// Actor length for the HUD (snake)
    fn length(&self) -> Option<usize> {
        None
    }

    /// Back to the start-of-round state: empty pool, fresh timers, actor at home
    fn reset(&mut self, rng: &mut Pcg32);

    fn spawn(&mut self, ctx: &TickContext<'_>, rng: &mut Pcg32);

    fn advance(&mut self, ctx: &TickContext<'_>, rng: &mut Pcg32);

    fn resolve(&mut self, ctx: &TickContext<'_>, rng: &mut Pcg32) -> Vec<GameEvent>;

    fn prune(&mut self);

    fn draw(&self, round: &RoundState, frame: &mut Frame);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    Running,
    Won,
    Lost,
}

impl RoundPhase {
    pub fn is_over(self) -> bool {
        self != RoundPhase::Running
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub phase: RoundPhase,
    pub score: u32,
    pub lives: Option<u32>,
    pub level: u32,
    pub paused: bool,
    /// Set when the finished round beat the stored best
    pub new_best: bool,
    /// Simulated ticks this round (paused and finished ticks excluded)
    pub ticks: u64,
}

impl RoundState {
    fn fresh(lives: Option<u32>) -> Self {
        Self {
            phase: RoundPhase::Running,
            score: 0,
            lives,
            level: 1,
            paused: false,
            new_best: false,
            ticks: 0,
        }
    }

    /// Running and not paused
    pub fn is_live(&self) -> bool {
        self.phase == RoundPhase::Running && !self.paused
    }
}

/// Snapshot for the HUD, taken after every tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u32,
    pub lives: Option<u32>,
    pub level: Option<u32>,
    pub length: Option<usize>,
    pub best: u32,
    pub phase: RoundPhase,
    pub paused: bool,
    pub new_best: bool,
}

pub struct RoundController<G: Game + ?Sized> {
    game: Box<G>,
    state: RoundState,
    rng: Pcg32,
    clock: Clock,
    high_score: HighScore,
    store: Box<dyn KeyValueStore>,
    frame: Frame,
}

impl<G: Game + ?Sized> RoundController<G> {
    /// Start a round. The best score is read from `store` once, here.
    pub fn new(mut game: Box<G>, seed: u64, store: Box<dyn KeyValueStore>) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        game.reset(&mut rng);
        let high_score = HighScore::load(game.storage_key(), store.as_ref());
        let state = RoundState::fresh(game.starting_lives());
        log::info!("{} round started (seed {})", game.name(), seed);
        Self {
            game,
            state,
            rng,
            clock: Clock::new(),
            high_score,
            store,
            frame: Frame::new(),
        }
    }

    /// Run one frame and paint it onto `surface`. Returns the events this
    /// tick produced (empty while paused or finished).
    pub fn tick(
        &mut self,
        now_ms: f64,
        input: &mut InputState,
        surface: &mut dyn RenderSurface,
    ) -> Vec<GameEvent> {
        let elapsed_ms = self.clock.tick(now_ms);

        if input.pause_requested {
            self.toggle_pause();
        }

        let mut events = Vec::new();
        if self.state.is_live() {
            let ctx = TickContext {
                now_ms,
                elapsed_ms,
                input,
            };
            self.game.spawn(&ctx, &mut self.rng);
            self.game.advance(&ctx, &mut self.rng);
            events = self.game.resolve(&ctx, &mut self.rng);
            self.apply(&events);
            self.game.prune();
            self.state.ticks += 1;
        }

        self.frame = Frame::new();
        self.game.draw(&self.state, &mut self.frame);
        self.frame.replay(surface);

        input.clear_one_shots();
        events
    }

    /// Fold one tick's events into the round state
    fn apply(&mut self, events: &[GameEvent]) {
        let mut outcome = None;

        for event in events {
            match event.kind {
                EventKind::Hit if event.subject == Subject::Player => {
                    if let Some(lives) = self.state.lives.as_mut() {
                        *lives = lives.saturating_sub(1);
                        log::debug!("Player hit, {} lives left", lives);
                        if *lives == 0 {
                            outcome.get_or_insert(RoundPhase::Lost);
                        }
                    }
                }
                EventKind::Scored { points } => {
                    self.state.score = self.state.score.saturating_add(points);
                    if self.game.win_score().is_some_and(|win| self.state.score >= win) {
                        outcome.get_or_insert(RoundPhase::Won);
                    }
                }
                EventKind::Fatal => {
                    outcome.get_or_insert(RoundPhase::Lost);
                }
                EventKind::Cleared => {
                    outcome.get_or_insert(RoundPhase::Won);
                }
                EventKind::Hit | EventKind::Destroyed => {}
            }
        }

        if let Some(step) = self.game.level_step() {
            while self.state.score > self.state.level.saturating_mul(step) {
                self.state.level += 1;
                log::debug!("Level up: {}", self.state.level);
            }
        }

        if let Some(phase) = outcome {
            self.finish(phase);
        }
    }

    fn finish(&mut self, phase: RoundPhase) {
        self.state.phase = phase;
        log::info!(
            "{} round {:?} with score {}",
            self.game.name(),
            phase,
            self.state.score
        );
        if self.high_score.record(self.state.score) {
            self.state.new_best = true;
            log::info!("New best score for {}: {}", self.game.name(), self.state.score);
            self.high_score.save(self.store.as_mut());
        }
    }

    /// Reset everything except the best score and the RNG stream
    pub fn restart(&mut self) {
        self.game.reset(&mut self.rng);
        self.state = RoundState::fresh(self.game.starting_lives());
        self.clock.reset();
        self.frame = Frame::new();
        log::info!("{} round restarted", self.game.name());
    }

    /// Flip pause for pausable games while the round is running
    pub fn toggle_pause(&mut self) -> bool {
        if self.game.pausable() && self.state.phase == RoundPhase::Running {
            self.state.paused = !self.state.paused;
            log::debug!("Paused: {}", self.state.paused);
        }
        self.state.paused
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.state.score,
            lives: self.state.lives,
            level: self.game.level_step().map(|_| self.state.level),
            length: self.game.length(),
            best: self.high_score.best(),
            phase: self.state.phase,
            paused: self.state.paused,
            new_best: self.state.new_best,
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn phase(&self) -> RoundPhase {
        self.state.phase
    }

    pub fn best(&self) -> u32 {
        self.high_score.best()
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    /// Last frame drawn
    pub fn frame(&self) -> &Frame {
        &self.frame
    }
}
