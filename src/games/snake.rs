//! Snake
//!
//! Grid game on the same loop: the snake moves one cell whenever the step
//! gate fires, eats food to grow, and dies on walls or its own body.
//! Filling the board wins. Space pauses.

use glam::Vec2;
use rand_pcg::Pcg32;

use crate::renderer::{Frame, Style, TextAlign, TextStyle};
use crate::settings::SnakeTuning;
use crate::sim::clock::StepGate;
use crate::sim::collision::resolve_snake;
use crate::sim::entity::{Bounds, Color};
use crate::sim::events::GameEvent;
use crate::sim::grid::{Cell, Grid, Heading, Snake, spawn_food};
use crate::sim::round::{Game, RoundState, TickContext};

pub const STORAGE_KEY: &str = "snakeHighScore";

const HEAD_FILL: Color = Color::rgb(0x4A, 0xDE, 0x80);
const BODY_EDGE: Color = Color::rgb(0x22, 0xC5, 0x5E);
const APPLE_FILL: Color = Color::rgb(0xEF, 0x44, 0x44);
const APPLE_EDGE: Color = Color::rgb(0xDC, 0x26, 0x26);
const STEM: Color = Color::rgb(0x8B, 0x45, 0x13);

pub struct SnakeGame {
    tuning: SnakeTuning,
    bounds: Bounds,
    grid: Grid,
    snake: Snake,
    food: Option<Cell>,
    gate: StepGate,
    step_due: bool,
}

impl SnakeGame {
    pub fn new(tuning: SnakeTuning, bounds: Bounds) -> Self {
        let grid = Grid::new(
            (bounds.width / tuning.cell_px) as i32,
            (bounds.height / tuning.cell_px) as i32,
        );
        let snake = Snake::centered(&grid, tuning.start_length);
        let gate = StepGate::new(tuning.step_ms);
        Self {
            tuning,
            bounds,
            grid,
            snake,
            food: None,
            gate,
            step_due: false,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    /// Place the snake and food explicitly (scenario setup)
    pub fn set_board(&mut self, snake: Snake, food: Option<Cell>) {
        self.snake = snake;
        self.food = food;
    }

    fn cell_origin(&self, cell: Cell) -> Vec2 {
        cell.as_vec2() * self.tuning.cell_px
    }

    fn draw_grid(&self, frame: &mut Frame) {
        let color = Color::rgba(74, 222, 128, 0.1);
        let step = self.tuning.cell_px;
        let mut x = 0.0;
        while x <= self.bounds.width {
            frame.line(Vec2::new(x, 0.0), Vec2::new(x, self.bounds.height), color, 1.0);
            x += step;
        }
        let mut y = 0.0;
        while y <= self.bounds.height {
            frame.line(Vec2::new(0.0, y), Vec2::new(self.bounds.width, y), color, 1.0);
            y += step;
        }
    }

    fn draw_food(&self, frame: &mut Frame) {
        let Some(food) = self.food else {
            return;
        };
        let c = self.tuning.cell_px;
        let origin = self.cell_origin(food);
        let center = origin + Vec2::splat(c / 2.0);
        frame.circle(
            center,
            (c / 2.0 - 2.0).max(1.0),
            Style::fill(APPLE_FILL).with_stroke(APPLE_EDGE, 2.0),
        );
        frame.line(
            origin + Vec2::new(c / 2.0, 2.0),
            origin + Vec2::new(c / 2.0 + 3.0, -2.0),
            STEM,
            2.0,
        );
        frame.circle(origin + Vec2::new(c / 2.0 + 4.0, -1.0), 1.5, Style::fill(BODY_EDGE));
    }

    fn draw_snake(&self, frame: &mut Frame) {
        let c = self.tuning.cell_px;
        for (index, cell) in self.snake.cells().enumerate() {
            let origin = self.cell_origin(*cell);
            let fill = if index == 0 {
                HEAD_FILL
            } else {
                let green = 255usize.saturating_sub(index * 10).max(50) as u8;
                Color::rgb(74, green, 128)
            };
            frame.rect(
                origin + Vec2::ONE,
                Vec2::splat(c - 2.0),
                Style::fill(fill).with_stroke(BODY_EDGE, 1.0),
            );
        }

        // Eyes sit on the leading edge of the head
        let origin = self.cell_origin(self.snake.head());
        let (near, far) = (5.0, c - 5.0);
        let eyes = match self.snake.heading() {
            Heading { dx: 1, .. } => [Vec2::new(far, near), Vec2::new(far, far)],
            Heading { dx: -1, .. } => [Vec2::new(near, near), Vec2::new(near, far)],
            Heading { dy: -1, .. } => [Vec2::new(near, near), Vec2::new(far, near)],
            _ => [Vec2::new(near, far), Vec2::new(far, far)],
        };
        for eye in eyes {
            frame.rect(origin + eye, Vec2::splat(3.0), Style::fill(Color::BLACK));
        }
    }
}

impl Game for SnakeGame {
    fn name(&self) -> &'static str {
        "Snake"
    }

    fn storage_key(&self) -> &'static str {
        STORAGE_KEY
    }

    fn pausable(&self) -> bool {
        true
    }

    fn length(&self) -> Option<usize> {
        Some(self.snake.len())
    }

    fn reset(&mut self, rng: &mut Pcg32) {
        self.snake = Snake::centered(&self.grid, self.tuning.start_length);
        self.food = spawn_food(&self.grid, &self.snake, rng);
        self.gate.reset();
        self.step_due = false;
    }

    // Food is placed on reset and respawned when eaten
    fn spawn(&mut self, _ctx: &TickContext<'_>, _rng: &mut Pcg32) {}

    fn advance(&mut self, ctx: &TickContext<'_>, _rng: &mut Pcg32) {
        if let Some(direction) = ctx.input.turn {
            self.snake.steer(Heading::from_direction(direction));
        }
        self.step_due = self.gate.advance(ctx.elapsed_ms);
    }

    fn resolve(&mut self, _ctx: &TickContext<'_>, rng: &mut Pcg32) -> Vec<GameEvent> {
        if !std::mem::take(&mut self.step_due) {
            return Vec::new();
        }
        resolve_snake(
            &mut self.snake,
            &self.grid,
            &mut self.food,
            self.tuning.food_points,
            rng,
        )
    }

    fn prune(&mut self) {}

    fn draw(&self, round: &RoundState, frame: &mut Frame) {
        frame.clear();
        frame.rect(
            Vec2::ZERO,
            Vec2::new(self.bounds.width, self.bounds.height),
            Style::fill(Color::rgba(0, 0, 0, 0.8)),
        );
        self.draw_grid(frame);
        self.draw_food(frame);
        self.draw_snake(frame);

        if round.paused {
            let center = self.bounds.center();
            frame.rect(
                Vec2::ZERO,
                Vec2::new(self.bounds.width, self.bounds.height),
                Style::fill(Color::rgba(0, 0, 0, 0.7)),
            );
            frame.text(
                "PAUSED",
                center,
                TextStyle::new(HEAD_FILL, 48.0, TextAlign::Center),
            );
            frame.text(
                "Press SPACE to resume",
                center + Vec2::new(0.0, 40.0),
                TextStyle::new(HEAD_FILL, 24.0, TextAlign::Center),
            );
        }
    }
}
