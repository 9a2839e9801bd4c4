//! Grid model for snake
//!
//! The snake is not point-mass physics: it is an ordered run of cells with
//! the head at index 0. A move either commits completely or is blocked
//! before anything changes, so the body never holds a duplicate cell.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::platform::input::Direction;

/// A board cell (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, heading: Heading) -> Self {
        Self::new(self.x + heading.dx, self.y + heading.dy)
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

/// Unit step direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub dx: i32,
    pub dy: i32,
}

impl Heading {
    pub const RIGHT: Heading = Heading { dx: 1, dy: 0 };
    pub const LEFT: Heading = Heading { dx: -1, dy: 0 };
    pub const UP: Heading = Heading { dx: 0, dy: -1 };
    pub const DOWN: Heading = Heading { dx: 0, dy: 1 };

    pub fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::UP,
            Direction::Down => Self::DOWN,
            Direction::Left => Self::LEFT,
            Direction::Right => Self::RIGHT,
        }
    }

    /// True for a 90° turn (reversals and no-ops are not perpendicular)
    pub fn is_perpendicular(self, other: Heading) -> bool {
        self.dx * other.dx + self.dy * other.dy == 0
    }
}

/// Board dimensions in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    pub fn cell_count(&self) -> usize {
        (self.width.max(0) * self.height.max(0)) as usize
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }
}

/// Why a move was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    Wall,
    SelfHit,
}

/// Result of one committed (or refused) snake move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Head advanced, tail followed
    Moved,
    /// Head landed on food; the snake grew by one
    Ate { eaten: Cell, board_full: bool },
    /// Move refused, nothing changed
    Blocked { at: Cell, reason: BlockReason },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snake {
    /// Head first
    body: VecDeque<Cell>,
    heading: Heading,
    /// Applied at the next step
    next_heading: Heading,
}

impl Snake {
    /// A horizontal snake of `length` cells with its head at `head`, facing right
    pub fn new(head: Cell, length: usize) -> Self {
        let body = (0..length.max(1) as i32)
            .map(|i| Cell::new(head.x - i, head.y))
            .collect();
        Self {
            body,
            heading: Heading::RIGHT,
            next_heading: Heading::RIGHT,
        }
    }

    /// Start position for a board: centered, facing right. The length is
    /// capped so the tail stays on the board.
    pub fn centered(grid: &Grid, length: usize) -> Self {
        let head = Cell::new(grid.width / 2, grid.height / 2);
        let room = (head.x + 1).max(1) as usize;
        Self::new(head, length.min(room))
    }

    /// Build from explicit cells (head first)
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>, heading: Heading) -> Self {
        Self {
            body: cells.into_iter().collect(),
            heading,
            next_heading: heading,
        }
    }

    pub fn head(&self) -> Cell {
        self.body.front().copied().unwrap_or(Cell::new(0, 0))
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Queue a turn. Only 90° turns relative to the current heading are
    /// accepted; the last accepted turn before a step wins.
    pub fn steer(&mut self, heading: Heading) {
        if self.heading.is_perpendicular(heading) {
            self.next_heading = heading;
        }
    }

    /// Advance one cell
    pub fn step<R: Rng>(&mut self, grid: &Grid, food: &mut Option<Cell>, rng: &mut R) -> StepOutcome {
        let heading = self.next_heading;
        let next = self.head().offset(heading);

        if !grid.contains(next) {
            return StepOutcome::Blocked {
                at: next,
                reason: BlockReason::Wall,
            };
        }
        // The tail cell still counts: it has not moved yet
        if self.occupies(next) {
            return StepOutcome::Blocked {
                at: next,
                reason: BlockReason::SelfHit,
            };
        }

        self.heading = heading;
        self.body.push_front(next);

        if *food == Some(next) {
            *food = spawn_food(grid, self, rng);
            StepOutcome::Ate {
                eaten: next,
                board_full: food.is_none(),
            }
        } else {
            self.body.pop_back();
            StepOutcome::Moved
        }
    }
}

/// Pick a uniformly random unoccupied cell; `None` when the board is full
pub fn spawn_food<R: Rng>(grid: &Grid, snake: &Snake, rng: &mut R) -> Option<Cell> {
    let free: Vec<Cell> = grid.cells().filter(|c| !snake.occupies(*c)).collect();
    free.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    fn board() -> Grid {
        Grid::new(40, 30)
    }

    fn start_snake() -> Snake {
        Snake::from_cells(
            [Cell::new(20, 15), Cell::new(19, 15), Cell::new(18, 15)],
            Heading::RIGHT,
        )
    }

    #[test]
    fn test_centered_start() {
        let snake = Snake::centered(&board(), 3);
        let cells: Vec<_> = snake.cells().copied().collect();
        assert_eq!(
            cells,
            vec![Cell::new(20, 15), Cell::new(19, 15), Cell::new(18, 15)]
        );
    }

    #[test]
    fn test_centered_long_snake_stays_on_board() {
        let grid = board();
        let snake = Snake::centered(&grid, 100);
        assert_eq!(snake.len(), 21);
        assert!(snake.cells().all(|c| grid.contains(*c)));
        assert_eq!(Snake::centered(&Grid::new(1, 1), 5).len(), 1);
    }

    #[test]
    fn test_plain_move() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut snake = start_snake();
        let mut food = Some(Cell::new(0, 0));
        assert_eq!(snake.step(&board(), &mut food, &mut rng), StepOutcome::Moved);
        assert_eq!(snake.head(), Cell::new(21, 15));
        assert_eq!(snake.len(), 3);
        assert_eq!(food, Some(Cell::new(0, 0)));
    }

    #[test]
    fn test_eat_grows() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut snake = start_snake();
        let mut food = Some(Cell::new(21, 15));
        let outcome = snake.step(&board(), &mut food, &mut rng);
        assert_eq!(
            outcome,
            StepOutcome::Ate {
                eaten: Cell::new(21, 15),
                board_full: false
            }
        );
        assert_eq!(snake.len(), 4);
        let new_food = food.unwrap();
        assert!(!snake.occupies(new_food));
        assert!(board().contains(new_food));
    }

    #[test]
    fn test_wall_blocks_without_mutation() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut snake = Snake::from_cells(
            [Cell::new(39, 15), Cell::new(38, 15), Cell::new(37, 15)],
            Heading::RIGHT,
        );
        let mut food = Some(Cell::new(5, 5));
        let outcome = snake.step(&board(), &mut food, &mut rng);
        assert_eq!(
            outcome,
            StepOutcome::Blocked {
                at: Cell::new(40, 15),
                reason: BlockReason::Wall
            }
        );
        assert_eq!(snake.head(), Cell::new(39, 15));
        assert_eq!(snake.len(), 3);
    }

    #[test]
    fn test_self_hit() {
        let mut rng = Pcg32::seed_from_u64(1);
        // Hooked shape: moving up from (5,5) runs into (5,4)
        let mut snake = Snake::from_cells(
            [
                Cell::new(5, 5),
                Cell::new(6, 5),
                Cell::new(6, 4),
                Cell::new(5, 4),
                Cell::new(4, 4),
            ],
            Heading::LEFT,
        );
        snake.steer(Heading::UP);
        let mut food = None;
        let outcome = snake.step(&board(), &mut food, &mut rng);
        assert!(matches!(
            outcome,
            StepOutcome::Blocked {
                reason: BlockReason::SelfHit,
                ..
            }
        ));
        assert_eq!(snake.len(), 5);
        assert_eq!(snake.heading(), Heading::LEFT);
    }

    #[test]
    fn test_reversal_ignored() {
        let mut snake = start_snake();
        snake.steer(Heading::LEFT);
        let mut rng = Pcg32::seed_from_u64(1);
        snake.step(&board(), &mut None, &mut rng);
        assert_eq!(snake.head(), Cell::new(21, 15));

        // Last perpendicular turn wins
        snake.steer(Heading::UP);
        snake.steer(Heading::DOWN);
        snake.step(&board(), &mut None, &mut rng);
        assert_eq!(snake.head(), Cell::new(21, 16));
    }

    #[test]
    fn test_food_none_when_full() {
        let grid = Grid::new(2, 1);
        let snake = Snake::from_cells([Cell::new(1, 0), Cell::new(0, 0)], Heading::RIGHT);
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(spawn_food(&grid, &snake, &mut rng), None);
    }

    proptest! {
        #[test]
        fn prop_body_never_duplicates(turns in prop::collection::vec(0u8..4, 1..300), seed in any::<u64>()) {
            let grid = Grid::new(12, 10);
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut snake = Snake::centered(&grid, 3);
            let mut food = spawn_food(&grid, &snake, &mut rng);
            for t in turns {
                let heading = match t {
                    0 => Heading::UP,
                    1 => Heading::DOWN,
                    2 => Heading::LEFT,
                    _ => Heading::RIGHT,
                };
                snake.steer(heading);
                if let StepOutcome::Blocked { .. } = snake.step(&grid, &mut food, &mut rng) {
                    break;
                }
                let unique: HashSet<_> = snake.cells().copied().collect();
                prop_assert_eq!(unique.len(), snake.len());
                prop_assert!(snake.cells().all(|c| grid.contains(*c)));
            }
        }
    }
}
