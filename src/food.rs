use rand::Rng;

use crate::config::GridSize;
use crate::snake::{Position, Snake};

/// Collects every cell not covered by the snake, in row-major order.
#[must_use]
pub fn free_cells(bounds: GridSize, snake: &Snake) -> Vec<Position> {
    let mut candidates = Vec::with_capacity(bounds.total_cells().saturating_sub(snake.len()));

    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let position = Position { x, y };
            if !snake.occupies(position) {
                candidates.push(position);
            }
        }
    }

    candidates
}

/// Picks a free position uniformly at random.
///
/// Returns `None` when the snake covers the whole board.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
) -> Option<Position> {
    let candidates = free_cells(bounds, snake);
    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::GridSize;
    use crate::input::Direction;

    use super::{free_cells, spawn_position};
    use crate::snake::{Position, Snake};

    #[test]
    fn food_spawn_never_overlaps_snake() {
        let mut rng = StdRng::seed_from_u64(7);
        let snake = Snake::from_segments(
            vec![
                Position { x: 0, y: 0 },
                Position { x: 1, y: 0 },
                Position { x: 2, y: 0 },
            ],
            Direction::Right,
        )
        .expect("segments form a path");

        for _ in 0..100 {
            let food_position = spawn_position(
                &mut rng,
                GridSize {
                    width: 8,
                    height: 6,
                },
                &snake,
            )
            .expect("board has free cells");
            assert!(!snake.occupies(food_position));
        }
    }

    #[test]
    fn last_free_cell_is_always_chosen() {
        let mut rng = StdRng::seed_from_u64(11);
        let snake = Snake::from_segments(
            vec![
                Position { x: 0, y: 0 },
                Position { x: 1, y: 0 },
                Position { x: 2, y: 0 },
                Position { x: 2, y: 1 },
                Position { x: 1, y: 1 },
            ],
            Direction::Left,
        )
        .expect("segments form a path");
        let bounds = GridSize {
            width: 3,
            height: 2,
        };

        for _ in 0..20 {
            assert_eq!(
                spawn_position(&mut rng, bounds, &snake),
                Some(Position { x: 0, y: 1 })
            );
        }
    }

    #[test]
    fn full_board_yields_no_placement() {
        let mut rng = StdRng::seed_from_u64(3);
        let snake = Snake::from_segments(
            vec![
                Position { x: 0, y: 0 },
                Position { x: 1, y: 0 },
                Position { x: 1, y: 1 },
                Position { x: 0, y: 1 },
            ],
            Direction::Left,
        )
        .expect("segments form a path");
        let bounds = GridSize {
            width: 2,
            height: 2,
        };

        assert!(free_cells(bounds, &snake).is_empty());
        assert_eq!(spawn_position(&mut rng, bounds, &snake), None);
    }
}
