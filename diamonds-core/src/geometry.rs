//! Grid geometry. Manhattan distance is the only metric; there is no
//! diagonal adjacency shortcut anywhere in the game.

use crate::board::{Move, Position};

pub fn distance(a: Position, b: Position) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Unit step from `from` toward `to`.
///
/// A true diagonal resolves to one axis: horizontal first when `from.x` is
/// odd, vertical first when it is even. Long walks therefore alternate axes
/// instead of draining one axis before the other.
pub fn step_direction(from: Position, to: Position) -> Move {
    let dx = (to.x - from.x).signum();
    let dy = (to.y - from.y).signum();
    if dx == 0 || dy == 0 {
        return Move::new(dx, dy);
    }
    if from.x.rem_euclid(2) == 1 {
        Move::new(dx, 0)
    } else {
        Move::new(0, dy)
    }
}

/// True when `a` and `b` sit strictly inside the same quadrant around
/// `pivot`. Anything sharing a row or column with the pivot is in no
/// quadrant.
pub fn same_quadrant(pivot: Position, a: Position, b: Position) -> bool {
    let ax = (a.x - pivot.x).signum();
    let ay = (a.y - pivot.y).signum();
    let bx = (b.x - pivot.x).signum();
    let by = (b.y - pivot.y).signum();
    ax != 0 && ay != 0 && ax == bx && ay == by
}

/// Shares a row or a column.
pub fn is_aligned(a: Position, b: Position) -> bool {
    a.x == b.x || a.y == b.y
}

/// One of the eight cells surrounding `center`.
pub fn is_touching(center: Position, other: Position) -> bool {
    center != other && (center.x - other.x).abs() <= 1 && (center.y - other.y).abs() <= 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let cells = [p(0, 0), p(3, 7), p(14, 2), p(-1, -1), p(9, 9)];
        for a in cells {
            assert_eq!(distance(a, a), 0);
            for b in cells {
                assert_eq!(distance(a, b), distance(b, a));
                assert!(distance(a, b) >= 0);
            }
        }
        assert_eq!(distance(p(1, 1), p(4, 5)), 7);
    }

    #[test]
    fn straight_steps_follow_the_open_axis() {
        assert_eq!(step_direction(p(2, 2), p(9, 2)), Move::RIGHT);
        assert_eq!(step_direction(p(2, 2), p(2, 0)), Move::UP);
        assert_eq!(step_direction(p(4, 4), p(4, 4)), Move::STAY);
    }

    #[test]
    fn diagonal_tie_break_uses_column_parity() {
        // odd column: horizontal first
        assert_eq!(step_direction(p(3, 0), p(6, 5)), Move::RIGHT);
        // even column: vertical first
        assert_eq!(step_direction(p(4, 0), p(6, 5)), Move::DOWN);
        assert_eq!(step_direction(p(4, 9), p(0, 5)), Move::UP);
        assert_eq!(step_direction(p(5, 9), p(0, 5)), Move::LEFT);
    }

    #[test]
    fn step_components_stay_in_unit_range() {
        for fx in -2..6 {
            for fy in -2..6 {
                for tx in -2..6 {
                    for ty in -2..6 {
                        let mv = step_direction(p(fx, fy), p(tx, ty));
                        assert!((-1..=1).contains(&mv.dx));
                        assert!((-1..=1).contains(&mv.dy));
                        assert!(mv.dx == 0 || mv.dy == 0);
                    }
                }
            }
        }
    }

    #[test]
    fn quadrants_are_strict() {
        let pivot = p(5, 5);
        assert!(same_quadrant(pivot, p(7, 8), p(6, 6)));
        assert!(same_quadrant(pivot, p(1, 1), p(4, 2)));
        assert!(same_quadrant(pivot, p(9, 1), p(6, 4)));
        assert!(same_quadrant(pivot, p(1, 9), p(4, 6)));
        assert!(!same_quadrant(pivot, p(7, 8), p(3, 8)));
        // on the pivot's column
        assert!(!same_quadrant(pivot, p(5, 8), p(5, 9)));
        assert!(!same_quadrant(pivot, p(7, 8), p(7, 5)));
    }

    #[test]
    fn touching_covers_the_eight_neighbours() {
        let center = p(3, 3);
        let neighbours = (2..=4)
            .flat_map(|x| (2..=4).map(move |y| p(x, y)))
            .filter(|cell| is_touching(center, *cell))
            .count();
        assert_eq!(neighbours, 8);
        assert!(!is_touching(center, center));
        assert!(!is_touching(center, p(5, 3)));
    }
}
