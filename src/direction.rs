/// The four cardinal directions in canonical order: up, right, down, left.
///
/// Screen coordinates throughout: y grows downward, so `Up` points at row
/// `y - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards row `y - 1`.
    Up,
    /// Towards column `x + 1`.
    Right,
    /// Towards row `y + 1`.
    Down,
    /// Towards column `x - 1`.
    Left,
}

/// Every direction, in canonical order.
pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Right,
    Direction::Down,
    Direction::Left,
];

impl Direction {
    /// Canonical index: up 0, right 1, down 2, left 3.
    pub fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    /// The direction two quarter-turns away.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    /// Step offset `(dx, dy)` towards this direction.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_two_quarter_turns() {
        for direction in ALL_DIRECTIONS {
            assert_eq!(direction.opposite().index(), (direction.index() + 2) % 4);
        }
    }

    #[test]
    fn opposite_is_an_involution() {
        for direction in ALL_DIRECTIONS {
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }

    #[test]
    fn offsets_cancel_with_opposites() {
        for direction in ALL_DIRECTIONS {
            let (dx, dy) = direction.offset();
            let (ox, oy) = direction.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn canonical_order_matches_indices() {
        for (position, direction) in ALL_DIRECTIONS.iter().enumerate() {
            assert_eq!(direction.index(), position);
        }
    }
}
