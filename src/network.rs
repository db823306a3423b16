//! Winning-network detection.
//!
//! A network is a simple path of at least six same-colored chips along
//! connections, starting in one of the color's goal areas and ending in the
//! other. Consecutive edges may not run in the same direction, and only the
//! endpoints may sit in a goal area.
//!
//! The search is a depth-first walk from every chip in the first goal area,
//! backtracking on dead ends. Only existence matters, so no path is kept.

use crate::board::Board;
use crate::constants::{BOARDSIZE, MIN_NETWORK_LEN};
use crate::moves::{Color, Direction, GoalArea, Pos};

/// Does `color` have a winning network on `board`?
pub fn has_network(board: &Board, color: Color) -> bool {
    let (first, second) = color.goals();
    let starts = board.goal_chips(first);
    if board.chip_count(color) < MIN_NETWORK_LEN
        || starts.is_empty()
        || board.goal_chips(second).is_empty()
    {
        return false;
    }

    let mut walk = PathWalk {
        board,
        target: second,
        visited: [false; BOARDSIZE],
    };
    starts.iter().any(|&start| {
        walk.visited[start.index()] = true;
        let found = walk.extend(start, None, 1);
        walk.visited[start.index()] = false;
        found
    })
}

struct PathWalk<'a> {
    board: &'a Board,
    target: GoalArea,
    visited: [bool; BOARDSIZE],
}

impl PathWalk<'_> {
    /// Try to finish a path that currently ends at `at` after `len` chips,
    /// reached by moving in `came_by`.
    fn extend(&mut self, at: Pos, came_by: Option<Direction>, len: usize) -> bool {
        for dir in Direction::ALL {
            if Some(dir) == came_by {
                continue;
            }
            let Some(next) = self.board.links_of(at)[dir.index()] else {
                continue;
            };
            if self.visited[next.index()] {
                continue;
            }
            match next.goal_area() {
                Some(area) if area == self.target => {
                    if len + 1 >= MIN_NETWORK_LEN {
                        return true;
                    }
                }
                // Back into the starting goal: never part of a network.
                Some(_) => {}
                None => {
                    self.visited[next.index()] = true;
                    let found = self.extend(next, Some(dir), len + 1);
                    self.visited[next.index()] = false;
                    if found {
                        return true;
                    }
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Move;

    fn setup(black: &[(i32, i32)], white: &[(i32, i32)]) -> Board {
        let mut board = Board::new();
        for &(x, y) in black {
            assert!(board.apply_move(&Move::add(x, y, Color::Black)), "black {x}{y}");
        }
        for &(x, y) in white {
            assert!(board.apply_move(&Move::add(x, y, Color::White)), "white {x}{y}");
        }
        board
    }

    #[test]
    fn test_network_found() {
        let board = setup(
            &[(6, 0), (3, 3), (3, 5), (5, 5), (6, 5), (5, 7)],
            &[(4, 5)],
        );
        assert!(has_network(&board, Color::Black));
        assert!(!has_network(&board, Color::White));
    }

    #[test]
    fn test_missing_endpoint() {
        let board = setup(&[(3, 3), (3, 5), (5, 5), (6, 5), (5, 7)], &[(4, 5)]);
        assert!(!has_network(&board, Color::Black));
        let board = setup(&[(6, 0), (3, 3), (3, 5), (5, 5), (6, 5)], &[(4, 5)]);
        assert!(!has_network(&board, Color::Black));
    }

    #[test]
    fn test_turning_path() {
        let board = setup(&[(1, 0), (1, 2), (4, 2), (2, 4), (6, 4), (3, 7)], &[]);
        assert!(has_network(&board, Color::Black));
    }

    #[test]
    fn test_straight_through_chip_is_not_a_turn() {
        // The only route passes (4,2) moving right on both sides.
        let board = setup(&[(1, 0), (1, 2), (4, 2), (6, 2), (3, 5), (3, 7)], &[]);
        assert!(!has_network(&board, Color::Black));
    }

    #[test]
    fn test_blocked_by_opponent() {
        let mut board = setup(&[(1, 0), (1, 2), (4, 2), (2, 4), (6, 4), (3, 7)], &[]);
        assert!(board.apply_move(&Move::add(4, 4, Color::White)));
        assert!(!has_network(&board, Color::Black));
        assert!(board.undo_move());
        assert!(has_network(&board, Color::Black));
    }

    #[test]
    fn test_white_network() {
        // Same shape as the turning path, mirrored across the diagonal.
        let board = setup(&[], &[(0, 1), (2, 1), (2, 4), (4, 2), (4, 6), (7, 3)]);
        assert!(has_network(&board, Color::White));
        assert!(!has_network(&board, Color::Black));
    }
}
