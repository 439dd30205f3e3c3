//! Property tests for invariants that must hold for any seed and input sequence:
//!
//! - the active piece always fits: in bounds and never overlapping the board
//! - locked cells stay inside the board
//! - points, lines and level never decrease
//! - every aligned group of seven 7-bag draws is a permutation of the kinds
//! - a held direction fires on frame 0, then `first + k * second`
use std::collections::BTreeSet;

use proptest::prelude::*;
use tetris3d::core::{Coord, Game2D, Game3D, GameConfig, Piece, Randomizer};
use tetris3d::input::{DasConfig, InputTimer};
use tetris3d::types::{Axis, Move2D, Move3D, PieceKind, PieceRule, RotationMode, ScoringRule};

fn config(seed: u32, modern: bool, bag: bool) -> GameConfig {
    GameConfig {
        seed,
        scoring: if modern { ScoringRule::Modern } else { ScoringRule::Classic },
        piece_rule: if bag { PieceRule::SevenBag } else { PieceRule::Uniform },
        ..GameConfig::default()
    }
}

fn apply_2d(game: &mut Game2D, op: u8) -> bool {
    match op {
        0 => game.try_move(Move2D::Left),
        1 => game.try_move(Move2D::Right),
        2 => game.try_move(Move2D::SoftDrop),
        3 => game.try_move(Move2D::HardDrop),
        4 => game.try_rotate(true),
        5 => game.try_rotate(false),
        6 => game.hold(),
        _ => game.step(),
    }
}

fn apply_3d(game: &mut Game3D, op: u8) -> bool {
    match op {
        0 => game.try_move(Move3D::Left),
        1 => game.try_move(Move3D::Right),
        2 => game.try_move(Move3D::Front),
        3 => game.try_move(Move3D::Back),
        4 => game.try_move(Move3D::HardDrop),
        5 => game.try_rotate(Axis::X, true),
        6 => game.try_rotate(Axis::Y, false),
        7 => game.try_rotate(Axis::Z, true),
        _ => game.step(),
    }
}

proptest! {
    #[test]
    fn game_2d_keeps_piece_legal_and_counters_monotonic(
        seed in any::<u32>(),
        modern in any::<bool>(),
        bag in any::<bool>(),
        raw in any::<bool>(),
        ops in prop::collection::vec(0u8..10, 1..400),
    ) {
        let mut cfg = config(seed, modern, bag);
        if raw {
            cfg.rotation = RotationMode::Raw;
        }
        let mut game = Game2D::new(cfg);
        let (mut points, mut lines, mut level) = (0, 0, 0);

        for op in ops {
            apply_2d(&mut game, op);

            prop_assert!(game.board().iter().all(|(cell, _)| cell.in_bounds()));
            if !game.is_game_over() {
                prop_assert!(game.active().fits(game.board()));
            }
            prop_assert!(game.points() >= points);
            prop_assert!(game.lines() >= lines);
            prop_assert!(game.level() >= level);
            points = game.points();
            lines = game.lines();
            level = game.level();
        }
    }

    #[test]
    fn game_3d_keeps_piece_legal(
        seed in any::<u32>(),
        bag in any::<bool>(),
        ops in prop::collection::vec(0u8..12, 1..400),
    ) {
        let mut game = Game3D::new(config(seed, false, bag));
        let mut floors = 0;

        for op in ops {
            apply_3d(&mut game, op);

            prop_assert!(game.board().iter().all(|(cell, _)| cell.in_bounds()));
            if !game.is_game_over() {
                prop_assert!(game.active().fits(game.board()));
            }
            prop_assert!(game.floors() >= floors);
            floors = game.floors();
        }
    }

    #[test]
    fn seven_bag_draws_are_fair(seed in any::<u32>(), bags in 1usize..20) {
        let mut randomizer = Randomizer::new(PieceRule::SevenBag, seed);
        for _ in 0..bags {
            let bag: BTreeSet<PieceKind> = (0..7).map(|_| randomizer.draw()).collect();
            prop_assert_eq!(bag.len(), 7);
        }
    }

    #[test]
    fn same_seed_same_sequence(seed in any::<u32>(), bag in any::<bool>()) {
        let rule = if bag { PieceRule::SevenBag } else { PieceRule::Uniform };
        let mut a = Randomizer::new(rule, seed);
        let mut b = Randomizer::new(rule, seed);
        for _ in 0..50 {
            prop_assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn held_direction_fires_on_schedule(
        first_delay in 1u32..30,
        second_delay in 1u32..10,
        frames in 1u32..200,
    ) {
        let config = DasConfig { first_delay, second_delay };
        let mut timer = InputTimer::with_config(&[Move2D::Left], config);

        for frame in 0..frames {
            let fired = timer.direction_input_handler(&[Move2D::Left], |_| true);
            let expected = frame == 0
                || (frame >= first_delay && (frame - first_delay) % second_delay == 0);
            prop_assert_eq!(fired, expected, "frame {}", frame);
        }
    }
}
