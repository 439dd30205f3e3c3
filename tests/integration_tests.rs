//! Integration tests for the 2D match lifecycle

use tetris3d::core::{Board2D, Game2D, GameConfig, Phase, Piece, Tetromino};
use tetris3d::types::{
    Move2D, PieceKind, PieceRule, Rgb, Rotation, ScoringRule, TSpinKind, COLUMNS, ROWS,
};

const GRAY: Rgb = Rgb(128, 128, 128);

/// Hard drop every piece at its spawn column until the match ends
fn play_until_game_over(game: &mut Game2D) -> usize {
    let mut pieces = 0;
    for _ in 0..1000 {
        game.try_move(Move2D::HardDrop);
        if !game.step() {
            return pieces + 1;
        }
        pieces += 1;
    }
    panic!("match never ended");
}

#[test]
fn test_game_lifecycle() {
    let mut game = Game2D::with_seed(12345);
    assert_eq!(game.phase(), Phase::Falling);
    assert!(!game.is_game_over());
    assert_eq!(game.points(), 0);
    assert_eq!(game.lines(), 0);
    assert_eq!(game.level(), 0);
    assert!(game.can_hold());
    assert_eq!(game.held(), None);

    let y = game.active().y;
    assert!(game.step());
    assert_eq!(game.active().y, y + 1);
}

#[test]
fn test_game_actions() {
    let mut game = Game2D::with_seed(12345);
    let start = *game.active();

    assert!(game.try_move(Move2D::Left));
    assert_eq!(game.active().x, start.x - 1);
    assert!(game.try_move(Move2D::Right));
    assert_eq!(game.active().x, start.x);

    assert!(game.try_move(Move2D::SoftDrop));
    assert_eq!(game.active().y, start.y + 1);

    let ghost = game.ghost_y();
    assert!(game.try_move(Move2D::HardDrop));
    assert_eq!(game.active().y, ghost);
    assert!(game.landed());
    assert_eq!(game.phase(), Phase::Locking);

    // Landed: soft drop is refused, nothing is locked until the next step
    assert!(!game.try_move(Move2D::SoftDrop));
    assert!(game.board().is_empty());
    assert!(game.step());
    assert_eq!(game.board().len(), 4);
}

#[test]
fn test_moves_stop_at_walls() {
    let mut game = Game2D::with_seed(7);
    let mut moves = 0;
    while game.try_move(Move2D::Left) {
        moves += 1;
        assert!(moves <= COLUMNS as usize);
    }
    let min_x = game.occupied_cells().iter().map(|&(x, _)| x).min();
    assert_eq!(min_x, Some(0));
}

#[test]
fn test_single_line_clear_scenario() {
    let mut board = Board2D::new();
    for x in 0..COLUMNS as i8 {
        if !(3..=6).contains(&x) {
            board.insert((x, ROWS as i8 - 1), GRAY);
        }
    }
    board.insert((0, ROWS as i8 - 2), GRAY);

    let mut game = Game2D::from_board(GameConfig::with_seed(1), board);
    assert!(game.place_active(Tetromino {
        kind: PieceKind::I,
        rotation: Rotation::North,
        x: 3,
        y: 0,
    }));
    assert!(game.try_move(Move2D::HardDrop));
    assert!(game.step());

    assert_eq!(game.levels_cleared(), 1);
    assert_eq!(game.lines(), 1);
    assert_eq!(game.points(), 40);
    assert_eq!(game.board().len(), 1);
    assert_eq!(game.board().get((0, ROWS as i8 - 1)), Some(GRAY));

    let event = game.take_last_event().expect("lock event");
    assert_eq!(event.lines_cleared, 1);
    assert_eq!(event.tspin, TSpinKind::None);
    assert!(!event.all_clear);
}

/// Vertical I dropped into column 0
fn column_zero_i() -> Tetromino {
    Tetromino {
        kind: PieceKind::I,
        rotation: Rotation::East,
        x: -2,
        y: 0,
    }
}

#[test]
fn test_bottom_row_clear_shifts_everything_down_by_one() {
    let bottom = ROWS as i8 - 1;
    let mut board = Board2D::new();
    for x in 1..COLUMNS as i8 {
        board.insert((x, bottom), GRAY);
    }
    board.insert((5, bottom - 1), GRAY);
    board.insert((5, 10), GRAY);

    let mut game = Game2D::from_board(GameConfig::with_seed(1), board);
    assert!(game.place_active(column_zero_i()));
    assert!(game.try_move(Move2D::HardDrop));
    let mut spanned: Vec<i8> = game.occupied_cells().iter().map(|&(_, y)| y).collect();
    spanned.sort_unstable();
    assert_eq!(spanned, vec![16, 17, 18, 19]);
    assert!(game.step());

    assert_eq!(game.levels_cleared(), 1);
    assert_eq!(game.lines(), 1);
    assert_eq!(game.points(), 40);

    let mut cells: Vec<(i8, i8)> = game.board().iter().map(|(cell, _)| cell).collect();
    cells.sort_unstable();
    assert_eq!(cells, vec![(0, 17), (0, 18), (0, 19), (5, 11), (5, 19)]);
}

#[test]
fn test_modern_zero_line_lock_after_tetris_ends_back_to_back() {
    let mut board = Board2D::new();
    for y in 16..ROWS as i8 {
        for x in 1..COLUMNS as i8 {
            board.insert((x, y), GRAY);
        }
    }
    let config = GameConfig {
        scoring: ScoringRule::Modern,
        ..GameConfig::with_seed(5)
    };
    let mut game = Game2D::from_board(config, board);
    assert!(game.place_active(column_zero_i()));
    assert!(game.try_move(Move2D::HardDrop));
    assert!(game.step());

    let tetris = game.take_last_event().expect("lock event");
    assert_eq!(tetris.lines_cleared, 4);
    assert!(tetris.back_to_back);
    assert!(tetris.all_clear);
    assert!(game.board().is_empty());

    assert!(game.try_move(Move2D::HardDrop));
    assert!(game.step());
    let empty = game.take_last_event().expect("lock event");
    assert_eq!(empty.lines_cleared, 0);
    assert_eq!(empty.score_delta, 0);
    assert_eq!(empty.combo, 0);
    assert!(!empty.back_to_back);
}

#[test]
fn test_place_active_rejects_overlap() {
    let mut board = Board2D::new();
    board.insert((4, 1), GRAY);
    let mut game = Game2D::from_board(GameConfig::with_seed(1), board);
    let blocked = Tetromino {
        kind: PieceKind::T,
        rotation: Rotation::North,
        x: 3,
        y: 0,
    };
    assert!(!game.place_active(blocked));
    assert!(!game.place_active(blocked.shifted(-4, 0)));
}

#[test]
fn test_hold_swaps_once_per_piece() {
    let mut game = Game2D::with_seed(99);
    let first = game.active().kind;
    let second = game.next().kind;

    assert!(game.hold());
    assert_eq!(game.held(), Some(first));
    assert_eq!(game.active().kind, second);
    assert!(!game.hold());

    game.try_move(Move2D::HardDrop);
    assert!(game.step());
    assert!(game.can_hold());

    let third = game.active().kind;
    assert!(game.hold());
    assert_eq!(game.active().kind, first);
    assert_eq!(game.active().rotation, Rotation::North);
    assert_eq!(game.held(), Some(third));
}

#[test]
fn test_modern_drop_points() {
    let mut game = Game2D::new(GameConfig {
        scoring: ScoringRule::Modern,
        ..GameConfig::with_seed(5)
    });
    assert!(game.try_move(Move2D::SoftDrop));
    assert_eq!(game.points(), 1);

    let distance = (game.ghost_y() - game.active().y) as u64;
    assert!(game.try_move(Move2D::HardDrop));
    assert_eq!(game.points(), 1 + 2 * distance);
}

#[test]
fn test_classic_drops_score_nothing() {
    let mut game = Game2D::with_seed(5);
    game.try_move(Move2D::SoftDrop);
    game.try_move(Move2D::HardDrop);
    assert_eq!(game.points(), 0);
}

#[test]
fn test_game_over_is_deterministic() {
    for rule in [PieceRule::SevenBag, PieceRule::Uniform] {
        let config = GameConfig {
            piece_rule: rule,
            ..GameConfig::with_seed(2024)
        };
        let mut a = Game2D::new(config);
        let mut b = Game2D::new(config);

        let pieces_a = play_until_game_over(&mut a);
        let pieces_b = play_until_game_over(&mut b);

        assert_eq!(pieces_a, pieces_b);
        assert_eq!(a.board(), b.board());
        assert_eq!(a.points(), b.points());
        assert!(a.is_game_over());
        assert_eq!(a.phase(), Phase::GameOver);
    }
}

#[test]
fn test_game_over_is_terminal() {
    let mut game = Game2D::with_seed(3);
    play_until_game_over(&mut game);

    let board = game.board().clone();
    assert!(!game.step());
    assert!(!game.try_move(Move2D::Left));
    assert!(!game.try_rotate(true));
    assert!(!game.hold());
    assert_eq!(game.board(), &board);
}

#[test]
fn test_restart_after_game_over() {
    let mut game = Game2D::with_seed(3);
    play_until_game_over(&mut game);

    game.restart();
    assert!(!game.is_game_over());
    assert!(game.board().is_empty());
    assert_eq!(game.points(), 0);
    assert!(game.active().fits(game.board()));
}

#[test]
fn test_same_seed_same_preview() {
    let a = Game2D::with_seed(77);
    let b = Game2D::with_seed(77);
    assert_eq!(a.active().kind, b.active().kind);
    assert_eq!(a.next().kind, b.next().kind);
    assert!(a.preview().eq(b.preview()));
}
