use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tetris3d::core::{Game2D, Game3D};
use tetris3d::input::{InputTimer, KeyBindings, KeyCode};
use tetris3d::types::{Axis, Move2D, Move3D};

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            let _ = layout;
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            let _ = (layout, new_size);
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

// Counting is process-wide, so every gate lives in this one test.
#[test]
fn hot_paths_do_not_allocate() {
    // Setup (outside counting) so one-time allocations don't trip the gate.
    let bindings = KeyBindings::default_2d();
    let mut timer = InputTimer::new(&[Move2D::Left, Move2D::Right]);
    let mut game = Game2D::with_seed(1);
    let mut well = Game3D::with_seed(1);
    let held = [KeyCode::Left, KeyCode::Char('s')];

    let allocs = with_alloc_counting(|| {
        // Key resolution and DAS run every frame.
        for _ in 0..200 {
            let input = bindings.resolve(&[], &held);
            let _ = input.is_held(tetris3d::types::GameAction::MoveLeft);
            let _ = timer.direction_input_handler(&[Move2D::Left], |_| true);
        }

        // Moves and rotations only read the board.
        for _ in 0..50 {
            let _ = game.try_move(Move2D::Left);
            let _ = game.try_move(Move2D::Right);
            let _ = game.try_rotate(true);
            let _ = game.try_rotate(false);
            let _ = game.ghost_y();

            let _ = well.try_move(Move3D::Front);
            let _ = well.try_move(Move3D::Back);
            let _ = well.try_rotate(Axis::X, true);
            let _ = well.try_rotate(Axis::X, false);
        }
        let _ = game.try_move(Move2D::HardDrop);
        let _ = well.try_move(Move3D::HardDrop);
    });

    assert!(allocs == 0);
}
