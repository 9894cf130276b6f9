//! Property tests for focus ordering and viewport containment

use std::rc::Rc;

use proptest::prelude::*;
use wos_desktop::{DesktopSettings, DragTarget, ManualClock, WindowConfig, WindowManager};

#[derive(Clone, Debug)]
enum Op {
    Open(usize),
    Focus(usize),
    Minimize(usize),
    Maximize(usize),
    Close(usize),
    Drag(usize, f32, f32),
    Viewport(f32, f32),
    Advance(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..4usize).prop_map(Op::Open),
        (0..4usize).prop_map(Op::Focus),
        (0..4usize).prop_map(Op::Minimize),
        (0..4usize).prop_map(Op::Maximize),
        (0..4usize).prop_map(Op::Close),
        (0..4usize, -3000.0f32..3000.0, -3000.0f32..3000.0)
            .prop_map(|(i, dx, dy)| Op::Drag(i, dx, dy)),
        (320.0f32..2560.0, 240.0f32..1440.0).prop_map(|(w, h)| Op::Viewport(w, h)),
        (0..500u32).prop_map(Op::Advance),
    ]
}

fn id(i: usize) -> String {
    format!("app-{i}")
}

fn run(wm: &mut WindowManager, clock: &ManualClock, op: &Op) {
    match *op {
        Op::Open(i) => {
            wm.create_window(&id(i), WindowConfig::new(id(i)).with_size(900.0, 700.0));
        }
        Op::Focus(i) => {
            wm.focus_window(&id(i));
        }
        Op::Minimize(i) => {
            wm.minimize_window(&id(i));
        }
        Op::Maximize(i) => {
            wm.maximize_window(&id(i));
        }
        Op::Close(i) => {
            wm.close_window(&id(i));
        }
        Op::Drag(i, dx, dy) => {
            if wm.begin_drag(&id(i), DragTarget::TitleBar, 100.0, 100.0) {
                wm.end_drag(100.0 + dx, 100.0 + dy);
            }
        }
        Op::Viewport(w, h) => wm.set_viewport_size(w, h),
        Op::Advance(ms) => {
            clock.advance(ms as f64);
            wm.tick();
        }
    }
}

proptest! {
    /// The most recently focused window has the highest z-index and is the
    /// only active one.
    #[test]
    fn prop_focus_is_topmost(ops in prop::collection::vec(op(), 1..40), target in 0..4usize) {
        let clock = ManualClock::new(0.0);
        let mut wm = WindowManager::new(DesktopSettings::default(), Rc::new(clock.clone()));
        for op in &ops {
            run(&mut wm, &clock, op);
        }

        if wm.focus_window(&id(target)) {
            let focused = wm.get(&id(target)).unwrap();
            for other in wm.windows() {
                if other.id != focused.id {
                    prop_assert!(focused.z_index > other.z_index);
                    prop_assert!(!other.is_active());
                }
            }
            prop_assert!(focused.is_active());
        }
    }

    /// Once deferred work has settled, every window's geometry and restore
    /// point lie inside the usable viewport, whatever its state.
    #[test]
    fn prop_windows_stay_in_viewport(ops in prop::collection::vec(op(), 1..40)) {
        let clock = ManualClock::new(0.0);
        let mut wm = WindowManager::new(DesktopSettings::default(), Rc::new(clock.clone()));
        for op in &ops {
            run(&mut wm, &clock, op);
        }
        clock.advance(1_000.0);
        wm.tick();

        let usable = wm.viewport().usable_rect();
        for w in wm.windows() {
            if w.is_closing() {
                continue;
            }
            for rect in [Some(w.rect), w.restore_rect].into_iter().flatten() {
                prop_assert!(rect.x >= 0.0 && rect.y >= 0.0, "{:?}", rect);
                prop_assert!(rect.right() <= usable.right() + 0.01, "{:?} in {:?}", rect, usable);
                prop_assert!(rect.bottom() <= usable.bottom() + 0.01, "{:?} in {:?}", rect, usable);
            }
        }
    }

    /// Opening an id that is already open never creates a second window.
    #[test]
    fn prop_open_is_idempotent(ops in prop::collection::vec(op(), 1..40)) {
        let clock = ManualClock::new(0.0);
        let mut wm = WindowManager::new(DesktopSettings::default(), Rc::new(clock.clone()));
        for op in &ops {
            run(&mut wm, &clock, op);
            prop_assert!(wm.len() <= 4);
        }
    }
}
