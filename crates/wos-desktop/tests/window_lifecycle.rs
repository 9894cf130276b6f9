//! Window Lifecycle Integration Tests
//!
//! Exercises the window manager together with its collaborators: the
//! key-value store, the drag manager, activity tracking and app hooks.

use std::cell::RefCell;
use std::rc::Rc;

use wos_desktop::{
    ActivityEvent, ActivityLog, DesktopSettings, DragTarget, ManualClock, Rect, ResizeHandle,
    WindowConfig, WindowHooks, WindowManager, WindowPosition, WindowState, WINDOWS_KEY,
};
use wos_storage::{KeyValueStore, MemoryStore};

fn setup() -> (WindowManager, ManualClock, Rc<MemoryStore>) {
    let clock = ManualClock::new(1_000.0);
    let store = Rc::new(MemoryStore::new());
    let wm = WindowManager::new(DesktopSettings::default(), Rc::new(clock.clone()))
        .with_store(store.clone())
        .with_viewport(1280.0, 800.0);
    (wm, clock, store)
}

fn saved(store: &MemoryStore, id: &str) -> Option<WindowPosition> {
    let value = store.get(WINDOWS_KEY)?;
    let map: std::collections::BTreeMap<String, WindowPosition> =
        serde_json::from_value(value).ok()?;
    map.get(id).copied()
}

/// Dragging writes the position once, after the debounce settles.
#[test]
fn test_drag_save_is_debounced() {
    let (mut wm, clock, store) = setup();
    wm.create_window(
        "notes",
        WindowConfig::new("Notes")
            .with_size(400.0, 300.0)
            .with_position(200.0, 200.0),
    );
    let writes_before = store.write_count();

    for _ in 0..5 {
        assert!(wm.begin_drag("notes", DragTarget::TitleBar, 210.0, 210.0));
        wm.drag_to(220.0, 220.0);
        assert!(wm.end_drag(230.0, 230.0));
        clock.advance(50.0);
        wm.tick();
    }
    assert_eq!(store.write_count(), writes_before);

    clock.advance(300.0);
    wm.tick();
    assert_eq!(store.write_count(), writes_before + 1);

    let pos = saved(&store, "notes").unwrap();
    assert_eq!(pos.left, 300.0);
    assert_eq!(pos.top, 300.0);
    assert!(!pos.maximized);
}

/// A window reopened later comes back where it was left.
#[test]
fn test_position_restored_on_reopen() {
    let (mut wm, clock, store) = setup();
    wm.create_window(
        "notes",
        WindowConfig::new("Notes")
            .with_size(500.0, 400.0)
            .with_position(100.0, 120.0),
    );
    wm.move_window("notes", 300.0, 150.0);
    wm.close_window("notes");
    clock.advance(300.0);
    wm.tick();

    assert_eq!(saved(&store, "notes").unwrap().left, 300.0);

    wm.create_window("notes", WindowConfig::new("Notes"));
    let w = wm.get("notes").unwrap();
    assert_eq!(w.rect, Rect::new(300.0, 150.0, 500.0, 400.0));
}

/// Saved geometry larger than the current viewport is clamped.
#[test]
fn test_saved_position_clamped_to_smaller_viewport() {
    let (mut wm, _, store) = setup();
    let big = WindowPosition::from_rect(Rect::new(900.0, 600.0, 1500.0, 900.0), false);
    store.set(WINDOWS_KEY, serde_json::json!({ "notes": big }));

    wm.create_window("notes", WindowConfig::new("Notes"));
    let rect = wm.get("notes").unwrap().rect;
    let vp = *wm.viewport();
    assert_eq!(rect.width, 1280.0 - 40.0);
    assert_eq!(rect.height, vp.usable_height() - 40.0);
    assert!(rect.right() <= 1280.0);
    assert!(rect.bottom() <= vp.usable_height());
}

/// A corrupt store falls back to default placement.
#[test]
fn test_corrupt_store_uses_default_placement() {
    let (mut wm, _, store) = setup();
    store.insert_raw(WINDOWS_KEY, "][");

    wm.create_window("notes", WindowConfig::new("Notes").with_size(400.0, 300.0));
    let rect = wm.get("notes").unwrap().rect;
    assert_eq!(rect.x, (1280.0 - 400.0) / 2.0);
}

/// Maximized windows are persisted with their restore geometry.
#[test]
fn test_maximized_geometry_never_persisted() {
    let (mut wm, clock, store) = setup();
    wm.create_window(
        "notes",
        WindowConfig::new("Notes")
            .with_size(400.0, 300.0)
            .with_position(50.0, 60.0),
    );
    wm.maximize_window("notes");
    clock.advance(300.0);
    wm.tick();

    let pos = saved(&store, "notes").unwrap();
    assert!(pos.maximized);
    assert_eq!(pos.rect(), Rect::new(50.0, 60.0, 400.0, 300.0));

    // Reopening restores the maximized state and keeps the restore point
    wm.close_window("notes");
    clock.advance(300.0);
    wm.tick();
    wm.create_window("notes", WindowConfig::new("Notes"));
    assert!(wm.get("notes").unwrap().is_maximized());
    wm.maximize_window("notes");
    assert_eq!(wm.get("notes").unwrap().rect, Rect::new(50.0, 60.0, 400.0, 300.0));
}

/// Release near the left edge snaps flush after the snap delay.
#[test]
fn test_snap_after_drag_release() {
    let (mut wm, clock, _) = setup();
    wm.create_window(
        "notes",
        WindowConfig::new("Notes")
            .with_size(400.0, 300.0)
            .with_position(100.0, 200.0),
    );

    wm.begin_drag("notes", DragTarget::TitleBar, 150.0, 210.0);
    wm.drag_to(100.0, 210.0);
    wm.end_drag(62.0, 210.0);
    assert_eq!(wm.get("notes").unwrap().rect.x, 12.0);

    clock.advance(99.0);
    wm.tick();
    assert_eq!(wm.get("notes").unwrap().rect.x, 12.0);

    clock.advance(1.0);
    wm.tick();
    let w = wm.get("notes").unwrap();
    assert_eq!(w.rect.x, 0.0);
    assert!(w.css_classes().contains(&"snapping"));

    clock.advance(200.0);
    wm.tick();
    assert!(!wm.get("notes").unwrap().css_classes().contains(&"snapping"));
}

/// Closing a window mid-snap leaves no task touching the evicted window.
#[test]
fn test_close_during_snap_delay() {
    let (mut wm, clock, _) = setup();
    wm.create_window("notes", WindowConfig::new("Notes").with_position(100.0, 100.0));
    wm.begin_drag("notes", DragTarget::TitleBar, 110.0, 110.0);
    wm.end_drag(20.0, 110.0);
    wm.close_window("notes");

    clock.advance(1_000.0);
    wm.tick();
    assert!(!wm.contains("notes"));
    assert_eq!(wm.pending_tasks(), 0);
}

/// Resize handles honour the minimum size and the result is contained.
#[test]
fn test_resize_drag() {
    let (mut wm, _, _) = setup();
    wm.create_window(
        "notes",
        WindowConfig::new("Notes")
            .with_size(400.0, 300.0)
            .with_position(100.0, 100.0),
    );
    assert!(wm.begin_drag("notes", DragTarget::Resize(ResizeHandle::SE), 500.0, 400.0));
    wm.end_drag(2000.0, 2000.0);

    let rect = wm.get("notes").unwrap().rect;
    assert_eq!(rect.width, 1240.0);
    assert!(rect.right() <= 1280.0);
}

/// Fixed-size windows have no resize handles.
#[test]
fn test_fixed_size_window_cannot_resize() {
    let (mut wm, _, _) = setup();
    wm.create_window("calc", WindowConfig::new("Calculator").fixed_size());
    assert!(!wm.begin_drag("calc", DragTarget::Resize(ResizeHandle::E), 0.0, 0.0));
    assert!(wm.begin_drag("calc", DragTarget::TitleBar, 0.0, 0.0));
}

/// Viewport shrink re-clamps windows once, after the debounce.
#[test]
fn test_viewport_resize_is_debounced() {
    let (mut wm, clock, _) = setup();
    wm.create_window(
        "notes",
        WindowConfig::new("Notes")
            .with_size(600.0, 400.0)
            .with_position(600.0, 300.0),
    );

    wm.set_viewport_size(1000.0, 700.0);
    clock.advance(100.0);
    wm.set_viewport_size(800.0, 600.0);
    clock.advance(100.0);
    wm.tick();
    assert_eq!(wm.get("notes").unwrap().rect.x, 600.0);

    clock.advance(50.0);
    wm.tick();
    let rect = wm.get("notes").unwrap().rect;
    assert!(rect.right() <= 800.0);
    assert!(rect.bottom() <= 600.0 - 56.0);
}

/// A maximized window stays maximized through a refit, but the geometry it
/// restores to is pulled back into the smaller viewport.
#[test]
fn test_viewport_refit_clamps_maximized_restore_point() {
    let (mut wm, clock, _) = setup();
    wm.create_window(
        "notes",
        WindowConfig::new("Notes")
            .with_size(600.0, 400.0)
            .with_position(600.0, 300.0),
    );
    wm.maximize_window("notes");
    wm.set_viewport_size(500.0, 400.0);
    clock.advance(500.0);
    wm.tick();

    let usable = wm.viewport().usable_rect();
    let w = wm.get("notes").unwrap();
    assert!(w.is_maximized());
    assert_eq!(w.frame(wm.viewport(), 0.0), wm.viewport().maximize_bounds());
    let restore = w.restore_rect.unwrap();
    assert!(restore.right() <= usable.right());
    assert!(restore.bottom() <= usable.bottom());

    wm.maximize_window("notes");
    assert_eq!(wm.get("notes").unwrap().rect, restore);
}

/// Opening and closing record usage when a tracker is attached.
#[test]
fn test_activity_tracking() {
    let clock = ManualClock::new(0.0);
    let log = Rc::new(ActivityLog::new());
    let mut wm = WindowManager::new(DesktopSettings::default(), Rc::new(clock.clone()))
        .with_activity(log.clone());

    wm.create_window("music", WindowConfig::new("Music"));
    assert_eq!(wm.get("music").unwrap().opened_at_ms, Some(0.0));

    clock.advance(3.0 * 60_000.0);
    wm.close_window("music");

    assert_eq!(
        log.events()[0],
        ActivityEvent::Opened {
            app_id: "music".into(),
            title: "Music".into()
        }
    );
    assert!((log.minutes_for("music") - 3.0).abs() < 1e-9);
}

/// Lifecycle hooks fire in order with the right arguments.
#[test]
fn test_hooks() {
    let clock = ManualClock::new(0.0);
    let mut wm = WindowManager::new(DesktopSettings::default(), Rc::new(clock.clone()));
    let calls = Rc::new(RefCell::new(Vec::<String>::new()));

    let (c1, c2, c3, c4) = (calls.clone(), calls.clone(), calls.clone(), calls.clone());
    let hooks = WindowHooks::new()
        .on_open(move |w| c1.borrow_mut().push(format!("open:{}", w.id)))
        .on_focus(move |w| c2.borrow_mut().push(format!("focus:{}", w.id)))
        .on_maximize(move |_, max| c3.borrow_mut().push(format!("maximize:{}", max)))
        .on_close(move |w| c4.borrow_mut().push(format!("close:{}", w.id)));

    wm.create_window_with_hooks("notes", WindowConfig::new("Notes"), hooks);
    wm.maximize_window("notes");
    wm.maximize_window("notes");
    wm.close_window("notes");

    assert_eq!(
        *calls.borrow(),
        vec![
            "open:notes",
            "focus:notes",
            "maximize:true",
            "maximize:false",
            "close:notes"
        ]
    );
}

/// Without a store every window opens at the default placement.
#[test]
fn test_no_store_is_silent() {
    let clock = ManualClock::new(0.0);
    let mut wm = WindowManager::new(DesktopSettings::default(), Rc::new(clock.clone()));
    wm.create_window("notes", WindowConfig::new("Notes"));
    wm.move_window("notes", 10.0, 10.0);
    wm.close_window("notes");
    clock.advance(300.0);
    wm.tick();

    wm.create_window("notes", WindowConfig::new("Notes").with_size(400.0, 300.0));
    assert_eq!(wm.get("notes").unwrap().rect.x, (1920.0 - 400.0) / 2.0);
    assert_eq!(wm.get("notes").unwrap().state, WindowState::Normal);
}

/// Views expose maximized frames and z-order to the host.
#[test]
fn test_views() {
    let (mut wm, _, _) = setup();
    wm.create_window("a", WindowConfig::new("A"));
    wm.create_window("b", WindowConfig::new("B"));
    wm.maximize_window("a");

    let views = wm.views();
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].id, "a");
    assert_eq!(views[0].frame, wm.viewport().maximize_bounds());
    assert!(views[0].classes.contains(&"maximized"));
    assert!(views[1].z_index > views[0].z_index);

    let json = serde_json::to_value(&views).unwrap();
    assert_eq!(json[0]["state"], "maximized");
}
