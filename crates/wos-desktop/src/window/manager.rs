//! Window manager: lifecycle, focus, z-order and placement

use std::collections::BTreeSet;
use std::rc::Rc;

use serde::Serialize;
use wos_storage::SharedStore;

use super::record::{WindowRecord, WindowTable};
use super::{Window, WindowConfig, WindowHooks, WindowState};
use crate::activity::ActivityTracker;
use crate::clock::{Clock, SystemClock};
use crate::error::{DesktopError, DesktopResult};
use crate::input::{DragManager, DragTarget, PointerDrag, ResizeHandle};
use crate::math::{Rect, Vec2};
use crate::persistence::{PositionStore, WindowPosition};
use crate::scheduler::{Scheduler, TimerId};
use crate::settings::DesktopSettings;
use crate::taskbar::Taskbar;
use crate::transition::{SnapAnimation, TransitionKind, TransitionPhase};
use crate::types::{Generation, WindowId};
use crate::viewport::Viewport;

/// Reference to one open/close cycle of a window
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WindowHandle {
    pub id: WindowId,
    pub generation: Generation,
}

/// Render-ready snapshot of a window for the host
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WindowView {
    pub id: WindowId,
    pub title: String,
    pub icon: String,
    pub state: WindowState,
    pub frame: Rect,
    pub z_index: u32,
    pub classes: Vec<&'static str>,
}

/// Deferred work queued on the scheduler
#[derive(Debug)]
enum Task {
    /// End of a minimize/maximize/restore/close transition
    Settle {
        window: WindowId,
        generation: Generation,
        kind: TransitionKind,
    },
    /// Evaluate edge snapping after a drag
    Snap {
        window: WindowId,
        generation: Generation,
    },
    /// Snap animation finished
    SnapSettle {
        window: WindowId,
        generation: Generation,
    },
    /// Flush debounced position writes
    SavePositions,
    /// Re-clamp every window after the viewport changed size
    Refit,
}

/// Owns every open window
///
/// All mutation happens synchronously from host event handlers. Deferred
/// effects (transition ends, snapping, debounced saves) are queued and run
/// by [`WindowManager::tick`], which the host calls from its frame or timer
/// callback.
pub struct WindowManager {
    settings: DesktopSettings,
    viewport: Viewport,
    windows: WindowTable,
    focused: Option<WindowId>,
    next_z: u32,
    next_generation: Generation,
    next_open_seq: u64,
    scheduler: Scheduler<Task>,
    clock: Rc<dyn Clock>,
    positions: PositionStore,
    pending_saves: BTreeSet<WindowId>,
    save_timer: Option<TimerId>,
    refit_timer: Option<TimerId>,
    drag: Box<dyn DragManager>,
    activity: Option<Rc<dyn ActivityTracker>>,
    taskbar: Taskbar,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new(DesktopSettings::default(), Rc::new(SystemClock))
    }
}

impl WindowManager {
    /// Create a window manager with no store, no activity tracking and
    /// the default pointer drag manager
    pub fn new(settings: DesktopSettings, clock: Rc<dyn Clock>) -> Self {
        let viewport = Viewport::new(1920.0, 1080.0, settings.taskbar_height);
        Self {
            next_z: settings.base_z_index,
            settings,
            viewport,
            windows: WindowTable::default(),
            focused: None,
            next_generation: 1,
            next_open_seq: 0,
            scheduler: Scheduler::new(),
            clock,
            positions: PositionStore::default(),
            pending_saves: BTreeSet::new(),
            save_timer: None,
            refit_timer: None,
            drag: Box::new(PointerDrag::new()),
            activity: None,
            taskbar: Taskbar::new(),
        }
    }

    /// Attach the persistence collaborator
    pub fn with_store(mut self, store: SharedStore) -> Self {
        self.positions = PositionStore::new(Some(store));
        self
    }

    /// Replace the drag manager
    pub fn with_drag_manager(mut self, drag: Box<dyn DragManager>) -> Self {
        self.drag = drag;
        self
    }

    /// Attach a user-activity tracker
    pub fn with_activity(mut self, tracker: Rc<dyn ActivityTracker>) -> Self {
        self.activity = Some(tracker);
        self
    }

    /// Set the initial viewport size (no debounce)
    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Viewport::new(width, height, self.settings.taskbar_height);
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Get a window
    pub fn get(&self, id: &str) -> Option<&Window> {
        self.windows.get(id).map(|r| &r.window)
    }

    /// Get a window or fail with [`DesktopError::WindowNotFound`]
    pub fn require(&self, id: &str) -> DesktopResult<&Window> {
        self.get(id)
            .ok_or_else(|| DesktopError::WindowNotFound(id.to_string()))
    }

    /// Check whether a window with this id is in the table (including closing)
    pub fn contains(&self, id: &str) -> bool {
        self.windows.contains(id)
    }

    /// Number of windows in the table (including closing)
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Check if no windows are open
    pub fn is_empty(&self) -> bool {
        self.windows.len() == 0
    }

    /// Windows in the order they were opened
    pub fn windows(&self) -> Vec<&Window> {
        self.windows.in_open_order()
    }

    /// Ids of windows in the order they were opened
    pub fn window_ids(&self) -> Vec<WindowId> {
        self.windows().into_iter().map(|w| w.id.clone()).collect()
    }

    /// Currently focused window
    pub fn focused_window(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Taskbar model
    pub fn taskbar(&self) -> &Taskbar {
        &self.taskbar
    }

    /// Current viewport
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Active settings
    pub fn settings(&self) -> &DesktopSettings {
        &self.settings
    }

    /// Due time of the next deferred task, for hosts that arm a real timer
    pub fn next_due_ms(&self) -> Option<f64> {
        self.scheduler.next_due()
    }

    /// Number of deferred tasks waiting
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    /// Render snapshots, in open order
    pub fn views(&self) -> Vec<WindowView> {
        let now = self.clock.now_ms();
        self.windows()
            .into_iter()
            .map(|w| WindowView {
                id: w.id.clone(),
                title: w.title.clone(),
                icon: w.icon.clone(),
                state: w.state,
                frame: w.frame(&self.viewport, now),
                z_index: w.z_index,
                classes: w.css_classes(),
            })
            .collect()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Open a window, or focus it if one with this id is already open
    pub fn create_window(&mut self, id: &str, config: WindowConfig) -> WindowHandle {
        self.create_window_with_hooks(id, config, WindowHooks::default())
    }

    /// Open a window with lifecycle callbacks
    ///
    /// If the id is already open the existing window is focused, its
    /// handle returned, and `hooks` dropped. If the id belongs to a window
    /// that is still playing its close transition, that window is evicted
    /// first and a fresh one is opened.
    pub fn create_window_with_hooks(
        &mut self,
        id: &str,
        config: WindowConfig,
        hooks: WindowHooks,
    ) -> WindowHandle {
        if let Some(existing) = self.get(id) {
            if !existing.is_closing() {
                let handle = WindowHandle {
                    id: existing.id.clone(),
                    generation: existing.generation,
                };
                tracing::debug!(window = id, "window already open, focusing");
                self.focus_window(id);
                return handle;
            }
            self.evict(id);
        }

        let now = self.clock.now_ms();
        let margin = self.settings.viewport_margin;
        let size = self.viewport.fit_size(config.size, margin);
        let saved = self.positions.load(id);

        let rect = match (&saved, config.position) {
            (Some(saved), _) => self.viewport.contain(saved.rect(), margin),
            (None, Some(pos)) => self.viewport.contain(Rect::from_pos_size(pos, size), margin),
            (None, None) => Rect::from_pos_size(
                self.viewport
                    .default_position(size, self.settings.placement_margin),
                size,
            ),
        };

        let generation = self.next_generation;
        self.next_generation += 1;
        let open_seq = self.next_open_seq;
        self.next_open_seq += 1;
        let z_index = self.next_z;
        self.next_z += 1;

        let maximized = saved.map(|s| s.maximized).unwrap_or(false);
        let window = Window {
            id: id.to_string(),
            title: config.title,
            icon: config.icon,
            content_html: config.content_html,
            rect,
            restore_rect: maximized.then_some(rect),
            state: if maximized {
                WindowState::Maximized
            } else {
                WindowState::Normal
            },
            z_index,
            active: false,
            resizable: config.resizable,
            generation,
            opened_at_ms: self.activity.as_ref().map(|_| now),
            phase: TransitionPhase::Idle,
            snap: None,
            resume_maximized: false,
            snap_timer: None,
            open_seq,
        };

        self.windows.insert(WindowRecord { window, hooks });

        self.drag.init_drag(id);
        if config.resizable {
            self.drag.init_resize(id, &ResizeHandle::ALL);
        }

        if let Some(record) = self.windows.get_mut(id) {
            if let Some(on_open) = record.hooks.on_open.as_mut() {
                on_open(&record.window);
            }
        }

        if let Some(tracker) = &self.activity {
            if let Some(window) = self.get(id) {
                tracker.app_opened(id, &window.title);
            }
        }

        self.focus_window(id);
        self.ensure_window_in_viewport(id);

        tracing::debug!(
            window = id,
            generation,
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            restored = saved.is_some(),
            "window created"
        );

        WindowHandle {
            id: id.to_string(),
            generation,
        }
    }

    /// Raise a window, make it the single active one and un-minimize it
    pub fn focus_window(&mut self, id: &str) -> bool {
        let z_index = self.next_z;
        let Some(record) = self.windows.get_mut(id) else {
            tracing::debug!(window = id, "focus on unknown window ignored");
            return false;
        };
        if record.window.is_closing() {
            return false;
        }
        self.next_z += 1;

        let window = &mut record.window;
        window.z_index = z_index;
        window.active = true;

        let mut cancelled = None;
        if window.phase.is(TransitionKind::Minimize) {
            // Focus during the minimize animation keeps the window up
            cancelled = window.phase.timer();
            window.phase = TransitionPhase::Settled(TransitionKind::Restore);
        }
        if window.is_minimized() {
            window.state = if window.resume_maximized {
                WindowState::Maximized
            } else {
                WindowState::Normal
            };
            window.resume_maximized = false;
            window.phase = TransitionPhase::Settled(TransitionKind::Restore);
        }

        if let Some(on_focus) = record.hooks.on_focus.as_mut() {
            on_focus(&record.window);
        }

        if let Some(timer) = cancelled {
            self.scheduler.cancel(timer);
        }
        for other in self.windows.iter_mut() {
            if other.window.id != id {
                other.window.active = false;
            }
        }
        self.focused = Some(id.to_string());
        self.refresh_taskbar();
        true
    }

    /// Start minimizing a window
    ///
    /// The `minimizing` class is applied now; the window becomes
    /// `Minimized` when the transition timer fires.
    pub fn minimize_window(&mut self, id: &str) -> bool {
        let Some(window) = self.get(id) else {
            return false;
        };
        if window.is_closing()
            || window.is_minimized()
            || window.phase.is(TransitionKind::Minimize)
        {
            return false;
        }
        self.start_transition(id, TransitionKind::Minimize);
        tracing::debug!(window = id, "minimizing");
        true
    }

    /// Toggle maximize
    ///
    /// Maximizing captures the current geometry as the restore point;
    /// restoring puts it back, clamped to the current viewport.
    pub fn maximize_window(&mut self, id: &str) -> bool {
        let margin = self.settings.viewport_margin;
        let viewport = self.viewport;
        let Some(record) = self.windows.get_mut(id) else {
            return false;
        };
        let window = &mut record.window;
        if window.is_closing() || window.is_minimized() {
            return false;
        }

        let now_maximized = !window.is_maximized();
        if now_maximized {
            window.restore_rect = Some(window.rect);
            window.state = WindowState::Maximized;
        } else {
            // The viewport may have shrunk while maximized
            let rect = window.restore_rect.take().unwrap_or(window.rect);
            window.rect = viewport.contain(rect, margin);
            window.state = WindowState::Normal;
        }
        window.snap = None;
        let snap_timer = window.snap_timer.take();

        if let Some(on_maximize) = record.hooks.on_maximize.as_mut() {
            on_maximize(&record.window, now_maximized);
        }

        if let Some(timer) = snap_timer {
            self.scheduler.cancel(timer);
        }
        let kind = if now_maximized {
            TransitionKind::Maximize
        } else {
            TransitionKind::Restore
        };
        self.start_transition(id, kind);
        self.schedule_save(id);
        self.refresh_taskbar();
        tracing::debug!(window = id, maximized = now_maximized, "maximize toggled");
        true
    }

    /// Bring back a minimized window, or un-maximize a maximized one
    pub fn restore_window(&mut self, id: &str) -> bool {
        match self.get(id).map(|w| (w.state, w.phase.is(TransitionKind::Minimize))) {
            Some((WindowState::Minimized, _)) | Some((_, true)) => self.focus_window(id),
            Some((WindowState::Maximized, _)) => self.maximize_window(id),
            _ => false,
        }
    }

    /// Taskbar click: minimize the active window, otherwise focus it
    pub fn toggle_from_taskbar(&mut self, id: &str) -> bool {
        let Some(window) = self.get(id) else {
            return false;
        };
        if window.is_active() && !window.phase.is(TransitionKind::Minimize) {
            self.minimize_window(id)
        } else {
            self.focus_window(id)
        }
    }

    /// Start closing a window
    ///
    /// Records usage, fires `on_close`, writes the final geometry and
    /// applies the `window-closing` class. The window is evicted (and its
    /// id freed) when the transition timer fires.
    pub fn close_window(&mut self, id: &str) -> bool {
        let now = self.clock.now_ms();
        let Some(record) = self.windows.get_mut(id) else {
            return false;
        };
        if record.window.is_closing() {
            return false;
        }

        if let (Some(tracker), Some(opened)) = (&self.activity, record.window.opened_at_ms) {
            let minutes = ((now - opened) / 60_000.0).max(0.0);
            tracker.app_used(id, minutes);
        }

        if let Some(on_close) = record.hooks.on_close.as_mut() {
            on_close(&record.window);
        }

        let window = &mut record.window;
        let final_position = position_record(window);
        let mut timers = Vec::new();
        timers.extend(window.phase.timer());
        timers.extend(window.snap_timer.take());
        window.snap = None;
        window.state = WindowState::Closing;
        window.active = false;

        for timer in timers {
            self.scheduler.cancel(timer);
        }
        self.pending_saves.remove(id);
        self.positions.save(id, final_position);

        if self.drag.dragging() == Some(id) {
            self.drag.cancel();
        }
        if self.focused.as_deref() == Some(id) {
            self.focused = None;
        }

        self.start_transition(id, TransitionKind::Close);
        self.refresh_taskbar();
        tracing::debug!(window = id, "closing");
        true
    }

    /// Close every open window
    pub fn close_all(&mut self) -> usize {
        let ids = self.window_ids();
        ids.iter().filter(|id| self.close_window(id)).count()
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Move a window programmatically (clamped, persisted)
    pub fn move_window(&mut self, id: &str, x: f32, y: f32) -> bool {
        self.set_rect(id, |rect| Rect::from_pos_size(Vec2::new(x, y), rect.size()))
    }

    /// Resize a window programmatically (clamped, persisted)
    pub fn resize_window(&mut self, id: &str, width: f32, height: f32) -> bool {
        self.set_rect(id, |rect| Rect::new(rect.x, rect.y, width, height))
    }

    fn set_rect(&mut self, id: &str, f: impl FnOnce(Rect) -> Rect) -> bool {
        let margin = self.settings.viewport_margin;
        let viewport = self.viewport;
        let Some(window) = self.windows.get_mut(id).map(|r| &mut r.window) else {
            return false;
        };
        if window.is_closing() || window.is_maximized() {
            return false;
        }
        window.rect = viewport.contain(f(window.rect), margin);
        self.schedule_save(id);
        true
    }

    /// Clamp a window's geometry so it lies fully inside the viewport
    ///
    /// Both the normal rect and the restore point are clamped, whatever the
    /// state: a maximized or minimized window must come back on screen.
    /// Returns true if the geometry changed.
    pub fn ensure_window_in_viewport(&mut self, id: &str) -> bool {
        let margin = self.settings.viewport_margin;
        let viewport = self.viewport;
        let Some(window) = self.windows.get_mut(id).map(|r| &mut r.window) else {
            return false;
        };
        if window.is_closing() {
            return false;
        }
        let rect = viewport.contain(window.rect, margin);
        let restore = window.restore_rect.map(|r| viewport.contain(r, margin));
        if rect == window.rect && restore == window.restore_rect {
            return false;
        }
        window.rect = rect;
        window.restore_rect = restore;
        true
    }

    /// The browser viewport changed size
    ///
    /// Re-clamping is debounced: bursts of resize events collapse into one
    /// pass over all windows once they stop.
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height, self.settings.taskbar_height);
        if let Some(timer) = self.refit_timer.take() {
            self.scheduler.cancel(timer);
        }
        let due = self.clock.now_ms() + self.settings.resize_debounce_ms;
        self.refit_timer = Some(self.scheduler.schedule(due, Task::Refit));
    }

    /// Pin an app icon to the taskbar
    pub fn pin_app(&mut self, id: &str, title: &str, icon: &str) {
        self.taskbar.pin(id, title, icon);
        self.refresh_taskbar();
    }

    // =========================================================================
    // Drag
    // =========================================================================

    /// Pointer went down on a titlebar or resize handle
    pub fn begin_drag(&mut self, id: &str, target: DragTarget, x: f32, y: f32) -> bool {
        let Some(window) = self.get(id) else {
            return false;
        };
        if window.is_closing() || window.is_maximized() || window.is_minimized() {
            return false;
        }
        let rect = window.rect;
        self.focus_window(id);

        // A new drag supersedes a pending snap
        if let Some(window) = self.windows.get_mut(id).map(|r| &mut r.window) {
            window.snap = None;
            if let Some(timer) = window.snap_timer.take() {
                self.scheduler.cancel(timer);
            }
        }

        let started = self.drag.begin(id, target, Vec2::new(x, y), rect);
        tracing::trace!(window = id, ?target, started, "drag begin");
        started
    }

    /// Pointer moved during a drag
    pub fn drag_to(&mut self, x: f32, y: f32) -> bool {
        let Some((id, rect)) = self.drag.update(Vec2::new(x, y)) else {
            return false;
        };
        match self.windows.get_mut(&id) {
            Some(record) => {
                record.window.rect = rect;
                true
            }
            None => false,
        }
    }

    /// Pointer released: clamp, schedule the snap check and save
    pub fn end_drag(&mut self, x: f32, y: f32) -> bool {
        let Some((id, rect)) = self.drag.finish(Vec2::new(x, y)) else {
            return false;
        };
        let margin = self.settings.viewport_margin;
        let viewport = self.viewport;
        let due = self.clock.now_ms() + self.settings.snap_delay_ms;

        let Some(window) = self.windows.get_mut(&id).map(|r| &mut r.window) else {
            return false;
        };
        window.rect = viewport.contain(rect, margin);
        let task = Task::Snap {
            window: id.clone(),
            generation: window.generation,
        };
        let timer = self.scheduler.schedule(due, task);
        if let Some(window) = self.windows.get_mut(&id).map(|r| &mut r.window) {
            window.snap_timer = Some(timer);
        }
        self.schedule_save(&id);
        true
    }

    /// Abandon the drag in progress (geometry stays where it was dragged to)
    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    // =========================================================================
    // Deferred work
    // =========================================================================

    /// Run every deferred task that is due. Returns how many ran.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now_ms();
        let mut ran = 0;
        loop {
            let due = self.scheduler.take_due(now);
            if due.is_empty() {
                break;
            }
            for (timer, task) in due {
                ran += 1;
                self.run_task(timer, task, now);
            }
        }
        ran
    }

    /// Write every pending position now instead of waiting for the debounce
    pub fn flush_positions(&mut self) {
        if let Some(timer) = self.save_timer.take() {
            self.scheduler.cancel(timer);
        }
        self.save_pending();
    }

    fn run_task(&mut self, timer: TimerId, task: Task, now: f64) {
        match task {
            Task::Settle {
                window,
                generation,
                kind,
            } => self.settle(&window, generation, kind, timer),
            Task::Snap { window, generation } => self.snap_to_edge(&window, generation, now),
            Task::SnapSettle { window, generation } => {
                if let Some(record) = self.windows.get_mut(&window) {
                    if record.window.generation == generation
                        && record.window.snap_timer == Some(timer)
                    {
                        record.window.snap = None;
                        record.window.snap_timer = None;
                    }
                }
            }
            Task::SavePositions => {
                self.save_timer = None;
                self.save_pending();
            }
            Task::Refit => {
                self.refit_timer = None;
                let ids = self.window_ids();
                let moved = ids
                    .iter()
                    .filter(|id| self.ensure_window_in_viewport(id))
                    .count();
                tracing::debug!(
                    width = self.viewport.size.width,
                    height = self.viewport.size.height,
                    moved,
                    "viewport refit"
                );
            }
        }
    }

    fn settle(&mut self, id: &str, generation: Generation, kind: TransitionKind, timer: TimerId) {
        let Some(record) = self.windows.get_mut(id) else {
            return;
        };
        let window = &mut record.window;
        if window.generation != generation || window.phase.timer() != Some(timer) {
            tracing::trace!(window = id, ?kind, "stale transition timer ignored");
            return;
        }
        window.phase = TransitionPhase::Settled(kind);

        match kind {
            TransitionKind::Minimize => {
                window.resume_maximized = window.is_maximized();
                window.state = WindowState::Minimized;
                window.active = false;
                if self.focused.as_deref() == Some(id) {
                    self.focused = None;
                }
                self.refresh_taskbar();
                tracing::debug!(window = id, "minimized");
            }
            TransitionKind::Close => self.evict(id),
            TransitionKind::Maximize | TransitionKind::Restore => {}
        }
    }

    fn snap_to_edge(&mut self, id: &str, generation: Generation, now: f64) {
        let threshold = self.settings.snap_threshold;
        let duration = self.settings.snap_duration_ms;
        let viewport = self.viewport;
        let Some(window) = self.windows.get_mut(id).map(|r| &mut r.window) else {
            return;
        };
        window.snap_timer = None;
        if window.generation != generation || window.is_maximized() || window.is_closing() {
            return;
        }
        let Some(target) = viewport.snap(window.rect, threshold) else {
            return;
        };

        window.snap = Some(SnapAnimation::new(window.rect, target, now, duration));
        window.rect = target;
        let task = Task::SnapSettle {
            window: id.to_string(),
            generation,
        };
        let timer = self.scheduler.schedule(now + duration, task);
        if let Some(window) = self.windows.get_mut(id).map(|r| &mut r.window) {
            window.snap_timer = Some(timer);
        }
        self.schedule_save(id);
        tracing::debug!(window = id, x = target.x, y = target.y, "snapped to edge");
    }

    fn start_transition(&mut self, id: &str, kind: TransitionKind) {
        let now = self.clock.now_ms();
        let due = now + self.settings.transition_ms;
        let Some(window) = self.windows.get_mut(id).map(|r| &mut r.window) else {
            return;
        };
        let previous = window.phase.timer();
        let task = Task::Settle {
            window: id.to_string(),
            generation: window.generation,
            kind,
        };
        if let Some(timer) = previous {
            self.scheduler.cancel(timer);
        }
        let timer = self.scheduler.schedule(due, task);
        if let Some(window) = self.windows.get_mut(id).map(|r| &mut r.window) {
            window.phase = TransitionPhase::Transitioning {
                kind,
                timer,
                started_ms: now,
            };
        }
    }

    fn schedule_save(&mut self, id: &str) {
        if !self.positions.is_attached() {
            return;
        }
        self.pending_saves.insert(id.to_string());
        if let Some(timer) = self.save_timer.take() {
            self.scheduler.cancel(timer);
        }
        let due = self.clock.now_ms() + self.settings.save_debounce_ms;
        self.save_timer = Some(self.scheduler.schedule(due, Task::SavePositions));
    }

    fn save_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending_saves);
        let updates: Vec<(WindowId, WindowPosition)> = pending
            .into_iter()
            .filter_map(|id| {
                let window = self.get(&id).filter(|w| !w.is_closing())?;
                Some((id, position_record(window)))
            })
            .collect();
        self.positions.save_many(updates);
    }

    /// Remove a window from the table immediately
    fn evict(&mut self, id: &str) {
        let Some(record) = self.windows.remove(id) else {
            return;
        };
        let window = record.window;
        for timer in window.phase.timer().into_iter().chain(window.snap_timer) {
            self.scheduler.cancel(timer);
        }
        self.pending_saves.remove(id);
        self.drag.release(id);
        if self.focused.as_deref() == Some(id) {
            self.focused = None;
        }
        self.refresh_taskbar();
        tracing::debug!(window = id, generation = window.generation, "window evicted");
    }

    fn refresh_taskbar(&mut self) {
        self.taskbar.rebuild(self.windows.in_open_order());
    }
}

/// Position record for a window; never the maximized geometry
fn position_record(window: &Window) -> WindowPosition {
    if window.is_maximized() || window.resume_maximized {
        WindowPosition::from_rect(window.restore_rect.unwrap_or(window.rect), true)
    } else {
        WindowPosition::from_rect(window.rect, false)
    }
}
