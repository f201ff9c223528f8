use tracing::info;

use super::rendering::DrawList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKey {
    Menu,
    Board,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    HardResetTo(SceneKey),
    Quit,
    /// Unrecoverable scene state; the loop stops and `run_app` reports the reason.
    Abort { reason: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, to: Vec2, t: f32) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        Vec2 {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Vec2 {
        Vec2 {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2 {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameTime {
    now_ms: u64,
}

impl FrameTime {
    pub fn new(now_ms: u64) -> Self {
        Self { now_ms }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    cursor_position_px: Option<Vec2>,
    left_click_pressed: bool,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        quit_requested: bool,
        cursor_position_px: Option<Vec2>,
        left_click_pressed: bool,
    ) -> Self {
        Self {
            quit_requested,
            cursor_position_px,
            left_click_pressed,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn with_cursor_position_px(mut self, cursor_position_px: Option<Vec2>) -> Self {
        self.cursor_position_px = cursor_position_px;
        self
    }

    pub fn with_left_click_pressed(mut self, left_click_pressed: bool) -> Self {
        self.left_click_pressed = left_click_pressed;
        self
    }

    pub fn cursor_position_px(&self) -> Option<Vec2> {
        self.cursor_position_px
    }

    pub fn left_click_pressed(&self) -> bool {
        self.left_click_pressed
    }
}

pub trait Scene {
    fn load(&mut self);
    fn update(&mut self, frame: FrameTime, input: &InputSnapshot) -> SceneCommand;
    fn render(&mut self, frame: FrameTime, draw_list: &mut DrawList);
    fn unload(&mut self);
    fn debug_title(&self) -> Option<String> {
        None
    }
    fn debug_lines(&self) -> Vec<String> {
        Vec::new()
    }
}

struct SceneRuntime {
    scene: Box<dyn Scene>,
    is_loaded: bool,
}

impl SceneRuntime {
    fn new(scene: Box<dyn Scene>) -> Self {
        Self {
            scene,
            is_loaded: false,
        }
    }
}

pub(crate) struct SceneMachine {
    menu: SceneRuntime,
    board: SceneRuntime,
    active_scene: SceneKey,
}

impl SceneMachine {
    pub(crate) fn new(menu: Box<dyn Scene>, board: Box<dyn Scene>, active_scene: SceneKey) -> Self {
        Self {
            menu: SceneRuntime::new(menu),
            board: SceneRuntime::new(board),
            active_scene,
        }
    }

    pub(crate) fn active_scene(&self) -> SceneKey {
        self.active_scene
    }

    pub(crate) fn load_active(&mut self) {
        self.load_scene_if_needed(self.active_scene);
    }

    pub(crate) fn update_active(&mut self, frame: FrameTime, input: &InputSnapshot) -> SceneCommand {
        self.active_runtime_mut().scene.update(frame, input)
    }

    pub(crate) fn render_active(&mut self, frame: FrameTime, draw_list: &mut DrawList) {
        self.active_runtime_mut().scene.render(frame, draw_list);
    }

    pub(crate) fn debug_title_active(&self) -> Option<String> {
        self.active_runtime_ref().scene.debug_title()
    }

    pub(crate) fn debug_lines_active(&self) -> Vec<String> {
        self.active_runtime_ref().scene.debug_lines()
    }

    pub(crate) fn hard_reset_to(&mut self, next_scene: SceneKey) -> bool {
        let runtime = self.runtime_mut(next_scene);
        if runtime.is_loaded {
            runtime.scene.unload();
        }
        runtime.scene.load();
        runtime.is_loaded = true;
        let changed = self.active_scene != next_scene;
        self.active_scene = next_scene;
        info!(scene = ?next_scene, "scene_reset");
        changed
    }

    pub(crate) fn shutdown_all(&mut self) {
        for runtime in [&mut self.menu, &mut self.board] {
            if runtime.is_loaded {
                runtime.scene.unload();
                runtime.is_loaded = false;
            }
        }
    }

    fn load_scene_if_needed(&mut self, key: SceneKey) {
        let runtime = self.runtime_mut(key);
        if runtime.is_loaded {
            return;
        }
        runtime.scene.load();
        runtime.is_loaded = true;
    }

    fn active_runtime_mut(&mut self) -> &mut SceneRuntime {
        self.runtime_mut(self.active_scene)
    }

    fn active_runtime_ref(&self) -> &SceneRuntime {
        self.runtime_ref(self.active_scene)
    }

    fn runtime_mut(&mut self, key: SceneKey) -> &mut SceneRuntime {
        match key {
            SceneKey::Menu => &mut self.menu,
            SceneKey::Board => &mut self.board,
        }
    }

    fn runtime_ref(&self, key: SceneKey) -> &SceneRuntime {
        match key {
            SceneKey::Menu => &self.menu,
            SceneKey::Board => &self.board,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Default)]
    struct CallLog {
        loads: u32,
        unloads: u32,
        updates: u32,
    }

    struct CountingScene {
        log: Rc<RefCell<CallLog>>,
        counter: u32,
    }

    impl CountingScene {
        fn boxed(log: &Rc<RefCell<CallLog>>) -> Box<dyn Scene> {
            Box::new(Self {
                log: Rc::clone(log),
                counter: 0,
            })
        }
    }

    impl Scene for CountingScene {
        fn load(&mut self) {
            self.counter = 0;
            self.log.borrow_mut().loads += 1;
        }

        fn update(&mut self, _frame: FrameTime, _input: &InputSnapshot) -> SceneCommand {
            self.counter += 1;
            self.log.borrow_mut().updates += 1;
            SceneCommand::None
        }

        fn render(&mut self, _frame: FrameTime, _draw_list: &mut DrawList) {}

        fn unload(&mut self) {
            self.log.borrow_mut().unloads += 1;
        }

        fn debug_title(&self) -> Option<String> {
            Some(format!("count {}", self.counter))
        }
    }

    fn machine() -> (SceneMachine, Rc<RefCell<CallLog>>, Rc<RefCell<CallLog>>) {
        let menu_log = Rc::new(RefCell::new(CallLog::default()));
        let board_log = Rc::new(RefCell::new(CallLog::default()));
        let machine = SceneMachine::new(
            CountingScene::boxed(&menu_log),
            CountingScene::boxed(&board_log),
            SceneKey::Menu,
        );
        (machine, menu_log, board_log)
    }

    #[test]
    fn lerp_clamps_fraction() {
        let from = Vec2::new(0.0, 10.0);
        let to = Vec2::new(100.0, 30.0);
        assert_eq!(from.lerp(to, 0.5), Vec2::new(50.0, 20.0));
        assert_eq!(from.lerp(to, 1.7), to);
        assert_eq!(from.lerp(to, -0.2), from);
    }

    #[test]
    fn rect_contains_is_edge_inclusive() {
        let rect = Rect::from_center(Vec2::new(100.0, 100.0), 20.0, 10.0);
        assert!(rect.contains(Vec2::new(90.0, 95.0)));
        assert!(rect.contains(Vec2::new(110.0, 105.0)));
        assert!(!rect.contains(Vec2::new(110.5, 100.0)));
        assert_eq!(rect.center(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn inactive_scene_does_not_update() {
        let (mut machine, menu_log, board_log) = machine();
        machine.load_active();
        for index in 0..3 {
            let _ = machine.update_active(FrameTime::new(index * 16), &InputSnapshot::empty());
        }
        assert_eq!(menu_log.borrow().updates, 3);
        assert_eq!(board_log.borrow().updates, 0);
    }

    #[test]
    fn hard_reset_reloads_target_scene() {
        let (mut machine, _menu_log, board_log) = machine();
        machine.load_active();
        assert!(machine.hard_reset_to(SceneKey::Board));
        let _ = machine.update_active(FrameTime::default(), &InputSnapshot::empty());
        assert_eq!(machine.debug_title_active().as_deref(), Some("count 1"));

        assert!(!machine.hard_reset_to(SceneKey::Board));
        assert_eq!(machine.debug_title_active().as_deref(), Some("count 0"));
        assert_eq!(board_log.borrow().loads, 2);
        assert_eq!(board_log.borrow().unloads, 1);
    }

    #[test]
    fn shutdown_unloads_only_loaded_scenes() {
        let (mut machine, menu_log, board_log) = machine();
        machine.load_active();
        machine.shutdown_all();
        machine.shutdown_all();
        assert_eq!(menu_log.borrow().unloads, 1);
        assert_eq!(board_log.borrow().unloads, 0);
    }
}
