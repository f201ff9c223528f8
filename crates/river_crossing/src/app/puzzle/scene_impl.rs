use engine::{DrawList, FrameTime, InputSnapshot, Rect, Scene, SceneCommand, SceneKey, Vec2};
use tracing::{error, info};

use super::poses::{actor_pose, raft_pose, BACKGROUND};
use super::resolver::{resolve_click, resolve_hover, ClickOutcome};
use super::session::{GameSession, SessionEvent};
use super::ui::{ButtonAction, UiChrome};
use crate::app::config::BoardConfig;

const DIM_RGB: [u8; 3] = [0, 0, 0];

pub(crate) struct MenuScene {
    board_rect: Rect,
    chrome: UiChrome,
}

impl MenuScene {
    pub(crate) fn new(board_rect: Rect) -> Self {
        Self {
            board_rect,
            chrome: UiChrome::menu(board_rect.center()),
        }
    }
}

impl Scene for MenuScene {
    fn load(&mut self) {
        self.chrome = UiChrome::menu(self.board_rect.center());
        info!(scene = "menu", "scene_loaded");
    }

    fn update(&mut self, _frame: FrameTime, input: &InputSnapshot) -> SceneCommand {
        let cursor = input.cursor_position_px();
        if input.left_click_pressed() {
            match cursor.and_then(|point| self.chrome.button_at(point)) {
                Some(ButtonAction::Play) => {
                    info!("menu_play");
                    return SceneCommand::HardResetTo(SceneKey::Board);
                }
                Some(ButtonAction::Exit) => return SceneCommand::Quit,
                Some(ButtonAction::PlayAgain) | None => {}
            }
        }
        self.chrome.apply_hover(cursor);
        SceneCommand::None
    }

    fn render(&mut self, _frame: FrameTime, draw_list: &mut DrawList) {
        draw_list.sprite(BACKGROUND.key, self.board_rect, BACKGROUND.placeholder);
        self.chrome.draw(draw_list);
    }

    fn unload(&mut self) {}

    fn debug_title(&self) -> Option<String> {
        Some("Menu".to_string())
    }
}

pub(crate) struct BoardScene {
    config: BoardConfig,
    board_rect: Rect,
    session: Option<GameSession>,
    chrome: UiChrome,
}

impl BoardScene {
    pub(crate) fn new(config: BoardConfig, board_rect: Rect) -> Self {
        Self {
            config,
            board_rect,
            session: None,
            chrome: UiChrome::board(board_rect.center()),
        }
    }

    fn apply_events(&mut self, events: Vec<SessionEvent>) {
        for event in events {
            match event {
                SessionEvent::Won => self.chrome.on_win(),
                SessionEvent::Lost => self.chrome.on_loss(),
                SessionEvent::RestartOffered => self.chrome.on_restart_offered(),
                SessionEvent::CrossingCommitted { .. } | SessionEvent::LossStarted { .. } => {}
            }
        }
    }

    fn on_restart_requested(&mut self) -> SceneCommand {
        if let Some(session) = &self.session {
            info!(configuration = %session.configuration(), "restart_requested");
        }
        SceneCommand::HardResetTo(SceneKey::Menu)
    }
}

impl Scene for BoardScene {
    fn load(&mut self) {
        self.session = Some(GameSession::new(&self.config));
        self.chrome = UiChrome::board(self.board_rect.center());
        info!(scene = "board", "scene_loaded");
    }

    fn update(&mut self, frame: FrameTime, input: &InputSnapshot) -> SceneCommand {
        let now_ms = frame.now_ms();
        let Some(session) = self.session.as_mut() else {
            return SceneCommand::None;
        };
        if let Err(err) = session.tick(now_ms) {
            error!(
                error = %err,
                configuration = %session.configuration(),
                "session_invariant_violated"
            );
            return SceneCommand::Abort {
                reason: err.to_string(),
            };
        }
        let events = session.drain_events();
        self.apply_events(events);

        let Some(session) = self.session.as_mut() else {
            return SceneCommand::None;
        };
        let cursor = input.cursor_position_px();
        if input.left_click_pressed() {
            if let Some(point) = cursor {
                if let ClickOutcome::Button(ButtonAction::PlayAgain) =
                    resolve_click(session, &self.chrome, point, now_ms)
                {
                    return self.on_restart_requested();
                }
            }
        }
        resolve_hover(session, &mut self.chrome, cursor);
        SceneCommand::None
    }

    fn render(&mut self, _frame: FrameTime, draw_list: &mut DrawList) {
        draw_list.sprite(BACKGROUND.key, self.board_rect, BACKGROUND.placeholder);
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let poses = session.config().poses;
        let dim_alpha = session.dim_alpha();
        let board = session.board_mut();
        let raft_rect = board.raft_rect();
        let raft = raft_pose(board.raft_mut());
        draw_list.sprite(raft.key, raft_rect, raft.placeholder);

        for index in 0..board.actors().len() {
            let rect = board.actor_rect(&board.actors()[index]);
            let pose = actor_pose(&mut board.actors_mut()[index], &poses);
            draw_list.sprite(pose.key, rect, pose.placeholder);
        }

        if dim_alpha > 0 {
            let [r, g, b] = DIM_RGB;
            draw_list.fill(self.board_rect, [r, g, b, dim_alpha]);
        }
        self.chrome.draw(draw_list);
    }

    fn unload(&mut self) {
        self.session = None;
    }

    fn debug_title(&self) -> Option<String> {
        Some("Board".to_string())
    }

    fn debug_lines(&self) -> Vec<String> {
        let Some(session) = &self.session else {
            return vec!["Session: none".to_string()];
        };
        let raft = session.board().raft();
        vec![
            format!("Config: {}", session.configuration()),
            format!("Phase: {:?}", session.phase()),
            format!("Raft: {} {:?}", raft.bank(), raft.state),
            format!("Tasks: {}", session.active_tasks()),
        ]
    }
}

pub(crate) fn board_rect(width: u32, height: u32) -> Rect {
    Rect::from_center(
        Vec2::new(width as f32 / 2.0, height as f32 / 2.0),
        width as f32,
        height as f32,
    )
}
