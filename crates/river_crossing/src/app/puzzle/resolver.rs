use engine::Vec2;
use tracing::debug;

use super::board::{ActorId, BoardModel};
use super::session::GameSession;
use super::ui::{ButtonAction, UiChrome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoardHit {
    Raft,
    Actor(ActorId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClickOutcome {
    Board(BoardHit),
    Button(ButtonAction),
    Nothing,
}

pub(crate) fn board_hit_at(board: &BoardModel, point: Vec2) -> Option<BoardHit> {
    if board.raft_rect().contains(point) {
        return Some(BoardHit::Raft);
    }
    board
        .actors()
        .iter()
        .find(|actor| board.actor_rect(actor).contains(point))
        .map(|actor| BoardHit::Actor(actor.id()))
}

/// Routes one click. A board hit consumes the click even when the request is
/// refused; UI buttons are only tried when no board piece was hit.
pub(crate) fn resolve_click(
    session: &mut GameSession,
    chrome: &UiChrome,
    point: Vec2,
    now_ms: u64,
) -> ClickOutcome {
    if !session.phase().is_terminal() {
        if let Some(hit) = board_hit_at(session.board(), point) {
            let result = match hit {
                BoardHit::Raft => session.request_crossing(now_ms),
                BoardHit::Actor(actor) if session.board().is_seated(actor) => {
                    session.request_disembark(actor, now_ms)
                }
                BoardHit::Actor(actor) => session.request_board(actor, now_ms),
            };
            if let Err(error) = result {
                debug!(hit = ?hit, %error, "board_request_rejected");
            }
            return ClickOutcome::Board(hit);
        }
    }
    match chrome.button_at(point) {
        Some(action) => ClickOutcome::Button(action),
        None => ClickOutcome::Nothing,
    }
}

pub(crate) fn resolve_hover(session: &mut GameSession, chrome: &mut UiChrome, point: Option<Vec2>) {
    chrome.apply_hover(point);
    let Some(point) = point else {
        return;
    };
    if session.phase().is_terminal() {
        return;
    }
    let board = session.board_mut();
    match board_hit_at(board, point) {
        Some(BoardHit::Raft) => {
            board.hover_raft();
        }
        Some(BoardHit::Actor(actor)) => {
            board.hover_actor(actor);
        }
        None => {}
    }
}
