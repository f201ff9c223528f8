use engine::Rgba;

use super::board::{Actor, ActorKind, MotionState, Raft};
use crate::app::config::PoseTiming;

pub(crate) const BACKGROUND_SPRITE: &str = "background";
const BACKGROUND_PLACEHOLDER: Rgba = [46, 104, 148, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pose {
    pub(crate) key: &'static str,
    pub(crate) placeholder: Rgba,
}

pub(crate) const BACKGROUND: Pose = Pose {
    key: BACKGROUND_SPRITE,
    placeholder: BACKGROUND_PLACEHOLDER,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct PoseCycle {
    tick: u32,
    flips: u32,
    frame: u8,
}

impl PoseCycle {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn step(&mut self, period: u32) -> u8 {
        if self.tick % period.max(1) == 0 {
            self.frame = (self.flips % 2) as u8;
            self.flips = self.flips.wrapping_add(1);
        }
        self.tick = self.tick.wrapping_add(1);
        self.frame
    }

    #[cfg(test)]
    pub(crate) fn frame(&self) -> u8 {
        self.frame
    }
}

fn actor_keys(kind: ActorKind) -> ([&'static str; 2], [&'static str; 2], &'static str) {
    match kind {
        ActorKind::Cannibal => (
            ["cannibal/idle0", "cannibal/idle1"],
            ["cannibal/move0", "cannibal/move1"],
            "cannibal/hovered",
        ),
        ActorKind::Missionary => (
            ["missionary/idle0", "missionary/idle1"],
            ["missionary/move0", "missionary/move1"],
            "missionary/hovered",
        ),
    }
}

fn actor_placeholder(kind: ActorKind, hovered: bool) -> Rgba {
    match (kind, hovered) {
        (ActorKind::Cannibal, false) => [178, 58, 48, 255],
        (ActorKind::Cannibal, true) => [232, 96, 80, 255],
        (ActorKind::Missionary, false) => [226, 222, 204, 255],
        (ActorKind::Missionary, true) => [255, 250, 160, 255],
    }
}

/// Picks this frame's sprite. A hovered actor shows its hover sprite for one
/// frame, then drops back to idle with a fresh cycle.
pub(crate) fn actor_pose(actor: &mut Actor, timing: &PoseTiming) -> Pose {
    let kind = actor.id().kind();
    let (idle, moving, hovered) = actor_keys(kind);
    match actor.state {
        MotionState::Hovered => {
            actor.state = MotionState::Idle;
            actor.pose.reset();
            Pose {
                key: hovered,
                placeholder: actor_placeholder(kind, true),
            }
        }
        MotionState::Moving => {
            let frame = actor.pose.step(timing.move_period_frames);
            Pose {
                key: moving[frame as usize],
                placeholder: actor_placeholder(kind, false),
            }
        }
        MotionState::Idle => {
            let frame = actor.pose.step(timing.idle_period_frames);
            Pose {
                key: idle[frame as usize],
                placeholder: actor_placeholder(kind, false),
            }
        }
    }
}

pub(crate) fn raft_pose(raft: &mut Raft) -> Pose {
    if raft.state == MotionState::Hovered {
        raft.state = MotionState::Idle;
        return Pose {
            key: "raft_hovered",
            placeholder: [176, 128, 70, 255],
        };
    }
    Pose {
        key: "raft",
        placeholder: [122, 82, 44, 255],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::BoardConfig;
    use crate::app::puzzle::board::{ActorId, BoardModel};

    #[test]
    fn cycle_flips_every_period_starting_at_frame_zero() {
        let mut cycle = PoseCycle::default();
        let frames: Vec<u8> = (0..7).map(|_| cycle.step(3)).collect();
        assert_eq!(frames, vec![0, 0, 0, 1, 1, 1, 0]);
    }

    #[test]
    fn reset_restarts_the_cycle() {
        let mut cycle = PoseCycle::default();
        for _ in 0..4 {
            cycle.step(2);
        }
        assert_eq!(cycle.frame(), 1);
        cycle.reset();
        assert_eq!(cycle.step(2), 0);
    }

    #[test]
    fn hovered_actor_shows_hover_sprite_for_one_frame() {
        let config = BoardConfig::default();
        let mut board = BoardModel::new(&config);
        assert!(board.hover_actor(ActorId::cannibal(1)));

        let actor = board
            .actors_mut()
            .iter_mut()
            .find(|actor| actor.id() == ActorId::cannibal(1))
            .expect("cannibal 1");
        assert_eq!(actor_pose(actor, &config.poses).key, "cannibal/hovered");
        assert_eq!(actor.state, MotionState::Idle);
        assert_eq!(actor_pose(actor, &config.poses).key, "cannibal/idle0");
    }

    #[test]
    fn moving_actor_uses_the_faster_move_cycle() {
        let config = BoardConfig::default();
        let mut board = BoardModel::new(&config);
        board
            .request_board(ActorId::missionary(0))
            .expect("board");
        let actor = &mut board.actors_mut()[0];

        let keys: Vec<&str> = (0..16)
            .map(|_| actor_pose(actor, &config.poses).key)
            .collect();
        assert!(keys[..15].iter().all(|key| *key == "missionary/move0"));
        assert_eq!(keys[15], "missionary/move1");
    }

    #[test]
    fn hovered_raft_swaps_sprite_once() {
        let config = BoardConfig::default();
        let mut board = BoardModel::new(&config);
        assert!(board.hover_raft());
        assert_eq!(raft_pose(board.raft_mut()).key, "raft_hovered");
        assert_eq!(raft_pose(board.raft_mut()).key, "raft");
    }
}
