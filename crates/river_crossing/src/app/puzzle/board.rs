use std::fmt;

use engine::{Rect, Vec2};
use thiserror::Error;

use super::graph::{Bank, Configuration, CANNIBAL_COUNT, MISSIONARY_COUNT, RAFT_CAPACITY};
use super::poses::PoseCycle;
use crate::app::config::{BoardConfig, HomeRow};

pub(crate) const SEAT_COUNT: usize = RAFT_CAPACITY as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ActorKind {
    Cannibal,
    Missionary,
}

impl ActorKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Cannibal => "cannibal",
            Self::Missionary => "missionary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ActorId {
    kind: ActorKind,
    slot: u8,
}

impl ActorId {
    pub(crate) const fn cannibal(slot: u8) -> Self {
        Self {
            kind: ActorKind::Cannibal,
            slot,
        }
    }

    pub(crate) const fn missionary(slot: u8) -> Self {
        Self {
            kind: ActorKind::Missionary,
            slot,
        }
    }

    pub(crate) fn kind(self) -> ActorKind {
        self.kind
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind.as_str(), self.slot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum MotionState {
    #[default]
    Idle,
    Moving,
    Hovered,
}

impl MotionState {
    pub(crate) fn is_idle(self) -> bool {
        matches!(self, Self::Idle | Self::Hovered)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Actor {
    id: ActorId,
    bank: Bank,
    position: Vec2,
    pub(crate) state: MotionState,
    pub(crate) pose: PoseCycle,
}

impl Actor {
    pub(crate) fn id(&self) -> ActorId {
        self.id
    }

    #[cfg(test)]
    pub(crate) fn bank(&self) -> Bank {
        self.bank
    }

    #[cfg(test)]
    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct RaftSlot {
    occupant: Option<ActorId>,
}

impl RaftSlot {
    pub(crate) fn occupant(&self) -> Option<ActorId> {
        self.occupant
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Raft {
    bank: Bank,
    position: Vec2,
    pub(crate) state: MotionState,
    seats: [RaftSlot; SEAT_COUNT],
}

impl Raft {
    pub(crate) fn bank(&self) -> Bank {
        self.bank
    }

    #[cfg(test)]
    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }

    #[cfg(test)]
    pub(crate) fn seats(&self) -> &[RaftSlot; SEAT_COUNT] {
        &self.seats
    }

    pub(crate) fn passengers(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.seats.iter().filter_map(RaftSlot::occupant)
    }

    fn seat_of(&self, actor: ActorId) -> Option<usize> {
        self.seats
            .iter()
            .position(|seat| seat.occupant == Some(actor))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoardAction {
    Board,
    Disembark,
    Cross,
}

impl fmt::Display for BoardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Board => "board",
            Self::Disembark => "disembark",
            Self::Cross => "crossing",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Refusal {
    SessionOver,
    UnknownActor,
    ActorBusy,
    RaftBusy,
    WrongBank,
    AlreadySeated,
    RaftFull,
    NotSeated,
    RaftEmpty,
    PassengersBusy,
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SessionOver => "session is over",
            Self::UnknownActor => "no such actor",
            Self::ActorBusy => "actor is moving",
            Self::RaftBusy => "raft is moving",
            Self::WrongBank => "actor is not on the raft's bank",
            Self::AlreadySeated => "actor is already seated",
            Self::RaftFull => "raft is full",
            Self::NotSeated => "actor is not on the raft",
            Self::RaftEmpty => "raft has no passengers",
            Self::PassengersBusy => "a passenger is still moving",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum BoardError {
    #[error("{action} refused: {reason}")]
    NotAllowed { action: BoardAction, reason: Refusal },
}

impl BoardError {
    #[cfg(test)]
    pub(crate) fn reason(&self) -> Refusal {
        match self {
            Self::NotAllowed { reason, .. } => *reason,
        }
    }
}

fn refuse(action: BoardAction, reason: Refusal) -> BoardError {
    BoardError::NotAllowed { action, reason }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ActorMove {
    pub(crate) actor: ActorId,
    pub(crate) from: Vec2,
    pub(crate) to: Vec2,
    pub(crate) duration_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CrossingPlan {
    pub(crate) from: Vec2,
    pub(crate) to: Vec2,
    pub(crate) duration_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Delivered {
    pub(crate) cannibals: u8,
    pub(crate) missionaries: u8,
}

#[derive(Debug, Clone)]
pub(crate) struct BoardModel {
    config: BoardConfig,
    // missionary i, then cannibal i
    actors: Vec<Actor>,
    raft: Raft,
}

impl BoardModel {
    pub(crate) fn new(config: &BoardConfig) -> Self {
        let mut actors = Vec::with_capacity((CANNIBAL_COUNT + MISSIONARY_COUNT) as usize);
        for slot in 0..CANNIBAL_COUNT.max(MISSIONARY_COUNT) {
            let ids = [ActorId::missionary(slot), ActorId::cannibal(slot)];
            for id in ids {
                let in_range = match id.kind {
                    ActorKind::Missionary => slot < MISSIONARY_COUNT,
                    ActorKind::Cannibal => slot < CANNIBAL_COUNT,
                };
                if in_range {
                    actors.push(Actor {
                        id,
                        bank: Bank::Near,
                        position: home_row(config, id.kind, Bank::Near).slot(slot),
                        state: MotionState::Idle,
                        pose: PoseCycle::default(),
                    });
                }
            }
        }
        Self {
            config: *config,
            actors,
            raft: Raft {
                bank: Bank::Near,
                position: config.raft.anchor(Bank::Near),
                state: MotionState::Idle,
                seats: [RaftSlot::default(); SEAT_COUNT],
            },
        }
    }

    pub(crate) fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub(crate) fn actors_mut(&mut self) -> &mut [Actor] {
        &mut self.actors
    }

    pub(crate) fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|actor| actor.id == id)
    }

    pub(crate) fn raft(&self) -> &Raft {
        &self.raft
    }

    pub(crate) fn raft_mut(&mut self) -> &mut Raft {
        &mut self.raft
    }

    pub(crate) fn is_seated(&self, id: ActorId) -> bool {
        self.raft.seat_of(id).is_some()
    }

    pub(crate) fn home_position(&self, id: ActorId, bank: Bank) -> Vec2 {
        home_row(&self.config, id.kind, bank).slot(id.slot)
    }

    pub(crate) fn raft_rect(&self) -> Rect {
        let size = self.config.raft.size;
        Rect::from_center(self.raft.position, size.width, size.height)
    }

    pub(crate) fn actor_rect(&self, actor: &Actor) -> Rect {
        let size = self.config.actors.size;
        Rect::from_center(actor.position, size.width, size.height)
    }

    pub(crate) fn seat_position(&self, seat: usize) -> Vec2 {
        seat_position_at(&self.config, self.raft.position, seat)
    }

    pub(crate) fn request_board(&mut self, id: ActorId) -> Result<ActorMove, BoardError> {
        let action = BoardAction::Board;
        let actor = self
            .actor(id)
            .ok_or(refuse(action, Refusal::UnknownActor))?;
        if !actor.state.is_idle() {
            return Err(refuse(action, Refusal::ActorBusy));
        }
        if !self.raft.state.is_idle() {
            return Err(refuse(action, Refusal::RaftBusy));
        }
        if self.is_seated(id) {
            return Err(refuse(action, Refusal::AlreadySeated));
        }
        if actor.bank != self.raft.bank {
            return Err(refuse(action, Refusal::WrongBank));
        }
        let seat = self
            .raft
            .seats
            .iter()
            .position(|seat| seat.occupant.is_none())
            .ok_or(refuse(action, Refusal::RaftFull))?;

        let from = actor.position;
        let to = self.seat_position(seat);
        self.raft.seats[seat].occupant = Some(id);
        self.set_moving(id);
        Ok(ActorMove {
            actor: id,
            from,
            to,
            duration_ms: self.config.timing.board_move_ms,
        })
    }

    pub(crate) fn request_disembark(&mut self, id: ActorId) -> Result<ActorMove, BoardError> {
        let action = BoardAction::Disembark;
        let actor = self
            .actor(id)
            .ok_or(refuse(action, Refusal::UnknownActor))?;
        let seat = self
            .raft
            .seat_of(id)
            .ok_or(refuse(action, Refusal::NotSeated))?;
        if !actor.state.is_idle() {
            return Err(refuse(action, Refusal::ActorBusy));
        }
        if !self.raft.state.is_idle() {
            return Err(refuse(action, Refusal::RaftBusy));
        }

        let from = actor.position;
        let to = self.home_position(id, actor.bank);
        self.raft.seats[seat].occupant = None;
        self.set_moving(id);
        Ok(ActorMove {
            actor: id,
            from,
            to,
            duration_ms: self.config.timing.board_move_ms,
        })
    }

    pub(crate) fn request_crossing(&mut self) -> Result<CrossingPlan, BoardError> {
        let action = BoardAction::Cross;
        if !self.raft.state.is_idle() {
            return Err(refuse(action, Refusal::RaftBusy));
        }
        if self.raft.passengers().next().is_none() {
            return Err(refuse(action, Refusal::RaftEmpty));
        }
        let passengers_idle = self.raft.passengers().all(|id| {
            self.actor(id)
                .map(|actor| actor.state.is_idle())
                .unwrap_or(false)
        });
        if !passengers_idle {
            return Err(refuse(action, Refusal::PassengersBusy));
        }

        self.raft.state = MotionState::Moving;
        Ok(CrossingPlan {
            from: self.raft.position,
            to: self.config.raft.anchor(self.raft.bank.opposite()),
            duration_ms: self.config.timing.crossing_ms,
        })
    }

    pub(crate) fn advance_actor(&mut self, id: ActorId, from: Vec2, to: Vec2, t: f32) {
        if let Some(actor) = self.actor_mut(id) {
            actor.position = from.lerp(to, t);
        }
    }

    pub(crate) fn finish_actor_move(&mut self, id: ActorId, to: Vec2) {
        if let Some(actor) = self.actor_mut(id) {
            actor.position = to;
            actor.state = MotionState::Idle;
            actor.pose.reset();
        }
    }

    pub(crate) fn advance_crossing(&mut self, from: Vec2, to: Vec2, t: f32) {
        self.raft.position = from.lerp(to, t);
        self.pin_passengers();
    }

    pub(crate) fn finish_crossing(&mut self, to: Vec2) -> Delivered {
        let landed_on = self.raft.bank.opposite();
        self.raft.bank = landed_on;
        self.raft.position = to;
        self.raft.state = MotionState::Idle;
        self.pin_passengers();

        let mut delivered = Delivered {
            cannibals: 0,
            missionaries: 0,
        };
        let passengers: Vec<ActorId> = self.raft.passengers().collect();
        for id in passengers {
            if let Some(actor) = self.actor_mut(id) {
                actor.bank = landed_on;
            }
            match id.kind {
                ActorKind::Cannibal => delivered.cannibals += 1,
                ActorKind::Missionary => delivered.missionaries += 1,
            }
        }
        delivered
    }

    fn pin_passengers(&mut self) {
        for seat in 0..SEAT_COUNT {
            let Some(id) = self.raft.seats[seat].occupant else {
                continue;
            };
            let position = self.seat_position(seat);
            if let Some(actor) = self.actor_mut(id) {
                actor.position = position;
            }
        }
    }

    pub(crate) fn loss_bank(&self) -> Bank {
        let far = self
            .actors
            .iter()
            .filter(|actor| actor.id.kind == ActorKind::Cannibal && actor.bank == Bank::Far)
            .count();
        let near = self
            .actors
            .iter()
            .filter(|actor| actor.id.kind == ActorKind::Cannibal && actor.bank == Bank::Near)
            .count();
        if far > near {
            Bank::Far
        } else {
            Bank::Near
        }
    }

    pub(crate) fn plan_loss_moves(&mut self, bank: Bank) -> Vec<ActorMove> {
        let gather = self.config.loss.gather(bank);
        let spread = self.config.loss.missionary_spread;
        let direction = match bank {
            Bank::Near => 1.0,
            Bank::Far => -1.0,
        };
        let timing = self.config.timing;

        let mut moves = Vec::new();
        for actor in self.actors.iter_mut().filter(|actor| actor.bank == bank) {
            let (to, duration_ms) = match actor.id.kind {
                ActorKind::Cannibal => (gather, timing.loss_cannibal_walk_ms),
                ActorKind::Missionary => {
                    let offset = spread * actor.id.slot as f32;
                    (
                        gather.offset(direction * offset, offset),
                        timing.loss_missionary_walk_ms,
                    )
                }
            };
            actor.state = MotionState::Moving;
            moves.push(ActorMove {
                actor: actor.id,
                from: actor.position,
                to,
                duration_ms,
            });
        }
        moves
    }

    pub(crate) fn hover_actor(&mut self, id: ActorId) -> bool {
        if !self.raft.state.is_idle() {
            return false;
        }
        match self.actor_mut(id) {
            Some(actor) if actor.state.is_idle() => {
                actor.state = MotionState::Hovered;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn hover_raft(&mut self) -> bool {
        if !self.raft.state.is_idle() {
            return false;
        }
        self.raft.state = MotionState::Hovered;
        true
    }

    pub(crate) fn derived_configuration(&self) -> Option<Configuration> {
        let count_far = |kind: ActorKind| {
            self.actors
                .iter()
                .filter(|actor| actor.id.kind == kind && actor.bank == Bank::Far)
                .count() as u8
        };
        Configuration::new(
            count_far(ActorKind::Cannibal),
            count_far(ActorKind::Missionary),
            self.raft.bank,
        )
    }

    fn set_moving(&mut self, id: ActorId) {
        if let Some(actor) = self.actor_mut(id) {
            actor.state = MotionState::Moving;
        }
    }
}

fn home_row(config: &BoardConfig, kind: ActorKind, bank: Bank) -> &HomeRow {
    let actors = &config.actors;
    match (kind, bank) {
        (ActorKind::Cannibal, Bank::Near) => &actors.cannibal_near,
        (ActorKind::Cannibal, Bank::Far) => &actors.cannibal_far,
        (ActorKind::Missionary, Bank::Near) => &actors.missionary_near,
        (ActorKind::Missionary, Bank::Far) => &actors.missionary_far,
    }
}

fn seat_position_at(config: &BoardConfig, raft_center: Vec2, seat: usize) -> Vec2 {
    let raft = Rect::from_center(raft_center, config.raft.size.width, config.raft.size.height);
    let inset = config.raft.seat_inset;
    let x = if seat == 0 {
        raft.left() + inset.x
    } else {
        raft.right() - inset.x
    };
    Vec2 {
        x,
        y: raft.bottom() - inset.y,
    }
}
