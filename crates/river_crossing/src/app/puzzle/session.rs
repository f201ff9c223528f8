use thiserror::Error;
use tracing::{debug, info};

use super::board::{
    ActorId, ActorMove, BoardAction, BoardError, BoardModel, Delivered, Refusal,
};
use super::graph::{
    Bank, Composition, Configuration, Outcome, TransitionError, TransitionTable,
};
use super::scheduler::{Reveal, TaskKind, TaskScheduler, TaskTarget};
use crate::app::config::BoardConfig;

const DIM_OPAQUE: u8 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionPhase {
    Playing,
    Won,
    Lost,
}

impl SessionPhase {
    pub(crate) fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionEvent {
    CrossingCommitted {
        from: Configuration,
        composition: Composition,
        to: Configuration,
    },
    Won,
    LossStarted { bank: Bank },
    Lost,
    RestartOffered,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum SessionError {
    #[error("illegal crossing: {0}")]
    IllegalComposition(#[from] TransitionError),
    #[error("raft landed carrying {cannibals} cannibal(s) and {missionaries} missionary(ies)")]
    InvalidLoad { cannibals: u8, missionaries: u8 },
    #[error("configuration {0} has no entry in the transition table")]
    UnknownConfiguration(Configuration),
    #[error("tracked configuration {tracked} disagrees with the board ({derived:?})")]
    Desync {
        tracked: Configuration,
        derived: Option<Configuration>,
    },
}

struct BoardTarget<'a> {
    board: &'a mut BoardModel,
    dim_alpha: &'a mut u8,
}

impl TaskTarget for BoardTarget<'_> {
    fn advance(&mut self, kind: &TaskKind, t: f32) {
        match *kind {
            TaskKind::MoveActor { actor, from, to } => self.board.advance_actor(actor, from, to, t),
            TaskKind::CrossRaft { from, to } => self.board.advance_crossing(from, to, t),
            TaskKind::Dim {
                from_alpha,
                to_alpha,
            } => {
                let from = f32::from(from_alpha);
                let to = f32::from(to_alpha);
                *self.dim_alpha = (from + (to - from) * t.clamp(0.0, 1.0)).round() as u8;
            }
            TaskKind::Reveal(_) => {}
        }
    }
}

#[derive(Debug)]
pub(crate) struct GameSession {
    config: BoardConfig,
    table: &'static TransitionTable,
    configuration: Configuration,
    phase: SessionPhase,
    board: BoardModel,
    dim_alpha: u8,
    scheduler: TaskScheduler,
    events: Vec<SessionEvent>,
}

impl GameSession {
    pub(crate) fn new(config: &BoardConfig) -> Self {
        Self {
            config: *config,
            table: TransitionTable::standard(),
            configuration: Configuration::START,
            phase: SessionPhase::Playing,
            board: BoardModel::new(config),
            dim_alpha: 0,
            scheduler: TaskScheduler::new(),
            events: Vec::new(),
        }
    }

    pub(crate) fn configuration(&self) -> Configuration {
        self.configuration
    }

    pub(crate) fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[cfg(test)]
    pub(crate) fn set_phase(&mut self, phase: SessionPhase) {
        self.phase = phase;
    }

    pub(crate) fn board(&self) -> &BoardModel {
        &self.board
    }

    pub(crate) fn board_mut(&mut self) -> &mut BoardModel {
        &mut self.board
    }

    pub(crate) fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub(crate) fn dim_alpha(&self) -> u8 {
        self.dim_alpha
    }

    pub(crate) fn active_tasks(&self) -> usize {
        self.scheduler.len()
    }

    pub(crate) fn request_board(&mut self, actor: ActorId, now_ms: u64) -> Result<(), BoardError> {
        self.ensure_playing(BoardAction::Board)?;
        let planned = self.board.request_board(actor)?;
        debug!(actor = %actor, "board_accepted");
        self.schedule_move(planned, now_ms);
        Ok(())
    }

    pub(crate) fn request_disembark(&mut self, actor: ActorId, now_ms: u64) -> Result<(), BoardError> {
        self.ensure_playing(BoardAction::Disembark)?;
        let planned = self.board.request_disembark(actor)?;
        debug!(actor = %actor, "disembark_accepted");
        self.schedule_move(planned, now_ms);
        Ok(())
    }

    pub(crate) fn request_crossing(&mut self, now_ms: u64) -> Result<(), BoardError> {
        self.ensure_playing(BoardAction::Cross)?;
        let plan = self.board.request_crossing()?;
        debug!(from = %self.configuration, "crossing_accepted");
        self.scheduler.schedule(
            TaskKind::CrossRaft {
                from: plan.from,
                to: plan.to,
            },
            now_ms,
            plan.duration_ms,
        );
        Ok(())
    }

    pub(crate) fn tick(&mut self, now_ms: u64) -> Result<(), SessionError> {
        let mut target = BoardTarget {
            board: &mut self.board,
            dim_alpha: &mut self.dim_alpha,
        };
        let finished = self.scheduler.tick(now_ms, &mut target);
        for task in finished {
            debug!(task = ?task.id(), kind = ?task.kind(), "task_finished");
            match *task.kind() {
                TaskKind::MoveActor { actor, to, .. } => self.board.finish_actor_move(actor, to),
                TaskKind::CrossRaft { to, .. } => {
                    let delivered = self.board.finish_crossing(to);
                    self.commit_crossing(delivered, now_ms)?;
                }
                TaskKind::Dim { to_alpha, .. } => {
                    self.dim_alpha = to_alpha;
                    if self.phase == SessionPhase::Lost {
                        info!("loss_screen_shown");
                        self.events.push(SessionEvent::Lost);
                        self.schedule_restart_offer(now_ms);
                    }
                }
                TaskKind::Reveal(Reveal::RestartButton) => {
                    self.events.push(SessionEvent::RestartOffered);
                }
            }
        }
        Ok(())
    }

    pub(crate) fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    fn ensure_playing(&self, action: BoardAction) -> Result<(), BoardError> {
        if self.phase.is_terminal() {
            return Err(BoardError::NotAllowed {
                action,
                reason: Refusal::SessionOver,
            });
        }
        Ok(())
    }

    fn schedule_move(&mut self, planned: ActorMove, now_ms: u64) {
        self.scheduler.schedule(
            TaskKind::MoveActor {
                actor: planned.actor,
                from: planned.from,
                to: planned.to,
            },
            now_ms,
            planned.duration_ms,
        );
    }

    fn commit_crossing(&mut self, delivered: Delivered, now_ms: u64) -> Result<(), SessionError> {
        let composition = Composition::from_counts(delivered.cannibals, delivered.missionaries)
            .ok_or(SessionError::InvalidLoad {
                cannibals: delivered.cannibals,
                missionaries: delivered.missionaries,
            })?;
        let from = self.configuration;
        let to = self.table.transition(from, composition)?;
        let derived = self.board.derived_configuration();
        if derived != Some(to) {
            return Err(SessionError::Desync {
                tracked: to,
                derived,
            });
        }
        self.configuration = to;
        info!(from = %from, composition = %composition, to = %to, "crossing_committed");
        self.events.push(SessionEvent::CrossingCommitted {
            from,
            composition,
            to,
        });

        let classification = self
            .table
            .classify(to)
            .ok_or(SessionError::UnknownConfiguration(to))?;
        match classification.outcome() {
            Outcome::Continue => {}
            Outcome::Failure => self.start_loss(now_ms),
            Outcome::Win => {
                self.phase = SessionPhase::Won;
                info!(configuration = %to, "puzzle_won");
                self.events.push(SessionEvent::Won);
                self.schedule_restart_offer(now_ms);
            }
        }
        Ok(())
    }

    fn start_loss(&mut self, now_ms: u64) {
        self.phase = SessionPhase::Lost;
        let bank = self.board.loss_bank();
        info!(configuration = %self.configuration, bank = %bank, "loss_sequence_started");
        self.scheduler.schedule(
            TaskKind::Dim {
                from_alpha: self.dim_alpha,
                to_alpha: DIM_OPAQUE,
            },
            now_ms,
            self.config.timing.dim_ms,
        );
        for planned in self.board.plan_loss_moves(bank) {
            self.schedule_move(planned, now_ms);
        }
        self.events.push(SessionEvent::LossStarted { bank });
    }

    fn schedule_restart_offer(&mut self, now_ms: u64) {
        self.scheduler.schedule(
            TaskKind::Reveal(Reveal::RestartButton),
            now_ms,
            self.config.timing.reveal_delay_ms,
        );
    }
}
