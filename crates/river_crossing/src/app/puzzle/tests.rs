use engine::Vec2;

use super::board::{ActorId, ActorKind, Refusal};
use super::graph::{Bank, Composition, Configuration, Outcome, TransitionTable};
use super::session::{GameSession, SessionEvent, SessionPhase};
use crate::app::config::BoardConfig;

const TICK_MS: u64 = 250;
const MAX_SETTLE_TICKS: usize = 400;

struct Driver {
    session: GameSession,
    now_ms: u64,
    events: Vec<SessionEvent>,
}

impl Driver {
    fn new() -> Self {
        Self {
            session: GameSession::new(&BoardConfig::default()),
            now_ms: 0,
            events: Vec::new(),
        }
    }

    fn settle(&mut self) {
        for _ in 0..MAX_SETTLE_TICKS {
            if self.session.active_tasks() == 0 {
                return;
            }
            self.now_ms += TICK_MS;
            self.session.tick(self.now_ms).expect("tick");
            self.events.extend(self.session.drain_events());
        }
        panic!("tasks never settled: {}", self.session.active_tasks());
    }

    fn waiting(&self, kind: ActorKind, bank: Bank) -> ActorId {
        let board = self.session.board();
        board
            .actors()
            .iter()
            .find(|actor| {
                actor.id().kind() == kind && actor.bank() == bank && !board.is_seated(actor.id())
            })
            .map(|actor| actor.id())
            .unwrap_or_else(|| panic!("no {kind:?} waiting on {bank}"))
    }

    fn ferry(&mut self, composition: Composition) -> Configuration {
        let bank = self.session.board().raft().bank();
        let (cannibals, missionaries) = composition.counts();
        let mut passengers = Vec::new();
        for _ in 0..cannibals {
            passengers.push(self.waiting(ActorKind::Cannibal, bank));
            self.board(*passengers.last().expect("passenger"));
        }
        for _ in 0..missionaries {
            passengers.push(self.waiting(ActorKind::Missionary, bank));
            self.board(*passengers.last().expect("passenger"));
        }

        self.session
            .request_crossing(self.now_ms)
            .expect("crossing");
        self.settle();

        if self.session.phase() == SessionPhase::Playing {
            for actor in passengers {
                self.session
                    .request_disembark(actor, self.now_ms)
                    .expect("disembark");
            }
            self.settle();
        }
        self.session.configuration()
    }

    fn board(&mut self, actor: ActorId) {
        self.session
            .request_board(actor, self.now_ms)
            .expect("board");
        self.settle();
    }
}

fn label(config: Configuration) -> String {
    config.to_string()
}

fn classify(config: Configuration) -> Outcome {
    TransitionTable::standard()
        .classify(config)
        .expect("listed configuration")
        .outcome()
}

#[test]
fn two_cannibals_cross_from_the_start() {
    let mut driver = Driver::new();
    driver.board(ActorId::cannibal(0));
    driver.board(ActorId::cannibal(1));
    driver
        .session
        .request_crossing(driver.now_ms)
        .expect("crossing");
    assert_eq!(label(driver.session.configuration()), "-cccmmmb");

    driver.settle();
    assert_eq!(label(driver.session.configuration()), "bcc-cmmm");
    assert_eq!(driver.session.board().raft().bank(), Bank::Far);
    assert_eq!(
        driver.session.board().derived_configuration(),
        Some(driver.session.configuration())
    );
    assert_eq!(
        driver.events,
        vec![SessionEvent::CrossingCommitted {
            from: Configuration::START,
            composition: Composition::TwoCannibals,
            to: driver.session.configuration(),
        }]
    );
}

#[test]
fn configuration_only_changes_when_the_crossing_lands() {
    let mut driver = Driver::new();
    driver.board(ActorId::cannibal(2));
    driver
        .session
        .request_crossing(driver.now_ms)
        .expect("crossing");
    let started = driver.now_ms;

    driver.session.tick(started + 1_500).expect("tick");
    assert_eq!(driver.session.configuration(), Configuration::START);
    let raft = driver.session.board().raft().position();
    assert_eq!(raft, Vec2::new(630.0, 650.0));
    let seat = driver.session.board().seat_position(0);
    let rider = driver
        .session
        .board()
        .actor(ActorId::cannibal(2))
        .expect("rider")
        .position();
    assert_eq!(rider, seat);

    driver.session.tick(started + 3_000).expect("tick");
    assert_eq!(label(driver.session.configuration()), "bc-ccmmm");
}

#[test]
fn long_frame_gaps_land_in_the_same_place() {
    let mut smooth = Driver::new();
    smooth.ferry(Composition::CannibalAndMissionary);

    let mut stuttering = Driver::new();
    stuttering.board(ActorId::cannibal(0));
    stuttering.board(ActorId::missionary(0));
    stuttering
        .session
        .request_crossing(stuttering.now_ms)
        .expect("crossing");
    stuttering
        .session
        .tick(stuttering.now_ms + 60_000)
        .expect("tick");

    assert_eq!(
        smooth.session.configuration(),
        stuttering.session.configuration()
    );
    assert_eq!(
        stuttering.session.board().raft().position(),
        Vec2::new(430.0, 650.0)
    );
}

#[test]
fn reaching_ccm_cmmb_is_a_loss() {
    let mut driver = Driver::new();
    let route = [
        Composition::CannibalAndMissionary,
        Composition::OneMissionary,
        Composition::TwoCannibals,
        Composition::OneCannibal,
        Composition::TwoMissionaries,
        Composition::OneMissionary,
    ];
    let mut reached = Configuration::START;
    for composition in route {
        reached = driver.ferry(composition);
    }

    assert_eq!(label(reached), "ccm-cmmb");
    assert_eq!(classify(reached), Outcome::Failure);
    assert_eq!(driver.session.phase(), SessionPhase::Lost);
    assert_eq!(driver.session.dim_alpha(), 255);

    let tail: Vec<SessionEvent> = driver
        .events
        .iter()
        .copied()
        .filter(|event| !matches!(event, SessionEvent::CrossingCommitted { .. }))
        .collect();
    assert_eq!(
        tail,
        vec![
            SessionEvent::LossStarted { bank: Bank::Far },
            SessionEvent::Lost,
            SessionEvent::RestartOffered,
        ]
    );

    let gather = Vec2::new(280.0, 490.0);
    let board = driver.session.board();
    for actor in board.actors() {
        if actor.bank() == Bank::Far && actor.id().kind() == ActorKind::Cannibal {
            assert_eq!(actor.position(), gather);
        }
    }
}

#[test]
fn board_ignores_requests_after_a_loss() {
    let mut driver = Driver::new();
    for composition in [
        Composition::CannibalAndMissionary,
        Composition::OneMissionary,
        Composition::TwoCannibals,
        Composition::OneCannibal,
        Composition::TwoMissionaries,
        Composition::OneMissionary,
    ] {
        driver.ferry(composition);
    }

    let refused = driver
        .session
        .request_crossing(driver.now_ms)
        .map_err(|error| error.reason());
    assert_eq!(refused, Err(Refusal::SessionOver));
}

#[test]
fn eleven_crossings_win_the_puzzle() {
    let mut driver = Driver::new();
    let route = [
        Composition::TwoCannibals,
        Composition::OneCannibal,
        Composition::TwoCannibals,
        Composition::OneCannibal,
        Composition::TwoMissionaries,
        Composition::CannibalAndMissionary,
        Composition::TwoMissionaries,
        Composition::OneCannibal,
        Composition::TwoCannibals,
        Composition::OneCannibal,
        Composition::TwoCannibals,
    ];
    let mut reached = Configuration::START;
    for composition in route {
        assert_eq!(driver.session.phase(), SessionPhase::Playing);
        reached = driver.ferry(composition);
    }

    assert_eq!(label(reached), "bcccmmm-");
    assert_eq!(classify(reached), Outcome::Win);
    assert_eq!(driver.session.phase(), SessionPhase::Won);
    assert_eq!(driver.session.dim_alpha(), 0);
    assert!(driver
        .session
        .board()
        .actors()
        .iter()
        .all(|actor| actor.bank() == Bank::Far));

    let last_two = &driver.events[driver.events.len() - 2..];
    assert_eq!(last_two, [SessionEvent::Won, SessionEvent::RestartOffered]);
}

#[test]
fn restart_is_a_fresh_session() {
    let mut driver = Driver::new();
    driver.ferry(Composition::TwoCannibals);
    assert_ne!(driver.session.configuration(), Configuration::START);

    let fresh = GameSession::new(&BoardConfig::default());
    assert_eq!(fresh.configuration(), Configuration::START);
    assert_eq!(fresh.phase(), SessionPhase::Playing);
    assert_eq!(fresh.active_tasks(), 0);
    assert_eq!(fresh.board().derived_configuration(), Some(Configuration::START));
}
