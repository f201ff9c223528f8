use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use thiserror::Error;

pub(crate) const CANNIBAL_COUNT: u8 = 3;
pub(crate) const MISSIONARY_COUNT: u8 = 3;
pub(crate) const RAFT_CAPACITY: u8 = 2;

const C: Composition = Composition::OneCannibal;
const M: Composition = Composition::OneMissionary;
const CC: Composition = Composition::TwoCannibals;
const MM: Composition = Composition::TwoMissionaries;
const CM: Composition = Composition::CannibalAndMissionary;

#[derive(Debug, Clone, Copy)]
enum Node {
    Edges(&'static [(Composition, &'static str)]),
    Failure,
    Win,
}

#[rustfmt::skip]
// Labels read `<far>-<near>`, with `b` on the raft's side.
const STANDARD_GRAPH: &[(&str, Node)] = &[
    ("-cccmmmb", Node::Edges(&[(C, "bc-ccmmm"), (M, "bm-cccmm"), (CC, "bcc-cmmm"), (MM, "bmm-cccm"), (CM, "bcm-ccmm")])),
    ("bc-ccmmm", Node::Edges(&[(C, "-cccmmmb")])),
    ("bm-cccmm", Node::Failure),
    ("bcc-cmmm", Node::Edges(&[(C, "c-ccmmmb"), (CC, "-cccmmmb")])),
    ("bmm-cccm", Node::Failure),
    ("bcm-ccmm", Node::Edges(&[(C, "m-cccmmb"), (M, "c-ccmmmb"), (CM, "-cccmmmb")])),
    ("c-ccmmmb", Node::Edges(&[(C, "bcc-cmmm"), (M, "bcm-ccmm"), (CC, "bccc-mmm"), (MM, "bcmm-ccm"), (CM, "bccm-cmm")])),
    ("m-cccmmb", Node::Failure),
    ("bccc-mmm", Node::Edges(&[(C, "cc-cmmmb"), (CC, "c-ccmmmb")])),
    ("bcmm-ccm", Node::Failure),
    ("bccm-cmm", Node::Failure),
    ("cc-cmmmb", Node::Edges(&[(C, "bccc-mmm"), (M, "bccm-cmm"), (MM, "bccmm-cm"), (CM, "bcccm-mm")])),
    ("bccmm-cm", Node::Edges(&[(C, "cmm-ccmb"), (M, "ccm-cmmb"), (CC, "mm-cccmb"), (MM, "cc-cmmmb"), (CM, "cm-ccmmb")])),
    ("bcccm-mm", Node::Failure),
    ("cmm-ccmb", Node::Failure),
    ("ccm-cmmb", Node::Failure),
    ("mm-cccmb", Node::Failure),
    ("cm-ccmmb", Node::Edges(&[(C, "bccm-cmm"), (M, "bcmm-ccm"), (CC, "bcccm-mm"), (MM, "bcmmm-cc"), (CM, "bccmm-cm")])),
    ("bcmmm-cc", Node::Edges(&[(C, "mmm-cccb"), (M, "cmm-ccmb"), (MM, "cm-ccmmb"), (CM, "mm-cccmb")])),
    ("mmm-cccb", Node::Edges(&[(C, "bcmmm-cc"), (CC, "bccmmm-c")])),
    ("bccmmm-c", Node::Edges(&[(C, "cmmm-ccb"), (M, "ccmm-cmb"), (CC, "mmm-cccb"), (MM, "ccm-cmmb"), (CM, "cmm-ccmb")])),
    ("cmmm-ccb", Node::Edges(&[(C, "bccmmm-c"), (CC, "bcccmmm-")])),
    ("ccmm-cmb", Node::Edges(&[(C, "bcccmm-m"), (M, "bccmmm-c"), (CM, "bcccmmm-")])),
    ("bcccmmm-", Node::Win),
    ("bcccmm-m", Node::Failure),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Bank {
    Near,
    Far,
}

impl Bank {
    pub(crate) fn opposite(self) -> Self {
        match self {
            Self::Near => Self::Far,
            Self::Far => Self::Near,
        }
    }

    pub(crate) fn as_token(self) -> &'static str {
        match self {
            Self::Near => "near",
            Self::Far => "far",
        }
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Composition {
    OneCannibal,
    OneMissionary,
    TwoCannibals,
    TwoMissionaries,
    CannibalAndMissionary,
}

impl Composition {
    #[cfg(test)]
    pub(crate) const ALL: [Self; 5] = [C, M, CC, MM, CM];

    pub(crate) fn from_counts(cannibals: u8, missionaries: u8) -> Option<Self> {
        match (cannibals, missionaries) {
            (1, 0) => Some(C),
            (0, 1) => Some(M),
            (2, 0) => Some(CC),
            (0, 2) => Some(MM),
            (1, 1) => Some(CM),
            _ => None,
        }
    }

    pub(crate) fn counts(self) -> (u8, u8) {
        match self {
            Self::OneCannibal => (1, 0),
            Self::OneMissionary => (0, 1),
            Self::TwoCannibals => (2, 0),
            Self::TwoMissionaries => (0, 2),
            Self::CannibalAndMissionary => (1, 1),
        }
    }

    pub(crate) fn as_token(self) -> &'static str {
        match self {
            Self::OneCannibal => "c",
            Self::OneMissionary => "m",
            Self::TwoCannibals => "2c",
            Self::TwoMissionaries => "2m",
            Self::CannibalAndMissionary => "cm",
        }
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Outcome {
    Continue,
    Failure,
    Win,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Configuration {
    far_cannibals: u8,
    far_missionaries: u8,
    raft: Bank,
}

impl Configuration {
    pub(crate) const START: Self = Self {
        far_cannibals: 0,
        far_missionaries: 0,
        raft: Bank::Near,
    };

    pub(crate) fn new(far_cannibals: u8, far_missionaries: u8, raft: Bank) -> Option<Self> {
        if far_cannibals > CANNIBAL_COUNT || far_missionaries > MISSIONARY_COUNT {
            return None;
        }
        Some(Self {
            far_cannibals,
            far_missionaries,
            raft,
        })
    }

    #[cfg(test)]
    pub(crate) fn raft(self) -> Bank {
        self.raft
    }

    pub(crate) fn cannibals_on(self, bank: Bank) -> u8 {
        match bank {
            Bank::Far => self.far_cannibals,
            Bank::Near => CANNIBAL_COUNT - self.far_cannibals,
        }
    }

    pub(crate) fn missionaries_on(self, bank: Bank) -> u8 {
        match bank {
            Bank::Far => self.far_missionaries,
            Bank::Near => MISSIONARY_COUNT - self.far_missionaries,
        }
    }

    pub(crate) fn after_crossing(self, composition: Composition) -> Option<Self> {
        let (cannibals, missionaries) = composition.counts();
        let from = self.raft;
        if self.cannibals_on(from) < cannibals || self.missionaries_on(from) < missionaries {
            return None;
        }
        let (far_cannibals, far_missionaries) = match from {
            Bank::Near => (
                self.far_cannibals + cannibals,
                self.far_missionaries + missionaries,
            ),
            Bank::Far => (
                self.far_cannibals - cannibals,
                self.far_missionaries - missionaries,
            ),
        };
        Some(Self {
            far_cannibals,
            far_missionaries,
            raft: from.opposite(),
        })
    }

    pub(crate) fn rule_outcome(self) -> Outcome {
        if self.raft == Bank::Far
            && self.far_cannibals == CANNIBAL_COUNT
            && self.far_missionaries == MISSIONARY_COUNT
        {
            return Outcome::Win;
        }
        let outnumbered = |bank: Bank| {
            let missionaries = self.missionaries_on(bank);
            missionaries > 0 && self.cannibals_on(bank) > missionaries
        };
        if outnumbered(Bank::Near) || outnumbered(Bank::Far) {
            Outcome::Failure
        } else {
            Outcome::Continue
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_bank = |f: &mut fmt::Formatter<'_>, bank: Bank| -> fmt::Result {
            for _ in 0..self.cannibals_on(bank) {
                f.write_str("c")?;
            }
            for _ in 0..self.missionaries_on(bank) {
                f.write_str("m")?;
            }
            Ok(())
        };
        if self.raft == Bank::Far {
            f.write_str("b")?;
        }
        write_bank(f, Bank::Far)?;
        f.write_str("-")?;
        write_bank(f, Bank::Near)?;
        if self.raft == Bank::Near {
            f.write_str("b")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum LabelError {
    #[error("label must contain exactly one '-' separating the banks")]
    Separator,
    #[error("unexpected character '{0}' in label")]
    UnexpectedChar(char),
    #[error("label must mark the raft exactly once, found {0}")]
    RaftMarks(usize),
    #[error("label does not account for 3 cannibals and 3 missionaries")]
    Headcount,
}

#[derive(Debug, Clone, Copy, Default)]
struct BankTally {
    cannibals: u8,
    missionaries: u8,
    rafts: usize,
}

fn tally_bank(side: &str) -> Result<BankTally, LabelError> {
    let mut tally = BankTally::default();
    for ch in side.chars() {
        match ch {
            'c' => tally.cannibals = tally.cannibals.saturating_add(1),
            'm' => tally.missionaries = tally.missionaries.saturating_add(1),
            'b' => tally.rafts += 1,
            other => return Err(LabelError::UnexpectedChar(other)),
        }
    }
    Ok(tally)
}

impl FromStr for Configuration {
    type Err = LabelError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let mut sides = label.split('-');
        let (Some(far), Some(near), None) = (sides.next(), sides.next(), sides.next()) else {
            return Err(LabelError::Separator);
        };
        let far = tally_bank(far)?;
        let near = tally_bank(near)?;
        let rafts = far.rafts + near.rafts;
        if rafts != 1 {
            return Err(LabelError::RaftMarks(rafts));
        }
        if far.cannibals + near.cannibals != CANNIBAL_COUNT
            || far.missionaries + near.missionaries != MISSIONARY_COUNT
        {
            return Err(LabelError::Headcount);
        }
        let raft = if far.rafts == 1 { Bank::Far } else { Bank::Near };
        Ok(Self {
            far_cannibals: far.cannibals,
            far_missionaries: far.missionaries,
            raft,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Classification<'t> {
    Continue(&'t [(Composition, Configuration)]),
    Failure,
    Win,
}

impl Classification<'_> {
    pub(crate) fn outcome(self) -> Outcome {
        match self {
            Self::Continue(_) => Outcome::Continue,
            Self::Failure => Outcome::Failure,
            Self::Win => Outcome::Win,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum TransitionError {
    #[error("crossing with {composition} is not allowed from {from}")]
    NotAllowed {
        from: Configuration,
        composition: Composition,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum GraphError {
    #[error("invalid label '{label}': {source}")]
    InvalidLabel {
        label: &'static str,
        #[source]
        source: LabelError,
    },
    #[error("configuration {0} is listed twice")]
    Duplicate(Configuration),
    #[error("{from} lists {composition} twice")]
    DuplicateEdge {
        from: Configuration,
        composition: Composition,
    },
    #[error("{from} --{composition}--> {to} cannot happen with the raft's passengers")]
    ImpossibleEdge {
        from: Configuration,
        composition: Composition,
        to: Configuration,
    },
    #[error("{from} --{composition}--> {to} leads outside the table")]
    DanglingTarget {
        from: Configuration,
        composition: Composition,
        to: Configuration,
    },
    #[error("{config} is listed as {listed:?} but the rules say {derived:?}")]
    OutcomeMismatch {
        config: Configuration,
        listed: Outcome,
        derived: Outcome,
    },
    #[error("the start configuration is missing")]
    MissingStart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Continue(Vec<(Composition, Configuration)>),
    Failure,
    Win,
}

#[derive(Debug, Clone)]
pub(crate) struct TransitionTable {
    entries: HashMap<Configuration, Entry>,
    order: Vec<Configuration>,
}

impl TransitionTable {
    pub(crate) fn standard() -> &'static TransitionTable {
        static STANDARD: OnceLock<TransitionTable> = OnceLock::new();
        STANDARD.get_or_init(|| {
            Self::from_graph(STANDARD_GRAPH).expect("built-in river graph is well formed")
        })
    }

    fn from_graph(graph: &[(&'static str, Node)]) -> Result<Self, GraphError> {
        let parse = |label: &'static str| {
            label
                .parse::<Configuration>()
                .map_err(|source| GraphError::InvalidLabel { label, source })
        };

        let mut entries = HashMap::with_capacity(graph.len());
        let mut order = Vec::with_capacity(graph.len());
        for (label, node) in graph {
            let config = parse(*label)?;
            let entry = match node {
                Node::Failure => Entry::Failure,
                Node::Win => Entry::Win,
                Node::Edges(edges) => {
                    let mut parsed: Vec<(Composition, Configuration)> =
                        Vec::with_capacity(edges.len());
                    for (composition, target) in edges.iter() {
                        if parsed.iter().any(|(seen, _)| seen == composition) {
                            return Err(GraphError::DuplicateEdge {
                                from: config,
                                composition: *composition,
                            });
                        }
                        let to = parse(*target)?;
                        if config.after_crossing(*composition) != Some(to) {
                            return Err(GraphError::ImpossibleEdge {
                                from: config,
                                composition: *composition,
                                to,
                            });
                        }
                        parsed.push((*composition, to));
                    }
                    Entry::Continue(parsed)
                }
            };
            let listed = match entry {
                Entry::Continue(_) => Outcome::Continue,
                Entry::Failure => Outcome::Failure,
                Entry::Win => Outcome::Win,
            };
            let derived = config.rule_outcome();
            if listed != derived {
                return Err(GraphError::OutcomeMismatch {
                    config,
                    listed,
                    derived,
                });
            }
            if entries.insert(config, entry).is_some() {
                return Err(GraphError::Duplicate(config));
            }
            order.push(config);
        }

        for from in &order {
            if let Some(Entry::Continue(edges)) = entries.get(from) {
                for (composition, to) in edges {
                    if !entries.contains_key(to) {
                        return Err(GraphError::DanglingTarget {
                            from: *from,
                            composition: *composition,
                            to: *to,
                        });
                    }
                }
            }
        }
        if !entries.contains_key(&Configuration::START) {
            return Err(GraphError::MissingStart);
        }

        Ok(Self { entries, order })
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    #[cfg(test)]
    pub(crate) fn configurations(&self) -> impl Iterator<Item = Configuration> + '_ {
        self.order.iter().copied()
    }

    pub(crate) fn classify(&self, config: Configuration) -> Option<Classification<'_>> {
        self.entries.get(&config).map(|entry| match entry {
            Entry::Continue(edges) => Classification::Continue(edges.as_slice()),
            Entry::Failure => Classification::Failure,
            Entry::Win => Classification::Win,
        })
    }

    pub(crate) fn transition(
        &self,
        from: Configuration,
        composition: Composition,
    ) -> Result<Configuration, TransitionError> {
        match self.classify(from) {
            Some(Classification::Continue(edges)) => edges
                .iter()
                .find(|(candidate, _)| *candidate == composition)
                .map(|(_, to)| *to)
                .ok_or(TransitionError::NotAllowed { from, composition }),
            _ => Err(TransitionError::NotAllowed { from, composition }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use super::*;

    fn cfg(label: &str) -> Configuration {
        label.parse().expect("label")
    }

    fn table() -> &'static TransitionTable {
        TransitionTable::standard()
    }

    #[rustfmt::skip]
    const REFERENCE_OUTCOMES: [(&str, Outcome); 25] = [
        ("-cccmmmb", Outcome::Continue), ("bc-ccmmm", Outcome::Continue),
        ("bm-cccmm", Outcome::Failure),  ("bcc-cmmm", Outcome::Continue),
        ("bmm-cccm", Outcome::Failure),  ("bcm-ccmm", Outcome::Continue),
        ("c-ccmmmb", Outcome::Continue), ("m-cccmmb", Outcome::Failure),
        ("bccc-mmm", Outcome::Continue), ("bcmm-ccm", Outcome::Failure),
        ("bccm-cmm", Outcome::Failure),  ("cc-cmmmb", Outcome::Continue),
        ("bccmm-cm", Outcome::Continue), ("bcccm-mm", Outcome::Failure),
        ("cmm-ccmb", Outcome::Failure),  ("ccm-cmmb", Outcome::Failure),
        ("mm-cccmb", Outcome::Failure),  ("cm-ccmmb", Outcome::Continue),
        ("bcmmm-cc", Outcome::Continue), ("mmm-cccb", Outcome::Continue),
        ("bccmmm-c", Outcome::Continue), ("cmmm-ccb", Outcome::Continue),
        ("ccmm-cmb", Outcome::Continue), ("bcccmmm-", Outcome::Win),
        ("bcccmm-m", Outcome::Failure),
    ];

    #[test]
    fn labels_round_trip_through_display() {
        for (label, _) in STANDARD_GRAPH {
            assert_eq!(cfg(label).to_string(), *label);
        }
    }

    #[test]
    fn malformed_labels_are_rejected() {
        assert_eq!("cccmmmb".parse::<Configuration>(), Err(LabelError::Separator));
        assert_eq!("-c-ccmmmb".parse::<Configuration>(), Err(LabelError::Separator));
        assert_eq!(
            "-cccxmmb".parse::<Configuration>(),
            Err(LabelError::UnexpectedChar('x'))
        );
        assert_eq!("-cccmmm".parse::<Configuration>(), Err(LabelError::RaftMarks(0)));
        assert_eq!("b-cccmmmb".parse::<Configuration>(), Err(LabelError::RaftMarks(2)));
        assert_eq!("-ccmmmb".parse::<Configuration>(), Err(LabelError::Headcount));
    }

    #[test]
    fn standard_table_has_twenty_five_configurations() {
        assert_eq!(table().len(), 25);
        assert_eq!(table().configurations().next(), Some(Configuration::START));
    }

    #[test]
    fn classify_matches_reference_outcomes() {
        let listed: HashSet<Configuration> = table().configurations().collect();
        assert_eq!(listed.len(), REFERENCE_OUTCOMES.len());
        for (label, expected) in REFERENCE_OUTCOMES {
            let classification = table().classify(cfg(label)).expect("listed");
            assert_eq!(classification.outcome(), expected, "label={label}");
        }
    }

    #[test]
    fn table_matches_breadth_first_expansion_of_the_rules() {
        let mut reached = HashSet::from([Configuration::START]);
        let mut queue = VecDeque::from([Configuration::START]);
        while let Some(config) = queue.pop_front() {
            let classification = table().classify(config).expect("reachable is listed");
            assert_eq!(classification.outcome(), config.rule_outcome());
            let Classification::Continue(edges) = classification else {
                continue;
            };
            for composition in Composition::ALL {
                let physical = config.after_crossing(composition);
                let listed = edges
                    .iter()
                    .find(|(candidate, _)| *candidate == composition)
                    .map(|(_, to)| *to);
                assert_eq!(listed, physical, "{config} with {composition}");
                if let Some(next) = physical {
                    if reached.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }
        assert_eq!(reached.len(), table().len());
    }

    #[test]
    fn single_cannibal_from_start_reaches_far_bank() {
        let next = table()
            .transition(Configuration::START, Composition::OneCannibal)
            .expect("legal");
        assert_eq!(next, cfg("bc-ccmmm"));
        assert_eq!(next.raft(), Bank::Far);
        assert_eq!(next.cannibals_on(Bank::Far), 1);
    }

    #[test]
    fn same_composition_reverses_a_single_hop() {
        for from in table().configurations() {
            let Some(Classification::Continue(edges)) = table().classify(from) else {
                continue;
            };
            for (composition, to) in edges {
                if table().classify(*to).map(Classification::outcome) != Some(Outcome::Continue)
                {
                    continue;
                }
                assert_eq!(
                    table().transition(*to, *composition),
                    Ok(from),
                    "{from} -> {to} via {composition}"
                );
            }
        }
    }

    #[test]
    fn satisfiable_compositions_never_break_invariants() {
        for from in table().configurations() {
            if table().classify(from).map(Classification::outcome) != Some(Outcome::Continue) {
                continue;
            }
            for composition in Composition::ALL {
                if from.after_crossing(composition).is_none() {
                    continue;
                }
                match table().transition(from, composition) {
                    Ok(next) => assert!(table().classify(next).is_some()),
                    Err(TransitionError::NotAllowed { .. }) => {}
                }
            }
        }
    }

    #[test]
    fn terminal_configurations_allow_no_transition() {
        for label in ["ccm-cmmb", "bcccmmm-"] {
            for composition in Composition::ALL {
                assert_eq!(
                    table().transition(cfg(label), composition),
                    Err(TransitionError::NotAllowed {
                        from: cfg(label),
                        composition,
                    })
                );
            }
        }
    }

    #[test]
    fn unsatisfiable_composition_is_not_offered() {
        let err = table()
            .transition(cfg("bc-ccmmm"), Composition::OneMissionary)
            .expect_err("no missionary on the far bank");
        assert!(matches!(err, TransitionError::NotAllowed { .. }));
    }

    #[test]
    fn corrupted_graph_is_rejected() {
        const TYPO: &[(&str, Node)] = &[
            ("-cccmmmb", Node::Edges(&[(C, "bc-ccmmm")])),
            ("bc-ccmmm", Node::Edges(&[(C, "ccbb-cmb")])),
        ];
        assert!(matches!(
            TransitionTable::from_graph(TYPO),
            Err(GraphError::InvalidLabel { label: "ccbb-cmb", .. })
        ));

        const WRONG_EDGE: &[(&str, Node)] = &[("-cccmmmb", Node::Edges(&[(C, "bcc-cmmm")]))];
        assert!(matches!(
            TransitionTable::from_graph(WRONG_EDGE),
            Err(GraphError::ImpossibleEdge { .. })
        ));

        const DANGLING: &[(&str, Node)] = &[("-cccmmmb", Node::Edges(&[(C, "bc-ccmmm")]))];
        assert!(matches!(
            TransitionTable::from_graph(DANGLING),
            Err(GraphError::DanglingTarget { .. })
        ));

        const MISLABELED: &[(&str, Node)] = &[("ccm-cmmb", Node::Win)];
        assert!(matches!(
            TransitionTable::from_graph(MISLABELED),
            Err(GraphError::OutcomeMismatch { .. })
        ));
    }

    #[test]
    fn composition_from_counts_covers_raft_loads() {
        for composition in Composition::ALL {
            let (cannibals, missionaries) = composition.counts();
            assert!(cannibals + missionaries <= RAFT_CAPACITY);
            assert_eq!(
                Composition::from_counts(cannibals, missionaries),
                Some(composition)
            );
        }
        assert_eq!(Composition::from_counts(0, 0), None);
        assert_eq!(Composition::from_counts(2, 1), None);
    }
}
