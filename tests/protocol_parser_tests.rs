//! Command parser tests

use parking_monitor::config::{CommandFormat, ParserConfig, PartialPolicy, TokenPolicy};
use parking_monitor::drivers::{BarrierDriver, IndicatorDriver};
use parking_monitor::protocol::{parse_command, CommandOutcome, RejectReason};
use parking_monitor::space::{BarrierTarget, SpaceState};
use parking_monitor::store::StateStore;

use parking_monitor::space::SpaceState::{Free, Maintenance, Occupied, Reserved};

#[derive(Default)]
struct Lamps(Vec<(usize, SpaceState)>);

impl IndicatorDriver for Lamps {
    fn show(&mut self, space: usize, state: SpaceState) {
        self.0.push((space, state));
    }
}

#[derive(Default)]
struct Gate(Vec<BarrierTarget>);

impl BarrierDriver for Gate {
    fn set_gate(&mut self, target: BarrierTarget) {
        self.0.push(target);
    }

    fn pulse(&mut self, _space: usize, _width_us: u16) {}
}

fn parse(
    line: &[u8],
    store: &mut StateStore,
    config: &ParserConfig,
) -> (CommandOutcome, Lamps, Gate) {
    let (mut lamps, mut gate) = (Lamps::default(), Gate::default());
    let outcome = parse_command(line, store, &mut lamps, &mut gate, config);
    (outcome, lamps, gate)
}

#[test]
fn test_full_command_sets_every_space() {
    let mut store = StateStore::new();
    let (outcome, lamps, gate) = parse(b"R:O,L,R,M", &mut store, &ParserConfig::DEFAULT);

    assert_eq!(outcome, CommandOutcome::Applied { spaces: 4, any_reserved: true });
    assert_eq!(store.final_snapshot(), [Occupied, Free, Reserved, Maintenance]);
    assert_eq!(lamps.0, vec![(0, Occupied), (1, Free), (2, Reserved), (3, Maintenance)]);
    assert_eq!(gate.0, vec![BarrierTarget::Closed]);
}

#[test]
fn test_short_command_leaves_rest_unchanged() {
    let mut store = StateStore::new();
    parse(b"R:M,M,M,M", &mut store, &ParserConfig::DEFAULT);

    let (outcome, lamps, gate) = parse(b"R:O,L", &mut store, &ParserConfig::DEFAULT);
    assert_eq!(outcome, CommandOutcome::Applied { spaces: 2, any_reserved: false });
    assert_eq!(store.final_snapshot(), [Occupied, Free, Maintenance, Maintenance]);
    assert_eq!(lamps.0.len(), 2);
    assert_eq!(gate.0, vec![BarrierTarget::Open]);
}

#[test]
fn test_bad_prefix_never_mutates_store() {
    let mut store = StateStore::new();
    parse(b"R:O,R,L,M", &mut store, &ParserConfig::DEFAULT);
    let before = (store.final_snapshot(), store.barrier_snapshot());

    let foreign: [&[u8]; 6] =
        [b"S:O,O,O,O", b"r:O,O,O,O", b"R", b"", b"xR:O,O,O,O", b"LEDS:1,1,1,1"];
    for line in foreign {
        let (outcome, lamps, gate) = parse(line, &mut store, &ParserConfig::DEFAULT);
        assert_eq!(outcome, CommandOutcome::Rejected(RejectReason::BadPrefix));
        assert!(lamps.0.is_empty());
        assert!(gate.0.is_empty());
        assert_eq!((store.final_snapshot(), store.barrier_snapshot()), before);
    }
}

#[test]
fn test_prefix_without_tokens_rejected() {
    let mut store = StateStore::new();
    let (outcome, _, gate) = parse(b"R: , ,x", &mut store, &ParserConfig::DEFAULT);

    assert_eq!(outcome, CommandOutcome::Rejected(RejectReason::NoTokens));
    assert!(gate.0.is_empty());
}

#[test]
fn test_extra_tokens_ignored() {
    let mut store = StateStore::new();
    let (outcome, lamps, _) = parse(b"R:L,L,L,L,R,R", &mut store, &ParserConfig::DEFAULT);

    assert_eq!(outcome, CommandOutcome::Applied { spaces: 4, any_reserved: false });
    assert_eq!(lamps.0.len(), 4);
}

#[test]
fn test_invalid_token_shifts_under_skip_invalid() {
    let mut store = StateStore::new();
    parse(b"R:O,X,R", &mut store, &ParserConfig::DEFAULT);

    assert_eq!(store.final_snapshot(), [Occupied, Reserved, Free, Free]);
}

#[test]
fn test_invalid_token_keeps_position_under_positional() {
    let config = ParserConfig { tokens: TokenPolicy::Positional, ..ParserConfig::DEFAULT };
    let mut store = StateStore::new();
    parse(b"R:O,X,R", &mut store, &config);

    assert_eq!(store.final_snapshot(), [Occupied, Free, Reserved, Free]);
}

#[test]
fn test_partial_rejected_when_configured() {
    let config = ParserConfig { partial: PartialPolicy::Reject, ..ParserConfig::DEFAULT };
    let mut store = StateStore::new();

    let (outcome, lamps, _) = parse(b"R:O,L", &mut store, &config);
    assert_eq!(outcome, CommandOutcome::Rejected(RejectReason::Incomplete));
    assert!(lamps.0.is_empty());
    assert_eq!(store.final_snapshot(), [Free; 4]);

    let (outcome, _, _) = parse(b"R:O,L,O,L", &mut store, &config);
    assert!(outcome.is_applied());
}

#[test]
fn test_digit_dialect() {
    let config = ParserConfig { format: CommandFormat::Digits, ..ParserConfig::DEFAULT };
    let mut store = StateStore::new();

    let (outcome, _, _) = parse(b"LEDS:0,1,2,3", &mut store, &config);
    assert_eq!(outcome, CommandOutcome::Applied { spaces: 4, any_reserved: true });
    assert_eq!(store.final_snapshot(), [Free, Occupied, Reserved, Maintenance]);

    // Letter prefix is foreign in this dialect
    let (outcome, _, _) = parse(b"R:L,L,L,L", &mut store, &config);
    assert_eq!(outcome, CommandOutcome::Rejected(RejectReason::BadPrefix));
}

#[test]
fn test_per_space_barrier_targets() {
    let mut store = StateStore::new();
    parse(b"R:R,R,R,R", &mut store, &ParserConfig::DEFAULT);
    parse(b"R:L,O,M", &mut store, &ParserConfig::DEFAULT);

    // Free opens; Occupied and Maintenance keep the previous target
    assert_eq!(
        store.barrier_snapshot(),
        [BarrierTarget::Open, BarrierTarget::Closed, BarrierTarget::Closed, BarrierTarget::Closed]
    );
}

#[test]
fn test_gate_reopens_when_last_reservation_cleared() {
    let mut store = StateStore::new();
    let (_, _, gate) = parse(b"R:L,R", &mut store, &ParserConfig::DEFAULT);
    assert_eq!(gate.0, vec![BarrierTarget::Closed]);

    let (outcome, _, gate) = parse(b"R:L,L", &mut store, &ParserConfig::DEFAULT);
    assert_eq!(outcome, CommandOutcome::Applied { spaces: 2, any_reserved: false });
    assert_eq!(gate.0, vec![BarrierTarget::Open]);
}
