//! Line assembler tests

use parking_monitor::config::{CrPolicy, LinkConfig, OverflowPolicy};
use parking_monitor::link::{FeedEvent, Line, LineAssembler, LineSlot};
use parking_monitor::stats::LinkStats;

const CAP: usize = 12;

type Rig = (LineAssembler<CAP>, LineSlot<CAP>, LinkStats);

fn rig(config: LinkConfig) -> Rig {
    (LineAssembler::new(config), LineSlot::new(), LinkStats::new())
}

fn feed(
    asm: &mut LineAssembler<CAP>,
    slot: &LineSlot<CAP>,
    stats: &LinkStats,
    bytes: &[u8],
) -> FeedEvent {
    asm.feed_all(bytes, slot, stats)
}

fn take(slot: &LineSlot<CAP>) -> Option<String> {
    let mut line = Line::new();
    slot.take(&mut line).then(|| line.as_str().to_string())
}

#[test]
fn test_lf_publishes_line_without_terminator() {
    let (mut asm, slot, stats) = rig(LinkConfig::DEFAULT);

    let event = feed(&mut asm, &slot, &stats, b"R:O,L\n");
    assert_eq!(event, FeedEvent::Published { overwrote: false });
    assert_eq!(take(&slot).as_deref(), Some("R:O,L"));
    assert_eq!(asm.cursor(), 0);
}

#[test]
fn test_cr_ignored_by_default() {
    let (mut asm, slot, stats) = rig(LinkConfig::DEFAULT);

    feed(&mut asm, &slot, &stats, b"R:O\r,L\r\n");
    assert_eq!(take(&slot).as_deref(), Some("R:O,L"));
}

#[test]
fn test_cr_terminates_when_configured() {
    let config = LinkConfig { cr: CrPolicy::Terminate, ..LinkConfig::DEFAULT };
    let (mut asm, slot, stats) = rig(config);

    // The \n of \r\n is an empty line and must not displace the pending one
    feed(&mut asm, &slot, &stats, b"R:M,M\r\n");
    assert_eq!(take(&slot).as_deref(), Some("R:M,M"));
    assert_eq!(stats.snapshot().lines_overwritten, 0);
}

#[test]
fn test_empty_line_not_published() {
    let (mut asm, slot, stats) = rig(LinkConfig::DEFAULT);

    assert_eq!(feed(&mut asm, &slot, &stats, b"\n\n"), FeedEvent::Idle);
    assert!(!slot.has_pending());
}

#[test]
fn test_overflow_resyncs_to_next_terminator() {
    let (mut asm, slot, stats) = rig(LinkConfig::DEFAULT);

    // 20 bytes with no terminator: cursor reset, rest discarded
    feed(&mut asm, &slot, &stats, b"R:O,O,O,O,O,O,O,O,O,");
    assert_eq!(asm.cursor(), 0);
    assert!(asm.is_discarding());

    assert_eq!(feed(&mut asm, &slot, &stats, b"O,O\n"), FeedEvent::Resynced);
    assert!(!slot.has_pending());

    // Next valid line after the overflow parses normally
    feed(&mut asm, &slot, &stats, b"R:L,R\n");
    assert_eq!(take(&slot).as_deref(), Some("R:L,R"));
    assert_eq!(stats.snapshot().overflows, 1);
}

#[test]
fn test_overflow_truncates_when_configured() {
    let config = LinkConfig { overflow: OverflowPolicy::Truncate, ..LinkConfig::DEFAULT };
    let (mut asm, slot, stats) = rig(config);

    feed(&mut asm, &slot, &stats, b"R:O,L,R,M,O,L,R\n");
    assert_eq!(take(&slot).as_deref(), Some("R:O,L,R,M,O"));
    assert_eq!(stats.snapshot().overflows, 1);
}

#[test]
fn test_line_never_exceeds_capacity_minus_one() {
    let config = LinkConfig { overflow: OverflowPolicy::Truncate, ..LinkConfig::DEFAULT };
    let (mut asm, slot, stats) = rig(config);

    for len in 0..40usize {
        let bytes: Vec<u8> = (0..len).map(|i| b'A' + (i % 26) as u8).collect();
        feed(&mut asm, &slot, &stats, &bytes);
        assert!(asm.cursor() <= CAP - 1);
        feed(&mut asm, &slot, &stats, b"\n");
        if let Some(line) = take(&slot) {
            assert!(line.len() <= CAP - 1);
        }
    }
}

#[test]
fn test_second_line_overwrites_pending() {
    let (mut asm, slot, stats) = rig(LinkConfig::DEFAULT);

    feed(&mut asm, &slot, &stats, b"R:O\n");
    let event = feed(&mut asm, &slot, &stats, b"R:L\n");
    assert_eq!(event, FeedEvent::Published { overwrote: true });
    assert_eq!(take(&slot).as_deref(), Some("R:L"));
    assert_eq!(stats.snapshot().lines_overwritten, 1);
}

#[test]
fn test_reset_drops_partial_line() {
    let (mut asm, slot, stats) = rig(LinkConfig::DEFAULT);

    feed(&mut asm, &slot, &stats, b"R:O,");
    asm.reset();
    feed(&mut asm, &slot, &stats, b"R:M\n");
    assert_eq!(take(&slot).as_deref(), Some("R:M"));
}
