//! Line slot tests: handoff between a producer thread and the loop

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use parking_monitor::link::{Line, LineSlot};

const CAP: usize = 40;

#[test]
fn test_take_consumes_once() {
    let slot: LineSlot<CAP> = LineSlot::new();
    let mut line = Line::new();

    assert!(!slot.publish(b"R:O,L,R,M"));
    assert!(slot.has_pending());
    assert!(slot.take(&mut line));
    assert_eq!(line.as_bytes(), b"R:O,L,R,M");
    assert!(!slot.has_pending());
    assert!(!slot.take(&mut line));
}

#[test]
fn test_concurrent_publish_never_mixes_messages() {
    // Different lengths, so a torn length shows up as well as torn bytes
    const SHORT: &[u8] = b"R:O";
    const LONG: &[u8] = b"R:L,L,L,L,L,L,L,L,L,L,L,L,L,L,L,L,L";
    const PUBLISHES: u32 = 50_000;

    let slot: Arc<LineSlot<CAP>> = Arc::new(LineSlot::new());
    let done = Arc::new(AtomicBool::new(false));

    let producer = {
        let slot = Arc::clone(&slot);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for i in 0..PUBLISHES {
                slot.publish(if i % 2 == 0 { SHORT } else { LONG });
                // Uneven gaps so takes land both between and across publishes
                for _ in 0..(i % 97) {
                    std::hint::spin_loop();
                }
                thread::yield_now();
            }
            done.store(true, Ordering::Release);
        })
    };

    let short = Line::from_bytes(SHORT);
    let long = Line::from_bytes(LONG);
    let mut line = Line::new();
    let mut taken_live = 0u32;
    while !done.load(Ordering::Acquire) {
        if slot.take(&mut line) {
            assert!(line == short || line == long, "mixed line: {:?}", line);
            taken_live += 1;
        }
    }

    producer.join().unwrap();
    assert!(taken_live >= 100, "only {} takes while publishing", taken_live);
}

#[test]
fn test_overwrite_reported_until_taken() {
    let slot: LineSlot<CAP> = LineSlot::new();
    let mut line = Line::new();

    assert!(!slot.publish(b"R:O"));
    assert!(slot.publish(b"R:L"));
    assert!(slot.publish(b"R:R"));
    assert!(slot.take(&mut line));
    assert_eq!(line.as_bytes(), b"R:R");
    assert!(!slot.publish(b"R:M"));
}
