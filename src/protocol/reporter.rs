//! Outbound status frames.
//!
//! Fire-and-forget: a frame that cannot be written is not retried, the next
//! change or heartbeat carries the same information.

use crate::config::{LineEnding, ReporterConfig, StatusFormat};
use crate::drivers::FrameSink;
use crate::space::{Occupancy, NUM_SPACES};

use super::frame::Frame;

/// Encode a sensed-occupancy snapshot.
///
/// `Letters`: `S:L,O,L,L` + ending. `Numeric`: `#,0,1,0,0;` + ending.
pub fn encode_status(physical: &[Occupancy], format: StatusFormat, ending: LineEnding) -> Frame {
    let mut frame = Frame::new();
    match format {
        StatusFormat::Letters => {
            frame.extend(b"S:");
            for (i, occ) in physical.iter().enumerate() {
                if i > 0 {
                    frame.push(b',');
                }
                frame.push(occ.letter());
            }
        }
        StatusFormat::Numeric => {
            frame.push(b'#');
            for occ in physical {
                frame.push(b',');
                frame.push(occ.digit());
            }
            frame.push(b';');
        }
    }
    frame.extend(ending.as_bytes());
    frame
}

/// Encode the command acknowledgement `ACK:R,OK`.
pub fn encode_ack(ending: LineEnding) -> Frame {
    let mut frame = Frame::new();
    frame.extend(b"ACK:R,OK");
    frame.extend(ending.as_bytes());
    frame
}

/// Change- and heartbeat-driven status transmitter.
///
/// Keeps the last snapshot it reported so that a change is detected
/// element-wise. The heartbeat runs on its own schedule; a change report
/// does not push it back.
pub struct StatusReporter<const N: usize = NUM_SPACES> {
    config: ReporterConfig,
    last_sent: [Occupancy; N],
    /// Absolute deadline of the next heartbeat (µs).
    next_heartbeat_us: i64,
}

impl<const N: usize> StatusReporter<N> {
    /// `initial` is the baseline used for change detection; first heartbeat
    /// is one interval after `now_us`.
    pub fn new(config: ReporterConfig, initial: [Occupancy; N], now_us: i64) -> Self {
        Self {
            config,
            last_sent: initial,
            next_heartbeat_us: now_us + Self::interval_us(&config),
        }
    }

    #[inline]
    fn interval_us(config: &ReporterConfig) -> i64 {
        config.heartbeat_ms as i64 * 1000
    }

    /// Send a frame if `physical` differs from the last reported snapshot.
    ///
    /// Returns true if a frame was sent.
    pub fn report_on_change<O: FrameSink + ?Sized>(
        &mut self,
        physical: &[Occupancy; N],
        sink: &mut O,
    ) -> bool {
        if *physical == self.last_sent {
            return false;
        }
        self.send_status(physical, sink)
    }

    /// Send a frame if the heartbeat deadline has passed, whatever changed.
    ///
    /// Returns true if a frame was sent. Missed intervals are not replayed.
    pub fn report_on_heartbeat<O: FrameSink + ?Sized>(
        &mut self,
        now_us: i64,
        physical: &[Occupancy; N],
        sink: &mut O,
    ) -> bool {
        if self.config.heartbeat_ms == 0 || now_us < self.next_heartbeat_us {
            return false;
        }
        self.next_heartbeat_us = now_us + Self::interval_us(&self.config);
        self.send_status(physical, sink)
    }

    /// Unconditionally send `physical` and make it the new baseline.
    pub fn send_status<O: FrameSink + ?Sized>(
        &mut self,
        physical: &[Occupancy; N],
        sink: &mut O,
    ) -> bool {
        self.last_sent = *physical;
        let frame = encode_status(physical, self.config.format, self.config.line_ending);
        sink.send(frame.as_bytes())
    }

    /// Send `ACK:R,OK` if acknowledgements are enabled.
    pub fn send_ack<O: FrameSink + ?Sized>(&mut self, sink: &mut O) -> bool {
        if !self.config.ack {
            return false;
        }
        sink.send(encode_ack(self.config.line_ending).as_bytes())
    }

    /// Snapshot last reported.
    pub fn last_sent(&self) -> &[Occupancy; N] {
        &self.last_sent
    }

    pub fn next_heartbeat_us(&self) -> i64 {
        self.next_heartbeat_us
    }

    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::Occupancy::{Free, Occupied};

    #[derive(Default)]
    struct Capture(Vec<Vec<u8>>);

    impl FrameSink for Capture {
        fn send(&mut self, frame: &[u8]) -> bool {
            self.0.push(frame.to_vec());
            true
        }
    }

    #[test]
    fn test_letters_lf() {
        let frame =
            encode_status(&[Free, Occupied, Free, Free], StatusFormat::Letters, LineEnding::Lf);
        assert_eq!(frame.as_bytes(), b"S:L,O,L,L\n");
    }

    #[test]
    fn test_numeric_crlf() {
        let frame = encode_status(
            &[Occupied, Free, Free, Occupied],
            StatusFormat::Numeric,
            LineEnding::CrLf,
        );
        assert_eq!(frame.as_bytes(), b"#,1,0,0,1;\r\n");
    }

    #[test]
    fn test_ack_frame() {
        assert_eq!(encode_ack(LineEnding::Lf).as_bytes(), b"ACK:R,OK\n");
    }

    #[test]
    fn test_heartbeat_disabled() {
        let config = ReporterConfig { heartbeat_ms: 0, ..ReporterConfig::DEFAULT };
        let mut reporter = StatusReporter::new(config, [Free; 4], 0);
        let mut sink = Capture::default();
        assert!(!reporter.report_on_heartbeat(i64::MAX, &[Free; 4], &mut sink));
        assert!(sink.0.is_empty());
    }

    #[test]
    fn test_ack_disabled_by_default() {
        let mut reporter = StatusReporter::new(ReporterConfig::DEFAULT, [Free; 4], 0);
        let mut sink = Capture::default();
        assert!(!reporter.send_ack(&mut sink));
        assert!(sink.0.is_empty());
    }
}
