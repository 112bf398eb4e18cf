//! Module: config
//!
//! Purpose: Runtime configuration for ParkingMonitor.
//!
//! Architecture:
//! - `MonitorConfig`: one `Copy` struct, grouped per component
//! - Protocol quirks that differ between firmware revisions are explicit
//!   policies (`CrPolicy`, `OverflowPolicy`, `TokenPolicy`, `PartialPolicy`)
//! - `to_record`/`from_record`: fixed-size byte image persisted by [`nvs`]
//!
//! Safety: Safe. No unsafe blocks.

pub mod nvs;

use crate::logging::LogLevel;

/// How a carriage return is treated by the line assembler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CrPolicy {
    /// `\r` is dropped; only `\n` ends a line.
    Ignore = 0,
    /// `\r` ends a line like `\n`.
    Terminate = 1,
}

/// What the line assembler does when a line outgrows its buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum OverflowPolicy {
    /// Reset the cursor and discard everything up to the next terminator.
    Resync = 0,
    /// Drop excess bytes; publish the truncated line at the terminator.
    Truncate = 1,
}

/// Inbound command dialect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandFormat {
    /// `R:<L|O|R|M>,...`
    Letters = 0,
    /// `LEDS:<0..3>,...`
    Digits = 1,
}

impl CommandFormat {
    /// Frame prefix for this dialect.
    pub const fn prefix(self) -> &'static [u8] {
        match self {
            CommandFormat::Letters => b"R:",
            CommandFormat::Digits => b"LEDS:",
        }
    }
}

/// How state tokens are extracted from a command body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TokenPolicy {
    /// Every valid code character fills the next space; anything else is skipped.
    SkipInvalid = 0,
    /// Every comma-separated field advances one space, valid or not.
    Positional = 1,
}

/// Whether a command with fewer than `NUM_SPACES` valid tokens is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PartialPolicy {
    /// Apply whatever was parsed, no rollback.
    Apply = 0,
    /// Apply nothing unless every space got a valid token.
    Reject = 1,
}

/// Outbound status dialect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum StatusFormat {
    /// `S:L,O,L,L`
    Letters = 0,
    /// `#,0,1,0,0;`
    Numeric = 1,
}

/// Line terminator for outbound frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum LineEnding {
    Lf = 0,
    CrLf = 1,
}

impl LineEnding {
    pub const fn as_bytes(self) -> &'static [u8] {
        match self {
            LineEnding::Lf => b"\n",
            LineEnding::CrLf => b"\r\n",
        }
    }
}

/// Line assembler settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkConfig {
    pub cr: CrPolicy,
    pub overflow: OverflowPolicy,
}

impl LinkConfig {
    pub const DEFAULT: Self = Self {
        cr: CrPolicy::Ignore,
        overflow: OverflowPolicy::Resync,
    };
}

/// Command parser settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    pub format: CommandFormat,
    pub tokens: TokenPolicy,
    pub partial: PartialPolicy,
}

impl ParserConfig {
    pub const DEFAULT: Self = Self {
        format: CommandFormat::Letters,
        tokens: TokenPolicy::SkipInvalid,
        partial: PartialPolicy::Apply,
    };
}

/// Status reporter settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReporterConfig {
    pub format: StatusFormat,
    pub line_ending: LineEnding,
    /// Heartbeat period. 0 disables the heartbeat.
    pub heartbeat_ms: u16,
    /// Send `ACK:R,OK` after applying a command.
    pub ack: bool,
}

impl ReporterConfig {
    pub const DEFAULT: Self = Self {
        format: StatusFormat::Letters,
        line_ending: LineEnding::Lf,
        heartbeat_ms: 1000,
        ack: false,
    };
}

/// Scheduler loop and actuator timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopConfig {
    /// Pacing period of one loop iteration.
    pub period_ms: u16,
    /// Confirmation delay for an "occupied" sensor reading.
    pub debounce_ms: u16,
    /// Servo pulse width for an open barrier.
    pub servo_open_us: u16,
    /// Servo pulse width for a closed barrier.
    pub servo_closed_us: u16,
    /// Messages below this verbosity are not logged.
    pub log_level: LogLevel,
}

impl LoopConfig {
    pub const DEFAULT: Self = Self {
        period_ms: 20,
        debounce_ms: 10,
        servo_open_us: 1500,
        servo_closed_us: 600,
        log_level: LogLevel::Info,
    };
}

/// Complete monitor configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonitorConfig {
    pub link: LinkConfig,
    pub parser: ParserConfig,
    pub reporter: ReporterConfig,
    pub timing: LoopConfig,
}

/// Size of the persisted configuration image.
pub const RECORD_LEN: usize = 19;

/// Reason a persisted record was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    /// Wrong record length.
    BadLength,
    /// Field `index` holds a value outside its domain.
    BadField { index: usize },
}

impl MonitorConfig {
    pub const DEFAULT: Self = Self {
        link: LinkConfig::DEFAULT,
        parser: ParserConfig::DEFAULT,
        reporter: ReporterConfig::DEFAULT,
        timing: LoopConfig::DEFAULT,
    };

    /// Encode as a fixed byte image (little-endian integers).
    pub fn to_record(&self) -> [u8; RECORD_LEN] {
        let mut rec = [0u8; RECORD_LEN];
        rec[0] = self.link.cr as u8;
        rec[1] = self.link.overflow as u8;
        rec[2] = self.parser.format as u8;
        rec[3] = self.parser.tokens as u8;
        rec[4] = self.parser.partial as u8;
        rec[5] = self.reporter.format as u8;
        rec[6] = self.reporter.line_ending as u8;
        rec[7] = self.reporter.ack as u8;
        rec[8..10].copy_from_slice(&self.reporter.heartbeat_ms.to_le_bytes());
        rec[10..12].copy_from_slice(&self.timing.period_ms.to_le_bytes());
        rec[12..14].copy_from_slice(&self.timing.debounce_ms.to_le_bytes());
        rec[14..16].copy_from_slice(&self.timing.servo_open_us.to_le_bytes());
        rec[16..18].copy_from_slice(&self.timing.servo_closed_us.to_le_bytes());
        rec[18] = self.timing.log_level as u8;
        rec
    }

    /// Decode a byte image produced by [`MonitorConfig::to_record`].
    ///
    /// Every enum field is range-checked; a zero loop period is refused.
    pub fn from_record(rec: &[u8]) -> Result<Self, RecordError> {
        if rec.len() != RECORD_LEN {
            return Err(RecordError::BadLength);
        }

        let bad = |index| RecordError::BadField { index };
        let u16_at = |i: usize| u16::from_le_bytes([rec[i], rec[i + 1]]);

        let cr = match rec[0] {
            0 => CrPolicy::Ignore,
            1 => CrPolicy::Terminate,
            _ => return Err(bad(0)),
        };
        let overflow = match rec[1] {
            0 => OverflowPolicy::Resync,
            1 => OverflowPolicy::Truncate,
            _ => return Err(bad(1)),
        };
        let format = match rec[2] {
            0 => CommandFormat::Letters,
            1 => CommandFormat::Digits,
            _ => return Err(bad(2)),
        };
        let tokens = match rec[3] {
            0 => TokenPolicy::SkipInvalid,
            1 => TokenPolicy::Positional,
            _ => return Err(bad(3)),
        };
        let partial = match rec[4] {
            0 => PartialPolicy::Apply,
            1 => PartialPolicy::Reject,
            _ => return Err(bad(4)),
        };
        let status_format = match rec[5] {
            0 => StatusFormat::Letters,
            1 => StatusFormat::Numeric,
            _ => return Err(bad(5)),
        };
        let line_ending = match rec[6] {
            0 => LineEnding::Lf,
            1 => LineEnding::CrLf,
            _ => return Err(bad(6)),
        };
        let ack = match rec[7] {
            0 => false,
            1 => true,
            _ => return Err(bad(7)),
        };
        let period_ms = u16_at(10);
        if period_ms == 0 {
            return Err(bad(10));
        }
        let log_level = LogLevel::from_u8(rec[18]).ok_or(bad(18))?;

        Ok(Self {
            link: LinkConfig { cr, overflow },
            parser: ParserConfig { format, tokens, partial },
            reporter: ReporterConfig {
                format: status_format,
                line_ending,
                heartbeat_ms: u16_at(8),
                ack,
            },
            timing: LoopConfig {
                period_ms,
                debounce_ms: u16_at(12),
                servo_open_us: u16_at(14),
                servo_closed_us: u16_at(16),
                log_level,
            },
        })
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
