//! Inbound command parser.
//!
//! Maps one received line onto the final state of each space, driving the
//! indicator of every space it touches and the shared barrier gate.

use crate::config::{CommandFormat, ParserConfig, PartialPolicy, TokenPolicy};
use crate::drivers::{BarrierDriver, IndicatorDriver};
use crate::space::{BarrierTarget, SpaceState};
use crate::store::StateStore;

use super::error::RejectReason;

/// Result of handing one line to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Line applied to `spaces` spaces.
    Applied {
        spaces: usize,
        /// Aggregate after applying; drives the shared gate.
        any_reserved: bool,
    },
    /// Line ignored, store untouched.
    Rejected(RejectReason),
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied { .. })
    }
}

#[inline]
fn decode_code(format: CommandFormat, c: u8) -> Option<SpaceState> {
    match format {
        CommandFormat::Letters => SpaceState::from_letter(c),
        CommandFormat::Digits => SpaceState::from_digit(c),
    }
}

/// Decode the body of a command (prefix already stripped).
///
/// Returns one slot per space (`None` = leave unchanged) and the number of
/// valid tokens found.
pub fn decode_tokens<const N: usize>(
    body: &[u8],
    config: &ParserConfig,
) -> ([Option<SpaceState>; N], usize) {
    let mut tokens = [None; N];
    let mut found = 0;

    match config.tokens {
        TokenPolicy::SkipInvalid => {
            let codes = body
                .iter()
                .filter(|c| !c.is_ascii_whitespace())
                .filter_map(|&c| decode_code(config.format, c));
            for (slot, state) in tokens.iter_mut().zip(codes) {
                *slot = Some(state);
                found += 1;
            }
        }
        TokenPolicy::Positional => {
            for (slot, field) in tokens.iter_mut().zip(body.split(|&c| c == b',')) {
                if let [c] = field.trim_ascii() {
                    *slot = decode_code(config.format, *c);
                    found += slot.is_some() as usize;
                }
            }
        }
    }

    (tokens, found)
}

/// Parse one line and apply it.
///
/// Each applied token sets `final[i]`, moves that space's barrier target
/// (Free opens, Reserved closes) and updates its indicator, in space order.
/// The shared gate is then closed if any space is Reserved, opened otherwise.
///
/// Under `PartialPolicy::Apply` a short command updates only the spaces it
/// names; nothing is rolled back. Under `PartialPolicy::Reject` it changes
/// nothing.
pub fn parse_command<const N: usize, I, B>(
    line: &[u8],
    store: &mut StateStore<N>,
    indicators: &mut I,
    barriers: &mut B,
    config: &ParserConfig,
) -> CommandOutcome
where
    I: IndicatorDriver + ?Sized,
    B: BarrierDriver + ?Sized,
{
    let Some(body) = line.strip_prefix(config.format.prefix()) else {
        return CommandOutcome::Rejected(RejectReason::BadPrefix);
    };

    let (tokens, found) = decode_tokens::<N>(body, config);
    if found == 0 {
        return CommandOutcome::Rejected(RejectReason::NoTokens);
    }
    if config.partial == PartialPolicy::Reject && found < N {
        return CommandOutcome::Rejected(RejectReason::Incomplete);
    }

    for (space, token) in tokens.iter().enumerate() {
        let Some(state) = *token else { continue };
        store.set_final(space, state);
        if let Some(target) = state.barrier_effect() {
            store.set_barrier(space, target);
        }
        indicators.show(space, state);
    }

    let any_reserved = store.any_reserved();
    barriers.set_gate(if any_reserved {
        BarrierTarget::Closed
    } else {
        BarrierTarget::Open
    });

    CommandOutcome::Applied { spaces: found, any_reserved }
}
