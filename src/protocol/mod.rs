//! Line protocol with the host.
//!
//! Inbound: `R:<L|O|R|M>,...` (or `LEDS:<0..3>,...`) sets the final state
//! of each space. Outbound: `S:<L|O>,...` (or `#,<0|1>,...;`) reports the
//! sensed occupancy, plus an optional `ACK:R,OK`.

pub mod error;
pub mod frame;
pub mod parser;
pub mod reporter;

pub use error::RejectReason;
pub use frame::{Frame, FRAME_CAPACITY};
pub use parser::{decode_tokens, parse_command, CommandOutcome};
pub use reporter::{encode_ack, encode_status, StatusReporter};
