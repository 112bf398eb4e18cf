//! Serial link: byte reassembly and the line handoff to the main loop.
//!
//! Zero heap allocation - all fixed buffers.

pub mod assembler;
pub mod line;
pub mod slot;

/// Default receive buffer capacity (longest line is one byte less).
pub const RX_BUFFER_SIZE: usize = 40;

pub use assembler::{log_feed_event, FeedEvent, LineAssembler};
pub use line::Line;
pub use slot::LineSlot;
