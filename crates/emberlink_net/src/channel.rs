//! # Transport Channels
//!
//! Delivery guarantees an outgoing payload may ask the transport for. The
//! transport decides what each guarantee costs; this layer only picks which
//! one a message needs.

/// Delivery guarantee for an outgoing payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Channel {
    /// Ordered, retransmitted until acknowledged.
    #[default]
    Reliable = 0,
    /// Fire-and-forget; may arrive out of order or not at all.
    Unreliable = 1,
}

impl Channel {
    /// Wire tag for this channel.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }
}
