//! # Pooled Send Path
//!
//! Serialization-side glue: borrow a writer, encode one message, hand the
//! bytes to the transport. The writer rejoins the pool when this function
//! returns, whatever the encode closure did.

use emberlink_core::{NetWriter, WriterPool};

use crate::channel::Channel;
use crate::connection::ConnectionId;
use crate::hooks::Transport;

/// Encodes one message through a pooled writer and sends it.
///
/// Messages that encode to zero bytes are dropped without touching the
/// transport.
pub fn send_with_writer<T, F>(
    pool: &WriterPool,
    transport: &mut T,
    connection: ConnectionId,
    channel: Channel,
    encode: F,
) where
    T: Transport,
    F: FnOnce(&mut NetWriter),
{
    let mut writer = pool.acquire();
    encode(&mut writer);
    if writer.is_empty() {
        tracing::trace!(connection = connection.0, "skipping empty payload");
        return;
    }
    transport.send_raw(connection, writer.as_slice(), channel);
}
