//! # Replication Flow Verification
//!
//! End-to-end exercise of the replication bookkeeping:
//!
//! 1. **Visibility**: observer transitions drive show/hide exactly once
//! 2. **Serialization**: the dirty sweep drains through pooled writers
//! 3. **Teardown**: disconnect destroys owned entities and clears state
//!
//! Run with: cargo test --test replication_flow

use std::collections::HashMap;
use std::sync::Arc;

use emberlink_net::{
    send_with_writer, Channel, Connection, ConnectionId, EntityLifecycle, NetConfig, NetId,
    Transport, VisibilityHooks, WriterPool,
};

/// Counts hook invocations per entity.
#[derive(Default)]
struct GameWorld {
    shows: HashMap<u64, u32>,
    hides: HashMap<u64, u32>,
    forgets: HashMap<u64, u32>,
}

impl VisibilityHooks for GameWorld {
    fn show(&mut self, entity: NetId, _connection: ConnectionId) {
        *self.shows.entry(entity.raw()).or_default() += 1;
    }
    fn hide(&mut self, entity: NetId, _connection: ConnectionId) {
        *self.hides.entry(entity.raw()).or_default() += 1;
    }
    fn forget_observer(&mut self, entity: NetId, _connection: ConnectionId) {
        *self.forgets.entry(entity.raw()).or_default() += 1;
    }
}

/// Captures outgoing payloads.
#[derive(Default)]
struct CaptureTransport {
    sent: Vec<(ConnectionId, Vec<u8>, Channel)>,
}

impl Transport for CaptureTransport {
    fn send_raw(&mut self, connection: ConnectionId, payload: &[u8], channel: Channel) {
        self.sent.push((connection, payload.to_vec(), channel));
    }
}

// ============================================================================
// VISIBILITY
// ============================================================================

#[test]
fn visibility_transitions_fire_hooks_once_per_transition() {
    let mut world = GameWorld::default();
    let mut conn = Connection::new(ConnectionId(1));
    let entity = NetId::new(100);

    // Flap visibility a few times; every flap is a real transition
    for _ in 0..3 {
        conn.add_to_observing(entity, &mut world).unwrap();
        conn.remove_from_observing(entity, false, &mut world).unwrap();
    }

    assert_eq!(world.shows[&100], 3);
    assert_eq!(world.hides[&100], 3);

    // Redundant adds inside one observed phase fire nothing extra
    conn.add_to_observing(entity, &mut world).unwrap();
    conn.add_to_observing(entity, &mut world).unwrap();
    assert_eq!(world.shows[&100], 4);
}

#[test]
fn destroyed_entities_never_get_a_hide() {
    let mut world = GameWorld::default();
    let mut conn = Connection::new(ConnectionId(1));
    let entity = NetId::new(200);

    conn.add_to_observing(entity, &mut world).unwrap();
    conn.remove_from_observing(entity, true, &mut world).unwrap();

    assert_eq!(world.shows[&200], 1);
    assert!(!world.hides.contains_key(&200));
}

// ============================================================================
// SERIALIZATION SWEEP
// ============================================================================

#[test]
fn dirty_sweep_drains_through_pooled_writers() {
    let config = NetConfig::from_toml_str(
        r"
        dirty_capacity = 64

        [pool]
        shards = 3
        prewarm = 6
        writer_capacity = 128
        ",
    )
    .unwrap();

    let pool: Arc<WriterPool> = WriterPool::new(config.pool);
    let mut world = GameWorld::default();
    let mut transport = CaptureTransport::default();
    let mut conn = Connection::with_dirty_capacity(ConnectionId(9), config.dirty_capacity);

    for raw in 0..20 {
        conn.add_to_observing(NetId::new(raw), &mut world).unwrap();
    }
    assert_eq!(conn.dirty().len(), 20);

    // One tick's serialization pass: encode each dirty entity, then unqueue
    for entity in conn.dirty_snapshot() {
        send_with_writer(
            &pool,
            &mut transport,
            conn.id(),
            Channel::Unreliable,
            |writer| {
                writer.write_u64(entity.raw());
            },
        );
        assert!(conn.clear_dirty(entity));
    }

    assert!(conn.dirty().is_empty());
    assert_eq!(transport.sent.len(), 20);
    for (connection, payload, channel) in &transport.sent {
        assert_eq!(*connection, ConnectionId(9));
        assert_eq!(payload.len(), 8);
        assert_eq!(*channel, Channel::Unreliable);
    }

    // The whole sweep ran on prewarmed writers
    assert_eq!(pool.writers_created(), 6);
    assert_eq!(pool.idle_writers(), 6);
}

#[test]
fn state_changes_requeue_observed_entities() {
    let mut world = GameWorld::default();
    let mut conn = Connection::new(ConnectionId(2));
    let entity = NetId::new(300);

    conn.add_to_observing(entity, &mut world).unwrap();
    assert!(conn.clear_dirty(entity));

    // The entity moved this tick
    assert!(conn.mark_dirty(entity).unwrap());
    // A second component change on the same tick must not double-queue
    assert!(!conn.mark_dirty(entity).unwrap());
    assert_eq!(conn.dirty().len(), 1);
}

// ============================================================================
// TEARDOWN
// ============================================================================

/// Stand-in for the authoritative entity registry.
#[derive(Default)]
struct Graveyard {
    destroyed: Vec<NetId>,
}

impl EntityLifecycle for Graveyard {
    fn destroy(&mut self, entity: NetId) {
        self.destroyed.push(entity);
    }
}

#[test]
fn disconnect_destroys_owned_and_clears_state() {
    let mut world = GameWorld::default();
    let mut graveyard = Graveyard::default();
    let mut conn = Connection::new(ConnectionId(4));

    let player = NetId::new(500);
    let pet = NetId::new(501);
    let scenery = NetId::new(502);

    conn.add_to_observing(player, &mut world).unwrap();
    conn.add_to_observing(pet, &mut world).unwrap();
    conn.add_to_observing(scenery, &mut world).unwrap();
    conn.add_owned_object(player).unwrap();
    conn.add_owned_object(pet).unwrap();

    conn.tear_down(&mut world, &mut graveyard);

    assert_eq!(conn.observed_count(), 0);
    assert_eq!(conn.owned_count(), 0);
    assert!(conn.dirty().is_empty());

    // Both owned entities died exactly once, scenery survived
    assert_eq!(graveyard.destroyed.len(), 2);
    assert!(graveyard.destroyed.contains(&player));
    assert!(graveyard.destroyed.contains(&pet));

    // Entities were told to forget this connection; none got a hide
    assert_eq!(world.forgets.len(), 3);
    assert!(world.hides.is_empty());
}
