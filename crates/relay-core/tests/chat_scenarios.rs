// crates/relay-core/tests/chat_scenarios.rs
//
// Drives sessions against a shared registry through plain mpsc sinks,
// asserting on exactly what each connection would have received.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver};

use relay_core::{ClientMessage, Outbound, Registry, ServerEvent, Session};
use relay_protocol::json_codec::{decode_client_payload, encode_outbound};

fn connect(registry: &Arc<Registry>) -> (Session, UnboundedReceiver<Outbound>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Session::new(tx, registry.clone()), rx)
}

async fn join(session: &mut Session, id: &str) {
    session
        .handle(ClientMessage::Init { id: id.to_string() })
        .await;
}

fn text(id: &str, to: Option<&str>, body: &str) -> ClientMessage {
    ClientMessage::Text {
        id: id.to_string(),
        to: to.map(str::to_string),
        text: body.to_string(),
    }
}

async fn feed(session: &mut Session, payload: &str) {
    let msg = decode_client_payload(payload).expect("payload should decode");
    session.handle(msg).await;
}

fn drain(rx: &mut UnboundedReceiver<Outbound>) -> Vec<Outbound> {
    let mut received = Vec::new();
    while let Ok(item) = rx.try_recv() {
        received.push(item);
    }
    received
}

#[tokio::test]
async fn disconnect_deregisters_and_notifies_everyone_once() {
    let registry = Arc::new(Registry::new());
    let (mut alice, mut alice_rx) = connect(&registry);
    let (mut bob, mut bob_rx) = connect(&registry);
    let (mut carol, mut carol_rx) = connect(&registry);

    join(&mut alice, "alice").await;
    join(&mut bob, "bob").await;
    join(&mut carol, "carol").await;
    drain(&mut alice_rx);
    drain(&mut bob_rx);
    drain(&mut carol_rx);

    bob.close().await;

    assert!(!registry.contains("bob").await);
    assert_eq!(
        drain(&mut alice_rx),
        vec![Outbound::Event(ServerEvent::user_leave("bob"))]
    );
    assert_eq!(
        drain(&mut carol_rx),
        vec![Outbound::Event(ServerEvent::user_leave("bob"))]
    );
    assert!(drain(&mut bob_rx).is_empty());

    // A second close is a no-op: the departure ran exactly once.
    bob.close().await;
    assert!(drain(&mut alice_rx).is_empty());
}

#[tokio::test]
async fn unidentified_disconnect_touches_nothing() {
    let registry = Arc::new(Registry::new());
    let (mut alice, mut alice_rx) = connect(&registry);
    let (mut stranger, _stranger_rx) = connect(&registry);

    join(&mut alice, "alice").await;
    drain(&mut alice_rx);

    stranger.close().await;

    assert_eq!(registry.len().await, 1);
    assert!(drain(&mut alice_rx).is_empty());
}

#[tokio::test]
async fn direct_message_reaches_only_the_target() {
    let registry = Arc::new(Registry::new());
    let (mut alice, mut alice_rx) = connect(&registry);
    let (mut bob, mut bob_rx) = connect(&registry);
    let (mut carol, mut carol_rx) = connect(&registry);

    join(&mut alice, "alice").await;
    join(&mut bob, "bob").await;
    join(&mut carol, "carol").await;
    drain(&mut alice_rx);
    drain(&mut bob_rx);
    drain(&mut carol_rx);

    alice.handle(text("alice", Some("bob"), "yo")).await;

    assert_eq!(
        drain(&mut bob_rx),
        vec![Outbound::Event(ServerEvent::dm("alice", "yo"))]
    );
    assert!(drain(&mut alice_rx).is_empty());
    assert!(drain(&mut carol_rx).is_empty());
}

#[tokio::test]
async fn direct_message_to_offline_target_is_dropped() {
    let registry = Arc::new(Registry::new());
    let (mut alice, mut alice_rx) = connect(&registry);
    let (mut bob, mut bob_rx) = connect(&registry);

    join(&mut alice, "alice").await;
    join(&mut bob, "bob").await;
    drain(&mut alice_rx);
    drain(&mut bob_rx);

    alice.handle(text("alice", Some("nobody"), "hello?")).await;

    // Zero deliveries anywhere, and no error surfaced to the sender.
    assert!(drain(&mut alice_rx).is_empty());
    assert!(drain(&mut bob_rx).is_empty());
}

#[tokio::test]
async fn broadcast_reaches_everyone_except_the_sender() {
    let registry = Arc::new(Registry::new());
    let (mut alice, mut alice_rx) = connect(&registry);
    let (mut bob, mut bob_rx) = connect(&registry);
    let (mut carol, mut carol_rx) = connect(&registry);

    join(&mut alice, "alice").await;
    join(&mut bob, "bob").await;
    join(&mut carol, "carol").await;
    drain(&mut alice_rx);
    drain(&mut bob_rx);
    drain(&mut carol_rx);

    // Empty `to` means broadcast, same as an absent `to`.
    alice.handle(text("alice", Some(""), "hi all")).await;

    let expected = vec![Outbound::Event(ServerEvent::msg("alice", "hi all"))];
    assert_eq!(drain(&mut bob_rx), expected);
    assert_eq!(drain(&mut carol_rx), expected);
    assert!(drain(&mut alice_rx).is_empty());
}

#[tokio::test]
async fn ping_gets_exactly_one_pong_in_any_state() {
    let registry = Arc::new(Registry::new());
    let (mut session, mut rx) = connect(&registry);

    // Before identifying.
    session.handle(ClientMessage::Ping).await;
    assert_eq!(drain(&mut rx), vec![Outbound::Pong]);
    assert!(registry.is_empty().await);

    // After identifying.
    join(&mut session, "alice").await;
    drain(&mut rx);
    session.handle(ClientMessage::Ping).await;
    assert_eq!(drain(&mut rx), vec![Outbound::Pong]);
}

#[tokio::test]
async fn sender_id_is_relayed_verbatim_without_verification() {
    let registry = Arc::new(Registry::new());
    let (mut alice, mut alice_rx) = connect(&registry);
    let (mut bob, mut bob_rx) = connect(&registry);

    join(&mut alice, "alice").await;
    join(&mut bob, "bob").await;
    drain(&mut alice_rx);
    drain(&mut bob_rx);

    // alice claims to be "mallory"; the relay passes it through.
    alice.handle(text("mallory", Some("bob"), "trust me")).await;

    assert_eq!(
        drain(&mut bob_rx),
        vec![Outbound::Event(ServerEvent::dm("mallory", "trust me"))]
    );
}

// Known quirk, kept on purpose: a second INIT under a new identity
// leaves the old identity registered (pointing at the same sink) until
// disconnect, which deregisters only the current identity.
#[tokio::test]
async fn reannouncement_leaves_previous_identity_registered() {
    let registry = Arc::new(Registry::new());
    let (mut shifty, mut shifty_rx) = connect(&registry);
    let (mut alice, mut alice_rx) = connect(&registry);

    join(&mut alice, "alice").await;
    join(&mut shifty, "first").await;
    join(&mut shifty, "second").await;
    drain(&mut alice_rx);
    drain(&mut shifty_rx);

    assert!(registry.contains("first").await);
    assert!(registry.contains("second").await);
    assert_eq!(shifty.identity(), Some("second"));

    // The orphaned identity still routes to the same connection.
    alice.handle(text("alice", Some("first"), "ghost")).await;
    assert_eq!(
        drain(&mut shifty_rx),
        vec![Outbound::Event(ServerEvent::dm("alice", "ghost"))]
    );

    // Disconnect deregisters only the current identity.
    shifty.close().await;
    assert!(registry.contains("first").await);
    assert!(!registry.contains("second").await);
    assert_eq!(
        drain(&mut alice_rx),
        vec![Outbound::Event(ServerEvent::user_leave("second"))]
    );
}

#[tokio::test]
async fn duplicate_identity_last_writer_wins() {
    let registry = Arc::new(Registry::new());
    let (mut old, mut old_rx) = connect(&registry);
    let (mut new, mut new_rx) = connect(&registry);
    let (mut alice, mut alice_rx) = connect(&registry);

    join(&mut alice, "alice").await;
    join(&mut old, "dave").await;
    join(&mut new, "dave").await;
    drain(&mut old_rx);
    drain(&mut new_rx);
    drain(&mut alice_rx);

    assert_eq!(registry.len().await, 2);

    alice.handle(text("alice", Some("dave"), "which one?")).await;
    assert_eq!(
        drain(&mut new_rx),
        vec![Outbound::Event(ServerEvent::dm("alice", "which one?"))]
    );
    assert!(drain(&mut old_rx).is_empty());
}

// The end-to-end narrative from the design discussion, driven through
// the real wire codec so raw payloads exercise the whole chain.
#[tokio::test]
async fn two_client_conversation_over_the_wire() {
    let registry = Arc::new(Registry::new());
    let (mut alice, mut alice_rx) = connect(&registry);
    let (mut bob, mut bob_rx) = connect(&registry);

    // Alice joins an empty room: nobody to notify.
    feed(&mut alice, r#"{"mtype": "INIT", "id": "alice"}"#).await;
    assert!(registry.contains("alice").await);
    assert!(drain(&mut alice_rx).is_empty());

    // Bob joins: alice hears about it.
    feed(&mut bob, r#"{"mtype": "INIT", "id": "bob"}"#).await;
    assert_eq!(
        drain(&mut alice_rx),
        vec![Outbound::Event(ServerEvent::user_enter("bob"))]
    );

    // Bob broadcasts: alice receives, bob does not.
    feed(
        &mut bob,
        r#"{"mtype": "TEXT", "id": "bob", "to": "", "text": "hi"}"#,
    )
    .await;
    let received = drain(&mut alice_rx);
    assert_eq!(received, vec![Outbound::Event(ServerEvent::msg("bob", "hi"))]);
    assert!(drain(&mut bob_rx).is_empty());

    // And it encodes back to the expected frame.
    let encoded = encode_outbound(&received[0]).expect("encodes");
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&encoded).unwrap(),
        serde_json::json!({"mtype": "MSG", "id": "bob", "text": "hi"})
    );

    // Alice DMs bob.
    feed(
        &mut alice,
        r#"{"mtype": "TEXT", "id": "alice", "to": "bob", "text": "yo"}"#,
    )
    .await;
    assert_eq!(
        drain(&mut bob_rx),
        vec![Outbound::Event(ServerEvent::dm("alice", "yo"))]
    );

    // Bob disconnects: alice gets exactly one leave notice.
    bob.close().await;
    assert_eq!(
        drain(&mut alice_rx),
        vec![Outbound::Event(ServerEvent::user_leave("bob"))]
    );
    assert!(!registry.contains("bob").await);
}

#[tokio::test]
async fn broadcast_survives_a_closed_sink() {
    let registry = Arc::new(Registry::new());
    let (mut alice, mut alice_rx) = connect(&registry);
    let (mut bob, bob_rx) = connect(&registry);
    let (mut carol, mut carol_rx) = connect(&registry);

    join(&mut alice, "alice").await;
    join(&mut bob, "bob").await;
    join(&mut carol, "carol").await;
    drain(&mut alice_rx);
    drain(&mut carol_rx);

    // Bob's receiver vanishes without the session noticing, as happens
    // when a connection dies mid-broadcast.
    drop(bob_rx);

    alice.handle(text("alice", None, "still there?")).await;

    // Delivery to the dead sink fails in isolation; carol still hears it.
    assert_eq!(
        drain(&mut carol_rx),
        vec![Outbound::Event(ServerEvent::msg("alice", "still there?"))]
    );

    bob.close().await;
    assert!(!registry.contains("bob").await);
}
