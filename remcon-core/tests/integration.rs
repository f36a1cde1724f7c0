//! Integration tests — full connect/exchange/recovery lifecycle over real
//! TCP connections on localhost, driven the way a host application would:
//! one `begin_frame` per tick, bounded numbers of polls, no blocking.

use std::time::Duration;

use remcon_core::{NetConfig, NetSystem};

// ── Helpers ──────────────────────────────────────────────────────

/// Upper bound on polls before a test gives up (≈1s at the test tick).
const POLL_BUDGET: usize = 500;
const TICK: Duration = Duration::from_millis(2);

fn config(role: &str, addr: &str) -> NetConfig {
    NetConfig {
        role: role.into(),
        host_address: addr.into(),
        ..NetConfig::default()
    }
}

/// Start a server on an OS-assigned port and a client pointed at it.
fn server_client_pair() -> (NetSystem, NetSystem) {
    let server = NetSystem::start_up(&config("server", "127.0.0.1:0")).unwrap();
    let addr = server.local_addr().unwrap().to_string();
    let client = NetSystem::start_up(&config("client", &addr)).unwrap();
    (server, client)
}

/// Pump both sides until both report a live connection.
fn pump_until_connected(
    server: &mut NetSystem,
    client: &mut NetSystem,
    server_inbox: &mut Vec<String>,
    client_inbox: &mut Vec<String>,
) {
    for _ in 0..POLL_BUDGET {
        server.begin_frame(&mut |m: &str| server_inbox.push(m.to_string()));
        client.begin_frame(&mut |m: &str| client_inbox.push(m.to_string()));
        if server.is_connected() && client.is_connected() {
            return;
        }
        std::thread::sleep(TICK);
    }
    panic!("connection not established within the poll budget");
}

// ── Connect + echo scenario ──────────────────────────────────────

#[test]
fn echo_scenario_round_trip() {
    let (mut server, mut client) = server_client_pair();
    let mut server_inbox = Vec::new();
    let mut client_inbox = Vec::new();

    pump_until_connected(&mut server, &mut client, &mut server_inbox, &mut client_inbox);

    // Client ships one console command.
    client.send("Echo Message=hi");
    for _ in 0..POLL_BUDGET {
        client.begin_frame(&mut |m: &str| client_inbox.push(m.to_string()));
        server.begin_frame(&mut |m: &str| server_inbox.push(m.to_string()));
        if !server_inbox.is_empty() {
            break;
        }
        std::thread::sleep(TICK);
    }
    assert_eq!(server_inbox, vec!["Echo Message=hi"]);

    // A few extra polls must not deliver it again.
    for _ in 0..5 {
        server.begin_frame(&mut |m: &str| server_inbox.push(m.to_string()));
        std::thread::sleep(TICK);
    }
    assert_eq!(server_inbox.len(), 1);

    // And the reply flows back to the client.
    server.send("hi");
    for _ in 0..POLL_BUDGET {
        server.begin_frame(&mut |m: &str| server_inbox.push(m.to_string()));
        client.begin_frame(&mut |m: &str| client_inbox.push(m.to_string()));
        if !client_inbox.is_empty() {
            break;
        }
        std::thread::sleep(TICK);
    }
    assert_eq!(client_inbox, vec!["hi"]);
}

// ── FIFO ordering ────────────────────────────────────────────────

#[test]
fn send_order_is_fifo() {
    let (mut server, mut client) = server_client_pair();
    let mut server_inbox = Vec::new();
    let mut client_inbox = Vec::new();

    // Queueing before the connection exists is allowed; the messages wait.
    client.send("A");
    client.send("B");
    assert_eq!(client.queue_depth(), 2);

    pump_until_connected(&mut server, &mut client, &mut server_inbox, &mut client_inbox);
    client.send("C");

    for _ in 0..POLL_BUDGET {
        client.begin_frame(&mut |m: &str| client_inbox.push(m.to_string()));
        server.begin_frame(&mut |m: &str| server_inbox.push(m.to_string()));
        if server_inbox.len() >= 3 {
            break;
        }
        std::thread::sleep(TICK);
    }
    assert_eq!(server_inbox, vec!["A", "B", "C"]);
    assert_eq!(client.queue_depth(), 0);
}

// ── Client auto-recovery ─────────────────────────────────────────

/// Pump the client against a raw listener until it connects and the
/// listener yields the accepted stream.
fn accept_when_connected(
    listener: &std::net::TcpListener,
    client: &mut NetSystem,
) -> std::net::TcpStream {
    let mut accepted = None;
    for _ in 0..POLL_BUDGET {
        client.begin_frame(&mut |_: &str| {});
        if accepted.is_none() {
            if let Ok((stream, _)) = listener.accept() {
                accepted = Some(stream);
            }
        }
        if client.is_connected() {
            if let Some(stream) = accepted.take() {
                return stream;
            }
        }
        std::thread::sleep(TICK);
    }
    panic!("client did not connect within the poll budget");
}

#[test]
fn client_recovers_from_peer_loss_without_intervention() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let mut client = NetSystem::start_up(&config("client", &addr)).unwrap();

    let first = accept_when_connected(&listener, &mut client);
    assert!(client.is_connected());

    // Kill the server end of the connection.
    drop(first);

    // The client must notice the disconnect on its own...
    let mut observed_disconnect = false;
    for _ in 0..POLL_BUDGET {
        client.begin_frame(&mut |_: &str| {});
        if !client.is_connected() {
            observed_disconnect = true;
            break;
        }
        std::thread::sleep(TICK);
    }
    assert!(observed_disconnect, "disconnect never detected");

    // ...and reach Connected again with its recreated endpoint.
    let _second = accept_when_connected(&listener, &mut client);
    assert!(client.is_connected());
}

// ── Shutdown ─────────────────────────────────────────────────────

#[test]
fn shutdown_is_idempotent_and_safe_without_a_peer() {
    // Never-connected server.
    let mut server = NetSystem::start_up(&config("server", "127.0.0.1:0")).unwrap();
    server.shutdown();
    server.shutdown();
    assert!(!server.is_enabled());

    // Never-connected client (nothing listens on the target port).
    let mut client = NetSystem::start_up(&config("client", "127.0.0.1:9")).unwrap();
    client.shutdown();
    client.shutdown();
    assert!(!client.is_enabled());
}

#[test]
fn shutdown_after_live_connection() {
    let (mut server, mut client) = server_client_pair();
    let mut server_inbox = Vec::new();
    let mut client_inbox = Vec::new();
    pump_until_connected(&mut server, &mut client, &mut server_inbox, &mut client_inbox);

    client.shutdown();
    assert!(!client.is_enabled());
    assert!(!client.is_connected());

    // The server-side pump keeps running and notices the loss eventually.
    for _ in 0..POLL_BUDGET {
        server.begin_frame(&mut |m: &str| server_inbox.push(m.to_string()));
        if !server.is_connected() {
            break;
        }
        std::thread::sleep(TICK);
    }
    assert!(!server.is_connected());
    server.shutdown();
}
