//! End-to-end tests for the bridge run loop.
//!
//! These tests require the `test-utils` feature to be enabled.

#![cfg(feature = "test-utils")]

use proptest::prelude::*;
use tty_bridge::test_utils::FakeTerminal;
use tty_bridge::{
    Bridge, BridgeError, BridgeExit, Decoding, ExitReason, InputEvent, InterruptKey,
    InterruptPolicy, Modifiers, ResizeEvent, connect,
};

#[tokio::test]
async fn host_handled_ctrl_c_exits_with_zero() {
    let (terminal, handle) = FakeTerminal::new();
    let (mut app, ports) = connect();
    let bridge = Bridge::builder(terminal).ports(ports).build().unwrap();

    handle.send_input([0x03]);
    let exit = bridge.run().await.unwrap();

    assert_eq!(exit.code, 0);
    assert_eq!(exit.reason, ExitReason::Interrupt(InterruptKey::CtrlC));
    assert!(app.input.recv().await.is_none());
}

#[tokio::test]
async fn structured_host_handled_escape_exits_before_decoding() {
    let (terminal, handle) = FakeTerminal::new();
    let (mut app, ports) = connect();
    let bridge = Bridge::builder(terminal)
        .decoding(Decoding::Structured)
        .ports(ports)
        .build()
        .unwrap();

    handle.send_input([0x1b]);
    let exit = bridge.run().await.unwrap();

    assert_eq!(exit, BridgeExit::interrupt(InterruptKey::Escape));
    assert_eq!(exit.code, 0);
    assert!(app.input.recv().await.is_none());
}

#[tokio::test]
async fn failed_restore_keeps_clean_exit() {
    let (terminal, handle) = FakeTerminal::builder().fail_restore().build();
    let (mut app, ports) = connect();
    let bridge = Bridge::builder(terminal).ports(ports).build().unwrap();

    handle.send_input([0x03]);
    let exit = bridge.run().await.unwrap();

    assert_eq!(exit.code, 0);
    assert_eq!(exit.reason, ExitReason::Interrupt(InterruptKey::CtrlC));
    assert!(app.input.recv().await.is_none());
}

#[tokio::test]
async fn host_handled_forwards_earlier_input() {
    let (terminal, handle) = FakeTerminal::new();
    let (mut app, ports) = connect();
    let bridge = Bridge::builder(terminal).ports(ports).build().unwrap();

    handle.send_input("hi");
    handle.send_input("\x1b[A");
    handle.send_input([0x1b]);
    bridge.run().await.unwrap();

    assert_eq!(app.input.recv().await, Some(InputEvent::RawChunk("hi".into())));
    assert_eq!(app.input.recv().await, Some(InputEvent::RawChunk("\x1b[A".into())));
    assert!(app.input.recv().await.is_none());
}

#[tokio::test]
async fn delegated_escape_is_one_event_and_no_exit() {
    let (terminal, handle) = FakeTerminal::new();
    let (mut app, ports) = connect();
    let bridge = Bridge::builder(terminal)
        .interrupt(InterruptPolicy::DelegateToApplication)
        .ports(ports)
        .build()
        .unwrap();

    let run = tokio::spawn(bridge.run());
    handle.send_input([0x1b]);

    assert_eq!(app.input.recv().await, Some(InputEvent::RawChunk("\x1b".into())));
    assert!(!run.is_finished());
    assert!(handle.is_raw());

    assert!(app.request_exit(0));
    let exit = run.await.unwrap().unwrap();
    assert_eq!(exit.reason, ExitReason::Requested);
    assert!(app.input.try_recv().is_err());
}

#[tokio::test]
async fn structured_delegate_arrow_up() {
    let (terminal, handle) = FakeTerminal::new();
    let (mut app, ports) = connect();
    let bridge = Bridge::builder(terminal)
        .decoding(Decoding::Structured)
        .interrupt(InterruptPolicy::DelegateToApplication)
        .ports(ports)
        .build()
        .unwrap();

    let run = tokio::spawn(bridge.run());
    handle.send_input(b"\x1b[A");

    let event = app.input.recv().await.unwrap();
    let key = event.as_key().unwrap();
    assert_eq!(key.name, "ArrowUp");
    assert_eq!(key.modifiers, Modifiers::NONE);

    assert!(app.request_exit(0));
    run.await.unwrap().unwrap();
    assert!(app.input.try_recv().is_err());
}

#[tokio::test]
async fn structured_delegate_ctrl_c_is_a_key() {
    let (terminal, handle) = FakeTerminal::new();
    let (mut app, ports) = connect();
    let bridge = Bridge::builder(terminal)
        .decoding(Decoding::Structured)
        .interrupt(InterruptPolicy::DelegateToApplication)
        .ports(ports)
        .build()
        .unwrap();

    handle.send_input([0x03]);
    handle.close_input();
    assert!(app.request_exit(5));
    let exit = bridge.run().await.unwrap();

    assert_eq!(exit.code, 5);
    let key = app.input.recv().await.unwrap();
    let key = key.as_key().unwrap();
    assert_eq!(key.name, "c");
    assert!(key.modifiers.ctrl);
}

#[tokio::test]
async fn resize_signals_become_exact_events() {
    let (terminal, handle) = FakeTerminal::builder().size(80, 24).build();
    let (mut app, ports) = connect();
    let bridge = Bridge::builder(terminal).ports(ports).build().unwrap();
    assert_eq!(bridge.snapshot().columns, 80);

    let sizes = [(100, 40), (100, 40), (20, 5), (300, 90)];
    for (cols, rows) in sizes {
        handle.resize(cols, rows);
    }
    handle.close_resize();
    handle.close_input();

    let run = tokio::spawn(bridge.run());
    for (cols, rows) in sizes {
        assert_eq!(app.resize.recv().await, Some(ResizeEvent::new(cols, rows)));
    }
    assert!(app.request_exit(0));
    run.await.unwrap().unwrap();
    assert!(app.resize.recv().await.is_none());
}

#[tokio::test]
async fn raw_mode_failure_means_no_bridge() {
    let (terminal, handle) = FakeTerminal::builder().fail_raw_mode().build();
    let (_app, ports) = connect();
    let result = Bridge::builder(terminal).ports(ports).build();

    assert!(matches!(result, Err(BridgeError::Host(_))));
    assert!(!handle.is_raw());
    assert!(!handle.input_started());
}

#[tokio::test]
async fn prior_raw_mode_survives_termination() {
    let (terminal, handle) = FakeTerminal::builder().raw(true).build();
    let (_app, ports) = connect();
    let bridge = Bridge::builder(terminal).ports(ports).build().unwrap();

    handle.send_input([0x1b]);
    bridge.run().await.unwrap();
    assert!(handle.is_raw());
}

#[tokio::test]
async fn raw_mode_held_while_running() {
    let (terminal, handle) = FakeTerminal::new();
    let (app, ports) = connect();
    let bridge = Bridge::builder(terminal).ports(ports).build().unwrap();
    let run = tokio::spawn(bridge.run());

    assert!(app.write("tick"));
    tokio::task::yield_now().await;
    assert!(handle.is_raw());

    handle.send_input([0x03]);
    run.await.unwrap().unwrap();
    assert!(!handle.is_raw());
}

#[tokio::test]
async fn input_only_bridge_detaches_on_eof() {
    let (terminal, handle) = FakeTerminal::new();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let bridge = Bridge::builder(terminal).input(tx).build().unwrap();

    handle.send_input("abc");
    handle.close_input();
    let exit = bridge.run().await.unwrap();

    assert_eq!(exit, BridgeExit::detached());
    assert_eq!(rx.recv().await, Some(InputEvent::RawChunk("abc".into())));
}

#[tokio::test]
async fn init_flags_match_snapshot() {
    let (terminal, _handle) = FakeTerminal::builder().size(132, 43).color_depth(24).build();
    let bridge = Bridge::builder(terminal).build().unwrap();
    let flags = bridge.init_flags();
    assert_eq!(flags.snapshot, bridge.snapshot());
    assert_eq!(
        flags.snapshot.to_json(),
        serde_json::json!({"colorDepth": 24, "columns": 132, "rows": 43})
    );
}

fn run_blocking<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #[test]
    fn passthrough_identity_through_the_bridge(chunks in proptest::collection::vec("[^\\x1b\\x03]{1,16}", 1..12)) {
        let (terminal, handle) = FakeTerminal::new();
        let (mut app, ports) = connect();
        let bridge = Bridge::builder(terminal).ports(ports).build().unwrap();

        for chunk in &chunks {
            handle.send_input(chunk);
        }
        handle.close_input();
        assert!(app.request_exit(0));

        let received = run_blocking(async move {
            bridge.run().await.unwrap();
            let mut received = Vec::new();
            while let Some(event) = app.input.recv().await {
                received.push(event);
            }
            received
        });

        let expected: Vec<_> = chunks.into_iter().map(InputEvent::RawChunk).collect();
        prop_assert_eq!(received, expected);
    }

    #[test]
    fn output_order_through_the_bridge(payloads in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..24), 0..16)) {
        let (terminal, handle) = FakeTerminal::new();
        let (app, ports) = connect();
        let bridge = Bridge::builder(terminal).ports(ports).build().unwrap();

        for payload in &payloads {
            assert!(app.write(payload.clone()));
        }
        drop(app);
        handle.close_input();
        handle.close_resize();

        let exit = run_blocking(bridge.run()).unwrap();
        prop_assert_eq!(exit, BridgeExit::detached());
        prop_assert_eq!(handle.output(), payloads.concat());
    }
}
