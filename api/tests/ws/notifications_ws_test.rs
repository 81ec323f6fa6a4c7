use std::time::Duration;

use futures::StreamExt;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use util::ws::{emit, system_notifications_topic};

use crate::helpers::{TestApp, make_test_app};

/// Serves the test app on an ephemeral port and returns its address.
async fn spawn_server(app: &TestApp) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app.router.clone();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}

#[tokio::test]
async fn subscriber_receives_notification_events() {
    let app = make_test_app().await;
    let (_, system_id) = app.seed_system("web-01").await;
    let addr = spawn_server(&app).await;

    let url = format!("ws://{addr}/ws/systems/{system_id}/notifications");
    let (mut socket, _) = connect_async(url).await.unwrap();

    // Wait until the server side has subscribed
    let topic = system_notifications_topic(system_id);
    let ws = app.state.ws_clone();
    for _ in 0..50 {
        if ws.subscriber_count(&topic).await > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let delivered = emit(
        &ws,
        &topic,
        "notification.created",
        &json!({ "notification_id": 9 }),
    )
    .await;
    assert_eq!(delivered, 1);

    let frame = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match socket.next().await {
                Some(Ok(Message::Text(text))) => return text.to_string(),
                Some(Ok(_)) => continue,
                other => panic!("socket closed early: {other:?}"),
            }
        }
    })
    .await
    .expect("no event within timeout");

    let v: Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(v["event"], "notification.created");
    assert_eq!(v["topic"], topic);
    assert_eq!(v["payload"]["notification_id"], 9);
}

#[tokio::test]
async fn unknown_system_is_rejected_before_upgrade() {
    let app = make_test_app().await;
    let addr = spawn_server(&app).await;

    let url = format!("ws://{addr}/ws/systems/999/notifications");
    let err = connect_async(url).await.unwrap_err();

    match err {
        tokio_tungstenite::tungstenite::Error::Http(resp) => {
            assert_eq!(resp.status(), 404);
        }
        other => panic!("expected HTTP rejection, got {other:?}"),
    }
}
