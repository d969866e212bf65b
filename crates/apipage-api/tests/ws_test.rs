//! End-to-end tests for the WebSocket change feed over a real listener.

mod common;

use std::net::SocketAddr;
use std::time::Duration;

use apipage_pages::domain::model::Page;
use apipage_realtime::client::ConnectionConfig;
use apipage_realtime::hub::HubConfig;
use apipage_realtime::message::BroadcastMessage;
use axum::http::StatusCode;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(addr: SocketAddr) -> Client {
    let (client, _) = connect_async(format!("ws://{addr}/api/ws")).await.unwrap();
    client
}

async fn next_json(client: &mut Client) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("timed out waiting for a broadcast")
            .expect("connection closed")
            .unwrap();
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

#[tokio::test]
async fn test_clients_receive_mutations_in_order() {
    // Arrange
    let app = common::build_test_app();
    let addr = common::serve_on_local_port(app.router.clone()).await;
    let mut first = connect(addr).await;
    let mut second = connect(addr).await;
    common::wait_for_clients(&app.hub, 2).await;

    // Act
    let (status, created) = common::post_json(
        app.router.clone(),
        "/api/pages",
        &json!({ "title": "Page 1", "text": "Page 1 text" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = common::delete(app.router, "/api/pages/1").await;
    assert_eq!(status, StatusCode::OK);

    // Assert
    for client in [&mut first, &mut second] {
        let message = next_json(client).await;
        assert_eq!(message["event"], "ap_page_created");
        assert_eq!(message["data"]["page"], created["data"]);
        let message = next_json(client).await;
        assert_eq!(message, json!({ "event": "ap_page_deleted", "data": { "id": 1 } }));
    }
}

#[tokio::test]
async fn test_late_client_misses_earlier_broadcasts() {
    // Arrange
    let app = common::build_test_app();
    let addr = common::serve_on_local_port(app.router.clone()).await;
    common::post_json(
        app.router.clone(),
        "/api/events",
        &json!({ "constant": "EARLY", "value": "early", "description": "d" }),
    )
    .await;

    // Act
    let mut late = connect(addr).await;
    common::wait_for_clients(&app.hub, 1).await;
    common::post_json(
        app.router,
        "/api/events",
        &json!({ "constant": "LATE", "value": "late", "description": "d" }),
    )
    .await;

    // Assert
    let message = next_json(&mut late).await;
    assert_eq!(message["event"], "ap_event_created");
    assert_eq!(message["data"]["event"]["constant"], "LATE");
}

#[tokio::test]
async fn test_closing_the_socket_unregisters_the_client() {
    let app = common::build_test_app();
    let addr = common::serve_on_local_port(app.router.clone()).await;
    let mut client = connect(addr).await;
    common::wait_for_clients(&app.hub, 1).await;

    client.send(Message::Text("ignored".into())).await.unwrap();
    client.close(None).await.unwrap();

    common::wait_for_clients(&app.hub, 0).await;
}

#[tokio::test]
async fn test_client_that_stops_reading_is_disconnected() {
    // Arrange
    let app = common::build_test_app_with_limits(
        HubConfig { client_buffer: 1 },
        ConnectionConfig {
            heartbeat_interval: Duration::from_secs(60),
            idle_timeout: Duration::from_secs(120),
            write_timeout: Duration::from_millis(200),
        },
    );
    let addr = common::serve_on_local_port(app.router.clone()).await;
    let mut stalled = connect(addr).await;
    common::wait_for_clients(&app.hub, 1).await;
    let page = Page {
        id: 1,
        title: "Large".to_owned(),
        text: "x".repeat(8 << 20),
        ..Page::default()
    };

    // Act: far more than the socket buffers hold, while the peer reads nothing.
    for _ in 0..8 {
        app.hub
            .broadcast(&BroadcastMessage::PageUpdated { page: page.clone() })
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    common::wait_for_clients(&app.hub, 0).await;
    tokio::time::sleep(Duration::from_millis(600)).await;

    // Assert: the server gave up mid-frame, so draining ends without a
    // closing handshake.
    let mut complete = 0;
    let clean_close = tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            match stalled.next().await {
                Some(Ok(Message::Text(_))) => complete += 1,
                Some(Ok(Message::Close(_))) => return true,
                Some(Ok(_)) => {}
                Some(Err(_)) | None => return false,
            }
        }
    })
    .await
    .expect("server never closed the stalled connection");
    assert!(!clean_close);
    assert!(complete < 8);
}

#[tokio::test]
async fn test_client_that_never_answers_pings_is_dropped() {
    // Arrange
    let app = common::build_test_app_with_limits(
        HubConfig::default(),
        ConnectionConfig {
            heartbeat_interval: Duration::from_millis(50),
            idle_timeout: Duration::from_millis(200),
            write_timeout: Duration::from_secs(1),
        },
    );
    let addr = common::serve_on_local_port(app.router.clone()).await;
    // An unpolled client never reads the pings, so it never answers them.
    let mut silent = connect(addr).await;
    common::wait_for_clients(&app.hub, 1).await;

    // Act
    tokio::time::sleep(Duration::from_millis(600)).await;

    // Assert
    common::wait_for_clients(&app.hub, 0).await;
    let ended = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match silent.next().await {
                Some(Ok(Message::Close(_)) | Err(_)) | None => return,
                Some(Ok(_)) => {}
            }
        }
    })
    .await;
    assert!(ended.is_ok(), "idle connection was left open");
}

#[tokio::test]
async fn test_client_that_answers_pings_stays_connected() {
    // Arrange
    let app = common::build_test_app_with_limits(
        HubConfig::default(),
        ConnectionConfig {
            heartbeat_interval: Duration::from_millis(50),
            idle_timeout: Duration::from_millis(200),
            write_timeout: Duration::from_secs(1),
        },
    );
    let addr = common::serve_on_local_port(app.router.clone()).await;
    let mut client = connect(addr).await;
    common::wait_for_clients(&app.hub, 1).await;

    // Act: reading lets the client library answer each ping.
    let reader = tokio::spawn(async move {
        let mut pings = 0;
        while let Some(Ok(frame)) = client.next().await {
            if matches!(frame, Message::Ping(_)) {
                pings += 1;
            }
            if pings == 10 {
                break;
            }
        }
        (client, pings)
    });
    let (_client, pings) = tokio::time::timeout(Duration::from_secs(5), reader)
        .await
        .expect("pings stopped arriving")
        .unwrap();

    // Assert
    assert_eq!(pings, 10);
    assert_eq!(app.hub.connected_clients().await.unwrap(), 1);
}
