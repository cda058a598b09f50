//! End-to-end chat tests over real WebSocket connections.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use lectern_server::{
    app::{App, Collaborators, Settings},
    domain::{PageRenderer, RenderError},
    ui::Server,
};
use serde_json::{Value, json};
use tokio::{net::TcpStream, sync::oneshot};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, Message},
};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct NoPages;

impl PageRenderer for NoPages {
    fn render_jpeg_pages(&self, _document: &[u8]) -> Result<Vec<Vec<u8>>, RenderError> {
        Ok(Vec::new())
    }
}

/// Server bound to an ephemeral port; dropping the handle shuts it down
struct TestServer {
    addr: SocketAddr,
    _shutdown: oneshot::Sender<()>,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_with_heartbeat(Duration::from_secs(30)).await
    }

    async fn start_with_heartbeat(heartbeat_interval: Duration) -> Self {
        // A single worker keeps presence notices in submission order
        let settings = Settings {
            workers: 1,
            mailbox_capacity: 16,
            book_timeout: Duration::from_secs(5),
            pdf_bucket: "pdfs".to_string(),
            pages_bucket: "pages".to_string(),
            heartbeat_interval,
        };
        let App { state, .. } = App::build(
            &settings,
            Collaborators::in_memory("http://lectern.test", Arc::new(NoPages)),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown, signal) = oneshot::channel::<()>();
        tokio::spawn(async move {
            Server::new(state, 1024 * 1024)
                .serve(listener, async {
                    let _ = signal.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            _shutdown: shutdown,
        }
    }

    fn ws_url(&self, user_id: &str, username: &str, room_id: &str) -> String {
        format!(
            "ws://{}/chat/ws?user_id={}&username={}&room_id={}",
            self.addr, user_id, username, room_id
        )
    }

    async fn join(&self, user_id: &str, username: &str, room_id: &str) -> Client {
        let (client, _) = connect_async(self.ws_url(user_id, username, room_id))
            .await
            .unwrap();
        client
    }

    async fn stats(&self) -> Value {
        reqwest::get(format!("http://{}/chat/stats", self.addr))
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }
}

/// Next `chat_message` payload, skipping control frames
async fn next_message(client: &mut Client) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(2), client.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("connection closed")
            .unwrap();
        if let Message::Text(text) = frame {
            let frame: Value = serde_json::from_str(&text).unwrap();
            assert_eq!(frame["type"], "chat_message");
            return frame["payload"].clone();
        }
    }
}

#[tokio::test]
async fn test_room_chat_with_presence_notices() {
    // テスト項目: 入室通知・メッセージ配信・退室通知が同じルームの参加者に届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.join("u-alice", "alice", "lobby").await;
    let joined = next_message(&mut alice).await;
    assert_eq!(joined["message"]["type"], "join");
    assert_eq!(joined["message"]["content"], "alice joined the chat");

    let mut bob = server.join("u-bob", "bob", "lobby").await;
    assert_eq!(
        next_message(&mut alice).await["message"]["content"],
        "bob joined the chat"
    );
    assert_eq!(
        next_message(&mut bob).await["message"]["content"],
        "bob joined the chat"
    );
    assert_eq!(
        server.stats().await,
        json!({"count": 2, "rooms": ["lobby"], "users": ["alice", "bob"]})
    );

    // when (操作):
    alice
        .send(Message::Text(
            json!({"type": "message", "payload": {"content": "hi bob"}})
                .to_string()
                .into(),
        ))
        .await
        .unwrap();
    let received = next_message(&mut bob).await;
    let echoed = next_message(&mut alice).await;
    bob.close(None).await.unwrap();
    let left = next_message(&mut alice).await;

    // then (期待する結果):
    assert_eq!(received["message"]["content"], "hi bob");
    assert_eq!(received["message"]["username"], "alice");
    assert_eq!(received["message"]["type"], "message");
    assert_eq!(received["online_users"], 2);
    assert_eq!(echoed["message"]["id"], received["message"]["id"]);
    assert_eq!(left["message"]["type"], "leave");
    assert_eq!(left["message"]["content"], "bob left the chat");
    assert_eq!(
        server.stats().await,
        json!({"count": 1, "rooms": ["lobby"], "users": ["alice"]})
    );
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    // テスト項目: 別ルームのメッセージは届かない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.join("u-alice", "alice", "lobby").await;
    next_message(&mut alice).await;
    let mut carol = server.join("u-carol", "carol", "books").await;
    next_message(&mut carol).await;

    // when (操作):
    carol
        .send(Message::Text("plain text works too".into()))
        .await
        .unwrap();
    let own = next_message(&mut carol).await;

    // then (期待する結果):
    assert_eq!(own["message"]["content"], "plain text works too");
    assert_eq!(own["message"]["room_id"], "books");
    let nothing = tokio::time::timeout(Duration::from_millis(200), alice.next()).await;
    assert!(nothing.is_err(), "lobby received a frame from another room");
    assert_eq!(server.stats().await["rooms"], json!(["books", "lobby"]));
}

#[tokio::test]
async fn test_duplicate_connection_is_refused() {
    // テスト項目: 同じユーザーが同じルームに二重接続すると 409 で拒否される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.join("u-alice", "alice", "lobby").await;
    next_message(&mut alice).await;

    // when (操作):
    let result = connect_async(server.ws_url("u-alice", "alice", "lobby")).await;

    // then (期待する結果):
    match result {
        Err(tungstenite::Error::Http(response)) => assert_eq!(response.status(), 409),
        other => panic!("expected HTTP 409, got {:?}", other.map(|(_, r)| r.status())),
    }
    assert_eq!(server.stats().await["count"], 1);
}

#[tokio::test]
async fn test_missing_query_parameters_are_rejected() {
    // テスト項目: 接続パラメーターが欠けた接続要求は 400 で拒否される
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let result = connect_async(format!("ws://{}/chat/ws?user_id=u-alice", server.addr)).await;

    // then (期待する結果):
    match result {
        Err(tungstenite::Error::Http(response)) => assert_eq!(response.status(), 400),
        other => panic!("expected HTTP 400, got {:?}", other.map(|(_, r)| r.status())),
    }
}

#[tokio::test]
async fn test_silent_peer_is_dropped_and_user_can_reconnect() {
    // テスト項目: ping に応答しない接続は切断され、同じユーザーが再接続できる
    // given (前提条件):
    let server = TestServer::start_with_heartbeat(Duration::from_millis(100)).await;
    // 読み出さないクライアントは pong を返さない
    let _silent = server.join("u-alice", "alice", "lobby").await;
    assert_eq!(server.stats().await["count"], 1);

    // when (操作):
    tokio::time::sleep(Duration::from_millis(600)).await;
    let reconnected = connect_async(server.ws_url("u-alice", "alice", "lobby")).await;

    // then (期待する結果):
    assert!(reconnected.is_ok(), "reconnect was refused");
    assert_eq!(server.stats().await["count"], 1);
}

#[tokio::test]
async fn test_responsive_peer_survives_heartbeats() {
    // テスト項目: ping に応答する接続は何度 ping を受けても維持される
    // given (前提条件):
    let server = TestServer::start_with_heartbeat(Duration::from_millis(100)).await;
    let mut alice = server.join("u-alice", "alice", "lobby").await;
    // 読み出し続けることで pong が自動で返される
    let reader = tokio::spawn(async move { while let Some(Ok(_)) = alice.next().await {} });

    // when (操作):
    tokio::time::sleep(Duration::from_millis(600)).await;

    // then (期待する結果):
    assert_eq!(server.stats().await["count"], 1);
    let duplicate = connect_async(server.ws_url("u-alice", "alice", "lobby")).await;
    assert!(duplicate.is_err(), "the live connection was dropped");
    reader.abort();
}
