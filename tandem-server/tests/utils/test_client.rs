use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::time::Duration;
use tandem_core::{ConnectionId, SignalMessage};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::signal_helpers::SIGNAL_TIMEOUT_MS;

/// Browser stand-in speaking the JSON protocol over a real WebSocket.
pub struct TestClient {
    /// The id the server assigned in its `welcome` frame.
    pub connection_id: ConnectionId,
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let (socket, _) = connect_async(format!("ws://{}/ws", addr))
            .await
            .context("WebSocket handshake failed")?;

        let mut client = Self {
            connection_id: ConnectionId::new(),
            socket,
        };

        match client.recv().await? {
            SignalMessage::Welcome { connection_id, .. } => client.connection_id = connection_id,
            other => anyhow::bail!("Expected welcome, got {:?}", other),
        }

        Ok(client)
    }

    pub async fn send(&mut self, msg: &SignalMessage) -> Result<()> {
        let json = serde_json::to_string(msg)?;
        self.socket.send(Message::text(json)).await?;
        Ok(())
    }

    pub async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.socket.send(Message::text(text.to_string())).await?;
        Ok(())
    }

    pub async fn recv(&mut self) -> Result<SignalMessage> {
        let timeout = Duration::from_millis(SIGNAL_TIMEOUT_MS);

        loop {
            let frame = tokio::time::timeout(timeout, self.socket.next())
                .await
                .context("Timeout waiting for signal")?
                .context("Socket closed")??;

            if let Message::Text(text) = frame {
                return serde_json::from_str(text.as_str()).context("Bad signal JSON");
            }
        }
    }

    /// Skip frames until one matches.
    pub async fn recv_matching(
        &mut self,
        pred: impl Fn(&SignalMessage) -> bool,
    ) -> Result<SignalMessage> {
        loop {
            let msg = self.recv().await?;
            if pred(&msg) {
                return Ok(msg);
            }
        }
    }

    pub async fn close(mut self) -> Result<()> {
        self.socket.close(None).await?;
        Ok(())
    }
}
