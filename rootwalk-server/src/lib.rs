use futures::stream::StreamExt;
use prelude::Message;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;

pub mod prelude;
pub mod receiver;
pub mod sender;

/// Turns one inbound datagram into at most one reply. `None` means the
/// datagram is dropped without an answer.
#[async_trait::async_trait]
pub trait Handler {
    async fn handle(&self, message: Message) -> Option<Message>;
}

pub struct UdpServer<H> {
    address: SocketAddr,
    handler: H,
}

impl<H: Handler> UdpServer<H> {
    pub fn new(address: SocketAddr, handler: H) -> Self {
        Self { address, handler }
    }

    /// Serves forever. Each datagram is handled to completion, including all
    /// of the handler's own outbound traffic, before the next one is read.
    pub async fn run(&self) -> std::io::Result<()> {
        let socket = UdpSocket::bind(self.address).await?;
        let socket = Arc::new(socket);

        let receiver = receiver::Receiver::new(socket.clone());
        let sender = sender::Sender::new(socket);

        let stream = receiver.into_stream();

        tokio::pin!(stream);

        while let Some(message) = stream.next().await {
            if let Some(reply) = self.handler.handle(message).await {
                if let Err(error) = sender.send(&reply).await {
                    tracing::error!("couldn't send message to {:?}: {error:?}", reply.address);
                }
            }
        }

        Ok(())
    }
}
