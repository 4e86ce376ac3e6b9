//! Transport trait abstraction for the command connection

use anyhow::Result;
use async_trait::async_trait;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite};

/// An accepted connection that can be read from and closed
#[async_trait]
pub trait TransportStream: AsyncRead + AsyncWrite + Send + Unpin + 'static {
    /// Close the connection gracefully
    async fn disconnect(&mut self) -> Result<()>;
}

/// Source of incoming connections
#[async_trait]
pub trait TransportListener: Send {
    /// The stream type this listener produces
    type Stream: TransportStream;

    /// Wait for the next connection
    async fn accept(&mut self) -> Result<(Self::Stream, SocketAddr)>;

    /// Address the listener is bound to
    fn local_addr(&self) -> Result<SocketAddr>;

    /// Human-readable name for this transport
    fn name(&self) -> &'static str;
}
