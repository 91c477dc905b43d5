use std::io;
use std::net::SocketAddr;

use log::{debug, error, info};
use tokio::net::{TcpListener, ToSocketAddrs};

use crate::error::Error;
use crate::session;

/// The accept loop. One task is spawned per client connection; session
/// failures are logged and never take the listener down.
pub struct Server {
    listener: TcpListener,
}

impl Server {
    pub async fn bind<A: ToSocketAddrs>(addr: A) -> Result<Self, Error> {
        let listener = TcpListener::bind(addr).await?;

        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn serve(&self) -> Result<(), Error> {
        info!("starting socks4 server at {}", self.local_addr()?);

        loop {
            let (stream, peer_addr) = match self.listener.accept().await {
                Ok(val) => val,
                Err(err) => {
                    error!("failed to accept a client connection: {err}");
                    continue;
                }
            };

            debug!("client {peer_addr} connected");

            tokio::spawn(async move {
                if let Err(err) = session::serve_client(stream, peer_addr).await {
                    error!("session with {peer_addr} failed: {err}");
                }

                debug!("client {peer_addr} disconnected");
            });
        }
    }
}
