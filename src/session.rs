use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use log::{debug, info, warn};
use tokio::io::{self, AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::command::Command;
use crate::error::Error;
use crate::relay::{self, BUF_SIZE};
use crate::reply::Reply;
use crate::request::SocksRequest;

/// Serves one accepted client connection: a single handshake read, then
/// dispatch on the command. The dispatcher itself never writes a reply;
/// short and unrecognized requests just close the connection.
pub(crate) async fn serve_client(
    mut stream: TcpStream,
    peer_addr: SocketAddr,
) -> Result<(), Error> {
    let mut buf = [0u8; BUF_SIZE];
    let n = stream.read(&mut buf).await?;

    let request = match SocksRequest::decode(&buf[..n]) {
        Ok(request) => request,
        Err(err) => {
            stream.shutdown().await?;
            return Err(err);
        }
    };

    debug!(
        "client {} requested {:?} for {}",
        peer_addr, request.command, request.addr
    );

    match request.command {
        Command::Connect => connect(stream, request.addr).await,
        Command::Bind => {
            let bind = BindSession::new(request.addr);
            bind.run(stream).await
        }
        Command::Unknown(code) => {
            stream.shutdown().await?;
            Err(Error::UnsupportedCommand(code))
        }
    }
}

/// CONNECT: dial the target, reply, relay. A failed dial turns into a
/// rejected reply and a closed client connection; no relay is started.
async fn connect(mut client: TcpStream, target_addr: SocketAddrV4) -> Result<(), Error> {
    let target = match TcpStream::connect(target_addr).await {
        Ok(stream) => stream,
        Err(err) => {
            client
                .write_all(&Reply::Rejected.encode(Reply::UNSPECIFIED))
                .await?;
            client.flush().await?;
            client.shutdown().await?;

            return Err(Error::Dial(target_addr, err));
        }
    };

    // The target address is not echoed back on a CONNECT grant.
    client
        .write_all(&Reply::Granted.encode(Reply::UNSPECIFIED))
        .await?;
    client.flush().await?;

    info!("setting up relays for {target_addr}");
    relay_session(client, target).await;

    Ok(())
}

/// BIND state carried through the wait-for-peer phase, so the acceptance
/// rule lives in one place instead of a per-session closure.
struct BindSession {
    expected_peer: SocketAddrV4,
}

impl BindSession {
    fn new(expected_peer: SocketAddrV4) -> Self {
        Self { expected_peer }
    }

    async fn run(self, mut client: TcpStream) -> Result<(), Error> {
        let (listener, bound) = match Self::bind_ephemeral().await {
            Ok(val) => val,
            Err(err) => {
                client
                    .write_all(&Reply::Rejected.encode(Reply::UNSPECIFIED))
                    .await?;
                client.flush().await?;

                return Err(Error::Bind(err));
            }
        };

        // Unlike CONNECT, the grant carries the real bound endpoint: the
        // client relays it to the peer out of band so the peer knows where
        // to dial in.
        client.write_all(&Reply::Granted.encode(bound)).await?;
        client.flush().await?;

        debug!(
            "waiting on {} for an inbound connection from {}",
            bound,
            self.expected_peer.ip()
        );

        let peer = self.accept_peer(&listener).await?;

        // Single use: release the ephemeral listener before relaying.
        drop(listener);

        info!("setting up relays for {}", self.expected_peer.ip());
        relay_session(client, peer).await;

        Ok(())
    }

    async fn bind_ephemeral() -> io::Result<(TcpListener, SocketAddrV4)> {
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;

        match listener.local_addr()? {
            SocketAddr::V4(addr) => Ok((listener, addr)),
            SocketAddr::V6(addr) => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("ephemeral listener bound to non-IPv4 address {addr}"),
            )),
        }
    }

    /// Accepts inbound connections until one arrives from the expected
    /// address. Only the 4-byte address is compared; the peer's source
    /// port is not checked. Mismatched connections are dropped and the
    /// wait continues.
    async fn accept_peer(&self, listener: &TcpListener) -> Result<TcpStream, Error> {
        loop {
            let (peer, peer_addr) = listener.accept().await?;

            match peer_addr {
                SocketAddr::V4(addr) if addr.ip() == self.expected_peer.ip() => {
                    return Ok(peer);
                }
                addr => {
                    warn!(
                        "dropping inbound connection from {}, expected {}",
                        addr,
                        self.expected_peer.ip()
                    );
                }
            }
        }
    }
}

/// Runs both relay directions to completion on the session's own task.
/// The two pumps are independent; a half-closed direction leaves the
/// other one running.
async fn relay_session(mut client: TcpStream, mut peer: TcpStream) {
    let (client_read, client_write) = client.split();
    let (peer_read, peer_write) = peer.split();

    let (to_peer, to_client) = tokio::join!(
        relay::pump(client_read, peer_write),
        relay::pump(peer_read, client_write),
    );

    match to_peer {
        Ok(n) => debug!("client to peer relay done, {n} bytes"),
        Err(err) => debug!("client to peer relay terminated: {err}"),
    }
    match to_client {
        Ok(n) => debug!("peer to client relay done, {n} bytes"),
        Err(err) => debug!("peer to client relay terminated: {err}"),
    }
}
