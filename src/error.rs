use std::net::SocketAddrV4;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed request, got {0} bytes, need at least 8")]
    MalformedRequest(usize),

    #[error("unsupported command {0:#04x}")]
    UnsupportedCommand(u8),

    #[error("failed to connect to {0}: {1}")]
    Dial(SocketAddrV4, std::io::Error),

    #[error("failed to bind an ephemeral listener: {0}")]
    Bind(std::io::Error),
}
