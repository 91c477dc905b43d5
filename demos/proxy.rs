use socks4d::{Error, Server};

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:1080".to_string());

    let server = Server::bind(addr).await?;
    server.serve().await
}
