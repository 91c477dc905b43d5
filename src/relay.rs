use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Read chunk size, shared with the dispatcher's handshake read.
pub(crate) const BUF_SIZE: usize = 1 << 12;

/// Copies bytes from `src` to `dst` until `src` reaches end-of-stream or
/// either side fails, then shuts down `dst`. Shutting down the write side
/// is what lets the opposite pump of a session unwind without any
/// session-level coordinator.
///
/// Returns the number of bytes copied.
pub async fn pump<R, W>(mut src: R, mut dst: W) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = [0u8; BUF_SIZE];
    let mut copied = 0u64;

    let result = loop {
        let n = match src.read(&mut buf).await {
            Ok(0) => break Ok(copied),
            Ok(n) => n,
            Err(err) => break Err(err),
        };

        if let Err(err) = dst.write_all(&buf[..n]).await {
            break Err(err);
        }

        copied += n as u64;
    };

    let _ = dst.shutdown().await;

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::duplex;

    #[tokio::test]
    async fn copies_bytes_in_order() {
        let payload: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();

        let (mut client, proxy_in) = duplex(1024);
        let (proxy_out, mut target) = duplex(1024);

        let pump_task = tokio::spawn(pump(proxy_in, proxy_out));

        let sent = payload.clone();
        let write_task = tokio::spawn(async move {
            client.write_all(&sent).await.unwrap();
            client.shutdown().await.unwrap();
        });

        let mut received = Vec::new();
        target.read_to_end(&mut received).await.unwrap();

        assert_eq!(received, payload);
        assert_eq!(pump_task.await.unwrap().unwrap(), payload.len() as u64);
        write_task.await.unwrap();
    }

    #[tokio::test]
    async fn immediate_eof_closes_destination() {
        let (mut client, proxy_in) = duplex(64);
        let (proxy_out, mut target) = duplex(64);

        client.shutdown().await.unwrap();

        assert_eq!(pump(proxy_in, proxy_out).await.unwrap(), 0);

        let mut received = Vec::new();
        target.read_to_end(&mut received).await.unwrap();
        assert!(received.is_empty());
    }

    #[tokio::test]
    async fn write_failure_terminates_pump() {
        let (mut client, proxy_in) = duplex(64);
        let (proxy_out, target) = duplex(64);

        drop(target);
        client.write_all(b"hello").await.unwrap();

        assert!(pump(proxy_in, proxy_out).await.is_err());
    }
}
