//! Message codec for the stdio wire protocol.
//!
//! Message format: one JSON-RPC 2.0 object per line, UTF-8, terminated by
//! `\n` (a preceding `\r` is tolerated). Blank lines are skipped.

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Chunk size used while discarding the tail of an oversized line.
const DISCARD_CHUNK: u64 = 64 * 1024;

/// Read one message line from the stream.
///
/// Returns `None` on clean EOF. A line longer than `max_message_bytes` is
/// consumed and reported as `InvalidData`, so the caller can answer it and
/// keep reading.
pub async fn read_message<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    max_message_bytes: usize,
) -> std::io::Result<Option<Vec<u8>>> {
    loop {
        let mut line = Vec::new();
        let limit = max_message_bytes as u64 + 1;
        let read = (&mut *reader).take(limit).read_until(b'\n', &mut line).await?;
        if read == 0 {
            return Ok(None);
        }

        let terminated = line.last() == Some(&b'\n');
        if !terminated && line.len() > max_message_bytes {
            discard_line(reader).await?;
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Message too large: exceeds {} bytes", max_message_bytes),
            ));
        }

        while matches!(line.last(), Some(b'\n' | b'\r')) {
            line.pop();
        }
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        return Ok(Some(line));
    }
}

async fn discard_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> std::io::Result<()> {
    let mut sink = Vec::new();
    loop {
        sink.clear();
        let read = (&mut *reader)
            .take(DISCARD_CHUNK)
            .read_until(b'\n', &mut sink)
            .await?;
        if read == 0 || sink.last() == Some(&b'\n') {
            return Ok(());
        }
    }
}

/// Write one message as a single line and flush.
pub async fn write_message<W: AsyncWrite + Unpin, T: Serialize + ?Sized>(
    writer: &mut W,
    message: &T,
) -> std::io::Result<()> {
    let mut payload = serde_json::to_vec(message)?;
    payload.push(b'\n');
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}
