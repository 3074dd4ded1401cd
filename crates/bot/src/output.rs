//! Forwarding of child output into the log.

use std::fmt;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;

/// Which pipe a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputStream {
    Stdout,
    Stderr,
}

impl fmt::Display for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => write!(f, "stdout"),
            Self::Stderr => write!(f, "stderr"),
        }
    }
}

/// Log every line read from `reader` as it arrives.
///
/// Lines are decoded lossily, so invalid UTF-8 never stops forwarding. On a
/// read error the pipe is still drained to EOF; closing it early would kill
/// the child with SIGPIPE on its next write. The task yields the number of
/// lines forwarded.
pub(crate) fn forward_lines<R>(reader: R, pid: u32, stream: OutputStream) -> JoinHandle<usize>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        let mut count = 0;

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    count += 1;
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches(['\n', '\r']);
                    tracing::info!(target: "authmock_bot::output", pid, %stream, "{line}");
                }
                Err(e) => {
                    tracing::warn!(pid, %stream, error = %e, "Failed to read bot output");
                    if let Err(e) = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await {
                        tracing::warn!(pid, %stream, error = %e, "Failed to drain bot output");
                    }
                    break;
                }
            }
        }

        count
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn forwards_each_line() {
        let input: &'static [u8] = b"first\nsecond\nthird";
        let count = forward_lines(input, 42, OutputStream::Stdout).await.unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn empty_stream_forwards_nothing() {
        let input: &'static [u8] = b"";
        let count = forward_lines(input, 42, OutputStream::Stderr).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn invalid_utf8_does_not_stop_forwarding() {
        let input: &'static [u8] = b"\xff\xfe\nafter\r\nlast\n";
        let count = forward_lines(input, 42, OutputStream::Stdout).await.unwrap();
        assert_eq!(count, 3);
    }
}
