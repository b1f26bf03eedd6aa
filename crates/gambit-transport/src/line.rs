//! Newline-framed connections over any async byte stream.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt,
    BufReader, ReadHalf, WriteHalf,
};
use tokio::sync::{Mutex, Notify};

use crate::{
    Connection, ConnectionId, TransportError, DEFAULT_MAX_FRAME_LEN,
    FRAME_TERMINATOR,
};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// A TCP connection to the relay server.
#[cfg(feature = "tcp")]
pub type TcpConnection = LineConnection<
    tokio::net::tcp::OwnedReadHalf,
    tokio::net::tcp::OwnedWriteHalf,
>;

/// Dials the relay server at `addr`.
#[cfg(feature = "tcp")]
pub async fn connect(addr: &str) -> Result<TcpConnection, TransportError> {
    let stream = tokio::net::TcpStream::connect(addr).await.map_err(|e| {
        TransportError::ConnectFailed {
            addr: addr.to_string(),
            source: e,
        }
    })?;
    // Frames are small and latency matters more than throughput.
    if let Err(e) = stream.set_nodelay(true) {
        tracing::debug!(error = %e, "failed to set TCP_NODELAY");
    }
    let (read, write) = stream.into_split();
    let conn = LineConnection::new(read, write);
    tracing::info!(id = %conn.id(), addr, "connected to relay server");
    Ok(conn)
}

/// Reads one frame from `reader`, stripping the terminator and a trailing
/// carriage return.
///
/// A final frame that ends at end-of-stream without a terminator is still
/// returned. Returns `Ok(None)` once the stream is exhausted.
///
/// # Errors
/// [`TransportError::FrameTooLarge`] if more than `max_len` bytes arrive
/// before a terminator, [`TransportError::ReceiveFailed`] on I/O errors.
pub async fn read_frame<R>(
    reader: &mut R,
    max_len: usize,
) -> Result<Option<Vec<u8>>, TransportError>
where
    R: AsyncBufRead + Unpin,
{
    let mut frame = Vec::new();
    loop {
        let available = reader
            .fill_buf()
            .await
            .map_err(TransportError::ReceiveFailed)?;

        if available.is_empty() {
            if frame.is_empty() {
                return Ok(None);
            }
            break;
        }

        match available.iter().position(|b| *b == FRAME_TERMINATOR) {
            Some(end) => {
                if frame.len() + end > max_len {
                    return Err(TransportError::FrameTooLarge(max_len));
                }
                frame.extend_from_slice(&available[..end]);
                reader.consume(end + 1);
                break;
            }
            None => {
                let n = available.len();
                frame.extend_from_slice(available);
                reader.consume(n);
                if frame.len() > max_len {
                    return Err(TransportError::FrameTooLarge(max_len));
                }
            }
        }
    }

    if frame.last() == Some(&b'\r') {
        frame.pop();
    }
    Ok(Some(frame))
}

/// A [`Connection`] that speaks newline-terminated frames over a split
/// byte stream.
///
/// The read half and the write half sit behind separate locks, so the
/// reader loop blocking on `recv` never stalls the writer loop. `close`
/// aborts a `send` stuck on a peer that stopped reading, so closing never
/// waits on the peer.
pub struct LineConnection<R, W> {
    id: ConnectionId,
    reader: Mutex<BufReader<R>>,
    writer: Mutex<W>,
    closed: AtomicBool,
    closing: Notify,
    max_frame_len: usize,
}

impl<R, W> LineConnection<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    /// Wraps a read half and a write half into one connection.
    pub fn new(reader: R, writer: W) -> Self {
        let id =
            ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
        Self {
            id,
            reader: Mutex::new(BufReader::new(reader)),
            writer: Mutex::new(writer),
            closed: AtomicBool::new(false),
            closing: Notify::new(),
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }

    /// Overrides the inbound frame size limit.
    pub fn with_max_frame_len(mut self, max_frame_len: usize) -> Self {
        self.max_frame_len = max_frame_len;
        self
    }

    /// Returns `true` once [`Connection::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl<S> LineConnection<ReadHalf<S>, WriteHalf<S>>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    /// Splits a bidirectional stream (e.g. `tokio::io::DuplexStream`) into
    /// a connection.
    pub fn from_stream(stream: S) -> Self {
        let (read, write) = tokio::io::split(stream);
        Self::new(read, write)
    }
}

impl<R, W> Connection for LineConnection<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    type Error = TransportError;

    async fn send(&self, frame: &[u8]) -> Result<(), Self::Error> {
        let closing = self.closing.notified();
        tokio::pin!(closing);
        // Registered before the flag check so a concurrent close can't slip
        // between the two.
        closing.as_mut().enable();
        if self.is_closed() {
            return Err(TransportError::ConnectionClosed(self.id.to_string()));
        }

        let write = async {
            let mut writer = self.writer.lock().await;
            writer
                .write_all(frame)
                .await
                .map_err(TransportError::SendFailed)?;
            writer.flush().await.map_err(TransportError::SendFailed)
        };
        tokio::select! {
            result = write => result,
            () = closing => {
                tracing::debug!(id = %self.id, "send aborted by close");
                Err(TransportError::ConnectionClosed(self.id.to_string()))
            }
        }
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        let mut reader = self.reader.lock().await;
        read_frame(&mut *reader, self.max_frame_len).await
    }

    async fn close(&self) -> Result<(), Self::Error> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        tracing::debug!(id = %self.id, "closing connection");
        self.closing.notify_waiters();
        self.writer
            .lock()
            .await
            .shutdown()
            .await
            .map_err(TransportError::SendFailed)
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
