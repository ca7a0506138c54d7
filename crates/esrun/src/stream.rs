//! # Stream Transport
//!
//! Carries expressions to a host listening on a byte stream: a TCP socket, or
//! the pipes of a child process.
//!
//! ## Format
//!
//! - **Request**: `[Len: 4b][Code: Len]`
//! - **Reply**: `[Status: 1b][Len: 4b][Body: Len]`
//!
//! Status `0` carries the tagged reply, status `1` the host's error message.
//! All integers are Little-Endian; all text is UTF-8.

use std::cell::RefCell;
use std::io::BufReader;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Write;
use std::net::TcpStream;
use std::net::ToSocketAddrs;

use tracing::debug;

use crate::transport;
use crate::transport::Error;
use crate::transport::Transport;

const STATUS_OK: u8 = 0;
const STATUS_RAISED: u8 = 1;

/// Replies larger than this are refused rather than buffered.
const MAX_REPLY_LEN: usize = 64 * 1024 * 1024;

/// A length-prefixed transport over a reader/writer pair.
pub struct StreamTransport<R: Read, W: Write> {
    reader: RefCell<BufReader<R>>,
    writer: RefCell<W>,
}

impl<R: Read, W: Write> StreamTransport<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: RefCell::new(BufReader::new(reader)),
            writer: RefCell::new(writer),
        }
    }

    /// Consumes the transport, returning the underlying streams.
    pub fn into_inner(self) -> (R, W) {
        (self.reader.into_inner().into_inner(), self.writer.into_inner())
    }

    fn send(&self, code: &str) -> transport::Result<()> {
        let len = u32::try_from(code.len())
            .map_err(|_| Error::Framing(format!("request of {} bytes is too large", code.len())))?;

        let mut writer = self.writer.borrow_mut();
        writer.write_all(&len.to_le_bytes()).map_err(io_error)?;
        writer.write_all(code.as_bytes()).map_err(io_error)?;
        writer.flush().map_err(io_error)
    }

    fn receive(&self) -> transport::Result<String> {
        let mut reader = self.reader.borrow_mut();

        let mut status = [0u8; 1];
        reader.read_exact(&mut status).map_err(io_error)?;

        let mut len = [0u8; 4];
        reader.read_exact(&mut len).map_err(io_error)?;
        let len = u32::from_le_bytes(len) as usize;
        if len > MAX_REPLY_LEN {
            return Err(Error::Framing(format!("reply of {} bytes exceeds the limit", len)));
        }

        let mut body = vec![0u8; len];
        reader.read_exact(&mut body).map_err(io_error)?;
        let body = String::from_utf8(body)
            .map_err(|_| Error::Framing("reply is not valid UTF-8".into()))?;

        match status[0] {
            STATUS_OK => Ok(body),
            STATUS_RAISED => Err(Error::Host(body)),
            other => Err(Error::Framing(format!("unknown status byte {:#04x}", other))),
        }
    }
}

impl StreamTransport<TcpStream, TcpStream> {
    /// Connects to a host listening on a TCP socket.
    pub fn connect(addr: impl ToSocketAddrs) -> transport::Result<Self> {
        let stream = TcpStream::connect(addr).map_err(io_error)?;
        stream.set_nodelay(true).map_err(io_error)?;
        let writer = stream.try_clone().map_err(io_error)?;
        debug!(peer = ?stream.peer_addr().ok(), "connected to host");
        Ok(Self::new(stream, writer))
    }
}

impl<R: Read, W: Write> Transport for StreamTransport<R, W> {
    fn execute(&self, code: &str) -> transport::Result<String> {
        self.send(code)?;
        self.receive()
    }
}

fn io_error(e: std::io::Error) -> Error {
    match e.kind() {
        ErrorKind::UnexpectedEof | ErrorKind::BrokenPipe | ErrorKind::ConnectionReset => {
            Error::ConnectionLost(e.to_string())
        }
        _ => Error::Io(e.to_string()),
    }
}
