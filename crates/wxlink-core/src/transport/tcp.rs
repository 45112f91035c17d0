use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use log::{debug, trace};

use super::Transport;
use super::error::TransportError;

/// Default connect/read/write timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Responses are read with a single call into a buffer of this size.
pub const RESPONSE_BUFFER_SIZE: usize = 1024;

/// Blocking TCP link to a gateway; one request, one read, per exchange.
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
    peer: SocketAddr,
}

impl TcpTransport {
    /// Resolve `addr` (`host:port`) and connect with `timeout` applied to
    /// connect, read and write.
    pub fn connect(addr: &str, timeout: Duration) -> Result<Self, TransportError> {
        let peer = addr
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| TransportError::Resolve {
                addr: addr.to_string(),
            })?;
        let stream =
            TcpStream::connect_timeout(&peer, timeout).map_err(TransportError::io("connect"))?;
        stream
            .set_read_timeout(Some(timeout))
            .map_err(TransportError::io("set read timeout"))?;
        stream
            .set_write_timeout(Some(timeout))
            .map_err(TransportError::io("set write timeout"))?;
        debug!("connected to gateway {peer}");
        Ok(Self { stream, peer })
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
}

impl Transport for TcpTransport {
    fn exchange(&mut self, request: &[u8]) -> Result<Vec<u8>, TransportError> {
        trace!("-> {} {:02X?}", self.peer, request);
        self.stream
            .write_all(request)
            .map_err(TransportError::io("write request"))?;

        let mut buf = [0u8; RESPONSE_BUFFER_SIZE];
        let read = self
            .stream
            .read(&mut buf)
            .map_err(TransportError::io("read response"))?;
        if read == 0 {
            return Err(TransportError::Closed);
        }
        trace!("<- {} {:02X?}", self.peer, &buf[..read]);
        Ok(buf[..read].to_vec())
    }
}
