// UDP/TCP server and client send helpers. Explicitly out of scope per
// spec.md 1 ("no server/resolver built in") but kept present as a thin
// shim, grounded on the teacher's `main.rs` single-shot UDP loop (bind,
// recv_from, parse, respond, send_to) and `recursive/mod.rs`'s
// `query_nameserver` (connect, send, recv with a fixed-size buffer) for the
// client side. `socket2` supplies the `SO_REUSEPORT` bind the teacher
// depends on but never exercises; `tracing` replaces the teacher's
// `println!` instrumentation per spec.md 9's ambient-logging note.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};

use crate::config::ServerConfig;
use crate::message::Message;

const MAX_UDP_DATAGRAM: usize = 4096;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Binds a UDP socket per `config`, applying `SO_REUSEPORT` first if asked.
pub fn bind_udp(config: &ServerConfig) -> io::Result<UdpSocket> {
    let addr: SocketAddr = config.socket_addr().parse().map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "bad listen address"))?;
    let socket = Socket::new(Domain::ipv4(), Type::dgram(), Some(Protocol::udp()))?;
    socket.set_reuse_address(true)?;
    if config.reuseport {
        #[cfg(unix)]
        socket.set_reuse_port(true)?;
    }
    socket.bind(&addr.into())?;
    Ok(socket.into_udp_socket())
}

/// Binds a TCP listener per `config`, applying `SO_REUSEPORT` first if asked.
pub fn bind_tcp(config: &ServerConfig) -> io::Result<TcpListener> {
    let addr: SocketAddr = config.socket_addr().parse().map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "bad listen address"))?;
    let socket = Socket::new(Domain::ipv4(), Type::stream(), Some(Protocol::tcp()))?;
    socket.set_reuse_address(true)?;
    if config.reuseport {
        #[cfg(unix)]
        socket.set_reuse_port(true)?;
    }
    socket.bind(&addr.into())?;
    socket.listen(128)?;
    Ok(socket.into_tcp_listener())
}

/// Receives one UDP datagram, parses it, hands it to `handler`, and replies.
/// A malformed datagram is logged and dropped rather than returned as an
/// error, so a single bad packet never brings the loop down.
pub fn serve_udp_once(socket: &UdpSocket, handler: impl FnOnce(&Message) -> Message) -> io::Result<()> {
    let mut buf = [0u8; MAX_UDP_DATAGRAM];
    let (amt, src) = socket.recv_from(&mut buf)?;
    let packet = match Message::parse(&buf[..amt]) {
        Ok(packet) => packet,
        Err(e) => {
            tracing::error!(error = %e, from = %src, "failed to parse incoming DNS datagram");
            return Ok(());
        }
    };
    tracing::debug!(from = %src, id = packet.header.id, "received query");
    let response = handler(&packet);
    let bytes = match response.pack() {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "failed to encode DNS response");
            return Ok(());
        }
    };
    socket.send_to(&bytes, src)?;
    Ok(())
}

/// Runs `serve_udp_once` forever, logging and continuing past I/O errors.
pub fn serve_udp_loop(socket: &UdpSocket, handler: impl Fn(&Message) -> Message) -> ! {
    tracing::info!(addr = ?socket.local_addr().ok(), "serving UDP");
    loop {
        if let Err(e) = serve_udp_once(socket, &handler) {
            tracing::error!(error = %e, "UDP serve loop I/O error");
        }
    }
}

/// Accepts one TCP connection, reads its 2-byte length-prefixed query,
/// hands it to `handler`, and writes back a 2-byte length-prefixed reply,
/// per RFC 1035 4.2.2.
pub fn handle_tcp_connection(mut stream: TcpStream, handler: impl FnOnce(&Message) -> Message) -> io::Result<()> {
    use std::io::{Read, Write};

    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf)?;
    let len = u16::from_be_bytes(len_buf) as usize;

    let mut body = vec![0u8; len];
    stream.read_exact(&mut body)?;

    let packet = match Message::parse(&body) {
        Ok(packet) => packet,
        Err(e) => {
            tracing::error!(error = %e, "failed to parse incoming TCP DNS query");
            return Ok(());
        }
    };
    let response = handler(&packet);
    let bytes = response.pack().map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    stream.write_all(&(bytes.len() as u16).to_be_bytes())?;
    stream.write_all(&bytes)?;
    Ok(())
}

/// Accepts connections forever, handling each one synchronously before
/// moving to the next (no worker pool; a thin shim, not a production
/// server per spec.md 1's non-goals).
pub fn serve_tcp_loop(listener: &TcpListener, handler: impl Fn(&Message) -> Message) -> ! {
    tracing::info!(addr = ?listener.local_addr().ok(), "serving TCP");
    loop {
        match listener.accept() {
            Ok((stream, peer)) => {
                tracing::debug!(from = %peer, "accepted TCP connection");
                if let Err(e) = handle_tcp_connection(stream, &handler) {
                    tracing::error!(error = %e, from = %peer, "TCP connection error");
                }
            }
            Err(e) => tracing::error!(error = %e, "TCP accept error"),
        }
    }
}

/// Sends `query` to `server` over UDP and waits for one reply, timing out
/// after `timeout`. Mirrors the teacher's `query_nameserver`: an ephemeral
/// socket, `connect`, `send`, a fixed-size `recv` buffer.
pub fn send_query(query: &Message, server: impl ToSocketAddrs, timeout: Duration) -> Result<Message, DnsSendError> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.set_read_timeout(Some(timeout))?;
    socket.connect(server)?;
    let bytes = query.pack().map_err(DnsSendError::Dns)?;
    socket.send(&bytes)?;
    let mut buf = [0u8; MAX_UDP_DATAGRAM];
    let amt = socket.recv(&mut buf)?;
    Message::parse(&buf[..amt]).map_err(DnsSendError::Dns)
}

pub fn send_query_default_timeout(query: &Message, server: impl ToSocketAddrs) -> Result<Message, DnsSendError> {
    send_query(query, server, DEFAULT_TIMEOUT)
}

/// Sends `query` to `server` over TCP with 2-byte length-prefix framing,
/// used for truncated (`tc` bit set) UDP responses or by callers that
/// always prefer TCP.
pub fn send_query_tcp(query: &Message, server: impl ToSocketAddrs, timeout: Duration) -> Result<Message, DnsSendError> {
    use std::io::{Read, Write};

    let mut stream = TcpStream::connect(server)?;
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;

    let bytes = query.pack().map_err(DnsSendError::Dns)?;
    stream.write_all(&(bytes.len() as u16).to_be_bytes())?;
    stream.write_all(&bytes)?;

    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf)?;
    let len = u16::from_be_bytes(len_buf) as usize;
    let mut body = vec![0u8; len];
    stream.read_exact(&mut body)?;
    Message::parse(&body).map_err(DnsSendError::Dns)
}

#[derive(thiserror::Error, Debug)]
pub enum DnsSendError {
    #[error("I/O error talking to DNS server: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dns(#[from] crate::error::DnsError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::DnsClass;
    use crate::rcode::RCode;
    use crate::rrtype::RrType;

    #[test]
    fn udp_round_trip_through_the_serve_and_send_helpers() {
        let server_socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        let addr = server_socket.local_addr().unwrap();

        let query = Message::question("example.com", RrType::A.to_u16(), DnsClass::IN.to_u16());
        let bytes = query.pack().unwrap();

        let client = UdpSocket::bind("127.0.0.1:0").unwrap();
        client.send_to(&bytes, addr).unwrap();

        serve_udp_once(&server_socket, |req| {
            let mut reply = req.reply();
            reply.header.set_rcode(RCode::NoError);
            reply
        })
        .unwrap();

        client.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        let mut buf = [0u8; MAX_UDP_DATAGRAM];
        let amt = client.recv(&mut buf).unwrap();
        let reply = Message::parse(&buf[..amt]).unwrap();
        assert!(reply.header.qr);
        assert_eq!(reply.header.id, query.header.id);
    }

    #[test]
    fn tcp_round_trip_through_the_handle_and_send_helpers() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            handle_tcp_connection(stream, |req| req.reply()).unwrap();
        });

        let query = Message::question("example.com", RrType::A.to_u16(), DnsClass::IN.to_u16());
        let reply = send_query_tcp(&query, addr, Duration::from_secs(2)).unwrap();
        assert!(reply.header.qr);
        handle.join().unwrap();
    }
}
