/*!
A minimal DNS-over-UDP client for resolving a single A record against one
explicitly configured server (spec §4.1, §6 "optional custom DNS").

This isn't a general resolver: no retries, no AAAA/CNAME-chain following, no
system `/etc/resolv.conf` fallback. It exists only to answer "what IPv4
address does this dn42 collector hostname have, according to *this*
server", matching the narrow knob the original Go implementation's custom
`net.Resolver.Dial` override exposes. Keeping it hand-rolled here mirrors
this crate's MRT decoder: a small, bounds-checked wire-format reader rather
than an extra dependency for a single query type.
*/
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug)]
pub enum DnsError {
    Io(std::io::Error),
    NoAnswer,
    Malformed(&'static str),
}

impl fmt::Display for DnsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnsError::Io(e) => write!(f, "{e}"),
            DnsError::NoAnswer => write!(f, "no A record in response"),
            DnsError::Malformed(s) => write!(f, "malformed DNS response: {s}"),
        }
    }
}

impl From<std::io::Error> for DnsError {
    fn from(e: std::io::Error) -> Self {
        DnsError::Io(e)
    }
}

const TYPE_A: u16 = 1;
const CLASS_IN: u16 = 1;

/// Resolves `host`'s first IPv4 address by sending one A-record query to
/// `server` and reading the reply, bounded by `timeout`.
pub fn resolve_a(server: SocketAddr, host: &str, timeout: Duration) -> Result<Ipv4Addr, DnsError> {
    let socket = UdpSocket::bind(("0.0.0.0", 0))?;
    socket.set_read_timeout(Some(timeout))?;
    socket.set_write_timeout(Some(timeout))?;
    socket.connect(server)?;

    let id = transaction_id();
    let query = build_query(id, host);
    socket.send(&query)?;

    let mut buf = [0u8; 512];
    let n = socket.recv(&mut buf)?;
    parse_response(&buf[..n], id)
}

fn transaction_id() -> u16 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    (nanos ^ (std::process::id())) as u16
}

fn build_query(id: u16, host: &str) -> Vec<u8> {
    let mut packet = Vec::with_capacity(16 + host.len());
    packet.extend(id.to_be_bytes());
    packet.extend(0x0100u16.to_be_bytes()); // flags: recursion desired
    packet.extend(1u16.to_be_bytes()); // qdcount
    packet.extend(0u16.to_be_bytes()); // ancount
    packet.extend(0u16.to_be_bytes()); // nscount
    packet.extend(0u16.to_be_bytes()); // arcount

    for label in host.trim_end_matches('.').split('.') {
        packet.push(label.len() as u8);
        packet.extend(label.as_bytes());
    }
    packet.push(0); // root label

    packet.extend(TYPE_A.to_be_bytes());
    packet.extend(CLASS_IN.to_be_bytes());
    packet
}

fn parse_response(data: &[u8], expected_id: u16) -> Result<Ipv4Addr, DnsError> {
    if data.len() < 12 {
        return Err(DnsError::Malformed("short header"));
    }
    let id = u16::from_be_bytes([data[0], data[1]]);
    if id != expected_id {
        return Err(DnsError::Malformed("transaction id mismatch"));
    }
    let qdcount = u16::from_be_bytes([data[4], data[5]]) as usize;
    let ancount = u16::from_be_bytes([data[6], data[7]]) as usize;

    let mut pos = 12;
    for _ in 0..qdcount {
        pos = skip_name(data, pos)?;
        pos += 4; // qtype + qclass
    }

    for _ in 0..ancount {
        pos = skip_name(data, pos)?;
        if pos + 10 > data.len() {
            return Err(DnsError::Malformed("truncated answer header"));
        }
        let rtype = u16::from_be_bytes([data[pos], data[pos + 1]]);
        let rclass = u16::from_be_bytes([data[pos + 2], data[pos + 3]]);
        let rdlength = u16::from_be_bytes([data[pos + 8], data[pos + 9]]) as usize;
        pos += 10;
        if pos + rdlength > data.len() {
            return Err(DnsError::Malformed("truncated rdata"));
        }
        if rtype == TYPE_A && rclass == CLASS_IN && rdlength == 4 {
            return Ok(Ipv4Addr::new(
                data[pos],
                data[pos + 1],
                data[pos + 2],
                data[pos + 3],
            ));
        }
        pos += rdlength;
    }

    Err(DnsError::NoAnswer)
}

/// Advances past one (possibly compressed) DNS name, returning the offset
/// just after it. Compression pointers (the `0xC0` prefix, RFC 1035 §4.1.4)
/// only ever appear as the final component in a query/response built by a
/// well-behaved server for our own single-question query, so a pointer
/// simply ends the name here rather than requiring a jump-and-follow loop.
fn skip_name(data: &[u8], mut pos: usize) -> Result<usize, DnsError> {
    loop {
        if pos >= data.len() {
            return Err(DnsError::Malformed("name runs past end of packet"));
        }
        let len = data[pos];
        if len & 0xC0 == 0xC0 {
            if pos + 1 >= data.len() {
                return Err(DnsError::Malformed("truncated name pointer"));
            }
            return Ok(pos + 2);
        }
        if len == 0 {
            return Ok(pos + 1);
        }
        pos += 1 + len as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_wire_format_question() {
        let query = build_query(0x1234, "example.dn42");
        assert_eq!(&query[0..2], &[0x12, 0x34]);
        assert_eq!(query[12], 7); // "example".len()
        assert_eq!(&query[13..20], b"example");
        assert_eq!(query[20], 4); // "dn42".len()
        assert_eq!(&query[21..25], b"dn42");
        assert_eq!(query[25], 0); // root label
    }

    #[test]
    fn parses_a_record_response() {
        let mut resp = Vec::new();
        resp.extend(0x1234u16.to_be_bytes()); // id
        resp.extend(0x8180u16.to_be_bytes()); // flags: response, recursion available
        resp.extend(1u16.to_be_bytes()); // qdcount
        resp.extend(1u16.to_be_bytes()); // ancount
        resp.extend(0u16.to_be_bytes());
        resp.extend(0u16.to_be_bytes());
        resp.push(7);
        resp.extend(b"example");
        resp.push(4);
        resp.extend(b"dn42");
        resp.push(0);
        resp.extend(TYPE_A.to_be_bytes());
        resp.extend(CLASS_IN.to_be_bytes());
        // answer: pointer back to the question's name
        resp.extend([0xC0, 0x0C]);
        resp.extend(TYPE_A.to_be_bytes());
        resp.extend(CLASS_IN.to_be_bytes());
        resp.extend(300u32.to_be_bytes()); // ttl
        resp.extend(4u16.to_be_bytes()); // rdlength
        resp.extend([172, 20, 0, 1]);

        let ip = parse_response(&resp, 0x1234).unwrap();
        assert_eq!(ip, Ipv4Addr::new(172, 20, 0, 1));
    }

    #[test]
    fn mismatched_transaction_id_is_rejected() {
        let mut resp = vec![0u8; 12];
        resp[0] = 0x00;
        resp[1] = 0x01;
        assert!(matches!(parse_response(&resp, 0x1234), Err(DnsError::Malformed(_))));
    }
}
