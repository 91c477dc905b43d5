use std::net::{Ipv4Addr, SocketAddrV4};

use crate::{command::Command, error::Error};

/// +----+----+----+----+----+----+----+----+----+----+....+----+
/// | VN | CD | DSTPORT |      DSTIP        | USERID       |NULL|
/// +----+----+----+----+----+----+----+----+----+----+....+----+
///    1    1      2              4           variable       1
///
/// VN is the SOCKS protocol version number and should be 4. CD is the
/// SOCKS command code, 1 for CONNECT and 2 for BIND.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SocksRequest {
    pub version: u8,
    pub command: Command,
    pub addr: SocketAddrV4,
}

impl SocksRequest {
    /// Decodes the first 8 bytes of a client's initial read. The version
    /// byte is parsed but its value is not checked; the variable-length
    /// user id after byte 8 is left untouched.
    pub fn decode(buf: &[u8]) -> Result<Self, Error> {
        if buf.len() < 8 {
            return Err(Error::MalformedRequest(buf.len()));
        }

        let port = u16::from_be_bytes([buf[2], buf[3]]);
        let ip = Ipv4Addr::new(buf[4], buf[5], buf[6], buf[7]);

        Ok(Self {
            version: buf[0],
            command: Command::from(buf[1]),
            addr: SocketAddrV4::new(ip, port),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_every_short_buffer() {
        let buf = [0x04, 0x01, 0x00, 0x50, 0x7f, 0x00, 0x00, 0x01];
        for len in 0..8 {
            match SocksRequest::decode(&buf[..len]) {
                Err(Error::MalformedRequest(n)) => assert_eq!(n, len),
                other => panic!("expected MalformedRequest, got {:?}", other),
            }
        }
    }

    #[test]
    fn decodes_connect_request() {
        let req = SocksRequest::decode(&[0x04, 0x01, 0x00, 0x50, 0x7f, 0x00, 0x00, 0x01]).unwrap();
        assert_eq!(req.version, 0x04);
        assert_eq!(req.command, Command::Connect);
        assert_eq!(req.addr, SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 80));
    }

    #[test]
    fn decodes_big_endian_port() {
        let req = SocksRequest::decode(&[0x04, 0x02, 0x1f, 0x90, 0x0a, 0x00, 0x00, 0x05]).unwrap();
        assert_eq!(req.command, Command::Bind);
        assert_eq!(req.addr.port(), 8080);
        assert_eq!(*req.addr.ip(), Ipv4Addr::new(10, 0, 0, 5));
    }

    #[test]
    fn version_byte_is_not_checked() {
        let req = SocksRequest::decode(&[0x00, 0x01, 0x00, 0x50, 0x7f, 0x00, 0x00, 0x01]).unwrap();
        assert_eq!(req.version, 0x00);
        assert_eq!(req.command, Command::Connect);
    }

    #[test]
    fn trailing_user_id_is_ignored() {
        let mut buf = vec![0x04, 0x01, 0x00, 0x50, 0x7f, 0x00, 0x00, 0x01];
        buf.extend_from_slice(b"somebody"); // no null terminator either
        let req = SocksRequest::decode(&buf).unwrap();
        assert_eq!(req.addr, SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 80));
    }
}
