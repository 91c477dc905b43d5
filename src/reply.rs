use std::net::{Ipv4Addr, SocketAddrV4};

/// +----+----+----+----+----+----+----+----+
/// | VN | CD | DSTPORT |      DSTIP        |
/// +----+----+----+----+----+----+----+----+
///   1    1      2              4
///
/// VN is the version of the reply code and should be 0. CD is the result
/// code:
///
/// 90: request granted
/// 91: request rejected or failed
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Reply {
    Granted = 0x5a,
    Rejected = 0x5b,
}

impl Reply {
    /// Placeholder address for replies that carry no meaningful endpoint:
    /// every Rejected reply, and the Granted reply to CONNECT (the target
    /// is not echoed back). Only a BIND grant reports a real address.
    pub const UNSPECIFIED: SocketAddrV4 =
        SocketAddrV4::new(Ipv4Addr::new(0xff, 0xff, 0xff, 0xff), 0xffff);

    pub fn encode(self, bind_addr: SocketAddrV4) -> [u8; 8] {
        let port = bind_addr.port().to_be_bytes();
        let ip = bind_addr.ip().octets();

        [
            0x00, self as u8, port[0], port[1], ip[0], ip[1], ip[2], ip[3],
        ]
    }
}
