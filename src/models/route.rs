use std::fmt::{self, Display, Formatter};
use std::net::{Ipv4Addr, Ipv6Addr};

use ipnet::{Ipv4Net, Ipv6Net};

use crate::proto;

/// An IP prefix advertised by a single originating AS (spec §3).
///
/// Replaces the original Go implementation's `any`-typed `IPValue` field
/// with the tagged variant the design notes (§9) call for: family is part
/// of the type, not a side-band string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    V4 { addr: u32, len: u8 },
    V6 { addr: [u32; 4], len: u8 },
}

impl Route {
    /// Length in bits (`0..=32` for v4, `0..=128` for v6).
    pub fn prefix_len(&self) -> u8 {
        match self {
            Route::V4 { len, .. } => *len,
            Route::V6 { len, .. } => *len,
        }
    }

    pub fn to_proto(self) -> proto::Route {
        match self {
            Route::V4 { addr, len } => proto::Route {
                length: len as u32,
                ip: Some(proto::route::Ip::Ipv4(addr)),
            },
            Route::V6 { addr, len } => proto::Route {
                length: len as u32,
                ip: Some(proto::route::Ip::Ipv6(proto::Ipv6 {
                    high_h32: addr[0],
                    high_l32: addr[1],
                    low_h32: addr[2],
                    low_l32: addr[3],
                })),
            },
        }
    }

    pub fn from_proto(route: &proto::Route) -> Option<Route> {
        match route.ip.as_ref()? {
            proto::route::Ip::Ipv4(addr) => Some(Route::V4 {
                addr: *addr,
                len: route.length as u8,
            }),
            proto::route::Ip::Ipv6(v6) => Some(Route::V6 {
                addr: [v6.high_h32, v6.high_l32, v6.low_h32, v6.low_l32],
                len: route.length as u8,
            }),
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Route::V4 { addr, len } => {
                let net = Ipv4Net::new(Ipv4Addr::from(*addr), (*len).min(32))
                    .unwrap_or_else(|_| Ipv4Net::new(Ipv4Addr::from(*addr), 32).unwrap());
                write!(f, "{net}")
            }
            Route::V6 { addr, len } => {
                let mut bytes = [0u8; 16];
                bytes[0..4].copy_from_slice(&addr[0].to_be_bytes());
                bytes[4..8].copy_from_slice(&addr[1].to_be_bytes());
                bytes[8..12].copy_from_slice(&addr[2].to_be_bytes());
                bytes[12..16].copy_from_slice(&addr[3].to_be_bytes());
                let net = Ipv6Net::new(Ipv6Addr::from(bytes), (*len).min(128))
                    .unwrap_or_else(|_| Ipv6Net::new(Ipv6Addr::from(bytes), 128).unwrap());
                write!(f, "{net}")
            }
        }
    }
}
