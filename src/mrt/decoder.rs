use std::collections::HashMap;

use crate::error::DecodeError;
use crate::models::Route;
use crate::mrt::attributes::parse_as_path;
use crate::mrt::cursor::Cursor;
use crate::mrt::header::{parse_common_header, subtype, TABLE_DUMP_V2};

/// Everything a single MRT blob (one address family's RIB dump) yields.
#[derive(Debug, Default, Clone)]
pub struct DecodeResult {
    /// One flattened AS_PATH per RIB entry that had one, in dump order.
    pub as_paths: Vec<Vec<u32>>,
    /// Prefixes originated by each AS, keyed by the path's last hop.
    pub advertises: HashMap<u32, Vec<Route>>,
    /// Timestamp of the first record seen, used as the snapshot's data
    /// timestamp (spec §3 Metadata).
    pub first_timestamp: Option<u64>,
}

impl DecodeResult {
    fn note_timestamp(&mut self, timestamp: u32) {
        if self.first_timestamp.is_none() {
            self.first_timestamp = Some(timestamp as u64);
        }
    }

    fn note_origin(&mut self, origin: u32, route: Route) {
        let routes = self.advertises.entry(origin).or_default();
        if !routes.contains(&route) {
            routes.push(route);
        }
    }

    /// Combines the IPv4 and IPv6 decode results of one generation run into
    /// a single result, keeping the earlier of the two first-timestamps.
    pub fn merge(mut self, other: DecodeResult) -> DecodeResult {
        self.as_paths.extend(other.as_paths);
        for (origin, routes) in other.advertises {
            let entry = self.advertises.entry(origin).or_default();
            for route in routes {
                if !entry.contains(&route) {
                    entry.push(route);
                }
            }
        }
        self.first_timestamp = match (self.first_timestamp, other.first_timestamp) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, None) => a,
            (None, b) => b,
        };
        self
    }
}

/// Decodes a whole decompressed MRT stream (one or more concatenated
/// `TABLE_DUMP_V2` records) into a [`DecodeResult`].
///
/// Unrecognized subtypes (anything other than the four unicast RIB
/// subtypes this crate supports) are skipped by their declared length
/// rather than treated as fatal, matching the teacher's posture of
/// tolerating unknown MRT content in a stream it otherwise understands.
/// Only a structurally short read -- a header or RIB-entry field that runs
/// past the end of the blob -- is an error.
pub fn decode(data: &[u8]) -> Result<DecodeResult, DecodeError> {
    let mut cursor = Cursor::new(data);
    let mut result = DecodeResult::default();

    while !cursor.is_empty() {
        let header = parse_common_header(&mut cursor)?;
        result.note_timestamp(header.timestamp);
        let mut body = cursor.sub_cursor(header.length as usize)?;

        if header.entry_type != TABLE_DUMP_V2 {
            continue;
        }

        match header.entry_subtype {
            subtype::PEER_INDEX_TABLE => continue,
            subtype::RIB_IPV4_UNICAST => decode_rib(&mut body, false, &mut result, 4)?,
            subtype::RIB_IPV6_UNICAST => decode_rib(&mut body, false, &mut result, 16)?,
            subtype::RIB_IPV4_UNICAST_ADDPATH => decode_rib(&mut body, true, &mut result, 4)?,
            subtype::RIB_IPV6_UNICAST_ADDPATH => decode_rib(&mut body, true, &mut result, 16)?,
            _ => continue,
        }
    }

    Ok(result)
}

/// Decodes one `RIB_IPv{4,6}_UNICAST[_ADDPATH]` record body:
///
/// ```text
/// Sequence Number (4 bytes)
/// Prefix Length   (1 byte)
/// Prefix          (ceil(Prefix Length / 8) bytes)
/// Entry Count     (2 bytes)
/// RIB Entries
/// ```
///
/// Each RIB entry is:
///
/// ```text
/// [Path Identifier (4 bytes, ADDPATH subtypes only)]
/// Peer Index       (2 bytes)
/// Originated Time  (4 bytes)
/// Attribute Length (2 bytes)
/// BGP Attributes
/// ```
fn decode_rib(
    body: &mut Cursor,
    addpath: bool,
    result: &mut DecodeResult,
    addr_bytes: usize,
) -> Result<(), DecodeError> {
    let _sequence_number = body.u32()?;
    let prefix_len = body.u8()?;
    let prefix_byte_len = ((prefix_len as usize) + 7) / 8;
    if prefix_byte_len > addr_bytes {
        return Err(DecodeError::InvalidPrefixLength(prefix_len));
    }
    let prefix_bytes = body.take(prefix_byte_len)?;
    let route = build_route(prefix_bytes, prefix_len, addr_bytes);

    let entry_count = body.u16()?;

    for _ in 0..entry_count {
        if addpath {
            let _path_id = body.u32()?;
        }
        let _peer_index = body.u16()?;
        let _originated_time = body.u32()?;
        let attr_length = body.u16()? as usize;

        let as_path = parse_as_path(body, attr_length)?;
        if let Some(&origin) = as_path.last() {
            result.as_paths.push(as_path);
            result.note_origin(origin, route);
        }
    }

    Ok(())
}

fn build_route(prefix_bytes: &[u8], prefix_len: u8, addr_bytes: usize) -> Route {
    if addr_bytes == 4 {
        let mut buf = [0u8; 4];
        buf[..prefix_bytes.len()].copy_from_slice(prefix_bytes);
        Route::V4 {
            addr: u32::from_be_bytes(buf),
            len: prefix_len,
        }
    } else {
        let mut buf = [0u8; 16];
        buf[..prefix_bytes.len()].copy_from_slice(prefix_bytes);
        Route::V6 {
            addr: [
                u32::from_be_bytes(buf[0..4].try_into().unwrap()),
                u32::from_be_bytes(buf[4..8].try_into().unwrap()),
                u32::from_be_bytes(buf[8..12].try_into().unwrap()),
                u32::from_be_bytes(buf[12..16].try_into().unwrap()),
            ],
            len: prefix_len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_sequence(asns: &[u32]) -> Vec<u8> {
        let mut out = vec![2u8, asns.len() as u8];
        for asn in asns {
            out.extend(asn.to_be_bytes());
        }
        out
    }

    fn rib_entry(peer_index: u16, originated_time: u32, as_path: &[u32]) -> Vec<u8> {
        let attrs = {
            let body = as_sequence(as_path);
            let mut a = vec![0u8, 2u8, body.len() as u8];
            a.extend(body);
            a
        };
        let mut out = Vec::new();
        out.extend(peer_index.to_be_bytes());
        out.extend(originated_time.to_be_bytes());
        out.extend((attrs.len() as u16).to_be_bytes());
        out.extend(attrs);
        out
    }

    fn table_dump_v2_v4(timestamp: u32, prefix: [u8; 4], prefix_len: u8, entries: &[Vec<u8>]) -> Vec<u8> {
        let prefix_byte_len = ((prefix_len as usize) + 7) / 8;
        let mut rib_body = Vec::new();
        rib_body.extend(0u32.to_be_bytes()); // sequence number
        rib_body.push(prefix_len);
        rib_body.extend(&prefix[..prefix_byte_len]);
        rib_body.extend((entries.len() as u16).to_be_bytes());
        for e in entries {
            rib_body.extend(e);
        }

        let mut out = Vec::new();
        out.extend(timestamp.to_be_bytes());
        out.extend(TABLE_DUMP_V2.to_be_bytes());
        out.extend(subtype::RIB_IPV4_UNICAST.to_be_bytes());
        out.extend((rib_body.len() as u32).to_be_bytes());
        out.extend(rib_body);
        out
    }

    #[test]
    fn decodes_single_v4_entry_and_records_origin() {
        let entry = rib_entry(0, 100, &[65001, 65002]);
        let blob = table_dump_v2_v4(100, [10, 0, 0, 0], 24, &[entry]);
        let result = decode(&blob).unwrap();
        assert_eq!(result.as_paths, vec![vec![65001, 65002]]);
        assert_eq!(result.first_timestamp, Some(100));
        let routes = result.advertises.get(&65002).unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].prefix_len(), 24);
    }

    #[test]
    fn dedups_repeated_origin_prefix_pairs() {
        let entries = vec![
            rib_entry(0, 100, &[65001, 65002]),
            rib_entry(1, 100, &[65003, 65002]),
        ];
        let blob = table_dump_v2_v4(100, [10, 0, 0, 0], 24, &entries);
        let result = decode(&blob).unwrap();
        assert_eq!(result.advertises.get(&65002).unwrap().len(), 1);
    }

    #[test]
    fn unknown_subtype_is_skipped_not_fatal() {
        let mut blob = Vec::new();
        blob.extend(1u32.to_be_bytes());
        blob.extend(TABLE_DUMP_V2.to_be_bytes());
        blob.extend(99u16.to_be_bytes()); // unknown subtype
        blob.extend(2u32.to_be_bytes());
        blob.extend([0xAB, 0xCD]);
        assert!(decode(&blob).unwrap().as_paths.is_empty());
    }

    #[test]
    fn first_timestamp_comes_from_the_leading_peer_index_table() {
        // Real TABLE_DUMP_V2 dumps open with a PEER_INDEX_TABLE record,
        // which carries no RIB entries of its own but still has a header
        // timestamp that must be the one retained (spec §3 invariant 7).
        let mut blob = Vec::new();
        blob.extend(50u32.to_be_bytes());
        blob.extend(TABLE_DUMP_V2.to_be_bytes());
        blob.extend(subtype::PEER_INDEX_TABLE.to_be_bytes());
        blob.extend(2u32.to_be_bytes());
        blob.extend([0x00, 0x00]);

        let entry = rib_entry(0, 100, &[65001, 65002]);
        blob.extend(table_dump_v2_v4(100, [10, 0, 0, 0], 24, &[entry]));

        let result = decode(&blob).unwrap();
        assert_eq!(result.first_timestamp, Some(50));
    }
}
