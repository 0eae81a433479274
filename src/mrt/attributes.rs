use crate::error::DecodeError;
use crate::mrt::cursor::Cursor;

const ATTR_FLAG_EXTENDED_LENGTH: u8 = 0x10;
const ATTR_TYPE_AS_PATH: u8 = 2;

const AS_SEQUENCE: u8 = 2;

/// Walks a BGP path attribute sequence looking for AS_PATH (type 2),
/// flattening every segment's ASNs into a single ordered sequence.
///
/// Every attribute carries a flags byte, a type byte, a length (one byte,
/// or two when the extended-length flag `0x10` is set), then the body.
/// Attributes other than AS_PATH are skipped whole. Four-octet ASNs only
/// (spec §4.2): this ingests dn42 dumps, which carry no legacy two-octet
/// AS_PATH attributes.
///
/// If the AS_PATH body itself is truncated mid-segment, the ASNs decoded
/// so far are still returned rather than discarding the whole path.
pub fn parse_as_path(cursor: &mut Cursor, attr_length_total: usize) -> Result<Vec<u32>, DecodeError> {
    let mut attrs = cursor.sub_cursor(attr_length_total)?;
    let mut as_path = Vec::new();

    while !attrs.is_empty() {
        let flags = match attrs.u8() {
            Ok(b) => b,
            Err(_) => break,
        };
        let attr_type = match attrs.u8() {
            Ok(b) => b,
            Err(_) => break,
        };
        let length = if flags & ATTR_FLAG_EXTENDED_LENGTH != 0 {
            match attrs.u16() {
                Ok(v) => v as usize,
                Err(_) => break,
            }
        } else {
            match attrs.u8() {
                Ok(v) => v as usize,
                Err(_) => break,
            }
        };

        if attr_type != ATTR_TYPE_AS_PATH {
            // Not interesting: skip the body, tolerating a short final
            // attribute by stopping rather than erroring.
            if attrs.take(length).is_err() {
                break;
            }
            continue;
        }

        let body = match attrs.take(length) {
            Ok(b) => b,
            Err(_) => break,
        };
        as_path.extend(parse_as_path_segments(body));
    }

    Ok(as_path)
}

fn parse_as_path_segments(body: &[u8]) -> Vec<u32> {
    let mut segs = Cursor::new(body);
    let mut asns = Vec::new();

    loop {
        // Segment type (AS_SET, AS_SEQUENCE, or a confederation variant) is
        // read and discarded: spec §4.2 flattens every segment's ASNs into a
        // single path regardless of type.
        let _seg_type = match segs.u8() {
            Ok(b) => b,
            Err(_) => break,
        };
        let seg_len = match segs.u8() {
            Ok(b) => b,
            Err(_) => break,
        };

        for _ in 0..seg_len {
            match segs.u32() {
                Ok(asn) => asns.push(asn),
                Err(_) => return asns,
            }
        }
    }

    asns
}
