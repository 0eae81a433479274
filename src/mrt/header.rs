use crate::error::DecodeError;
use crate::mrt::cursor::Cursor;

/// MRT common header (12 bytes, all fields big-endian), RFC 6396 §4.1:
///
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                           Timestamp                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |             Type              |            Subtype           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                             Length                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonHeader {
    pub timestamp: u32,
    pub entry_type: u16,
    pub entry_subtype: u16,
    pub length: u32,
}

/// MRT entry type for a full routing-table snapshot (spec GLOSSARY).
pub const TABLE_DUMP_V2: u16 = 13;

pub mod subtype {
    pub const PEER_INDEX_TABLE: u16 = 1;
    pub const RIB_IPV4_UNICAST: u16 = 2;
    pub const RIB_IPV6_UNICAST: u16 = 4;
    pub const RIB_IPV4_UNICAST_ADDPATH: u16 = 8;
    pub const RIB_IPV6_UNICAST_ADDPATH: u16 = 10;
}

pub fn parse_common_header(cursor: &mut Cursor) -> Result<CommonHeader, DecodeError> {
    let timestamp = cursor.u32()?;
    let entry_type = cursor.u16()?;
    let entry_subtype = cursor.u16()?;
    let length = cursor.u32()?;
    Ok(CommonHeader {
        timestamp,
        entry_type,
        entry_subtype,
        length,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_fields_in_network_order() {
        let bytes = [
            0, 0, 0, 1, // timestamp
            0, 13, // type = TABLE_DUMP_V2
            0, 2, // subtype = RIB_IPV4_UNICAST
            0, 0, 0, 20, // length
        ];
        let mut cursor = Cursor::new(&bytes);
        let header = parse_common_header(&mut cursor).unwrap();
        assert_eq!(header.timestamp, 1);
        assert_eq!(header.entry_type, TABLE_DUMP_V2);
        assert_eq!(header.entry_subtype, subtype::RIB_IPV4_UNICAST);
        assert_eq!(header.length, 20);
    }
}
