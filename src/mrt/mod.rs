//! MRT `TABLE_DUMP_V2` decoding (spec §4.2).
//!
//! A decompressed MRT blob goes in, a [`decoder::DecodeResult`] comes out:
//! every AS_PATH seen and, per originating ASN, the prefixes it announced.

mod attributes;
mod cursor;
mod decoder;
mod header;

pub use decoder::{decode, DecodeResult};
