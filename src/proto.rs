//! Generated protobuf bindings for the snapshot wire format.
//!
//! The `.proto` source lives at `proto/dn42_map.proto`; `build.rs` compiles
//! it with `prost-build` into `OUT_DIR` and this module pulls the generated
//! code in verbatim. Field tags and wire types are fixed by that file and
//! must not be renumbered without a compatibility review, since captured
//! fixtures are compared byte-for-byte in tests.
include!(concat!(env!("OUT_DIR"), "/dn42map.rs"));
