//! Core data model: ASNs, routes, nodes and the snapshot graph (spec §3).

mod asn;
mod graph;
mod route;

pub use asn::{default_description, Asn};
pub use graph::{Centrality, Link, Metadata, Node, Snapshot};
pub use route::Route;
