/*!
dn42-map: turns periodic MRT RIB dumps from the dn42 network into an
annotated AS-peering graph with centrality-based rankings, published over
HTTP as length-delimited protobuf and JSON.

The pipeline, end to end:

1. [`fetch`] retrieves the IPv4 and IPv6 master RIB dumps concurrently.
2. [`mrt`] decodes each `TABLE_DUMP_V2` blob into AS_PATHs and originated
   routes.
3. [`registry`] resolves a human-readable description per ASN from the
   dn42 registry's `aut-num` objects.
4. [`graphbuild`] assembles the deduplicated node/link graph.
5. [`centrality`] computes degree, betweenness, closeness and a composite
   ranking index over that graph.
6. [`publish`] atomically swaps in the new snapshot and writes it to disk.
7. [`serve`] (feature `api`) exposes the snapshot over HTTP.

[`pipeline::Pipeline`] wires stages 1-6 together behind a single-flight
generation guard.
*/

pub mod centrality;
pub mod config;
pub mod error;
pub mod fetch;
pub mod graphbuild;
pub mod models;
pub mod mrt;
pub mod pipeline;
pub mod proto;
pub mod registry;
pub mod publish;

#[cfg(feature = "api")]
pub mod serve;

pub use config::Config;
pub use error::GenerateError;
pub use pipeline::Pipeline;
