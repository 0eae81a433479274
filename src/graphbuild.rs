/*!
AS graph construction (spec §4.4).

Grounded in the original implementation's `graph.BuildGraph`: collect
every ASN mentioned in an AS_PATH, sort it into a dense index space,
attach descriptions and originated routes, then walk each AS_PATH again
turning consecutive hops into deduplicated directed links (skipping
self-loops, which occur when an AS prepends itself). Node identity is
the sorted-ASN arena the design notes (§9) prescribe, replacing the
original's ASN-keyed maps with plain `Vec` indices.
*/
use std::collections::{HashMap, HashSet};

use crate::centrality::{self, CentralityGraph};
use crate::models::{Asn, Link, Metadata, Node, Route, Snapshot};
use crate::mrt::DecodeResult;

pub const VENDOR: &str = "IEDON.NET";

/// Builds a [`Snapshot`] from decoded MRT results plus resolved
/// per-ASN descriptions (spec §4.3's output), stamping `generated_timestamp`
/// with the caller-supplied current time so the function itself stays
/// free of a wall-clock dependency.
pub fn build_snapshot(
    result: &DecodeResult,
    descriptions: &HashMap<u32, String>,
    generated_timestamp: u64,
) -> Snapshot {
    let mut asn_set: Vec<u32> = result
        .as_paths
        .iter()
        .flat_map(|path| path.iter().copied())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    asn_set.sort_unstable();

    let asn_to_index: HashMap<u32, usize> =
        asn_set.iter().enumerate().map(|(i, &asn)| (asn, i)).collect();

    let mut links = Vec::new();
    let mut seen_links = HashSet::new();
    let mut centrality_graph = CentralityGraph::new(asn_set.len());

    for path in &result.as_paths {
        for window in path.windows(2) {
            let (src, dst) = (window[0], window[1]);
            if src == dst {
                continue;
            }
            let (Some(&src_idx), Some(&dst_idx)) =
                (asn_to_index.get(&src), asn_to_index.get(&dst))
            else {
                continue;
            };
            if seen_links.insert((src_idx, dst_idx)) {
                links.push(Link {
                    source: src_idx as u32,
                    target: dst_idx as u32,
                });
                centrality_graph.add_link(src_idx, dst_idx);
            }
        }
    }

    let centralities = centrality::compute(&centrality_graph);

    let empty_routes: Vec<Route> = Vec::new();
    let nodes: Vec<Node> = asn_set
        .iter()
        .enumerate()
        .map(|(idx, &asn)| {
            let routes = result.advertises.get(&asn).unwrap_or(&empty_routes).clone();
            let desc = descriptions
                .get(&asn)
                .cloned()
                .unwrap_or_else(|| crate::models::default_description(Asn::new(asn)));
            Node {
                asn: Asn::new(asn),
                desc,
                routes,
                centrality: centralities[idx],
            }
        })
        .collect();

    Snapshot {
        metadata: Metadata {
            vendor: VENDOR.to_string(),
            generated_timestamp,
            data_timestamp: result.first_timestamp.unwrap_or(0),
        },
        nodes,
        links,
    }
}
