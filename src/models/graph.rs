use crate::models::{Asn, Route};
use crate::proto;

/// Centrality metrics for a single node (spec §3, computed by the engine
/// in `crate::centrality`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centrality {
    pub in_degree: u32,
    pub out_degree: u32,
    pub degree: f64,
    pub betweenness: f64,
    pub closeness: f64,
    pub index: u32,
    pub ranking: u32,
}

impl Centrality {
    pub const ZERO: Centrality = Centrality {
        in_degree: 0,
        out_degree: 0,
        degree: 0.0,
        betweenness: 0.0,
        closeness: 0.0,
        index: 0,
        ranking: 1,
    };

    pub fn to_proto(self) -> proto::Centrality {
        proto::Centrality {
            degree: self.degree,
            betweenness: self.betweenness,
            closeness: self.closeness,
            index: self.index,
            ranking: self.ranking,
        }
    }
}

/// A node in the AS graph: an ASN, its display description, the prefixes it
/// originates, and its centrality record.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub asn: Asn,
    pub desc: String,
    pub routes: Vec<Route>,
    pub centrality: Centrality,
}

/// A directed adjacency, expressed as indices into [`Snapshot::nodes`]
/// (spec §3 invariant 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub source: u32,
    pub target: u32,
}

/// Snapshot metadata: vendor string, generation time, and the timestamp of
/// the first MRT header observed during decode (spec §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub vendor: String,
    pub generated_timestamp: u64,
    pub data_timestamp: u64,
}

/// The immutable, atomically published result of one pipeline run
/// (spec §3 "Lifecycle").
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub metadata: Metadata,
    /// Ascending by ASN, unique (invariant 1).
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl Snapshot {
    pub fn to_proto(&self) -> proto::Graph {
        proto::Graph {
            metadata: Some(proto::Metadata {
                vendor: self.metadata.vendor.clone(),
                generated_timestamp: self.metadata.generated_timestamp,
                data_timestamp: self.metadata.data_timestamp,
            }),
            nodes: self
                .nodes
                .iter()
                .map(|n| proto::Node {
                    asn: n.asn.to_u32(),
                    desc: n.desc.clone(),
                    routes: n.routes.iter().map(|r| r.to_proto()).collect(),
                    centrality: Some(n.centrality.to_proto()),
                })
                .collect(),
            links: self
                .links
                .iter()
                .map(|l| proto::Link {
                    source: l.source,
                    target: l.target,
                })
                .collect(),
        }
    }

    pub fn from_proto(graph: proto::Graph) -> Snapshot {
        let metadata = graph.metadata.unwrap_or_default();
        Snapshot {
            metadata: Metadata {
                vendor: metadata.vendor,
                generated_timestamp: metadata.generated_timestamp,
                data_timestamp: metadata.data_timestamp,
            },
            nodes: graph
                .nodes
                .into_iter()
                .map(|n| {
                    let c = n.centrality.unwrap_or_default();
                    Node {
                        asn: Asn::new(n.asn),
                        desc: n.desc,
                        routes: n.routes.iter().filter_map(Route::from_proto).collect(),
                        centrality: Centrality {
                            in_degree: 0,
                            out_degree: 0,
                            degree: c.degree,
                            betweenness: c.betweenness,
                            closeness: c.closeness,
                            index: c.index,
                            ranking: c.ranking,
                        },
                    }
                })
                .collect(),
            links: graph
                .links
                .into_iter()
                .map(|l| Link {
                    source: l.source,
                    target: l.target,
                })
                .collect(),
        }
    }

    pub fn find_by_asn(&self, asn: Asn) -> Option<&Node> {
        self.nodes
            .binary_search_by_key(&asn, |n| n.asn)
            .ok()
            .map(|idx| &self.nodes[idx])
    }
}
