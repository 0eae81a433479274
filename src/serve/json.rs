//! JSON rendering of a [`Snapshot`] (spec §6 "JSON snapshot format").
//!
//! Mirrors the binary form field-for-field, except prefixes render as
//! human-readable `a.b.c.d/len` / `x:x::/len` strings via [`Route`]'s
//! `Display` impl rather than as raw address integers.
use serde::Serialize;

use crate::models::{Node, Snapshot};

#[derive(Serialize)]
pub struct SnapshotJson {
    pub metadata: MetadataJson,
    pub nodes: Vec<NodeJson>,
    pub links: Vec<LinkJson>,
}

#[derive(Serialize)]
pub struct MetadataJson {
    pub vendor: String,
    pub generated_timestamp: u64,
    pub data_timestamp: u64,
}

#[derive(Serialize)]
pub struct NodeJson {
    pub asn: u32,
    pub desc: String,
    pub routes: Vec<String>,
    pub centrality: CentralityJson,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whois: Option<String>,
}

#[derive(Serialize)]
pub struct CentralityJson {
    pub degree: f64,
    pub betweenness: f64,
    pub closeness: f64,
    pub index: u32,
    pub ranking: u32,
}

#[derive(Serialize)]
pub struct LinkJson {
    pub source: u32,
    pub target: u32,
}

pub fn render_snapshot(snapshot: &Snapshot) -> SnapshotJson {
    SnapshotJson {
        metadata: MetadataJson {
            vendor: snapshot.metadata.vendor.clone(),
            generated_timestamp: snapshot.metadata.generated_timestamp,
            data_timestamp: snapshot.metadata.data_timestamp,
        },
        nodes: snapshot.nodes.iter().map(|n| render_node(n, None)).collect(),
        links: snapshot
            .links
            .iter()
            .map(|l| LinkJson {
                source: l.source,
                target: l.target,
            })
            .collect(),
    }
}

pub fn render_node(node: &Node, whois: Option<String>) -> NodeJson {
    NodeJson {
        asn: node.asn.to_u32(),
        desc: node.desc.clone(),
        routes: node.routes.iter().map(|r| r.to_string()).collect(),
        centrality: CentralityJson {
            degree: node.centrality.degree,
            betweenness: node.centrality.betweenness,
            closeness: node.centrality.closeness,
            index: node.centrality.index,
            ranking: node.centrality.ranking,
        },
        whois,
    }
}
