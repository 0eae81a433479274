//! Black-box pipeline tests exercising decode -> merge -> graph build
//! together, built on small synthetic MRT byte fixtures (spec §8
//! end-to-end scenarios S1-S4).
use std::collections::HashMap;

use dn42_map::graphbuild::build_snapshot;
use dn42_map::mrt;

const TABLE_DUMP_V2: u16 = 13;
const RIB_IPV4_UNICAST: u16 = 2;

fn as_path_attr(asns: &[u32]) -> Vec<u8> {
    let mut body = vec![2u8, asns.len() as u8]; // AS_SEQUENCE
    for asn in asns {
        body.extend(asn.to_be_bytes());
    }
    let mut attr = vec![0u8, 2u8, body.len() as u8]; // flags, type=AS_PATH
    attr.extend(body);
    attr
}

fn rib_entry(peer_index: u16, as_path: &[u32]) -> Vec<u8> {
    let attrs = as_path_attr(as_path);
    let mut out = Vec::new();
    out.extend(peer_index.to_be_bytes());
    out.extend(0u32.to_be_bytes()); // originated_time
    out.extend((attrs.len() as u16).to_be_bytes());
    out.extend(attrs);
    out
}

fn table_dump_v2_record(timestamp: u32, prefix: [u8; 4], prefix_len: u8, entries: &[Vec<u8>]) -> Vec<u8> {
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
    out.extend(RIB_IPV4_UNICAST.to_be_bytes());
    out.extend((rib_body.len() as u32).to_be_bytes());
    out.extend(rib_body);
    out
}

fn unknown_type_record(timestamp: u32, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend(timestamp.to_be_bytes());
    out.extend(16u16.to_be_bytes()); // OSPFv3, unhandled type
    out.extend(0u16.to_be_bytes());
    out.extend((body.len() as u32).to_be_bytes());
    out.extend(body);
    out
}

/// S1: tiny path A->B->C, single family.
#[test]
fn s1_tiny_path_produces_expected_topology_and_centrality() {
    const A: u32 = 65001;
    const B: u32 = 65002;
    const C: u32 = 65003;

    let mut blob = Vec::new();
    blob.extend(table_dump_v2_record(
        1000,
        [10, 0, 0, 0],
        24,
        &[rib_entry(0, &[A, B, C])],
    ));
    blob.extend(table_dump_v2_record(
        1000,
        [10, 0, 1, 0],
        24,
        &[rib_entry(0, &[C, B, A])],
    ));

    let result = mrt::decode(&blob).unwrap();
    let snapshot = build_snapshot(&result, &HashMap::new(), 2000);

    assert_eq!(snapshot.nodes.len(), 3);
    assert!(snapshot.nodes.windows(2).all(|w| w[0].asn < w[1].asn));
    assert_eq!(snapshot.links.len(), 4);

    let node = |asn: u32| snapshot.find_by_asn(dn42_map::models::Asn::new(asn)).unwrap();
    assert_eq!(node(A).centrality.degree, 2.0);
    assert_eq!(node(B).centrality.degree, 4.0);
    assert_eq!(node(C).centrality.degree, 2.0);

    assert_eq!(node(C).routes.len(), 1);
    assert_eq!(node(C).routes[0].to_string(), "10.0.0.0/24");
    assert_eq!(node(A).routes.len(), 1);
    assert_eq!(node(A).routes[0].to_string(), "10.0.1.0/24");

    // B sits on both shortest paths (A,C) and (C,A): raw 2, scaled by
    // 1/((3-1)(3-2)) = 0.5 -> 1.0 (spec §4.5, §8 scenario S1).
    assert_eq!(node(B).centrality.betweenness, 1.0);
    assert_eq!(node(B).centrality.ranking, 1);

    let rankings: std::collections::HashSet<u32> =
        snapshot.nodes.iter().map(|n| n.centrality.ranking).collect();
    assert_eq!(rankings, [1u32, 2, 3].into_iter().collect());
}

/// S2: AS-prepend collapse -- `[A,A,B]` adds only `(A,B)`.
#[test]
fn s2_prepended_as_collapses_self_loop() {
    const A: u32 = 65010;
    const B: u32 = 65011;

    let blob = table_dump_v2_record(1000, [10, 0, 2, 0], 24, &[rib_entry(0, &[A, A, B])]);
    let result = mrt::decode(&blob).unwrap();
    let snapshot = build_snapshot(&result, &HashMap::new(), 2000);

    assert_eq!(snapshot.nodes.len(), 2);
    assert_eq!(snapshot.links.len(), 1);
    assert!(snapshot.links.iter().all(|l| l.source != l.target));
}

/// S3: duplicate route dedup -- two entries for the same prefix, same
/// origin, yield one route.
#[test]
fn s3_duplicate_route_is_deduplicated() {
    const X: u32 = 65020;
    const D: u32 = 65021;
    const Y: u32 = 65022;

    let blob = table_dump_v2_record(
        1000,
        [0xfd, 0, 0, 0],
        8,
        &[rib_entry(0, &[X, D]), rib_entry(1, &[Y, D])],
    );
    let result = mrt::decode(&blob).unwrap();
    let snapshot = build_snapshot(&result, &HashMap::new(), 2000);

    let node = snapshot.find_by_asn(dn42_map::models::Asn::new(D)).unwrap();
    assert_eq!(node.routes.len(), 1);
}

/// S4: an unrecognized MRT record type sandwiched between TABLE_DUMP_V2
/// records is skipped, and the surrounding records still decode.
#[test]
fn s4_unknown_record_type_is_skipped_not_fatal() {
    const A: u32 = 65030;
    const B: u32 = 65031;

    let mut blob = Vec::new();
    blob.extend(table_dump_v2_record(1000, [10, 0, 3, 0], 24, &[rib_entry(0, &[A, B])]));
    blob.extend(unknown_type_record(1001, &[0xAA, 0xBB, 0xCC]));
    blob.extend(table_dump_v2_record(1002, [10, 0, 4, 0], 24, &[rib_entry(0, &[B, A])]));

    let result = mrt::decode(&blob).unwrap();
    assert_eq!(result.as_paths.len(), 2);
    assert_eq!(result.first_timestamp, Some(1000));

    let snapshot = build_snapshot(&result, &HashMap::new(), 2000);
    assert_eq!(snapshot.nodes.len(), 2);
    assert_eq!(snapshot.links.len(), 2);
}

/// Property: for a larger synthetic mesh, rankings are a permutation of
/// `1..=n` and every link satisfies the no-self-loop / in-bounds
/// invariants (spec §8 universal properties 1,2,3,5).
#[test]
fn universal_invariants_hold_over_a_denser_graph() {
    let mut blob = Vec::new();
    let mut prefix_third_octet = 0u8;
    for path in [
        vec![65001, 65002, 65003, 65004],
        vec![65004, 65003, 65002, 65001],
        vec![65001, 65003],
        vec![65002, 65004, 65001],
        vec![65005, 65002],
    ] {
        blob.extend(table_dump_v2_record(
            500,
            [10, 1, prefix_third_octet, 0],
            24,
            &[rib_entry(0, &path)],
        ));
        prefix_third_octet += 1;
    }

    let result = mrt::decode(&blob).unwrap();
    let snapshot = build_snapshot(&result, &HashMap::new(), 1000);
    let n = snapshot.nodes.len();

    for w in snapshot.nodes.windows(2) {
        assert!(w[0].asn < w[1].asn);
    }

    let mut seen = std::collections::HashSet::new();
    for link in &snapshot.links {
        assert_ne!(link.source, link.target);
        assert!((link.source as usize) < n);
        assert!((link.target as usize) < n);
        assert!(seen.insert((link.source, link.target)));
    }

    let mut rankings: Vec<u32> = snapshot.nodes.iter().map(|n| n.centrality.ranking).collect();
    rankings.sort_unstable();
    assert_eq!(rankings, (1..=n as u32).collect::<Vec<_>>());

    for node in &snapshot.nodes {
        assert!(node.centrality.betweenness >= 0.0);
        assert!(node.centrality.betweenness <= 1.0);
    }
}
