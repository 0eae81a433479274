/*!
Centrality computation (spec §4.5).

Degree and the index/ranking formulas are grounded in the original
implementation's `centrality.Graph.calculateDegree` /
`calculateIndex`: both are carried over unchanged (same 0.5/0.3/0.2
betweenness/closeness/degree weighting, same `round(index * 10000)`).
Betweenness there is computed from a Floyd-Warshall all-pairs shortest
path with a path-reconstruction step that (incorrectly) credits path
endpoints as well as intermediates; this crate replaces it with a
textbook Brandes single-source-shortest-paths betweenness, which is
both asymptotically better (`O(VE)` instead of `O(V^3)`) and credits
only nodes strictly between source and target. Closeness is likewise
redone as the classic "reachable count over summed distance" form
rather than the harmonic-sum variant the original used, matching what
the design notes call for.
*/
use std::collections::VecDeque;

use crate::models::Centrality;

/// A graph in the shape the centrality engine wants: dense `0..n` node
/// indices and an adjacency list built by [`crate::graphbuild`].
pub struct CentralityGraph {
    pub node_count: usize,
    pub adjacency: Vec<Vec<usize>>,
    pub in_degree: Vec<u32>,
    pub out_degree: Vec<u32>,
}

impl CentralityGraph {
    pub fn new(node_count: usize) -> CentralityGraph {
        CentralityGraph {
            node_count,
            adjacency: vec![Vec::new(); node_count],
            in_degree: vec![0; node_count],
            out_degree: vec![0; node_count],
        }
    }

    /// Registers a directed adjacency `source -> target` for degree
    /// bookkeeping, and its undirected counterpart for shortest-path
    /// purposes (both Brandes and closeness treat the AS graph as
    /// undirected, matching the original Floyd-Warshall's symmetric
    /// distance matrix).
    pub fn add_link(&mut self, source: usize, target: usize) {
        self.out_degree[source] += 1;
        self.in_degree[target] += 1;
        if !self.adjacency[source].contains(&target) {
            self.adjacency[source].push(target);
        }
        if !self.adjacency[target].contains(&source) {
            self.adjacency[target].push(source);
        }
    }
}

/// Computes degree, betweenness, closeness, composite index and dense
/// ranking for every node, indexed the same way as `graph.adjacency`.
///
/// Rankings are assigned by descending index; ties break by ascending
/// node index, which callers should set up to agree with ascending ASN
/// (spec open question: the original leaves tie order to an unstable
/// sort).
pub fn compute(graph: &CentralityGraph) -> Vec<Centrality> {
    let n = graph.node_count;
    if n == 0 {
        return Vec::new();
    }

    let degree: Vec<f64> = (0..n)
        .map(|i| (graph.in_degree[i] + graph.out_degree[i]) as f64)
        .collect();
    let betweenness = brandes_betweenness(graph);
    let closeness = closeness_centrality(graph);

    let max_degree = degree.iter().cloned().fold(0.0_f64, f64::max);
    let max_betweenness = betweenness.iter().cloned().fold(0.0_f64, f64::max);
    let max_closeness = closeness.iter().cloned().fold(0.0_f64, f64::max);

    let safe_ratio = |x: f64, max: f64| if max == 0.0 { 0.0 } else { x / max };

    let mut indexed: Vec<(usize, u32)> = (0..n)
        .map(|i| {
            let norm_degree = safe_ratio(degree[i], max_degree);
            let norm_betweenness = safe_ratio(betweenness[i], max_betweenness);
            let norm_closeness = safe_ratio(closeness[i], max_closeness);
            let index = 0.5 * norm_betweenness + 0.3 * norm_closeness + 0.2 * norm_degree;
            (i, (index * 10000.0).round() as u32)
        })
        .collect();

    indexed.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut rankings = vec![0u32; n];
    for (rank, (node_idx, _)) in indexed.iter().enumerate() {
        rankings[*node_idx] = (rank + 1) as u32;
    }

    (0..n)
        .map(|i| Centrality {
            in_degree: graph.in_degree[i],
            out_degree: graph.out_degree[i],
            degree: degree[i],
            betweenness: betweenness[i],
            closeness: closeness[i],
            index: indexed.iter().find(|(idx, _)| *idx == i).unwrap().1,
            ranking: rankings[i],
        })
        .collect()
}

/// Brandes' algorithm (2001) for betweenness centrality on an unweighted
/// undirected graph: one BFS per source accumulating shortest-path
/// counts, then a reverse-order dependency accumulation summed over every
/// source. Each unordered pair `{s, t}` is counted twice this way (once
/// from each end) -- that is intentional and exactly what the spec's
/// `1/((n-1)(n-2))` final scale (applied by the caller) is calibrated
/// against (spec §4.5, §8 property 6/7).
fn brandes_betweenness(graph: &CentralityGraph) -> Vec<f64> {
    let n = graph.node_count;
    let mut betweenness = vec![0.0_f64; n];

    for s in 0..n {
        let mut sigma = vec![0.0_f64; n];
        let mut dist = vec![-1_i64; n];
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut order = Vec::with_capacity(n);

        sigma[s] = 1.0;
        dist[s] = 0;
        let mut queue = VecDeque::new();
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            order.push(v);
            for &w in &graph.adjacency[v] {
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        let mut delta = vec![0.0_f64; n];
        for &w in order.iter().rev() {
            for &v in &predecessors[w] {
                delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
            }
            if w != s {
                betweenness[w] += delta[w];
            }
        }
    }

    if n >= 3 {
        let scale = 1.0 / ((n - 1) as f64 * (n - 2) as f64);
        for value in &mut betweenness {
            *value *= scale;
        }
    } else {
        for value in &mut betweenness {
            *value = 0.0;
        }
    }
    betweenness
}

/// Closeness as reachable-node-count over summed shortest-path distance,
/// with the `x / 0 := 0` convention for isolated nodes.
fn closeness_centrality(graph: &CentralityGraph) -> Vec<f64> {
    let n = graph.node_count;
    (0..n)
        .map(|s| {
            let dist = bfs_distances(graph, s);
            let (reachable, sum) = dist
                .iter()
                .enumerate()
                .filter(|&(i, &d)| i != s && d >= 0)
                .fold((0u32, 0.0_f64), |(count, sum), (_, &d)| (count + 1, sum + d as f64));
            if sum == 0.0 {
                0.0
            } else {
                reachable as f64 / sum
            }
        })
        .collect()
}

fn bfs_distances(graph: &CentralityGraph, source: usize) -> Vec<i64> {
    let n = graph.node_count;
    let mut dist = vec![-1_i64; n];
    dist[source] = 0;
    let mut queue = VecDeque::new();
    queue.push_back(source);
    while let Some(v) = queue.pop_front() {
        for &w in &graph.adjacency[v] {
            if dist[w] < 0 {
                dist[w] = dist[v] + 1;
                queue.push_back(w);
            }
        }
    }
    dist
}
