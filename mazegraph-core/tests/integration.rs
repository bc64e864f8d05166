//! Integration Tests for the Weighted Graph
//!
//! These tests drive the public API the way a maze builder and the AI
//! navigation code do.

use std::sync::Arc;

use mazegraph_core::{
    Edge, ErrorKind, GraphConfig, GraphError, Node, NodeId, Recycler, WeightedGraph,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Floor,
    Wall,
    Spawn,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CellData {
    x: i32,
    y: i32,
    kind: CellKind,
}

impl CellData {
    fn floor(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            kind: CellKind::Floor,
        }
    }
}

type Maze = WeightedGraph<CellData, f32>;

fn maze(recycler: &Arc<Recycler>) -> Maze {
    let config = GraphConfig {
        strict_consistency: false,
        ..GraphConfig::default()
    };
    WeightedGraph::with_config(recycler.clone(), config)
}

/// Build a `width` x `height` grid where every cell connects to its left and
/// upper neighbor. Weights are derived from the coordinates so the result is
/// deterministic.
fn grid(recycler: &Arc<Recycler>, width: i32, height: i32) -> (Maze, Vec<NodeId>) {
    let mut graph = maze(recycler);
    let mut ids = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let mut neighbors = Vec::new();
            if x > 0 {
                let left = ids[(y * width + x - 1) as usize];
                neighbors.push((left, ((x * 7 + y * 3) % 11) as f32));
            }
            if y > 0 {
                let up = ids[((y - 1) * width + x) as usize];
                neighbors.push((up, ((x * 5 + y * 13) % 17) as f32));
            }
            ids.push(graph.add_node(CellData::floor(x, y), neighbors).unwrap());
        }
    }
    (graph, ids)
}

/// Two nodes joined by one edge: both nodes list the edge.
#[test]
fn add_two_nodes_and_connect_them() {
    let recycler = Arc::new(Recycler::new());
    let mut graph = maze(&recycler);

    let a = graph.add_isolated_node(CellData::floor(0, 0)).unwrap();
    let b = graph.add_isolated_node(CellData::floor(1, 0)).unwrap();
    let e1 = graph.add_edge(a, b, 1.5).unwrap();

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert!(graph.node(a).unwrap().has_edge(e1));
    assert!(graph.node(b).unwrap().has_edge(e1));
    assert_eq!(graph.weight(e1), Some(&1.5));
    graph.validate().unwrap();
}

/// Removing a node takes its edges with it and cleans up the other side.
#[test]
fn remove_node_drops_incident_edges() {
    let recycler = Arc::new(Recycler::new());
    let mut graph = maze(&recycler);

    let a = graph.add_isolated_node(CellData::floor(0, 0)).unwrap();
    let b = graph.add_isolated_node(CellData::floor(1, 0)).unwrap();
    let e1 = graph.add_edge(a, b, 1.5).unwrap();

    let data = graph.remove_node(a).unwrap();
    assert_eq!(data, CellData::floor(0, 0));

    assert_eq!(graph.node_ids().collect::<Vec<_>>(), vec![b]);
    assert_eq!(graph.edge_count(), 0);
    assert!(!graph.contains_edge(e1));
    assert_eq!(graph.degree(b), Some(0));
    graph.validate().unwrap();
}

/// A dangling handle is the Rust stand-in for a null node.
#[test]
fn add_edge_with_dangling_endpoint_fails() {
    let recycler = Arc::new(Recycler::new());
    let mut graph = maze(&recycler);

    let x = graph.add_isolated_node(CellData::floor(0, 0)).unwrap();
    let gone = graph.add_isolated_node(CellData::floor(1, 0)).unwrap();
    graph.remove_node(gone).unwrap();

    let err = graph.add_edge(gone, x, 1.0).unwrap_err();
    assert_eq!(err, GraphError::InvalidNode(gone));
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let err = graph.add_edge(x, gone, 1.0).unwrap_err();
    assert_eq!(err, GraphError::InvalidNode(gone));

    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.degree(x), Some(0));
}

/// Removing an edge that is gone fails and changes nothing.
#[test]
fn remove_missing_edge_fails() {
    let recycler = Arc::new(Recycler::new());
    let mut graph = maze(&recycler);

    let a = graph.add_isolated_node(CellData::floor(0, 0)).unwrap();
    let b = graph.add_isolated_node(CellData::floor(1, 0)).unwrap();
    let keep = graph.add_edge(a, b, 2.0).unwrap();
    let gone = graph.add_edge(a, b, 3.0).unwrap();
    graph.remove_edge(gone).unwrap();

    let err = graph.remove_edge(gone).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(!err.is_defect());
    assert_eq!(graph.edge_ids().collect::<Vec<_>>(), vec![keep]);
}

/// Removing a node this graph does not own fails and changes nothing.
#[test]
fn remove_foreign_node_fails() {
    let recycler = Arc::new(Recycler::new());
    let mut graph = maze(&recycler);
    let mut other = maze(&recycler);

    let a = graph.add_isolated_node(CellData::floor(0, 0)).unwrap();
    let b = graph.add_isolated_node(CellData::floor(1, 0)).unwrap();
    graph.add_edge(a, b, 1.0).unwrap();
    let stranger = other.add_isolated_node(CellData::floor(9, 9)).unwrap();

    assert_eq!(graph.remove_node(stranger), Err(GraphError::NodeNotFound(stranger)));
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert!(other.contains_node(stranger));
}

/// `add_node` with one good and one dangling neighbor is all-or-nothing.
#[test]
fn add_node_is_atomic_when_a_neighbor_is_missing() {
    let recycler = Arc::new(Recycler::new());
    let mut graph = maze(&recycler);

    let a = graph.add_isolated_node(CellData::floor(0, 0)).unwrap();
    let gone = graph.add_isolated_node(CellData::floor(1, 0)).unwrap();
    graph.remove_node(gone).unwrap();

    let before = recycler.stats::<Node<CellData>>();
    let err = graph
        .add_node(CellData::floor(2, 0), [(a, 1.0), (gone, 1.0)])
        .unwrap_err();

    assert_eq!(err, GraphError::InvalidNode(gone));
    // The good neighbor did not gain an edge.
    assert_eq!(graph.degree(a), Some(0));
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.node_count(), 1);
    // No node was even acquired.
    assert_eq!(recycler.stats::<Node<CellData>>(), before);
}

/// `init` twice is the same as once.
#[test]
fn init_is_idempotent() {
    let recycler = Arc::new(Recycler::new());
    let (mut graph, _) = grid(&recycler, 3, 3);

    graph.init();
    assert!(graph.is_empty());
    assert_eq!(graph.edge_count(), 0);

    graph.init();
    assert!(graph.is_empty());
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.nodes().count(), 0);
    assert_eq!(graph.edges().count(), 0);
    graph.validate().unwrap();
}

/// Rebuilding a maze of the same size reuses every node and edge.
#[test]
fn rebuild_does_not_allocate() {
    let recycler = Arc::new(Recycler::new());
    let (mut graph, _) = grid(&recycler, 6, 6);
    let nodes_after_first = recycler.stats::<Node<CellData>>().allocated;
    let edges_after_first = recycler.stats::<Edge<f32>>().allocated;
    assert_eq!(nodes_after_first, 36);
    assert_eq!(edges_after_first, 60);

    graph.destroy();
    drop(graph);
    let (rebuilt, _) = grid(&recycler, 6, 6);

    assert_eq!(rebuilt.node_count(), 36);
    assert_eq!(recycler.stats::<Node<CellData>>().allocated, nodes_after_first);
    assert_eq!(recycler.stats::<Edge<f32>>().allocated, edges_after_first);
    assert_eq!(recycler.stats::<Node<CellData>>().reused, 36);
}

/// A rebuild larger than any fixed idle cap still reuses every instance.
#[test]
fn large_rebuild_does_not_allocate() {
    let recycler = Arc::new(Recycler::new());
    let (mut graph, _) = grid(&recycler, 75, 75);
    let nodes_after_first = recycler.stats::<Node<CellData>>().allocated;
    let edges_after_first = recycler.stats::<Edge<f32>>().allocated;
    assert_eq!(nodes_after_first, 75 * 75);
    assert_eq!(edges_after_first, 2 * 75 * 74);

    graph.destroy();
    assert_eq!(recycler.stats::<Node<CellData>>().discarded, 0);
    assert_eq!(recycler.stats::<Edge<f32>>().discarded, 0);

    graph.init();
    drop(graph);
    let (rebuilt, _) = grid(&recycler, 75, 75);

    assert_eq!(rebuilt.node_count(), 75 * 75);
    assert_eq!(recycler.stats::<Node<CellData>>().allocated, nodes_after_first);
    assert_eq!(recycler.stats::<Edge<f32>>().allocated, edges_after_first);
}

/// Tearing out a cell in the middle of a grid keeps every invariant.
#[test]
fn carving_a_grid_keeps_it_consistent() {
    let recycler = Arc::new(Recycler::new());
    let (mut graph, ids) = grid(&recycler, 4, 4);
    assert_eq!(graph.edge_count(), 24);

    let center = ids[5];
    let neighbors: Vec<_> = graph.neighbors(center).map(|(n, _)| n).collect();
    assert_eq!(neighbors.len(), 4);

    graph.remove_node(center).unwrap();
    assert_eq!(graph.edge_count(), 20);
    for n in neighbors {
        assert!(graph.neighbors(n).all(|(other, _)| other != center));
    }
    graph.validate().unwrap();
}

/// Spawn-point scan: a cell keeps its position when earlier cells are removed.
#[test]
fn spawn_point_scan_by_position() {
    let recycler = Arc::new(Recycler::new());
    let (mut graph, ids) = grid(&recycler, 3, 3);

    graph.data_mut(ids[8]).unwrap().kind = CellKind::Spawn;
    graph.data_mut(ids[1]).unwrap().kind = CellKind::Wall;
    graph.remove_node(ids[1]).unwrap();

    let spawn = (0..graph.node_positions())
        .find(|&position| {
            graph
                .node_at(position)
                .and_then(|id| graph.data(id))
                .is_some_and(|c| c.kind == CellKind::Spawn)
        })
        .unwrap();
    assert_eq!(spawn, 8);
    assert_eq!(graph.node_at(spawn), Some(ids[8]));
    assert_eq!(graph.node_at(1), None);
    assert_eq!(graph.node_at(0), Some(ids[0]));
    assert_eq!(graph.data(ids[8]).map(|c| (c.x, c.y)), Some((2, 2)));
}

/// Kruskal over `edges_by_weight` spans the grid with `n - 1` edges.
#[test]
fn edges_by_weight_supports_spanning_tree() {
    let recycler = Arc::new(Recycler::new());
    let (graph, ids) = grid(&recycler, 5, 5);

    let ordered = graph.edges_by_weight();
    assert_eq!(ordered.len(), graph.edge_count());
    for pair in ordered.windows(2) {
        assert!(graph.weight(pair[0]) <= graph.weight(pair[1]));
    }

    let mut parent: Vec<usize> = (0..ids.len()).collect();
    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    let mut tree = 0;
    for edge in ordered {
        let (a, b) = graph.edge(edge).unwrap().endpoints().unwrap();
        let (ra, rb) = (find(&mut parent, a.index()), find(&mut parent, b.index()));
        if ra != rb {
            parent[ra] = rb;
            tree += 1;
        }
    }
    assert_eq!(tree, ids.len() - 1);
}

/// Graphs on different threads can share one recycler.
#[test]
fn concurrent_graphs_share_a_recycler() {
    let recycler = Arc::new(Recycler::new());

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let recycler = &recycler;
            scope.spawn(move || {
                for _ in 0..10 {
                    let (mut graph, _) = grid(recycler, 4, 4);
                    graph.validate().unwrap();
                    graph.destroy();
                }
            });
        }
    });

    let nodes = recycler.stats::<Node<CellData>>();
    assert_eq!(nodes.acquired(), 4 * 10 * 16);
    assert_eq!(nodes.outstanding(), 0);
    // Never more than four grids alive at once.
    assert!(nodes.allocated <= 4 * 16, "{nodes:?}");
}
