use crate::gameplay::{GraphStore, Target};
use crate::{
    NodeId, BUDGET_RESERVE_WITHOUT_FUTURES, BUDGET_RESERVE_WITH_FUTURES,
    FUTURES_FRACTION_WITHOUT_OPTIONS, FUTURES_FRACTION_WITH_OPTIONS,
};
use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{HashMap, VecDeque};

/// a setup-time declaration of an intended mine-to-node connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Future {
    pub source: NodeId,
    pub target: NodeId,
}

/// computes the breadcrumb paths and, optionally, the future declarations,
/// then installs the resulting target list into `store`
///
/// returns the futures to announce in the `ready` reply.
pub fn plan(store: &mut GraphStore) -> Vec<Future> {
    let topology = build_topology(store);

    let reserve = if store.header().has_futures {
        BUDGET_RESERVE_WITH_FUTURES
    } else {
        BUDGET_RESERVE_WITHOUT_FUTURES
    };
    let budget = ((1.0 - reserve) * store.moves_total() as f64).ceil() as usize;

    let mut by_len: Vec<(usize, usize)> = Vec::new(); // (path edge count, mine index)
    let mut mine_paths: Vec<Vec<usize>> = vec![Vec::new(); store.num_mines()];
    for i in 0..store.num_mines() {
        let root = store.mine(i).site;
        if let Some(path) = nearest_mine_path(store, &topology, root) {
            by_len.push((path.len(), i));
            mine_paths[i] = path;
        }
    }
    by_len.sort_by_key(|&(len, _)| len);

    let mut targets = Vec::new();
    let mut total_len = 0usize;
    for (len, mine_idx) in by_len {
        total_len += len;
        if total_len > budget {
            break;
        }
        let path = &mine_paths[mine_idx];
        for &eid in path {
            store.edge_mut(eid).breadcrumb = true;
        }
        let last = store.edge(*path.last().expect("non-empty breadcrumb path"));
        let far_mine = if store.is_mine(last.target) {
            last.target
        } else {
            last.source
        };
        let m = store.mine(mine_idx).site;
        targets.push(Target::new(m.min(far_mine), m.max(far_mine)));
    }
    targets.reverse();

    let mut futures = Vec::new();
    if store.header().has_futures {
        let options_enabled = store.header().options_avail > 0;
        let fraction = if options_enabled {
            FUTURES_FRACTION_WITH_OPTIONS
        } else {
            FUTURES_FRACTION_WITHOUT_OPTIONS
        };
        let nfut = (fraction * store.num_mines() as f64).ceil() as usize;
        for i in 0..nfut.min(store.num_mines()) {
            let mine_id = store.mine(i).site;
            if let Some(path) = longest_breadcrumb_path(store, mine_id) {
                if path.len() > 1 {
                    let last = store.edge(*path.last().unwrap());
                    let far = if store.is_mine(last.target) {
                        last.source
                    } else {
                        last.target
                    };
                    if !store.is_mine(far) && far != mine_id {
                        futures.push(Future {
                            source: mine_id,
                            target: far,
                        });
                    }
                }
            }
        }
    }

    for f in &futures {
        targets.push(Target::new(f.source, f.target));
    }
    targets.reverse();

    store.set_targets(targets);
    futures
}

/// an undirected view of the full topology (ownership-blind), used only
/// for the unrestricted mine-to-mine search — a plain equal-weight
/// shortest path, so it's expressed with petgraph's `astar` rather than
/// a hand-rolled BFS
fn build_topology(store: &GraphStore) -> UnGraph<NodeId, ()> {
    let mut graph = UnGraph::<NodeId, ()>::with_capacity(store.num_nodes(), store.num_edges());
    for i in 0..store.num_nodes() {
        graph.add_node(i as NodeId);
    }
    for eid in 0..store.num_edges() {
        let e = store.edge(eid);
        graph.add_edge(NodeIndex::new(e.source as usize), NodeIndex::new(e.target as usize), ());
    }
    graph
}

/// shortest path (in edges) from `root` to the nearest *other* mine,
/// ignoring ownership entirely; `None` if no other mine is reachable
fn nearest_mine_path(
    store: &GraphStore,
    topology: &UnGraph<NodeId, ()>,
    root: NodeId,
) -> Option<Vec<usize>> {
    let start = NodeIndex::new(root as usize);
    let (_, nodes) = astar(
        topology,
        start,
        |n| n != start && store.is_mine(n.index() as NodeId),
        |_| 1usize,
        |_| 0usize,
    )?;
    if nodes.len() < 2 {
        return None;
    }
    let mut path = Vec::with_capacity(nodes.len() - 1);
    for w in nodes.windows(2) {
        let a = w[0].index() as NodeId;
        let b = w[1].index() as NodeId;
        path.push(store.find_edge(a, b).expect("topology edge must exist in store"));
    }
    Some(path)
}

/// BFS restricted to `breadcrumb`-flagged edges, returning the path to the
/// node dequeued last — the furthest breadcrumb-reachable node from `root`
///
/// this needs per-edge flag awareness mid-traversal (which petgraph has no
/// primitive for short of a full adaptor), so it's hand-rolled directly
/// over the store's CSR adjacency, mirroring the original C++.
fn longest_breadcrumb_path(store: &GraphStore, root: NodeId) -> Option<Vec<usize>> {
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    // node -> incoming edge index (None for root)
    let mut visited: HashMap<NodeId, Option<usize>> = HashMap::new();
    queue.push_back(root);
    visited.insert(root, None);

    let mut last = root;
    while let Some(node) = queue.pop_front() {
        last = node;
        for &eid in store.edges_of(node) {
            let eid = eid as usize;
            let e = store.edge(eid);
            if !e.breadcrumb {
                continue;
            }
            let t = e.other(node);
            if visited.contains_key(&t) {
                continue;
            }
            queue.push_back(t);
            visited.insert(t, Some(eid));
        }
    }

    if last == root {
        return None;
    }
    Some(unpack_path(store, root, last, &visited))
}

/// walk the predecessor map from `to` back to `from`, returning the edge
/// path in `from -> to` order
fn unpack_path(
    store: &GraphStore,
    from: NodeId,
    to: NodeId,
    visited: &HashMap<NodeId, Option<usize>>,
) -> Vec<usize> {
    let mut result = Vec::new();
    let mut cur = to;
    while cur != from {
        let eid = visited[&cur].expect("visited non-root node must have an incoming edge");
        result.push(eid);
        cur = store.edge(eid).other(cur);
    }
    result.reverse();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::SetupInput;

    #[test]
    fn single_mine_triangle_yields_no_breadcrumbs() {
        let mut store = GraphStore::from_setup(SetupInput {
            punter: 0,
            punters: 2,
            site_ids: &[0, 1, 2],
            rivers: &[(0, 1), (1, 2), (0, 2)],
            mine_sites: &[0],
            has_futures: false,
            has_splurges: false,
            has_options: false,
        });
        let futures = plan(&mut store);
        assert!(futures.is_empty());
        assert!(store.targets().is_empty());
        for eid in 0..store.num_edges() {
            assert!(!store.edge(eid).breadcrumb);
        }
    }

    #[test]
    fn two_mines_options_mark_whole_path_as_breadcrumb() {
        let mut store = GraphStore::from_setup(SetupInput {
            punter: 0,
            punters: 1,
            site_ids: &[0, 1, 2, 3],
            rivers: &[(0, 1), (1, 2), (2, 3)],
            mine_sites: &[0, 3],
            has_futures: false,
            has_splurges: false,
            has_options: true,
        });
        plan(&mut store);
        for eid in 0..store.num_edges() {
            assert!(store.edge(eid).breadcrumb, "edge {eid} should be a breadcrumb");
        }
        assert_eq!(store.targets().len(), 1);
        let t = store.targets()[0];
        assert_eq!((t.source, t.target), (0, 3));
        assert!(!t.reached);
    }

    #[test]
    fn futures_prepend_the_target_list() {
        let mut store = GraphStore::from_setup(SetupInput {
            punter: 0,
            punters: 1,
            site_ids: &[0, 1, 2, 3, 4, 5],
            rivers: &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)],
            mine_sites: &[0, 5],
            has_futures: true,
            has_splurges: false,
            has_options: false,
        });
        let futures = plan(&mut store);
        // with futures enabled and no options, NFUT = ceil(0.10 * 2) = 1
        assert_eq!(futures.len(), 1);
        assert!(!store.targets().is_empty());
        let first = store.targets()[0];
        // futures are prepended by the second reversal
        assert_eq!((first.source, first.target), (futures[0].source, futures[0].target));
    }

    #[test]
    fn budget_excludes_the_path_that_crosses_the_threshold() {
        // a single chain 0..15 with mines at 0, 2, 5, 15: nearest-mine
        // distances sort to [2, 2, 3, 10] (mine 2's nearest is mine 0,
        // a duplicate of the first pair). edges=15, punters=3 gives
        // moves_total=5 and budget=ceil(0.95*5)=5. Walking the sorted
        // list: 2 (total=2, kept), 2 (total=4, kept), then 3 (total=7,
        // over budget) must be dropped entirely, not kept because the
        // pre-add total (4) was still under budget.
        let mut rivers = vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)];
        for n in 5..15 {
            rivers.push((n, n + 1));
        }
        let sites: Vec<NodeId> = (0..=15).collect();
        let mut store = GraphStore::from_setup(SetupInput {
            punter: 0,
            punters: 3,
            site_ids: &sites,
            rivers: &rivers,
            mine_sites: &[0, 2, 5, 15],
            has_futures: false,
            has_splurges: false,
            has_options: false,
        });
        plan(&mut store);

        // component A (0-1-2): kept
        assert!(store.edge(store.find_edge(0, 1).unwrap()).breadcrumb);
        assert!(store.edge(store.find_edge(1, 2).unwrap()).breadcrumb);
        // component B (2-3-4-5): must be excluded, not included-then-overshot
        assert!(!store.edge(store.find_edge(2, 3).unwrap()).breadcrumb);
        assert!(!store.edge(store.find_edge(3, 4).unwrap()).breadcrumb);
        assert!(!store.edge(store.find_edge(4, 5).unwrap()).breadcrumb);
        // component C (5..15): never reached
        for n in 5..15 {
            assert!(!store.edge(store.find_edge(n, n + 1).unwrap()).breadcrumb);
        }

        let pairs: Vec<(NodeId, NodeId)> = store.targets().iter().map(|t| (t.source, t.target)).collect();
        assert!(pairs.iter().all(|&p| p == (0, 2)), "unexpected targets: {pairs:?}");
        assert!(!pairs.contains(&(2, 5)));
        assert!(!pairs.contains(&(5, 15)));
    }
}
