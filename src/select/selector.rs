use crate::gameplay::GraphStore;
use crate::NodeId;
use std::collections::{HashMap, VecDeque};

/// the three shapes the agent can reply with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Claim { source: NodeId, target: NodeId },
    Option { source: NodeId, target: NodeId },
    Pass,
}

/// the per-turn move selection chain: breadcrumb targets, then the first
/// unclaimed edge, then pass
pub fn make_move(store: &mut GraphStore) -> Move {
    if let Some(mv) = follow_breadcrumbs(store) {
        return mv;
    }
    if let Some(mv) = random_move(store) {
        return mv;
    }
    Move::Pass
}

/// iterate targets in stored order, steering toward the first unreached one
fn follow_breadcrumbs(store: &mut GraphStore) -> Option<Move> {
    for i in 0..store.targets().len() {
        if store.targets()[i].reached {
            continue;
        }
        let (src, dst) = {
            let t = store.targets()[i];
            (t.source, t.target)
        };
        match shortest_path(store, src, dst, true) {
            None => {
                store.target_mut(i).reached = true;
            }
            Some(eid) => {
                let e = *store.edge(eid);
                if e.me {
                    // `shortest_path` only ever returns a self-owned edge
                    // when the *entire* path is self-owned (its "already
                    // connected" signal) — the source mine is considered
                    // connected and we move on to the next target. See
                    // DESIGN.md for why this collapses the original
                    // incident-to-source check.
                    store.target_mut(i).reached = true;
                    continue;
                }
                if !e.claimed {
                    return Some(Move::Claim {
                        source: e.source,
                        target: e.target,
                    });
                }
                if store.header().options_avail > 0 {
                    return Some(Move::Option {
                        source: e.source,
                        target: e.target,
                    });
                }
                // the BFS budget estimate and the real counter disagreed;
                // treat this target as unreachable this turn rather than
                // emit an option we can't back.
                store.target_mut(i).reached = true;
            }
        }
    }
    None
}

/// deterministic fallback: claim the first unclaimed edge by index
///
/// named "random" in the source this is grounded on; it is not.
fn random_move(store: &GraphStore) -> Option<Move> {
    for eid in 0..store.num_edges() {
        let e = store.edge(eid);
        if !e.claimed {
            return Some(Move::Claim {
                source: e.source,
                target: e.target,
            });
        }
    }
    None
}

/// BFS from `from` to `to` over edges the agent can pass (unclaimed or
/// self-owned) or, when `use_options` is set, option (claimed by someone
/// else, option slot unused, and a local options-budget estimate > 0).
///
/// Returns the first edge on the reconstructed path not already
/// self-owned, walking outward from `from`; if the whole path is
/// self-owned, returns its last edge instead (an "already connected"
/// signal). `None` if `to` is unreachable under these rules.
fn shortest_path(store: &GraphStore, from: NodeId, to: NodeId, use_options: bool) -> Option<usize> {
    if from == to {
        return None;
    }
    let mut visited: HashMap<NodeId, Option<usize>> = HashMap::new();
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    visited.insert(from, None);
    queue.push_back(from);

    // local estimate, decremented per non-pass edge pushed onto the BFS
    // tree, reproduced deliberately even though it overestimates real
    // consumption (see DESIGN.md)
    let mut options_budget = store.header().options_avail as i64;

    while let Some(node) = queue.pop_front() {
        for &eid in store.edges_of(node) {
            let eid = eid as usize;
            let e = store.edge(eid);
            let t = e.other(node);
            if visited.contains_key(&t) {
                continue;
            }
            let can_pass = e.can_pass();
            let can_option = use_options && !e.option && options_budget > 0;
            if !can_pass && !can_option {
                continue;
            }
            if !can_pass {
                options_budget -= 1;
            }
            visited.insert(t, Some(eid));
            if t == to {
                return Some(resolve_path_edge(store, from, to, &visited));
            }
            queue.push_back(t);
        }
    }
    None
}

fn resolve_path_edge(
    store: &GraphStore,
    from: NodeId,
    to: NodeId,
    visited: &HashMap<NodeId, Option<usize>>,
) -> usize {
    let mut edges_rev = Vec::new();
    let mut cur = to;
    while cur != from {
        let eid = visited[&cur].expect("visited non-root node must have an incoming edge");
        edges_rev.push(eid);
        cur = store.edge(eid).other(cur);
    }
    edges_rev.reverse();
    edges_rev
        .iter()
        .copied()
        .find(|&eid| !store.edge(eid).me)
        .unwrap_or(*edges_rev.last().expect("from != to implies a non-empty path"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::{EdgeTouch, SetupInput};

    fn line(mines: &[NodeId], sites: &[NodeId], rivers: &[(NodeId, NodeId)], options: bool) -> GraphStore {
        GraphStore::from_setup(SetupInput {
            punter: 0,
            // 1 punter keeps the planner's per-turn budget comfortably
            // above the 3-edge breadcrumb path these fixtures use.
            punters: 1,
            site_ids: sites,
            rivers,
            mine_sites: mines,
            has_futures: false,
            has_splurges: false,
            has_options: options,
        })
    }

    #[test]
    fn no_targets_falls_through_to_random() {
        // triangle, single mine: planner produces zero targets (see plan::tests)
        let mut store = line(&[0], &[0, 1, 2], &[(0, 1), (1, 2), (0, 2)], false);
        match make_move(&mut store) {
            Move::Claim { source, target } => {
                assert!((source == 0 || target == 0));
            }
            other => panic!("expected a claim incident to the mine, got {other:?}"),
        }
    }

    #[test]
    fn breadcrumb_target_claims_a_path_edge() {
        let mut store = line(&[0, 3], &[0, 1, 2, 3], &[(0, 1), (1, 2), (2, 3)], true);
        crate::plan::plan(&mut store);
        assert_eq!(store.targets().len(), 1);
        match make_move(&mut store) {
            Move::Claim { .. } => {}
            other => panic!("expected a claim on the breadcrumb path, got {other:?}"),
        }
    }

    #[test]
    fn opponent_block_triggers_option() {
        let mut store = line(&[0, 3], &[0, 1, 2, 3], &[(0, 1), (1, 2), (2, 3)], true);
        crate::plan::plan(&mut store);
        // opponent claims the middle edge before our turn
        store.update(&[EdgeTouch {
            source: 1,
            target: 2,
            punter: 1,
        }]);
        match make_move(&mut store) {
            Move::Option { source, target } => {
                assert_eq!((source.min(target), source.max(target)), (1, 2));
            }
            Move::Claim { .. } => {
                // claiming an unclaimed predecessor on the path is also valid
            }
            other => panic!("expected an option or a predecessor claim, got {other:?}"),
        }
    }

    #[test]
    fn no_unclaimed_edges_passes() {
        let mut store = line(&[0], &[0, 1], &[(0, 1)], false);
        store.update(&[EdgeTouch {
            source: 0,
            target: 1,
            punter: 0,
        }]);
        assert_eq!(make_move(&mut store), Move::Pass);
    }

    #[test]
    fn applying_same_moves_twice_is_idempotent_on_claims() {
        let mut a = line(&[0], &[0, 1, 2], &[(0, 1), (1, 2), (0, 2)], false);
        let mut b = line(&[0], &[0, 1, 2], &[(0, 1), (1, 2), (0, 2)], false);
        let touches = [EdgeTouch {
            source: 0,
            target: 1,
            punter: 1,
        }];
        a.update(&touches);
        a.update(&touches); // reinterpreted as option the second time
        b.update(&touches);
        let eid = b.find_edge(0, 1).unwrap();
        assert_eq!(a.edge(eid).claimed, b.edge(eid).claimed);
        assert_eq!(a.edge(eid).me, b.edge(eid).me);
    }
}
