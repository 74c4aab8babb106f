use crate::gameplay::edge::Edge;
use crate::gameplay::header::Header;
use crate::gameplay::mine::Mine;
use crate::gameplay::node::Node;
use crate::gameplay::target::Target;
use crate::NodeId;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::Cursor;

const FLAG_HAS_FUTURES: u8 = 1 << 0;
const FLAG_HAS_SPLURGES: u8 = 1 << 1;

const EDGE_FLAG_CLAIMED: u8 = 1 << 0;
const EDGE_FLAG_OPTION: u8 = 1 << 1;
const EDGE_FLAG_ME: u8 = 1 << 2;
const EDGE_FLAG_BREADCRUMB: u8 = 1 << 3;

/// everything needed to build a `GraphStore` from a host `Setup` message,
/// kept decoupled from the wire DTOs so the core doesn't depend on serde/json
pub struct SetupInput<'a> {
    pub punter: u32,
    pub punters: u32,
    pub site_ids: &'a [NodeId],
    pub rivers: &'a [(NodeId, NodeId)],
    pub mine_sites: &'a [NodeId],
    pub has_futures: bool,
    pub has_splurges: bool,
    pub has_options: bool,
}

/// an opponent (or our own) claim/option touching one river
///
/// the protocol layer tags these `Claim`/`Option`, but a `Claim` against
/// an already-claimed river is treated identically to an `Option` — so
/// the core only needs source/target/punter, not the tag.
#[derive(Debug, Clone, Copy)]
pub struct EdgeTouch {
    pub source: NodeId,
    pub target: NodeId,
    pub punter: u32,
}

/// the CSR adjacency + claim-state graph, round-tripped through a byte blob every turn
pub struct GraphStore {
    header: Header,
    nodes: Vec<Node>,
    edge_refs: Vec<u32>,
    edges: Vec<Edge>,
    mines: Vec<Mine>,
    targets: Vec<Target>,
}

impl GraphStore {
    pub fn from_setup(input: SetupInput) -> Self {
        let max_node_id = input.site_ids.iter().copied().max().unwrap_or(0);
        let node_count = max_node_id as usize + 2; // + sentinel

        let mut mines_order: Vec<NodeId> = input.mine_sites.to_vec();
        let seed = derive_seed(
            input.punter,
            input.punters,
            input.site_ids.len(),
            input.rivers.len(),
            input.mine_sites.len(),
        );
        let mut rng = SmallRng::seed_from_u64(seed);
        mines_order.shuffle(&mut rng);

        let edges: Vec<Edge> = input
            .rivers
            .iter()
            .map(|&(s, t)| Edge::new(s, t))
            .collect();

        let mut edges_of_nodes: Vec<Vec<u32>> = vec![Vec::new(); node_count];
        for (idx, e) in edges.iter().enumerate() {
            edges_of_nodes[e.source as usize].push(idx as u32);
            edges_of_nodes[e.target as usize].push(idx as u32);
        }

        let mut nodes = vec![Node::default(); node_count];
        let mut edge_refs = Vec::with_capacity(edges.len() * 2);
        for (idx, incident) in edges_of_nodes.into_iter().enumerate() {
            nodes[idx].first_edge_ref = edge_refs.len() as u32;
            edge_refs.extend(incident);
        }
        // sentinel's first_edge_ref equals 2*edges, i.e. edge_refs.len() here
        debug_assert_eq!(edge_refs.len(), edges.len() * 2);

        let mut mines = Vec::with_capacity(mines_order.len());
        for site in mines_order {
            nodes[site as usize].is_mine = true;
            mines.push(Mine { site });
        }

        let options_avail = if input.has_options {
            mines.len() as u32
        } else {
            0
        };

        let header = Header {
            punters_sz: input.punters,
            punter_id: input.punter,
            move_seq: 0,
            options_avail,
            has_futures: input.has_futures,
            has_splurges: input.has_splurges,
        };

        Self {
            header,
            nodes,
            edge_refs,
            edges,
            mines,
            targets: Vec::new(),
        }
    }

    // --- counts -----------------------------------------------------

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_mines(&self) -> usize {
        self.mines.len()
    }

    pub fn whoami(&self) -> u32 {
        self.header.punter_id
    }

    /// total moves available over the whole game: edges / punters
    pub fn moves_total(&self) -> usize {
        self.edges.len() / self.header.punters_sz.max(1) as usize
    }

    // --- topology queries --------------------------------------------

    /// the range of edge-ref indices incident to `node`; the sentinel
    /// node guarantees this is valid even for the last real site
    fn edge_ref_range(&self, node: NodeId) -> std::ops::Range<usize> {
        let n = node as usize;
        let from = self.nodes[n].first_edge_ref as usize;
        let to = self.nodes[n + 1].first_edge_ref as usize;
        from..to
    }

    /// edge indices incident to `node`, in storage order
    pub fn edges_of(&self, node: NodeId) -> &[u32] {
        &self.edge_refs[self.edge_ref_range(node)]
    }

    pub fn get_edge_by_ref(&self, edge_ref: usize) -> &Edge {
        &self.edges[self.edge_refs[edge_ref] as usize]
    }

    pub fn find_edge(&self, a: NodeId, b: NodeId) -> Option<usize> {
        self.edges_of(a)
            .iter()
            .map(|&eid| eid as usize)
            .find(|&eid| self.edges[eid].other(a) == b)
    }

    pub fn is_mine(&self, node: NodeId) -> bool {
        (node as usize) < self.nodes.len() && self.nodes[node as usize].is_mine
    }

    pub fn edge(&self, idx: usize) -> &Edge {
        &self.edges[idx]
    }

    pub fn edge_mut(&mut self, idx: usize) -> &mut Edge {
        &mut self.edges[idx]
    }

    pub fn mine(&self, i: usize) -> &Mine {
        &self.mines[i]
    }

    pub fn mines(&self) -> &[Mine] {
        &self.mines
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn target_mut(&mut self, i: usize) -> &mut Target {
        &mut self.targets[i]
    }

    /// append the planner's freshly computed target list
    pub fn set_targets(&mut self, targets: Vec<Target>) {
        self.targets = targets;
    }

    // --- mutation ------------------------------------------------------

    /// apply opponents' (and our own) moves from this turn's host message
    ///
    /// `Pass` carries no edge and is ignored by the core; `Splurge` is
    /// pre-expanded into a sequence of `EdgeTouch`es by the protocol layer
    /// before reaching here.
    pub fn update(&mut self, touches: &[EdgeTouch]) {
        for t in touches {
            let eid = self
                .find_edge(t.source, t.target)
                .expect("update: edge not found for claim/option");
            let claimed_by_me = t.punter == self.header.punter_id;
            let e = &mut self.edges[eid];
            if !e.claimed {
                e.claimed = true;
                e.me = claimed_by_me;
            } else {
                assert!(e.can_option(), "update: option slot already used");
                e.option = true;
                self.header.options_avail = self.header.options_avail.saturating_sub(1);
                if !e.me {
                    e.me = claimed_by_me;
                }
            }
        }
        self.header.move_seq += 1;
    }

    // --- wire (de)serialization -----------------------------------------

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_u32::<BigEndian>(self.header.punters_sz).unwrap();
        buf.write_u32::<BigEndian>(self.header.punter_id).unwrap();
        buf.write_u32::<BigEndian>(self.header.move_seq).unwrap();
        buf.write_u32::<BigEndian>(self.nodes.len() as u32).unwrap();
        buf.write_u32::<BigEndian>(self.edges.len() as u32).unwrap();
        buf.write_u32::<BigEndian>(self.mines.len() as u32).unwrap();
        buf.write_u32::<BigEndian>(self.targets.len() as u32).unwrap();
        buf.write_u32::<BigEndian>(self.header.options_avail).unwrap();
        let mut flags = 0u8;
        if self.header.has_futures {
            flags |= FLAG_HAS_FUTURES;
        }
        if self.header.has_splurges {
            flags |= FLAG_HAS_SPLURGES;
        }
        buf.write_u8(flags).unwrap();

        for n in &self.nodes {
            buf.write_u32::<BigEndian>(n.first_edge_ref).unwrap();
            buf.write_u8(n.is_mine as u8).unwrap();
        }
        for r in &self.edge_refs {
            buf.write_u32::<BigEndian>(*r).unwrap();
        }
        for e in &self.edges {
            buf.write_u32::<BigEndian>(e.source).unwrap();
            buf.write_u32::<BigEndian>(e.target).unwrap();
            let mut f = 0u8;
            if e.claimed {
                f |= EDGE_FLAG_CLAIMED;
            }
            if e.option {
                f |= EDGE_FLAG_OPTION;
            }
            if e.me {
                f |= EDGE_FLAG_ME;
            }
            if e.breadcrumb {
                f |= EDGE_FLAG_BREADCRUMB;
            }
            buf.write_u8(f).unwrap();
        }
        for m in &self.mines {
            buf.write_u32::<BigEndian>(m.site).unwrap();
        }
        for t in &self.targets {
            buf.write_u32::<BigEndian>(t.source).unwrap();
            buf.write_u32::<BigEndian>(t.target).unwrap();
            buf.write_u8(t.reached as u8).unwrap();
        }
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let mut cur = Cursor::new(bytes);
        let punters_sz = cur.read_u32::<BigEndian>()?;
        let punter_id = cur.read_u32::<BigEndian>()?;
        let move_seq = cur.read_u32::<BigEndian>()?;
        let nodes_n = cur.read_u32::<BigEndian>()? as usize;
        let edges_n = cur.read_u32::<BigEndian>()? as usize;
        let mines_n = cur.read_u32::<BigEndian>()? as usize;
        let targets_n = cur.read_u32::<BigEndian>()? as usize;
        let options_avail = cur.read_u32::<BigEndian>()?;
        let flags = cur.read_u8()?;

        let header = Header {
            punters_sz,
            punter_id,
            move_seq,
            options_avail,
            has_futures: flags & FLAG_HAS_FUTURES != 0,
            has_splurges: flags & FLAG_HAS_SPLURGES != 0,
        };

        let mut nodes = Vec::with_capacity(nodes_n);
        for _ in 0..nodes_n {
            let first_edge_ref = cur.read_u32::<BigEndian>()?;
            let is_mine = cur.read_u8()? != 0;
            nodes.push(Node {
                first_edge_ref,
                is_mine,
            });
        }

        let mut edge_refs = Vec::with_capacity(edges_n * 2);
        for _ in 0..(edges_n * 2) {
            edge_refs.push(cur.read_u32::<BigEndian>()?);
        }

        let mut edges = Vec::with_capacity(edges_n);
        for _ in 0..edges_n {
            let source = cur.read_u32::<BigEndian>()?;
            let target = cur.read_u32::<BigEndian>()?;
            let f = cur.read_u8()?;
            edges.push(Edge {
                source,
                target,
                claimed: f & EDGE_FLAG_CLAIMED != 0,
                option: f & EDGE_FLAG_OPTION != 0,
                me: f & EDGE_FLAG_ME != 0,
                breadcrumb: f & EDGE_FLAG_BREADCRUMB != 0,
            });
        }

        let mut mines = Vec::with_capacity(mines_n);
        for _ in 0..mines_n {
            mines.push(Mine {
                site: cur.read_u32::<BigEndian>()?,
            });
        }

        let mut targets = Vec::with_capacity(targets_n);
        for _ in 0..targets_n {
            let source = cur.read_u32::<BigEndian>()?;
            let target = cur.read_u32::<BigEndian>()?;
            let reached = cur.read_u8()? != 0;
            targets.push(Target {
                source,
                target,
                reached,
            });
        }

        Ok(Self {
            header,
            nodes,
            edge_refs,
            edges,
            mines,
            targets,
        })
    }
}

/// deterministic stand-in for `std::random_device` so mine shuffling stays
/// reproducible without any CLI flag or env var to carry a seed
fn derive_seed(punter: u32, punters: u32, sites: usize, rivers: usize, mines: usize) -> u64 {
    let mut hasher = DefaultHasher::new();
    punter.hash(&mut hasher);
    punters.hash(&mut hasher);
    sites.hash(&mut hasher);
    rivers.hash(&mut hasher);
    mines.hash(&mut hasher);
    hasher.finish()
}
