use crate::NodeId;

/// an undirected river between two sites
///
/// `source`/`target` order is as given by the host and carries no semantic
/// meaning — an edge between 2 and 5 is the same river whether it arrived
/// as `(2,5)` or `(5,2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    /// some punter has claimed this river
    pub claimed: bool,
    /// the option slot on this river has been used
    pub option: bool,
    /// we own this river, via claim or option
    pub me: bool,
    /// the planner marked this river as part of a target path
    pub breadcrumb: bool,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            source,
            target,
            claimed: false,
            option: false,
            me: false,
            breadcrumb: false,
        }
    }

    /// the endpoint of this edge that isn't `from`
    pub fn other(&self, from: NodeId) -> NodeId {
        if self.source == from {
            self.target
        } else {
            self.source
        }
    }

    /// can be traversed for free: unclaimed, or already ours
    pub fn can_pass(&self) -> bool {
        !self.claimed || self.me
    }

    /// an option could still be executed on this river
    pub fn can_option(&self) -> bool {
        self.claimed && !self.option
    }
}
