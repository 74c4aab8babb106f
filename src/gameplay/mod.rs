//! graph topology, claim state, and the per-turn byte blob that carries both

pub mod edge;
pub mod header;
pub mod mine;
pub mod node;
pub mod store;
pub mod target;

pub use edge::Edge;
pub use header::Header;
pub use mine::Mine;
pub use node::Node;
pub use store::{EdgeTouch, GraphStore, SetupInput};
pub use target::Target;
