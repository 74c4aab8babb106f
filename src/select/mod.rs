//! per-turn move selection: breadcrumb paths first, then the fallback chain

pub mod selector;

pub use selector::{make_move, Move};
