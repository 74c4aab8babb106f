/// per-turn bookkeeping that isn't recoverable from the topology arrays
///
/// node/edge/mine/target counts are deliberately not stored here —
/// `GraphStore` derives them from the length of its own arrays, so they
/// can never drift out of sync with the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub punters_sz: u32,
    pub punter_id: u32,
    pub move_seq: u32,
    pub options_avail: u32,
    pub has_futures: bool,
    pub has_splurges: bool,
}
