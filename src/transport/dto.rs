use crate::NodeId;
use serde::{Deserialize, Serialize};

// --- handshake ----------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HandshakeSend {
    pub me: String,
}

#[derive(Debug, Deserialize)]
pub struct HandshakeRecv {
    pub you: String,
}

// --- setup ----------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SetupMessage {
    pub punter: u32,
    pub punters: u32,
    #[serde(default)]
    pub settings: Settings,
    pub map: MapDto,
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub futures: bool,
    #[serde(default)]
    pub splurges: bool,
    #[serde(default)]
    pub options: bool,
}

#[derive(Debug, Deserialize)]
pub struct MapDto {
    pub sites: Vec<SiteDto>,
    pub rivers: Vec<RiverDto>,
    pub mines: Vec<NodeId>,
}

#[derive(Debug, Deserialize)]
pub struct SiteDto {
    pub id: NodeId,
}

#[derive(Debug, Deserialize)]
pub struct RiverDto {
    pub source: NodeId,
    pub target: NodeId,
}

// --- ready ------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ReadyMessage {
    pub ready: u32,
    pub state: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub futures: Vec<FutureDto>,
}

#[derive(Debug, Serialize)]
pub struct FutureDto {
    pub source: NodeId,
    pub target: NodeId,
}

// --- gameplay turn (incoming) -----------------------------------------------

#[derive(Debug, Deserialize)]
pub struct TurnMessage {
    #[serde(rename = "move")]
    pub moves: MovesDto,
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct MovesDto {
    pub moves: Vec<MoveDto>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MoveDto {
    Claim { claim: ClaimBody },
    Option { option: ClaimBody },
    Splurge { splurge: SplurgeBody },
    Pass { pass: PassBody },
}

#[derive(Debug, Deserialize)]
pub struct ClaimBody {
    pub punter: u32,
    pub source: NodeId,
    pub target: NodeId,
}

#[derive(Debug, Deserialize)]
pub struct SplurgeBody {
    pub punter: u32,
    pub route: Vec<NodeId>,
}

#[derive(Debug, Deserialize)]
pub struct PassBody {
    pub punter: u32,
}

// --- our reply move (outgoing) ----------------------------------------------

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MoveReply {
    Claim { claim: ClaimOut, state: String },
    Option { option: ClaimOut, state: String },
    Pass { pass: PassOut, state: String },
}

#[derive(Debug, Serialize)]
pub struct ClaimOut {
    pub punter: u32,
    pub source: NodeId,
    pub target: NodeId,
}

#[derive(Debug, Serialize)]
pub struct PassOut {
    pub punter: u32,
}

// --- stop -------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct StopMessage {
    pub stop: StopBody,
}

#[derive(Debug, Deserialize)]
pub struct StopBody {
    pub scores: Vec<ScoreDto>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreDto {
    pub punter: u32,
    pub score: i64,
}

// --- top-level dispatch -------------------------------------------------------

/// the host never tags its message with a type field, so routing happens by
/// which top-level key is present — `map` for setup, `move` for a turn,
/// `stop` for the final scores
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum HostMessage {
    Setup(SetupMessage),
    Turn(TurnMessage),
    Stop(StopMessage),
}
