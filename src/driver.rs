//! the per-process turn dispatcher: handshake once, then one setup/move/stop
//! message, then exit — the host relaunches the binary fresh every turn

use crate::gameplay::{EdgeTouch, GraphStore, SetupInput};
use crate::transport::dto::{
    ClaimOut, FutureDto, HandshakeRecv, HandshakeSend, HostMessage, MoveDto, MoveReply, PassOut,
    ReadyMessage, SetupMessage, StopMessage, TurnMessage,
};
use crate::transport::{decode_state, encode_state, framing};
use crate::{plan, select, NodeId, PUNTER_NAME};
use std::io::{Read, Write};

/// handshake, then dispatch the single setup/move/stop message that follows
pub fn run<R: Read, W: Write>(input: &mut R, output: &mut W) -> anyhow::Result<()> {
    handshake(input, output)?;

    let raw = framing::read_frame(input)?;
    let Ok(message) = serde_json::from_str::<HostMessage>(&raw) else {
        log::error!("unknown game state: {raw}");
        std::process::exit(1);
    };

    match message {
        HostMessage::Setup(setup) => handle_setup(setup, output),
        HostMessage::Turn(turn) => handle_turn(turn, output),
        HostMessage::Stop(stop) => {
            handle_stop(&stop);
            Ok(())
        }
    }
}

fn handshake<R: Read, W: Write>(input: &mut R, output: &mut W) -> anyhow::Result<()> {
    let send = HandshakeSend {
        me: PUNTER_NAME.to_string(),
    };
    framing::write_frame(output, &serde_json::to_string(&send)?)?;

    let raw = framing::read_frame(input)?;
    let recv: HandshakeRecv = serde_json::from_str(&raw)?;
    anyhow::ensure!(
        recv.you == PUNTER_NAME,
        "handshake echo mismatch: host returned {:?}",
        recv.you
    );
    Ok(())
}

fn handle_setup<W: Write>(setup: SetupMessage, output: &mut W) -> anyhow::Result<()> {
    let site_ids: Vec<NodeId> = setup.map.sites.iter().map(|s| s.id).collect();
    let rivers: Vec<(NodeId, NodeId)> = setup
        .map
        .rivers
        .iter()
        .map(|r| (r.source, r.target))
        .collect();

    let mut store = GraphStore::from_setup(SetupInput {
        punter: setup.punter,
        punters: setup.punters,
        site_ids: &site_ids,
        rivers: &rivers,
        mine_sites: &setup.map.mines,
        has_futures: setup.settings.futures,
        has_splurges: setup.settings.splurges,
        has_options: setup.settings.options,
    });

    let futures = plan::plan(&mut store);
    log::info!(
        "setup: {} sites, {} rivers, {} mines, {} breadcrumb targets",
        store.num_nodes() - 1,
        store.num_edges(),
        store.num_mines(),
        store.targets().len(),
    );

    let reply = ReadyMessage {
        ready: setup.punter,
        state: encode_state(&store),
        futures: futures
            .into_iter()
            .map(|f| FutureDto {
                source: f.source,
                target: f.target,
            })
            .collect(),
    };
    framing::write_frame(output, &serde_json::to_string(&reply)?)
        .map_err(anyhow::Error::from)
}

fn handle_turn<W: Write>(turn: TurnMessage, output: &mut W) -> anyhow::Result<()> {
    let mut store = decode_state(&turn.state)?;
    let touches = expand_moves(&turn.moves.moves);
    store.update(&touches);

    let whoami = store.whoami();
    let mv = select::make_move(&mut store);
    let state = encode_state(&store);
    let reply = match mv {
        select::Move::Claim { source, target } => MoveReply::Claim {
            claim: ClaimOut {
                punter: whoami,
                source,
                target,
            },
            state,
        },
        select::Move::Option { source, target } => MoveReply::Option {
            option: ClaimOut {
                punter: whoami,
                source,
                target,
            },
            state,
        },
        select::Move::Pass => MoveReply::Pass {
            pass: PassOut { punter: whoami },
            state,
        },
    };
    framing::write_frame(output, &serde_json::to_string(&reply)?)
        .map_err(anyhow::Error::from)
}

fn handle_stop(stop: &StopMessage) {
    log::info!("final scores:");
    for score in &stop.stop.scores {
        log::info!(" - punter: {}, score: {}", score.punter, score.score);
    }
}

/// splurges expand into a chain of claims over consecutive route sites,
/// matching the original's flattening at the transport boundary so the
/// core only ever sees claim/option touches
fn expand_moves(moves: &[MoveDto]) -> Vec<EdgeTouch> {
    let mut touches = Vec::new();
    for m in moves {
        match m {
            MoveDto::Claim { claim } => touches.push(EdgeTouch {
                source: claim.source,
                target: claim.target,
                punter: claim.punter,
            }),
            MoveDto::Option { option } => touches.push(EdgeTouch {
                source: option.source,
                target: option.target,
                punter: option.punter,
            }),
            MoveDto::Splurge { splurge } => {
                let mut prev: Option<NodeId> = None;
                for &site in &splurge.route {
                    if let Some(p) = prev {
                        touches.push(EdgeTouch {
                            source: p,
                            target: site,
                            punter: splurge.punter,
                        });
                    }
                    prev = Some(site);
                }
            }
            MoveDto::Pass { .. } => {}
        }
    }
    touches
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn frame(payload: &str) -> String {
        format!("{}:{}", payload.len(), payload)
    }

    /// read every frame written to `output` back out, in order
    fn sent_frames(output: Vec<u8>) -> Vec<String> {
        let mut cur = Cursor::new(output);
        let mut frames = Vec::new();
        while let Ok(f) = framing::read_frame(&mut cur) {
            frames.push(f);
        }
        frames
    }

    #[test]
    fn handshake_only() {
        let mut input = Cursor::new(frame(&format!(r#"{{"you":"{PUNTER_NAME}"}}"#)).into_bytes());
        let mut output = Vec::new();
        // handshake succeeds, then read_frame hits eof looking for the next message
        assert!(run(&mut input, &mut output).is_err());
        let frames = sent_frames(output);
        assert_eq!(frames.len(), 1);
        assert!(frames[0].contains(&format!(r#""me":"{PUNTER_NAME}""#)));
    }

    #[test]
    fn setup_round_trip_yields_ready_with_state() {
        let handshake_reply = frame(&format!(r#"{{"you":"{PUNTER_NAME}"}}"#));
        let setup = frame(
            r#"{"punter":0,"punters":2,"settings":{"options":false},
                "map":{"sites":[{"id":0},{"id":1},{"id":2}],
                       "rivers":[{"source":0,"target":1},{"source":1,"target":2},{"source":0,"target":2}],
                       "mines":[0]}}"#,
        );
        let mut input = Cursor::new(format!("{handshake_reply}{setup}").into_bytes());
        let mut output = Vec::new();
        run(&mut input, &mut output).unwrap();

        let frames = sent_frames(output);
        assert_eq!(frames.len(), 2);
        let reply: serde_json::Value = serde_json::from_str(&frames[1]).unwrap();
        assert_eq!(reply["ready"], 0);
        assert!(reply["state"].as_str().is_some_and(|s| !s.is_empty()));
    }

    #[test]
    fn stop_message_logs_without_error() {
        let handshake_reply = frame(&format!(r#"{{"you":"{PUNTER_NAME}"}}"#));
        let stop = frame(r#"{"stop":{"moves":[],"scores":[{"punter":0,"score":4}]}}"#);
        let mut input = Cursor::new(format!("{handshake_reply}{stop}").into_bytes());
        let mut output = Vec::new();
        assert!(run(&mut input, &mut output).is_ok());
    }

    #[test]
    fn handshake_mismatch_is_an_error() {
        let handshake_reply = frame(r#"{"you":"someone_else"}"#);
        let mut input = Cursor::new(handshake_reply.into_bytes());
        let mut output = Vec::new();
        assert!(run(&mut input, &mut output).is_err());
    }

    #[test]
    fn expand_moves_flattens_splurge_into_claims() {
        let moves = vec![MoveDto::Splurge {
            splurge: crate::transport::dto::SplurgeBody {
                punter: 1,
                route: vec![0, 1, 2, 3],
            },
        }];
        let touches = expand_moves(&moves);
        assert_eq!(touches.len(), 3);
        assert_eq!((touches[0].source, touches[0].target), (0, 1));
        assert_eq!((touches[2].source, touches[2].target), (2, 3));
        assert!(touches.iter().all(|t| t.punter == 1));
    }
}
