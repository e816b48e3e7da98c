//! Match WebSocket endpoint.
//!
//! Seats the caller in a room, then shuttles frames both ways until either
//! side goes away. Leaving the socket removes the player from the match.

use actix_web::{error, web, Error, HttpRequest, HttpResponse};
use actix_ws::{handle, Message};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::auth::PlayerIdentity;
use crate::config::settings;
use crate::matchmaking;
use crate::protocol::ClientMsg;

pub async fn ws_index(
    req: HttpRequest,
    body: web::Payload,
    identity: PlayerIdentity,
) -> Result<HttpResponse, Error> {
    let PlayerIdentity { player_id, name } = identity;

    // 1 · seat the player before upgrading
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(settings().outbound_buffer);
    let (room, ack) = matchmaking::join(player_id, name, outbound_tx)
        .await
        .map_err(error::ErrorServiceUnavailable)?;
    let ack_json = match serde_json::to_string(&ack) {
        Ok(json) => json,
        Err(e) => {
            room.leave(player_id).await;
            return Err(error::ErrorInternalServerError(e));
        }
    };

    // 2 · handshake
    let (response, mut session, mut ws_stream) = match handle(&req, body) {
        Ok(parts) => parts,
        Err(e) => {
            room.leave(player_id).await;
            return Err(e);
        }
    };

    actix::spawn(async move {
        if session.text(ack_json).await.is_err() {
            room.leave(player_id).await;
            return;
        }

        loop {
            tokio::select! {
                // client → room
                Some(frame) = ws_stream.next() => {
                    match frame {
                        Ok(Message::Text(text)) => match serde_json::from_str::<ClientMsg>(&text) {
                            Ok(msg) => {
                                if let Err(e) = room.send(player_id, msg).await {
                                    log::warn!("dispatch error for {player_id}: {e}");
                                    break;
                                }
                            }
                            Err(e) => log::warn!("malformed frame from {player_id}: {e}"),
                        },
                        Ok(Message::Ping(bytes)) => {
                            if session.pong(&bytes).await.is_err() {
                                break;
                            }
                        }
                        Ok(Message::Close(_)) => break,
                        Ok(_) => {}
                        Err(e) => {
                            log::warn!("WS protocol error for {player_id}: {e:?}");
                            break;
                        }
                    }
                }
                // room → client
                Some(json) = outbound_rx.recv() => {
                    if let Err(e) = session.text(json).await {
                        log::warn!("WS send failed for {player_id}: {e:?}");
                        break;
                    }
                }
                else => break,
            }
        }

        room.leave(player_id).await;
        let _ = session.close(None).await;
        log::info!("WS closed for player {player_id}");
    });

    Ok(response)
}
