//! WebSocket protocol message definitions
//! These are the wire types for client-server communication

use serde::{Deserialize, Serialize};

use crate::game::{InputState, PlayerId, WorldMap, WorldSnapshot};

/// Messages sent from client to server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Full set of held directions, replaces the previous one
    Movement(InputState),

    /// Fire a projectile
    Shoot {
        /// Aim direction in radians
        angle: f32,
    },
}

/// Messages sent from server to client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// First message on a connection; tells the client which key in
    /// `players` is its own
    Welcome { player_id: PlayerId },

    /// Map dimensions and scenery, sent once after `Welcome`
    MapData(WorldMap),

    /// World state after a tick
    StateUpdate(WorldSnapshot),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_movement() {
        let raw = r#"{"type":"movement","up":true,"down":false,"left":false,"right":true}"#;
        let msg: ClientMsg = serde_json::from_str(raw).unwrap();
        assert_eq!(
            msg,
            ClientMsg::Movement(InputState {
                up: true,
                down: false,
                left: false,
                right: true,
            })
        );
    }

    #[test]
    fn parses_shoot() {
        let msg: ClientMsg = serde_json::from_str(r#"{"type":"shoot","angle":1.5}"#).unwrap();
        assert_eq!(msg, ClientMsg::Shoot { angle: 1.5 });
    }

    #[test]
    fn rejects_unknown_type() {
        assert!(serde_json::from_str::<ClientMsg>(r#"{"type":"teleport","x":1}"#).is_err());
        assert!(serde_json::from_str::<ClientMsg>(r#"{"type":"shoot","angle":"left"}"#).is_err());
    }

    #[test]
    fn state_update_is_flat() {
        let json = serde_json::to_value(ServerMsg::StateUpdate(WorldSnapshot::default())).unwrap();
        assert_eq!(json["type"], "state_update");
        assert!(json["players"].is_object());
        assert!(json["projectiles"].is_array());
    }

    #[test]
    fn welcome_carries_player_id() {
        let json = serde_json::to_string(&ServerMsg::Welcome {
            player_id: PlayerId(12),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"welcome","player_id":12}"#);
    }
}
