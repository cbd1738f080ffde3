//! Fire-and-forget command channel to the companion player process.
//!
//! One textual frame per command, `"<command>>><json-argument-array>"`,
//! written to a unix-domain socket under the runtime dir. No response is
//! read; delivery is best-effort and callers treat failures as advisory.

use crate::paths::AppDirs;
use serde_json::Value;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

const SOCKET_NAME: &str = "player.sock";
const FRAME_SEPARATOR: &str = ">>>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    Play,
    Pause,
    Next,
    Previous,
}

impl PlayerCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerCommand::Play => "play",
            PlayerCommand::Pause => "pause",
            PlayerCommand::Next => "next",
            PlayerCommand::Previous => "previous",
        }
    }
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("failed to connect to player socket {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode command arguments: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write command frame: {0}")]
    Write(std::io::Error),
}

/// Connection point to the player daemon. Cheap to construct; a fresh
/// connection is made per command.
#[derive(Debug, Clone)]
pub struct PlayerLink {
    socket_path: PathBuf,
}

impl PlayerLink {
    pub fn new(dirs: &AppDirs) -> Self {
        Self {
            socket_path: dirs.runtime_dir().join(SOCKET_NAME),
        }
    }

    pub fn with_socket(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    pub fn socket_path(&self) -> &PathBuf {
        &self.socket_path
    }

    /// Send one command frame. Nothing is read back.
    pub fn send(&self, command: PlayerCommand, args: &[Value]) -> Result<(), RemoteError> {
        let frame = encode_frame(command, args)?;
        let mut stream =
            UnixStream::connect(&self.socket_path).map_err(|source| RemoteError::Connect {
                path: self.socket_path.clone(),
                source,
            })?;
        stream
            .write_all(frame.as_bytes())
            .map_err(RemoteError::Write)?;
        debug!(command = command.as_str(), "sent player command");
        Ok(())
    }
}

fn encode_frame(command: PlayerCommand, args: &[Value]) -> Result<String, RemoteError> {
    Ok(format!(
        "{}{}{}",
        command.as_str(),
        FRAME_SEPARATOR,
        serde_json::to_string(args)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Read;
    use std::os::unix::net::UnixListener;

    #[test]
    fn frames_follow_the_wire_shape() {
        let frame = encode_frame(PlayerCommand::Play, &[json!(3), json!("queue")]).unwrap();
        assert_eq!(frame, r#"play>>>[3,"queue"]"#);

        let bare = encode_frame(PlayerCommand::Next, &[]).unwrap();
        assert_eq!(bare, "next>>>[]");
    }

    #[test]
    fn send_writes_one_frame_to_the_socket() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join(SOCKET_NAME);
        let listener = UnixListener::bind(&socket_path).unwrap();

        let link = PlayerLink::with_socket(&socket_path);
        link.send(PlayerCommand::Pause, &[]).unwrap();

        let (mut stream, _) = listener.accept().unwrap();
        let mut received = String::new();
        stream.read_to_string(&mut received).unwrap();
        assert_eq!(received, "pause>>>[]");
    }

    #[test]
    fn missing_player_is_a_connect_error() {
        let dir = tempfile::tempdir().unwrap();
        let link = PlayerLink::with_socket(dir.path().join("absent.sock"));
        assert!(matches!(
            link.send(PlayerCommand::Play, &[]),
            Err(RemoteError::Connect { .. })
        ));
    }
}
