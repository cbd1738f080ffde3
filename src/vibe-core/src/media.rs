//! Playback control contract, implemented by the host application and
//! consumed by plugins. The API core never implements this; it only defines
//! the surface plugins can rely on.

use crate::events::ListenerId;
use crate::queue::Queue;
use crate::song::Song;
use crate::songlist::SongList;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    #[default]
    None,
    /// Loop the current song list (playlist, album, queue, ...).
    List,
    /// Loop only the currently-playing song.
    Song,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShuffleMode {
    #[default]
    None,
    Shuffle,
    /// Not yet supported by hosts; they fall back to `Shuffle`.
    SmartShuffle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
    /// A song is still preparing to play.
    Loading,
}

/// Playback notifications emitted by the host.
#[derive(Debug, Clone)]
pub enum MediaEvent {
    Paused(Song),
    Resumed(Song),
    /// Jumped to the next queue entry.
    GoneNext { song: Song, queue_position: usize },
    /// Rewound to the previous queue entry.
    GonePrevious { song: Song, queue_position: usize },
    /// A song started playing. Not emitted for next/previous/resume.
    Playing(Song),
}

/// Media control implemented by the host application.
///
/// Positions and lengths are in microseconds; volume ranges 0..=100.
pub trait Media {
    /// Currently-playing song, if any.
    fn song(&self) -> Option<Song>;
    /// Current queue, if any.
    fn queue(&self) -> Option<Queue>;
    fn status(&self) -> PlaybackStatus;
    /// Current song's length in microseconds.
    fn length(&self) -> i64;

    fn loop_mode(&self) -> LoopMode;
    fn set_loop_mode(&self, mode: LoopMode);
    fn shuffle(&self) -> ShuffleMode;
    fn set_shuffle(&self, mode: ShuffleMode);
    /// Position within the current song; 0 when nothing is playing.
    fn position(&self) -> i64;
    fn set_position(&self, position: i64);
    fn volume(&self) -> u8;
    fn set_volume(&self, volume: u8);
    fn mute(&self) -> bool;
    fn set_mute(&self, mute: bool);

    /// Play one song, jumping to `position` microseconds into it.
    fn play_song(&self, song: &Song, position: i64);
    /// Play a song list starting at the zero-based `start_index`.
    fn play_list(&self, list: &SongList, start_index: usize);
    fn resume(&self);
    fn pause(&self);
    /// Jump to the next queue entry, if any.
    fn next(&self);
    /// Go back to the previous queue entry, if any.
    fn previous(&self);

    fn connect(&self, listener: Box<dyn FnMut(&MediaEvent)>) -> ListenerId;
    fn disconnect(&self, id: ListenerId);
}
