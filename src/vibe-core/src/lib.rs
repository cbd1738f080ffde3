//! Core plugin API for the Vibe music player.
//!
//! Plugins publish songs, albums, artists and playlists into a
//! process-wide catalog (the [`Vibe`] façade) and talk to the host
//! application through the narrow [`Media`] and [`Pages`] contracts. The
//! host side of those contracts — widget rendering, audio decode, the
//! actual page stack — lives in the application, not here.
//!
//! The pieces:
//!
//! - the entity model: [`Song`], [`Artist`], [`Album`], [`Playlist`],
//!   [`Queue`], all cheap-to-clone handles with id-based identity;
//! - [`SongList`], the ordered collection engine the album/playlist/queue
//!   types share by composition, with typed change events;
//! - [`Vibe`], the dependency-injected registry: append-only,
//!   ownership-tagged records of everything plugins publish;
//! - [`reconcile`], which merges extracted file metadata into the entity
//!   graph without duplicating artists and albums;
//! - ambient plumbing: per-user [`paths`], [`config`], [`logging`], the
//!   ref-counted [`Image`] capability, and the [`remote`] player link.
//!
//! Everything here is single-threaded by design: entity mutation is
//! synchronous and cooperative, and change events fire on the mutating
//! call, in order, before it returns.

pub mod auth;
pub mod config;
pub mod events;
pub mod ids;
pub mod image;
pub mod logging;
pub mod media;
pub mod pages;
pub mod paths;
pub mod plugin;
pub mod reconcile;
#[cfg(unix)]
pub mod remote;
pub mod songlist;
pub mod tags;
pub mod vibe;

mod album;
mod artist;
mod playlist;
mod queue;
mod song;

pub use album::{Album, AlbumOptions};
pub use artist::{Artist, ArtistOptions};
pub use auth::{AuthEntry, AuthError};
pub use config::{Config, ConfigError, LogLevel, LoggingConfig, MetadataConfig, ValidationError};
pub use events::{ListenerId, Listeners};
pub use ids::EntityId;
pub use image::{Image, ImageError, ImageSource};
pub use logging::{init_logging, LoggingError, LoggingGuard};
pub use media::{LoopMode, Media, MediaEvent, PlaybackStatus, ShuffleMode};
pub use pages::{
    Button, Callback, Page, PageContent, PageOptions, Pages, Section, SectionItem, SectionKind,
};
pub use paths::{AppDirs, DirsError};
pub use playlist::{Playlist, PlaylistOptions};
pub use plugin::{
    Plugin, PluginFeatures, PluginHooks, PluginOptions, PluginStatus, PluginUpdate, SearchResult,
};
pub use queue::Queue;
pub use reconcile::{apply_tags, find_matching_album, find_matching_artist, ApplyOptions};
#[cfg(unix)]
pub use remote::{PlayerCommand, PlayerLink, RemoteError};
pub use song::{Song, SongOptions, SongSource};
pub use songlist::{SongCollection, SongList, SongListEvent, SongListOptions};
pub use tags::{MetaError, TagData};
pub use vibe::{Registered, Vibe, VibeError, VibeEvent};

pub const APP_NAME: &str = "vibe";
pub const APP_AUTHOR: &str = "Vibe";
pub const APP_QUALIFIER: &str = "io";
