use crate::ids::EntityId;
use crate::image::Image;
use crate::plugin::Plugin;
use crate::song::Song;
use crate::songlist::{SongCollection, SongList, SongListOptions};
use crate::vibe::Vibe;
use std::fmt;
use std::rc::Rc;

#[derive(Default)]
pub struct PlaylistOptions {
    pub id: Option<EntityId>,
    pub description: Option<String>,
    pub image: Option<Image>,
    pub songs: Vec<Song>,
    /// Owning plugin; when set, the playlist is recorded in the catalog (as
    /// a song list and as a playlist).
    pub plugin: Option<Plugin>,
}

struct PlaylistInner {
    list: SongList,
}

/// A user-curated song list. No fields beyond the base collection; it is
/// distinguished from [`crate::Album`] semantically (curated rather than
/// source-derived) and from [`crate::Queue`] (not a live playback cursor).
#[derive(Clone)]
pub struct Playlist {
    inner: Rc<PlaylistInner>,
}

impl Playlist {
    pub fn new(vibe: &Vibe, title: impl Into<String>, options: PlaylistOptions) -> Self {
        let list = SongList::new(
            vibe,
            SongListOptions {
                id: options.id,
                title: Some(title.into()),
                description: options.description,
                image: options.image,
                songs: options.songs,
                plugin: None,
            },
        );
        let playlist = Self {
            inner: Rc::new(PlaylistInner { list }),
        };
        if let Some(plugin) = &options.plugin {
            vibe.record_songlist(plugin, &playlist.inner.list);
            vibe.record_playlist(plugin, &playlist);
        }
        playlist
    }

    pub fn id(&self) -> EntityId {
        self.inner.list.id()
    }

    pub fn title(&self) -> Option<String> {
        self.inner.list.title()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.inner.list.set_title(Some(title.into()));
    }

    pub fn description(&self) -> Option<String> {
        self.inner.list.description()
    }

    pub fn set_description(&self, description: Option<String>) {
        self.inner.list.set_description(description);
    }

    pub fn image(&self) -> Option<Image> {
        self.inner.list.image()
    }

    pub fn set_image(&self, image: Option<Image>) {
        self.inner.list.set_image(image);
    }
}

impl SongCollection for Playlist {
    fn song_list(&self) -> &SongList {
        &self.inner.list
    }
}

impl PartialEq for Playlist {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Playlist {}

impl fmt::Debug for Playlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Playlist")
            .field("id", &self.id())
            .field("title", &self.title())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
