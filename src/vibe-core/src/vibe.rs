//! The API façade: a process-wide catalog of everything plugins have
//! published, the id generator, the typed event stream, and the handles to
//! the host-supplied [`Media`] and [`Pages`] implementations.
//!
//! There is no global instance. The composition root constructs one [`Vibe`]
//! and injects it into every component that needs it; the handle is cheap to
//! clone. The only write-once state is the pair of host collaborators,
//! which may be supplied a single time each.

use crate::album::Album;
use crate::artist::Artist;
use crate::events::{ListenerId, Listeners};
use crate::ids::EntityId;
use crate::media::Media;
use crate::pages::{Page, Pages};
use crate::playlist::Playlist;
use crate::plugin::Plugin;
use crate::song::Song;
use crate::songlist::SongList;
use std::cell::{Cell, OnceCell, RefCell};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;
use tracing::debug;

/// An ownership-tagged catalog entry. Entities belong to exactly one plugin
/// for their lifetime, assigned at creation and never transferred; the
/// catalog is append-only.
#[derive(Debug, Clone)]
pub struct Registered<T> {
    pub plugin: Plugin,
    pub entity: T,
}

/// Catalog and lifecycle notifications.
#[derive(Debug, Clone)]
pub enum VibeEvent {
    /// The application and API finished initializing.
    Initialized,
    SongAdded { plugin: Plugin, song: Song },
    AlbumAdded { plugin: Plugin, album: Album },
    /// Also emitted for albums and playlists, which are song lists too.
    SonglistAdded { plugin: Plugin, list: SongList },
    ArtistAdded { plugin: Plugin, artist: Artist },
    PlaylistAdded { plugin: Plugin, playlist: Playlist },
    PluginAdded(Plugin),
    AuthStarted(Plugin),
    AuthEnded(Plugin),
}

#[derive(Debug, Error)]
pub enum VibeError {
    #[error("the media implementation was already set and cannot be replaced")]
    MediaAlreadySet,
    #[error("the pages implementation was already set and cannot be replaced")]
    PagesAlreadySet,
    #[error("no media implementation has been supplied by the host yet")]
    MediaNotSet,
    #[error("no pages implementation has been supplied by the host yet")]
    PagesNotSet,
}

struct VibeInner {
    next_id: Cell<u64>,
    songs: RefCell<Vec<Registered<Song>>>,
    albums: RefCell<Vec<Registered<Album>>>,
    artists: RefCell<Vec<Registered<Artist>>>,
    playlists: RefCell<Vec<Registered<Playlist>>>,
    songlists: RefCell<Vec<Registered<SongList>>>,
    plugins: RefCell<Vec<Plugin>>,
    media: OnceCell<Rc<dyn Media>>,
    pages: OnceCell<Rc<dyn Pages>>,
    listeners: Listeners<VibeEvent>,
}

#[derive(Clone)]
pub struct Vibe {
    inner: Rc<VibeInner>,
}

impl Vibe {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(VibeInner {
                next_id: Cell::new(0),
                songs: RefCell::new(Vec::new()),
                albums: RefCell::new(Vec::new()),
                artists: RefCell::new(Vec::new()),
                playlists: RefCell::new(Vec::new()),
                songlists: RefCell::new(Vec::new()),
                plugins: RefCell::new(Vec::new()),
                media: OnceCell::new(),
                pages: OnceCell::new(),
                listeners: Listeners::new(),
            }),
        }
    }

    /// Next unique id. Monotonic from 0, never reused, not persisted across
    /// restarts.
    pub fn generate_id(&self) -> EntityId {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        EntityId(id)
    }

    /// Announce that startup is complete.
    pub fn notify_initialized(&self) {
        self.inner.listeners.emit(&VibeEvent::Initialized);
    }

    pub fn record_song(&self, plugin: &Plugin, song: &Song) {
        debug!(plugin = plugin.name(), song = %song.id(), "song added to catalog");
        self.inner.songs.borrow_mut().push(Registered {
            plugin: plugin.clone(),
            entity: song.clone(),
        });
        self.inner.listeners.emit(&VibeEvent::SongAdded {
            plugin: plugin.clone(),
            song: song.clone(),
        });
    }

    pub fn record_album(&self, plugin: &Plugin, album: &Album) {
        debug!(plugin = plugin.name(), album = %album.id(), "album added to catalog");
        self.inner.albums.borrow_mut().push(Registered {
            plugin: plugin.clone(),
            entity: album.clone(),
        });
        self.inner.listeners.emit(&VibeEvent::AlbumAdded {
            plugin: plugin.clone(),
            album: album.clone(),
        });
    }

    pub fn record_artist(&self, plugin: &Plugin, artist: &Artist) {
        debug!(plugin = plugin.name(), artist = %artist.id(), "artist added to catalog");
        self.inner.artists.borrow_mut().push(Registered {
            plugin: plugin.clone(),
            entity: artist.clone(),
        });
        self.inner.listeners.emit(&VibeEvent::ArtistAdded {
            plugin: plugin.clone(),
            artist: artist.clone(),
        });
    }

    pub fn record_playlist(&self, plugin: &Plugin, playlist: &Playlist) {
        debug!(plugin = plugin.name(), playlist = %playlist.id(), "playlist added to catalog");
        self.inner.playlists.borrow_mut().push(Registered {
            plugin: plugin.clone(),
            entity: playlist.clone(),
        });
        self.inner.listeners.emit(&VibeEvent::PlaylistAdded {
            plugin: plugin.clone(),
            playlist: playlist.clone(),
        });
    }

    pub fn record_songlist(&self, plugin: &Plugin, list: &SongList) {
        debug!(plugin = plugin.name(), list = %list.id(), "song list added to catalog");
        self.inner.songlists.borrow_mut().push(Registered {
            plugin: plugin.clone(),
            entity: list.clone(),
        });
        self.inner.listeners.emit(&VibeEvent::SonglistAdded {
            plugin: plugin.clone(),
            list: list.clone(),
        });
    }

    /// Record a plugin the user installed.
    pub fn register_plugin(&self, plugin: &Plugin) {
        debug!(plugin = plugin.name(), version = plugin.version(), "plugin registered");
        self.inner.plugins.borrow_mut().push(plugin.clone());
        self.inner
            .listeners
            .emit(&VibeEvent::PluginAdded(plugin.clone()));
    }

    pub fn songs(&self) -> Vec<Registered<Song>> {
        self.inner.songs.borrow().clone()
    }

    pub fn albums(&self) -> Vec<Registered<Album>> {
        self.inner.albums.borrow().clone()
    }

    pub fn artists(&self) -> Vec<Registered<Artist>> {
        self.inner.artists.borrow().clone()
    }

    pub fn playlists(&self) -> Vec<Registered<Playlist>> {
        self.inner.playlists.borrow().clone()
    }

    pub fn songlists(&self) -> Vec<Registered<SongList>> {
        self.inner.songlists.borrow().clone()
    }

    pub fn plugins(&self) -> Vec<Plugin> {
        self.inner.plugins.borrow().clone()
    }

    /// First catalogued song matching the predicate, in record order.
    pub fn find_song(&self, mut predicate: impl FnMut(&Plugin, &Song) -> bool) -> Option<Song> {
        self.inner
            .songs
            .borrow()
            .iter()
            .find(|entry| predicate(&entry.plugin, &entry.entity))
            .map(|entry| entry.entity.clone())
    }

    pub fn find_album(&self, mut predicate: impl FnMut(&Plugin, &Album) -> bool) -> Option<Album> {
        self.inner
            .albums
            .borrow()
            .iter()
            .find(|entry| predicate(&entry.plugin, &entry.entity))
            .map(|entry| entry.entity.clone())
    }

    pub fn find_artist(
        &self,
        mut predicate: impl FnMut(&Plugin, &Artist) -> bool,
    ) -> Option<Artist> {
        self.inner
            .artists
            .borrow()
            .iter()
            .find(|entry| predicate(&entry.plugin, &entry.entity))
            .map(|entry| entry.entity.clone())
    }

    pub fn find_playlist(
        &self,
        mut predicate: impl FnMut(&Plugin, &Playlist) -> bool,
    ) -> Option<Playlist> {
        self.inner
            .playlists
            .borrow()
            .iter()
            .find(|entry| predicate(&entry.plugin, &entry.entity))
            .map(|entry| entry.entity.clone())
    }

    pub fn find_songlist(
        &self,
        mut predicate: impl FnMut(&Plugin, &SongList) -> bool,
    ) -> Option<SongList> {
        self.inner
            .songlists
            .borrow()
            .iter()
            .find(|entry| predicate(&entry.plugin, &entry.entity))
            .map(|entry| entry.entity.clone())
    }

    /// Supply the host's media implementation. Write-once: a second call is
    /// a configuration error.
    pub fn set_media(&self, media: Rc<dyn Media>) -> Result<(), VibeError> {
        self.inner
            .media
            .set(media)
            .map_err(|_| VibeError::MediaAlreadySet)
    }

    pub fn media(&self) -> Result<Rc<dyn Media>, VibeError> {
        self.inner
            .media
            .get()
            .cloned()
            .ok_or(VibeError::MediaNotSet)
    }

    /// Supply the host's page-stack implementation. Write-once.
    pub fn set_pages(&self, pages: Rc<dyn Pages>) -> Result<(), VibeError> {
        self.inner
            .pages
            .set(pages)
            .map_err(|_| VibeError::PagesAlreadySet)
    }

    pub fn pages(&self) -> Result<Rc<dyn Pages>, VibeError> {
        self.inner
            .pages
            .get()
            .cloned()
            .ok_or(VibeError::PagesNotSet)
    }

    /// Push a page onto the host's navigation stack. Plugins use this to
    /// open detail views.
    pub fn add_page(&self, page: Page) -> Result<(), VibeError> {
        self.pages()?.add(page);
        Ok(())
    }

    pub fn notify_auth_started(&self, plugin: &Plugin) {
        self.inner
            .listeners
            .emit(&VibeEvent::AuthStarted(plugin.clone()));
    }

    pub fn notify_auth_ended(&self, plugin: &Plugin) {
        self.inner
            .listeners
            .emit(&VibeEvent::AuthEnded(plugin.clone()));
    }

    pub fn connect(&self, listener: impl FnMut(&VibeEvent) + 'static) -> ListenerId {
        self.inner.listeners.connect(listener)
    }

    pub fn disconnect(&self, id: ListenerId) -> bool {
        self.inner.listeners.disconnect(id)
    }
}

impl Default for Vibe {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Vibe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vibe")
            .field("songs", &self.inner.songs.borrow().len())
            .field("albums", &self.inner.albums.borrow().len())
            .field("artists", &self.inner.artists.borrow().len())
            .field("plugins", &self.inner.plugins.borrow().len())
            .finish_non_exhaustive()
    }
}
