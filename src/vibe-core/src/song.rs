use crate::album::{Album, WeakAlbum};
use crate::artist::Artist;
use crate::ids::EntityId;
use crate::image::Image;
use crate::plugin::Plugin;
use crate::songlist::SongCollection;
use crate::vibe::Vibe;
use chrono::NaiveDate;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

/// Where a song's audio comes from: a local file or a streaming locator.
/// Opaque to the API core; the host's playback engine interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SongSource {
    File(PathBuf),
    Stream(String),
}

/// Construction property bag for [`Song`]. Everything is optional; fields
/// left out keep their defaults and can be filled in later by
/// reconciliation.
#[derive(Default)]
pub struct SongOptions {
    pub id: Option<EntityId>,
    pub title: Option<String>,
    pub artists: Vec<Artist>,
    pub album: Option<Album>,
    pub url: Option<String>,
    pub source: Option<SongSource>,
    pub image: Option<Image>,
    pub explicit: bool,
    pub disc_number: Option<u32>,
    pub track_number: Option<u32>,
    pub isrc: Option<String>,
    pub publisher: Option<String>,
    pub date: Option<NaiveDate>,
    pub lyrics: Option<String>,
    /// Owning plugin; when set, the song is recorded in the catalog.
    pub plugin: Option<Plugin>,
}

pub(crate) struct SongInner {
    id: EntityId,
    title: RefCell<Option<String>>,
    artists: RefCell<Vec<Artist>>,
    album: RefCell<Option<WeakAlbum>>,
    url: RefCell<Option<String>>,
    source: RefCell<Option<SongSource>>,
    image: RefCell<Option<Image>>,
    explicit: Cell<bool>,
    disc_number: Cell<u32>,
    track_number: Cell<u32>,
    isrc: RefCell<Option<String>>,
    publisher: RefCell<Option<String>>,
    date: Cell<Option<NaiveDate>>,
    lyrics: RefCell<Option<String>>,
}

/// One distinct playable unit. Created once; mutable fields are enriched in
/// place by reconciliation, never replaced wholesale.
#[derive(Clone)]
pub struct Song {
    inner: Rc<SongInner>,
}

impl Song {
    pub fn new(vibe: &Vibe, options: SongOptions) -> Self {
        let song = Self {
            inner: Rc::new(SongInner {
                id: options.id.unwrap_or_else(|| vibe.generate_id()),
                title: RefCell::new(options.title),
                artists: RefCell::new(options.artists),
                album: RefCell::new(None),
                url: RefCell::new(options.url),
                source: RefCell::new(options.source),
                image: RefCell::new(options.image),
                explicit: Cell::new(options.explicit),
                disc_number: Cell::new(options.disc_number.unwrap_or(1)),
                track_number: Cell::new(options.track_number.unwrap_or(1)),
                isrc: RefCell::new(options.isrc),
                publisher: RefCell::new(options.publisher),
                date: Cell::new(options.date),
                lyrics: RefCell::new(options.lyrics),
            }),
        };
        if let Some(album) = &options.album {
            album.add(&song);
        }
        if let Some(plugin) = &options.plugin {
            vibe.record_song(plugin, &song);
        }
        song
    }

    pub fn id(&self) -> EntityId {
        self.inner.id
    }

    pub fn title(&self) -> Option<String> {
        self.inner.title.borrow().clone()
    }

    pub fn set_title(&self, title: Option<String>) {
        *self.inner.title.borrow_mut() = title;
    }

    /// Snapshot of the artist handles, in credit order.
    pub fn artists(&self) -> Vec<Artist> {
        self.inner.artists.borrow().clone()
    }

    /// Append an artist credit. Reconciliation accumulates rather than
    /// replaces, so repeated passes can introduce duplicates when names
    /// vary; that is an accepted property of best-effort matching.
    pub fn add_artist(&self, artist: &Artist) {
        self.inner.artists.borrow_mut().push(artist.clone());
    }

    /// The album this song belongs to, if the album is still alive.
    pub fn album(&self) -> Option<Album> {
        self.inner.album.borrow().as_ref().and_then(WeakAlbum::upgrade)
    }

    /// Move the song into `album` (or out of any album for `None`). The
    /// album's member list and this back-reference stay consistent.
    pub fn set_album(&self, album: Option<&Album>) {
        match album {
            Some(album) => album.add(self),
            None => {
                if let Some(current) = self.album() {
                    current.remove(self);
                }
            }
        }
    }

    pub(crate) fn set_album_ref(&self, album: Option<WeakAlbum>) {
        *self.inner.album.borrow_mut() = album;
    }

    pub fn url(&self) -> Option<String> {
        self.inner.url.borrow().clone()
    }

    pub fn set_url(&self, url: Option<String>) {
        *self.inner.url.borrow_mut() = url;
    }

    pub fn source(&self) -> Option<SongSource> {
        self.inner.source.borrow().clone()
    }

    pub fn set_source(&self, source: Option<SongSource>) {
        *self.inner.source.borrow_mut() = source;
    }

    /// The song's individual image. Usually only the album carries one;
    /// this is for album-less songs.
    pub fn image(&self) -> Option<Image> {
        self.inner.image.borrow().clone()
    }

    pub fn set_image(&self, image: Option<Image>) {
        *self.inner.image.borrow_mut() = image;
    }

    pub fn explicit(&self) -> bool {
        self.inner.explicit.get()
    }

    pub fn set_explicit(&self, explicit: bool) {
        self.inner.explicit.set(explicit);
    }

    pub fn disc_number(&self) -> u32 {
        self.inner.disc_number.get()
    }

    pub fn set_disc_number(&self, disc_number: u32) {
        self.inner.disc_number.set(disc_number);
    }

    pub fn track_number(&self) -> u32 {
        self.inner.track_number.get()
    }

    pub fn set_track_number(&self, track_number: u32) {
        self.inner.track_number.set(track_number);
    }

    pub fn isrc(&self) -> Option<String> {
        self.inner.isrc.borrow().clone()
    }

    pub fn set_isrc(&self, isrc: Option<String>) {
        *self.inner.isrc.borrow_mut() = isrc;
    }

    pub fn publisher(&self) -> Option<String> {
        self.inner.publisher.borrow().clone()
    }

    pub fn set_publisher(&self, publisher: Option<String>) {
        *self.inner.publisher.borrow_mut() = publisher;
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.inner.date.get()
    }

    pub fn set_date(&self, date: Option<NaiveDate>) {
        self.inner.date.set(date);
    }

    pub fn lyrics(&self) -> Option<String> {
        self.inner.lyrics.borrow().clone()
    }

    pub fn set_lyrics(&self, lyrics: Option<String>) {
        *self.inner.lyrics.borrow_mut() = lyrics;
    }
}

impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Song {}

impl std::hash::Hash for Song {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Song")
            .field("id", &self.inner.id)
            .field("title", &*self.inner.title.borrow())
            .field("track_number", &self.inner.track_number.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_default_to_one() {
        let vibe = Vibe::new();
        let song = Song::new(&vibe, SongOptions::default());
        assert_eq!(song.disc_number(), 1);
        assert_eq!(song.track_number(), 1);
        assert!(!song.explicit());
        assert!(song.album().is_none());
    }

    #[test]
    fn caller_supplied_id_wins() {
        let vibe = Vibe::new();
        let song = Song::new(
            &vibe,
            SongOptions {
                id: Some(EntityId(4242)),
                ..Default::default()
            },
        );
        assert_eq!(song.id(), EntityId(4242));
    }

    #[test]
    fn enrichment_updates_in_place() {
        let vibe = Vibe::new();
        let song = Song::new(&vibe, SongOptions::default());
        let copy = song.clone();
        song.set_title(Some("Interlude".into()));
        assert_eq!(copy.title().as_deref(), Some("Interlude"));
    }
}
