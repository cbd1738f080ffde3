use crate::artist::Artist;
use crate::ids::EntityId;
use crate::image::Image;
use crate::plugin::Plugin;
use crate::song::Song;
use crate::songlist::{SongCollection, SongList, SongListOptions};
use crate::vibe::Vibe;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

#[derive(Default)]
pub struct AlbumOptions {
    pub id: Option<EntityId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<Image>,
    pub songs: Vec<Song>,
    pub artists: Vec<Artist>,
    pub url: Option<String>,
    /// Overrides the single-song default.
    pub single: Option<bool>,
    /// Owning plugin; when set, the album is recorded in the catalog (as a
    /// song list and as an album).
    pub plugin: Option<Plugin>,
}

pub(crate) struct AlbumInner {
    list: SongList,
    artists: RefCell<Vec<Artist>>,
    url: Option<String>,
    single: Cell<bool>,
}

/// A source-derived song collection. Composition around [`SongList`] with
/// album artists, an optional URL and the `single` marker on top.
#[derive(Clone)]
pub struct Album {
    inner: Rc<AlbumInner>,
}

/// Non-owning album reference held by songs, so the song-to-album
/// back-reference does not keep the graph alive in a cycle.
pub(crate) struct WeakAlbum(Weak<AlbumInner>);

impl WeakAlbum {
    pub(crate) fn upgrade(&self) -> Option<Album> {
        self.0.upgrade().map(|inner| Album { inner })
    }
}

impl Album {
    pub fn new(vibe: &Vibe, options: AlbumOptions) -> Self {
        let list = SongList::new(
            vibe,
            SongListOptions {
                id: options.id,
                title: options.title,
                description: options.description,
                image: options.image,
                songs: Vec::new(),
                plugin: None,
            },
        );
        let album = Self {
            inner: Rc::new(AlbumInner {
                list,
                artists: RefCell::new(options.artists),
                url: options.url,
                single: Cell::new(false),
            }),
        };
        for song in &options.songs {
            album.add(song);
        }
        // `single` defaults to "exactly one song at construction" and is
        // never recomputed afterward.
        album
            .inner
            .single
            .set(options.single.unwrap_or(album.len() == 1));
        if let Some(plugin) = &options.plugin {
            vibe.record_songlist(plugin, &album.inner.list);
            vibe.record_album(plugin, &album);
        }
        album
    }

    pub fn id(&self) -> EntityId {
        self.inner.list.id()
    }

    pub fn title(&self) -> Option<String> {
        self.inner.list.title()
    }

    pub fn description(&self) -> Option<String> {
        self.inner.list.description()
    }

    pub fn image(&self) -> Option<Image> {
        self.inner.list.image()
    }

    pub fn set_image(&self, image: Option<Image>) {
        self.inner.list.set_image(image);
    }

    pub fn artists(&self) -> Vec<Artist> {
        self.inner.artists.borrow().clone()
    }

    pub fn add_artist(&self, artist: &Artist) {
        self.inner.artists.borrow_mut().push(artist.clone());
    }

    pub fn url(&self) -> Option<&str> {
        self.inner.url.as_deref()
    }

    /// True when the album is a single (had exactly one song when it was
    /// constructed, unless the creator said otherwise).
    pub fn single(&self) -> bool {
        self.inner.single.get()
    }

    pub(crate) fn downgrade(&self) -> WeakAlbum {
        WeakAlbum(Rc::downgrade(&self.inner))
    }

    /// Clear the back-reference of a song that pointed at this album.
    fn unlink(&self, song: &Song) {
        let points_here = song
            .album()
            .is_some_and(|current| current.id() == self.id());
        if points_here {
            song.set_album_ref(None);
        }
    }
}

impl SongCollection for Album {
    fn song_list(&self) -> &SongList {
        &self.inner.list
    }

    /// Append a song and take over its album membership: the song leaves
    /// any previous album and its back-reference is pointed here.
    fn add(&self, song: &Song) {
        if let Some(previous) = song.album() {
            if previous.id() != self.id() {
                previous.remove(song);
            }
        }
        song.set_album_ref(Some(self.downgrade()));
        self.inner.list.add(song);
    }

    fn pop(&self) -> Option<Song> {
        let popped = self.inner.list.pop();
        if let Some(song) = &popped {
            self.unlink(song);
        }
        popped
    }

    fn remove(&self, song: &Song) -> Option<Song> {
        let removed = self.inner.list.remove(song);
        if let Some(song) = &removed {
            self.unlink(song);
        }
        removed
    }

    fn remove_at(&self, index: usize) -> Option<Song> {
        let removed = self.inner.list.remove_at(index);
        if let Some(song) = &removed {
            self.unlink(song);
        }
        removed
    }
}

impl PartialEq for Album {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Album {}

impl fmt::Debug for Album {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Album")
            .field("id", &self.id())
            .field("title", &self.title())
            .field("single", &self.single())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::SongOptions;

    fn song(vibe: &Vibe, title: &str) -> Song {
        Song::new(
            vibe,
            SongOptions {
                title: Some(title.into()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn single_defaults_to_exactly_one_song() {
        let vibe = Vibe::new();
        let one = Album::new(
            &vibe,
            AlbumOptions {
                songs: vec![song(&vibe, "only")],
                ..Default::default()
            },
        );
        assert!(one.single());

        let two = Album::new(
            &vibe,
            AlbumOptions {
                songs: vec![song(&vibe, "a"), song(&vibe, "b")],
                ..Default::default()
            },
        );
        assert!(!two.single());

        let forced = Album::new(
            &vibe,
            AlbumOptions {
                songs: vec![song(&vibe, "a")],
                single: Some(false),
                ..Default::default()
            },
        );
        assert!(!forced.single());
    }

    #[test]
    fn add_sets_back_reference() {
        let vibe = Vibe::new();
        let album = Album::new(
            &vibe,
            AlbumOptions {
                title: Some("First Album".into()),
                ..Default::default()
            },
        );
        let track = song(&vibe, "a");

        album.add(&track);
        assert_eq!(track.album().unwrap(), album);
        assert!(album.has(&track));
    }

    #[test]
    fn remove_clears_back_reference() {
        let vibe = Vibe::new();
        let track = song(&vibe, "a");
        let album = Album::new(
            &vibe,
            AlbumOptions {
                songs: vec![track.clone()],
                ..Default::default()
            },
        );

        album.remove(&track);
        assert!(track.album().is_none());
        assert!(!album.has(&track));
    }

    #[test]
    fn song_moves_between_albums_exclusively() {
        let vibe = Vibe::new();
        let track = song(&vibe, "a");
        let first = Album::new(
            &vibe,
            AlbumOptions {
                songs: vec![track.clone()],
                ..Default::default()
            },
        );
        let second = Album::new(&vibe, AlbumOptions::default());

        second.add(&track);
        assert!(!first.has(&track));
        assert!(second.has(&track));
        assert_eq!(track.album().unwrap(), second);
    }

    #[test]
    fn back_reference_dies_with_the_album() {
        let vibe = Vibe::new();
        let track = song(&vibe, "a");
        {
            let album = Album::new(
                &vibe,
                AlbumOptions {
                    songs: vec![track.clone()],
                    ..Default::default()
                },
            );
            assert_eq!(track.album().unwrap(), album);
        }
        assert!(track.album().is_none());
    }

    #[test]
    fn plugin_construction_records_album_and_songlist() {
        let vibe = Vibe::new();
        let plugin = Plugin::new(&vibe, "test", Default::default());
        let album = Album::new(
            &vibe,
            AlbumOptions {
                title: Some("First Album".into()),
                plugin: Some(plugin.clone()),
                ..Default::default()
            },
        );

        assert!(vibe
            .find_album(|_, candidate| candidate == &album)
            .is_some());
        assert!(vibe
            .find_songlist(|_, candidate| candidate.id() == album.id())
            .is_some());
    }
}
