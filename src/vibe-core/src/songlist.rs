//! The ordered-collection engine shared by albums, playlists and the queue.
//!
//! A [`SongList`] owns an ordered sequence of [`Song`] handles and reports
//! every structural mutation through a typed event stream. Mutation methods
//! never panic on bad input: out-of-range indices and not-found songs
//! degrade to logged no-ops, since a UI-facing collection must tolerate
//! transient inconsistency from its callers.

use crate::ids::EntityId;
use crate::image::Image;
use crate::events::{ListenerId, Listeners};
use crate::plugin::Plugin;
use crate::song::Song;
use crate::vibe::Vibe;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use tracing::warn;

/// Structural change notifications. Dispatched synchronously, after the
/// mutation is fully applied, in listener-registration order.
#[derive(Debug, Clone)]
pub enum SongListEvent {
    Added(Song),
    Removed(Song),
    /// A song changed position. `displaced` carries the song that got
    /// swapped into the old slot, or `None` when the move was an edge
    /// insert (front/back) that displaced nobody.
    Reordered { song: Song, displaced: Option<Song> },
    /// The list was emptied wholesale, bypassing per-song `Removed` events.
    Cleared,
}

#[derive(Default)]
pub struct SongListOptions {
    pub id: Option<EntityId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<Image>,
    pub songs: Vec<Song>,
    /// Owning plugin; when set, the list is recorded in the catalog.
    pub plugin: Option<Plugin>,
}

struct SongListInner {
    id: EntityId,
    title: RefCell<Option<String>>,
    description: RefCell<Option<String>>,
    image: RefCell<Option<Image>>,
    songs: RefCell<Vec<Song>>,
    listeners: Listeners<SongListEvent>,
}

#[derive(Clone)]
pub struct SongList {
    inner: Rc<SongListInner>,
}

impl SongList {
    pub fn new(vibe: &Vibe, options: SongListOptions) -> Self {
        let list = Self {
            inner: Rc::new(SongListInner {
                id: options.id.unwrap_or_else(|| vibe.generate_id()),
                title: RefCell::new(options.title),
                description: RefCell::new(options.description),
                image: RefCell::new(options.image),
                songs: RefCell::new(Vec::new()),
                listeners: Listeners::new(),
            }),
        };
        for song in &options.songs {
            list.add(song);
        }
        if let Some(plugin) = &options.plugin {
            vibe.record_songlist(plugin, &list);
        }
        list
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

    pub fn description(&self) -> Option<String> {
        self.inner.description.borrow().clone()
    }

    pub fn set_description(&self, description: Option<String>) {
        *self.inner.description.borrow_mut() = description;
    }

    pub fn image(&self) -> Option<Image> {
        self.inner.image.borrow().clone()
    }

    pub fn set_image(&self, image: Option<Image>) {
        *self.inner.image.borrow_mut() = image;
    }

    pub fn len(&self) -> usize {
        self.inner.songs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.songs.borrow().is_empty()
    }

    /// Snapshot of the song handles in list order.
    pub fn songs(&self) -> Vec<Song> {
        self.inner.songs.borrow().clone()
    }

    /// Append to the end. No duplicate check is performed: callers wanting
    /// set semantics must ask [`SongList::has`] first.
    pub fn add(&self, song: &Song) {
        self.inner.songs.borrow_mut().push(song.clone());
        self.inner.listeners.emit(&SongListEvent::Added(song.clone()));
    }

    /// Remove and return the last song. Empty list: no-op, no event.
    pub fn pop(&self) -> Option<Song> {
        let popped = self.inner.songs.borrow_mut().pop();
        if let Some(song) = &popped {
            self.inner.listeners.emit(&SongListEvent::Removed(song.clone()));
        }
        popped
    }

    /// Remove the first song whose id matches. Not found: no-op, no event.
    pub fn remove(&self, song: &Song) -> Option<Song> {
        let removed = {
            let mut songs = self.inner.songs.borrow_mut();
            songs
                .iter()
                .position(|candidate| candidate.id() == song.id())
                .map(|index| songs.remove(index))
        };
        if let Some(song) = &removed {
            self.inner.listeners.emit(&SongListEvent::Removed(song.clone()));
        }
        removed
    }

    /// Remove the song at `index`. Out of range: no-op, no event.
    pub fn remove_at(&self, index: usize) -> Option<Song> {
        let removed = {
            let mut songs = self.inner.songs.borrow_mut();
            (index < songs.len()).then(|| songs.remove(index))
        };
        if let Some(song) = &removed {
            self.inner.listeners.emit(&SongListEvent::Removed(song.clone()));
        }
        removed
    }

    /// Id-based containment check. Callers that assign their own ids at
    /// construction must keep them unique for this to be meaningful.
    pub fn has(&self, song: &Song) -> bool {
        self.inner
            .songs
            .borrow()
            .iter()
            .any(|candidate| candidate.id() == song.id())
    }

    pub fn get(&self, index: usize) -> Option<Song> {
        self.inner.songs.borrow().get(index).cloned()
    }

    /// Containment dressed as a lookup: returns the stored handle when a
    /// song with the same id is in the list.
    pub fn find(&self, song: &Song) -> Option<Song> {
        self.inner
            .songs
            .borrow()
            .iter()
            .find(|candidate| candidate.id() == song.id())
            .cloned()
    }

    /// Sort by descending track number.
    pub fn sort(&self) {
        self.sort_by(|a, b| b.track_number().cmp(&a.track_number()));
    }

    /// In-place stable sort with a caller-supplied comparator. Sorting is a
    /// bulk update and fires no structural event.
    pub fn sort_by(&self, mut compare: impl FnMut(&Song, &Song) -> Ordering) {
        self.inner.songs.borrow_mut().sort_by(|a, b| compare(a, b));
    }

    /// Move a song (resolved by id) to `new_pos`.
    ///
    /// * song not in the list: logged no-op;
    /// * `new_pos` already holds this song: silent no-op, no event;
    /// * `new_pos < 0`: the song is moved to the front, `Reordered` fires
    ///   with `displaced: None`;
    /// * `new_pos` past the end: moved to the back, same event;
    /// * otherwise an exact two-element swap: the occupant of `new_pos`
    ///   lands in the song's old slot and rides along in `displaced`.
    pub fn reorder(&self, song: &Song, new_pos: isize) {
        let index = self
            .inner
            .songs
            .borrow()
            .iter()
            .position(|candidate| candidate.id() == song.id());
        match index {
            Some(index) => self.reorder_index(index, new_pos),
            None => warn!(
                list = %self.inner.id,
                song = %song.id(),
                "cannot reorder: song is not in this list"
            ),
        }
    }

    /// [`SongList::reorder`] with the source resolved by index.
    pub fn reorder_at(&self, index: usize, new_pos: isize) {
        if index >= self.len() {
            warn!(
                list = %self.inner.id,
                index,
                "cannot reorder: index is out of range"
            );
            return;
        }
        self.reorder_index(index, new_pos);
    }

    fn reorder_index(&self, index: usize, new_pos: isize) {
        let event = {
            let mut songs = self.inner.songs.borrow_mut();
            let song = songs[index].clone();

            if new_pos >= 0
                && (new_pos as usize) < songs.len()
                && songs[new_pos as usize].id() == song.id()
            {
                return;
            }

            if new_pos < 0 {
                songs.remove(index);
                songs.insert(0, song.clone());
                SongListEvent::Reordered { song, displaced: None }
            } else if new_pos as usize >= songs.len() {
                songs.remove(index);
                songs.push(song.clone());
                SongListEvent::Reordered { song, displaced: None }
            } else {
                let target = new_pos as usize;
                let displaced = songs[target].clone();
                songs.swap(index, target);
                SongListEvent::Reordered {
                    song,
                    displaced: Some(displaced),
                }
            }
        };
        self.inner.listeners.emit(&event);
    }

    /// Empty the list in one step, firing a single `Cleared` instead of
    /// per-song `Removed` events. Exposed through [`crate::Queue::clear`].
    pub(crate) fn clear(&self) {
        self.inner.songs.borrow_mut().clear();
        self.inner.listeners.emit(&SongListEvent::Cleared);
    }

    pub fn connect(&self, listener: impl FnMut(&SongListEvent) + 'static) -> ListenerId {
        self.inner.listeners.connect(listener)
    }

    pub fn disconnect(&self, id: ListenerId) -> bool {
        self.inner.listeners.disconnect(id)
    }
}

impl PartialEq for SongList {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for SongList {}

impl fmt::Debug for SongList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SongList")
            .field("id", &self.inner.id)
            .field("title", &*self.inner.title.borrow())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// Capability of being an ordered song collection. Album, playlist and
/// queue implement this by delegating to their embedded [`SongList`];
/// [`crate::Album`] overrides the membership methods to keep the
/// song-to-album back-reference consistent.
pub trait SongCollection {
    fn song_list(&self) -> &SongList;

    fn add(&self, song: &Song) {
        self.song_list().add(song);
    }

    fn pop(&self) -> Option<Song> {
        self.song_list().pop()
    }

    fn remove(&self, song: &Song) -> Option<Song> {
        self.song_list().remove(song)
    }

    fn remove_at(&self, index: usize) -> Option<Song> {
        self.song_list().remove_at(index)
    }

    fn has(&self, song: &Song) -> bool {
        self.song_list().has(song)
    }

    fn get(&self, index: usize) -> Option<Song> {
        self.song_list().get(index)
    }

    fn find(&self, song: &Song) -> Option<Song> {
        self.song_list().find(song)
    }

    fn songs(&self) -> Vec<Song> {
        self.song_list().songs()
    }

    fn len(&self) -> usize {
        self.song_list().len()
    }

    fn is_empty(&self) -> bool {
        self.song_list().is_empty()
    }

    fn sort(&self) {
        self.song_list().sort();
    }

    fn reorder(&self, song: &Song, new_pos: isize) {
        self.song_list().reorder(song, new_pos);
    }

    fn reorder_at(&self, index: usize, new_pos: isize) {
        self.song_list().reorder_at(index, new_pos);
    }
}

impl SongCollection for SongList {
    fn song_list(&self) -> &SongList {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::SongOptions;
    use std::cell::RefCell;

    fn song(vibe: &Vibe, title: &str) -> Song {
        Song::new(
            vibe,
            SongOptions {
                title: Some(title.into()),
                ..Default::default()
            },
        )
    }

    fn record_events(list: &SongList) -> Rc<RefCell<Vec<String>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        list.connect(move |event| {
            let label = match event {
                SongListEvent::Added(song) => format!("added:{}", song.title().unwrap()),
                SongListEvent::Removed(song) => format!("removed:{}", song.title().unwrap()),
                SongListEvent::Reordered { song, displaced } => format!(
                    "reordered:{}:{}",
                    song.title().unwrap(),
                    displaced
                        .as_ref()
                        .map(|s| s.title().unwrap())
                        .unwrap_or_else(|| "-".into())
                ),
                SongListEvent::Cleared => "cleared".into(),
            };
            sink.borrow_mut().push(label);
        });
        events
    }

    fn titles(list: &SongList) -> Vec<String> {
        list.songs().iter().map(|s| s.title().unwrap()).collect()
    }

    #[test]
    fn add_keeps_insertion_order() {
        let vibe = Vibe::new();
        let list = SongList::new(&vibe, SongListOptions::default());
        let events = record_events(&list);

        list.add(&song(&vibe, "a"));
        list.add(&song(&vibe, "b"));
        list.add(&song(&vibe, "c"));

        assert_eq!(list.len(), 3);
        assert_eq!(titles(&list), ["a", "b", "c"]);
        assert_eq!(&*events.borrow(), &["added:a", "added:b", "added:c"]);
    }

    #[test]
    fn pop_on_empty_list_is_silent() {
        let vibe = Vibe::new();
        let list = SongList::new(&vibe, SongListOptions::default());
        let events = record_events(&list);

        assert!(list.pop().is_none());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn remove_matches_by_id_not_reference() {
        let vibe = Vibe::new();
        let a = song(&vibe, "a");
        let list = SongList::new(
            &vibe,
            SongListOptions {
                songs: vec![a.clone()],
                ..Default::default()
            },
        );
        let events = record_events(&list);

        let clone = a.clone();
        assert!(list.remove(&clone).is_some());
        assert!(list.is_empty());
        assert_eq!(&*events.borrow(), &["removed:a"]);

        // second removal finds nothing and stays silent
        assert!(list.remove(&a).is_none());
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn remove_at_out_of_range_is_a_no_op() {
        let vibe = Vibe::new();
        let list = SongList::new(
            &vibe,
            SongListOptions {
                songs: vec![song(&vibe, "a")],
                ..Default::default()
            },
        );
        let events = record_events(&list);

        assert!(list.remove_at(5).is_none());
        assert_eq!(list.len(), 1);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn has_and_find_are_idempotent() {
        let vibe = Vibe::new();
        let a = song(&vibe, "a");
        let other = song(&vibe, "b");
        let list = SongList::new(
            &vibe,
            SongListOptions {
                songs: vec![a.clone()],
                ..Default::default()
            },
        );

        assert!(list.has(&a));
        assert!(list.has(&a));
        assert!(!list.has(&other));
        assert_eq!(list.find(&a), Some(a));
        assert_eq!(list.find(&other), None);
        assert_eq!(list.get(0).unwrap().title().as_deref(), Some("a"));
        assert!(list.get(9).is_none());
    }

    #[test]
    fn default_sort_is_descending_track_number() {
        let vibe = Vibe::new();
        let list = SongList::new(&vibe, SongListOptions::default());
        for (title, number) in [("a", 1), ("b", 3), ("c", 2)] {
            let song = song(&vibe, title);
            song.set_track_number(number);
            list.add(&song);
        }

        list.sort();
        assert_eq!(titles(&list), ["b", "c", "a"]);
    }

    #[test]
    fn reorder_to_current_slot_is_a_no_op() {
        let vibe = Vibe::new();
        let a = song(&vibe, "a");
        let list = SongList::new(
            &vibe,
            SongListOptions {
                songs: vec![a.clone(), song(&vibe, "b")],
                ..Default::default()
            },
        );
        let events = record_events(&list);

        list.reorder(&a, 0);
        assert_eq!(titles(&list), ["a", "b"]);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn reorder_negative_prepends() {
        let vibe = Vibe::new();
        let c = song(&vibe, "c");
        let list = SongList::new(
            &vibe,
            SongListOptions {
                songs: vec![song(&vibe, "a"), song(&vibe, "b"), c.clone()],
                ..Default::default()
            },
        );
        let events = record_events(&list);

        list.reorder(&c, -3);
        assert_eq!(titles(&list), ["c", "a", "b"]);
        assert_eq!(&*events.borrow(), &["reordered:c:-"]);
    }

    #[test]
    fn reorder_past_end_appends() {
        let vibe = Vibe::new();
        let a = song(&vibe, "a");
        let list = SongList::new(
            &vibe,
            SongListOptions {
                songs: vec![a.clone(), song(&vibe, "b")],
                ..Default::default()
            },
        );
        let events = record_events(&list);

        list.reorder(&a, 5);
        assert_eq!(titles(&list), ["b", "a"]);
        assert_eq!(&*events.borrow(), &["reordered:a:-"]);
    }

    #[test]
    fn reorder_interior_is_an_exact_swap() {
        let vibe = Vibe::new();
        let a = song(&vibe, "a");
        let list = SongList::new(
            &vibe,
            SongListOptions {
                songs: vec![
                    a.clone(),
                    song(&vibe, "b"),
                    song(&vibe, "c"),
                    song(&vibe, "d"),
                ],
                ..Default::default()
            },
        );
        let events = record_events(&list);

        list.reorder(&a, 2);
        // c lands exactly in a's old slot; b and d stay put
        assert_eq!(titles(&list), ["c", "b", "a", "d"]);
        assert_eq!(&*events.borrow(), &["reordered:a:c"]);
    }

    #[test]
    fn reorder_of_unknown_song_changes_nothing() {
        let vibe = Vibe::new();
        let list = SongList::new(
            &vibe,
            SongListOptions {
                songs: vec![song(&vibe, "a")],
                ..Default::default()
            },
        );
        let events = record_events(&list);

        list.reorder(&song(&vibe, "stranger"), 0);
        assert_eq!(titles(&list), ["a"]);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn reorder_at_resolves_by_index() {
        let vibe = Vibe::new();
        let list = SongList::new(
            &vibe,
            SongListOptions {
                songs: vec![song(&vibe, "a"), song(&vibe, "b"), song(&vibe, "c")],
                ..Default::default()
            },
        );

        list.reorder_at(0, 2);
        assert_eq!(titles(&list), ["c", "b", "a"]);

        list.reorder_at(17, 0); // out of range: no-op
        assert_eq!(titles(&list), ["c", "b", "a"]);
    }

    #[test]
    fn clear_fires_single_event() {
        let vibe = Vibe::new();
        let list = SongList::new(
            &vibe,
            SongListOptions {
                songs: vec![song(&vibe, "a"), song(&vibe, "b")],
                ..Default::default()
            },
        );
        let events = record_events(&list);

        list.clear();
        assert!(list.is_empty());
        assert_eq!(&*events.borrow(), &["cleared"]);
    }

    #[test]
    fn construction_with_plugin_records_in_catalog() {
        let vibe = Vibe::new();
        let plugin = Plugin::new(&vibe, "test", Default::default());
        let list = SongList::new(
            &vibe,
            SongListOptions {
                title: Some("Imports".into()),
                plugin: Some(plugin.clone()),
                ..Default::default()
            },
        );
        let found = vibe
            .find_songlist(|owner, candidate| owner == &plugin && candidate == &list)
            .expect("list should be catalogued");
        assert_eq!(found.title().as_deref(), Some("Imports"));
    }
}
