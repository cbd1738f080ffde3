use crate::song::Song;
use crate::songlist::{SongCollection, SongList, SongListOptions};
use crate::vibe::Vibe;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use tracing::warn;

struct QueueInner {
    list: SongList,
    current_song: Cell<usize>,
}

/// The live playback queue: a [`SongList`] plus a cursor into it.
#[derive(Clone)]
pub struct Queue {
    inner: Rc<QueueInner>,
}

impl Queue {
    pub fn new(vibe: &Vibe) -> Self {
        Self::from_songs(vibe, &[])
    }

    pub fn from_songs(vibe: &Vibe, songs: &[Song]) -> Self {
        let list = SongList::new(
            vibe,
            SongListOptions {
                title: Some("Queue".into()),
                description: Some("Your song queue".into()),
                songs: songs.to_vec(),
                ..Default::default()
            },
        );
        Self {
            inner: Rc::new(QueueInner {
                list,
                current_song: Cell::new(0),
            }),
        }
    }

    pub fn from_list(vibe: &Vibe, list: &SongList) -> Self {
        Self::from_songs(vibe, &list.songs())
    }

    /// Index of the song the player cursor is on. Defaults to 0.
    pub fn current_song(&self) -> usize {
        self.inner.current_song.get()
    }

    pub fn set_current_song(&self, index: usize) {
        if index != 0 && index >= self.len() {
            warn!(
                queue = %self.inner.list.id(),
                index,
                "cannot move queue cursor: index is out of range"
            );
            return;
        }
        self.inner.current_song.set(index);
    }

    pub fn current(&self) -> Option<Song> {
        self.get(self.current_song())
    }

    /// Empty the queue in one step and reset the cursor. Fires a single
    /// `Cleared` event, bypassing per-song `Removed` notifications. More
    /// songs can be added again afterwards.
    pub fn clear(&self) {
        self.inner.current_song.set(0);
        self.inner.list.clear();
    }
}

impl SongCollection for Queue {
    fn song_list(&self) -> &SongList {
        &self.inner.list
    }
}

impl PartialEq for Queue {
    fn eq(&self, other: &Self) -> bool {
        self.inner.list == other.inner.list
    }
}

impl Eq for Queue {}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("id", &self.inner.list.id())
            .field("len", &self.len())
            .field("current_song", &self.current_song())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::SongOptions;
    use crate::songlist::SongListEvent;
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

    #[test]
    fn queue_starts_at_zero() {
        let vibe = Vibe::new();
        let queue = Queue::from_songs(&vibe, &[song(&vibe, "a"), song(&vibe, "b")]);
        assert_eq!(queue.current_song(), 0);
        assert_eq!(queue.current().unwrap().title().as_deref(), Some("a"));
        assert_eq!(queue.song_list().title().as_deref(), Some("Queue"));
    }

    #[test]
    fn cursor_rejects_out_of_range() {
        let vibe = Vibe::new();
        let queue = Queue::from_songs(&vibe, &[song(&vibe, "a"), song(&vibe, "b")]);

        queue.set_current_song(1);
        assert_eq!(queue.current_song(), 1);
        queue.set_current_song(9);
        assert_eq!(queue.current_song(), 1);
    }

    #[test]
    fn clear_bypasses_per_song_removal_events() {
        let vibe = Vibe::new();
        let queue = Queue::from_songs(&vibe, &[song(&vibe, "a"), song(&vibe, "b")]);
        queue.set_current_song(1);

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        queue.song_list().connect(move |event| {
            sink.borrow_mut().push(match event {
                SongListEvent::Added(_) => "added",
                SongListEvent::Removed(_) => "removed",
                SongListEvent::Reordered { .. } => "reordered",
                SongListEvent::Cleared => "cleared",
            });
        });

        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.current_song(), 0);
        assert_eq!(&*events.borrow(), &["cleared"]);

        // still usable after clearing
        queue.add(&song(&vibe, "c"));
        assert_eq!(queue.len(), 1);
    }
}
