//! Page-stack navigation contract, implemented by the host application and
//! consumed by plugins to open detail views for artists, songs, albums,
//! playlists or custom section layouts.

use crate::album::Album;
use crate::artist::Artist;
use crate::ids::EntityId;
use crate::playlist::Playlist;
use crate::song::Song;
use crate::songlist::SongList;
use crate::vibe::Vibe;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Activation callback carried by buttons. Wrapped so button types stay
/// debuggable.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn()>);

impl Callback {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn invoke(&self) {
        (self.0)();
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

/// A header or section button: an icon or a text label, plus what happens
/// when the user activates it.
#[derive(Debug, Clone)]
pub enum Button {
    Icon {
        id: Option<EntityId>,
        icon_name: String,
        on_clicked: Option<Callback>,
    },
    Label {
        id: Option<EntityId>,
        label: String,
        on_clicked: Option<Callback>,
    },
}

/// How a section lays out its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    #[default]
    ListRow,
    Row,
}

/// One entry inside a section.
#[derive(Debug, Clone)]
pub enum SectionItem {
    Song(Song),
    SongList(SongList),
    Artist(Artist),
}

/// A titled content block with optional header/end buttons, used on pages
/// and on the home screen.
#[derive(Debug, Clone, Default)]
pub struct Section {
    pub title: String,
    pub description: Option<String>,
    pub kind: SectionKind,
    pub content: Vec<SectionItem>,
    pub header_buttons: Vec<Button>,
    pub end_button: Option<Button>,
}

/// What a page is about.
#[derive(Debug, Clone)]
pub enum PageContent {
    Song(Song),
    Album(Album),
    Artist(Artist),
    Playlist(Playlist),
}

#[derive(Default)]
pub struct PageOptions {
    pub id: Option<EntityId>,
    pub title: Option<String>,
    pub sections: Vec<Section>,
    pub content: Option<PageContent>,
    pub buttons: Vec<Button>,
}

/// One page on the application's navigation stack.
#[derive(Debug, Clone)]
pub struct Page {
    pub id: EntityId,
    pub title: String,
    pub sections: Vec<Section>,
    pub content: Option<PageContent>,
    pub buttons: Vec<Button>,
}

impl Page {
    pub fn new(vibe: &Vibe, options: PageOptions) -> Self {
        let title = options.title.unwrap_or_else(|| {
            options
                .content
                .as_ref()
                .and_then(content_title)
                .unwrap_or_else(|| "New page".into())
        });
        Self {
            id: options.id.unwrap_or_else(|| vibe.generate_id()),
            title,
            sections: options.sections,
            content: options.content,
            buttons: options.buttons,
        }
    }
}

fn content_title(content: &PageContent) -> Option<String> {
    match content {
        PageContent::Song(song) => song.title(),
        PageContent::Album(album) => album.title(),
        PageContent::Artist(artist) => Some(artist.name().to_string()),
        PageContent::Playlist(playlist) => playlist.title(),
    }
}

/// Page-stack control implemented by the host application.
pub trait Pages {
    /// Push a new page onto the stack.
    fn add(&self, page: Page);
    /// Go back to the previous page on the stack.
    fn back(&self);
}
