use crate::album::Album;
use crate::artist::Artist;
use crate::ids::EntityId;
use crate::pages::Section;
use crate::playlist::Playlist;
use crate::song::Song;
use crate::songlist::{SongList, SongListOptions};
use crate::vibe::Vibe;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Lifecycle of a plugin as the application drives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginStatus {
    /// Initializing after install or startup.
    Init,
    /// Loading its library.
    Load,
    /// Importing songs into the catalog.
    Import,
    /// Ready.
    Ok,
    #[default]
    None,
}

/// Which optional features a plugin implements. Snapshotted at construction
/// and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PluginFeatures {
    pub search: bool,
    pub sections: bool,
    pub playlist: bool,
    pub updates: bool,
}

/// A newer version advertised by [`PluginHooks::check_update`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginUpdate {
    pub version: String,
    pub url: Option<String>,
}

/// One entry in a plugin's search results.
#[derive(Debug, Clone)]
pub enum SearchResult {
    Song(Song),
    Album(Album),
    Artist(Artist),
    Playlist(Playlist),
}

/// The callbacks a plugin may implement. Every method defaults to `None`
/// ("not implemented"); the application consults
/// [`Plugin::features`] before offering the corresponding surface.
pub trait PluginHooks {
    /// Results for the user's current search string.
    fn search(&self, _query: &str) -> Option<Vec<SearchResult>> {
        None
    }

    /// Home-screen sections (song/album suggestions with a title). `length`
    /// is the number of sections the application asks for, when it cares.
    fn sections(&self, _length: Option<usize>) -> Option<Vec<Section>> {
        None
    }

    /// Playlists the plugin wants to surface.
    fn playlists(&self) -> Option<Vec<Playlist>> {
        None
    }

    /// A newer plugin version, if one is available.
    fn check_update(&self) -> Option<PluginUpdate> {
        None
    }
}

#[derive(Default)]
pub struct PluginOptions {
    /// The application assigns plugin ids on import; supply one to match.
    pub id: Option<EntityId>,
    /// Name shown to users; defaults to the unique name.
    pub pretty_name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub url: Option<String>,
    pub features: PluginFeatures,
    pub hooks: Option<Rc<dyn PluginHooks>>,
}

struct PluginInner {
    id: EntityId,
    name: String,
    pretty_name: RefCell<String>,
    description: RefCell<String>,
    version: String,
    url: Option<String>,
    status: Cell<PluginStatus>,
    features: PluginFeatures,
    songlist: SongList,
    hooks: RefCell<Option<Rc<dyn PluginHooks>>>,
}

/// A named extension unit. Owns the song list of everything it has imported
/// and optionally implements the [`PluginHooks`] callbacks.
#[derive(Clone)]
pub struct Plugin {
    inner: Rc<PluginInner>,
}

impl Plugin {
    pub fn new(vibe: &Vibe, name: impl Into<String>, options: PluginOptions) -> Self {
        let name = name.into();
        let songlist = SongList::new(
            vibe,
            SongListOptions {
                title: Some(name.clone()),
                ..Default::default()
            },
        );
        Self {
            inner: Rc::new(PluginInner {
                id: options.id.unwrap_or_else(|| vibe.generate_id()),
                pretty_name: RefCell::new(options.pretty_name.unwrap_or_else(|| name.clone())),
                name,
                description: RefCell::new(
                    options.description.unwrap_or_else(|| "A cool plugin".into()),
                ),
                version: options.version.unwrap_or_else(|| "unknown".into()),
                url: options.url,
                status: Cell::new(PluginStatus::None),
                features: options.features,
                songlist,
                hooks: RefCell::new(options.hooks),
            }),
        }
    }

    pub fn id(&self) -> EntityId {
        self.inner.id
    }

    /// The unique, immutable plugin name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn pretty_name(&self) -> String {
        self.inner.pretty_name.borrow().clone()
    }

    pub fn set_pretty_name(&self, pretty_name: impl Into<String>) {
        *self.inner.pretty_name.borrow_mut() = pretty_name.into();
    }

    pub fn description(&self) -> String {
        self.inner.description.borrow().clone()
    }

    pub fn set_description(&self, description: impl Into<String>) {
        *self.inner.description.borrow_mut() = description.into();
    }

    pub fn version(&self) -> &str {
        &self.inner.version
    }

    pub fn url(&self) -> Option<&str> {
        self.inner.url.as_deref()
    }

    pub fn status(&self) -> PluginStatus {
        self.inner.status.get()
    }

    pub fn set_status(&self, status: PluginStatus) {
        self.inner.status.set(status);
    }

    pub fn features(&self) -> PluginFeatures {
        self.inner.features
    }

    /// Everything this plugin has imported, in import order.
    pub fn songlist(&self) -> SongList {
        self.inner.songlist.clone()
    }

    pub fn set_hooks(&self, hooks: Rc<dyn PluginHooks>) {
        *self.inner.hooks.borrow_mut() = Some(hooks);
    }

    pub fn search(&self, query: &str) -> Option<Vec<SearchResult>> {
        let hooks = self.inner.hooks.borrow().clone();
        hooks.and_then(|hooks| hooks.search(query))
    }

    pub fn sections(&self, length: Option<usize>) -> Option<Vec<Section>> {
        let hooks = self.inner.hooks.borrow().clone();
        hooks.and_then(|hooks| hooks.sections(length))
    }

    pub fn playlists(&self) -> Option<Vec<Playlist>> {
        let hooks = self.inner.hooks.borrow().clone();
        hooks.and_then(|hooks| hooks.playlists())
    }

    pub fn check_update(&self) -> Option<PluginUpdate> {
        let hooks = self.inner.hooks.borrow().clone();
        hooks.and_then(|hooks| hooks.check_update())
    }
}

impl PartialEq for Plugin {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Plugin {}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("version", &self.inner.version)
            .field("status", &self.inner.status.get())
            .finish_non_exhaustive()
    }
}
