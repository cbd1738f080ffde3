use crate::ids::EntityId;
use crate::image::Image;
use crate::plugin::Plugin;
use crate::vibe::Vibe;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Optional artist attributes, mirroring the construction property bag.
#[derive(Default)]
pub struct ArtistOptions {
    /// Supply an id instead of generating one (plugin-controlled ids,
    /// cache restores).
    pub id: Option<EntityId>,
    /// Pretty name shown to users when it differs from `name`.
    pub display_name: Option<String>,
    pub description: Option<String>,
    /// The artist's profile page or website.
    pub url: Option<String>,
    pub image: Option<Image>,
    /// Owning plugin; when set, the artist is recorded in the catalog.
    pub plugin: Option<Plugin>,
}

struct ArtistInner {
    id: EntityId,
    name: String,
    display_name: Option<String>,
    description: Option<String>,
    url: Option<String>,
    image: RefCell<Option<Image>>,
}

/// An artist. Identity is the id: two artists with equal names are NOT the
/// same entity, name equality is only a reconciliation heuristic.
#[derive(Clone)]
pub struct Artist {
    inner: Rc<ArtistInner>,
}

impl Artist {
    pub fn new(vibe: &Vibe, name: impl Into<String>, options: ArtistOptions) -> Self {
        let artist = Self {
            inner: Rc::new(ArtistInner {
                id: options.id.unwrap_or_else(|| vibe.generate_id()),
                name: name.into(),
                display_name: options.display_name,
                description: options.description,
                url: options.url,
                image: RefCell::new(options.image),
            }),
        };
        if let Some(plugin) = &options.plugin {
            vibe.record_artist(plugin, &artist);
        }
        artist
    }

    pub fn id(&self) -> EntityId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn display_name(&self) -> Option<&str> {
        self.inner.display_name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.inner.description.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.inner.url.as_deref()
    }

    pub fn image(&self) -> Option<Image> {
        self.inner.image.borrow().clone()
    }

    pub fn set_image(&self, image: Option<Image>) {
        *self.inner.image.borrow_mut() = image;
    }
}

impl PartialEq for Artist {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Artist {}

impl std::hash::Hash for Artist {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Artist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artist")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_id_not_name() {
        let vibe = Vibe::new();
        let a = Artist::new(&vibe, "Jane Doe", ArtistOptions::default());
        let b = Artist::new(&vibe, "Jane Doe", ArtistOptions::default());
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn construction_with_plugin_records_in_catalog() {
        let vibe = Vibe::new();
        let plugin = crate::plugin::Plugin::new(&vibe, "test", Default::default());
        let artist = Artist::new(
            &vibe,
            "Jane Doe",
            ArtistOptions {
                plugin: Some(plugin.clone()),
                ..Default::default()
            },
        );
        let found = vibe
            .find_artist(|owner, candidate| owner == &plugin && candidate.name() == "Jane Doe")
            .expect("artist should be catalogued");
        assert_eq!(found, artist);
    }
}
