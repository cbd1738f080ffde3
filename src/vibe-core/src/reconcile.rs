//! Applies extracted file metadata to [`Song`] objects, lazily creating and
//! linking [`Artist`] and [`Album`] entities along the way.
//!
//! Independently-scanned files that belong to the same logical album or
//! artist carry no stable external key, so convergence relies on fuzzy
//! matching: an artist matches on (plugin, exact name) and an album on
//! (plugin, exact title, artist containment). Matching compares exact
//! strings as trimmed by the extractor; names that differ in case or
//! punctuation across files produce distinct entities. That makes this
//! best-effort deduplication, not a uniqueness guarantee.

use crate::album::{Album, AlbumOptions};
use crate::artist::{Artist, ArtistOptions};
use crate::ids::EntityId;
use crate::image::Image;
use crate::plugin::Plugin;
use crate::song::Song;
use crate::songlist::SongCollection;
use crate::tags::TagData;
use crate::vibe::Vibe;
use tracing::warn;

/// Modifiers for [`apply_tags`].
#[derive(Debug, Clone, Copy)]
pub struct ApplyOptions {
    /// Apply an embedded picture to the song (or its album).
    pub apply_image: bool,
    /// Also hand the picture to linked artists that have none yet.
    pub apply_image_to_artists: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            apply_image: true,
            apply_image_to_artists: true,
        }
    }
}

/// Merge a tag bag into `song`.
///
/// Present fields enrich the song in place; absent fields never overwrite
/// existing state. When `plugin` is supplied, existing artists and albums
/// published by that plugin are reused instead of duplicated (see the
/// module docs for how far that guarantee goes). An empty bag is a no-op.
pub fn apply_tags(
    vibe: &Vibe,
    song: &Song,
    data: &TagData,
    plugin: Option<&Plugin>,
    options: &ApplyOptions,
) {
    if data.is_empty() {
        return;
    }

    if let Some(title) = &data.title {
        song.set_title(Some(title.clone()));
    }
    if let Some(explicit) = data.explicit {
        song.set_explicit(explicit);
    }
    if let Some(isrc) = &data.isrc {
        song.set_isrc(Some(isrc.clone()));
    }
    if let Some(lyrics) = &data.lyrics {
        song.set_lyrics(Some(lyrics.clone()));
    }
    if let Some(publisher) = &data.publisher {
        song.set_publisher(Some(publisher.clone()));
    }
    if let Some(disc_number) = data.disc_number {
        song.set_disc_number(disc_number);
    }
    if let Some(track_number) = data.track_number {
        song.set_track_number(track_number);
    }
    if let Some(date) = data.date {
        song.set_date(Some(date));
    }

    if let Some(names) = &data.artists {
        for name in names {
            song.add_artist(&resolve_artist(vibe, name, plugin));
        }
    }

    if let Some(album_name) = &data.album_name {
        let album = match plugin {
            Some(plugin) => {
                let candidates = match &data.album_artists {
                    Some(names) if !names.is_empty() => names
                        .iter()
                        .map(|name| resolve_artist(vibe, name, Some(plugin)))
                        .collect(),
                    _ => song.artists(),
                };
                find_matching_album(vibe, album_name, &candidates, plugin)
            }
            None => None,
        };
        let album = album.unwrap_or_else(|| {
            Album::new(
                vibe,
                AlbumOptions {
                    title: Some(album_name.clone()),
                    artists: song.artists(),
                    plugin: plugin.cloned(),
                    ..Default::default()
                },
            )
        });
        if !album.has(song) {
            album.add(song);
        } else {
            // membership already exists; make sure the back-reference does too
            song.set_album_ref(Some(album.downgrade()));
        }
    }

    apply_image(song, data, options);
}

fn apply_image(song: &Song, data: &TagData, options: &ApplyOptions) {
    if !options.apply_image {
        return;
    }
    let Some(bytes) = &data.picture_data else {
        return;
    };

    let album = song.album();
    let target_has_image = match &album {
        Some(album) => album.image().is_some(),
        None => song.image().is_some(),
    };
    let artists_covered = !options.apply_image_to_artists
        || song.artists().iter().all(|artist| artist.image().is_some());
    // Nothing left to illustrate: common when many songs of an
    // already-covered album reconcile in a row.
    if target_has_image && artists_covered {
        return;
    }

    // Reuse whatever image the album or song already carries before
    // constructing a new one, so one album ends up with one image object.
    let image = album
        .as_ref()
        .and_then(Album::image)
        .or_else(|| song.image())
        .unwrap_or_else(|| Image::for_song(bytes.clone(), song));
    if let Err(err) = image.load() {
        warn!(song = %song.id(), error = %err, "could not decode embedded picture, leaving images unset");
        return;
    }

    match &album {
        Some(album) if album.image().is_none() => album.set_image(Some(image.clone())),
        None if song.image().is_none() => song.set_image(Some(image.clone())),
        _ => {}
    }

    if options.apply_image_to_artists {
        for artist in song.artists() {
            if artist.image().is_none() {
                artist.set_image(Some(image.clone()));
            }
        }
    }
}

/// Find-or-create an artist by name under the plugin context.
fn resolve_artist(vibe: &Vibe, name: &str, plugin: Option<&Plugin>) -> Artist {
    if let Some(plugin) = plugin {
        if let Some(found) = find_matching_artist(vibe, name, plugin) {
            return found;
        }
    }
    Artist::new(
        vibe,
        name,
        ArtistOptions {
            plugin: plugin.cloned(),
            ..Default::default()
        },
    )
}

/// First catalogued artist owned by `plugin` whose name equals `name`
/// exactly.
pub fn find_matching_artist(vibe: &Vibe, name: &str, plugin: &Plugin) -> Option<Artist> {
    vibe.find_artist(|owner, artist| owner.id() == plugin.id() && artist.name() == name)
}

/// First catalogued album owned by `plugin` whose title equals `title` and
/// whose artist set contains (by id) every artist in `artists`. An empty
/// candidate set only matches albums that also have no artists.
pub fn find_matching_album(
    vibe: &Vibe,
    title: &str,
    artists: &[Artist],
    plugin: &Plugin,
) -> Option<Album> {
    let candidate_ids: Vec<EntityId> = artists.iter().map(Artist::id).collect();
    vibe.find_album(|owner, album| {
        if owner.id() != plugin.id() {
            return false;
        }
        if album.title().as_deref() != Some(title) {
            return false;
        }
        let album_artists: Vec<EntityId> = album.artists().iter().map(Artist::id).collect();
        if candidate_ids.is_empty() {
            return album_artists.is_empty();
        }
        candidate_ids.iter().all(|id| album_artists.contains(id))
    })
}
