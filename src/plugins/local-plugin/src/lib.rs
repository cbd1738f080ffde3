//! The bundled "local files" plugin for the Vibe player.
//!
//! Scans the user's music directories, extracts tags with lofty, and feeds
//! every discovered file through the reconciliation engine so songs,
//! artists and albums land in the catalog without duplicates. Extraction
//! failures degrade per file: the song is still imported, titled after its
//! file name.

mod scan;
pub mod tags;

pub use scan::scan_roots;
pub use tags::{extract_tags, extract_tags_async, ExtractOptions};

use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{info, warn};
use vibe_core::{
    apply_tags, ApplyOptions, Plugin, PluginFeatures, PluginHooks, PluginOptions, PluginStatus,
    SearchResult, Song, SongList, SongOptions, SongSource, Vibe,
};

pub const PLUGIN_NAME: &str = "local";

/// Search hook over the plugin's imported song list.
struct LocalSearch {
    songlist: SongList,
}

impl PluginHooks for LocalSearch {
    fn search(&self, query: &str) -> Option<Vec<SearchResult>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Some(Vec::new());
        }
        let results = self
            .songlist
            .songs()
            .into_iter()
            .filter(|song| {
                song.title()
                    .is_some_and(|title| title.to_lowercase().contains(&needle))
                    || song
                        .artists()
                        .iter()
                        .any(|artist| artist.name().to_lowercase().contains(&needle))
            })
            .map(SearchResult::Song)
            .collect();
        Some(results)
    }
}

/// The local-files plugin: owns its [`Plugin`] record and the roots it
/// imports from.
pub struct LocalPlugin {
    vibe: Vibe,
    plugin: Plugin,
    roots: Vec<PathBuf>,
    options: ExtractOptions,
}

impl LocalPlugin {
    pub fn new(vibe: &Vibe, roots: Vec<PathBuf>, options: ExtractOptions) -> Self {
        let plugin = Plugin::new(
            vibe,
            PLUGIN_NAME,
            PluginOptions {
                pretty_name: Some("Local Files".into()),
                description: Some("Play music from your local library".into()),
                version: Some(env!("CARGO_PKG_VERSION").into()),
                features: PluginFeatures {
                    search: true,
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        plugin.set_hooks(Rc::new(LocalSearch {
            songlist: plugin.songlist(),
        }));
        vibe.register_plugin(&plugin);
        plugin.set_status(PluginStatus::Init);
        Self {
            vibe: vibe.clone(),
            plugin,
            roots,
            options,
        }
    }

    pub fn plugin(&self) -> &Plugin {
        &self.plugin
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Scan the roots and import every discovered file. Returns the number
    /// of songs imported.
    pub fn import(&self) -> usize {
        self.plugin.set_status(PluginStatus::Load);
        let files = scan_roots(&self.roots);
        info!(files = files.len(), "local library scan finished");

        self.plugin.set_status(PluginStatus::Import);
        let mut imported = 0;
        for file in files {
            let song = self.import_file(&file);
            self.plugin.songlist().add(&song);
            imported += 1;
        }

        self.plugin.set_status(PluginStatus::Ok);
        info!(imported, "local library import finished");
        imported
    }

    fn import_file(&self, file: &Path) -> Song {
        let stem_title = file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string);
        let song = Song::new(
            &self.vibe,
            SongOptions {
                title: stem_title,
                source: Some(SongSource::File(file.to_path_buf())),
                plugin: Some(self.plugin.clone()),
                ..Default::default()
            },
        );
        match extract_tags(file, &self.options) {
            Ok(data) => apply_tags(
                &self.vibe,
                &song,
                &data,
                Some(&self.plugin),
                &ApplyOptions::default(),
            ),
            Err(err) => {
                warn!(path = %file.display(), error = %err, "importing without tags");
            }
        }
        song
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    fn fake_library() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        let album = dir.path().join("Jane Doe/First Album");
        fs::create_dir_all(&album).unwrap();
        for name in ["01 - Intro.mp3", "02 - Outro.mp3"] {
            let mut file = File::create(album.join(name)).unwrap();
            writeln!(file, "not really audio").unwrap();
        }
        dir
    }

    #[test]
    fn import_keeps_untaggable_files() {
        let dir = fake_library();
        let vibe = Vibe::new();
        let local = LocalPlugin::new(
            &vibe,
            vec![dir.path().to_path_buf()],
            ExtractOptions::default(),
        );

        let imported = local.import();
        assert_eq!(imported, 2);
        assert_eq!(local.plugin().status(), PluginStatus::Ok);
        assert_eq!(local.plugin().songlist().len(), 2);

        // tags were unreadable, so titles come from the file names
        let titles: Vec<_> = local
            .plugin()
            .songlist()
            .songs()
            .iter()
            .map(|song| song.title().unwrap())
            .collect();
        assert_eq!(titles, ["01 - Intro", "02 - Outro"]);

        // every import landed in the catalog under this plugin
        assert_eq!(vibe.songs().len(), 2);
        assert!(vibe.songs().iter().all(|entry| entry.plugin == *local.plugin()));
    }

    #[test]
    fn plugin_advertises_search_and_answers() {
        let dir = fake_library();
        let vibe = Vibe::new();
        let local = LocalPlugin::new(
            &vibe,
            vec![dir.path().to_path_buf()],
            ExtractOptions::default(),
        );
        local.import();

        assert!(local.plugin().features().search);
        let results = local.plugin().search("intro").unwrap();
        assert_eq!(results.len(), 1);
        match &results[0] {
            SearchResult::Song(song) => {
                assert_eq!(song.title().as_deref(), Some("01 - Intro"));
            }
            other => panic!("expected a song result, got {other:?}"),
        }

        // unimplemented hooks stay unimplemented
        assert!(local.plugin().sections(None).is_none());
        assert!(local.plugin().check_update().is_none());
    }

    #[test]
    fn empty_query_returns_no_results_but_is_implemented() {
        let dir = fake_library();
        let vibe = Vibe::new();
        let local = LocalPlugin::new(
            &vibe,
            vec![dir.path().to_path_buf()],
            ExtractOptions::default(),
        );
        local.import();

        let results = local.plugin().search("   ").unwrap();
        assert!(results.is_empty());
    }
}
