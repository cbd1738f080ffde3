use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Walk the configured roots and collect every supported audio file, in a
/// stable order. Unreadable directory entries are skipped with a warning;
/// a scan is best-effort by nature.
pub fn scan_roots(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for root in roots {
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(root = %root.display(), error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if is_supported(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }
    files.sort();
    files
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            matches!(
                ext.to_ascii_lowercase().as_str(),
                "mp3" | "m4a" | "flac" | "wav" | "ogg"
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    #[test]
    fn scan_finds_only_supported_files() {
        let dir = tempdir().unwrap();
        let album = dir.path().join("artist/album");
        fs::create_dir_all(&album).unwrap();
        File::create(album.join("01 - intro.mp3")).unwrap();
        File::create(album.join("02 - outro.FLAC")).unwrap();
        File::create(album.join("cover.jpg")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();

        let files = scan_roots(&[dir.path().to_path_buf()]);
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|path| {
            let name = path.file_name().unwrap().to_string_lossy().to_lowercase();
            name.ends_with(".mp3") || name.ends_with(".flac")
        }));
    }

    #[test]
    fn missing_root_yields_nothing() {
        let dir = tempdir().unwrap();
        let gone = dir.path().join("nope");
        assert!(scan_roots(&[gone]).is_empty());
    }
}
