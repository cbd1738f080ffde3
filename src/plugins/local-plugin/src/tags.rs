//! Tag extraction for local files, implementing the boundary contract from
//! [`vibe_core::tags`] on top of lofty.

use chrono::NaiveDate;
use lofty::error::ErrorKind;
use lofty::{Accessor, ItemKey, LoftyError, Probe, TaggedFileExt};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use vibe_core::config::MetadataConfig;
use vibe_core::{MetaError, TagData};

/// How one extraction run behaves.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Separator splitting multi-valued tags (artists, composers).
    pub separator: String,
    /// Probe deadline; expiry fails with [`MetaError::Timeout`] and no
    /// partial result.
    pub timeout: Duration,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            separator: ",".into(),
            timeout: Duration::from_millis(2_500),
        }
    }
}

impl From<&MetadataConfig> for ExtractOptions {
    fn from(config: &MetadataConfig) -> Self {
        Self {
            separator: config.separator.clone(),
            timeout: config.extract_timeout(),
        }
    }
}

/// Read the tag bag out of one media file.
///
/// The probe runs on a worker thread so the deadline holds even when the
/// underlying reader stalls; a worker that outlives its deadline is
/// abandoned.
pub fn extract_tags(path: impl AsRef<Path>, options: &ExtractOptions) -> Result<TagData, MetaError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MetaError::Unreadable {
            path: path.to_path_buf(),
        });
    }

    let (sender, receiver) = mpsc::channel();
    let worker_path = path.to_path_buf();
    let separator = options.separator.clone();
    thread::spawn(move || {
        let _ = sender.send(read_tags(&worker_path, &separator));
    });

    match receiver.recv_timeout(options.timeout) {
        Ok(result) => result,
        Err(_) => Err(MetaError::Timeout),
    }
}

/// [`extract_tags`] for hosts that await; the probe is pushed onto the
/// blocking pool.
pub async fn extract_tags_async(
    path: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<TagData, MetaError> {
    let path = path.as_ref().to_path_buf();
    let options = options.clone();
    tokio::task::spawn_blocking(move || extract_tags(&path, &options))
        .await
        .map_err(|err| MetaError::InvalidSource {
            detail: format!("extraction task failed: {err}"),
        })?
}

fn read_tags(path: &Path, separator: &str) -> Result<TagData, MetaError> {
    let tagged = Probe::open(path)
        .and_then(|probe| probe.read())
        .map_err(|err| classify(path, err))?;

    let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        return Ok(TagData::default());
    };

    let mut data = TagData {
        title: tag.get_string(&ItemKey::TrackTitle).map(str::to_string),
        artists: tag
            .artist()
            .and_then(|value| split_values(&value, separator)),
        album_name: tag.album().map(|value| value.to_string()),
        album_artists: tag
            .get_string(&ItemKey::AlbumArtist)
            .and_then(|value| split_values(value, separator)),
        picture_data: tag.pictures().first().map(|picture| picture.data().to_vec()),
        disc_number: tag.disk(),
        track_number: tag.track(),
        isrc: tag.get_string(&ItemKey::Isrc).map(str::to_string),
        composers: tag
            .get_string(&ItemKey::Composer)
            .and_then(|value| split_values(value, separator)),
        publisher: tag.get_string(&ItemKey::Publisher).map(str::to_string),
        lyrics: tag.get_string(&ItemKey::Lyrics).map(str::to_string),
        ..Default::default()
    };

    data.date = tag
        .get_string(&ItemKey::RecordingDate)
        .and_then(parse_date)
        .or_else(|| year_to_date(tag.year()));
    data.explicit = tag
        .get_string(&ItemKey::Unknown("ITUNESADVISORY".to_string()))
        .map(parse_explicit);

    Ok(data)
}

fn classify(path: &Path, err: LoftyError) -> MetaError {
    match err.kind() {
        ErrorKind::UnknownFormat => {
            let component = path
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or("unknown")
                .to_string();
            MetaError::MissingDecoders(vec![component])
        }
        ErrorKind::Io(_) => MetaError::Unreadable {
            path: path.to_path_buf(),
        },
        _ => MetaError::InvalidSource {
            detail: err.to_string(),
        },
    }
}

/// Split a multi-valued tag on the separator, trimming each value and
/// dropping blanks. `None` when nothing useful remains.
fn split_values(raw: &str, separator: &str) -> Option<Vec<String>> {
    let values: Vec<String> = raw
        .split(separator)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    (!values.is_empty()).then_some(values)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| raw.get(..4).and_then(|year| year_to_date(year.parse().ok())))
}

fn year_to_date(year: Option<u32>) -> Option<NaiveDate> {
    NaiveDate::from_yo_opt(year? as i32, 1)
}

/// Advisory-style flags come in many spellings; treat the usual truthy
/// ones as explicit.
fn parse_explicit(raw: &str) -> bool {
    let value = raw.trim().to_ascii_lowercase();
    value == "1" || value == "true" || value.contains("explicit") || value.contains("advisory")
}
