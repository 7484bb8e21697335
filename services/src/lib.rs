use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

pub use lb_convert_core::*;
use log::{
    debug,
    info,
    warn,
};

pub use crate::{
    archive::{
        package,
        ARCHIVE_ENTRY,
    },
    error::{
        Error,
        Result,
    },
    jsonl::write_listens,
};
use crate::{
    error::PathContext,
    service::{
        LastfmListen,
        RawScrobble,
        SkipReason,
    },
};

pub mod archive;
mod de;
mod error;
pub mod jsonl;
pub mod service;

pub const DEFAULT_INPUT: &str = "scrobbles.json";
pub const DEFAULT_LISTENS: &str = "listenbrainz_listens.jsonl";
pub const DEFAULT_ARCHIVE: &str = "listenbrainz_import.zip";


/// Where to read the export from and where to put the results
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub listens: PathBuf,
    pub archive: PathBuf,
    pub window: ListenWindow,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: DEFAULT_INPUT.into(),
            listens: DEFAULT_LISTENS.into(),
            archive: DEFAULT_ARCHIVE.into(),
            window: ListenWindow::default(),
        }
    }
}

/// Optional exclusive bounds, in unix seconds, on which listens are kept
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListenWindow {
    pub before: Option<i64>,
    pub after: Option<i64>,
}

impl ListenWindow {
    pub fn contains(&self, listened_at: i64) -> bool {
        self.before.map_or(true, |b| listened_at < b) && self.after.map_or(true, |a| a < listened_at)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Records found in the export
    pub read: usize,
    /// Listens written out
    pub written: usize,
    /// Records that can't be imported, e.g. now playing or missing a timestamp
    pub skipped: usize,
    /// Valid listens outside of the requested [`ListenWindow`]
    pub filtered: usize,
}


/// Reads and parses the whole export at `path`, returning its scrobbles in file order
///
/// # Errors
///
/// This function will return an error if the file can't be read, isn't valid JSON,
/// or the document root is neither an object nor an array.
pub fn load_scrobbles(path: &Path) -> Result<Vec<RawScrobble>> {
    let bytes = fs::read(path).at(path)?;
    let doc = serde_json::from_slice(&bytes).map_err(|source| Error::Format {
        path: path.to_owned(),
        source,
    })?;
    let tracks = service::track_list(doc).map_err(|found| Error::UnsupportedRoot {
        path: path.to_owned(),
        found,
    })?;
    if tracks.is_empty() {
        warn!("{}: no scrobbles found", path.display());
    }

    Ok(tracks
        .into_iter()
        .enumerate()
        .filter_map(|(i, t)| {
            serde_json::from_value(t)
                .map_err(|e| warn!("Ignoring unreadable record {i}: {e}"))
                .ok()
        })
        .collect())
}

/// Decides for each scrobble whether it can be imported, keeping input order
pub fn convert<I>(scrobbles: I) -> impl Iterator<Item = Result<LastfmListen, SkipReason>>
where
    I: IntoIterator<Item = RawScrobble>,
{
    scrobbles.into_iter().map(LastfmListen::try_from)
}

/// Runs the full conversion: load, filter, write the listens file, then package it
///
/// # Errors
///
/// Any failure to read the input or write either output aborts the run.
/// Nothing is written when the input can't be loaded.
pub fn run(config: &Config) -> Result<Summary> {
    let scrobbles = load_scrobbles(&config.input)?;
    info!("Loaded {} scrobbles from {}", scrobbles.len(), config.input.display());

    let mut summary = Summary {
        read: scrobbles.len(),
        ..Default::default()
    };
    let mut listens = Vec::with_capacity(scrobbles.len());
    for (i, res) in convert(scrobbles).enumerate() {
        match res {
            Ok(listen) if config.window.contains(listen.listened_at()) => listens.push(listen),
            Ok(_) => summary.filtered += 1,
            Err(reason) => {
                debug!("Skipping record {i}: {reason}");
                summary.skipped += 1;
            },
        }
    }

    summary.written = write_listens(&config.listens, &listens)?;
    info!("Wrote {} listens to {}", summary.written, config.listens.display());

    package(&config.listens, &config.archive)?;
    info!("Packaged {} into {}", config.listens.display(), config.archive.display());

    Ok(summary)
}
