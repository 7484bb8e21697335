use lb_convert_core::ListenData;
use serde::Deserialize;
use serde_json::Value;
use serde_with::{
    serde_as,
    DefaultOnError,
};
use thiserror::Error;

use crate::de;


/// Represents a single entry from a Last.fm scrobble export
#[serde_as]
#[cfg_attr(test, derive(PartialEq, Eq))]
#[derive(Debug, Deserialize)]
pub struct RawScrobble {
    #[serde(default, deserialize_with = "de::text")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "de::text")]
    pub artist: Option<String>,

    #[serde(default, deserialize_with = "de::text")]
    pub album: Option<String>,

    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub date: Option<ScrobbleDate>,

    #[serde_as(as = "DefaultOnError")]
    #[serde(rename = "@attr", default)]
    pub attr: Option<TrackAttr>,
}

#[cfg_attr(test, derive(PartialEq, Eq))]
#[derive(Debug, Deserialize)]
pub struct ScrobbleDate {
    #[serde(default, deserialize_with = "de::unix_timestamp")]
    pub uts: Option<i64>,
}

#[cfg_attr(test, derive(PartialEq, Eq))]
#[derive(Debug, Deserialize)]
pub struct TrackAttr {
    #[serde(default, deserialize_with = "de::truthy")]
    pub nowplaying: bool,
}

impl RawScrobble {
    #[inline]
    pub fn now_playing(&self) -> bool { self.attr.as_ref().map_or(false, |a| a.nowplaying) }

    #[inline]
    pub fn timestamp(&self) -> Option<i64> { self.date.as_ref().and_then(|d| d.uts) }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SkipReason {
    #[error("currently playing")]
    NowPlaying,
    #[error("missing or invalid timestamp")]
    MissingTimestamp,
    #[error("missing track name")]
    MissingTrackName,
    #[error("missing artist name")]
    MissingArtistName,
}


/// A scrobble that passed validation and can be imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastfmListen {
    listened_at: i64,
    pub track: String,
    pub artist: String,
    pub album: Option<String>,
}

impl TryFrom<RawScrobble> for LastfmListen {
    type Error = SkipReason;

    fn try_from(val: RawScrobble) -> Result<Self, Self::Error> {
        if val.now_playing() {
            return Err(SkipReason::NowPlaying);
        }

        Ok(LastfmListen {
            listened_at: val.timestamp().ok_or(SkipReason::MissingTimestamp)?,
            track: val.name.ok_or(SkipReason::MissingTrackName)?,
            artist: val.artist.ok_or(SkipReason::MissingArtistName)?,
            album: val.album,
        })
    }
}

impl ListenData for LastfmListen {
    #[inline]
    fn listened_at(&self) -> i64 { self.listened_at }

    #[inline]
    fn track_name(&self) -> &str { self.track.as_str() }

    #[inline]
    fn artist_name(&self) -> &str { self.artist.as_str() }

    #[inline]
    fn release_name(&self) -> Option<&str> { self.album.as_deref() }
}


/// Locates the track list inside an export document.
///
/// Accepts the raw API page (`{"recenttracks": {"track": [...]}}`), a bare `{"track": [...]}`,
/// a single track object, or an array of any of those. Entries that aren't objects are dropped.
///
/// # Errors
///
/// Returns the JSON type name of the document root when it is neither an object nor an array.
pub(crate) fn track_list(doc: Value) -> Result<Vec<Value>, &'static str> {
    match doc {
        Value::Array(items) => Ok(items.into_iter().flat_map(expand).collect()),
        Value::Object(_) => Ok(expand(doc)),
        Value::Null => Err("null"),
        Value::Bool(_) => Err("a boolean"),
        Value::Number(_) => Err("a number"),
        Value::String(_) => Err("a string"),
    }
}

fn expand(val: Value) -> Vec<Value> {
    let tracks = match val {
        Value::Array(items) => items,
        Value::Object(mut page) => {
            if let Some(Value::Object(recent)) = page.get_mut("recenttracks") {
                as_list(recent.remove("track"))
            } else if page.contains_key("track") {
                as_list(page.remove("track"))
            } else {
                vec![Value::Object(page)]
            }
        },
        _ => Vec::new(),
    };
    tracks.into_iter().filter(Value::is_object).collect()
}

fn as_list(val: Option<Value>) -> Vec<Value> {
    match val {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(single) => vec![single],
    }
}
