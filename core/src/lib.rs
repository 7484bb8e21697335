use serde::Serialize;

/// A single validated play, ready to be submitted to ListenBrainz
pub trait ListenData {
    fn listened_at(&self) -> i64;

    fn track_name(&self) -> &str;
    fn artist_name(&self) -> &str;

    fn release_name(&self) -> Option<&str> { None }
}


/// Borrowed view of a listen in the ListenBrainz import schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Listen<'l> {
    pub listened_at: i64,
    pub track_metadata: TrackMetadata<'l>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackMetadata<'l> {
    pub track_name: &'l str,
    pub artist_name: &'l str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_name: Option<&'l str>,
}

impl<'l, T: ListenData + ?Sized> From<&'l T> for Listen<'l> {
    fn from(listen: &'l T) -> Self {
        Listen {
            listened_at: listen.listened_at(),
            track_metadata: TrackMetadata {
                track_name: listen.track_name(),
                artist_name: listen.artist_name(),
                release_name: listen.release_name(),
            },
        }
    }
}
