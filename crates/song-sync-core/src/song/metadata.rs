use crate::song::BoundedString;

/// Byte capacity of a song URI.
pub const URI_CAPACITY: usize = 191;

/// Byte capacity of a song title.
pub const TITLE_CAPACITY: usize = 95;

/// Metadata of the song currently loaded on the phone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongMetadata {
    /// Track URI as reported by the phone.
    pub uri: BoundedString<URI_CAPACITY>,
    /// Human-readable title.
    pub title: BoundedString<TITLE_CAPACITY>,
    /// Track length in milliseconds, `0` when unknown.
    pub duration_ms: u32,
}

/// A staged metadata replacement parsed from one `m` command.
///
/// Fields left as `None` keep their previous value when committed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataUpdate {
    /// New URI, if the command carried one.
    pub uri: Option<String>,
    /// New title, if the command carried one.
    pub title: Option<String>,
    /// New duration, if the command carried one.
    pub duration_ms: Option<u32>,
}

impl SongMetadata {
    /// Return a copy of `self` with every field present in `update` replaced.
    pub fn merged(&self, update: &MetadataUpdate) -> SongMetadata {
        SongMetadata {
            uri: update
                .uri
                .as_deref()
                .map(BoundedString::new)
                .unwrap_or_else(|| self.uri.clone()),
            title: update
                .title
                .as_deref()
                .map(BoundedString::new)
                .unwrap_or_else(|| self.title.clone()),
            duration_ms: update.duration_ms.unwrap_or(self.duration_ms),
        }
    }
}

/// Owner of the active [`SongMetadata`].
///
/// Updates are merged off to the side and swapped in whole, so a scheduler tick
/// never sees half of one song and half of another.
#[derive(Debug, Default)]
pub struct MetadataStore {
    current: SongMetadata,
}

impl MetadataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `update` into the current metadata and commit the result.
    pub fn commit(&mut self, update: &MetadataUpdate) -> &SongMetadata {
        let staged = self.current.merged(update);
        self.current = staged;
        &self.current
    }

    /// The committed metadata.
    pub fn current(&self) -> &SongMetadata {
        &self.current
    }

    /// Whether a song is loaded, i.e. a non-empty URI has been committed.
    pub fn is_loaded(&self) -> bool {
        !self.current.uri.is_empty()
    }
}
