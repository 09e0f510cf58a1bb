mod bounded;
mod clock;
mod metadata;

pub use {
    bounded::BoundedString,
    clock::SongClock,
    metadata::{MetadataStore, MetadataUpdate, SongMetadata, TITLE_CAPACITY, URI_CAPACITY},
};
