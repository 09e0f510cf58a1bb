mod render;
#[allow(clippy::module_inception)]
mod timeline;

pub use {
    render::DEFAULT_PROJECT_NAME,
    timeline::{Clip, DEFAULT_MAX_CLIPS, SongRecord, Timeline},
};
