mod song;
mod song_time;
mod tag;
mod tag_type;

pub use song::{DetachedSong, DeviceKind, Directory, Resource, Song};
pub use song_time::SongTime;
pub use tag::{Tag, TagBuilder, TagItem, TagPair};
pub use tag_type::TagType;
