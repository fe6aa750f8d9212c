//! Songtag Core
//!
//! Tag model, song model, collaborator traits and error handling shared by
//! every Songtag crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Tag model**: `TagType`, the mutable `TagBuilder` and the immutable `Tag`
//! - **Song model**: `Song`, `DetachedSong`, `Directory` and the `Resource`
//!   descriptor used to request tag resolution
//! - **Collaborator traits**: `DecoderPlugin`, `InputStream`,
//!   `InputStreamOpener`, `MusicStorage`, `TagHandler`
//! - **Error handling**: unified `TagError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use songtag_core::{TagBuilder, TagType};
//!
//! let mut builder = TagBuilder::new();
//! builder.add_item(TagType::Artist, "Nina Simone");
//! builder.add_item(TagType::Title, "Sinnerman");
//!
//! let tag = builder.commit();
//! assert_eq!(tag.get(TagType::Artist), Some("Nina Simone"));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod input;
pub mod storage;
pub mod traits;
pub mod types;
pub mod uri;

// Re-export commonly used types
pub use error::{Result, TagError};
pub use input::{FileInputStream, LocalStreamOpener};
pub use storage::{FileInfo, LocalStorage};
pub use traits::{DecoderPlugin, InputStream, InputStreamOpener, MusicStorage, TagHandler};
pub use types::{
    DetachedSong, DeviceKind, Directory, Resource, Song, SongTime, Tag, TagBuilder, TagItem,
    TagPair, TagType,
};
