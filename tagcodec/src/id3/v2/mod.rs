//! ID3v2 items and utilities
//!
//! ## Important notes
//!
//! See:
//!
//! * [`Id3v2Tag`]
//! * [`Frame`]
//!
//! Frames are read in ID3v2.2, ID3v2.3 and ID3v2.4, and written in any of them. The header layout
//! of each version lives behind a single codec, the frame bodies are shared.

pub(crate) mod frame;
pub(crate) mod header;
mod items;
pub(crate) mod read;
pub(crate) mod tag;
pub mod util;
pub(crate) mod write;

// Exports

pub use header::{Id3v2TagFlags, Id3v2Version};

pub use tag::Id3v2Tag;

pub use items::*;

pub use frame::{Frame, FrameFlags, FrameId, FrameValue};
