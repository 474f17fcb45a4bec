//! Utilities for working with ID3v2 tags

pub(crate) mod frame_ids;
pub mod synchsafe;
