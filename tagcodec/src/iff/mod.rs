//! WAV/AIFF specific items
//!
//! Both are IFF-derived chunk lists, RIFF being the little-endian flavor. Their only tag is an
//! ID3v2 tag stored in an `ID3 ` (or `id3 `) chunk.

pub mod aiff;
pub(crate) mod chunk;
pub mod wav;
