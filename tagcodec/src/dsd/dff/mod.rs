//! DFF (DSDIFF) specific items
//!
//! A DFF file is a big-endian `FRM8` form of type `DSD `, holding chunks with 64-bit sizes.
//! Odd-sized chunks are followed by a pad byte. Every chunk id is known ahead of time (see
//! [`DffChunk`]), anything else makes the file invalid.

mod chunk;
mod properties;
mod read;
pub(crate) mod write;

pub use chunk::DffChunk;
pub use properties::{DffCompression, DffProperties, LoudspeakerConfig};

use crate::config::ParseOptions;
use crate::error::Result;
use crate::file::{AudioFile, FileType, TaggedFile};
use crate::id3::v2::Id3v2Tag;

use std::io::{Read, Seek};

/// A DFF file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DffFile {
	/// An ID3v2 tag
	pub(crate) id3v2_tag: Option<Id3v2Tag>,
	/// The file's audio properties
	pub(crate) properties: DffProperties,
}

impl DffFile {
	/// Returns a reference to the ID3v2 tag, if it exists
	pub fn id3v2(&self) -> Option<&Id3v2Tag> {
		self.id3v2_tag.as_ref()
	}

	/// Returns a mutable reference to the ID3v2 tag, if it exists
	pub fn id3v2_mut(&mut self) -> Option<&mut Id3v2Tag> {
		self.id3v2_tag.as_mut()
	}

	/// Sets the ID3v2 tag, returning the old one
	pub fn set_id3v2(&mut self, tag: Id3v2Tag) -> Option<Id3v2Tag> {
		self.id3v2_tag.replace(tag)
	}

	/// Removes the ID3v2 tag
	pub fn remove_id3v2(&mut self) -> Option<Id3v2Tag> {
		self.id3v2_tag.take()
	}
}

impl AudioFile for DffFile {
	type Properties = DffProperties;

	fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Self>
	where
		R: Read + Seek,
	{
		read::read_from(reader, parse_options)
	}

	fn properties(&self) -> &Self::Properties {
		&self.properties
	}

	fn contains_tag(&self) -> bool {
		self.id3v2_tag.is_some()
	}
}

impl From<DffFile> for TaggedFile {
	fn from(value: DffFile) -> Self {
		TaggedFile {
			ty: FileType::Dff,
			properties: value.properties.into(),
			tag: value.id3v2_tag.map(Into::into),
		}
	}
}
