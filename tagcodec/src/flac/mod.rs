//! Items for FLAC
//!
//! ## File notes
//!
//! * See [`FlacFile`]

mod block;
mod properties;
mod read;
mod tag;
pub(crate) mod write;

use crate::config::ParseOptions;
use crate::error::Result;
use crate::file::{AudioFile, FileType, TaggedFile};
use crate::id3::v2::Id3v2Tag;

use std::io::{Read, Seek};

// Exports
pub use block::BlockType;
pub use properties::FlacProperties;
pub use tag::{FlacPicture, FlacTag, VorbisComments};

/// A FLAC file
///
/// ## Notes
///
/// * The ID3v2 tag is **read only**, and its use is discouraged by the format
/// * Pictures live in their own `PICTURE` blocks, but are handled together with the Vorbis
///   comments as a [`FlacTag`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlacFile {
	/// An ID3v2 tag in front of the stream
	pub(crate) id3v2_tag: Option<Id3v2Tag>,
	/// The vorbis comments and pictures contained in the file
	pub(crate) tag: Option<FlacTag>,
	/// The file's audio properties
	pub(crate) properties: FlacProperties,
}

impl FlacFile {
	/// Returns a reference to the ID3v2 tag, if it exists
	pub fn id3v2(&self) -> Option<&Id3v2Tag> {
		self.id3v2_tag.as_ref()
	}

	/// Returns a reference to the Vorbis comments and pictures, if any were found
	pub fn tag(&self) -> Option<&FlacTag> {
		self.tag.as_ref()
	}

	/// Returns a mutable reference to the Vorbis comments and pictures
	pub fn tag_mut(&mut self) -> Option<&mut FlacTag> {
		self.tag.as_mut()
	}

	/// Sets the Vorbis comments and pictures, returning the old ones
	pub fn set_tag(&mut self, tag: FlacTag) -> Option<FlacTag> {
		self.tag.replace(tag)
	}

	/// Removes the Vorbis comments and pictures
	pub fn remove_tag(&mut self) -> Option<FlacTag> {
		self.tag.take()
	}
}

impl AudioFile for FlacFile {
	type Properties = FlacProperties;

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
		self.tag.is_some()
	}
}

impl From<FlacFile> for TaggedFile {
	fn from(value: FlacFile) -> Self {
		TaggedFile {
			ty: FileType::Flac,
			properties: value.properties.into(),
			tag: value.tag.map(Into::into),
		}
	}
}
