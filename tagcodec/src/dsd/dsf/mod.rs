//! DSF (DSD Stream File) specific items
//!
//! A DSF file is a fixed sequence of chunks: the 28-byte `DSD ` header, a 52-byte `fmt `
//! chunk and the `data` chunk. Any ID3v2 tag is stored after the audio, at the offset held by
//! the header. All integers are little-endian, and every chunk size includes its own header.

mod properties;
mod read;
pub(crate) mod write;

pub use properties::DsfProperties;

use crate::config::ParseOptions;
use crate::error::Result;
use crate::file::{AudioFile, FileType, TaggedFile};
use crate::id3::v2::Id3v2Tag;

use std::io::{Read, Seek};

pub(crate) const DSF_MAGIC: &[u8; 4] = b"DSD ";
pub(crate) const FMT_MAGIC: &[u8; 4] = b"fmt ";
pub(crate) const DATA_MAGIC: &[u8; 4] = b"data";

pub(crate) const HEADER_SIZE: u64 = 28;
pub(crate) const FMT_CHUNK_SIZE: u64 = 52;

// Offsets of the fields rewritten after a tag edit
pub(crate) const FILE_LENGTH_OFFSET: u64 = 12;
pub(crate) const METADATA_OFFSET_OFFSET: u64 = 20;

/// The 28-byte header at the start of every DSF file
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DsfHeader {
	/// The size of the header chunk, always 28
	pub chunk_size: u64,
	/// The total length of the file
	pub file_length: u64,
	/// The offset of the ID3v2 tag, 0 when there is none
	pub metadata_offset: u64,
}

/// A DSF file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsfFile {
	pub(crate) header: DsfHeader,
	/// An ID3v2 tag
	pub(crate) id3v2_tag: Option<Id3v2Tag>,
	/// The file's audio properties
	pub(crate) properties: DsfProperties,
}

impl DsfFile {
	/// The file's header, as it was read
	pub fn header(&self) -> DsfHeader {
		self.header
	}

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

impl AudioFile for DsfFile {
	type Properties = DsfProperties;

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

impl From<DsfFile> for TaggedFile {
	fn from(value: DsfFile) -> Self {
		TaggedFile {
			ty: FileType::Dsf,
			properties: value.properties.into(),
			tag: value.id3v2_tag.map(Into::into),
		}
	}
}
