//! Items for ASF (WMA)
//!
//! ## File notes
//!
//! An ASF file is a header object, holding every metadata object, followed by the data object.
//! Writing only ever rebuilds the header object, the data and index objects are copied as-is.

pub mod guid;
mod metadata;
mod object;
mod properties;
mod read;
mod tag;
pub(crate) mod write;

use crate::config::ParseOptions;
use crate::error::Result;
use crate::file::{AudioFile, FileType, TaggedFile};

use std::io::{Read, Seek};

// Exports
pub use properties::AsfProperties;
pub use tag::{AsfField, AsfTag, AsfValue, ContentBranding};

/// An ASF file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsfFile {
	/// The metadata of every metadata object in the file
	pub(crate) tag: Option<AsfTag>,
	/// The file's audio properties
	pub(crate) properties: AsfProperties,
}

impl AsfFile {
	/// Returns a reference to the tag, if any metadata object was found
	pub fn tag(&self) -> Option<&AsfTag> {
		self.tag.as_ref()
	}

	/// Returns a mutable reference to the tag
	pub fn tag_mut(&mut self) -> Option<&mut AsfTag> {
		self.tag.as_mut()
	}

	/// Sets the tag, returning the old one
	pub fn set_tag(&mut self, tag: AsfTag) -> Option<AsfTag> {
		self.tag.replace(tag)
	}

	/// Removes the tag
	pub fn remove_tag(&mut self) -> Option<AsfTag> {
		self.tag.take()
	}
}

impl AudioFile for AsfFile {
	type Properties = AsfProperties;

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

impl From<AsfFile> for TaggedFile {
	fn from(value: AsfFile) -> Self {
		TaggedFile {
			ty: FileType::Asf,
			properties: value.properties.into(),
			tag: value.tag.map(Into::into),
		}
	}
}
