//! Items for MP4
//!
//! ## File notes
//!
//! The only supported tag format is the iTunes style `moov.udta.meta.ilst`, see [`Mp4Ilst`].
mod atom_info;
pub(crate) mod ilst;
mod moov;
mod properties;
mod read;
pub(crate) mod write;

use crate::config::ParseOptions;
use crate::error::Result;
use crate::file::{AudioFile, FileType, TaggedFile};

use std::io::{Read, Seek};

// Exports

pub use ilst::{DataAtom, DataType, Mp4Field, Mp4Ilst, constants};
pub use properties::{Mp4Codec, Mp4Properties};

/// An MP4 file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mp4File {
	/// The file format from ftyp's "major brand" (Ex. "M4A ")
	pub(crate) ftyp: String,
	/// The parsed `ilst` atom, if it exists
	pub(crate) ilst: Option<Mp4Ilst>,
	/// The file's audio properties
	pub(crate) properties: Mp4Properties,
}

impl Mp4File {
	/// Returns the file format from ftyp's "major brand" (Ex. "M4A ")
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use tagcodec::config::ParseOptions;
	/// use tagcodec::file::AudioFile;
	/// use tagcodec::mp4::Mp4File;
	///
	/// # fn main() -> tagcodec::error::Result<()> {
	/// # let mut m4a_reader = std::io::Cursor::new(&[]);
	/// let m4a_file = Mp4File::read_from(&mut m4a_reader, ParseOptions::new())?;
	///
	/// assert_eq!(m4a_file.ftyp(), "M4A ");
	/// # Ok(()) }
	/// ```
	pub fn ftyp(&self) -> &str {
		self.ftyp.as_ref()
	}

	/// Returns a reference to the `ilst`, if it exists
	pub fn ilst(&self) -> Option<&Mp4Ilst> {
		self.ilst.as_ref()
	}

	/// Returns a mutable reference to the `ilst`, if it exists
	pub fn ilst_mut(&mut self) -> Option<&mut Mp4Ilst> {
		self.ilst.as_mut()
	}

	/// Sets the `ilst`, returning the old one
	pub fn set_ilst(&mut self, ilst: Mp4Ilst) -> Option<Mp4Ilst> {
		self.ilst.replace(ilst)
	}

	/// Removes the `ilst`
	pub fn remove_ilst(&mut self) -> Option<Mp4Ilst> {
		self.ilst.take()
	}
}

impl AudioFile for Mp4File {
	type Properties = Mp4Properties;

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
		self.ilst.is_some()
	}
}

impl From<Mp4File> for TaggedFile {
	fn from(value: Mp4File) -> Self {
		TaggedFile {
			ty: FileType::Mp4,
			properties: value.properties.into(),
			tag: value.ilst.map(Into::into),
		}
	}
}
