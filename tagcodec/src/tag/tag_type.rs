use super::{Tag, utils};
use crate::config::WriteOptions;
use crate::error::{Result, TagCodecError};
use crate::file::FileType;
use crate::macros::err;
use crate::probe::Probe;
use crate::util::io::{FileLike, Length, Truncate};

use std::fs::OpenOptions;
use std::path::Path;

/// The tag's format
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TagType {
	/// Any ID3v2 version, stored in WAV, AIFF, DSF and DFF files
	Id3v2,
	/// FLAC Vorbis comments, along with the FLAC pictures
	VorbisComments,
	/// The content description and metadata objects of an ASF file
	Asf,
	/// Represents an MP4 ilst atom
	Mp4Ilst,
}

impl TagType {
	/// Whether a file of `file_type` can store this tag type
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::file::FileType;
	/// use tagcodec::tag::TagType;
	///
	/// assert!(TagType::Id3v2.is_supported_by(FileType::Wav));
	/// assert!(!TagType::Asf.is_supported_by(FileType::Mp4));
	/// ```
	pub fn is_supported_by(&self, file_type: FileType) -> bool {
		file_type.supports_tag_type(*self)
	}

	/// Remove a tag from a [`Path`]
	///
	/// # Errors
	///
	/// See [`TagType::remove_from`]
	pub fn remove_from_path(&self, path: impl AsRef<Path>) -> Result<()> {
		let mut file = OpenOptions::new()
			.read(true)
			.write(true)
			.open(path)
			.map_err(|e| TagCodecError::from(e).on_write())?;

		self.remove_from(&mut file)
	}

	/// Remove a tag from a [`FileLike`]
	///
	/// # Errors
	///
	/// * It is unable to guess the file format
	/// * The format doesn't support the tag
	/// * It is unable to write to the file
	pub fn remove_from<F>(&self, file: &mut F) -> Result<()>
	where
		F: FileLike,
		TagCodecError: From<<F as Truncate>::Error>,
		TagCodecError: From<<F as Length>::Error>,
	{
		file.rewind()?;

		let probe = Probe::new(file).guess_file_type()?;
		let Some(file_type) = probe.file_type() else {
			err!(UnknownFormat);
		};

		let file = probe.into_inner();
		utils::write_tag(&Tag::new(*self), file, file_type, WriteOptions::default())
	}
}

impl From<FileType> for TagType {
	fn from(file_type: FileType) -> Self {
		file_type.primary_tag_type()
	}
}
