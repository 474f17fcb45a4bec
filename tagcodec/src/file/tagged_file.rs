use super::audio_file::AudioFile;
use super::file_type::FileType;
use crate::config::{ParseOptions, WriteOptions};
use crate::error::{Result, TagCodecError};
use crate::properties::AudioProperties;
use crate::tag::{Tag, TagType, utils};
use crate::util::io::{FileLike, Length, Truncate};

use std::fs::OpenOptions;
use std::io::{Read, Seek};
use std::path::Path;

/// A generic representation of a file
///
/// This is used when the [`FileType`] has to be guessed. Every supported format carries at most
/// one tag, of the type given by [`FileType::primary_tag_type`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedFile {
	/// The file's type
	pub(crate) ty: FileType,
	/// The file's audio properties
	pub(crate) properties: AudioProperties,
	/// The file's tag
	pub(crate) tag: Option<Tag>,
}

impl TaggedFile {
	/// Returns the file's [`FileType`]
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use tagcodec::file::FileType;
	///
	/// # fn main() -> tagcodec::error::Result<()> {
	/// let tagged_file = tagcodec::read_from_path("track.dsf")?;
	///
	/// assert_eq!(tagged_file.file_type(), FileType::Dsf);
	/// # Ok(()) }
	/// ```
	pub fn file_type(&self) -> FileType {
		self.ty
	}

	/// The type of tag this file can hold
	pub fn tag_type(&self) -> TagType {
		self.ty.primary_tag_type()
	}

	/// Returns a reference to the file's tag, if there is one
	pub fn tag(&self) -> Option<&Tag> {
		self.tag.as_ref()
	}

	/// Returns a mutable reference to the file's tag, if there is one
	pub fn tag_mut(&mut self) -> Option<&mut Tag> {
		self.tag.as_mut()
	}

	/// Returns the file's tag, creating an empty one if there is none
	pub fn tag_or_insert(&mut self) -> &mut Tag {
		let tag_type = self.tag_type();
		self.tag.get_or_insert_with(|| Tag::new(tag_type))
	}

	/// Replaces the file's tag, returning the old one
	///
	/// A tag of a type the format can't hold is ignored.
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use tagcodec::tag::{Tag, TagType};
	///
	/// # fn main() -> tagcodec::error::Result<()> {
	/// let mut tagged_file = tagcodec::read_from_path("track.flac")?;
	///
	/// let old = tagged_file.insert_tag(Tag::new(TagType::VorbisComments));
	/// # Ok(()) }
	/// ```
	pub fn insert_tag(&mut self, tag: Tag) -> Option<Tag> {
		if !self.ty.supports_tag_type(tag.tag_type()) {
			log::warn!(
				"Refusing to insert a {:?} tag into a {:?} file",
				tag.tag_type(),
				self.ty
			);
			return None;
		}

		self.tag.replace(tag)
	}

	/// Removes the file's tag
	pub fn remove_tag(&mut self) -> Option<Tag> {
		self.tag.take()
	}

	/// Write the tag to a [`FileLike`]
	///
	/// If the tag was removed, the tag in the file is removed as well.
	///
	/// # Errors
	///
	/// See [`Tag::save_to`]
	pub fn save_to<F>(&self, file: &mut F, write_options: WriteOptions) -> Result<()>
	where
		F: FileLike,
		TagCodecError: From<<F as Truncate>::Error>,
		TagCodecError: From<<F as Length>::Error>,
	{
		file.rewind()?;

		let empty;
		let tag = match &self.tag {
			Some(tag) => tag,
			None => {
				empty = Tag::new(self.tag_type());
				&empty
			},
		};

		utils::write_tag(tag, file, self.ty, write_options).map_err(TagCodecError::on_write)
	}

	/// Write the tag to a path
	///
	/// # Errors
	///
	/// * `path` can't be opened for writing
	/// * See [`TaggedFile::save_to`]
	pub fn save_to_path<P>(&self, path: P, write_options: WriteOptions) -> Result<()>
	where
		P: AsRef<Path>,
	{
		let mut file = OpenOptions::new()
			.read(true)
			.write(true)
			.open(path)
			.map_err(|e| TagCodecError::from(e).on_write())?;

		self.save_to(&mut file, write_options)
	}
}

impl AudioFile for TaggedFile {
	type Properties = AudioProperties;

	fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Self>
	where
		R: Read + Seek,
		Self: Sized,
	{
		crate::probe::Probe::new(reader)
			.options(parse_options)
			.guess_file_type()?
			.read()
	}

	fn properties(&self) -> &Self::Properties {
		&self.properties
	}

	fn contains_tag(&self) -> bool {
		self.tag.is_some()
	}
}
