//! Utilities for generic tag handling
//!
//! Every container family has exactly one tag format, so a [`Tag`] is simply one of the concrete
//! tag types. The common fields can be reached through the [`Accessor`] trait regardless of the
//! format.

mod accessor;
mod tag_type;
pub(crate) mod utils;

use crate::asf::AsfTag;
use crate::config::WriteOptions;
use crate::error::{Result, TagCodecError};
use crate::flac::FlacTag;
use crate::id3::v2::Id3v2Tag;
use crate::macros::err;
use crate::mp4::Mp4Ilst;
use crate::probe::Probe;
use crate::util::io::{FileLike, Length, Truncate};

use std::borrow::Cow;
use std::fs::OpenOptions;
use std::path::Path;

// Exports
pub use accessor::Accessor;
pub use tag_type::TagType;

macro_rules! impl_accessor {
	($($name:ident),+ $(,)?) => {
		paste::paste! {
			$(
				fn $name(&self) -> Option<Cow<'_, str>> {
					self.as_accessor().$name()
				}

				fn [<set_ $name>](&mut self, value: String) {
					self.as_accessor_mut().[<set_ $name>](value)
				}

				fn [<remove_ $name>](&mut self) {
					self.as_accessor_mut().[<remove_ $name>]()
				}
			)+
		}
	}
}

/// A tag read from, or to be written to, a file
///
/// # Examples
///
/// ```rust
/// use tagcodec::tag::{Accessor, Tag, TagType};
///
/// let mut tag = Tag::new(TagType::Id3v2);
/// tag.set_title(String::from("Foo"));
///
/// assert_eq!(tag.tag_type(), TagType::Id3v2);
/// assert_eq!(tag.title().as_deref(), Some("Foo"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
	/// An ID3v2 tag, from a WAV, AIFF, DSF or DFF file
	Id3v2(Id3v2Tag),
	/// The Vorbis comments and pictures of a FLAC file
	Flac(FlacTag),
	/// The metadata objects of an ASF file
	Asf(AsfTag),
	/// An MP4 `ilst` atom
	Mp4(Mp4Ilst),
}

impl Tag {
	/// Create an empty tag of `tag_type`
	pub fn new(tag_type: TagType) -> Self {
		match tag_type {
			TagType::Id3v2 => Self::Id3v2(Id3v2Tag::default()),
			TagType::VorbisComments => Self::Flac(FlacTag::default()),
			TagType::Asf => Self::Asf(AsfTag::default()),
			TagType::Mp4Ilst => Self::Mp4(Mp4Ilst::default()),
		}
	}

	/// Returns the [`TagType`]
	pub fn tag_type(&self) -> TagType {
		match self {
			Self::Id3v2(_) => TagType::Id3v2,
			Self::Flac(_) => TagType::VorbisComments,
			Self::Asf(_) => TagType::Asf,
			Self::Mp4(_) => TagType::Mp4Ilst,
		}
	}

	/// Whether the tag holds nothing worth writing
	///
	/// Writing an empty tag removes the tag from the file.
	pub fn is_empty(&self) -> bool {
		match self {
			Self::Id3v2(tag) => tag.is_empty(),
			Self::Flac(tag) => tag.is_empty(),
			Self::Asf(tag) => tag.is_empty(),
			Self::Mp4(tag) => tag.is_empty(),
		}
	}

	/// Save the tag to a path
	///
	/// # Errors
	///
	/// * Path doesn't exist
	/// * Path is not writable
	/// * See [`Tag::save_to`]
	pub fn save_to_path<P: AsRef<Path>>(&self, path: P, write_options: WriteOptions) -> Result<()> {
		let mut file = OpenOptions::new()
			.read(true)
			.write(true)
			.open(path)
			.map_err(|e| TagCodecError::from(e).on_write())?;

		self.save_to(&mut file, write_options)
	}

	/// Save the tag to a [`FileLike`]
	///
	/// The file type is guessed from its content.
	///
	/// # Errors
	///
	/// * The file format could not be determined
	/// * The file format can't store this tag
	/// * The existing container is malformed
	/// * Writing to the file fails
	pub fn save_to<F>(&self, file: &mut F, write_options: WriteOptions) -> Result<()>
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

		utils::write_tag(self, probe.into_inner(), file_type, write_options)
			.map_err(TagCodecError::on_write)
	}

	fn as_accessor(&self) -> &dyn Accessor {
		match self {
			Self::Id3v2(tag) => tag,
			Self::Flac(tag) => tag,
			Self::Asf(tag) => tag,
			Self::Mp4(tag) => tag,
		}
	}

	fn as_accessor_mut(&mut self) -> &mut dyn Accessor {
		match self {
			Self::Id3v2(tag) => tag,
			Self::Flac(tag) => tag,
			Self::Asf(tag) => tag,
			Self::Mp4(tag) => tag,
		}
	}
}

impl Accessor for Tag {
	impl_accessor!(artist, title, album, genre, comment);
}

impl From<Id3v2Tag> for Tag {
	fn from(input: Id3v2Tag) -> Self {
		Self::Id3v2(input)
	}
}

impl From<FlacTag> for Tag {
	fn from(input: FlacTag) -> Self {
		Self::Flac(input)
	}
}

impl From<AsfTag> for Tag {
	fn from(input: AsfTag) -> Self {
		Self::Asf(input)
	}
}

impl From<Mp4Ilst> for Tag {
	fn from(input: Mp4Ilst) -> Self {
		Self::Mp4(input)
	}
}
