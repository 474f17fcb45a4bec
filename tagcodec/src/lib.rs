//! Read and write the tags embedded in audio containers.
//!
//! # Supported Formats
//!
//! | Container       | Tag                                          |
//! |-----------------|----------------------------------------------|
//! | WAV, AIFF       | ID3v2 in an `ID3 ` chunk                     |
//! | DSF             | ID3v2 at the metadata offset                 |
//! | DFF             | ID3v2 in an `ID3 ` chunk                     |
//! | FLAC            | Vorbis comments and `PICTURE` blocks         |
//! | ASF (WMA)       | Content description and metadata objects     |
//! | MP4 (M4A)       | `moov.udta.meta.ilst`                        |
//!
//! # Examples
//!
//! ## Reading a generic file
//!
//! ```rust,no_run
//! # fn main() -> tagcodec::error::Result<()> {
//! use tagcodec::tag::Accessor;
//!
//! // The format is guessed from the content, then the extension
//! let tagged_file = tagcodec::read_from_path("track.dsf")?;
//!
//! if let Some(tag) = tagged_file.tag() {
//! 	println!("Title: {:?}", tag.title());
//! }
//! # Ok(()) }
//! ```
//!
//! ## Editing a tag
//!
//! ```rust,no_run
//! # fn main() -> tagcodec::error::Result<()> {
//! use tagcodec::tag::{Accessor, Tag};
//!
//! let path = "track.flac";
//! let mut tag = match tagcodec::read_tag(path)? {
//! 	Some(tag) => tag,
//! 	None => Tag::new(tagcodec::file::FileType::Flac.primary_tag_type()),
//! };
//!
//! tag.set_artist(String::from("Foo artist"));
//! tagcodec::write_tag(path, &tag)?;
//! # Ok(()) }
//! ```
//!
//! ## Using concrete file types
//!
//! ```rust,no_run
//! # fn main() -> tagcodec::error::Result<()> {
//! use tagcodec::config::ParseOptions;
//! use tagcodec::dsd::dsf::DsfFile;
//! use tagcodec::file::AudioFile;
//! use std::fs::File;
//!
//! let mut file_content = File::open("track.dsf")?;
//! let dsf_file = DsfFile::read_from(&mut file_content, ParseOptions::new())?;
//!
//! assert_eq!(dsf_file.properties().channels(), 2);
//! # Ok(()) }
//! ```
//!
//! # Important format-specific notes
//!
//! All formats have their own quirks. Be sure to read the module documentation of each format.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod error;
pub mod file;
pub(crate) mod macros;
pub mod probe;
pub mod properties;
pub mod tag;
mod util;

pub mod asf;
pub mod dsd;
pub mod flac;
pub mod id3;
pub mod iff;
pub mod mp4;

pub use util::text::TextEncoding;

pub use util::io;

use crate::config::{ParseOptions, WriteOptions};
use crate::error::{Result, TagCodecError};
use crate::file::{AudioFile, TaggedFile};
use crate::io::{FileLike, Length, Truncate};
use crate::macros::err;
use crate::probe::Probe;
use crate::properties::AudioProperties;
use crate::tag::Tag;

use std::fs::OpenOptions;
use std::io::{Read, Seek};
use std::path::Path;

/// Read a [`TaggedFile`] from a reader
///
/// The [`FileType`](file::FileType) is guessed from the content.
///
/// # Errors
///
/// * The format could not be determined
/// * See [`Probe::read`]
///
/// # Examples
///
/// ```rust,no_run
/// use tagcodec::config::ParseOptions;
/// use std::fs::File;
///
/// # fn main() -> tagcodec::error::Result<()> {
/// let mut file = File::open("track.wma")?;
/// let tagged_file = tagcodec::read_from(&mut file, ParseOptions::new())?;
/// # Ok(()) }
/// ```
pub fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<TaggedFile>
where
	R: Read + Seek,
{
	TaggedFile::read_from(reader, parse_options)
}

/// Read a [`TaggedFile`] from a path
///
/// The [`FileType`](file::FileType) is guessed from the content, falling back to the extension.
///
/// # Errors
///
/// See [`read_from`]
pub fn read_from_path<P>(path: P) -> Result<TaggedFile>
where
	P: AsRef<Path>,
{
	Probe::open(path)?.guess_file_type()?.read()
}

/// Read the tag of the file at `path`
///
/// # Errors
///
/// See [`read_tag_with_options`]
pub fn read_tag<P>(path: P) -> Result<Option<Tag>>
where
	P: AsRef<Path>,
{
	read_tag_with_options(path, ParseOptions::new())
}

/// Read the tag of the file at `path`, with custom [`ParseOptions`]
///
/// # Errors
///
/// * `path` can't be opened
/// * The format could not be determined
/// * The file or its tag is malformed, see [`ParsingMode`](config::ParsingMode)
pub fn read_tag_with_options<P>(path: P, parse_options: ParseOptions) -> Result<Option<Tag>>
where
	P: AsRef<Path>,
{
	let tagged_file = Probe::open(path)?
		.options(parse_options)
		.guess_file_type()?
		.read()?;

	Ok(tagged_file.tag)
}

/// Read the audio properties of the file at `path`
///
/// The tag is not read.
///
/// # Errors
///
/// See [`read_tag_with_options`]
pub fn read_audio_properties<P>(path: P) -> Result<AudioProperties>
where
	P: AsRef<Path>,
{
	let tagged_file = Probe::open(path)?
		.options(ParseOptions::new().read_tags(false))
		.guess_file_type()?
		.read()?;

	Ok(tagged_file.properties)
}

/// Write `tag` to the file at `path`, replacing the existing one
///
/// An empty tag removes the existing tag.
///
/// # Errors
///
/// See [`write_tag_with_options`]
pub fn write_tag<P>(path: P, tag: &Tag) -> Result<()>
where
	P: AsRef<Path>,
{
	write_tag_with_options(path, tag, WriteOptions::default())
}

/// Write `tag` to the file at `path`, with custom [`WriteOptions`]
///
/// # Errors
///
/// * `path` can't be opened for writing, see [`ErrorKind::NoWritePermission`](error::ErrorKind::NoWritePermission)
/// * See [`write_to`]
pub fn write_tag_with_options<P>(path: P, tag: &Tag, write_options: WriteOptions) -> Result<()>
where
	P: AsRef<Path>,
{
	tag.save_to_path(path, write_options)
}

/// Remove the tag from the file at `path`
///
/// Removing a tag from a file without one is not an error.
///
/// # Errors
///
/// * `path` can't be opened for writing
/// * See [`delete_from`]
pub fn delete_tag<P>(path: P) -> Result<()>
where
	P: AsRef<Path>,
{
	let mut file = OpenOptions::new()
		.read(true)
		.write(true)
		.open(path)
		.map_err(|e| TagCodecError::from(e).on_write())?;

	delete_from(&mut file)
}

/// Write `tag` to a [`FileLike`]
///
/// # Errors
///
/// * The format could not be determined
/// * The format can't store `tag`, see [`ErrorKind::UnsupportedOperation`](error::ErrorKind::UnsupportedOperation)
/// * The existing container is malformed
/// * Writing fails
///
/// # Examples
///
/// ```rust,no_run
/// use tagcodec::config::WriteOptions;
/// use tagcodec::tag::{Accessor, Tag, TagType};
/// use std::fs::OpenOptions;
///
/// # fn main() -> tagcodec::error::Result<()> {
/// let mut tag = Tag::new(TagType::Id3v2);
/// tag.set_title(String::from("Foo title"));
///
/// let mut file = OpenOptions::new().read(true).write(true).open("track.wav")?;
/// tagcodec::write_to(&mut file, &tag, WriteOptions::default())?;
/// # Ok(()) }
/// ```
pub fn write_to<F>(file: &mut F, tag: &Tag, write_options: WriteOptions) -> Result<()>
where
	F: FileLike,
	TagCodecError: From<<F as Truncate>::Error>,
	TagCodecError: From<<F as Length>::Error>,
{
	tag.save_to(file, write_options)
}

/// Remove the tag from a [`FileLike`]
///
/// # Errors
///
/// * The format could not be determined
/// * The existing container is malformed
/// * Writing fails
pub fn delete_from<F>(file: &mut F) -> Result<()>
where
	F: FileLike,
	TagCodecError: From<<F as Truncate>::Error>,
	TagCodecError: From<<F as Length>::Error>,
{
	file.rewind()?;

	let probe = Probe::new(&mut *file).guess_file_type()?;
	let Some(file_type) = probe.file_type() else {
		err!(UnknownFormat);
	};

	let empty = Tag::new(file_type.primary_tag_type());
	tag::utils::write_tag(&empty, probe.into_inner(), file_type, WriteOptions::default())
		.map_err(TagCodecError::on_write)
}

pub mod prelude {
	//! A prelude for commonly used items in the library.
	//!
	//! This module is intended to be wildcard imported.
	//!
	//! ```rust
	//! use tagcodec::prelude::*;
	//! ```

	pub use crate::file::AudioFile;
	pub use crate::tag::Accessor;
}
