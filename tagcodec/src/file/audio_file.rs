use super::tagged_file::TaggedFile;
use crate::config::ParseOptions;
use crate::error::Result;

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// Provides various methods for interaction with a file
pub trait AudioFile: Into<TaggedFile> {
	/// The struct the file uses for audio properties
	///
	/// Every format has its own, convertible into the common [`AudioProperties`](crate::properties::AudioProperties)
	type Properties;

	/// Read a file from a reader
	///
	/// # Errors
	///
	/// Errors depend on the file and tags being read. See [`TagCodecError`](crate::error::TagCodecError)
	fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Self>
	where
		R: Read + Seek,
		Self: Sized;

	/// Read a file from a path
	///
	/// # Errors
	///
	/// * `path` does not exist
	/// * See [`AudioFile::read_from`]
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use tagcodec::config::ParseOptions;
	/// use tagcodec::dsd::dsf::DsfFile;
	/// use tagcodec::file::AudioFile;
	///
	/// # fn main() -> tagcodec::error::Result<()> {
	/// let dsf = DsfFile::read_from_path("track.dsf", ParseOptions::new())?;
	/// println!("{:?}", dsf.properties());
	/// # Ok(()) }
	/// ```
	fn read_from_path<P>(path: P, parse_options: ParseOptions) -> Result<Self>
	where
		P: AsRef<Path>,
		Self: Sized,
	{
		let mut reader = BufReader::new(File::open(path)?);
		Self::read_from(&mut reader, parse_options)
	}

	/// Returns a reference to the file's properties
	fn properties(&self) -> &Self::Properties;

	/// Checks if the file contains a tag
	fn contains_tag(&self) -> bool;
}
