//! Format-agnostic file parsing tools

use crate::asf::AsfFile;
use crate::config::ParseOptions;
use crate::dsd::dff::DffFile;
use crate::dsd::dsf::DsfFile;
use crate::error::Result;
use crate::file::{AudioFile, FileType, FileTypeGuessResult, TaggedFile};
use crate::flac::FlacFile;
use crate::iff::aiff::AiffFile;
use crate::iff::wav::WavFile;
use crate::macros::err;
use crate::mp4::Mp4File;

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Reads a file whose format isn't known up front
///
/// A `Probe` opened from a path starts with the format its extension suggests.
/// [`Probe::guess_file_type`] replaces that with whatever the content identifies, and is the
/// only way to find the format of a bare reader.
///
/// ```rust
/// use std::io::Cursor;
/// use tagcodec::file::FileType;
/// use tagcodec::probe::Probe;
///
/// # fn main() -> tagcodec::error::Result<()> {
/// let reader = Cursor::new(b"fLaC\0\0\0\x22".to_vec());
/// let probe = Probe::new(reader).guess_file_type()?;
///
/// assert_eq!(probe.file_type(), Some(FileType::Flac));
/// # Ok(()) }
/// ```
pub struct Probe<R: Read> {
	inner: R,
	options: Option<ParseOptions>,
	f_ty: Option<FileType>,
}

impl<R: Read> Probe<R> {
	/// Wrap a reader whose format is still unknown
	///
	/// Readers that aren't buffered already are best wrapped in a [`BufReader`].
	#[must_use]
	pub const fn new(reader: R) -> Self {
		Self {
			inner: reader,
			options: None,
			f_ty: None,
		}
	}

	/// Wrap a reader that is expected to hold `file_type`
	pub fn with_file_type(reader: R, file_type: FileType) -> Self {
		Self::new(reader).set_file_type(file_type)
	}

	/// The format that [`Probe::read`] will use
	pub fn file_type(&self) -> Option<FileType> {
		self.f_ty
	}

	/// Force the format, skipping detection
	pub fn set_file_type(mut self, file_type: FileType) -> Self {
		self.f_ty = Some(file_type);
		self
	}

	/// Options passed on to the format's reader, [`ParseOptions::default`] if never set
	#[must_use]
	pub fn options(mut self, options: ParseOptions) -> Self {
		self.options = Some(options);
		self
	}

	/// Give the reader back
	pub fn into_inner(self) -> R {
		self.inner
	}
}

impl Probe<BufReader<File>> {
	/// Open `path`, taking a first guess at the format from its extension
	///
	/// # Errors
	///
	/// The file can't be opened.
	pub fn open<P>(path: P) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		let path = path.as_ref();
		let f_ty = FileType::from_path(path);
		log::debug!("Opening `{}`, extension suggests {:?}", path.display(), f_ty);

		Ok(Self {
			inner: BufReader::new(File::open(path)?),
			options: None,
			f_ty,
		})
	}
}

// Fill as much of `buf` as the reader has from `offset`, then return to `origin`
fn peek<R>(reader: &mut R, origin: u64, offset: u64, buf: &mut [u8]) -> std::io::Result<usize>
where
	R: Read + Seek,
{
	reader.seek(SeekFrom::Start(origin + offset))?;

	let mut filled = 0;
	while filled < buf.len() {
		match reader.read(&mut buf[filled..]) {
			Ok(0) => break,
			Ok(n) => filled += n,
			Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {},
			Err(e) => return Err(e),
		}
	}

	reader.seek(SeekFrom::Start(origin))?;
	Ok(filled)
}

impl<R: Read + Seek> Probe<R> {
	/// Identify the format from the content
	///
	/// A recognized signature replaces the current format, otherwise the guess from the extension
	/// (if any) is kept. The reader is left where it started.
	///
	/// # Errors
	///
	/// Only I/O errors, after which the `Probe` should be discarded.
	pub fn guess_file_type(mut self) -> std::io::Result<Self> {
		let guess = self.sniff()?;
		if guess.is_some() {
			self.f_ty = guess;
		}

		log::debug!("Content suggests {:?}, using {:?}", guess, self.f_ty);
		Ok(self)
	}

	fn sniff(&mut self) -> std::io::Result<Option<FileType>> {
		let origin = self.inner.stream_position()?;

		// Every signature we know fits in 36 bytes
		let mut head = [0; 36];
		let len = peek(&mut self.inner, origin, 0, &mut head)?;

		match FileType::from_buffer_inner(&head[..len]) {
			Some(FileTypeGuessResult::Determined(file_type)) => Ok(Some(file_type)),
			// Of the formats we read, only FLAC streams are found behind an ID3v2 tag
			Some(FileTypeGuessResult::MaybePrecededById3 { size, footer }) => {
				let tag_len = u64::from(size) + if footer { 20 } else { 10 };
				log::debug!("Looking past a {} byte ID3v2 tag", tag_len);

				let mut marker = [0; 4];
				let len = peek(&mut self.inner, origin, tag_len, &mut marker)?;
				Ok((len == 4 && &marker == b"fLaC").then_some(FileType::Flac))
			},
			None => Ok(None),
		}
	}

	/// Attempts to extract a [`TaggedFile`] from the reader
	///
	/// If `read_tags` is false, the tag will be `None`.
	///
	/// # Errors
	///
	/// * No file type
	///     - This expects the file type to have been set already, either with
	///       [`Probe::guess_file_type`] or [`Probe::set_file_type`]. When reading from
	///       paths, this is not necessary.
	/// * The reader contains invalid data
	pub fn read(mut self) -> Result<TaggedFile> {
		let reader = &mut self.inner;
		let options = self.options.unwrap_or_default();

		if !options.read_tags && !options.read_properties {
			log::warn!("Skipping both tag and property reading, file will be empty");
		}

		let Some(file_type) = self.f_ty else {
			err!(UnknownFormat);
		};

		Ok(match file_type {
			FileType::Aiff => AiffFile::read_from(reader, options)?.into(),
			FileType::Asf => AsfFile::read_from(reader, options)?.into(),
			FileType::Dff => DffFile::read_from(reader, options)?.into(),
			FileType::Dsf => DsfFile::read_from(reader, options)?.into(),
			FileType::Flac => FlacFile::read_from(reader, options)?.into(),
			FileType::Mp4 => Mp4File::read_from(reader, options)?.into(),
			FileType::Wav => WavFile::read_from(reader, options)?.into(),
		})
	}
}

#[cfg(test)]
mod tests {
	use crate::file::FileType;
	use crate::probe::Probe;

	use std::io::{Cursor, Seek};

	#[test_log::test]
	fn flac_behind_id3v2() {
		// ID3v2.4 header with a 4 byte body, followed by a FLAC signature
		let mut data = vec![b'I', b'D', b'3', 4, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0];
		data.extend_from_slice(b"fLaC\0\0\0\x22");

		let mut reader = Cursor::new(data);
		let probe = Probe::new(&mut reader).guess_file_type().unwrap();
		assert_eq!(probe.file_type(), Some(FileType::Flac));

		// The reader is left where it was
		assert_eq!(reader.stream_position().unwrap(), 0);
	}

	#[test_log::test]
	fn id3v2_without_known_stream() {
		let data = vec![b'I', b'D', b'3', 4, 0, 0, 0, 0, 0, 0, 0xFF, 0xFB];

		let probe = Probe::new(Cursor::new(data)).guess_file_type().unwrap();
		assert_eq!(probe.file_type(), None);
	}

	#[test_log::test]
	fn content_beats_extension() {
		let probe = Probe::with_file_type(Cursor::new(b"DSD \x1c\0\0\0".to_vec()), FileType::Flac)
			.guess_file_type()
			.unwrap();
		assert_eq!(probe.file_type(), Some(FileType::Dsf));

		// Unrecognized content keeps the previous guess
		let probe = Probe::with_file_type(Cursor::new(vec![0; 8]), FileType::Wav)
			.guess_file_type()
			.unwrap();
		assert_eq!(probe.file_type(), Some(FileType::Wav));
	}

	#[test_log::test]
	fn unknown_format() {
		let probe = Probe::new(Cursor::new(vec![0; 64])).guess_file_type().unwrap();
		assert!(probe.read().is_err());
	}
}
