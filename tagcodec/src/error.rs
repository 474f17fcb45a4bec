//! Errors raised while reading or writing tags
//!
//! Everything surfaces as a [`TagCodecError`], classified by its [`ErrorKind`]. Callers usually
//! only need to tell these apart:
//!
//! * [`ErrorKind::CannotRead`] - bad signature, truncated stream, unknown block or version
//! * [`ErrorKind::InvalidChunk`] - an unknown chunk during a strict container walk
//! * [`ErrorKind::CannotWrite`] - the existing tag region is corrupt or inconsistent
//! * [`ErrorKind::NoWritePermission`] - the platform denied write access
//! * [`ErrorKind::UnsupportedOperation`] - the format cannot carry the requested tag
//!
//! [`TagCodecError::is_read_error`] and [`TagCodecError::is_write_error`] group the kinds.

use crate::file::FileType;
pub use crate::util::text::TextEncodingError;

use std::collections::TryReserveError;
use std::fmt::{Debug, Display, Formatter};

/// Alias for `Result<T, TagCodecError>`
pub type Result<T> = std::result::Result<T, TagCodecError>;

/// What went wrong
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	/// None of the supported signatures matched
	UnknownFormat,
	/// A size field asks for more data than will be allocated or encoded
	TooMuchData,
	/// A size field disagrees with the structure around it
	SizeMismatch,
	/// The file could not be decoded
	CannotRead(FileDecodingError),
	/// A strict container walk met a chunk it does not know
	InvalidChunk([u8; 4]),
	/// The file could not be updated
	CannotWrite(FileEncodingError),
	/// The platform denied write access to the file
	NoWritePermission(std::io::Error),
	/// The format cannot do what was asked
	UnsupportedOperation(&'static str),
	/// A chunk announced a tag, but its contents are not one
	FakeTag,
	/// Text could not be decoded
	TextDecode(&'static str),
	/// Text could not be represented in the target encoding
	TextEncode(TextEncodingError),
	/// An ID3v2 tag is malformed or cannot be written
	Id3v2(Id3v2Error),
	/// An MP4 atom holds invalid data
	BadAtom(&'static str),
	/// Text was expected to be UTF-8
	StringFromUtf8(std::string::FromUtf8Error),
	/// Any other I/O failure
	Io(std::io::Error),
	/// An allocation was refused
	Alloc(TryReserveError),
	/// Uninhabited, produced by [`Infallible`](std::convert::Infallible) conversions
	Infallible(std::convert::Infallible),
}

/// What went wrong inside an ID3v2 tag
#[derive(Debug)]
#[non_exhaustive]
pub enum Id3v2ErrorKind {
	/// The header names a major version other than 2, 3 or 4
	BadId3v2Version(u8, u8),
	/// ID3v2.2 compression never had a defined scheme, such tags are unreadable
	V2Compression,
	/// The extended header is shorter than its minimum or larger than the tag
	BadExtendedHeaderSize,
	/// A frame ID holds something other than `A-Z` and `0-9`, or has the wrong length
	BadFrameId(Vec<u8>),
	/// A frame is too short for its own fields
	BadFrameLength,
	/// A compressed or encrypted frame lacks its data length indicator
	MissingDataLengthIndicator,
	/// ID3v2.2 only allows Latin-1 and UTF-16
	V2InvalidTextEncoding,
	/// An ID3v2.2 picture has an unknown three character format
	BadPictureFormat(String),
	/// A compressed frame was found but decompression is compiled out
	#[cfg(not(feature = "id3v2_compression_support"))]
	CompressedFrameEncountered,
	/// The frame's ID and value cannot be written together
	BadFrame(String, &'static str),
	/// A language code is not three ASCII letters
	InvalidLanguage([u8; 3]),
}

impl Display for Id3v2ErrorKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::BadId3v2Version(major, minor) => {
				write!(f, "unsupported version 2.{major}.{minor}")
			},
			Self::V2Compression => f.write_str("compressed ID3v2.2 tags cannot be read"),
			Self::BadExtendedHeaderSize => f.write_str("extended header has an invalid size"),
			Self::BadFrameId(id) => write!(f, "invalid frame ID {}", id.escape_ascii()),
			Self::BadFrameLength => f.write_str("frame is too short for its contents"),
			Self::MissingDataLengthIndicator => {
				f.write_str("frame needs a data length indicator but has none")
			},
			Self::V2InvalidTextEncoding => {
				f.write_str("ID3v2.2 text must be Latin-1 or UTF-16")
			},
			Self::BadPictureFormat(format) => write!(f, "unknown picture format {format:?}"),
			#[cfg(not(feature = "id3v2_compression_support"))]
			Self::CompressedFrameEncountered => {
				f.write_str("compressed frame found, but decompression is disabled")
			},
			Self::BadFrame(id, value) => write!(f, "frame {id} cannot hold a {value} value"),
			Self::InvalidLanguage(lang) => {
				write!(f, "invalid language code {}", lang.escape_ascii())
			},
		}
	}
}

/// An error that arises while interacting with an ID3v2 tag
pub struct Id3v2Error {
	kind: Id3v2ErrorKind,
}

impl Id3v2Error {
	/// Wrap an [`Id3v2ErrorKind`]
	#[must_use]
	pub const fn new(kind: Id3v2ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`Id3v2ErrorKind`]
	pub fn kind(&self) -> &Id3v2ErrorKind {
		&self.kind
	}
}

impl Debug for Id3v2Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "Id3v2({:?})", self.kind)
	}
}

impl Display for Id3v2Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "ID3v2: {}", self.kind)
	}
}

// Decoding and encoding failures carry the same payload, a format and a fixed message
macro_rules! file_error {
	($(#[$meta:meta])* $name:ident, $verb:literal) => {
		$(#[$meta])*
		pub struct $name {
			format: Option<FileType>,
			description: &'static str,
		}

		impl $name {
			/// Create an error tied to `format`
			#[must_use]
			pub const fn new(format: FileType, description: &'static str) -> Self {
				Self {
					format: Some(format),
					description,
				}
			}

			/// Create an error that isn't tied to a format
			#[must_use]
			pub const fn from_description(description: &'static str) -> Self {
				Self {
					format: None,
					description,
				}
			}

			/// The format being processed, if known
			pub fn format(&self) -> Option<FileType> {
				self.format
			}

			/// What went wrong
			pub fn description(&self) -> &str {
				self.description
			}
		}

		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
				f.debug_struct(stringify!($name))
					.field("format", &self.format)
					.field("description", &self.description)
					.finish()
			}
		}

		impl Display for $name {
			fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
				match self.format {
					Some(format) => write!(f, "{} {format:?}: {}", $verb, self.description),
					None => write!(f, "{}: {}", $verb, self.description),
				}
			}
		}
	};
}

file_error!(
	/// The input could not be decoded
	FileDecodingError,
	"Reading"
);

file_error!(
	/// The file could not be updated
	///
	/// ```rust
	/// use tagcodec::error::FileEncodingError;
	/// use tagcodec::file::FileType;
	///
	/// let err = FileEncodingError::new(FileType::Dsf, "Metadata offset is out of bounds");
	/// assert_eq!(err.format(), Some(FileType::Dsf));
	/// ```
	FileEncodingError,
	"Writing"
);

/// The error type of every fallible operation in tagcodec
pub struct TagCodecError {
	pub(crate) kind: ErrorKind,
}

impl TagCodecError {
	/// Create a `TagCodecError` from an [`ErrorKind`]
	///
	/// ```rust
	/// use tagcodec::error::{ErrorKind, TagCodecError};
	///
	/// let err = TagCodecError::new(ErrorKind::UnknownFormat);
	/// assert!(matches!(err.kind(), ErrorKind::UnknownFormat));
	/// ```
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`ErrorKind`]
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}

	/// Whether the input could not be understood
	///
	/// Bad signatures, truncated streams, unknown versions or block types, and chunks rejected
	/// by a strict walk all count.
	pub fn is_read_error(&self) -> bool {
		matches!(
			self.kind,
			ErrorKind::CannotRead(_)
				| ErrorKind::InvalidChunk(_)
				| ErrorKind::FakeTag
				| ErrorKind::BadAtom(_)
				| ErrorKind::Id3v2(_)
				| ErrorKind::TextDecode(_)
		)
	}

	/// Whether the failure happened while committing bytes back to a file
	pub fn is_write_error(&self) -> bool {
		matches!(
			self.kind,
			ErrorKind::CannotWrite(_) | ErrorKind::NoWritePermission(_) | ErrorKind::TextEncode(_)
		)
	}

	/// Turn a denied access on a write path into [`ErrorKind::NoWritePermission`]
	pub(crate) fn on_write(self) -> Self {
		match self.kind {
			ErrorKind::Io(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
				Self::new(ErrorKind::NoWritePermission(err))
			},
			kind => Self { kind },
		}
	}
}

impl std::error::Error for TagCodecError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match &self.kind {
			ErrorKind::Io(err) | ErrorKind::NoWritePermission(err) => Some(err),
			ErrorKind::StringFromUtf8(err) => Some(err),
			ErrorKind::TextEncode(err) => Some(err),
			ErrorKind::Alloc(err) => Some(err),
			_ => None,
		}
	}
}

impl Debug for TagCodecError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Debug::fmt(&self.kind, f)
	}
}

impl Display for TagCodecError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match &self.kind {
			ErrorKind::UnknownFormat => f.write_str("Unrecognized file format"),
			ErrorKind::TooMuchData => f.write_str("Refusing to handle an oversized item"),
			ErrorKind::SizeMismatch => f.write_str("Item size is out of bounds"),
			ErrorKind::CannotRead(err) => Display::fmt(err, f),
			ErrorKind::InvalidChunk(id) => write!(f, "Unknown chunk {}", id.escape_ascii()),
			ErrorKind::CannotWrite(err) => Display::fmt(err, f),
			ErrorKind::NoWritePermission(err) => write!(f, "File is not writable: {err}"),
			ErrorKind::UnsupportedOperation(message) => write!(f, "Unsupported: {message}"),
			ErrorKind::FakeTag => f.write_str("Expected a tag, found invalid data"),
			ErrorKind::TextDecode(message) => write!(f, "Text decoding: {message}"),
			ErrorKind::TextEncode(err) => write!(f, "Text encoding: {err}"),
			ErrorKind::Id3v2(err) => Display::fmt(err, f),
			ErrorKind::BadAtom(message) => write!(f, "MP4 atom: {message}"),
			ErrorKind::StringFromUtf8(err) => Display::fmt(err, f),
			ErrorKind::Io(err) => Display::fmt(err, f),
			ErrorKind::Alloc(err) => Display::fmt(err, f),
			ErrorKind::Infallible(never) => match *never {},
		}
	}
}

macro_rules! from_error {
	($($source:ty => $variant:ident),+ $(,)?) => {
		$(
			impl From<$source> for TagCodecError {
				fn from(input: $source) -> Self {
					Self::new(ErrorKind::$variant(input))
				}
			}
		)+
	};
}

from_error!(
	Id3v2Error => Id3v2,
	FileDecodingError => CannotRead,
	FileEncodingError => CannotWrite,
	TextEncodingError => TextEncode,
	std::string::FromUtf8Error => StringFromUtf8,
	TryReserveError => Alloc,
	std::convert::Infallible => Infallible,
);

impl From<std::io::Error> for TagCodecError {
	fn from(input: std::io::Error) -> Self {
		// A short read always means the stream ended inside a structure
		if input.kind() == std::io::ErrorKind::UnexpectedEof {
			return FileDecodingError::from_description("Stream ended unexpectedly").into();
		}

		Self::new(ErrorKind::Io(input))
	}
}
