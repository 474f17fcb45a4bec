//! The frame bodies that are decoded rather than kept as raw bytes

use crate::util::text::TextEncoding;

/// A text information frame
///
/// ID3v2.4 allows multiple values in a single frame, separated by `'\0'`. They are kept as is.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TextFrame {
	/// The encoding of the text
	pub encoding: TextEncoding,
	/// The text itself
	pub value: String,
}

impl TextFrame {
	/// Create a new [`TextFrame`]
	pub fn new(encoding: TextEncoding, value: String) -> Self {
		Self { encoding, value }
	}
}

/// A user defined text frame (`TXXX`)
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ExtendedTextFrame {
	/// The encoding of the description and content
	pub encoding: TextEncoding,
	/// Unique content description
	pub description: String,
	/// The actual frame content
	pub content: String,
}

impl ExtendedTextFrame {
	/// Create a new [`ExtendedTextFrame`]
	pub fn new(encoding: TextEncoding, description: String, content: String) -> Self {
		Self {
			encoding,
			description,
			content,
		}
	}
}

/// A frame that carries a language: comments (`COMM`) and unsynchronised lyrics (`USLT`)
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LanguageFrame {
	/// The encoding of the description and content
	pub encoding: TextEncoding,
	/// ISO-639-2 language code (3 bytes)
	pub language: [u8; 3],
	/// Unique content description
	pub description: String,
	/// The actual frame content
	pub content: String,
}

impl LanguageFrame {
	/// Create a new [`LanguageFrame`]
	pub fn new(
		encoding: TextEncoding,
		language: [u8; 3],
		description: String,
		content: String,
	) -> Self {
		Self {
			encoding,
			language,
			description,
			content,
		}
	}
}

/// A URL link frame, always Latin-1
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct UrlFrame {
	/// The URL
	pub url: String,
}

impl UrlFrame {
	/// Create a new [`UrlFrame`]
	pub fn new(url: String) -> Self {
		Self { url }
	}
}

/// An attached picture (`APIC`, or `PIC` in ID3v2.2)
///
/// ID3v2.2 stores a 3-character image format rather than a MIME type. It is converted on read,
/// `JPG` and `PNG` become `image/jpeg` and `image/png`, anything else becomes `image/<format>`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct AttachedPictureFrame {
	/// The encoding of the description
	pub encoding: TextEncoding,
	/// The picture's MIME type
	pub mime_type: String,
	/// The picture type, as defined by the APIC frame (3 is the front cover)
	pub picture_type: u8,
	/// The picture's description
	pub description: String,
	/// The image data
	pub data: Vec<u8>,
}

impl AttachedPictureFrame {
	/// The picture type of a front cover
	pub const FRONT_COVER: u8 = 3;

	/// Create a new [`AttachedPictureFrame`]
	pub fn new(mime_type: String, picture_type: u8, description: String, data: Vec<u8>) -> Self {
		Self {
			encoding: TextEncoding::UTF8,
			mime_type,
			picture_type,
			description,
			data,
		}
	}
}
