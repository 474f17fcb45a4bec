pub(crate) mod codec;
pub(super) mod content;
pub(super) mod read;

use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::items::{
	AttachedPictureFrame, ExtendedTextFrame, LanguageFrame, TextFrame, UrlFrame,
};
use crate::util::text::TextEncoding;

use std::fmt::{Display, Formatter};

/// An ID3v2 frame ID
///
/// This is either a 3-character ID (ID3v2.2) or a 4-character ID (ID3v2.3/4), consisting of
/// only `'A'..='Z'` and `'0'..='9'`.
#[derive(PartialEq, Eq, Clone, Debug, Hash)]
pub struct FrameId(String);

impl FrameId {
	/// Attempts to create a `FrameId` from an ID string
	///
	/// # Errors
	///
	/// * `id` contains invalid characters
	/// * `id` is an invalid length
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::id3::v2::FrameId;
	///
	/// assert!(FrameId::new("TIT2").is_ok());
	/// assert!(FrameId::new("TT2").is_ok());
	/// assert!(FrameId::new("tit2").is_err());
	/// ```
	pub fn new(id: &str) -> Result<Self> {
		Self::verify_id(id.as_bytes())?;
		Ok(Self(id.to_owned()))
	}

	// For ids that are known to be valid
	pub(crate) fn new_unchecked(id: String) -> Self {
		debug_assert!(Self::verify_id(id.as_bytes()).is_ok());
		Self(id)
	}

	pub(crate) fn from_bytes(id: &[u8]) -> Result<Self> {
		Self::verify_id(id)?;
		// Verified to be ASCII above
		Ok(Self(id.iter().map(|&b| b as char).collect()))
	}

	fn verify_id(id: &[u8]) -> Result<()> {
		let valid = matches!(id.len(), 3 | 4)
			&& id
				.iter()
				.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());

		if !valid {
			return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameId(id.to_vec())).into());
		}

		Ok(())
	}

	/// Extracts the string from the ID
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Display for FrameId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

/// Various flags to describe the content of a frame
///
/// `grouping_identity`, `encryption` and `data_length_indicator` carry the extra byte(s) that
/// follow the frame header when the respective flag is set.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[allow(clippy::struct_excessive_bools)]
pub struct FrameFlags {
	/// Preserve frame on tag edit
	pub tag_alter_preservation: bool,
	/// Preserve frame on file edit
	pub file_alter_preservation: bool,
	/// Item cannot be written to
	pub read_only: bool,
	/// The group identifier the frame belongs to
	pub grouping_identity: Option<u8>,
	/// Frame is zlib compressed
	pub compression: bool,
	/// The encryption method symbol
	pub encryption: Option<u8>,
	/// Frame is unsynchronised
	pub unsynchronisation: bool,
	/// The size of the frame content before compression or unsynchronisation
	pub data_length_indicator: Option<u32>,
}

/// Where each flag lives in the 16-bit flag field of one revision, 0 when it has no bit
pub(crate) struct FlagLayout {
	tag_alter_preservation: u16,
	file_alter_preservation: u16,
	read_only: u16,
	grouping_identity: u16,
	compression: u16,
	encryption: u16,
	unsynchronisation: u16,
	data_length_indicator: u16,
}

pub(crate) const V23_FLAGS: FlagLayout = FlagLayout {
	tag_alter_preservation: 0x8000,
	file_alter_preservation: 0x4000,
	read_only: 0x2000,
	compression: 0x0080,
	encryption: 0x0040,
	grouping_identity: 0x0020,
	unsynchronisation: 0,
	data_length_indicator: 0,
};

pub(crate) const V24_FLAGS: FlagLayout = FlagLayout {
	tag_alter_preservation: 0x4000,
	file_alter_preservation: 0x2000,
	read_only: 0x1000,
	grouping_identity: 0x0040,
	compression: 0x0008,
	encryption: 0x0004,
	unsynchronisation: 0x0002,
	data_length_indicator: 0x0001,
};

impl FrameFlags {
	/// Decode a raw flag field, the extra bytes are filled in once they are read
	pub(crate) fn decode(raw: u16, layout: &FlagLayout) -> Self {
		let set = |bit: u16| bit != 0 && raw & bit == bit;

		FrameFlags {
			tag_alter_preservation: set(layout.tag_alter_preservation),
			file_alter_preservation: set(layout.file_alter_preservation),
			read_only: set(layout.read_only),
			grouping_identity: set(layout.grouping_identity).then_some(0),
			compression: set(layout.compression),
			encryption: set(layout.encryption).then_some(0),
			unsynchronisation: set(layout.unsynchronisation),
			data_length_indicator: set(layout.data_length_indicator).then_some(0),
		}
	}

	/// Encode into a raw flag field, dropping flags the layout has no bit for
	pub(crate) fn encode(&self, layout: &FlagLayout) -> u16 {
		[
			(self.tag_alter_preservation, layout.tag_alter_preservation),
			(self.file_alter_preservation, layout.file_alter_preservation),
			(self.read_only, layout.read_only),
			(self.grouping_identity.is_some(), layout.grouping_identity),
			(self.compression, layout.compression),
			(self.encryption.is_some(), layout.encryption),
			(self.unsynchronisation, layout.unsynchronisation),
			(self.data_length_indicator.is_some(), layout.data_length_indicator),
		]
		.into_iter()
		.filter(|(set, _)| *set)
		.fold(0, |raw, (_, bit)| raw | bit)
	}
}

/// The decoded content of a frame
#[derive(PartialEq, Eq, Clone, Debug, Hash)]
pub enum FrameValue {
	/// A text information frame (`T???` other than `TXXX`)
	Text(TextFrame),
	/// A user defined text frame (`TXXX`)
	UserText(ExtendedTextFrame),
	/// A comment frame (`COMM`)
	Comment(LanguageFrame),
	/// An unsynchronised lyrics frame (`USLT`)
	UnsynchronizedText(LanguageFrame),
	/// A URL link frame (`W???` other than `WXXX`)
	Url(UrlFrame),
	/// An attached picture (`APIC`)
	Picture(AttachedPictureFrame),
	/// Any other frame, including encrypted frames, kept exactly as read
	Binary(Vec<u8>),
}

/// A single ID3v2 frame
#[derive(PartialEq, Eq, Clone, Debug, Hash)]
pub struct Frame {
	pub(crate) id: FrameId,
	pub(crate) flags: FrameFlags,
	pub(crate) value: FrameValue,
}

impl Frame {
	/// Create a new frame
	///
	/// The id must belong to the version of the tag the frame is inserted into: 3 characters for
	/// ID3v2.2 and 4 characters otherwise.
	pub fn new(id: FrameId, value: FrameValue) -> Self {
		Self {
			id,
			flags: FrameFlags::default(),
			value,
		}
	}

	/// Create a text information frame
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::id3::v2::{Frame, FrameId, FrameValue};
	///
	/// # fn main() -> tagcodec::error::Result<()> {
	/// let frame = Frame::text(FrameId::new("TIT2")?, "Foo title");
	/// assert!(matches!(frame.value(), FrameValue::Text(_)));
	/// # Ok(()) }
	/// ```
	pub fn text(id: FrameId, value: impl Into<String>) -> Self {
		Self::new(
			id,
			FrameValue::Text(TextFrame::new(TextEncoding::UTF8, value.into())),
		)
	}

	/// The frame's id
	pub fn id(&self) -> &FrameId {
		&self.id
	}

	/// The frame's id as a string
	pub fn id_str(&self) -> &str {
		self.id.as_str()
	}

	/// The frame's flags
	pub fn flags(&self) -> FrameFlags {
		self.flags
	}

	/// Set the frame's flags
	pub fn set_flags(&mut self, flags: FrameFlags) {
		self.flags = flags;
	}

	/// The frame's content
	pub fn value(&self) -> &FrameValue {
		&self.value
	}

	/// Whether the frame carries nothing worth writing
	///
	/// Binary frames are never considered empty.
	pub fn is_empty(&self) -> bool {
		match &self.value {
			FrameValue::Text(text) => text.value.is_empty(),
			FrameValue::UserText(text) => text.content.is_empty(),
			FrameValue::Comment(lang) | FrameValue::UnsynchronizedText(lang) => {
				lang.content.is_empty()
			},
			FrameValue::Url(url) => url.url.is_empty(),
			FrameValue::Picture(picture) => picture.data.is_empty(),
			FrameValue::Binary(_) => false,
		}
	}

	// Frames that share an id but are distinguished by their description, language or picture type
	// can coexist in a tag
	pub(crate) fn same_slot(&self, other: &Frame) -> bool {
		if self.id != other.id {
			return false;
		}

		match (&self.value, &other.value) {
			(FrameValue::UserText(a), FrameValue::UserText(b)) => a.description == b.description,
			(FrameValue::Comment(a), FrameValue::Comment(b))
			| (FrameValue::UnsynchronizedText(a), FrameValue::UnsynchronizedText(b)) => {
				a.language == b.language && a.description == b.description
			},
			(FrameValue::Picture(a), FrameValue::Picture(b)) => a.picture_type == b.picture_type,
			(FrameValue::Binary(_), _) | (_, FrameValue::Binary(_)) => false,
			_ => true,
		}
	}
}
