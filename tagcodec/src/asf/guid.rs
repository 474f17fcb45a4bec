//! GUIDs identifying ASF objects
//!
//! GUIDs are written in their textual form, as `{d1}-{d2}-{d3}-{d4[..2]}-{d4[2..]}`. On disk the
//! first three groups are little-endian and the last eight bytes are stored as-is.

use std::fmt::{Display, Formatter};

/// A 128-bit ASF object identifier
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Guid([u8; 16]);

impl Guid {
	/// Create a `Guid` from its textual groups
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::asf::guid::{Guid, HEADER_OBJECT};
	///
	/// let guid = Guid::new(
	/// 	0x75B2_2630,
	/// 	0x668E,
	/// 	0x11CF,
	/// 	[0xA6, 0xD9, 0x00, 0xAA, 0x00, 0x62, 0xCE, 0x6C],
	/// );
	/// assert_eq!(guid, HEADER_OBJECT);
	/// ```
	pub const fn new(d1: u32, d2: u16, d3: u16, d4: [u8; 8]) -> Self {
		let d1 = d1.to_le_bytes();
		let d2 = d2.to_le_bytes();
		let d3 = d3.to_le_bytes();

		Self([
			d1[0], d1[1], d1[2], d1[3], d2[0], d2[1], d3[0], d3[1], d4[0], d4[1], d4[2], d4[3], d4[4],
			d4[5], d4[6], d4[7],
		])
	}

	/// Create a `Guid` from its on-disk representation
	pub const fn from_bytes(bytes: [u8; 16]) -> Self {
		Self(bytes)
	}

	/// The on-disk representation
	pub const fn as_bytes(&self) -> [u8; 16] {
		self.0
	}
}

impl Display for Guid {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let b = &self.0;
		write!(
			f,
			"{:08X}-{:04X}-{:04X}-{:02X}{:02X}-",
			u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
			u16::from_le_bytes([b[4], b[5]]),
			u16::from_le_bytes([b[6], b[7]]),
			b[8],
			b[9]
		)?;

		for byte in &b[10..] {
			write!(f, "{byte:02X}")?;
		}

		Ok(())
	}
}

macro_rules! guids {
	($($(#[$meta:meta])* $name:ident = $d1:literal, $d2:literal, $d3:literal, [$($d4:literal),+]);+ $(;)?) => {
		$(
			$(#[$meta])*
			pub const $name: Guid = Guid::new($d1, $d2, $d3, [$($d4),+]);
		)+
	};
}

guids! {
	/// The top-level header object
	HEADER_OBJECT = 0x75B2_2630, 0x668E, 0x11CF, [0xA6, 0xD9, 0x00, 0xAA, 0x00, 0x62, 0xCE, 0x6C];
	/// The data object, following the header
	DATA_OBJECT = 0x75B2_2636, 0x668E, 0x11CF, [0xA6, 0xD9, 0x00, 0xAA, 0x00, 0x62, 0xCE, 0x6C];
	/// Global file attributes
	FILE_PROPERTIES_OBJECT = 0x8CAB_DCA1, 0xA947, 0x11CF, [0x8E, 0xE4, 0x00, 0xC0, 0x0C, 0x20, 0x53, 0x65];
	/// Describes a single media stream
	STREAM_PROPERTIES_OBJECT = 0xB7DC_0791, 0xA9B7, 0x11CF, [0x8E, 0xE6, 0x00, 0xC0, 0x0C, 0x20, 0x53, 0x65];
	/// Holds the objects added by later revisions of the format
	HEADER_EXTENSION_OBJECT = 0x5FBF_03B5, 0xA92E, 0x11CF, [0x8E, 0xE3, 0x00, 0xC0, 0x0C, 0x20, 0x53, 0x65];
	/// Title, author, copyright, description and rating
	CONTENT_DESCRIPTION_OBJECT = 0x75B2_2633, 0x668E, 0x11CF, [0xA6, 0xD9, 0x00, 0xAA, 0x00, 0x62, 0xCE, 0x6C];
	/// Named attributes bound to the whole file
	EXTENDED_CONTENT_DESCRIPTION_OBJECT = 0xD2D0_A440, 0xE307, 0x11D2, [0x97, 0xF0, 0x00, 0xA0, 0xC9, 0x5E, 0xA8, 0x50];
	/// Banner image and URLs
	CONTENT_BRANDING_OBJECT = 0x2211_B3FA, 0xBD23, 0x11D2, [0xB4, 0xB7, 0x00, 0xA0, 0xC9, 0x55, 0xFC, 0x6E];
	/// Named attributes that may be bound to a stream, lives in the header extension
	METADATA_OBJECT = 0xC5F8_CBEA, 0x5BAF, 0x4877, [0x84, 0x67, 0xAA, 0x8C, 0x44, 0xFA, 0x4C, 0xCA];
	/// Named attributes with a stream, a language and no size limit, lives in the header extension
	METADATA_LIBRARY_OBJECT = 0x4423_1C94, 0x9498, 0x49D1, [0xA1, 0x41, 0x1D, 0x13, 0x4E, 0x45, 0x70, 0x54];
	/// The fixed value of the header extension's first reserved field
	HEADER_EXTENSION_RESERVED = 0xABD3_D211, 0xA9BA, 0x11CF, [0x8E, 0xE6, 0x00, 0xC0, 0x0C, 0x20, 0x53, 0x65];
	/// Stream type of an audio stream
	AUDIO_MEDIA = 0xF869_9E40, 0x5B4D, 0x11CF, [0xA8, 0xFD, 0x00, 0x80, 0x5F, 0x5C, 0x44, 0x2B];
}
