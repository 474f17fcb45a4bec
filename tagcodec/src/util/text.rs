use crate::error::{ErrorKind, Result, TagCodecError};
use crate::macros::err;

use std::io::Read;

use byteorder::ReadBytesExt;

/// A string could not be represented in the requested [`TextEncoding`]
#[derive(Copy, Clone, Debug)]
pub struct TextEncodingError {
	encoding: TextEncoding,
	valid_up_to: usize,
}

impl TextEncodingError {
	/// The encoding that was requested
	pub fn encoding(&self) -> TextEncoding {
		self.encoding
	}

	/// Number of characters that encoded cleanly before the failure
	pub fn valid_up_to(&self) -> usize {
		self.valid_up_to
	}
}

impl core::fmt::Display for TextEncodingError {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(
			f,
			"character {} cannot be encoded as {:?}",
			self.valid_up_to, self.encoding
		)
	}
}

impl core::error::Error for TextEncodingError {}

/// The encoding byte that leads an ID3v2 text frame
///
/// ASF strings are always UTF-16 LE, and never use this.
#[derive(Debug, Clone, Eq, PartialEq, Copy, Hash)]
#[repr(u8)]
pub enum TextEncoding {
	/// ISO-8859-1
	Latin1 = 0,
	/// UTF-16 with a byte order mark
	UTF16 = 1,
	/// UTF-16 big endian, ID3v2.4 only
	UTF16BE = 2,
	/// UTF-8, ID3v2.4 only
	UTF8 = 3,
}

impl TextEncoding {
	/// Map an encoding byte, `None` for anything above 3
	pub fn from_u8(byte: u8) -> Option<Self> {
		Some(match byte {
			0 => Self::Latin1,
			1 => Self::UTF16,
			2 => Self::UTF16BE,
			3 => Self::UTF8,
			_ => return None,
		})
	}

	pub(crate) fn verify_latin1(text: &str) -> bool {
		text.chars().all(|c| u32::from(c) <= 0xFF)
	}

	/// ID3v2.3 only knows Latin-1 and BOM'd UTF-16
	pub(crate) fn to_id3v23(self) -> Self {
		if matches!(self, Self::UTF8 | Self::UTF16BE) {
			log::warn!("{self:?} is unavailable in ID3v2.3, using UTF-16");
			return Self::UTF16;
		}

		self
	}

	/// Encode `text`, appending a null of the right width when `terminated`
	///
	/// With `lossy`, characters outside Latin-1 become `?` instead of failing.
	pub(crate) fn encode(
		self,
		text: &str,
		terminated: bool,
		lossy: bool,
	) -> std::result::Result<Vec<u8>, TextEncodingError> {
		let mut out = match self {
			Self::Latin1 => {
				let mut out = Vec::with_capacity(text.len());
				for (index, c) in text.chars().enumerate() {
					match u8::try_from(u32::from(c)) {
						Ok(byte) => out.push(byte),
						Err(_) if lossy => out.push(b'?'),
						Err(_) => {
							return Err(TextEncodingError {
								encoding: self,
								valid_up_to: index,
							});
						},
					}
				}
				out
			},
			Self::UTF8 => text.as_bytes().to_vec(),
			Self::UTF16 => utf16_encode(text, u16::to_ne_bytes, true),
			Self::UTF16BE => utf16_encode(text, u16::to_be_bytes, false),
		};

		if terminated {
			let width = if matches!(self, Self::UTF16 | Self::UTF16BE) { 2 } else { 1 };
			out.resize(out.len() + width, 0);
		}

		Ok(out)
	}
}

/// Read up to (and consuming) a null terminator of the encoding's width
///
/// Returns the text bytes and the terminator length, which is 0 when the
/// reader ran dry first.
pub(crate) fn read_to_terminator<R>(reader: &mut R, encoding: TextEncoding) -> (Vec<u8>, usize)
where
	R: Read,
{
	let mut text = Vec::new();

	if matches!(encoding, TextEncoding::UTF16 | TextEncoding::UTF16BE) {
		while let (Ok(hi), Ok(lo)) = (reader.read_u8(), reader.read_u8()) {
			if hi == 0 && lo == 0 {
				return (text, 2);
			}
			text.extend([hi, lo]);
		}
	} else {
		while let Ok(byte) = reader.read_u8() {
			if byte == 0 {
				return (text, 1);
			}
			text.push(byte);
		}
	}

	(text, 0)
}

pub(crate) fn latin1_decode(bytes: &[u8]) -> String {
	let text: String = bytes.iter().copied().map(char::from).collect();
	strip_nulls(text)
}

pub(crate) fn utf8_decode(bytes: Vec<u8>) -> Result<String> {
	Ok(strip_nulls(String::from_utf8(bytes)?))
}

/// Decode UTF-16 with a fixed byte order
///
/// Any BOMs in the data are dropped, a single ID3v2 frame may hold several
/// null separated strings that each carry one.
pub(crate) fn utf16_decode_bytes(bytes: &[u8], endianness: fn([u8; 2]) -> u16) -> Result<String> {
	let units: Vec<u16> = bytes
		.chunks_exact(2)
		.filter(|pair| !matches!(pair, [0xFF, 0xFE] | [0xFE, 0xFF]))
		.map(|pair| endianness([pair[0], pair[1]]))
		.collect();

	match String::from_utf16(&units) {
		Ok(text) => Ok(strip_nulls(text)),
		Err(_) => Err(TagCodecError::new(ErrorKind::TextDecode(
			"Given an invalid UTF-16 string",
		))),
	}
}

fn strip_nulls(mut text: String) -> String {
	let len = text.trim_end_matches('\0').len();
	text.truncate(len);
	text
}

fn utf16_encode(text: &str, endianness: fn(u16) -> [u8; 2], bom: bool) -> Vec<u8> {
	let bom = bom.then_some(0xFEFF_u16);
	bom.into_iter()
		.chain(text.encode_utf16())
		.flat_map(endianness)
		.collect()
}

/// Encode a string as UTF-16 LE without a BOM, as used by ASF
pub(crate) fn utf16le_encode(text: &str, terminated: bool) -> Vec<u8> {
	let mut out = utf16_encode(text, u16::to_le_bytes, false);
	if terminated {
		out.extend([0, 0]);
	}
	out
}

/// Decode a UTF-16 LE string without a BOM, stripping any trailing terminators
pub(crate) fn utf16le_decode(bytes: &[u8]) -> Result<String> {
	if bytes.len() % 2 != 0 {
		err!(TextDecode("UTF-16 string has an odd length"));
	}

	utf16_decode_bytes(bytes, u16::from_le_bytes)
}
