//! Frame body decoding and encoding, shared by every ID3v2 revision

use super::{FrameId, FrameValue};
use crate::error::{ErrorKind, Id3v2Error, Id3v2ErrorKind, Result, TagCodecError};
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::items::{
	AttachedPictureFrame, ExtendedTextFrame, LanguageFrame, TextFrame, UrlFrame,
};
use crate::id3::v2::util::frame_ids;
use crate::macros::err;
use crate::util::text::{
	TextEncoding, latin1_decode, read_to_terminator, utf8_decode, utf16_decode_bytes,
};

use byteorder::ReadBytesExt;

/// Decode the body of a frame
///
/// Frames without a decoder of their own are returned as [`FrameValue::Binary`].
pub(super) fn parse_content(
	mut content: &[u8],
	id: &FrameId,
	version: Id3v2Version,
) -> Result<FrameValue> {
	let Some(canonical) = frame_ids::translate(id.as_str(), version, Id3v2Version::V4) else {
		return Ok(FrameValue::Binary(content.to_vec()));
	};

	let content = &mut content;
	let value = match canonical.as_str() {
		"TXXX" => {
			let mut text = TextReader::new(read_encoding(content, version)?);
			let description = text.terminated(content)?;
			let value = text.rest(content)?;
			FrameValue::UserText(ExtendedTextFrame::new(text.encoding, description, value))
		},
		"WXXX" => FrameValue::Binary(content.to_vec()),
		"COMM" | "USLT" => {
			let mut text = TextReader::new(read_encoding(content, version)?);

			let mut language = [0; 3];
			std::io::Read::read_exact(content, &mut language)?;

			let description = text.terminated(content)?;
			let value = text.rest(content)?;
			let frame = LanguageFrame::new(text.encoding, language, description, value);

			if canonical == "COMM" {
				FrameValue::Comment(frame)
			} else {
				FrameValue::UnsynchronizedText(frame)
			}
		},
		"APIC" => FrameValue::Picture(parse_picture(content, version)?),
		text_id if text_id.starts_with('T') => {
			let mut text = TextReader::new(read_encoding(content, version)?);
			let value = text.rest(content)?;
			FrameValue::Text(TextFrame::new(text.encoding, value))
		},
		url_id if url_id.starts_with('W') => {
			FrameValue::Url(UrlFrame::new(latin1_decode(&content[..])))
		},
		_ => FrameValue::Binary(content.to_vec()),
	};

	Ok(value)
}

fn read_encoding(content: &mut &[u8], version: Id3v2Version) -> Result<TextEncoding> {
	let Some(encoding) = TextEncoding::from_u8(content.read_u8()?) else {
		err!(TextDecode("Found invalid text encoding"));
	};

	if version == Id3v2Version::V2
		&& !matches!(encoding, TextEncoding::Latin1 | TextEncoding::UTF16)
	{
		return Err(Id3v2Error::new(Id3v2ErrorKind::V2InvalidTextEncoding).into());
	}

	Ok(encoding)
}

fn parse_picture(content: &mut &[u8], version: Id3v2Version) -> Result<AttachedPictureFrame> {
	let mut text = TextReader::new(read_encoding(content, version)?);

	let mime_type = if version == Id3v2Version::V2 {
		let mut format = [0; 3];
		std::io::Read::read_exact(content, &mut format)?;
		mime_from_v2_format(format)
	} else {
		let (mime, _) = read_to_terminator(content, TextEncoding::Latin1);
		latin1_decode(&mime)
	};

	let picture_type = content.read_u8()?;
	let description = text.terminated(content)?;

	Ok(AttachedPictureFrame {
		encoding: text.encoding,
		mime_type,
		picture_type,
		description,
		data: content.to_vec(),
	})
}

fn mime_from_v2_format(format: [u8; 3]) -> String {
	match &format {
		b"JPG" => String::from("image/jpeg"),
		b"PNG" => String::from("image/png"),
		other => format!("image/{}", latin1_decode(other).to_ascii_lowercase()),
	}
}

fn v2_format_from_mime(mime: &str) -> Result<[u8; 3]> {
	match mime {
		"image/jpeg" | "image/jpg" => Ok(*b"JPG"),
		"image/png" => Ok(*b"PNG"),
		_ => {
			let format = mime.strip_prefix("image/").unwrap_or(mime);
			match format.as_bytes() {
				[a, b, c] if format.is_ascii() => Ok([
					a.to_ascii_uppercase(),
					b.to_ascii_uppercase(),
					c.to_ascii_uppercase(),
				]),
				_ => Err(Id3v2Error::new(Id3v2ErrorKind::BadPictureFormat(mime.to_owned())).into()),
			}
		},
	}
}

// Tracks the byte order of UTF-16 strings within a single frame
//
// Some encoders only write a BOM for the first string in a frame, later strings are expected to
// share its byte order.
struct TextReader {
	encoding: TextEncoding,
	endianness: fn([u8; 2]) -> u16,
}

impl TextReader {
	fn new(encoding: TextEncoding) -> Self {
		Self {
			encoding,
			endianness: u16::from_le_bytes,
		}
	}

	fn terminated(&mut self, content: &mut &[u8]) -> Result<String> {
		let (raw, _) = read_to_terminator(content, self.encoding);
		self.decode(&raw)
	}

	fn rest(&mut self, content: &mut &[u8]) -> Result<String> {
		let raw = std::mem::take(content);
		self.decode(raw)
	}

	fn decode(&mut self, raw: &[u8]) -> Result<String> {
		match self.encoding {
			TextEncoding::Latin1 => Ok(latin1_decode(raw)),
			TextEncoding::UTF8 => utf8_decode(raw.to_vec()).map_err(|_| {
				TagCodecError::new(ErrorKind::TextDecode("Expected a UTF-8 string"))
			}),
			TextEncoding::UTF16BE => utf16_decode_bytes(raw, u16::from_be_bytes),
			TextEncoding::UTF16 => {
				if raw.len() % 2 != 0 {
					err!(TextDecode("UTF-16 string has an odd length"));
				}

				match raw {
					[0xFE, 0xFF, ..] => self.endianness = u16::from_be_bytes,
					[0xFF, 0xFE, ..] => self.endianness = u16::from_le_bytes,
					_ => {},
				}

				utf16_decode_bytes(raw, self.endianness)
			},
		}
	}
}

/// Encode the body of a frame for `version`
pub(crate) fn encode_content(
	value: &FrameValue,
	id: &FrameId,
	version: Id3v2Version,
) -> Result<Vec<u8>> {
	let mut content = Vec::new();

	match value {
		FrameValue::Text(TextFrame { encoding, value }) => {
			let encoding = encoding_for(*encoding, version, &[value]);
			content.push(encoding as u8);
			content.extend(encoding.encode(value, false, false)?);
		},
		FrameValue::UserText(ExtendedTextFrame {
			encoding,
			description,
			content: value,
		}) => {
			let encoding = encoding_for(*encoding, version, &[description, value]);
			content.push(encoding as u8);
			content.extend(encoding.encode(description, true, false)?);
			content.extend(encoding.encode(value, false, false)?);
		},
		FrameValue::Comment(frame) | FrameValue::UnsynchronizedText(frame) => {
			if !frame.language.is_ascii() {
				return Err(
					Id3v2Error::new(Id3v2ErrorKind::InvalidLanguage(frame.language)).into(),
				);
			}

			let encoding = encoding_for(
				frame.encoding,
				version,
				&[&frame.description, &frame.content],
			);
			content.push(encoding as u8);
			content.extend_from_slice(&frame.language);
			content.extend(encoding.encode(&frame.description, true, false)?);
			content.extend(encoding.encode(&frame.content, false, false)?);
		},
		FrameValue::Url(UrlFrame { url }) => {
			content.extend(TextEncoding::Latin1.encode(url, false, false)?);
		},
		FrameValue::Picture(picture) => {
			let encoding = encoding_for(picture.encoding, version, &[&picture.description]);
			content.push(encoding as u8);

			if version == Id3v2Version::V2 {
				content.extend_from_slice(&v2_format_from_mime(&picture.mime_type)?);
			} else {
				content.extend(TextEncoding::Latin1.encode(&picture.mime_type, true, false)?);
			}

			content.push(picture.picture_type);
			content.extend(encoding.encode(&picture.description, true, false)?);
			content.extend_from_slice(&picture.data);
		},
		FrameValue::Binary(data) => content.extend_from_slice(data),
	}

	log::trace!("Encoded frame {} ({} bytes)", id, content.len());
	Ok(content)
}

// Pick an encoding that the target version supports and that can represent every string
fn encoding_for(encoding: TextEncoding, version: Id3v2Version, texts: &[&String]) -> TextEncoding {
	let encoding = match version {
		Id3v2Version::V4 => encoding,
		_ => encoding.to_id3v23(),
	};

	if encoding == TextEncoding::Latin1 && !texts.iter().all(|t| TextEncoding::verify_latin1(t)) {
		log::debug!("Text can't be represented in Latin-1, switching encodings");
		return match version {
			Id3v2Version::V4 => TextEncoding::UTF8,
			_ => TextEncoding::UTF16,
		};
	}

	encoding
}
