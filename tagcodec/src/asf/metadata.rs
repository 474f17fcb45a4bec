//! The metadata carrying objects and their codecs
//!
//! Each object computes its size from the values it holds at the moment it is asked, the size
//! is never cached.

use super::guid::{
	CONTENT_BRANDING_OBJECT, CONTENT_DESCRIPTION_OBJECT, EXTENDED_CONTENT_DESCRIPTION_OBJECT, Guid,
	METADATA_LIBRARY_OBJECT, METADATA_OBJECT,
};
use super::object::{Location, OBJECT_HEADER_SIZE};
use super::tag::{AsfField, AsfTag, AsfValue, ContentBranding};
use crate::config::{ParseOptions, ParsingMode};
use crate::error::Result;
use crate::macros::{decode_err, encode_err, err};
use crate::util::text::{utf16le_decode, utf16le_encode};

use std::io::Write;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

fn take<'a>(reader: &mut &'a [u8], len: usize) -> Result<&'a [u8]> {
	if len > reader.len() {
		err!(SizeMismatch);
	}

	let (taken, rest) = reader.split_at(len);
	*reader = rest;
	Ok(taken)
}

fn decode_string(bytes: &[u8], parse_options: ParseOptions) -> Result<String> {
	match utf16le_decode(bytes) {
		Ok(text) => Ok(text),
		Err(e) if parse_options.parsing_mode == ParsingMode::Strict => Err(e),
		Err(_) => {
			log::warn!("Discarding an invalid UTF-16 string");
			Ok(String::new())
		},
	}
}

pub(super) fn read_content_description(
	mut content: &[u8],
	tag: &mut AsfTag,
	parse_options: ParseOptions,
) -> Result<()> {
	let mut lengths = [0_u16; 5];
	for len in &mut lengths {
		*len = content.read_u16::<LittleEndian>()?;
	}

	let mut values = Vec::with_capacity(5);
	for len in lengths {
		let bytes = take(&mut content, usize::from(len))?;
		values.push(decode_string(bytes, parse_options)?);
	}

	let mut values = values.into_iter();
	for target in [
		&mut tag.title,
		&mut tag.author,
		&mut tag.copyright,
		&mut tag.description,
		&mut tag.rating,
	] {
		*target = values.next().unwrap_or_default();
	}

	Ok(())
}

pub(super) fn read_content_branding(mut content: &[u8], tag: &mut AsfTag) -> Result<()> {
	let banner_image_type = content.read_u32::<LittleEndian>()?;
	let image_len = content.read_u32::<LittleEndian>()?;
	let banner_image_data = take(&mut content, image_len as usize)?.to_vec();

	let url_len = content.read_u32::<LittleEndian>()?;
	let banner_image_url = String::from_utf8_lossy(take(&mut content, url_len as usize)?)
		.trim_end_matches('\0')
		.to_owned();

	let url_len = content.read_u32::<LittleEndian>()?;
	let copyright_url = String::from_utf8_lossy(take(&mut content, url_len as usize)?)
		.trim_end_matches('\0')
		.to_owned();

	tag.branding = Some(ContentBranding {
		banner_image_type,
		banner_image_data,
		banner_image_url,
		copyright_url,
	});

	Ok(())
}

fn read_value(
	value_type: u16,
	bytes: &[u8],
	parse_options: ParseOptions,
) -> Result<Option<AsfValue>> {
	let value = match (value_type, bytes.len()) {
		(0, _) => AsfValue::Unicode(decode_string(bytes, parse_options)?),
		(1, _) => AsfValue::Binary(bytes.to_vec()),
		(2, 4) => AsfValue::Bool(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) != 0),
		(2, 2) => AsfValue::Bool(u16::from_le_bytes([bytes[0], bytes[1]]) != 0),
		(3, 4) => AsfValue::Dword(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])),
		(4, 8) => {
			let mut qword = [0; 8];
			qword.copy_from_slice(bytes);
			AsfValue::Qword(u64::from_le_bytes(qword))
		},
		(5, 2) => AsfValue::Word(u16::from_le_bytes([bytes[0], bytes[1]])),
		(6, 16) => {
			let mut guid = [0; 16];
			guid.copy_from_slice(bytes);
			AsfValue::Guid(Guid::from_bytes(guid))
		},
		_ => {
			if parse_options.parsing_mode == ParsingMode::Strict {
				decode_err!(@BAIL Asf, "Attribute has an invalid type or length");
			}

			log::warn!(
				"Discarding attribute of type {} with length {}",
				value_type,
				bytes.len()
			);
			return Ok(None);
		},
	};

	Ok(Some(value))
}

pub(super) fn read_extended_content_description(
	mut content: &[u8],
	tag: &mut AsfTag,
	parse_options: ParseOptions,
) -> Result<()> {
	let count = content.read_u16::<LittleEndian>()?;
	for _ in 0..count {
		let name_len = content.read_u16::<LittleEndian>()?;
		let name = decode_string(take(&mut content, usize::from(name_len))?, parse_options)?;

		let value_type = content.read_u16::<LittleEndian>()?;
		let value_len = content.read_u16::<LittleEndian>()?;
		let value = take(&mut content, usize::from(value_len))?;

		if let Some(value) = read_value(value_type, value, parse_options)? {
			tag.fields.push(AsfField::new(name, value));
		}
	}

	Ok(())
}

/// Read a Metadata (`library == false`) or Metadata Library object
pub(super) fn read_metadata(
	mut content: &[u8],
	tag: &mut AsfTag,
	library: bool,
	parse_options: ParseOptions,
) -> Result<()> {
	let count = content.read_u16::<LittleEndian>()?;
	for _ in 0..count {
		// Reserved (always 0) in the Metadata object
		let language = content.read_u16::<LittleEndian>()?;
		let stream = content.read_u16::<LittleEndian>()?;
		let name_len = content.read_u16::<LittleEndian>()?;
		let value_type = content.read_u16::<LittleEndian>()?;
		let value_len = content.read_u32::<LittleEndian>()?;

		let name = decode_string(take(&mut content, usize::from(name_len))?, parse_options)?;
		let value = take(&mut content, value_len as usize)?;

		if !library && value_type == 6 && parse_options.parsing_mode == ParsingMode::Strict {
			decode_err!(@BAIL Asf, "Metadata object holds a GUID attribute");
		}

		if let Some(value) = read_value(value_type, value, parse_options)? {
			tag.fields.push(AsfField {
				name,
				value,
				stream,
				language: if library { language } else { 0 },
			});
		}
	}

	Ok(())
}

/// An object that can be regenerated from an [`AsfTag`]
pub(super) trait MetadataObject {
	fn guid(&self) -> Guid;

	/// Where the object is created when the file doesn't have one
	fn default_location(&self) -> Location;

	/// An empty object is removed from the file
	fn is_empty(&self) -> bool;

	/// The size of the object, including its header
	fn current_size(&self) -> Result<u64>;

	fn write_content(&self, writer: &mut Vec<u8>) -> Result<()>;
}

/// Encode an object, `None` when it should be removed
pub(super) fn encode(object: &dyn MetadataObject) -> Result<Option<Vec<u8>>> {
	if object.is_empty() {
		return Ok(None);
	}

	let size = object.current_size()?;

	let mut encoded = Vec::with_capacity(size as usize);
	encoded.extend_from_slice(&object.guid().as_bytes());
	encoded.write_u64::<LittleEndian>(size)?;
	object.write_content(&mut encoded)?;

	if encoded.len() as u64 != size {
		log::error!(
			"Object {} encoded to {} bytes, expected {}",
			object.guid(),
			encoded.len(),
			size
		);
		encode_err!(@BAIL Asf, "Encoded object size does not match the computed size");
	}

	Ok(Some(encoded))
}

fn u16_len(len: usize) -> Result<u16> {
	let Ok(len) = u16::try_from(len) else {
		err!(TooMuchData);
	};

	Ok(len)
}

fn u32_len(len: usize) -> Result<u32> {
	let Ok(len) = u32::try_from(len) else {
		err!(TooMuchData);
	};

	Ok(len)
}

pub(super) struct ContentDescription<'a> {
	pub(super) tag: &'a AsfTag,
}

impl ContentDescription<'_> {
	fn strings(&self) -> [&str; 5] {
		[
			&self.tag.title,
			&self.tag.author,
			&self.tag.copyright,
			&self.tag.description,
			&self.tag.rating,
		]
	}
}

fn string_len(text: &str) -> usize {
	if text.is_empty() {
		return 0;
	}

	(text.encode_utf16().count() + 1) * 2
}

impl MetadataObject for ContentDescription<'_> {
	fn guid(&self) -> Guid {
		CONTENT_DESCRIPTION_OBJECT
	}

	fn default_location(&self) -> Location {
		Location::Header
	}

	fn is_empty(&self) -> bool {
		!self.tag.has_content_description()
	}

	fn current_size(&self) -> Result<u64> {
		let strings = self.strings().iter().map(|s| string_len(s)).sum::<usize>();
		Ok((OBJECT_HEADER_SIZE + 10 + strings) as u64)
	}

	fn write_content(&self, writer: &mut Vec<u8>) -> Result<()> {
		for text in self.strings() {
			writer.write_u16::<LittleEndian>(u16_len(string_len(text))?)?;
		}

		for text in self.strings() {
			if !text.is_empty() {
				writer.write_all(&utf16le_encode(text, true))?;
			}
		}

		Ok(())
	}
}

pub(super) struct ContentBrandingObject<'a> {
	pub(super) branding: Option<&'a ContentBranding>,
}

impl MetadataObject for ContentBrandingObject<'_> {
	fn guid(&self) -> Guid {
		CONTENT_BRANDING_OBJECT
	}

	fn default_location(&self) -> Location {
		Location::Header
	}

	fn is_empty(&self) -> bool {
		self.branding.is_none()
	}

	fn current_size(&self) -> Result<u64> {
		let Some(branding) = self.branding else {
			return Ok(0);
		};

		Ok((OBJECT_HEADER_SIZE
			+ 16 + branding.banner_image_data.len()
			+ branding.banner_image_url.len()
			+ branding.copyright_url.len()) as u64)
	}

	fn write_content(&self, writer: &mut Vec<u8>) -> Result<()> {
		let Some(branding) = self.branding else {
			return Ok(());
		};

		writer.write_u32::<LittleEndian>(branding.banner_image_type)?;
		for bytes in [
			branding.banner_image_data.as_slice(),
			branding.banner_image_url.as_bytes(),
			branding.copyright_url.as_bytes(),
		] {
			writer.write_u32::<LittleEndian>(u32_len(bytes.len())?)?;
			writer.write_all(bytes)?;
		}

		Ok(())
	}
}

fn write_value(writer: &mut Vec<u8>, value: &AsfValue, short_bool: bool) -> Result<()> {
	match value {
		AsfValue::Unicode(text) => writer.write_all(&utf16le_encode(text, true))?,
		AsfValue::Binary(data) => writer.write_all(data)?,
		AsfValue::Bool(value) if short_bool => writer.write_u16::<LittleEndian>(u16::from(*value))?,
		AsfValue::Bool(value) => writer.write_u32::<LittleEndian>(u32::from(*value))?,
		AsfValue::Dword(value) => writer.write_u32::<LittleEndian>(*value)?,
		AsfValue::Qword(value) => writer.write_u64::<LittleEndian>(*value)?,
		AsfValue::Word(value) => writer.write_u16::<LittleEndian>(*value)?,
		AsfValue::Guid(guid) => writer.write_all(&guid.as_bytes())?,
	}

	Ok(())
}

pub(super) struct ExtendedContentDescription<'a> {
	pub(super) fields: Vec<&'a AsfField>,
}

impl MetadataObject for ExtendedContentDescription<'_> {
	fn guid(&self) -> Guid {
		EXTENDED_CONTENT_DESCRIPTION_OBJECT
	}

	fn default_location(&self) -> Location {
		Location::Header
	}

	fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	fn current_size(&self) -> Result<u64> {
		// Name length + name + type + value length + value
		let descriptors = self
			.fields
			.iter()
			.map(|field| 6 + field.name_len() + field.value.encoded_len(false))
			.sum::<usize>();

		Ok((OBJECT_HEADER_SIZE + 2 + descriptors) as u64)
	}

	fn write_content(&self, writer: &mut Vec<u8>) -> Result<()> {
		writer.write_u16::<LittleEndian>(u16_len(self.fields.len())?)?;

		for field in &self.fields {
			writer.write_u16::<LittleEndian>(u16_len(field.name_len())?)?;
			writer.write_all(&utf16le_encode(&field.name, true))?;
			writer.write_u16::<LittleEndian>(field.value.type_id())?;
			writer.write_u16::<LittleEndian>(u16_len(field.value.encoded_len(false))?)?;
			write_value(writer, &field.value, false)?;
		}

		Ok(())
	}
}

/// A Metadata object, or a Metadata Library object when `library` is set
pub(super) struct Metadata<'a> {
	pub(super) fields: Vec<&'a AsfField>,
	pub(super) library: bool,
}

impl MetadataObject for Metadata<'_> {
	fn guid(&self) -> Guid {
		if self.library {
			METADATA_LIBRARY_OBJECT
		} else {
			METADATA_OBJECT
		}
	}

	fn default_location(&self) -> Location {
		Location::Extension
	}

	fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	fn current_size(&self) -> Result<u64> {
		// Language/reserved + stream + name length + type + value length + name + value
		let records = self
			.fields
			.iter()
			.map(|field| 12 + field.name_len() + field.value.encoded_len(true))
			.sum::<usize>();

		Ok((OBJECT_HEADER_SIZE + 2 + records) as u64)
	}

	fn write_content(&self, writer: &mut Vec<u8>) -> Result<()> {
		writer.write_u16::<LittleEndian>(u16_len(self.fields.len())?)?;

		for field in &self.fields {
			let language = if self.library { field.language } else { 0 };

			writer.write_u16::<LittleEndian>(language)?;
			writer.write_u16::<LittleEndian>(field.stream)?;
			writer.write_u16::<LittleEndian>(u16_len(field.name_len())?)?;
			writer.write_u16::<LittleEndian>(field.value.type_id())?;
			writer.write_u32::<LittleEndian>(u32_len(field.value.encoded_len(true))?)?;
			writer.write_all(&utf16le_encode(&field.name, true))?;
			write_value(writer, &field.value, true)?;
		}

		Ok(())
	}
}

/// Which object a field is written to
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum Placement {
	ExtendedContentDescription,
	Metadata,
	MetadataLibrary,
}

/// Pick the most compatible object that can hold `field`
pub(super) fn placement(field: &AsfField) -> Placement {
	let is_guid = matches!(field.value, AsfValue::Guid(_));
	let fits = |short_bool| field.value.encoded_len(short_bool) <= usize::from(u16::MAX);

	if field.stream == 0 && field.language == 0 && !is_guid && fits(false) {
		return Placement::ExtendedContentDescription;
	}

	if field.language == 0 && !is_guid && fits(true) {
		return Placement::Metadata;
	}

	Placement::MetadataLibrary
}
