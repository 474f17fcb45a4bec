use super::{
	DATA_MAGIC, DSF_MAGIC, DsfFile, DsfHeader, DsfProperties, FMT_CHUNK_SIZE, FMT_MAGIC,
	HEADER_SIZE,
};
use crate::config::ParseOptions;
use crate::error::{ErrorKind, Result};
use crate::id3::v2::header::Id3v2Header;
use crate::id3::v2::read::parse_id3v2;
use crate::macros::decode_err;
use crate::util::io::{ReadExt, StreamLen};

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

impl DsfHeader {
	pub(crate) fn read<R>(reader: &mut R) -> Result<Self>
	where
		R: Read,
	{
		let mut header = [0; HEADER_SIZE as usize];
		reader.read_exact(&mut header)?;

		let mut reader = &header[..];
		if &reader.read_fourcc()? != DSF_MAGIC {
			decode_err!(@BAIL Dsf, "File doesn't start with a \"DSD \" chunk");
		}

		let chunk_size = reader.read_u64::<LittleEndian>()?;
		if chunk_size != HEADER_SIZE {
			decode_err!(@BAIL Dsf, "Invalid \"DSD \" chunk size");
		}

		let file_length = reader.read_u64::<LittleEndian>()?;
		let metadata_offset = reader.read_u64::<LittleEndian>()?;

		log::debug!(
			"DSF header: file length {}, metadata offset {}",
			file_length,
			metadata_offset
		);

		Ok(Self {
			chunk_size,
			file_length,
			metadata_offset,
		})
	}
}

pub(super) fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<DsfFile>
where
	R: Read + Seek,
{
	let header = DsfHeader::read(reader)?;
	let mut properties = read_format_chunk(reader)?;
	properties.audio_size = read_data_size(reader)?;

	let mut id3v2_tag = None;
	if header.metadata_offset != 0 && parse_options.read_tags {
		id3v2_tag = Some(read_tag(reader, header.metadata_offset, parse_options)?);
	}

	Ok(DsfFile {
		header,
		id3v2_tag,
		properties: if parse_options.read_properties {
			properties
		} else {
			DsfProperties::default()
		},
	})
}

fn read_format_chunk<R>(reader: &mut R) -> Result<DsfProperties>
where
	R: Read,
{
	if &reader.read_fourcc()? != FMT_MAGIC {
		decode_err!(@BAIL Dsf, "Expected a \"fmt \" chunk");
	}

	if reader.read_u64::<LittleEndian>()? != FMT_CHUNK_SIZE {
		decode_err!(@BAIL Dsf, "Invalid \"fmt \" chunk size");
	}

	let format_version = reader.read_u32::<LittleEndian>()?;
	if format_version != 1 {
		decode_err!(@BAIL Dsf, "Unsupported format version");
	}

	// 0 = DSD raw, the only defined format
	if reader.read_u32::<LittleEndian>()? != 0 {
		decode_err!(@BAIL Dsf, "Unsupported format ID");
	}

	let channel_type = reader.read_u32::<LittleEndian>()?;

	let channel_count = reader.read_u32::<LittleEndian>()?;
	if !(1..=6).contains(&channel_count) {
		decode_err!(@BAIL Dsf, "Invalid channel count");
	}

	let sample_rate = reader.read_u32::<LittleEndian>()?;
	if sample_rate == 0 {
		decode_err!(@BAIL Dsf, "Sample rate is 0");
	}

	let bits_per_sample = reader.read_u32::<LittleEndian>()?;
	if bits_per_sample != 1 && bits_per_sample != 8 {
		decode_err!(@BAIL Dsf, "Invalid bits per sample");
	}

	let sample_count = reader.read_u64::<LittleEndian>()?;
	let block_size_per_channel = reader.read_u32::<LittleEndian>()?;

	// Reserved
	let _ = reader.read_u32::<LittleEndian>()?;

	log::trace!(
		"DSF format: {} channels, {} Hz, {} bits per sample, {} samples",
		channel_count,
		sample_rate,
		bits_per_sample,
		sample_count
	);

	Ok(DsfProperties {
		format_version,
		channel_type,
		sample_rate,
		channels: channel_count as u8,
		bits_per_sample: bits_per_sample as u8,
		sample_count,
		block_size_per_channel,
		audio_size: None,
	})
}

// The `data` chunk is optional for our purposes, a file cut short after `fmt ` is still readable
fn read_data_size<R>(reader: &mut R) -> Result<Option<u64>>
where
	R: Read + Seek,
{
	let position = reader.stream_position()?;
	if reader.total_len()? < position + 12 {
		log::warn!("DSF file has no \"data\" chunk");
		return Ok(None);
	}

	if &reader.read_fourcc()? != DATA_MAGIC {
		decode_err!(@BAIL Dsf, "Expected a \"data\" chunk");
	}

	let chunk_size = reader.read_u64::<LittleEndian>()?;
	let Some(audio_size) = chunk_size.checked_sub(12) else {
		decode_err!(@BAIL Dsf, "Invalid \"data\" chunk size");
	};

	Ok(Some(audio_size))
}

fn read_tag<R>(
	reader: &mut R,
	metadata_offset: u64,
	parse_options: ParseOptions,
) -> Result<crate::id3::v2::Id3v2Tag>
where
	R: Read + Seek,
{
	if metadata_offset >= reader.total_len()? {
		decode_err!(@BAIL Dsf, "Metadata offset points past the end of the file");
	}

	reader.seek(SeekFrom::Start(metadata_offset))?;

	let header = match Id3v2Header::parse(reader) {
		Ok(header) => header,
		Err(e) if matches!(e.kind(), ErrorKind::FakeTag) => {
			decode_err!(@BAIL Dsf, "Metadata offset doesn't point to an ID3v2 tag");
		},
		Err(e) => return Err(e),
	};

	parse_id3v2(reader, header, parse_options)
}

#[cfg(test)]
pub(super) mod tests {
	use super::read_from;
	use crate::config::ParseOptions;
	use crate::dsd::dsf::DsfHeader;
	use crate::error::ErrorKind;
	use crate::tag::Accessor;

	use std::io::Cursor;

	pub(crate) fn dsf_file(data_len: usize, metadata_offset: u64, tag: &[u8]) -> Vec<u8> {
		let mut file = Vec::new();
		file.extend_from_slice(b"DSD ");
		file.extend_from_slice(&28u64.to_le_bytes());
		file.extend_from_slice(&0u64.to_le_bytes());
		file.extend_from_slice(&metadata_offset.to_le_bytes());

		file.extend_from_slice(b"fmt ");
		file.extend_from_slice(&52u64.to_le_bytes());
		file.extend_from_slice(&1u32.to_le_bytes());
		file.extend_from_slice(&0u32.to_le_bytes());
		file.extend_from_slice(&2u32.to_le_bytes());
		file.extend_from_slice(&2u32.to_le_bytes());
		file.extend_from_slice(&2_822_400u32.to_le_bytes());
		file.extend_from_slice(&1u32.to_le_bytes());
		file.extend_from_slice(&(data_len as u64 * 4).to_le_bytes());
		file.extend_from_slice(&4096u32.to_le_bytes());
		file.extend_from_slice(&0u32.to_le_bytes());

		file.extend_from_slice(b"data");
		file.extend_from_slice(&(data_len as u64 + 12).to_le_bytes());
		file.resize(file.len() + data_len, 0x69);

		file.extend_from_slice(tag);

		let len = file.len() as u64;
		file[12..20].copy_from_slice(&len.to_le_bytes());
		file
	}

	#[test_log::test]
	fn no_metadata_offset_means_no_tag() {
		let file = dsf_file(64, 0, &[]);
		let dsf = read_from(&mut Cursor::new(file), ParseOptions::new()).unwrap();

		assert!(dsf.id3v2_tag.is_none());
		assert_eq!(dsf.header.metadata_offset, 0);
		assert_eq!(dsf.properties.sample_rate(), 2_822_400);
		assert_eq!(dsf.properties.channels(), 2);
		assert_eq!(dsf.properties.sample_count(), 256);
	}

	#[test_log::test]
	fn tag_at_metadata_offset() {
		let mut tag = b"ID3\x04\0\0\0\0\0\x0e".to_vec();
		tag.extend_from_slice(b"TIT2\0\0\0\x04\0\0\x03Foo");

		let file = dsf_file(64, 92 + 64, &tag);
		let dsf = read_from(&mut Cursor::new(file), ParseOptions::new()).unwrap();

		let tag = dsf.id3v2_tag.unwrap();
		assert_eq!(tag.title().as_deref(), Some("Foo"));
	}

	#[test_log::test]
	fn metadata_offset_without_tag() {
		let file = dsf_file(64, 92, &[]);
		let err = read_from(&mut Cursor::new(file), ParseOptions::new()).unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::CannotRead(_)));
	}

	#[test_log::test]
	fn bad_signature() {
		let mut file = dsf_file(64, 0, &[]);
		file[..4].copy_from_slice(b"DSF ");

		let err = DsfHeader::read(&mut &file[..]).unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::CannotRead(_)));
	}
}
