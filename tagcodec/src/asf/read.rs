use super::AsfFile;
use super::guid::{
	CONTENT_BRANDING_OBJECT, CONTENT_DESCRIPTION_OBJECT, DATA_OBJECT,
	EXTENDED_CONTENT_DESCRIPTION_OBJECT, FILE_PROPERTIES_OBJECT, HEADER_OBJECT,
	METADATA_LIBRARY_OBJECT, METADATA_OBJECT, STREAM_PROPERTIES_OBJECT,
};
use super::metadata::{
	read_content_branding, read_content_description, read_extended_content_description,
	read_metadata,
};
use super::object::{AsfObjectGraph, HEADER_OBJECT_SIZE, OBJECT_HEADER_SIZE};
use super::properties::{AsfProperties, read_file_properties, read_stream_properties};
use super::tag::AsfTag;
use crate::config::ParseOptions;
use crate::error::Result;
use crate::macros::{decode_err, try_vec};
use crate::util::io::StreamLen;

use std::io::{Read, Seek, SeekFrom};

/// Verify the header object prefix, returning the size of the whole header object
pub(super) fn verify_asf<R>(reader: &mut R) -> Result<u64>
where
	R: Read,
{
	let mut prefix = [0; HEADER_OBJECT_SIZE];
	reader.read_exact(&mut prefix)?;

	if prefix[..16] != HEADER_OBJECT.as_bytes() {
		decode_err!(@BAIL Asf, "File doesn't start with a header object");
	}

	let mut size = [0; 8];
	size.copy_from_slice(&prefix[16..OBJECT_HEADER_SIZE]);
	let size = u64::from_le_bytes(size);

	if size < HEADER_OBJECT_SIZE as u64 {
		decode_err!(@BAIL Asf, "Header object has an invalid size");
	}

	Ok(size)
}

pub(super) fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<AsfFile>
where
	R: Read + Seek,
{
	let file_length = reader.total_len()?;
	reader.rewind()?;

	let header_size = verify_asf(reader)?;
	if header_size > file_length {
		decode_err!(@BAIL Asf, "Header object is larger than the file");
	}

	reader.rewind()?;
	let mut header = try_vec![0; header_size as usize];
	reader.read_exact(&mut header)?;

	let graph = AsfObjectGraph::parse(&header)?;

	let mut tag = AsfTag::default();
	let mut found_metadata = false;
	let mut properties = AsfProperties::default();
	let mut found_audio = false;

	for entry in &graph.entries {
		let content = entry.content(&header);

		match entry.guid {
			FILE_PROPERTIES_OBJECT if parse_options.read_properties => {
				read_file_properties(content, &mut properties, file_length)?;
			},
			STREAM_PROPERTIES_OBJECT if parse_options.read_properties && !found_audio => {
				found_audio = read_stream_properties(content, &mut properties)?;
			},
			CONTENT_DESCRIPTION_OBJECT if parse_options.read_tags => {
				read_content_description(content, &mut tag, parse_options)?;
				found_metadata = true;
			},
			CONTENT_BRANDING_OBJECT if parse_options.read_tags => {
				read_content_branding(content, &mut tag)?;
				found_metadata = true;
			},
			EXTENDED_CONTENT_DESCRIPTION_OBJECT if parse_options.read_tags => {
				read_extended_content_description(content, &mut tag, parse_options)?;
				found_metadata = true;
			},
			METADATA_OBJECT if parse_options.read_tags => {
				read_metadata(content, &mut tag, false, parse_options)?;
				found_metadata = true;
			},
			METADATA_LIBRARY_OBJECT if parse_options.read_tags => {
				read_metadata(content, &mut tag, true, parse_options)?;
				found_metadata = true;
			},
			_ => {},
		}
	}

	if parse_options.read_properties && !found_audio {
		log::warn!("No audio stream found");
	}

	// The data object immediately follows the header
	if header_size < file_length {
		let mut guid = [0; 16];
		reader.seek(SeekFrom::Start(header_size))?;
		if reader.read_exact(&mut guid).is_ok() && guid != DATA_OBJECT.as_bytes() {
			log::warn!("Header object isn't followed by a data object");
		}
	}

	Ok(AsfFile {
		tag: found_metadata.then_some(tag),
		properties,
	})
}
