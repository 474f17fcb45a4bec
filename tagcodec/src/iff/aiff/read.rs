use super::AiffFile;
use super::properties::{AiffProperties, read_properties};
use crate::config::ParseOptions;
use crate::error::Result;
use crate::id3::v2::Id3v2Tag;
use crate::iff::chunk::Chunks;
use crate::macros::decode_err;

use std::io::{Read, Seek, SeekFrom};

use byteorder::BigEndian;

// Verifies that the stream is an AIFF file, returning whether it is an AIFC file
pub(crate) fn verify_aiff<R>(data: &mut R) -> Result<bool>
where
	R: Read,
{
	let mut id = [0; 12];
	data.read_exact(&mut id)?;

	if &id[..4] != b"FORM" {
		decode_err!(@BAIL Aiff, "AIFF file doesn't contain a FORM chunk");
	}

	let aifc = match &id[8..] {
		b"AIFF" => false,
		b"AIFC" => true,
		_ => decode_err!(@BAIL Aiff, "Found FORM file, format is not AIFF or AIFC"),
	};

	log::debug!("File verified to be AIFF, AIFC: {}", aifc);
	Ok(aifc)
}

pub(super) fn read_from<R>(data: &mut R, parse_options: ParseOptions) -> Result<AiffFile>
where
	R: Read + Seek,
{
	let aifc = verify_aiff(data)?;

	let current_pos = data.stream_position()?;
	let file_len = data.seek(SeekFrom::End(0))?;

	data.seek(SeekFrom::Start(current_pos))?;

	let mut comm = None;
	let mut stream_len = 0;

	let mut id3v2_tag: Option<Id3v2Tag> = None;

	let mut chunks = Chunks::<BigEndian>::new(file_len - current_pos);

	while chunks.next(data)? {
		match &chunks.fourcc() {
			b"ID3 " | b"id3 " if parse_options.read_tags => {
				let tag = chunks.id3_chunk(data, parse_options)?;
				if id3v2_tag.is_some() {
					log::warn!("Ignoring duplicate ID3v2 chunk");
					continue;
				}

				id3v2_tag = Some(tag);
			},
			b"COMM" if parse_options.read_properties && comm.is_none() => {
				if chunks.size() < 18 {
					decode_err!(@BAIL Aiff, "File has an invalid \"COMM\" chunk size (< 18)");
				}

				comm = Some(chunks.content(data)?);
			},
			b"SSND" if parse_options.read_properties => {
				stream_len = chunks.size();
				chunks.skip(data)?;
			},
			_ => chunks.skip(data)?,
		}
	}

	let properties = if parse_options.read_properties {
		let Some(comm) = comm else {
			decode_err!(@BAIL Aiff, "File does not contain a \"COMM\" chunk");
		};

		if stream_len == 0 {
			decode_err!(@BAIL Aiff, "File does not contain a \"SSND\" chunk");
		}

		read_properties(&comm, aifc, stream_len, file_len)?
	} else {
		AiffProperties::default()
	};

	Ok(AiffFile {
		id3v2_tag,
		properties,
	})
}
