use super::WavFile;
use super::properties::{WavProperties, read_properties};
use crate::config::ParseOptions;
use crate::error::Result;
use crate::id3::v2::Id3v2Tag;
use crate::iff::chunk::Chunks;
use crate::macros::decode_err;

use std::io::{Read, Seek, SeekFrom};

use byteorder::{ByteOrder, LittleEndian};

// Verifies that the stream is a WAV file and returns the RIFF chunk size
pub(crate) fn verify_wav<T>(data: &mut T) -> Result<u32>
where
	T: Read,
{
	let mut id = [0; 12];
	data.read_exact(&mut id)?;

	if &id[..4] != b"RIFF" {
		decode_err!(@BAIL Wav, "WAV file doesn't contain a RIFF chunk");
	}

	if &id[8..] != b"WAVE" {
		decode_err!(@BAIL Wav, "Found RIFF file, format is not WAVE");
	}

	log::debug!("File verified to be WAV");
	Ok(LittleEndian::read_u32(&id[4..8]))
}

pub(crate) fn read_from<R>(data: &mut R, parse_options: ParseOptions) -> Result<WavFile>
where
	R: Read + Seek,
{
	verify_wav(data)?;

	let current_pos = data.stream_position()?;
	let file_len = data.seek(SeekFrom::End(0))?;

	data.seek(SeekFrom::Start(current_pos))?;

	let mut stream_len = 0;
	let mut total_samples = 0_u32;
	let mut fmt = Vec::new();

	let mut id3v2_tag: Option<Id3v2Tag> = None;

	let mut chunks = Chunks::<LittleEndian>::new(file_len - current_pos);

	while chunks.next(data)? {
		match &chunks.fourcc() {
			b"fmt " if parse_options.read_properties && fmt.is_empty() => {
				fmt = chunks.content(data)?;
			},
			b"fact" if parse_options.read_properties && total_samples == 0 => {
				let fact = chunks.content(data)?;
				if fact.len() >= 4 {
					total_samples = LittleEndian::read_u32(&fact);
				}
			},
			b"data" if parse_options.read_properties && stream_len == 0 => {
				stream_len = chunks.size();
				chunks.skip(data)?;
			},
			b"ID3 " | b"id3 " if parse_options.read_tags => {
				let tag = chunks.id3_chunk(data, parse_options)?;
				if id3v2_tag.is_some() {
					log::warn!("Ignoring duplicate ID3v2 chunk");
					continue;
				}

				id3v2_tag = Some(tag);
			},
			_ => chunks.skip(data)?,
		}
	}

	let properties = if parse_options.read_properties {
		if stream_len == 0 {
			decode_err!(@BAIL Wav, "File does not contain a \"data\" chunk");
		}

		read_properties(&fmt, total_samples, stream_len, file_len)?
	} else {
		WavProperties::default()
	};

	Ok(WavFile {
		id3v2_tag,
		properties,
	})
}
