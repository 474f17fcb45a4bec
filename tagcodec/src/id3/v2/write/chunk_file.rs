//! Placing an ID3v2 tag in an `ID3 ` chunk of a RIFF (WAV) or FORM (AIFF) file

use crate::config::WriteOptions;
use crate::error::{Result, TagCodecError};
use crate::iff::chunk::{ChunkHeader, Chunks};
use crate::macros::{encode_err, err};
use crate::util::io::{FileLike, Length, Truncate, overwrite_changed};

use std::io::{Cursor, Seek, SeekFrom, Write};

use byteorder::{ByteOrder, WriteBytesExt};

const CHUNK_NAME_UPPER: [u8; 4] = [b'I', b'D', b'3', b' '];
const CHUNK_NAME_LOWER: [u8; 4] = [b'i', b'd', b'3', b' '];
// "RIFF"/"FORM" + size + form type
const OUTER_HEADER_SIZE: usize = 12;

/// Replace, add or remove (when `tag` is empty) the ID3v2 chunk
///
/// The tag takes the place of an existing chunk, or is appended to the end of the outer chunk.
/// The outer chunk size is rewritten.
pub(crate) fn write_to_chunk_file<F, B>(
	file: &mut F,
	tag: &[u8],
	write_options: WriteOptions,
) -> Result<()>
where
	F: FileLike,
	TagCodecError: From<<F as Truncate>::Error>,
	TagCodecError: From<<F as Length>::Error>,
	B: ByteOrder,
{
	file.rewind()?;

	let mut file_bytes = Cursor::new(Vec::new());
	file.read_to_end(file_bytes.get_mut())?;

	if file_bytes.get_ref().len() < OUTER_HEADER_SIZE {
		encode_err!(@BAIL "File is too short to hold a chunk list");
	}

	let original = file_bytes.get_ref().clone();

	let outer = ChunkHeader::read::<B, _>(&mut file_bytes)?;
	let mut outer_size = outer.size;

	// Trailing data past the outer chunk is left alone
	let outer_end = (outer.end() as usize).min(file_bytes.get_ref().len());
	if outer_end < OUTER_HEADER_SIZE {
		encode_err!(@BAIL "Outer chunk is too small to hold its form type");
	}

	file_bytes.seek(SeekFrom::Start(OUTER_HEADER_SIZE as u64))?;

	let mut existing = None;
	let mut chunks = Chunks::<B>::new((outer_end - OUTER_HEADER_SIZE) as u64);
	while chunks.next(&mut file_bytes)? {
		if chunks.fourcc() == CHUNK_NAME_UPPER || chunks.fourcc() == CHUNK_NAME_LOWER {
			existing = Some(chunks.header);
			break;
		}

		chunks.skip(&mut file_bytes)?;
	}

	let mut tag_position = outer_end;
	if let Some(existing) = existing {
		let start = existing.start as usize;
		let end = (existing.padded_end() as usize).min(outer_end);

		log::debug!("Removing existing ID3v2 chunk at offset {}", start);

		let _ = file_bytes.get_mut().drain(start..end);
		outer_size -= (end - start) as u64;
		tag_position = start;
	}

	if !tag.is_empty() {
		let Ok(tag_len) = u32::try_from(tag.len()) else {
			err!(TooMuchData);
		};

		let mut chunk = Vec::with_capacity(tag.len() + 9);
		if write_options.uppercase_id3v2_chunk {
			chunk.write_all(&CHUNK_NAME_UPPER)?;
		} else {
			chunk.write_all(&CHUNK_NAME_LOWER)?;
		}

		chunk.write_u32::<B>(tag_len)?;
		chunk.write_all(tag)?;

		// An odd length chunk is followed by a pad byte that isn't part of its size
		if tag.len() % 2 != 0 {
			chunk.write_u8(0)?;
		}

		log::debug!(
			"Writing ID3v2 chunk ({} bytes) at offset {}",
			chunk.len(),
			tag_position
		);

		outer_size += chunk.len() as u64;
		file_bytes
			.get_mut()
			.splice(tag_position..tag_position, chunk);
	}

	let Ok(outer_size) = u32::try_from(outer_size) else {
		err!(TooMuchData);
	};

	file_bytes.seek(SeekFrom::Start(4))?;
	file_bytes.write_u32::<B>(outer_size)?;

	overwrite_changed(file, &original, file_bytes.get_ref())
}
