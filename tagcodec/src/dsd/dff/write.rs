use super::chunk::DffChunk;
use super::read::{next_chunk, verify_dff};
use crate::error::{Result, TagCodecError};
use crate::macros::encode_err;
use crate::util::io::{FileLike, Length, Truncate, overwrite_changed};

use std::io::{Cursor, Seek, SeekFrom, Write};

use byteorder::{BigEndian, WriteBytesExt};

/// Replace, add, or remove (when `tag` is empty) the `ID3 ` chunk of a DFF file
///
/// The tag takes the place of an existing chunk, or is appended to the end of the `FRM8` form.
/// The form size is rewritten.
pub(crate) fn write_id3v2<F>(file: &mut F, tag: &[u8]) -> Result<()>
where
	F: FileLike,
	TagCodecError: From<<F as Truncate>::Error>,
	TagCodecError: From<<F as Length>::Error>,
{
	file.rewind()?;

	let mut file_bytes = Cursor::new(Vec::new());
	file.read_to_end(file_bytes.get_mut())?;

	let form = match verify_dff(&mut file_bytes) {
		Ok(form) => form,
		Err(e) if e.is_read_error() => encode_err!(@BAIL Dff, "File is not a valid DFF file"),
		Err(e) => return Err(e),
	};

	let original = file_bytes.get_ref().clone();

	// Trailing data past the form is left alone
	let form_end = form.end().min(file_bytes.get_ref().len() as u64);
	let mut form_size = form.size;

	let mut existing = None;
	while let Some((header, chunk)) = next_chunk(&mut file_bytes, form_end)? {
		if chunk == DffChunk::Id3 {
			existing = Some(header);
			break;
		}

		file_bytes.seek(SeekFrom::Start(header.padded_end().min(form_end)))?;
	}

	let mut tag_position = form_end as usize;
	if let Some(existing) = existing {
		let start = existing.start as usize;
		let end = existing.padded_end().min(form_end) as usize;

		log::debug!("Removing existing ID3 chunk at offset {}", start);

		let _ = file_bytes.get_mut().drain(start..end);
		form_size -= (end - start) as u64;
		tag_position = start;
	}

	if !tag.is_empty() {
		let mut chunk = Vec::with_capacity(tag.len() + 13);
		chunk.write_all(&DffChunk::Id3.fourcc())?;
		chunk.write_u64::<BigEndian>(tag.len() as u64)?;
		chunk.write_all(tag)?;

		if tag.len() % 2 != 0 {
			chunk.write_u8(0)?;
		}

		log::debug!(
			"Writing ID3 chunk ({} bytes) at offset {}",
			chunk.len(),
			tag_position
		);

		form_size += chunk.len() as u64;
		file_bytes
			.get_mut()
			.splice(tag_position..tag_position, chunk);
	}

	file_bytes.seek(SeekFrom::Start(4))?;
	file_bytes.write_u64::<BigEndian>(form_size)?;

	overwrite_changed(file, &original, file_bytes.get_ref())
}
