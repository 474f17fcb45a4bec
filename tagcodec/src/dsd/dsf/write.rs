//! Writing the ID3v2 tag of a DSF file
//!
//! The tag always sits at the end of the file:
//!
//! * An existing tag is truncated away and the new one is written in its place
//! * Without an existing tag, the new one is appended and the metadata offset is set to the old
//!   end of the file
//!
//! The file length in the header is always taken from the stream after writing.

use super::{DsfHeader, FILE_LENGTH_OFFSET, METADATA_OFFSET_OFFSET};
use crate::error::{Result, TagCodecError};
use crate::macros::encode_err;
use crate::util::io::{FileLike, Length, Truncate};

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, WriteBytesExt};

/// Replace, add, or remove (when `tag` is empty) the ID3v2 tag of a DSF file
pub(crate) fn write_id3v2<F>(file: &mut F, tag: &[u8]) -> Result<()>
where
	F: FileLike,
	TagCodecError: From<<F as Truncate>::Error>,
	TagCodecError: From<<F as Length>::Error>,
{
	file.rewind()?;
	let header = match DsfHeader::read(file) {
		Ok(header) => header,
		Err(e) if e.is_read_error() => encode_err!(@BAIL Dsf, "File is not a valid DSF file"),
		Err(e) => return Err(e),
	};

	let file_len = file.len()?;

	let tag_offset = if header.metadata_offset == 0 {
		if tag.is_empty() {
			log::debug!("No existing tag to remove");
			return Ok(());
		}

		log::debug!("No existing tag, appending at offset {}", file_len);
		file_len
	} else {
		verify_existing_tag(file, header.metadata_offset, file_len)?;

		log::debug!(
			"Truncating the existing tag at offset {}",
			header.metadata_offset
		);
		file.truncate(header.metadata_offset)?;
		header.metadata_offset
	};

	let metadata_offset = if tag.is_empty() {
		0
	} else {
		file.seek(SeekFrom::Start(tag_offset))?;
		file.write_all(tag)?;
		tag_offset
	};

	let file_length = file.len()?;
	log::trace!(
		"Rewriting DSF header: file length {}, metadata offset {}",
		file_length,
		metadata_offset
	);

	file.seek(SeekFrom::Start(FILE_LENGTH_OFFSET))?;
	file.write_u64::<LittleEndian>(file_length)?;

	file.seek(SeekFrom::Start(METADATA_OFFSET_OFFSET))?;
	file.write_u64::<LittleEndian>(metadata_offset)?;

	Ok(())
}

// The offset has to point at an ID3v2 signature, otherwise nothing is touched
fn verify_existing_tag<F>(file: &mut F, metadata_offset: u64, file_len: u64) -> Result<()>
where
	F: Read + Seek,
{
	if metadata_offset.saturating_add(3) > file_len {
		encode_err!(@BAIL Dsf, "Metadata offset points past the end of the file");
	}

	file.seek(SeekFrom::Start(metadata_offset))?;

	let mut signature = [0; 3];
	file.read_exact(&mut signature)?;
	if &signature != b"ID3" {
		encode_err!(@BAIL Dsf, "Metadata offset doesn't point to an ID3v2 tag");
	}

	Ok(())
}
