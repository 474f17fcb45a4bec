use super::block::{BLOCK_HEADER_SIZE, Block, BlockType, MAX_BLOCK_LENGTH};
use super::read::verify_flac;
use super::tag::{FlacTag, encode_comments};
use crate::config::WriteOptions;
use crate::error::{Result, TagCodecError};
use crate::id3::find_id3v2;
use crate::macros::{encode_err, err};
use crate::util::io::{FileLike, Length, Truncate, overwrite_changed};

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

/// Replace the Vorbis comments and pictures of a FLAC file
///
/// STREAMINFO and every other non-tag block are kept as they are. An empty tag removes all
/// `VORBIS_COMMENT` and `PICTURE` blocks. Existing padding absorbs the size difference when it
/// can, leaving the audio data where it is.
pub(crate) fn write_to<F>(file: &mut F, tag: &FlacTag, write_options: WriteOptions) -> Result<()>
where
	F: FileLike,
	TagCodecError: From<<F as Truncate>::Error>,
	TagCodecError: From<<F as Length>::Error>,
{
	file.rewind()?;

	let mut file_bytes = Vec::new();
	file.read_to_end(&mut file_bytes)?;

	let mut cursor = Cursor::new(file_bytes);

	// An ID3v2 tag in front of the stream is left alone
	find_id3v2(&mut cursor, None)?;

	let Ok(stream_info) = verify_flac(&mut cursor) else {
		encode_err!(@BAIL Flac, "File is not a valid FLAC file");
	};

	let mut is_last_block = stream_info.header.last;
	let mut metadata_range = (stream_info.start as usize)..(stream_info.end as usize);

	let mut has_blocks_to_remove = false;
	let mut old_vendor = String::new();

	let mut blocks = vec![stream_info];
	while !is_last_block {
		let block = Block::read(&mut cursor, |ty| {
			!matches!(ty, BlockType::Picture | BlockType::Padding)
		})?;

		is_last_block = block.header.last;
		metadata_range.end = block.end as usize;

		match block.header.ty {
			BlockType::VorbisComment => {
				old_vendor = read_vendor(&block.content);
				has_blocks_to_remove = true;
			},
			BlockType::Picture => has_blocks_to_remove = true,
			BlockType::Padding => {},
			_ => blocks.push(block),
		}
	}

	if metadata_range.end > cursor.get_ref().len() {
		err!(SizeMismatch);
	}

	// Attempting to strip an already empty file
	if tag.is_empty() && !has_blocks_to_remove {
		log::debug!("Nothing to do");
		return Ok(());
	}

	if !tag.comments.is_empty() {
		let content = encode_comments(&tag.comments, &old_vendor)?;
		blocks.push(Block::new(BlockType::VorbisComment, content)?);
	}

	for picture in &tag.pictures {
		blocks.push(Block::new(BlockType::Picture, picture.as_flac_bytes()?)?);
	}

	let new_len = blocks.iter().map(Block::encoded_len).sum::<usize>();
	let old_len = metadata_range.len();

	// Reuse the space of the old metadata when the new blocks fit, otherwise the audio moves
	let padding = match old_len.checked_sub(new_len) {
		Some(0) => None,
		Some(free) if free >= BLOCK_HEADER_SIZE && free - BLOCK_HEADER_SIZE <= MAX_BLOCK_LENGTH => {
			Some(free - BLOCK_HEADER_SIZE)
		},
		_ => write_options.preferred_padding.map(|padding| padding as usize),
	};

	if let Some(padding) = padding {
		log::debug!("Writing a PADDING block of {} bytes", padding);
		blocks.push(Block::new_padding(padding.min(MAX_BLOCK_LENGTH))?);
	}

	// Kept blocks carry their old flags, only the final block may end the chain
	for block in &mut blocks {
		block.header.last = false;
	}

	if let Some(block) = blocks.last_mut() {
		block.header.last = true;
	}

	let mut encoded_metadata =
		Vec::with_capacity(new_len + padding.unwrap_or(0) + BLOCK_HEADER_SIZE);
	for block in &blocks {
		log::trace!(
			"Writing a block (ty: {:?}, size: {})",
			block.header.ty,
			block.content.len()
		);
		block.write_to(&mut encoded_metadata)?;
	}

	let original = cursor.into_inner();

	let mut file_bytes =
		Vec::with_capacity(original.len() - metadata_range.len() + encoded_metadata.len());
	file_bytes.extend_from_slice(&original[..metadata_range.start]);
	file_bytes.extend(encoded_metadata);
	file_bytes.extend_from_slice(&original[metadata_range.end..]);

	overwrite_changed(file, &original, &file_bytes)
}

// The vendor string of an existing VORBIS_COMMENT block, empty if it can't be read
fn read_vendor(content: &[u8]) -> String {
	let mut reader = content;
	let Ok(vendor_len) = reader.read_u32::<LittleEndian>() else {
		return String::new();
	};

	let Some(vendor) = reader.get(..vendor_len as usize) else {
		return String::new();
	};

	match String::from_utf8(vendor.to_vec()) {
		Ok(vendor) => vendor,
		Err(_) => {
			log::warn!("FLAC vendor string is not valid UTF-8, not re-using");
			String::new()
		},
	}
}
