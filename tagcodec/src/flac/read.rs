use super::FlacFile;
use super::block::{Block, BlockType};
use super::properties::{FlacProperties, read_properties};
use super::tag::{FlacPicture, FlacTag, read_comments};
use crate::config::{ParseOptions, ParsingMode};
use crate::error::Result;
use crate::id3::{ID3FindResults, find_id3v2};
use crate::macros::{decode_err, err};

use std::io::{Read, Seek, SeekFrom};

/// The smallest valid `STREAMINFO` block
pub(super) const STREAMINFO_SIZE: u32 = 34;

pub(super) fn verify_flac<R>(data: &mut R) -> Result<Block>
where
	R: Read + Seek,
{
	let mut marker = [0; 4];
	data.read_exact(&mut marker)?;

	if &marker != b"fLaC" {
		decode_err!(@BAIL Flac, "File missing \"fLaC\" stream marker");
	}

	let block = Block::read(data, |_| true)?;

	if block.header.ty != BlockType::StreamInfo {
		decode_err!(@BAIL Flac, "File missing mandatory STREAMINFO block");
	}

	if block.header.length < STREAMINFO_SIZE {
		decode_err!(@BAIL Flac, "File has an invalid STREAMINFO block size (< 34)");
	}

	log::debug!("File verified to be FLAC");
	Ok(block)
}

pub(crate) fn read_from<R>(data: &mut R, parse_options: ParseOptions) -> Result<FlacFile>
where
	R: Read + Seek,
{
	let mut flac_file = FlacFile {
		id3v2_tag: None,
		tag: None,
		properties: FlacProperties::default(),
	};

	// It is possible for a FLAC file to be preceded by an ID3v2 tag
	if let ID3FindResults(Some(_), tag) = find_id3v2(data, Some(parse_options))? {
		log::warn!("Encountered an ID3v2 tag. This tag cannot be rewritten to the FLAC file!");
		flac_file.id3v2_tag = tag;
	}

	let stream_info = verify_flac(data)?;

	let mut tag = FlacTag::default();
	let mut found_comments = false;
	let mut last_block = stream_info.header.last;

	while !last_block {
		let block = Block::read(data, |block_type| {
			(block_type == BlockType::VorbisComment && parse_options.read_tags)
				|| (block_type == BlockType::Picture && parse_options.read_cover_art)
		})?;

		last_block = block.header.last;

		if block.content.is_empty() {
			continue;
		}

		match block.header.ty {
			BlockType::VorbisComment => {
				log::debug!("Encountered a Vorbis Comments block, parsing");

				// Only one block is allowed, the last one wins otherwise. Every one of them is
				// replaced when writing.
				if found_comments && parse_options.parsing_mode == ParsingMode::Strict {
					decode_err!(@BAIL Flac, "Streams are only allowed one Vorbis Comments block per stream");
				}

				tag.comments = read_comments(&block.content, parse_options)?;
				found_comments = true;
			},
			BlockType::Picture => {
				log::debug!("Encountered a FLAC picture block, parsing");

				match FlacPicture::from_flac_bytes(&block.content, parse_options.parsing_mode) {
					Ok(picture) => tag.pictures.push(picture),
					Err(e) if parse_options.parsing_mode == ParsingMode::Strict => return Err(e),
					Err(_) => log::warn!("Unable to read FLAC picture block, discarding"),
				}
			},
			_ => {},
		}
	}

	if found_comments || !tag.pictures.is_empty() {
		flac_file.tag = Some(tag);
	}

	if !parse_options.read_properties {
		return Ok(flac_file);
	}

	let (stream_length, file_length) = {
		let current = data.stream_position()?;
		let end = data.seek(SeekFrom::End(0))?;

		// A block lied about its size
		if current > end {
			err!(SizeMismatch);
		}

		(end - current, end)
	};

	flac_file.properties = read_properties(&mut &*stream_info.content, stream_length, file_length)?;

	Ok(flac_file)
}

#[cfg(test)]
pub(super) mod tests {
	use super::read_from;
	use crate::config::ParseOptions;
	use crate::flac::block::{Block, BlockType};
	use crate::flac::properties::tests::stream_info;
	use crate::tag::Accessor;

	use std::io::Cursor;

	/// Build a FLAC stream from `(type, content)` pairs following STREAMINFO
	pub(crate) fn flac_file(blocks: &[(BlockType, Vec<u8>)], audio: &[u8]) -> Vec<u8> {
		let mut file = b"fLaC".to_vec();

		let mut all = vec![(BlockType::StreamInfo, stream_info(441_000))];
		all.extend_from_slice(blocks);

		let count = all.len();
		for (i, (ty, content)) in all.into_iter().enumerate() {
			let mut block = Block::new(ty, content).unwrap();
			block.header.last = i == count - 1;
			block.write_to(&mut file).unwrap();
		}

		file.extend_from_slice(audio);
		file
	}

	pub(crate) fn comments_block(items: &[(&str, &str)]) -> (BlockType, Vec<u8>) {
		let mut content = b"\x06\0\0\0vendor".to_vec();
		content.extend_from_slice(&(items.len() as u32).to_le_bytes());
		for (key, value) in items {
			let item = format!("{key}={value}");
			content.extend_from_slice(&(item.len() as u32).to_le_bytes());
			content.extend_from_slice(item.as_bytes());
		}

		(BlockType::VorbisComment, content)
	}

	#[test_log::test]
	fn comments_and_properties() {
		let data = flac_file(
			&[
				(BlockType::SeekTable, vec![0; 18]),
				comments_block(&[("TITLE", "Foo"), ("ARTIST", "Bar")]),
				(BlockType::Padding, vec![0; 100]),
			],
			&[0; 1000],
		);

		let file = read_from(&mut Cursor::new(data), ParseOptions::new()).unwrap();

		let tag = file.tag().unwrap();
		assert_eq!(tag.title().as_deref(), Some("Foo"));
		assert_eq!(tag.artist().as_deref(), Some("Bar"));
		assert_eq!(tag.comments().vendor(), "vendor");

		// 1000 bytes of audio over 10 seconds
		assert_eq!(file.properties.audio_bitrate(), 0);
		assert_eq!(file.properties.sample_rate(), 44100);
	}

	#[test_log::test]
	fn no_tag() {
		let data = flac_file(&[(BlockType::Padding, vec![0; 8])], &[]);
		let file = read_from(&mut Cursor::new(data), ParseOptions::new()).unwrap();
		assert!(file.tag().is_none());
	}

	#[test_log::test]
	fn id3v2_prefix_is_skipped() {
		let mut data = b"ID3\x04\0\0\0\0\0\x0eTIT2\0\0\0\x04\0\0\x03Foo".to_vec();
		data.extend(flac_file(&[comments_block(&[("TITLE", "Bar")])], &[]));

		let file = read_from(&mut Cursor::new(data), ParseOptions::new()).unwrap();
		assert_eq!(file.id3v2().unwrap().title().as_deref(), Some("Foo"));
		assert_eq!(file.tag().unwrap().title().as_deref(), Some("Bar"));
	}

	#[test_log::test]
	fn empty_stream_info() {
		let data = b"fLaC\x80\0\0\0".to_vec();
		let err = read_from(&mut Cursor::new(data), ParseOptions::new()).unwrap_err();
		assert!(err.is_read_error());
	}

	#[test_log::test]
	fn unknown_block_type() {
		let mut data = flac_file(&[], &[]);
		// Clear the last-block flag of STREAMINFO and follow it with type 9
		data[4] = 0x00;
		data.extend_from_slice(&[0x89, 0, 0, 0]);

		assert!(read_from(&mut Cursor::new(data), ParseOptions::new()).is_err());
	}
}
