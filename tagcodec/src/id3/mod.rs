//! ID3 specific items
//!
//! Only ID3v2 is supported. It is the tag of WAV, AIFF, DSF and DFF files, and may also be found
//! (read only) in front of a FLAC stream.

pub mod v2;

use crate::config::ParseOptions;
use crate::error::Result;
use v2::header::Id3v2Header;
use v2::tag::Id3v2Tag;

use std::io::{Read, Seek, SeekFrom};

pub(crate) struct ID3FindResults<Header, Content>(pub Option<Header>, pub Content);

/// Look for an ID3v2 tag at the current position
///
/// If one is found, the reader is left after the tag (and its footer). Otherwise the reader is
/// left where it started.
pub(crate) fn find_id3v2<R>(
	data: &mut R,
	parse_options: Option<ParseOptions>,
) -> Result<ID3FindResults<Id3v2Header, Option<Id3v2Tag>>>
where
	R: Read + Seek,
{
	let start = data.stream_position()?;
	log::debug!("Searching for an ID3v2 tag at offset: {}", start);

	let Ok(header) = Id3v2Header::parse(data) else {
		data.seek(SeekFrom::Start(start))?;
		return Ok(ID3FindResults(None, None));
	};

	log::debug!("Found an ID3v2 tag ({} bytes)", header.full_tag_size());

	let mut tag = None;
	match parse_options {
		Some(parse_options) if parse_options.read_tags => {
			tag = Some(v2::read::parse_id3v2(data, header, parse_options)?);
		},
		_ => {
			data.seek(SeekFrom::Current(i64::from(
				header.size - header.extended_size,
			)))?;
		},
	}

	if header.flags.footer {
		data.seek(SeekFrom::Current(10))?;
	}

	Ok(ID3FindResults(Some(header), tag))
}

#[cfg(test)]
mod tests {
	use super::find_id3v2;
	use crate::config::ParseOptions;

	use std::io::{Cursor, Seek};

	#[test_log::test]
	fn reader_left_after_tag() {
		let mut data = b"ID3\x04\0\0\0\0\0\x04\0\0\0\0fLaC".to_vec();
		data.extend_from_slice(&[0; 4]);
		let mut reader = Cursor::new(data);

		let results = find_id3v2(&mut reader, Some(ParseOptions::new())).unwrap();
		assert!(results.0.is_some());
		assert!(results.1.unwrap().is_empty());
		assert_eq!(reader.stream_position().unwrap(), 14);
	}

	#[test_log::test]
	fn reader_untouched_without_tag() {
		let mut reader = Cursor::new(b"fLaC\0\0\0\x22".to_vec());
		let results = find_id3v2(&mut reader, None).unwrap();
		assert!(results.0.is_none());
		assert_eq!(reader.stream_position().unwrap(), 0);
	}
}
