use super::frame::read::ParsedFrame;
use super::header::{Id3v2Header, Id3v2Version};
use super::tag::Id3v2Tag;
use crate::config::ParseOptions;
use crate::error::Result;
use crate::id3::v2::util::synchsafe::resynchronize;

use std::io::Read;

pub(crate) fn parse_id3v2<R>(
	bytes: &mut R,
	header: Id3v2Header,
	parse_options: ParseOptions,
) -> Result<Id3v2Tag>
where
	R: Read,
{
	log::debug!(
		"Parsing ID3v2 tag, size: {}, version: {:?}",
		header.size,
		header.version
	);

	// Reading the whole region also throws away padding and anything past a bad frame
	let mut tag_bytes = Vec::new();
	bytes
		.take(u64::from(header.size - header.extended_size))
		.read_to_end(&mut tag_bytes)?;

	// ID3v2.4 unsynchronises frames individually
	if header.flags.unsynchronisation && header.version != Id3v2Version::V4 {
		tag_bytes = resynchronize(&tag_bytes);
	}

	let ret = read_all_frames_into_tag(&mut &tag_bytes[..], header, parse_options)?;

	log::debug!("Read {} ID3v2 frames", ret.len());
	Ok(ret)
}

fn read_all_frames_into_tag<R>(
	reader: &mut R,
	header: Id3v2Header,
	parse_options: ParseOptions,
) -> Result<Id3v2Tag>
where
	R: Read,
{
	let mut tag = Id3v2Tag::default();
	tag.original_version = header.version;
	tag.set_flags(header.flags);

	loop {
		match ParsedFrame::read(reader, header.version, header.flags, parse_options)? {
			// Duplicates are kept, so that a rewrite loses nothing
			ParsedFrame::Next(frame) => tag.frames.push(frame),
			ParsedFrame::Skip => {},
			ParsedFrame::Eof => break,
		}
	}

	Ok(tag)
}

#[cfg(test)]
mod tests {
	use super::parse_id3v2;
	use crate::config::{ParseOptions, ParsingMode};
	use crate::id3::v2::header::{Id3v2Header, Id3v2Version};
	use crate::id3::v2::FrameValue;
	use crate::id3::v2::util::synchsafe::SynchsafeInteger;
	use crate::tag::Accessor;

	fn build_tag(version: u8, flags: u8, frames: &[u8], padding: usize) -> Vec<u8> {
		let size = (frames.len() + padding) as u32;
		let mut tag = vec![b'I', b'D', b'3', version, 0, flags];
		tag.extend_from_slice(&size.synch().unwrap().to_be_bytes());
		tag.extend_from_slice(frames);
		tag.resize(tag.len() + padding, 0);
		tag
	}

	fn read(tag: &[u8], parse_mode: ParsingMode) -> crate::error::Result<crate::id3::v2::Id3v2Tag> {
		let reader = &mut &tag[..];
		let header = Id3v2Header::parse(reader)?;
		parse_id3v2(reader, header, ParseOptions::new().parsing_mode(parse_mode))
	}

	#[test_log::test]
	fn zero_size_tag() {
		let tag = build_tag(4, 0, &[], 0);
		assert!(read(&tag, ParsingMode::Strict).unwrap().is_empty());
	}

	#[test_log::test]
	fn v22_frames() {
		let frames = b"TT2\0\0\x0A\0Foo title";
		let tag = read(&build_tag(2, 0, frames, 16), ParsingMode::Strict).unwrap();

		assert_eq!(tag.original_version(), Id3v2Version::V2);
		assert_eq!(tag.len(), 1);
		assert_eq!(tag.title().as_deref(), Some("Foo title"));
		assert_eq!(tag.frames().next().unwrap().id_str(), "TT2");
	}

	#[test_log::test]
	fn v23_unsynchronised_tag() {
		// Content of a PRIV frame `FF 00 E0`, unsynchronised to `FF 00 00 E0`
		let frames = b"PRIV\0\0\0\x03\0\0\xFF\x00\x00\xE0";
		let tag = read(&build_tag(3, 0x80, frames, 0), ParsingMode::Strict).unwrap();

		let frame = tag.frames().next().unwrap();
		assert_eq!(frame.value(), &FrameValue::Binary(vec![0xFF, 0x00, 0xE0]));
	}

	#[test_log::test]
	fn bad_frame_id_depends_on_parsing_mode() {
		let mut frames = b"TI+2\0\0\0\x04\0\0\0Foo".to_vec();
		frames.extend_from_slice(b"TPE1\0\0\0\x0B\0\0\0Bar artist");
		let tag = build_tag(4, 0, &frames, 0);

		assert!(read(&tag, ParsingMode::Strict).is_err());

		let relaxed = read(&tag, ParsingMode::Relaxed).unwrap();
		assert_eq!(relaxed.len(), 1);
		assert_eq!(relaxed.artist().as_deref(), Some("Bar artist"));
	}

	#[test_log::test]
	fn undecodable_body_kept_as_binary() {
		// Text encoding 9 doesn't exist
		let frames = b"TIT2\0\0\0\x04\0\0\x09abc";
		let tag = build_tag(4, 0, frames, 0);

		assert!(read(&tag, ParsingMode::Strict).is_err());
		assert!(read(&tag, ParsingMode::Relaxed).unwrap().is_empty());

		let best_attempt = read(&tag, ParsingMode::BestAttempt).unwrap();
		let frame = best_attempt.frames().next().unwrap();
		assert_eq!(frame.value(), &FrameValue::Binary(b"\x09abc".to_vec()));
	}

	#[cfg(feature = "id3v2_compression_support")]
	#[test_log::test]
	fn compressed_frame_is_inflated() {
		use crate::id3::v2::FrameFlags;
		use std::io::Write;

		let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
		encoder.write_all(b"\x03Foo title").unwrap();
		let compressed = encoder.finish().unwrap();

		// ID3v2.3: compressed frames are prefixed with the decompressed size
		let mut frames = b"TIT2".to_vec();
		frames.extend_from_slice(&(compressed.len() as u32 + 4).to_be_bytes());
		frames.extend_from_slice(&0x0080_u16.to_be_bytes());
		frames.extend_from_slice(&10_u32.to_be_bytes());
		frames.extend_from_slice(&compressed);

		let tag = read(&build_tag(3, 0, &frames, 0), ParsingMode::Strict).unwrap();
		assert_eq!(tag.title().as_deref(), Some("Foo title"));
		assert_eq!(tag.frames().next().unwrap().flags(), FrameFlags::default());
	}

	#[test_log::test]
	fn encrypted_frame_kept_as_binary() {
		// Encryption method 0x80, data length indicator 3
		let frames = b"TIT2\0\0\0\x08\0\x05\x80\0\0\0\x03xyz";
		let tag = read(&build_tag(4, 0, frames, 0), ParsingMode::Strict).unwrap();

		let frame = tag.frames().next().unwrap();
		assert_eq!(frame.value(), &FrameValue::Binary(b"xyz".to_vec()));
		assert_eq!(frame.flags().encryption, Some(0x80));
		assert_eq!(frame.flags().data_length_indicator, Some(3));
		assert_eq!(tag.title(), None);
	}
}
