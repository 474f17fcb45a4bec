use crate::util::{self, ID3V2_TAG, dsf_file, temp_file};

use tagcodec::config::{ParseOptions, WriteOptions};
use tagcodec::dsd::dsf::DsfFile;
use tagcodec::file::{AudioFile, FileType};
use tagcodec::tag::Accessor;

use std::io::Seek;
use std::time::Duration;

// One second of stereo DSD64
const DATA_LEN: usize = 705_600;

fn header_fields(content: &[u8]) -> (u64, u64) {
	let file_length = u64::from_le_bytes(content[12..20].try_into().unwrap());
	let metadata_offset = u64::from_le_bytes(content[20..28].try_into().unwrap());
	(file_length, metadata_offset)
}

fn with_tag() -> Vec<u8> {
	let mut content = dsf_file(DATA_LEN);
	let offset = content.len() as u64;
	content.extend_from_slice(ID3V2_TAG);

	let len = content.len() as u64;
	content[12..20].copy_from_slice(&len.to_le_bytes());
	content[20..28].copy_from_slice(&offset.to_le_bytes());
	content
}

#[test_log::test]
fn read_untagged() {
	let mut file = temp_file(&dsf_file(DATA_LEN));
	let dsf = DsfFile::read_from(&mut file, ParseOptions::new()).unwrap();

	assert!(dsf.id3v2().is_none());
	assert_eq!(dsf.header().metadata_offset, 0);

	let properties = dsf.properties();
	assert_eq!(properties.sample_rate(), 2_822_400);
	assert_eq!(properties.channels(), 2);
	assert_eq!(properties.bits_per_sample(), 1);
	assert_eq!(properties.sample_count(), 2_822_400);
	assert_eq!(properties.block_size_per_channel(), 4096);
	assert_eq!(properties.duration(), Duration::from_secs(1));
}

#[test_log::test]
fn read_tagged() {
	let mut file = temp_file(&with_tag());
	let tagged_file = tagcodec::read_from(&mut file, ParseOptions::new()).unwrap();

	assert_eq!(tagged_file.file_type(), FileType::Dsf);
	assert_eq!(tagged_file.tag().unwrap().title().as_deref(), Some("Foo"));
	assert_eq!(tagged_file.properties().channels(), Some(2));
	assert_eq!(tagged_file.properties().bit_depth(), Some(1));
}

#[test_log::test]
fn append_sets_header() {
	let original = dsf_file(DATA_LEN);
	let mut file = temp_file(&original);

	let tag = util::tag_with(FileType::Dsf, "Foo title", "Foo artist");
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();

	let content = util::contents(&mut file);
	let (file_length, metadata_offset) = header_fields(&content);
	assert_eq!(metadata_offset, original.len() as u64);
	assert_eq!(file_length, content.len() as u64);
	assert_eq!(&content[original.len()..original.len() + 3], b"ID3");

	// The audio is untouched
	assert_eq!(&content[28..original.len()], &original[28..]);
}

#[test_log::test]
fn replace_truncates() {
	let mut file = temp_file(&with_tag());
	let offset = dsf_file(DATA_LEN).len() as u64;

	let tag = util::tag_with(FileType::Dsf, "Bar title", "Bar artist");
	tagcodec::write_to(
		&mut file,
		&tag,
		WriteOptions::default().preferred_padding(0),
	)
	.unwrap();

	let content = util::contents(&mut file);
	let (file_length, metadata_offset) = header_fields(&content);
	assert_eq!(metadata_offset, offset);
	assert_eq!(file_length, content.len() as u64);

	file.rewind().unwrap();
	let dsf = DsfFile::read_from(&mut file, ParseOptions::new()).unwrap();
	assert_eq!(dsf.id3v2().unwrap().get_text("TIT2"), Some("Bar title"));
	assert_eq!(dsf.id3v2().unwrap().get_text("TPE1"), Some("Bar artist"));
}

#[test_log::test]
fn write_read_remove() {
	util::round_trip(&dsf_file(DATA_LEN), FileType::Dsf);
}

#[test_log::test]
fn strip_restores_original() {
	let original = dsf_file(DATA_LEN);
	let mut file = temp_file(&with_tag());

	tagcodec::delete_from(&mut file).unwrap();
	assert_eq!(util::contents(&mut file), original);

	// Nothing left to remove
	tagcodec::delete_from(&mut file).unwrap();
	assert_eq!(util::contents(&mut file), original);
}

#[test_log::test]
fn bad_metadata_offset() {
	let mut content = dsf_file(DATA_LEN);
	// Points into the audio
	content[20..28].copy_from_slice(&100_u64.to_le_bytes());
	let mut file = temp_file(&content);

	let tag = util::tag_with(FileType::Dsf, "Foo title", "Foo artist");
	let err = tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap_err();
	assert!(err.is_write_error());
	assert_eq!(util::contents(&mut file), content);
}
