use crate::util::{self, ID3V2_TAG, dff_chunk, dff_file, temp_file};

use tagcodec::config::{ParseOptions, WriteOptions};
use tagcodec::dsd::dff::{DffCompression, DffFile};
use tagcodec::error::ErrorKind;
use tagcodec::file::{AudioFile, FileType};
use tagcodec::tag::Accessor;

use std::time::Duration;

fn form_size(content: &[u8]) -> u64 {
	u64::from_be_bytes(content[4..12].try_into().unwrap())
}

#[test_log::test]
fn read() {
	let mut file = temp_file(&dff_file(&[dff_chunk(b"ID3 ", ID3V2_TAG)]));
	let tagged_file = tagcodec::read_from(&mut file, ParseOptions::new()).unwrap();

	assert_eq!(tagged_file.file_type(), FileType::Dff);
	assert_eq!(tagged_file.tag().unwrap().title().as_deref(), Some("Foo"));

	let properties = tagged_file.properties();
	assert_eq!(properties.duration(), Duration::from_secs(1));
	assert_eq!(properties.sample_rate(), Some(2_822_400));
	assert_eq!(properties.channels(), Some(2));
}

#[test_log::test]
fn read_concrete() {
	let mut file = temp_file(&dff_file(&[]));
	let dff = DffFile::read_from(&mut file, ParseOptions::new()).unwrap();

	assert!(dff.id3v2().is_none());
	assert_eq!(dff.properties().compression(), DffCompression::Dsd);
	assert_eq!(dff.properties().sample_count(), 2_822_400);
	assert!(dff.properties().loudspeaker_config().is_none());
}

#[test_log::test]
fn unknown_chunk() {
	let mut file = temp_file(&dff_file(&[dff_chunk(b"LIST", b"abcd")]));
	let err = tagcodec::read_from(&mut file, ParseOptions::new()).unwrap_err();

	assert!(matches!(err.kind(), ErrorKind::InvalidChunk(fourcc) if fourcc == b"LIST"));
}

#[test_log::test]
fn write_read_remove() {
	util::round_trip(&dff_file(&[]), FileType::Dff);
}

#[test_log::test]
fn form_size_tracks_tag() {
	let original = dff_file(&[]);
	let mut file = temp_file(&original);

	let tag = util::tag_with(FileType::Dff, "Foo title", "Foo artist");
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();

	let content = util::contents(&mut file);
	assert_eq!(form_size(&content), content.len() as u64 - 12);
	assert_eq!(&content[original.len()..original.len() + 4], b"ID3 ");

	tagcodec::delete_from(&mut file).unwrap();
	assert_eq!(util::contents(&mut file), original);
}

#[test_log::test]
fn replace_keeps_single_chunk() {
	let mut file = temp_file(&dff_file(&[dff_chunk(b"ID3 ", ID3V2_TAG)]));

	let tag = util::tag_with(FileType::Dff, "Bar title", "Bar artist");
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();

	let content = util::contents(&mut file);
	assert_eq!(content.windows(4).filter(|w| *w == b"ID3 ").count(), 1);
	assert_eq!(form_size(&content), content.len() as u64 - 12);

	let read_back = util::read_tag(&mut file).unwrap();
	assert_eq!(read_back.title().as_deref(), Some("Bar title"));
}
