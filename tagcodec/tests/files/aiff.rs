use crate::util::{self, ID3V2_TAG, aiff_file, temp_file};

use tagcodec::config::{ParseOptions, WriteOptions};
use tagcodec::file::{AudioFile, FileType};
use tagcodec::iff::aiff::AiffFile;
use tagcodec::tag::Accessor;

use std::time::Duration;

fn id3_chunk() -> Vec<u8> {
	let mut chunk = b"ID3 ".to_vec();
	chunk.extend_from_slice(&(ID3V2_TAG.len() as u32).to_be_bytes());
	chunk.extend_from_slice(ID3V2_TAG);
	chunk
}

#[test_log::test]
fn read() {
	let mut file = temp_file(&aiff_file(&id3_chunk()));
	let tagged_file = tagcodec::read_from(&mut file, ParseOptions::new()).unwrap();

	assert_eq!(tagged_file.file_type(), FileType::Aiff);
	assert_eq!(tagged_file.tag().unwrap().title().as_deref(), Some("Foo"));

	let properties = tagged_file.properties();
	assert_eq!(properties.duration(), Duration::from_secs(1));
	assert_eq!(properties.sample_rate(), Some(44100));
	assert_eq!(properties.channels(), Some(2));
	assert_eq!(properties.bit_depth(), Some(16));
	assert_eq!(properties.audio_bitrate(), Some(1411));
}

#[test_log::test]
fn read_concrete() {
	let mut file = temp_file(&aiff_file(&[]));
	let aiff = AiffFile::read_from(&mut file, ParseOptions::new()).unwrap();

	assert!(aiff.id3v2().is_none());
	assert_eq!(aiff.properties().sample_size(), 16);
	assert_eq!(aiff.properties().channels(), 2);
	assert!(aiff.properties().compression().is_none());
}

#[test_log::test]
fn write_read_remove() {
	util::round_trip(&aiff_file(&[]), FileType::Aiff);
}

#[test_log::test]
fn strip_restores_original() {
	let original = aiff_file(&[]);
	let mut file = temp_file(&original);

	let tag = util::tag_with(FileType::Aiff, "Foo title", "Foo artist");
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();

	let content = util::contents(&mut file);
	let form_size = u32::from_be_bytes(content[4..8].try_into().unwrap());
	assert_eq!(form_size as usize, content.len() - 8);

	tagcodec::delete_from(&mut file).unwrap();
	assert_eq!(util::contents(&mut file), original);
}

#[test_log::test]
fn tag_stays_in_place() {
	// A chunk after the tag must stay after it
	let mut extra = id3_chunk();
	extra.extend_from_slice(b"NAME\0\0\0\x04Song");
	let mut file = temp_file(&aiff_file(&extra));

	let tag = util::tag_with(FileType::Aiff, "A much longer title", "Foo artist");
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();

	let content = util::contents(&mut file);
	let id3 = content.windows(4).position(|w| w == b"ID3 ").unwrap();
	let name = content.windows(4).position(|w| w == b"NAME").unwrap();
	assert!(id3 < name);
	assert!(content.ends_with(b"NAME\0\0\0\x04Song"));

	let read_back = util::read_tag(&mut file).unwrap();
	assert_eq!(read_back.title().as_deref(), Some("A much longer title"));
}

#[test_log::test]
fn undersized_form_chunk() {
	let mut content = aiff_file(&[]);
	content[4..8].copy_from_slice(&2_u32.to_be_bytes());

	let mut file = temp_file(&content);
	let tag = util::tag_with(FileType::Aiff, "Foo title", "Bar artist");
	let err = tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap_err();

	assert!(err.is_write_error());
	assert_eq!(util::contents(&mut file), content);
}
