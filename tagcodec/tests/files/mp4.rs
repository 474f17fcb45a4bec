use crate::util::mp4::{AUDIO, assert_chunk_offset_points_at_audio, mp4_file};
use crate::util::{self, temp_file};

use tagcodec::config::{ParseOptions, WriteOptions};
use tagcodec::file::{AudioFile, FileType};
use tagcodec::mp4::constants::{ALBUM, COVER_ART};
use tagcodec::mp4::{DataType, Mp4Codec, Mp4Field, Mp4File, Mp4Ilst};
use tagcodec::tag::{Accessor, Tag};

use std::io::Seek;
use std::time::Duration;

fn read_mp4(file: &mut std::fs::File) -> Mp4File {
	file.rewind().unwrap();
	Mp4File::read_from(file, ParseOptions::new()).unwrap()
}

fn count(content: &[u8], ident: &[u8; 4]) -> usize {
	content.windows(4).filter(|w| w == ident).count()
}

#[test_log::test]
fn read() {
	let mut file = temp_file(&mp4_file());
	let mp4 = Mp4File::read_from(&mut file, ParseOptions::new()).unwrap();

	assert_eq!(mp4.ftyp(), "M4A ");
	assert!(mp4.ilst().is_none());

	let properties = mp4.properties();
	assert_eq!(properties.codec(), Mp4Codec::AAC);
	assert_eq!(properties.duration(), Duration::from_secs(10));
	assert_eq!(properties.sample_rate(), 44100);
	assert_eq!(properties.channels(), 2);
	assert_eq!(properties.bit_depth(), None);
}

#[test_log::test]
fn write_read_remove() {
	util::round_trip(&mp4_file(), FileType::Mp4);
}

#[test_log::test]
fn chunk_offsets_follow_the_audio() {
	let mut file = temp_file(&mp4_file());

	let tag = util::tag_with(FileType::Mp4, "Foo title", "Foo artist");
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();

	let content = util::contents(&mut file);
	assert!(content.ends_with(AUDIO));
	assert_chunk_offset_points_at_audio(&content);

	// Again, with a larger tag
	let mut tag = util::read_tag(&mut file).unwrap();
	tag.set_album(String::from("A".repeat(2048)));
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();

	let content = util::contents(&mut file);
	assert_chunk_offset_points_at_audio(&content);

	// And after removal
	tagcodec::delete_from(&mut file).unwrap();
	let content = util::contents(&mut file);
	assert_chunk_offset_points_at_audio(&content);
	assert!(read_mp4(&mut file).ilst().is_none());
}

#[test_log::test]
fn artwork_shares_one_atom() {
	let mut file = temp_file(&mp4_file());

	let mut ilst = Mp4Ilst::default();
	ilst.set_title(String::from("Foo title"));
	ilst.push(Mp4Field::artwork(DataType::Png, b"\x89PNG first"));
	ilst.push(Mp4Field::artwork(DataType::Jpeg, b"\xFF\xD8\xFF second"));
	ilst.push(Mp4Field::artwork(DataType::Png, b"\x89PNG third"));

	tagcodec::write_to(&mut file, &Tag::Mp4(ilst), WriteOptions::default()).unwrap();

	let content = util::contents(&mut file);
	assert_eq!(count(&content, &COVER_ART), 1);

	let mp4 = read_mp4(&mut file);
	let artwork = mp4.ilst().unwrap().artwork().collect::<Vec<_>>();
	assert_eq!(artwork.len(), 3);

	let first = artwork[0].values().next().unwrap();
	assert_eq!(first.data_type, DataType::Png);
	assert_eq!(first.payload, b"\x89PNG first");

	let second = artwork[1].values().next().unwrap();
	assert_eq!(second.data_type, DataType::Jpeg);
	assert_eq!(second.payload, b"\xFF\xD8\xFF second");
}

#[test_log::test]
fn unknown_items_are_kept() {
	let mut file = temp_file(&mp4_file());

	// A freeform item, which is never interpreted
	let mut freeform = Vec::new();
	for (ident, content) in [
		(b"mean", b"\0\0\0\0com.apple.iTunes".as_slice()),
		(b"name", b"\0\0\0\0iTunNORM".as_slice()),
	] {
		freeform.extend_from_slice(&((content.len() + 8) as u32).to_be_bytes());
		freeform.extend_from_slice(ident);
		freeform.extend_from_slice(content);
	}
	freeform.extend(Mp4Field::text(*b"----", "0000").data());

	let mut ilst = Mp4Ilst::default();
	ilst.push(Mp4Field::new(*b"----", freeform.clone()));
	ilst.push(Mp4Field::text(ALBUM, "Foo album"));

	tagcodec::write_to(&mut file, &Tag::Mp4(ilst), WriteOptions::default()).unwrap();

	let mp4 = read_mp4(&mut file);
	let read_back = mp4.ilst().unwrap();
	assert_eq!(read_back.get(*b"----").unwrap().data(), freeform.as_slice());
	assert_eq!(read_back.album().as_deref(), Some("Foo album"));
}

#[test_log::test]
fn padding() {
	let original = mp4_file();
	let mut file = temp_file(&original);

	let tag = util::tag_with(FileType::Mp4, "Foo title", "Foo artist");
	tagcodec::write_to(
		&mut file,
		&tag,
		WriteOptions::default().preferred_padding(0),
	)
	.unwrap();
	let unpadded = util::contents(&mut file);
	assert_eq!(count(&unpadded, b"free"), 0);

	let mut file = temp_file(&original);
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();
	let padded = util::contents(&mut file);
	assert_eq!(count(&padded, b"free"), 1);
	assert_eq!(padded.len(), unpadded.len() + 1024);
}
