use crate::util::{self, ID3V2_TAG, flac_file, temp_file};

use tagcodec::config::{ParseOptions, ParsingMode, WriteOptions};
use tagcodec::file::{AudioFile, FileType};
use tagcodec::flac::{FlacFile, FlacPicture};
use tagcodec::tag::{Accessor, Tag};

use std::io::Seek;
use std::time::Duration;

const PADDING: u8 = 1;
const VORBIS_COMMENT: u8 = 4;
const PICTURE: u8 = 6;

fn comments(items: &[&str]) -> Vec<u8> {
	let mut content = b"\x06\0\0\0vendor".to_vec();
	content.extend_from_slice(&(items.len() as u32).to_le_bytes());
	for item in items {
		content.extend_from_slice(&(item.len() as u32).to_le_bytes());
		content.extend_from_slice(item.as_bytes());
	}
	content
}

fn picture() -> FlacPicture {
	FlacPicture {
		picture_type: 3,
		mime_type: String::from("image/png"),
		description: String::from("Front"),
		width: 1,
		height: 1,
		color_depth: 24,
		num_colors: 0,
		data: b"\x89PNG\r\n\x1a\n".to_vec(),
	}
}

#[test_log::test]
fn read() {
	let content = flac_file(&[(
		VORBIS_COMMENT,
		comments(&["TITLE=Foo title", "ARTIST=Foo artist", "ARTIST=Bar artist"]),
	)]);
	let mut file = temp_file(&content);

	let flac = FlacFile::read_from(&mut file, ParseOptions::new()).unwrap();
	let tag = flac.tag().unwrap();
	assert_eq!(tag.title().as_deref(), Some("Foo title"));
	assert_eq!(tag.comments().vendor(), "vendor");
	assert_eq!(
		tag.comments().get_all("artist").collect::<Vec<_>>(),
		["Foo artist", "Bar artist"]
	);

	let properties = flac.properties();
	assert_eq!(properties.duration(), Duration::from_secs(10));
	assert_eq!(properties.sample_rate(), 44100);
	assert_eq!(properties.channels(), 2);
	assert_eq!(properties.bit_depth(), 16);
	assert_eq!(properties.total_samples(), 441_000);
}

#[test_log::test]
fn zero_length_stream_info() {
	let mut content = b"fLaC".to_vec();
	content.extend_from_slice(&[0x80, 0, 0, 0]);
	content.extend_from_slice(&[0xFF, 0xF8, 0x69, 0x08]);
	let mut file = temp_file(&content);

	let err = tagcodec::read_from(&mut file, ParseOptions::new()).unwrap_err();
	assert!(err.is_read_error());
}

#[test_log::test]
fn write_read_remove() {
	util::round_trip(&flac_file(&[]), FileType::Flac);
}

#[test_log::test]
fn padding_is_reused() {
	let content = flac_file(&[
		(VORBIS_COMMENT, comments(&["TITLE=Foo title"])),
		(PADDING, vec![0; 2048]),
	]);
	let mut file = temp_file(&content);

	let tag = util::tag_with(FileType::Flac, "A longer title", "Foo artist");
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();

	// The audio frames didn't move
	let written = util::contents(&mut file);
	assert_eq!(written.len(), content.len());
	assert!(written.ends_with(&[0xFF, 0xF8, 0x69, 0x08, 0, 0, 0, 0]));

	let read_back = util::read_tag(&mut file).unwrap();
	assert_eq!(read_back.title().as_deref(), Some("A longer title"));
	assert_eq!(read_back.artist().as_deref(), Some("Foo artist"));
}

#[test_log::test]
fn vendor_is_kept() {
	let mut file = temp_file(&flac_file(&[(VORBIS_COMMENT, comments(&["TITLE=Foo"]))]));

	let mut tag = util::read_tag(&mut file).unwrap();
	tag.set_album(String::from("Foo album"));
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();

	file.rewind().unwrap();
	let flac = FlacFile::read_from(&mut file, ParseOptions::new()).unwrap();
	let comments = flac.tag().unwrap().comments();
	assert_eq!(comments.vendor(), "vendor");
	assert_eq!(comments.get("ALBUM"), Some("Foo album"));
}

#[test_log::test]
fn pictures() {
	let mut file = temp_file(&flac_file(&[]));

	let mut tag = util::tag_with(FileType::Flac, "Foo title", "Foo artist");
	let Tag::Flac(flac_tag) = &mut tag else {
		panic!("Expected a FLAC tag");
	};
	flac_tag.push_picture(picture());
	flac_tag.push_picture(FlacPicture {
		picture_type: 4,
		..picture()
	});
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();

	file.rewind().unwrap();
	let flac = FlacFile::read_from(&mut file, ParseOptions::new()).unwrap();
	let pictures = flac.tag().unwrap().pictures();
	assert_eq!(pictures.len(), 2);
	assert_eq!(pictures[0], picture());
	assert_eq!(pictures[1].picture_type, 4);

	// Skipping cover art leaves only the comments
	file.rewind().unwrap();
	let flac =
		FlacFile::read_from(&mut file, ParseOptions::new().read_cover_art(false)).unwrap();
	assert!(flac.tag().unwrap().pictures().is_empty());
	assert_eq!(flac.tag().unwrap().title().as_deref(), Some("Foo title"));
}

#[test_log::test]
fn bad_picture() {
	let content = flac_file(&[
		(VORBIS_COMMENT, comments(&["TITLE=Foo"])),
		(PICTURE, vec![0; 8]),
	]);

	let mut file = temp_file(&content);
	let flac = FlacFile::read_from(&mut file, ParseOptions::new()).unwrap();
	assert!(flac.tag().unwrap().pictures().is_empty());

	let mut file = temp_file(&content);
	let strict = ParseOptions::new().parsing_mode(ParsingMode::Strict);
	assert!(FlacFile::read_from(&mut file, strict).is_err());
}

#[test_log::test]
fn id3v2_in_front() {
	let mut content = ID3V2_TAG.to_vec();
	content.extend(flac_file(&[]));
	let mut file = temp_file(&content);

	let flac = FlacFile::read_from(&mut file, ParseOptions::new()).unwrap();
	assert_eq!(flac.id3v2().unwrap().get_text("TIT2"), Some("Foo"));
	assert!(flac.tag().is_none());

	// The format is found behind the ID3v2 tag, which is left alone
	let tag = util::tag_with(FileType::Flac, "Foo title", "Foo artist");
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();

	let written = util::contents(&mut file);
	assert!(written.starts_with(ID3V2_TAG));

	file.rewind().unwrap();
	let tagged_file = tagcodec::read_from(&mut file, ParseOptions::new()).unwrap();
	assert_eq!(tagged_file.file_type(), FileType::Flac);
	assert_eq!(tagged_file.tag().unwrap().title().as_deref(), Some("Foo title"));
}
