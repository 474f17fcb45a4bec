use crate::util::{self, aiff_file, dsf_file, named_temp_file, temp_file, wav_file};

use tagcodec::config::{ParseOptions, WriteOptions};
use tagcodec::error::ErrorKind;
use tagcodec::file::{AudioFile, FileType};
use tagcodec::probe::Probe;
use tagcodec::tag::{Accessor, Tag, TagType};

use std::io::{Cursor, Seek};

#[test_log::test]
fn unknown_format() {
	let mut file = temp_file(b"This is not an audio file at all");

	let err = tagcodec::read_from(&mut file, ParseOptions::new()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::UnknownFormat));

	let tag = util::tag_with(FileType::Wav, "Foo title", "Foo artist");
	let err = tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::UnknownFormat));
	assert_eq!(util::contents(&mut file), b"This is not an audio file at all");
}

#[test_log::test]
fn unsupported_tag_type() {
	let original = wav_file(&[]);
	let mut file = temp_file(&original);

	let mut tag = Tag::new(TagType::Asf);
	tag.set_title(String::from("Foo title"));

	let err = tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::UnsupportedOperation(_)));
	assert_eq!(util::contents(&mut file), original);

	assert!(!TagType::Asf.is_supported_by(FileType::Wav));
	assert!(TagType::Id3v2.is_supported_by(FileType::Dff));
}

#[test_log::test]
fn insert_unsupported_tag() {
	let mut file = temp_file(&aiff_file(&[]));
	let mut tagged_file = tagcodec::read_from(&mut file, ParseOptions::new()).unwrap();

	assert!(tagged_file.insert_tag(Tag::new(TagType::Mp4Ilst)).is_none());
	assert!(tagged_file.tag().is_none());

	tagged_file.tag_or_insert().set_title(String::from("Foo title"));
	assert_eq!(tagged_file.tag().unwrap().tag_type(), TagType::Id3v2);
}

#[test_log::test]
fn tagged_file_save() {
	let mut file = temp_file(&wav_file(&[]));
	let mut tagged_file = tagcodec::read_from(&mut file, ParseOptions::new()).unwrap();

	tagged_file.tag_or_insert().set_artist(String::from("Foo artist"));
	tagged_file.save_to(&mut file, WriteOptions::default()).unwrap();

	let read_back = util::read_tag(&mut file).unwrap();
	assert_eq!(read_back.artist().as_deref(), Some("Foo artist"));

	// Saving without a tag strips it
	let _ = tagged_file.remove_tag();
	tagged_file.save_to(&mut file, WriteOptions::default()).unwrap();
	assert!(util::read_tag(&mut file).is_none());
}

#[test_log::test]
fn tag_type_remove_from() {
	let mut file = temp_file(&dsf_file(4096));

	let tag = util::tag_with(FileType::Dsf, "Foo title", "Foo artist");
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();
	assert!(util::read_tag(&mut file).is_some());

	TagType::Id3v2.remove_from(&mut file).unwrap();
	assert_eq!(util::contents(&mut file), dsf_file(4096));
}

#[test_log::test]
fn path_functions() {
	let file = named_temp_file(&dsf_file(4096), "dsf");
	let path = file.path();

	assert!(tagcodec::read_tag(path).unwrap().is_none());

	let properties = tagcodec::read_audio_properties(path).unwrap();
	assert_eq!(properties.channels(), Some(2));
	assert_eq!(properties.sample_rate(), Some(2_822_400));

	let tag = util::tag_with(FileType::Dsf, "Foo title", "Foo artist");
	tagcodec::write_tag(path, &tag).unwrap();

	let tagged_file = tagcodec::read_from_path(path).unwrap();
	assert_eq!(tagged_file.file_type(), FileType::Dsf);
	assert_eq!(tagged_file.tag().unwrap().title().as_deref(), Some("Foo title"));

	tagcodec::delete_tag(path).unwrap();
	assert!(tagcodec::read_tag(path).unwrap().is_none());
}

#[test_log::test]
fn read_tag_skips_properties() {
	let file = named_temp_file(&wav_file(&[]), "wav");
	let tag = util::tag_with(FileType::Wav, "Foo title", "Foo artist");
	tagcodec::write_tag_with_options(file.path(), &tag, WriteOptions::default()).unwrap();

	let tag = tagcodec::read_tag_with_options(
		file.path(),
		ParseOptions::new().read_properties(false),
	)
	.unwrap()
	.unwrap();
	assert_eq!(tag.title().as_deref(), Some("Foo title"));
}

#[test_log::test]
fn missing_path() {
	let err = tagcodec::read_from_path("this/file/does/not/exist.wav").unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::Io(_)));
}

#[test_log::test]
fn probe_in_memory() {
	let content = util::flac_file(&[]);

	let probe = Probe::new(Cursor::new(content.clone()))
		.guess_file_type()
		.unwrap();
	assert_eq!(probe.file_type(), Some(FileType::Flac));

	let tagged_file = probe.read().unwrap();
	assert_eq!(tagged_file.file_type(), FileType::Flac);
	assert!(tagged_file.tag().is_none());
	assert_eq!(tagged_file.properties().sample_rate(), Some(44100));

	// An explicit type skips guessing
	let mut cursor = Cursor::new(content);
	cursor.rewind().unwrap();
	let err = Probe::with_file_type(&mut cursor, FileType::Wav)
		.read()
		.unwrap_err();
	assert!(err.is_read_error());
}

#[test_log::test]
fn content_beats_extension() {
	// An AIFF file with the wrong extension
	let file = named_temp_file(&aiff_file(&[]), "wav");

	let tagged_file = tagcodec::read_from_path(file.path()).unwrap();
	assert_eq!(tagged_file.file_type(), FileType::Aiff);
}
