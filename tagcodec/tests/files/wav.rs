use crate::util::{self, ID3V2_TAG, temp_file, wav_file};

use tagcodec::config::{ParseOptions, WriteOptions};
use tagcodec::file::{AudioFile, FileType};
use tagcodec::iff::wav::{WavFile, WavFormat};
use tagcodec::tag::{Accessor, Tag};

use std::time::Duration;

fn id3_chunk(name: &[u8; 4]) -> Vec<u8> {
	let mut chunk = name.to_vec();
	chunk.extend_from_slice(&(ID3V2_TAG.len() as u32).to_le_bytes());
	chunk.extend_from_slice(ID3V2_TAG);
	if ID3V2_TAG.len() % 2 != 0 {
		chunk.push(0);
	}
	chunk
}

#[test_log::test]
fn read() {
	let mut file = temp_file(&wav_file(&id3_chunk(b"ID3 ")));
	let tagged_file = tagcodec::read_from(&mut file, ParseOptions::new()).unwrap();

	assert_eq!(tagged_file.file_type(), FileType::Wav);
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
	let mut file = temp_file(&wav_file(&id3_chunk(b"id3 ")));
	let wav = WavFile::read_from(&mut file, ParseOptions::new()).unwrap();

	assert_eq!(wav.properties().format(), WavFormat::PCM);
	assert_eq!(wav.id3v2().unwrap().get_text("TIT2"), Some("Foo"));
}

#[test_log::test]
fn read_without_tags() {
	let mut file = temp_file(&wav_file(&id3_chunk(b"ID3 ")));
	let tagged_file =
		tagcodec::read_from(&mut file, ParseOptions::new().read_tags(false)).unwrap();

	assert!(tagged_file.tag().is_none());
	assert_eq!(tagged_file.properties().sample_rate(), Some(44100));
}

#[test_log::test]
fn write_read_remove() {
	util::round_trip(&wav_file(&[]), FileType::Wav);
}

#[test_log::test]
fn strip_restores_original() {
	let original = wav_file(&[]);
	let mut file = temp_file(&original);

	let tag = util::tag_with(FileType::Wav, "Foo title", "Foo artist");
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();
	assert_ne!(util::contents(&mut file), original);

	tagcodec::delete_from(&mut file).unwrap();
	assert_eq!(util::contents(&mut file), original);
}

#[test_log::test]
fn riff_size_tracks_tag() {
	let mut file = temp_file(&wav_file(&[]));

	let tag = util::tag_with(FileType::Wav, "Foo title", "Foo artist");
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();

	let content = util::contents(&mut file);
	let riff_size = u32::from_le_bytes(content[4..8].try_into().unwrap());
	assert_eq!(riff_size as usize, content.len() - 8);
}

#[test_log::test]
fn lowercase_chunk_name() {
	let mut file = temp_file(&wav_file(&[]));

	let tag = util::tag_with(FileType::Wav, "Foo title", "Foo artist");
	tagcodec::write_to(
		&mut file,
		&tag,
		WriteOptions::default().uppercase_id3v2_chunk(false),
	)
	.unwrap();

	let content = util::contents(&mut file);
	assert!(content.windows(4).any(|w| w == b"id3 "));
	assert!(!content.windows(4).any(|w| w == b"ID3 "));

	// An existing chunk is replaced regardless of its case
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();
	let content = util::contents(&mut file);
	assert!(!content.windows(4).any(|w| w == b"id3 "));
	assert_eq!(content.windows(4).filter(|w| *w == b"ID3 ").count(), 1);
}

#[test_log::test]
fn replace_existing_tag() {
	let mut file = temp_file(&wav_file(&id3_chunk(b"ID3 ")));

	let mut tag = util::read_tag(&mut file).unwrap();
	tag.set_album(String::from("Foo album"));
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();

	let read_back = util::read_tag(&mut file).unwrap();
	assert_eq!(read_back.title().as_deref(), Some("Foo"));
	assert_eq!(read_back.album().as_deref(), Some("Foo album"));

	let Tag::Id3v2(id3v2) = read_back else {
		panic!("Expected an ID3v2 tag");
	};
	assert_eq!(id3v2.get_text("TALB"), Some("Foo album"));
}

#[test_log::test]
fn undersized_riff_chunk() {
	let mut content = wav_file(&[]);
	content[4..8].copy_from_slice(&0_u32.to_le_bytes());

	let mut file = temp_file(&content);
	let tag = util::tag_with(FileType::Wav, "Foo title", "Bar artist");
	let err = tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap_err();

	assert!(err.is_write_error());
	assert_eq!(util::contents(&mut file), content);
}
