use crate::util::asf::{asf_file, extension, header_child_count, object};
use crate::util::{self, temp_file};

use tagcodec::asf::guid::{CONTENT_DESCRIPTION_OBJECT, HEADER_EXTENSION_OBJECT, METADATA_OBJECT};
use tagcodec::asf::{AsfField, AsfFile, AsfTag, AsfValue, ContentBranding};
use tagcodec::config::{ParseOptions, WriteOptions};
use tagcodec::file::{AudioFile, FileType};
use tagcodec::tag::{Accessor, Tag};

use std::io::Seek;
use std::time::Duration;

fn utf16(value: &str) -> Vec<u8> {
	value
		.encode_utf16()
		.chain(std::iter::once(0))
		.flat_map(u16::to_le_bytes)
		.collect()
}

// Title and author only
fn content_description(title: &str, author: &str) -> Vec<u8> {
	let (title, author) = (utf16(title), utf16(author));

	let mut content = Vec::new();
	content.extend_from_slice(&(title.len() as u16).to_le_bytes());
	content.extend_from_slice(&(author.len() as u16).to_le_bytes());
	content.extend_from_slice(&[0; 6]);
	content.extend(title);
	content.extend(author);

	object(CONTENT_DESCRIPTION_OBJECT, &content)
}

fn read_asf(file: &mut std::fs::File) -> AsfFile {
	file.rewind().unwrap();
	AsfFile::read_from(file, ParseOptions::new()).unwrap()
}

fn object_position(content: &[u8], guid: [u8; 16]) -> Option<usize> {
	content.windows(16).position(|w| w == guid)
}

#[test_log::test]
fn read() {
	let mut file = temp_file(&asf_file(&[content_description("Foo title", "Foo artist")]));
	let tagged_file = tagcodec::read_from(&mut file, ParseOptions::new()).unwrap();

	assert_eq!(tagged_file.file_type(), FileType::Asf);

	let tag = tagged_file.tag().unwrap();
	assert_eq!(tag.title().as_deref(), Some("Foo title"));
	assert_eq!(tag.artist().as_deref(), Some("Foo artist"));

	let properties = tagged_file.properties();
	assert_eq!(properties.duration(), Duration::from_secs(10));
	assert_eq!(properties.sample_rate(), Some(44100));
	assert_eq!(properties.channels(), Some(2));
	assert_eq!(properties.bit_depth(), Some(16));
	assert_eq!(properties.audio_bitrate(), Some(128));
}

#[test_log::test]
fn read_concrete() {
	let mut file = temp_file(&asf_file(&[]));
	let asf = AsfFile::read_from(&mut file, ParseOptions::new()).unwrap();

	assert!(asf.tag().is_none());
	assert_eq!(asf.properties().codec_id(), 0x0161);
	assert_eq!(asf.properties().preroll(), Duration::from_secs(3));
}

#[test_log::test]
fn write_read_remove() {
	util::round_trip(&asf_file(&[]), FileType::Asf);
}

#[test_log::test]
fn content_description_replaced_in_place() {
	// One DWORD record for stream 1, which only a Metadata object can hold
	let name = utf16("WM/Foo");
	let mut record = 1_u16.to_le_bytes().to_vec();
	record.extend_from_slice(&0_u16.to_le_bytes());
	record.extend_from_slice(&1_u16.to_le_bytes());
	record.extend_from_slice(&(name.len() as u16).to_le_bytes());
	record.extend_from_slice(&3_u16.to_le_bytes());
	record.extend_from_slice(&4_u32.to_le_bytes());
	record.extend(name);
	record.extend_from_slice(&7_u32.to_le_bytes());

	let header_extension = extension(&[object(METADATA_OBJECT, &record)]);
	let original = asf_file(&[
		content_description("Foo title", "Foo artist"),
		header_extension.clone(),
	]);
	let mut file = temp_file(&original);

	let mut tag = util::read_tag(&mut file).unwrap();
	tag.set_title(String::from("Bar title"));
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();

	let content = util::contents(&mut file);
	assert_eq!(header_child_count(&content), header_child_count(&original));
	assert_eq!(
		object_position(&content, CONTENT_DESCRIPTION_OBJECT.as_bytes()),
		object_position(&original, CONTENT_DESCRIPTION_OBJECT.as_bytes())
	);

	// The extension is carried over byte for byte, with its single child
	let position = object_position(&content, HEADER_EXTENSION_OBJECT.as_bytes()).unwrap();
	assert_eq!(
		&content[position..position + header_extension.len()],
		&header_extension[..]
	);
	assert_eq!(
		content.windows(16).filter(|w| *w == METADATA_OBJECT.as_bytes()).count(),
		1
	);

	let asf = read_asf(&mut file);
	let asf_tag = asf.tag().unwrap();
	assert_eq!(asf_tag.title, "Bar title");
	assert_eq!(asf_tag.author, "Foo artist");

	let field = asf_tag.get("WM/Foo").unwrap();
	assert_eq!(field.value, AsfValue::Dword(7));
	assert_eq!(field.stream, 1);

	// The data object is untouched
	assert!(content.ends_with(&[0xAA; 76]));
}

#[test_log::test]
fn file_size_is_updated() {
	let mut file = temp_file(&asf_file(&[]));

	let tag = util::tag_with(FileType::Asf, "Foo title", "Foo artist");
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();

	let content = util::contents(&mut file);
	let header_size = u64::from_le_bytes(content[16..24].try_into().unwrap());
	assert_eq!(header_size as usize, content.len() - (24 + 76));

	// Header object + File Properties header + file ID
	let position = 30 + 24 + 16;
	let file_size = u64::from_le_bytes(content[position..position + 8].try_into().unwrap());
	assert_eq!(file_size as usize, content.len());
}

#[test_log::test]
fn fields_round_trip() {
	let mut file = temp_file(&asf_file(&[extension(&[])]));

	let mut asf_tag = AsfTag::default();
	asf_tag.set_album(String::from("Foo album"));
	asf_tag.push(AsfField::new("WM/TrackNumber", AsfValue::Dword(5)));
	asf_tag.push(AsfField::new("WM/IsCompilation", AsfValue::Bool(true)));
	asf_tag.push(AsfField {
		stream: 1,
		..AsfField::new("WM/SharedUserRating", AsfValue::Bool(false))
	});
	asf_tag.push(AsfField {
		language: 1,
		..AsfField::new("WM/Lyrics", AsfValue::Unicode(String::from("La la la")))
	});
	asf_tag.push(AsfField::new("WM/Picture", AsfValue::Binary(vec![0x42; 70_000])));

	tagcodec::write_to(&mut file, &Tag::Asf(asf_tag.clone()), WriteOptions::default()).unwrap();

	let asf = read_asf(&mut file);
	let read_back = asf.tag().unwrap();
	assert_eq!(read_back.fields().len(), asf_tag.fields().len());
	for field in asf_tag.fields() {
		assert!(
			read_back.fields().contains(field),
			"{} wasn't read back",
			field.name
		);
	}

	// The stream-bound field needed the Metadata object, inside the header extension
	let content = util::contents(&mut file);
	assert!(object_position(&content, METADATA_OBJECT.as_bytes()).is_some());
	assert_eq!(read_back.album().as_deref(), Some("Foo album"));
}

#[test_log::test]
fn content_branding() {
	let mut file = temp_file(&asf_file(&[]));

	let branding = ContentBranding {
		banner_image_type: 2,
		banner_image_data: vec![0xFF, 0xD8, 0xFF],
		banner_image_url: String::from("http://example.com/banner"),
		copyright_url: String::from("http://example.com/copyright"),
	};

	let mut asf_tag = AsfTag::default();
	asf_tag.branding = Some(branding.clone());
	tagcodec::write_to(&mut file, &Tag::Asf(asf_tag), WriteOptions::default()).unwrap();

	let asf = read_asf(&mut file);
	assert_eq!(asf.tag().unwrap().branding, Some(branding));
}

#[test_log::test]
fn removal_drops_every_metadata_object() {
	let original = asf_file(&[
		content_description("Foo title", "Foo artist"),
		extension(&[object(METADATA_OBJECT, &[0, 0])]),
	]);
	let mut file = temp_file(&original);

	tagcodec::delete_from(&mut file).unwrap();

	let content = util::contents(&mut file);
	assert!(object_position(&content, CONTENT_DESCRIPTION_OBJECT.as_bytes()).is_none());
	assert!(object_position(&content, METADATA_OBJECT.as_bytes()).is_none());
	assert!(read_asf(&mut file).tag().is_none());
}
