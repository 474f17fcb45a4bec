use tagcodec::config::{ParseOptions, WriteOptions};
use tagcodec::file::{AudioFile, FileType};
use tagcodec::tag::{Accessor, Tag};

use std::fs::File;
use std::io::{Read as _, Seek as _, Write as _};

use tempfile::NamedTempFile;

/// An ID3v2.4 tag with a single `TIT2` frame of "Foo"
pub const ID3V2_TAG: &[u8] = b"ID3\x04\0\0\0\0\0\x0eTIT2\0\0\0\x04\0\0\x03Foo";

/// Create a new temporary file holding `content`
pub fn temp_file(content: &[u8]) -> File {
	let mut file = tempfile::tempfile().unwrap();
	file.write_all(content).unwrap();
	file.rewind().unwrap();

	file
}

/// Create a new named temporary file holding `content`, for the path based functions
pub fn named_temp_file(content: &[u8], extension: &str) -> NamedTempFile {
	let mut file = tempfile::Builder::new()
		.suffix(&format!(".{extension}"))
		.tempfile()
		.unwrap();
	file.write_all(content).unwrap();
	file.flush().unwrap();

	file
}

pub fn contents(file: &mut File) -> Vec<u8> {
	let mut content = Vec::new();
	file.rewind().unwrap();
	file.read_to_end(&mut content).unwrap();
	content
}

/// The file's tag, read through the generic path
pub fn read_tag(file: &mut File) -> Option<Tag> {
	file.rewind().unwrap();
	tagcodec::read_from(file, ParseOptions::new()).unwrap().tag().cloned()
}

pub fn tag_with(file_type: FileType, title: &str, artist: &str) -> Tag {
	let mut tag = Tag::new(file_type.primary_tag_type());
	tag.set_title(String::from(title));
	tag.set_artist(String::from(artist));
	tag
}

/// This will:
///
/// * Verify that `content` is read as `file_type`
/// * Write a tag, and read it back
/// * Write the same tag again, expecting identical bytes
/// * Replace the tag
/// * Remove the tag, and remove it again
pub fn round_trip(content: &[u8], file_type: FileType) {
	let mut file = temp_file(content);

	let tagged_file = tagcodec::read_from(&mut file, ParseOptions::new()).unwrap();
	assert_eq!(tagged_file.file_type(), file_type);
	assert!(!tagged_file.contains_tag());

	println!("WRITE: Writing a {:?} tag", file_type.primary_tag_type());
	let tag = tag_with(file_type, "Foo title", "Foo artist");
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();

	let read_back = read_tag(&mut file).unwrap();
	assert_eq!(read_back.title().as_deref(), Some("Foo title"));
	assert_eq!(read_back.artist().as_deref(), Some("Foo artist"));

	let first_write = contents(&mut file);
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();
	assert_eq!(contents(&mut file), first_write);

	println!("WRITE: Replacing the tag");
	let tag = tag_with(file_type, "Bar title", "Bar artist");
	tagcodec::write_to(&mut file, &tag, WriteOptions::default()).unwrap();

	let read_back = read_tag(&mut file).unwrap();
	assert_eq!(read_back.title().as_deref(), Some("Bar title"));
	assert_eq!(read_back.artist().as_deref(), Some("Bar artist"));

	println!("WRITE: Removing the tag");
	tagcodec::delete_from(&mut file).unwrap();
	assert!(read_tag(&mut file).is_none());

	let stripped = contents(&mut file);
	tagcodec::delete_from(&mut file).unwrap();
	assert_eq!(contents(&mut file), stripped);

	// The audio is still readable
	file.rewind().unwrap();
	let tagged_file = tagcodec::file::TaggedFile::read_from(&mut file, ParseOptions::new()).unwrap();
	assert_eq!(tagged_file.file_type(), file_type);
}

/// One second of 16-bit stereo PCM at 44.1kHz, followed by `extra`
pub fn wav_file(extra: &[u8]) -> Vec<u8> {
	let mut chunks = Vec::new();
	chunks.extend_from_slice(b"fmt \x10\0\0\0");
	chunks.extend_from_slice(&1_u16.to_le_bytes());
	chunks.extend_from_slice(&2_u16.to_le_bytes());
	chunks.extend_from_slice(&44100_u32.to_le_bytes());
	chunks.extend_from_slice(&176_400_u32.to_le_bytes());
	chunks.extend_from_slice(&4_u16.to_le_bytes());
	chunks.extend_from_slice(&16_u16.to_le_bytes());
	chunks.extend_from_slice(b"data");
	chunks.extend_from_slice(&176_400_u32.to_le_bytes());
	chunks.resize(chunks.len() + 176_400, 0);
	chunks.extend_from_slice(extra);

	let mut file = b"RIFF".to_vec();
	file.extend_from_slice(&(chunks.len() as u32 + 4).to_le_bytes());
	file.extend_from_slice(b"WAVE");
	file.extend(chunks);
	file
}

/// One second of 16-bit stereo audio at 44.1kHz, followed by `extra`
pub fn aiff_file(extra: &[u8]) -> Vec<u8> {
	// 44100 as an 80-bit extended float
	const RATE_44100: [u8; 10] = [0x40, 0x0E, 0xAC, 0x44, 0, 0, 0, 0, 0, 0];

	let mut chunks = b"COMM\0\0\0\x12".to_vec();
	chunks.extend_from_slice(&2_u16.to_be_bytes());
	chunks.extend_from_slice(&44100_u32.to_be_bytes());
	chunks.extend_from_slice(&16_u16.to_be_bytes());
	chunks.extend_from_slice(&RATE_44100);

	chunks.extend_from_slice(b"SSND");
	chunks.extend_from_slice(&176_408_u32.to_be_bytes());
	chunks.resize(chunks.len() + 176_408, 0);
	chunks.extend_from_slice(extra);

	let mut file = b"FORM".to_vec();
	file.extend_from_slice(&(chunks.len() as u32 + 4).to_be_bytes());
	file.extend_from_slice(b"AIFF");
	file.extend(chunks);
	file
}

/// A stereo DSD64 DSF file with `data_len` bytes of audio
pub fn dsf_file(data_len: usize) -> Vec<u8> {
	let mut file = Vec::new();
	file.extend_from_slice(b"DSD ");
	file.extend_from_slice(&28_u64.to_le_bytes());
	file.extend_from_slice(&0_u64.to_le_bytes());
	file.extend_from_slice(&0_u64.to_le_bytes());

	file.extend_from_slice(b"fmt ");
	file.extend_from_slice(&52_u64.to_le_bytes());
	file.extend_from_slice(&1_u32.to_le_bytes());
	file.extend_from_slice(&0_u32.to_le_bytes());
	file.extend_from_slice(&2_u32.to_le_bytes());
	file.extend_from_slice(&2_u32.to_le_bytes());
	file.extend_from_slice(&2_822_400_u32.to_le_bytes());
	file.extend_from_slice(&1_u32.to_le_bytes());
	file.extend_from_slice(&(data_len as u64 * 4).to_le_bytes());
	file.extend_from_slice(&4096_u32.to_le_bytes());
	file.extend_from_slice(&0_u32.to_le_bytes());

	file.extend_from_slice(b"data");
	file.extend_from_slice(&(data_len as u64 + 12).to_le_bytes());
	file.resize(file.len() + data_len, 0x69);

	let len = file.len() as u64;
	file[12..20].copy_from_slice(&len.to_le_bytes());
	file
}

/// A DFF chunk, with its pad byte
pub fn dff_chunk(id: &[u8; 4], content: &[u8]) -> Vec<u8> {
	let mut chunk = id.to_vec();
	chunk.extend_from_slice(&(content.len() as u64).to_be_bytes());
	chunk.extend_from_slice(content);
	if content.len() % 2 != 0 {
		chunk.push(0);
	}

	chunk
}

/// One second of uncompressed stereo DSD64, followed by `extra`
pub fn dff_file(extra: &[Vec<u8>]) -> Vec<u8> {
	let mut prop = b"SND ".to_vec();
	prop.extend(dff_chunk(b"FS  ", &2_822_400_u32.to_be_bytes()));
	prop.extend(dff_chunk(b"CHNL", b"\0\x02SLFTSRGT"));
	prop.extend(dff_chunk(b"CMPR", b"DSD \x0enot compressed"));

	let mut chunks = vec![
		dff_chunk(b"FVER", &[1, 5, 0, 0]),
		dff_chunk(b"PROP", &prop),
		dff_chunk(b"DSD ", &vec![0x69; 705_600]),
	];
	chunks.extend_from_slice(extra);

	let body = chunks.concat();
	let mut file = b"FRM8".to_vec();
	file.extend_from_slice(&(body.len() as u64 + 4).to_be_bytes());
	file.extend_from_slice(b"DSD ");
	file.extend(body);
	file
}

/// A FLAC STREAMINFO of 10 seconds of 16-bit stereo at 44.1kHz
pub fn stream_info() -> Vec<u8> {
	let total_samples: u64 = 441_000;

	let mut content = vec![0x10, 0x00, 0x10, 0x00, 0, 0, 0, 0, 0, 0];
	let info: u32 = (44100 << 12) | (1 << 9) | (15 << 4) | ((total_samples >> 32) as u32 & 0xF);
	content.extend_from_slice(&info.to_be_bytes());
	content.extend_from_slice(&(total_samples as u32).to_be_bytes());
	content.extend_from_slice(&[0; 16]);
	content
}

/// A FLAC stream with STREAMINFO followed by `(type, content)` blocks
pub fn flac_file(blocks: &[(u8, Vec<u8>)]) -> Vec<u8> {
	let mut file = b"fLaC".to_vec();

	let mut all = vec![(0, stream_info())];
	all.extend_from_slice(blocks);

	let count = all.len();
	for (i, (ty, content)) in all.into_iter().enumerate() {
		let last = if i == count - 1 { 0x80 } else { 0 };
		file.push(ty | last);
		file.extend_from_slice(&(content.len() as u32).to_be_bytes()[1..]);
		file.extend(content);
	}

	// Audio frames are never looked at
	file.extend_from_slice(&[0xFF, 0xF8, 0x69, 0x08, 0, 0, 0, 0]);
	file
}

pub mod asf {
	use tagcodec::asf::guid::{
		AUDIO_MEDIA, DATA_OBJECT, FILE_PROPERTIES_OBJECT, Guid, HEADER_EXTENSION_OBJECT,
		HEADER_EXTENSION_RESERVED, HEADER_OBJECT, STREAM_PROPERTIES_OBJECT,
	};

	pub fn object(guid: Guid, content: &[u8]) -> Vec<u8> {
		let mut object = guid.as_bytes().to_vec();
		object.extend_from_slice(&(content.len() as u64 + 24).to_le_bytes());
		object.extend_from_slice(content);
		object
	}

	pub fn extension(children: &[Vec<u8>]) -> Vec<u8> {
		let data = children.concat();

		let mut content = HEADER_EXTENSION_RESERVED.as_bytes().to_vec();
		content.extend_from_slice(&6_u16.to_le_bytes());
		content.extend_from_slice(&(data.len() as u32).to_le_bytes());
		content.extend(data);

		object(HEADER_EXTENSION_OBJECT, &content)
	}

	// 10 seconds, with a 3 second preroll
	fn file_properties() -> Vec<u8> {
		let mut content = vec![0; 40];
		content.extend_from_slice(&(13 * 10_000_000_u64).to_le_bytes());
		content.extend_from_slice(&0_u64.to_le_bytes());
		content.extend_from_slice(&3000_u64.to_le_bytes());
		content.extend_from_slice(&2_u32.to_le_bytes());
		content.extend_from_slice(&[0; 8]);
		content.extend_from_slice(&128_000_u32.to_le_bytes());
		content
	}

	// 44.1kHz stereo WMA at 128kbps
	fn audio_stream() -> Vec<u8> {
		let mut content = AUDIO_MEDIA.as_bytes().to_vec();
		content.extend_from_slice(&[0; 16 + 8]);
		content.extend_from_slice(&18_u32.to_le_bytes());
		content.extend_from_slice(&0_u32.to_le_bytes());
		content.extend_from_slice(&1_u16.to_le_bytes());
		content.extend_from_slice(&0_u32.to_le_bytes());

		content.extend_from_slice(&0x0161_u16.to_le_bytes());
		content.extend_from_slice(&2_u16.to_le_bytes());
		content.extend_from_slice(&44100_u32.to_le_bytes());
		content.extend_from_slice(&16000_u32.to_le_bytes());
		content.extend_from_slice(&4_u16.to_le_bytes());
		content.extend_from_slice(&16_u16.to_le_bytes());
		content.extend_from_slice(&0_u16.to_le_bytes());
		content
	}

	/// A complete file with `children` after the properties objects
	pub fn asf_file(children: &[Vec<u8>]) -> Vec<u8> {
		let mut all = vec![
			object(FILE_PROPERTIES_OBJECT, &file_properties()),
			object(STREAM_PROPERTIES_OBJECT, &audio_stream()),
		];
		all.extend_from_slice(children);

		let data = all.concat();
		let mut file = HEADER_OBJECT.as_bytes().to_vec();
		file.extend_from_slice(&(data.len() as u64 + 30).to_le_bytes());
		file.extend_from_slice(&(all.len() as u32).to_le_bytes());
		file.extend_from_slice(&[1, 2]);
		file.extend(data);

		file.extend(object(DATA_OBJECT, &[0xAA; 76]));
		file
	}

	/// Read the child count of the header object
	pub fn header_child_count(file: &[u8]) -> u32 {
		u32::from_le_bytes(file[24..28].try_into().unwrap())
	}
}

pub mod mp4 {
	pub const AUDIO: &[u8] = b"AUDIO DATA";

	pub fn atom(ident: &[u8; 4], content: &[u8]) -> Vec<u8> {
		let mut atom = ((content.len() + 8) as u32).to_be_bytes().to_vec();
		atom.extend_from_slice(ident);
		atom.extend_from_slice(content);
		atom
	}

	/// `ftyp`, a `moov` with a single AAC track, and an `mdat` holding [`AUDIO`]
	pub fn mp4_file() -> Vec<u8> {
		let ftyp = atom(b"ftyp", b"M4A \0\0\0\0M4A isom");

		// Version/flags, creation time, modification time, 1000 Hz, 10 seconds
		let mut mvhd = vec![0; 12];
		mvhd.extend_from_slice(&1000_u32.to_be_bytes());
		mvhd.extend_from_slice(&10_000_u32.to_be_bytes());
		let mvhd = atom(b"mvhd", &mvhd);

		// Version/flags, pre-defined, handler type, reserved, name
		let mut hdlr = vec![0; 8];
		hdlr.extend_from_slice(b"soun");
		hdlr.extend_from_slice(&[0; 13]);
		let hdlr = atom(b"hdlr", &hdlr);

		let stbl = [stsd(), atom(b"stco", &[0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0])].concat();
		let minf = atom(b"minf", &atom(b"stbl", &stbl));
		let trak = atom(b"trak", &atom(b"mdia", &[hdlr, minf].concat()));

		let moov = atom(b"moov", &[mvhd, trak].concat());

		let mut file = [ftyp, moov, atom(b"mdat", AUDIO)].concat();

		let audio_start = (file.len() - AUDIO.len()) as u32;
		let entry = stco_entry(&file);
		file[entry..entry + 4].copy_from_slice(&audio_start.to_be_bytes());
		file
	}

	// A 44.1kHz stereo `mp4a` sample entry
	fn stsd() -> Vec<u8> {
		let mut entry = vec![0; 6];
		entry.extend_from_slice(&1_u16.to_be_bytes());
		entry.extend_from_slice(&[0; 8]);
		entry.extend_from_slice(&2_u16.to_be_bytes());
		entry.extend_from_slice(&16_u16.to_be_bytes());
		entry.extend_from_slice(&[0; 4]);
		entry.extend_from_slice(&(44100_u32 << 16).to_be_bytes());

		let mut stsd = vec![0, 0, 0, 0, 0, 0, 0, 1];
		stsd.extend(atom(b"mp4a", &entry));
		atom(b"stsd", &stsd)
	}

	/// The position of the first `stco` entry
	pub fn stco_entry(file: &[u8]) -> usize {
		let ident = file.windows(4).position(|w| w == b"stco").unwrap();
		// Identifier, version/flags, entry count
		ident + 12
	}

	pub fn assert_chunk_offset_points_at_audio(file: &[u8]) {
		let entry = stco_entry(file);
		let offset = u32::from_be_bytes(file[entry..entry + 4].try_into().unwrap()) as usize;
		assert_eq!(&file[offset..offset + AUDIO.len()], AUDIO);
	}
}
