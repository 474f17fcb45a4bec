#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use tagcodec::config::ParseOptions;
use tagcodec::file::AudioFile;

fuzz_target!(|data: Vec<u8>| {
	let _ = tagcodec::iff::aiff::AiffFile::read_from(&mut Cursor::new(data), ParseOptions::new());
});
