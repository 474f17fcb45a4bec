#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use tagcodec::config::{ParseOptions, WriteOptions};
use tagcodec::tag::{Accessor, Tag};

// Anything that reads must survive having its tag rewritten
fuzz_target!(|data: Vec<u8>| {
	let mut file = Cursor::new(data);
	let Ok(tagged_file) = tagcodec::read_from(&mut file, ParseOptions::new()) else {
		return;
	};

	let mut tag = tagged_file
		.tag()
		.cloned()
		.unwrap_or_else(|| Tag::new(tagged_file.tag_type()));
	tag.set_title(String::from("Fuzzed title"));

	let _ = tagcodec::write_to(&mut file, &tag, WriteOptions::default());
	let _ = tagcodec::delete_from(&mut file);
});
