#![no_main]

use libfuzzer_sys::fuzz_target;
use tagcodec::config::ParsingMode;
use tagcodec::flac::FlacPicture;

fuzz_target!(|data: &[u8]| {
	let _ = FlacPicture::from_flac_bytes(data, ParsingMode::Strict);
	let _ = FlacPicture::from_flac_bytes(data, ParsingMode::BestAttempt);
});
