use super::read::verify_wav;
use crate::config::WriteOptions;
use crate::error::{Result, TagCodecError};
use crate::id3::v2::write::write_to_chunk_file;
use crate::macros::encode_err;
use crate::util::io::{FileLike, Length, Truncate};

use byteorder::LittleEndian;

/// Replace, add, or remove (when `tag` is empty) the ID3v2 chunk of a WAV file
pub(crate) fn write_id3v2<F>(file: &mut F, tag: &[u8], write_options: WriteOptions) -> Result<()>
where
	F: FileLike,
	TagCodecError: From<<F as Truncate>::Error>,
	TagCodecError: From<<F as Length>::Error>,
{
	file.rewind()?;
	if verify_wav(file).is_err() {
		encode_err!(@BAIL Wav, "File is not a valid WAV file");
	}

	write_to_chunk_file::<F, LittleEndian>(file, tag, write_options)
}
