use super::read::verify_aiff;
use crate::config::WriteOptions;
use crate::error::{Result, TagCodecError};
use crate::id3::v2::write::write_to_chunk_file;
use crate::macros::encode_err;
use crate::util::io::{FileLike, Length, Truncate};

use byteorder::BigEndian;

/// Replace, add, or remove (when `tag` is empty) the ID3v2 chunk of an AIFF file
pub(crate) fn write_id3v2<F>(file: &mut F, tag: &[u8], write_options: WriteOptions) -> Result<()>
where
	F: FileLike,
	TagCodecError: From<<F as Truncate>::Error>,
	TagCodecError: From<<F as Length>::Error>,
{
	file.rewind()?;
	if verify_aiff(file).is_err() {
		encode_err!(@BAIL Aiff, "File is not a valid AIFF file");
	}

	write_to_chunk_file::<F, BigEndian>(file, tag, write_options)
}
