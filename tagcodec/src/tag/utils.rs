use crate::config::WriteOptions;
use crate::error::{Result, TagCodecError};
use crate::file::FileType;
use crate::id3::v2::Id3v2Tag;
use crate::id3::v2::write::create_tag;
use crate::macros::err;
use crate::tag::Tag;
use crate::util::io::{FileLike, Length, Truncate};
use crate::{asf, dsd, flac, iff, mp4};

/// Write `tag` to a file of type `file_type`
///
/// An empty tag removes the existing one.
pub(crate) fn write_tag<F>(
	tag: &Tag,
	file: &mut F,
	file_type: FileType,
	write_options: WriteOptions,
) -> Result<()>
where
	F: FileLike,
	TagCodecError: From<<F as Truncate>::Error>,
	TagCodecError: From<<F as Length>::Error>,
{
	if !file_type.supports_tag_type(tag.tag_type()) {
		err!(UnsupportedOperation("The file format can't store this tag type"));
	}

	log::debug!(
		"Writing {:?} tag to a {:?} file",
		tag.tag_type(),
		file_type
	);

	match tag {
		Tag::Id3v2(id3v2) => write_id3v2(id3v2, file, file_type, write_options),
		Tag::Flac(flac_tag) => flac::write::write_to(file, flac_tag, write_options),
		Tag::Asf(asf_tag) => asf::write::write_to(file, asf_tag, write_options),
		Tag::Mp4(ilst) => mp4::write::write_to(file, ilst, write_options),
	}
}

fn write_id3v2<F>(
	tag: &Id3v2Tag,
	file: &mut F,
	file_type: FileType,
	write_options: WriteOptions,
) -> Result<()>
where
	F: FileLike,
	TagCodecError: From<<F as Truncate>::Error>,
	TagCodecError: From<<F as Length>::Error>,
{
	let bytes = create_tag(tag, write_options)?;

	match file_type {
		FileType::Wav => iff::wav::write::write_id3v2(file, &bytes, write_options),
		FileType::Aiff => iff::aiff::write::write_id3v2(file, &bytes, write_options),
		FileType::Dsf => dsd::dsf::write::write_id3v2(file, &bytes),
		FileType::Dff => dsd::dff::write::write_id3v2(file, &bytes),
		_ => err!(UnsupportedOperation("The file format can't store an ID3v2 tag")),
	}
}
