use super::chunk::DffChunk;
use super::properties::{DffCompression, DffProperties, LoudspeakerConfig};
use super::DffFile;
use crate::config::ParseOptions;
use crate::error::Result;
use crate::id3::v2::Id3v2Tag;
use crate::id3::v2::header::Id3v2Header;
use crate::id3::v2::read::parse_id3v2;
use crate::iff::chunk::ChunkHeader;
use crate::macros::{decode_err, try_vec};
use crate::util::io::{ReadExt, StreamLen};

use std::io::{Read, Seek, SeekFrom};

use byteorder::{BigEndian, ReadBytesExt};

/// Verify the `FRM8` header, returning it
pub(super) fn verify_dff<R>(reader: &mut R) -> Result<ChunkHeader>
where
	R: Read + Seek,
{
	let form = ChunkHeader::read_long::<BigEndian, _>(reader)?;
	if form.id != DffChunk::Frm8.fourcc() {
		decode_err!(@BAIL Dff, "File doesn't start with a \"FRM8\" chunk");
	}

	if &reader.read_fourcc()? != b"DSD " {
		decode_err!(@BAIL Dff, "Found \"FRM8\" chunk, form type is not \"DSD \"");
	}

	log::debug!("File verified to be DFF");
	Ok(form)
}

/// Read the next chunk header, stopping at `end`
///
/// Unknown chunk ids, and chunks that don't fit in their container, are errors.
pub(super) fn next_chunk<R>(reader: &mut R, end: u64) -> Result<Option<(ChunkHeader, DffChunk)>>
where
	R: Read + Seek,
{
	let position = reader.stream_position()?;
	if position + ChunkHeader::LONG_HEADER_SIZE > end {
		if position < end {
			log::warn!("Ignoring {} trailing bytes in DFF container", end - position);
		}

		return Ok(None);
	}

	let header = ChunkHeader::read_long::<BigEndian, _>(reader)?;
	let chunk = DffChunk::from_fourcc(header.id)?;
	if header.end() > end {
		decode_err!(@BAIL Dff, "Chunk extends past the end of its container");
	}

	log::trace!(
		"Found DFF chunk {:?} ({} bytes) at offset {}",
		chunk,
		header.size,
		header.start
	);

	Ok(Some((header, chunk)))
}

// Move past the chunk and its pad byte
fn skip_chunk<R>(reader: &mut R, header: &ChunkHeader, end: u64) -> Result<()>
where
	R: Seek,
{
	reader.seek(SeekFrom::Start(header.padded_end().min(end)))?;
	Ok(())
}

#[derive(Default)]
struct SoundProperties {
	sample_rate: u32,
	channels: u16,
	compression: DffCompression,
	loudspeaker_config: Option<LoudspeakerConfig>,
	dsd_size: Option<u64>,
	dst_size: Option<u64>,
	// (frame count, frame rate)
	dst_frames: Option<(u32, u16)>,
}

pub(super) fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<DffFile>
where
	R: Read + Seek,
{
	let form = verify_dff(reader)?;
	let end = form.end().min(reader.total_len()?);

	let mut sound = SoundProperties::default();
	let mut id3v2_tag = None;

	while let Some((header, chunk)) = next_chunk(reader, end)? {
		match chunk {
			DffChunk::Prop => read_prop(reader, &header, &mut sound)?,
			DffChunk::Dsd => sound.dsd_size = Some(header.size),
			DffChunk::Dst => {
				sound.dst_size = Some(header.size);
				read_dst(reader, &header, &mut sound)?;
			},
			DffChunk::Id3 if parse_options.read_tags => {
				let tag = read_id3_chunk(reader, &header, parse_options)?;
				if id3v2_tag.is_some() {
					log::warn!("Ignoring duplicate ID3 chunk at offset {}", header.start);
				} else {
					id3v2_tag = Some(tag);
				}
			},
			_ => {},
		}

		skip_chunk(reader, &header, end)?;
	}

	if sound.sample_rate == 0 || sound.channels == 0 {
		decode_err!(@BAIL Dff, "File is missing the \"FS  \" or \"CHNL\" chunk");
	}

	let properties = if parse_options.read_properties {
		build_properties(&sound)
	} else {
		DffProperties::default()
	};

	Ok(DffFile {
		id3v2_tag,
		properties,
	})
}

fn read_prop<R>(reader: &mut R, prop: &ChunkHeader, sound: &mut SoundProperties) -> Result<()>
where
	R: Read + Seek,
{
	if prop.size < 4 {
		decode_err!(@BAIL Dff, "Invalid \"PROP\" chunk size");
	}

	if &reader.read_fourcc()? != b"SND " {
		log::warn!("Skipping \"PROP\" chunk with an unknown property type");
		return Ok(());
	}

	let end = prop.end();
	while let Some((header, chunk)) = next_chunk(reader, end)? {
		match chunk {
			DffChunk::Fs => sound.sample_rate = reader.read_u32::<BigEndian>()?,
			// The channel count is followed by the channel ids
			DffChunk::Chnl => sound.channels = reader.read_u16::<BigEndian>()?,
			// The compression type is followed by its name
			DffChunk::Cmpr => {
				sound.compression = DffCompression::from_fourcc(reader.read_fourcc()?)
			},
			DffChunk::Lsco => {
				sound.loudspeaker_config =
					Some(LoudspeakerConfig::from_u16(reader.read_u16::<BigEndian>()?))
			},
			_ => {},
		}

		skip_chunk(reader, &header, end)?;
	}

	Ok(())
}

fn read_dst<R>(reader: &mut R, dst: &ChunkHeader, sound: &mut SoundProperties) -> Result<()>
where
	R: Read + Seek,
{
	let end = dst.end();
	while let Some((header, chunk)) = next_chunk(reader, end)? {
		if chunk == DffChunk::Frte {
			let frame_count = reader.read_u32::<BigEndian>()?;
			let frame_rate = reader.read_u16::<BigEndian>()?;
			sound.dst_frames = Some((frame_count, frame_rate));
		}

		skip_chunk(reader, &header, end)?;
	}

	Ok(())
}

fn read_id3_chunk<R>(
	reader: &mut R,
	header: &ChunkHeader,
	parse_options: ParseOptions,
) -> Result<Id3v2Tag>
where
	R: Read,
{
	let mut content = try_vec![0; header.size as usize];
	reader.read_exact(&mut content)?;

	let reader = &mut &*content;
	let id3v2_header = Id3v2Header::parse(reader)?;
	parse_id3v2(reader, id3v2_header, parse_options)
}

fn build_properties(sound: &SoundProperties) -> DffProperties {
	let channels = u64::from(sound.channels);

	let (sample_count, audio_size) = match (sound.dsd_size, sound.dst_frames) {
		// 1 bit per sample, channels interleaved byte by byte
		(Some(dsd_size), _) => (dsd_size * 8 / channels, Some(dsd_size)),
		(None, Some((frame_count, frame_rate))) if frame_rate > 0 => (
			u64::from(frame_count) * u64::from(sound.sample_rate) / u64::from(frame_rate),
			sound.dst_size,
		),
		_ => (0, None),
	};

	DffProperties {
		sample_rate: sound.sample_rate,
		channels: sound.channels as u8,
		sample_count,
		compression: sound.compression,
		loudspeaker_config: sound.loudspeaker_config,
		audio_size,
	}
}
