use crate::error::Result;
use crate::macros::decode_err;
use crate::properties::AudioProperties;
use crate::util::math::RoundedDivision;

use std::time::Duration;

use byteorder::{LittleEndian, ReadBytesExt};

/// An ASF file's audio properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub struct AsfProperties {
	pub(crate) duration: Duration,
	pub(crate) overall_bitrate: u32,
	pub(crate) audio_bitrate: u32,
	pub(crate) max_bitrate: u32,
	pub(crate) sample_rate: u32,
	pub(crate) bit_depth: u8,
	pub(crate) channels: u8,
	pub(crate) codec_id: u16,
	pub(crate) preroll: Duration,
}

impl From<AsfProperties> for AudioProperties {
	fn from(input: AsfProperties) -> Self {
		Self {
			duration: input.duration,
			overall_bitrate: Some(input.overall_bitrate),
			audio_bitrate: Some(input.audio_bitrate),
			sample_rate: Some(input.sample_rate),
			bit_depth: Some(input.bit_depth),
			channels: Some(input.channels),
		}
	}
}

impl AsfProperties {
	/// Duration of the audio, excluding the preroll
	pub fn duration(&self) -> Duration {
		self.duration
	}

	/// Overall bitrate (kbps)
	pub fn overall_bitrate(&self) -> u32 {
		self.overall_bitrate
	}

	/// Audio bitrate (kbps)
	pub fn audio_bitrate(&self) -> u32 {
		self.audio_bitrate
	}

	/// The maximum instantaneous bitrate of the file (bps), as declared in the File Properties
	pub fn max_bitrate(&self) -> u32 {
		self.max_bitrate
	}

	/// Sample rate (Hz)
	pub fn sample_rate(&self) -> u32 {
		self.sample_rate
	}

	/// Bits per sample
	pub fn bit_depth(&self) -> u8 {
		self.bit_depth
	}

	/// Channel count
	pub fn channels(&self) -> u8 {
		self.channels
	}

	/// The `WAVEFORMATEX` format tag of the audio stream, such as `0x0161` for WMA
	pub fn codec_id(&self) -> u16 {
		self.codec_id
	}

	/// The time to buffer before playback starts
	pub fn preroll(&self) -> Duration {
		self.preroll
	}
}

/// The File Properties object content, after the object header
pub(super) fn read_file_properties(
	mut content: &[u8],
	properties: &mut AsfProperties,
	file_length: u64,
) -> Result<()> {
	if content.len() < 80 {
		decode_err!(@BAIL Asf, "File Properties object is too small");
	}

	// File ID, file size, creation date, data packets count
	content = &content[16 + 8 + 8 + 8..];

	// 100-nanosecond units
	let play_duration = content.read_u64::<LittleEndian>()?;
	let _send_duration = content.read_u64::<LittleEndian>()?;
	// Milliseconds
	let preroll = content.read_u64::<LittleEndian>()?;
	let flags = content.read_u32::<LittleEndian>()?;
	let _min_packet_size = content.read_u32::<LittleEndian>()?;
	let _max_packet_size = content.read_u32::<LittleEndian>()?;
	properties.max_bitrate = content.read_u32::<LittleEndian>()?;

	properties.preroll = Duration::from_millis(preroll);

	// The play duration is invalid while broadcasting
	if flags & 1 == 0 {
		let play_duration = Duration::from_nanos(play_duration.saturating_mul(100));
		properties.duration = play_duration.saturating_sub(properties.preroll);
	}

	let length = properties.duration.as_millis() as u64;
	if length > 0 {
		properties.overall_bitrate = (file_length * 8).div_round(length) as u32;
	}

	Ok(())
}

/// Read the `WAVEFORMATEX` of a Stream Properties object, returning `false` if it isn't audio
pub(super) fn read_stream_properties(content: &[u8], properties: &mut AsfProperties) -> Result<bool> {
	// Stream type, error correction type, time offset, type specific length, error correction
	// length, flags, reserved
	const TYPE_SPECIFIC_OFFSET: usize = 16 + 16 + 8 + 4 + 4 + 2 + 4;

	if content.len() < TYPE_SPECIFIC_OFFSET {
		decode_err!(@BAIL Asf, "Stream Properties object is too small");
	}

	if content[..16] != super::guid::AUDIO_MEDIA.as_bytes() {
		return Ok(false);
	}

	let mut format = &content[TYPE_SPECIFIC_OFFSET..];
	if format.len() < 16 {
		decode_err!(@BAIL Asf, "Audio stream has an invalid WAVEFORMATEX");
	}

	properties.codec_id = format.read_u16::<LittleEndian>()?;
	properties.channels = format.read_u16::<LittleEndian>()? as u8;
	properties.sample_rate = format.read_u32::<LittleEndian>()?;
	let bytes_per_second = format.read_u32::<LittleEndian>()?;
	let _block_align = format.read_u16::<LittleEndian>()?;
	properties.bit_depth = format.read_u16::<LittleEndian>()? as u8;

	properties.audio_bitrate = (u64::from(bytes_per_second) * 8).div_round(1000) as u32;

	Ok(true)
}
