use crate::error::Result;
use crate::macros::decode_err;
use crate::properties::AudioProperties;
use crate::util::math::RoundedDivision;

use std::time::Duration;

use byteorder::{LittleEndian, ReadBytesExt};

const PCM: u16 = 0x0001;
const IEEE_FLOAT: u16 = 0x0003;
const EXTENSIBLE: u16 = 0xFFFE;

/// A WAV file's format
#[allow(missing_docs, non_camel_case_types)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum WavFormat {
	PCM,
	IEEE_FLOAT,
	Other(u16),
	#[default]
	Unknown,
}

/// A WAV file's audio properties
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub struct WavProperties {
	pub(crate) format: WavFormat,
	pub(crate) duration: Duration,
	pub(crate) overall_bitrate: u32,
	pub(crate) audio_bitrate: u32,
	pub(crate) sample_rate: u32,
	pub(crate) bit_depth: u8,
	pub(crate) channels: u8,
}

impl From<WavProperties> for AudioProperties {
	fn from(input: WavProperties) -> Self {
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

impl WavProperties {
	/// Duration of the audio
	pub fn duration(&self) -> Duration {
		self.duration
	}

	/// Bitrate of the whole file (kbps)
	pub fn overall_bitrate(&self) -> u32 {
		self.overall_bitrate
	}

	/// Bitrate of the audio stream (kbps), taken from the byte rate in `fmt `
	pub fn bitrate(&self) -> u32 {
		self.audio_bitrate
	}

	/// Sample rate (Hz)
	pub fn sample_rate(&self) -> u32 {
		self.sample_rate
	}

	/// Bits per sample, the valid bit count for extensible streams
	pub fn bit_depth(&self) -> u8 {
		self.bit_depth
	}

	/// Channel count
	pub fn channels(&self) -> u8 {
		self.channels
	}

	/// Sample format, resolved through the sub format of extensible streams
	pub fn format(&self) -> WavFormat {
		self.format
	}
}

// The fields of a `fmt ` chunk that matter for the properties
struct FmtChunk {
	format_tag: u16,
	channels: u16,
	sample_rate: u32,
	byte_rate: u32,
	bits_per_sample: u16,
}

impl FmtChunk {
	fn parse(mut fmt: &[u8]) -> Result<Self> {
		let len = fmt.len();
		if len < 16 {
			decode_err!(@BAIL Wav, "\"fmt \" chunk is shorter than 16 bytes");
		}

		let reader = &mut fmt;
		let mut chunk = Self {
			format_tag: reader.read_u16::<LittleEndian>()?,
			channels: reader.read_u16::<LittleEndian>()?,
			sample_rate: reader.read_u32::<LittleEndian>()?,
			byte_rate: reader.read_u32::<LittleEndian>()?,
			bits_per_sample: {
				// Block align
				reader.read_u16::<LittleEndian>()?;
				reader.read_u16::<LittleEndian>()?
			},
		};

		if chunk.format_tag != EXTENSIBLE {
			return Ok(chunk);
		}

		if len < 40 {
			decode_err!(@BAIL Wav, "Extensible \"fmt \" chunk is shorter than 40 bytes");
		}

		// Extension size, then the valid bits
		reader.read_u16::<LittleEndian>()?;
		let valid_bits = reader.read_u16::<LittleEndian>()?;
		if valid_bits != 0 {
			chunk.bits_per_sample = valid_bits;
		}

		// The sub format GUID starts with the real format tag, after the channel mask
		reader.read_u32::<LittleEndian>()?;
		chunk.format_tag = reader.read_u16::<LittleEndian>()?;

		Ok(chunk)
	}

	fn format(&self) -> WavFormat {
		match self.format_tag {
			PCM => WavFormat::PCM,
			IEEE_FLOAT => WavFormat::IEEE_FLOAT,
			other => WavFormat::Other(other),
		}
	}

	// Uncompressed streams are measured from the data size, anything else needs `fact`
	fn sample_frames(&self, fact_frames: u32, stream_len: u64) -> u64 {
		let frame_size = u64::from(self.channels) * u64::from(self.bits_per_sample.div_ceil(8));
		let uncompressed = matches!(self.format(), WavFormat::PCM | WavFormat::IEEE_FLOAT);

		if uncompressed && self.bits_per_sample >= 8 {
			stream_len / frame_size
		} else {
			u64::from(fact_frames)
		}
	}
}

pub(super) fn read_properties(
	fmt: &[u8],
	fact_frames: u32,
	stream_len: u64,
	file_length: u64,
) -> Result<WavProperties> {
	let fmt = FmtChunk::parse(fmt)?;
	if fmt.channels == 0 {
		decode_err!(@BAIL Wav, "\"fmt \" chunk declares no channels");
	}

	let mut properties = WavProperties {
		format: fmt.format(),
		audio_bitrate: (u64::from(fmt.byte_rate) * 8).div_round(1000) as u32,
		sample_rate: fmt.sample_rate,
		bit_depth: fmt.bits_per_sample as u8,
		channels: fmt.channels as u8,
		..WavProperties::default()
	};

	let frames = fmt.sample_frames(fact_frames, stream_len);
	if fmt.sample_rate == 0 || frames == 0 {
		log::warn!("Unable to calculate duration and bitrate");
		return Ok(properties);
	}

	let millis = (frames * 1000).div_round(u64::from(fmt.sample_rate));
	properties.duration = Duration::from_millis(millis);
	if millis > 0 {
		properties.overall_bitrate = (file_length * 8).div_round(millis) as u32;
	}

	Ok(properties)
}
