use crate::properties::AudioProperties;
use crate::util::math::bitrate_from_length;

use std::time::Duration;

/// Loudspeaker configuration of a DFF file
///
/// As defined in the DSDIFF 1.5 specification § 3.2.5
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoudspeakerConfig {
	/// 2-channel stereo setup
	Stereo,
	/// 5-channel setup according to ITU-R BS.775-1
	FiveChannel,
	/// 5-channel setup according to ITU-R BS.775-1, plus Low Frequency Enhancement (LFE)
	FivePointOne,
	/// Undefined channel setup
	Undefined,
	/// Reserved value for future use
	Reserved(u16),
}

impl LoudspeakerConfig {
	pub(crate) fn from_u16(value: u16) -> Self {
		match value {
			0 => Self::Stereo,
			3 => Self::FiveChannel,
			4 => Self::FivePointOne,
			65535 => Self::Undefined,
			_ => Self::Reserved(value),
		}
	}
}

/// The compression of a DFF file's sound data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DffCompression {
	/// Uncompressed DSD (`DSD `)
	#[default]
	Dsd,
	/// Direct Stream Transfer (`DST `)
	Dst,
	/// Any other compression type
	Other([u8; 4]),
}

impl DffCompression {
	pub(crate) fn from_fourcc(fourcc: [u8; 4]) -> Self {
		match &fourcc {
			b"DSD " => Self::Dsd,
			b"DST " => Self::Dst,
			_ => Self::Other(fourcc),
		}
	}
}

/// A DFF file's audio properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub struct DffProperties {
	pub(crate) sample_rate: u32,
	pub(crate) channels: u8,
	pub(crate) sample_count: u64,
	pub(crate) compression: DffCompression,
	pub(crate) loudspeaker_config: Option<LoudspeakerConfig>,
	/// The size of the `DSD ` or `DST ` chunk
	pub(crate) audio_size: Option<u64>,
}

impl DffProperties {
	/// Sample rate (Hz)
	pub fn sample_rate(&self) -> u32 {
		self.sample_rate
	}

	/// Channel count
	pub fn channels(&self) -> u8 {
		self.channels
	}

	/// Samples per channel
	pub fn sample_count(&self) -> u64 {
		self.sample_count
	}

	/// Compression type
	pub fn compression(&self) -> DffCompression {
		self.compression
	}

	/// Loudspeaker configuration
	pub fn loudspeaker_config(&self) -> Option<LoudspeakerConfig> {
		self.loudspeaker_config
	}

	/// Duration of the audio
	pub fn duration(&self) -> Duration {
		if self.sample_rate == 0 {
			return Duration::ZERO;
		}

		Duration::from_secs_f64(self.sample_count as f64 / f64::from(self.sample_rate))
	}

	/// Audio bitrate (kbps)
	pub fn bitrate(&self) -> u32 {
		match self.audio_size {
			Some(audio_size) if self.sample_count > 0 => {
				bitrate_from_length(audio_size, self.duration())
			},
			// DSD is always 1 bit per sample
			_ => (u64::from(self.sample_rate) * u64::from(self.channels) / 1000) as u32,
		}
	}
}

impl From<DffProperties> for AudioProperties {
	fn from(input: DffProperties) -> Self {
		let bitrate = input.bitrate();
		Self {
			duration: input.duration(),
			overall_bitrate: Some(bitrate),
			audio_bitrate: Some(bitrate),
			sample_rate: Some(input.sample_rate),
			bit_depth: Some(1),
			channels: Some(input.channels),
		}
	}
}
