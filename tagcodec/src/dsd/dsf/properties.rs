use crate::properties::AudioProperties;
use crate::util::math::bitrate_from_length;

use std::time::Duration;

/// A DSF file's audio properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub struct DsfProperties {
	pub(crate) format_version: u32,
	pub(crate) channel_type: u32,
	pub(crate) sample_rate: u32,
	pub(crate) channels: u8,
	pub(crate) bits_per_sample: u8,
	pub(crate) sample_count: u64,
	pub(crate) block_size_per_channel: u32,
	/// The number of audio bytes in the `data` chunk, if there is one
	pub(crate) audio_size: Option<u64>,
}

impl DsfProperties {
	/// The `fmt ` chunk's format version, always 1
	pub fn format_version(&self) -> u32 {
		self.format_version
	}

	/// The channel layout (1 = mono, 2 = stereo, ..., 7 = 5.1)
	pub fn channel_type(&self) -> u32 {
		self.channel_type
	}

	/// Sample rate (Hz)
	pub fn sample_rate(&self) -> u32 {
		self.sample_rate
	}

	/// Channel count
	pub fn channels(&self) -> u8 {
		self.channels
	}

	/// Bits per sample, 1 or 8
	pub fn bits_per_sample(&self) -> u8 {
		self.bits_per_sample
	}

	/// Samples per channel
	pub fn sample_count(&self) -> u64 {
		self.sample_count
	}

	/// The size of a block of one channel's samples, always 4096
	pub fn block_size_per_channel(&self) -> u32 {
		self.block_size_per_channel
	}

	/// Duration of the audio
	pub fn duration(&self) -> Duration {
		if self.sample_rate == 0 {
			return Duration::ZERO;
		}

		Duration::from_secs_f64(self.sample_count as f64 / f64::from(self.sample_rate))
	}

	/// Audio bitrate (kbps)
	///
	/// Derived from the size of the `data` chunk when present, otherwise from the sample format.
	pub fn bitrate(&self) -> u32 {
		match self.audio_size {
			Some(audio_size) => bitrate_from_length(audio_size, self.duration()),
			None => {
				(u64::from(self.sample_rate)
					* u64::from(self.channels)
					* u64::from(self.bits_per_sample)
					/ 1000) as u32
			},
		}
	}
}

impl From<DsfProperties> for AudioProperties {
	fn from(input: DsfProperties) -> Self {
		let bitrate = input.bitrate();
		Self {
			duration: input.duration(),
			overall_bitrate: Some(bitrate),
			audio_bitrate: Some(bitrate),
			sample_rate: Some(input.sample_rate),
			bit_depth: Some(input.bits_per_sample),
			channels: Some(input.channels),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::DsfProperties;

	use std::time::Duration;

	fn dsd64_stereo(audio_size: Option<u64>) -> DsfProperties {
		DsfProperties {
			format_version: 1,
			channel_type: 2,
			sample_rate: 2_822_400,
			channels: 2,
			bits_per_sample: 1,
			sample_count: 2_822_400 * 3,
			block_size_per_channel: 4096,
			audio_size,
		}
	}

	#[test_log::test]
	fn bitrate_from_data_chunk() {
		let properties = dsd64_stereo(Some(2_822_400 * 2 / 8 * 3));
		assert_eq!(properties.duration(), Duration::from_secs(3));
		// 2116800 bytes * 8 / 1000 / 3 seconds
		assert_eq!(properties.bitrate(), 5644);
	}

	#[test_log::test]
	fn bitrate_without_data_chunk() {
		let properties = dsd64_stereo(None);
		assert_eq!(properties.bitrate(), 5644);
	}
}
