use crate::error::Result;
use crate::properties::AudioProperties;
use crate::util::math::bitrate_from_length;

use std::io::Read;
use std::time::Duration;

use byteorder::{BigEndian, ByteOrder};

/// A FLAC file's audio properties
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[non_exhaustive]
pub struct FlacProperties {
	pub(crate) duration: Duration,
	pub(crate) overall_bitrate: u32,
	pub(crate) audio_bitrate: u32,
	pub(crate) sample_rate: u32,
	pub(crate) bit_depth: u8,
	pub(crate) channels: u8,
	pub(crate) total_samples: u64,
	pub(crate) signature: u128,
}

impl From<FlacProperties> for AudioProperties {
	fn from(input: FlacProperties) -> Self {
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

impl FlacProperties {
	/// Duration of the audio
	pub fn duration(&self) -> Duration {
		self.duration
	}

	/// Bitrate of the whole file (kbps)
	pub fn overall_bitrate(&self) -> u32 {
		self.overall_bitrate
	}

	/// Bitrate of the frames after the metadata blocks (kbps)
	pub fn audio_bitrate(&self) -> u32 {
		self.audio_bitrate
	}

	/// Sample rate (Hz)
	pub fn sample_rate(&self) -> u32 {
		self.sample_rate
	}

	/// Bits per sample (usually 16 or 24 bit)
	pub fn bit_depth(&self) -> u8 {
		self.bit_depth
	}

	/// Channel count
	pub fn channels(&self) -> u8 {
		self.channels
	}

	/// Samples per channel, 0 when the encoder didn't know
	pub fn total_samples(&self) -> u64 {
		self.total_samples
	}

	/// MD5 of the decoded audio, 0 when unset
	pub fn signature(&self) -> u128 {
		self.signature
	}
}

// STREAMINFO is fixed size, the audio parameters share one 64-bit big endian field
const STREAM_INFO_LEN: usize = 34;
const PACKED_FIELDS: std::ops::Range<usize> = 10..18;
const MD5_SIGNATURE: std::ops::Range<usize> = 18..34;

pub(crate) fn read_properties<R>(
	stream_info: &mut R,
	stream_length: u64,
	file_length: u64,
) -> Result<FlacProperties>
where
	R: Read,
{
	let mut block = [0; STREAM_INFO_LEN];
	stream_info.read_exact(&mut block)?;

	// Sample rate (20) | channels - 1 (3) | bits per sample - 1 (5) | total samples (36)
	let packed = BigEndian::read_u64(&block[PACKED_FIELDS]);
	let sample_rate = (packed >> 44) as u32;
	let channels = ((packed >> 41) & 0b111) as u8 + 1;
	let bit_depth = ((packed >> 36) & 0b1_1111) as u8 + 1;
	let total_samples = packed & 0xF_FFFF_FFFF;

	let mut properties = FlacProperties {
		sample_rate,
		bit_depth,
		channels,
		total_samples,
		signature: BigEndian::read_u128(&block[MD5_SIGNATURE]),
		..FlacProperties::default()
	};

	if sample_rate == 0 || total_samples == 0 {
		log::warn!("Unable to calculate duration and bitrate");
		return Ok(properties);
	}

	let length = Duration::from_secs_f64(total_samples as f64 / f64::from(sample_rate));
	properties.duration = length;
	properties.overall_bitrate = bitrate_from_length(file_length, length);
	properties.audio_bitrate = bitrate_from_length(stream_length, length);

	Ok(properties)
}

#[cfg(test)]
pub(super) mod tests {
	use super::read_properties;

	use std::time::Duration;

	// 44.1kHz, 2 channels, 16 bits, `total_samples` samples
	pub(crate) fn stream_info(total_samples: u64) -> Vec<u8> {
		let mut content = vec![0x10, 0x00, 0x10, 0x00, 0, 0, 0, 0, 0, 0];
		let info: u32 = (44100 << 12) | (1 << 9) | (15 << 4) | ((total_samples >> 32) as u32 & 0xF);
		content.extend_from_slice(&info.to_be_bytes());
		content.extend_from_slice(&(total_samples as u32).to_be_bytes());
		content.extend_from_slice(&[0; 16]);
		content
	}

	#[test_log::test]
	fn stream_info_fields() {
		let content = stream_info(441_000);
		assert_eq!(content.len(), 34);

		let properties = read_properties(&mut &content[..], 1_000_000, 1_000_100).unwrap();
		assert_eq!(properties.sample_rate(), 44100);
		assert_eq!(properties.channels(), 2);
		assert_eq!(properties.bit_depth(), 16);
		assert_eq!(properties.total_samples(), 441_000);
		assert_eq!(properties.duration(), Duration::from_secs(10));

		// 1_000_000 * 8 / 1000 / 10
		assert_eq!(properties.audio_bitrate(), 800);
		// 1_000_100 * 8 / 1000 / 10 = 800.08
		assert_eq!(properties.overall_bitrate(), 800);
	}

	#[test_log::test]
	fn unknown_sample_count() {
		let properties = read_properties(&mut &stream_info(0)[..], 1000, 1000).unwrap();
		assert_eq!(properties.duration(), Duration::ZERO);
		assert_eq!(properties.audio_bitrate(), 0);
	}
}
