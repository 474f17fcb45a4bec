use crate::error::Result;
use crate::macros::{decode_err, try_vec};
use crate::properties::AudioProperties;
use crate::util::io::ReadExt;
use crate::util::text::utf8_decode;

use std::io::Read;
use std::time::Duration;

use byteorder::{BigEndian, ReadBytesExt};

/// The compression of an AIFC file
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct AiffCompression {
	/// Identifier of the compression algorithm, such as `NONE`, `sowt` or `fl32`
	pub compression_type: [u8; 4],
	/// Human-readable description of the compression algorithm
	pub compression_name: String,
}

/// An AIFF file's audio properties
#[derive(Debug, PartialEq, Eq, Clone, Default)]
#[non_exhaustive]
pub struct AiffProperties {
	pub(crate) duration: Duration,
	pub(crate) overall_bitrate: u32,
	pub(crate) audio_bitrate: u32,
	pub(crate) sample_rate: u32,
	pub(crate) sample_size: u16,
	pub(crate) channels: u16,
	pub(crate) compression: Option<AiffCompression>,
}

impl From<AiffProperties> for AudioProperties {
	fn from(value: AiffProperties) -> Self {
		Self {
			duration: value.duration,
			overall_bitrate: Some(value.overall_bitrate),
			audio_bitrate: Some(value.audio_bitrate),
			sample_rate: Some(value.sample_rate),
			bit_depth: Some(value.sample_size as u8),
			channels: Some(value.channels as u8),
		}
	}
}

impl AiffProperties {
	/// Duration of the audio
	pub fn duration(&self) -> Duration {
		self.duration
	}

	/// Bitrate of the whole file (kbps)
	pub fn overall_bitrate(&self) -> u32 {
		self.overall_bitrate
	}

	/// Bitrate of the sound data (kbps)
	pub fn audio_bitrate(&self) -> u32 {
		self.audio_bitrate
	}

	/// Sample rate (Hz), rounded from the 80-bit float in `COMM`
	pub fn sample_rate(&self) -> u32 {
		self.sample_rate
	}

	/// Bits per sample
	pub fn sample_size(&self) -> u16 {
		self.sample_size
	}

	/// Channel count
	pub fn channels(&self) -> u16 {
		self.channels
	}

	/// The compression, only present for AIFC files
	pub fn compression(&self) -> Option<&AiffCompression> {
		self.compression.as_ref()
	}
}

// A Pascal string, a length byte followed by that many bytes
fn read_pstring(reader: &mut &[u8]) -> Result<String> {
	let len = usize::from(reader.read_u8()?);
	if len == 0 {
		return Ok(String::new());
	}

	let mut bytes = try_vec![0; len];
	reader.read_exact(&mut bytes)?;
	utf8_decode(bytes)
}

// Bitrate in kbps of `bytes` played over `millis`, rounded to nearest
fn kbps(bytes: u64, millis: f64) -> u32 {
	((bytes as f64) * 8.0 / millis).round() as u32
}

pub(super) fn read_properties(
	mut comm: &[u8],
	aifc: bool,
	stream_len: u64,
	file_length: u64,
) -> Result<AiffProperties> {
	let reader = &mut comm;

	let channels = reader.read_u16::<BigEndian>()?;
	if channels == 0 {
		decode_err!(@BAIL Aiff, "\"COMM\" chunk declares no channels");
	}

	let sample_frames = reader.read_u32::<BigEndian>()?;
	let sample_size = reader.read_u16::<BigEndian>()?;

	let rate = reader.read_f80()?.as_f64();
	if !rate.is_finite() || rate.is_sign_negative() {
		decode_err!(@BAIL Aiff, "\"COMM\" chunk has an invalid sample rate");
	}

	let mut properties = AiffProperties {
		sample_rate: rate.round() as u32,
		sample_size,
		channels,
		..AiffProperties::default()
	};

	// AIFC appends the compression type and its name
	if aifc && reader.len() >= 5 {
		properties.compression = Some(AiffCompression {
			compression_type: reader.read_fourcc()?,
			compression_name: read_pstring(reader)?,
		});
	}

	if properties.sample_rate > 0 && sample_frames > 0 {
		let millis = f64::from(sample_frames) * 1000.0 / f64::from(properties.sample_rate);

		properties.duration = Duration::from_millis(millis as u64);
		properties.overall_bitrate = kbps(file_length, millis);
		properties.audio_bitrate = kbps(stream_len, millis);
	}

	Ok(properties)
}
