use super::atom_info::AtomInfo;
use super::moov::Moov;
use super::read::{AtomReader, find_child_atom, skip_atom};
use crate::error::Result;
use crate::macros::{decode_err, try_vec};
use crate::properties::AudioProperties;
use crate::util::math::RoundedDivision;

use std::io::{Read, Seek, SeekFrom};
use std::time::Duration;

/// An MP4 file's audio codec
#[allow(missing_docs)]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Mp4Codec {
	#[default]
	Unknown,
	AAC,
	ALAC,
	MP3,
	FLAC,
}

/// An MP4 file's audio properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub struct Mp4Properties {
	pub(crate) codec: Mp4Codec,
	pub(crate) duration: Duration,
	pub(crate) overall_bitrate: u32,
	pub(crate) audio_bitrate: u32,
	pub(crate) sample_rate: u32,
	pub(crate) bit_depth: Option<u8>,
	pub(crate) channels: u8,
}

impl From<Mp4Properties> for AudioProperties {
	fn from(input: Mp4Properties) -> Self {
		Self {
			duration: input.duration,
			overall_bitrate: Some(input.overall_bitrate),
			audio_bitrate: Some(input.audio_bitrate),
			sample_rate: Some(input.sample_rate),
			bit_depth: input.bit_depth,
			channels: Some(input.channels),
		}
	}
}

impl Mp4Properties {
	/// Duration of the audio
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

	/// Sample rate (Hz)
	pub fn sample_rate(&self) -> u32 {
		self.sample_rate
	}

	/// Bits per sample, only known for lossless codecs
	pub fn bit_depth(&self) -> Option<u8> {
		self.bit_depth
	}

	/// Channel count
	pub fn channels(&self) -> u8 {
		self.channels
	}

	/// The audio codec of the first audio track
	pub fn codec(&self) -> Mp4Codec {
		self.codec
	}
}

pub(super) fn read_properties<R>(
	reader: &mut AtomReader<R>,
	moov: &Moov,
	file_length: u64,
) -> Result<Mp4Properties>
where
	R: Read + Seek,
{
	let mut properties = Mp4Properties::default();

	let Some(mvhd) = moov.mvhd else {
		decode_err!(@BAIL Mp4, "File is missing a \"mvhd\" atom");
	};

	reader.seek(SeekFrom::Start(mvhd.start + mvhd.header_size()))?;
	let (timescale, duration) = read_mvhd(reader)?;

	if timescale > 0 {
		let duration_millis = (u128::from(duration) * 1000).div_round(u128::from(timescale));
		properties.duration = Duration::from_millis(duration_millis as u64);
	}

	match find_stsd(reader, &moov.traks)? {
		Some(stsd) => read_stsd(&stsd, &mut properties)?,
		None => log::warn!("File contains no audio tracks"),
	}

	let duration_millis = properties.duration.as_millis();
	if duration_millis == 0 {
		log::warn!("Duration is 0, unable to calculate bitrate");
		return Ok(properties);
	}

	properties.overall_bitrate = (u128::from(file_length) * 8 / duration_millis) as u32;

	match mdat_length(reader)? {
		Some(mdat_len) => {
			properties.audio_bitrate = (u128::from(mdat_len) * 8 / duration_millis) as u32;
		},
		None => log::warn!("No \"mdat\" atom found, unable to calculate the audio bitrate"),
	}

	Ok(properties)
}

// Returns (timescale, duration)
fn read_mvhd<R>(reader: &mut AtomReader<R>) -> Result<(u32, u64)>
where
	R: Read + Seek,
{
	let version = reader.read_u8()?;
	// Flags (3)
	reader.seek(SeekFrom::Current(3))?;

	if version == 1 {
		// Creation time (8), modification time (8)
		reader.seek(SeekFrom::Current(16))?;
		let timescale = reader.read_u32()?;
		let duration = reader.read_u64()?;
		return Ok((timescale, duration));
	}

	// Creation time (4), modification time (4)
	reader.seek(SeekFrom::Current(8))?;
	let timescale = reader.read_u32()?;
	let duration = reader.read_u32()?;

	Ok((timescale, u64::from(duration)))
}

/// Find the `stsd` content of the first track with a `soun` handler
fn find_stsd<R>(reader: &mut AtomReader<R>, traks: &[AtomInfo]) -> Result<Option<Vec<u8>>>
where
	R: Read + Seek,
{
	let parse_mode = reader.parse_mode();

	for mdia in traks {
		reader.seek(SeekFrom::Start(mdia.start + mdia.header_size()))?;

		let mut is_audio = false;
		let mut minf = None;

		while reader.stream_position()? + 8 <= mdia.end() {
			let Some(atom) = reader.next()? else { break };

			match &atom.ident {
				b"hdlr" if atom.content_len() >= 12 => {
					// Version/flags (4), pre-defined (4)
					reader.seek(SeekFrom::Current(8))?;

					let mut handler_type = [0; 4];
					reader.read_exact(&mut handler_type)?;
					is_audio = &handler_type == b"soun";
				},
				b"minf" => minf = Some(atom),
				_ => {},
			}

			skip_atom(reader, &atom)?;
		}

		let (true, Some(minf)) = (is_audio, minf) else {
			continue;
		};

		reader.seek(SeekFrom::Start(minf.start + minf.header_size()))?;
		let Some(stbl) = find_child_atom(reader, minf.end(), *b"stbl", parse_mode)? else {
			continue;
		};

		let Some(stsd) = find_child_atom(reader, stbl.end(), *b"stsd", parse_mode)? else {
			continue;
		};

		let mut content = try_vec![0; stsd.content_len() as usize];
		reader.read_exact(&mut content)?;
		return Ok(Some(content));
	}

	Ok(None)
}

fn be_u16(bytes: &[u8], at: usize) -> Option<u16> {
	Some(u16::from_be_bytes(bytes.get(at..at + 2)?.try_into().ok()?))
}

fn be_u32(bytes: &[u8], at: usize) -> Option<u32> {
	Some(u32::from_be_bytes(bytes.get(at..at + 4)?.try_into().ok()?))
}

/// Read the first sample entry of an `stsd` atom
fn read_stsd(stsd: &[u8], properties: &mut Mp4Properties) -> Result<()> {
	// Version/flags (4), entry count (4)
	const ENTRY_START: usize = 8;
	// Entry header (8), reserved (6), data reference index (2), version (2), revision (2),
	// vendor (4)
	const CHANNELS_OFFSET: usize = 24;
	// Channels (2), sample size (2), compression ID (2), packet size (2), 16.16 sample rate (4)
	const CHILDREN_OFFSET: usize = CHANNELS_OFFSET + 12;

	let Some(entry_len) = be_u32(stsd, ENTRY_START) else {
		decode_err!(@BAIL Mp4, "\"stsd\" atom has no sample entries");
	};

	let Some(entry) = stsd.get(ENTRY_START..ENTRY_START + entry_len as usize) else {
		decode_err!(@BAIL Mp4, "\"stsd\" sample entry is truncated");
	};

	if entry.len() < CHILDREN_OFFSET {
		decode_err!(@BAIL Mp4, "Audio sample entry is too short");
	}

	let channels = be_u16(entry, CHANNELS_OFFSET).unwrap_or_default();
	let sample_size = be_u16(entry, CHANNELS_OFFSET + 2).unwrap_or_default();
	let sample_rate = be_u16(entry, CHANNELS_OFFSET + 8).unwrap_or_default();

	properties.channels = channels as u8;
	properties.sample_rate = u32::from(sample_rate);

	let children = &entry[CHILDREN_OFFSET..];

	match &entry[4..8] {
		b"mp4a" => {
			properties.codec = Mp4Codec::AAC;
			if let Some(esds) = child(children, b"esds") {
				read_esds(esds, properties);
			}
		},
		b"alac" => {
			properties.codec = Mp4Codec::ALAC;
			properties.bit_depth = Some(sample_size as u8);
			if let Some(alac) = child(children, b"alac") {
				read_alac_config(alac, properties);
			}
		},
		b"fLaC" => {
			properties.codec = Mp4Codec::FLAC;
			properties.bit_depth = Some(sample_size as u8);
		},
		b".mp3" => properties.codec = Mp4Codec::MP3,
		other => log::warn!(
			"Found unsupported sample entry: {:?}",
			other.escape_ascii().to_string()
		),
	}

	Ok(())
}

/// The content of the first child atom named `ident`
fn child<'a>(mut atoms: &'a [u8], ident: &[u8; 4]) -> Option<&'a [u8]> {
	while atoms.len() >= 8 {
		let size = be_u32(atoms, 0)? as usize;
		if size < 8 || size > atoms.len() {
			return None;
		}

		if &atoms[4..8] == ident {
			return Some(&atoms[8..size]);
		}

		atoms = &atoms[size..];
	}

	None
}

// Only the object type of the decoder config is of interest
fn read_esds(esds: &[u8], properties: &mut Mp4Properties) {
	const ELEMENTARY_DESCRIPTOR_TAG: u8 = 0x03;
	const DECODER_CONFIG_TAG: u8 = 0x04;

	// Version/flags
	let mut descriptors = esds.get(4..).unwrap_or_default();

	let Some((ELEMENTARY_DESCRIPTOR_TAG, rest)) = descriptor(descriptors) else {
		return;
	};

	// Elementary stream ID (2), flags (1)
	descriptors = rest.get(3..).unwrap_or_default();

	let Some((DECODER_CONFIG_TAG, config)) = descriptor(descriptors) else {
		return;
	};

	properties.codec = match config.first() {
		Some(0x40 | 0x41 | 0x66 | 0x67 | 0x68) => Mp4Codec::AAC,
		Some(0x69 | 0x6B) => Mp4Codec::MP3,
		_ => Mp4Codec::Unknown,
	};
}

// Returns the tag and the bytes after the variable length size
fn descriptor(bytes: &[u8]) -> Option<(u8, &[u8])> {
	let (&tag, mut rest) = bytes.split_first()?;

	for _ in 0..4 {
		let (&b, remaining) = rest.split_first()?;
		rest = remaining;
		if b & 0x80 == 0 {
			break;
		}
	}

	Some((tag, rest))
}

fn read_alac_config(alac: &[u8], properties: &mut Mp4Properties) {
	// Version/flags (4), frame length (4), compatible version (1)
	let Some(&sample_size) = alac.get(9) else {
		return;
	};

	properties.bit_depth = Some(sample_size);

	// Rice parameters (3)
	if let Some(&channels) = alac.get(13) {
		properties.channels = channels;
	}

	// Max run (2), max frame size (4), average bitrate (4)
	if let Some(sample_rate) = be_u32(alac, 24) {
		properties.sample_rate = sample_rate;
	}
}

fn mdat_length<R>(reader: &mut AtomReader<R>) -> Result<Option<u64>>
where
	R: Read + Seek,
{
	reader.rewind()?;

	while let Some(atom) = reader.next()? {
		if &atom.ident == b"mdat" {
			return Ok(Some(atom.content_len()));
		}

		skip_atom(reader, &atom)?;
	}

	Ok(None)
}

#[cfg(test)]
mod tests {
	use super::{Mp4Codec, read_stsd};
	use crate::mp4::properties::Mp4Properties;

	/// An `stsd` content with a single 44.1kHz stereo AAC entry
	fn stsd() -> Vec<u8> {
		let mut esds = vec![0, 0, 0, 0, 0x03, 0x19, 0, 1, 0, 0x04, 0x11, 0x40];
		esds.extend_from_slice(&[0; 16]);

		let mut entry = Vec::new();
		entry.extend_from_slice(&[0; 6]);
		entry.extend_from_slice(&1_u16.to_be_bytes());
		entry.extend_from_slice(&[0; 8]);
		entry.extend_from_slice(&2_u16.to_be_bytes());
		entry.extend_from_slice(&16_u16.to_be_bytes());
		entry.extend_from_slice(&[0; 4]);
		entry.extend_from_slice(&(44100_u32 << 16).to_be_bytes());
		entry.extend_from_slice(&((esds.len() + 8) as u32).to_be_bytes());
		entry.extend_from_slice(b"esds");
		entry.extend(esds);

		let mut stsd = vec![0, 0, 0, 0, 0, 0, 0, 1];
		stsd.extend_from_slice(&((entry.len() + 8) as u32).to_be_bytes());
		stsd.extend_from_slice(b"mp4a");
		stsd.extend(entry);
		stsd
	}

	#[test_log::test]
	fn aac_sample_entry() {
		let mut properties = Mp4Properties::default();
		read_stsd(&stsd(), &mut properties).unwrap();

		assert_eq!(properties.codec(), Mp4Codec::AAC);
		assert_eq!(properties.channels(), 2);
		assert_eq!(properties.sample_rate(), 44100);
		assert_eq!(properties.bit_depth(), None);
	}

	#[test_log::test]
	fn truncated_sample_entry() {
		let mut stsd = stsd();
		stsd.truncate(20);

		let mut properties = Mp4Properties::default();
		assert!(read_stsd(&stsd, &mut properties).is_err());
	}
}
