use crate::asf::guid::HEADER_OBJECT;
use crate::tag::TagType;

use std::ffi::OsStr;
use std::path::Path;

/// List of common audio extensions
///
/// This contains the extensions for all supported [`FileType`]s, and can be used a filter
/// when scanning directories.
///
/// # Examples
///
/// ```rust
/// use tagcodec::file::EXTENSIONS;
///
/// assert!(EXTENSIONS.contains(&"dsf"));
/// ```
pub const EXTENSIONS: &[&str] = &[
	// Also update `FileType::from_ext()` below
	"wav", "wave", "aiff", "aif", "afc", "aifc", "dsf", "dff", "flac", "wma", "asf", "mp4", "m4a",
	"m4b", "m4p", "m4r", "m4v", "3gp",
];

/// The type of file read
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[allow(missing_docs)]
#[non_exhaustive]
pub enum FileType {
	Aiff,
	Asf,
	Dff,
	Dsf,
	Flac,
	Mp4,
	Wav,
}

impl FileType {
	/// Returns the only [`TagType`] this format can carry
	///
	/// | [`FileType`]                  | [`TagType`]      |
	/// |-------------------------------|------------------|
	/// | `Aiff`, `Dff`, `Dsf`, `Wav`   | `Id3v2`          |
	/// | `Flac`                        | `VorbisComments` |
	/// | `Asf`                         | `Asf`            |
	/// | `Mp4`                         | `Mp4Ilst`        |
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::file::FileType;
	/// use tagcodec::tag::TagType;
	///
	/// assert_eq!(FileType::Dsf.primary_tag_type(), TagType::Id3v2);
	/// ```
	pub fn primary_tag_type(&self) -> TagType {
		match self {
			FileType::Aiff | FileType::Dff | FileType::Dsf | FileType::Wav => TagType::Id3v2,
			FileType::Flac => TagType::VorbisComments,
			FileType::Asf => TagType::Asf,
			FileType::Mp4 => TagType::Mp4Ilst,
		}
	}

	/// Whether this format can store a tag of `tag_type`
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::file::FileType;
	/// use tagcodec::tag::TagType;
	///
	/// assert!(FileType::Dff.supports_tag_type(TagType::Id3v2));
	/// assert!(!FileType::Flac.supports_tag_type(TagType::Mp4Ilst));
	/// ```
	pub fn supports_tag_type(&self, tag_type: TagType) -> bool {
		self.primary_tag_type() == tag_type
	}

	/// Attempts to extract a [`FileType`] from an extension
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::file::FileType;
	///
	/// let extension = "dff";
	/// assert_eq!(FileType::from_ext(extension), Some(FileType::Dff));
	/// ```
	pub fn from_ext<E>(ext: E) -> Option<Self>
	where
		E: AsRef<OsStr>,
	{
		let ext = ext.as_ref().to_str()?.to_ascii_lowercase();

		// Also update `EXTENSIONS` above
		match ext.as_str() {
			"wav" | "wave" => Some(Self::Wav),
			"aiff" | "aif" | "afc" | "aifc" => Some(Self::Aiff),
			"dsf" => Some(Self::Dsf),
			"dff" => Some(Self::Dff),
			"flac" => Some(Self::Flac),
			"wma" | "asf" => Some(Self::Asf),
			"mp4" | "m4a" | "m4b" | "m4p" | "m4r" | "m4v" | "3gp" => Some(Self::Mp4),
			_ => None,
		}
	}

	/// Attempts to determine a [`FileType`] from a path
	///
	/// # Examples
	///
	/// ```rust
	/// use std::path::Path;
	/// use tagcodec::file::FileType;
	///
	/// let path = Path::new("path/to/my.dsf");
	/// assert_eq!(FileType::from_path(path), Some(FileType::Dsf));
	/// ```
	pub fn from_path<P>(path: P) -> Option<Self>
	where
		P: AsRef<Path>,
	{
		let ext = path.as_ref().extension();
		ext.and_then(Self::from_ext)
	}

	/// Attempts to extract a [`FileType`] from a buffer
	///
	/// This **will not** search past an ID3v2 tag at the start of the buffer, see
	/// [`Probe::guess_file_type`](crate::probe::Probe::guess_file_type) for that.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::file::FileType;
	///
	/// let header = b"FRM8\0\0\0\0\0\0\0\x40DSD ";
	/// assert_eq!(FileType::from_buffer(header), Some(FileType::Dff));
	/// ```
	pub fn from_buffer(buf: &[u8]) -> Option<Self> {
		match Self::from_buffer_inner(buf) {
			Some(FileTypeGuessResult::Determined(file_ty)) => Some(file_ty),
			_ => None,
		}
	}

	pub(crate) fn from_buffer_inner(buf: &[u8]) -> Option<FileTypeGuessResult> {
		use crate::id3::v2::util::synchsafe::SynchsafeInteger;

		if let Some(file_ty) = Self::quick_type_guess(buf) {
			return Some(FileTypeGuessResult::Determined(file_ty));
		}

		// The bare minimum size for an ID3v2 header is 10 bytes
		if buf.len() >= 10 && &buf[..3] == b"ID3" {
			let size = u32::from_be_bytes([buf[6], buf[7], buf[8], buf[9]]).unsynch();
			let footer = buf[5] & 0x10 == 0x10;
			return Some(FileTypeGuessResult::MaybePrecededById3 { size, footer });
		}

		None
	}

	fn quick_type_guess(buf: &[u8]) -> Option<Self> {
		if buf.len() < 4 {
			return None;
		}

		match &buf[..4] {
			b"RIFF" if buf.len() >= 12 && &buf[8..12] == b"WAVE" => Some(Self::Wav),
			b"FORM" if buf.len() >= 12 && matches!(&buf[8..12], b"AIFF" | b"AIFC") => {
				Some(Self::Aiff)
			},
			b"DSD " => Some(Self::Dsf),
			b"FRM8" if buf.len() >= 16 && &buf[12..16] == b"DSD " => Some(Self::Dff),
			b"fLaC" => Some(Self::Flac),
			_ if buf.len() >= 16 && buf[..16] == HEADER_OBJECT.as_bytes() => Some(Self::Asf),
			_ if buf.len() >= 8 && &buf[4..8] == b"ftyp" => Some(Self::Mp4),
			_ => None,
		}
	}
}

/// The result of a `FileType` guess
///
/// External callers of `FileType::from_buffer()` will only ever see `Determined` cases.
pub(crate) enum FileTypeGuessResult {
	/// The `FileType` was guessed
	Determined(FileType),
	/// The stream starts with an ID3v2 tag of `size` bytes (excluding its header and footer)
	MaybePrecededById3 { size: u32, footer: bool },
}
