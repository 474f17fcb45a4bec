use crate::id3::v2::Id3v2Version;

/// Options to control how tagcodec writes to a file
///
/// This acts as a dumping ground for all sorts of format-specific settings.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct WriteOptions {
	pub(crate) preferred_padding: Option<u32>,
	pub(crate) id3v2_version: Option<Id3v2Version>,
	pub(crate) uppercase_id3v2_chunk: bool,
	pub(crate) keep_empty_fields: bool,
}

impl WriteOptions {
	/// Default preferred padding size in bytes
	pub const DEFAULT_PREFERRED_PADDING: u32 = 1024;

	/// Creates a new `WriteOptions`, alias for `Default` implementation
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::config::WriteOptions;
	///
	/// let write_options = WriteOptions::new();
	/// ```
	pub const fn new() -> Self {
		Self {
			preferred_padding: Some(Self::DEFAULT_PREFERRED_PADDING),
			id3v2_version: None,
			uppercase_id3v2_chunk: true,
			keep_empty_fields: false,
		}
	}

	/// Set the preferred padding size in bytes
	///
	/// If the tag format being written supports padding, this will be the size of the padding
	/// in bytes.
	///
	/// NOTES:
	///
	/// * Not all tag formats support padding
	/// * An ID3v2 tag may receive one extra byte of padding, so that its total size is even
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::config::WriteOptions;
	///
	/// // I really don't want my files rewritten, so I'll double the padding size!
	/// let options = WriteOptions::new().preferred_padding(2048);
	///
	/// // ...Or I don't want padding under any circumstances!
	/// let options = WriteOptions::new().preferred_padding(0);
	/// ```
	pub fn preferred_padding(mut self, preferred_padding: u32) -> Self {
		match preferred_padding {
			0 => self.preferred_padding = None,
			_ => self.preferred_padding = Some(preferred_padding),
		}
		self
	}

	/// Force the ID3v2 version used when writing
	///
	/// By default, a tag is written in the version it was read as (or created with).
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::config::WriteOptions;
	/// use tagcodec::id3::v2::Id3v2Version;
	///
	/// // Some of my hardware only understands ID3v2.3
	/// let options = WriteOptions::new().id3v2_version(Id3v2Version::V3);
	/// ```
	pub fn id3v2_version(mut self, version: Id3v2Version) -> Self {
		self.id3v2_version = Some(version);
		self
	}

	/// Whether to uppercase the ID3v2 chunk name
	///
	/// When dealing with RIFF/AIFF files, some software may expect the ID3v2 chunk name to be
	/// lowercase. DFF files always use `ID3 `.
	pub fn uppercase_id3v2_chunk(mut self, uppercase_id3v2_chunk: bool) -> Self {
		self.uppercase_id3v2_chunk = uppercase_id3v2_chunk;
		self
	}

	/// Whether to keep fields with empty values when writing
	///
	/// By default, empty text fields are dropped when a tag is encoded.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::config::WriteOptions;
	///
	/// // An empty title still means something to me
	/// let options = WriteOptions::new().keep_empty_fields(true);
	/// ```
	pub fn keep_empty_fields(mut self, keep_empty_fields: bool) -> Self {
		self.keep_empty_fields = keep_empty_fields;
		self
	}
}

impl Default for WriteOptions {
	/// The default implementation for `WriteOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// WriteOptions {
	///     preferred_padding: 1024,
	///     id3v2_version: None,
	///     uppercase_id3v2_chunk: true,
	///     keep_empty_fields: false,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}
