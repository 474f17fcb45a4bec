/// The parsing strictness mode
///
/// This only affects the decoding of tag *contents* (frames, fields, text). Structural problems
/// in a container, such as a missing `STREAMINFO` block or an unknown DFF chunk, are always fatal.
///
/// # Examples
///
/// ```rust
/// use tagcodec::config::{ParseOptions, ParsingMode};
///
/// // We only want to read spec-compliant inputs
/// let parsing_options = ParseOptions::new().parsing_mode(ParsingMode::Strict);
/// ```
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Default)]
#[non_exhaustive]
pub enum ParsingMode {
	/// Will eagerly error on invalid input
	///
	/// ## Examples of behavior
	///
	/// * Unable to decode text - The parser will error and the entire input is discarded
	/// * Encountering a malformed ID3v2 frame - The parser will error
	Strict,
	/// Default mode, less eager to error on recoverably malformed input
	///
	/// ## Examples of behavior
	///
	/// * Unable to decode text - The frame is kept as an opaque binary frame
	/// * Encountering a malformed ID3v2 frame - The rest of the tag is discarded
	#[default]
	BestAttempt,
	/// Least eager to error, may produce partial output
	///
	/// ## Examples of behavior
	///
	/// * Unable to decode text - The frame is discarded and the parser moves on
	/// * Encountering a malformed ID3v2 frame - The rest of the tag is discarded
	Relaxed,
}

/// Options to control how tagcodec parses a file
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct ParseOptions {
	pub(crate) read_properties: bool,
	pub(crate) read_tags: bool,
	pub(crate) parsing_mode: ParsingMode,
	pub(crate) read_cover_art: bool,
}

impl Default for ParseOptions {
	/// The default implementation for `ParseOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// ParseOptions {
	/// 	read_properties: true,
	/// 	read_tags: true,
	/// 	parsing_mode: ParsingMode::BestAttempt,
	/// 	read_cover_art: true,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

impl ParseOptions {
	/// Default parsing mode
	pub const DEFAULT_PARSING_MODE: ParsingMode = ParsingMode::BestAttempt;

	/// Creates a new `ParseOptions`, alias for `Default` implementation
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::config::ParseOptions;
	///
	/// let parsing_options = ParseOptions::new();
	/// ```
	#[must_use]
	pub const fn new() -> Self {
		Self {
			read_properties: true,
			read_tags: true,
			parsing_mode: Self::DEFAULT_PARSING_MODE,
			read_cover_art: true,
		}
	}

	/// Whether or not to read the audio properties
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::config::ParseOptions;
	///
	/// // By default, `read_properties` is enabled. Here, we don't want to read them.
	/// let parsing_options = ParseOptions::new().read_properties(false);
	/// ```
	pub fn read_properties(mut self, read_properties: bool) -> Self {
		self.read_properties = read_properties;
		self
	}

	/// Whether or not to read the tags
	pub fn read_tags(mut self, read_tags: bool) -> Self {
		self.read_tags = read_tags;
		self
	}

	/// The parsing mode to use, see [`ParsingMode`] for details
	pub fn parsing_mode(mut self, parsing_mode: ParsingMode) -> Self {
		self.parsing_mode = parsing_mode;
		self
	}

	/// Whether or not to read cover art
	///
	/// When disabled, ID3v2 `APIC`/`PIC` frames, FLAC `PICTURE` blocks and MP4 `covr` atoms are skipped.
	///
	/// NOTE: A tag read without its cover art will lose that art if it is written back.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::config::ParseOptions;
	///
	/// // Reading cover art is expensive, and I do not need it!
	/// let parsing_options = ParseOptions::new().read_cover_art(false);
	/// ```
	pub fn read_cover_art(mut self, read_cover_art: bool) -> Self {
		self.read_cover_art = read_cover_art;
		self
	}
}
