use crate::error::Result;
use crate::macros::err;

macro_rules! dff_chunks {
	($($(#[$meta:meta])* $variant:ident => $fourcc:literal),+ $(,)?) => {
		/// Every chunk that can appear in a DFF file
		///
		/// DSDIFF 1.5 defines a closed set of chunks, and the walk refuses anything else.
		#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
		pub enum DffChunk {
			$(
				$(#[$meta])*
				$variant,
			)+
		}

		impl DffChunk {
			/// Look up a chunk by its id
			///
			/// # Errors
			///
			/// The id is not a DSDIFF chunk, [`ErrorKind::InvalidChunk`](crate::error::ErrorKind::InvalidChunk)
			///
			/// # Examples
			///
			/// ```rust
			/// use tagcodec::dsd::dff::DffChunk;
			///
			/// assert_eq!(DffChunk::from_fourcc(*b"PROP").unwrap(), DffChunk::Prop);
			/// assert!(DffChunk::from_fourcc(*b"LIST").is_err());
			/// ```
			pub fn from_fourcc(fourcc: [u8; 4]) -> Result<Self> {
				match &fourcc {
					$($fourcc => Ok(Self::$variant),)+
					_ => err!(InvalidChunk(fourcc)),
				}
			}

			/// The chunk's id
			pub fn fourcc(self) -> [u8; 4] {
				match self {
					$(Self::$variant => *$fourcc,)+
				}
			}
		}
	};
}

dff_chunks! {
	/// The form chunk wrapping the entire file
	Frm8 => b"FRM8",
	/// Format version
	Fver => b"FVER",
	/// Property container, holding the sound properties (`FS  `, `CHNL`, `CMPR`, `ABSS` and `LSCO`)
	Prop => b"PROP",
	/// Sample rate
	Fs => b"FS  ",
	/// Channels
	Chnl => b"CHNL",
	/// Compression type
	Cmpr => b"CMPR",
	/// Absolute start time
	Abss => b"ABSS",
	/// Loudspeaker configuration
	Lsco => b"LSCO",
	/// Uncompressed sound data
	Dsd => b"DSD ",
	/// DST compressed sound data container
	Dst => b"DST ",
	/// DST frame information
	Frte => b"FRTE",
	/// A DST frame
	Dstf => b"DSTF",
	/// A DST frame CRC
	Dstc => b"DSTC",
	/// DST sound index
	Dsti => b"DSTI",
	/// Comments
	Comt => b"COMT",
	/// Edited master information container
	Diin => b"DIIN",
	/// Artist
	Diar => b"DIAR",
	/// Title
	Diti => b"DITI",
	/// Edited master ID
	Emid => b"EMID",
	/// Marker
	Mark => b"MARK",
	/// Manufacturer specific data
	Manf => b"MANF",
	/// An ID3v2 tag
	Id3 => b"ID3 ",
}
