//! Unsynchronisation and synchsafe integers
//!
//! Unsynchronisation inserts a `0x00` after every `0xFF` so that no false MPEG frame sync can
//! appear inside a tag. Synchsafe integers only use the lower 7 bits of each byte for the same reason.

use crate::error::Result;
use crate::macros::err;

/// Undo unsynchronisation, dropping every `0x00` that directly follows a `0xFF`
///
/// ```rust
/// use tagcodec::id3::v2::util::synchsafe::resynchronize;
///
/// let content = [0xFF, 0x00, 0x1A, 0xFF, 0x00, 0x00];
/// assert_eq!(resynchronize(&content), [0xFF, 0x1A, 0xFF, 0x00]);
/// ```
pub fn resynchronize(content: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(content.len());
	let mut after_ff = false;

	for &byte in content {
		if !(after_ff && byte == 0) {
			out.push(byte);
		}

		after_ff = byte == 0xFF;
	}

	out
}

/// Conversion between plain integers and their synchsafe form
pub trait SynchsafeInteger: Sized {
	/// Spread the value over 7 bits per byte
	///
	/// # Errors
	///
	/// The value needs more than 28 bits.
	///
	/// ```rust
	/// use tagcodec::id3::v2::util::synchsafe::SynchsafeInteger;
	///
	/// assert_eq!(0xFFF_FFFF_u32.synch().unwrap(), 0x7F7F_7F7F);
	/// assert!(0x1000_0000_u32.synch().is_err());
	/// ```
	fn synch(self) -> Result<Self>;

	/// Collapse a synchsafe value back to a plain integer, ignoring each byte's high bit
	fn unsynch(self) -> Self;
}

impl SynchsafeInteger for u32 {
	fn synch(self) -> Result<Self> {
		if self >> 28 != 0 {
			err!(TooMuchData);
		}

		Ok((0..4_u32).fold(0, |acc, group| acc | (((self >> (group * 7)) & 0x7F) << (group * 8))))
	}

	fn unsynch(self) -> Self {
		(0..4_u32).fold(0, |acc, group| acc | (((self >> (group * 8)) & 0x7F) << (group * 7)))
	}
}
