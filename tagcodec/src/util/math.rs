use std::time::Duration;

/// Perform a rounded division.
///
/// This is implemented for all unsigned integers.
pub(crate) trait RoundedDivision<Rhs = Self> {
	type Output;

	fn div_round(self, rhs: Rhs) -> Self::Output;
}

macro_rules! unsigned_rounded_division {
	($($t:ty),*) => {
		$(
			impl RoundedDivision for $t {
				type Output = $t;

				fn div_round(self, rhs: Self) -> Self::Output {
					(self + (rhs >> 1)) / rhs
				}
			}
		)*
	};
}

unsigned_rounded_division!(u8, u16, u32, u64, u128, usize);

/// Derive an audio bitrate in kbps from the size of the audio data and the precise duration
///
/// This is `audio_bytes * 8 / 1000 / seconds`, truncated toward zero. DSF, DFF and FLAC
/// bitrates are expected to match reference tooling output exactly.
pub(crate) fn bitrate_from_length(audio_bytes: u64, length: Duration) -> u32 {
	let seconds = length.as_secs_f64();
	if seconds <= 0.0 {
		return 0;
	}

	(audio_bytes as f64 * 8.0 / 1000.0 / seconds) as u32
}

/// An 80-bit extended precision floating-point number.
///
/// The AIFF `COMM` chunk stores its sample rate this way.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub(crate) struct F80 {
	signed: bool,
	// 15-bit exponent with a bias of 16383
	exponent: u16,
	fraction: u64,
}

impl F80 {
	/// Create a new `F80` from big-endian bytes.
	///
	/// See [here](https://en.wikipedia.org/wiki/Extended_precision#/media/File:X86_Extended_Floating_Point_Format.svg) for a diagram of the format.
	pub fn from_be_bytes(bytes: [u8; 10]) -> Self {
		let signed = bytes[0] & 0x80 != 0;
		let exponent = (u16::from(bytes[0] & 0x7F) << 8) | u16::from(bytes[1]);

		let mut fraction_bytes = [0; 8];
		fraction_bytes.copy_from_slice(&bytes[2..]);
		let fraction = u64::from_be_bytes(fraction_bytes);

		Self {
			signed,
			exponent,
			fraction,
		}
	}

	/// Convert the `F80` to an `f64`.
	pub fn as_f64(&self) -> f64 {
		// Apple Numerics Manual, Second Edition, Table 2-7
		let sign = if self.signed { 1 } else { 0 };

		if self.exponent == 32767 {
			if self.fraction == 0 {
				return f64::from_bits((sign << 63) | f64::INFINITY.to_bits());
			}

			return f64::from_bits((sign << 63) | f64::NAN.to_bits());
		}

		// Zero
		if self.fraction == 0 {
			return f64::from_bits(sign << 63);
		}

		let fraction = self.fraction & 0x7FFF_FFFF_FFFF_FFFF;
		let exponent = self.exponent as i16 - 16383 + 1023;
		let bits = (sign << 63) | ((exponent as u64) << 52) | (fraction >> 11);

		f64::from_bits(bits)
	}
}
