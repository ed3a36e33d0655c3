/// A WAV file's format
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WavFormat {
	/// Integer PCM
	Pcm,
	/// IEEE floating point
	IeeeFloat,
	/// WAVE_FORMAT_EXTENSIBLE, the real format is in the sub-format GUID
	Extensible,
	/// Any other format code
	Other(u16),
}

impl WavFormat {
	const PCM: u16 = 0x0001;
	const IEEE_FLOAT: u16 = 0x0003;
	const EXTENSIBLE: u16 = 0xFFFE;

	/// The format code as stored in the fmt chunk
	pub fn code(self) -> u16 {
		match self {
			WavFormat::Pcm => Self::PCM,
			WavFormat::IeeeFloat => Self::IEEE_FLOAT,
			WavFormat::Extensible => Self::EXTENSIBLE,
			WavFormat::Other(code) => code,
		}
	}
}

impl From<u16> for WavFormat {
	fn from(code: u16) -> Self {
		match code {
			Self::PCM => WavFormat::Pcm,
			Self::IEEE_FLOAT => WavFormat::IeeeFloat,
			Self::EXTENSIBLE => WavFormat::Extensible,
			other => WavFormat::Other(other),
		}
	}
}

/// The trailing fields of a 40 byte (WAVE_FORMAT_EXTENSIBLE) fmt chunk
///
/// These are captured as-is, the channel mask is never interpreted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct WavExtension {
	pub(crate) valid_bits_per_sample: u16,
	pub(crate) channel_mask: u32,
	pub(crate) sub_format: [u8; 16],
}

impl WavExtension {
	/// Number of meaningful bits in each sample, at most `bits_per_sample`
	pub fn valid_bits_per_sample(&self) -> u16 {
		self.valid_bits_per_sample
	}

	/// Speaker position mask
	pub fn channel_mask(&self) -> u32 {
		self.channel_mask
	}

	/// The sub-format GUID, the first two bytes are the data format code
	pub fn sub_format(&self) -> [u8; 16] {
		self.sub_format
	}

	/// The data format code embedded in the sub-format GUID
	pub fn sub_format_code(&self) -> u16 {
		u16::from_le_bytes([self.sub_format[0], self.sub_format[1]])
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn format_codes() {
		assert_eq!(WavFormat::from(1), WavFormat::Pcm);
		assert_eq!(WavFormat::from(3), WavFormat::IeeeFloat);
		assert_eq!(WavFormat::from(0xFFFE), WavFormat::Extensible);
		assert_eq!(WavFormat::from(0x55), WavFormat::Other(0x55));
		assert_eq!(WavFormat::Other(0x55).code(), 0x55);
		assert_eq!(WavFormat::Extensible.code(), 0xFFFE);
	}

	#[test]
	fn sub_format_code() {
		let mut ext = WavExtension::default();
		ext.sub_format[0] = 0x01;
		assert_eq!(ext.sub_format_code(), 1);
	}
}
