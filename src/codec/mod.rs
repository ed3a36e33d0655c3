//! Packet encoders and the stream formats they operate on
//!
//! The muxer drives a [`PacketEncoder`] one packet at a time. Two implementations exist:
//!
//! * [`AlacCompressor`], which compresses 16-bit input with the `alac-encoder` crate
//! * [`VerbatimEncoder`], which writes uncompressed ALAC escape packets, used for deeper input
//!   and in fast mode

mod alac;
mod verbatim;

use crate::error::Result;
use crate::iff::wav::WavHeader;
use crate::macros::err;
use crate::EncodeOptions;

// Exports
pub use alac::AlacCompressor;
pub use verbatim::VerbatimEncoder;

/// ALAC element type for a single channel
pub(crate) const ID_SCE: u8 = 0;
/// ALAC element type for a channel pair
pub(crate) const ID_CPE: u8 = 1;
/// ALAC end of frame marker
pub(crate) const ID_END: u8 = 7;

/// Element tag, instance tag, unused bits, header flags, and a partial frame sample count
const MAX_ELEMENT_HEADER_BYTES: usize = 7;

/// The kind of data a stream carries
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FormatId {
	/// Little endian, signed, packed integer PCM
	LinearPcm,
	/// Apple Lossless packets
	AppleLossless,
}

/// Describes either side of a packet encoder
///
/// Created once per run, from the input's [`WavHeader`], and never modified.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AudioFormatDescription {
	pub(crate) format_id: FormatId,
	pub(crate) format_flags: u32,
	pub(crate) sample_rate: u32,
	pub(crate) channels: u16,
	pub(crate) bits_per_sample: u16,
	pub(crate) frames_per_packet: u32,
}

impl AudioFormatDescription {
	/// Describe the PCM data of `header`
	///
	/// # Errors
	///
	/// * The format is not integer PCM
	/// * The channel count is outside of `1..=8`
	pub fn pcm_input(header: &WavHeader) -> Result<Self> {
		if !header.is_integer_pcm() {
			let code = match header.extension() {
				Some(ext) => ext.sub_format_code(),
				None => header.format().code(),
			};
			err!(UnsupportedFormat(code));
		}

		let channels = header.channels();
		if channels == 0 || channels > 8 {
			err!(BadChannelCount(channels));
		}

		Ok(Self {
			format_id: FormatId::LinearPcm,
			format_flags: 0,
			sample_rate: header.sample_rate(),
			channels,
			bits_per_sample: header.bits_per_sample(),
			frames_per_packet: 1,
		})
	}

	/// Describe the ALAC stream produced from `header`
	///
	/// The format flags hold the source bit depth: 1 for 16-bit, 2 for 20-bit, 3 for 24-bit
	/// and 4 for 32-bit.
	///
	/// # Errors
	///
	/// * The bit depth is not one of 16, 20, 24 or 32
	/// * The channel count is outside of `1..=8`
	pub fn alac_output(header: &WavHeader, frames_per_packet: u32) -> Result<Self> {
		let format_flags = match header.bits_per_sample() {
			16 => 1,
			20 => 2,
			24 => 3,
			32 => 4,
			bits => err!(UnsupportedBitDepth(bits)),
		};

		let channels = header.channels();
		if channels == 0 || channels > 8 {
			err!(BadChannelCount(channels));
		}

		Ok(Self {
			format_id: FormatId::AppleLossless,
			format_flags,
			sample_rate: header.sample_rate(),
			channels,
			bits_per_sample: header.bits_per_sample(),
			frames_per_packet,
		})
	}

	/// The kind of data
	pub fn format_id(&self) -> FormatId {
		self.format_id
	}

	/// For ALAC, the source bit depth flag (1..=4), otherwise 0
	pub fn format_flags(&self) -> u32 {
		self.format_flags
	}

	/// Sample rate (Hz)
	pub fn sample_rate(&self) -> u32 {
		self.sample_rate
	}

	/// Channel count
	pub fn channels(&self) -> u16 {
		self.channels
	}

	/// Bits per sample of the PCM source
	pub fn bits_per_sample(&self) -> u16 {
		self.bits_per_sample
	}

	/// Bytes used to store a single PCM sample
	///
	/// 20-bit samples are stored in 3 byte containers.
	pub fn bytes_per_sample(&self) -> u32 {
		(u32::from(self.bits_per_sample) + 7) / 8
	}

	/// Bytes per sample frame (all channels)
	pub fn bytes_per_frame(&self) -> u32 {
		u32::from(self.channels) * self.bytes_per_sample()
	}

	/// Sample frames in a single packet
	pub fn frames_per_packet(&self) -> u32 {
		self.frames_per_packet
	}

	/// The number of PCM bytes that make up one full packet
	pub fn packet_bytes(&self) -> u32 {
		self.bytes_per_frame() * self.frames_per_packet
	}
}

/// An encoder that turns PCM frames into ALAC packets
pub trait PacketEncoder {
	/// Encode a single packet worth of PCM
	///
	/// `frame` holds at most [`AudioFormatDescription::packet_bytes`] of `output`. Only the
	/// last frame of a stream may be shorter.
	///
	/// # Errors
	///
	/// Implementation specific
	fn encode(
		&mut self,
		input: &AudioFormatDescription,
		output: &AudioFormatDescription,
		frame: &[u8],
	) -> Result<Vec<u8>>;

	/// An upper bound for the size of a single encoded packet
	fn max_output_bytes(&self) -> usize;

	/// The codec configuration for the sample description
	///
	/// This may depend on the packets encoded so far, so it should be retrieved after the
	/// last call to [`PacketEncoder::encode`].
	fn magic_cookie(&self) -> Vec<u8>;
}

/// The ALAC channel element layout for `channels`
///
/// Each entry is [`ID_SCE`] (one channel) or [`ID_CPE`] (two channels).
pub(crate) fn channel_elements(channels: u16) -> &'static [u8] {
	match channels {
		1 => &[ID_SCE],
		2 => &[ID_CPE],
		3 => &[ID_SCE, ID_CPE],
		4 => &[ID_SCE, ID_CPE, ID_SCE],
		5 => &[ID_SCE, ID_CPE, ID_CPE],
		6 => &[ID_SCE, ID_CPE, ID_CPE, ID_SCE],
		7 => &[ID_SCE, ID_CPE, ID_CPE, ID_SCE, ID_SCE],
		8 => &[ID_SCE, ID_CPE, ID_CPE, ID_CPE, ID_SCE],
		_ => &[],
	}
}

/// The size of the largest escape packet for `output`
///
/// Neither encoder ever produces a larger packet.
pub(crate) fn escape_packet_bytes(output: &AudioFormatDescription) -> usize {
	let elements = channel_elements(output.channels).len();
	output.packet_bytes() as usize + elements * MAX_ELEMENT_HEADER_BYTES + 1
}

/// Select the encoder for a run
///
/// 16-bit input is compressed, unless [`EncodeOptions::fast`] is set. The compressor only
/// accepts 16-bit sources, so 20, 24 and 32-bit input is always written as escape packets.
///
/// # Errors
///
/// `output` has no usable channel layout
pub fn new_packet_encoder(
	output: &AudioFormatDescription,
	options: EncodeOptions,
) -> Result<Box<dyn PacketEncoder>> {
	if channel_elements(output.channels).is_empty() {
		err!(BadChannelCount(output.channels));
	}

	if !options.fast && output.bits_per_sample == AlacCompressor::BITS_PER_SAMPLE {
		log::debug!("Encoding with the ALAC compressor");
		return Ok(Box::new(AlacCompressor::new(output)));
	}

	if options.fast {
		log::debug!("Fast mode, writing uncompressed packets");
	} else {
		log::debug!(
			"No compressor for {}-bit input, writing uncompressed packets",
			output.bits_per_sample
		);
	}

	Ok(Box::new(VerbatimEncoder::new(output)))
}
