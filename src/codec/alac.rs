use super::{escape_packet_bytes, AudioFormatDescription, PacketEncoder};
use crate::error::Result;
use crate::macros::try_vec;

/// Working space per input sample while a packet is compressed, before any fallback to an
/// escape packet (10 bits of headroom over a 32-bit sample)
const SCRATCH_BYTES_PER_SAMPLE: usize = 5;

/// Compresses 16-bit PCM with the `alac-encoder` crate
pub struct AlacCompressor {
	encoder: alac_encoder::AlacEncoder,
	input_format: alac_encoder::FormatDescription,
	scratch: Vec<u8>,
	scratch_len: usize,
	max_output_bytes: usize,
}

impl AlacCompressor {
	/// The only source bit depth the compressor accepts
	pub const BITS_PER_SAMPLE: u16 = 16;

	/// Create a compressor for the ALAC stream `output`
	pub fn new(output: &AudioFormatDescription) -> Self {
		let sample_rate = f64::from(output.sample_rate);
		let channels = u32::from(output.channels);

		let alac_format =
			alac_encoder::FormatDescription::alac(sample_rate, output.frames_per_packet, channels);
		let input_format = alac_encoder::FormatDescription::pcm::<i16>(sample_rate, channels);

		let scratch_len = output.frames_per_packet as usize
			* usize::from(output.channels)
			* SCRATCH_BYTES_PER_SAMPLE
			+ 1;

		Self {
			encoder: alac_encoder::AlacEncoder::new(&alac_format),
			input_format,
			scratch: Vec::new(),
			scratch_len,
			max_output_bytes: escape_packet_bytes(output),
		}
	}
}

/// Reorder little endian 16-bit samples into native endian ones
fn to_native_endian(frame: &[u8]) -> Vec<u8> {
	frame
		.chunks_exact(2)
		.flat_map(|s| i16::from_le_bytes([s[0], s[1]]).to_ne_bytes())
		.collect()
}

impl PacketEncoder for AlacCompressor {
	fn encode(
		&mut self,
		_input: &AudioFormatDescription,
		_output: &AudioFormatDescription,
		frame: &[u8],
	) -> Result<Vec<u8>> {
		if self.scratch.is_empty() {
			self.scratch = try_vec![0; self.scratch_len];
		}

		let input_bytes = to_native_endian(frame);
		let encoded_size = self
			.encoder
			.encode(&self.input_format, &input_bytes, &mut self.scratch);

		Ok(self.scratch[..encoded_size].to_vec())
	}

	fn max_output_bytes(&self) -> usize {
		self.max_output_bytes
	}

	fn magic_cookie(&self) -> Vec<u8> {
		self.encoder.magic_cookie().to_vec()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::iff::wav::WavHeader;

	use std::io::Cursor;

	use hound::{SampleFormat, WavSpec, WavWriter};

	/// A stereo sine sweep, written through `hound`
	fn sweep(frames: u32) -> Vec<u8> {
		let spec = WavSpec {
			channels: 2,
			sample_rate: 44100,
			bits_per_sample: 16,
			sample_format: SampleFormat::Int,
		};

		let mut cursor = Cursor::new(Vec::new());
		let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
		for frame in 0..frames {
			let t = frame as f32 / 44100.0;
			let phase = t * (200.0 + 2000.0 * t) * std::f32::consts::TAU;
			let sample = (phase.sin() * f32::from(i16::MAX) * 0.5) as i16;
			writer.write_sample(sample).unwrap();
			writer.write_sample(-sample).unwrap();
		}
		writer.finalize().unwrap();

		cursor.into_inner()
	}

	fn formats(header: &WavHeader) -> (AudioFormatDescription, AudioFormatDescription) {
		(
			AudioFormatDescription::pcm_input(header).unwrap(),
			AudioFormatDescription::alac_output(header, 4096).unwrap(),
		)
	}

	#[test]
	fn native_endian_samples() {
		let native = to_native_endian(&[0x34, 0x12, 0xFF, 0x7F, 0x00, 0x80]);

		let mut expected = Vec::new();
		expected.extend_from_slice(&0x1234_i16.to_ne_bytes());
		expected.extend_from_slice(&i16::MAX.to_ne_bytes());
		expected.extend_from_slice(&i16::MIN.to_ne_bytes());
		assert_eq!(native, expected);
	}

	#[test]
	fn sweep_compresses() {
		let file = sweep(4096 * 3 + 1000);
		let mut reader = &file[..];
		let header = WavHeader::read_from(&mut reader).unwrap();
		let (input, output) = formats(&header);

		let mut compressor = AlacCompressor::new(&output);
		assert_eq!(compressor.max_output_bytes(), 4096 * 4 + 7 + 1);

		let pcm = &reader[..header.data_size() as usize];
		let mut packets = 0;
		for frame in pcm.chunks(output.packet_bytes() as usize) {
			let packet = compressor.encode(&input, &output, frame).unwrap();

			assert!(!packet.is_empty());
			assert!(packet.len() < frame.len(), "{} >= {}", packet.len(), frame.len());
			assert!(packet.len() <= compressor.max_output_bytes());
			packets += 1;
		}

		assert_eq!(packets, 4);
	}

	#[test]
	fn cookie_comes_from_the_crate() {
		let file = sweep(16);
		let header = WavHeader::read_from(&mut &file[..]).unwrap();
		let (_, output) = formats(&header);

		let expected = alac_encoder::AlacEncoder::new(&alac_encoder::FormatDescription::alac(
			44100.0, 4096, 2,
		))
		.magic_cookie()
		.to_vec();

		let cookie = AlacCompressor::new(&output).magic_cookie();
		assert_eq!(cookie, expected);
		assert!(cookie.len() >= 24);
		assert_eq!(&cookie[..4], 4096u32.to_be_bytes());
		assert_eq!(cookie[9], 2);
	}
}
