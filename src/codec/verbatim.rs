use super::{
	channel_elements, escape_packet_bytes, AudioFormatDescription, PacketEncoder, ID_CPE, ID_END,
};
use crate::error::Result;

const COMPATIBLE_VERSION: u8 = 0;
const PB: u8 = 40;
const MB: u8 = 10;
const KB: u8 = 14;
const MAX_RUN: u16 = 255;

/// Writes bits most significant first
#[derive(Default)]
pub(crate) struct BitWriter {
	bytes: Vec<u8>,
	acc: u64,
	bits: u32,
}

impl BitWriter {
	pub(crate) fn with_capacity(capacity: usize) -> Self {
		Self {
			bytes: Vec::with_capacity(capacity),
			..Self::default()
		}
	}

	/// Write the low `count` bits of `value`, `count` <= 32
	pub(crate) fn write(&mut self, value: u32, count: u32) {
		debug_assert!(count <= 32);
		if count == 0 {
			return;
		}

		let mask = (1u64 << count) - 1;
		self.acc = (self.acc << count) | (u64::from(value) & mask);
		self.bits += count;

		while self.bits >= 8 {
			self.bits -= 8;
			self.bytes.push((self.acc >> self.bits) as u8);
		}

		self.acc &= (1u64 << self.bits) - 1;
	}

	/// Pad with zero bits up to the next byte boundary
	pub(crate) fn byte_align(&mut self) {
		if self.bits > 0 {
			self.write(0, 8 - self.bits);
		}
	}

	pub(crate) fn into_bytes(mut self) -> Vec<u8> {
		self.byte_align();
		self.bytes
	}
}

/// Writes every packet as an ALAC escape (uncompressed) frame
///
/// The output is a valid ALAC bitstream that any decoder can play, at roughly the size of the
/// source PCM.
pub struct VerbatimEncoder {
	frames_per_packet: u32,
	bit_depth: u16,
	channels: u16,
	sample_rate: u32,
	max_output_bytes: usize,
	max_frame_bytes: u32,
	total_bytes: u64,
	total_frames: u64,
}

impl VerbatimEncoder {
	/// Create an encoder for the ALAC stream `output`
	pub fn new(output: &AudioFormatDescription) -> Self {
		let max_output_bytes = escape_packet_bytes(output);

		Self {
			frames_per_packet: output.frames_per_packet,
			bit_depth: output.bits_per_sample,
			channels: output.channels,
			sample_rate: output.sample_rate,
			max_output_bytes,
			max_frame_bytes: 0,
			total_bytes: 0,
			total_frames: 0,
		}
	}

	fn average_bit_rate(&self) -> u32 {
		if self.total_frames == 0 {
			return 0;
		}

		let bits = self.total_bytes * 8 * u64::from(self.sample_rate);
		u32::try_from(bits / self.total_frames).unwrap_or(u32::MAX)
	}
}

/// Read the sample at `index`, truncated to `bit_depth` bits
fn sample(frame: &[u8], index: usize, bit_depth: u16) -> u32 {
	match bit_depth {
		16 => {
			let start = index * 2;
			u32::from(u16::from_le_bytes([frame[start], frame[start + 1]]))
		},
		20 => {
			let start = index * 3;
			let container = u32::from_le_bytes([0, frame[start], frame[start + 1], frame[start + 2]]);
			// Valid bits are left justified in the 24-bit container
			container >> 12
		},
		24 => {
			let start = index * 3;
			u32::from_le_bytes([frame[start], frame[start + 1], frame[start + 2], 0])
		},
		_ => {
			let start = index * 4;
			u32::from_le_bytes([
				frame[start],
				frame[start + 1],
				frame[start + 2],
				frame[start + 3],
			])
		},
	}
}

impl PacketEncoder for VerbatimEncoder {
	fn encode(
		&mut self,
		input: &AudioFormatDescription,
		_output: &AudioFormatDescription,
		frame: &[u8],
	) -> Result<Vec<u8>> {
		let channels = usize::from(self.channels);
		let bytes_per_frame = input.bytes_per_frame() as usize;
		let num_frames = frame.len() / bytes_per_frame;
		let partial = num_frames != self.frames_per_packet as usize;
		let bit_depth = u32::from(self.bit_depth);

		if frame.len() % bytes_per_frame != 0 {
			log::warn!(
				"Dropping {} trailing bytes that do not form a whole sample frame",
				frame.len() % bytes_per_frame
			);
		}

		let mut writer = BitWriter::with_capacity(self.max_output_bytes);
		let mut channel = 0;
		let mut sce_instance = 0;
		let mut cpe_instance = 0;

		for &element in channel_elements(self.channels) {
			let (instance, width) = if element == ID_CPE {
				cpe_instance += 1;
				(cpe_instance - 1, 2)
			} else {
				sce_instance += 1;
				(sce_instance - 1, 1)
			};

			writer.write(u32::from(element), 3);
			writer.write(instance, 4);
			writer.write(0, 12);
			// partial frame, no shift, escape
			writer.write((u32::from(partial) << 3) | 1, 4);
			if partial {
				writer.write(num_frames as u32, 32);
			}

			for i in 0..num_frames {
				for c in channel..channel + width {
					writer.write(sample(frame, i * channels + c, self.bit_depth), bit_depth);
				}
			}

			channel += width;
		}

		writer.write(u32::from(ID_END), 3);
		let packet = writer.into_bytes();

		self.max_frame_bytes = self.max_frame_bytes.max(packet.len() as u32);
		self.total_bytes += packet.len() as u64;
		self.total_frames += num_frames as u64;

		Ok(packet)
	}

	fn max_output_bytes(&self) -> usize {
		self.max_output_bytes
	}

	fn magic_cookie(&self) -> Vec<u8> {
		magic_cookie(
			self.frames_per_packet,
			self.bit_depth as u8,
			self.channels as u8,
			self.max_frame_bytes,
			self.average_bit_rate(),
			self.sample_rate,
		)
	}
}

/// The CoreAudio channel layout tag for a channel count
fn channel_layout_tag(channels: u8) -> u32 {
	let layout = match channels {
		1 => 100,
		2 => 101,
		3 => 113,
		4 => 116,
		5 => 120,
		6 => 124,
		7 => 142,
		_ => 127,
	};

	(layout << 16) | u32::from(channels)
}

/// Build an ALAC specific config, followed by a `chan` box for more than 2 channels
pub(crate) fn magic_cookie(
	frame_length: u32,
	bit_depth: u8,
	channels: u8,
	max_frame_bytes: u32,
	avg_bit_rate: u32,
	sample_rate: u32,
) -> Vec<u8> {
	let mut cookie = Vec::with_capacity(48);
	cookie.extend_from_slice(&frame_length.to_be_bytes());
	cookie.extend_from_slice(&[COMPATIBLE_VERSION, bit_depth, PB, MB, KB, channels]);
	cookie.extend_from_slice(&MAX_RUN.to_be_bytes());
	cookie.extend_from_slice(&max_frame_bytes.to_be_bytes());
	cookie.extend_from_slice(&avg_bit_rate.to_be_bytes());
	cookie.extend_from_slice(&sample_rate.to_be_bytes());

	if channels > 2 {
		cookie.extend_from_slice(&24u32.to_be_bytes());
		cookie.extend_from_slice(b"chan");
		cookie.extend_from_slice(&[0; 4]);
		cookie.extend_from_slice(&channel_layout_tag(channels).to_be_bytes());
		// Channel bitmap, number of channel descriptions
		cookie.extend_from_slice(&[0; 8]);
	}

	cookie
}
