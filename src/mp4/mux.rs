use super::atom::AtomWriter;
use crate::codec::{AudioFormatDescription, PacketEncoder};
use crate::error::{AlacError, ErrorKind, Result};
use crate::iff::wav::WavHeader;
use crate::macros::{err, try_vec};

use std::io::{Read, Write};

/// The encoded size of every packet, in stream order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SampleSizeTable(Vec<u32>);

impl SampleSizeTable {
	/// Create an empty table
	pub fn new() -> Self {
		Self::default()
	}

	/// Append the size of the next packet
	pub fn push(&mut self, size: u32) {
		self.0.push(size);
	}

	/// The number of packets
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether no packets were recorded
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// The sum of all packet sizes
	pub fn total(&self) -> u64 {
		self.0.iter().map(|size| u64::from(*size)).sum()
	}

	/// The packet sizes
	pub fn as_slice(&self) -> &[u32] {
		&self.0
	}
}

/// The result of writing the `mdat` atom
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MuxedAudio {
	pub(crate) sample_sizes: SampleSizeTable,
	pub(crate) audio_start: u64,
}

impl MuxedAudio {
	/// The encoded size of every packet
	pub fn sample_sizes(&self) -> &SampleSizeTable {
		&self.sample_sizes
	}

	/// Output offset of the first byte of encoded audio, right after the `mdat` header
	pub fn audio_start(&self) -> u64 {
		self.audio_start
	}
}

/// Reports progress as a percentage, only when it changes
pub(crate) struct Progress<'a> {
	callback: Option<&'a mut dyn FnMut(u8)>,
	last: Option<u8>,
}

impl<'a> Progress<'a> {
	pub(crate) fn new(callback: Option<&'a mut dyn FnMut(u8)>) -> Self {
		Self {
			callback,
			last: None,
		}
	}

	pub(crate) fn update(&mut self, done: u64, total: u64) {
		let Some(callback) = self.callback.as_mut() else {
			return;
		};

		let percent = if total == 0 {
			100
		} else {
			(u128::from(done) * 100 / u128::from(total)).min(100) as u8
		};

		if self.last.map_or(true, |last| percent > last) {
			self.last = Some(percent);
			callback(percent);
		}
	}
}

fn read_frame<R>(reader: &mut R, buf: &mut [u8]) -> Result<()>
where
	R: Read,
{
	let mut filled = 0;
	while filled < buf.len() {
		match reader.read(&mut buf[filled..]) {
			Ok(0) => {
				return Err(AlacError::new(ErrorKind::ShortRead {
					expected: buf.len(),
					actual: filled,
				}))
			},
			Ok(n) => filled += n,
			Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {},
			Err(e) => return Err(e.into()),
		}
	}

	Ok(())
}

/// Encode the PCM data of `header` and write it as an `mdat` atom
///
/// `reader` must be positioned at the first byte of PCM data. The encoded packets are buffered
/// until the input is exhausted, since the atom size comes first.
///
/// # Errors
///
/// * The input ends before [`WavHeader::data_size`] bytes were read
/// * `encoder` returns a packet larger than [`PacketEncoder::max_output_bytes`]
/// * The encoded audio does not fit in a 32-bit atom
/// * `encoder`, `reader` or `writer` fail
pub fn write_audio_data<R, W>(
	reader: &mut R,
	writer: &mut AtomWriter<W>,
	header: &WavHeader,
	input: &AudioFormatDescription,
	output: &AudioFormatDescription,
	encoder: &mut dyn PacketEncoder,
	progress: Option<&mut dyn FnMut(u8)>,
) -> Result<MuxedAudio>
where
	R: Read,
	W: Write,
{
	let frame_size = u64::from(output.packet_bytes());
	let total = header.data_size();

	let mut progress = Progress::new(progress);
	let mut sample_sizes = SampleSizeTable::new();
	let mut encoded = Vec::new();
	let mut frame = try_vec![0; frame_size.min(total) as usize];

	let mut remaining = total;
	while remaining > 0 {
		progress.update(total - remaining, total);

		let size = frame_size.min(remaining) as usize;
		read_frame(reader, &mut frame[..size])?;
		remaining -= size as u64;

		let packet = encoder.encode(input, output, &frame[..size])?;
		if packet.len() > encoder.max_output_bytes() {
			return Err(AlacError::new(ErrorKind::PacketTooLarge {
				size: packet.len(),
				max: encoder.max_output_bytes(),
			}));
		}

		let Ok(packet_size) = u32::try_from(packet.len()) else {
			err!(TooMuchData);
		};

		encoded.try_reserve(packet.len())?;
		encoded.extend_from_slice(&packet);
		sample_sizes.push(packet_size);
	}

	writer.write_header(*b"mdat", encoded.len() as u64)?;
	let audio_start = writer.position();
	writer.write_all(&encoded)?;

	progress.update(total, total);

	log::debug!(
		"Wrote {} packets ({} bytes) at offset {}",
		sample_sizes.len(),
		encoded.len(),
		audio_start
	);

	Ok(MuxedAudio {
		sample_sizes,
		audio_start,
	})
}
