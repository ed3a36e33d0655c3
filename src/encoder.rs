use crate::codec::{new_packet_encoder, AudioFormatDescription};
use crate::error::{AlacError, ErrorKind, Result};
use crate::iff::wav::WavHeader;
use crate::mp4::{moov, write_audio_data, AtomWriter, MovieContext};
use crate::tag::Tags;
use crate::EncodeOptions;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Size of the `free` atom between `ftyp` and `mdat`
const FREE_ATOM_SIZE: u32 = 8;

/// Facts about a finished encode
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EncodeSummary {
	/// The number of MP4 samples (ALAC packets) written
	pub sample_count: usize,
	/// Output offset of the first byte of encoded audio
	pub audio_start: u64,
	/// The total number of bytes written
	pub bytes_written: u64,
}

/// Encode a WAV or Wave64 stream into an M4A stream
///
/// `reader` must be positioned at the start of the WAV data. `progress` is called with the
/// percentage of PCM consumed, whenever it changes, if [`EncodeOptions::show_progress`] is set.
///
/// The input format is fully validated before anything is written.
///
/// # Errors
///
/// * The header is malformed, see [`WavHeader::read_from`]
/// * The format cannot be encoded (not integer PCM, bad bit depth or channel count)
/// * The input ends early
/// * The output would be larger than 4 GiB
/// * `reader` or `writer` fail
///
/// # Examples
///
/// ```rust,no_run
/// use alacenc::tag::Tags;
/// use alacenc::EncodeOptions;
///
/// # fn main() -> alacenc::error::Result<()> {
/// let mut input = std::fs::File::open("in.wav")?;
/// let mut output = Vec::new();
///
/// let summary = alacenc::encode(&mut input, &mut output, &Tags::new(), EncodeOptions::new(), |p| {
/// 	eprint!("{p}%\r");
/// })?;
///
/// assert_eq!(summary.bytes_written, output.len() as u64);
/// # Ok(()) }
/// ```
pub fn encode<R, W, F>(
	reader: &mut R,
	writer: &mut W,
	tags: &Tags,
	options: EncodeOptions,
	mut progress: F,
) -> Result<EncodeSummary>
where
	R: Read,
	W: Write,
	F: FnMut(u8),
{
	let header = WavHeader::read_from(reader)?;
	log::debug!(
		"Input: {:?}, {} channels, {} Hz, {} bits, {} bytes of PCM",
		header.dialect(),
		header.channels(),
		header.sample_rate(),
		header.bits_per_sample(),
		header.data_size()
	);

	let input = AudioFormatDescription::pcm_input(&header)?;
	let output = AudioFormatDescription::alac_output(&header, options.frames_per_packet)?;
	let mut encoder = new_packet_encoder(&output, options)?;

	let mut writer = AtomWriter::new(writer);
	writer.write_atom(&moov::ftyp())?;
	writer.write_atom(&moov::free(FREE_ATOM_SIZE))?;

	let progress: Option<&mut dyn FnMut(u8)> = if options.show_progress {
		Some(&mut progress)
	} else {
		None
	};

	let audio = write_audio_data(
		reader,
		&mut writer,
		&header,
		&input,
		&output,
		encoder.as_mut(),
		progress,
	)?;

	let magic_cookie = encoder.magic_cookie();
	let ctx = MovieContext {
		header: &header,
		output: &output,
		audio: &audio,
		magic_cookie: &magic_cookie,
		tags,
	};

	writer.write_atom(&moov::moov(&ctx)?)?;
	writer.flush()?;

	Ok(EncodeSummary {
		sample_count: audio.sample_sizes().len(),
		audio_start: audio.audio_start(),
		bytes_written: writer.position(),
	})
}

fn open_error(path: &Path, source: std::io::Error) -> AlacError {
	AlacError::new(ErrorKind::Open {
		path: path.to_path_buf(),
		source,
	})
}

/// Encode between two paths, where `-` means standard input or standard output
///
/// The input is opened before the output is created, so a missing input never leaves an
/// empty output file behind.
///
/// # Errors
///
/// * Either path cannot be opened
/// * See [`encode`]
pub fn encode_files<I, O, F>(
	input: I,
	output: O,
	tags: &Tags,
	options: EncodeOptions,
	progress: F,
) -> Result<EncodeSummary>
where
	I: AsRef<Path>,
	O: AsRef<Path>,
	F: FnMut(u8),
{
	let input = input.as_ref();
	let output = output.as_ref();

	let mut reader: Box<dyn Read> = if input == Path::new("-") {
		Box::new(std::io::stdin().lock())
	} else {
		let file = File::open(input).map_err(|e| open_error(input, e))?;
		Box::new(BufReader::new(file))
	};

	let mut writer: Box<dyn Write> = if output == Path::new("-") {
		Box::new(std::io::stdout().lock())
	} else {
		let file = File::create(output).map_err(|e| open_error(output, e))?;
		Box::new(BufWriter::new(file))
	};

	encode(&mut reader, &mut writer, tags, options, progress)
}
