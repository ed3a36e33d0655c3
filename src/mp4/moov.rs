use super::atom::{Atom, Payload};
use super::ilst::ilst;
use super::mux::MuxedAudio;
use crate::codec::AudioFormatDescription;
use crate::error::Result;
use crate::iff::wav::WavHeader;
use crate::macros::err;
use crate::tag::Tags;

/// Movie time scale, in units per second
const MOVIE_TIME_SCALE: u32 = 1000;
const TRACK_ID: u32 = 1;

/// 16.16 and 2.30 fixed point unity matrix
const UNITY_MATRIX: [u32; 9] = [
	0x0001_0000, 0, 0, //
	0, 0x0001_0000, 0, //
	0, 0, 0x4000_0000,
];

/// Everything the `moov` atom is built from
///
/// All of this is known only after the audio has been written.
#[derive(Copy, Clone)]
pub struct MovieContext<'a> {
	/// The source header
	pub header: &'a WavHeader,
	/// The encoded stream
	pub output: &'a AudioFormatDescription,
	/// The result of writing `mdat`
	pub audio: &'a MuxedAudio,
	/// The encoder's magic cookie
	pub magic_cookie: &'a [u8],
	/// Metadata for `udta`
	pub tags: &'a Tags,
}

impl MovieContext<'_> {
	/// Number of sample frames in the source
	fn total_frames(&self) -> u64 {
		match u64::from(self.output.bytes_per_frame()) {
			0 => 0,
			bytes_per_frame => self.header.data_size() / bytes_per_frame,
		}
	}
}

fn matrix(payload: Payload) -> Payload {
	UNITY_MATRIX.iter().fold(payload, |payload, value| payload.u32(*value))
}

fn to_u32(value: u64) -> Result<u32> {
	match u32::try_from(value) {
		Ok(value) => Ok(value),
		Err(_) => err!(TooMuchData),
	}
}

/// The `ftyp` atom
pub fn ftyp() -> Atom {
	let payload = Payload::new()
		.bytes(b"M4A ")
		.u32(0x0000_0200)
		.bytes(b"M4A ")
		.bytes(b"isom")
		.bytes(b"iso2")
		.finish();

	Atom::with_payload(*b"ftyp", payload)
}

/// A `free` atom occupying `size` bytes, including its header
pub fn free(size: u32) -> Atom {
	Atom::with_payload(*b"free", vec![0; size.saturating_sub(8) as usize])
}

/// The `mvhd` atom
///
/// The duration is in milliseconds, rounded up.
pub fn mvhd(ctx: &MovieContext<'_>) -> Result<Atom> {
	let byte_rate = u64::from(ctx.header.byte_rate());
	let duration = match byte_rate {
		0 => 0,
		_ => (ctx.header.data_size() * u64::from(MOVIE_TIME_SCALE) + byte_rate - 1) / byte_rate,
	};

	let payload = Payload::full_box()
		// Creation and modification time
		.u32(0)
		.u32(0)
		.u32(MOVIE_TIME_SCALE)
		.u32(to_u32(duration)?)
		// Preferred rate 1.0, preferred volume 1.0
		.u32(0x0001_0000)
		.u16(0x0100)
		.zeros(10);
	let payload = matrix(payload)
		// Preview, poster, selection and current time
		.zeros(24)
		.u32(TRACK_ID + 1)
		.finish();

	Ok(Atom::with_payload(*b"mvhd", payload))
}

/// The `tkhd` atom, flagged as enabled and in movie
///
/// The duration is the source duration in milliseconds, rounded down.
pub fn tkhd(ctx: &MovieContext<'_>) -> Result<Atom> {
	const FLAGS: [u8; 3] = [0, 0, 0x03];

	let payload = Payload::new()
		.u8(0)
		.bytes(&FLAGS)
		.u32(0)
		.u32(0)
		.u32(TRACK_ID)
		.u32(0)
		.u32(to_u32(ctx.header.duration())?)
		.zeros(8)
		// Layer, alternate group, volume
		.u16(0)
		.u16(1)
		.u16(0x0100)
		.u16(0);
	let payload = matrix(payload)
		// Width and height
		.u32(0)
		.u32(0)
		.finish();

	Ok(Atom::with_payload(*b"tkhd", payload))
}

/// The `mdhd` atom, using the sample rate as its time scale
pub fn mdhd(ctx: &MovieContext<'_>) -> Atom {
	let sample_rate = ctx.header.sample_rate();
	let duration = match sample_rate {
		0 => 0,
		_ => (ctx.header.duration() as f64 / f64::from(sample_rate) / 1000.0) as u32,
	};

	let payload = Payload::full_box()
		.u32(0)
		.u32(0)
		.u32(sample_rate)
		.u32(duration)
		// Language, quality
		.u16(0)
		.u16(0)
		.finish();

	Atom::with_payload(*b"mdhd", payload)
}

/// The `hdlr` atom of the `mdia` atom
pub fn sound_hdlr() -> Atom {
	let payload = Payload::full_box()
		.u32(0)
		.bytes(b"soun")
		.zeros(12)
		.bytes(b"SoundHandler\0")
		.finish();

	Atom::with_payload(*b"hdlr", payload)
}

/// The `smhd` atom
pub fn smhd() -> Atom {
	// Balance, reserved
	Atom::with_payload(*b"smhd", Payload::full_box().u16(0).u16(0).finish())
}

/// The `dinf` atom, with a single self reference
pub fn dinf() -> Atom {
	// Flag 1: the media data is in the same file
	let url = Atom::with_payload(*b"url ", vec![0, 0, 0, 1]);
	let dref = Atom::with_payload(*b"dref", Payload::full_box().u32(1).finish()).child(url);

	Atom::new(*b"dinf").child(dref)
}

/// The `stsd` atom, holding one `alac` sample entry
///
/// The entry stores the sample rate as 16.16 fixed point, so rates above 65535 Hz are clamped.
/// The magic cookie and `mdhd` carry the full rate.
pub fn stsd(ctx: &MovieContext<'_>) -> Atom {
	let sample_rate = ctx.output.sample_rate();
	let entry_rate = u16::try_from(sample_rate).unwrap_or_else(|_| {
		log::debug!("Clamping the sample entry rate of {sample_rate} Hz to {} Hz", u16::MAX);
		u16::MAX
	});

	let entry = Payload::new()
		.zeros(6)
		// Data reference index
		.u16(1)
		// Version, revision level, vendor
		.u16(0)
		.u16(0)
		.u32(0)
		.u16(ctx.output.channels())
		.u16(ctx.output.bits_per_sample())
		// Compression ID, packet size
		.u16(0)
		.u16(0)
		.u32(u32::from(entry_rate) << 16)
		.finish();

	let cookie = Atom::with_payload(
		*b"alac",
		Payload::full_box().bytes(ctx.magic_cookie).finish(),
	);
	let entry = Atom::with_payload(*b"alac", entry).child(cookie);

	Atom::with_payload(*b"stsd", Payload::full_box().u32(1).finish()).child(entry)
}

/// The `stsc` atom, placing every sample in a single chunk
pub fn stsc(ctx: &MovieContext<'_>) -> Result<Atom> {
	let samples = to_u32(ctx.audio.sample_sizes().len() as u64)?;

	// First chunk, samples per chunk, sample description index
	let payload = Payload::full_box()
		.u32(1)
		.u32(1)
		.u32(samples)
		.u32(1)
		.finish();

	Ok(Atom::with_payload(*b"stsc", payload))
}

/// The `stco` atom, pointing at the first byte of encoded audio
pub fn stco(ctx: &MovieContext<'_>) -> Result<Atom> {
	let payload = Payload::full_box()
		.u32(1)
		.u32(to_u32(ctx.audio.audio_start())?)
		.finish();

	Ok(Atom::with_payload(*b"stco", payload))
}

/// The `stsz` atom, with one entry per packet
pub fn stsz(ctx: &MovieContext<'_>) -> Result<Atom> {
	let sizes = ctx.audio.sample_sizes();

	let payload = Payload::full_box()
		// Sample size, 0 means every sample has an entry
		.u32(0)
		.u32(to_u32(sizes.len() as u64)?);
	let payload = sizes
		.as_slice()
		.iter()
		.fold(payload, |payload, size| payload.u32(*size))
		.finish();

	Ok(Atom::with_payload(*b"stsz", payload))
}

/// Time to sample runs, as `(sample count, sample duration)`
///
/// Every packet holds `frames_per_packet` frames, except the last, which holds whatever is
/// left. A short last packet gets its own run, after a run covering every other packet (even
/// if there are none).
pub fn time_to_sample(ctx: &MovieContext<'_>) -> Result<Vec<(u32, u32)>> {
	let num_packets = to_u32(ctx.audio.sample_sizes().len() as u64)?;
	if num_packets == 0 {
		return Ok(Vec::new());
	}

	let full = ctx.output.frames_per_packet();
	let last = ctx
		.total_frames()
		.saturating_sub(u64::from(full) * u64::from(num_packets - 1));
	let last = to_u32(last)?;

	if last < full {
		return Ok(vec![(num_packets - 1, full), (1, last)]);
	}

	Ok(vec![(num_packets, full)])
}

/// The `stts` atom
pub fn stts(ctx: &MovieContext<'_>) -> Result<Atom> {
	let runs = time_to_sample(ctx)?;

	let payload = Payload::full_box().u32(runs.len() as u32);
	let payload = runs
		.iter()
		.fold(payload, |payload, (count, duration)| {
			payload.u32(*count).u32(*duration)
		})
		.finish();

	Ok(Atom::with_payload(*b"stts", payload))
}

/// The `udta` atom, holding the item list
pub fn udta(tags: &Tags) -> Atom {
	let hdlr = Payload::new()
		.u32(0)
		.u32(0)
		.bytes(b"mdir")
		.bytes(b"appl")
		.u32(0)
		.u32(0)
		.u8(0)
		.finish();

	let meta = Atom::with_payload(*b"meta", Payload::full_box().finish())
		.child(Atom::with_payload(*b"hdlr", hdlr))
		.child(ilst(tags));

	Atom::new(*b"udta").child(meta)
}

/// Build the complete `moov` atom
///
/// # Errors
///
/// A duration, count or offset does not fit in 32 bits
pub fn moov(ctx: &MovieContext<'_>) -> Result<Atom> {
	let stbl = Atom::new(*b"stbl")
		.child(stsd(ctx))
		.child(stsc(ctx)?)
		.child(stco(ctx)?)
		.child(stsz(ctx)?)
		.child(stts(ctx)?);

	let minf = Atom::new(*b"minf")
		.child(smhd())
		.child(dinf())
		.child(stbl);

	let mdia = Atom::new(*b"mdia")
		.child(mdhd(ctx))
		.child(sound_hdlr())
		.child(minf);

	let trak = Atom::new(*b"trak").child(tkhd(ctx)?).child(mdia);

	Ok(Atom::new(*b"moov")
		.child(mvhd(ctx)?)
		.child(trak)
		.child(udta(ctx.tags)))
}
