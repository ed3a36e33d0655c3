mod util;

use alacenc::error::ErrorKind;
use alacenc::tag::Tags;
use alacenc::{encode, EncodeOptions};

use util::AtomRef;

fn options() -> EncodeOptions {
	EncodeOptions::new().show_progress(false).fast(true)
}

fn encode_wav(file: &[u8]) -> Vec<u8> {
	let mut output = Vec::new();
	let summary = encode(&mut &file[..], &mut output, &Tags::new(), options(), |_| {}).unwrap();
	assert_eq!(summary.bytes_written, output.len() as u64);
	output
}

fn stereo_16(data_len: usize) -> Vec<u8> {
	util::classic_wav(&util::fmt_chunk(1, 2, 44100, 16), &[], &util::pcm(data_len))
}

fn stbl(file: &[u8]) -> AtomRef<'_> {
	util::find_top(file, b"moov").path(&[b"trak", b"mdia", b"minf", b"stbl"])
}

fn sample_sizes(file: &[u8]) -> Vec<u32> {
	let stsz = stbl(file).child(b"stsz");
	let count = stsz.u32_at(8) as usize;
	(0..count).map(|i| stsz.u32_at(12 + i * 4)).collect()
}

fn time_to_sample(file: &[u8]) -> Vec<(u32, u32)> {
	let stts = stbl(file).child(b"stts");
	let count = stts.u32_at(4) as usize;
	(0..count)
		.map(|i| (stts.u32_at(8 + i * 8), stts.u32_at(12 + i * 8)))
		.collect()
}

#[test]
fn top_level_layout() {
	let file = encode_wav(&stereo_16(4096 * 4 * 2 + 400));

	let top = util::top_level(&file);
	let idents: Vec<[u8; 4]> = top.iter().map(|atom| atom.ident).collect();
	assert_eq!(idents, [*b"ftyp", *b"free", *b"mdat", *b"moov"]);

	assert_eq!(&top[0].body[..4], b"M4A ");
	assert_eq!(top[1].size(), 8);
	assert_eq!(top[2].offset, 36);

	util::check_sizes(&top[3]);
}

#[test]
fn sample_tables_match_mdat() {
	let file = encode_wav(&stereo_16(4096 * 4 * 2 + 400));
	let mdat = util::find_top(&file, b"mdat");

	// Two full escape packets, then 100 frames with an explicit sample count
	let sizes = sample_sizes(&file);
	assert_eq!(sizes, [16388, 16388, 408]);
	assert_eq!(
		sizes.iter().map(|size| *size as usize).sum::<usize>(),
		mdat.body.len()
	);

	let stco = stbl(&file).child(b"stco");
	assert_eq!(stco.u32_at(4), 1);
	assert_eq!(stco.u32_at(8) as usize, mdat.offset + 8);

	// One chunk holding every sample
	let stsc = stbl(&file).child(b"stsc");
	assert_eq!(stsc.u32_at(4), 1);
	assert_eq!(stsc.u32_at(12), 3);
}

#[test]
fn short_last_packet_gets_its_own_run() {
	let file = encode_wav(&stereo_16(4096 * 4 * 2 + 400));
	assert_eq!(time_to_sample(&file), [(2, 4096), (1, 100)]);
}

#[test]
fn whole_packets_share_one_run() {
	let file = encode_wav(&stereo_16(4096 * 4 * 3));
	assert_eq!(time_to_sample(&file), [(3, 4096)]);
	assert_eq!(sample_sizes(&file), [16388; 3]);
}

#[test]
fn empty_audio() {
	let file = encode_wav(&stereo_16(0));

	assert!(sample_sizes(&file).is_empty());
	assert!(time_to_sample(&file).is_empty());
	assert_eq!(util::find_top(&file, b"mdat").size(), 8);
}

#[test]
fn durations() {
	// 1000 bytes at 176400 bytes per second
	let file = encode_wav(&stereo_16(1000));
	let moov = util::find_top(&file, b"moov");

	let mvhd = moov.child(b"mvhd");
	assert_eq!(mvhd.u32_at(12), 1000);
	assert_eq!(mvhd.u32_at(16), 6);

	let tkhd = moov.path(&[b"trak", b"tkhd"]);
	assert_eq!(&tkhd.body[..4], [0, 0, 0, 3]);
	assert_eq!(tkhd.u32_at(12), 1);
	assert_eq!(tkhd.u32_at(20), 5);

	let mdhd = moov.path(&[b"trak", b"mdia", b"mdhd"]);
	assert_eq!(mdhd.u32_at(12), 44100);
	assert_eq!(mdhd.u32_at(16), 0);
}

#[test]
fn sample_description() {
	let file = util::classic_wav(&util::fmt_chunk(1, 1, 48000, 24), &[], &util::pcm(300));
	let file = encode_wav(&file);

	let stsd = stbl(&file).child(b"stsd");
	assert_eq!(stsd.u32_at(4), 1);

	let entry = stsd.child(b"alac");
	assert_eq!(&entry.body[16..18], [0, 1]);
	assert_eq!(&entry.body[18..20], [0, 24]);
	assert_eq!(entry.u32_at(24), 48000 << 16);

	let cookie = util::atoms(&entry.body[28..], entry.offset + 36);
	assert_eq!(cookie.len(), 1);
	assert_eq!(&cookie[0].ident, b"alac");

	// Full box header, then the ALAC specific config
	let config = &cookie[0].body[4..];
	assert_eq!(config.len(), 24);
	assert_eq!(&config[..4], 4096u32.to_be_bytes());
	assert_eq!(config[5], 24);
	assert_eq!(config[9], 1);
	assert_eq!(&config[20..24], 48000u32.to_be_bytes());
}

#[test]
fn multichannel_cookie_has_layout() {
	let file = util::classic_wav(&util::fmt_chunk(1, 6, 48000, 16), &[], &util::pcm(6 * 2 * 10));
	let file = encode_wav(&file);

	let entry = stbl(&file).child(b"stsd").child(b"alac");
	let cookie = util::atoms(&entry.body[28..], entry.offset + 36);
	let config = &cookie[0].body[4..];

	assert_eq!(config.len(), 24 + 24);
	assert_eq!(&config[28..32], b"chan");
}

#[test]
fn wave64_input() {
	let file = util::wave64(&util::fmt_chunk(1, 2, 44100, 16), &[], &util::pcm(4096 * 4 + 40));
	let file = encode_wav(&file);

	assert_eq!(sample_sizes(&file), [16388, 48]);
	assert_eq!(time_to_sample(&file), [(1, 4096), (1, 10)]);
}

#[test]
fn unsupported_bit_depth_writes_nothing() {
	let file = util::classic_wav(&util::fmt_chunk(1, 2, 44100, 12), &[], &util::pcm(40));

	let mut output = Vec::new();
	let err = encode(&mut &file[..], &mut output, &Tags::new(), options(), |_| {}).unwrap_err();

	assert!(matches!(err.kind(), ErrorKind::UnsupportedBitDepth(12)));
	assert_eq!(err.to_string(), "Unsupported bitsPerSample 12");
	assert!(output.is_empty());
}

#[test]
fn float_input_writes_nothing() {
	let file = util::classic_wav(&util::fmt_chunk(3, 2, 44100, 32), &[], &util::pcm(40));

	let mut output = Vec::new();
	let err = encode(&mut &file[..], &mut output, &Tags::new(), options(), |_| {}).unwrap_err();

	assert!(matches!(err.kind(), ErrorKind::UnsupportedFormat(3)));
	assert!(output.is_empty());
}

#[test]
fn truncated_audio() {
	let mut file = stereo_16(400);
	file.truncate(file.len() - 100);

	let mut output = Vec::new();
	let err = encode(&mut &file[..], &mut output, &Tags::new(), options(), |_| {}).unwrap_err();
	assert!(matches!(
		err.kind(),
		ErrorKind::ShortRead {
			expected: 400,
			actual: 300
		}
	));
}

#[test]
fn progress_reaches_100() {
	let file = stereo_16(4096 * 4 * 4);

	let mut seen = Vec::new();
	let options = EncodeOptions::new().fast(true);
	encode(&mut &file[..], &mut Vec::new(), &Tags::new(), options, |p| seen.push(p)).unwrap();

	assert_eq!(seen, [0, 25, 50, 75, 100]);
}

#[test]
fn quiet_reports_nothing() {
	let file = stereo_16(4096 * 4);

	let mut seen = Vec::new();
	encode(&mut &file[..], &mut Vec::new(), &Tags::new(), options(), |p| seen.push(p)).unwrap();

	assert!(seen.is_empty());
}
