use alacenc::error::Result;
use alacenc::tag::{ItemKey, NumberPair, Tags};
use alacenc::EncodeOptions;

use std::io::Write;
use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "alacenc", about = "Convert WAV/Wave64 audio to Apple Lossless (M4A)")]
struct Opt {
	/// Produce no output to stderr
	#[structopt(short, long)]
	quiet: bool,

	/// Write uncompressed packets
	#[structopt(long)]
	fast: bool,

	#[structopt(long)]
	title: Option<String>,

	#[structopt(long)]
	artist: Option<String>,

	#[structopt(long)]
	album: Option<String>,

	#[structopt(long)]
	album_artist: Option<String>,

	#[structopt(long)]
	comment: Option<String>,

	/// Release date, usually just the year
	#[structopt(long)]
	date: Option<String>,

	#[structopt(long)]
	composer: Option<String>,

	/// Grouping
	#[structopt(long)]
	group: Option<String>,

	#[structopt(long)]
	lyrics: Option<String>,

	/// Mark the album as a compilation
	#[structopt(long)]
	compilation: bool,

	/// A genre name, such as "Rock"
	#[structopt(long)]
	genre: Option<String>,

	/// Track number, as N/TOTAL
	#[structopt(long)]
	track: Option<NumberPair>,

	/// Disc number, as N/TOTAL
	#[structopt(long)]
	disc: Option<NumberPair>,

	/// Cover art (JPEG, PNG, BMP or GIF)
	#[structopt(long, parse(from_os_str))]
	cover: Option<PathBuf>,

	/// Any other tag, as NAME=VALUE (may be repeated)
	#[structopt(long, number_of_values = 1)]
	tag: Vec<String>,

	/// Input file name, when INPUT_FILE is -, read standard input
	#[structopt(name = "INPUT_FILE", parse(from_os_str))]
	input: PathBuf,

	/// Output ALAC file name, when OUTPUT_FILE is -, write to standard output
	#[structopt(name = "OUTPUT_FILE", parse(from_os_str))]
	output: PathBuf,
}

impl Opt {
	fn tags(&self) -> Result<Tags> {
		let mut tags = Tags::new();

		for field in &self.tag {
			tags.insert_field(field)?;
		}

		let text = [
			(ItemKey::TrackTitle, &self.title),
			(ItemKey::TrackArtist, &self.artist),
			(ItemKey::AlbumTitle, &self.album),
			(ItemKey::AlbumArtist, &self.album_artist),
			(ItemKey::Comment, &self.comment),
			(ItemKey::RecordingDate, &self.date),
			(ItemKey::Composer, &self.composer),
			(ItemKey::ContentGroup, &self.group),
			(ItemKey::Lyrics, &self.lyrics),
		];

		for (key, value) in text {
			if let Some(value) = value {
				tags.insert_text(key, value.clone());
			}
		}

		if self.compilation {
			tags.set_compilation(true);
		}

		if let Some(genre) = &self.genre {
			tags.set_genre(genre)?;
		}

		if let Some(track) = self.track {
			tags.set_track(track);
		}

		if let Some(disc) = self.disc {
			tags.set_disc(disc);
		}

		if let Some(cover) = &self.cover {
			tags.set_cover_file(cover)?;
		}

		Ok(tags)
	}
}

fn run(opt: &Opt) -> Result<()> {
	let tags = opt.tags()?;
	let options = EncodeOptions::new()
		.show_progress(!opt.quiet)
		.fast(opt.fast);

	alacenc::encode_files(&opt.input, &opt.output, &tags, options, |percent| {
		let mut stderr = std::io::stderr().lock();
		let _ = write!(stderr, "{percent}%\r");
		let _ = stderr.flush();
	})?;

	if !opt.quiet {
		eprintln!();
	}

	Ok(())
}

fn main() {
	let opt = Opt::from_args();

	if let Err(e) = run(&opt) {
		eprintln!("Error: {e}");
		std::process::exit(1);
	}
}
