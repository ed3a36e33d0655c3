//! Convert PCM audio in WAV or Wave64 files to Apple Lossless (ALAC) in an M4A container.
//!
//! # Supported input
//!
//! * Classic RIFF/WAVE and Sony Wave64 framing
//! * Integer PCM (including `WAVE_FORMAT_EXTENSIBLE` with a PCM sub-format)
//! * 16, 20, 24 and 32 bits per sample
//! * 1 to 8 channels
//!
//! # Examples
//!
//! ## Reading a header
//!
//! ```rust,no_run
//! use alacenc::iff::wav::WavHeader;
//!
//! # fn main() -> alacenc::error::Result<()> {
//! let mut file = std::fs::File::open("in.wav")?;
//! let header = WavHeader::read_from(&mut file)?;
//!
//! println!("{} Hz, {} ms", header.sample_rate(), header.duration());
//! # Ok(()) }
//! ```
//!
//! ## Encoding a file
//!
//! ```rust,no_run
//! use alacenc::tag::{ItemKey, Tags};
//! use alacenc::EncodeOptions;
//!
//! # fn main() -> alacenc::error::Result<()> {
//! let mut tags = Tags::new();
//! tags.insert_text(ItemKey::TrackTitle, String::from("Foo title"));
//! tags.set_genre("Rock")?;
//! tags.set_track("3/12".parse()?);
//!
//! alacenc::encode_files("in.wav", "out.m4a", &tags, EncodeOptions::new(), |_| {})?;
//! # Ok(()) }
//! ```
//!
//! # Compression
//!
//! 16-bit input is compressed with the `alac-encoder` crate. Deeper input, and any input encoded
//! with [`EncodeOptions::fast`], is written as uncompressed ALAC escape packets, which any ALAC
//! decoder can play.
//!
//! # Notes on output
//!
//! The M4A layout is fixed: `ftyp`, an 8 byte `free`, `mdat`, then `moov`. All box sizes are
//! 32-bit, so the output is limited to 4 GiB.

#![allow(
	unknown_lints,
	clippy::too_many_lines,
	clippy::cast_precision_loss,
	clippy::cast_sign_loss,
	clippy::cast_possible_wrap,
	clippy::cast_possible_truncation,
	clippy::module_name_repetitions,
	clippy::must_use_candidate,
	clippy::doc_markdown,
	clippy::similar_names,
	clippy::tabs_in_doc_comments,
	clippy::len_without_is_empty,
	clippy::needless_late_init,
	clippy::type_complexity,
	clippy::return_self_not_must_use,
	clippy::bool_to_int_with_if,
	clippy::uninlined_format_args,
	clippy::manual_let_else,
	clippy::struct_excessive_bools,
	clippy::match_bool,
	clippy::needless_pass_by_value
)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub(crate) mod macros;

pub mod codec;
mod encoder;
pub mod error;
pub mod iff;
pub mod mp4;
mod options;
pub mod picture;
pub mod tag;

pub use crate::encoder::{encode, encode_files, EncodeSummary};
pub use crate::options::EncodeOptions;
