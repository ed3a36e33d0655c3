//! MP4 (M4A) output
//!
//! ## File layout
//!
//! ```text
//! ftyp
//! free
//! mdat
//! moov
//! ├── mvhd
//! ├── trak
//! │   ├── tkhd
//! │   └── mdia
//! │       ├── mdhd
//! │       ├── hdlr
//! │       └── minf
//! │           ├── smhd
//! │           ├── dinf
//! │           │   └── dref
//! │           │       └── url
//! │           └── stbl
//! │               ├── stsd
//! │               │   └── alac
//! │               │       └── alac (magic cookie)
//! │               ├── stsc
//! │               ├── stco
//! │               ├── stsz
//! │               └── stts
//! └── udta
//!     └── meta
//!         ├── hdlr
//!         └── ilst
//! ```
//!
//! `moov` comes last, since the sample tables are only known once the audio is encoded.

mod atom;
mod ilst;
pub mod moov;
mod mux;

// Exports

pub use atom::{Atom, AtomWriter, ATOM_HEADER_LEN};
pub use ilst::ilst;
pub use moov::MovieContext;
pub use mux::{write_audio_data, MuxedAudio, SampleSizeTable};
