//! IFF-style PCM containers (RIFF/WAVE and Wave64)

pub mod wav;
