#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(header) = alacenc::iff::wav::WavHeader::read_from(&mut &*data) {
        let _ = header.duration();
        let _ = header.to_wave64_bytes();
    }
});
