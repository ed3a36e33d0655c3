#![no_main]
use libfuzzer_sys::fuzz_target;

use alacenc::tag::Tags;
use alacenc::EncodeOptions;

fuzz_target!(|data: &[u8]| {
    let options = EncodeOptions::new().show_progress(false).fast(true);
    let _ = alacenc::encode(&mut &*data, &mut std::io::sink(), &Tags::new(), options, |_| {});
});
