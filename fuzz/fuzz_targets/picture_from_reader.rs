#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(picture) = alacenc::picture::Picture::from_reader(&mut &*data) {
        let _ = picture.mime_type().data_type();
    }
});
