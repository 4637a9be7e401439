// cargo fuzz run encode corpus/encode -- -timeout=30

#![no_main]

use libfuzzer_sys::fuzz_target;
use pix::rgb::SRgba8;
use tidefill::{Encoder, Error};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let width = u32::from(data[0]).max(1);
    let mut pixels: Vec<SRgba8> = data[2..]
        .chunks_exact(4)
        .map(|c| SRgba8::new(c[0], c[1], c[2], c[3]))
        .collect();
    let height = pixels.len() as u32 / width;
    pixels.truncate((width * height) as usize);
    let mut enc = Encoder::new(Vec::new());
    enc.begin(width, height).unwrap();
    match enc.write_frame(&pixels, width, height, u16::from(data[1])) {
        Ok(()) => enc.end().unwrap(),
        // empty frame
        Err(Error::InvalidRasterDimensions) if height == 0 => return,
        Err(e) => panic!("{e}"),
    }
    let bytes = enc.into_inner();
    assert_eq!(bytes.last(), Some(&0x3B));
});
