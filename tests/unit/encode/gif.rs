use image::AnimationDecoder;
use image::codecs::gif::GifDecoder;
use std::io::Cursor;

use super::*;

use crate::encode::sink::InMemoryEncoder;

fn solid(w: u32, h: u32, rgb: [u8; 3]) -> FrameRGBA {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for _ in 0..w * h {
        data.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
    }
    FrameRGBA {
        width: w,
        height: h,
        data,
        premultiplied: true,
    }
}

fn opts(ms: u32) -> EncodeOpts {
    EncodeOpts {
        frame_duration_ms: ms,
        loop_mode: LoopMode::Infinite,
    }
}

fn decode(bytes: &[u8]) -> Vec<image::Frame> {
    GifDecoder::new(Cursor::new(bytes))
        .unwrap()
        .into_frames()
        .collect_frames()
        .unwrap()
}

fn loop_count(bytes: &[u8]) -> Option<u16> {
    let tag = b"NETSCAPE2.0";
    let at = bytes.windows(tag.len()).position(|w| w == tag)?;
    let sub = &bytes[at + tag.len()..];
    // Sub-block: size 3, id 1, little-endian loop count.
    (sub.len() >= 4 && sub[0] == 3 && sub[1] == 1).then(|| u16::from_le_bytes([sub[2], sub[3]]))
}

#[test]
fn encodes_every_frame_in_order_with_fixed_delay() {
    let colors = [[255, 0, 0], [0, 255, 0], [0, 0, 255]];
    let frames: Vec<FrameRGBA> = colors.iter().map(|&c| solid(16, 12, c)).collect();
    let mut enc = GifAnimationEncoder::default();
    let bytes = enc.encode(&frames, &opts(500)).unwrap();

    assert!(bytes.starts_with(b"GIF89a"));
    assert_eq!(enc.content_type(), "image/gif");

    let decoded = decode(&bytes);
    assert_eq!(decoded.len(), 3);
    for (f, c) in decoded.iter().zip(colors) {
        let (n, d) = f.delay().numer_denom_ms();
        assert_eq!(f64::from(n) / f64::from(d), 500.0);
        let buf = f.buffer();
        assert_eq!(buf.dimensions(), (16, 12));
        let px = buf.get_pixel(8, 6).0;
        for ch in 0..3 {
            assert!(px[ch].abs_diff(c[ch]) <= 8, "{px:?} vs {c:?}");
        }
    }
}

#[test]
fn infinite_loop_is_marked() {
    let mut enc = GifAnimationEncoder::default();
    let bytes = enc.encode(&[solid(4, 4, [9, 9, 9])], &opts(500)).unwrap();
    assert_eq!(loop_count(&bytes), Some(0));
    assert_eq!(decode(&bytes).len(), 1);
}

#[test]
fn finite_loop_count_is_written() {
    let mut enc = GifAnimationEncoder::default();
    let o = EncodeOpts {
        frame_duration_ms: 100,
        loop_mode: LoopMode::Finite(3),
    };
    let bytes = enc.encode(&[solid(4, 4, [9, 9, 9])], &o).unwrap();
    assert_eq!(loop_count(&bytes), Some(3));
}

#[test]
fn invalid_inputs_are_assembly_failures() {
    let mut enc = GifAnimationEncoder::default();
    let err = enc.encode(&[], &opts(500)).unwrap_err();
    assert!(matches!(err, BoltzError::Assembly(_)));

    let err = enc
        .encode(&[solid(4, 4, [0, 0, 0]), solid(5, 4, [0, 0, 0])], &opts(500))
        .unwrap_err();
    assert!(matches!(err, BoltzError::Assembly(_)));

    let err = enc.encode(&[solid(4, 4, [0, 0, 0])], &opts(0)).unwrap_err();
    assert!(matches!(err, BoltzError::Assembly(_)));

    let mut short = solid(4, 4, [0, 0, 0]);
    short.data.truncate(7);
    assert!(enc.encode(&[short], &opts(500)).is_err());
}

#[test]
fn in_memory_encoder_records_order_and_opts() {
    let frames = vec![solid(2, 2, [1, 1, 1]), solid(2, 2, [2, 2, 2])];
    let mut enc = InMemoryEncoder::new();
    let bytes = enc.encode(&frames, &opts(250)).unwrap();
    assert_eq!(bytes.len(), 32);
    assert_eq!(enc.frames(), frames.as_slice());
    assert_eq!(enc.opts(), Some(opts(250)));
}

#[test]
fn premultiplied_pixels_are_unpremultiplied() {
    let f = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![64, 0, 32, 128],
        premultiplied: true,
    };
    assert_eq!(to_straight_rgba(&f), vec![128, 0, 64, 128]);
}

#[test]
fn delays_the_format_cannot_hold_are_rejected() {
    let frames = [solid(4, 4, [9, 9, 9])];
    let mut enc = GifAnimationEncoder::default();
    for ms in [5, 505, 655_360] {
        let err = enc.encode(&frames, &opts(ms)).unwrap_err();
        assert!(matches!(err, BoltzError::Assembly(_)), "{ms} ms: {err}");
    }

    for ms in [10, 730] {
        let bytes = enc.encode(&frames, &opts(ms)).unwrap();
        let (n, d) = decode(&bytes)[0].delay().numer_denom_ms();
        assert_eq!(f64::from(n) / f64::from(d), f64::from(ms));
    }
}
