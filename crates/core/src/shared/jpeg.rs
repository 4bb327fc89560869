use image::codecs::jpeg::JpegEncoder;
use image::{ImageBuffer, Rgb};

use crate::shared::frame::Frame;

/// Encodes an RGB24 frame as JPEG.
///
/// Used at the two points where pixel data leaves the process: uploading a
/// frame to the matcher and attaching a capture image to a notification.
pub fn encode_jpeg(frame: &Frame, quality: u8) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    if frame.channels() != 3 {
        return Err(format!("expected 3-channel RGB frame, got {}", frame.channels()).into());
    }

    let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("frame buffer does not match its dimensions")?;

    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality).encode_image(&img)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_frame(width: u32, height: u32) -> Frame {
        Frame::new(
            vec![128u8; (width * height * 3) as usize],
            width,
            height,
            3,
            0,
        )
    }

    #[test]
    fn test_encode_produces_jpeg_magic() {
        let bytes = encode_jpeg(&rgb_frame(16, 16), 90).unwrap();
        assert!(bytes.len() > 2);
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]); // JPEG SOI marker
    }

    #[test]
    fn test_encode_rejects_non_rgb() {
        let gray = Frame::new(vec![0u8; 16], 4, 4, 1, 0);
        assert!(encode_jpeg(&gray, 90).is_err());
    }
}
