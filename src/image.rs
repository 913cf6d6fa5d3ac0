// SPDX-FileCopyrightText: Copyright 2025 Au-Zone Technologies
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use ndarray::{ArrayView2, s};
use zune_jpeg::{
    JpegDecoder,
    zune_core::{colorspace::ColorSpace, options::DecoderOptions},
};

/// A packed grayscale frame of rows x columns pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    rows: usize,
    cols: usize,
}

impl Frame {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidSize(0));
        }

        Ok(Self {
            data: vec![0; rows * cols],
            rows,
            cols,
        })
    }

    /// Wraps an existing packed grayscale buffer. The buffer length must be
    /// exactly rows x columns.
    pub fn from_luma(data: Vec<u8>, rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidSize(0));
        }
        if data.len() != rows * cols {
            return Err(Error::InvalidShape(format!(
                "pixel buffer is {} bytes but {}x{} needs {}",
                data.len(),
                rows,
                cols,
                rows * cols
            )));
        }

        Ok(Self { data, rows, cols })
    }

    /// Decodes a JPEG image to grayscale for offline inference.
    pub fn from_jpeg(image: &[u8]) -> Result<Self> {
        let options = DecoderOptions::default().jpeg_set_out_colorspace(ColorSpace::Luma);
        let mut decoder = JpegDecoder::new_with_options(image, options);
        decoder.decode_headers()?;

        let image_info = decoder.info().ok_or_else(|| {
            Error::InvalidShape("JPEG did not return decoded image info".to_string())
        })?;

        let mut frame = Self::new(image_info.height as usize, image_info.width as usize)?;
        decoder.decode_into(&mut frame.data)?;
        Ok(frame)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn view(&self) -> ArrayView2<'_, u8> {
        ArrayView2::from_shape((self.rows, self.cols), &self.data)
            .expect("frame buffer matches its geometry")
    }

    /// Largest centered square crop of the frame.
    pub fn center_crop(&self) -> Frame {
        let side = self.rows.min(self.cols);
        if side == self.rows && side == self.cols {
            return self.clone();
        }

        let top = (self.rows - side) / 2;
        let left = (self.cols - side) / 2;
        let view = self.view();
        let crop = view.slice(s![top..top + side, left..left + side]);

        Frame {
            data: crop.iter().copied().collect(),
            rows: side,
            cols: side,
        }
    }

    /// Resamples the frame to the given geometry using the Hamming
    /// convolution filter.
    pub fn resize(&self, rows: usize, cols: usize) -> Result<Frame> {
        if rows == self.rows && cols == self.cols {
            return Ok(self.clone());
        }
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidSize(0));
        }

        let src = Image::from_vec_u8(
            self.cols as u32,
            self.rows as u32,
            self.data.clone(),
            PixelType::U8,
        )?;
        let mut dst = Image::new(cols as u32, rows as u32, PixelType::U8);

        let mut resizer = Resizer::new();
        let options = ResizeOptions::new()
            .resize_alg(ResizeAlg::Convolution(FilterType::Hamming))
            .use_alpha(false);
        resizer.resize(&src, &mut dst, &options)?;

        Frame::from_luma(dst.into_vec(), rows, cols)
    }

    /// Writes the frame into a signed input tensor via [`luma_to_signed`].
    pub fn write_signed(&self, dst: &mut [i8]) -> Result<()> {
        luma_to_signed(&self.data, dst)
    }
}

/// Remaps unsigned pixels into the signed domain the quantized model
/// expects. `b ^ 0x80` equals subtracting 128 with twos-complement wrap,
/// taking [0, 255] onto [-128, 127].
pub fn luma_to_signed(src: &[u8], dst: &mut [i8]) -> Result<()> {
    if src.len() != dst.len() {
        return Err(Error::InvalidShape(format!(
            "pixel buffer is {} bytes but the input tensor holds {}",
            src.len(),
            dst.len()
        )));
    }

    for (s, d) in src.iter().zip(dst.iter_mut()) {
        *d = (*s ^ 0x80) as i8;
    }
    Ok(())
}

/// Inverse of [`luma_to_signed`]. The remap is its own inverse.
pub fn signed_to_luma(src: &[i8], dst: &mut [u8]) -> Result<()> {
    if src.len() != dst.len() {
        return Err(Error::InvalidShape(format!(
            "tensor holds {} values but the pixel buffer is {} bytes",
            src.len(),
            dst.len()
        )));
    }

    for (s, d) in src.iter().zip(dst.iter_mut()) {
        *d = (*s as u8) ^ 0x80;
    }
    Ok(())
}

/// Source of camera frames.
///
/// The camera driver itself is an external collaborator; implementations
/// wrap whatever capture pipeline the platform provides.
/// [`crate::stub::PatternSource`] is the hardware-free reference.
pub trait FrameSource {
    /// Native frame geometry of the source.
    fn rows(&self) -> usize;

    fn cols(&self) -> usize;

    /// Brings the camera up. Called once before the first capture.
    fn start(&mut self) -> Result<()>;

    /// Fills `frame` with the next captured image. The frame carries the
    /// source's native geometry.
    fn capture(&mut self, frame: &mut Frame) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_conversion_matches_subtract() {
        let src: Vec<u8> = (0..=255u8).collect();
        let mut dst = vec![0i8; src.len()];
        luma_to_signed(&src, &mut dst).expect("Failed to convert pixels");

        for (u, s) in src.iter().zip(&dst) {
            assert_eq!(*s, (*u as i16 - 128) as i8);
        }
        assert_eq!(dst[0], -128);
        assert_eq!(dst[128], 0);
        assert_eq!(dst[255], 127);
    }

    #[test]
    fn test_signed_conversion_involutive() {
        let src: Vec<u8> = (0..=255u8).collect();
        let mut signed = vec![0i8; src.len()];
        let mut restored = vec![0u8; src.len()];

        luma_to_signed(&src, &mut signed).expect("Failed to convert pixels");
        signed_to_luma(&signed, &mut restored).expect("Failed to restore pixels");
        assert_eq!(src, restored);
    }

    #[test]
    fn test_signed_conversion_length_mismatch() {
        let src = vec![0u8; 4];
        let mut dst = vec![0i8; 3];
        assert!(matches!(
            luma_to_signed(&src, &mut dst),
            Err(Error::InvalidShape(_))
        ));
    }

    #[test]
    fn test_frame_from_luma() {
        let frame = Frame::from_luma(vec![1, 2, 3, 4, 5, 6], 2, 3).expect("Failed to wrap buffer");
        assert_eq!(frame.rows(), 2);
        assert_eq!(frame.cols(), 3);
        assert_eq!(frame.view()[(1, 2)], 6);

        assert!(Frame::from_luma(vec![0; 5], 2, 3).is_err());
        assert!(Frame::from_luma(vec![], 0, 3).is_err());
    }

    #[test]
    fn test_frame_from_jpeg() {
        let jpeg = include_bytes!("../testdata/grey_16x16.jpg");
        let frame = Frame::from_jpeg(jpeg).expect("Failed to decode JPEG");
        assert_eq!(frame.rows(), 16);
        assert_eq!(frame.cols(), 16);
        assert!(frame.as_slice().iter().all(|&p| p == 128));

        assert!(Frame::from_jpeg(&[0xFF, 0xD8, 0x00]).is_err());
    }

    #[test]
    fn test_center_crop() {
        let frame = Frame::from_luma((0..12).collect(), 3, 4).expect("Failed to wrap buffer");
        let crop = frame.center_crop();
        assert_eq!(crop.rows(), 3);
        assert_eq!(crop.cols(), 3);
        // Columns 0..3 of each row: one column trimmed off the right.
        assert_eq!(crop.as_slice(), &[0, 1, 2, 4, 5, 6, 8, 9, 10]);

        let square = Frame::from_luma((0..9).collect(), 3, 3).expect("Failed to wrap buffer");
        assert_eq!(square.center_crop(), square);
    }

    #[test]
    fn test_resize_constant_frame() {
        let frame = Frame::from_luma(vec![77; 32 * 32], 32, 32).expect("Failed to wrap buffer");
        let resized = frame.resize(8, 8).expect("Failed to resize frame");
        assert_eq!(resized.rows(), 8);
        assert_eq!(resized.cols(), 8);
        assert!(resized.as_slice().iter().all(|&p| p == 77));

        let same = frame.resize(32, 32).expect("Failed to resize frame");
        assert_eq!(same, frame);
    }

    #[test]
    fn test_write_signed() {
        let frame = Frame::from_luma(vec![0, 128, 255, 1], 2, 2).expect("Failed to wrap buffer");
        let mut tensor = vec![0i8; 4];
        frame.write_signed(&mut tensor).expect("Failed to convert");
        assert_eq!(tensor, vec![-128, 0, 127, -127]);
    }
}
