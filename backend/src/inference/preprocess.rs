use image::imageops::{self, FilterType};
use image::{ColorType, DynamicImage, RgbImage};
use ndarray::{Array3, ArrayView3};

use crate::config::{ConfigError, InputLayout, PreprocessingConfig};
use crate::error::PipelineError;

/// Side length the network was trained on.
pub const INPUT_SIZE: u32 = 256;

/// Normalized `size × size × 3` image, samples in `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor(Array3<f32>);

impl ImageTensor {
    pub fn view(&self) -> ArrayView3<'_, f32> {
        self.0.view()
    }

    pub fn shape(&self) -> &[usize] {
        self.0.shape()
    }

    /// Side length of the square tensor.
    pub fn side(&self) -> usize {
        self.shape()[0]
    }

    /// Flattened samples in the order the model expects for `layout`.
    pub fn to_layout(&self, layout: InputLayout) -> Vec<f32> {
        match layout {
            InputLayout::Nhwc => self.view().iter().copied().collect(),
            InputLayout::Nchw => self.view().permuted_axes([2, 0, 1]).iter().copied().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessOptions {
    pub size: u32,
    pub filter: FilterType,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            size: INPUT_SIZE,
            filter: FilterType::CatmullRom,
        }
    }
}

impl TryFrom<&PreprocessingConfig> for PreprocessOptions {
    type Error = ConfigError;

    fn try_from(cfg: &PreprocessingConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            size: cfg.size,
            filter: cfg.filter()?,
        })
    }
}

pub fn decode_and_preprocess(
    bytes: &[u8],
    opts: &PreprocessOptions,
) -> Result<ImageTensor, PipelineError> {
    let image = image::load_from_memory(bytes)?;
    preprocess(&image, opts)
}

/// Resize to `opts.size` square, keep three colour channels, scale by 1/255.
pub fn preprocess(image: &DynamicImage, opts: &PreprocessOptions) -> Result<ImageTensor, PipelineError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PipelineError::UnsupportedImageFormat(
            "image has no pixels".to_string(),
        ));
    }

    let rgb = to_rgb(image)?;
    let resized = imageops::resize(&rgb, opts.size, opts.size, opts.filter);

    let side = opts.size as usize;
    let samples: Vec<f32> = resized
        .into_raw()
        .into_iter()
        .map(|v| v as f32 / 255.0)
        .collect();

    Array3::from_shape_vec((side, side, 3), samples)
        .map(ImageTensor)
        .map_err(|e| PipelineError::UnsupportedImageFormat(e.to_string()))
}

fn to_rgb(image: &DynamicImage) -> Result<RgbImage, PipelineError> {
    match image.color() {
        ColorType::L8
        | ColorType::La8
        | ColorType::Rgb8
        | ColorType::Rgba8
        | ColorType::L16
        | ColorType::La16
        | ColorType::Rgb16
        | ColorType::Rgba16
        | ColorType::Rgb32F
        | ColorType::Rgba32F => Ok(image.to_rgb8()),
        other => Err(PipelineError::UnsupportedImageFormat(format!(
            "cannot convert {:?} to RGB",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageBuffer, ImageFormat, Luma, Rgb, Rgba, RgbaImage};
    use rstest::rstest;
    use std::io::Cursor;

    fn png_bytes(image: &DynamicImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        }))
    }

    #[rstest]
    #[case(gradient(640, 480))]
    #[case(gradient(1, 1))]
    #[case(gradient(300, 17))]
    #[case(DynamicImage::ImageLuma8(GrayImage::from_pixel(50, 80, Luma([200]))))]
    #[case(DynamicImage::ImageRgba8(RgbaImage::from_pixel(257, 255, Rgba([10, 250, 30, 0]))))]
    #[case(DynamicImage::ImageRgb16(ImageBuffer::from_pixel(33, 33, Rgb([65535u16, 0, 32768]))))]
    fn output_is_fixed_shape_and_unit_range(#[case] image: DynamicImage) {
        let tensor = preprocess(&image, &PreprocessOptions::default()).unwrap();
        assert_eq!(tensor.shape(), &[256, 256, 3]);
        assert!(tensor.view().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn extremes_map_to_zero_and_one() {
        let white = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([255, 255, 255])));
        let black = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([0, 0, 0])));
        let opts = PreprocessOptions::default();
        assert!(preprocess(&white, &opts).unwrap().view().iter().all(|&v| v == 1.0));
        assert!(preprocess(&black, &opts).unwrap().view().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn is_deterministic() {
        let image = gradient(123, 77);
        let opts = PreprocessOptions::default();
        assert_eq!(preprocess(&image, &opts).unwrap(), preprocess(&image, &opts).unwrap());
    }

    #[test]
    fn decodes_png_bytes() {
        let bytes = png_bytes(&gradient(40, 30));
        let tensor = decode_and_preprocess(&bytes, &PreprocessOptions::default()).unwrap();
        assert_eq!(tensor.side(), 256);
    }

    #[test]
    fn garbage_bytes_are_unsupported() {
        let err = decode_and_preprocess(b"definitely not an image", &PreprocessOptions::default())
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedImageFormat(_)));
    }

    #[test]
    fn layouts_place_channels_correctly() {
        // 2x2 with a single red pixel at row 0, column 1.
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(1, 0, Rgb([255, 0, 0]));
        let opts = PreprocessOptions {
            size: 2,
            filter: FilterType::Nearest,
        };
        let tensor = preprocess(&DynamicImage::ImageRgb8(img), &opts).unwrap();

        let nhwc = tensor.to_layout(InputLayout::Nhwc);
        let nchw = tensor.to_layout(InputLayout::Nchw);
        assert_eq!(nhwc.len(), 12);
        assert_eq!(nhwc[3], 1.0);
        assert_eq!(nchw[1], 1.0);
        assert_eq!(nhwc.iter().sum::<f32>(), 1.0);
        assert_eq!(nchw.iter().sum::<f32>(), 1.0);
    }

    #[test]
    fn options_follow_config() {
        let cfg = PreprocessingConfig {
            size: INPUT_SIZE,
            resize_method: "nearest".to_string(),
        };
        let opts = PreprocessOptions::try_from(&cfg).unwrap();
        assert_eq!(opts.size, 256);
        assert_eq!(opts.filter, FilterType::Nearest);
    }
}
