//! Pdfium による PDF ページ描画
//!
//! 各ページを指定幅のビットマップに描画し、品質 90 の JPEG にエンコードします。
//! Pdfium のバインディングは呼び出しごとに確立するため、レンダラ自体は
//! ライブラリの場所しか保持しません。

use std::{io::Cursor, path::PathBuf};

use image::{DynamicImage, codecs::jpeg::JpegEncoder};
use pdfium_render::prelude::*;

use crate::domain::{PageRenderer, RenderError};

/// JPEG の品質
pub const JPEG_QUALITY: u8 = 90;

/// 描画時のページ幅（ピクセル）
pub const DEFAULT_TARGET_WIDTH: i32 = 1240;

pub struct PdfiumRenderer {
    library_dir: Option<PathBuf>,
    target_width: i32,
}

impl PdfiumRenderer {
    /// `library_dir` が `None` の場合はシステムにインストールされた Pdfium を使う
    pub fn new(library_dir: Option<PathBuf>) -> Self {
        Self {
            library_dir,
            target_width: DEFAULT_TARGET_WIDTH,
        }
    }

    pub fn with_target_width(mut self, width: i32) -> Self {
        self.target_width = width.max(1);
        self
    }

    fn bind(&self) -> Result<Pdfium, RenderError> {
        let bindings = match &self.library_dir {
            Some(dir) => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            }
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| RenderError::Open(format!("pdfium is not available: {}", e)))?;

        Ok(Pdfium::new(bindings))
    }
}

impl PageRenderer for PdfiumRenderer {
    fn render_jpeg_pages(&self, document: &[u8]) -> Result<Vec<Vec<u8>>, RenderError> {
        let pdfium = self.bind()?;
        let document = pdfium
            .load_pdf_from_byte_slice(document, None)
            .map_err(|e| RenderError::Open(e.to_string()))?;

        let config = PdfRenderConfig::new().set_target_width(self.target_width);

        let mut pages = Vec::new();
        for (index, page) in document.pages().iter().enumerate() {
            let number = index + 1;
            let bitmap = page
                .render_with_config(&config)
                .map_err(|e| RenderError::Render {
                    page: number,
                    reason: e.to_string(),
                })?;
            pages.push(encode_jpeg(&bitmap.as_image(), number)?);
        }

        tracing::debug!("Rendered {} pages", pages.len());
        Ok(pages)
    }
}

/// ページ画像を JPEG にエンコード（アルファは捨てる）
pub(crate) fn encode_jpeg(image: &DynamicImage, page: usize) -> Result<Vec<u8>, RenderError> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image.to_rgb8())
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY))
        .map_err(|e| RenderError::Encode {
            page,
            reason: e.to_string(),
        })?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_encode_jpeg_produces_jpeg_stream() {
        // テスト項目: RGBA の画像が JPEG（SOI/EOI マーカー付き）にエンコードされる
        // given (前提条件):
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([200, 10, 10, 128])));

        // when (操作):
        let jpeg = encode_jpeg(&image, 1).unwrap();

        // then (期待する結果):
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_target_width_is_at_least_one() {
        // テスト項目: 描画幅は 1 未満にならない
        // given (前提条件):
        let renderer = PdfiumRenderer::new(None);

        // when (操作):
        let renderer = renderer.with_target_width(0);

        // then (期待する結果):
        assert_eq!(renderer.target_width, 1);
    }
}
