//! Document types

use serde::Serialize;

/// Options passed to a document open
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    /// Refuse documents larger than this many bytes
    pub max_bytes: Option<usize>,
}

/// Page size in PDF points at scale 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// US Letter, used when a page has no usable media box
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };
}

/// Target geometry for drawing a page at a scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl Viewport {
    pub fn for_page(size: PageSize, scale: f32) -> Self {
        Self {
            width: size.width * scale,
            height: size.height * scale,
            scale,
        }
    }

    /// Surface dimensions in whole pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width.ceil() as u32, self.height.ceil() as u32)
    }
}

/// Geometry of a page presented to a surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageFrame {
    #[serde(rename = "pageNumber")]
    pub page_number: u32,
    pub width: u32,
    pub height: u32,
    pub scale: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_scaling() {
        let viewport = Viewport::for_page(PageSize::LETTER, 1.5);
        assert_eq!(viewport.width, 918.0);
        assert_eq!(viewport.height, 1188.0);
        assert_eq!(viewport.pixel_size(), (918, 1188));

        let odd = Viewport::for_page(PageSize { width: 100.2, height: 50.0 }, 1.0);
        assert_eq!(odd.pixel_size(), (101, 50));
    }
}
