use smart_leds::{RGB8, hsv::Hsv as HSV};

pub type Rgb = RGB8;
pub type Hsv = HSV;

/// Fill every pixel with one color.
pub fn fill(pixels: &mut [Rgb], color: Rgb) {
    for pixel in pixels {
        *pixel = color;
    }
}
