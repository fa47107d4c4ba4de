//! Color swatch images for markdown reports.

use dtp_types::parse_lightness;

/// Endpoint rendering a rounded color swatch with a text label.
pub const SWATCH_ENDPOINT: &str = "https://md-color-swatches.vercel.app";

/// Label color used when the swatch color has no readable lightness.
pub const DEFAULT_TEXT_COLOR: &str = "59636e";

/// Hex text color (no `#`) readable on a background of OKLCH lightness `l`.
///
/// Dark backgrounds get white text and bright ones a dark gray. The band
/// between `0.55` and `0.75` gets black, where the dark gray would not
/// stand out enough.
pub fn contrast_text_color(lightness: f64) -> String {
    let l = if lightness.is_nan() { 0.0 } else { lightness.clamp(0.0, 1.0) };
    let text = if l < 0.55 {
        1.0
    } else if l < 0.75 {
        0.0
    } else {
        0.3
    };
    gray_hex(text)
}

/// sRGB hex of the achromatic OKLCH color with lightness `l`.
fn gray_hex(l: f64) -> String {
    let linear = l.powi(3);
    let encoded = if linear <= 0.003_130_8 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    let channel = (encoded.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("{channel:02x}{channel:02x}{channel:02x}")
}

fn encode(text: &str) -> String {
    text.replace('%', "%25")
        .replace(' ', "%20")
        .replace('#', "%23")
}

/// Markdown image of a swatch for `color` labelled `label`.
pub fn swatch(token: &str, color: &str, label: &str) -> String {
    let text_color = parse_lightness(color)
        .map(contrast_text_color)
        .unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string());
    format!(
        "<img valign='middle' alt='{token} color swatch' src='{SWATCH_ENDPOINT}/{}?top=24&left=48&text={}&tc={text_color}&style=round'/>",
        encode(color),
        encode(label),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contrast_bands() {
        assert_eq!(contrast_text_color(0.2), "ffffff");
        assert_eq!(contrast_text_color(0.6), "000000");
        assert_eq!(contrast_text_color(-3.0), "ffffff");

        let light = contrast_text_color(0.9);
        assert_eq!(light, contrast_text_color(7.0));
        assert_eq!(light.len(), 6);
        assert_eq!(&light[0..2], &light[2..4]);
        assert!(light.as_str() < "808080");
    }

    #[test]
    fn swatch_image() {
        let img = swatch("sys.color.fg", "oklch(0.2,0.1,45,1)", "oklch(0.2 0.1 45 / 1)");
        assert_eq!(
            img,
            "<img valign='middle' alt='sys.color.fg color swatch' \
             src='https://md-color-swatches.vercel.app/oklch(0.2,0.1,45,1)?top=24&left=48\
             &text=oklch(0.2%200.1%2045%20/%201)&tc=ffffff&style=round'/>"
        );
    }

    #[test]
    fn swatch_without_lightness_uses_default_text_color() {
        let img = swatch("a", "#ff0000", "#ff0000");
        assert!(img.contains("/%23ff0000?"));
        assert!(img.contains("&tc=59636e&"));
    }
}
