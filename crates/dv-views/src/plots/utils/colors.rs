//! Color string parsing for colorscales

use dv_core::{ColorParseError, Rgba};

/// Turns a color string into RGBA
pub trait ColorParser {
    fn parse(&self, color: &str) -> Result<Rgba, ColorParseError>;
}

/// Parser for CSS color syntax: hex, `rgb()`/`rgba()`, `hsl()`/`hsla()`, the
/// CSS named colors and `transparent`
#[derive(Debug, Clone, Copy, Default)]
pub struct CssColorParser;

impl ColorParser for CssColorParser {
    fn parse(&self, color: &str) -> Result<Rgba, ColorParseError> {
        parse_css_color(color)
    }
}

/// Parse a CSS color string
pub fn parse_css_color(color: &str) -> Result<Rgba, ColorParseError> {
    let trimmed = color.trim();
    if trimmed.is_empty() {
        return Err(ColorParseError::Empty);
    }
    let lower = trimmed.to_ascii_lowercase();

    if let Some(hex) = lower.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(trimmed.to_string()));
    }

    if let Some((name, args)) = split_function(&lower) {
        let parsed = match name {
            "rgb" | "rgba" => parse_rgb_args(&args),
            "hsl" | "hsla" => parse_hsl_args(&args),
            _ => None,
        };
        return parsed.ok_or_else(|| ColorParseError::InvalidFunction(trimmed.to_string()));
    }

    named_color(&lower).ok_or_else(|| ColorParseError::UnknownName(trimmed.to_string()))
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Rgba::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)? as f32 / 255.0)),
        6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, byte(6)? as f32 / 255.0)),
        _ => None,
    }
}

/// Split `name(a, b, c)` into the name and its trimmed arguments
fn split_function(s: &str) -> Option<(&str, Vec<&str>)> {
    let open = s.find('(')?;
    let inner = s[open + 1..].strip_suffix(')')?;
    let args = inner.split(',').map(str::trim).collect();
    Some((s[..open].trim(), args))
}

fn parse_rgb_args(args: &[&str]) -> Option<Rgba> {
    if args.len() != 3 && args.len() != 4 {
        return None;
    }
    let channel = |s: &str| -> Option<u8> {
        let v = match s.strip_suffix('%') {
            Some(pct) => pct.trim().parse::<f32>().ok()? * 2.55,
            None => s.parse::<f32>().ok()?,
        };
        v.is_finite().then(|| v.clamp(0.0, 255.0).round() as u8)
    };
    let alpha = match args.get(3) {
        Some(a) => parse_alpha(a)?,
        None => 1.0,
    };
    Some(Rgba::new(channel(args[0])?, channel(args[1])?, channel(args[2])?, alpha))
}

fn parse_hsl_args(args: &[&str]) -> Option<Rgba> {
    if args.len() != 3 && args.len() != 4 {
        return None;
    }
    let hue = args[0].strip_suffix("deg").unwrap_or(args[0]).trim().parse::<f32>().ok()?;
    let percent = |s: &str| -> Option<f32> {
        let v = s.strip_suffix('%')?.trim().parse::<f32>().ok()?;
        Some((v / 100.0).clamp(0.0, 1.0))
    };
    let saturation = percent(args[1])?;
    let lightness = percent(args[2])?;
    let alpha = match args.get(3) {
        Some(a) => parse_alpha(a)?,
        None => 1.0,
    };
    if !hue.is_finite() {
        return None;
    }

    let [r, g, b] = hsl_to_rgb(hue.rem_euclid(360.0) / 360.0, saturation, lightness);
    Some(Rgba::new(r, g, b, alpha))
}

fn parse_alpha(s: &str) -> Option<f32> {
    let v = match s.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f32>().ok()? / 100.0,
        None => s.parse::<f32>().ok()?,
    };
    v.is_finite().then(|| v.clamp(0.0, 1.0))
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [u8; 3] {
    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return [v, v, v];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let to_byte = |t: f32| (hue_to_channel(p, q, t) * 255.0).round().clamp(0.0, 255.0) as u8;
    [to_byte(h + 1.0 / 3.0), to_byte(h), to_byte(h - 1.0 / 3.0)]
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn named_color(name: &str) -> Option<Rgba> {
    if name == "transparent" {
        return Some(Rgba::TRANSPARENT);
    }
    NAMED_COLORS
        .binary_search_by(|(key, _)| (*key).cmp(name))
        .ok()
        .map(|i| {
            let [r, g, b] = NAMED_COLORS[i].1;
            Rgba::rgb(r, g, b)
        })
}

/// CSS named colors, sorted by name
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("aliceblue", [240, 248, 255]),
    ("antiquewhite", [250, 235, 215]),
    ("aqua", [0, 255, 255]),
    ("aquamarine", [127, 255, 212]),
    ("azure", [240, 255, 255]),
    ("beige", [245, 245, 220]),
    ("bisque", [255, 228, 196]),
    ("black", [0, 0, 0]),
    ("blanchedalmond", [255, 235, 205]),
    ("blue", [0, 0, 255]),
    ("blueviolet", [138, 43, 226]),
    ("brown", [165, 42, 42]),
    ("burlywood", [222, 184, 135]),
    ("cadetblue", [95, 158, 160]),
    ("chartreuse", [127, 255, 0]),
    ("chocolate", [210, 105, 30]),
    ("coral", [255, 127, 80]),
    ("cornflowerblue", [100, 149, 237]),
    ("cornsilk", [255, 248, 220]),
    ("crimson", [220, 20, 60]),
    ("cyan", [0, 255, 255]),
    ("darkblue", [0, 0, 139]),
    ("darkcyan", [0, 139, 139]),
    ("darkgoldenrod", [184, 134, 11]),
    ("darkgray", [169, 169, 169]),
    ("darkgreen", [0, 100, 0]),
    ("darkgrey", [169, 169, 169]),
    ("darkkhaki", [189, 183, 107]),
    ("darkmagenta", [139, 0, 139]),
    ("darkolivegreen", [85, 107, 47]),
    ("darkorange", [255, 140, 0]),
    ("darkorchid", [153, 50, 204]),
    ("darkred", [139, 0, 0]),
    ("darksalmon", [233, 150, 122]),
    ("darkseagreen", [143, 188, 143]),
    ("darkslateblue", [72, 61, 139]),
    ("darkslategray", [47, 79, 79]),
    ("darkslategrey", [47, 79, 79]),
    ("darkturquoise", [0, 206, 209]),
    ("darkviolet", [148, 0, 211]),
    ("deeppink", [255, 20, 147]),
    ("deepskyblue", [0, 191, 255]),
    ("dimgray", [105, 105, 105]),
    ("dimgrey", [105, 105, 105]),
    ("dodgerblue", [30, 144, 255]),
    ("firebrick", [178, 34, 34]),
    ("floralwhite", [255, 250, 240]),
    ("forestgreen", [34, 139, 34]),
    ("fuchsia", [255, 0, 255]),
    ("gainsboro", [220, 220, 220]),
    ("ghostwhite", [248, 248, 255]),
    ("gold", [255, 215, 0]),
    ("goldenrod", [218, 165, 32]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("greenyellow", [173, 255, 47]),
    ("grey", [128, 128, 128]),
    ("honeydew", [240, 255, 240]),
    ("hotpink", [255, 105, 180]),
    ("indianred", [205, 92, 92]),
    ("indigo", [75, 0, 130]),
    ("ivory", [255, 255, 240]),
    ("khaki", [240, 230, 140]),
    ("lavender", [230, 230, 250]),
    ("lavenderblush", [255, 240, 245]),
    ("lawngreen", [124, 252, 0]),
    ("lemonchiffon", [255, 250, 205]),
    ("lightblue", [173, 216, 230]),
    ("lightcoral", [240, 128, 128]),
    ("lightcyan", [224, 255, 255]),
    ("lightgoldenrodyellow", [250, 250, 210]),
    ("lightgray", [211, 211, 211]),
    ("lightgreen", [144, 238, 144]),
    ("lightgrey", [211, 211, 211]),
    ("lightpink", [255, 182, 193]),
    ("lightsalmon", [255, 160, 122]),
    ("lightseagreen", [32, 178, 170]),
    ("lightskyblue", [135, 206, 250]),
    ("lightslategray", [119, 136, 153]),
    ("lightslategrey", [119, 136, 153]),
    ("lightsteelblue", [176, 196, 222]),
    ("lightyellow", [255, 255, 224]),
    ("lime", [0, 255, 0]),
    ("limegreen", [50, 205, 50]),
    ("linen", [250, 240, 230]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("mediumaquamarine", [102, 205, 170]),
    ("mediumblue", [0, 0, 205]),
    ("mediumorchid", [186, 85, 211]),
    ("mediumpurple", [147, 112, 219]),
    ("mediumseagreen", [60, 179, 113]),
    ("mediumslateblue", [123, 104, 238]),
    ("mediumspringgreen", [0, 250, 154]),
    ("mediumturquoise", [72, 209, 204]),
    ("mediumvioletred", [199, 21, 133]),
    ("midnightblue", [25, 25, 112]),
    ("mintcream", [245, 255, 250]),
    ("mistyrose", [255, 228, 225]),
    ("moccasin", [255, 228, 181]),
    ("navajowhite", [255, 222, 173]),
    ("navy", [0, 0, 128]),
    ("oldlace", [253, 245, 230]),
    ("olive", [128, 128, 0]),
    ("olivedrab", [107, 142, 35]),
    ("orange", [255, 165, 0]),
    ("orangered", [255, 69, 0]),
    ("orchid", [218, 112, 214]),
    ("palegoldenrod", [238, 232, 170]),
    ("palegreen", [152, 251, 152]),
    ("paleturquoise", [175, 238, 238]),
    ("palevioletred", [219, 112, 147]),
    ("papayawhip", [255, 239, 213]),
    ("peachpuff", [255, 218, 185]),
    ("peru", [205, 133, 63]),
    ("pink", [255, 192, 203]),
    ("plum", [221, 160, 221]),
    ("powderblue", [176, 224, 230]),
    ("purple", [128, 0, 128]),
    ("rebeccapurple", [102, 51, 153]),
    ("red", [255, 0, 0]),
    ("rosybrown", [188, 143, 143]),
    ("royalblue", [65, 105, 225]),
    ("saddlebrown", [139, 69, 19]),
    ("salmon", [250, 128, 114]),
    ("sandybrown", [244, 164, 96]),
    ("seagreen", [46, 139, 87]),
    ("seashell", [255, 245, 238]),
    ("sienna", [160, 82, 45]),
    ("silver", [192, 192, 192]),
    ("skyblue", [135, 206, 235]),
    ("slateblue", [106, 90, 205]),
    ("slategray", [112, 128, 144]),
    ("slategrey", [112, 128, 144]),
    ("snow", [255, 250, 250]),
    ("springgreen", [0, 255, 127]),
    ("steelblue", [70, 130, 180]),
    ("tan", [210, 180, 140]),
    ("teal", [0, 128, 128]),
    ("thistle", [216, 191, 216]),
    ("tomato", [255, 99, 71]),
    ("turquoise", [64, 224, 208]),
    ("violet", [238, 130, 238]),
    ("wheat", [245, 222, 179]),
    ("white", [255, 255, 255]),
    ("whitesmoke", [245, 245, 245]),
    ("yellow", [255, 255, 0]),
    ("yellowgreen", [154, 205, 50]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!(parse_css_color("#000000").unwrap(), Rgba::BLACK);
        assert_eq!(parse_css_color("#FFF").unwrap(), Rgba::WHITE);
        assert_eq!(parse_css_color("#1a2b3c").unwrap(), Rgba::rgb(0x1a, 0x2b, 0x3c));

        let translucent = parse_css_color("#ff000080").unwrap();
        assert_eq!((translucent.r, translucent.g, translucent.b), (255, 0, 0));
        assert!((translucent.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_rgb_functions() {
        assert_eq!(parse_css_color("rgb(12, 34, 56)").unwrap(), Rgba::rgb(12, 34, 56));
        assert_eq!(parse_css_color("rgba(0,0,255,0.5)").unwrap(), Rgba::new(0, 0, 255, 0.5));
        assert_eq!(parse_css_color("rgb(100%, 0%, 0%)").unwrap(), Rgba::rgb(255, 0, 0));
    }

    #[test]
    fn test_hsl_functions() {
        assert_eq!(parse_css_color("hsl(0, 100%, 50%)").unwrap(), Rgba::rgb(255, 0, 0));
        assert_eq!(parse_css_color("hsl(120, 100%, 50%)").unwrap(), Rgba::rgb(0, 255, 0));
        assert_eq!(parse_css_color("hsla(240, 100%, 50%, 0.25)").unwrap(), Rgba::new(0, 0, 255, 0.25));
        assert_eq!(parse_css_color("hsl(0, 0%, 100%)").unwrap(), Rgba::WHITE);
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(parse_css_color(" Navy ").unwrap(), Rgba::rgb(0, 0, 128));
        assert_eq!(CssColorParser.parse("grey").unwrap(), Rgba::rgb(128, 128, 128));
        assert_eq!(parse_css_color("aliceblue").unwrap(), Rgba::rgb(240, 248, 255));
        assert_eq!(parse_css_color("RebeccaPurple").unwrap(), Rgba::rgb(102, 51, 153));
        assert_eq!(parse_css_color("yellowgreen").unwrap(), Rgba::rgb(154, 205, 50));
        assert_eq!(parse_css_color("transparent").unwrap(), Rgba::TRANSPARENT);
    }

    #[test]
    fn test_malformed_colors() {
        assert_eq!(parse_css_color("  "), Err(ColorParseError::Empty));
        assert_eq!(parse_css_color("#12"), Err(ColorParseError::InvalidHex("#12".to_string())));
        assert_eq!(parse_css_color("#gggggg"), Err(ColorParseError::InvalidHex("#gggggg".to_string())));
        assert!(matches!(parse_css_color("rgb(1, 2)"), Err(ColorParseError::InvalidFunction(_))));
        assert!(matches!(parse_css_color("rgb(a, b, c)"), Err(ColorParseError::InvalidFunction(_))));
        assert!(matches!(parse_css_color("hsl(10, 20, 30)"), Err(ColorParseError::InvalidFunction(_))));
        assert_eq!(
            parse_css_color("not-a-color"),
            Err(ColorParseError::UnknownName("not-a-color".to_string()))
        );
    }
}
