use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("unknown color: {0}")]
    Unknown(String),
    #[error("unsupported color length: {0}")]
    InvalidLength(String),
    #[error("invalid hex digit in color: {0}")]
    InvalidDigit(String),
    #[error("invalid color component in {0}")]
    InvalidComponent(String),
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parses a CSS color: hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`),
    /// `rgb()`/`rgba()`, `hsl()`/`hsla()` or a named color. Matching is
    /// case-insensitive.
    pub fn parse(text: &str) -> Result<Self, ColorError> {
        let lower = text.trim().to_ascii_lowercase();
        if let Some(hex) = lower.strip_prefix('#') {
            return parse_hex(hex, text);
        }
        if let Some((name, args)) = function_args(&lower) {
            return match name {
                "rgb" | "rgba" => parse_rgb(&args, text),
                "hsl" | "hsla" => parse_hsl(&args, text),
                _ => Err(ColorError::Unknown(text.to_string())),
            };
        }
        if lower == "transparent" {
            return Ok(Self::TRANSPARENT);
        }
        NAMED
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|&(_, [r, g, b])| Self::rgb(r, g, b))
            .ok_or_else(|| ColorError::Unknown(text.to_string()))
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn to_css(&self) -> String {
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {})",
                self.r,
                self.g,
                self.b,
                f64::from(self.a) / 255.0
            )
        }
    }
}

fn parse_hex(hex: &str, text: &str) -> Result<Color, ColorError> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidDigit(text.to_string()));
    }
    let nibble = |index: usize| -> u8 {
        let value = u8::from_str_radix(&hex[index..index + 1], 16).unwrap_or(0);
        value * 17
    };
    let byte = |index: usize| -> u8 { u8::from_str_radix(&hex[index..index + 2], 16).unwrap_or(0) };
    match hex.len() {
        3 => Ok(Color::rgb(nibble(0), nibble(1), nibble(2))),
        4 => Ok(Color {
            r: nibble(0),
            g: nibble(1),
            b: nibble(2),
            a: nibble(3),
        }),
        6 => Ok(Color::rgb(byte(0), byte(2), byte(4))),
        8 => Ok(Color {
            r: byte(0),
            g: byte(2),
            b: byte(4),
            a: byte(6),
        }),
        _ => Err(ColorError::InvalidLength(text.to_string())),
    }
}

/// Splits `name(a, b, c / d)` into the name and its arguments. Commas,
/// spaces and the alpha slash all separate arguments.
fn function_args(text: &str) -> Option<(&str, Vec<&str>)> {
    let open = text.find('(')?;
    let inner = text[open + 1..].strip_suffix(')')?;
    let args = inner
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|arg| !arg.is_empty())
        .collect();
    Some((text[..open].trim(), args))
}

/// A channel value: `0..=255` or a percentage.
fn channel(arg: &str) -> Option<u8> {
    let value = match arg.strip_suffix('%') {
        Some(percent) => percent.parse::<f64>().ok()? * 2.55,
        None => arg.parse::<f64>().ok()?,
    };
    value.is_finite().then(|| value.clamp(0.0, 255.0).round() as u8)
}

/// An alpha value: `0..=1` or a percentage.
fn alpha(arg: &str) -> Option<u8> {
    let value = match arg.strip_suffix('%') {
        Some(percent) => percent.parse::<f64>().ok()? / 100.0,
        None => arg.parse::<f64>().ok()?,
    };
    value.is_finite().then(|| (value.clamp(0.0, 1.0) * 255.0).round() as u8)
}

fn percent(arg: &str) -> Option<f64> {
    let value = arg.strip_suffix('%').unwrap_or(arg).parse::<f64>().ok()?;
    value.is_finite().then(|| value.clamp(0.0, 100.0) / 100.0)
}

fn parse_rgb(args: &[&str], text: &str) -> Result<Color, ColorError> {
    let invalid = || ColorError::InvalidComponent(text.to_string());
    let (r, g, b, a) = match args {
        [r, g, b] => (r, g, b, None),
        [r, g, b, a] => (r, g, b, Some(a)),
        _ => return Err(invalid()),
    };
    Ok(Color {
        r: channel(r).ok_or_else(invalid)?,
        g: channel(g).ok_or_else(invalid)?,
        b: channel(b).ok_or_else(invalid)?,
        a: a.map_or(Some(255), |a| alpha(a)).ok_or_else(invalid)?,
    })
}

fn parse_hsl(args: &[&str], text: &str) -> Result<Color, ColorError> {
    let invalid = || ColorError::InvalidComponent(text.to_string());
    let (h, s, l, a) = match args {
        [h, s, l] => (h, s, l, None),
        [h, s, l, a] => (h, s, l, Some(a)),
        _ => return Err(invalid()),
    };
    let hue = h
        .strip_suffix("deg")
        .unwrap_or(*h)
        .parse::<f64>()
        .ok()
        .filter(|hue| hue.is_finite())
        .ok_or_else(invalid)?
        .rem_euclid(360.0);
    let saturation = percent(s).ok_or_else(invalid)?;
    let lightness = percent(l).ok_or_else(invalid)?;

    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let to_byte = |value: f64| ((value + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Ok(Color {
        r: to_byte(r),
        g: to_byte(g),
        b: to_byte(b),
        a: a.map_or(Some(255), |a| alpha(a)).ok_or_else(invalid)?,
    })
}

const NAMED: &[(&str, [u8; 3])] = &[
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

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        if color.is_opaque() {
            color.to_css()
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                color.r, color.g, color.b, color.a
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(Color::parse("#FF0000").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(Color::parse("#0f0").unwrap(), Color::rgb(0, 255, 0));
        assert_eq!(
            Color::parse("#00000080").unwrap(),
            Color {
                r: 0,
                g: 0,
                b: 0,
                a: 128
            }
        );
        assert_eq!(Color::parse("#fff8").unwrap().a, 0x88);
    }

    #[test]
    fn parses_named_and_functional_colors() {
        assert_eq!(Color::parse("red").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(Color::parse(" RebeccaPurple ").unwrap(), Color::rgb(102, 51, 153));
        assert_eq!(Color::parse("transparent").unwrap().a, 0);
        assert_eq!(Color::parse("rgb(0, 160, 0)").unwrap(), Color::rgb(0, 160, 0));
        assert_eq!(Color::parse("rgb(0 0 255 / 50%)").unwrap().a, 128);
        assert_eq!(
            Color::parse("rgba(255, 0, 0, 0.5)").unwrap(),
            Color {
                r: 255,
                g: 0,
                b: 0,
                a: 128
            }
        );
        assert_eq!(Color::parse("rgb(100%, 0%, 0%)").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(Color::parse("hsl(120, 100%, 25%)").unwrap(), Color::rgb(0, 128, 0));
        assert_eq!(Color::parse("hsl(240deg 100% 50%)").unwrap(), Color::rgb(0, 0, 255));
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!(matches!(Color::parse("reddish"), Err(ColorError::Unknown(_))));
        assert!(matches!(Color::parse("cmyk(0, 0, 0, 0)"), Err(ColorError::Unknown(_))));
        assert!(matches!(Color::parse("rgb(1, 2)"), Err(ColorError::InvalidComponent(_))));
        assert!(matches!(Color::parse("rgb(a, b, c)"), Err(ColorError::InvalidComponent(_))));
        assert!(matches!(Color::parse("#12345"), Err(ColorError::InvalidLength(_))));
        assert!(matches!(Color::parse("#gg0000"), Err(ColorError::InvalidDigit(_))));
        assert!(matches!(Color::parse("#"), Err(ColorError::InvalidLength(_))));
    }

    #[test]
    fn renders_css() {
        assert_eq!(Color::rgb(255, 0, 0).to_css(), "#ff0000");
        let translucent = Color {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        };
        assert_eq!(translucent.to_css(), "rgba(0, 0, 0, 0)");
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Color::rgb(0, 160, 0)).unwrap();
        assert_eq!(json, "\"#00a000\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::rgb(0, 160, 0));
        let named: Color = serde_json::from_str("\"blue\"").unwrap();
        assert_eq!(named, Color::rgb(0, 0, 255));
        assert!(serde_json::from_str::<Color>("\"bleu\"").is_err());
    }
}
