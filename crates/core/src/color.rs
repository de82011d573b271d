//! Hex colour parsing for brush colours.

use crate::error::CoreError;

/// Default brush colour of a fresh canvas.
pub const DEFAULT_COLOR: &str = "#667eea";

/// Parse `#rrggbb` or `#rgb` into RGB components.
pub fn parse_hex_color(hex: &str) -> Result<[u8; 3], CoreError> {
    let digits = hex
        .strip_prefix('#')
        .ok_or_else(|| invalid(hex))?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid(hex));
    }

    let expanded: String = match digits.len() {
        6 => digits.to_string(),
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        _ => return Err(invalid(hex)),
    };

    let mut rgb = [0u8; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        *channel = u8::from_str_radix(&expanded[i * 2..i * 2 + 2], 16).map_err(|_| invalid(hex))?;
    }
    Ok(rgb)
}

/// Format RGB components as lowercase `#rrggbb`.
pub fn format_hex_color(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

fn invalid(hex: &str) -> CoreError {
    CoreError::Validation(format!("Invalid colour '{hex}'. Expected #rrggbb"))
}
