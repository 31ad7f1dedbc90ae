//! Colors for chart export.

use std::fmt;

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rgb {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl fmt::Display for Rgb {
    /// Format as CSS hex: #rrggbb
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

pub(crate) const INCREASE: Rgb = Rgb { r: 0x4a, g: 0x58, b: 0x8a };
pub(crate) const DECREASE: Rgb = Rgb { r: 0xec, g: 0xc8, b: 0x46 };
pub(crate) const TOTAL_GAIN: Rgb = Rgb { r: 0x5e, g: 0xcb, b: 0xc8 };
pub(crate) const TOTAL_LOSS: Rgb = Rgb { r: 0xcd, g: 0x4c, b: 0x46 };

/// Fill for a relative step.
pub(crate) fn step_color(value: f64) -> Rgb {
    if value >= 0.0 { INCREASE } else { DECREASE }
}

/// Fill for the closing total bar.
pub(crate) fn total_color(net_balance: f64) -> Rgb {
    if net_balance >= 0.0 { TOTAL_GAIN } else { TOTAL_LOSS }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_formatting() {
        assert_eq!(INCREASE.to_string(), "#4a588a");
        assert_eq!(total_color(-1.0).to_string(), "#cd4c46");
        assert_eq!(step_color(-0.01), DECREASE);
    }
}
