//! Human readable weight and slope names.
use alloc::string::String;

use crate::BitmapFont;

pub const WEIGHT_NAMES: [(u16, &str); 10] = [
    (100, "Thin"),
    (200, "Extra Light"),
    (300, "Light"),
    (400, "Regular"),
    (500, "Medium"),
    (600, "Semi Bold"),
    (700, "Bold"),
    (800, "Extra Bold"),
    (900, "Black"),
    (950, "Extra Black"),
];

pub const SLOPE_NAMES: [(u8, &str); 4] = [
    (0, "Regular"),
    (1, "Italic"),
    (2, "Oblique"),
    (3, "Reclined"),
];

/// Name of the weight class containing `weight`, "Regular" if none does.
pub fn weight_to_name(weight: u16) -> &'static str {
    WEIGHT_NAMES
        .iter()
        .find(|(style, _)| {
            weight as i32 >= *style as i32 - 49 && weight as i32 <= *style as i32 + 50
        })
        .map_or("Regular", |(_, name)| *name)
}

pub fn name_to_weight(name: &str) -> Option<u16> {
    WEIGHT_NAMES
        .iter()
        .find(|(_, weight_name)| *weight_name == name)
        .map(|(weight, _)| *weight)
}

pub fn slope_to_name(slope: u8) -> &'static str {
    SLOPE_NAMES
        .iter()
        .find(|(style, _)| *style == slope)
        .map_or("Regular", |(_, name)| *name)
}

pub fn name_to_slope(name: &str) -> Option<u8> {
    SLOPE_NAMES
        .iter()
        .find(|(_, slope_name)| *slope_name == name)
        .map(|(slope, _)| *slope)
}

impl BitmapFont {
    /// The weight name, with the slope folded in for slanted fonts, e.g.
    /// "Bold Italic" or "Italic".
    pub fn variant(&self) -> String {
        let mut variant = String::from(weight_to_name(self.weight()));
        if self.slope() != 0 {
            let slope = slope_to_name(self.slope());
            if variant == "Regular" {
                variant = String::from(slope);
            } else {
                variant.push(' ');
                variant.push_str(slope);
            }
        }
        variant
    }

    pub fn qualified_name(&self) -> String {
        format!(
            "{} {} {} {}",
            self.family(),
            self.presentation_size(),
            self.weight(),
            self.slope()
        )
    }

    pub fn human_readable_name(&self) -> String {
        format!(
            "{} {} {}",
            self.family(),
            self.variant(),
            self.presentation_size()
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn weight_classes() {
        assert_eq!(weight_to_name(400), "Regular");
        assert_eq!(weight_to_name(351), "Regular");
        assert_eq!(weight_to_name(350), "Light");
        assert_eq!(weight_to_name(700), "Bold");
        assert_eq!(weight_to_name(950), "Black");
        assert_eq!(weight_to_name(1000), "Extra Black");
        assert_eq!(weight_to_name(0), "Regular");
        assert_eq!(name_to_weight("Semi Bold"), Some(600));
        assert_eq!(name_to_weight("Heavy"), None);
    }

    #[test]
    fn slopes() {
        assert_eq!(slope_to_name(2), "Oblique");
        assert_eq!(slope_to_name(9), "Regular");
        assert_eq!(name_to_slope("Italic"), Some(1));
    }

    #[test]
    fn font_names() {
        let mut font = BitmapFont::create(10, 8, false, 256).unwrap();
        font.set_family("Katica");
        font.set_presentation_size(10);
        assert_eq!(font.variant(), "Regular");
        assert_eq!(font.human_readable_name(), "Katica Regular 10");

        font.set_slope(1);
        assert_eq!(font.variant(), "Italic");

        font.set_weight(700);
        assert_eq!(font.variant(), "Bold Italic");
        assert_eq!(font.qualified_name(), "Katica 10 700 1");
        assert_eq!(font.human_readable_name(), "Katica Bold Italic 10");
    }
}
