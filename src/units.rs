//! TeX units and their conversion to ems.

use strum::{AsRefStr, Display, EnumString};

use crate::options::Options;

/// A unit accepted in size arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Unit {
    /// Em of the current font
    Em,
    /// x-height of the current font
    Ex,
    /// Math unit, 1/18 em of the math font
    Mu,
    /// TeX point
    Pt,
    /// Millimeter
    Mm,
    /// Centimeter
    Cm,
    /// Inch
    In,
    /// Big point, 1/72 in
    Bp,
    /// Pixel, taken as 1bp
    Px,
    /// Pica, 12pt
    Pc,
    /// Didot point
    Dd,
    /// Cicero, 12dd
    Cc,
    /// New didot point
    Nd,
    /// New cicero, 12nd
    Nc,
    /// Scaled point, 1/65536 pt
    Sp,
}

impl Unit {
    /// TeX points per unit, for the absolute units.
    #[must_use]
    pub const fn pt_per_unit(self) -> Option<f64> {
        Some(match self {
            Self::Pt => 1.0,
            Self::Mm => 7227.0 / 2540.0,
            Self::Cm => 7227.0 / 254.0,
            Self::In => 72.27,
            // \pdfpxdimen defaults to 1bp
            Self::Bp | Self::Px => 803.0 / 800.0,
            Self::Pc => 12.0,
            Self::Dd => 1238.0 / 1157.0,
            Self::Cc => 14856.0 / 1157.0,
            Self::Nd => 685.0 / 642.0,
            Self::Nc => 1370.0 / 107.0,
            Self::Sp => 1.0 / 65536.0,
            Self::Em | Self::Ex | Self::Mu => return None,
        })
    }
}

/// A signed length such as `-0.5em`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Magnitude, possibly negative
    pub number: f64,
    /// Unit the number is in
    pub unit: Unit,
}

impl Measurement {
    /// A length of `number` `unit`s.
    #[must_use]
    pub const fn new(number: f64, unit: Unit) -> Self {
        Self { number, unit }
    }
}

/// Convert a measurement to ems at the size `options` describes, clamped
/// to `options.max_size`.
#[must_use]
pub fn calculate_size(size: &Measurement, options: &Options) -> f64 {
    let scale = if let Some(pt) = size.unit.pt_per_unit() {
        // Absolute units do not scale with the current size.
        pt / options.font_metrics().pt_per_em / options.size_multiplier
    } else if size.unit == Unit::Mu {
        options.font_metrics().css_em_per_mu
    } else {
        // em and ex refer to the textstyle font at the current size.
        let unit_options = if options.style.is_tight() {
            options.having_style(options.style.text())
        } else {
            options.clone()
        };
        let metrics = unit_options.font_metrics();
        let mut scale = if size.unit == Unit::Ex {
            metrics.x_height
        } else {
            metrics.quad
        };
        if unit_options.size != options.size {
            scale *= unit_options.size_multiplier / options.size_multiplier;
        }
        scale
    };
    f64::min(size.number * scale, options.max_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Style;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn parses_unit_names() {
        assert_eq!("pt".parse::<Unit>().unwrap(), Unit::Pt);
        assert_eq!("mu".parse::<Unit>().unwrap(), Unit::Mu);
        assert!("bogus".parse::<Unit>().is_err());
        assert_eq!(Unit::Em.to_string(), "em");
    }

    #[test]
    fn absolute_units_go_through_points() {
        let options = Options::default();
        let ems = calculate_size(&Measurement::new(10.0, Unit::Pt), &options);
        assert!(approx(ems, 1.0));
        let ems = calculate_size(&Measurement::new(1.0, Unit::In), &options);
        assert!(approx(ems, 7.227));
    }

    #[test]
    fn relative_units_use_text_metrics() {
        let options = Options::default();
        assert!(approx(
            calculate_size(&Measurement::new(2.0, Unit::Em), &options),
            2.0
        ));
        assert!(approx(
            calculate_size(&Measurement::new(1.0, Unit::Ex), &options),
            0.431
        ));
        assert!(approx(
            calculate_size(&Measurement::new(18.0, Unit::Mu), &options),
            1.0
        ));
    }

    #[test]
    fn em_in_script_style_is_compensated() {
        let options = Options::default().having_style(Style::Script);
        // 1em of the text font, expressed in the script font's ems
        let ems = calculate_size(&Measurement::new(1.0, Unit::Em), &options);
        assert!(approx(ems, 1.0 / 0.7));
    }

    #[test]
    fn sizes_are_clamped() {
        let options = Options::builder().style(Style::Text).max_size(2.0).build();
        let ems = calculate_size(&Measurement::new(5.0, Unit::Em), &options);
        assert!(approx(ems, 2.0));
    }
}
