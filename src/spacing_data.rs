//! Inter-atom glue.
//!
//! TeX inserts a thin, medium or thick space between adjacent atoms
//! depending on their classes. Script styles use a reduced table.

use phf::{Map, phf_map};

use crate::units::{Measurement, Unit};

/// `\,`, 3mu
pub const THINSPACE: Measurement = Measurement::new(3.0, Unit::Mu);
/// `\:`, 4mu
pub const MEDIUMSPACE: Measurement = Measurement::new(4.0, Unit::Mu);
/// `\;`, 5mu
pub const THICKSPACE: Measurement = Measurement::new(5.0, Unit::Mu);

/// Glue by left atom class, then right atom class.
pub type Spacings = Map<&'static str, Map<&'static str, Measurement>>;

/// Glue in display and text styles.
pub static SPACINGS: Spacings = phf_map! {
    "mord" => phf_map! {
        "mop" => THINSPACE,
        "mbin" => MEDIUMSPACE,
        "mrel" => THICKSPACE,
        "minner" => THINSPACE,
    },
    "mop" => phf_map! {
        "mord" => THINSPACE,
        "mop" => THINSPACE,
        "mrel" => THICKSPACE,
        "minner" => THINSPACE,
    },
    "mbin" => phf_map! {
        "mord" => MEDIUMSPACE,
        "mop" => MEDIUMSPACE,
        "mopen" => MEDIUMSPACE,
        "minner" => MEDIUMSPACE,
    },
    "mrel" => phf_map! {
        "mord" => THICKSPACE,
        "mop" => THICKSPACE,
        "mopen" => THICKSPACE,
        "minner" => THICKSPACE,
    },
    "mclose" => phf_map! {
        "mop" => THINSPACE,
        "mbin" => MEDIUMSPACE,
        "mrel" => THICKSPACE,
        "minner" => THINSPACE,
    },
    "mpunct" => phf_map! {
        "mord" => THINSPACE,
        "mop" => THINSPACE,
        "mrel" => THICKSPACE,
        "mopen" => THINSPACE,
        "mclose" => THINSPACE,
        "mpunct" => THINSPACE,
        "minner" => THINSPACE,
    },
    "minner" => phf_map! {
        "mord" => THINSPACE,
        "mop" => THINSPACE,
        "mbin" => MEDIUMSPACE,
        "mrel" => THICKSPACE,
        "mopen" => THINSPACE,
        "mpunct" => THINSPACE,
        "minner" => THINSPACE,
    },
};

/// Glue in script styles; only the thin spaces survive.
pub static TIGHT_SPACINGS: Spacings = phf_map! {
    "mord" => phf_map! {
        "mop" => THINSPACE,
    },
    "mop" => phf_map! {
        "mord" => THINSPACE,
        "mop" => THINSPACE,
    },
    "mclose" => phf_map! {
        "mop" => THINSPACE,
    },
    "minner" => phf_map! {
        "mop" => THINSPACE,
    },
};

/// Glue between a left and a right atom class, if any.
#[must_use]
pub fn glue_between(left: &str, right: &str, tight: bool) -> Option<&'static Measurement> {
    let table = if tight { &TIGHT_SPACINGS } else { &SPACINGS };
    table.get(left).and_then(|row| row.get(right))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_table() {
        assert_eq!(glue_between("mord", "mbin", false), Some(&MEDIUMSPACE));
        assert_eq!(glue_between("mrel", "mord", false), Some(&THICKSPACE));
        assert_eq!(glue_between("mopen", "mord", false), None);
        assert_eq!(glue_between("mord", "mord", false), None);
    }

    #[test]
    fn tight_table_keeps_only_operator_spacing() {
        assert_eq!(glue_between("mord", "mbin", true), None);
        assert_eq!(glue_between("mord", "mop", true), Some(&THINSPACE));
        assert_eq!(glue_between("mrel", "mord", true), None);
    }
}
