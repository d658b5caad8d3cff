use std::fmt;

/// Names of the unit systems, indexed by their UNV code.
pub const UNIT_NAMES: [&str; 11] = [
    "Unknown",
    "SI: Meter (newton)",
    "BG: Foot (pound f)",
    "MG: Meter (kilogram f)",
    "BA: Foot (poundal)",
    "MM: mm (milli newton)",
    "CM: cm (centi newton)",
    "IN: Inch (pound f)",
    "GM: mm (kilogram f)",
    "US: USER_DEFINED",
    "MN: mm (newton)",
];

/// Unit system declared by a units (164) section.
///
/// `length_scale` is the factor to apply to vertex coordinates to get
/// lengths in the system's unit. Force and temperature scales are not kept.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UnitsSystem {
    code: usize,
    length_scale: f64,
}

impl UnitsSystem {
    /// Codes outside of [`UNIT_NAMES`] are clamped to 0, "Unknown".
    pub fn new(code: usize, length_scale: f64) -> Self {
        let code = if code < UNIT_NAMES.len() {
            code
        } else {
            tracing::warn!(code, "unknown unit system code, using \"Unknown\"");
            0
        };
        Self { code, length_scale }
    }

    pub fn code(&self) -> usize {
        self.code
    }

    pub fn length_scale(&self) -> f64 {
        self.length_scale
    }

    pub fn repr(&self) -> &'static str {
        UNIT_NAMES[self.code]
    }

    pub fn is_known(&self) -> bool {
        self.code != 0
    }
}

impl Default for UnitsSystem {
    fn default() -> Self {
        Self {
            code: 0,
            length_scale: 1.0,
        }
    }
}

impl fmt::Display for UnitsSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.repr())
    }
}
