//! Element lookup table: CPK-style colors and van der Waals radii.

/// Rendering attributes for one chemical element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    /// Linear RGB color.
    pub color: [f32; 3],
    /// Van der Waals radius in Å.
    pub radius: f32,
}

/// Style used for symbols missing from the table.
pub const DEFAULT_STYLE: ElementStyle = ElementStyle {
    color: [1.0, 0.08, 0.58],
    radius: 1.5,
};

const TABLE: &[(&str, ElementStyle)] = &[
    ("H", ElementStyle { color: [1.0, 1.0, 1.0], radius: 1.20 }),
    ("C", ElementStyle { color: [0.56, 0.56, 0.56], radius: 1.70 }),
    ("N", ElementStyle { color: [0.19, 0.31, 0.97], radius: 1.55 }),
    ("O", ElementStyle { color: [1.0, 0.05, 0.05], radius: 1.52 }),
    ("F", ElementStyle { color: [0.56, 0.88, 0.31], radius: 1.47 }),
    ("NA", ElementStyle { color: [0.67, 0.36, 0.95], radius: 2.27 }),
    ("MG", ElementStyle { color: [0.54, 1.0, 0.0], radius: 1.73 }),
    ("P", ElementStyle { color: [1.0, 0.5, 0.0], radius: 1.80 }),
    ("S", ElementStyle { color: [1.0, 1.0, 0.19], radius: 1.80 }),
    ("CL", ElementStyle { color: [0.12, 0.94, 0.12], radius: 1.75 }),
    ("K", ElementStyle { color: [0.56, 0.25, 0.83], radius: 2.75 }),
    ("CA", ElementStyle { color: [0.24, 1.0, 0.0], radius: 2.31 }),
    ("MN", ElementStyle { color: [0.61, 0.48, 0.78], radius: 2.05 }),
    ("FE", ElementStyle { color: [0.88, 0.4, 0.2], radius: 2.04 }),
    ("CO", ElementStyle { color: [0.94, 0.56, 0.63], radius: 2.00 }),
    ("NI", ElementStyle { color: [0.31, 0.82, 0.31], radius: 1.63 }),
    ("CU", ElementStyle { color: [0.78, 0.5, 0.2], radius: 1.40 }),
    ("ZN", ElementStyle { color: [0.49, 0.5, 0.69], radius: 1.39 }),
    ("SE", ElementStyle { color: [1.0, 0.63, 0.0], radius: 1.90 }),
    ("BR", ElementStyle { color: [0.65, 0.16, 0.16], radius: 1.85 }),
    ("I", ElementStyle { color: [0.58, 0.0, 0.58], radius: 1.98 }),
];

/// Look up the style for an element symbol (case-insensitive).
///
/// Unknown symbols return [`DEFAULT_STYLE`].
#[must_use]
pub fn element_style(symbol: &str) -> ElementStyle {
    let symbol = symbol.trim();
    TABLE
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(symbol))
        .map_or(DEFAULT_STYLE, |(_, style)| *style)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carbon_and_oxygen() {
        let c = element_style("C");
        assert_eq!(c.color, [0.56, 0.56, 0.56]);
        assert_eq!(c.radius, 1.70);

        let o = element_style("O");
        assert_eq!(o.color, [1.0, 0.05, 0.05]);
        assert_eq!(o.radius, 1.52);
    }

    #[test]
    fn lookup_ignores_case_and_padding() {
        assert_eq!(element_style(" fe"), element_style("FE"));
    }

    #[test]
    fn unknown_symbol_uses_default() {
        assert_eq!(element_style("XX"), DEFAULT_STYLE);
        assert_eq!(element_style(""), DEFAULT_STYLE);
    }
}
