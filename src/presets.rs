//! Preset bead kits.
//!
//! Each preset either means "the whole table" (`colors: None`) or names an
//! explicit list of codes sized to a purchasable kit with balanced hue coverage.

/// Preset applied when nothing else has been chosen.
pub const DEFAULT_PRESET: &str = "all_colors";

#[derive(Debug, PartialEq, Eq)]
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub colors: Option<&'static [&'static str]>,
}

pub static PRESETS: &[Preset] = &[
    Preset {
        id: "all_colors",
        name: "All colors (293)",
        description: "The complete MARD range, for professional work",
        colors: None,
    },
    Preset {
        id: "basic_10",
        name: "Starter 10",
        description: "Recommended for beginners, covers the basic hues",
        colors: Some(&[
            "R15", // red
            "A10", // orange
            "A5",  // yellow
            "B8",  // green
            "C10", // cyan
            "C7",  // blue
            "D6",  // purple
            "P1",  // pink
            "H15", // brown
            "M1",  // black
        ]),
    },
    Preset {
        id: "standard_20",
        name: "Standard 20",
        description: "Everyday work with expressive color",
        colors: Some(&[
            "R15", "R10", // reds
            "A10", "A7", // oranges
            "A5", "A4", // yellows
            "B8", "B4", "B17", // greens
            "C10", "C5", // cyans
            "C7", "C8", // blues
            "D6", "D3", // purples
            "P1", "P10", // pinks
            "H15", "H10", // browns
            "M1", "M15", // neutrals
        ]),
    },
    Preset {
        id: "advanced_30",
        name: "Advanced 30",
        description: "Complex patterns with rich tonal layers",
        colors: Some(&[
            "R15", "R10", "R5", "R20", //
            "A10", "A7", "A14", //
            "A5", "A4", "A8", //
            "B8", "B4", "B17", "B12", "B20", //
            "C10", "C5", "C15", //
            "C7", "C8", "C4", "C16", //
            "D6", "D3", "D1", "D9", //
            "P1", "P10", "P15", //
            "H15", "H10", "H5", //
            "M1", "M8", "M15",
        ]),
    },
    Preset {
        id: "professional_50",
        name: "Professional 50",
        description: "Detailed work with faithful color reproduction",
        colors: Some(&[
            "R15", "R10", "R5", "R20", "R1", "R25", //
            "A10", "A7", "A14", "A9", "A6", //
            "A5", "A4", "A8", "A3", "A15", "A22", //
            "B8", "B4", "B17", "B12", "B20", "B5", "B19", "B14", //
            "C10", "C5", "C15", "C11", "C17", //
            "C7", "C8", "C4", "C16", "C20", "C29", //
            "D6", "D3", "D1", "D9", "D5", "D7", //
            "P1", "P10", "P15", "P20", "P5", //
            "H15", "H10", "H5", "H20", //
            "M1", "M8", "M15", "M10", "M5",
        ]),
    },
    Preset {
        id: "complete_100",
        name: "Master 100",
        description: "Large pieces with the widest color expression",
        colors: Some(&[
            "A1", "A3", "A4", "A5", "A6", "A7", "A8", "A9", "A10", "A12", "A14", "A15", "A17",
            "A22", "A26", //
            "B1", "B2", "B4", "B5", "B7", "B8", "B10", "B12", "B14", "B17", "B19", "B20", "B22",
            "B25", "B27", "B28", "B29", "B31", "B32", "B13", //
            "C2", "C3", "C4", "C5", "C6", "C7", "C8", "C9", "C10", "C11", "C13", "C15", "C16",
            "C17", "C19", "C20", "C24", "C29", //
            "D1", "D2", "D3", "D4", "D5", "D6", "D7", "D8", "D9", "D11", "D12", "D15", "D20", //
            "E1", "E5", "E10", "E15", "E20", "E3", "E7", "E12", "E17", "E22", "E8", "E18", //
            "F1", "F5", "F10", "F15", "F20", //
            "G1", "G5", "G10", "G15", "G20", //
            "H1", "H5", "H10", "H15", "H20", //
            "P1", "P5", "P10", "P15", "P20", //
            "R1", "R5", "R10", "R15", "R20", "R25", //
            "M1", "M5", "M8", "M10", "M15",
        ]),
    },
];

pub fn preset(id: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.id == id)
}
