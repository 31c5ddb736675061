//! Fixed-column parser for PDB `ATOM`/`HETATM` records.
//!
//! Column ranges follow the PDB v3.3 layout (1-based, inclusive):
//!
//! | field          | columns |
//! |----------------|---------|
//! | atom name      | 13–16   |
//! | residue name   | 18–20   |
//! | chain id       | 22      |
//! | residue number | 23–26   |
//! | x / y / z      | 31–38 / 39–46 / 47–54 |
//! | element        | 77–78   |
//!
//! The offsets are part of the file format; real-world files depend on
//! them, so they are kept exactly as documented.

use std::fmt;
use std::str::Utf8Error;

use glam::Vec3;
use rustc_hash::FxHashMap;

use super::{
    element_style, AtomInstance, AtomRecord, BackboneAtom, ParsedStructure,
    SecondaryStructure,
};

const ATOM_NAME: (usize, usize) = (12, 16);
const RESIDUE_NAME: (usize, usize) = (17, 20);
const CHAIN_ID: (usize, usize) = (21, 22);
const RESIDUE_NUMBER: (usize, usize) = (22, 26);
const COORD_X: (usize, usize) = (30, 38);
const COORD_Y: (usize, usize) = (38, 46);
const COORD_Z: (usize, usize) = (46, 54);
const ELEMENT: (usize, usize) = (76, 78);

/// Atom name that marks an α-carbon.
const ALPHA_CARBON: &str = "CA";

/// Errors that abort a whole parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// Input bytes are not valid UTF-8 text.
    Decode(Utf8Error),
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "structure is not valid text: {e}"),
        }
    }
}

impl std::error::Error for StructureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
        }
    }
}

impl From<Utf8Error> for StructureError {
    fn from(e: Utf8Error) -> Self {
        Self::Decode(e)
    }
}

/// Decode raw file bytes and parse them.
///
/// Input without any atom records parses to an empty structure; only
/// undecodable input fails.
pub fn parse_structure(bytes: &[u8]) -> Result<ParsedStructure, StructureError> {
    let text = std::str::from_utf8(bytes)?;
    Ok(parse_structure_str(text))
}

/// Parse structure text line by line.
///
/// Malformed atom lines are counted in
/// [`ParsedStructure::skipped_lines`] and otherwise ignored.
#[must_use]
pub fn parse_structure_str(text: &str) -> ParsedStructure {
    let mut structure = ParsedStructure::default();
    let mut alpha_carbons: FxHashMap<i32, BackboneAtom> = FxHashMap::default();

    for (line_no, line) in text.lines().enumerate() {
        if !is_atom_record(line) {
            continue;
        }
        let Some(fields) = AtomFields::parse(line) else {
            structure.skipped_lines += 1;
            log::debug!("skipping malformed atom record on line {}", line_no + 1);
            continue;
        };

        let style = element_style(&fields.element);
        structure.instances.push(AtomInstance {
            position: fields.position.to_array(),
            color: style.color,
            radius: style.radius,
        });

        if fields.is_alpha_carbon() {
            let _ = alpha_carbons.entry(fields.residue_number).or_insert(
                BackboneAtom {
                    position: fields.position,
                    residue_index: fields.residue_number,
                    secondary_structure: SecondaryStructure::from_residue_name(
                        &fields.residue_name,
                    ),
                },
            );
        }

        structure.atoms.push(AtomRecord {
            index: structure.atoms.len(),
            position: fields.position,
            element: fields.element,
            residue_name: fields.residue_name,
            residue_number: fields.residue_number,
            chain_id: fields.chain_id,
            atom_name: fields.atom_name,
        });
    }

    let mut backbone: Vec<BackboneAtom> = alpha_carbons.into_values().collect();
    backbone.sort_by_key(|b| b.residue_index);
    structure.backbone = backbone;

    if structure.skipped_lines > 0 {
        log::info!(
            "parsed {} atoms ({} malformed lines skipped), {} backbone residues",
            structure.atoms.len(),
            structure.skipped_lines,
            structure.backbone.len(),
        );
    } else {
        log::info!(
            "parsed {} atoms, {} backbone residues",
            structure.atoms.len(),
            structure.backbone.len(),
        );
    }

    structure
}

fn is_atom_record(line: &str) -> bool {
    line.starts_with("ATOM") || line.starts_with("HETATM")
}

/// Fields sliced out of one atom line.
struct AtomFields {
    position: Vec3,
    element: String,
    residue_name: String,
    residue_number: i32,
    chain_id: String,
    atom_name: String,
}

impl AtomFields {
    fn parse(line: &str) -> Option<Self> {
        let x = parse_number::<f32>(line, COORD_X)?;
        let y = parse_number::<f32>(line, COORD_Y)?;
        let z = parse_number::<f32>(line, COORD_Z)?;
        let residue_number = parse_number::<i32>(line, RESIDUE_NUMBER)?;

        let atom_name = lenient_column(line, ATOM_NAME).trim().to_owned();
        let element = match lenient_column(line, ELEMENT).trim() {
            "" => element_from_atom_name(&atom_name),
            symbol => symbol.to_ascii_uppercase(),
        };

        Some(Self {
            position: Vec3::new(x, y, z),
            element,
            residue_name: lenient_column(line, RESIDUE_NAME).trim().to_owned(),
            residue_number,
            chain_id: lenient_column(line, CHAIN_ID).trim().to_owned(),
            atom_name,
        })
    }

    /// Calcium ions are also named `CA`; the element check excludes them.
    fn is_alpha_carbon(&self) -> bool {
        self.atom_name == ALPHA_CARBON && self.element == "C"
    }
}

/// Strict slice: the full column range must be present.
fn parse_number<T: std::str::FromStr>(
    line: &str,
    (start, end): (usize, usize),
) -> Option<T> {
    line.get(start..end)?.trim().parse().ok()
}

/// Lenient slice: truncated lines yield whatever part of the range exists.
fn lenient_column(line: &str, (start, end): (usize, usize)) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("")
}

/// Fallback when columns 77–78 are blank: first letter of the atom name.
fn element_from_atom_name(atom_name: &str) -> String {
    atom_name
        .chars()
        .find(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_default()
}
