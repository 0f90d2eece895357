use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::builder::MolecularSystemBuilder;
use crate::core::models::residue::Residue;
use crate::core::models::system::MolecularSystem;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::trace;

const MIN_COORDINATE_LINE_LEN: usize = 54;
const DEFAULT_OCCUPANCY: f64 = 1.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    /// Non-coordinate records that precede the first ATOM/HETATM record.
    pub header_lines: Vec<String>,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn column_char(line: &str, index: usize) -> Option<char> {
    line.get(index..index + 1)
        .and_then(|s| s.chars().next())
        .filter(|c| !c.is_whitespace())
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn parse_optional_float(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
    default: f64,
) -> Result<f64, PdbError> {
    if slice_and_trim(line, start, end).is_empty() {
        Ok(default)
    } else {
        parse_float(line, line_num, start, end)
    }
}

/// Pads an atom name into the four-character PDB name field.
///
/// One-letter elements start in column 14, so short names get a leading space
/// unless the element symbol is two letters wide.
fn format_atom_name(name: &str, element: &str) -> String {
    if name.len() >= 4 || element.trim().len() == 2 {
        format!("{:<4}", name)
    } else {
        format!(" {:<3}", name)
    }
}

pub struct PdbFile;

impl MolecularFile for PdbFile {
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error> {
        let mut builder = MolecularSystemBuilder::new();
        let mut metadata = PdbMetadata::default();
        let mut atom_count = 0usize;
        let mut alt_loc_records = 0usize;

        let mut current_chain: Option<char> = None;
        let mut current_residue: Option<(bool, isize, Option<char>)> = None;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let record_type = slice_and_trim(&line, 0, 6);
            match record_type {
                "ATOM" | "HETATM" => {
                    if line.len() < MIN_COORDINATE_LINE_LEN {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let serial_str = slice_and_trim(&line, 6, 11);
                    let name_str = slice_and_trim(&line, 12, 16);
                    let res_name_str = slice_and_trim(&line, 17, 20);
                    let res_seq_str = slice_and_trim(&line, 22, 26);

                    if name_str.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "13-16".into(),
                            },
                        });
                    }
                    let serial: usize = serial_str.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::InvalidInt {
                            columns: "7-11".into(),
                            value: serial_str.into(),
                        },
                    })?;
                    let res_seq: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::InvalidInt {
                            columns: "23-26".into(),
                            value: res_seq_str.into(),
                        },
                    })?;
                    let x = parse_float(&line, line_num, 30, 38)?;
                    let y = parse_float(&line, line_num, 38, 46)?;
                    let z = parse_float(&line, line_num, 46, 54)?;
                    let occupancy = parse_optional_float(&line, line_num, 54, 60, DEFAULT_OCCUPANCY)?;
                    let temp_factor = parse_optional_float(&line, line_num, 60, 66, 0.0)?;

                    let alt_loc = column_char(&line, 16);
                    let chain_id = line.get(21..22).and_then(|s| s.chars().next()).unwrap_or(' ');
                    let insertion_code = column_char(&line, 26);
                    let element = slice_and_trim(&line, 76, 78).to_string();
                    let charge = slice_and_trim(&line, 78, 80).to_string();

                    if current_chain != Some(chain_id) {
                        builder.start_chain(chain_id);
                        current_chain = Some(chain_id);
                        current_residue = None;
                    }
                    let is_hetero = record_type == "HETATM";
                    if current_residue != Some((is_hetero, res_seq, insertion_code)) {
                        builder.start_residue(res_seq, insertion_code, res_name_str, is_hetero);
                        current_residue = Some((is_hetero, res_seq, insertion_code));
                    }
                    if alt_loc.is_some() {
                        alt_loc_records += 1;
                    }

                    builder.add_atom(serial, name_str, Point3::new(x, y, z), |atom| {
                        atom.alt_loc = alt_loc;
                        atom.occupancy = occupancy;
                        atom.temp_factor = temp_factor;
                        atom.element = element;
                        atom.charge = charge;
                    });
                    atom_count += 1;
                }
                "ENDMDL" | "END" => break,
                "MODEL" | "TER" | "ANISOU" | "CONECT" | "MASTER" => {}
                _ => {
                    if atom_count == 0 && !line.trim().is_empty() {
                        metadata.header_lines.push(line);
                    }
                }
            }
        }

        if atom_count == 0 {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        if alt_loc_records > 0 {
            trace!("Read {} alternate-location record(s).", alt_loc_records);
        }
        Ok((builder.build(), metadata))
    }

    fn write_to(
        system: &MolecularSystem,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for line in &metadata.header_lines {
            writeln!(writer, "{}", line)?;
        }

        // Serials are renumbered from 1 and TER consumes one, so they stay unique.
        let mut serial = 1usize;
        for (_, chain) in system.chains_iter() {
            let residues: Vec<_> = chain
                .residues()
                .iter()
                .filter_map(|&residue_id| system.residue(residue_id))
                .collect();
            let last_polymer = residues
                .iter()
                .rposition(|residue| !residue.is_hetero && !residue.atoms().is_empty());

            for (index, residue) in residues.iter().enumerate() {
                let record_type = if residue.is_hetero { "HETATM" } else { "ATOM" };

                for &atom_id in residue.atoms() {
                    let Some(atom) = system.atom(atom_id) else {
                        continue;
                    };
                    write_atom_record(writer, record_type, serial, atom, residue, chain.id)?;
                    serial += 1;
                }

                if Some(index) == last_polymer {
                    writeln!(
                        writer,
                        "TER   {:>5}      {:>3} {}{:>4}{}",
                        serial,
                        residue.name,
                        chain.id,
                        residue.id,
                        residue.insertion_code.unwrap_or(' ')
                    )?;
                    serial += 1;
                }
            }
        }

        writeln!(writer, "END")?;
        Ok(())
    }

    fn write_system_to(
        system: &MolecularSystem,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let default_metadata = PdbMetadata {
            header_lines: vec!["REMARK Generated by foldseq".to_string()],
        };
        Self::write_to(system, &default_metadata, writer)
    }
}

fn write_atom_record(
    writer: &mut impl Write,
    record_type: &str,
    serial: usize,
    atom: &Atom,
    residue: &Residue,
    chain_id: char,
) -> io::Result<()> {
    writeln!(
        writer,
        "{:<6}{:>5} {}{}{:>3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}{:<2}",
        record_type,
        serial,
        format_atom_name(&atom.name, &atom.element),
        atom.alt_loc.unwrap_or(' '),
        residue.name,
        chain_id,
        residue.id,
        residue.insertion_code.unwrap_or(' '),
        atom.position.x,
        atom.position.y,
        atom.position.z,
        atom.occupancy,
        atom.temp_factor,
        atom.element,
        atom.charge
    )
}
