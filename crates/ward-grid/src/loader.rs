//! Text-format floor-plan persistence.
//!
//! # Format
//!
//! Line 1 is `rows cols`, followed by `rows` space-separated integer rows
//! using the [`CellKind`][crate::CellKind] wire encoding.  Then four
//! count-prefixed blocks of `row col` lines: low-severity rooms,
//! high-severity rooms, nurse idle positions, doctor idle positions.  The
//! two staff blocks are optional; their absence means zero staff.
//!
//! ```text
//! 4 5
//! -1 1 -2 -2 -2
//! -2 0 0 0 -2
//! -2 0 0 0 -2
//! -2 0 0 0 -2
//! 1
//! 1 0
//! 1
//! 3 4
//! 1
//! 2 2
//! 1
//! 2 2
//! ```
//!
//! The format round-trips: [`write_floor_text`] of a loaded plan parses back
//! to an identical plan.
//!
//! Parse errors name the 1-based line they occurred on.  Validation (shape,
//! singletons, reachability) is delegated to [`FloorPlan::load`] after
//! parsing, so a syntactically valid file can still fail with
//! `GridError::Invalid`.

use std::fmt::Write as _;
use std::io::Read;
use std::path::Path;

use ward_core::CellPos;

use crate::error::{GridError, GridResult};
use crate::floor::FloorPlan;

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse a floor plan from its text representation and validate it.
pub fn parse_floor_text(text: &str) -> GridResult<FloorPlan> {
    let mut lines = Lines::new(text);

    // Header: "rows cols".
    let (rows, cols) = {
        let (line_no, line) = lines.next_required("rows/cols header")?;
        let mut it = line.split_whitespace();
        let rows = parse_num::<usize>(it.next(), line_no, "row count")?;
        let cols = parse_num::<usize>(it.next(), line_no, "column count")?;
        if it.next().is_some() {
            return Err(GridError::Parse {
                line: line_no,
                msg: "trailing tokens after \"rows cols\"".into(),
            });
        }
        (rows, cols)
    };

    // Matrix rows.
    let mut matrix: Vec<Vec<i8>> = Vec::with_capacity(rows);
    for _ in 0..rows {
        let (line_no, line) = lines.next_required("matrix row")?;
        let row = line
            .split_whitespace()
            .map(|tok| parse_num::<i8>(Some(tok), line_no, "cell code"))
            .collect::<GridResult<Vec<i8>>>()?;
        if row.len() != cols {
            return Err(GridError::Parse {
                line: line_no,
                msg: format!("expected {cols} cell codes, found {}", row.len()),
            });
        }
        matrix.push(row);
    }

    // Count-prefixed coordinate blocks.
    let low_rooms = parse_block(&mut lines, "low-severity room")?.unwrap_or_default();
    let high_rooms = parse_block(&mut lines, "high-severity room")?.unwrap_or_default();
    let nurses = parse_block(&mut lines, "nurse position")?.unwrap_or_default();
    let doctors = parse_block(&mut lines, "doctor position")?.unwrap_or_default();

    if let Some((line_no, _)) = lines.next() {
        return Err(GridError::Parse {
            line: line_no,
            msg: "unexpected content after doctor positions".into(),
        });
    }

    FloorPlan::load(&matrix, &low_rooms, &high_rooms, &nurses, &doctors)
}

/// Like [`parse_floor_text`] but reads from any `Read` source (a file, a
/// network stream, or a `Cursor` in tests).
pub fn parse_floor_reader<R: Read>(mut reader: R) -> GridResult<FloorPlan> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_floor_text(&text)
}

/// Convenience: parse a floor plan from a file on disk.
pub fn parse_floor_file(path: &Path) -> GridResult<FloorPlan> {
    parse_floor_text(&std::fs::read_to_string(path)?)
}

/// One count-prefixed block of "row col" lines.  `None` at end of input
/// (blocks are optional from the staff sections onward — the parser treats
/// any truncation after the matrix as "no further sections").
fn parse_block(lines: &mut Lines<'_>, what: &str) -> GridResult<Option<Vec<CellPos>>> {
    let Some((line_no, line)) = lines.next() else {
        return Ok(None);
    };
    let count = parse_num::<usize>(Some(line.trim()), line_no, &format!("{what} count"))?;

    let mut block = Vec::with_capacity(count);
    for _ in 0..count {
        let (line_no, line) = lines.next_required(&format!("{what} coordinate"))?;
        let mut it = line.split_whitespace();
        let row = parse_num::<u16>(it.next(), line_no, "row")?;
        let col = parse_num::<u16>(it.next(), line_no, "col")?;
        if it.next().is_some() {
            return Err(GridError::Parse {
                line: line_no,
                msg: format!("trailing tokens after {what} coordinate"),
            });
        }
        block.push(CellPos::new(row, col));
    }
    Ok(Some(block))
}

// ── Writing ───────────────────────────────────────────────────────────────────

/// Serialize a plan to its text representation.
///
/// Staff blocks are written whenever either staff list is non-empty (the
/// doctor block cannot appear without the nurse block preceding it).
pub fn write_floor_text(plan: &FloorPlan) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail; unwraps here are infallible.
    writeln!(out, "{} {}", plan.rows, plan.cols).unwrap();

    for row in plan.code_matrix() {
        let codes: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        writeln!(out, "{}", codes.join(" ")).unwrap();
    }

    write_block(&mut out, &plan.low_rooms);
    write_block(&mut out, &plan.high_rooms);
    if !plan.nurses.is_empty() || !plan.doctors.is_empty() {
        write_block(&mut out, &plan.nurses);
        write_block(&mut out, &plan.doctors);
    }
    out
}

fn write_block(out: &mut String, block: &[CellPos]) {
    writeln!(out, "{}", block.len()).unwrap();
    for pos in block {
        writeln!(out, "{} {}", pos.row, pos.col).unwrap();
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Line iterator that skips blank lines and tracks 1-based line numbers for
/// error reporting.
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self { inner: text.lines().enumerate() }
    }

    fn next(&mut self) -> Option<(usize, &'a str)> {
        for (i, line) in self.inner.by_ref() {
            if !line.trim().is_empty() {
                return Some((i + 1, line));
            }
        }
        None
    }

    fn next_required(&mut self, what: &str) -> GridResult<(usize, &'a str)> {
        self.next().ok_or_else(|| GridError::Parse {
            line: 0,
            msg: format!("unexpected end of input: expected {what}"),
        })
    }
}

fn parse_num<T: std::str::FromStr>(
    tok: Option<&str>,
    line: usize,
    what: &str,
) -> GridResult<T> {
    let tok = tok.ok_or_else(|| GridError::Parse {
        line,
        msg: format!("missing {what}"),
    })?;
    tok.parse::<T>().map_err(|_| GridError::Parse {
        line,
        msg: format!("invalid {what}: {tok:?}"),
    })
}
