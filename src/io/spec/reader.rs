//! Parsing of the legacy fixed-format NCS report.

use crate::io::Error;
use crate::model::types::{Point, Rotation, Translation};

const FORMAT: &str = "NCS spec";

/// One operator record from a legacy report: the spatial operator plus the
/// member metadata lines that follow it.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecOperator {
    pub rotation: Rotation,
    pub translation: Translation,
    pub center: Point,
    pub chain_id: String,
    pub rmsd: f64,
    pub matching: usize,
    pub ranges: Vec<(i32, i32)>,
    /// Line of the `new_operator` keyword, for diagnostics.
    pub line_number: usize,
}

/// Parses a legacy report into operator blocks, one per `new_ncs_group`.
///
/// The parser is keyword-driven and line-tolerant: header lines, dates,
/// and blanks pass through silently. An operator is complete only with
/// three `rota_matrix` rows, a `tran_orth` line, and a `CHAIN` line;
/// anything less is a parse error, not a silent skip.
pub fn read(text: &str) -> Result<Vec<Vec<SpecOperator>>, Error> {
    let mut blocks: Vec<Vec<SpecOperator>> = Vec::new();
    let mut current: Vec<SpecOperator> = Vec::new();
    let mut builder: Option<Builder> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_number = idx + 1;
        let line = raw.trim();

        if line == "new_ncs_group" {
            finish_operator(&mut builder, &mut current)?;
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else if line == "new_operator" {
            finish_operator(&mut builder, &mut current)?;
            builder = Some(Builder::new(line_number));
        } else if let Some(rest) = line.strip_prefix("rota_matrix") {
            let b = expect_operator(&mut builder, line_number)?;
            if b.rows.len() == 3 {
                return Err(Error::parse(
                    FORMAT,
                    line_number,
                    "more than three rota_matrix rows",
                ));
            }
            b.rows.push(three_floats(rest, line_number)?);
        } else if let Some(rest) = line.strip_prefix("tran_orth") {
            let b = expect_operator(&mut builder, line_number)?;
            let t = three_floats(rest, line_number)?;
            b.translation = Some(Translation::new(t[0], t[1], t[2]));
        } else if let Some(rest) = line.strip_prefix("center_orth") {
            let b = expect_operator(&mut builder, line_number)?;
            let c = three_floats(rest, line_number)?;
            b.center = Point::new(c[0], c[1], c[2]);
        } else if let Some(rest) = line.strip_prefix("CHAIN") {
            let b = expect_operator(&mut builder, line_number)?;
            let id = rest.trim().trim_matches(['\'', '"']);
            if id.is_empty() {
                return Err(Error::parse(FORMAT, line_number, "CHAIN without an ID"));
            }
            b.chain_id = Some(id.to_string());
        } else if let Some(rest) = line.strip_prefix("RMSD") {
            let b = expect_operator(&mut builder, line_number)?;
            b.rmsd = rest.trim().parse().map_err(|_| {
                Error::parse(FORMAT, line_number, format!("bad RMSD '{}'", rest.trim()))
            })?;
        } else if let Some(rest) = line.strip_prefix("MATCHING") {
            let b = expect_operator(&mut builder, line_number)?;
            b.matching = rest.trim().parse().map_err(|_| {
                Error::parse(
                    FORMAT,
                    line_number,
                    format!("bad MATCHING '{}'", rest.trim()),
                )
            })?;
        } else if let Some(rest) = line.strip_prefix("RESSEQ") {
            let b = expect_operator(&mut builder, line_number)?;
            let (a, z) = rest.trim().split_once(':').ok_or_else(|| {
                Error::parse(FORMAT, line_number, "RESSEQ is not 'start:end'")
            })?;
            let parse = |s: &str| {
                s.trim().parse::<i32>().map_err(|_| {
                    Error::parse(FORMAT, line_number, format!("bad RESSEQ bound '{s}'"))
                })
            };
            b.ranges.push((parse(a)?, parse(z)?));
        }
        // Anything else (headers, dates, blanks) is ignored.
    }

    finish_operator(&mut builder, &mut current)?;
    if !current.is_empty() {
        blocks.push(current);
    }
    Ok(blocks)
}

struct Builder {
    line_number: usize,
    rows: Vec<[f64; 3]>,
    translation: Option<Translation>,
    center: Point,
    chain_id: Option<String>,
    rmsd: f64,
    matching: usize,
    ranges: Vec<(i32, i32)>,
}

impl Builder {
    fn new(line_number: usize) -> Self {
        Self {
            line_number,
            rows: Vec::new(),
            translation: None,
            center: Point::origin(),
            chain_id: None,
            rmsd: 0.0,
            matching: 0,
            ranges: Vec::new(),
        }
    }

    fn finish(self) -> Result<SpecOperator, Error> {
        if self.rows.len() != 3 {
            return Err(Error::parse(
                FORMAT,
                self.line_number,
                format!("operator has {} rota_matrix rows, need 3", self.rows.len()),
            ));
        }
        let translation = self.translation.ok_or_else(|| {
            Error::parse(FORMAT, self.line_number, "operator has no tran_orth")
        })?;
        let chain_id = self.chain_id.ok_or_else(|| {
            Error::parse(FORMAT, self.line_number, "operator has no CHAIN")
        })?;
        let r = &self.rows;
        Ok(SpecOperator {
            rotation: Rotation::new(
                r[0][0], r[0][1], r[0][2], r[1][0], r[1][1], r[1][2], r[2][0],
                r[2][1], r[2][2],
            ),
            translation,
            center: self.center,
            chain_id,
            rmsd: self.rmsd,
            matching: self.matching,
            ranges: self.ranges,
            line_number: self.line_number,
        })
    }
}

fn finish_operator(
    builder: &mut Option<Builder>,
    current: &mut Vec<SpecOperator>,
) -> Result<(), Error> {
    if let Some(b) = builder.take() {
        current.push(b.finish()?);
    }
    Ok(())
}

fn expect_operator(
    builder: &mut Option<Builder>,
    line_number: usize,
) -> Result<&mut Builder, Error> {
    builder.as_mut().ok_or_else(|| {
        Error::parse(FORMAT, line_number, "operator field outside new_operator")
    })
}

fn three_floats(rest: &str, line_number: usize) -> Result<[f64; 3], Error> {
    let mut out = [0.0; 3];
    let mut fields = rest.split_whitespace();
    for slot in &mut out {
        let field = fields.next().ok_or_else(|| {
            Error::parse(FORMAT, line_number, "expected three numeric fields")
        })?;
        *slot = field.parse().map_err(|_| {
            Error::parse(FORMAT, line_number, format!("bad numeric field '{field}'"))
        })?;
    }
    if fields.next().is_some() {
        return Err(Error::parse(
            FORMAT,
            line_number,
            "expected exactly three numeric fields",
        ));
    }
    Ok(out)
}
