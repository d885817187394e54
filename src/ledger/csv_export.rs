//! Ranked-table CSV export:
//!
//! - `;` between fields, `\n` between rows
//! - `,` as the decimal separator for float columns
//! - a header row with the record's column names plus `Ranking_Qualidade`
//! - fields containing `;`, `"`, or a line break are double-quoted, with
//!   embedded quotes doubled

use crate::ledger::record::RankedRecord;

pub const SEPARATOR: char = ';';

pub const HEADER: [&str; 9] = [
    "imagem_original",
    "ssim_score",
    "diferenca_media",
    "brilho",
    "contraste",
    "saturacao",
    "rotacao",
    "redimensionamento_%",
    "Ranking_Qualidade",
];

/// Renders ranked records (already in rank order) as CSV text.
pub fn to_csv(ranked: &[RankedRecord]) -> String {
    let mut out = String::new();
    push_row(&mut out, HEADER.iter().map(|h| h.to_string()));
    for r in ranked {
        let rec = &r.record;
        push_row(
            &mut out,
            [
                escape_field(&rec.source_filename),
                decimal(rec.ssim_score),
                decimal(rec.mean_abs_diff),
                rec.brightness.to_string(),
                decimal(rec.contrast),
                decimal(rec.saturation),
                decimal(rec.rotation_degrees),
                rec.resize_percent.to_string(),
                r.rank.to_string(),
            ]
            .into_iter(),
        );
    }
    out
}

fn push_row(out: &mut String, fields: impl Iterator<Item = String>) {
    let line = fields.collect::<Vec<_>>().join(&SEPARATOR.to_string());
    out.push_str(&line);
    out.push('\n');
}

/// Shortest round-trip float text (`1.0`, `0.873`), with a decimal comma.
/// Magnitudes below `1e-4` keep Rust's exponent form, e.g. `1e-7` or
/// `2,5e-6`; spreadsheet locales with a decimal comma read both.
fn decimal(value: f64) -> String {
    format!("{:?}", value).replace('.', ",")
}

fn escape_field(field: &str) -> String {
    if field.contains(SEPARATOR) || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}
