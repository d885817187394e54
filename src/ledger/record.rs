use serde::{Deserialize, Serialize};

use crate::edit::params::EditParams;

/// One finished comparison. Created once, appended to the ledger, never
/// changed afterwards.
///
/// Serialized field names follow the export table's column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    #[serde(rename = "imagem_original")]
    pub source_filename: String,
    pub ssim_score: f64,
    #[serde(rename = "diferenca_media")]
    pub mean_abs_diff: f64,
    #[serde(rename = "brilho")]
    pub brightness: i32,
    #[serde(rename = "contraste")]
    pub contrast: f64,
    #[serde(rename = "saturacao")]
    pub saturation: f64,
    #[serde(rename = "rotacao")]
    pub rotation_degrees: f64,
    #[serde(rename = "redimensionamento_%")]
    pub resize_percent: i32,
}

impl ComparisonRecord {
    pub fn new(
        source_filename: impl Into<String>,
        ssim_score: f64,
        mean_abs_diff: f64,
        params: &EditParams,
    ) -> Self {
        ComparisonRecord {
            source_filename: source_filename.into(),
            ssim_score,
            mean_abs_diff,
            brightness: params.brightness,
            contrast: params.contrast,
            saturation: params.saturation,
            rotation_degrees: params.rotation_degrees,
            resize_percent: params.resize_percent,
        }
    }
}

/// A record together with its 1-based position in the similarity ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRecord {
    #[serde(flatten)]
    pub record: ComparisonRecord,
    #[serde(rename = "Ranking_Qualidade")]
    pub rank: usize,
}
