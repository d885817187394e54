use std::io::Cursor;

use serde_json::json;
use thiserror::Error;
use tiny_http::{Response, StatusCode};

use image_comparator::{DecodeError, EditError, EncodeError, LedgerError};

/// Everything an API request can fail with. The display text is what the
/// client sees in the `{"error": ...}` body.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Nenhum arquivo 'originalImage' enviado")]
    MissingUpload,

    #[error("Nenhum arquivo selecionado")]
    EmptyFilename,

    #[error("Formato de arquivo não permitido")]
    DisallowedExtension,

    #[error("Não foi possível ler a imagem")]
    UndecodableImage(#[source] DecodeError),

    #[error("Nenhum resultado para rankear ainda.")]
    EmptyLedger,

    #[error("Arquivo excede o limite de {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Requisição multipart inválida")]
    InvalidMultipart,

    #[error("Parâmetro inválido '{field}': {value:?}")]
    InvalidParameter { field: &'static str, value: String },

    #[error("Edição inválida: {0}")]
    InvalidEdit(#[from] EditError),

    #[error("Erro interno no servidor: {0}")]
    Io(String),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::PayloadTooLarge { .. } => 413,
            ApiError::Io(_) => 500,
            _ => 400,
        }
    }

    pub fn to_response(&self) -> Response<Cursor<Vec<u8>>> {
        let body = json!({ "error": self.to_string() }).to_string();
        crate::routes::json_response(StatusCode(self.status()), body)
    }
}

impl From<DecodeError> for ApiError {
    fn from(e: DecodeError) -> Self {
        ApiError::UndecodableImage(e)
    }
}

impl From<EncodeError> for ApiError {
    fn from(e: EncodeError) -> Self {
        ApiError::Io(e.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Io(e.to_string())
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::Empty => ApiError::EmptyLedger,
        }
    }
}
