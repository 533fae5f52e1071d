use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Input must contain {} columns", .columns.join(", "))]
    MissingColumns { columns: &'static [&'static str] },

    #[error("Invalid coordinate format: '{value}'")]
    InvalidCoordinateFormat { value: String },

    #[error("Unsupported input file '{file_name}': expected a spreadsheet or a .kml file")]
    UnsupportedInputType { file_name: String },

    #[error("Workbook contains no sheets")]
    EmptyWorkbook,

    #[error("Spreadsheet read error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("XML text decode error: {0}")]
    TextEncoding(#[from] quick_xml::encoding::EncodingError),

    #[error("Spreadsheet packaging error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Write error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    pub(crate) fn invalid_coordinate(value: impl Into<String>) -> Self {
        Self::InvalidCoordinateFormat {
            value: value.into(),
        }
    }
}

impl From<ConvertError> for JsValue {
    fn from(e: ConvertError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
