use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Worksheet '{name}' not found in workbook")]
    SheetNotFound { name: String },

    #[error("No logo found on sheet '{sheet}'")]
    NoLogoFound { sheet: String },

    #[error("Invalid workbook structure: {message}")]
    InvalidWorkbook { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, VerifyError>;
