use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("registry error: {0}")]
    Registry(String),

    #[error("the spreadsheet must contain a column named '{0}'")]
    MissingColumn(String),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("unable to open camera {0}")]
    CameraUnavailable(i32),

    #[error("OpenCV error: {0}")]
    OpenCv(#[from] opencv::Error),

    #[error("OCR error: {0}")]
    Ocr(String),
}

pub type Result<T> = std::result::Result<T, Error>;
