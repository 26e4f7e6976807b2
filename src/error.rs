use wasm_bindgen::JsValue;

/// Setup failures. Runtime paths never surface these to the page.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("canvas #{0} not found")]
    CanvasNotFound(String),
    #[error("canvas has no 2d context")]
    No2dContext,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("js exception: {0}")]
    Js(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        let msg = value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}"));
        Error::Js(msg)
    }
}

impl From<Error> for JsValue {
    fn from(err: Error) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
