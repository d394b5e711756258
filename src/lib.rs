pub mod config;
pub mod convert;
pub mod decoder;
pub mod error;
pub mod logging;
pub mod message;
pub mod wav;
#[cfg(target_arch = "wasm32")]
pub mod worker;

#[cfg(test)]
pub(crate) mod test_support;

pub use convert::{Conversion, convert_mp3_to_wav};
pub use error::ConvertError;

use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the mp3wav version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: convert MP3 bytes to a WAV byte array on the calling thread.
/// Prefer the worker for large files.
#[wasm_bindgen]
pub fn convert_mp3(bytes: &[u8]) -> Result<Vec<u8>, JsValue> {
    let conversion = convert_mp3_to_wav(bytes).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    Ok(conversion.wav)
}
