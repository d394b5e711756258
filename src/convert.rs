use log::debug;

use crate::decoder::decode_mp3;
use crate::error::ConvertError;
use crate::wav::encode_wav;

/// A finished MP3 to WAV conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub wav: Vec<u8>,
    pub sample_rate: u32,
    pub channels: u16,
    pub frames: usize,
    pub duration_secs: f64,
}

/// Decode an MP3 file and re-encode it as 16-bit PCM WAV with the same
/// sample rate and channel layout.
pub fn convert_mp3_to_wav(bytes: &[u8]) -> Result<Conversion, ConvertError> {
    let audio = decode_mp3(bytes)?;
    let wav = encode_wav(&audio.samples, audio.sample_rate, audio.channels)?;

    debug!(
        "converted {} bytes ({} frames, {}) into {} bytes of WAV",
        bytes.len(),
        audio.frames,
        audio.format(),
        wav.len()
    );

    Ok(Conversion {
        wav,
        sample_rate: audio.sample_rate,
        channels: audio.channels,
        frames: audio.frames,
        duration_secs: audio.duration_secs(),
    })
}
