//! WAV encoder: interleaved i16 PCM to a RIFF/WAVE byte buffer.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::error::ConvertError;

const BITS_PER_SAMPLE: u16 = 16;
const HEADER_LEN: usize = 44;

/// Size in bytes of the data chunk for `samples` samples. RIFF sizes are
/// 32-bit, so anything past that cannot be written.
fn data_chunk_len(samples: usize) -> Result<usize, ConvertError> {
    samples
        .checked_mul(BITS_PER_SAMPLE as usize / 8)
        .filter(|&len| len as u64 <= (u32::MAX as u64) - (HEADER_LEN as u64 - 8))
        .ok_or_else(|| ConvertError::Encode(format!("{samples} samples do not fit in a WAV file")))
}

/// Encode interleaved i16 PCM samples to a WAV byte buffer (16-bit PCM).
pub fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Result<Vec<u8>, ConvertError> {
    if channels == 0 || sample_rate == 0 {
        return Err(ConvertError::Encode(format!(
            "invalid output format: {sample_rate} Hz, {channels} channels"
        )));
    }

    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };

    let data_size = data_chunk_len(samples.len())?;
    let mut buf = Vec::with_capacity(HEADER_LEN + data_size);
    {
        let mut writer = WavWriter::new(Cursor::new(&mut buf), spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }

    Ok(buf)
}
