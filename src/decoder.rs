//! MP3 decoding into interleaved 16-bit PCM.
//!
//! Packets are pulled from the `symphonia` MPEG audio reader one at a time.
//! The first decoded packet fixes the stream format; every later packet
//! must match it.

use std::io::{Cursor, ErrorKind};

use log::{debug, trace};
use symphonia::core::audio::{SampleBuffer, SignalSpec};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{AudioFormat, ConvertError};

/// Decoded PCM audio.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Interleaved i16 samples.
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
    /// Number of MP3 frames that produced audio.
    pub frames: usize,
}

impl DecodedAudio {
    pub fn format(&self) -> AudioFormat {
        AudioFormat {
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.len() as f64 / self.sample_rate as f64
    }
}

impl From<&SignalSpec> for AudioFormat {
    fn from(spec: &SignalSpec) -> Self {
        AudioFormat {
            sample_rate: spec.rate,
            channels: spec.channels.count() as u16,
        }
    }
}

/// Locks onto the format of the first frame and rejects any frame that
/// differs from it.
#[derive(Debug, Default)]
pub struct FormatLock {
    format: Option<AudioFormat>,
    frames: usize,
}

impl FormatLock {
    pub fn observe(&mut self, found: AudioFormat) -> Result<(), ConvertError> {
        match self.format {
            None => self.format = Some(found),
            Some(expected) if expected != found => {
                return Err(ConvertError::FormatChanged {
                    frame: self.frames,
                    expected,
                    found,
                });
            }
            Some(_) => {}
        }
        self.frames += 1;
        Ok(())
    }

    pub fn format(&self) -> Option<AudioFormat> {
        self.format
    }

    pub fn frames(&self) -> usize {
        self.frames
    }
}

/// Decode a complete MP3 file held in memory.
pub fn decode_mp3(bytes: &[u8]) -> Result<DecodedAudio, ConvertError> {
    if bytes.is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    let source = MediaSourceStream::new(
        Box::new(Cursor::new(bytes.to_vec())),
        MediaSourceStreamOptions::default(),
    );
    let mut hint = Hint::new();
    hint.with_extension("mp3");

    let probed = match symphonia::default::get_probe().format(
        &hint,
        source,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    ) {
        Ok(probed) => probed,
        // No MPEG audio sync found anywhere in the input
        Err(SymphoniaError::Unsupported(_)) => return Err(ConvertError::NoAudioFrames),
        Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => {
            return Err(ConvertError::NoAudioFrames);
        }
        Err(e) => return Err(e.into()),
    };
    let mut reader = probed.format;

    let track = reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(ConvertError::NoAudioFrames)?;
    let track_id = track.id;
    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut lock = FormatLock::default();
    let mut samples: Vec<i16> = Vec::new();
    let mut pcm: Option<SampleBuffer<i16>> = None;

    loop {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(msg)) => {
                debug!("skipping undecodable frame: {msg}");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if decoded.frames() == 0 {
            continue;
        }

        let spec = *decoded.spec();
        let found = AudioFormat::from(&spec);
        if lock.format().is_none() {
            trace!("first frame: {found}");
        }
        lock.observe(found)?;

        let needed = decoded.capacity() * spec.channels.count();
        if pcm.as_ref().is_none_or(|buf| buf.capacity() < needed) {
            pcm = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
        }
        if let Some(buf) = pcm.as_mut() {
            buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buf.samples());
        }
    }

    let format = lock.format().ok_or(ConvertError::NoAudioFrames)?;
    Ok(DecodedAudio {
        samples,
        sample_rate: format.sample_rate,
        channels: format.channels,
        frames: lock.frames(),
    })
}
