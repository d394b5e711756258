use std::fmt;

#[derive(Debug)]
pub enum ConvertError {
    EmptyInput,
    NoAudioFrames,
    FormatChanged {
        frame: usize,
        expected: AudioFormat,
        found: AudioFormat,
    },
    Decode(String),
    Encode(String),
    UnsupportedInput(String),
    Fetch { url: String, status: u16 },
    Host(String),
}

/// Sample rate and channel count of a decoded stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz / {} ch", self.sample_rate, self.channels)
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::EmptyInput => write!(f, "Input file is empty"),
            ConvertError::NoAudioFrames => write!(f, "No MP3 audio frames found in input"),
            ConvertError::FormatChanged { frame, expected, found } => {
                write!(f, "Stream format changed at frame {frame}: expected {expected}, found {found}")
            }
            ConvertError::Decode(msg) => write!(f, "MP3 decode error: {msg}"),
            ConvertError::Encode(msg) => write!(f, "WAV encode error: {msg}"),
            ConvertError::UnsupportedInput(kind) => write!(f, "Unsupported input type: {kind}"),
            ConvertError::Fetch { url, status } => write!(f, "Fetching {url} failed with HTTP {status}"),
            ConvertError::Host(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConvertError {}

impl From<hound::Error> for ConvertError {
    fn from(e: hound::Error) -> Self {
        ConvertError::Encode(e.to_string())
    }
}

impl From<symphonia::core::errors::Error> for ConvertError {
    fn from(e: symphonia::core::errors::Error) -> Self {
        ConvertError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_change_message_names_both_formats() {
        let err = ConvertError::FormatChanged {
            frame: 3,
            expected: AudioFormat { sample_rate: 44100, channels: 2 },
            found: AudioFormat { sample_rate: 22050, channels: 1 },
        };
        let msg = err.to_string();
        assert!(msg.contains("frame 3"));
        assert!(msg.contains("44100 Hz / 2 ch"));
        assert!(msg.contains("22050 Hz / 1 ch"));
    }

    #[test]
    fn hound_errors_become_encode_errors() {
        let err: ConvertError = hound::Error::Unsupported.into();
        assert!(matches!(err, ConvertError::Encode(_)));
    }
}
