//! Worker message protocol.
//!
//! Every request gets a `conversion-start` notice followed by exactly one
//! of `conversion-complete` (carrying the WAV bytes) or `conversion-error`.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::convert::convert_mp3_to_wav;
use crate::error::ConvertError;

/// Fallback text for failures that carry no message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Messages posted from the worker back to the main thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WorkerResponse {
    ConversionStart,
    ConversionComplete {
        #[serde(with = "serde_bytes")]
        data: Vec<u8>,
    },
    ConversionError {
        error: String,
    },
}

impl WorkerResponse {
    pub fn error(err: &ConvertError) -> Self {
        WorkerResponse::ConversionError {
            error: error_text(Some(&err.to_string())),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkerResponse::ConversionStart)
    }
}

/// Where responses go: the worker's `postMessage` in the browser.
pub trait ResponseSink {
    fn post(&mut self, response: WorkerResponse) -> Result<(), ConvertError>;
}

impl ResponseSink for Vec<WorkerResponse> {
    fn post(&mut self, response: WorkerResponse) -> Result<(), ConvertError> {
        self.push(response);
        Ok(())
    }
}

/// Use the message if there is one, otherwise [`UNKNOWN_ERROR`].
pub fn error_text(message: Option<&str>) -> String {
    match message {
        Some(msg) if !msg.trim().is_empty() => msg.to_string(),
        _ => UNKNOWN_ERROR.to_string(),
    }
}

pub fn announce_start<S: ResponseSink>(sink: &mut S) -> Result<(), ConvertError> {
    sink.post(WorkerResponse::ConversionStart)
}

/// Convert an already-read input file and post the terminal response.
///
/// `input` is an error when the file could not be read; that error is
/// reported the same way as a conversion failure.
pub fn handle_file<S: ResponseSink>(
    sink: &mut S,
    input: Result<Vec<u8>, ConvertError>,
) -> Result<(), ConvertError> {
    let response = match input.and_then(|bytes| convert_mp3_to_wav(&bytes)) {
        Ok(conversion) => {
            info!(
                "conversion complete: {:.2}s, {} Hz, {} ch",
                conversion.duration_secs, conversion.sample_rate, conversion.channels
            );
            WorkerResponse::ConversionComplete { data: conversion.wav }
        }
        Err(e) => {
            warn!("conversion failed: {e}");
            WorkerResponse::error(&e)
        }
    };
    sink.post(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::silent_mp3;

    #[test]
    fn success_path_returns_wav_bytes() {
        let mut sent: Vec<WorkerResponse> = Vec::new();
        announce_start(&mut sent).unwrap();
        handle_file(&mut sent, Ok(silent_mp3(10, false))).unwrap();

        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], WorkerResponse::ConversionStart);
        match &sent[1] {
            WorkerResponse::ConversionComplete { data } => assert_eq!(&data[0..4], b"RIFF"),
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn failure_path_returns_error_message() {
        let mut sent: Vec<WorkerResponse> = Vec::new();
        announce_start(&mut sent).unwrap();
        handle_file(&mut sent, Ok(Vec::new())).unwrap();

        assert_eq!(
            sent[1],
            WorkerResponse::ConversionError {
                error: "Input file is empty".to_string()
            }
        );
        assert_eq!(sent.iter().filter(|r| r.is_terminal()).count(), 1);
    }

    #[test]
    fn read_failure_is_reported() {
        let mut sent: Vec<WorkerResponse> = Vec::new();
        let input = Err(ConvertError::UnsupportedInput("number".to_string()));
        handle_file(&mut sent, input).unwrap();
        match &sent[0] {
            WorkerResponse::ConversionError { error } => assert!(error.contains("number")),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn empty_message_falls_back() {
        assert_eq!(error_text(None), UNKNOWN_ERROR);
        assert_eq!(error_text(Some("   ")), UNKNOWN_ERROR);
        assert_eq!(error_text(Some("boom")), "boom");
        assert_eq!(error_text(Some("  padded message\n")), "  padded message\n");
        let host = WorkerResponse::error(&ConvertError::Host(String::new()));
        assert_eq!(
            host,
            WorkerResponse::ConversionError {
                error: UNKNOWN_ERROR.to_string()
            }
        );
    }

    #[test]
    fn wire_shape_matches_worker_protocol() {
        let start = serde_json::to_value(WorkerResponse::ConversionStart).unwrap();
        assert_eq!(start, serde_json::json!({ "type": "conversion-start" }));

        let err = serde_json::to_value(WorkerResponse::ConversionError {
            error: "bad".to_string(),
        })
        .unwrap();
        assert_eq!(err, serde_json::json!({ "type": "conversion-error", "error": "bad" }));

        let done = serde_json::to_value(WorkerResponse::ConversionComplete { data: vec![1, 2] }).unwrap();
        assert_eq!(done["type"], "conversion-complete");
        assert_eq!(done["data"], serde_json::json!([1, 2]));
    }
}
