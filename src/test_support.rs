//! Synthetic MP3 streams for tests.
//!
//! A MPEG-1 Layer III frame whose side info and main data are all zero
//! decodes to 1152 silent samples per channel, so a run of such frames
//! is a valid (if quiet) MP3 file.

pub const SAMPLES_PER_FRAME: usize = 1152;

/// Build `frames` silent 128 kbps frames at 44.1 kHz.
pub fn silent_mp3(frames: usize, stereo: bool) -> Vec<u8> {
    // 144 * 128000 / 44100, no padding
    const FRAME_LEN: usize = 417;
    let mode = if stereo { 0x04 } else { 0xC4 };
    let header = [0xFF, 0xFB, 0x90, mode];

    let mut out = Vec::with_capacity(frames * FRAME_LEN);
    for _ in 0..frames {
        out.extend_from_slice(&header);
        out.resize(out.len() + FRAME_LEN - header.len(), 0);
    }
    out
}
