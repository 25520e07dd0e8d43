//! Audio validity checker
//!
//! Inspects synthesized bytes for a correct container signature before they
//! are accepted. A size check alone is not enough: a truncated transfer or an
//! HTML error page saved as audio must be rejected, not played.

use domain::AudioFormat;

/// Anything shorter than this cannot hold a header plus audible content
pub const MIN_AUDIO_BYTES: usize = 64;

/// Check that `data` is a plausible instance of the claimed container
///
/// - WAV: RIFF chunk id at offset 0 and WAVE form type at offset 8
/// - MP3: an ID3v2 tag or an MPEG frame-sync pattern at offset 0
#[must_use]
pub fn is_valid(data: &[u8], expected: AudioFormat) -> bool {
    if data.len() < MIN_AUDIO_BYTES {
        return false;
    }

    match expected {
        AudioFormat::Wav => has_wav_header(data),
        AudioFormat::Mp3 => has_mp3_header(data),
    }
}

fn has_wav_header(data: &[u8]) -> bool {
    data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WAVE"
}

fn has_mp3_header(data: &[u8]) -> bool {
    if data.len() < 3 {
        return false;
    }
    if &data[0..3] == b"ID3" {
        return true;
    }
    // MPEG frame sync: eleven set bits across the first two bytes
    data[0] == 0xFF && (data[1] & 0xE0) == 0xE0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded(mut head: Vec<u8>) -> Vec<u8> {
        head.resize(MIN_AUDIO_BYTES + 16, 0);
        head
    }

    fn wav_bytes() -> Vec<u8> {
        let mut data = b"RIFF".to_vec();
        data.extend_from_slice(&[0x24, 0x00, 0x00, 0x00]);
        data.extend_from_slice(b"WAVEfmt ");
        padded(data)
    }

    #[test]
    fn valid_wav_is_accepted() {
        assert!(is_valid(&wav_bytes(), AudioFormat::Wav));
    }

    #[test]
    fn correct_size_wrong_header_is_rejected() {
        // Same length as a valid buffer, garbage signature
        let data = padded(b"NOTRIFFWAVE".to_vec());
        assert!(!is_valid(&data, AudioFormat::Wav));
    }

    #[test]
    fn empty_buffer_is_rejected() {
        assert!(!is_valid(&[], AudioFormat::Wav));
        assert!(!is_valid(&[], AudioFormat::Mp3));
    }

    #[test]
    fn truncated_wav_is_rejected() {
        let mut data = wav_bytes();
        data.truncate(20);
        assert!(!is_valid(&data, AudioFormat::Wav));
    }

    #[test]
    fn id3_tagged_mp3_is_accepted() {
        let data = padded(b"ID3\x04\x00".to_vec());
        assert!(is_valid(&data, AudioFormat::Mp3));
    }

    #[test]
    fn frame_sync_mp3_is_accepted() {
        let data = padded(vec![0xFF, 0xFB, 0x90, 0x00]);
        assert!(is_valid(&data, AudioFormat::Mp3));
    }

    #[test]
    fn html_error_page_is_rejected_for_both_formats() {
        let page = padded(b"<html><body>429 Too Many Requests</body></html>".to_vec());
        assert!(!is_valid(&page, AudioFormat::Wav));
        assert!(!is_valid(&page, AudioFormat::Mp3));
    }

    #[test]
    fn wav_header_is_not_valid_mp3() {
        assert!(!is_valid(&wav_bytes(), AudioFormat::Mp3));
    }

    #[test]
    fn bad_frame_sync_is_rejected() {
        // First byte right, second byte missing the sync bits
        let data = padded(vec![0xFF, 0x1B, 0x90, 0x00]);
        assert!(!is_valid(&data, AudioFormat::Mp3));
    }
}
