//! QR matrix encoding for share payloads.
//!
//! The core exposes only a boolean module matrix; rendering (SVG, image,
//! terminal) belongs to the UI layer. High error correction is required so
//! a partially obscured code still scans.

use qrcode::{Color, EcLevel, QrCode};

use crate::error::{Result, ShareError};

/// Encode transport text as a QR module matrix at high error correction.
///
/// Returns rows of modules; `true` is a dark module.
pub fn qr_matrix(transport_text: &str) -> Result<Vec<Vec<bool>>> {
    let code = QrCode::with_error_correction_level(transport_text.as_bytes(), EcLevel::H)
        .map_err(|e| ShareError::Qr(e.to_string()))?;

    let width = code.width();
    let rows = code
        .to_colors()
        .chunks(width)
        .map(|row| row.iter().map(|c| *c == Color::Dark).collect())
        .collect();

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_is_square() {
        let matrix = qr_matrix("CARDVAULT-TEST-PAYLOAD").unwrap();
        assert!(!matrix.is_empty());
        for row in &matrix {
            assert_eq!(row.len(), matrix.len());
        }
    }

    #[test]
    fn test_matrix_has_finder_pattern() {
        // Top-left module of a QR symbol is always dark.
        let matrix = qr_matrix("CARDVAULT-TEST-PAYLOAD").unwrap();
        assert!(matrix[0][0]);
    }

    #[test]
    fn test_oversized_payload_is_rejected() {
        // Version 40 at EcLevel::H caps out near 1.2 KB of binary data.
        let huge = "x".repeat(8 * 1024);
        assert!(matches!(qr_matrix(&huge).unwrap_err(), ShareError::Qr(_)));
    }
}
