//! Quantization selection against a memory budget.
//!
//! Centralizes the rule for picking a GGUF variant so every caller
//! (GUI, CLI, tests) agrees on what "fits" means.

use tracing::debug;

use prowl_core::{CatalogFile, InstallError};

/// Fraction of available RAM a model file may occupy. The remaining 15%
/// is reserved for runtime overhead (KV cache, context buffers).
pub const RAM_HEADROOM: f64 = 0.85;

/// Pick the best GGUF file that fits the memory budget.
///
/// Files with an unknown (zero) size are never candidates. Survivors of
/// the budget filter are ranked by quantization quality score, with ties
/// broken toward the larger file. When nothing fits, the error names the
/// minimum RAM the smallest file would need, so the caller can tell the
/// user exactly how far off they are.
pub fn select_variant(
    files: &[CatalogFile],
    available_ram_gb: f64,
) -> Result<CatalogFile, InstallError> {
    let sized: Vec<&CatalogFile> = files.iter().filter(|f| f.size_bytes > 0).collect();
    if sized.is_empty() {
        return Err(InstallError::no_gguf_files(
            "repository has no GGUF files with a known size",
        ));
    }

    let max_usable_gb = available_ram_gb * RAM_HEADROOM;
    let mut fitting: Vec<&CatalogFile> = sized
        .iter()
        .copied()
        .filter(|f| f.size_gb() <= max_usable_gb)
        .collect();

    if fitting.is_empty() {
        // smallest_gb is finite and positive: sized is non-empty.
        let smallest_gb = sized
            .iter()
            .map(|f| f.size_gb())
            .fold(f64::INFINITY, f64::min);
        let minimum_ram_gb = smallest_gb / RAM_HEADROOM;
        return Err(InstallError::no_gguf_files(format!(
            "no quantization fits in {available_ram_gb:.1}GB RAM; the smallest file ({smallest_gb:.1}GB) needs at least {minimum_ram_gb:.1}GB"
        )));
    }

    fitting.sort_by(|a, b| {
        b.quant
            .quality_score()
            .cmp(&a.quant.quality_score())
            .then(b.size_bytes.cmp(&a.size_bytes))
    });

    let chosen = fitting[0].clone();
    debug!(
        filename = %chosen.filename,
        quant = %chosen.quant,
        size_gb = chosen.size_gb(),
        max_usable_gb,
        "selected quantization variant"
    );
    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prowl_core::QuantTag;

    const GB: u64 = 1_073_741_824;

    fn file(filename: &str, size_bytes: u64) -> CatalogFile {
        CatalogFile {
            filename: filename.to_string(),
            size_bytes,
            quant: QuantTag::from_filename(filename),
            download_url: format!("https://example.com/{filename}"),
        }
    }

    #[test]
    fn test_excludes_files_over_budget() {
        // 9GB Q8_0 needs 9/0.85 ≈ 10.6GB of RAM, over an 8GB budget.
        let files = vec![
            file("model.Q4_K_M.gguf", (4.8 * GB as f64) as u64),
            file("model.Q8_0.gguf", 9 * GB),
        ];
        let chosen = select_variant(&files, 8.0).unwrap();
        assert_eq!(chosen.quant, QuantTag::Q4KM);
    }

    #[test]
    fn test_prefers_higher_quality_among_fitting() {
        let files = vec![
            file("model.Q3_K_S.gguf", 2 * GB),
            file("model.Q6_K.gguf", 5 * GB),
            file("model.Q4_K_M.gguf", 4 * GB),
        ];
        let chosen = select_variant(&files, 16.0).unwrap();
        assert_eq!(chosen.quant, QuantTag::Q6K);
    }

    #[test]
    fn test_tie_break_prefers_larger_file() {
        let files = vec![
            file("model-a.Q4_K_M.gguf", 4 * GB),
            file("model-b.Q4_K_M.gguf", 5 * GB),
        ];
        let chosen = select_variant(&files, 16.0).unwrap();
        assert_eq!(chosen.filename, "model-b.Q4_K_M.gguf");
    }

    #[test]
    fn test_never_exceeds_budget() {
        let files = vec![
            file("model.Q8_0.gguf", 8 * GB),
            file("model.Q4_K_M.gguf", 4 * GB),
        ];
        for budget in [1.0, 4.0, 5.0, 8.0, 9.5, 16.0] {
            if let Ok(chosen) = select_variant(&files, budget) {
                assert!(chosen.size_gb() <= budget * RAM_HEADROOM);
            }
        }
    }

    #[test]
    fn test_failure_names_minimum_ram() {
        // Smallest file is 4GB; minimum is 4/0.85 ≈ 4.7GB.
        let files = vec![file("model.Q4_K_M.gguf", 4 * GB)];
        let err = select_variant(&files, 3.0).unwrap_err();
        assert_eq!(err.code(), "NO_GGUF_FILES");
        let msg = err.to_string();
        assert!(msg.contains("4.7GB"), "got: {msg}");
    }

    #[test]
    fn test_unsized_files_are_not_candidates() {
        let files = vec![
            file("model.Q8_0.gguf", 0),
            file("model.Q4_K_M.gguf", 4 * GB),
        ];
        let chosen = select_variant(&files, 16.0).unwrap();
        assert_eq!(chosen.quant, QuantTag::Q4KM);

        let only_unsized = vec![file("model.Q8_0.gguf", 0)];
        let err = select_variant(&only_unsized, 16.0).unwrap_err();
        assert_eq!(err.code(), "NO_GGUF_FILES");
    }

    #[test]
    fn test_unrecognized_tag_sorts_last() {
        let files = vec![
            file("model.IQ2_XXS.gguf", 6 * GB),
            file("model.Q3_K_M.gguf", 3 * GB),
        ];
        let chosen = select_variant(&files, 16.0).unwrap();
        assert_eq!(chosen.quant, QuantTag::Q3KM);
    }
}
