use crate::constants::SEPARATOR_WIDTH;
use crate::error::CompressionError;
use crate::processing::CompressionResult;
use crate::utils::{calculate_compression_ratio, format_file_size};
use std::time::Duration;

/// Running totals for one batch run.
///
/// Built by folding each per-file outcome into the previous value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStatistics {
    pub processed: usize,
    pub failed: usize,
    pub original_bytes: u64,
    pub compressed_bytes: u64,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(self, result: &CompressionResult) -> Self {
        Self {
            processed: self.processed + 1,
            original_bytes: self.original_bytes + result.original_size,
            compressed_bytes: self.compressed_bytes + result.compressed_size,
            ..self
        }
    }

    pub fn record_failure(self) -> Self {
        Self {
            failed: self.failed + 1,
            ..self
        }
    }

    pub fn merge(self, outcome: &Result<CompressionResult, CompressionError>) -> Self {
        match outcome {
            Ok(result) => self.record(result),
            Err(_) => self.record_failure(),
        }
    }

    pub fn compression_ratio(&self) -> f64 {
        calculate_compression_ratio(self.original_bytes, self.compressed_bytes)
    }

    /// Bytes saved, or `None` if the outputs are larger than the inputs.
    pub fn saved_bytes(&self) -> Option<u64> {
        self.original_bytes.checked_sub(self.compressed_bytes)
    }

    pub fn print_summary(&self, elapsed: Duration) {
        if self.processed == 0 {
            crate::warn!("No files were compressed ({} failed)", self.failed);
            return;
        }

        let separator = "=".repeat(SEPARATOR_WIDTH);
        crate::info!("{}", separator);
        crate::info!("📊 Compression Summary:");
        crate::info!("  📸 Photos processed: {}", self.processed);
        crate::info!("  📦 Original size: {}", format_file_size(self.original_bytes));
        crate::info!("  📦 Compressed size: {}", format_file_size(self.compressed_bytes));
        match self.saved_bytes() {
            Some(saved) => crate::info!(
                "  💾 Space saved: {} ({:.1}%)",
                format_file_size(saved),
                self.compression_ratio()
            ),
            None => crate::info!(
                "  ⚠️  Size increased by {} ({:.1}%)",
                format_file_size(self.compressed_bytes - self.original_bytes),
                self.compression_ratio().abs()
            ),
        }
        if self.failed > 0 {
            crate::info!("  ⚠️  Failed files: {}", self.failed);
        }
        crate::info!("  ⏱️  Total time: {:.2?}", elapsed);
        crate::info!("{}", separator);
    }
}
