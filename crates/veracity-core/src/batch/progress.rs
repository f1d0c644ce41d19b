//! Progress arithmetic for items and batches.

/// Fixed per-item progress checkpoints, in percent.
///
/// 10 on start, 25/45/70 across the method phase, 85 once all method outputs
/// are joined, 100 once the result is aggregated.
pub const ITEM_CHECKPOINTS: [u8; 6] = [10, 25, 45, 70, 85, 100];

const METHOD_PHASE: [u8; 3] = [ITEM_CHECKPOINTS[1], ITEM_CHECKPOINTS[2], ITEM_CHECKPOINTS[3]];

/// Tracks which method-phase checkpoints one item has already passed.
#[derive(Debug, Default)]
pub struct MethodPhase {
    emitted: usize,
}

impl MethodPhase {
    /// Returns the checkpoints newly reached after `done` of `total` methods.
    ///
    /// Checkpoint `i` of 3 is reached once `done * 3 >= i * total`, so every
    /// checkpoint is returned exactly once by the time `done == total`.
    pub fn advance(&mut self, done: usize, total: usize) -> Vec<u8> {
        let mut reached = Vec::new();
        while self.emitted < METHOD_PHASE.len() {
            let step = self.emitted + 1;
            if done * METHOD_PHASE.len() < step * total {
                break;
            }
            reached.push(METHOD_PHASE[self.emitted]);
            self.emitted = step;
        }
        reached
    }
}

/// Batch progress after `released` of `total` items, rounded to a percent.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn batch_percent(released: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((released as f64 / total as f64) * 100.0).round() as u8
}
