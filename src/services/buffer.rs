//! Temporal buffering of the household signal
//!
//! Vacant samples are treated as missing and filled from nearby occupied
//! samples: first forward from the last occupied sample, then backward from
//! the next occupied (or forward-filled) sample. Each fill reaches at most
//! `width` samples into a missing run. Whatever is left is vacant.

use crate::domain::signal::{BufferedSignal, HouseholdSignal};

/// Default buffer width in minutes
pub const DEFAULT_BUFFER_MINUTES: u32 = 5;

/// Buffer width in samples for a width in minutes at the given resolution
pub fn buffer_samples(width_minutes: u32, sample_interval_secs: u32) -> usize {
    if sample_interval_secs == 0 {
        return 0;
    }
    (width_minutes as usize * 60) / sample_interval_secs as usize
}

/// Forward fill of missing (false) runs, at most `limit` samples per run
fn forward_fill(occupied: &[bool], limit: usize) -> Vec<bool> {
    let mut filled = occupied.to_vec();
    let mut seen_occupied = false;
    let mut run = 0usize;

    for (i, &value) in occupied.iter().enumerate() {
        if value {
            seen_occupied = true;
            run = 0;
            continue;
        }
        if seen_occupied && run < limit {
            filled[i] = true;
        }
        run += 1;
    }
    filled
}

/// Backward fill of the runs still missing after the forward pass
fn backward_fill(occupied: &[bool], limit: usize) -> Vec<bool> {
    let mut filled = occupied.to_vec();
    let mut seen_occupied = false;
    let mut run = 0usize;

    for (i, &value) in occupied.iter().enumerate().rev() {
        if value {
            seen_occupied = true;
            run = 0;
            continue;
        }
        if seen_occupied && run < limit {
            filled[i] = true;
        }
        run += 1;
    }
    filled
}

/// Buffer a 0/1 series with a width of `limit` samples
pub fn buffer_series(occupied: &[u8], limit: usize) -> Vec<u8> {
    let present: Vec<bool> = occupied.iter().map(|v| *v == 1).collect();
    let forward = forward_fill(&present, limit);
    backward_fill(&forward, limit).into_iter().map(u8::from).collect()
}

/// Apply the buffer to the household `occupied` column; `number` is carried as-is
pub fn apply_buffer(signal: &HouseholdSignal, width_minutes: u32) -> BufferedSignal {
    let step = u32::try_from(signal.index.step_secs()).unwrap_or(0);
    let limit = buffer_samples(width_minutes, step);

    BufferedSignal {
        index: signal.index,
        occupied: buffer_series(&signal.occupied, limit),
        number: signal.number.clone(),
    }
}
