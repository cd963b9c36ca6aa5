use rand::{Rng, seq::SliceRandom};

/// Redraws before falling back to the swap repair.
pub(crate) const MAX_SHUFFLE_ATTEMPTS: usize = 32;

/// Returns `receivers` where `receivers[i]` is the index gifted by giver `i`,
/// with `receivers[i] != i` for every `i`. Requires `n >= 2`.
///
/// Shuffles up to `max_attempts` times and keeps the first derangement. If
/// none turns up, the last shuffle goes through [`repair`].
pub(crate) fn derange<R: Rng + ?Sized>(n: usize, rng: &mut R, max_attempts: usize) -> Vec<usize> {
    let mut receivers: Vec<usize> = (0..n).collect();

    for attempt in 0..max_attempts {
        receivers.shuffle(rng);
        if is_derangement(&receivers) {
            tracing::trace!(attempt, "drew derangement");
            return receivers;
        }
    }

    tracing::debug!(n, max_attempts, "no derangement within redraw limit, repairing");
    repair(&mut receivers);
    receivers
}

pub(crate) fn is_derangement(receivers: &[usize]) -> bool {
    receivers.iter().enumerate().all(|(giver, &receiver)| giver != receiver)
}

/// Clears every fixed point in one left-to-right pass.
///
/// A fixed point at `i` swaps with `(i + 1) % n`. Both touched slots end up
/// non-fixed because the permutation already maps `i` to itself, and slots
/// before `i` are never touched again except slot 0 on wrap, which receives
/// `n - 1`.
fn repair(receivers: &mut [usize]) {
    let n = receivers.len();
    if n < 2 {
        return;
    }

    for i in 0..n {
        if receivers[i] == i {
            receivers.swap(i, (i + 1) % n);
        }
    }
}
