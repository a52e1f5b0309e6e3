//! Workloads for the growbuf benchmarks.
//!
//! - [`values`]: deterministic element stream for append benchmarks
//! - [`edit_script`]: deterministic insert/erase sequence with valid indices
//! - [`apply_edits`]: replay a script against a [`GrowableBuffer`]

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use growbuf::GrowableBuffer;

/// One step of an edit script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edit {
    /// Insert the value before the index.
    Insert(usize, u64),
    /// Erase the element at the index.
    Erase(usize),
}

fn lcg(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state >> 33
}

/// Generate `n` pseudo-random values from `seed`.
pub fn values(n: usize, seed: u64) -> Vec<u64> {
    let mut state = seed;
    (0..n).map(|_| lcg(&mut state)).collect()
}

/// Generate `ops` edits against a buffer that starts with `start_len`
/// elements. Every index is valid at the point it is applied; erases are
/// only emitted while the buffer is non-empty.
pub fn edit_script(start_len: usize, ops: usize, seed: u64) -> Vec<Edit> {
    let mut state = seed;
    let mut len = start_len;
    let mut script = Vec::with_capacity(ops);
    for _ in 0..ops {
        let roll = lcg(&mut state);
        if len > 0 && roll % 2 == 1 {
            script.push(Edit::Erase((lcg(&mut state) as usize) % len));
            len -= 1;
        } else {
            let index = (lcg(&mut state) as usize) % (len + 1);
            script.push(Edit::Insert(index, roll));
            len += 1;
        }
    }
    script
}

/// Replay `script` against `buf`.
///
/// Returns the first error, which cannot happen for scripts from
/// [`edit_script`] unless allocation fails.
pub fn apply_edits(
    buf: &mut GrowableBuffer<u64>,
    script: &[Edit],
) -> Result<(), growbuf::BufferError> {
    for &edit in script {
        match edit {
            Edit::Insert(index, value) => buf.insert(index, value)?,
            Edit::Erase(index) => {
                buf.erase(index);
            }
        }
    }
    Ok(())
}
