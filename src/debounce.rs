//! Eager debouncing: a press is reported on the first tick it's seen, but a key only counts as
//! released once it has read as released for [DEBOUNCE_TICKS] ticks in a row.

use crate::config::DEBOUNCE_TICKS;
use crate::keyboard::Matrix;
use crate::keymap::{COLUMNS, ROWS};

#[derive(Default)]
pub struct Debouncer {
    /// Ticks left until each key counts as released; 0 when released
    counts: [[u8; COLUMNS]; ROWS],
}

impl Debouncer {
    pub fn tick(&mut self, raw: &Matrix) -> Matrix {
        let mut debounced = [[false; COLUMNS]; ROWS];
        for ((count_row, raw_row), out_row) in self.counts.iter_mut().zip(raw).zip(&mut debounced) {
            for ((count, pressed), out) in count_row.iter_mut().zip(raw_row).zip(out_row) {
                *count = match (*pressed, *count) {
                    (true, _) => DEBOUNCE_TICKS,
                    (false, 0) => 0,
                    (false, n) => n - 1,
                };
                *out = *count > 0;
            }
        }
        debounced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(row: usize, col: usize) -> Matrix {
        let mut m = [[false; COLUMNS]; ROWS];
        m[row][col] = true;
        m
    }

    #[test]
    fn press_is_immediate() {
        let mut d = Debouncer::default();
        assert!(d.tick(&with(2, 3))[2][3]);
    }

    #[test]
    fn release_waits() {
        let mut d = Debouncer::default();
        let released = [[false; COLUMNS]; ROWS];
        d.tick(&with(0, 0));
        for _ in 1..DEBOUNCE_TICKS {
            assert!(d.tick(&released)[0][0]);
        }
        assert!(!d.tick(&released)[0][0]);
    }

    #[test]
    fn chatter_is_one_press() {
        let mut d = Debouncer::default();
        let released = [[false; COLUMNS]; ROWS];
        for raw in [with(1, 1), released, with(1, 1), released, with(1, 1)] {
            assert!(d.tick(&raw)[1][1]);
        }
    }
}
