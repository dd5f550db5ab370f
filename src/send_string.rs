//! Injection of literal keystroke sequences (e.g. "Ctrl+B, then 1" for tmux), as a queue of
//! reports which [crate::keyboard] sends one per tick ahead of the physically held keys.

use crate::keycode::{from_ascii, modifier_bit, KeyCode};
use crate::keymap::{key, Key};
use crate::log::{debug, warn};
use crate::report::Report;

/// One step of an injected sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stroke {
    /// Press and release
    Tap(KeyCode),
    /// Press and keep held for the following strokes
    Down(KeyCode),
    Up(KeyCode),
    /// Type one ASCII character, shifting if needed
    Char(u8),
    /// Type each character of some ASCII text
    Text(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueFull;

const QUEUE_CAPACITY: usize = 32;

/// Fixed-capacity FIFO of reports waiting to be sent
pub struct ReportQueue {
    reports: [Report; QUEUE_CAPACITY],
    head: usize,
    len: usize,
}

impl Default for ReportQueue {
    fn default() -> Self {
        ReportQueue { reports: [Report::default(); QUEUE_CAPACITY], head: 0, len: 0 }
    }
}

impl ReportQueue {
    pub fn push(&mut self, report: Report) -> Result<(), QueueFull> {
        if self.len == QUEUE_CAPACITY {
            return Err(QueueFull);
        }
        self.reports[(self.head + self.len) % QUEUE_CAPACITY] = report;
        self.len += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Report> {
        if self.len == 0 {
            return None;
        }
        let report = self.reports[self.head];
        self.head = (self.head + 1) % QUEUE_CAPACITY;
        self.len -= 1;
        Some(report)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Turns `strokes` into reports on the end of `queue`. Anything left held at the end is released.
///
/// Fails when the queue fills up, in which case the sequence is cut short but still ends with an
/// all-released report if there was room for one.
pub fn expand(strokes: &[Stroke], queue: &mut ReportQueue) -> Result<(), QueueFull> {
    let mut held = Report::default();
    let result = strokes.iter().try_for_each(|stroke| expand_one(*stroke, &mut held, queue));
    if !held.is_empty() || result.is_err() {
        queue.push(Report::default()).ok();
    }
    if result.is_err() {
        warn!("keystroke queue full, sequence truncated");
    }
    result
}

fn expand_one(stroke: Stroke, held: &mut Report, queue: &mut ReportQueue) -> Result<(), QueueFull> {
    match stroke {
        Stroke::Tap(code) => tap(*held, key(code), queue),
        Stroke::Down(code) => {
            held.press(key(code));
            queue.push(*held)
        }
        Stroke::Up(code) => {
            held.release(key(code));
            queue.push(*held)
        }
        Stroke::Char(c) => type_char(c, *held, queue),
        Stroke::Text(text) => text.bytes().try_for_each(|c| type_char(c, *held, queue)),
    }
}

fn type_char(c: u8, held: Report, queue: &mut ReportQueue) -> Result<(), QueueFull> {
    match from_ascii(c) {
        Some((code, shifted)) => {
            let mods = if shifted { modifier_bit(KeyCode::LShift) } else { 0 };
            tap(held, (code as u8, mods), queue)
        }
        None => {
            debug!("no key types character {=u8}", c);
            Ok(())
        }
    }
}

fn tap(held: Report, k: Key, queue: &mut ReportQueue) -> Result<(), QueueFull> {
    let mut pressed = held;
    pressed.press(k);
    queue.push(pressed)?;
    queue.push(held)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(queue: &mut ReportQueue) -> Vec<Report> {
        core::iter::from_fn(|| queue.pop()).collect()
    }

    fn r(modifier: u8, code: u8) -> Report {
        let mut report = Report { modifier, ..Default::default() };
        report.keycodes[0] = code;
        report
    }

    #[test]
    fn tap_is_press_then_release() {
        let mut queue = ReportQueue::default();
        expand(&[Stroke::Tap(KeyCode::CapsLock)], &mut queue).unwrap();
        assert_eq!(drain(&mut queue), vec![r(0, KeyCode::CapsLock as u8), r(0, 0)]);
    }

    #[test]
    fn ctrl_b_then_digit() {
        let mut queue = ReportQueue::default();
        let strokes = [
            Stroke::Down(KeyCode::LCtrl),
            Stroke::Text("b"),
            Stroke::Up(KeyCode::LCtrl),
            Stroke::Char(b'3'),
        ];
        expand(&strokes, &mut queue).unwrap();
        assert_eq!(
            drain(&mut queue),
            vec![
                r(0x01, 0),
                r(0x01, KeyCode::B as u8),
                r(0x01, 0),
                r(0, 0),
                r(0, KeyCode::Kc3 as u8),
                r(0, 0),
            ]
        );
    }

    #[test]
    fn shifted_characters() {
        let mut queue = ReportQueue::default();
        expand(&[Stroke::Text("A|")], &mut queue).unwrap();
        assert_eq!(
            drain(&mut queue),
            vec![
                r(0x02, KeyCode::A as u8),
                r(0, 0),
                r(0x02, KeyCode::Backslash as u8),
                r(0, 0),
            ]
        );
    }

    #[test]
    fn unmapped_characters_are_skipped() {
        let mut queue = ReportQueue::default();
        expand(&[Stroke::Text("\x07x")], &mut queue).unwrap();
        assert_eq!(drain(&mut queue), vec![r(0, KeyCode::X as u8), r(0, 0)]);
    }

    #[test]
    fn held_keys_released_at_end() {
        let mut queue = ReportQueue::default();
        expand(&[Stroke::Down(KeyCode::LGui)], &mut queue).unwrap();
        assert_eq!(drain(&mut queue), vec![r(0x08, 0), r(0, 0)]);
    }

    #[test]
    fn overflow_is_reported() {
        let mut queue = ReportQueue::default();
        let text = "abcdefghijklmnopqrstuvwxyz";
        assert_eq!(expand(&[Stroke::Text(text)], &mut queue), Err(QueueFull));
        assert_eq!(queue.len(), QUEUE_CAPACITY);
        assert_eq!(drain(&mut queue).last(), Some(&r(0, 0)));
    }

    #[test]
    fn queue_is_fifo_and_wraps() {
        let mut queue = ReportQueue::default();
        for round in 0..3u8 {
            for code in 0..20u8 {
                queue.push(r(round, code)).unwrap();
            }
            for code in 0..20u8 {
                assert_eq!(queue.pop(), Some(r(round, code)));
            }
        }
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }
}
