use crate::history::{FrameRecord, FrameRecordStore};
use std::collections::VecDeque;
use tracing::debug;

/// A hit directly preceded by another hit
fn is_sustained(hits: &[bool], i: usize) -> bool {
    i >= 1 && hits[i] && hits[i - 1]
}

/// Calls `mark` for every index retained around sustained hits
///
/// Each sustained hit at `i` anchors at `min(i + frame_buffer / 2, last)` and
/// marks `frame_buffer` indices walking back from the anchor, stopping at 0.
/// Overlapping windows are marked again.
pub fn for_each_retained(hits: &[bool], frame_buffer: usize, mut mark: impl FnMut(usize)) {
    let Some(last) = hits.len().checked_sub(1) else {
        return;
    };
    for i in 1..hits.len() {
        if !is_sustained(hits, i) {
            continue;
        }
        let anchor = (i + frame_buffer / 2).min(last);
        for index in (0..=anchor).rev().take(frame_buffer) {
            mark(index);
        }
    }
}

/// Retain flags computed with repeated backward scans
pub fn retained_flags(hits: &[bool], frame_buffer: usize) -> Vec<bool> {
    let mut flags = vec![false; hits.len()];
    for_each_retained(hits, frame_buffer, |i| flags[i] = true);
    flags
}

/// Same flags as [`retained_flags`] in one linear pass
///
/// Walks backward from the last index; every anchor restarts a countdown of
/// `frame_buffer` frames still to retain.
pub fn retained_flags_linear(hits: &[bool], frame_buffer: usize) -> Vec<bool> {
    let n = hits.len();
    let mut flags = vec![false; n];
    if n == 0 || frame_buffer == 0 {
        return flags;
    }
    let half = frame_buffer / 2;
    let last = n - 1;
    let mut remaining = 0;
    for j in (0..n).rev() {
        let anchored = if j == last {
            // every sustained hit within `half` of the end clamps onto the last index
            (last.saturating_sub(half)..=last).any(|i| is_sustained(hits, i))
        } else {
            j >= half && is_sustained(hits, j - half)
        };
        if anchored {
            remaining = frame_buffer;
        }
        if remaining > 0 {
            flags[j] = true;
            remaining -= 1;
        }
    }
    flags
}

/// Marks retained records of a finished store
///
/// Uses the linear pass; debug builds cross-check it against the backward scans.
pub fn select_retained(store: &mut FrameRecordStore, frame_buffer: usize) {
    let hits = store.hits();
    let flags = retained_flags_linear(&hits, frame_buffer);
    debug_assert_eq!(flags, retained_flags(&hits, frame_buffer));
    for (i, retain) in flags.into_iter().enumerate() {
        if retain {
            store.mark_retained(i);
        }
    }
    debug!(
        "retention: {} frames, {} retained",
        store.len(),
        store.retained().into_iter().filter(|&r| r).count()
    );
}

/// Retention over a sliding window of `frame_buffer` records
///
/// Produces the same selection as [`select_retained`] without keeping the
/// whole stream: a record leaves the window once no later frame can change
/// its retain flag, which is at most `frame_buffer` frames after capture.
pub struct StreamingSelector {
    window: VecDeque<FrameRecord>,
    frame_buffer: usize,
    /// Capture index of the next pushed record
    next_index: usize,
    previous_hit: bool,
    /// Largest unclamped anchor seen so far
    furthest_anchor: Option<usize>,
}

impl StreamingSelector {
    pub fn new(frame_buffer: usize) -> Self {
        Self {
            window: VecDeque::with_capacity(frame_buffer + 1),
            frame_buffer,
            next_index: 0,
            previous_hit: false,
            furthest_anchor: None,
        }
    }

    /// Capture index of the oldest record still in the window
    fn front_index(&self) -> usize {
        self.next_index - self.window.len()
    }

    /// Marks capture indices `from..=to` that are still in the window
    fn mark_range(&mut self, from: usize, to: usize) {
        let front = self.front_index();
        for index in from.max(front)..=to {
            if let Some(record) = self.window.get_mut(index - front) {
                record.retain = true;
            }
        }
    }

    /// Adds a record; returns the record leaving the window if it is selected
    pub fn push(&mut self, record: FrameRecord) -> Option<FrameRecord> {
        let index = self.next_index;
        let is_hit = record.is_hit;
        self.window.push_back(record);
        self.next_index += 1;

        if self.furthest_anchor.is_some_and(|anchor| anchor >= index) {
            self.mark_range(index, index);
        }

        if self.frame_buffer > 0 && is_hit && self.previous_hit {
            let anchor = index + self.frame_buffer / 2;
            let start = (anchor + 1).saturating_sub(self.frame_buffer);
            self.mark_range(start, index);
            self.furthest_anchor = Some(self.furthest_anchor.map_or(anchor, |a| a.max(anchor)));
        }
        self.previous_hit = is_hit;

        if self.window.len() > self.frame_buffer {
            return self.window.pop_front().filter(FrameRecord::is_selected);
        }
        None
    }

    /// Ends the stream and returns the selected records still buffered
    pub fn finish(mut self) -> Vec<FrameRecord> {
        if let Some(last) = self.next_index.checked_sub(1) {
            if self.furthest_anchor.is_some_and(|anchor| anchor > last) {
                let start = (last + 1).saturating_sub(self.frame_buffer);
                self.mark_range(start, last);
            }
        }
        self.window.into_iter().filter(FrameRecord::is_selected).collect()
    }

    /// Records currently held back
    pub fn buffered(&self) -> usize {
        self.window.len()
    }
}
