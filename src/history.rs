use image::RgbImage;

/// A processed frame together with its selection flags
#[derive(Clone)]
pub struct FrameRecord {
    pub frame: RgbImage,
    /// The object was detected in this frame
    pub is_hit: bool,
    /// Shown during playback even without a hit; only ever set, never cleared
    pub retain: bool,
}

impl FrameRecord {
    pub fn new(frame: RgbImage, is_hit: bool) -> Self {
        Self {
            frame,
            is_hit,
            retain: false,
        }
    }

    /// Whether playback shows this frame
    pub fn is_selected(&self) -> bool {
        self.is_hit || self.retain
    }
}

/// Every processed frame in capture order
#[derive(Default)]
pub struct FrameRecordStore {
    records: Vec<FrameRecord>,
}

impl FrameRecordStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Append a frame record
    pub fn push(&mut self, record: FrameRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[FrameRecord] {
        &self.records
    }

    /// Hit flags in capture order
    pub fn hits(&self) -> Vec<bool> {
        self.records.iter().map(|r| r.is_hit).collect()
    }

    /// Retain flags in capture order
    pub fn retained(&self) -> Vec<bool> {
        self.records.iter().map(|r| r.retain).collect()
    }

    /// Sets the retain flag of one record; out of range indices are ignored
    pub fn mark_retained(&mut self, index: usize) {
        if let Some(record) = self.records.get_mut(index) {
            record.retain = true;
        }
    }

    /// Get the number of records in the store
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
