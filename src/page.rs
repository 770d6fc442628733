/// The `PageRecord` struct is the simplest element of the simulation. One record exists in swap
/// for every page that can ever be referenced, and a frame in RAM holds a full copy of one of
/// them while the page is resident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRecord {
    /// Position of the page in swap. Never reassigned.
    pub page_number: usize,
    /// The "instruction" key matched against the reference stream.
    pub reference_id: u32,
    pub data: u32,
    pub referenced: bool,
    pub modified: bool,
    /// Time-to-live sampled once at creation. Only WS-Clock reads it.
    pub aging_timestamp: u32,
}

impl PageRecord {
    /// Create a new, clean and unreferenced page record.
    pub fn new(page_number: usize, reference_id: u32, data: u32, aging_timestamp: u32) -> Self {
        Self {
            page_number,
            reference_id,
            data,
            referenced: false,
            modified: false,
            aging_timestamp,
        }
    }

    /// The NRU class of the page: `2 * R + M`.
    pub fn class(&self) -> usize {
        (self.referenced as usize) * 2 + self.modified as usize
    }
}
