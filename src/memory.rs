use crate::config::Parameters;
use crate::error::{Error, Result};
use crate::page::PageRecord;
use log::error;
use rand::seq::index;
use rand::Rng;
use std::ops::{Index, IndexMut};

/// The `MemoryStore` struct simulates the two levels of storage a page can live in. `swap` holds
/// one record for every page that can ever be referenced, positioned by page number. `ram` is a
/// much smaller set of frames, each holding a full copy of one record from swap.
///
/// Pages in RAM are always distinct: a reference id is resident in at most one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryStore {
    ram: Vec<PageRecord>,
    swap: Vec<PageRecord>,
}

impl MemoryStore {
    /// Build a fresh store. Every swap slot receives a random payload and aging value, then RAM
    /// is filled by sampling `ram_size` distinct slots from swap without replacement.
    ///
    /// # Arguments
    ///
    /// * `params` - sizes and value ranges of the simulation.
    /// * `rng` - the random source used for payloads, aging values and the RAM sample.
    ///
    pub fn initialize<R: Rng + ?Sized>(params: &Parameters, rng: &mut R) -> Self {
        let swap: Vec<PageRecord> = (0..params.swap_size)
            .map(|page_number| {
                PageRecord::new(
                    page_number,
                    page_number as u32 + 1,
                    rng.gen_range(1..=params.data_max),
                    rng.gen_range(params.aging_min..params.aging_max),
                )
            })
            .collect();
        let ram = index::sample(rng, params.swap_size, params.ram_size)
            .into_iter()
            .map(|slot| swap[slot])
            .collect();

        Self { ram, swap }
    }

    /// Build a store from explicit contents. The caller is responsible for honoring the
    /// `swap[k].page_number == k` invariant.
    pub fn from_parts(ram: Vec<PageRecord>, swap: Vec<PageRecord>) -> Self {
        Self { ram, swap }
    }

    pub fn ram(&self) -> &[PageRecord] {
        &self.ram
    }

    pub fn ram_mut(&mut self) -> &mut [PageRecord] {
        &mut self.ram
    }

    pub fn swap(&self) -> &[PageRecord] {
        &self.swap
    }

    /// Search RAM for the frame holding the requested reference. A `None` value implies a page
    /// fault.
    pub fn find_frame_by_reference(&self, reference_id: u32) -> Option<usize> {
        self.ram
            .iter()
            .position(|frame| frame.reference_id == reference_id)
    }

    /// Search swap for the slot holding the requested reference.
    ///
    /// # Errors
    ///
    /// Every reference is expected to live in swap. `Error::ReferenceNotFound` is returned
    /// otherwise, and the run that asked for it should not continue.
    pub fn find_swap_slot(&self, reference_id: u32) -> Result<usize> {
        match self
            .swap
            .iter()
            .position(|page| page.reference_id == reference_id)
        {
            Some(slot) => Ok(slot),
            None => {
                error!("critical: reference {} not found in swap", reference_id);
                Err(Error::ReferenceNotFound { reference_id })
            }
        }
    }

    /// Copy a modified frame's data back into its swap slot and clear the slot's modified bit.
    /// Clean frames are left alone. Returns whether anything was written.
    pub fn write_back(&mut self, frame_index: usize) -> bool {
        let frame = &self.ram[frame_index];
        if !frame.modified {
            return false;
        }
        match self.swap.get_mut(frame.page_number) {
            Some(slot) => {
                slot.data = frame.data;
                slot.modified = false;
                true
            }
            None => false,
        }
    }

    /// Copy a full record from swap into a frame. A freshly loaded page is clean and recently
    /// used.
    pub fn load_into(&mut self, frame_index: usize, swap_index: usize) {
        let frame = &mut self.ram[frame_index];
        *frame = self.swap[swap_index];
        frame.referenced = true;
        frame.modified = false;
    }

    /// Clear the reference bit of every frame in RAM.
    pub fn clear_reference_bits(&mut self) {
        self.ram.iter_mut().for_each(|frame| frame.referenced = false);
    }
}

impl Index<usize> for MemoryStore {
    type Output = PageRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.ram[index]
    }
}

impl IndexMut<usize> for MemoryStore {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.ram[index]
    }
}
