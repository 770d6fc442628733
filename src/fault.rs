use crate::error::Result;
use crate::memory::MemoryStore;
use crate::page::PageRecord;
use crate::policy::{PageEvent, VictimSelector};
use log::debug;
use rand::RngCore;

/// The `Fault` struct records what happened while servicing one page fault.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fault {
    /// The frame that now holds the requested page.
    pub frame: usize,
    /// The page that occupied the frame before the fault.
    pub evicted: PageRecord,
    pub written_back: bool,
}

/// Service a page fault for `reference_id`: pick a victim frame, write it back to swap when it is
/// dirty, then load the requested page into the freed frame.
///
/// # Arguments
///
/// * `store` - the RAM and swap of the current run.
/// * `selector` - the replacement policy picking the victim.
/// * `reference_id` - the reference that missed.
/// * `time` - logical time of the instruction, handed to the selector once the page is loaded.
/// * `rng` - random source for policies that draw.
///
/// # Errors
///
/// `Error::ReferenceNotFound` is returned when the reference has no slot in swap. The victim has
/// been written back by then, but the frame still holds the old page.
pub fn handle<S: VictimSelector + ?Sized>(
    store: &mut MemoryStore,
    selector: &mut S,
    reference_id: u32,
    time: u64,
    rng: &mut dyn RngCore,
) -> Result<Fault> {
    let victim = selector.select(store.ram_mut(), rng);
    let evicted = store[victim];
    let written_back = store.write_back(victim);
    let swap_index = store.find_swap_slot(reference_id)?;
    store.load_into(victim, swap_index);
    selector.page_event(PageEvent::Loaded {
        frame: victim,
        time,
    });

    debug!(
        "fault on reference {}: frame {} evicted page {} (written back: {})",
        reference_id, victim, evicted.page_number, written_back
    );

    Ok(Fault {
        frame: victim,
        evicted,
        written_back,
    })
}
