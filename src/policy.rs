use crate::config::Parameters;
use crate::page::PageRecord;
use clap::ValueEnum;
use linked_hash_map::LinkedHashMap;
use log::trace;
use rand::{Rng, RngCore};
use std::fmt;

/// The page replacement algorithms the simulator knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Algorithm {
    /// Not recently used.
    #[value(name = "nru")]
    Nru,
    #[value(name = "fifo")]
    Fifo,
    /// FIFO with second chance.
    #[value(name = "fifo-sc")]
    FifoSecondChance,
    #[value(name = "relogio", alias = "clock")]
    Clock,
    /// Least recently used.
    #[value(name = "lru")]
    Lru,
    /// Working set clock.
    #[value(name = "ws-clock")]
    WsClock,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Nru,
        Algorithm::Fifo,
        Algorithm::FifoSecondChance,
        Algorithm::Clock,
        Algorithm::Lru,
        Algorithm::WsClock,
    ];
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Nru => "NRU",
            Algorithm::Fifo => "FIFO",
            Algorithm::FifoSecondChance => "FIFO-SC",
            Algorithm::Clock => "RELOGIO",
            Algorithm::Lru => "LRU",
            Algorithm::WsClock => "WS-CLOCK",
        };
        write!(f, "{}", name)
    }
}

/// Things that happen to a frame which a selector may want to remember. `time` is the logical
/// instruction counter of the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    Touched { frame: usize, time: u64 },
    Loaded { frame: usize, time: u64 },
}

/// The contract every replacement policy honors.
///
/// `select` is only called with a full RAM and must return a valid frame index. It may clear
/// the reference bits of frames it passes over, but it never touches anything else in RAM.
pub trait VictimSelector {
    fn page_event(&mut self, _event: PageEvent) {}

    fn select(&mut self, ram: &mut [PageRecord], rng: &mut dyn RngCore) -> usize;
}

/// Pick a random frame from the lowest non-empty `(R, M)` class.
#[derive(Debug, Default)]
pub struct Nru;

impl VictimSelector for Nru {
    fn select(&mut self, ram: &mut [PageRecord], rng: &mut dyn RngCore) -> usize {
        let mut classes: [Vec<usize>; 4] = Default::default();
        ram.iter()
            .enumerate()
            .for_each(|(index, frame)| classes[frame.class()].push(index));

        match classes.iter().find(|class| !class.is_empty()) {
            Some(class) => class[rng.gen_range(0..class.len())],
            None => 0,
        }
    }
}

/// Evict frames in strict round-robin order, regardless of their bits.
#[derive(Debug)]
pub struct Fifo {
    pointer: usize,
    size: usize,
}

impl Fifo {
    pub fn new(size: usize) -> Self {
        Self { pointer: 0, size }
    }
}

impl VictimSelector for Fifo {
    fn select(&mut self, _ram: &mut [PageRecord], _rng: &mut dyn RngCore) -> usize {
        let victim = self.pointer;
        self.pointer = (self.pointer + 1) % self.size;
        victim
    }
}

/// The `FifoSecondChance` struct keeps frames in load order. A referenced frame at the head of
/// the queue loses its bit and goes to the back; the first unreferenced head is the victim.
///
/// The victim leaves the queue on selection and is queued again once the new page is loaded.
#[derive(Debug)]
pub struct FifoSecondChance {
    queue: LinkedHashMap<usize, usize>,
}

impl FifoSecondChance {
    pub fn new(size: usize) -> Self {
        let mut queue = LinkedHashMap::with_capacity(size);
        (0..size).for_each(|index| {
            queue.insert(index, index);
        });
        Self { queue }
    }
}

impl VictimSelector for FifoSecondChance {
    fn page_event(&mut self, event: PageEvent) {
        if let PageEvent::Loaded { frame, .. } = event {
            self.queue.insert(frame, frame);
        }
    }

    fn select(&mut self, ram: &mut [PageRecord], _rng: &mut dyn RngCore) -> usize {
        loop {
            let (candidate, _) = self.queue.pop_front().expect("should have victims");
            if !ram[candidate].referenced {
                return candidate;
            }
            trace!("fifo-sc: second chance for frame {}", candidate);
            ram[candidate].referenced = false;
            self.queue.insert(candidate, candidate);
        }
    }
}

/// A single hand sweeping the frames. Referenced frames lose their bit as the hand passes; the
/// first unreferenced one is evicted and the hand stops just past it.
#[derive(Debug, Default)]
pub struct Clock {
    hand: usize,
}

impl VictimSelector for Clock {
    fn select(&mut self, ram: &mut [PageRecord], _rng: &mut dyn RngCore) -> usize {
        let size = ram.len();
        loop {
            let current = self.hand;
            self.hand = (self.hand + 1) % size;
            if !ram[current].referenced {
                return current;
            }
            ram[current].referenced = false;
        }
    }
}

/// Evict the frame with the oldest access time. Ties go to the lowest index.
#[derive(Debug)]
pub struct Lru {
    timestamps: Vec<u64>,
}

impl Lru {
    pub fn new(size: usize) -> Self {
        Self {
            timestamps: vec![0; size],
        }
    }

    pub fn timestamps(&self) -> &[u64] {
        &self.timestamps
    }
}

impl VictimSelector for Lru {
    fn page_event(&mut self, event: PageEvent) {
        match event {
            PageEvent::Touched { frame, time } | PageEvent::Loaded { frame, time } => {
                self.timestamps[frame] = time
            }
        }
    }

    fn select(&mut self, _ram: &mut [PageRecord], _rng: &mut dyn RngCore) -> usize {
        self.timestamps
            .iter()
            .enumerate()
            .min_by_key(|(index, time)| (**time, *index))
            .map(|(index, _)| index)
            .unwrap_or(0)
    }
}

/// The `WsClock` struct sweeps frames like `Clock`, but an unreferenced frame is only evicted
/// when a freshly sampled elapsed time exceeds its aging timestamp. Clean candidates win at once,
/// the first dirty candidate is kept in reserve.
///
/// The sweep is bounded to two revolutions. Without a candidate by then, the selector falls back
/// to a full pass looking for a clean unreferenced frame, then to a pass that behaves like
/// `Clock`, and finally to the frame under the hand.
#[derive(Debug)]
pub struct WsClock {
    hand: usize,
    aging_min: u32,
    aging_max: u32,
}

impl WsClock {
    pub fn new(aging_min: u32, aging_max: u32) -> Self {
        Self {
            hand: 0,
            aging_min,
            aging_max,
        }
    }

    fn sweep(&mut self, ram: &mut [PageRecord], rng: &mut dyn RngCore) -> Option<usize> {
        let size = ram.len();
        let mut hand = self.hand;
        let mut dirty = None;

        for _ in 0..size * 2 {
            let frame = &mut ram[hand];
            if frame.referenced {
                frame.referenced = false;
            } else {
                let elapsed = rng.gen_range(self.aging_min..self.aging_max);
                if elapsed > frame.aging_timestamp {
                    if !frame.modified {
                        return Some(hand);
                    }
                    dirty.get_or_insert(hand);
                }
            }
            hand = (hand + 1) % size;
        }
        dirty
    }

    fn fallback(&self, ram: &mut [PageRecord]) -> usize {
        let size = ram.len();
        let start = self.hand;
        let ring = || (0..size).map(move |step| (start + step) % size);

        if let Some(clean) = ring().find(|&index| ram[index].class() == 0) {
            return clean;
        }
        for index in ring() {
            if !ram[index].referenced {
                return index;
            }
            ram[index].referenced = false;
        }
        start
    }
}

impl VictimSelector for WsClock {
    fn select(&mut self, ram: &mut [PageRecord], rng: &mut dyn RngCore) -> usize {
        let size = ram.len();
        self.hand %= size;
        let victim = match self.sweep(ram, rng) {
            Some(victim) => victim,
            None => {
                trace!("ws-clock: probe budget exhausted, falling back");
                self.fallback(ram)
            }
        };
        self.hand = (victim + 1) % size;
        victim
    }
}

/// A closed set of the selectors, one per `Algorithm`, each owning its auxiliary state.
#[derive(Debug)]
pub enum Selector {
    Nru(Nru),
    Fifo(Fifo),
    FifoSecondChance(FifoSecondChance),
    Clock(Clock),
    Lru(Lru),
    WsClock(WsClock),
}

impl Selector {
    /// Create a selector with fresh auxiliary state for the given algorithm.
    pub fn build(algorithm: Algorithm, params: &Parameters) -> Self {
        match algorithm {
            Algorithm::Nru => Selector::Nru(Nru),
            Algorithm::Fifo => Selector::Fifo(Fifo::new(params.ram_size)),
            Algorithm::FifoSecondChance => {
                Selector::FifoSecondChance(FifoSecondChance::new(params.ram_size))
            }
            Algorithm::Clock => Selector::Clock(Clock::default()),
            Algorithm::Lru => Selector::Lru(Lru::new(params.ram_size)),
            Algorithm::WsClock => {
                Selector::WsClock(WsClock::new(params.aging_min, params.aging_max))
            }
        }
    }

    fn inner(&mut self) -> &mut dyn VictimSelector {
        match self {
            Selector::Nru(s) => s,
            Selector::Fifo(s) => s,
            Selector::FifoSecondChance(s) => s,
            Selector::Clock(s) => s,
            Selector::Lru(s) => s,
            Selector::WsClock(s) => s,
        }
    }
}

impl VictimSelector for Selector {
    fn page_event(&mut self, event: PageEvent) {
        self.inner().page_event(event)
    }

    fn select(&mut self, ram: &mut [PageRecord], rng: &mut dyn RngCore) -> usize {
        self.inner().select(ram, rng)
    }
}
