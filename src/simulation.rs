use crate::config::Parameters;
use crate::error::Result;
use crate::fault::{self, Fault};
use crate::memory::MemoryStore;
use crate::policy::{Algorithm, PageEvent, Selector, VictimSelector};
use crate::reference::ReferenceStream;
use crate::tracker::Tracker;
use log::{error, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Policy and write draws use their own generator so the reference stream stays identical across
// algorithms no matter how many draws a policy makes.
const POLICY_SEED_OFFSET: u64 = 1;

/// The final state of one algorithm run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub algorithm: Algorithm,
    pub tracker: Tracker,
    pub store: MemoryStore,
}

/// The `Simulation` struct owns everything one algorithm run touches: its private copy of RAM and
/// swap, the selector with its auxiliary state, the reference stream and the random source. No
/// state is shared between runs.
pub struct Simulation {
    algorithm: Algorithm,
    params: Parameters,
    store: MemoryStore,
    selector: Selector,
    references: ReferenceStream,
    rng: StdRng,
    tracker: Tracker,
}

impl Simulation {
    /// Create a new `Simulation` starting from a copy of `snapshot`.
    ///
    /// # Arguments
    ///
    /// * `params` - simulation parameters.
    /// * `algorithm` - replacement policy to run.
    /// * `snapshot` - initial RAM and swap. It is cloned, never mutated.
    /// * `seed` - seed of the reference stream and of the policy draws.
    ///
    pub fn build(
        params: &Parameters,
        algorithm: Algorithm,
        snapshot: &MemoryStore,
        seed: u64,
    ) -> Self {
        Self {
            algorithm,
            params: params.clone(),
            store: snapshot.clone(),
            selector: Selector::build(algorithm, params),
            references: ReferenceStream::new(seed, params.num_instructions, params.universe),
            rng: StdRng::seed_from_u64(seed.wrapping_add(POLICY_SEED_OFFSET)),
            tracker: Tracker::new(),
        }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Process one instruction at logical time `time`. A hit marks the frame as referenced and
    /// may write to it; a miss is serviced by the fault handler. Every `clear_interval`
    /// instructions all reference bits in RAM are cleared, whatever the algorithm.
    ///
    /// Returns the serviced fault, if any.
    ///
    /// # Errors
    ///
    /// Propagates `Error::ReferenceNotFound` from the fault handler.
    pub fn step(&mut self, time: u64, reference_id: u32) -> Result<Option<Fault>> {
        self.tracker.references += 1;
        let fault = match self.store.find_frame_by_reference(reference_id) {
            Some(index) => {
                self.hit(index, time);
                None
            }
            None => {
                let fault = fault::handle(
                    &mut self.store,
                    &mut self.selector,
                    reference_id,
                    time,
                    &mut self.rng,
                )?;
                self.tracker.page_faults += 1;
                if fault.written_back {
                    self.tracker.write_backs += 1;
                }
                Some(fault)
            }
        };

        if time % self.params.clear_interval as u64 == 0 {
            self.store.clear_reference_bits();
            self.tracker.bit_clears += 1;
        }
        Ok(fault)
    }

    fn hit(&mut self, index: usize, time: u64) {
        self.tracker.page_hits += 1;
        let frame = &mut self.store[index];
        frame.referenced = true;
        if self.rng.gen_bool(self.params.write_probability) {
            frame.data += 1;
            frame.modified = true;
            self.tracker.writes += 1;
        }
        trace!(
            "hit on reference {} in frame {} (modified: {})",
            frame.reference_id,
            index,
            frame.modified
        );
        self.selector
            .page_event(PageEvent::Touched { frame: index, time });
    }

    /// Run the whole reference stream and hand back the final state.
    ///
    /// # Errors
    ///
    /// A reference missing from swap aborts the run; the error is returned to the caller.
    pub fn run(mut self) -> Result<RunReport> {
        info!(
            "{}: running {} references over {} frames",
            self.algorithm, self.params.num_instructions, self.params.ram_size
        );
        let mut time = 0;
        while let Some(reference_id) = self.references.next() {
            time += 1;
            if let Err(e) = self.step(time, reference_id) {
                error!("{}: run aborted at instruction {}: {}", self.algorithm, time, e);
                return Err(e);
            }
        }
        info!("{}: {} page faults", self.algorithm, self.tracker.page_faults);

        Ok(RunReport {
            algorithm: self.algorithm,
            tracker: self.tracker,
            store: self.store,
        })
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::error::Error;
    use crate::page::PageRecord;
    use std::collections::HashSet;

    const SEED: u64 = 2024;

    fn make_snapshot(params: &Parameters) -> MemoryStore {
        MemoryStore::initialize(params, &mut StdRng::seed_from_u64(SEED))
    }

    fn assert_ram_invariant(store: &MemoryStore, params: &Parameters) {
        assert_eq!(store.ram().len(), params.ram_size);
        let ids: HashSet<u32> = store.ram().iter().map(|f| f.reference_id).collect();
        assert_eq!(ids.len(), params.ram_size);
    }

    #[cfg(test)]
    mod step_tests {

        use super::*;

        #[test]
        fn ram_stays_full_and_distinct() {
            let params = Parameters::default();
            let snapshot = make_snapshot(&params);
            for algorithm in Algorithm::ALL {
                let mut sim = Simulation::build(&params, algorithm, &snapshot, SEED);
                let references: Vec<u32> =
                    ReferenceStream::new(SEED, params.num_instructions, params.universe).collect();
                for (time, reference_id) in references.into_iter().enumerate() {
                    sim.step(time as u64 + 1, reference_id).unwrap();
                    assert_ram_invariant(sim.store(), &params);
                    assert!(sim.store().find_frame_by_reference(reference_id).is_some());
                }
            }
        }

        #[test]
        fn fifo_faults_cycle_round_robin() {
            let params = Parameters::default();
            let snapshot = make_snapshot(&params);
            let mut sim = Simulation::build(&params, Algorithm::Fifo, &snapshot, SEED);
            let references: Vec<u32> =
                ReferenceStream::new(SEED, params.num_instructions, params.universe).collect();

            let mut expected = (0..params.ram_size).cycle();
            for (time, reference_id) in references.into_iter().enumerate() {
                if let Some(fault) = sim.step(time as u64 + 1, reference_id).unwrap() {
                    assert_eq!(Some(fault.frame), expected.next());
                }
            }
        }

        #[test]
        fn hit_marks_referenced() {
            let params = Parameters {
                write_probability: 1.0,
                ..Parameters::default()
            };
            let snapshot = make_snapshot(&params);
            let resident = snapshot.ram()[3];
            let mut sim = Simulation::build(&params, Algorithm::Lru, &snapshot, SEED);

            assert_eq!(sim.step(1, resident.reference_id), Ok(None));
            let frame = sim.store()[3];
            assert!(frame.referenced);
            assert!(frame.modified);
            assert_eq!(frame.data, resident.data + 1);
            assert_eq!(sim.tracker().page_hits, 1);
            assert_eq!(sim.tracker().writes, 1);
        }

        #[test]
        fn hit_without_write_stays_clean() {
            let params = Parameters {
                write_probability: 0.0,
                ..Parameters::default()
            };
            let snapshot = make_snapshot(&params);
            let resident = snapshot.ram()[0];
            let mut sim = Simulation::build(&params, Algorithm::Nru, &snapshot, SEED);

            sim.step(1, resident.reference_id).unwrap();
            assert!(sim.store()[0].referenced);
            assert!(!sim.store()[0].modified);
            assert_eq!(sim.store()[0].data, resident.data);
        }

        #[test]
        fn reference_bits_cleared_on_interval() {
            let params = Parameters::default();
            let snapshot = make_snapshot(&params);
            let resident = snapshot.ram()[0].reference_id;
            let mut sim = Simulation::build(&params, Algorithm::Clock, &snapshot, SEED);

            (1..10).for_each(|time| {
                sim.step(time, resident).unwrap();
            });
            assert!(sim.store()[0].referenced);
            sim.step(10, resident).unwrap();
            assert!(sim.store().ram().iter().all(|f| !f.referenced));
            assert_eq!(sim.tracker().bit_clears, 1);
        }
    }

    #[cfg(test)]
    mod run_tests {

        use super::*;

        #[test]
        fn fifo_is_reproducible() {
            let params = Parameters::default();
            let snapshot = make_snapshot(&params);
            let first = Simulation::build(&params, Algorithm::Fifo, &snapshot, SEED)
                .run()
                .unwrap();
            let second = Simulation::build(&params, Algorithm::Fifo, &snapshot, SEED)
                .run()
                .unwrap();

            assert_eq!(first, second);
            assert!(first.tracker.page_faults <= params.num_instructions);
            assert_eq!(
                first.tracker.page_hits + first.tracker.page_faults,
                params.num_instructions
            );
            assert_eq!(first.tracker.bit_clears, params.num_instructions / 10);
        }

        #[test]
        fn every_algorithm_completes() {
            let params = Parameters::default();
            let snapshot = make_snapshot(&params);
            for algorithm in Algorithm::ALL {
                let report = Simulation::build(&params, algorithm, &snapshot, SEED)
                    .run()
                    .unwrap();
                assert_eq!(report.algorithm, algorithm);
                assert_eq!(report.tracker.references, params.num_instructions);
                assert!(report.tracker.page_faults <= params.num_instructions);
                assert!(report.tracker.write_backs <= report.tracker.page_faults);
                assert_ram_invariant(&report.store, &params);
                report
                    .store
                    .swap()
                    .iter()
                    .enumerate()
                    .for_each(|(k, page)| assert_eq!(page.page_number, k));
            }
        }

        #[test]
        fn snapshot_is_untouched() {
            let params = Parameters::default();
            let snapshot = make_snapshot(&params);
            let copy = snapshot.clone();
            Simulation::build(&params, Algorithm::WsClock, &snapshot, SEED)
                .run()
                .unwrap();
            assert_eq!(snapshot, copy);
        }

        #[test]
        fn missing_reference_aborts() {
            let params = Parameters {
                ram_size: 2,
                swap_size: 3,
                universe: 10,
                ..Parameters::default()
            };
            let swap: Vec<PageRecord> = (0..3)
                .map(|n| PageRecord::new(n, n as u32 + 1, 1, 100))
                .collect();
            let snapshot = MemoryStore::from_parts(vec![swap[0], swap[1]], swap);

            let result = Simulation::build(&params, Algorithm::Fifo, &snapshot, SEED).run();
            assert!(matches!(result, Err(Error::ReferenceNotFound { .. })));
        }
    }
}
