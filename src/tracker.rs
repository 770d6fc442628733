use std::ops::{Add, AddAssign};

/// The `Tracker` struct is a simple collection of named performance data counters used for
/// collecting data points on one simulation run. The data collected is used to compare the
/// replacement algorithms against each other.
#[derive(Debug, PartialEq, Copy, Clone, Default)]
pub struct Tracker {
    pub references: usize,
    pub page_hits: usize,
    pub page_faults: usize,
    pub writes: usize,
    pub write_backs: usize,
    pub bit_clears: usize,
}

impl Tracker {
    /// Create a new instance of the `Tracker` struct with all counters initialized to zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fault_ratio(&self) -> f64 {
        match self.references {
            0 => 0.0,
            n => self.page_faults as f64 / n as f64,
        }
    }
}

impl Add<Tracker> for Tracker {
    type Output = Tracker;

    fn add(self, rhs: Tracker) -> Self::Output {
        Self::Output {
            references: self.references + rhs.references,
            page_hits: self.page_hits + rhs.page_hits,
            page_faults: self.page_faults + rhs.page_faults,
            writes: self.writes + rhs.writes,
            write_backs: self.write_backs + rhs.write_backs,
            bit_clears: self.bit_clears + rhs.bit_clears,
        }
    }
}

impl AddAssign for Tracker {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.add(rhs)
    }
}

impl std::fmt::Display for Tracker {
    /// Display format specification for the `Tracker` struct implemented to simplify the process
    /// of outputting statistics to the terminal.
    ///
    /// # Arguments
    ///
    /// * `f` - A mutable reference to a standard library formatter instance. For most use cases,
    /// this is provided automatically as this method is not meant to be called directly.
    ///
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "
Stats Tracked
---------------------------------
references:               {:08}
page_hits:                {:08}
page_faults:              {:08}
writes:                   {:08}
write_backs:              {:08}
bit_clears:               {:08}

page fault ratio:         {:.06}
",
            self.references,
            self.page_hits,
            self.page_faults,
            self.writes,
            self.write_backs,
            self.bit_clears,
            self.fault_ratio(),
        )
    }
}
