use crate::page::PageRecord;
use crate::simulation::RunReport;
use crate::tracker::Tracker;
use std::fmt;

// Tables longer than this are cut down to their first and last `TABLE_EDGE_ROWS` rows.
const TABLE_TRUNCATE_ROWS: usize = 20;
const TABLE_EDGE_ROWS: usize = 10;
const TABLE_RULE: &str = "--------------------------------------------------";

/// A printable dump of RAM or swap. Columns are the page number (N), reference id (I), data
/// (D), reference bit (R), modified bit (M) and aging timestamp (T).
pub struct Table<'a> {
    title: String,
    rows: &'a [PageRecord],
    row_prefix: char,
    truncate: bool,
}

impl<'a> Table<'a> {
    /// A table of RAM frames, rows labelled `F0`, `F1`, ...
    pub fn ram(title: impl Into<String>, rows: &'a [PageRecord]) -> Self {
        Self {
            title: title.into(),
            rows,
            row_prefix: 'F',
            truncate: false,
        }
    }

    /// A table of swap slots, rows labelled `L0`, `L1`, ...
    pub fn swap(title: impl Into<String>, rows: &'a [PageRecord], truncate: bool) -> Self {
        Self {
            title: title.into(),
            rows,
            row_prefix: 'L',
            truncate,
        }
    }

    fn write_row(&self, f: &mut fmt::Formatter<'_>, index: usize) -> fmt::Result {
        let page = &self.rows[index];
        writeln!(
            f,
            "{:<6} {:<5} {:<5} {:<5} {:<5} {:<5} {:<5}",
            format!("{}{}", self.row_prefix, index),
            page.page_number,
            page.reference_id,
            page.data,
            page.referenced as u8,
            page.modified as u8,
            page.aging_timestamp,
        )
    }
}

impl fmt::Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n{}:", self.title)?;
        writeln!(
            f,
            "{:<6} {:<5} {:<5} {:<5} {:<5} {:<5} {:<5}",
            "", "N", "I", "D", "R", "M", "T"
        )?;
        writeln!(f, "{}", TABLE_RULE)?;

        let len = self.rows.len();
        if self.truncate && len > TABLE_TRUNCATE_ROWS {
            for index in 0..TABLE_EDGE_ROWS {
                self.write_row(f, index)?;
            }
            writeln!(f, "... (hiding {} rows) ...", len - 2 * TABLE_EDGE_ROWS)?;
            for index in len - TABLE_EDGE_ROWS..len {
                self.write_row(f, index)?;
            }
        } else {
            for index in 0..len {
                self.write_row(f, index)?;
            }
        }
        write!(f, "{}", TABLE_RULE)
    }
}

/// Side by side comparison of every algorithm that ran.
pub struct Summary<'a>(pub &'a [RunReport]);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nSummary")?;
        writeln!(
            f,
            "{:<10} {:>8} {:>8} {:>8} {:>12}",
            "algorithm", "faults", "hits", "flushes", "fault ratio"
        )?;
        writeln!(f, "{}", TABLE_RULE)?;
        let mut total = Tracker::new();
        for report in self.0 {
            write_summary_row(f, &report.algorithm.to_string(), &report.tracker)?;
            total += report.tracker;
        }
        writeln!(f, "{}", TABLE_RULE)?;
        write_summary_row(f, "total", &total)
    }
}

fn write_summary_row(f: &mut fmt::Formatter<'_>, name: &str, tracker: &Tracker) -> fmt::Result {
    writeln!(
        f,
        "{:<10} {:>8} {:>8} {:>8} {:>12.06}",
        name,
        tracker.page_faults,
        tracker.page_hits,
        tracker.write_backs,
        tracker.fault_ratio(),
    )
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::memory::MemoryStore;
    use crate::policy::Algorithm;

    fn make_rows(count: usize) -> Vec<PageRecord> {
        (0..count)
            .map(|n| PageRecord::new(n, n as u32 + 1, 7, 300))
            .collect()
    }

    #[cfg(test)]
    mod table_tests {

        use super::*;

        #[test]
        fn ram_lists_every_frame() {
            let rows = make_rows(10);
            let out = Table::ram("RAM", &rows).to_string();
            assert!(out.contains("RAM:"));
            assert!(out.contains("F0"));
            assert!(out.contains("F9"));
            assert!(!out.contains("hiding"));
        }

        #[test]
        fn long_swap_is_truncated() {
            let rows = make_rows(100);
            let out = Table::swap("SWAP", &rows, true).to_string();
            assert!(out.contains("L9 "));
            assert!(!out.contains("L10 "));
            assert!(out.contains("hiding 80 rows"));
            assert!(out.contains("L99"));
        }

        #[test]
        fn full_swap_lists_everything() {
            let rows = make_rows(100);
            let out = Table::swap("SWAP", &rows, false).to_string();
            assert!(out.contains("L50 "));
            assert!(!out.contains("hiding"));
        }
    }

    #[cfg(test)]
    mod summary_tests {

        use super::*;

        #[test]
        fn one_line_per_algorithm() {
            let store = MemoryStore::from_parts(make_rows(2), make_rows(4));
            let reports: Vec<RunReport> = [Algorithm::Nru, Algorithm::WsClock]
                .into_iter()
                .map(|algorithm| RunReport {
                    algorithm,
                    tracker: Tracker {
                        references: 10,
                        page_faults: 4,
                        page_hits: 6,
                        ..Tracker::new()
                    },
                    store: store.clone(),
                })
                .collect();
            let out = Summary(&reports).to_string();
            assert!(out.contains("NRU"));
            assert!(out.contains("WS-CLOCK"));
            assert!(out.contains("0.400000"));
            assert!(out.contains("total"));
            assert!(out.contains("       8 "));
        }
    }
}
