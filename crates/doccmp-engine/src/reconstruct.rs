//! Table recovery from plain text.
//!
//! When the extraction backend produced no structured tables, rows are
//! recovered line by line: a line that splits into at least two cells is a
//! row, and consecutive rows of roughly the same width are grouped into one
//! table. This is a row-grouping heuristic, not a layout analysis; it works
//! whether or not the extractor preserved column alignment.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use doccmp_types::{DocumentRecord, ModelResult, Row, Table};

/// Column gaps: a run of two or more whitespace characters, or a lone tab.
/// The run comes first so a tab followed by spaces is one gap.
static COLUMN_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}|\t").expect("column gap pattern is valid"));

/// Number of recently accepted rows whose modal width constrains the next.
const WIDTH_HISTORY: usize = 3;
/// Maximum deviation from the modal width for a row to join the open table.
const WIDTH_TOLERANCE: usize = 1;
/// Tables with fewer rows are discarded.
const MIN_TABLE_ROWS: usize = 2;

/// Effective tables of a document.
#[derive(Clone, Debug, PartialEq)]
pub struct Reconstruction {
    pub tables: Vec<Table>,
    /// `true` if the tables were recovered from text rather than taken from
    /// the record. The caller decides whether to persist them.
    pub reconstructed: bool,
}

/// Return the document's tables, recovering them from its text when the
/// record holds none and the text is not blank.
///
/// The record is never modified; see [`DocumentRecord::with_tables`].
pub fn reconstruct_tables_if_needed(document: &DocumentRecord) -> ModelResult<Reconstruction> {
    let tables = document.tables()?;
    let text = document.extracted_text()?;

    if !tables.is_empty() || text.trim().is_empty() {
        return Ok(Reconstruction {
            tables,
            reconstructed: false,
        });
    }

    let recovered = reconstruct_tables(text);
    debug!(
        document = %document.id(),
        recovered = recovered.len(),
        "recovered tables from extracted text"
    );

    Ok(Reconstruction {
        tables: merge_reconstructed(tables, recovered),
        reconstructed: true,
    })
}

/// Recover tables from a text blob. Every returned table has at least two
/// rows.
pub fn reconstruct_tables(text: &str) -> Vec<Table> {
    let mut scanner = Scanner::default();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        scanner.feed(as_row(line));
    }
    scanner.finish()
}

/// Append recovered tables to `existing`, skipping any whose header already
/// appears there (trimmed, case-insensitive).
pub fn merge_reconstructed(mut existing: Vec<Table>, reconstructed: Vec<Table>) -> Vec<Table> {
    let known: HashSet<Vec<String>> = existing.iter().map(Table::header).collect();
    existing.extend(
        reconstructed
            .into_iter()
            .filter(|table| !known.contains(&table.header())),
    );
    existing
}

/// Split a line into cells, trying each splitter in turn until one yields at
/// least two cells.
pub fn split_cells(line: &str) -> Vec<String> {
    let line = line.trim();

    let gapped: Vec<String> = COLUMN_GAP.split(line).map(|c| c.trim().to_string()).collect();
    if gapped.len() >= 2 {
        return gapped;
    }

    let spaced: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    if spaced.len() >= 2 {
        return spaced;
    }

    if line.contains(',') {
        return line.split(',').map(|c| c.trim().to_string()).collect();
    }

    vec![line.to_string()]
}

/// The line's cells, if it qualifies as a table row.
fn as_row(line: &str) -> Option<Row> {
    let cells = split_cells(line);
    let qualifies = cells.len() >= 2 && cells.iter().any(|c| !c.trim().is_empty());
    qualifies.then_some(cells)
}

/// Most frequent width; ties go to the wider one.
fn modal_width(widths: &VecDeque<usize>) -> usize {
    let mut freq = BTreeMap::new();
    for &w in widths {
        *freq.entry(w).or_insert(0_usize) += 1;
    }
    freq.into_iter()
        .max_by_key(|&(width, count)| (count, width))
        .map_or(0, |(width, _)| width)
}

/// A table being accumulated by the scanner.
#[derive(Debug)]
struct OpenTable {
    rows: Vec<Row>,
    recent_widths: VecDeque<usize>,
}

impl OpenTable {
    fn start(row: Row) -> Self {
        let mut table = Self {
            rows: Vec::new(),
            recent_widths: VecDeque::with_capacity(WIDTH_HISTORY + 1),
        };
        table.push(row);
        table
    }

    fn accepts(&self, row: &Row) -> bool {
        modal_width(&self.recent_widths).abs_diff(row.len()) <= WIDTH_TOLERANCE
    }

    fn push(&mut self, row: Row) {
        self.recent_widths.push_back(row.len());
        if self.recent_widths.len() > WIDTH_HISTORY {
            self.recent_widths.pop_front();
        }
        self.rows.push(row);
    }

    fn close(self) -> Option<Table> {
        (self.rows.len() >= MIN_TABLE_ROWS).then(|| Table::new(self.rows))
    }
}

#[derive(Debug, Default)]
enum ScanState {
    #[default]
    Idle,
    Open(OpenTable),
}

/// Line-scan state machine.
///
/// - `Idle` + row: open a table with the row.
/// - `Open` + row within width tolerance: append.
/// - `Open` + row beyond tolerance: close, open a new table with the row.
/// - `Open` + non-row: close, go idle.
#[derive(Debug, Default)]
struct Scanner {
    state: ScanState,
    tables: Vec<Table>,
}

impl Scanner {
    fn feed(&mut self, row: Option<Row>) {
        self.state = match (std::mem::take(&mut self.state), row) {
            (ScanState::Idle, None) => ScanState::Idle,
            (ScanState::Idle, Some(row)) => ScanState::Open(OpenTable::start(row)),
            (ScanState::Open(mut open), Some(row)) if open.accepts(&row) => {
                open.push(row);
                ScanState::Open(open)
            }
            (ScanState::Open(open), Some(row)) => {
                self.close(open);
                ScanState::Open(OpenTable::start(row))
            }
            (ScanState::Open(open), None) => {
                self.close(open);
                ScanState::Idle
            }
        };
    }

    fn close(&mut self, open: OpenTable) {
        self.tables.extend(open.close());
    }

    fn finish(mut self) -> Vec<Table> {
        if let ScanState::Open(open) = std::mem::take(&mut self.state) {
            self.close(open);
        }
        self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn rows(table: &Table) -> Vec<Vec<&str>> {
        table
            .rows()
            .iter()
            .map(|r| r.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn splits_on_wide_gaps_first() {
        assert_eq!(split_cells("Unit Price  Qty\t Total"), vec!["Unit Price", "Qty", "Total"]);
    }

    #[test]
    fn falls_back_to_single_spaces() {
        assert_eq!(split_cells("Bob 30 NYC"), vec!["Bob", "30", "NYC"]);
    }

    #[test]
    fn tab_followed_by_whitespace_is_one_gap() {
        assert_eq!(split_cells("Name\t  Age"), vec!["Name", "Age"]);
        assert_eq!(split_cells("Name\t\tAge"), vec!["Name", "Age"]);
        assert_eq!(split_cells("Name\tAge"), vec!["Name", "Age"]);

        let tables = reconstruct_tables("Name\t  Age\nBob\t  30");
        assert_eq!(tables.len(), 1);
        assert_eq!(rows(&tables[0]), vec![vec!["Name", "Age"], vec!["Bob", "30"]]);
    }

    #[test]
    fn falls_back_to_commas() {
        assert_eq!(split_cells("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn single_spaces_win_over_commas() {
        assert_eq!(split_cells("a,b, c"), vec!["a,b,", "c"]);
    }

    #[test]
    fn single_token_is_one_cell() {
        assert_eq!(split_cells("Summary"), vec!["Summary"]);
    }

    #[test]
    fn recovers_aligned_table() {
        let text = "Report\nName    Age   City\nBob     30    NYC\nAlice   25    LA\n\nThe end.";
        let tables = reconstruct_tables(text);
        // Blank lines are skipped, and "The end." splits into two cells,
        // which is within tolerance of the three-column mode.
        assert_eq!(tables.len(), 1);
        assert_eq!(
            rows(&tables[0]),
            vec![
                vec!["Name", "Age", "City"],
                vec!["Bob", "30", "NYC"],
                vec!["Alice", "25", "LA"],
                vec!["The", "end."],
            ]
        );
    }

    #[test]
    fn width_jump_starts_new_table() {
        let text = "a  b\nc  d\n1  2  3  4  5\n6  7  8  9  10";
        let tables = reconstruct_tables(text);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].len(), 2);
        assert_eq!(rows(&tables[1])[0], vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn non_row_line_closes_table() {
        let text = "a  b\nc  d\nHeading\ne  f\ng  h";
        let tables = reconstruct_tables(text);
        assert_eq!(tables.len(), 2);
        assert_eq!(rows(&tables[1]), vec![vec!["e", "f"], vec!["g", "h"]]);
    }

    #[test]
    fn single_row_fragments_are_discarded() {
        let text = "a  b\nHeading\nc  d  e  f  g\nFooter";
        assert!(reconstruct_tables(text).is_empty());
    }

    #[test]
    fn tolerance_follows_recent_widths() {
        // 2, 3, 4 each within 1 of the running mode; 6 is not.
        let text = "a  b\nc  d  e\nf  g  h  i\nj  k  l  m  n  o";
        let tables = reconstruct_tables(text);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].len(), 3);
    }

    #[test]
    fn merge_skips_known_headers() {
        let existing = vec![Table::from(vec![vec!["Name", "Age"], vec!["Bob", "30"]])];
        let recovered = vec![
            Table::from(vec![vec![" name ", "AGE"], vec!["Eve", "40"]]),
            Table::from(vec![vec!["City", "Zip"], vec!["LA", "90001"]]),
        ];
        let merged = merge_reconstructed(existing, recovered);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].header(), vec!["city", "zip"]);
    }

    #[test]
    fn authoritative_tables_are_kept() {
        let doc = DocumentRecord::try_from(json!({
            "extractedText": "x  y\n1  2",
            "tables": [[["A", "B"], ["1", "2"]]]
        }))
        .unwrap();
        let rec = reconstruct_tables_if_needed(&doc).unwrap();
        assert!(!rec.reconstructed);
        assert_eq!(rec.tables, doc.tables().unwrap());
    }

    #[test]
    fn blank_text_is_not_reconstructed() {
        let doc = DocumentRecord::try_from(json!({"extractedText": "  \n ", "tables": []})).unwrap();
        let rec = reconstruct_tables_if_needed(&doc).unwrap();
        assert!(!rec.reconstructed);
        assert!(rec.tables.is_empty());
    }

    #[test]
    fn empty_tables_with_text_are_reconstructed() {
        let doc = DocumentRecord::try_from(json!({"extractedText": "x  y\n1  2"})).unwrap();
        let rec = reconstruct_tables_if_needed(&doc).unwrap();
        assert!(rec.reconstructed);
        assert_eq!(rec.tables, vec![Table::from(vec![vec!["x", "y"], vec!["1", "2"]])]);
        // The record itself is untouched.
        assert!(doc.tables().unwrap().is_empty());
    }

    fn render(rows: &[Vec<String>]) -> String {
        rows.iter().map(|r| r.join("   ")).collect::<Vec<_>>().join("\n")
    }

    fn table_rows() -> impl Strategy<Value = Vec<Vec<String>>> {
        (2usize..6).prop_flat_map(|width| {
            prop::collection::vec(prop::collection::vec("[a-z0-9]{1,8}", width), 2..8)
        })
    }

    proptest! {
        #[test]
        fn rendered_table_is_recovered(rows in table_rows()) {
            let tables = reconstruct_tables(&render(&rows));
            prop_assert_eq!(tables.len(), 1);
            prop_assert_eq!(tables[0].rows(), rows.as_slice());
        }

        #[test]
        fn never_emits_single_row_tables(text in "([a-z]{1,4}( {1,3}|\t|,)?){0,6}(\n([a-z]{1,4}( {1,3}|\t|,)?){0,6}){0,12}") {
            for table in reconstruct_tables(&text) {
                prop_assert!(table.len() >= 2);
            }
        }
    }
}
