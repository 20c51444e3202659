//! Table matching: pair the tables of two documents and classify each pair.
//!
//! Pairs are scored by header and body-row overlap. By default pairing is
//! greedy in doc1 order, which is not globally optimal: a doc1 table can take
//! a doc2 table that a later doc1 table would have matched better.
//! [`MatchStrategy::Optimal`] trades that for a maximum-total assignment.

use std::collections::HashSet;
use std::hash::Hash;

use tracing::debug;

use doccmp_types::{normalize_cell, Table, TableDifference, TableOutcome};

use crate::assignment::max_weight_assignment;
use crate::config::{MatchOptions, MatchStrategy};
use crate::text_diff::unified_diff;

/// Pair the tables of doc1 (`old`) with those of doc2 (`new`).
///
/// Every table of both lists appears in exactly one returned record: matched
/// pairs and unmatched doc1 tables in doc1 order, then unmatched doc2 tables
/// in doc2 order.
pub fn match_tables(old: &[Table], new: &[Table], options: &MatchOptions) -> Vec<TableDifference> {
    let scores: Vec<Vec<f64>> = old
        .iter()
        .map(|a| new.iter().map(|b| table_similarity(a, b, options)).collect())
        .collect();

    let pairing = match options.strategy {
        MatchStrategy::Greedy => greedy_pairs(&scores, options.match_threshold),
        MatchStrategy::Optimal => max_weight_assignment(&scores, options.match_threshold),
    };

    let mut used = vec![false; new.len()];
    let mut out = Vec::with_capacity(old.len() + new.len());

    for (i, (table, paired)) in old.iter().zip(&pairing).enumerate() {
        match *paired {
            Some(j) => {
                used[j] = true;
                let outcome = classify(table, &new[j], scores[i][j], options);
                debug!(doc1 = i, doc2 = j, score = scores[i][j], outcome = outcome.label(), "tables matched");
                out.push(TableDifference::matched(i, j, outcome));
            }
            None => out.push(TableDifference::only_in_doc1(i, table)),
        }
    }

    out.extend(
        new.iter()
            .enumerate()
            .filter(|(j, _)| !used[*j])
            .map(|(j, table)| TableDifference::only_in_doc2(j, table)),
    );
    out
}

/// Greedy pairing: each row in order takes the unused column with the
/// strictly highest score (first seen wins ties), if that score exceeds
/// `threshold`.
fn greedy_pairs(scores: &[Vec<f64>], threshold: f64) -> Vec<Option<usize>> {
    let cols = scores.first().map_or(0, Vec::len);
    let mut used = vec![false; cols];

    scores
        .iter()
        .map(|row| {
            let mut best: Option<(usize, f64)> = None;
            for (j, &score) in row.iter().enumerate() {
                if used[j] {
                    continue;
                }
                if best.map_or(true, |(_, top)| score > top) {
                    best = Some((j, score));
                }
            }
            match best {
                Some((j, score)) if score > threshold => {
                    used[j] = true;
                    Some(j)
                }
                _ => None,
            }
        })
        .collect()
}

/// Pair score: weighted header overlap plus weighted body-row Jaccard index.
pub fn table_similarity(a: &Table, b: &Table, options: &MatchOptions) -> f64 {
    options.header_weight * header_overlap(&a.header(), &b.header())
        + options.row_weight * jaccard(&body_rows(a), &body_rows(b))
}

/// Shared header cells over the longer header; 0 if either is empty.
fn header_overlap(h1: &[String], h2: &[String]) -> f64 {
    if h1.is_empty() || h2.is_empty() {
        return 0.0;
    }
    let s1: HashSet<&String> = h1.iter().collect();
    let s2: HashSet<&String> = h2.iter().collect();
    s1.intersection(&s2).count() as f64 / h1.len().max(h2.len()) as f64
}

/// `|a ∩ b| / max(1, |a ∪ b|)`.
fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let shared = a.intersection(b).count();
    let union = a.len() + b.len() - shared;
    shared as f64 / union.max(1) as f64
}

/// Normalized body rows as a set.
fn body_rows(table: &Table) -> HashSet<Vec<String>> {
    table
        .body()
        .iter()
        .map(|row| row.iter().map(|c| normalize_cell(c)).collect())
        .collect()
}

/// All normalized cells of a table, header included.
fn cell_set(table: &Table) -> HashSet<String> {
    table
        .rows()
        .iter()
        .flatten()
        .map(|c| normalize_cell(c))
        .collect()
}

/// Flattened cell overlap of two tables.
pub fn cell_overlap(a: &Table, b: &Table) -> f64 {
    jaccard(&cell_set(a), &cell_set(b))
}

/// Classify a matched pair. `score` is the pair's match score.
pub fn classify(a: &Table, b: &Table, score: f64, options: &MatchOptions) -> TableOutcome {
    let (h1, h2) = (a.header(), b.header());

    if h1 == h2 && body_rows(a) == body_rows(b) {
        return TableOutcome::ContentEquivalent {
            header: h1,
            content_equivalent: true,
        };
    }

    let overlap = cell_overlap(a, b);
    if overlap > options.similar_content_threshold {
        return TableOutcome::SimilarContent {
            doc1_header: h1,
            doc2_header: h2,
            similarity: round2(score),
            cell_overlap: round2(overlap),
            doc1_table: a.clone(),
            doc2_table: b.clone(),
        };
    }

    TableOutcome::Diverged {
        doc1_header: h1,
        doc2_header: h2,
        diff: unified_diff(&serialize(a), &serialize(b), 0, options.max_diff_lines),
    }
}

/// Rows as comma-joined cells, one row per line.
fn serialize(table: &Table) -> String {
    table
        .rows()
        .iter()
        .map(|row| row.join(","))
        .collect::<Vec<_>>()
        .join("\n")
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
