use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde_json::Value;

use doccmp_engine::{CompareConfig, Comparator};
use doccmp_types::{ComparisonResult, Difference, DocumentRecord, Table, TableOutcome};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Compare(args) => cmd_compare(args, cli.format),
        Command::Reconstruct(args) => cmd_reconstruct(args, cli.format),
    }
}

fn cmd_compare(args: CompareArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let doc1 = load_document(&args.doc1)?;
    let doc2 = load_document(&args.doc2)?;

    let comparison = Comparator::new(config).compare(&doc1, &doc2)?;

    if args.write_back {
        if let Some(tables) = &comparison.doc1_recovered {
            write_tables(&args.doc1, &doc1, tables)?;
        }
        if let Some(tables) = &comparison.doc2_recovered {
            write_tables(&args.doc2, &doc2, tables)?;
        }
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&comparison.result)?),
        OutputFormat::Text => print_result(&comparison.result),
    }
    Ok(())
}

fn cmd_reconstruct(args: ReconstructArgs, format: OutputFormat) -> anyhow::Result<()> {
    let doc = load_document(&args.doc)?;
    let reconstruction = Comparator::default().reconstruct_tables_if_needed(&doc)?;

    if args.write_back && reconstruction.reconstructed {
        write_tables(&args.doc, &doc, &reconstruction.tables)?;
    }

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "tables": reconstruction.tables,
                "wasReconstructed": reconstruction.reconstructed,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            let source = if reconstruction.reconstructed {
                "recovered from text".yellow()
            } else {
                "from record".green()
            };
            println!("{} table(s), {}", reconstruction.tables.len().to_string().bold(), source);
            for (i, table) in reconstruction.tables.iter().enumerate() {
                println!("\n{}", format!("Table {i}").bold());
                print_table(table);
            }
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<CompareConfig> {
    let Some(path) = path else {
        return Ok(CompareConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

fn load_document(path: &Path) -> anyhow::Result<DocumentRecord> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading document {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("parsing document {}", path.display()))?;
    DocumentRecord::try_from(value).with_context(|| format!("loading document {}", path.display()))
}

fn write_tables(path: &Path, doc: &DocumentRecord, tables: &[Table]) -> anyhow::Result<()> {
    let updated = doc.with_tables(tables);
    fs::write(path, serde_json::to_string_pretty(&updated)?)
        .with_context(|| format!("writing document {}", path.display()))?;
    tracing::info!(path = %path.display(), tables = tables.len(), "persisted recovered tables");
    Ok(())
}

fn print_result(result: &ComparisonResult) {
    println!(
        "Comparing {} with {}",
        result.doc1_id.cyan(),
        result.doc2_id.cyan()
    );
    println!("  Similarity: {}", percent(result.similarity_score).bold());
    println!("  Text similarity: {}", percent(result.text_similarity).bold());

    for diff in &result.differences {
        match diff {
            Difference::Field {
                field,
                doc1_value,
                doc2_value,
            } => {
                println!("\n{} {}", "field".yellow(), field.bold());
                println!("  {} {}", "-".red(), preview(doc1_value));
                println!("  {} {}", "+".green(), preview(doc2_value));
            }
            Difference::Text { field, diff, .. } => {
                println!("\n{} {}", "text".yellow(), field.bold());
                if diff.is_empty() {
                    println!("  {}", "no changes".dimmed());
                }
                for line in diff {
                    println!("  {}", colorize_diff_line(line));
                }
            }
            Difference::Tables {
                table_differences, ..
            } => {
                for td in table_differences {
                    let index = |i: Option<usize>| i.map_or("-".to_string(), |i| i.to_string());
                    println!(
                        "\n{} doc1[{}] doc2[{}]: {}",
                        "table".yellow(),
                        index(td.doc1_index),
                        index(td.doc2_index),
                        outcome_label(&td.outcome)
                    );
                    if let TableOutcome::Diverged { diff, .. } = &td.outcome {
                        for line in diff {
                            println!("  {}", colorize_diff_line(line));
                        }
                    }
                }
            }
        }
    }

    println!("\n{}", result.summary);
}

fn outcome_label(outcome: &TableOutcome) -> colored::ColoredString {
    match outcome {
        TableOutcome::ContentEquivalent { .. } => "✓ content-equivalent".green(),
        TableOutcome::SimilarContent {
            similarity,
            cell_overlap,
            ..
        } => format!("~ similar-content (score {similarity:.2}, overlap {cell_overlap:.2})").cyan(),
        TableOutcome::Diverged { .. } => "✗ diverged".red(),
        other => other.label().yellow(),
    }
}

fn print_table(table: &Table) {
    for row in table.rows() {
        println!("  {}", row.join(" | "));
    }
}

fn colorize_diff_line(line: &str) -> colored::ColoredString {
    if line.starts_with("@@") {
        line.cyan()
    } else if line.starts_with('+') {
        line.green()
    } else if line.starts_with('-') {
        line.red()
    } else {
        line.normal()
    }
}

fn percent(x: f64) -> String {
    format!("{:.1}%", x * 100.0)
}

/// Compact one-line rendering of a value, shortened past 80 characters.
fn preview(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.replace('\n', "\\n"),
        other => other.to_string(),
    };
    if text.chars().count() > 80 {
        let head: String = text.chars().take(77).collect();
        format!("{head}...")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn preview_shortens_long_values() {
        let long = Value::String("x".repeat(200));
        assert_eq!(preview(&long).chars().count(), 80);
        assert_eq!(preview(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(preview(&json!("a\nb")), "a\\nb");
    }

    #[test]
    fn missing_config_is_default() {
        assert_eq!(load_config(None).unwrap(), CompareConfig::default());
    }

    #[test]
    fn config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doccmp.toml");
        fs::write(&path, "[text]\nmax_diff_lines = 10\n").unwrap();
        assert_eq!(load_config(Some(&path)).unwrap().text.max_diff_lines, 10);
    }

    #[test]
    fn non_object_document_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(load_document(&path).is_err());
    }

    #[test]
    fn recovered_tables_are_written_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(
            &path,
            json!({"id": "d", "extractedText": "Name  Age\nBob  30"}).to_string(),
        )
        .unwrap();

        cmd_reconstruct(
            ReconstructArgs {
                doc: path.clone(),
                write_back: true,
            },
            OutputFormat::Json,
        )
        .unwrap();

        let saved = load_document(&path).unwrap();
        assert_eq!(
            saved.tables().unwrap(),
            vec![Table::from(vec![vec!["Name", "Age"], vec!["Bob", "30"]])]
        );
        assert_eq!(saved.id(), "d");
    }
}
