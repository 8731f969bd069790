//! Output formatting for analysis results.
//!
//! Two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption
//!
//! Also hosts the downstream bucket layer: descriptors filtered into four
//! named categories (libraries, classes, functions, variables) keyed by the
//! names they bind, each holding the lines where the name appears.

use std::path::Path;

use colored::*;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::analysis::{IndentAnalysis, IndentWarning, LineDescriptorMap, LineIndentMap, NodeKind, Value};

// =============================================================================
// Bucket layer
// =============================================================================

/// Name to the lines it appears on, in first-seen order. Duplicate lines are
/// preserved, never deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bucket(Vec<(String, Vec<usize>)>);

impl Bucket {
    fn record(&mut self, name: &str, line: usize) {
        match self.0.iter_mut().find(|(n, _)| n == name) {
            Some((_, lines)) => lines.push(line),
            None => self.0.push((name.to_string(), vec![line])),
        }
    }

    pub fn lines(&self, name: &str) -> Option<&[usize]> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, lines)| lines.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.0.iter().map(|(n, l)| (n.as_str(), l.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Bucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, lines) in &self.0 {
            map.serialize_entry(name, lines)?;
        }
        map.end()
    }
}

/// Descriptors bucketed by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NameBuckets {
    pub libraries: Bucket,
    pub classes: Bucket,
    pub functions: Bucket,
    pub variables: Bucket,
}

/// Bucket a descriptor map by category.
///
/// Mapping-valued descriptors fan out one entry per key; scalar-valued
/// descriptors bucket the scalar directly. Descriptors with other kind tags
/// are ignored.
pub fn bucket_names(map: &LineDescriptorMap) -> NameBuckets {
    let mut out = NameBuckets::default();

    for (&line, descriptors) in map {
        for descriptor in descriptors {
            let bucket = match descriptor.kind {
                NodeKind::Import | NodeKind::ImportFrom => &mut out.libraries,
                NodeKind::Assign => &mut out.variables,
                NodeKind::FunctionDef => &mut out.functions,
                NodeKind::ClassDef => &mut out.classes,
                NodeKind::Other(_) => continue,
            };
            match &descriptor.value {
                Value::Scalar(name) => bucket.record(name, line),
                Value::Map(pairs) => {
                    for (name, _) in pairs {
                        bucket.record(name, line);
                    }
                }
            }
        }
    }

    out
}

// =============================================================================
// JSON format
// =============================================================================

#[derive(Serialize)]
struct IndentReport<'a> {
    path: String,
    indents: &'a LineIndentMap,
    warnings: &'a [IndentWarning],
}

#[derive(Serialize)]
struct ClassifyReport<'a> {
    path: String,
    lines: &'a LineDescriptorMap,
}

#[derive(Serialize)]
struct BucketReport<'a> {
    path: String,
    #[serde(flatten)]
    buckets: &'a NameBuckets,
}

pub fn write_indent_json(path: &Path, analysis: &IndentAnalysis) -> anyhow::Result<()> {
    let report = IndentReport {
        path: path.display().to_string(),
        indents: &analysis.indents,
        warnings: &analysis.warnings,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn write_classify_json(path: &Path, map: &LineDescriptorMap) -> anyhow::Result<()> {
    let report = ClassifyReport {
        path: path.display().to_string(),
        lines: map,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn write_buckets_json(path: &Path, buckets: &NameBuckets) -> anyhow::Result<()> {
    let report = BucketReport {
        path: path.display().to_string(),
        buckets,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// =============================================================================
// Pretty format
// =============================================================================

pub fn write_indent_pretty(path: &Path, analysis: &IndentAnalysis) {
    println!("{}", path.display().to_string().bold());
    for (line, width) in &analysis.indents {
        println!("  {:>5}  {}", line, width);
    }
    for warning in &analysis.warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }
}

pub fn write_classify_pretty(path: &Path, map: &LineDescriptorMap) {
    println!("{}", path.display().to_string().bold());
    for (line, descriptors) in map {
        println!("{}", format!("line {}", line).bold());
        for descriptor in descriptors {
            println!(
                "  {:<16} {}",
                descriptor.kind.as_str().cyan(),
                descriptor.value
            );
        }
    }
}

pub fn write_buckets_pretty(path: &Path, buckets: &NameBuckets) {
    println!("{}", path.display().to_string().bold());
    print_bucket("libraries", &buckets.libraries);
    print_bucket("classes", &buckets.classes);
    print_bucket("functions", &buckets.functions);
    print_bucket("variables", &buckets.variables);
}

fn print_bucket(label: &str, bucket: &Bucket) {
    println!("{}", label.bold());
    if bucket.is_empty() {
        println!("  {}", "(none)".dimmed());
        return;
    }
    for (name, lines) in bucket.iter() {
        let lines = lines
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {:<24} {}", name.green(), lines.dimmed());
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::analysis::{classify_lines, SourceFile};

    fn buckets_of(source: &str) -> NameBuckets {
        let file = SourceFile::from_text(Path::new("test.py"), source.to_string()).unwrap();
        bucket_names(&classify_lines(&file))
    }

    #[test]
    fn test_mapping_descriptors_fan_out_per_key() {
        let buckets = buckets_of("import os as o, sys\n");
        assert_eq!(buckets.libraries.lines("os"), Some(&[1][..]));
        assert_eq!(buckets.libraries.lines("sys"), Some(&[1][..]));
    }

    #[test]
    fn test_scalar_descriptors_bucket_directly() {
        let buckets = buckets_of("class App:\n    pass\n\ndef run():\n    pass\n");
        assert_eq!(buckets.classes.lines("App"), Some(&[1][..]));
        assert_eq!(buckets.functions.lines("run"), Some(&[4][..]));
    }

    #[test]
    fn test_duplicate_lines_are_preserved() {
        let buckets = buckets_of("import os\nimport os\n");
        assert_eq!(buckets.libraries.lines("os"), Some(&[1, 2][..]));
    }

    #[test]
    fn test_assignments_land_in_variables() {
        let buckets = buckets_of("x = os\ny = x\n");
        assert_eq!(buckets.variables.lines("x"), Some(&[1][..]));
        assert_eq!(buckets.variables.lines("y"), Some(&[2][..]));
    }

    #[test]
    fn test_unclassified_kinds_are_ignored() {
        let buckets = buckets_of("foo()\n");
        assert!(buckets.libraries.is_empty());
        assert!(buckets.variables.is_empty());
        assert!(buckets.functions.is_empty());
        assert!(buckets.classes.is_empty());
    }

    #[test]
    fn test_buckets_json_preserves_insertion_order() {
        let buckets = buckets_of("import sys\nimport abc\n");
        let json = serde_json::to_string(&buckets.libraries).unwrap();
        assert_eq!(json, "{\"sys\":[1],\"abc\":[2]}");
    }
}
