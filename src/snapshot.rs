//! JSON snapshots of a back-end's results.
//!
//! Lets a run captured on one machine be compared against a run captured on
//! another. Element buffers are stored as lowercase hex in the byte order of
//! the writer; loading converts them to the host byte order.
//!
//! ```json
//! {"format_version":1,"arch":"sse2","byte_order":"little","test_cases":[
//!   {"name":"add","sections":[[{"type":"int32","length":4,"file":"add.rs",
//!     "line":12,"seq":1,"precision_ulp":0,"fp_zero_equal":false,
//!     "data":"01000000..."}]]}]}
//! ```

use crate::arch::ArchResults;
use crate::element::ElementType;
use crate::error::{OracleError, OracleResult};
use crate::results::{Policy, ResultRecord, ResultsSet, SourceLocation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Snapshot format version written by this crate.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    format_version: u32,
    arch: String,
    byte_order: ByteOrder,
    test_cases: Vec<CaseEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CaseEntry {
    name: String,
    sections: Vec<Vec<RecordEntry>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordEntry {
    #[serde(rename = "type")]
    element_type: String,
    length: usize,
    file: String,
    line: u32,
    seq: u32,
    precision_ulp: u32,
    fp_zero_equal: bool,
    data: String,
}

impl RecordEntry {
    fn capture(record: &ResultRecord) -> Self {
        let policy = record.policy();
        Self {
            element_type: record.element_type().name().to_string(),
            length: record.len(),
            file: record.location().file.clone(),
            line: record.location().line,
            seq: record.seq(),
            precision_ulp: policy.precision_ulp,
            fp_zero_equal: policy.fp_zero_equal,
            data: hex::encode(record.data()),
        }
    }

    fn restore(self, order: ByteOrder) -> OracleResult<ResultRecord> {
        let element_type: ElementType = self.element_type.parse()?;
        let mut data = hex::decode(&self.data)?;
        // `from_parts` rejects a size mismatch after the swap.
        if order != ByteOrder::native() {
            for element in data.chunks_exact_mut(element_type.size()) {
                element.reverse();
            }
        }
        ResultRecord::from_parts(
            element_type,
            self.length,
            SourceLocation::new(self.file, self.line),
            self.seq,
            Policy {
                precision_ulp: self.precision_ulp,
                fp_zero_equal: self.fp_zero_equal,
            },
            data,
        )
    }
}

/// Serialize `results` to a JSON string.
pub fn to_json_string(results: &ArchResults) -> OracleResult<String> {
    let file = SnapshotFile {
        format_version: FORMAT_VERSION,
        arch: results.arch().to_string(),
        byte_order: ByteOrder::native(),
        test_cases: results
            .iter()
            .map(|set| CaseEntry {
                name: set.name().to_string(),
                sections: set
                    .sections()
                    .iter()
                    .map(|section| section.iter().map(RecordEntry::capture).collect())
                    .collect(),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

/// Parse a JSON snapshot, validating every record.
///
/// Test case names must be unique, and sequence numbers in each section
/// must run 1, 2, 3, ... as they do when the set is captured.
pub fn from_json_str(json: &str) -> OracleResult<ArchResults> {
    let file: SnapshotFile = serde_json::from_str(json)?;
    if file.format_version != FORMAT_VERSION {
        return Err(OracleError::UnsupportedFormat(file.format_version));
    }

    let order = file.byte_order;
    let mut names = HashSet::with_capacity(file.test_cases.len());
    let mut cases = Vec::with_capacity(file.test_cases.len());
    for case in file.test_cases {
        if !names.insert(case.name.clone()) {
            return Err(OracleError::DuplicateCase(case.name));
        }
        let mut sections = Vec::with_capacity(case.sections.len());
        for (section, entries) in case.sections.into_iter().enumerate() {
            let records = entries
                .into_iter()
                .enumerate()
                .map(|(position, entry)| {
                    check_seq(&case.name, section, position, entry.seq)?;
                    entry.restore(order)
                })
                .collect::<OracleResult<Vec<_>>>()?;
            sections.push(records);
        }
        cases.push(ResultsSet::from_sections(case.name, sections)?);
    }
    Ok(ArchResults::from_cases(file.arch, cases))
}

fn check_seq(case: &str, section: usize, position: usize, seq: u32) -> OracleResult<()> {
    let expected = position
        .checked_add(1)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| OracleError::SequenceOverflow {
            case: case.to_string(),
            section,
        })?;
    if seq != expected {
        return Err(OracleError::SequenceMismatch {
            case: case.to_string(),
            section,
            expected,
            got: seq,
        });
    }
    Ok(())
}

/// Write `results` to `path`.
pub fn save<P: AsRef<Path>>(path: P, results: &ArchResults) -> OracleResult<()> {
    let path = path.as_ref();
    let json = to_json_string(results)?;
    fs::write(path, json).map_err(|source| OracleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), arch = results.arch(), "snapshot saved");
    Ok(())
}

/// Read a snapshot from `path`.
pub fn load<P: AsRef<Path>>(path: P) -> OracleResult<ArchResults> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| OracleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let results = from_json_str(&json)?;
    tracing::debug!(
        path = %path.display(),
        arch = results.arch(),
        cases = results.len(),
        "snapshot loaded"
    );
    Ok(results)
}
