//! Persisted processor record
//!
//! A record holds everything needed to resume a processor: the original
//! request, seed, current bound, accumulated heuristic warnings, and the
//! composition snapshot with a cursor per heuristic. Heuristics themselves are
//! rebuilt from their descriptors on load.

use fv_core::{ComposedSnapshot, Request, Specification, Uuid, WarningsSection};
use serde::{Deserialize, Serialize};

use crate::error::LoadCause;

/// Current record layout
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "S: Specification")]
pub struct ProcessorRecord<S> {
    pub format_version: u32,
    /// Value kind the processor was created for
    pub kind: String,
    pub id: Uuid,
    pub seed: u64,
    pub max_values: usize,
    pub request: Request<S>,
    #[serde(default)]
    pub warnings: WarningsSection,
    pub composition: ComposedSnapshot,
}

/// Fields checked before the body is decoded
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordHeader {
    format_version: u32,
    kind: String,
    request: HeaderRequest,
}

#[derive(Deserialize)]
struct HeaderRequest {
    name: String,
}

impl<S: Specification> ProcessorRecord<S> {
    pub fn encode(&self, pretty: bool) -> Result<Vec<u8>, serde_json::Error> {
        if pretty {
            serde_json::to_vec_pretty(self)
        } else {
            serde_json::to_vec(self)
        }
    }

    /// Decode a record for `kind` stored under `id`
    pub fn decode(blob: &[u8], kind: &str, id: &Uuid) -> Result<Self, LoadCause> {
        let header: RecordHeader =
            serde_json::from_slice(blob).map_err(|e| LoadCause::Corrupt(e.to_string()))?;

        if header.format_version != FORMAT_VERSION {
            return Err(LoadCause::Corrupt(format!(
                "unsupported format version {}",
                header.format_version
            )));
        }
        if header.kind != kind {
            return Err(LoadCause::WrongKind {
                stored: header.kind,
                requested: kind.to_string(),
                name: header.request.name,
            });
        }

        let record: Self =
            serde_json::from_slice(blob).map_err(|e| LoadCause::Corrupt(e.to_string()))?;
        if record.id != *id {
            return Err(LoadCause::Corrupt(format!(
                "record stored under {} belongs to {}",
                id, record.id
            )));
        }
        if record.composition.seed != record.seed {
            return Err(LoadCause::Corrupt(format!(
                "composition seed {} differs from processor seed {}",
                record.composition.seed, record.seed
            )));
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fv_heuristics::IntegerSpec;

    fn record(id: Uuid) -> ProcessorRecord<IntegerSpec> {
        ProcessorRecord {
            format_version: FORMAT_VERSION,
            kind: "integer".to_string(),
            id,
            seed: 9,
            max_values: 4,
            request: Request::new("ports", 4).with_id(id).with_seed(9),
            warnings: WarningsSection::new(),
            composition: ComposedSnapshot {
                seed: 9,
                current: 0,
                emitted: 0,
                heuristics: Vec::new(),
            },
        }
    }

    #[test]
    fn test_decode_accepts_own_encoding() {
        let id = Uuid::new_v4();
        let blob = record(id).encode(true).unwrap();
        let decoded = ProcessorRecord::<IntegerSpec>::decode(&blob, "integer", &id).unwrap();
        assert_eq!(decoded.max_values, 4);
        assert_eq!(decoded.request.name, "ports");
    }

    #[test]
    fn test_decode_rejects_other_kind() {
        let id = Uuid::new_v4();
        let blob = record(id).encode(false).unwrap();
        let err = ProcessorRecord::<IntegerSpec>::decode(&blob, "string", &id).unwrap_err();
        match err {
            LoadCause::WrongKind {
                stored,
                requested,
                name,
            } => {
                assert_eq!(stored, "integer");
                assert_eq!(requested, "string");
                assert_eq!(name, "ports");
            }
            other => panic!("unexpected cause: {}", other),
        }
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let id = Uuid::new_v4();
        let mut stale = record(id);
        stale.format_version = FORMAT_VERSION + 1;
        let blob = stale.encode(false).unwrap();
        let err = ProcessorRecord::<IntegerSpec>::decode(&blob, "integer", &id).unwrap_err();
        assert!(matches!(err, LoadCause::Corrupt(msg) if msg.contains("version")));
    }

    #[test]
    fn test_decode_rejects_foreign_id() {
        let blob = record(Uuid::new_v4()).encode(false).unwrap();
        let err =
            ProcessorRecord::<IntegerSpec>::decode(&blob, "integer", &Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, LoadCause::Corrupt(_)));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err =
            ProcessorRecord::<IntegerSpec>::decode(b"not json", "integer", &Uuid::nil()).unwrap_err();
        assert!(matches!(err, LoadCause::Corrupt(_)));
    }
}
