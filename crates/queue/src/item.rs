use {
    crate::StoreError,
    image::SubmissionPayload,
    serde::{Deserialize, Serialize},
};

/// A payload waiting for the classifier to come back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingItem {
    pub key: String,
    pub payload: SubmissionPayload,
    /// Unix milliseconds when the item was queued.
    pub created_at: u64,
}

// first line of every record
#[derive(Serialize, Deserialize)]
struct RecordHeader {
    content_type: String,
    created_at: u64,
    len: usize,
}

impl PendingItem {
    /// Encode as one JSON header line followed by the raw payload bytes.
    pub fn to_record(&self) -> Result<Vec<u8>, StoreError> {
        let header = RecordHeader {
            content_type: self.payload.content_type().to_string(),
            created_at: self.created_at,
            len: self.payload.len(),
        };
        let mut record = serde_json::to_vec(&header).map_err(|e| StoreError::Corrupt {
            key: self.key.clone(),
            reason: e.to_string(),
        })?;
        record.push(b'\n');
        record.extend_from_slice(self.payload.data());
        Ok(record)
    }

    pub fn from_record(key: &str, record: &[u8]) -> Result<Self, StoreError> {
        let corrupt = |reason: String| StoreError::Corrupt {
            key: key.to_string(),
            reason,
        };
        let split = record
            .iter()
            .position(|&b| b == b'\n')
            .ok_or_else(|| corrupt("missing header".to_string()))?;
        let header: RecordHeader =
            serde_json::from_slice(&record[..split]).map_err(|e| corrupt(e.to_string()))?;
        let data = &record[split + 1..];
        if data.len() != header.len {
            return Err(corrupt(format!(
                "expected {} payload bytes, found {}",
                header.len,
                data.len()
            )));
        }
        Ok(Self {
            key: key.to_string(),
            payload: SubmissionPayload::new(data.to_vec(), header.content_type),
            created_at: header.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> PendingItem {
        PendingItem {
            key: "pending-1-0".to_string(),
            payload: SubmissionPayload::new(vec![0xff, 0xd8, b'\n', 0xff, 0xd9], "image/jpeg"),
            created_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_payload_with_newlines_survives() {
        let item = item();
        let record = item.to_record().unwrap();
        assert_eq!(PendingItem::from_record("pending-1-0", &record).unwrap(), item);
    }

    #[test]
    fn test_truncated_record_is_corrupt() {
        let record = item().to_record().unwrap();
        let truncated = &record[..record.len() - 2];
        assert!(matches!(
            PendingItem::from_record("pending-1-0", truncated),
            Err(StoreError::Corrupt { .. })
        ));
        assert!(matches!(
            PendingItem::from_record("pending-1-0", b"no header here"),
            Err(StoreError::Corrupt { .. })
        ));
    }
}
