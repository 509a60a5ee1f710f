use bytes::Bytes;
use chrono::Utc;

use crate::constants::FORMAT_VERSION;
use crate::records::types::{RecordError, RecordType};

/// First frame of every container.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Header {
    #[prost(int32, tag = "1")]
    pub record_type: i32,
    /// Creation time, unix nanoseconds.
    #[prost(int64, tag = "2")]
    pub created: i64,
    #[prost(string, tag = "3")]
    pub input_source: String,
    #[prost(string, tag = "4")]
    pub version: String,
    #[prost(bool, tag = "5")]
    pub contains_payloads: bool,
}

impl Header {
    pub fn new(record_type: RecordType, input_source: impl Into<String>, contains_payloads: bool) -> Self {
        Self {
            record_type: record_type.tag(),
            created: Utc::now().timestamp_nanos_opt().unwrap_or_default(),
            input_source: input_source.into(),
            version: FORMAT_VERSION.to_string(),
            contains_payloads,
        }
    }

    pub fn kind(&self) -> Result<RecordType, RecordError> {
        RecordType::from_tag(self.record_type)
    }
}

/// Wire unit: whole frames of one record type from one sensor.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Batch {
    #[prost(string, tag = "1")]
    pub client_id: String,
    #[prost(int32, tag = "2")]
    pub message_type: i32,
    #[prost(bytes = "bytes", tag = "3")]
    pub data: Bytes,
    #[prost(int32, tag = "4")]
    pub size: i32,
    #[prost(bool, tag = "5")]
    pub contains_payloads: bool,
}

impl Batch {
    pub fn kind(&self) -> Result<RecordType, RecordError> {
        RecordType::from_tag(self.message_type)
    }

    /// `size` agrees with the carried bytes.
    pub fn is_consistent(&self) -> bool {
        usize::try_from(self.size).map_or(false, |s| s == self.data.len())
    }
}
