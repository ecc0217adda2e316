use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;

use super::epoch::parse_epoch;
use super::error::ParseError;
use super::types::{OemDocument, OemHeader, OemMetadata, StateVector};

// Wire layout of the NDM/XML rendering of an OEM. The deserializer ignores the
// root element name, so `parse_oem` checks for <ndm> itself.

const ROOT_ELEMENT: &str = "ndm";

#[derive(Debug, Deserialize)]
struct RawNdm {
    oem: RawOem,
}

#[derive(Debug, Deserialize)]
struct RawOem {
    header: RawHeader,
    body: RawBody,
}

#[derive(Debug, Deserialize)]
struct RawHeader {
    #[serde(rename = "CREATION_DATE")]
    creation_date: Option<String>,
    #[serde(rename = "ORIGINATOR")]
    originator: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBody {
    segment: RawSegment,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    metadata: RawMetadata,
    data: RawData,
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    #[serde(rename = "OBJECT_NAME")]
    object_name: Option<String>,
    #[serde(rename = "OBJECT_ID")]
    object_id: Option<String>,
    #[serde(rename = "CENTER_NAME")]
    center_name: Option<String>,
    #[serde(rename = "REF_FRAME")]
    ref_frame: Option<String>,
    #[serde(rename = "TIME_SYSTEM")]
    time_system: Option<String>,
    #[serde(rename = "START_TIME")]
    start_time: Option<String>,
    #[serde(rename = "STOP_TIME")]
    stop_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawData {
    #[serde(rename = "COMMENT", default)]
    comments: Vec<String>,
    #[serde(rename = "stateVector", default)]
    state_vectors: Vec<RawStateVector>,
}

#[derive(Debug, Deserialize)]
struct RawStateVector {
    #[serde(rename = "EPOCH")]
    epoch: Option<String>,
    #[serde(rename = "X")]
    x: Option<RawValue>,
    #[serde(rename = "Y")]
    y: Option<RawValue>,
    #[serde(rename = "Z")]
    z: Option<RawValue>,
    #[serde(rename = "X_DOT")]
    x_dot: Option<RawValue>,
    #[serde(rename = "Y_DOT")]
    y_dot: Option<RawValue>,
    #[serde(rename = "Z_DOT")]
    z_dot: Option<RawValue>,
}

/// `<X units="km">-4357.0</X>`. Units are fixed by the OEM standard, so the
/// attribute is not read.
#[derive(Debug, Deserialize)]
struct RawValue {
    #[serde(rename = "$text", default)]
    text: String,
}

/// Decode an OEM XML document into a validated, time-ordered dataset.
///
/// Entries are kept in feed order. A feed whose epochs are not strictly
/// increasing is rejected rather than re-sorted.
pub fn parse_oem(xml: &str) -> Result<OemDocument, ParseError> {
    if let Some(root) = root_element(xml) {
        if root != ROOT_ELEMENT {
            return Err(ParseError::UnexpectedRoot(root));
        }
    }
    let raw: RawNdm = quick_xml::de::from_str(xml)?;
    let RawOem { header, body } = raw.oem;
    let RawSegment { metadata, data } = body.segment;

    let mut state_vectors = Vec::with_capacity(data.state_vectors.len());
    let mut previous: Option<DateTime<Utc>> = None;

    for (index, entry) in data.state_vectors.iter().enumerate() {
        let vector = convert_state_vector(index, entry)?;
        if let Some(previous) = previous {
            if vector.epoch <= previous {
                return Err(ParseError::NonIncreasingEpoch {
                    index,
                    previous,
                    current: vector.epoch,
                });
            }
        }
        previous = Some(vector.epoch);
        state_vectors.push(vector);
    }

    log::debug!(
        "parsed {} state vectors for {}",
        state_vectors.len(),
        metadata.object_name.as_deref().unwrap_or("unnamed object")
    );

    Ok(OemDocument {
        header: OemHeader {
            creation_date: trimmed(header.creation_date),
            originator: trimmed(header.originator),
        },
        metadata: OemMetadata {
            object_name: trimmed(metadata.object_name),
            object_id: trimmed(metadata.object_id),
            center_name: trimmed(metadata.center_name),
            ref_frame: trimmed(metadata.ref_frame),
            time_system: trimmed(metadata.time_system),
            start_time: trimmed(metadata.start_time),
            stop_time: trimmed(metadata.stop_time),
        },
        comments: data
            .comments
            .into_iter()
            .map(|c| c.trim().to_string())
            .collect(),
        state_vectors,
    })
}

/// Local name of the first element in the document. `None` when the
/// document has no element or breaks before one; the deserializer reports
/// those cases.
fn root_element(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => {}
        }
    }
}

fn convert_state_vector(index: usize, raw: &RawStateVector) -> Result<StateVector, ParseError> {
    let epoch_text = raw
        .epoch
        .as_deref()
        .ok_or(ParseError::MissingField {
            index,
            field: "EPOCH",
        })?;
    let epoch = parse_epoch(epoch_text).ok_or_else(|| ParseError::InvalidEpoch {
        index,
        value: epoch_text.trim().to_string(),
    })?;

    Ok(StateVector {
        epoch,
        position_km: [
            component(index, "X", &raw.x)?,
            component(index, "Y", &raw.y)?,
            component(index, "Z", &raw.z)?,
        ],
        velocity_km_s: [
            component(index, "X_DOT", &raw.x_dot)?,
            component(index, "Y_DOT", &raw.y_dot)?,
            component(index, "Z_DOT", &raw.z_dot)?,
        ],
    })
}

fn component(
    index: usize,
    field: &'static str,
    value: &Option<RawValue>,
) -> Result<f64, ParseError> {
    let value = value
        .as_ref()
        .ok_or(ParseError::MissingField { index, field })?;
    let text = value.text.trim();
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::InvalidNumber {
            index,
            field,
            value: text.to_string(),
        }),
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
