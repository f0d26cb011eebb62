//! Wire protocol for the PSD stream
//!
//! Inbound: `{"psd": [8192 numbers in [0,1]], "classification": "WiFi"}`
//! Outbound: `{"type": "request_update"}`

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use super::errors::ValidationError;
use super::frame::{Classification, Frame, FRAME_LEN};

/// Control message sent from the viewer to the producer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    /// Ask the producer for a fresh frame
    RequestUpdate,
}

impl ControlMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Outbound frame payload, as written by a producer
#[derive(Debug, Serialize)]
pub struct FrameMessage<'a> {
    pub psd: &'a [f32],
    pub classification: &'a str,
}

impl<'a> FrameMessage<'a> {
    pub fn from_frame(frame: &'a Frame) -> Self {
        Self {
            psd: frame.values(),
            classification: frame.classification().label(),
        }
    }
}

/// Parse and validate one inbound message.
///
/// The classification defaults to `Unknown` when missing or not a string.
pub fn parse_frame(msg: &str) -> Result<Frame, ValidationError> {
    trace!(len = msg.len(), "Parsing message");

    let json: Value =
        serde_json::from_str(msg).map_err(|e| ValidationError::Malformed(e.to_string()))?;

    let psd = match json.get("psd") {
        Some(psd) => psd,
        None => return Err(ValidationError::MissingField("psd")),
    };
    let values = validate_psd(psd)?;

    let classification = json
        .get("classification")
        .and_then(Value::as_str)
        .map(Classification::from_label)
        .unwrap_or_default();

    Frame::new(values, classification)
}

/// Check array shape and per-element range before narrowing to f32.
fn validate_psd(psd: &Value) -> Result<Vec<f32>, ValidationError> {
    let items = psd.as_array().ok_or(ValidationError::NotAnArray)?;
    if items.len() != FRAME_LEN {
        return Err(ValidationError::WrongLength {
            expected: FRAME_LEN,
            actual: items.len(),
        });
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let value = item.as_f64().ok_or(ValidationError::NotANumber { index })?;
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::OutOfRange { index, value });
            }
            Ok(value as f32)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn psd_message(values: &[f64], classification: &str) -> String {
        serde_json::json!({ "psd": values, "classification": classification }).to_string()
    }

    #[test]
    fn test_parse_valid_frame() {
        let msg = psd_message(&vec![0.25; FRAME_LEN], "Bluetooth");
        let frame = parse_frame(&msg).unwrap();
        assert_eq!(frame.values().len(), FRAME_LEN);
        assert_eq!(frame.values()[0], 0.25);
        assert_eq!(frame.classification(), &Classification::Bluetooth);
    }

    #[test]
    fn test_parse_integer_values() {
        let mut values = vec![0.0; FRAME_LEN];
        values[1] = 1.0;
        // serialize 0 and 1 as JSON integers
        let ints: Vec<i64> = values.iter().map(|&v| v as i64).collect();
        let msg = serde_json::json!({ "psd": ints, "classification": "WiFi" }).to_string();
        let frame = parse_frame(&msg).unwrap();
        assert_eq!(frame.values()[1], 1.0);
    }

    #[test]
    fn test_missing_classification_is_unknown() {
        let msg = serde_json::json!({ "psd": vec![0.5; FRAME_LEN] }).to_string();
        let frame = parse_frame(&msg).unwrap();
        assert_eq!(frame.classification(), &Classification::Unknown);
    }

    #[test]
    fn test_reject_malformed_json() {
        assert!(matches!(
            parse_frame("{not json"),
            Err(ValidationError::Malformed(_))
        ));
    }

    #[test]
    fn test_reject_missing_psd() {
        assert_eq!(
            parse_frame(r#"{"classification": "WiFi"}"#),
            Err(ValidationError::MissingField("psd"))
        );
    }

    #[test]
    fn test_reject_non_array() {
        assert_eq!(
            parse_frame(r#"{"psd": "nope", "classification": "WiFi"}"#),
            Err(ValidationError::NotAnArray)
        );
    }

    #[test]
    fn test_reject_wrong_length() {
        let msg = psd_message(&[0.5; 100], "WiFi");
        assert_eq!(
            parse_frame(&msg),
            Err(ValidationError::WrongLength {
                expected: FRAME_LEN,
                actual: 100
            })
        );
    }

    #[test]
    fn test_reject_out_of_range() {
        let mut values = vec![0.5; FRAME_LEN];
        values[7] = 1.5;
        assert_eq!(
            parse_frame(&psd_message(&values, "WiFi")),
            Err(ValidationError::OutOfRange {
                index: 7,
                value: 1.5
            })
        );

        values[7] = -0.01;
        assert!(matches!(
            parse_frame(&psd_message(&values, "WiFi")),
            Err(ValidationError::OutOfRange { index: 7, .. })
        ));
    }

    #[test]
    fn test_reject_non_number_element() {
        let mut items: Vec<Value> = vec![Value::from(0.5); FRAME_LEN];
        items[3] = Value::from("0.5");
        let msg = serde_json::json!({ "psd": items, "classification": "WiFi" }).to_string();
        assert_eq!(
            parse_frame(&msg),
            Err(ValidationError::NotANumber { index: 3 })
        );
    }

    #[test]
    fn test_control_message_wire_format() {
        assert_eq!(
            ControlMessage::RequestUpdate.to_json().unwrap(),
            r#"{"type":"request_update"}"#
        );
    }

    #[test]
    fn test_frame_message_is_parseable() {
        let frame = Frame::uniform(0.5);
        let text = serde_json::to_string(&FrameMessage::from_frame(&frame)).unwrap();
        let parsed = parse_frame(&text).unwrap();
        assert_eq!(parsed.values(), frame.values());
        assert_eq!(parsed.classification(), &Classification::Unknown);
    }
}
