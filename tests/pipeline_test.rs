//! Scenario tests for the ingest -> canvas -> UI pipeline, driven without a network

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use psd_waterfall::core::{
    build_color_table, downsample, parse_frame, Classification, ErrorKind, Headless, Pipeline,
    Rgba, StreamIngestor, Transport, TransportError, TransportEvent, WaterfallCanvas, BACKGROUND,
    FRAME_LEN,
};
use psd_waterfall::ConnectionStatus;

const WIDTH: usize = 16;
const HEIGHT: usize = 6;

#[derive(Clone, Default)]
struct RecordingTransport {
    sent: Rc<RefCell<Vec<String>>>,
}

impl Transport for RecordingTransport {
    fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.sent.borrow_mut().push(text);
        Ok(())
    }

    fn close(&mut self) {}
}

fn connected_pipeline() -> (Pipeline<RecordingTransport>, RecordingTransport) {
    let transport = RecordingTransport::default();
    let ingestor = StreamIngestor::connect("ws://localhost:8000/ws", transport.clone());
    let canvas = WaterfallCanvas::new(WIDTH, HEIGHT, Arc::new(build_color_table()))
        .unwrap()
        .with_surface(Headless);
    let mut pipeline = Pipeline::new(ingestor, canvas);
    pipeline.on_transport_event(TransportEvent::Opened);
    assert_eq!(pipeline.status(), ConnectionStatus::Connected);
    (pipeline, transport)
}

/// Linear ramp from `start` to `end` across the frame
fn ramp_message(start: f64, end: f64, classification: &str) -> String {
    let step = (end - start) / (FRAME_LEN - 1) as f64;
    let psd: Vec<f64> = (0..FRAME_LEN)
        .map(|i| (start + step * i as f64).clamp(0.0, 1.0))
        .collect();
    serde_json::json!({ "psd": psd, "classification": classification }).to_string()
}

fn uniform_message(level: f64) -> String {
    serde_json::json!({ "psd": vec![level; FRAME_LEN], "classification": "WiFi" }).to_string()
}

fn expected_row(msg: &str) -> Vec<Rgba> {
    let table = build_color_table();
    let frame = parse_frame(msg).unwrap();
    downsample(frame.values(), WIDTH)
        .into_iter()
        .map(|v| table.lookup(v))
        .collect()
}

#[test]
fn test_three_frames_fill_bottom_rows_in_order() {
    let (mut pipeline, _) = connected_pipeline();
    let messages = [
        ramp_message(0.0, 1.0, "WiFi"),
        ramp_message(1.0, 0.0, "Bluetooth"),
        ramp_message(0.25, 0.75, "WiFi"),
    ];

    for msg in &messages {
        pipeline.on_transport_event(TransportEvent::Message(msg.clone()));
        assert!(pipeline.on_tick());
    }

    let buffer = pipeline.canvas().buffer();
    assert_eq!(buffer.row(HEIGHT - 3), expected_row(&messages[0]).as_slice());
    assert_eq!(buffer.row(HEIGHT - 2), expected_row(&messages[1]).as_slice());
    assert_eq!(buffer.row(HEIGHT - 1), expected_row(&messages[2]).as_slice());
    for y in 0..HEIGHT - 3 {
        assert!(buffer.row(y).iter().all(|&px| px == BACKGROUND));
    }
    assert_eq!(pipeline.ui().classification(), &Classification::WiFi);
}

#[test]
fn test_frames_faster_than_ticks_are_coalesced() {
    let (mut pipeline, _) = connected_pipeline();

    for tick in 0..10 {
        let older = uniform_message(0.0);
        let latest = uniform_message(if tick % 2 == 0 { 1.0 } else { 0.5 });
        pipeline.on_transport_event(TransportEvent::Message(older));
        pipeline.on_transport_event(TransportEvent::Message(latest.clone()));
        assert!(pipeline.on_tick());
        assert_eq!(
            pipeline.canvas().buffer().row(HEIGHT - 1),
            expected_row(&latest).as_slice()
        );
    }

    let stats = pipeline.canvas().stats();
    assert_eq!(stats.rows_drawn, 10);
    assert_eq!(stats.frames_coalesced, 10);
    assert!(!pipeline.on_tick());
}

#[test]
fn test_buffer_dimensions_never_change() {
    let (mut pipeline, _) = connected_pipeline();
    for i in 0..(HEIGHT * 3) {
        let level = (i % 5) as f64 / 4.0;
        pipeline.on_transport_event(TransportEvent::Message(uniform_message(level)));
        pipeline.on_tick();
        let buffer = pipeline.canvas().buffer();
        assert_eq!((buffer.width(), buffer.height()), (WIDTH, HEIGHT));
        assert_eq!(buffer.pixels().len(), WIDTH * HEIGHT);
    }
}

#[test]
fn test_wrong_length_rejected() {
    let (mut pipeline, _) = connected_pipeline();
    let short = serde_json::json!({ "psd": vec![0.5; FRAME_LEN - 1], "classification": "WiFi" });
    pipeline.on_transport_event(TransportEvent::Message(short.to_string()));

    assert!(!pipeline.on_tick());
    assert!(pipeline.canvas().buffer().pixels().iter().all(|&px| px == BACKGROUND));
    let notice = pipeline.ui().last_error().unwrap();
    assert_eq!(notice.kind, ErrorKind::Validation);
    assert!(notice.message.contains("expected 8192 values, got 8191"));
    assert_eq!(pipeline.ingestor().stats().frames_rejected, 1);
}

#[test]
fn test_out_of_range_rejected_then_recovered() {
    let (mut pipeline, _) = connected_pipeline();
    let mut psd = vec![0.5; FRAME_LEN];
    psd[100] = 1.5;
    let bad = serde_json::json!({ "psd": psd, "classification": "Bluetooth" });
    pipeline.on_transport_event(TransportEvent::Message(bad.to_string()));

    assert!(!pipeline.on_tick());
    assert_eq!(pipeline.ui().last_error().unwrap().kind, ErrorKind::Validation);
    // Rejected frames do not touch the classification
    assert_eq!(pipeline.ui().classification(), &Classification::Unknown);

    pipeline.on_transport_event(TransportEvent::Message(uniform_message(0.5)));
    assert!(pipeline.on_tick());
    assert_eq!(pipeline.ui().last_error(), None);
}

#[test]
fn test_clear_resets_to_background() {
    let (mut pipeline, _) = connected_pipeline();
    for _ in 0..3 {
        pipeline.on_transport_event(TransportEvent::Message(uniform_message(1.0)));
        pipeline.on_tick();
    }
    pipeline.clear();
    pipeline.on_tick();
    assert!(pipeline.canvas().buffer().pixels().iter().all(|&px| px == BACKGROUND));
}

#[test]
fn test_request_update_wire_format() {
    let (mut pipeline, transport) = connected_pipeline();
    pipeline.request_update().unwrap();
    assert_eq!(*transport.sent.borrow(), vec![r#"{"type":"request_update"}"#.to_string()]);
}

#[test]
fn test_abnormal_close_surfaces_connection_error() {
    let (mut pipeline, transport) = connected_pipeline();
    pipeline.on_transport_event(TransportEvent::Closed(
        psd_waterfall::core::CloseInfo::abnormal("connection reset"),
    ));

    assert_eq!(pipeline.status(), ConnectionStatus::Error);
    assert_eq!(pipeline.ui().connection_status(), ConnectionStatus::Error);
    assert_eq!(pipeline.ui().last_error().unwrap().kind, ErrorKind::Connection);

    assert!(pipeline.request_update().is_err());
    assert!(transport.sent.borrow().is_empty());
}
