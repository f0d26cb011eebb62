//! Platform-agnostic core - shared by the CLI, the GUI and the mock producer

pub mod colormap;
pub mod downsample;
pub mod errors;
pub mod events;
pub mod frame;
pub mod ingest;
pub mod parser;
pub mod pipeline;
pub mod ui_state;
pub mod waterfall;

pub use colormap::{build_color_table, intensity_index, ColorTable, Rgba};
pub use downsample::{downsample, downsample_into};
pub use errors::{
    ConnectionError, ErrorKind, PipelineError, RenderError, TransportError, ValidationError,
};
pub use events::{CloseInfo, PipelineEvent, TransportEvent};
pub use frame::{Classification, Frame, FRAME_LEN};
pub use ingest::{IngestStats, StreamIngestor, Transport};
pub use parser::{parse_frame, ControlMessage, FrameMessage};
pub use pipeline::{DiagnosticsSnapshot, Pipeline};
pub use ui_state::{classification_color, ErrorNotice, UiState};
pub use waterfall::{CanvasStats, Headless, RenderSurface, WaterfallBuffer, WaterfallCanvas, BACKGROUND};
