//! Events delivered to the UI thread

use glaze_protocol::RedrawCommand;

/// User events carried by the winit event loop
#[derive(Debug)]
pub enum GlazeEvent {
    /// One decoded redraw batch from the editor
    Batch(Vec<RedrawCommand>),
    /// The editor's redraw stream ended
    EditorClosed,
}
