// Application layer - Use case interactors and session state

pub mod container;
pub mod editor_session;
pub mod export_interactor;
pub mod playback;
pub mod probe_interactor;
pub mod range_selector;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use editor_session::{EditorSession, SessionStatus};
pub use export_interactor::ExportInteractor;
pub use playback::{PlaybackMode, PlaybackSurface};
pub use probe_interactor::{ProbeInteractor, ProbeReport};
pub use range_selector::{ControlKind, RangeControl, RangeSelector};
