use std::sync::Arc;

use crate::adapters::{FsDownloadAdapter, LocalMediaHost, ProbeLibavAdapter, UreqTrimTransport};
use crate::app::{
    editor_session::EditorSession, export_interactor::ExportInteractor,
    probe_interactor::ProbeInteractor,
};
use crate::config_initialization::ClientConfig;
use crate::error::ClientResult;
use crate::ports::{DownloadPort, MediaHostPort, ProbePort, TrimTransportPort};

pub trait AppContainer: Send + Sync {
    fn probe_interactor(&self) -> Arc<ProbeInteractor>;
    fn export_interactor(&self) -> Arc<ExportInteractor>;
    /// A fresh session sharing this container's adapters
    fn editor_session(&self) -> EditorSession;
}

pub struct DefaultAppContainer {
    host: Arc<dyn MediaHostPort>,
    probe_interactor: Arc<ProbeInteractor>,
    export_interactor: Arc<ExportInteractor>,
}

impl DefaultAppContainer {
    /// Initialize libav and wire the production adapters from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        crate::init()?;

        let host: Arc<dyn MediaHostPort> = Arc::new(LocalMediaHost::new());
        let probe_port = Arc::new(ProbeLibavAdapter::new(Arc::clone(&host)));
        let transport = Arc::new(UreqTrimTransport::new(
            &config.backend_url,
            &config.trim_path,
            config.request_timeout(),
        ));
        let download = Arc::new(FsDownloadAdapter::new(
            config.download_dir.clone(),
            config.overwrite,
        ));

        Ok(Self::with_ports(
            host,
            probe_port as Arc<dyn ProbePort>,
            transport as Arc<dyn TrimTransportPort>,
            download as Arc<dyn DownloadPort>,
            config,
        ))
    }

    /// Wire arbitrary port implementations
    pub fn with_ports(
        host: Arc<dyn MediaHostPort>,
        probe_port: Arc<dyn ProbePort>,
        transport: Arc<dyn TrimTransportPort>,
        download: Arc<dyn DownloadPort>,
        config: &ClientConfig,
    ) -> Self {
        let probe_interactor = Arc::new(ProbeInteractor::new(probe_port, config.probe_timeout()));
        let export_interactor = Arc::new(ExportInteractor::new(transport, download));

        Self {
            host,
            probe_interactor,
            export_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn probe_interactor(&self) -> Arc<ProbeInteractor> {
        Arc::clone(&self.probe_interactor)
    }

    fn export_interactor(&self) -> Arc<ExportInteractor> {
        Arc::clone(&self.export_interactor)
    }

    fn editor_session(&self) -> EditorSession {
        EditorSession::new(
            Arc::clone(&self.host),
            Arc::clone(&self.probe_interactor),
            Arc::clone(&self.export_interactor),
        )
    }
}
