// Adapters - External system implementations

pub mod fs_download;
pub mod http_ureq;
pub mod local_host;
pub mod probe_libav;
pub mod toml_config;

// Re-export adapters
pub use fs_download::FsDownloadAdapter;
pub use http_ureq::UreqTrimTransport;
pub use local_host::LocalMediaHost;
pub use probe_libav::ProbeLibavAdapter;
pub use toml_config::TomlConfigAdapter;
