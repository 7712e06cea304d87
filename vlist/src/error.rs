/// Setup-time misconfiguration. Fatal: no valid height can ever be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("no height source configured: supply `item_height` or `estimate_height`")]
    MissingHeightSource,
}
