use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid script {}: {source}", path.display())]
    Script {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("step {step}: {source}")]
    Step {
        step: usize,
        #[source]
        source: tablebind::Error,
    },

    #[error(transparent)]
    Table(#[from] tablebind::Error),
}
