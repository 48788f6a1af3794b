pub mod config;
pub mod errors;
pub mod imageops_ai;
pub mod model;
pub mod remove;
pub mod runner;
pub mod tracing_config;
pub mod traits;

pub mod mocks;

pub use config::Config;
pub use errors::{BgRemoveError, Result};
pub use model::U2Net;
pub use remove::remove;
pub use runner::Runner;
pub use traits::*;

/// Runner wired to the U^2-Net model at the configured model path.
pub fn u2net_runner(config: Config) -> Runner<U2Net> {
    let model = U2Net::new(&config.model_path);
    Runner::new(model, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u2net_runner_keeps_config_and_model_path() {
        let config = Config::new("a.png", "b.png", "models/u2net.onnx");

        let runner = u2net_runner(config.clone());

        assert_eq!(runner.config(), &config);
        assert_eq!(
            runner.segmenter().model_path(),
            std::path::Path::new("models/u2net.onnx")
        );
        assert!(!runner.segmenter().is_loaded());
    }
}
