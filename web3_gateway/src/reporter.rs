use std::error::Error;

use prometheus::{IntCounterVec, Opts, Registry};

use crate::config::Network;

pub const WEB3_ERRORS_METRIC: &str = "web3_errors_total";

/// Sink for operational web3 failures. Called once per failed call, before the error
/// is handed back to the caller.
pub trait FailureReporter: Send + Sync {
    fn report(&self, error: &(dyn Error + 'static), network: Network);
}

/// Counts failures per network and logs them under the `web3` target.
#[derive(Clone, Debug)]
pub struct Web3ErrorReporter {
    web3_errors: IntCounterVec,
}

impl Web3ErrorReporter {
    /// `web3_errors` should carry a single `network` label. A counter with any other label
    /// set is never incremented; the failure is still logged.
    pub fn new(web3_errors: IntCounterVec) -> Self {
        Self { web3_errors }
    }

    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let web3_errors = IntCounterVec::new(
            Opts::new(WEB3_ERRORS_METRIC, "Number of failed web3 calls per network"),
            &["network"],
        )?;
        registry.register(Box::new(web3_errors.clone()))?;

        Ok(Self::new(web3_errors))
    }

    pub fn error_count(&self, network: Network) -> u64 {
        self.web3_errors
            .get_metric_with_label_values(&[network.as_str()])
            .map(|counter| counter.get())
            .unwrap_or(0)
    }
}

impl FailureReporter for Web3ErrorReporter {
    fn report(&self, error: &(dyn Error + 'static), network: Network) {
        match self
            .web3_errors
            .get_metric_with_label_values(&[network.as_str()])
        {
            Ok(counter) => counter.inc(),
            Err(e) => {
                tracing::warn!(target: "web3", %network, error = %e, "web3 error counter unusable")
            }
        }
        tracing::error!(target: "web3", %network, error = %error, "web3 error");
    }
}

#[cfg(test)]
mod tests {
    use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

    use crate::config::Network;

    use super::{FailureReporter, Web3ErrorReporter};

    #[test]
    fn test_report_counts_per_network() {
        let registry = Registry::new();
        let reporter = Web3ErrorReporter::register(&registry).unwrap();

        let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        reporter.report(&err, Network::Rinkeby);
        reporter.report(&err, Network::Rinkeby);

        assert_eq!(reporter.error_count(Network::Rinkeby), 2);
        assert_eq!(reporter.error_count(Network::Mainnet), 0);

        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&registry.gather(), &mut buf)
            .unwrap();
        let exposition = String::from_utf8(buf).unwrap();
        assert!(exposition.contains(r#"web3_errors_total{network="rinkeby"} 2"#));
    }

    #[test]
    fn test_report_with_mislabelled_counter_does_not_panic() {
        let counter = IntCounterVec::new(
            Opts::new("web3_errors_total", "Number of failed web3 calls"),
            &["network", "service"],
        )
        .unwrap();
        let reporter = Web3ErrorReporter::new(counter.clone());

        let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        reporter.report(&err, Network::Mainnet);

        assert_eq!(reporter.error_count(Network::Mainnet), 0);
        assert_eq!(counter.with_label_values(&["mainnet", "gateway"]).get(), 0);
    }

    #[test]
    fn test_register_twice_fails() {
        let registry = Registry::new();
        Web3ErrorReporter::register(&registry).unwrap();
        assert!(Web3ErrorReporter::register(&registry).is_err());
    }
}
