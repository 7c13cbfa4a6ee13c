//! Fluent builder for constructing a [`NoiseDamageCalculator`].

use nd_core::NoiseConfig;
use nd_exposure::{ActivityExposure, LinkTraffic, ReceiverSet};
use nd_network::LinkNetwork;
use tracing::info;

use crate::{DamageResult, NoiseDamageCalculator, SpeedModel};

/// Fluent builder for [`NoiseDamageCalculator<S>`].
///
/// # Required inputs
///
/// - [`NoiseConfig`]: interval width, horizon, cost rate, …
/// - `S: SpeedModel`: e.g. [`FreeFlowSpeed`][crate::FreeFlowSpeed]
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                       |
/// |---------------------|-------------------------------|
/// | `.network(n)`       | `LinkNetwork::empty()`        |
/// | `.receivers(r)`     | no receivers                  |
/// | `.traffic(t)`       | no link entries               |
/// | `.exposure(e)`      | nobody present anywhere       |
/// | `.collect_events(b)`| `config.collect_events`       |
///
/// # Example
///
/// ```rust,ignore
/// let calc = NoiseDamageCalculatorBuilder::new(config, FreeFlowSpeed)
///     .network(network)
///     .receivers(receivers)
///     .traffic(traffic)
///     .exposure(exposure)
///     .build()?;
/// let report = calc.run(&mut NoopSink)?;
/// ```
pub struct NoiseDamageCalculatorBuilder<S: SpeedModel> {
    config:    NoiseConfig,
    speed:     S,
    network:   Option<LinkNetwork>,
    receivers: Option<ReceiverSet>,
    traffic:   Option<LinkTraffic>,
    exposure:  Option<ActivityExposure>,
}

impl<S: SpeedModel> NoiseDamageCalculatorBuilder<S> {
    pub fn new(config: NoiseConfig, speed: S) -> Self {
        Self {
            config,
            speed,
            network:   None,
            receivers: None,
            traffic:   None,
            exposure:  None,
        }
    }

    pub fn network(mut self, network: LinkNetwork) -> Self {
        self.network = Some(network);
        self
    }

    pub fn receivers(mut self, receivers: ReceiverSet) -> Self {
        self.receivers = Some(receivers);
        self
    }

    pub fn traffic(mut self, traffic: LinkTraffic) -> Self {
        self.traffic = Some(traffic);
        self
    }

    pub fn exposure(mut self, exposure: ActivityExposure) -> Self {
        self.exposure = Some(exposure);
        self
    }

    /// Override whether emitted events are retained in the report.
    pub fn collect_events(mut self, collect: bool) -> Self {
        info!("Collecting noise events set to {collect}");
        self.config.collect_events = collect;
        self
    }

    /// Validate the configuration and return a ready-to-run calculator.
    pub fn build(self) -> DamageResult<NoiseDamageCalculator<S>> {
        self.config.validate()?;

        Ok(NoiseDamageCalculator {
            config:    self.config,
            network:   self.network.unwrap_or_else(LinkNetwork::empty),
            receivers: self.receivers.unwrap_or_default(),
            traffic:   self.traffic.unwrap_or_default(),
            exposure:  self.exposure.unwrap_or_default(),
            speed:     self.speed,
        })
    }
}
