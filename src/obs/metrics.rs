// self
use crate::{auth::GrantType, obs::FlowOutcome};

/// Records an exchange outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(grant: GrantType, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"jobadder_client_flow_total",
			"flow" => grant.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (grant, outcome);
	}
}
