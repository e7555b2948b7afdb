// self
#[cfg(feature = "tracing")] use crate::obs::FlowOutcome;
use crate::{_prelude::*, auth::GrantType};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used around token exchanges.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided grant + stage.
	pub fn new(grant: GrantType, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("jobadder_client.flow", flow = grant.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (grant, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits the end-of-exchange event. Error details are logged; token material never is.
pub fn log_flow_result<T>(grant: GrantType, result: &Result<T>) {
	#[cfg(feature = "tracing")]
	{
		match result {
			Ok(_) => tracing::debug!(
				flow = grant.as_str(),
				outcome = FlowOutcome::Success.as_str(),
				"token exchange completed"
			),
			Err(e) => tracing::warn!(
				flow = grant.as_str(),
				outcome = FlowOutcome::Failure.as_str(),
				error = %e,
				"token exchange failed"
			),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (grant, result);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn log_flow_result_accepts_both_outcomes() {
		log_flow_result::<()>(GrantType::RefreshToken, &Ok(()));
		log_flow_result::<()>(
			GrantType::RefreshToken,
			&Err(crate::error::ConfigError::MissingRefreshToken.into()),
		);
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = FlowSpan::new(GrantType::RefreshToken, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
