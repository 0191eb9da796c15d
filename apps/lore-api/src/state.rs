use std::sync::{Arc, OnceLock};

use color_eyre::eyre;

use lore_service::LoreService;

/// Shared handler state. The service slot is written exactly once at
/// startup; handlers that run against an unfilled slot answer with the
/// not-initialized error.
#[derive(Clone, Default)]
pub struct AppState {
	service: Arc<OnceLock<Arc<LoreService>>>,
}

impl AppState {
	pub fn uninitialized() -> Self {
		Self::default()
	}

	pub fn initialize(config: lore_config::Config) -> color_eyre::Result<Self> {
		let state = Self::default();
		let service = LoreService::initialize(config)?;

		state.install(service)?;

		Ok(state)
	}

	pub fn install(&self, service: LoreService) -> color_eyre::Result<()> {
		self.service
			.set(Arc::new(service))
			.map_err(|_| eyre::eyre!("Service is already initialized."))
	}

	pub fn service(&self) -> Option<Arc<LoreService>> {
		self.service.get().cloned()
	}
}
