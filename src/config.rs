use std::net::{IpAddr, Ipv4Addr};

pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0} must be set")]
	Missing(&'static str),
	#[error("{name} is not valid: {value:?}")]
	Invalid { name: &'static str, value: String },
}

/// Runtime configuration, read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct Config {
	pub database_url: String,
	pub host: IpAddr,
	pub port: u16,
	/// When set, traces and metrics are exported to this OTLP collector.
	pub otlp_endpoint: Option<String>,
}

impl Config {
	pub fn from_env() -> Result<Self, Error> {
		dotenvy::dotenv().ok();

		Self::from_lookup(|name| std::env::var(name).ok())
	}

	fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
		let database_url = lookup("DATABASE_URL").ok_or(Error::Missing("DATABASE_URL"))?;

		let host = match lookup("HOST") {
			Some(value) => value.parse::<IpAddr>().map_err(|_| Error::Invalid {
				name: "HOST",
				value,
			})?,
			None => DEFAULT_HOST,
		};

		let port = match lookup("PORT") {
			Some(value) => value.parse::<u16>().map_err(|_| Error::Invalid {
				name: "PORT",
				value,
			})?,
			None => DEFAULT_PORT,
		};

		let otlp_endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|value| !value.is_empty());

		Ok(Self {
			database_url,
			host,
			port,
			otlp_endpoint,
		})
	}
}
