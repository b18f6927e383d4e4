use std::env;
use std::str::FromStr;

/// What to do when deactivating a gate that upcoming flights still reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDeactivationPolicy {
    /// Refuse the deactivation while any scheduled/boarding flight holds the gate.
    Reject,
    /// Clear the gate from those flights, then deactivate.
    Unassign,
}

impl FromStr for GateDeactivationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(GateDeactivationPolicy::Reject),
            "unassign" => Ok(GateDeactivationPolicy::Unassign),
            other => Err(format!("unknown gate deactivation policy: {}", other)),
        }
    }
}

/// What happens to bookings when a flight is cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlightCancelPolicy {
    /// Leave bookings and baggage untouched.
    Retain,
    /// Delete the flight's bookings; baggage follows the ownership cascade.
    Purge,
}

impl FromStr for FlightCancelPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "retain" => Ok(FlightCancelPolicy::Retain),
            "purge" => Ok(FlightCancelPolicy::Purge),
            other => Err(format!("unknown flight cancel policy: {}", other)),
        }
    }
}

/// Whether baggage may be registered against a booking that has not checked in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaggageCheckinPolicy {
    /// Reject registration until the passenger is checked in.
    Strict,
    /// Allow it, but log a warning.
    Log,
}

impl FromStr for BaggageCheckinPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(BaggageCheckinPolicy::Strict),
            "log" => Ok(BaggageCheckinPolicy::Log),
            other => Err(format!("unknown baggage check-in policy: {}", other)),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub db_connect_timeout_secs: u64,
    pub db_acquire_timeout_secs: u64,
    pub gate_deactivation_policy: GateDeactivationPolicy,
    pub flight_cancel_policy: FlightCancelPolicy,
    pub baggage_checkin_policy: BaggageCheckinPolicy,
    pub flight_info_base_url: Option<String>,
    pub flight_info_api_key: Option<String>,
    pub flight_info_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET")
                .expect("JWT_SECRET must be set"),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "12".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a number"),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            db_connect_timeout_secs: env::var("DB_CONNECT_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("DB_CONNECT_TIMEOUT_SECS must be a number"),
            db_acquire_timeout_secs: env::var("DB_ACQUIRE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .expect("DB_ACQUIRE_TIMEOUT_SECS must be a number"),
            gate_deactivation_policy: env::var("GATE_DEACTIVATION_POLICY")
                .unwrap_or_else(|_| "reject".to_string())
                .parse()
                .expect("GATE_DEACTIVATION_POLICY must be reject or unassign"),
            flight_cancel_policy: env::var("FLIGHT_CANCEL_POLICY")
                .unwrap_or_else(|_| "retain".to_string())
                .parse()
                .expect("FLIGHT_CANCEL_POLICY must be retain or purge"),
            baggage_checkin_policy: env::var("BAGGAGE_CHECKIN_POLICY")
                .unwrap_or_else(|_| "strict".to_string())
                .parse()
                .expect("BAGGAGE_CHECKIN_POLICY must be strict or log"),
            flight_info_base_url: env::var("FLIGHT_INFO_BASE_URL").ok(),
            flight_info_api_key: env::var("FLIGHT_INFO_API_KEY").ok(),
            flight_info_timeout_secs: env::var("FLIGHT_INFO_TIMEOUT_SECS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .expect("FLIGHT_INFO_TIMEOUT_SECS must be a number"),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parsing_is_case_insensitive() {
        assert_eq!(
            "REJECT".parse::<GateDeactivationPolicy>(),
            Ok(GateDeactivationPolicy::Reject)
        );
        assert_eq!(
            "Unassign".parse::<GateDeactivationPolicy>(),
            Ok(GateDeactivationPolicy::Unassign)
        );
        assert_eq!("purge".parse::<FlightCancelPolicy>(), Ok(FlightCancelPolicy::Purge));
        assert_eq!("log".parse::<BaggageCheckinPolicy>(), Ok(BaggageCheckinPolicy::Log));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!("cascade".parse::<GateDeactivationPolicy>().is_err());
        assert!("drop".parse::<FlightCancelPolicy>().is_err());
        assert!("maybe".parse::<BaggageCheckinPolicy>().is_err());
    }
}
