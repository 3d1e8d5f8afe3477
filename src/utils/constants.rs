use dotenvy::dotenv;
use lazy_static::lazy_static;
use secrecy::Secret;
use std::{env as std_env, time::Duration};

lazy_static! {
    pub static ref DATABASE_URL: Secret<String> = get_db_url();
    pub static ref APP_PORT: u16 = get_app_port();
    pub static ref NOTIFIER_BASE_URL: String = load_or_default(
        env::NOTIFIER_BASE_URL_ENV_VAR,
        DEFAULT_NOTIFIER_BASE_URL
    );
}

fn load_env() {
    dotenv().ok();
}

fn get_db_url() -> Secret<String> {
    load_env();
    let db_url = std_env::var(env::DATABASE_URL_ENV_VAR)
        .expect("DATABASE_URL must be set.");
    if db_url.is_empty() {
        panic!("DATABASE_URL must not be empty.");
    }
    Secret::new(db_url)
}

fn get_app_port() -> u16 {
    load_or_default(env::APP_PORT_ENV_VAR, &DEFAULT_APP_PORT.to_string())
        .parse()
        .expect("APP_PORT must be a valid port number.")
}

fn load_or_default(variable_name: &str, default_value: &str) -> String {
    load_env();

    match std_env::var(variable_name) {
        Ok(value) => {
            if value.is_empty() {
                String::from(default_value)
            } else {
                value
            }
        }
        Err(_) => String::from(default_value),
    }
}

pub mod env {
    pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";
    pub const APP_PORT_ENV_VAR: &str = "APP_PORT";
    pub const NOTIFIER_BASE_URL_ENV_VAR: &str = "NOTIFIER_BASE_URL";
}

pub const DEFAULT_APP_PORT: u16 = 8080;
pub const DEFAULT_NOTIFIER_BASE_URL: &str = "http://localhost:9000";

/// How long `stop` waits for in-flight requests before giving up.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

pub mod prod {
    pub mod notifier {
        use std::time::Duration;

        pub const TIMEOUT: Duration = std::time::Duration::from_secs(10);
    }
}

pub mod test {
    pub const APP_PORT: u16 = 0;
    pub mod notifier {
        use std::time::Duration;

        pub const TIMEOUT: Duration = std::time::Duration::from_millis(200);
    }
}
