use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    host: String,
    port: u16,
}

impl Config {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn override_with(&mut self, host: Option<String>, port: Option<u16>) {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
