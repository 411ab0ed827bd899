//! Listing client implementation using reqwest.

use std::time::Duration;

use reqwest::blocking::Client;

use super::listing::{ListingClient, ListingResponse, TransportError};

/// Blocking HTTP client for the remote listing.
#[derive(Debug, Clone)]
pub struct HttpListingClient {
    client: Client,
}

impl HttpListingClient {
    /// Create a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl ListingClient for HttpListingClient {
    fn get(&self, url: &str) -> Result<ListingResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response
            .json::<ListingResponse>()
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}
