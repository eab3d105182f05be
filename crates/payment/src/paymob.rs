//! Paymob Accept client
//!
//! The provider flow is three sequential steps: create an order, request
//! a payment key for it, then present the hosted checkout keyed by that
//! token. Any step failing aborts the remainder. Success is established
//! only by querying the order status afterwards; closing the checkout
//! surface proves nothing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use clean_hurghada_config::PaymobSettings;
use clean_hurghada_core::{
    BillingDetails, PaymentGateway, PaymentOutcome, PaymentRequest, PendingPayment,
};

use crate::PaymentError;

/// Configuration for the Paymob client
#[derive(Debug, Clone)]
pub struct PaymobConfig {
    /// API key (from PAYMOB_API_KEY or settings)
    pub api_key: String,
    /// Card/wallet integration id
    pub integration_id: String,
    /// API endpoint (for testing)
    pub endpoint: String,
    /// ISO currency code
    pub currency: String,
    /// Payment key expiration in seconds
    pub expiration_secs: u64,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for PaymobConfig {
    fn default() -> Self {
        Self::from_settings(&PaymobSettings::default())
    }
}

impl PaymobConfig {
    /// Build the config from loaded settings
    pub fn from_settings(settings: &PaymobSettings) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            integration_id: settings.integration_id.clone(),
            endpoint: settings.endpoint.clone(),
            currency: settings.currency.clone(),
            expiration_secs: settings.expiration_secs,
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    /// Set credentials
    pub fn with_credentials(
        mut self,
        api_key: impl Into<String>,
        integration_id: impl Into<String>,
    ) -> Self {
        self.api_key = api_key.into();
        self.integration_id = integration_id.into();
        self
    }

    /// Set the endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// Paymob Accept payment gateway
#[derive(Clone)]
pub struct PaymobClient {
    config: PaymobConfig,
    client: Client,
}

impl PaymobClient {
    /// Create a new Paymob client
    ///
    /// Credentials are checked at call time so the rest of the system can
    /// run without payments configured; a missing key is reported to the
    /// customer when they actually try to pay.
    pub fn new(config: PaymobConfig) -> Result<Self, PaymentError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    fn require_credentials(&self) -> Result<(), PaymentError> {
        if self.config.api_key.is_empty() || self.config.integration_id.is_empty() {
            return Err(PaymentError::Configuration(
                "PAYMOB_API_KEY / PAYMOB_INTEGRATION_ID not set".to_string(),
            ));
        }
        Ok(())
    }

    /// Step 1: create an order for the amount
    async fn create_order(&self, request: &PaymentRequest) -> Result<u64, PaymentError> {
        let body = CreateOrderRequest {
            auth_token: &self.config.api_key,
            delivery_needed: "false",
            amount_cents: request.amount_cents,
            currency: &request.currency,
            items: Vec::new(),
        };

        let response = self
            .client
            .post(format!("{}/api/ecommerce/orders", self.config.endpoint))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PaymentError::Api(format!(
                "Order creation failed: HTTP {}: {}",
                status, error_text
            )));
        }

        let order: CreateOrderResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))?;

        tracing::debug!(order_id = order.id, "Paymob order created");
        Ok(order.id)
    }

    /// Step 2: request a payment key for the order
    async fn request_payment_key(
        &self,
        order_id: u64,
        request: &PaymentRequest,
    ) -> Result<String, PaymentError> {
        let body = PaymentKeyRequest {
            auth_token: &self.config.api_key,
            amount_cents: request.amount_cents,
            expiration: self.config.expiration_secs,
            order_id,
            billing_data: WireBillingData::from_billing(&request.billing),
            currency: &request.currency,
            integration_id: &self.config.integration_id,
        };

        let response = self
            .client
            .post(format!(
                "{}/api/acceptance/payment_keys",
                self.config.endpoint
            ))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PaymentError::Api(format!(
                "Payment key request failed: HTTP {}: {}",
                status, error_text
            )));
        }

        let key: PaymentKeyResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))?;

        Ok(key.token)
    }

    /// Step 3: hosted checkout URL for a payment token
    fn checkout_url(&self, payment_token: &str) -> String {
        format!(
            "{}/api/acceptance/iframes/{}?payment_token={}",
            self.config.endpoint, self.config.integration_id, payment_token
        )
    }
}

#[async_trait]
impl PaymentGateway for PaymobClient {
    async fn initiate(
        &self,
        request: PaymentRequest,
    ) -> clean_hurghada_core::Result<PendingPayment> {
        self.require_credentials()?;

        // Strictly sequential: a failed order creation must not be
        // followed by a payment-key request.
        let order_id = self.create_order(&request).await?;
        let token = self.request_payment_key(order_id, &request).await?;

        tracing::info!(
            order_id,
            amount_cents = request.amount_cents,
            "Payment initiated"
        );

        Ok(PendingPayment {
            order_id: order_id.to_string(),
            checkout_url: self.checkout_url(&token),
        })
    }

    async fn confirm(&self, order_id: &str) -> clean_hurghada_core::Result<PaymentOutcome> {
        self.require_credentials()?;

        let response = self
            .client
            .get(format!(
                "{}/api/ecommerce/orders/{}",
                self.config.endpoint, order_id
            ))
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.config.api_key),
            )
            .send()
            .await
            .map_err(PaymentError::from)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PaymentError::Api(format!(
                "Order status query failed: HTTP {}: {}",
                status, error_text
            ))
            .into());
        }

        let order: OrderStatusResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))?;

        let payment_status = order.payment_status.unwrap_or_default().to_uppercase();
        let outcome = match payment_status.as_str() {
            "PAID" => PaymentOutcome::Confirmed {
                transaction_id: order.id.to_string(),
            },
            "DECLINED" | "VOIDED" | "REFUNDED" => PaymentOutcome::Declined {
                reason: payment_status.to_lowercase(),
            },
            _ => PaymentOutcome::Pending,
        };

        tracing::info!(order_id, ?outcome, "Order status polled");
        Ok(outcome)
    }
}

// Paymob API types

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    auth_token: &'a str,
    delivery_needed: &'a str,
    amount_cents: u64,
    currency: &'a str,
    items: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    id: u64,
}

#[derive(Debug, Serialize)]
struct PaymentKeyRequest<'a> {
    auth_token: &'a str,
    amount_cents: u64,
    expiration: u64,
    order_id: u64,
    billing_data: WireBillingData,
    currency: &'a str,
    integration_id: &'a str,
}

#[derive(Debug, Serialize)]
struct WireBillingData {
    email: String,
    first_name: String,
    last_name: String,
    phone_number: String,
    city: String,
    country: String,
    street: String,
}

impl WireBillingData {
    /// Map the customer's billing details onto the provider's schema.
    ///
    /// The provider requires every field; missing pieces fall back to the
    /// service's home city.
    fn from_billing(billing: &BillingDetails) -> Self {
        let mut names = billing.name.split_whitespace();
        let first_name = names.next().unwrap_or("Client").to_string();
        let last_name = {
            let rest = names.collect::<Vec<_>>().join(" ");
            if rest.is_empty() {
                "User".to_string()
            } else {
                rest
            }
        };
        let city = if billing.city.is_empty() {
            "Hurghada".to_string()
        } else {
            billing.city.clone()
        };

        Self {
            email: "user@example.com".to_string(),
            first_name,
            last_name,
            phone_number: billing.phone.clone(),
            city,
            country: "EGY".to_string(),
            street: "Hurghada".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PaymentKeyResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct OrderStatusResponse {
    id: u64,
    #[serde(default)]
    payment_status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(endpoint: &str) -> PaymobConfig {
        PaymobConfig::default()
            .with_credentials("test-api-key", "12345")
            .with_endpoint(endpoint)
    }

    fn test_request() -> PaymentRequest {
        PaymentRequest::egp(
            1150,
            BillingDetails::new("Mona Adel Hassan", "+201009876543", "El Kawther"),
        )
    }

    #[test]
    fn test_billing_data_mapping() {
        let billing = BillingDetails::new("Mona Adel Hassan", "+201009876543", "");
        let wire = WireBillingData::from_billing(&billing);
        assert_eq!(wire.first_name, "Mona");
        assert_eq!(wire.last_name, "Adel Hassan");
        assert_eq!(wire.city, "Hurghada");
        assert_eq!(wire.country, "EGY");

        let single = WireBillingData::from_billing(&BillingDetails::new("Omar", "+20", "El Gouna"));
        assert_eq!(single.first_name, "Omar");
        assert_eq!(single.last_name, "User");
        assert_eq!(single.city, "El Gouna");
    }

    #[tokio::test]
    async fn test_missing_credentials_rejected_at_call_time() {
        let config = PaymobConfig::default()
            .with_credentials("", "")
            .with_endpoint("http://localhost:1");
        let client = PaymobClient::new(config).unwrap();

        let err = client.initiate(test_request()).await.err().unwrap();
        assert!(err.to_string().contains("PAYMOB_API_KEY"));
    }

    #[tokio::test]
    async fn test_initiate_runs_order_then_payment_key() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/ecommerce/orders"))
            .and(body_partial_json(serde_json::json!({
                "auth_token": "test-api-key",
                "delivery_needed": "false",
                "amount_cents": 115000,
                "currency": "EGP"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 987654
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/acceptance/payment_keys"))
            .and(body_partial_json(serde_json::json!({
                "order_id": 987654,
                "integration_id": "12345",
                "billing_data": {"first_name": "Mona", "city": "El Kawther", "country": "EGY"}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "token": "pay-token-abc"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = PaymobClient::new(test_config(&server.uri())).unwrap();
        let pending = client.initiate(test_request()).await.unwrap();

        assert_eq!(pending.order_id, "987654");
        assert!(pending
            .checkout_url
            .ends_with("/api/acceptance/iframes/12345?payment_token=pay-token-abc"));
    }

    #[tokio::test]
    async fn test_order_failure_halts_the_chain() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/ecommerce/orders"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad auth token"))
            .mount(&server)
            .await;

        // The payment-key step must never run when the order step fails.
        Mock::given(method("POST"))
            .and(path("/api/acceptance/payment_keys"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let client = PaymobClient::new(test_config(&server.uri())).unwrap();
        let err = client.initiate(test_request()).await.err().unwrap();
        assert!(err.to_string().contains("Order creation failed"));
    }

    #[tokio::test]
    async fn test_confirm_maps_order_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/ecommerce/orders/987654"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 987654,
                "payment_status": "PAID"
            })))
            .mount(&server)
            .await;

        let client = PaymobClient::new(test_config(&server.uri())).unwrap();
        let outcome = client.confirm("987654").await.unwrap();
        assert_eq!(
            outcome,
            PaymentOutcome::Confirmed {
                transaction_id: "987654".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_confirm_unpaid_is_pending_not_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/ecommerce/orders/555"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 555,
                "payment_status": "UNPAID"
            })))
            .mount(&server)
            .await;

        let client = PaymobClient::new(test_config(&server.uri())).unwrap();
        let outcome = client.confirm("555").await.unwrap();
        assert_eq!(outcome, PaymentOutcome::Pending);
        assert!(!outcome.is_confirmed());
    }

    #[tokio::test]
    async fn test_confirm_declined() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/ecommerce/orders/777"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 777,
                "payment_status": "DECLINED"
            })))
            .mount(&server)
            .await;

        let client = PaymobClient::new(test_config(&server.uri())).unwrap();
        let outcome = client.confirm("777").await.unwrap();
        assert!(matches!(outcome, PaymentOutcome::Declined { .. }));
    }
}
