//! RTL booking backend client
//!
//! Provides login, route listings, live vehicle coordinates, ticket products,
//! booking and payment against the RTL mobile API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use domain::VehicleType;
use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::config::RtlConfig;
use crate::crypto::encrypt_login_payload;
use crate::error::RtlError;
use crate::models::{
    BookTicketRequest, BookTicketResult, BusRoutes, LiveCoordinates, LoginRequest, LoginResponse,
    PaymentRequest, PaymentResult, Product, ProductDetails, ProductDetailsRequest,
    PurchaseOutcome, RouteCodeRequest, VesselRoutes, route_details_path,
};
use crate::token::{TokenStore, is_token_expired};

const LOGIN_PATH: &str = "/mobile/v3/customers/login";
const BOOK_TICKET_PATH: &str = "/booking/v1/vessel/bookticket";
const PAYMENT_PATH: &str = "/booking/v1/vessel/payment";

/// Card payment
const PAYMENT_TYPE_CARD: u8 = 1;
/// Do not save the card again
const TOKENIZE_NO: u8 = 2;

/// Trait for RTL backend clients
#[async_trait]
pub trait RtlClient: Send + Sync {
    /// Log in with the configured credentials and return the issued JWT
    async fn login(&self) -> Result<String, RtlError>;

    /// Reuse the cached token when still valid, otherwise log in and cache
    async fn login_if_expired(&self) -> Result<(), RtlError>;

    /// Log in unconditionally and replace the cached token
    ///
    /// Needed when the server revokes a token before its `exp` claim.
    async fn refresh_login(&self) -> Result<(), RtlError>;

    /// List bus routes with stops and timings
    async fn bus_routes(&self) -> Result<BusRoutes, RtlError>;

    /// List ferry routes with terminals and fares
    async fn vessel_routes(&self) -> Result<VesselRoutes, RtlError>;

    /// Current positions of vehicles on a route
    async fn live_coordinates(
        &self,
        route_code: &str,
        vehicle_type: VehicleType,
    ) -> Result<LiveCoordinates, RtlError>;

    /// Ticket products sold for a route
    async fn product_details(
        &self,
        route_code: &str,
        vehicle_type: VehicleType,
    ) -> Result<ProductDetails, RtlError>;

    /// Create a booking for `count` tickets of a product
    async fn book_ticket(
        &self,
        route_code: &str,
        product_code: &str,
        count: u32,
    ) -> Result<BookTicketResult, RtlError>;

    /// Pay a booking, using the first saved card when `card_id` is `None`
    async fn pay_booking(
        &self,
        booking: &BookTicketResult,
        card_id: Option<i64>,
    ) -> Result<PaymentResult, RtlError>;

    /// Book one ticket, pay for it and open the payment URL
    async fn purchase_ticket(
        &self,
        details: &ProductDetails,
        product: &Product,
        card_id: Option<i64>,
    ) -> Result<PurchaseOutcome, RtlError>;
}

/// HTTP client for the RTL mobile backend
pub struct HttpRtlClient {
    client: Client,
    config: RtlConfig,
    token: RwLock<Option<SecretString>>,
    token_store: TokenStore,
}

impl std::fmt::Debug for HttpRtlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRtlClient")
            .field("config", &self.config)
            .field("authenticated", &self.is_authenticated())
            .field("token_store", &self.token_store)
            .finish_non_exhaustive()
    }
}

impl HttpRtlClient {
    /// Create a new RTL client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &RtlConfig) -> Result<Self, RtlError> {
        config.validate().map_err(RtlError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RtlError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            token_store: TokenStore::new(config.token_file.clone()),
            config: config.clone(),
            token: RwLock::new(None),
        })
    }

    /// Use an already issued token instead of logging in
    #[must_use]
    pub fn with_token(self, token: impl Into<String>) -> Self {
        *self.token.write() = Some(SecretString::from(token.into()));
        self
    }

    /// Whether a token is currently held in memory
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    /// The client configuration
    #[must_use]
    pub const fn config(&self) -> &RtlConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn email(&self) -> Result<&str, RtlError> {
        self.config
            .email
            .as_deref()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| RtlError::ConfigurationError("email is not configured".to_string()))
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, RtlError> {
        let guard = self.token.read();
        let token = guard.as_ref().ok_or(RtlError::NotAuthenticated)?;
        Ok(request.bearer_auth(token.expose_secret()))
    }

    /// Send a request, mapping transport errors
    async fn send(&self, request: RequestBuilder) -> Result<Response, RtlError> {
        request
            .send()
            .await
            .map_err(|e| RtlError::from_transport(&e, self.config.timeout_secs))
    }

    /// Check the status and decode a JSON body
    async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, RtlError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(RtlError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RtlError::AuthenticationFailed(format!("HTTP {status}")));
        }

        if !status.is_success() {
            return Err(RtlError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RtlError::ParseError(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| RtlError::ParseError(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RtlError> {
        let request = self.authorized(self.client.get(self.url(path)))?;
        let response = self.send(request).await?;
        Self::parse_json(response).await
    }

    async fn post_json<B>(&self, path: &str, body: &B) -> Result<Response, RtlError>
    where
        B: serde::Serialize + Sync + ?Sized,
    {
        let request = self.authorized(self.client.post(self.url(path)).json(body))?;
        self.send(request).await
    }

    fn encrypted_login_body(&self) -> Result<String, RtlError> {
        let email = self.email()?;
        let password = self
            .config
            .password
            .as_ref()
            .ok_or_else(|| RtlError::ConfigurationError("password is not configured".to_string()))?;

        let plaintext = serde_json::to_string(&LoginRequest {
            email,
            password: password.expose_secret(),
            channel_id: 0,
            version_name: &self.config.version_name,
        })
        .map_err(|e| RtlError::Encryption(e.to_string()))?;

        encrypt_login_payload(
            &plaintext,
            self.config.login_key.expose_secret().as_bytes(),
            self.config.login_iv.expose_secret().as_bytes(),
        )
    }
}

#[async_trait]
impl RtlClient for HttpRtlClient {
    #[instrument(skip(self))]
    async fn login(&self) -> Result<String, RtlError> {
        let body = self.encrypted_login_body()?;

        debug!("Logging in");

        let response = self
            .send(self.client.put(self.url(LOGIN_PATH)).body(body))
            .await?;

        let login: LoginResponse = Self::parse_json(response).await?;
        let jwt = login
            .jwt
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RtlError::AuthenticationFailed("response carried no jwt".to_string()))?;

        *self.token.write() = Some(SecretString::from(jwt.clone()));
        info!("Logged in");
        Ok(jwt)
    }

    #[instrument(skip(self), fields(token_file = %self.token_store.path().display()))]
    async fn login_if_expired(&self) -> Result<(), RtlError> {
        if let Some(cached) = self.token_store.load().await? {
            if !is_token_expired(&cached, Utc::now()) {
                info!("Cached token is valid");
                *self.token.write() = Some(SecretString::from(cached));
                return Ok(());
            }
        }

        info!("Token is expired or missing, logging in again");
        self.refresh_login().await
    }

    #[instrument(skip(self), fields(token_file = %self.token_store.path().display()))]
    async fn refresh_login(&self) -> Result<(), RtlError> {
        let token = self.login().await?;
        self.token_store.save(&token).await?;
        info!("New token saved");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn bus_routes(&self) -> Result<BusRoutes, RtlError> {
        let routes: BusRoutes = self.get_json(route_details_path(VehicleType::Bus)).await?;
        debug!(count = routes.route_response.len(), "Bus routes fetched");
        Ok(routes)
    }

    #[instrument(skip(self))]
    async fn vessel_routes(&self) -> Result<VesselRoutes, RtlError> {
        let routes: VesselRoutes = self
            .get_json(route_details_path(VehicleType::Vessel))
            .await?;
        debug!(count = routes.route_response.len(), "Vessel routes fetched");
        Ok(routes)
    }

    #[instrument(skip(self))]
    async fn live_coordinates(
        &self,
        route_code: &str,
        vehicle_type: VehicleType,
    ) -> Result<LiveCoordinates, RtlError> {
        let path = format!(
            "/booking/v1/{}/livecoordinates",
            vehicle_type.path_segment()
        );
        let response = self
            .post_json(&path, &RouteCodeRequest { route_code })
            .await?;
        let live: LiveCoordinates = Self::parse_json(response).await?;
        debug!(count = live.bus_list.len(), "Live coordinates fetched");
        Ok(live)
    }

    #[instrument(skip(self))]
    async fn product_details(
        &self,
        route_code: &str,
        vehicle_type: VehicleType,
    ) -> Result<ProductDetails, RtlError> {
        let path = format!("/booking/v1/{}/productdetails", vehicle_type.path_segment());
        let body = ProductDetailsRequest {
            route_code,
            device_type: 0,
        };
        let response = self.post_json(&path, &body).await?;

        if response.status() == StatusCode::INTERNAL_SERVER_ERROR {
            warn!(route_code, "Product lookup returned HTTP 500");
            return Err(RtlError::BlankData(
                "[500] You probably sent an invalid route code".to_string(),
            ));
        }

        Self::parse_json(response).await
    }

    #[instrument(skip(self))]
    async fn book_ticket(
        &self,
        route_code: &str,
        product_code: &str,
        count: u32,
    ) -> Result<BookTicketResult, RtlError> {
        let body = BookTicketRequest {
            route_code,
            product_code,
            ticket_count: count,
            email: self.email()?,
            device_type: 0,
        };
        let response = self
            .post_json(BOOK_TICKET_PATH, &body)
            .await?;
        let booking: BookTicketResult = Self::parse_json(response).await?;
        info!(booking_id = %booking.booking_id, "Ticket booked");
        Ok(booking)
    }

    #[instrument(skip(self, booking), fields(booking_id = %booking.booking_id))]
    async fn pay_booking(
        &self,
        booking: &BookTicketResult,
        card_id: Option<i64>,
    ) -> Result<PaymentResult, RtlError> {
        let card_id = match card_id {
            Some(id) => id,
            None => {
                booking
                    .first_card()
                    .ok_or_else(|| {
                        RtlError::NoCardAvailable("There are no cards available".to_string())
                    })?
                    .card_id
            },
        };

        let body = PaymentRequest {
            booking_id: &booking.booking_id,
            card_id,
            payment_type: PAYMENT_TYPE_CARD,
            tokenize: TOKENIZE_NO,
        };
        let response = self
            .post_json(PAYMENT_PATH, &body)
            .await?;
        let payment: PaymentResult = Self::parse_json(response).await?;
        debug!(card_id, "Payment initiated");
        Ok(payment)
    }

    #[instrument(skip(self, details, product), fields(route = %details.code, product = %product.code))]
    async fn purchase_ticket(
        &self,
        details: &ProductDetails,
        product: &Product,
        card_id: Option<i64>,
    ) -> Result<PurchaseOutcome, RtlError> {
        let booking = self.book_ticket(&details.code, &product.code, 1).await?;
        let payment = self.pay_booking(&booking, card_id).await?;

        // The gateway URL may use an app-only scheme; only HTTP(S) is followed
        match self.client.get(&payment.url).send().await {
            Ok(response) => {
                debug!(status = %response.status(), "Payment page opened");
            },
            Err(e) if e.is_builder() => {
                debug!(url = %payment.url, "Payment URL is not an HTTP URL, not followed");
            },
            Err(e) => return Err(RtlError::from_transport(&e, self.config.timeout_secs)),
        }

        info!(booking_id = %booking.booking_id, "Ticket purchased");
        Ok(PurchaseOutcome { booking, payment })
    }
}
