//! HTTP endpoints
//!
//! REST API over per-session conversations. The SPA drives the chat and
//! the three widgets exclusively through these routes.

use axum::{
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use clean_hurghada_agent::{
    AgentError, BookingDetailsForm, QuickAction, WidgetKind,
};
use clean_hurghada_config::{CleaningType, PropertyType};
use clean_hurghada_core::{ChatMessage, ImageAttachment, Language, PaymentOutcome};

use crate::session::ChatSession;
use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.settings.server.cors_origins,
        state.settings.server.cors_enabled,
    );

    Router::new()
        // Sessions
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        .route("/api/sessions/:id/language", post(set_language))
        .route("/api/sessions/:id/quick-action", post(quick_action))
        // Chat
        .route("/api/chat/:id", post(chat))
        // Calculator
        .route("/api/calculator/:id/open", post(calculator_open))
        .route("/api/calculator/:id/select", post(calculator_select))
        .route("/api/calculator/:id/quote", post(calculator_quote))
        // Booking
        .route("/api/booking/:id/open", post(booking_open))
        .route("/api/booking/:id/details", post(booking_details))
        .route("/api/booking/:id/back", post(booking_back))
        .route("/api/booking/:id/pay", post(booking_pay))
        .route("/api/booking/:id/confirm", post(booking_confirm))
        .route("/api/booking/:id/cancel", post(booking_cancel))
        // Rating
        .route("/api/rating/:id/open", post(rating_open))
        .route("/api/rating/:id", post(rating_submit))
        // Health
        .route("/health", get(health_check))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build the CORS layer from configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed.is_empty() {
        tracing::info!("No CORS origins configured, defaulting to localhost:3000");
        return CorsLayer::new()
            .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

// ----------------------------------------------------------------------
// Error plumbing
// ----------------------------------------------------------------------

/// JSON error response with a status code
struct ApiError(StatusCode, serde_json::Value);

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self(status, serde_json::json!({ "error": message }))
    }

    fn session_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "session not found")
    }

    fn busy() -> Self {
        Self::new(
            StatusCode::CONFLICT,
            "a response is already being generated for this session",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Validation(errors) => Self(
                StatusCode::UNPROCESSABLE_ENTITY,
                serde_json::json!({ "error": "validation", "fields": errors }),
            ),
            AgentError::NoActiveWidget(_) | AgentError::InvalidState(_) => {
                Self::new(StatusCode::CONFLICT, err.to_string())
            }
            AgentError::InvalidInput(_) => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            AgentError::Core(inner) => {
                tracing::error!("Capability error: {}", inner);
                Self::new(StatusCode::BAD_GATEWAY, inner.to_string())
            }
        }
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn find_session(state: &AppState, id: &str) -> Result<Arc<ChatSession>, ApiError> {
    state
        .sessions
        .get(id)
        .ok_or_else(ApiError::session_not_found)
}

// ----------------------------------------------------------------------
// Sessions
// ----------------------------------------------------------------------

#[derive(Debug, Deserialize, Default)]
struct CreateSessionRequest {
    /// "ar" or "en"; Arabic is the default
    #[serde(default)]
    language: Option<String>,
}

#[derive(Debug, Serialize)]
struct SessionView {
    session_id: String,
    language: &'static str,
    direction: &'static str,
    widget: Option<WidgetKind>,
    messages: Vec<ChatMessage>,
}

async fn session_view(session: &ChatSession) -> SessionView {
    let controller = session.controller.lock().await;
    SessionView {
        session_id: session.id.clone(),
        language: controller.language().code(),
        direction: controller.language().direction().as_str(),
        widget: controller.widget_kind(),
        messages: controller.messages().to_vec(),
    }
}

/// Open a new conversation
async fn create_session(
    State(state): State<AppState>,
    request: Option<Json<CreateSessionRequest>>,
) -> ApiResult<SessionView> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let language = request
        .language
        .as_deref()
        .and_then(Language::from_str_loose)
        .unwrap_or(Language::Arabic);

    let session = state
        .new_session(language)
        .map_err(|e| ApiError::new(StatusCode::from(e), "could not create session"))?;

    Ok(Json(session_view(&session).await))
}

/// Fetch the transcript and widget state
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SessionView> {
    let session = find_session(&state, &id)?;
    Ok(Json(session_view(&session).await))
}

/// Close a conversation
async fn delete_session(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    if state.sessions.remove(&id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

#[derive(Debug, Deserialize)]
struct LanguageRequest {
    /// Target language; omitted means toggle
    #[serde(default)]
    language: Option<String>,
}

#[derive(Debug, Serialize)]
struct LanguageResponse {
    language: &'static str,
    direction: &'static str,
}

/// Switch or toggle the conversation language
async fn set_language(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<LanguageRequest>,
) -> ApiResult<LanguageResponse> {
    let session = find_session(&state, &id)?;
    session.touch();
    let mut controller = session.controller.lock().await;

    let language = match request.language.as_deref() {
        Some(value) => {
            let language = Language::from_str_loose(value).ok_or_else(|| {
                ApiError::new(StatusCode::BAD_REQUEST, format!("unknown language: {value}"))
            })?;
            controller.set_language(language);
            language
        }
        None => controller.toggle_language(),
    };

    Ok(Json(LanguageResponse {
        language: language.code(),
        direction: language.direction().as_str(),
    }))
}

#[derive(Debug, Deserialize)]
struct QuickActionRequest {
    action: QuickAction,
}

#[derive(Debug, Serialize)]
struct QuickActionResponse {
    widget: Option<WidgetKind>,
    reply: Option<ChatMessage>,
}

/// Run a quick-action shortcut
async fn quick_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<QuickActionRequest>,
) -> ApiResult<QuickActionResponse> {
    let session = find_session(&state, &id)?;
    session.touch();

    let mut controller = session
        .controller
        .try_lock()
        .map_err(|_| ApiError::busy())?;
    let reply = controller.quick_action(request.action).await?.cloned();

    Ok(Json(QuickActionResponse {
        widget: controller.widget_kind(),
        reply,
    }))
}

// ----------------------------------------------------------------------
// Chat
// ----------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: String,
    /// Base64 image payload, with or without a data-URL prefix
    #[serde(default)]
    image_base64: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    reply: ChatMessage,
}

/// Send a user message and get the model reply
///
/// While a completion is pending the session lock is held, so an
/// overlapping send is answered with 409 instead of starting a second
/// completion.
async fn chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<ChatResponse> {
    let session = find_session(&state, &id)?;
    session.touch();

    let mut controller = session
        .controller
        .try_lock()
        .map_err(|_| ApiError::busy())?;

    let image = request.image_base64.map(|data| {
        ImageAttachment::from_base64(
            data,
            request.mime_type.unwrap_or_else(|| "image/jpeg".to_string()),
        )
    });

    let reply = controller.send_message(&request.message, image).await?.clone();
    Ok(Json(ChatResponse { reply }))
}

// ----------------------------------------------------------------------
// Calculator
// ----------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct CalculatorView {
    property: PropertyType,
    cleaning: CleaningType,
    area: String,
    square_meters: Option<u32>,
    price: u32,
}

/// Open the price calculator
async fn calculator_open(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CalculatorView> {
    let session = find_session(&state, &id)?;
    session.touch();
    let mut controller = session.controller.lock().await;

    controller.open_calculator();
    let calc = controller.calculator_mut()?;
    Ok(Json(CalculatorView {
        property: calc.property,
        cleaning: calc.cleaning,
        area: calc.area.clone(),
        square_meters: calc.square_meters,
        price: calc.price(),
    }))
}

#[derive(Debug, Deserialize)]
struct CalculatorSelection {
    #[serde(default)]
    property: Option<String>,
    #[serde(default)]
    cleaning: Option<String>,
    #[serde(default)]
    area: Option<String>,
    #[serde(default)]
    square_meters: Option<u32>,
}

/// Update calculator selections and return the new price
async fn calculator_select(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(selection): Json<CalculatorSelection>,
) -> ApiResult<CalculatorView> {
    let session = find_session(&state, &id)?;
    session.touch();
    let mut controller = session.controller.lock().await;
    let calc = controller.calculator_mut()?;

    if let Some(ref value) = selection.property {
        let property = PropertyType::from_str_loose(value).ok_or_else(|| {
            ApiError::new(StatusCode::BAD_REQUEST, format!("unknown property: {value}"))
        })?;
        calc.select_property(property);
    }
    if let Some(ref value) = selection.cleaning {
        let cleaning = CleaningType::from_str_loose(value).ok_or_else(|| {
            ApiError::new(StatusCode::BAD_REQUEST, format!("unknown cleaning type: {value}"))
        })?;
        calc.select_cleaning(cleaning);
    }
    if let Some(area) = selection.area {
        calc.select_area(area);
    }
    if selection.square_meters.is_some() {
        calc.set_square_meters(selection.square_meters);
    }

    Ok(Json(CalculatorView {
        property: calc.property,
        cleaning: calc.cleaning,
        area: calc.area.clone(),
        square_meters: calc.square_meters,
        price: calc.price(),
    }))
}

#[derive(Debug, Serialize)]
struct QuoteResponse {
    price: u32,
    details: String,
    area: String,
    widget: Option<WidgetKind>,
}

/// Confirm the quote; the booking form replaces the calculator
async fn calculator_quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<QuoteResponse> {
    let session = find_session(&state, &id)?;
    session.touch();
    let mut controller = session.controller.lock().await;

    let quote = controller.confirm_quote()?;
    Ok(Json(QuoteResponse {
        price: quote.price,
        details: quote.details,
        area: quote.area,
        widget: controller.widget_kind(),
    }))
}

// ----------------------------------------------------------------------
// Booking
// ----------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct BookingView {
    state: clean_hurghada_agent::BookingState,
    requires_custom_area: bool,
    total: u32,
    summary: Option<clean_hurghada_agent::PaymentSummary>,
}

fn booking_view(
    controller: &mut clean_hurghada_agent::ConversationController,
) -> Result<BookingView, ApiError> {
    let text = controller.ui();
    let flow = controller.booking_mut()?;
    Ok(BookingView {
        state: flow.state(),
        requires_custom_area: flow.requires_custom_area(),
        total: flow.total(),
        summary: flow.summary(text),
    })
}

/// Start a booking directly ("Book Now")
async fn booking_open(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<BookingView> {
    let session = find_session(&state, &id)?;
    session.touch();
    let mut controller = session.controller.lock().await;

    controller.open_booking(None);
    Ok(Json(booking_view(&mut controller)?))
}

/// Submit the details form; 422 with the failing fields otherwise
async fn booking_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<BookingDetailsForm>,
) -> ApiResult<BookingView> {
    let session = find_session(&state, &id)?;
    session.touch();
    let mut controller = session.controller.lock().await;

    controller.booking_mut()?.submit_details(form)?;
    Ok(Json(booking_view(&mut controller)?))
}

/// Return to the form, keeping entered data
async fn booking_back(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<BookingView> {
    let session = find_session(&state, &id)?;
    session.touch();
    let mut controller = session.controller.lock().await;

    controller.booking_mut()?.back()?;
    Ok(Json(booking_view(&mut controller)?))
}

#[derive(Debug, Serialize)]
struct PayResponse {
    order_id: String,
    checkout_url: String,
}

/// Initiate the payment and hand back the hosted checkout URL
async fn booking_pay(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PayResponse> {
    let session = find_session(&state, &id)?;
    session.touch();
    let mut controller = session.controller.lock().await;

    let pending = controller.booking_pay().await?;
    Ok(Json(PayResponse {
        order_id: pending.order_id,
        checkout_url: pending.checkout_url,
    }))
}

#[derive(Debug, Serialize)]
struct ConfirmResponse {
    outcome: PaymentOutcome,
    confirmed: bool,
    widget: Option<WidgetKind>,
    /// The success message posted to the conversation, when confirmed
    message: Option<ChatMessage>,
}

/// Poll the provider for the authoritative payment outcome
///
/// Closing the checkout popup proves nothing; the client calls this
/// endpoint and only a provider-confirmed outcome completes the booking.
async fn booking_confirm(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ConfirmResponse> {
    let session = find_session(&state, &id)?;
    session.touch();
    let mut controller = session.controller.lock().await;

    let outcome = controller.booking_confirm().await?;
    let confirmed = outcome.is_confirmed();
    let message = confirmed
        .then(|| controller.messages().last().cloned())
        .flatten();

    Ok(Json(ConfirmResponse {
        outcome,
        confirmed,
        widget: controller.widget_kind(),
        message,
    }))
}

/// Abandon the booking
async fn booking_cancel(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let session = find_session(&state, &id)?;
    session.touch();
    let mut controller = session.controller.lock().await;

    controller.booking_mut()?;
    controller.close_widget();
    Ok(Json(()))
}

// ----------------------------------------------------------------------
// Rating
// ----------------------------------------------------------------------

/// Open the rating widget
async fn rating_open(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let session = find_session(&state, &id)?;
    session.touch();
    let mut controller = session.controller.lock().await;

    controller.open_rating();
    Ok(Json(()))
}

#[derive(Debug, Deserialize)]
struct RatingRequest {
    stars: u8,
    #[serde(default)]
    comment: String,
}

#[derive(Debug, Serialize)]
struct RatingResponse {
    message: ChatMessage,
}

/// Submit the rating; the thank-you message is posted to the conversation
async fn rating_submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RatingRequest>,
) -> ApiResult<RatingResponse> {
    let session = find_session(&state, &id)?;
    session.touch();
    let mut controller = session.controller.lock().await;

    {
        let rating = controller.rating_mut()?;
        rating.set_stars(request.stars);
        rating.set_comment(request.comment);
    }
    let message = controller.rating_submit()?.clone();

    Ok(Json(RatingResponse { message }))
}

// ----------------------------------------------------------------------
// Health
// ----------------------------------------------------------------------

/// Health check
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.sessions.count(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use clean_hurghada_config::Settings;
    use clean_hurghada_core::{PaymentRequest, PendingPayment};
    use tower::ServiceExt;

    struct StubModel;

    #[async_trait]
    impl clean_hurghada_core::ChatModel for StubModel {
        async fn complete(&self, _prompt: &str) -> clean_hurghada_core::Result<String> {
            Ok("stub reply".to_string())
        }
        async fn analyze_image(
            &self,
            _image: &ImageAttachment,
            _prompt: &str,
        ) -> clean_hurghada_core::Result<String> {
            Ok("stub analysis".to_string())
        }
        async fn is_available(&self) -> bool {
            true
        }
        fn model_name(&self) -> &str {
            "stub"
        }
    }

    struct StubGateway;

    #[async_trait]
    impl clean_hurghada_core::PaymentGateway for StubGateway {
        async fn initiate(
            &self,
            _request: PaymentRequest,
        ) -> clean_hurghada_core::Result<PendingPayment> {
            Ok(PendingPayment {
                order_id: "42".to_string(),
                checkout_url: "https://pay.test/42".to_string(),
            })
        }
        async fn confirm(
            &self,
            _order_id: &str,
        ) -> clean_hurghada_core::Result<PaymentOutcome> {
            Ok(PaymentOutcome::Pending)
        }
    }

    fn test_state() -> AppState {
        AppState::new(
            Settings::default(),
            Arc::new(StubModel),
            Arc::new(StubGateway),
        )
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_router_creation() {
        let _ = create_router(test_state());
    }

    #[tokio::test]
    async fn test_create_session_and_chat() {
        let state = test_state();
        let router = create_router(state);

        let response = router
            .clone()
            .oneshot(
                Request::post("/api/sessions")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"language":"en"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let session = body_json(response).await;
        assert_eq!(session["language"], "en");
        assert_eq!(session["direction"], "ltr");
        let id = session["session_id"].as_str().unwrap().to_string();
        // Welcome message is already in the transcript
        assert_eq!(session["messages"].as_array().unwrap().len(), 1);

        let response = router
            .oneshot(
                Request::post(format!("/api/chat/{id}"))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message":"hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let chat = body_json(response).await;
        assert_eq!(chat["reply"]["text"], "stub reply");
    }

    #[tokio::test]
    async fn test_chat_rejected_while_completion_pending() {
        let state = test_state();
        let router = create_router(state.clone());
        let session = state.new_session(Language::English).unwrap();
        let id = session.id.clone();

        // Hold the controller lock, as an in-flight completion would.
        let _guard = session.controller.lock().await;

        let response = router
            .oneshot(
                Request::post(format!("/api/chat/{id}"))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message":"hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_chat_unknown_session_is_404() {
        let router = create_router(test_state());
        let response = router
            .oneshot(
                Request::post("/api/chat/nope")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message":"hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_booking_validation_is_422() {
        let state = test_state();
        let router = create_router(state.clone());
        let session = state.new_session(Language::English).unwrap();
        let id = session.id.clone();

        let response = router
            .clone()
            .oneshot(
                Request::post(format!("/api/booking/{id}/open"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(
                Request::post(format!("/api/booking/{id}/details"))
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"name":"","phone":"","area":"El Kawther","date":""}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"], "validation");
        assert!(body["fields"].as_array().unwrap().len() >= 3);
    }
}
