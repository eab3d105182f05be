//! Conversation controller
//!
//! Owns the transcript, the language selector and the single active
//! widget slot, and routes free-text/image input to the chat model.
//! Mutual exclusion between widgets is structural: there is exactly one
//! slot and opening a widget replaces whatever occupied it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use clean_hurghada_config::{
    CleaningType, PricingConfig, PropertyType, UiText, DEFAULT_VISION_PROMPT,
};
use clean_hurghada_core::{
    ChatMessage, ChatModel, ImageAttachment, Language, MessageRole, PaymentGateway,
    PaymentOutcome, PendingPayment, Quote,
};

use crate::booking::BookingFlow;
use crate::calculator::PriceCalculator;
use crate::rating::RatingFlow;
use crate::AgentError;

/// Fixed greeting shown when a conversation starts, in both languages
const WELCOME_MESSAGE: &str = "مرحبا! أنا بوت التنظيف في الغردقة 🧹✨ Hello! I'm your cleaning \
assistant in Hurghada. How can I help? (Apartments, villas, Airbnb turnover)";

/// Which widget occupies the slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Calculator,
    Booking,
    Rating,
}

/// The single widget slot
#[derive(Debug, Clone, Default)]
pub enum ActiveWidget {
    #[default]
    None,
    Calculator(PriceCalculator),
    Booking(BookingFlow),
    Rating(RatingFlow),
}

impl ActiveWidget {
    /// Kind of the open widget, if any
    pub fn kind(&self) -> Option<WidgetKind> {
        match self {
            ActiveWidget::None => None,
            ActiveWidget::Calculator(_) => Some(WidgetKind::Calculator),
            ActiveWidget::Booking(_) => Some(WidgetKind::Booking),
            ActiveWidget::Rating(_) => Some(WidgetKind::Rating),
        }
    }
}

/// Quick-action shortcuts below the input bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickAction {
    /// Open the price calculator
    CalculatePrice,
    /// Start a booking directly
    BookNow,
    /// Send the canned stain-tips prompt
    StainTips,
    /// Open the rating widget
    RateService,
    /// Send the canned contact prompt
    ContactUs,
}

/// Events emitted as the conversation progresses
#[derive(Debug, Clone)]
pub enum ConversationEvent {
    /// A completion is in flight
    Thinking,
    /// A message was appended to the transcript
    MessageAppended { role: MessageRole },
    /// A widget was opened
    WidgetOpened(WidgetKind),
    /// A widget was closed
    WidgetClosed(WidgetKind),
    /// A booking was confirmed and posted to the conversation
    BookingConfirmed,
    /// The language selector changed
    LanguageChanged(Language),
}

/// Conversation controller
///
/// One instance per chat session. Methods take `&mut self`, so at most
/// one completion is ever in flight per conversation; the server turns
/// an overlapping send into a busy rejection instead of queueing it.
pub struct ConversationController {
    language: Language,
    messages: Vec<ChatMessage>,
    widget: ActiveWidget,
    pricing: PricingConfig,
    chat_model: Arc<dyn ChatModel>,
    gateway: Arc<dyn PaymentGateway>,
    event_tx: broadcast::Sender<ConversationEvent>,
}

impl ConversationController {
    /// Create a controller and post the welcome message
    pub fn new(
        language: Language,
        pricing: PricingConfig,
        chat_model: Arc<dyn ChatModel>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(64);

        let mut controller = Self {
            language,
            messages: Vec::new(),
            widget: ActiveWidget::None,
            pricing,
            chat_model,
            gateway,
            event_tx,
        };
        controller.append(ChatMessage::model(WELCOME_MESSAGE));
        controller
    }

    /// Subscribe to conversation events
    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.event_tx.subscribe()
    }

    /// Current language
    pub fn language(&self) -> Language {
        self.language
    }

    /// String table for the current language
    pub fn ui(&self) -> &'static UiText {
        UiText::for_language(self.language)
    }

    /// The transcript, oldest first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The widget slot
    pub fn active_widget(&self) -> &ActiveWidget {
        &self.widget
    }

    /// Kind of the open widget, if any
    pub fn widget_kind(&self) -> Option<WidgetKind> {
        self.widget.kind()
    }

    /// Switch language; labels and direction flip together, widget state
    /// and transcript are untouched
    pub fn set_language(&mut self, language: Language) {
        if self.language != language {
            self.language = language;
            let _ = self.event_tx.send(ConversationEvent::LanguageChanged(language));
        }
    }

    /// Toggle between the two languages
    pub fn toggle_language(&mut self) -> Language {
        self.set_language(self.language.toggled());
        self.language
    }

    fn append(&mut self, message: ChatMessage) -> &ChatMessage {
        let _ = self.event_tx.send(ConversationEvent::MessageAppended {
            role: message.role,
        });
        self.messages.push(message);
        self.messages.last().expect("just pushed")
    }

    fn set_widget(&mut self, next: ActiveWidget) {
        if let Some(kind) = self.widget.kind() {
            let _ = self.event_tx.send(ConversationEvent::WidgetClosed(kind));
        }
        if let Some(kind) = next.kind() {
            let _ = self.event_tx.send(ConversationEvent::WidgetOpened(kind));
        }
        self.widget = next;
    }

    /// Close whatever widget is open
    pub fn close_widget(&mut self) {
        self.set_widget(ActiveWidget::None);
    }

    // ------------------------------------------------------------------
    // Chat
    // ------------------------------------------------------------------

    /// Send a user message (text and/or image) and append the reply
    ///
    /// Exactly one model message is appended per send: the completion on
    /// success, the localized apology on failure. Capability errors never
    /// escape to the caller.
    pub async fn send_message(
        &mut self,
        text: &str,
        image: Option<ImageAttachment>,
    ) -> Result<&ChatMessage, AgentError> {
        let text = text.trim();
        if text.is_empty() && image.is_none() {
            return Err(AgentError::InvalidInput(
                "message needs text or an image".to_string(),
            ));
        }

        let mut user_message = ChatMessage::user(text);
        if let Some(ref img) = image {
            user_message = user_message.with_image(img.clone());
        }
        self.append(user_message);

        let _ = self.event_tx.send(ConversationEvent::Thinking);

        let reply = match image {
            Some(ref img) => {
                let prompt = if text.is_empty() {
                    DEFAULT_VISION_PROMPT
                } else {
                    text
                };
                match self.chat_model.analyze_image(img, prompt).await {
                    Ok(reply) => reply,
                    Err(e) => {
                        tracing::warn!("Image analysis failed: {}", e);
                        self.ui().image_failure.to_string()
                    }
                }
            }
            None => match self.chat_model.complete(text).await {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::warn!("Chat completion failed: {}", e);
                    self.ui().chat_failure.to_string()
                }
            },
        };

        Ok(self.append(ChatMessage::model(reply)))
    }

    /// Run a quick-action shortcut
    ///
    /// Either opens a widget or sends a canned localized prompt as if the
    /// user had typed it; returns the model reply in the latter case.
    pub async fn quick_action(
        &mut self,
        action: QuickAction,
    ) -> Result<Option<&ChatMessage>, AgentError> {
        match action {
            QuickAction::CalculatePrice => {
                self.open_calculator();
                Ok(None)
            }
            QuickAction::BookNow => {
                self.open_booking(None);
                Ok(None)
            }
            QuickAction::RateService => {
                self.open_rating();
                Ok(None)
            }
            QuickAction::StainTips => {
                let prompt = self.ui().tips_prompt;
                self.send_message(prompt, None).await.map(Some)
            }
            QuickAction::ContactUs => {
                let prompt = self.ui().contact_prompt;
                self.send_message(prompt, None).await.map(Some)
            }
        }
    }

    // ------------------------------------------------------------------
    // Widgets
    // ------------------------------------------------------------------

    /// Open the price calculator, replacing any open widget
    pub fn open_calculator(&mut self) {
        self.set_widget(ActiveWidget::Calculator(PriceCalculator::new(
            self.pricing.clone(),
        )));
    }

    /// Open the rating widget, replacing any open widget
    pub fn open_rating(&mut self) {
        self.set_widget(ActiveWidget::Rating(RatingFlow::new()));
    }

    /// Open the booking flow, replacing any open widget
    ///
    /// Without a quote ("Book Now") the flow starts from the default
    /// catalogue entry.
    pub fn open_booking(&mut self, quote: Option<Quote>) {
        let fee = self.pricing.service_fee_percent;
        let flow = match quote {
            Some(quote) => BookingFlow::from_quote(&quote, fee),
            None => {
                let property = PropertyType::default();
                let cleaning = CleaningType::default();
                BookingFlow::direct(
                    self.pricing.base_price(property, cleaning),
                    format!("{} - {}", property.label(), cleaning.label()),
                    fee,
                )
            }
        };
        self.set_widget(ActiveWidget::Booking(flow));
    }

    /// The open calculator, or an error naming the missing widget
    pub fn calculator_mut(&mut self) -> Result<&mut PriceCalculator, AgentError> {
        match self.widget {
            ActiveWidget::Calculator(ref mut calc) => Ok(calc),
            _ => Err(AgentError::NoActiveWidget("calculator")),
        }
    }

    /// The open booking flow
    pub fn booking_mut(&mut self) -> Result<&mut BookingFlow, AgentError> {
        match self.widget {
            ActiveWidget::Booking(ref mut flow) => Ok(flow),
            _ => Err(AgentError::NoActiveWidget("booking")),
        }
    }

    /// The open rating flow
    pub fn rating_mut(&mut self) -> Result<&mut RatingFlow, AgentError> {
        match self.widget {
            ActiveWidget::Rating(ref mut flow) => Ok(flow),
            _ => Err(AgentError::NoActiveWidget("rating")),
        }
    }

    /// Confirm the calculator's quote and hand it to a fresh booking flow
    ///
    /// The booking replaces the calculator in the widget slot.
    pub fn confirm_quote(&mut self) -> Result<Quote, AgentError> {
        let quote = self.calculator_mut()?.quote();
        self.open_booking(Some(quote.clone()));
        Ok(quote)
    }

    // ------------------------------------------------------------------
    // Booking
    // ------------------------------------------------------------------

    /// Start the payment for the reviewed booking
    pub async fn booking_pay(&mut self) -> Result<PendingPayment, AgentError> {
        let gateway = Arc::clone(&self.gateway);
        self.booking_mut()?.initiate_payment(gateway.as_ref()).await
    }

    /// Poll the provider for the payment outcome
    ///
    /// On a confirmed payment the booking widget closes and the localized
    /// success message is posted. Any other outcome leaves the flow in
    /// review for the caller to surface.
    pub async fn booking_confirm(&mut self) -> Result<PaymentOutcome, AgentError> {
        let gateway = Arc::clone(&self.gateway);
        let outcome = self
            .booking_mut()?
            .confirm_payment(gateway.as_ref())
            .await?;

        if outcome.is_confirmed() {
            let success = self.ui().success;
            self.close_widget();
            self.append(ChatMessage::model(success));
            let _ = self.event_tx.send(ConversationEvent::BookingConfirmed);
        }

        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // Rating
    // ------------------------------------------------------------------

    /// Submit the rating and post the thank-you message
    pub fn rating_submit(&mut self) -> Result<&ChatMessage, AgentError> {
        let submission = self
            .rating_mut()?
            .submit()
            .ok_or_else(|| AgentError::InvalidState("select at least one star".to_string()))?;

        let thanks = self.ui().rating_thanks;
        let text = if submission.comment.is_empty() {
            format!("{} ({}/5 ⭐)\n", thanks, submission.stars)
        } else {
            format!(
                "{} ({}/5 ⭐)\n\"{}\"",
                thanks, submission.stars, submission.comment
            )
        };

        self.close_widget();
        Ok(self.append(ChatMessage::model(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::booking::{BookingDetailsForm, BookingState};

    /// Chat model stub; optionally failing, and distinguishable per route
    struct StubModel {
        fail: bool,
    }

    #[async_trait]
    impl ChatModel for StubModel {
        async fn complete(&self, _prompt: &str) -> clean_hurghada_core::Result<String> {
            if self.fail {
                Err(clean_hurghada_core::Error::ChatModel("down".to_string()))
            } else {
                Ok("text-reply".to_string())
            }
        }

        async fn analyze_image(
            &self,
            _image: &ImageAttachment,
            _prompt: &str,
        ) -> clean_hurghada_core::Result<String> {
            if self.fail {
                Err(clean_hurghada_core::Error::ChatModel("down".to_string()))
            } else {
                Ok("vision-reply".to_string())
            }
        }

        async fn is_available(&self) -> bool {
            !self.fail
        }

        fn model_name(&self) -> &str {
            "stub"
        }
    }

    /// Gateway stub with a scripted confirm outcome
    struct StubGateway {
        outcome: PaymentOutcome,
    }

    #[async_trait]
    impl PaymentGateway for StubGateway {
        async fn initiate(
            &self,
            _request: clean_hurghada_core::PaymentRequest,
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
            Ok(self.outcome.clone())
        }
    }

    fn controller_with(fail: bool, outcome: PaymentOutcome) -> ConversationController {
        ConversationController::new(
            Language::English,
            PricingConfig::default(),
            Arc::new(StubModel { fail }),
            Arc::new(StubGateway { outcome }),
        )
    }

    fn controller() -> ConversationController {
        controller_with(false, PaymentOutcome::Pending)
    }

    fn model_message_count(controller: &ConversationController) -> usize {
        controller
            .messages()
            .iter()
            .filter(|m| m.role == MessageRole::Model)
            .count()
    }

    #[tokio::test]
    async fn test_welcome_posted_on_start() {
        let controller = controller();
        assert_eq!(controller.messages().len(), 1);
        assert_eq!(controller.messages()[0].role, MessageRole::Model);
        assert!(controller.messages()[0].text.contains("Hurghada"));
    }

    #[tokio::test]
    async fn test_send_appends_user_and_model_messages() {
        let mut controller = controller();
        let reply = controller.send_message("hello", None).await.unwrap();
        assert_eq!(reply.text, "text-reply");
        assert_eq!(controller.messages().len(), 3);
        assert_eq!(controller.messages()[1].role, MessageRole::User);
    }

    #[tokio::test]
    async fn test_image_routes_to_vision() {
        let mut controller = controller();
        let image = ImageAttachment::jpeg("AAAA");
        let reply = controller
            .send_message("", Some(image))
            .await
            .unwrap();
        assert_eq!(reply.text, "vision-reply");
        assert!(controller.messages()[1].has_image());
    }

    #[tokio::test]
    async fn test_failure_appends_exactly_one_apology() {
        let mut controller = controller_with(true, PaymentOutcome::Pending);
        let before = model_message_count(&controller);

        let expected_failure = controller.ui().chat_failure;
        let reply = controller.send_message("hello", None).await.unwrap();
        assert_eq!(reply.text, expected_failure);
        assert_eq!(model_message_count(&controller), before + 1);

        // Conversation keeps working after a failure
        assert!(controller.send_message("again", None).await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_send_rejected() {
        let mut controller = controller();
        assert!(controller.send_message("   ", None).await.is_err());
        assert_eq!(controller.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_one_widget_at_a_time() {
        let mut controller = controller();
        controller.open_calculator();
        assert_eq!(controller.widget_kind(), Some(WidgetKind::Calculator));

        controller.open_rating();
        assert_eq!(controller.widget_kind(), Some(WidgetKind::Rating));
        assert!(controller.calculator_mut().is_err());

        controller.open_booking(None);
        assert_eq!(controller.widget_kind(), Some(WidgetKind::Booking));
        assert!(controller.rating_mut().is_err());
    }

    #[tokio::test]
    async fn test_quote_hands_off_to_booking() {
        let mut controller = controller();
        controller.open_calculator();
        {
            let calc = controller.calculator_mut().unwrap();
            calc.select_property(PropertyType::Villa);
            calc.select_cleaning(CleaningType::Deep);
            calc.select_area("El Gouna");
        }

        let quote = controller.confirm_quote().unwrap();
        assert_eq!(quote.price, 2500);
        assert_eq!(controller.widget_kind(), Some(WidgetKind::Booking));
        assert_eq!(controller.booking_mut().unwrap().draft().area, "El Gouna");
    }

    #[tokio::test]
    async fn test_quick_action_sends_localized_prompt() {
        let mut controller = controller();
        controller.set_language(Language::Arabic);
        let tips_prompt = controller.ui().tips_prompt;

        let reply = controller
            .quick_action(QuickAction::StainTips)
            .await
            .unwrap();
        assert!(reply.is_some());
        assert_eq!(controller.messages()[1].text, tips_prompt);
    }

    #[tokio::test]
    async fn test_booking_success_closes_widget_and_posts_message() {
        let mut controller = controller_with(
            false,
            PaymentOutcome::Confirmed {
                transaction_id: "txn".to_string(),
            },
        );
        controller.open_booking(None);
        controller
            .booking_mut()
            .unwrap()
            .submit_details(BookingDetailsForm {
                name: "Mona".to_string(),
                phone: "+20100".to_string(),
                area: "El Kawther".to_string(),
                custom_area: String::new(),
                date: "2026-08-20".to_string(),
                crew_preference: Default::default(),
            })
            .unwrap();

        let pending = controller.booking_pay().await.unwrap();
        assert_eq!(pending.order_id, "42");

        let success_text = controller.ui().success;
        let outcome = controller.booking_confirm().await.unwrap();
        assert!(outcome.is_confirmed());
        assert_eq!(controller.widget_kind(), None);
        assert_eq!(controller.messages().last().unwrap().text, success_text);
    }

    #[tokio::test]
    async fn test_pending_outcome_keeps_booking_open() {
        // A closed checkout surface shows up as Pending: no success
        // message, widget stays put.
        let mut controller = controller_with(false, PaymentOutcome::Pending);
        controller.open_booking(None);
        controller
            .booking_mut()
            .unwrap()
            .submit_details(BookingDetailsForm {
                name: "Mona".to_string(),
                phone: "+20100".to_string(),
                area: "El Kawther".to_string(),
                custom_area: String::new(),
                date: "2026-08-20".to_string(),
                crew_preference: Default::default(),
            })
            .unwrap();
        controller.booking_pay().await.unwrap();

        let before = model_message_count(&controller);
        let outcome = controller.booking_confirm().await.unwrap();
        assert!(!outcome.is_confirmed());
        assert_eq!(controller.widget_kind(), Some(WidgetKind::Booking));
        assert_eq!(
            controller.booking_mut().unwrap().state(),
            BookingState::ReviewingPayment
        );
        assert_eq!(model_message_count(&controller), before);
    }

    #[tokio::test]
    async fn test_language_toggle_preserves_widget_state() {
        let mut controller = controller();
        controller.open_booking(None);
        controller.booking_mut().unwrap();

        let en_title = controller.ui().title;
        controller.toggle_language();
        assert_ne!(controller.ui().title, en_title);
        assert!(controller.language().is_rtl());

        // Widget survives the toggle untouched
        assert_eq!(controller.widget_kind(), Some(WidgetKind::Booking));
    }

    #[tokio::test]
    async fn test_rating_submission_posts_thanks() {
        let mut controller = controller();
        controller.open_rating();

        // Gated until a star is chosen
        assert!(controller.rating_submit().is_err());

        {
            let rating = controller.rating_mut().unwrap();
            rating.set_stars(3);
            rating.set_comment("Great crew");
        }
        let message_text = controller.rating_submit().unwrap().text.clone();
        assert!(message_text.contains("3/5"));
        assert!(message_text.contains("\"Great crew\""));
        assert_eq!(controller.widget_kind(), None);
    }

    #[tokio::test]
    async fn test_events_emitted() {
        let mut controller = controller();
        let mut events = controller.subscribe();

        controller.open_calculator();
        controller.open_rating();

        assert!(matches!(
            events.try_recv().unwrap(),
            ConversationEvent::WidgetOpened(WidgetKind::Calculator)
        ));
        assert!(matches!(
            events.try_recv().unwrap(),
            ConversationEvent::WidgetClosed(WidgetKind::Calculator)
        ));
        assert!(matches!(
            events.try_recv().unwrap(),
            ConversationEvent::WidgetOpened(WidgetKind::Rating)
        ));
    }
}
