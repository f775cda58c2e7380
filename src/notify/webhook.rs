//! HTTP webhook delivery of change notifications.

use std::time::Duration;

use handlebars::Handlebars;
use http::header::{CONTENT_TYPE, HeaderValue};

use super::{ChangeNotifier, Notification, NotifierTarget, NotifyError};
use crate::network::Address;
use crate::time::{Clock, SystemClock};
use crate::transport::{HttpClient, HttpRequest};

/// Default timeout for one webhook delivery.
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers change notifications as HTTP requests.
///
/// Typically pointed at a mail relay API or a chat webhook. One request is
/// made per notification; a failed delivery is retried by the polling loop
/// on its next cycle, not here.
///
/// # Body
///
/// Without a template the body is the JSON form of [`Notification`] and
/// `Content-Type: application/json` is added unless a content type was
/// configured. With a template the body is the rendered Handlebars text;
/// see [`Notification`] for the available variables.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `C`: The clock stamping notifications (defaults to [`SystemClock`])
///
/// # Example
///
/// ```
/// use ipwatch::notify::WebhookNotifier;
/// use ipwatch::transport::ReqwestClient;
/// use url::Url;
///
/// let notifier = WebhookNotifier::new(
///     ReqwestClient::new(),
///     Url::parse("https://mail.example.com/api/send").unwrap(),
/// )
/// .with_body_template(r#"{"to": "{{recipient}}", "text": "{{message}}"}"#);
/// ```
#[derive(Debug)]
pub struct WebhookNotifier<H, C = SystemClock> {
    client: H,
    clock: C,
    url: url::Url,
    method: http::Method,
    headers: http::HeaderMap,
    body_template: Option<String>,
    timeout: Duration,
}

impl<H> WebhookNotifier<H, SystemClock> {
    /// Creates a webhook notifier with default settings.
    ///
    /// Uses POST, no custom headers, the JSON body and the default timeout.
    #[must_use]
    pub fn new(client: H, url: url::Url) -> Self {
        Self {
            client,
            clock: SystemClock,
            url,
            method: http::Method::POST,
            headers: http::HeaderMap::new(),
            body_template: None,
            timeout: DEFAULT_NOTIFY_TIMEOUT,
        }
    }
}

impl<H, C> WebhookNotifier<H, C> {
    /// Sets a custom clock for notification timestamps.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> WebhookNotifier<H, C2> {
        WebhookNotifier {
            client: self.client,
            clock,
            url: self.url,
            method: self.method,
            headers: self.headers,
            body_template: self.body_template,
            timeout: self.timeout,
        }
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: http::Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the HTTP headers.
    #[must_use]
    pub fn with_headers(mut self, headers: http::HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the body template (Handlebars syntax).
    #[must_use]
    pub fn with_body_template(mut self, template: impl Into<String>) -> Self {
        self.body_template = Some(template.into());
        self
    }

    /// Sets the delivery timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured URL.
    #[must_use]
    pub const fn url(&self) -> &url::Url {
        &self.url
    }

    /// Returns the configured HTTP method.
    #[must_use]
    pub const fn method(&self) -> &http::Method {
        &self.method
    }

    /// Returns the delivery timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<H: HttpClient, C: Clock> WebhookNotifier<H, C> {
    /// Renders the request body for a notification.
    fn render_body(&self, notification: &Notification) -> Result<Vec<u8>, NotifyError> {
        let Some(template) = &self.body_template else {
            return serde_json::to_vec(notification).map_err(NotifyError::Serialize);
        };

        let handlebars = Handlebars::new();
        let rendered = handlebars
            .render_template(template, notification)
            .map_err(|e| NotifyError::Template(e.to_string()))?;

        Ok(rendered.into_bytes())
    }

    /// Builds the HTTP request for a notification.
    fn build_request(&self, notification: &Notification) -> Result<HttpRequest, NotifyError> {
        let mut request = HttpRequest::new(self.method.clone(), self.url.clone())
            .with_body(self.render_body(notification)?)
            .with_timeout(self.timeout);

        for (name, value) in &self.headers {
            request.headers.append(name, value.clone());
        }

        if self.body_template.is_none() && !request.headers.contains_key(CONTENT_TYPE) {
            request
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        Ok(request)
    }

    /// Sends one notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the body cannot be produced, the request
    /// fails, or the server answers with a non-2xx status.
    pub async fn send(&self, address: &Address, target: &NotifierTarget) -> Result<(), NotifyError> {
        let notification = Notification::new(address, target, self.clock.now());
        let request = self.build_request(&notification)?;

        let response = self.client.request(request).await?;
        if response.is_success() {
            return Ok(());
        }

        Err(NotifyError::NonSuccessStatus {
            status: response.status,
            body: response.body_text().map(ToString::to_string),
        })
    }
}

impl<H: HttpClient, C: Clock> ChangeNotifier for WebhookNotifier<H, C> {
    async fn notify(&self, address: &Address, target: &NotifierTarget) -> bool {
        match self.send(address, target).await {
            Ok(()) => {
                tracing::debug!("Webhook accepted notification of {address} for {target}");
                true
            }
            Err(e) => {
                tracing::error!("Webhook delivery of {address} for {target} failed: {e}");
                false
            }
        }
    }
}
