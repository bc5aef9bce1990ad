//! W3C WebDriver backend.
//!
//! Talks the JSON wire protocol of chromedriver / geckodriver over HTTP. One
//! client owns one browser session.

use super::{By, DriverError, ElementHandle, UiDriver};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Method};
use serde_json::{json, Value};
use std::time::Duration;

/// Key under which W3C drivers return element references.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

pub struct WebDriverClient {
    http: Client,
    base_url: String,
    session_id: String,
    poll_interval: Duration,
}

impl WebDriverClient {
    /// Starts a new browser session on the WebDriver server at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - e.g. `http://localhost:9515`.
    /// * `browser` - browser name requested in the capabilities.
    /// * `headless` - pass `--headless` to Chromium based browsers.
    pub async fn connect(base_url: &str, browser: &str, headless: bool) -> Result<Self, DriverError> {
        let http = Client::new();
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut always_match = json!({ "browserName": browser });
        if headless {
            always_match["goog:chromeOptions"] = json!({ "args": ["--headless=new"] });
            always_match["moz:firefoxOptions"] = json!({ "args": ["-headless"] });
        }
        let body = json!({ "capabilities": { "alwaysMatch": always_match } });

        let value = send(&http, Method::POST, &format!("{}/session", base_url), Some(body)).await?;
        let session_id = value["sessionId"]
            .as_str()
            .ok_or_else(|| DriverError::Transport("session response without sessionId".into()))?
            .to_string();
        info!("WebDriver session {} started at {}", session_id, base_url);

        Ok(Self {
            http,
            base_url,
            session_id,
            poll_interval: Duration::from_millis(100),
        })
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Navigates the session to `url`.
    pub async fn goto(&self, url: &str) -> Result<(), DriverError> {
        self.command(Method::POST, "url", Some(json!({ "url": url })))
            .await
            .map(|_| ())
    }

    /// Ends the browser session.
    pub async fn quit(&self) -> Result<(), DriverError> {
        let url = format!("{}/session/{}", self.base_url, self.session_id);
        send(&self.http, Method::DELETE, &url, None).await.map(|_| ())
    }

    async fn command(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, DriverError> {
        let url = format!("{}/session/{}/{}", self.base_url, self.session_id, path);
        send(&self.http, method, &url, body).await
    }

    async fn pointer(&self, element: &ElementHandle, button: Option<u8>) -> Result<(), DriverError> {
        let mut actions = vec![json!({
            "type": "pointerMove",
            "duration": 0,
            "origin": { ELEMENT_KEY: element.as_str() },
            "x": 0,
            "y": 0
        })];
        if let Some(button) = button {
            actions.push(json!({ "type": "pointerDown", "button": button }));
            actions.push(json!({ "type": "pointerUp", "button": button }));
        }
        let body = json!({
            "actions": [{
                "type": "pointer",
                "id": "mouse",
                "parameters": { "pointerType": "mouse" },
                "actions": actions
            }]
        });
        self.command(Method::POST, "actions", Some(body)).await?;
        Ok(())
    }
}

/// Translates a selector into a W3C `(using, value)` pair.
///
/// W3C only knows CSS, XPath, link text and tag name; the rest are expressed
/// as CSS.
fn strategy(by: &By) -> (&'static str, String) {
    match by {
        By::Css(l) => ("css selector", l.clone()),
        By::XPath(l) => ("xpath", l.clone()),
        By::LinkText(l) => ("link text", l.clone()),
        By::PartialLinkText(l) => ("partial link text", l.clone()),
        By::Tag(l) => ("tag name", l.clone()),
        By::Id(l) => ("css selector", format!("[id=\"{}\"]", l)),
        By::Name(l) => ("css selector", format!("[name=\"{}\"]", l)),
        By::Class(l) => ("css selector", format!(".{}", l)),
    }
}

fn locator_body(by: &By) -> Value {
    let (using, value) = strategy(by);
    json!({ "using": using, "value": value })
}

fn element_ref(value: &Value) -> Result<ElementHandle, DriverError> {
    value[ELEMENT_KEY]
        .as_str()
        .map(ElementHandle::new)
        .ok_or_else(|| DriverError::Transport(format!("not an element reference: {}", value)))
}

/// Maps "no such element" to `Ok(None)`.
fn optional(result: Result<Value, DriverError>) -> Result<Option<ElementHandle>, DriverError> {
    match result {
        Ok(value) => element_ref(&value).map(Some),
        Err(DriverError::Protocol { error, .. }) if error == "no such element" => Ok(None),
        Err(e) => Err(e),
    }
}

async fn send(
    http: &Client,
    method: Method,
    url: &str,
    body: Option<Value>,
) -> Result<Value, DriverError> {
    debug!("WebDriver {} {}", method, url);
    let request = http.request(method, url);
    let request = match body {
        Some(body) => request.json(&body),
        None => request,
    };
    let response = request
        .send()
        .await
        .map_err(|e| DriverError::Transport(e.to_string()))?;
    let status = response.status();
    let payload: Value = response
        .json()
        .await
        .map_err(|e| DriverError::Transport(e.to_string()))?;
    let value = payload.get("value").cloned().unwrap_or(Value::Null);

    if !status.is_success() {
        return Err(DriverError::Protocol {
            error: value["error"].as_str().unwrap_or("unknown error").to_string(),
            message: value["message"].as_str().unwrap_or_default().to_string(),
        });
    }
    Ok(value)
}

#[async_trait]
impl UiDriver for WebDriverClient {
    async fn find(&self, by: &By) -> Result<Option<ElementHandle>, DriverError> {
        optional(
            self.command(Method::POST, "element", Some(locator_body(by)))
                .await,
        )
    }

    async fn find_all(&self, by: &By) -> Result<Vec<ElementHandle>, DriverError> {
        let value = self
            .command(Method::POST, "elements", Some(locator_body(by)))
            .await?;
        value
            .as_array()
            .map(|items| items.iter().map(element_ref).collect())
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn find_in(
        &self,
        parent: &ElementHandle,
        by: &By,
    ) -> Result<Option<ElementHandle>, DriverError> {
        let path = format!("element/{}/element", parent.as_str());
        optional(self.command(Method::POST, &path, Some(locator_body(by))).await)
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), DriverError> {
        let path = format!("element/{}/click", element.as_str());
        self.command(Method::POST, &path, Some(json!({}))).await?;
        Ok(())
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<(), DriverError> {
        let path = format!("element/{}/value", element.as_str());
        self.command(Method::POST, &path, Some(json!({ "text": text })))
            .await?;
        Ok(())
    }

    async fn text(&self, element: &ElementHandle) -> Result<String, DriverError> {
        let path = format!("element/{}/text", element.as_str());
        let value = self.command(Method::GET, &path, None).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        let path = format!("element/{}/attribute/{}", element.as_str(), name);
        let value = self.command(Method::GET, &path, None).await?;
        Ok(value.as_str().map(str::to_string))
    }

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool, DriverError> {
        let path = format!("element/{}/displayed", element.as_str());
        let value = self.command(Method::GET, &path, None).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn hover(&self, element: &ElementHandle) -> Result<(), DriverError> {
        self.pointer(element, None).await
    }

    async fn context_click(&self, element: &ElementHandle) -> Result<(), DriverError> {
        self.pointer(element, Some(2)).await
    }

    async fn title(&self) -> Result<String, DriverError> {
        let value = self.command(Method::GET, "title", None).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_maps_non_w3c_selectors_to_css() {
        assert_eq!(strategy(&By::id("login")), ("css selector", "[id=\"login\"]".into()));
        assert_eq!(strategy(&By::Class("nav".into())), ("css selector", ".nav".into()));
        assert_eq!(strategy(&By::xpath("//div")), ("xpath", "//div".into()));
    }

    #[test]
    fn test_missing_element_is_none() {
        let err = DriverError::Protocol {
            error: "no such element".into(),
            message: "Unable to locate".into(),
        };
        assert!(optional(Err(err)).unwrap().is_none());

        let value = json!({ ELEMENT_KEY: "abc" });
        assert_eq!(optional(Ok(value)).unwrap(), Some(ElementHandle::new("abc")));
    }
}
