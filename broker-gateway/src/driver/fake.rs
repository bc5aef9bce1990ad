//! Scripted in-memory UI for tests.
//!
//! A [`FakeDriver`] holds a tree of [`FakeElement`]s addressed by the same
//! [`By`] locators the gateway uses. Clicking an element applies the
//! [`Effect`]s registered for it, which is enough to model dialogs opening,
//! confirm buttons disappearing and rows being rendered. Every interaction is
//! appended to an action log the tests can inspect.

use super::{By, DriverError, ElementHandle, UiDriver};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FakeElement {
    text: String,
    attributes: HashMap<String, String>,
    displayed: bool,
    children: Vec<(By, FakeElement)>,
}

impl Default for FakeElement {
    fn default() -> Self {
        Self {
            text: String::new(),
            attributes: HashMap::new(),
            displayed: true,
            children: Vec::new(),
        }
    }
}

impl FakeElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new().with_text(text)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn with_child(mut self, by: By, child: FakeElement) -> Self {
        self.children.push((by, child));
        self
    }
}

/// A state change triggered by a click.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Removes every top-level element located by the selector, with descendants.
    Remove(By),
    /// Renders a new top-level element.
    Insert(By, FakeElement),
    SetText(By, String),
    SetAttribute(By, String, String),
}

/// One recorded interaction; the string is the element's label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Click(String),
    Keys(String, String),
    Hover(String),
    ContextClick(String),
}

#[derive(Debug)]
struct Node {
    id: String,
    /// Lookup key: the selector for top-level nodes, `<parent id>>><selector>` below.
    owner: String,
    /// Human readable path used in the action log and for click effects.
    label: String,
    text: String,
    attributes: HashMap<String, String>,
    displayed: bool,
}

#[derive(Debug, Default)]
struct State {
    nodes: Vec<Node>,
    effects: HashMap<String, Vec<Effect>>,
    log: Vec<Action>,
    seq: u64,
}

impl State {
    fn insert(&mut self, owner: String, label: String, element: FakeElement) {
        self.seq += 1;
        let id = format!("e{}", self.seq);
        for (by, child) in element.children {
            let child_label = format!("{} >> {}", label, by);
            self.insert(format!("{}>>{}", id, by), child_label, child);
        }
        self.nodes.push(Node {
            id,
            owner,
            label,
            text: element.text,
            attributes: element.attributes,
            displayed: element.displayed,
        });
    }

    fn remove(&mut self, owner: &str) {
        let mut doomed: Vec<String> = self
            .nodes
            .iter()
            .filter(|n| n.owner == owner)
            .map(|n| n.id.clone())
            .collect();
        while let Some(id) = doomed.pop() {
            let prefix = format!("{}>>", id);
            doomed.extend(
                self.nodes
                    .iter()
                    .filter(|n| n.owner.starts_with(&prefix))
                    .map(|n| n.id.clone()),
            );
            self.nodes.retain(|n| n.id != id);
        }
    }

    fn first_mut(&mut self, owner: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.owner == owner)
    }

    fn node(&self, handle: &ElementHandle) -> Result<&Node, DriverError> {
        self.nodes
            .iter()
            .find(|n| n.id == handle.as_str())
            .ok_or_else(|| DriverError::StaleElement(handle.as_str().to_string()))
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Remove(by) => self.remove(&by.to_string()),
            Effect::Insert(by, element) => self.insert(by.to_string(), by.to_string(), element),
            Effect::SetText(by, text) => {
                if let Some(node) = self.first_mut(&by.to_string()) {
                    node.text = text;
                }
            }
            Effect::SetAttribute(by, name, value) => {
                if let Some(node) = self.first_mut(&by.to_string()) {
                    node.attributes.insert(name, value);
                }
            }
        }
    }
}

/// In-memory [`UiDriver`] driven by a script of elements and click effects.
#[derive(Debug, Default)]
pub struct FakeDriver {
    state: Mutex<State>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Renders a top-level element.
    pub fn add(&self, by: By, element: FakeElement) -> &Self {
        let key = by.to_string();
        self.state().insert(key.clone(), key, element);
        self
    }

    pub fn remove(&self, by: &By) {
        self.state().remove(&by.to_string());
    }

    /// Registers effects applied, in order, every time the element is clicked.
    pub fn on_click(&self, by: &By, effects: Vec<Effect>) -> &Self {
        self.on_click_label(&by.to_string(), effects)
    }

    /// Same as [`FakeDriver::on_click`] for nested elements, addressed by label
    /// (`"<parent> >> <child>"`).
    pub fn on_click_label(&self, label: &str, effects: Vec<Effect>) -> &Self {
        self.state()
            .effects
            .entry(label.to_string())
            .or_default()
            .extend(effects);
        self
    }

    pub fn actions(&self) -> Vec<Action> {
        self.state().log.clone()
    }

    /// Labels of every clicked element, in click order.
    pub fn clicks(&self) -> Vec<String> {
        self.state()
            .log
            .iter()
            .filter_map(|a| match a {
                Action::Click(label) => Some(label.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn click_count(&self, by: &By) -> usize {
        let label = by.to_string();
        self.clicks().iter().filter(|l| **l == label).count()
    }

    /// Every chunk of text typed into the element located by `by`.
    pub fn keys(&self, by: &By) -> Vec<String> {
        let label = by.to_string();
        self.state()
            .log
            .iter()
            .filter_map(|a| match a {
                Action::Keys(l, text) if *l == label => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn is_rendered(&self, by: &By) -> bool {
        let key = by.to_string();
        self.state().nodes.iter().any(|n| n.owner == key)
    }

    fn record(&self, handle: &ElementHandle, action: fn(String) -> Action) -> Result<(), DriverError> {
        let mut state = self.state();
        let label = state.node(handle)?.label.clone();
        state.log.push(action(label));
        Ok(())
    }
}

#[async_trait]
impl UiDriver for FakeDriver {
    async fn find(&self, by: &By) -> Result<Option<ElementHandle>, DriverError> {
        let key = by.to_string();
        Ok(self
            .state()
            .nodes
            .iter()
            .find(|n| n.owner == key)
            .map(|n| ElementHandle::new(n.id.clone())))
    }

    async fn find_all(&self, by: &By) -> Result<Vec<ElementHandle>, DriverError> {
        let key = by.to_string();
        Ok(self
            .state()
            .nodes
            .iter()
            .filter(|n| n.owner == key)
            .map(|n| ElementHandle::new(n.id.clone()))
            .collect())
    }

    async fn find_in(
        &self,
        parent: &ElementHandle,
        by: &By,
    ) -> Result<Option<ElementHandle>, DriverError> {
        let state = self.state();
        let parent = state.node(parent)?;
        let key = format!("{}>>{}", parent.id, by);
        Ok(state
            .nodes
            .iter()
            .find(|n| n.owner == key)
            .map(|n| ElementHandle::new(n.id.clone())))
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), DriverError> {
        let mut state = self.state();
        let label = state.node(element)?.label.clone();
        state.log.push(Action::Click(label.clone()));
        let effects = state.effects.get(&label).cloned().unwrap_or_default();
        for effect in effects {
            state.apply(effect);
        }
        Ok(())
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<(), DriverError> {
        let mut state = self.state();
        let label = state.node(element)?.label.clone();
        state.log.push(Action::Keys(label, text.to_string()));
        if let Some(node) = state.nodes.iter_mut().find(|n| n.id == element.as_str()) {
            node.attributes
                .entry("value".to_string())
                .or_default()
                .push_str(text);
        }
        Ok(())
    }

    async fn text(&self, element: &ElementHandle) -> Result<String, DriverError> {
        Ok(self.state().node(element)?.text.clone())
    }

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        Ok(self.state().node(element)?.attributes.get(name).cloned())
    }

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool, DriverError> {
        Ok(self.state().node(element)?.displayed)
    }

    async fn hover(&self, element: &ElementHandle) -> Result<(), DriverError> {
        self.record(element, Action::Hover)
    }

    async fn context_click(&self, element: &ElementHandle) -> Result<(), DriverError> {
        self.record(element, Action::ContextClick)
    }

    async fn title(&self) -> Result<String, DriverError> {
        Ok(String::new())
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_millis(1)
    }
}
