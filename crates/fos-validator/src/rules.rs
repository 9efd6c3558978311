//! Custom validation rules
//!
//! Synchronous rules return a [`CheckOutcome`]; asynchronous rules return a
//! future settling to `Ok(payload)` or `Err(reason)`. Both are kept in
//! registration order.

use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use fos_dom::{DomEvent, EventType, Listener, NodeId};

use crate::host::FormHost;
use crate::{Result, ValidatorError};

/// Result of a synchronous check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Pass,
    /// Failed; show the rule's configured message
    Fail,
    /// Failed with this message
    Message(String),
}

impl CheckOutcome {
    /// Message to display, or `None` for a pass. `Fail` falls back to
    /// `default`.
    pub fn failure_message<'a>(&'a self, default: &'a str) -> Option<&'a str> {
        match self {
            Self::Pass => None,
            Self::Fail => Some(default),
            Self::Message(m) => Some(m),
        }
    }
}

impl From<bool> for CheckOutcome {
    fn from(ok: bool) -> Self {
        if ok { Self::Pass } else { Self::Fail }
    }
}

impl From<String> for CheckOutcome {
    /// Empty strings count as a pass
    fn from(message: String) -> Self {
        if message.is_empty() { Self::Pass } else { Self::Message(message) }
    }
}

impl From<&str> for CheckOutcome {
    fn from(message: &str) -> Self {
        Self::from(message.to_string())
    }
}

impl From<Option<String>> for CheckOutcome {
    fn from(message: Option<String>) -> Self {
        message.map_or(Self::Pass, Self::from)
    }
}

pub type CheckFn = Rc<dyn Fn() -> CheckOutcome>;

/// Settled value of an async check: payload or rejection reason
pub type AsyncResult = std::result::Result<String, String>;

pub type AsyncCheckFn = Rc<dyn Fn() -> Pin<Box<dyn Future<Output = AsyncResult>>>>;

/// Maps a rejection reason to a message; `Pass` means "show nothing"
pub type ParseErrorFn = Rc<dyn Fn(&str) -> CheckOutcome>;

pub type SuccessFn = Rc<dyn Fn(&str)>;

pub type FailureFn = Rc<dyn Fn(&str)>;

/// Synchronous custom rule
pub struct SyncRule {
    source: NodeId,
    check: CheckFn,
    error_message: String,
    destination: Option<NodeId>,
    trigger: Option<String>,
    listener: Option<Listener>,
    failed: Cell<bool>,
}

impl SyncRule {
    pub fn new<F, O>(source: NodeId, check: F) -> Self
    where
        F: Fn() -> O + 'static,
        O: Into<CheckOutcome>,
    {
        Self {
            source,
            check: Rc::new(move || -> CheckOutcome { check().into() }),
            error_message: String::new(),
            destination: None,
            trigger: None,
            listener: None,
            failed: Cell::new(false),
        }
    }

    /// Message shown when the check returns `false`
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    /// Show the message on another element
    pub fn display_on(mut self, destination: NodeId) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Also run the check when `event` fires on the source
    pub fn trigger_on(mut self, event: impl Into<String>) -> Self {
        self.trigger = Some(event.into());
        self
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.destination
    }

    /// Where messages are shown and cleared
    pub fn target(&self) -> NodeId {
        self.destination.unwrap_or(self.source)
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn listener(&self) -> Option<&Listener> {
        self.listener.as_ref()
    }

    /// Outcome of the last evaluation
    pub fn failed(&self) -> bool {
        self.failed.get()
    }

    pub(crate) fn set_failed(&self, failed: bool) {
        self.failed.set(failed);
    }

    pub fn run(&self) -> CheckOutcome {
        (self.check)()
    }
}

/// Asynchronous custom rule
pub struct AsyncRule {
    source: NodeId,
    check: AsyncCheckFn,
    parse_error: ParseErrorFn,
    on_success: SuccessFn,
    on_failure: Option<FailureFn>,
    error_message: String,
    destination: Option<NodeId>,
    failed: Cell<bool>,
}

impl AsyncRule {
    pub fn new<F, Fut, P, O, S>(source: NodeId, check: F, parse_error: P, on_success: S) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = AsyncResult> + 'static,
        P: Fn(&str) -> O + 'static,
        O: Into<CheckOutcome>,
        S: Fn(&str) + 'static,
    {
        Self {
            source,
            check: Rc::new(move || -> Pin<Box<dyn Future<Output = AsyncResult>>> { Box::pin(check()) }),
            parse_error: Rc::new(move |reason: &str| -> CheckOutcome { parse_error(reason).into() }),
            on_success: Rc::new(on_success),
            on_failure: None,
            error_message: String::new(),
            destination: None,
            failed: Cell::new(false),
        }
    }

    pub fn on_failure(mut self, on_failure: impl Fn(&str) + 'static) -> Self {
        self.on_failure = Some(Rc::new(on_failure));
        self
    }

    pub(crate) fn with_failure_fn(mut self, on_failure: Option<FailureFn>) -> Self {
        self.on_failure = on_failure;
        self
    }

    /// Message shown when `parse_error` returns `false`
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = message.into();
        self
    }

    pub fn display_on(mut self, destination: NodeId) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.destination
    }

    pub fn target(&self) -> NodeId {
        self.destination.unwrap_or(self.source)
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn failed(&self) -> bool {
        self.failed.get()
    }

    pub(crate) fn set_failed(&self, failed: bool) {
        self.failed.set(failed);
    }

    pub(crate) fn start(&self) -> Pin<Box<dyn Future<Output = AsyncResult>>> {
        (self.check)()
    }

    pub(crate) fn parse_error(&self, reason: &str) -> CheckOutcome {
        (self.parse_error)(reason)
    }

    pub(crate) fn succeed(&self, payload: &str) {
        (self.on_success)(payload)
    }

    /// Run the failure callback. Returns false when none is configured.
    pub(crate) fn fail(&self, reason: &str) -> bool {
        match &self.on_failure {
            Some(f) => {
                f(reason);
                true
            }
            None => false,
        }
    }
}

/// Either kind of custom rule
pub enum Rule {
    Sync(SyncRule),
    Async(AsyncRule),
}

impl From<SyncRule> for Rule {
    fn from(rule: SyncRule) -> Self {
        Self::Sync(rule)
    }
}

impl From<AsyncRule> for Rule {
    fn from(rule: AsyncRule) -> Self {
        Self::Async(rule)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Sync,
    Async,
}

/// Returned by registration
#[derive(Clone)]
pub struct RuleHandle {
    kind: RuleKind,
    index: usize,
    source: NodeId,
    trigger: Option<EventType>,
    listener: Option<Listener>,
}

impl RuleHandle {
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Position in its registry
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn trigger(&self) -> Option<&EventType> {
        self.trigger.as_ref()
    }

    /// Listener attached for the trigger event; pass it back to remove it
    pub fn listener(&self) -> Option<&Listener> {
        self.listener.as_ref()
    }
}

impl std::fmt::Debug for RuleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleHandle")
            .field("kind", &self.kind)
            .field("index", &self.index)
            .field("source", &self.source)
            .field("trigger", &self.trigger)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

fn parse_trigger(name: &str) -> Result<EventType> {
    EventType::from_name(name)
        .map_err(|_| ValidatorError::InvalidArgument(format!("trigger event name {:?} is malformed", name)))
}

fn require_element<H: FormHost + ?Sized>(host: &H, el: NodeId, what: &str) -> Result<()> {
    if host.is_element(el) {
        Ok(())
    } else {
        Err(ValidatorError::InvalidArgument(format!("{} {} is not an element", what, el)))
    }
}

/// Ordered, append-only collection of custom rules
#[derive(Default)]
pub struct CustomValidationRegistry {
    sync_rules: Vec<Rc<SyncRule>>,
    async_rules: Vec<Rc<AsyncRule>>,
}

impl CustomValidationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a synchronous rule. With a trigger, the check is also
    /// attached as a listener for that event on the source.
    pub fn add<H: FormHost + ?Sized>(&mut self, host: &mut H, mut rule: SyncRule) -> Result<RuleHandle> {
        require_element(host, rule.source, "source")?;
        if let Some(dest) = rule.destination {
            require_element(host, dest, "destination")?;
        }
        let trigger = rule.trigger.as_deref().map(parse_trigger).transpose()?;

        if let Some(event) = &trigger {
            let check = rule.check.clone();
            let listener: Listener = Rc::new(move |event: &DomEvent| {
                let outcome = check();
                tracing::trace!("{} on {}: {:?}", event.event_type, event.current_target, outcome);
            });
            host.on(rule.source, event.clone(), listener.clone());
            rule.listener = Some(listener);
        }

        let handle = RuleHandle {
            kind: RuleKind::Sync,
            index: self.sync_rules.len(),
            source: rule.source,
            trigger,
            listener: rule.listener.clone(),
        };
        tracing::debug!("custom rule #{} on {}", handle.index, handle.source);
        self.sync_rules.push(Rc::new(rule));
        Ok(handle)
    }

    /// Detach a trigger listener from the source.
    ///
    /// The rule itself stays registered and still runs during a whole-form
    /// pass. Returns whether a listener was removed.
    pub fn remove<H: FormHost + ?Sized>(
        &mut self,
        host: &mut H,
        source: NodeId,
        trigger: &str,
        handler: Option<&Listener>,
    ) -> Result<bool> {
        let handler = handler
            .ok_or_else(|| ValidatorError::InvalidArgument("event handler is missing".to_string()))?;
        let event = parse_trigger(trigger)?;
        require_element(host, source, "source")?;

        let removed = host.off(source, &event, handler);
        tracing::debug!("detached {} listener from {}: {}", event, source, removed);
        Ok(removed)
    }

    pub fn add_async<H: FormHost + ?Sized>(&mut self, host: &H, rule: AsyncRule) -> Result<RuleHandle> {
        require_element(host, rule.source, "source")?;
        if let Some(dest) = rule.destination {
            require_element(host, dest, "destination")?;
        }

        let handle = RuleHandle {
            kind: RuleKind::Async,
            index: self.async_rules.len(),
            source: rule.source,
            trigger: None,
            listener: None,
        };
        tracing::debug!("async rule #{} on {}", handle.index, handle.source);
        self.async_rules.push(Rc::new(rule));
        Ok(handle)
    }

    pub fn add_rule<H: FormHost + ?Sized>(&mut self, host: &mut H, rule: Rule) -> Result<RuleHandle> {
        match rule {
            Rule::Sync(rule) => self.add(host, rule),
            Rule::Async(rule) => self.add_async(host, rule),
        }
    }

    /// Sync rules whose source is `el`, in registration order
    pub fn entries_for(&self, el: NodeId) -> Vec<Rc<SyncRule>> {
        self.sync_rules.iter().filter(|r| r.source == el).cloned().collect()
    }

    /// Async rules whose source is `el`, in registration order
    pub fn async_entries_for(&self, el: NodeId) -> Vec<Rc<AsyncRule>> {
        self.async_rules.iter().filter(|r| r.source == el).cloned().collect()
    }

    /// Clear the `failed` flag of every rule, sync or async, whose
    /// message goes to `el`
    pub fn reset_failures(&self, el: NodeId) {
        for rule in self.sync_rules.iter().filter(|r| r.target() == el) {
            rule.set_failed(false);
        }
        for rule in self.async_rules.iter().filter(|r| r.target() == el) {
            rule.set_failed(false);
        }
    }

    pub fn sync_rules(&self) -> &[Rc<SyncRule>] {
        &self.sync_rules
    }

    pub fn async_rules(&self) -> &[Rc<AsyncRule>] {
        &self.async_rules
    }
}
