//! Form validator façade
//!
//! Owns one form's validation engine and wires `change`/`blur` listeners
//! on the controls captured at construction. Controls added to the form
//! later are not tracked.

use std::cell::RefCell;
use std::future::Future;
use std::rc::{Rc, Weak};

use fos_dom::{Document, DomEvent, EventType, Listener, NodeId};

use crate::config::ValidatorOptions;
use crate::constants::{State, STATES};
use crate::engine::ValidationEngine;
use crate::host::FormHost;
use crate::rules::{AsyncResult, AsyncRule, CheckOutcome, FailureFn, Rule, RuleHandle, SyncRule};
use crate::state::StateTagger;
use crate::{Result, ValidatorError};

/// Validation for one form
pub struct FormValidator<H: FormHost + 'static = Document> {
    engine: Rc<ValidationEngine<H>>,
    options: ValidatorOptions,
    /// Listeners attached by `load_events`, for `detach`
    wiring: Vec<(NodeId, EventType, Listener)>,
}

impl<H: FormHost + 'static> FormValidator<H> {
    /// Attach to `form` with default options
    pub fn new(host: Rc<RefCell<H>>, form: NodeId) -> Result<Self> {
        Self::with_options(host, form, ValidatorOptions::default())
    }

    pub fn with_options(host: Rc<RefCell<H>>, form: NodeId, options: ValidatorOptions) -> Result<Self> {
        if !host.borrow().is_element(form) {
            return Err(ValidatorError::MissingForm(form));
        }

        let mut validator = Self {
            engine: Rc::new(ValidationEngine::new(host, form)),
            options,
            wiring: Vec::new(),
        };
        validator.load_events();
        Ok(validator)
    }

    /// Like `with_options`, with `data-validate-on-*` on the form taking
    /// precedence
    pub fn with_form_options(host: Rc<RefCell<H>>, form: NodeId, options: ValidatorOptions) -> Result<Self> {
        let options = options.with_form_overrides(&*host.borrow(), form);
        Self::with_options(host, form, options)
    }

    fn load_events(&mut self) {
        let mut host = self.engine.host().borrow_mut();
        for &el in self.engine.elements() {
            if self.options.validate_on_change {
                let listener = bind(&self.engine, |engine, el| engine.on_change(el));
                host.on(el, EventType::Change, listener.clone());
                self.wiring.push((el, EventType::Change, listener));
            }
            if self.options.validate_on_blur {
                let listener = bind(&self.engine, |engine, el| {
                    engine.on_blur(el);
                });
                host.on(el, EventType::Blur, listener.clone());
                self.wiring.push((el, EventType::Blur, listener));
            }
        }
        tracing::debug!("wired {} listeners on {}", self.wiring.len(), self.engine.form());
    }

    /// Remove the `change`/`blur` listeners. Rules and their trigger
    /// listeners are left alone.
    pub fn detach(&mut self) {
        let mut host = self.engine.host().borrow_mut();
        for (el, event, listener) in self.wiring.drain(..) {
            host.off(el, &event, &listener);
        }
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// Validate every control. Async rules settle later and do not
    /// affect the result.
    pub fn validate_form(&self) -> bool {
        self.engine.validate_form()
    }

    pub fn validate_input(&self, el: NodeId) -> bool {
        self.engine.validate_input(el)
    }

    /// Clear all errors and interaction states
    pub fn remove_validations(&self) {
        self.engine.remove_validations();
    }

    // ------------------------------------------------------------------
    // Rules
    // ------------------------------------------------------------------

    /// Register a synchronous check on `source`.
    ///
    /// `check` returns `true`/`false` or a message (empty means pass).
    /// `false` shows `error_message`. With `trigger`, the check also runs
    /// when that event fires on `source`.
    pub fn add_custom_validation<F, O>(
        &self,
        source: NodeId,
        check: F,
        trigger: Option<&str>,
        error_message: &str,
        destination: Option<NodeId>,
    ) -> Result<RuleHandle>
    where
        F: Fn() -> O + 'static,
        O: Into<CheckOutcome>,
    {
        let mut rule = SyncRule::new(source, check).with_message(error_message);
        if let Some(trigger) = trigger {
            rule = rule.trigger_on(trigger);
        }
        if let Some(destination) = destination {
            rule = rule.display_on(destination);
        }
        self.add_rule(rule)
    }

    /// Detach a rule's trigger listener. The rule keeps running on
    /// `validate_form`.
    pub fn remove_custom_validation(&self, source: NodeId, trigger: &str, handler: Option<&Listener>) -> Result<bool> {
        self.engine
            .registry()
            .borrow_mut()
            .remove(&mut *self.engine.host().borrow_mut(), source, trigger, handler)
    }

    /// Register an asynchronous check on `source`.
    ///
    /// Rejections go through `parse_error` (a message, `false` or nothing)
    /// and then `on_failure`.
    pub fn add_async_custom_validation<F, Fut, P, O, S>(
        &self,
        source: NodeId,
        check: F,
        parse_error: P,
        on_success: S,
        on_failure: Option<FailureFn>,
    ) -> Result<RuleHandle>
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = AsyncResult> + 'static,
        P: Fn(&str) -> O + 'static,
        O: Into<CheckOutcome>,
        S: Fn(&str) + 'static,
    {
        let rule = AsyncRule::new(source, check, parse_error, on_success).with_failure_fn(on_failure);
        self.add_rule(rule)
    }

    pub fn add_rule(&self, rule: impl Into<Rule>) -> Result<RuleHandle> {
        self.engine
            .registry()
            .borrow_mut()
            .add_rule(&mut *self.engine.host().borrow_mut(), rule.into())
    }

    pub fn custom_rule_count(&self) -> usize {
        self.engine.registry().borrow().sync_rules().len()
    }

    pub fn async_rule_count(&self) -> usize {
        self.engine.registry().borrow().async_rules().len()
    }

    // ------------------------------------------------------------------
    // States
    // ------------------------------------------------------------------

    pub fn set_validation_state(&self, el: NodeId, state: State) {
        StateTagger::set(&mut *self.engine.host().borrow_mut(), el, state);
    }

    pub fn has_state(&self, el: NodeId, state: State) -> bool {
        StateTagger::has(&*self.engine.host().borrow(), el, state)
    }

    pub fn clear_state(&self, el: NodeId, state: State) {
        StateTagger::clear(&mut *self.engine.host().borrow_mut(), el, state);
    }

    pub fn validation_states(&self) -> &'static [State] {
        &STATES
    }

    // ------------------------------------------------------------------
    // Async driving
    // ------------------------------------------------------------------

    /// Run one ready async step
    pub fn tick(&self) -> bool {
        self.engine.queue().tick()
    }

    /// Wait until every queued async chain has settled
    pub async fn settle(&self) {
        self.engine.queue().settle().await
    }

    pub fn pending_chains(&self) -> usize {
        self.engine.queue().pending()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn form(&self) -> NodeId {
        self.engine.form()
    }

    pub fn elements(&self) -> &[NodeId] {
        self.engine.elements()
    }

    pub fn options(&self) -> ValidatorOptions {
        self.options
    }

    pub fn host(&self) -> &Rc<RefCell<H>> {
        self.engine.host()
    }
}

/// Listener holding a weak reference to the engine, so the document's
/// listener table does not keep the engine alive.
fn bind<H, F>(engine: &Rc<ValidationEngine<H>>, handler: F) -> Listener
where
    H: FormHost + 'static,
    F: Fn(&ValidationEngine<H>, NodeId) + 'static,
{
    let engine: Weak<ValidationEngine<H>> = Rc::downgrade(engine);
    Rc::new(move |event: &DomEvent| {
        if let Some(engine) = engine.upgrade() {
            handler(&engine, event.current_target);
        }
    })
}
