//! Submission controller
//!
//! Orchestrates one submit click: spinner, disable inputs, clear errors,
//! read, validate, save, callbacks - with a guaranteed cleanup step that
//! re-enables inputs and removes the spinner exactly once per click,
//! whatever the outcome. Overlapping clicks on the same form are rejected
//! via a session flag set at click entry.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use rivet_dom::NodeId;
use rivet_selectors::Selector;
use rivet_view::{handler, ListenerMap, LocalBoxFuture, View, ViewError, ViewRegistry};

use crate::binder::{apply_validation_errors, clear_errors, read_into_model};
use crate::binding::{normalize, FormDefaults, ModelFormMap, DEFAULT_HIDDEN_CLASS};
use crate::model::{default_setter, AttributeSetter, Model};
use crate::ValidationError;

/// Async view callback (validate, save)
pub type AsyncCallback = Rc<dyn Fn(View) -> LocalBoxFuture<anyhow::Result<()>>>;
/// Synchronous view hook (spinner, submitted, canceled)
pub type ViewHook = Rc<dyn Fn(&View)>;
/// Error callback for unexpected (non-validation) failures
pub type ErrorHook = Rc<dyn Fn(&View, &anyhow::Error)>;
/// Builds the model-form map, fresh per attempt
pub type MapBuilder = Rc<dyn Fn(&View) -> ModelFormMap>;

/// Wrap an async closure into an [`AsyncCallback`]
pub fn async_callback<F, Fut>(f: F) -> AsyncCallback
where
    F: Fn(View) -> Fut + 'static,
    Fut: Future<Output = anyhow::Result<()>> + 'static,
{
    Rc::new(move |view| Box::pin(f(view)))
}

/// Configuration of one form's submission flow
pub struct FormConfig {
    map: MapBuilder,
    model: Rc<RefCell<Model>>,
    submit_selector: String,
    cancel_selector: Option<String>,
    defaults: FormDefaults,
    hidden_class: String,
    validate: Option<AsyncCallback>,
    save: Option<AsyncCallback>,
    show_spinner: Option<ViewHook>,
    hide_spinner: Option<ViewHook>,
    on_submit_error: Option<ErrorHook>,
    on_submitted: Option<ViewHook>,
    on_canceled: Option<ViewHook>,
    setter: AttributeSetter,
    session_active: Cell<bool>,
}

impl FormConfig {
    /// A form submitting via clicks on `submit_selector`, reading fields
    /// through the map `map` builds per attempt
    pub fn new<F>(submit_selector: &str, map: F) -> Self
    where
        F: Fn(&View) -> ModelFormMap + 'static,
    {
        Self {
            map: Rc::new(map),
            model: Rc::new(RefCell::new(Model::new())),
            submit_selector: submit_selector.to_string(),
            cancel_selector: None,
            defaults: FormDefaults::default(),
            hidden_class: DEFAULT_HIDDEN_CLASS.to_string(),
            validate: None,
            save: None,
            show_spinner: None,
            hide_spinner: None,
            on_submit_error: None,
            on_submitted: None,
            on_canceled: None,
            setter: default_setter(),
            session_active: Cell::new(false),
        }
    }

    pub fn cancel_selector(mut self, selector: &str) -> Self {
        self.cancel_selector = Some(selector.to_string());
        self
    }

    /// View-level default error class
    pub fn error_class(mut self, class: &str) -> Self {
        self.defaults.error_class = class.to_string();
        self
    }

    /// Class toggled on error-message elements to hide them
    pub fn hidden_class(mut self, class: &str) -> Self {
        self.hidden_class = class.to_string();
        self
    }

    pub fn validate<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(View) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        self.validate = Some(async_callback(f));
        self
    }

    pub fn save<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(View) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        self.save = Some(async_callback(f));
        self
    }

    pub fn show_spinner<F: Fn(&View) + 'static>(mut self, f: F) -> Self {
        self.show_spinner = Some(Rc::new(f));
        self
    }

    pub fn hide_spinner<F: Fn(&View) + 'static>(mut self, f: F) -> Self {
        self.hide_spinner = Some(Rc::new(f));
        self
    }

    pub fn on_submit_error<F: Fn(&View, &anyhow::Error) + 'static>(mut self, f: F) -> Self {
        self.on_submit_error = Some(Rc::new(f));
        self
    }

    pub fn on_submitted<F: Fn(&View) + 'static>(mut self, f: F) -> Self {
        self.on_submitted = Some(Rc::new(f));
        self
    }

    pub fn on_canceled<F: Fn(&View) + 'static>(mut self, f: F) -> Self {
        self.on_canceled = Some(Rc::new(f));
        self
    }

    pub fn setter(mut self, setter: AttributeSetter) -> Self {
        self.setter = setter;
        self
    }

    /// The model written by `read_into_model`
    pub fn model(&self) -> &Rc<RefCell<Model>> {
        &self.model
    }

    /// Whether a submission session is currently in flight
    pub fn session_active(&self) -> bool {
        self.session_active.get()
    }
}

/// Run one submission attempt for a submit click
///
/// Validation errors are re-raised to the caller after field display; any
/// other error is routed to `on_submit_error` and consumed. The cleanup
/// block (re-enable inputs, hide spinner, clear the session flag) runs
/// exactly once regardless of outcome. A click while a session is active is
/// ignored.
pub async fn submit(view: &View, form: &Rc<FormConfig>) -> anyhow::Result<()> {
    if form.session_active.replace(true) {
        tracing::debug!(view = ?view.id(), "submission in flight, ignoring click");
        return Ok(());
    }

    if let Some(hook) = &form.show_spinner {
        hook(view);
    }
    // Field elements and error targets may have changed since the last
    // attempt; the map is rebuilt and normalized fresh.
    let map = normalize((form.map)(view), &form.defaults);
    let submit_button = find_button(view, &form.submit_selector);
    disable_inputs(view, &map, submit_button);

    let outcome = run_attempt(view, form, &map).await;

    enable_inputs(view, &map, submit_button);
    if let Some(hook) = &form.hide_spinner {
        hook(view);
    }
    form.session_active.set(false);

    match outcome {
        Ok(()) => {
            if let Some(hook) = &form.on_submitted {
                hook(view);
            }
            Ok(())
        }
        Err(err) if err.is::<ValidationError>() => Err(err),
        Err(err) => {
            match &form.on_submit_error {
                Some(hook) => hook(view, &err),
                None => tracing::warn!(view = ?view.id(), error = %err, "unhandled submit error"),
            }
            Ok(())
        }
    }
}

async fn run_attempt(
    view: &View,
    form: &FormConfig,
    map: &ModelFormMap,
) -> anyhow::Result<()> {
    clear_errors(view, map, &form.hidden_class);
    read_into_model(view, map, &form.model, &form.setter).await?;

    if let Some(validate) = &form.validate {
        if let Err(err) = validate(view.clone()).await {
            if let Some(validation) = err.downcast_ref::<ValidationError>() {
                apply_validation_errors(view, map, validation, &form.hidden_class);
            }
            return Err(err);
        }
    }
    if let Some(save) = &form.save {
        save(view.clone()).await?;
    }
    Ok(())
}

/// Run the cancel path for a cancel click: the callback only, no spinner,
/// no disabling, no validation
pub fn cancel(view: &View, form: &FormConfig) {
    if let Some(hook) = &form.on_canceled {
        hook(view);
    }
}

fn find_button(view: &View, selector: &str) -> Option<NodeId> {
    // Selector syntax was already checked when the listeners were attached.
    Selector::parse(selector)
        .ok()
        .and_then(|sel| view.query(&sel))
}

fn disable_inputs(view: &View, map: &ModelFormMap, submit_button: Option<NodeId>) {
    for (_, binding) in map.iter() {
        match &binding.disable_input {
            Some(hook) => hook(view, binding.element),
            None => {
                let doc = view.document();
                doc.borrow_mut().tree_mut().set_disabled(binding.element, true);
            }
        }
    }
    if let Some(button) = submit_button {
        let doc = view.document();
        doc.borrow_mut().tree_mut().set_disabled(button, true);
    }
}

fn enable_inputs(view: &View, map: &ModelFormMap, submit_button: Option<NodeId>) {
    for (_, binding) in map.iter() {
        match &binding.enable_input {
            Some(hook) => hook(view, binding.element),
            None => {
                let doc = view.document();
                doc.borrow_mut().tree_mut().set_disabled(binding.element, false);
            }
        }
    }
    if let Some(button) = submit_button {
        let doc = view.document();
        doc.borrow_mut().tree_mut().set_disabled(button, false);
    }
}

/// Build the click listener map routing submit/cancel clicks into the
/// controller
pub fn listeners(form: &Rc<FormConfig>) -> ListenerMap {
    let mut map = ListenerMap::new();

    let submit_form = form.clone();
    map = map.on(
        "click",
        &form.submit_selector,
        handler(move |view, _event| {
            let form = submit_form.clone();
            async move { submit(&view, &form).await }
        }),
    );

    if let Some(cancel_selector) = form.cancel_selector.clone() {
        let cancel_form = form.clone();
        map = map.on(
            "click",
            &cancel_selector,
            handler(move |view, _event| {
                let form = cancel_form.clone();
                async move {
                    cancel(&view, &form);
                    Ok(())
                }
            }),
        );
    }
    map
}

/// Attach the form's listeners to a view through the dispatcher
pub fn install(view: &View, registry: &ViewRegistry, form: &Rc<FormConfig>) -> Result<(), ViewError> {
    registry.attach(view, &listeners(form))
}
