//! End-to-end form submission: dispatch, translation, validation, deferred
//! session writes, and zone re-rendering.

use pagewire::dispatch::{ActionDispatcher, ActionLinkHandler, ResponseGenerator};
use pagewire::error::RenderError;
use pagewire::messages::{validation_defaults, Messages};
use pagewire::page::{Component, EventResult, Page, PageRegistry};
use pagewire::render::{Environment, MarkupWriter, PageRenderer, RenderCommand, RenderQueue};
use pagewire::session::{InMemorySessionStore, SessionAccessor, SessionStore};
use pagewire::translator::{LookupPolicy, TranslatorRegistry};
use pagewire::types::{Field, TypeHierarchy, TypeTag};
use pagewire::validator::{process_input, FieldValidatorSource};
use serde_json::{json, Value};
use std::sync::Arc;

/// Writes the page's current `error` property, if any.
struct ErrorText;

impl RenderCommand for ErrorText {
    fn render(
        &self,
        writer: &mut dyn MarkupWriter,
        queue: &mut RenderQueue,
        _environment: &mut Environment,
    ) -> Result<(), RenderError> {
        if let Some(Value::String(error)) = queue.page().and_then(|p| p.property("error")) {
            writer.write(&error);
        }
        Ok(())
    }
}

fn registry() -> PageRegistry {
    let messages: Arc<dyn Messages> = Arc::new(validation_defaults());
    let translators = Arc::new(
        TranslatorRegistry::with_builtins(TypeHierarchy::builtin(), LookupPolicy::Hierarchy)
            .unwrap(),
    );
    let validators = Arc::new(
        FieldValidatorSource::new(messages.clone())
            .create_validators("age", "Age", "required,min=18")
            .unwrap(),
    );

    let form = Component::new("form")
        .element("form")
        .child(
            Component::new("error")
                .element("p")
                .child(Component::new("text").custom(Arc::new(ErrorText))),
        )
        .child(Component::new("submit").element("button").child(Component::new("label").text("Go")))
        .on("submit", move |ctx| {
            let field = Field::new("Age", "u8");
            let translator = translators.get_by_type(&TypeTag::from("u8"))?;
            match process_input(
                &field,
                ctx.arg(0).unwrap_or(""),
                translator.as_ref(),
                validators.as_ref(),
                messages.as_ref(),
            ) {
                Ok(value) => {
                    let session = ctx.sessions.get_session(true).expect("session");
                    let age = value.map(|v| v.to_string()).unwrap_or_default();
                    let stored = age.clone();
                    ctx.heartbeat.defer(move || session.set_attribute("age", json!(stored)))?;
                    Ok(Some(EventResult::Redirect {
                        page: "Thanks".into(),
                        context: vec![age],
                    }))
                }
                Err(err) => {
                    ctx.page.set_property("error", json!(err.message));
                    Ok(Some(EventResult::Zone("form".into())))
                }
            }
        });

    let mut pages = PageRegistry::new();
    pages.register(Page::new("Register", Component::new("").element("main").child(form)));
    pages.register(Page::new("Thanks", Component::new("")));
    pages
}

#[test]
fn test_valid_submission_redirects_and_stores_session_value() {
    let store = Arc::new(InMemorySessionStore::new("it-"));
    let sessions = SessionAccessor::new(store.clone(), None);
    let dispatcher = ActionDispatcher::new(Arc::new(registry()));

    let generator = dispatcher
        .handle_link("register", "form.submit", "submit", &["21".into()], &sessions)
        .unwrap();
    assert!(matches!(generator, ResponseGenerator::Redirect { ref location } if location == "/thanks/21"));

    let session = sessions.get_session(false).unwrap();
    assert_eq!(session.attribute("age"), Some(json!("21")));
    assert!(store.get(session.id()).is_some());
}

#[test]
fn test_invalid_submission_rerenders_form_zone() {
    let store = Arc::new(InMemorySessionStore::new("it-"));
    let sessions = SessionAccessor::new(store, None);
    let dispatcher = ActionDispatcher::new(Arc::new(registry()));

    let generator = dispatcher
        .handle_link("Register", "form.submit", "submit", &["12".into()], &sessions)
        .unwrap();
    let response = generator.generate(&mut PageRenderer::new()).unwrap();
    assert_eq!(response.status, 200);
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(
        body["content"],
        "<form><p>Age requires a value of at least 18.</p><button>Go</button></form>"
    );
    assert!(!sessions.has_session());
}

#[test]
fn test_unparseable_submission_reports_translator_message() {
    let sessions = SessionAccessor::new(Arc::new(InMemorySessionStore::new("it-")), None);
    let dispatcher = ActionDispatcher::new(Arc::new(registry()));

    let generator = dispatcher
        .handle_link("Register", "form.submit", "submit", &["lots".into()], &sessions)
        .unwrap();
    let response = generator.generate(&mut PageRenderer::new()).unwrap();
    assert!(response.body.contains("You must provide an integer value for Age."));
}
