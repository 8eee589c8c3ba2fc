//! Lighting: an on/off switch toggled by a button.

use std::sync::Arc;

use homepanel_domain::component::ComponentKind;
use homepanel_domain::name::ComponentName;
use homepanel_domain::payload::LightingPayload;

use super::synced::Synced;
use super::{COMPONENT_CLASS, TOGGLE_CLASS};
use crate::component::{Component, ComponentContext};
use crate::ports::StateStore;
use crate::view::{Element, Pending};

/// Button label for a lighting state.
#[must_use]
pub fn toggle_label(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

/// Styling class carried by the fragment root for a lighting state.
#[must_use]
pub fn state_class(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

/// Lighting switch backed by `{"lighting_state": <bool>}`.
pub struct Lighting<S> {
    state: Synced<LightingPayload, S>,
}

impl<S: StateStore + 'static> Lighting<S> {
    /// Create a lighting component that starts switched off.
    pub fn new(name: ComponentName, ctx: &ComponentContext<S>) -> Self {
        Self::with_state(name, false, ctx)
    }

    pub fn with_state(name: ComponentName, on: bool, ctx: &ComponentContext<S>) -> Self {
        Self {
            state: Synced::new(name, LightingPayload { lighting_state: on }, ctx.clone()),
        }
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.state.get().lighting_state
    }

    /// Flip the switch optimistically and PUT the new state to the store.
    pub fn toggle(&self) -> Pending {
        self.state.edit_with(|current| LightingPayload {
            lighting_state: !current.lighting_state,
        })
    }

    pub fn set_on(&self, on: bool) -> Pending {
        self.state.edit(LightingPayload { lighting_state: on })
    }
}

impl<S: StateStore + 'static> Component for Lighting<S> {
    fn name(&self) -> &ComponentName {
        self.state.name()
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Lighting
    }

    fn render(self: Arc<Self>, container: &Element) -> Element {
        let name = self.state.name();
        let on = self.is_on();
        let button = Element::new("button")
            .with_class(TOGGLE_CLASS)
            .with_text(toggle_label(on));
        let fragment = Element::new("div")
            .with_id(name.element_id())
            .with_class(COMPONENT_CLASS)
            .with_class(state_class(on))
            .with_child(Element::new("span").with_text(name.as_str()))
            .with_child(button.clone());
        container.append(fragment.clone());

        button.on_click(move || Some(self.toggle()));
        fragment
    }

    fn fetch_state(self: Arc<Self>, _container: &Element) -> Pending {
        self.state.spawn_fetch()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::sync::broadcast::error::TryRecvError;

    use super::*;
    use crate::component::SyncPolicy;
    use crate::test_support::{MockStore, fixture, fixture_with_policy, name};
    use homepanel_domain::announcement::StateChange;

    fn button_of(fragment: &Element) -> Element {
        fragment.find_by_class(TOGGLE_CLASS).unwrap()
    }

    #[tokio::test]
    async fn should_render_switched_off_fragment() {
        let fx = fixture(MockStore::new());
        let lighting = Arc::new(Lighting::new(name("lighting"), &fx.ctx));

        let fragment = lighting.render(&fx.panel);

        assert_eq!(fragment.id().as_deref(), Some("lighting_div"));
        assert!(fragment.has_class("compo"));
        assert!(fragment.has_class("off"));
        assert_eq!(button_of(&fragment).text(), "OFF");
        assert!(fx.panel.find_by_id("lighting_div").is_some());
    }

    #[tokio::test]
    async fn should_render_initial_on_state() {
        let fx = fixture(MockStore::new());
        let lighting = Arc::new(Lighting::with_state(name("porch"), true, &fx.ctx));

        let fragment = lighting.render(&fx.panel);

        assert!(fragment.has_class("on"));
        assert!(!fragment.has_class("off"));
        assert_eq!(button_of(&fragment).text(), "ON");
    }

    #[tokio::test]
    async fn should_turn_on_when_clicked() {
        let fx = fixture(MockStore::new());
        let lighting = Arc::new(Lighting::new(name("lighting"), &fx.ctx));
        let fragment = Arc::clone(&lighting).render(&fx.panel);
        let mut rx = fx.bus.subscribe();

        button_of(&fragment).dispatch_click().unwrap().await.unwrap();

        assert!(lighting.is_on());
        assert_eq!(button_of(&fragment).text(), "ON");
        assert!(fragment.has_class("on"));
        assert!(!fragment.has_class("off"));
        assert_eq!(
            rx.try_recv().unwrap(),
            StateChange::Lighting {
                name: name("lighting"),
                lighting_state: true,
            }
        );
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn should_turn_off_when_clicked_again() {
        let fx = fixture(MockStore::new());
        let lighting = Arc::new(Lighting::new(name("lighting"), &fx.ctx));
        let fragment = Arc::clone(&lighting).render(&fx.panel);

        button_of(&fragment).dispatch_click().unwrap().await.unwrap();
        button_of(&fragment).dispatch_click().unwrap().await.unwrap();

        assert!(!lighting.is_on());
        assert_eq!(button_of(&fragment).text(), "OFF");
        assert!(fragment.has_class("off"));
        assert!(!fragment.has_class("on"));
    }

    #[tokio::test]
    async fn should_put_only_the_lighting_state_field() {
        let fx = fixture(MockStore::new());
        let lighting = Arc::new(Lighting::new(name("lighting"), &fx.ctx));
        let fragment = Arc::clone(&lighting).render(&fx.panel);

        button_of(&fragment).dispatch_click().unwrap().await.unwrap();

        assert_eq!(
            fx.store.writes(),
            vec![("lighting".to_string(), json!({"lighting_state": true}))]
        );
    }

    #[tokio::test]
    async fn should_display_fetched_state() {
        let fx = fixture(MockStore::new().with_document("lighting", json!({"lighting_state": true})));
        let lighting = Arc::new(Lighting::new(name("lighting"), &fx.ctx));

        let fetch = Arc::clone(&lighting).fetch_state(&fx.panel);
        let fragment = Arc::clone(&lighting).render(&fx.panel);
        fetch.await.unwrap();

        assert!(lighting.is_on());
        assert_eq!(button_of(&fragment).text(), "ON");
        assert!(fragment.has_class("on"));
    }

    #[tokio::test]
    async fn should_keep_optimistic_state_when_write_fails() {
        let fx = fixture(MockStore::new().failing_writes());
        let lighting = Arc::new(Lighting::new(name("lighting"), &fx.ctx));
        let fragment = Arc::clone(&lighting).render(&fx.panel);

        button_of(&fragment).dispatch_click().unwrap().await.unwrap();

        assert!(lighting.is_on());
        assert_eq!(button_of(&fragment).text(), "ON");
    }

    #[tokio::test]
    async fn should_roll_back_when_policy_requests_it() {
        let policy = SyncPolicy {
            rollback_on_write_failure: true,
            ..SyncPolicy::default()
        };
        let fx = fixture_with_policy(MockStore::new().failing_writes(), policy);
        let lighting = Arc::new(Lighting::new(name("lighting"), &fx.ctx));
        let fragment = Arc::clone(&lighting).render(&fx.panel);
        let mut rx = fx.bus.subscribe();

        button_of(&fragment).dispatch_click().unwrap().await.unwrap();

        assert!(!lighting.is_on());
        assert_eq!(button_of(&fragment).text(), "OFF");
        assert!(fragment.has_class("off"));
        // optimistic announcement, then the rollback
        assert!(matches!(
            rx.try_recv().unwrap(),
            StateChange::Lighting { lighting_state: true, .. }
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            StateChange::Lighting { lighting_state: false, .. }
        ));
    }

    #[tokio::test]
    async fn should_ignore_payload_with_wrong_type() {
        let fx = fixture(MockStore::new().with_document("lighting", json!({"lighting_state": "yes"})));
        let lighting = Arc::new(Lighting::new(name("lighting"), &fx.ctx));

        Arc::clone(&lighting).fetch_state(&fx.panel).await.unwrap();

        assert!(!lighting.is_on());
    }

    #[tokio::test]
    async fn should_bind_separate_handlers_per_fragment() {
        let fx = fixture(MockStore::new());
        let other = Element::new("div");
        fx.document.mount(other.clone());
        let lighting = Arc::new(Lighting::new(name("lighting"), &fx.ctx));

        let first = Arc::clone(&lighting).render(&fx.panel);
        let second = Arc::clone(&lighting).render(&other);

        assert!(!button_of(&first).ptr_eq(&button_of(&second)));
        button_of(&first).dispatch_click().unwrap().await.unwrap();
        button_of(&second).dispatch_click().unwrap().await.unwrap();

        assert!(!lighting.is_on());
        assert_eq!(fx.store.writes().len(), 2);
        assert_eq!(button_of(&first).text(), "OFF");
        assert_eq!(button_of(&second).text(), "OFF");
    }
}
