//! Plugins extend both pipelines at once.
//!
//! A plugin is one object that is both a [`Processor`] and an [`Animator`].
//! The registry stores factories, not instances: every transition builds
//! fresh instances of the enabled plugins, in registration order, and
//! shares each instance between the two pipelines so state written while
//! processing is visible while animating.
//!
//! The process-wide registry is what [`Transition::new`](crate::Transition::new)
//! consults. Owned registries exist for callers that need isolation, such
//! as tests running in parallel.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::debug;

use crate::animator::Animator;
use crate::context::{Role, TransitionContext};
use crate::error::{MorphError, Result};
use crate::processor::Processor;
use crate::scene::{ElementId, SceneGraph};

pub trait Plugin: Processor + Animator {}

impl<T: Processor + Animator> Plugin for T {}

pub type PluginFactory = fn() -> Box<dyn Plugin>;

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    factory: PluginFactory,
    enabled: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    entries: Vec<Entry>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin under `name`. New plugins start enabled.
    pub fn register(&mut self, name: impl Into<String>, factory: PluginFactory) -> Result<()> {
        let name = name.into();
        if self.position(&name).is_some() {
            return Err(MorphError::DuplicatePlugin(name));
        }
        debug!(plugin = %name, "plugin registered");
        self.entries.push(Entry { name, factory, enabled: true });
        Ok(())
    }

    pub fn unregister(&mut self, name: &str) -> Result<()> {
        let index = self.index(name)?;
        self.entries.remove(index);
        debug!(plugin = %name, "plugin unregistered");
        Ok(())
    }

    pub fn enable(&mut self, name: &str) -> Result<()> {
        self.set_enabled(name, true)
    }

    pub fn disable(&mut self, name: &str) -> Result<()> {
        self.set_enabled(name, false)
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name && e.enabled)
    }

    /// Names of enabled plugins in registration order.
    pub fn enabled_plugins(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.enabled)
            .map(|e| e.name.as_str())
            .collect()
    }

    /// Fresh instances of every enabled plugin.
    pub fn instantiate(&self) -> Vec<SharedPlugin> {
        self.entries
            .iter()
            .filter(|e| e.enabled)
            .map(|e| SharedPlugin::new(e.name.clone(), (e.factory)()))
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    fn index(&self, name: &str) -> Result<usize> {
        self.position(name)
            .ok_or_else(|| MorphError::UnknownPlugin(name.to_string()))
    }

    fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<()> {
        let index = self.index(name)?;
        self.entries[index].enabled = enabled;
        debug!(plugin = %name, enabled, "plugin toggled");
        Ok(())
    }
}

static GLOBAL_REGISTRY: OnceLock<Mutex<PluginRegistry>> = OnceLock::new();

fn global() -> MutexGuard<'static, PluginRegistry> {
    GLOBAL_REGISTRY
        .get_or_init(|| Mutex::new(PluginRegistry::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Register a plugin with the process-wide registry.
pub fn register_plugin(name: impl Into<String>, factory: PluginFactory) -> Result<()> {
    global().register(name, factory)
}

pub fn unregister_plugin(name: &str) -> Result<()> {
    global().unregister(name)
}

pub fn enable_plugin(name: &str) -> Result<()> {
    global().enable(name)
}

pub fn disable_plugin(name: &str) -> Result<()> {
    global().disable(name)
}

pub fn is_plugin_enabled(name: &str) -> bool {
    global().is_enabled(name)
}

/// Copy of the process-wide registry as it is right now.
pub fn global_snapshot() -> PluginRegistry {
    global().clone()
}

/// One plugin instance shared between the processor and animator lists.
#[derive(Clone)]
pub struct SharedPlugin {
    name: String,
    inner: Rc<RefCell<Box<dyn Plugin>>>,
}

impl SharedPlugin {
    pub fn new(name: String, plugin: Box<dyn Plugin>) -> Self {
        Self { name, inner: Rc::new(RefCell::new(plugin)) }
    }
}

impl std::fmt::Debug for SharedPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedPlugin").field("name", &self.name).finish()
    }
}

impl Processor for SharedPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(
        &mut self,
        ctx: &mut TransitionContext,
        graph: &SceneGraph,
        from: &[ElementId],
        to: &[ElementId],
    ) {
        self.inner.borrow_mut().process(ctx, graph, from, to);
    }
}

impl Animator for SharedPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_animate(
        &self,
        ctx: &TransitionContext,
        graph: &SceneGraph,
        element: ElementId,
        role: Role,
    ) -> bool {
        self.inner.borrow().can_animate(ctx, graph, element, role)
    }

    fn animate(
        &mut self,
        ctx: &mut TransitionContext,
        graph: &mut SceneGraph,
        from: &[ElementId],
        to: &[ElementId],
    ) -> f32 {
        self.inner.borrow_mut().animate(ctx, graph, from, to)
    }

    fn seek(&mut self, graph: &mut SceneGraph, elapsed_ms: f32) {
        self.inner.borrow_mut().seek(graph, elapsed_ms);
    }

    fn cancel(&mut self, graph: &mut SceneGraph) {
        self.inner.borrow_mut().cancel(graph);
    }

    fn clean(&mut self, graph: &mut SceneGraph) {
        self.inner.borrow_mut().clean(graph);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::test_support::Scenes;

    /// Claims every element it saw while processing.
    #[derive(Default)]
    struct Recorder {
        seen: Vec<ElementId>,
    }

    impl Processor for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn process(
            &mut self,
            _ctx: &mut TransitionContext,
            _graph: &SceneGraph,
            from: &[ElementId],
            to: &[ElementId],
        ) {
            self.seen.extend(from.iter().chain(to));
        }
    }

    impl Animator for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn can_animate(&self, _: &TransitionContext, _: &SceneGraph, id: ElementId, _: Role) -> bool {
            self.seen.contains(&id)
        }

        fn animate(
            &mut self,
            _: &mut TransitionContext,
            _: &mut SceneGraph,
            _: &[ElementId],
            _: &[ElementId],
        ) -> f32 {
            0.0
        }
    }

    fn recorder() -> Box<dyn Plugin> {
        Box::new(Recorder::default())
    }

    #[test]
    fn test_register_and_toggle() {
        let mut registry = PluginRegistry::new();
        registry.register("a", recorder).unwrap();
        registry.register("b", recorder).unwrap();
        assert_eq!(
            registry.register("a", recorder),
            Err(MorphError::DuplicatePlugin("a".into()))
        );
        assert_eq!(registry.enabled_plugins(), vec!["a", "b"]);

        registry.disable("a").unwrap();
        assert!(!registry.is_enabled("a"));
        assert_eq!(registry.enabled_plugins(), vec!["b"]);
        assert_eq!(registry.instantiate().len(), 1);

        registry.enable("a").unwrap();
        assert_eq!(registry.enabled_plugins(), vec!["a", "b"]);
        registry.unregister("b").unwrap();
        assert_eq!(registry.enabled_plugins(), vec!["a"]);

        assert_eq!(registry.enable("zzz"), Err(MorphError::UnknownPlugin("zzz".into())));
        assert_eq!(registry.unregister("b"), Err(MorphError::UnknownPlugin("b".into())));
        assert!(!registry.is_enabled("zzz"));
    }

    #[test]
    fn test_instance_shared_between_pipelines() {
        let mut registry = PluginRegistry::new();
        registry.register("recorder", recorder).unwrap();
        let plugin = registry.instantiate().remove(0);
        let mut as_processor: Box<dyn Processor> = Box::new(plugin.clone());
        let as_animator: Box<dyn Animator> = Box::new(plugin);
        assert_eq!(Processor::name(as_processor.as_ref()), "recorder");

        let mut s = Scenes::new();
        let mut ctx = s.context(false);
        let graph = &s.host.graph;
        assert!(!as_animator.can_animate(&ctx, graph, s.to_root, Role::Appearing));

        let (from, to) = (ctx.from_elements().to_vec(), ctx.to_elements().to_vec());
        as_processor.process(&mut ctx, graph, &from, &to);
        assert!(as_animator.can_animate(&ctx, graph, s.to_root, Role::Appearing));
    }

    #[test]
    fn test_fresh_instances_per_call() {
        let mut registry = PluginRegistry::new();
        registry.register("recorder", recorder).unwrap();
        let first = registry.instantiate().remove(0);
        let second = registry.instantiate().remove(0);
        assert!(!Rc::ptr_eq(&first.inner, &second.inner));
    }
}
