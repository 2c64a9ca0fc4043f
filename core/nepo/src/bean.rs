//! Typed side products workers hand to each other through the project.
//!
//! A bean is any `'static` value. The registry keeps at most one instance per
//! type; a later registration of the same type replaces the earlier one.

use std::any::{Any, TypeId, type_name};

use nepo_ast::hardware::UsedHardware;
use nepo_type_checker::typed_context::TypedContext;
use rustc_hash::FxHashMap;

/// Hardware the program touches, produced by program validation.
#[derive(Debug, Clone, Default)]
pub struct UsedHardwareBean(pub UsedHardware);

/// Variable types and type errors, produced by type checking.
#[derive(Debug, Clone, Default)]
pub struct TypeCheckBean(pub TypedContext);

#[derive(Default)]
pub struct BeanRegistry {
    beans: FxHashMap<TypeId, Box<dyn Any>>,
    names: Vec<&'static str>,
}

impl BeanRegistry {
    pub fn insert<B: Any>(&mut self, bean: B) {
        if self.beans.insert(TypeId::of::<B>(), Box::new(bean)).is_none() {
            self.names.push(type_name::<B>());
        }
    }

    #[must_use]
    pub fn get<B: Any>(&self) -> Option<&B> {
        self.beans
            .get(&TypeId::of::<B>())
            .and_then(|bean| bean.downcast_ref::<B>())
    }

    #[must_use]
    pub fn contains<B: Any>(&self) -> bool {
        self.beans.contains_key(&TypeId::of::<B>())
    }

    /// Type names of the registered beans in registration order.
    #[must_use]
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }
}

impl std::fmt::Debug for BeanRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_instance_per_type() {
        let mut registry = BeanRegistry::default();
        assert!(registry.get::<UsedHardwareBean>().is_none());

        let mut used = UsedHardware::default();
        used.add_timer(1);
        registry.insert(UsedHardwareBean(used));
        registry.insert(UsedHardwareBean::default());

        assert_eq!(registry.names().len(), 1);
        let bean = registry.get::<UsedHardwareBean>().unwrap();
        assert_eq!(bean.0.timers().count(), 0);
        assert!(!registry.contains::<TypeCheckBean>());
    }
}
