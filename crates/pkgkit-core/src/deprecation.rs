//! Runtime deprecation warnings.
//!
//! `#[deprecated]` only helps callers that compile against us. Plugins and
//! scripts that reach helpers by name need a warning at call time, so this
//! module wraps functions (typed, or dynamic [`Export`]s held in a [`Module`])
//! with a `tracing` warning before delegating.

use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Tracing target of every deprecation warning.
pub const DEPRECATION_TARGET: &str = "pkgkit::deprecation";

/// A function reachable by name, taking and returning JSON values.
pub type Export = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// One named attribute of a [`Module`].
#[derive(Clone)]
pub enum Attr {
    /// Function defined by the module itself.
    Function(Export),
    /// Function re-exported from the host; never wrapped by the proxy.
    Builtin(Export),
    Value(Value),
}

impl Attr {
    #[must_use]
    pub fn is_callable(&self) -> bool {
        !matches!(self, Self::Value(_))
    }

    fn export(&self) -> Option<&Export> {
        match self {
            Self::Function(f) | Self::Builtin(f) => Some(f),
            Self::Value(_) => None,
        }
    }
}

impl fmt::Debug for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(_) => f.write_str("Function(..)"),
            Self::Builtin(_) => f.write_str("Builtin(..)"),
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
        }
    }
}

/// A named table of attributes, with an optional explicit export list.
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    exports: Option<Vec<String>>,
    attrs: BTreeMap<String, Attr>,
}

impl Module {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exports: None,
            attrs: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_function<F>(mut self, name: &str, func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.attrs
            .insert(name.to_string(), Attr::Function(Arc::new(func)));
        self
    }

    #[must_use]
    pub fn with_builtin<F>(mut self, name: &str, func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.attrs
            .insert(name.to_string(), Attr::Builtin(Arc::new(func)));
        self
    }

    #[must_use]
    pub fn with_value(mut self, name: &str, value: Value) -> Self {
        self.attrs.insert(name.to_string(), Attr::Value(value));
        self
    }

    /// Restrict the public exports to `names`.
    #[must_use]
    pub fn with_exports(mut self, names: &[&str]) -> Self {
        self.exports = Some(names.iter().map(ToString::to_string).collect());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Public names: the explicit export list, or every attribute not
    /// starting with `_`.
    #[must_use]
    pub fn exports(&self) -> Vec<String> {
        match &self.exports {
            Some(names) => names.clone(),
            None => self
                .attrs
                .keys()
                .filter(|k| !k.starts_with('_'))
                .cloned()
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Attr> {
        self.attrs.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, attr: Attr) {
        self.attrs.insert(name.into(), attr);
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        let attr = self.get(name).ok_or_else(|| Error::AttributeNotFound {
            module: self.name.clone(),
            name: name.to_string(),
        })?;
        let export = attr.export().ok_or_else(|| Error::NotCallable {
            name: name.to_string(),
        })?;
        Ok(export(args))
    }

    fn attr_names(&self) -> Vec<String> {
        self.attrs.keys().cloned().collect()
    }
}

fn warn_call(name: &str) {
    warn!(target: DEPRECATION_TARGET, "Call to deprecated {name}.");
}

/// Wrap `func` so that every call warns that `name` is deprecated.
pub fn deprecated<A, R, F>(name: &'static str, func: F) -> impl Fn(A) -> R
where
    F: Fn(A) -> R,
{
    move |args| {
        warn_call(name);
        func(args)
    }
}

/// Dynamic counterpart of [`deprecated`] for an [`Export`].
#[must_use]
pub fn deprecate_export(name: &str, export: Export) -> Export {
    let name = name.to_string();
    Arc::new(move |args: &[Value]| {
        warn_call(&name);
        export(args)
    })
}

/// Warn that a deprecated module was imported.
pub fn deprecated_import(module_name: &str) {
    warn!(target: DEPRECATION_TARGET, "Import of deprecated module {module_name}.");
}

/// Copy every public export of `module` into `namespace`, each wrapped with
/// a deprecation warning.
///
/// Fails on the first export that is missing or not callable; exports
/// before it have already been copied.
pub fn import_and_wrap_deprecated(
    module: &Module,
    namespace: &mut Module,
    warn_import: bool,
) -> Result<()> {
    if warn_import {
        deprecated_import(module.name());
    }

    for name in module.exports() {
        let attr = module.get(&name).ok_or_else(|| Error::AttributeNotFound {
            module: module.name().to_string(),
            name: name.clone(),
        })?;
        let export = attr
            .export()
            .ok_or_else(|| Error::NotCallable { name: name.clone() })?;
        let wrapped = deprecate_export(&name, Arc::clone(export));
        namespace.set(name, Attr::Function(wrapped));
    }
    Ok(())
}

/// A module whose attribute accesses warn.
#[derive(Debug)]
pub struct ModuleProxy {
    module: Module,
    /// `None` means every access warns.
    deprecated: Option<BTreeSet<String>>,
}

impl ModuleProxy {
    #[must_use]
    pub fn name(&self) -> &str {
        self.module.name()
    }

    fn warn_access(&self, attr: &str) {
        let warns = self
            .deprecated
            .as_ref()
            .map_or(true, |names| names.contains(attr));
        if warns {
            warn!(target: DEPRECATION_TARGET, "Property {attr} is deprecated");
        }
    }

    pub fn get(&self, attr: &str) -> Option<&Attr> {
        self.warn_access(attr);
        self.module.get(attr)
    }

    pub fn set(&mut self, attr: &str, value: Attr) {
        self.warn_access(attr);
        self.module.set(attr, value);
    }

    pub fn call(&self, attr: &str, args: &[Value]) -> Result<Value> {
        self.warn_access(attr);
        self.module.call(attr, args)
    }

    /// Names whose access warns, or `None` when every access does.
    #[must_use]
    pub fn deprecated_properties(&self) -> Option<&BTreeSet<String>> {
        self.deprecated.as_ref()
    }
}

/// Mark `module` as deprecated and hand back a warning proxy for it.
///
/// Each of `deprecated_attributes` (every attribute when `None`), except
/// names starting with `_`, is either wrapped with a call warning (module
/// functions) or recorded as a deprecated property (values, builtins and
/// names the module does not define yet). If nothing gets recorded, the
/// proxy warns on every access.
#[must_use]
pub fn deprecate_module_with_proxy(
    mut module: Module,
    deprecated_attributes: Option<&[&str]>,
) -> ModuleProxy {
    deprecated_import(module.name());

    let keys = match deprecated_attributes {
        Some(names) => names.iter().map(ToString::to_string).collect(),
        None => module.attr_names(),
    };

    let mut properties = BTreeSet::new();
    for key in keys {
        if key.starts_with('_') {
            continue;
        }
        if let Some(Attr::Function(func)) = module.get(&key) {
            let wrapped = deprecate_export(&key, Arc::clone(func));
            module.set(key, Attr::Function(wrapped));
        } else {
            properties.insert(key);
        }
    }

    ModuleProxy {
        module,
        deprecated: (!properties.is_empty()).then_some(properties),
    }
}
