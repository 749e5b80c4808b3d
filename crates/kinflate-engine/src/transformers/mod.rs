//! Resource transformers
//!
//! Each transformer rewrites a [`ResourceCollection`] in place. Collection
//! keys stay the original identities, so a later pass can still find a
//! resource under the name it was declared with.

mod map;
mod name_hash;
mod name_prefix;
mod name_reference;
mod overlay;

pub use map::{AnnotationsMapTransformer, LabelsMapTransformer, MapTransformer};
pub use name_hash::NameHashTransformer;
pub use name_prefix::NamePrefixTransformer;
pub use name_reference::NameReferenceTransformer;
pub use overlay::OverlayTransformer;

use kinflate_core::{Resource, ResourceCollection};
use serde_json::{Map, Value as JsonValue};

use crate::error::{EngineError, Result, kind_name};

/// A pass over every resource of a collection
pub trait Transformer {
    /// Name used in logs
    fn name(&self) -> &'static str;

    fn transform(&self, resources: &mut ResourceCollection) -> Result<()>;
}

/// Transformers run one after the other, stopping at the first error
#[derive(Default)]
pub struct MultiTransformer {
    transformers: Vec<Box<dyn Transformer>>,
}

impl MultiTransformer {
    pub fn new(transformers: Vec<Box<dyn Transformer>>) -> Self {
        Self { transformers }
    }

    pub fn push(&mut self, transformer: Box<dyn Transformer>) {
        self.transformers.push(transformer);
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }
}

impl Transformer for MultiTransformer {
    fn name(&self) -> &'static str {
        "multi"
    }

    fn transform(&self, resources: &mut ResourceCollection) -> Result<()> {
        for transformer in &self.transformers {
            tracing::debug!(
                transformer = transformer.name(),
                resources = resources.len(),
                "running transformer"
            );
            transformer.transform(resources)?;
        }
        Ok(())
    }
}

/// The top-level map of a resource
pub(crate) fn object_map(resource: &mut Resource) -> Result<&mut Map<String, JsonValue>> {
    let object = resource.object_mut();
    let found = kind_name(object);
    object.as_object_mut().ok_or(EngineError::TypeMismatch {
        path: String::new(),
        expected: "map",
        found,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinflate_core::{GroupVersionKindName, Gvk};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        label: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
        fail: bool,
    }

    impl Transformer for Recorder {
        fn name(&self) -> &'static str {
            self.label
        }

        fn transform(&self, _resources: &mut ResourceCollection) -> Result<()> {
            self.log.borrow_mut().push(self.label);
            if self.fail {
                return Err(EngineError::InvalidPathConfig {
                    message: self.label.to_string(),
                });
            }
            Ok(())
        }
    }

    fn recorder(label: &'static str, log: &Rc<RefCell<Vec<&'static str>>>, fail: bool) -> Box<dyn Transformer> {
        Box::new(Recorder {
            label,
            log: Rc::clone(log),
            fail,
        })
    }

    #[test]
    fn test_multi_transformer_runs_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let multi = MultiTransformer::new(vec![
            recorder("first", &log, false),
            recorder("second", &log, false),
        ]);
        multi.transform(&mut ResourceCollection::new()).unwrap();
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_multi_transformer_stops_on_error() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut multi = MultiTransformer::default();
        multi.push(recorder("ok", &log, false));
        multi.push(recorder("broken", &log, true));
        multi.push(recorder("never", &log, false));

        assert!(multi.transform(&mut ResourceCollection::new()).is_err());
        assert_eq!(*log.borrow(), vec!["ok", "broken"]);
        assert_eq!(multi.len(), 3);
    }

    #[test]
    fn test_object_map_rejects_non_map() {
        let mut scalar = Resource::new(json!("text"));
        assert!(matches!(
            object_map(&mut scalar),
            Err(EngineError::TypeMismatch { found: "string", .. })
        ));

        let mut collection = ResourceCollection::new();
        let id = GroupVersionKindName::new(Gvk::new("", "v1", "ConfigMap"), "cm");
        collection
            .insert(id.clone(), Resource::new(json!({"metadata": {"name": "cm"}})))
            .unwrap();
        assert!(object_map(collection.get_mut(&id).unwrap()).is_ok());
    }
}
