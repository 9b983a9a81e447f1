//! Entity registry for managing entity descriptors and auto-generating CRUD routes

use super::crud::crud_routes;
use crate::core::entity::Content;
use crate::core::service::DataService;
use axum::Router;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// Trait that describes how to build routes for a content type
pub trait EntityDescriptor: Send + Sync {
    /// The entity type name (singular, e.g., "sermon")
    fn entity_type(&self) -> &str;

    /// The plural form, also the base path (e.g., "sermons")
    fn plural(&self) -> &str;

    /// Build the CRUD routes for this entity
    ///
    /// Should return a Router with routes like:
    /// - GET /{plural}
    /// - POST /{plural}
    /// - GET /{plural}/{id}
    fn build_routes(&self) -> Router;
}

/// Descriptor wiring a content type to its storage service
pub struct ContentDescriptor<T: Content> {
    service: Arc<dyn DataService<T>>,
    _marker: PhantomData<T>,
}

impl<T: Content> ContentDescriptor<T> {
    pub fn new(service: Arc<dyn DataService<T>>) -> Self {
        Self {
            service,
            _marker: PhantomData,
        }
    }
}

impl<T: Content> EntityDescriptor for ContentDescriptor<T> {
    fn entity_type(&self) -> &str {
        T::resource_name_singular()
    }

    fn plural(&self) -> &str {
        T::resource_name()
    }

    fn build_routes(&self) -> Router {
        crud_routes::<T>(self.service.clone())
    }
}

/// Registry for all content types served by the application
///
/// Keyed by plural name, so registering the same type twice replaces it.
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: BTreeMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            descriptors: BTreeMap::new(),
        }
    }

    /// Register an entity descriptor
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let plural = descriptor.plural().to_string();
        self.descriptors.insert(plural, descriptor);
    }

    /// Build a router with all registered entity routes
    pub fn build_routes(&self) -> Router {
        self.descriptors
            .values()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes())
            })
    }

    /// Plural names of all registered content types, sorted
    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
