use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;

use super::mapper::{DatabaseReaderMapper, FromRow, FromRowMapper};

type MapperFactory = Box<dyn Fn() -> Box<dyn Any> + Send + Sync>;

/// Mapper factories keyed by the element type they produce.
///
/// Resolution is explicit: an unregistered type resolves to `None` and the caller decides what
/// that means.
#[derive(Default)]
pub struct MapperRegistry {
    factories: HashMap<TypeId, (&'static str, MapperFactory)>,
}

impl MapperRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` as the source of mappers for `T`, replacing any earlier one.
    pub fn register<T, M, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static,
        M: DatabaseReaderMapper<T> + 'static,
        F: Fn() -> M + Send + Sync + 'static,
    {
        let erased: MapperFactory = Box::new(move || -> Box<dyn Any> {
            let mapper: Box<dyn DatabaseReaderMapper<T>> = Box::new(factory());
            Box::new(mapper)
        });
        self.factories
            .insert(TypeId::of::<T>(), (type_name::<T>(), erased));
        self
    }

    /// Register the [`FromRowMapper`] for `T`.
    pub fn register_from_row<T: FromRow + 'static>(&mut self) -> &mut Self {
        self.register::<T, _, _>(FromRowMapper::<T>::new)
    }

    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.factories.contains_key(&TypeId::of::<T>())
    }

    /// A fresh mapper for `T`, if one is registered.
    #[must_use]
    pub fn resolve<T: 'static>(&self) -> Option<Box<dyn DatabaseReaderMapper<T>>> {
        let (_, factory) = self.factories.get(&TypeId::of::<T>())?;
        factory()
            .downcast::<Box<dyn DatabaseReaderMapper<T>>>()
            .ok()
            .map(|mapper| *mapper)
    }
}

impl fmt::Debug for MapperRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.factories.values().map(|(name, _)| name))
            .finish()
    }
}
