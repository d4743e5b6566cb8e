use crate::kinds::KindCatalog;
use crate::object::{ObjectId, ObjectKind, SceneObject, Transform};
use crate::render::{ProxyHandle, RenderBackend};
use crate::scene::ObjectRecord;

/// Owns the live scene objects in creation order. Every object holds exactly one render proxy,
/// created here and released here, so the renderer's live set always mirrors this list.
pub struct SceneRegistry {
    objects: Vec<SceneObject>,
    /// Last id handed out; the next object gets `last_id + 1`.
    last_id: u64,
    catalog: KindCatalog,
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::new(KindCatalog::default())
    }
}

impl SceneRegistry {
    pub fn new(catalog: KindCatalog) -> Self {
        Self { objects: Vec::new(), last_id: 0, catalog }
    }

    pub fn catalog(&self) -> &KindCatalog {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|object| object.id).collect()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|object| object.id == id)
    }

    pub fn find_by_proxy(&self, proxy: ProxyHandle) -> Option<ObjectId> {
        self.objects.iter().find(|object| object.proxy() == proxy).map(|object| object.id)
    }

    /// Creates an object of `kind`. Without an explicit transform the kind's default placement
    /// is used.
    pub fn create(
        &mut self,
        backend: &mut dyn RenderBackend,
        kind: ObjectKind,
        transform: Option<Transform>,
    ) -> ObjectId {
        self.last_id += 1;
        let id = ObjectId(self.last_id);
        let template = self.catalog.template(kind, id.raw());
        let transform = transform.unwrap_or(template.transform);
        self.spawn(backend, id, template.name, kind, transform);
        id
    }

    fn spawn(
        &mut self,
        backend: &mut dyn RenderBackend,
        id: ObjectId,
        name: String,
        kind: ObjectKind,
        transform: Transform,
    ) {
        let proxy = backend.create_proxy(kind);
        backend.set_proxy_transform(proxy, &transform);
        self.objects.push(SceneObject::new(id, name, kind, transform, proxy));
    }

    /// Removes the object and releases its proxy. Clips, bindings and selection entries that
    /// refer to it are owned elsewhere and cleaned up by the editor.
    pub fn destroy(&mut self, backend: &mut dyn RenderBackend, id: ObjectId) -> Option<SceneObject> {
        let index = self.objects.iter().position(|object| object.id == id)?;
        let object = self.objects.remove(index);
        backend.destroy_proxy(object.proxy());
        Some(object)
    }

    pub fn clear(&mut self, backend: &mut dyn RenderBackend) {
        for object in self.objects.drain(..) {
            backend.destroy_proxy(object.proxy());
        }
    }

    pub fn serialize(&self, id: ObjectId, track_target: Option<ObjectId>) -> Option<ObjectRecord> {
        self.get(id).map(|object| ObjectRecord::capture(object, track_target))
    }

    /// Rebuilds an object from a record, keeping the record's id. Returns `None` for kinds the
    /// catalog does not know and for ids that are already live.
    pub fn reconstruct(&mut self, backend: &mut dyn RenderBackend, record: &ObjectRecord) -> Option<ObjectId> {
        let Some(entry) = self.catalog.resolve(&record.kind_key()) else {
            log::debug!(target: "scene", "skipping object {} of unsupported kind '{}'", record.id, record.kind);
            return None;
        };
        let kind = entry.kind;
        if self.contains(record.id) {
            log::warn!(target: "scene", "skipping duplicate object id {}", record.id);
            return None;
        }
        self.spawn(backend, record.id, record.name.clone(), kind, record.transform());
        Some(record.id)
    }

    /// Recomputes the id counter from the live set after bulk reconstruction. The counter never
    /// moves backwards so ids stay unique for the whole session.
    pub fn recompute_next_id(&mut self) {
        let max_live = self.objects.iter().map(|object| object.id.raw()).max().unwrap_or(0);
        self.last_id = self.last_id.max(max_live);
    }

    pub fn set_transform(&mut self, backend: &mut dyn RenderBackend, id: ObjectId, transform: Transform) -> bool {
        let Some(object) = self.get_mut(id) else {
            return false;
        };
        if object.transform == transform {
            return false;
        }
        object.transform = transform;
        backend.set_proxy_transform(object.proxy(), &transform);
        true
    }

    pub fn rename(&mut self, id: ObjectId, name: &str) -> bool {
        match self.get_mut(id) {
            Some(object) if object.name != name => {
                object.name = name.to_string();
                true
            }
            _ => false,
        }
    }

    /// Pushes the current transform of each listed object to its proxy.
    pub fn sync_proxies(&self, backend: &mut dyn RenderBackend, ids: &[ObjectId]) {
        for id in ids {
            if let Some(object) = self.get(*id) {
                backend.set_proxy_transform(object.proxy(), &object.transform);
            }
        }
    }
}
