use crate::object::{ObjectKind, Transform};
use glam::Vec3;
use std::collections::HashMap;

/// Builds the default name and placement for a freshly created object.
pub type KindConstructor = fn(ordinal: u64) -> KindTemplate;

#[derive(Debug, Clone, PartialEq)]
pub struct KindTemplate {
    pub name: String,
    pub transform: Transform,
}

#[derive(Clone, Copy)]
pub struct KindEntry {
    pub kind: ObjectKind,
    pub construct: KindConstructor,
}

/// Maps the kind names found in scene files to their constructors. Records whose kind is not
/// registered here are treated as unsupported and skipped.
#[derive(Clone)]
pub struct KindCatalog {
    entries: HashMap<&'static str, KindEntry>,
}

impl Default for KindCatalog {
    fn default() -> Self {
        let mut catalog = Self { entries: HashMap::new() };
        catalog.register(ObjectKind::Quad, construct_quad);
        catalog.register(ObjectKind::Cube, construct_cube);
        catalog.register(ObjectKind::Camera, construct_camera);
        catalog
    }
}

impl KindCatalog {
    pub fn register(&mut self, kind: ObjectKind, construct: KindConstructor) {
        self.entries.insert(kind.key(), KindEntry { kind, construct });
    }

    pub fn resolve(&self, key: &str) -> Option<&KindEntry> {
        self.entries.get(key)
    }

    pub fn entry(&self, kind: ObjectKind) -> Option<&KindEntry> {
        self.resolve(kind.key())
    }

    pub fn template(&self, kind: ObjectKind, ordinal: u64) -> KindTemplate {
        match self.entry(kind) {
            Some(entry) => (entry.construct)(ordinal),
            None => KindTemplate { name: format!("{} {ordinal}", kind.label()), transform: Transform::default() },
        }
    }
}

fn construct_quad(ordinal: u64) -> KindTemplate {
    KindTemplate { name: format!("Quad {ordinal}"), transform: Transform::default() }
}

fn construct_cube(ordinal: u64) -> KindTemplate {
    KindTemplate {
        name: format!("Cube {ordinal}"),
        transform: Transform::from_position(Vec3::new(0.0, 0.5, 0.0)),
    }
}

fn construct_camera(ordinal: u64) -> KindTemplate {
    KindTemplate {
        name: format!("Camera {ordinal}"),
        transform: Transform::from_position(Vec3::new(0.0, 2.0, 6.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_builtin_kinds_by_key() {
        let catalog = KindCatalog::default();
        for kind in ObjectKind::ALL {
            assert_eq!(catalog.resolve(kind.key()).map(|entry| entry.kind), Some(kind));
        }
        assert!(catalog.resolve("sphere").is_none());
    }

    #[test]
    fn template_names_include_ordinal() {
        let catalog = KindCatalog::default();
        let template = catalog.template(ObjectKind::Camera, 4);
        assert_eq!(template.name, "Camera 4");
        assert!(template.transform.position.z > 0.0);
    }
}
